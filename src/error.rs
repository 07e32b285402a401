use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Source file not found: {0}")]
    MissingSource(PathBuf),

    #[error("Source file has no data rows: {0}")]
    EmptySource(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Staging schema introspection failed: {0}")]
    SchemaIntrospection(String),

    #[error("Staging write failed: {0}")]
    SinkWrite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
