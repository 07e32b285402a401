use std::path::Path;

use tracing::info;

use crate::domain::RawSalesRecord;
use crate::error::{PipelineError, Result};

/// Reads the raw sales extract into memory.
///
/// Fails fast with `MissingSource` if the file does not exist and with
/// `EmptySource` if no data rows parse (a headers-only or fully empty file).
pub fn read_raw_sales_data(path: &Path) -> Result<Vec<RawSalesRecord>> {
    info!("[EXTRACT] Starting raw data ingestion");

    if !path.exists() {
        return Err(PipelineError::MissingSource(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: RawSalesRecord = row?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(PipelineError::EmptySource(path.to_path_buf()));
    }

    info!(rows = records.len(), "[EXTRACT] Raw data loaded successfully");
    Ok(records)
}
