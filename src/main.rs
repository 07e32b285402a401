use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use sales_pipeline::config::Config;
use sales_pipeline::logging::{self, LogConfig};
use sales_pipeline::pipeline;

#[derive(Parser)]
#[command(name = "sales_pipeline")]
#[command(about = "Batch ETL pipeline staging auto sales CSV extracts")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: extract, validate, transform, load
    Run {
        /// Path to a TOML configuration file (default: config.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the source CSV path from configuration
        #[arg(long)]
        source: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Environment overrides may come from a .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, source } => {
            let mut config = match Config::load(config.as_deref()) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("Failed to load configuration: {err}");
                    return ExitCode::FAILURE;
                }
            };
            if let Some(source) = source {
                config.source_path = source;
            }

            let _guard = match logging::init(&LogConfig::new(config.log_dir.clone())) {
                Ok(guard) => guard,
                Err(err) => {
                    eprintln!("Failed to initialize logging: {err}");
                    return ExitCode::FAILURE;
                }
            };

            match pipeline::run_pipeline(&config) {
                Ok(()) => {
                    println!("Pipeline run completed successfully");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!(error = %err, "[PIPELINE] Pipeline run failed");
                    eprintln!("Pipeline run failed: {err}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
