use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;

pub mod extract;
pub mod load;
pub mod transform;
pub mod validate;

/// Runs the full batch: extract, validate, transform, load.
///
/// Rejected rows are snapshotted to disk for operator inspection before the
/// load; snapshot failures are logged but never fail the run. Any stage
/// error propagates to the caller, which terminates the process non-zero.
pub fn run_pipeline(config: &Config) -> Result<()> {
    info!("[PIPELINE] Sales data pipeline started");

    let raw_records = extract::read_raw_sales_data(&config.source_path)?;
    let outcome = validate::validate_sales_data(raw_records);

    if !outcome.rejected.is_empty() {
        match load::write_rejected_csv(&outcome.rejected, &config.rejected_dir) {
            Ok(path) => info!(
                path = %path.display(),
                rows = outcome.rejected.len(),
                "[VALIDATION] Wrote rejected-rows snapshot"
            ),
            Err(err) => warn!(error = %err, "[VALIDATION] Failed to write rejected-rows snapshot"),
        }
    }

    let transformed = transform::transform_sales_data(outcome.valid, &config.source_file_name());
    load::load_to_staging(&transformed, config)?;

    info!("[PIPELINE] Data load completed successfully");
    Ok(())
}
