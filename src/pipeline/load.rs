use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::{RawSalesRecord, TransformedSalesRecord};
use crate::error::{PipelineError, Result};

/// Fixed mapping from source column names (upper-snake business names) to
/// staging column names (lower-snake). Derived columns already carry their
/// staging names and map to themselves.
const COLUMN_MAPPING: &[(&str, &str)] = &[
    ("ORDERNUMBER", "order_number"),
    ("QUANTITYORDERED", "quantity_ordered"),
    ("PRICEEACH", "price_each"),
    ("ORDERLINENUMBER", "order_line_number"),
    ("SALES", "sales"),
    ("ORDERDATE", "order_date"),
    ("DAYS_SINCE_LASTORDER", "days_since_last_order"),
    ("STATUS", "status"),
    ("PRODUCTLINE", "product_line"),
    ("MSRP", "msrp"),
    ("PRODUCTCODE", "product_code"),
    ("CUSTOMERNAME", "customer_name"),
    ("PHONE", "phone"),
    ("ADDRESSLINE1", "address_line1"),
    ("CITY", "city"),
    ("POSTALCODE", "postal_code"),
    ("COUNTRY", "country"),
    ("CONTACTLASTNAME", "contact_last_name"),
    ("CONTACTFIRSTNAME", "contact_first_name"),
    ("DEALSIZE", "deal_size"),
    ("order_year", "order_year"),
    ("order_month", "order_month"),
    ("revenue_bucket", "revenue_bucket"),
    ("batch_id", "batch_id"),
    ("load_timestamp", "load_timestamp"),
    ("source_file_name", "source_file_name"),
];

/// Appends the transformed rows to the staging table.
///
/// Destination column order is introspected from the database, rows are
/// reindexed to it, and destination-only columns are bound NULL. On any
/// connection, introspection, or append failure a fallback CSV snapshot of
/// the full table is written before the error propagates.
pub fn load_to_staging(records: &[TransformedSalesRecord], config: &Config) -> Result<usize> {
    info!(
        table = %config.staging_table,
        db = %config.db_path.display(),
        "[LOAD] Starting data load into staging table"
    );

    let conn = match Connection::open(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            snapshot_on_failure(records, "connection_failed", &config.failed_dir);
            return Err(err.into());
        }
    };

    let columns = match staging_columns(&conn, &config.staging_table) {
        Ok(columns) => columns,
        Err(err) => {
            snapshot_on_failure(records, "schema_introspection_failed", &config.failed_dir);
            return Err(err);
        }
    };

    match append_rows(&conn, &config.staging_table, &columns, records) {
        Ok(count) => {
            info!(rows = count, "[LOAD] Data successfully loaded into staging table");
            Ok(count)
        }
        Err(err) => {
            snapshot_on_failure(records, "staging_append_failed", &config.failed_dir);
            Err(err)
        }
    }
}

/// Looks up the staging column a source column maps to.
pub fn source_to_staging(source_column: &str) -> Option<&'static str> {
    COLUMN_MAPPING
        .iter()
        .find(|(source, _)| *source == source_column)
        .map(|(_, staging)| *staging)
}

/// Queries the staging table's column names in ordinal position. The table
/// is schema-owned by the database; a missing table surfaces here as an
/// introspection failure.
fn staging_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let introspect = || -> rusqlite::Result<Vec<String>> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(columns)
    };

    let columns = introspect()
        .map_err(|err| PipelineError::SchemaIntrospection(err.to_string()))?;
    if columns.is_empty() {
        return Err(PipelineError::SchemaIntrospection(format!(
            "staging table '{table}' does not exist or has no columns"
        )));
    }
    Ok(columns)
}

fn append_rows(
    conn: &Connection,
    table: &str,
    columns: &[String],
    records: &[TransformedSalesRecord],
) -> Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }

    let placeholders = (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    for record in records {
        stmt.execute(rusqlite::params_from_iter(staging_row(record, columns)))?;
    }
    Ok(records.len())
}

/// Reindexes one transformed row to the staging column order. Columns the
/// pipeline does not produce are bound NULL.
pub(crate) fn staging_row(record: &TransformedSalesRecord, columns: &[String]) -> Vec<Value> {
    let values = source_row_values(record);
    columns
        .iter()
        .map(|column| {
            values
                .iter()
                .find(|(source, _)| source_to_staging(source) == Some(column.as_str()))
                .map(|(_, value)| value.clone())
                .unwrap_or(Value::Null)
        })
        .collect()
}

/// One row's values keyed by source column name, in source column order
/// followed by the derived columns.
fn source_row_values(record: &TransformedSalesRecord) -> Vec<(&'static str, Value)> {
    vec![
        ("ORDERNUMBER", Value::Integer(record.order_number)),
        ("QUANTITYORDERED", opt_int(record.quantity_ordered)),
        ("PRICEEACH", opt_real(record.price_each)),
        ("ORDERLINENUMBER", opt_text(record.order_line_number.as_deref())),
        ("SALES", Value::Real(record.sales)),
        ("ORDERDATE", Value::Text(record.order_date.format("%Y-%m-%d").to_string())),
        ("DAYS_SINCE_LASTORDER", opt_text(record.days_since_last_order.as_deref())),
        ("STATUS", opt_text(record.status.as_deref())),
        ("PRODUCTLINE", opt_text(record.product_line.as_deref())),
        ("MSRP", opt_text(record.msrp.as_deref())),
        ("PRODUCTCODE", Value::Text(record.product_code.clone())),
        ("CUSTOMERNAME", Value::Text(record.customer_name.clone())),
        ("PHONE", opt_text(record.phone.as_deref())),
        ("ADDRESSLINE1", opt_text(record.address_line1.as_deref())),
        ("CITY", opt_text(record.city.as_deref())),
        ("POSTALCODE", opt_text(record.postal_code.as_deref())),
        ("COUNTRY", opt_text(record.country.as_deref())),
        ("CONTACTLASTNAME", opt_text(record.contact_last_name.as_deref())),
        ("CONTACTFIRSTNAME", opt_text(record.contact_first_name.as_deref())),
        ("DEALSIZE", opt_text(record.deal_size.as_deref())),
        ("order_year", Value::Integer(record.order_year as i64)),
        ("order_month", Value::Integer(record.order_month as i64)),
        ("revenue_bucket", Value::Text(record.revenue_bucket.as_str().to_string())),
        ("batch_id", Value::Text(record.batch_id.clone())),
        (
            "load_timestamp",
            Value::Text(record.load_timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string()),
        ),
        ("source_file_name", Value::Text(record.source_file_name.clone())),
    ]
}

fn opt_int(value: Option<i64>) -> Value {
    value.map(Value::Integer).unwrap_or(Value::Null)
}

fn opt_real(value: Option<f64>) -> Value {
    value.map(Value::Real).unwrap_or(Value::Null)
}

fn opt_text(value: Option<&str>) -> Value {
    value
        .map(|v| Value::Text(v.to_string()))
        .unwrap_or(Value::Null)
}

fn snapshot_on_failure(records: &[TransformedSalesRecord], reason: &str, failed_dir: &Path) {
    warn!(reason, "[LOAD] Load failed, writing fallback CSV");
    match write_fallback_csv(records, reason, failed_dir) {
        Ok(path) => info!(path = %path.display(), "[LOAD] Wrote fallback CSV"),
        Err(err) => error!(error = %err, "[LOAD] Failed to write fallback CSV"),
    }
}

/// Persists the full transformed table to a CSV named by failure reason so
/// operators can inspect and replay the batch.
pub fn write_fallback_csv(
    records: &[TransformedSalesRecord],
    reason: &str,
    failed_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(failed_dir)?;
    let path = failed_dir.join(format!("sales_orders_failed_load_{reason}.csv"));

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(COLUMN_MAPPING.iter().map(|(source, _)| *source))?;
    for record in records {
        let row: Vec<String> = source_row_values(record)
            .into_iter()
            .map(|(_, value)| value_to_csv_field(value))
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(path)
}

/// Persists rows rejected during validation to a timestamped CSV for
/// operator inspection. Best-effort; the caller decides whether failures
/// matter.
pub fn write_rejected_csv(records: &[RawSalesRecord], rejected_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(rejected_dir)?;
    let path = rejected_dir.join(format!(
        "rejected_records_{}.csv",
        Utc::now().format("%Y%m%d_%H%M%S")
    ));

    let mut writer = csv::Writer::from_path(&path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(path)
}

fn value_to_csv_field(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => s,
        Value::Blob(_) => String::new(),
    }
}
