/// Column name constants for the source extract to ensure consistency
/// between validation, the sink column mapping, and log messages.

// Critical columns: a null in any of these disqualifies the row
pub const ORDERNUMBER: &str = "ORDERNUMBER";
pub const ORDERDATE: &str = "ORDERDATE";
pub const SALES: &str = "SALES";
pub const PRODUCTCODE: &str = "PRODUCTCODE";
pub const CUSTOMERNAME: &str = "CUSTOMERNAME";

// Optional business columns coerced during validation
pub const QUANTITYORDERED: &str = "QUANTITYORDERED";
pub const PRICEEACH: &str = "PRICEEACH";

pub const CRITICAL_COLUMNS: [&str; 5] =
    [ORDERNUMBER, ORDERDATE, SALES, PRODUCTCODE, CUSTOMERNAME];

// Defaults, overridable via config.toml or SALES_ETL_* environment variables
pub const DEFAULT_SOURCE_PATH: &str = "data/raw/auto_sales_data.csv";
pub const DEFAULT_DB_PATH: &str = "data/sales_dw.db";
pub const DEFAULT_STAGING_TABLE: &str = "stg_sales_orders";
pub const DEFAULT_FAILED_DIR: &str = "data/failed_load";
pub const DEFAULT_REJECTED_DIR: &str = "data/rejected";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "sales_pipeline.log";
