use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A raw row exactly as read from the source extract.
///
/// Every column is optional: an empty CSV field deserializes to `None`, and a
/// column missing from the file entirely yields `None` for every row. Values
/// stay textual here; coercion to native types happens in validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSalesRecord {
    #[serde(rename = "ORDERNUMBER", default)]
    pub order_number: Option<String>,
    #[serde(rename = "QUANTITYORDERED", default)]
    pub quantity_ordered: Option<String>,
    #[serde(rename = "PRICEEACH", default)]
    pub price_each: Option<String>,
    #[serde(rename = "ORDERLINENUMBER", default)]
    pub order_line_number: Option<String>,
    #[serde(rename = "SALES", default)]
    pub sales: Option<String>,
    #[serde(rename = "ORDERDATE", default)]
    pub order_date: Option<String>,
    #[serde(rename = "DAYS_SINCE_LASTORDER", default)]
    pub days_since_last_order: Option<String>,
    #[serde(rename = "STATUS", default)]
    pub status: Option<String>,
    #[serde(rename = "PRODUCTLINE", default)]
    pub product_line: Option<String>,
    #[serde(rename = "MSRP", default)]
    pub msrp: Option<String>,
    #[serde(rename = "PRODUCTCODE", default)]
    pub product_code: Option<String>,
    #[serde(rename = "CUSTOMERNAME", default)]
    pub customer_name: Option<String>,
    #[serde(rename = "PHONE", default)]
    pub phone: Option<String>,
    #[serde(rename = "ADDRESSLINE1", default)]
    pub address_line1: Option<String>,
    #[serde(rename = "CITY", default)]
    pub city: Option<String>,
    #[serde(rename = "POSTALCODE", default)]
    pub postal_code: Option<String>,
    #[serde(rename = "COUNTRY", default)]
    pub country: Option<String>,
    #[serde(rename = "CONTACTLASTNAME", default)]
    pub contact_last_name: Option<String>,
    #[serde(rename = "CONTACTFIRSTNAME", default)]
    pub contact_first_name: Option<String>,
    #[serde(rename = "DEALSIZE", default)]
    pub deal_size: Option<String>,
}

impl RawSalesRecord {
    /// True if any critical column is null; such rows never reach the valid
    /// partition.
    pub fn has_null_critical_field(&self) -> bool {
        self.order_number.is_none()
            || self.order_date.is_none()
            || self.sales.is_none()
            || self.product_code.is_none()
            || self.customer_name.is_none()
    }
}

/// A row that passed the null check and whose critical columns were coerced
/// to native types. Non-critical columns pass through as read.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSalesRecord {
    pub order_number: i64,
    pub quantity_ordered: Option<i64>,
    pub price_each: Option<f64>,
    pub order_line_number: Option<String>,
    pub sales: f64,
    pub order_date: NaiveDate,
    pub days_since_last_order: Option<String>,
    pub status: Option<String>,
    pub product_line: Option<String>,
    pub msrp: Option<String>,
    pub product_code: String,
    pub customer_name: String,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_first_name: Option<String>,
    pub deal_size: Option<String>,
}

/// A valid row after business transformations: normalized text columns plus
/// the derived calendar, bucketing, and audit fields stamped by one
/// transformer invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedSalesRecord {
    pub order_number: i64,
    pub quantity_ordered: Option<i64>,
    pub price_each: Option<f64>,
    pub order_line_number: Option<String>,
    pub sales: f64,
    pub order_date: NaiveDate,
    pub days_since_last_order: Option<String>,
    /// Uppercased and trimmed
    pub status: Option<String>,
    pub product_line: Option<String>,
    pub msrp: Option<String>,
    pub product_code: String,
    pub customer_name: String,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    /// Title-cased and trimmed
    pub city: Option<String>,
    pub postal_code: Option<String>,
    /// Uppercased and trimmed
    pub country: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_first_name: Option<String>,
    /// Uppercased and trimmed
    pub deal_size: Option<String>,
    pub order_year: i32,
    pub order_month: u32,
    pub revenue_bucket: RevenueBucket,
    /// Shared by every row produced in one pipeline run
    pub batch_id: String,
    /// Shared by every row produced in one pipeline run
    pub load_timestamp: NaiveDateTime,
    pub source_file_name: String,
}

/// Revenue classification derived from the SALES amount with fixed
/// thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevenueBucket {
    Low,
    Medium,
    High,
}

impl RevenueBucket {
    /// `< 3000` is LOW, `< 6000` is MEDIUM, everything else HIGH.
    pub fn from_sales(sales: f64) -> Self {
        if sales < 3000.0 {
            RevenueBucket::Low
        } else if sales < 6000.0 {
            RevenueBucket::Medium
        } else {
            RevenueBucket::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RevenueBucket::Low => "LOW",
            RevenueBucket::Medium => "MEDIUM",
            RevenueBucket::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RevenueBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
