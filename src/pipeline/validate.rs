use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{info, warn};

use crate::constants;
use crate::domain::{RawSalesRecord, ValidSalesRecord};

/// The validity partition of one input table: every input row lands in
/// exactly one of the two outputs, each preserving input order.
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub valid: Vec<ValidSalesRecord>,
    pub rejected: Vec<RawSalesRecord>,
}

/// A critical-field value that could not be converted to its native type.
/// Absorbed inside validation by rejecting the whole provisional valid set;
/// never surfaced to the orchestrator.
#[derive(Debug, Error)]
#[error("cannot coerce {column} value {value:?}")]
pub struct CoercionError {
    pub column: &'static str,
    pub value: String,
}

/// Partitions raw rows into (valid, rejected).
///
/// Rows with a null in any critical column are rejected outright. The
/// remaining provisional valid set is coerced as one batch: if any value in
/// it fails conversion, the entire provisional set is rejected and the valid
/// output is empty. Partial coercion success is deliberately not supported.
pub fn validate_sales_data(records: Vec<RawSalesRecord>) -> ValidationOutcome {
    info!("[VALIDATION] Starting data validation");

    if records.is_empty() {
        info!("[VALIDATION] Input table is empty");
        return ValidationOutcome::default();
    }

    let (provisional, mut rejected): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|record| !record.has_null_critical_field());

    info!(rejected = rejected.len(), "[VALIDATION] Records rejected due to nulls");

    let valid = match coerce_batch(&provisional) {
        Ok(valid) => valid,
        Err(err) => {
            warn!(
                error = %err,
                "[VALIDATION] Data type conversion failed, rejecting provisional valid set"
            );
            rejected.extend(provisional);
            Vec::new()
        }
    };

    info!(valid = valid.len(), "[VALIDATION] Validation completed");
    ValidationOutcome { valid, rejected }
}

/// Coerces the provisional valid set column by column, in the fixed order
/// ORDERNUMBER, QUANTITYORDERED, PRICEEACH, SALES, ORDERDATE. The first
/// unconvertible value aborts the batch.
pub(crate) fn coerce_batch(
    rows: &[RawSalesRecord],
) -> Result<Vec<ValidSalesRecord>, CoercionError> {
    let order_numbers = coerce_required(rows, constants::ORDERNUMBER, |r| r.order_number.as_deref(), parse_int)?;
    let quantities = coerce_optional(rows, constants::QUANTITYORDERED, |r| r.quantity_ordered.as_deref(), parse_int)?;
    let prices = coerce_optional(rows, constants::PRICEEACH, |r| r.price_each.as_deref(), parse_decimal)?;
    let sales = coerce_required(rows, constants::SALES, |r| r.sales.as_deref(), parse_decimal)?;
    let dates = coerce_required(rows, constants::ORDERDATE, |r| r.order_date.as_deref(), parse_day_first_date)?;

    let valid = rows
        .iter()
        .enumerate()
        .map(|(i, row)| ValidSalesRecord {
            order_number: order_numbers[i],
            quantity_ordered: quantities[i],
            price_each: prices[i],
            order_line_number: row.order_line_number.clone(),
            sales: sales[i],
            order_date: dates[i],
            days_since_last_order: row.days_since_last_order.clone(),
            status: row.status.clone(),
            product_line: row.product_line.clone(),
            msrp: row.msrp.clone(),
            // Non-null guaranteed by the null check
            product_code: row.product_code.clone().unwrap_or_default(),
            customer_name: row.customer_name.clone().unwrap_or_default(),
            phone: row.phone.clone(),
            address_line1: row.address_line1.clone(),
            city: row.city.clone(),
            postal_code: row.postal_code.clone(),
            country: row.country.clone(),
            contact_last_name: row.contact_last_name.clone(),
            contact_first_name: row.contact_first_name.clone(),
            deal_size: row.deal_size.clone(),
        })
        .collect();

    Ok(valid)
}

fn coerce_required<T>(
    rows: &[RawSalesRecord],
    column: &'static str,
    get: impl Fn(&RawSalesRecord) -> Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, CoercionError> {
    rows.iter()
        .map(|row| {
            let value = get(row).ok_or_else(|| CoercionError {
                column,
                value: String::new(),
            })?;
            parse(value).ok_or_else(|| CoercionError {
                column,
                value: value.to_string(),
            })
        })
        .collect()
}

fn coerce_optional<T>(
    rows: &[RawSalesRecord],
    column: &'static str,
    get: impl Fn(&RawSalesRecord) -> Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<Option<T>>, CoercionError> {
    rows.iter()
        .map(|row| match get(row) {
            None => Ok(None),
            Some(value) => parse(value).map(Some).ok_or_else(|| CoercionError {
                column,
                value: value.to_string(),
            }),
        })
        .collect()
}

fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}

/// Parses an order date with the day-first convention: "03/04/2020" is
/// 3 April 2020. ISO dates and trailing time-of-day components are accepted
/// as well.
fn parse_day_first_date(value: &str) -> Option<NaiveDate> {
    const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];
    const DATETIME_FORMATS: [&str; 2] = ["%d/%m/%Y %H:%M", "%d/%m/%Y %H:%M:%S"];

    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_record(order_number: Option<&str>, sales: Option<&str>, order_date: Option<&str>) -> RawSalesRecord {
        RawSalesRecord {
            order_number: order_number.map(String::from),
            quantity_ordered: Some("30".to_string()),
            price_each: Some("95.70".to_string()),
            order_line_number: Some("2".to_string()),
            sales: sales.map(String::from),
            order_date: order_date.map(String::from),
            days_since_last_order: None,
            status: Some("Shipped".to_string()),
            product_line: None,
            msrp: None,
            product_code: Some("S10_1678".to_string()),
            customer_name: Some("Land of Toys Inc.".to_string()),
            phone: None,
            address_line1: None,
            city: Some("NYC".to_string()),
            postal_code: None,
            country: Some("USA".to_string()),
            contact_last_name: None,
            contact_first_name: None,
            deal_size: Some("Small".to_string()),
        }
    }

    #[test]
    fn empty_input_returns_two_empty_tables() {
        let outcome = validate_sales_data(Vec::new());
        assert!(outcome.valid.is_empty());
        assert!(outcome.rejected.is_empty());
    }

    #[test]
    fn rows_with_null_critical_fields_are_rejected_in_order() {
        let rows = vec![
            raw_record(Some("10107"), Some("2871.0"), Some("24/02/2018")),
            raw_record(None, Some("3000.0"), Some("25/02/2018")),
            raw_record(Some("10109"), Some("5000.0"), Some("26/02/2018")),
        ];

        let outcome = validate_sales_data(rows);
        assert_eq!(outcome.valid.len(), 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.valid[0].order_number, 10107);
        assert_eq!(outcome.valid[1].order_number, 10109);
        assert_eq!(outcome.rejected[0].order_number, None);
    }

    #[test]
    fn coercion_produces_native_types() {
        let rows = vec![raw_record(Some("10107"), Some("2871.0"), Some("24/02/2018"))];

        let outcome = validate_sales_data(rows);
        assert_eq!(outcome.valid.len(), 1);
        let record = &outcome.valid[0];
        assert_eq!(record.order_number, 10107);
        assert_eq!(record.quantity_ordered, Some(30));
        assert_eq!(record.price_each, Some(95.70));
        assert_eq!(record.sales, 2871.0);
        assert_eq!(record.order_date, NaiveDate::from_ymd_opt(2018, 2, 24).unwrap());
        assert_eq!(record.customer_name, "Land of Toys Inc.");
    }

    #[test]
    fn one_bad_value_rejects_the_whole_provisional_set() {
        let rows = vec![
            raw_record(Some("10107"), Some("2871.0"), Some("24/02/2018")),
            raw_record(Some("10108"), Some("not-a-number"), Some("25/02/2018")),
            raw_record(Some("10109"), Some("5000.0"), Some("26/02/2018")),
        ];

        let outcome = validate_sales_data(rows);
        assert!(outcome.valid.is_empty());
        assert_eq!(outcome.rejected.len(), 3);
    }

    #[test]
    fn null_rejected_rows_precede_coercion_rejected_rows() {
        let rows = vec![
            raw_record(Some("bad"), Some("2871.0"), Some("24/02/2018")),
            raw_record(None, Some("3000.0"), Some("25/02/2018")),
        ];

        let outcome = validate_sales_data(rows);
        assert!(outcome.valid.is_empty());
        assert_eq!(outcome.rejected.len(), 2);
        // Null-rejected row first, then the concatenated provisional set
        assert_eq!(outcome.rejected[0].order_number, None);
        assert_eq!(outcome.rejected[1].order_number.as_deref(), Some("bad"));
    }

    #[test]
    fn absent_optional_columns_are_skipped_during_coercion() {
        let mut row = raw_record(Some("10107"), Some("2871.0"), Some("24/02/2018"));
        row.quantity_ordered = None;
        row.price_each = None;

        let outcome = validate_sales_data(vec![row]);
        assert_eq!(outcome.valid.len(), 1);
        assert_eq!(outcome.valid[0].quantity_ordered, None);
        assert_eq!(outcome.valid[0].price_each, None);
    }

    #[test]
    fn order_date_is_parsed_day_first() {
        let rows = vec![raw_record(Some("10107"), Some("2871.0"), Some("03/04/2020"))];
        let outcome = validate_sales_data(rows);
        assert_eq!(
            outcome.valid[0].order_date,
            NaiveDate::from_ymd_opt(2020, 4, 3).unwrap()
        );
    }

    #[test]
    fn iso_order_dates_are_accepted() {
        let rows = vec![raw_record(Some("10107"), Some("2871.0"), Some("2020-01-01"))];
        let outcome = validate_sales_data(rows);
        assert_eq!(
            outcome.valid[0].order_date,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
    }

    #[test]
    fn unparseable_date_rejects_the_batch() {
        let rows = vec![raw_record(Some("10107"), Some("2871.0"), Some("not-a-date"))];
        let outcome = validate_sales_data(rows);
        assert!(outcome.valid.is_empty());
        assert_eq!(outcome.rejected.len(), 1);
    }
}
