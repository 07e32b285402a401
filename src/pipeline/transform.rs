use chrono::{Datelike, Local, NaiveDateTime, Utc};
use tracing::info;

use crate::domain::{RevenueBucket, TransformedSalesRecord, ValidSalesRecord};

/// Generates the batch identifier for one pipeline run, second precision UTC.
pub fn generate_batch_id() -> String {
    format!("SALES_{}", Utc::now().format("%Y%m%d_%H%M%S"))
}

/// Applies business transformations to the validated rows.
///
/// Text columns are normalized, calendar and revenue-bucket fields derived,
/// and every row stamped with the same batch id, load timestamp, and source
/// file name. Row count and order are preserved; the input is assumed
/// already validated and is not re-checked.
pub fn transform_sales_data(
    records: Vec<ValidSalesRecord>,
    source_file_name: &str,
) -> Vec<TransformedSalesRecord> {
    info!("[TRANSFORM] Starting business transformations");

    let batch_id = generate_batch_id();
    let load_timestamp: NaiveDateTime = Local::now().naive_local();

    let transformed: Vec<TransformedSalesRecord> = records
        .into_iter()
        .map(|record| TransformedSalesRecord {
            order_number: record.order_number,
            quantity_ordered: record.quantity_ordered,
            price_each: record.price_each,
            order_line_number: record.order_line_number,
            sales: record.sales,
            order_date: record.order_date,
            days_since_last_order: record.days_since_last_order,
            status: record.status.as_deref().map(upper_trim),
            product_line: record.product_line,
            msrp: record.msrp,
            product_code: record.product_code,
            customer_name: record.customer_name,
            phone: record.phone,
            address_line1: record.address_line1,
            city: record.city.as_deref().map(title_trim),
            postal_code: record.postal_code,
            country: record.country.as_deref().map(upper_trim),
            contact_last_name: record.contact_last_name,
            contact_first_name: record.contact_first_name,
            deal_size: record.deal_size.as_deref().map(upper_trim),
            order_year: record.order_date.year(),
            order_month: record.order_date.month(),
            revenue_bucket: RevenueBucket::from_sales(record.sales),
            batch_id: batch_id.clone(),
            load_timestamp,
            source_file_name: source_file_name.to_string(),
        })
        .collect();

    info!(
        batch_id = %batch_id,
        rows = transformed.len(),
        "[TRANSFORM] Transformation completed"
    );

    transformed
}

fn upper_trim(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Title-cases each whitespace-separated word and trims the result, so
/// "new york " becomes "New York".
fn title_trim(value: &str) -> String {
    value
        .trim()
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn valid_record(sales: f64) -> ValidSalesRecord {
        ValidSalesRecord {
            order_number: 10107,
            quantity_ordered: Some(30),
            price_each: Some(95.70),
            order_line_number: Some("2".to_string()),
            sales,
            order_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            days_since_last_order: None,
            status: Some("shipped".to_string()),
            product_line: None,
            msrp: None,
            product_code: "S10_1678".to_string(),
            customer_name: "Land of Toys Inc.".to_string(),
            phone: None,
            address_line1: None,
            city: Some("new york".to_string()),
            postal_code: None,
            country: Some("us".to_string()),
            contact_last_name: None,
            contact_first_name: None,
            deal_size: Some("small".to_string()),
        }
    }

    #[test]
    fn normalizes_text_and_derives_calendar_fields() {
        let transformed = transform_sales_data(vec![valid_record(1000.0)], "auto_sales_data.csv");
        assert_eq!(transformed.len(), 1);
        let record = &transformed[0];
        assert_eq!(record.country.as_deref(), Some("US"));
        assert_eq!(record.city.as_deref(), Some("New York"));
        assert_eq!(record.deal_size.as_deref(), Some("SMALL"));
        assert_eq!(record.status.as_deref(), Some("SHIPPED"));
        assert_eq!(record.order_year, 2020);
        assert_eq!(record.order_month, 1);
        assert_eq!(record.revenue_bucket, RevenueBucket::Low);
        assert_eq!(record.source_file_name, "auto_sales_data.csv");
    }

    #[test]
    fn revenue_bucket_boundaries() {
        assert_eq!(RevenueBucket::from_sales(2999.99), RevenueBucket::Low);
        assert_eq!(RevenueBucket::from_sales(3000.0), RevenueBucket::Medium);
        assert_eq!(RevenueBucket::from_sales(5999.99), RevenueBucket::Medium);
        assert_eq!(RevenueBucket::from_sales(6000.0), RevenueBucket::High);
    }

    #[test]
    fn row_count_is_preserved() {
        let records = vec![valid_record(100.0), valid_record(4000.0), valid_record(9000.0)];
        let transformed = transform_sales_data(records, "auto_sales_data.csv");
        assert_eq!(transformed.len(), 3);
        assert_eq!(transformed[0].revenue_bucket, RevenueBucket::Low);
        assert_eq!(transformed[1].revenue_bucket, RevenueBucket::Medium);
        assert_eq!(transformed[2].revenue_bucket, RevenueBucket::High);
    }

    #[test]
    fn batch_metadata_is_shared_across_rows() {
        let records = vec![valid_record(100.0), valid_record(4000.0)];
        let transformed = transform_sales_data(records, "auto_sales_data.csv");
        assert_eq!(transformed[0].batch_id, transformed[1].batch_id);
        assert_eq!(transformed[0].load_timestamp, transformed[1].load_timestamp);
    }

    #[test]
    fn batch_id_has_the_expected_shape() {
        let batch_id = generate_batch_id();
        assert!(batch_id.starts_with("SALES_"));
        // SALES_YYYYMMDD_HHMMSS
        assert_eq!(batch_id.len(), "SALES_".len() + 15);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let transformed = transform_sales_data(Vec::new(), "auto_sales_data.csv");
        assert!(transformed.is_empty());
    }

    #[test]
    fn null_text_columns_stay_null() {
        let mut record = valid_record(1000.0);
        record.country = None;
        record.city = None;
        let transformed = transform_sales_data(vec![record], "auto_sales_data.csv");
        assert_eq!(transformed[0].country, None);
        assert_eq!(transformed[0].city, None);
    }
}
