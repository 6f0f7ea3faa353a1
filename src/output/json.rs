//! JSON representation of scrape results
//!
//! Records serialize as objects whose keys keep extraction order. Non-ASCII
//! text such as `£` is written as-is.

use crate::record::ProductRecord;

/// Serializes records as an indented JSON array
///
/// # Example
///
/// ```
/// use book_harvester::output::to_json;
/// use book_harvester::ProductRecord;
///
/// let record: ProductRecord = [("Name", "Olio"), ("Tax", "£0.00")].into_iter().collect();
/// let json = to_json(&[record]).unwrap();
/// assert!(json.contains("\"Tax\": \"£0.00\""));
/// ```
pub fn to_json(records: &[ProductRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Parses the output of [`to_json`] back into records
pub fn parse_records(json: &str) -> Result<Vec<ProductRecord>, serde_json::Error> {
    serde_json::from_str(json)
}
