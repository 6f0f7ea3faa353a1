use crate::record::ProductRecord;

/// Renders records as plain text, each followed by a blank line
///
/// Every record is printed as `Name: value` lines in extraction order.
pub fn to_text_dump(records: &[ProductRecord]) -> String {
    let mut text = String::new();

    for record in records {
        text.push_str(&record.to_string());
        text.push_str("\n\n");
    }

    text
}
