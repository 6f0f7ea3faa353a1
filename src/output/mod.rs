//! Output module for serializing and persisting scrape results
//!
//! This module handles:
//! - Serializing records to indented JSON and parsing them back
//! - Plain-text record dumps
//! - Writing the chosen representation to the output file
//! - Run statistics reported at the end of a scrape

mod json;
pub mod stats;
mod text;
mod writer;

pub use json::{parse_records, to_json};
pub use stats::ScrapeStatistics;
pub use text::to_text_dump;
pub use writer::{default_output_path, write_output, ARTIFACTS_DIR, OUTPUT_FILE_NAME};

use crate::config::OutputFormat;
use crate::record::ProductRecord;

/// Renders records in the requested format
///
/// # Returns
///
/// * `Ok(String)` - The serialized records
/// * `Err(serde_json::Error)` - JSON serialization failed
pub fn render(records: &[ProductRecord], format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => to_json(records),
        OutputFormat::Text => Ok(to_text_dump(records)),
    }
}
