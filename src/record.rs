//! Product records extracted from item pages
//!
//! A `ProductRecord` maps field names to string values and keeps fields in the
//! order they were extracted, so serialized output reads `Name`, `Rating`,
//! `Description` and then the attribute table rows as they appear on the page.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field holding the book title
pub const NAME: &str = "Name";

/// Field holding the star rating, `"1"` through `"5"`
pub const RATING: &str = "Rating";

/// Field holding the product description
pub const DESCRIPTION: &str = "Description";

/// Description used when the page has no description block
pub const NO_DESCRIPTION: &str = "No description available";

/// Fields every complete record carries on the books.toscrape.com template
pub const EXPECTED_FIELDS: [&str; 10] = [
    NAME,
    RATING,
    DESCRIPTION,
    "UPC",
    "Product Type",
    "Price (excl. tax)",
    "Price (incl. tax)",
    "Tax",
    "Availability",
    "Number of reviews",
];

/// Ordered field-name to value mapping for one item
///
/// Serializes as a JSON object whose keys keep extraction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRecord {
    fields: IndexMap<String, String>,
}

impl ProductRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing the value in place if the name already exists
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Returns the value of a field
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// An empty record stands for a failed extraction
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(name, value)` pairs in extraction order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Field names in `EXPECTED_FIELDS` that are missing or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        EXPECTED_FIELDS
            .iter()
            .copied()
            .filter(|field| self.get(field).map_or(true, str::is_empty))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ProductRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// Renders one `Name: value` line per field
impl fmt::Display for ProductRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, value)) in self.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        Ok(())
    }
}
