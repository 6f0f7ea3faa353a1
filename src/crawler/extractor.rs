//! Record extraction for item pages
//!
//! Applies the fixed item-page schema: title heading, star rating class,
//! description block and the product information table. Extraction outcomes are
//! tagged so the reason for a dropped item stays inspectable.

use crate::crawler::fetcher::{fetch_page, FetchResult};
use crate::record::{ProductRecord, DESCRIPTION, NAME, NO_DESCRIPTION, RATING};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Why a single item could not be extracted
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Missing element: {0}")]
    MissingElement(&'static str),

    #[error("Unknown rating class: '{0}'")]
    UnknownRating(String),

    #[error("Malformed attribute table row {0}")]
    MalformedRow(usize),

    #[error("Invalid selector: {0}")]
    InvalidSelector(&'static str),

    #[error("Worker failed: {0}")]
    Worker(String),
}

/// Outcome of extracting one item page
#[derive(Debug)]
pub enum ExtractOutcome {
    /// The page was fetched and every schema step succeeded
    Success(ProductRecord),

    /// The page could not be fetched or did not match the schema
    Failure { url: String, error: ExtractError },
}

impl ExtractOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Flattens the outcome to a record; failures become an empty record
    pub fn into_record(self) -> ProductRecord {
        match self {
            Self::Success(record) => record,
            Self::Failure { .. } => ProductRecord::new(),
        }
    }
}

/// Maps a star-rating class token to its digit
///
/// # Examples
///
/// ```
/// use book_harvester::crawler::rating_from_class;
///
/// assert_eq!(rating_from_class("Three"), Some("3"));
/// assert_eq!(rating_from_class("Zero"), None);
/// ```
pub fn rating_from_class(token: &str) -> Option<&'static str> {
    match token {
        "One" => Some("1"),
        "Two" => Some("2"),
        "Three" => Some("3"),
        "Four" => Some("4"),
        "Five" => Some("5"),
        _ => None,
    }
}

fn selector(css: &'static str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::InvalidSelector(css))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Parses an item page into a product record
///
/// # Schema
///
/// | Field | Source |
/// |-------|--------|
/// | Name | `div.product_main h1`, surrounding whitespace trimmed |
/// | Rating | second class of `p.star-rating`, `One`..`Five` → `1`..`5` |
/// | Description | first element after `div#product_description`, NBSP removed |
/// | table rows | `table.table-striped tr`: `th` is the name, `td` the value |
///
/// A missing description block yields "No description available". Any other
/// missing element fails the whole page.
///
/// # Arguments
///
/// * `html` - The item page markup
///
/// # Returns
///
/// * `Ok(ProductRecord)` - Record with Name, Rating, Description and every table row
/// * `Err(ExtractError)` - The page does not match the item template
pub fn parse_product_page(html: &str) -> Result<ProductRecord, ExtractError> {
    let document = Html::parse_document(html);
    let mut record = ProductRecord::new();

    record.insert(NAME, extract_title(&document)?);
    record.insert(RATING, extract_rating(&document)?);
    record.insert(DESCRIPTION, extract_description(&document)?);

    for (name, value) in extract_attributes(&document)? {
        record.insert(name, value);
    }

    Ok(record)
}

fn extract_title(document: &Html) -> Result<String, ExtractError> {
    let title_selector = selector("div.product_main h1")?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element_text(element).trim().to_string())
        .ok_or(ExtractError::MissingElement("product title"))
}

fn extract_rating(document: &Html) -> Result<&'static str, ExtractError> {
    let rating_selector = selector("p.star-rating")?;

    let element = document
        .select(&rating_selector)
        .next()
        .ok_or(ExtractError::MissingElement("star rating"))?;

    let token = element
        .value()
        .attr("class")
        .and_then(|class| class.split_whitespace().nth(1))
        .ok_or(ExtractError::MissingElement("star rating class"))?;

    rating_from_class(token).ok_or_else(|| ExtractError::UnknownRating(token.to_string()))
}

fn extract_description(document: &Html) -> Result<String, ExtractError> {
    let header_selector = selector("div#product_description")?;

    let description = document
        .select(&header_selector)
        .next()
        .and_then(|header| header.next_siblings().find_map(ElementRef::wrap))
        .map(|sibling| element_text(sibling).replace('\u{a0}', ""));

    Ok(description.unwrap_or_else(|| NO_DESCRIPTION.to_string()))
}

fn extract_attributes(document: &Html) -> Result<Vec<(String, String)>, ExtractError> {
    let table_selector = selector("table.table-striped")?;
    let row_selector = selector("tr")?;
    let name_selector = selector("th")?;
    let value_selector = selector("td")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ExtractError::MissingElement("product information table"))?;

    table
        .select(&row_selector)
        .enumerate()
        .map(|(index, row)| {
            let name = row.select(&name_selector).next();
            let value = row.select(&value_selector).next();

            match (name, value) {
                (Some(name), Some(value)) => Ok((
                    element_text(name).trim().to_string(),
                    element_text(value).trim().to_string(),
                )),
                _ => Err(ExtractError::MalformedRow(index)),
            }
        })
        .collect()
}

/// Fetches one item page and extracts its record
///
/// Never fails outright: fetch and parse problems come back as
/// `ExtractOutcome::Failure` so sibling extractions are unaffected.
pub async fn extract(client: &Client, url: &str) -> ExtractOutcome {
    let body = match fetch_page(client, url).await {
        FetchResult::Success { body } => body,
        failed => {
            return ExtractOutcome::Failure {
                url: url.to_string(),
                error: ExtractError::Fetch(failed.failure_reason().unwrap_or_default()),
            }
        }
    };

    match parse_product_page(&body) {
        Ok(record) => ExtractOutcome::Success(record),
        Err(error) => ExtractOutcome::Failure {
            url: url.to_string(),
            error,
        },
    }
}

/// Fetches one item page and returns its record, or an empty record on failure
pub async fn extract_record(client: &Client, url: &str) -> ProductRecord {
    extract(client, url).await.into_record()
}
