//! Pagination walker
//!
//! Walks catalog pages one after another and collects the item links of each.
//! The walk is strictly sequential: the next page URL is derived from the page
//! number read off the current page.

use crate::crawler::fetcher::{fetch_page, FetchResult};
use crate::crawler::observer::{ScrapeObserver, TracingObserver};
use crate::state::{CatalogPageState, PageIndicator, StepOutcome};
use crate::url::{next_page_url, parse_catalog_url, resolve_item_url};
use crate::HarvestError;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Instant;

/// Information extracted from one catalog page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    /// The "Page N of M" indicator
    pub indicator: PageIndicator,

    /// Non-empty hrefs of every titled anchor, in document order
    pub item_hrefs: Vec<String>,
}

/// Parses a catalog page
///
/// Reads the pager's `li.current` element and the `href` of every `<a>` that
/// carries a `title` attribute. Anchors with an empty href are skipped.
///
/// # Arguments
///
/// * `html` - The catalog page markup
///
/// # Returns
///
/// * `Ok(CatalogPage)` - Indicator and item hrefs
/// * `Err(String)` - The page has no readable page indicator
pub fn parse_catalog_page(html: &str) -> Result<CatalogPage, String> {
    let document = Html::parse_document(html);

    let indicator_selector =
        Selector::parse("li.current").map_err(|e| format!("Invalid selector: {:?}", e))?;
    let anchor_selector =
        Selector::parse("a[title]").map_err(|e| format!("Invalid selector: {:?}", e))?;

    let indicator_text = document
        .select(&indicator_selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .ok_or_else(|| "Missing page indicator".to_string())?;

    let indicator = PageIndicator::parse(&indicator_text)
        .ok_or_else(|| format!("Unreadable page indicator: '{}'", indicator_text.trim()))?;

    let item_hrefs = document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect();

    Ok(CatalogPage {
        indicator,
        item_hrefs,
    })
}

/// Discovers the item URLs of a catalog, logging progress through `tracing`
///
/// See [`discover_item_urls_with_observer`].
pub async fn discover_item_urls(
    client: &Client,
    catalog_url: &str,
    max_pages: i64,
) -> Result<Vec<String>, HarvestError> {
    discover_item_urls_with_observer(client, catalog_url, max_pages, &TracingObserver).await
}

/// Discovers the item URLs of a catalog
///
/// # Walk
///
/// 1. A negative `max_pages` returns an empty list without any request
/// 2. Fetch the current page; any fetch failure aborts the walk
/// 3. Read the page indicator; the first page fixes the catalog's total and
///    the effective limit (`max_pages`, or the total when `max_pages` is 0,
///    clamped to the total)
/// 4. Append `base_path/href` for every titled anchor
/// 5. Stop when the limit or the last catalog page is reached, otherwise
///    derive the next page URL and repeat
///
/// URLs are returned in page order, then anchor order, without deduplication.
///
/// # Arguments
///
/// * `client` - The HTTP client for this walk
/// * `catalog_url` - URL of the first catalog page
/// * `max_pages` - Pages to walk: 0 for all, negative for none
/// * `observer` - Receives progress checkpoints
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Absolute item URLs in discovery order
/// * `Err(HarvestError)` - A catalog page could not be fetched or read
pub async fn discover_item_urls_with_observer(
    client: &Client,
    catalog_url: &str,
    max_pages: i64,
    observer: &dyn ScrapeObserver,
) -> Result<Vec<String>, HarvestError> {
    if max_pages < 0 {
        observer.on_invalid_page_limit(max_pages);
        return Ok(Vec::new());
    }

    let start_time = Instant::now();
    let mut page_url = catalog_url.to_string();

    let result = walk(client, &mut page_url, max_pages, observer).await;

    match result {
        Ok(urls) => {
            observer.on_discovery_complete(urls.len(), start_time.elapsed());
            Ok(urls)
        }
        Err(e) => {
            observer.on_discovery_failed(&page_url, &e);
            Err(e)
        }
    }
}

async fn walk(
    client: &Client,
    page_url: &mut String,
    max_pages: i64,
    observer: &dyn ScrapeObserver,
) -> Result<Vec<String>, HarvestError> {
    parse_catalog_url(page_url)?;

    let requested_pages = u32::try_from(max_pages).unwrap_or(u32::MAX);
    let mut state = CatalogPageState::new(page_url, requested_pages);
    let mut urls = Vec::new();

    loop {
        let body = match fetch_page(client, page_url).await {
            FetchResult::Success { body } => body,
            failed => {
                return Err(HarvestError::Fetch {
                    url: page_url.clone(),
                    message: failed.failure_reason().unwrap_or_default(),
                })
            }
        };

        let page = parse_catalog_page(&body).map_err(|message| HarvestError::HtmlParse {
            url: page_url.clone(),
            message,
        })?;

        let links_found = page.item_hrefs.len();
        urls.extend(
            page.item_hrefs
                .iter()
                .map(|href| resolve_item_url(state.base_path(), href)),
        );

        let outcome = state.record_page(page.indicator);
        observer.on_catalog_page(state.current_page(), links_found);

        match outcome {
            StepOutcome::Continue { next_page } => {
                *page_url = next_page_url(page_url, next_page)?;
                tracing::debug!("Next catalog page: {}", page_url);
            }
            StepOutcome::LimitReached { limit } => {
                observer.on_page_limit_reached(limit);
                break;
            }
            StepOutcome::LastPageReached { total } => {
                observer.on_last_page_reached(total);
                break;
            }
        }
    }

    Ok(urls)
}
