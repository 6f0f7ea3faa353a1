//! Crawler module for catalog walking and record extraction
//!
//! This module contains the core scraping logic, including:
//! - Single-attempt HTTP fetching
//! - The sequential pagination walk that discovers item URLs
//! - Item page parsing into product records
//! - Bounded concurrent extraction and batch coordination
//! - The progress observer interface

mod coordinator;
mod extractor;
mod fetcher;
mod observer;
mod pagination;

pub use coordinator::{
    scrape_books, scrape_books_with_observer, Coordinator, ScrapeOptions, ScrapeOutput,
};
pub use extractor::{
    extract, extract_record, parse_product_page, rating_from_class, ExtractError, ExtractOutcome,
};
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use observer::{NoopObserver, ScrapeObserver, TracingObserver};
pub use pagination::{
    discover_item_urls, discover_item_urls_with_observer, parse_catalog_page, CatalogPage,
};
