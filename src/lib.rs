//! Book-Harvester: a catalog-to-records scraper
//!
//! This crate walks a paginated book catalog, collects the item page links on
//! every catalog page, and extracts a fixed set of product fields from each item
//! page using a bounded pool of concurrent workers.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Book-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("No page number in URL path: {0}")]
    NoPageNumber(String),
}

/// Result type alias for Book-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    discover_item_urls, extract_record, scrape_books, scrape_books_with_observer, ScrapeOptions,
    ScrapeOutput,
};
pub use record::ProductRecord;
pub use state::CatalogPageState;
