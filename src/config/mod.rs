//! Configuration module for Book-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to the defaults for the
//! books.toscrape.com catalog.
//!
//! # Example
//!
//! ```no_run
//! use book_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Walking {} with {} workers", config.scraper.catalog_url, config.scraper.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, OutputConfig, OutputFormat, ScraperConfig, UserAgentConfig,
    DEFAULT_CATALOG_URL, DEFAULT_WORKERS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
