//! URL handling module for Book-Harvester
//!
//! This module provides catalog URL validation, base-path derivation for item
//! links, and next-page URL derivation for the pagination walk.

mod paging;
mod resolve;

// Re-export main functions
pub use paging::next_page_url;
pub use resolve::{base_path, parse_catalog_url, resolve_item_url};
