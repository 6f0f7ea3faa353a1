//! State module for tracking pagination progress
//!
//! # Components
//!
//! - `CatalogPageState`: current/last page numbers and base path carried between
//!   pagination steps
//! - `PageIndicator`: the parsed "Page N of M" indicator of one catalog page

mod catalog_state;

// Re-export main types
pub use catalog_state::{CatalogPageState, PageIndicator, StepOutcome};
