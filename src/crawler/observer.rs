//! Progress observer interface
//!
//! The pagination walker and the batch coordinator report progress only through
//! a `ScrapeObserver`, so what gets logged (or collected in tests) is decided by
//! the caller. `TracingObserver` is the default.

use crate::crawler::extractor::ExtractError;
use crate::output::ScrapeStatistics;
use crate::HarvestError;
use std::path::Path;
use std::time::Duration;

/// Receives progress checkpoints from a scrape
///
/// Every method has an empty default body. Implementations must be thread-safe;
/// item failures are reported from the aggregation step, not from workers.
pub trait ScrapeObserver: Send + Sync {
    /// A negative page limit was requested; nothing will be fetched
    fn on_invalid_page_limit(&self, _requested: i64) {}

    /// A catalog page was fetched and its item links collected
    fn on_catalog_page(&self, _page_number: u32, _links_found: usize) {}

    /// The walk stopped because the effective page limit was reached
    fn on_page_limit_reached(&self, _limit: u32) {}

    /// The walk stopped at the last page of the catalog
    fn on_last_page_reached(&self, _total: u32) {}

    /// The walk finished successfully
    fn on_discovery_complete(&self, _urls_found: usize, _elapsed: Duration) {}

    /// The walk failed and no URLs will be returned
    fn on_discovery_failed(&self, _url: &str, _error: &HarvestError) {}

    /// An item was dropped from the batch
    fn on_item_dropped(&self, _url: &str, _error: &ExtractError) {}

    /// The result was written to disk
    fn on_output_written(&self, _path: &Path, _bytes: usize) {}

    /// The batch finished
    fn on_batch_complete(&self, _stats: &ScrapeStatistics) {}
}

/// Observer that reports every checkpoint as a `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ScrapeObserver for TracingObserver {
    fn on_invalid_page_limit(&self, requested: i64) {
        tracing::warn!("Negative page count requested: {}", requested);
    }

    fn on_catalog_page(&self, page_number: u32, links_found: usize) {
        tracing::info!(
            "Processed links from catalog page {} ({} items)",
            page_number,
            links_found
        );
    }

    fn on_page_limit_reached(&self, limit: u32) {
        tracing::info!("Reached requested page count: {}", limit);
    }

    fn on_last_page_reached(&self, total: u32) {
        tracing::info!("Reached last catalog page ({})", total);
    }

    fn on_discovery_complete(&self, urls_found: usize, elapsed: Duration) {
        tracing::info!(
            "Link discovery took {:.2}s, {} item URLs found",
            elapsed.as_secs_f64(),
            urls_found
        );
    }

    fn on_discovery_failed(&self, url: &str, error: &HarvestError) {
        tracing::error!("Catalog walk failed at {}: {}", url, error);
    }

    fn on_item_dropped(&self, url: &str, error: &ExtractError) {
        tracing::warn!("Dropped {}: {}", url, error);
    }

    fn on_output_written(&self, path: &Path, bytes: usize) {
        tracing::info!("Wrote {} bytes to {}", bytes, path.display());
    }

    fn on_batch_complete(&self, stats: &ScrapeStatistics) {
        tracing::info!("Scrape finished: {}", stats);
    }
}

/// Observer that ignores every checkpoint
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScrapeObserver for NoopObserver {}
