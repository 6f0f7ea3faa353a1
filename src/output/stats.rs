//! Run statistics for a finished scrape
//!
//! Counts are reported through the observer, never returned with the records.

use std::fmt;
use std::time::Duration;

/// Summary of one scrape invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeStatistics {
    /// Item URLs found by the pagination walk
    pub discovered: usize,

    /// Items that produced a record
    pub extracted: usize,

    /// Items dropped because their fetch or parse failed
    pub dropped: usize,

    /// Wall-clock time of the whole invocation
    pub elapsed: Duration,
}

impl ScrapeStatistics {
    /// Items processed per second (extracted and dropped alike)
    pub fn throughput(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds <= 0.0 {
            return 0.0;
        }
        self.processed() as f64 / seconds
    }

    /// Items that went through extraction
    pub fn processed(&self) -> usize {
        self.extracted + self.dropped
    }

    /// Share of processed items that produced a record, as a percentage
    pub fn success_rate(&self) -> f64 {
        let processed = self.processed();
        if processed == 0 {
            return 0.0;
        }
        (self.extracted as f64 / processed as f64) * 100.0
    }
}

impl fmt::Display for ScrapeStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} extracted, {} dropped of {} discovered in {:.2}s ({:.2} items/sec)",
            self.extracted,
            self.dropped,
            self.discovered,
            self.elapsed.as_secs_f64(),
            self.throughput()
        )
    }
}
