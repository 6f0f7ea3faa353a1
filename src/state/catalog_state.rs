//! Pagination state carried between catalog walk steps
//!
//! The total page count is resolved from the first catalog page and never
//! changes afterwards; only the current page number and the processed-page
//! counter advance.
use crate::url::base_path;

/// The "Page N of M" indicator of a single catalog page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageIndicator {
    /// Number of the page the indicator was read from
    pub current: u32,

    /// Total number of pages in the catalog
    pub total: u32,
}

impl PageIndicator {
    /// Parses indicator text such as `"Page 3 of 50"`
    ///
    /// The second whitespace-separated token is the current page and the last
    /// token is the total. Surrounding whitespace and line breaks are ignored.
    ///
    /// Returns None if either number is missing or not a positive integer.
    pub fn parse(text: &str) -> Option<Self> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let current = tokens.get(1)?.parse::<u32>().ok()?;
        let total = tokens.last()?.parse::<u32>().ok()?;

        if current == 0 || total == 0 {
            return None;
        }

        Some(Self { current, total })
    }
}

/// What the walk should do after a catalog page has been processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Fetch the page with this number next
    Continue { next_page: u32 },

    /// The effective page limit has been reached
    LimitReached { limit: u32 },

    /// The last page of the catalog has been processed
    LastPageReached { total: u32 },
}

impl StepOutcome {
    /// Returns true if the walk is over
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Continue { .. })
    }
}

/// State of a pagination walk over one catalog
#[derive(Debug, Clone)]
pub struct CatalogPageState {
    base_path: String,
    requested_pages: u32,
    current_page: u32,
    total_pages: Option<u32>,
    pages_processed: u32,
}

impl CatalogPageState {
    /// Creates the state for a walk starting at `catalog_url`
    ///
    /// # Arguments
    ///
    /// * `catalog_url` - URL of the first catalog page to fetch
    /// * `requested_pages` - Number of pages to walk, 0 meaning all of them
    pub fn new(catalog_url: &str, requested_pages: u32) -> Self {
        Self {
            base_path: base_path(catalog_url).to_string(),
            requested_pages,
            current_page: 1,
            total_pages: None,
            pages_processed: 0,
        }
    }

    /// Records a processed catalog page and decides whether to continue
    ///
    /// On the first call the indicator's total becomes the catalog's fixed page
    /// count. Totals reported by later pages are ignored.
    ///
    /// The limit check runs before the end-of-catalog check, so a walk that
    /// satisfies both reports `LimitReached`.
    pub fn record_page(&mut self, indicator: PageIndicator) -> StepOutcome {
        let total = *self.total_pages.get_or_insert(indicator.total);

        self.current_page = indicator.current.min(total);
        self.pages_processed = self.pages_processed.saturating_add(1);

        let limit = self.page_limit().unwrap_or(total);
        if self.pages_processed >= limit {
            return StepOutcome::LimitReached { limit };
        }

        if self.current_page >= total {
            return StepOutcome::LastPageReached { total };
        }

        StepOutcome::Continue {
            next_page: self.current_page.saturating_add(1),
        }
    }

    /// Effective page limit: the requested count clamped to the catalog size
    ///
    /// None until the first page has been recorded.
    pub fn page_limit(&self) -> Option<u32> {
        self.total_pages.map(|total| {
            if self.requested_pages == 0 {
                total
            } else {
                self.requested_pages.min(total)
            }
        })
    }

    /// Base path used to resolve item hrefs
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Number of the most recently processed page
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Total page count, once known
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Number of catalog pages processed so far
    pub fn pages_processed(&self) -> u32 {
        self.pages_processed
    }
}
