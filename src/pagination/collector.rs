//! Paginated collection over the cursor table
//!
//! Drives a `PageSource` page by page, merging identifiers into a
//! deduplicated set until the listing runs dry, repeats itself, or the
//! cursor table is exhausted.

use super::cursor::{PageCursor, MAX_PAGES};
use crate::error::{Error, Result};
use crate::types::ResultSet;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// One fetched page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    /// HTTP status of the page response
    pub status: u16,
    /// Identifiers listed on the page
    pub items: Vec<String>,
}

impl Page {
    /// Create a page
    pub fn new(status: u16, items: Vec<String>) -> Self {
        Self { status, items }
    }
}

/// Source of listing pages addressed by cursor
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page for `cursor` of the listing identified by `query`
    async fn fetch_page(&self, query: &str, cursor: &PageCursor) -> Result<Page>;
}

/// Why collection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page listed no items
    EmptyPage,
    /// Every item on a page was already collected
    RedundantPage,
    /// All cursor table entries were used
    CursorExhausted,
}

/// Effect of merging one page into the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// The page had no items
    Empty,
    /// Every item was already present; the set was left untouched
    Redundant,
    /// New items were added
    Added(usize),
}

/// Merge a page's items into `results`
///
/// A page whose items are all already known does not modify the set.
pub fn merge_page(results: &mut ResultSet, items: &[String]) -> Merge {
    if items.is_empty() {
        return Merge::Empty;
    }

    if items.iter().all(|item| results.contains(item)) {
        return Merge::Redundant;
    }

    let before = results.len();
    results.extend(items.iter().cloned());
    Merge::Added(results.len() - before)
}

/// Outcome of a collection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Deduplicated identifiers
    pub results: ResultSet,
    /// Number of page requests made
    pub pages_fetched: usize,
    /// Index of the page that ended collection
    pub stopped_at: usize,
    /// Why collection ended
    pub stop: StopReason,
}

/// Collects identifiers from a cursor-paginated listing
pub struct PaginatedCollector<S> {
    source: S,
}

impl<S: PageSource> PaginatedCollector<S> {
    /// Create a collector over a page source
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Get the page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Walk the listing for `base_query`
    ///
    /// A 429 on any page aborts with `UpstreamThrottle` and discards what was
    /// gathered so far.
    pub async fn collect(&self, base_query: &str) -> Result<Collection> {
        let mut results = ResultSet::new();
        let mut pages_fetched = 0;
        let mut index = 0;

        loop {
            let Some(cursor) = PageCursor::for_index(index) else {
                warn!(
                    "Cursor table exhausted after {} pages for '{}', stopping",
                    MAX_PAGES, base_query
                );
                return Ok(Collection {
                    results,
                    pages_fetched,
                    stopped_at: index,
                    stop: StopReason::CursorExhausted,
                });
            };

            let page = self.source.fetch_page(base_query, &cursor).await?;
            pages_fetched += 1;

            if page.status == 429 {
                return Err(Error::UpstreamThrottle);
            }

            if page.status >= 400 && !page.items.is_empty() {
                warn!(
                    "Page {} returned status {} with {} items, keeping them",
                    index,
                    page.status,
                    page.items.len()
                );
            }

            let stop = match merge_page(&mut results, &page.items) {
                Merge::Added(added) => {
                    debug!("Page {} ({}) added {} identifiers", index, cursor, added);
                    index += 1;
                    continue;
                }
                Merge::Empty => StopReason::EmptyPage,
                Merge::Redundant => StopReason::RedundantPage,
            };

            info!(
                "Collected {} identifiers from {} pages ({:?})",
                results.len(),
                pages_fetched,
                stop
            );
            return Ok(Collection {
                results,
                pages_fetched,
                stopped_at: index,
                stop,
            });
        }
    }
}
