//! Pagination types and traits
//!
//! Defines the fetch abstraction the pagination state drives, plus the
//! read-only views of that state handed to callers.

use crate::error::Result;
use crate::types::PageNumber;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;

/// Source of pages for a paginated list
///
/// Given page `p`, returns the items belonging to page `p`. The number of
/// items is not checked against any expected page size.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch a single page
    async fn fetch_page(&self, page: PageNumber) -> Result<Vec<T>>;
}

/// [`PageFetcher`] backed by an async closure
///
/// Created with [`fetcher_fn`].
#[derive(Clone)]
pub struct FnFetcher<F> {
    f: F,
}

/// Wrap an async closure `|page| async move { ... }` as a [`PageFetcher`]
pub fn fetcher_fn<T, F, Fut>(f: F) -> FnFetcher<F>
where
    T: Send + 'static,
    F: Fn(PageNumber) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    FnFetcher { f }
}

#[async_trait]
impl<T, F, Fut> PageFetcher<T> for FnFetcher<F>
where
    T: Send + 'static,
    F: Fn(PageNumber) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    async fn fetch_page(&self, page: PageNumber) -> Result<Vec<T>> {
        (self.f)(page).await
    }
}

impl<F> fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}

/// Point-in-time copy of a pagination state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSnapshot<T> {
    /// Loaded items, in fetch-arrival order
    pub items: Vec<T>,
    /// Next page to request
    pub current_page: PageNumber,
    /// Upper bound on valid page numbers
    pub total_pages: PageNumber,
    /// Is a fetch in flight?
    pub is_loading: bool,
    /// Description of the most recent fetch failure
    pub error: Option<String>,
}

impl<T> PaginationSnapshot<T> {
    /// Check if another page may be requested
    pub fn has_more_pages(&self) -> bool {
        self.current_page <= self.total_pages
    }

    /// Check if no items are loaded
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Borrowed view of every observable field, read under a single lock
#[derive(Debug)]
pub struct PaginationView<'a, T> {
    /// Loaded items, in fetch-arrival order
    pub items: &'a [T],
    /// Next page to request
    pub current_page: PageNumber,
    /// Upper bound on valid page numbers
    pub total_pages: PageNumber,
    /// Is a fetch in flight?
    pub is_loading: bool,
    /// Description of the most recent fetch failure
    pub error: Option<&'a str>,
}

/// Why a load request was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another fetch is in flight
    AlreadyLoading,
    /// `current_page` is past `total_pages`
    Exhausted,
}

/// Result of a single `load_next_page` invocation
///
/// Purely informational: the same facts are observable through the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page fetched and appended
    Loaded {
        /// Page that was fetched
        page: PageNumber,
        /// Number of items appended
        count: usize,
    },
    /// Fetch failed, page left unchanged for retry
    Failed {
        /// Page that failed
        page: PageNumber,
        /// Recorded error description
        error: String,
    },
    /// Precondition not met, nothing happened
    Skipped(SkipReason),
    /// The state was reset while the fetch was in flight; its result was dropped
    Discarded {
        /// Page whose result was dropped
        page: PageNumber,
    },
}

impl LoadOutcome {
    /// Check if a page was appended
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Check if the fetch failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Check if the call was a no-op
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}
