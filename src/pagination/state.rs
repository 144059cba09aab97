//! Pagination state implementation
//!
//! Owns the accumulated item list, the page counters and the in-flight/error
//! flags, and advances pagination one page at a time.

use super::types::{LoadOutcome, PageFetcher, PaginationSnapshot, PaginationView, SkipReason};
use crate::error::Error;
use crate::notify::{ChangeNotifier, SubscriptionId};
use crate::types::PageNumber;
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// Page counter value after construction or reset
pub const DEFAULT_INITIAL_PAGE: PageNumber = 1;

/// Total page count after construction or reset
pub const DEFAULT_TOTAL_PAGES: PageNumber = 1;

#[derive(Debug)]
struct Inner<T> {
    items: Vec<T>,
    current_page: PageNumber,
    total_pages: PageNumber,
    is_loading: bool,
    error: Option<String>,
    /// Bumped by every reset; fetches started under an older generation are discarded
    generation: u64,
}

impl<T> Default for Inner<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: DEFAULT_INITIAL_PAGE,
            total_pages: DEFAULT_TOTAL_PAGES,
            is_loading: false,
            error: None,
            generation: 0,
        }
    }
}

/// Incremental pagination state for one list
///
/// Cloning yields another handle to the same state, so a view and a spawned
/// task can drive one list. At most one fetch is in flight per state: the
/// loading flag is checked and set under a single lock acquisition.
///
/// Every mutating operation publishes a change notification to subscribers,
/// synchronously and after the internal lock is released.
///
/// A `reset()` issued while a fetch is in flight fences that fetch off: its
/// eventual result is discarded without touching the state.
pub struct PaginationState<T> {
    inner: Arc<Mutex<Inner<T>>>,
    notifier: Arc<ChangeNotifier>,
}

impl<T> PaginationState<T> {
    /// Create an empty state: no items, page 1 of 1, idle, no error
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            notifier: Arc::new(ChangeNotifier::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to change notifications
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener)
    }

    /// Remove a change observer
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Set the upper bound on valid page numbers.
    ///
    /// Always notifies, even when the value is unchanged. A value below the
    /// current page is accepted and marks pagination as exhausted.
    pub fn set_total_pages(&self, total_pages: PageNumber) {
        self.lock().total_pages = total_pages;
        self.notifier.notify();
    }

    /// Set the next page to request.
    ///
    /// Meant to be called before the first fetch; calling it later makes the
    /// page counter jump.
    pub fn set_initial_page(&self, page: PageNumber) {
        self.lock().current_page = page;
        self.notifier.notify();
    }

    /// Restore construction-time defaults, including page 1 of 1.
    ///
    /// Callers must reapply their initial page and total pages afterwards.
    pub fn reset(&self) {
        {
            let mut inner = self.lock();
            let generation = inner.generation.wrapping_add(1);
            if inner.is_loading {
                debug!("Reset while a fetch is in flight, its result will be discarded");
            }
            *inner = Inner {
                generation,
                ..Inner::default()
            };
        }
        self.notifier.notify();
    }

    /// Next page that will be requested
    pub fn current_page(&self) -> PageNumber {
        self.lock().current_page
    }

    /// Upper bound on valid page numbers
    pub fn total_pages(&self) -> PageNumber {
        self.lock().total_pages
    }

    /// Is a fetch in flight?
    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    /// Description of the most recent fetch failure
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Check if another page may be requested
    pub fn has_more_pages(&self) -> bool {
        let inner = self.lock();
        inner.current_page <= inner.total_pages
    }

    /// Number of loaded items
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Check if no items are loaded
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Borrow the loaded items without cloning them
    ///
    /// The state is locked for the duration of `f`; do not call back into
    /// this state from inside it.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.lock().items)
    }

    /// Read every observable field consistently
    ///
    /// The state is locked for the duration of `f`; do not call back into
    /// this state from inside it.
    pub fn with_view<R>(&self, f: impl FnOnce(PaginationView<'_, T>) -> R) -> R {
        let inner = self.lock();
        f(PaginationView {
            items: &inner.items,
            current_page: inner.current_page,
            total_pages: inner.total_pages,
            is_loading: inner.is_loading,
            error: inner.error.as_deref(),
        })
    }
}

impl<T: Clone> PaginationState<T> {
    /// Copy of the loaded items
    pub fn items(&self) -> Vec<T> {
        self.lock().items.clone()
    }

    /// Copy of every observable field
    pub fn snapshot(&self) -> PaginationSnapshot<T> {
        let inner = self.lock();
        PaginationSnapshot {
            items: inner.items.clone(),
            current_page: inner.current_page,
            total_pages: inner.total_pages,
            is_loading: inner.is_loading,
            error: inner.error.clone(),
        }
    }
}

impl<T: Send + 'static> PaginationState<T> {
    /// Fetch the current page and append it.
    ///
    /// Does nothing (no fetch, no notification) while another fetch is in
    /// flight or once `current_page > total_pages`. Otherwise marks the state
    /// as loading, clears the error, notifies, and calls the fetcher once.
    /// On success the items are appended and the page advances by one; on
    /// failure the error description is recorded and the page stays put so
    /// the next call retries it. Either way loading ends and a final
    /// notification is published.
    ///
    /// Fetch errors and panics never escape this method.
    pub async fn load_next_page<F>(&self, fetcher: &F) -> LoadOutcome
    where
        F: PageFetcher<T> + ?Sized,
    {
        self.run_load(fetcher, None).await
    }

    /// Same as [`load_next_page`](Self::load_next_page), failing the fetch
    /// if it does not settle within `timeout`.
    pub async fn load_next_page_with_timeout<F>(&self, fetcher: &F, timeout: Duration) -> LoadOutcome
    where
        F: PageFetcher<T> + ?Sized,
    {
        self.run_load(fetcher, Some(timeout)).await
    }

    async fn run_load<F>(&self, fetcher: &F, timeout: Option<Duration>) -> LoadOutcome
    where
        F: PageFetcher<T> + ?Sized,
    {
        let (page, generation) = {
            let mut inner = self.lock();
            if inner.is_loading {
                debug!(page = inner.current_page, "Fetch already in flight, skipping");
                return LoadOutcome::Skipped(SkipReason::AlreadyLoading);
            }
            if inner.current_page > inner.total_pages {
                debug!(
                    current_page = inner.current_page,
                    total_pages = inner.total_pages,
                    "No more pages, skipping"
                );
                return LoadOutcome::Skipped(SkipReason::Exhausted);
            }
            inner.is_loading = true;
            inner.error = None;
            (inner.current_page, inner.generation)
        };

        let mut in_flight = InFlight {
            state: self,
            generation,
            settled: false,
        };
        self.notifier.notify();

        debug!(page, "Fetching page");
        let result = fetch_guarded(fetcher, page, timeout).await;
        in_flight.settled = true;

        let outcome = {
            let mut inner = self.lock();
            if inner.generation != generation {
                debug!(page, "State was reset during fetch, discarding result");
                return LoadOutcome::Discarded { page };
            }

            inner.is_loading = false;
            match result {
                Ok(items) => {
                    let count = items.len();
                    inner.items.extend(items);
                    inner.current_page = inner.current_page.saturating_add(1);
                    debug!(page, count, "Page loaded");
                    LoadOutcome::Loaded { page, count }
                }
                Err(error) => {
                    warn!(page, %error, "Page fetch failed");
                    inner.error = Some(error.clone());
                    LoadOutcome::Failed { page, error }
                }
            }
        };

        self.notifier.notify();
        outcome
    }
}

/// Run the fetch, turning errors, panics and timeouts into a description
async fn fetch_guarded<T, F>(
    fetcher: &F,
    page: PageNumber,
    timeout: Option<Duration>,
) -> std::result::Result<Vec<T>, String>
where
    T: Send,
    F: PageFetcher<T> + ?Sized,
{
    let fetch = AssertUnwindSafe(fetcher.fetch_page(page)).catch_unwind();

    let caught = match timeout {
        Some(limit) => match tokio::time::timeout(limit, fetch).await {
            Ok(caught) => caught,
            Err(_) => {
                return Err(Error::Timeout {
                    timeout_ms: limit.as_millis() as u64,
                }
                .to_string())
            }
        },
        None => fetch.await,
    };

    match caught {
        Ok(Ok(items)) => Ok(items),
        Ok(Err(error)) => Err(error.to_string()),
        Err(panic) => Err(panic_message(panic.as_ref())),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("fetch panicked: {message}")
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("fetch panicked: {message}")
    } else {
        "fetch panicked".to_string()
    }
}

/// Clears the loading flag if a load future is dropped before its fetch settles
struct InFlight<'a, T> {
    state: &'a PaginationState<T>,
    generation: u64,
    settled: bool,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let cleared = {
            let mut inner = self.state.lock();
            if inner.generation == self.generation && inner.is_loading {
                inner.is_loading = false;
                true
            } else {
                false
            }
        };
        if cleared {
            warn!("Load cancelled before the fetch settled");
            self.state.notifier.notify();
        }
    }
}

impl<T> Default for PaginationState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PaginationState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<T> fmt::Debug for PaginationState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("PaginationState")
            .field("items", &inner.items.len())
            .field("current_page", &inner.current_page)
            .field("total_pages", &inner.total_pages)
            .field("is_loading", &inner.is_loading)
            .field("error", &inner.error)
            .finish_non_exhaustive()
    }
}
