//! Infinite list controller
//!
//! Wires a [`PaginationState`] to its page source and to scroll observations.

use super::types::{select_slot, ItemRenderer, ListSlot, ListView};
use crate::config::ListConfig;
use crate::pagination::{LoadOutcome, PageFetcher, PaginationState, PaginationView};
use crate::scroll::{ScrollPosition, ScrollTriggerPolicy};
use crate::types::PageNumber;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// State plus fetcher, cheap to clone into spawned tasks
struct PageLoader<T> {
    state: PaginationState<T>,
    fetcher: Arc<dyn PageFetcher<T>>,
    timeout: Option<Duration>,
}

impl<T> Clone for PageLoader<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            fetcher: Arc::clone(&self.fetcher),
            timeout: self.timeout,
        }
    }
}

impl<T: Send + 'static> PageLoader<T> {
    async fn load(&self) -> LoadOutcome {
        match self.timeout {
            Some(timeout) => {
                self.state
                    .load_next_page_with_timeout(self.fetcher.as_ref(), timeout)
                    .await
            }
            None => self.state.load_next_page(self.fetcher.as_ref()).await,
        }
    }
}

/// A paginated list driven by scroll observations
///
/// Owned by the single view that drives it.
pub struct InfiniteList<T> {
    loader: PageLoader<T>,
    policy: ScrollTriggerPolicy,
    config: ListConfig,
    total_pages_from_api: Option<PageNumber>,
}

impl<T: Send + 'static> InfiniteList<T> {
    /// Create a list over `fetcher`, applying the configured initial page and total pages
    pub fn new(config: ListConfig, fetcher: impl PageFetcher<T> + 'static) -> Self {
        Self::with_shared_fetcher(config, Arc::new(fetcher))
    }

    /// Create a list over a fetcher shared with other owners
    pub fn with_shared_fetcher(config: ListConfig, fetcher: Arc<dyn PageFetcher<T>>) -> Self {
        let state = PaginationState::new();
        let list = Self {
            loader: PageLoader {
                state,
                fetcher,
                timeout: config.fetch_timeout(),
            },
            policy: ScrollTriggerPolicy::new(config.trigger_distance),
            total_pages_from_api: config.total_pages,
            config,
        };
        list.apply_config();
        list
    }

    fn apply_config(&self) {
        self.loader.state.set_initial_page(self.config.initial_page);
        if let Some(total_pages) = self.total_pages_from_api {
            self.loader.state.set_total_pages(total_pages);
        }
    }

    /// Schedule the initial load.
    ///
    /// The load runs on a spawned task after yielding once, so whatever the
    /// caller renders right after attaching shows the pre-fetch state.
    /// Must be called from within a tokio runtime.
    pub fn attach(&self) -> JoinHandle<LoadOutcome> {
        let loader = self.loader.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            debug!("Running initial load");
            loader.load().await
        })
    }

    /// Handle a scroll observation, loading the next page when near the bottom.
    ///
    /// Returns `None` when the observation does not trigger a load.
    pub async fn on_scroll(&self, position: ScrollPosition) -> Option<LoadOutcome> {
        let state = &self.loader.state;
        if !self
            .policy
            .should_trigger(position, state.has_more_pages(), state.is_loading())
        {
            return None;
        }
        debug!(
            current_offset = position.current_offset,
            max_offset = position.max_offset,
            "Scroll near bottom, loading next page"
        );
        Some(self.loader.load().await)
    }

    /// Request the next page explicitly (e.g. a retry button)
    pub async fn load_more(&self) -> LoadOutcome {
        self.loader.load().await
    }

    /// Feed the latest total page count reported by the API.
    ///
    /// Updates the state only when the value differs from the last one
    /// supplied; never triggers a load by itself. Returns whether the state
    /// was updated.
    pub fn update_total_pages(&mut self, total_pages: Option<PageNumber>) -> bool {
        if total_pages == self.total_pages_from_api {
            return false;
        }
        self.total_pages_from_api = total_pages;
        match total_pages {
            Some(total_pages) => {
                debug!(total_pages, "Total pages changed");
                self.loader.state.set_total_pages(total_pages);
                true
            }
            None => false,
        }
    }

    /// Reset, reapply the configured initial page and known total pages, and load again
    pub async fn refresh(&self) -> LoadOutcome {
        self.loader.state.reset();
        self.apply_config();
        self.loader.load().await
    }
}

impl<T> InfiniteList<T> {
    /// The underlying pagination state
    pub fn state(&self) -> &PaginationState<T> {
        &self.loader.state
    }

    /// Construction-time configuration
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Scroll trigger policy in use
    pub fn policy(&self) -> &ScrollTriggerPolicy {
        &self.policy
    }

    /// Which presentation the list should show right now
    pub fn slot(&self) -> ListSlot {
        self.loader
            .state
            .with_view(|view| self.slot_for(&view))
    }

    fn slot_for(&self, view: &PaginationView<'_, T>) -> ListSlot {
        select_slot(
            view.items.len(),
            view.is_loading,
            view.error,
            &self.config.placeholders,
        )
    }

    /// Render the list, invoking `renderer` once per loaded item in order.
    ///
    /// The slot and the rows come from the same state; the state is locked
    /// while `renderer` runs.
    pub fn render<R>(&self, renderer: &R) -> ListView<R::Output>
    where
        R: ItemRenderer<T>,
    {
        let placeholders = &self.config.placeholders;
        self.loader.state.with_view(|view| match self.slot_for(&view) {
            ListSlot::Loading => ListView::Loading {
                placeholder: placeholders.loading.clone(),
            },
            ListSlot::Error(message) => ListView::Error {
                message,
                placeholder: placeholders.error.clone(),
            },
            ListSlot::Empty => ListView::Empty {
                placeholder: placeholders.empty.clone(),
            },
            ListSlot::Items { footer, .. } => ListView::Items {
                rows: view.items.iter().map(|item| renderer.render(item)).collect(),
                footer,
            },
        })
    }
}

impl<T> fmt::Debug for InfiniteList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfiniteList")
            .field("state", &self.loader.state)
            .field("policy", &self.policy)
            .field("config", &self.config)
            .field("total_pages_from_api", &self.total_pages_from_api)
            .finish_non_exhaustive()
    }
}
