//! Pagination module
//!
//! Incremental, page-by-page loading of a list from an async source.
//!
//! # Overview
//!
//! The pagination module provides:
//! - `PaginationState` - Loaded items, page counters, loading/error flags and
//!   the single operation that advances pagination by one page
//! - `PageFetcher` - The async page source the state calls into
//! - `PaginationSnapshot` / `LoadOutcome` - Read-only views of the result
//!
//! Pages are requested strictly in ascending order and at most one fetch is
//! in flight per state, so results are always applied in request order.

mod state;
mod types;

pub use state::{PaginationState, DEFAULT_INITIAL_PAGE, DEFAULT_TOTAL_PAGES};
pub use types::{
    fetcher_fn, FnFetcher, LoadOutcome, PageFetcher, PaginationSnapshot,
    PaginationView, SkipReason,
};
