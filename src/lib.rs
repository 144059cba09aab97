//! # infinite-pager
//!
//! Incremental ("infinite scroll") pagination for lists fetched page by page
//! from an asynchronous source.
//!
//! ## Features
//!
//! - **Pagination State**: accumulated items, page counters, loading and error flags
//! - **Single Flight**: at most one fetch in flight per state, stale results fenced off after reset
//! - **Scroll Trigger**: loads the next page within a fixed distance of the bottom
//! - **Change Notifications**: synchronous listeners fired on every state change
//! - **HTTP Source**: page-numbered JSON APIs with retries and rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use infinite_pager::{fetcher_fn, ListConfig, InfiniteList, ScrollPosition, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let list = InfiniteList::new(
//!         ListConfig::new().with_total_pages(3),
//!         fetcher_fn(|page| async move { Ok(vec![format!("row from page {page}")]) }),
//!     );
//!
//!     // Initial load runs after the caller has seen the empty state
//!     list.attach().await.ok();
//!
//!     // Feed scroll observations from the view
//!     list.on_scroll(ScrollPosition::new(850.0, 1000.0)).await;
//!
//!     let view = list.render(&|item: &String| item.clone());
//!     println!("{:?}", view.rows());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  position  ┌─────────────────────┐  load   ┌──────────────────┐
//! │ Scroll view  │ ─────────► │ ScrollTriggerPolicy │ ──────► │ PaginationState  │
//! └──────────────┘            └─────────────────────┘         └────────┬─────────┘
//!        ▲                                                   fetch(p)  │  notify
//!        │ render           ┌─────────────────┐                        ▼
//!        └───────────────── │  InfiniteList   │ ◄──────────── PageFetcher (HTTP, fn)
//!                           └─────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Configuration and file loading
pub mod config;

/// Change notification
pub mod notify;

/// Pagination state and page fetchers
pub mod pagination;

/// Scroll trigger policy and scroll metrics
pub mod scroll;

/// Infinite list composition
pub mod list;

/// HTTP page source with retry and rate limiting
pub mod http;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{
    load_config, load_config_from_str, ListConfig, PagerConfig, PlaceholderConfig, SourceConfig,
};
pub use list::{InfiniteList, ListSlot, ListView};
pub use notify::SubscriptionId;
pub use pagination::{
    fetcher_fn, LoadOutcome, PageFetcher, PaginationSnapshot, PaginationState, PaginationView,
    SkipReason,
};
pub use scroll::{should_trigger_load, ScrollMetrics, ScrollPosition, ScrollTriggerPolicy, TRIGGER_DISTANCE};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
