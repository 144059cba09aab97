//! Infinite list module
//!
//! Composes pagination state, a page source and the scroll trigger policy
//! into one list, and decides which presentation the list shows.
//!
//! # Overview
//!
//! The list module provides:
//! - `InfiniteList` - Initial deferred load, scroll-driven loads, total-pages
//!   updates and refresh
//! - `ListSlot` / `select_slot` - Placeholder priority for empty lists
//! - `ListView` / `ItemRenderer` - Rendering loaded items for the host UI

mod infinite;
mod types;

pub use infinite::InfiniteList;
pub use types::{select_slot, Footer, ItemRenderer, ListSlot, ListView};

#[cfg(test)]
mod tests;
