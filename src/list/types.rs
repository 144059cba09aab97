//! List presentation types
//!
//! Which slot a list shows (loading, error, empty or items) and the rendered
//! view handed to the host UI.

use crate::config::PlaceholderConfig;

/// Renders one loaded item
///
/// Invoked once per loaded item, in list order. Implemented for any
/// `Fn(&T) -> R` closure.
pub trait ItemRenderer<T> {
    /// Rendered representation of an item
    type Output;

    /// Render a single item
    fn render(&self, item: &T) -> Self::Output;
}

impl<T, R, F> ItemRenderer<T> for F
where
    F: Fn(&T) -> R,
{
    type Output = R;

    fn render(&self, item: &T) -> R {
        self(item)
    }
}

/// Trailing row shown below loaded items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    /// The next page is being fetched
    Loading,
    /// The last fetch failed; already loaded items stay visible
    Error(String),
}

/// Which presentation a list should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListSlot {
    /// No items yet and the first fetch is in flight
    Loading,
    /// No items and the last fetch failed
    Error(String),
    /// No items and nothing pending
    Empty,
    /// Items are loaded
    Items {
        /// Number of loaded items
        count: usize,
        /// Optional trailing row
        footer: Option<Footer>,
    },
}

impl ListSlot {
    /// Check if this slot shows items
    pub fn has_items(&self) -> bool {
        matches!(self, Self::Items { .. })
    }
}

/// Choose the slot for a list.
///
/// With items loaded, the items are always shown and loading or error state
/// goes into the footer. With no items: loading wins; after a failure the
/// error slot is used when an error placeholder is configured, the empty slot
/// when only an empty placeholder is configured, and the error slot otherwise.
pub fn select_slot(
    item_count: usize,
    is_loading: bool,
    error: Option<&str>,
    placeholders: &PlaceholderConfig,
) -> ListSlot {
    if item_count > 0 {
        let footer = if is_loading {
            Some(Footer::Loading)
        } else {
            error.map(|message| Footer::Error(message.to_string()))
        };
        return ListSlot::Items {
            count: item_count,
            footer,
        };
    }

    if is_loading {
        return ListSlot::Loading;
    }

    match error {
        Some(_) if placeholders.error.is_none() && placeholders.empty.is_some() => ListSlot::Empty,
        Some(message) => ListSlot::Error(message.to_string()),
        None => ListSlot::Empty,
    }
}

/// Rendered list, ready for the host UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<R> {
    /// Loading placeholder
    Loading {
        /// Configured placeholder, if any
        placeholder: Option<String>,
    },
    /// Error placeholder
    Error {
        /// Description of the failure
        message: String,
        /// Configured placeholder, if any
        placeholder: Option<String>,
    },
    /// Empty placeholder
    Empty {
        /// Configured placeholder, if any
        placeholder: Option<String>,
    },
    /// Rendered rows
    Items {
        /// One rendered row per loaded item, in list order
        rows: Vec<R>,
        /// Optional trailing row
        footer: Option<Footer>,
    },
}

impl<R> ListView<R> {
    /// Rendered rows, empty for placeholder views
    pub fn rows(&self) -> &[R] {
        match self {
            Self::Items { rows, .. } => rows,
            _ => &[],
        }
    }
}
