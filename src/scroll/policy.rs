//! Near-bottom trigger policy

use super::metrics::ScrollPosition;

/// Distance from the bottom, in scroll units, at which the next page is requested
pub const TRIGGER_DISTANCE: f64 = 200.0;

/// Decide whether a scroll observation should request the next page.
///
/// True iff the remaining scroll extent (`max_offset - current_offset`) is at
/// most [`TRIGGER_DISTANCE`], more pages exist, and no fetch is in flight.
/// Overscroll past the end counts as within the distance.
pub fn should_trigger_load(
    current_offset: f64,
    max_offset: f64,
    has_more_pages: bool,
    is_loading: bool,
) -> bool {
    ScrollTriggerPolicy::default().should_trigger(
        ScrollPosition::new(current_offset, max_offset),
        has_more_pages,
        is_loading,
    )
}

/// Near-bottom trigger with a configurable look-ahead distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTriggerPolicy {
    /// Remaining scroll extent at or below which a load is triggered
    pub trigger_distance: f64,
}

impl Default for ScrollTriggerPolicy {
    fn default() -> Self {
        Self {
            trigger_distance: TRIGGER_DISTANCE,
        }
    }
}

impl ScrollTriggerPolicy {
    /// Create a policy with a custom trigger distance
    pub fn new(trigger_distance: f64) -> Self {
        Self { trigger_distance }
    }

    /// Check if the position is within the trigger distance of the bottom
    pub fn is_near_bottom(&self, position: ScrollPosition) -> bool {
        position.remaining() <= self.trigger_distance
    }

    /// Decide whether this observation should request the next page
    pub fn should_trigger(
        &self,
        position: ScrollPosition,
        has_more_pages: bool,
        is_loading: bool,
    ) -> bool {
        has_more_pages && !is_loading && self.is_near_bottom(position)
    }
}
