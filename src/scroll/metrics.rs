//! Scroll observations and viewport metrics
//!
//! The view reports `(current_offset, max_offset)` pairs; `ScrollMetrics`
//! derives them from content and viewport extents for views that only know
//! their sizes.

/// A single scroll-position observation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    /// Current scroll offset from the top
    pub current_offset: f64,
    /// Largest reachable scroll offset
    pub max_offset: f64,
}

impl ScrollPosition {
    /// Create a new observation
    pub fn new(current_offset: f64, max_offset: f64) -> Self {
        Self {
            current_offset,
            max_offset,
        }
    }

    /// Scroll extent left below the viewport; negative when overscrolled
    pub fn remaining(&self) -> f64 {
        self.max_offset - self.current_offset
    }
}

/// Content and viewport extents with a clamped scroll offset
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    offset: f64,
    content_extent: f64,
    viewport_extent: f64,
}

impl ScrollMetrics {
    /// Create metrics for a viewport of the given extent
    pub fn new(viewport_extent: f64) -> Self {
        Self {
            viewport_extent: viewport_extent.max(0.0),
            ..Self::default()
        }
    }

    /// Current scroll offset
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Total content extent
    pub fn content_extent(&self) -> f64 {
        self.content_extent
    }

    /// Visible viewport extent
    pub fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    /// Largest valid scroll offset
    pub fn max_offset(&self) -> f64 {
        (self.content_extent - self.viewport_extent).max(0.0)
    }

    /// Check if the offset is at the bottom
    pub fn is_at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    /// Observation for the current offset
    pub fn position(&self) -> ScrollPosition {
        ScrollPosition::new(self.offset, self.max_offset())
    }

    /// Update the content extent and clamp the offset
    pub fn set_content_extent(&mut self, content_extent: f64) {
        self.content_extent = content_extent.max(0.0);
        self.clamp_offset();
    }

    /// Update the viewport extent and clamp the offset
    pub fn set_viewport_extent(&mut self, viewport_extent: f64) {
        self.viewport_extent = viewport_extent.max(0.0);
        self.clamp_offset();
    }

    /// Scroll by `delta` (negative scrolls up), clamped to the valid range
    pub fn scroll_by(&mut self, delta: f64) {
        self.offset += delta;
        self.clamp_offset();
    }

    /// Jump to the bottom
    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Reset offset and content; the viewport is kept
    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.content_extent = 0.0;
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }
}
