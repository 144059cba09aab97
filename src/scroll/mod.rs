//! Scroll trigger module
//!
//! Decides, from scroll-position observations, when the next page should be
//! requested.
//!
//! # Overview
//!
//! The scroll module provides:
//! - `should_trigger_load` - The stateless near-bottom decision
//! - `ScrollTriggerPolicy` - The same decision with a configurable look-ahead distance
//! - `ScrollPosition` / `ScrollMetrics` - Scroll observations and a simple
//!   viewport model that produces them

mod metrics;
mod policy;

pub use metrics::{ScrollMetrics, ScrollPosition};
pub use policy::{should_trigger_load, ScrollTriggerPolicy, TRIGGER_DISTANCE};
