//! Geographic-perspective engine.
//!
//! Answers "what does the target's region currently hear?" as four ranked
//! tiers of spots, degrading gracefully from the target's own reports to
//! grid-square neighbours, grid-field neighbours, and finally global band
//! activity.

mod engine;
mod tier;

pub use engine::{Perspective, PerspectiveConfig, PerspectiveEngine, TierSpot};
pub use tier::{Tier, TierWeights};
