//! Transmit-frequency recommendation.
//!
//! Builds a per-slot occupancy curve of the passband from local decodes
//! and the tiered remote perspective, scores every slot, and picks the
//! frequency most likely to be decoded by the target — smoothed over time
//! and held steady by hysteresis so the answer does not jitter with every
//! spot arrival.

mod config;
mod curve;
mod engine;

pub use config::{RecommendConfig, ScoreBands};
pub use curve::OccupancyCurve;
pub use engine::{Recommendation, RecommendationEngine};
