//! Service facade and background tasks.
//!
//! Wires the reception cache, local decode buffer, and the analysis
//! engines behind [`BandBrainService`], and provides the periodic tasks
//! that keep it fresh: [`RefreshDaemon`] recomputes the tactical
//! assessment, and the prune daemon from the cache module evicts stale
//! entries.

mod config;
mod error;
mod facade;
mod refresh;

pub use config::{BrainConfig, DEFAULT_REFRESH_INTERVAL_SECS};
pub use error::BrainError;
pub use facade::{Assessment, BandBrainService};
pub use refresh::{AssessmentReceiver, RefreshDaemon};
