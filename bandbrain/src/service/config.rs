//! Top-level service configuration.

use std::time::Duration;

use crate::cache::CacheConfig;
use crate::competition::CompetitionConfig;
use crate::model::{Callsign, Grid};
use crate::perspective::PerspectiveConfig;
use crate::recommend::RecommendConfig;

use super::BrainError;

/// Default interval between tactical refresh cycles.
///
/// One FT8 receive period fits five of these; faster refreshes would only
/// recompute identical data between decode bursts.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3;

/// Aggregate configuration for [`BandBrainService`].
///
/// [`BandBrainService`]: super::BandBrainService
#[derive(Debug, Clone)]
pub struct BrainConfig {
    /// The operator's callsign.
    pub my_call: Callsign,
    /// The operator's grid, when known. Informational only.
    pub my_grid: Option<Grid>,
    /// Reception cache configuration.
    pub cache: CacheConfig,
    /// Perspective engine configuration.
    pub perspective: PerspectiveConfig,
    /// Competition analyzer configuration.
    pub competition: CompetitionConfig,
    /// Recommendation engine configuration.
    pub recommend: RecommendConfig,
    /// Interval between tactical refresh cycles.
    pub refresh_interval: Duration,
}

impl BrainConfig {
    /// Create a configuration for the given operator callsign, with
    /// defaults everywhere else.
    ///
    /// # Errors
    ///
    /// Returns [`BrainError::InvalidCallsign`] when the callsign is empty
    /// after normalization.
    pub fn new(my_call: &str) -> Result<Self, BrainError> {
        let call = Callsign::new(my_call);
        if call.is_empty() {
            return Err(BrainError::InvalidCallsign(my_call.to_string()));
        }
        Ok(Self {
            my_call: call,
            my_grid: None,
            cache: CacheConfig::default(),
            perspective: PerspectiveConfig::default(),
            competition: CompetitionConfig::default(),
            recommend: RecommendConfig::default(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
        })
    }

    /// Set the operator's grid.
    pub fn with_my_grid(mut self, grid: Grid) -> Self {
        self.my_grid = Some(grid);
        self
    }

    /// Replace the cache configuration.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the recommendation configuration.
    pub fn with_recommend(mut self, recommend: RecommendConfig) -> Self {
        self.recommend = recommend;
        self
    }

    /// Set the refresh interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Check cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`BrainError::Config`] naming the first violated constraint.
    pub fn validate(&self) -> Result<(), BrainError> {
        if self.refresh_interval.is_zero() {
            return Err(BrainError::Config(
                "refresh interval must be non-zero".to_string(),
            ));
        }
        if self.cache.retention.tactical > self.cache.retention.heard_me {
            return Err(BrainError::Config(
                "tactical retention cannot exceed heard-me retention".to_string(),
            ));
        }
        if self.recommend.passband_hz <= 2 * self.recommend.edge_guard_hz {
            return Err(BrainError::Config(
                "edge guards leave no usable passband".to_string(),
            ));
        }
        Ok(())
    }
}
