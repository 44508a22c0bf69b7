//! Cache configuration.

use std::time::Duration;

/// Default frequency bucket width for spot identity, in Hz.
///
/// Reports for the same pairing whose offsets drift less than a bucket
/// apart are treated as updates of one signal, not distinct signals.
pub const DEFAULT_BUCKET_HZ: u32 = 50;

/// Default tactical retention: three FT8 cycles (15 s each).
pub const DEFAULT_TACTICAL_SECS: u64 = 45;

/// Default "who reports me" retention.
///
/// Confirmation of being heard stays actionable far longer than band
/// activity does.
pub const DEFAULT_HEARD_ME_SECS: u64 = 900;

/// Default interval between prune passes.
pub const DEFAULT_PRUNE_INTERVAL_SECS: u64 = 2;

/// Retention windows for cache queries.
///
/// The windows are deliberately non-uniform: stale band activity misleads a
/// live tactical decision within a cycle or two, while a report that the
/// operator was heard remains useful for minutes. Exact durations are
/// tunable configuration, not invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Window for band-map, perspective, and competition queries.
    pub tactical: Duration,
    /// Window for "who reports me" path-status queries.
    pub heard_me: Duration,
    /// Interval between background prune passes.
    pub prune_interval: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            tactical: Duration::from_secs(DEFAULT_TACTICAL_SECS),
            heard_me: Duration::from_secs(DEFAULT_HEARD_ME_SECS),
            prune_interval: Duration::from_secs(DEFAULT_PRUNE_INTERVAL_SECS),
        }
    }
}

impl RetentionConfig {
    /// The longest configured window — entries older than this serve no
    /// query and are removed by the prune daemon.
    pub fn longest(&self) -> Duration {
        self.tactical.max(self.heard_me)
    }
}

/// Complete reception cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Frequency bucket width for spot identity, in Hz.
    pub bucket_hz: u32,
    /// Retention windows.
    pub retention: RetentionConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            bucket_hz: DEFAULT_BUCKET_HZ,
            retention: RetentionConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Set the frequency bucket width in Hz.
    pub fn with_bucket_hz(mut self, hz: u32) -> Self {
        self.bucket_hz = hz;
        self
    }

    /// Set the tactical retention window.
    pub fn with_tactical_retention(mut self, window: Duration) -> Self {
        self.retention.tactical = window;
        self
    }

    /// Set the "who reports me" retention window.
    pub fn with_heard_me_retention(mut self, window: Duration) -> Self {
        self.retention.heard_me = window;
        self
    }

    /// Set the prune interval.
    pub fn with_prune_interval(mut self, interval: Duration) -> Self {
        self.retention.prune_interval = interval;
        self
    }
}
