//! Pileup density around the target's frequency.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::perspective::{Perspective, Tier};

/// Default fuzzy frequency window, in Hz.
///
/// ±60 Hz absorbs oscillator drift between reporters while excluding
/// genuinely distinct signals a couple hundred Hz away.
pub const DEFAULT_WINDOW_HZ: u32 = 60;

/// Default time gate: three FT8 cycles.
///
/// Longer gates count callers from a prior, already-resolved round.
pub const DEFAULT_GATE_SECS: u64 = 45;

/// Competition analyzer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionConfig {
    /// Half-width of the fuzzy frequency window, in Hz.
    pub window_hz: u32,
    /// Only spots younger than this count.
    pub gate: Duration,
}

impl Default for CompetitionConfig {
    fn default() -> Self {
        Self {
            window_hz: DEFAULT_WINDOW_HZ,
            gate: Duration::from_secs(DEFAULT_GATE_SECS),
        }
    }
}

/// Ordinal congestion level derived from caller count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CompetitionLevel {
    /// Nobody else near the target's frequency.
    Clear,
    /// One other caller.
    Low,
    /// Two or three callers.
    Medium,
    /// Four to six callers.
    High,
    /// Seven or more callers.
    Pileup,
}

impl CompetitionLevel {
    /// Map a distinct-caller count to a level.
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::Clear,
            1 => Self::Low,
            2..=3 => Self::Medium,
            4..=6 => Self::High,
            _ => Self::Pileup,
        }
    }
}

/// Result of a competition computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competition {
    /// Distinct senders clustered near the target's frequency.
    pub count: usize,
    /// Ordinal level for display.
    pub level: CompetitionLevel,
}

impl Competition {
    /// Zero competition — an expected outcome, not a failure.
    pub fn clear() -> Self {
        Self {
            count: 0,
            level: CompetitionLevel::Clear,
        }
    }
}

/// Counts distinct senders crowding the target's frequency.
pub struct CompetitionAnalyzer {
    config: CompetitionConfig,
}

impl CompetitionAnalyzer {
    /// Create an analyzer with the given configuration.
    pub fn new(config: CompetitionConfig) -> Self {
        Self { config }
    }

    /// Competition at `target_offset` from the tier-1/2 spots of an
    /// already-computed perspective.
    ///
    /// Only reports the target's region plausibly hears are counted;
    /// distant tier-3/4 activity says nothing about the target's pileup.
    /// Without a known target offset there is nothing to measure and the
    /// result is clear.
    pub fn compute(
        &self,
        perspective: &Perspective,
        target_offset: Option<u32>,
        now: Instant,
    ) -> Competition {
        let Some(freq) = target_offset else {
            return Competition::clear();
        };

        let mut senders: HashSet<String> = HashSet::new();
        for tier in [Tier::Direct, Tier::SameSquare] {
            for classified in perspective.tier(tier) {
                let spot = &classified.spot;
                if spot.age(now) > self.config.gate {
                    continue;
                }
                if spot.offset_hz.abs_diff(freq) <= self.config.window_hz {
                    senders.insert(spot.sender.base().to_string());
                }
            }
        }

        let count = senders.len();
        Competition {
            count,
            level: CompetitionLevel::from_count(count),
        }
    }
}
