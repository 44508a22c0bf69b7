//! Path status: has the target's region reported our signal?

use std::time::{Duration, Instant};

use crate::cache::{LocalDecodeBuffer, ReceptionCache};
use crate::model::{Callsign, TargetContext};
use crate::perspective::Perspective;

/// Classification of the operator's path to the target, most favorable
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PathStatus {
    /// The target itself reported decoding us.
    HeardByTarget,
    /// A reporter in the target's square or field decoded us, or our own
    /// receiver decoded a reply from the target directed at us.
    HeardInRegion,
    /// Reporters exist near the target, but none report us.
    NotHeardInRegion,
    /// No recent report of our signal exists anywhere — we have not been
    /// calling, as opposed to calling and going unheard.
    NotTransmitting,
    /// Nobody near the target is reporting at all.
    NoReportersInRegion,
}

/// Computes [`PathStatus`] from the reception cache, the local decode
/// buffer, and an already-computed perspective.
pub struct PathAnalyzer {
    /// Window for "who reports me" evidence.
    heard_me_window: Duration,
    /// Window for local-decode evidence.
    local_window: Duration,
}

impl PathAnalyzer {
    /// Create an analyzer with the given evidence windows.
    pub fn new(heard_me_window: Duration, local_window: Duration) -> Self {
        Self {
            heard_me_window,
            local_window,
        }
    }

    /// Classify the path from `my_call` to `target` at `now`.
    ///
    /// Local-decode evidence is checked before settling on an unfavorable
    /// answer: a directed reply off our own receiver proves the path is
    /// open even when the spot network has not caught up yet.
    pub fn compute(
        &self,
        cache: &ReceptionCache,
        decodes: &LocalDecodeBuffer,
        my_call: &Callsign,
        target: &TargetContext,
        perspective: &Perspective,
        now: Instant,
    ) -> PathStatus {
        let my_reports = cache.query_reports_of_me(now, self.heard_me_window);

        if my_reports
            .iter()
            .any(|spot| spot.receiver.matches(&target.call))
        {
            return PathStatus::HeardByTarget;
        }

        if let Some(grid) = &target.grid {
            let square = grid.square();
            let in_region = my_reports.iter().any(|spot| {
                spot.receiver_grid.as_ref().is_some_and(|rg| {
                    square.is_some_and(|sq| rg.in_square(sq)) || rg.in_field(grid.field())
                })
            });
            if in_region {
                return PathStatus::HeardInRegion;
            }
        }

        // Local evidence beats feed latency: the target answered us on our
        // own receiver even though no reporter has spotted us near it.
        if decodes.directed_reply(&target.call, my_call, now, self.local_window) {
            return PathStatus::HeardInRegion;
        }

        if my_reports.is_empty() {
            return PathStatus::NotTransmitting;
        }

        if perspective.has_regional_reporters() {
            PathStatus::NotHeardInRegion
        } else {
            PathStatus::NoReportersInRegion
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::model::{Grid, LocalDecode, Spot};
    use crate::perspective::{Tier, TierSpot};

    const HEARD_ME: Duration = Duration::from_secs(900);
    const LOCAL: Duration = Duration::from_secs(45);

    fn setup() -> (ReceptionCache, LocalDecodeBuffer, PathAnalyzer) {
        (
            ReceptionCache::new(CacheConfig::default(), Callsign::new("WU2C")),
            LocalDecodeBuffer::new(),
            PathAnalyzer::new(HEARD_ME, LOCAL),
        )
    }

    fn spot(sender: &str, receiver: &str, grid: Option<&str>, at: Instant) -> Spot {
        Spot {
            sender: Callsign::new(sender),
            receiver: Callsign::new(receiver),
            sender_grid: None,
            receiver_grid: grid.and_then(Grid::parse),
            offset_hz: 1200,
            snr_db: -10,
            received_at: at,
        }
    }

    fn target_fn42() -> TargetContext {
        TargetContext::new(Callsign::new("JA1XYZ"), Grid::parse("FN42"))
    }

    fn regional_perspective(at: Instant) -> Perspective {
        Perspective {
            same_square: vec![TierSpot {
                spot: spot("K1ABC", "W1NEB", Some("FN42AA"), at),
                tier: Tier::SameSquare,
                collision: false,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn heard_by_target_wins() {
        let (cache, decodes, analyzer) = setup();
        let now = Instant::now();
        cache.insert(spot("WU2C", "JA1XYZ", Some("FN42AA"), now));

        let status = analyzer.compute(
            &cache,
            &decodes,
            &Callsign::new("WU2C"),
            &target_fn42(),
            &regional_perspective(now),
            now,
        );
        assert_eq!(status, PathStatus::HeardByTarget);
    }

    #[test]
    fn heard_in_region_by_square() {
        let (cache, decodes, analyzer) = setup();
        let now = Instant::now();
        cache.insert(spot("WU2C", "W1NEB", Some("FN42AA"), now));

        let status = analyzer.compute(
            &cache,
            &decodes,
            &Callsign::new("WU2C"),
            &target_fn42(),
            &regional_perspective(now),
            now,
        );
        assert_eq!(status, PathStatus::HeardInRegion);
    }

    #[test]
    fn heard_in_region_by_field_only() {
        let (cache, decodes, analyzer) = setup();
        let now = Instant::now();
        cache.insert(spot("WU2C", "W1CT", Some("FN31BB"), now));

        let status = analyzer.compute(
            &cache,
            &decodes,
            &Callsign::new("WU2C"),
            &target_fn42(),
            &regional_perspective(now),
            now,
        );
        assert_eq!(status, PathStatus::HeardInRegion);
    }

    #[test]
    fn not_heard_in_region_when_reporters_exist() {
        let (cache, decodes, analyzer) = setup();
        let now = Instant::now();
        // We are being heard, just nowhere near the target.
        cache.insert(spot("WU2C", "G0AAA", Some("IO91"), now));

        let status = analyzer.compute(
            &cache,
            &decodes,
            &Callsign::new("WU2C"),
            &target_fn42(),
            &regional_perspective(now),
            now,
        );
        assert_eq!(status, PathStatus::NotHeardInRegion);
    }

    #[test]
    fn not_transmitting_when_no_reports_of_us_exist() {
        let (cache, decodes, analyzer) = setup();
        let now = Instant::now();

        let status = analyzer.compute(
            &cache,
            &decodes,
            &Callsign::new("WU2C"),
            &target_fn42(),
            &regional_perspective(now),
            now,
        );
        assert_eq!(status, PathStatus::NotTransmitting);
    }

    #[test]
    fn no_reporters_in_region_when_area_is_silent() {
        let (cache, decodes, analyzer) = setup();
        let now = Instant::now();
        cache.insert(spot("WU2C", "G0AAA", Some("IO91"), now));

        let status = analyzer.compute(
            &cache,
            &decodes,
            &Callsign::new("WU2C"),
            &target_fn42(),
            &Perspective::empty(),
            now,
        );
        assert_eq!(status, PathStatus::NoReportersInRegion);
    }

    #[test]
    fn directed_reply_upgrades_unfavorable_status() {
        let (cache, decodes, analyzer) = setup();
        let now = Instant::now();
        decodes.insert(LocalDecode {
            sender: Callsign::new("JA1XYZ"),
            offset_hz: 1000,
            snr_db: -5,
            directed_to: Some(Callsign::new("WU2C")),
            received_at: now,
        });

        // No spot-network evidence at all, yet the target answered us.
        let status = analyzer.compute(
            &cache,
            &decodes,
            &Callsign::new("WU2C"),
            &target_fn42(),
            &Perspective::empty(),
            now,
        );
        assert_eq!(status, PathStatus::HeardInRegion);
    }

    #[test]
    fn stale_heard_me_evidence_expires() {
        let (cache, decodes, analyzer) = setup();
        let start = Instant::now();
        cache.insert(spot("WU2C", "JA1XYZ", Some("FN42AA"), start));

        let later = start + HEARD_ME + Duration::from_secs(1);
        let status = analyzer.compute(
            &cache,
            &decodes,
            &Callsign::new("WU2C"),
            &target_fn42(),
            &Perspective::empty(),
            later,
        );
        assert_eq!(status, PathStatus::NotTransmitting);
    }
}
