//! Tiered perspective computation.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::cache::ReceptionCache;
use crate::model::{Spot, SpotKey, TargetContext};

use super::{Tier, TierWeights};

/// Default passband width in Hz.
pub const DEFAULT_PASSBAND_HZ: u32 = 3000;

/// Default collision tolerance in Hz.
///
/// A tier-1/2 spot this close to the target's own offset means the
/// target's receiver is likely occupied there.
pub const DEFAULT_COLLISION_TOLERANCE_HZ: u32 = 35;

/// Perspective engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveConfig {
    /// Passband width in Hz; bounds the global tier query.
    pub passband_hz: u32,
    /// Collision tolerance around the target's offset, in Hz.
    pub collision_tolerance_hz: u32,
    /// Tier weights handed downstream.
    pub weights: TierWeights,
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            passband_hz: DEFAULT_PASSBAND_HZ,
            collision_tolerance_hz: DEFAULT_COLLISION_TOLERANCE_HZ,
            weights: TierWeights::default(),
        }
    }
}

/// A spot classified into a tier, with its collision flag.
#[derive(Debug, Clone, PartialEq)]
pub struct TierSpot {
    /// The underlying reception report.
    pub spot: Spot,
    /// Tier the spot was classified into.
    pub tier: Tier,
    /// True when a tier-1/2 spot sits within the collision tolerance of
    /// the target's own offset. Tier-3/4 proximity is too weak a proxy to
    /// ever raise this.
    pub collision: bool,
}

/// Tiered view of what the target's region currently hears.
///
/// Tiers are mutually exclusive: a spot classified into a higher tier is
/// excluded from every lower one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Perspective {
    /// Tier 1 — the target's own reception reports.
    pub direct: Vec<TierSpot>,
    /// Tier 2 — same 4-char grid square as the target.
    pub same_square: Vec<TierSpot>,
    /// Tier 3 — same 2-char grid field as the target.
    pub same_field: Vec<TierSpot>,
    /// Tier 4 — all remaining recent band activity.
    pub global: Vec<TierSpot>,
}

impl Perspective {
    /// An empty perspective — a valid, expected outcome, not an error.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Spots in the given tier.
    pub fn tier(&self, tier: Tier) -> &[TierSpot] {
        match tier {
            Tier::Direct => &self.direct,
            Tier::SameSquare => &self.same_square,
            Tier::SameField => &self.same_field,
            Tier::Global => &self.global,
        }
    }

    /// All classified spots, highest tier first.
    pub fn iter(&self) -> impl Iterator<Item = &TierSpot> {
        self.direct
            .iter()
            .chain(self.same_square.iter())
            .chain(self.same_field.iter())
            .chain(self.global.iter())
    }

    /// Total classified spots across all tiers.
    pub fn len(&self) -> usize {
        self.direct.len() + self.same_square.len() + self.same_field.len() + self.global.len()
    }

    /// Whether no tier holds any spot.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the proximity tiers (2–3) have any data — used by the
    /// path analyzer to distinguish "not heard" from "nobody listening".
    pub fn has_regional_reporters(&self) -> bool {
        !self.same_square.is_empty() || !self.same_field.is_empty()
    }
}

/// Computes tiered perspectives from the reception cache.
pub struct PerspectiveEngine {
    config: PerspectiveConfig,
}

impl PerspectiveEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: PerspectiveConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &PerspectiveConfig {
        &self.config
    }

    /// Build the four-tier view for `target` from spots no older than
    /// `window` at `now`.
    ///
    /// A target without a grid is ungradeable for the proximity tiers:
    /// tiers 2–3 come back empty and classification falls through to the
    /// global tier.
    pub fn compute(
        &self,
        cache: &ReceptionCache,
        target: &TargetContext,
        now: Instant,
        window: Duration,
    ) -> Perspective {
        let bucket_hz = cache.bucket_hz();
        let mut claimed: HashSet<SpotKey> = HashSet::new();

        // Tier 1: the target's own reports.
        let direct = self.classify(
            cache.query_by_receiver(&target.call, now, window),
            Tier::Direct,
            target,
            bucket_hz,
            &mut claimed,
        );

        // Tiers 2-3: proximity, only gradeable with a target grid.
        let same_square = match target.grid.as_ref().and_then(|g| g.square()) {
            Some(square) => self.classify(
                cache.query_by_square(square, now, window),
                Tier::SameSquare,
                target,
                bucket_hz,
                &mut claimed,
            ),
            None => Vec::new(),
        };

        let same_field = match target.grid.as_ref() {
            Some(grid) => self.classify(
                cache.query_by_field(grid.field(), now, window),
                Tier::SameField,
                target,
                bucket_hz,
                &mut claimed,
            ),
            None => Vec::new(),
        };

        // Tier 4: everything else recent on the band.
        let global = self.classify(
            cache.query_by_frequency_range(0..=self.config.passband_hz, now, window),
            Tier::Global,
            target,
            bucket_hz,
            &mut claimed,
        );

        Perspective {
            direct,
            same_square,
            same_field,
            global,
        }
    }

    /// Classify `spots` into `tier`, skipping anything a higher tier
    /// already claimed.
    fn classify(
        &self,
        spots: Vec<Spot>,
        tier: Tier,
        target: &TargetContext,
        bucket_hz: u32,
        claimed: &mut HashSet<SpotKey>,
    ) -> Vec<TierSpot> {
        let mut classified = Vec::with_capacity(spots.len());
        for spot in spots {
            let key = spot.key(bucket_hz);
            if !claimed.insert(key) {
                continue;
            }
            let collision = self.is_collision(&spot, tier, target);
            classified.push(TierSpot {
                spot,
                tier,
                collision,
            });
        }
        classified
    }

    fn is_collision(&self, spot: &Spot, tier: Tier, target: &TargetContext) -> bool {
        if !matches!(tier, Tier::Direct | Tier::SameSquare) {
            return false;
        }
        match target.offset_hz {
            Some(target_offset) => {
                spot.offset_hz.abs_diff(target_offset) <= self.config.collision_tolerance_hz
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::model::{Callsign, Grid};

    const WINDOW: Duration = Duration::from_secs(45);

    fn cache() -> ReceptionCache {
        ReceptionCache::new(CacheConfig::default(), Callsign::new("WU2C"))
    }

    fn spot(sender: &str, receiver: &str, grid: Option<&str>, offset_hz: u32, at: Instant) -> Spot {
        Spot {
            sender: Callsign::new(sender),
            receiver: Callsign::new(receiver),
            sender_grid: None,
            receiver_grid: grid.and_then(Grid::parse),
            offset_hz,
            snr_db: -10,
            received_at: at,
        }
    }

    fn target(call: &str, grid: Option<&str>) -> TargetContext {
        TargetContext::new(Callsign::new(call), grid.and_then(Grid::parse))
    }

    #[test]
    fn direct_reports_land_in_tier_one() {
        let cache = cache();
        let now = Instant::now();
        cache.insert(spot("K1ABC", "JA1XYZ", Some("PM95"), 1000, now));
        cache.insert(spot("N0DEF", "JA1XYZ", Some("PM95"), 1005, now));
        cache.insert(spot("G4GHI", "JA1XYZ", Some("PM95"), 1850, now));

        let engine = PerspectiveEngine::new(PerspectiveConfig::default());
        let view = engine.compute(&cache, &target("JA1XYZ", Some("PM95")), now, WINDOW);

        assert_eq!(view.direct.len(), 3);
        assert!(view.same_square.is_empty());
        assert!(view.same_field.is_empty());
        assert!(view.global.is_empty());
    }

    #[test]
    fn square_and_field_tiers_for_fn42_target() {
        let cache = cache();
        let now = Instant::now();
        // Receiver in FN42AA, no direct report from the target itself.
        cache.insert(spot("K1ABC", "W1NEB", Some("FN42AA"), 1000, now));
        // Receiver in FN31BB: same field, different square.
        cache.insert(spot("K1ABC", "W1CT", Some("FN31BB"), 1100, now));
        // Receiver far away.
        cache.insert(spot("K1ABC", "G0AAA", Some("IO91"), 1200, now));

        let engine = PerspectiveEngine::new(PerspectiveConfig::default());
        let view = engine.compute(&cache, &target("W1TGT", Some("FN42")), now, WINDOW);

        assert!(view.direct.is_empty());
        assert_eq!(view.same_square.len(), 1);
        assert_eq!(
            view.same_square[0].spot.receiver,
            Callsign::new("W1NEB")
        );
        assert_eq!(view.same_field.len(), 1);
        assert_eq!(view.same_field[0].spot.receiver, Callsign::new("W1CT"));
        assert_eq!(view.global.len(), 1);
    }

    #[test]
    fn tiers_are_mutually_exclusive() {
        let cache = cache();
        let now = Instant::now();
        // The target's own report: its receiver grid matches the target's
        // square and field too, so it is a candidate for three tiers.
        cache.insert(spot("K1ABC", "W1TGT", Some("FN42AA"), 1000, now));

        let engine = PerspectiveEngine::new(PerspectiveConfig::default());
        let view = engine.compute(&cache, &target("W1TGT", Some("FN42AA")), now, WINDOW);

        assert_eq!(view.direct.len(), 1);
        assert!(view.same_square.is_empty());
        assert!(view.same_field.is_empty());
        assert!(view.global.is_empty());
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn gridless_target_degrades_to_global_only() {
        let cache = cache();
        let now = Instant::now();
        cache.insert(spot("K1ABC", "W1NEB", Some("FN42AA"), 1000, now));

        let engine = PerspectiveEngine::new(PerspectiveConfig::default());
        let view = engine.compute(&cache, &target("W1TGT", None), now, WINDOW);

        assert!(view.direct.is_empty());
        assert!(view.same_square.is_empty());
        assert!(view.same_field.is_empty());
        assert_eq!(view.global.len(), 1);
    }

    #[test]
    fn collision_boundary_is_inclusive_at_tolerance() {
        let cache = cache();
        let now = Instant::now();
        cache.insert(spot("K1ABC", "W1TGT", Some("FN42"), 1035, now));
        cache.insert(spot("N0DEF", "W1TGT", Some("FN42"), 1036, now));

        let engine = PerspectiveEngine::new(PerspectiveConfig::default());
        let mut tgt = target("W1TGT", Some("FN42"));
        tgt.offset_hz = Some(1000);
        let view = engine.compute(&cache, &tgt, now, WINDOW);

        let at_35 = view
            .direct
            .iter()
            .find(|t| t.spot.offset_hz == 1035)
            .unwrap();
        let at_36 = view
            .direct
            .iter()
            .find(|t| t.spot.offset_hz == 1036)
            .unwrap();
        assert!(at_35.collision);
        assert!(!at_36.collision);
    }

    #[test]
    fn proximity_tiers_never_set_collision_below_square() {
        let cache = cache();
        let now = Instant::now();
        // Same field as the target, right on its frequency.
        cache.insert(spot("K1ABC", "W1CT", Some("FN31"), 1000, now));

        let engine = PerspectiveEngine::new(PerspectiveConfig::default());
        let mut tgt = target("W1TGT", Some("FN42"));
        tgt.offset_hz = Some(1000);
        let view = engine.compute(&cache, &tgt, now, WINDOW);

        assert_eq!(view.same_field.len(), 1);
        assert!(!view.same_field[0].collision);
    }

    #[test]
    fn empty_cache_yields_empty_perspective() {
        let cache = cache();
        let engine = PerspectiveEngine::new(PerspectiveConfig::default());
        let view = engine.compute(
            &cache,
            &target("W1TGT", Some("FN42")),
            Instant::now(),
            WINDOW,
        );
        assert!(view.is_empty());
        assert!(!view.has_regional_reporters());
    }

    #[test]
    fn window_override_excludes_stale_spots() {
        let cache = cache();
        let start = Instant::now();
        cache.insert(spot("K1ABC", "JA1XYZ", Some("PM95"), 1000, start));

        let engine = PerspectiveEngine::new(PerspectiveConfig::default());
        let later = start + Duration::from_secs(60);
        let view = engine.compute(&cache, &target("JA1XYZ", Some("PM95")), later, WINDOW);
        assert!(view.is_empty());
    }
}
