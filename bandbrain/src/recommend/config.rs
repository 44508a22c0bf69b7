//! Recommendation engine configuration.

/// Default passband width in Hz.
pub const DEFAULT_PASSBAND_HZ: u32 = 3000;

/// Default scoring slot width in Hz.
pub const DEFAULT_SLOT_HZ: u32 = 5;

/// Default half-width of one signal's occupancy footprint, in Hz.
pub const DEFAULT_HALF_WIDTH_HZ: u32 = 25;

/// Default guard band at each passband edge, in Hz.
///
/// The extreme edges are poor places to transmit: receivers roll off and
/// many rigs cannot decode there, so they are treated as occupied.
pub const DEFAULT_EDGE_GUARD_HZ: u32 = 200;

/// Default collision tolerance around the target's offset, in Hz.
pub const DEFAULT_COLLISION_TOLERANCE_HZ: u32 = 35;

/// Score bands for slot scoring.
///
/// Band boundaries come from product tuning rather than a formal model;
/// they are configuration defaults validated by tests, not derived
/// constants.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBands {
    /// Top of the band for a proven, lightly loaded slot (tier-1 density
    /// 1–3).
    pub proven_light_max: f64,
    /// Bottom of the proven-light band.
    pub proven_light_min: f64,
    /// Top of the band for a proven but congested slot (density 4–5).
    pub proven_busy_max: f64,
    /// Bottom of the proven-busy band.
    pub proven_busy_min: f64,
    /// Top of the band for a saturated slot (density ≥ 6).
    pub proven_saturated_max: f64,
    /// Floor for a saturated slot.
    pub proven_saturated_min: f64,
    /// Baseline for a slot with no tier-1 coverage (gap estimate).
    pub unproven_base: f64,
    /// Floor for an unproven slot.
    pub unproven_floor: f64,
    /// Score assigned inside the collision zone or edge guards.
    pub collision_floor: f64,
    /// A committed recommendation whose own score drops below this is
    /// considered busy and may be replaced.
    pub busy_threshold: f64,
    /// A challenger must beat the committed recommendation by this
    /// absolute margin to displace it. Absolute, not a percentage, so the
    /// behavior does not oscillate near band boundaries.
    pub hysteresis_delta: f64,
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self {
            proven_light_max: 100.0,
            proven_light_min: 85.0,
            proven_busy_max: 70.0,
            proven_busy_min: 55.0,
            proven_saturated_max: 50.0,
            proven_saturated_min: 25.0,
            unproven_base: 55.0,
            unproven_floor: 20.0,
            collision_floor: 5.0,
            busy_threshold: 40.0,
            hysteresis_delta: 15.0,
        }
    }
}

/// Complete recommendation engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendConfig {
    /// Passband width in Hz.
    pub passband_hz: u32,
    /// Scoring slot width in Hz.
    pub slot_hz: u32,
    /// Half-width of one signal's occupancy footprint, in Hz.
    pub half_width_hz: u32,
    /// Guard band at each passband edge, in Hz.
    pub edge_guard_hz: u32,
    /// Collision tolerance around the target's offset, in Hz.
    pub collision_tolerance_hz: u32,
    /// Slots with accumulated occupancy below this count as open for
    /// gap finding.
    pub gap_occupancy_threshold: f64,
    /// Fraction of the previous smoothed frequency retained each cycle.
    /// `new = retained * old + (1 - retained) * candidate`.
    pub smoothing_retained: f64,
    /// Score bands.
    pub bands: ScoreBands,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            passband_hz: DEFAULT_PASSBAND_HZ,
            slot_hz: DEFAULT_SLOT_HZ,
            half_width_hz: DEFAULT_HALF_WIDTH_HZ,
            edge_guard_hz: DEFAULT_EDGE_GUARD_HZ,
            collision_tolerance_hz: DEFAULT_COLLISION_TOLERANCE_HZ,
            gap_occupancy_threshold: 0.1,
            smoothing_retained: 0.9,
            bands: ScoreBands::default(),
        }
    }
}

impl RecommendConfig {
    /// Set the scoring slot width in Hz (clamped to at least 1).
    pub fn with_slot_hz(mut self, hz: u32) -> Self {
        self.slot_hz = hz.max(1);
        self
    }

    /// Set the edge guard width in Hz.
    pub fn with_edge_guard_hz(mut self, hz: u32) -> Self {
        self.edge_guard_hz = hz;
        self
    }

    /// Set the smoothing retention factor (clamped to 0.0–1.0).
    pub fn with_smoothing_retained(mut self, retained: f64) -> Self {
        self.smoothing_retained = retained.clamp(0.0, 1.0);
        self
    }

    /// Replace the score bands.
    pub fn with_bands(mut self, bands: ScoreBands) -> Self {
        self.bands = bands;
        self
    }

    /// The centre of the passband — the fallback recommendation when no
    /// data exists at all.
    pub fn band_center_hz(&self) -> u32 {
        self.passband_hz / 2
    }
}
