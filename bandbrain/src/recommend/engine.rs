//! Slot scoring, selection, hysteresis and smoothing.

use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::model::LocalDecode;
use crate::perspective::{Perspective, TierWeights};

use super::{OccupancyCurve, RecommendConfig};

/// Occupancy penalty per accumulated weight on an unproven slot.
const UNPROVEN_OCCUPANCY_PENALTY: f64 = 12.0;

/// A scored transmit-frequency recommendation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    /// Recommended audio offset in Hz, smoothed across cycles.
    pub offset_hz: u32,
    /// Score of the slot the recommendation is anchored to.
    pub score: f64,
    /// True when tier-1 evidence shows the target decodes signals there.
    pub is_proven: bool,
}

#[derive(Debug, Clone, Copy)]
struct SlotScore {
    score: f64,
    proven: bool,
}

/// Smoothing and hysteresis state carried between cycles.
#[derive(Debug, Default)]
struct EngineState {
    /// Smoothed recommendation frequency.
    smoothed_hz: Option<f64>,
    /// Slot the engine is currently committed to.
    committed_slot: Option<usize>,
}

/// Produces a transmit-frequency recommendation each refresh cycle.
///
/// The engine is stateful: the committed slot only changes when it turns
/// busy or a challenger beats it by the hysteresis margin, and the output
/// frequency moves toward the committed slot exponentially rather than
/// jumping. Call [`RecommendationEngine::reset`] when the target changes
/// so stale state does not bleed into the new session.
pub struct RecommendationEngine {
    config: RecommendConfig,
    weights: TierWeights,
    state: Mutex<EngineState>,
}

impl RecommendationEngine {
    /// Create an engine with the given configuration and tier weights.
    pub fn new(config: RecommendConfig, weights: TierWeights) -> Self {
        Self {
            config,
            weights,
            state: Mutex::new(EngineState::default()),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Drop all carried state. The next recommendation starts fresh and
    /// jumps straight to its candidate instead of smoothing toward it.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = EngineState::default();
    }

    /// Recommend a transmit offset from an already-fetched snapshot.
    ///
    /// `target_offset` carves out the collision zone; without it no slot
    /// is penalized for proximity to the target.
    pub fn recommend(
        &self,
        perspective: &Perspective,
        local_decodes: &[LocalDecode],
        target_offset: Option<u32>,
    ) -> Recommendation {
        let curve = OccupancyCurve::build(perspective, local_decodes, &self.weights, &self.config);

        let (best_slot, best) = self.best_slot(&curve, target_offset);
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let (chosen_slot, chosen) = match state.committed_slot {
            Some(committed) => {
                let current = self.score_slot(&curve, committed, target_offset);
                let abandoned = current.score < self.config.bands.busy_threshold;
                let displaced =
                    best.score >= current.score + self.config.bands.hysteresis_delta;
                if abandoned || displaced {
                    debug!(
                        from_hz = curve.slot_freq(committed),
                        to_hz = curve.slot_freq(best_slot),
                        old_score = current.score,
                        new_score = best.score,
                        "recommendation moved"
                    );
                    (best_slot, best)
                } else {
                    (committed, current)
                }
            }
            None => (best_slot, best),
        };
        state.committed_slot = Some(chosen_slot);

        let candidate = f64::from(self.candidate_freq(&curve, chosen_slot, chosen.proven));
        let smoothed = match state.smoothed_hz {
            Some(previous) => {
                let retained = self.config.smoothing_retained;
                retained * previous + (1.0 - retained) * candidate
            }
            None => candidate,
        };
        state.smoothed_hz = Some(smoothed);

        Recommendation {
            offset_hz: smoothed.round() as u32,
            score: chosen.score,
            is_proven: chosen.proven,
        }
    }

    /// Highest-scoring slot; ties go to the slot sitting in the widest
    /// open gap, so an empty band settles on the gap centre rather than
    /// its first slot.
    fn best_slot(&self, curve: &OccupancyCurve, target_offset: Option<u32>) -> (usize, SlotScore) {
        let threshold = self.config.gap_occupancy_threshold;
        let mut best_slot = 0;
        let mut best = self.score_slot(curve, 0, target_offset);
        let mut best_gap = curve.gap_around(0, threshold).0;

        for slot in 1..curve.slot_count() {
            let score = self.score_slot(curve, slot, target_offset);
            let gap = curve.gap_around(slot, threshold).0;
            let better = score.score > best.score + f64::EPSILON
                || ((score.score - best.score).abs() <= f64::EPSILON && gap > best_gap);
            if better {
                best_slot = slot;
                best = score;
                best_gap = gap;
            }
        }
        (best_slot, best)
    }

    fn score_slot(
        &self,
        curve: &OccupancyCurve,
        slot: usize,
        target_offset: Option<u32>,
    ) -> SlotScore {
        let bands = &self.config.bands;
        let freq = curve.slot_freq(slot);

        if curve.is_blocked(slot) {
            return SlotScore {
                score: bands.collision_floor,
                proven: false,
            };
        }
        if let Some(target) = target_offset {
            if freq.abs_diff(target) <= self.config.collision_tolerance_hz {
                return SlotScore {
                    score: bands.collision_floor,
                    proven: false,
                };
            }
        }

        let density = curve.tier1_density(slot);
        let score = match density {
            0 => {
                let estimate =
                    bands.unproven_base - curve.occupancy(slot) * UNPROVEN_OCCUPANCY_PENALTY;
                return SlotScore {
                    score: estimate.max(bands.unproven_floor),
                    proven: false,
                };
            }
            1..=3 => {
                let step = (bands.proven_light_max - bands.proven_light_min) / 2.0;
                bands.proven_light_max - f64::from(density - 1) * step
            }
            4..=5 => {
                let step = bands.proven_busy_max - bands.proven_busy_min;
                bands.proven_busy_max - f64::from(density - 4) * step
            }
            _ => {
                let step = (bands.proven_saturated_max - bands.proven_saturated_min) / 5.0;
                (bands.proven_saturated_max - f64::from(density - 6) * step)
                    .max(bands.proven_saturated_min)
            }
        };

        SlotScore {
            score,
            proven: true,
        }
    }

    /// The frequency a chosen slot maps to: proven slots anchor on the
    /// slot itself, open unproven slots on the centre of their gap.
    fn candidate_freq(&self, curve: &OccupancyCurve, slot: usize, proven: bool) -> u32 {
        if proven {
            return curve.slot_freq(slot);
        }
        let (width, center) = curve.gap_around(slot, self.config.gap_occupancy_threshold);
        if width == 0 {
            curve.slot_freq(slot)
        } else {
            center
        }
    }
}
