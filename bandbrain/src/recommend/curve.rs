//! Passband occupancy curve.

use crate::model::LocalDecode;
use crate::perspective::{Perspective, Tier, TierWeights};

use super::RecommendConfig;

/// The passband discretized into slots, with accumulated occupancy weight
/// and tier-1 signal density per slot.
///
/// Occupancy is a weighted "how loud is this part of the band" measure:
/// local decodes contribute at full weight, perspective spots at their
/// tier weight, each spread over the signal's footprint. Tier-1 density
/// counts overlapping signals the target demonstrably decodes, which
/// drives the proven score bands.
#[derive(Debug, Clone)]
pub struct OccupancyCurve {
    slot_hz: u32,
    occupancy: Vec<f64>,
    tier1_density: Vec<u32>,
    blocked: Vec<bool>,
}

impl OccupancyCurve {
    /// Build the curve from an already-fetched snapshot.
    ///
    /// Pure computation; the inputs were filtered for freshness when they
    /// were queried.
    pub fn build(
        perspective: &Perspective,
        local_decodes: &[LocalDecode],
        weights: &TierWeights,
        config: &RecommendConfig,
    ) -> Self {
        let slot_hz = config.slot_hz.max(1);
        let slots = (config.passband_hz / slot_hz).max(1) as usize;
        let mut curve = Self {
            slot_hz,
            occupancy: vec![0.0; slots],
            tier1_density: vec![0; slots],
            blocked: vec![false; slots],
        };

        // Edge guards count as occupied territory.
        for slot in 0..slots {
            let freq = curve.slot_freq(slot);
            if freq < config.edge_guard_hz || freq > config.passband_hz - config.edge_guard_hz {
                curve.blocked[slot] = true;
            }
        }

        for decode in local_decodes {
            curve.add_signal(decode.offset_hz, 1.0, false, config.half_width_hz);
        }

        for classified in perspective.iter() {
            let weight = weights.weight(classified.tier);
            let is_tier1 = classified.tier == Tier::Direct;
            curve.add_signal(
                classified.spot.offset_hz,
                weight,
                is_tier1,
                config.half_width_hz,
            );
        }

        curve
    }

    fn add_signal(&mut self, offset_hz: u32, weight: f64, tier1: bool, half_width_hz: u32) {
        let low = offset_hz.saturating_sub(half_width_hz);
        let high = offset_hz + half_width_hz;
        let first = (low / self.slot_hz) as usize;
        let last = ((high / self.slot_hz) as usize).min(self.occupancy.len().saturating_sub(1));
        for slot in first..=last {
            self.occupancy[slot] += weight;
            if tier1 {
                self.tier1_density[slot] += 1;
            }
        }
    }

    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.occupancy.len()
    }

    /// Centre frequency of a slot, in Hz.
    pub fn slot_freq(&self, slot: usize) -> u32 {
        slot as u32 * self.slot_hz + self.slot_hz / 2
    }

    /// Slot containing the given frequency.
    pub fn slot_of(&self, offset_hz: u32) -> usize {
        ((offset_hz / self.slot_hz) as usize).min(self.slot_count().saturating_sub(1))
    }

    /// Accumulated occupancy weight at a slot.
    pub fn occupancy(&self, slot: usize) -> f64 {
        self.occupancy[slot]
    }

    /// Tier-1 signal density at a slot.
    pub fn tier1_density(&self, slot: usize) -> u32 {
        self.tier1_density[slot]
    }

    /// Whether a slot falls inside an edge guard.
    pub fn is_blocked(&self, slot: usize) -> bool {
        self.blocked[slot]
    }

    /// Whether a slot is open for gap purposes.
    pub fn is_open(&self, slot: usize, occupancy_threshold: f64) -> bool {
        !self.blocked[slot] && self.occupancy[slot] < occupancy_threshold
    }

    /// The contiguous open gap containing `slot`, as
    /// `(width_in_slots, centre_frequency)`.
    ///
    /// Returns width 0 and the slot's own frequency when the slot itself
    /// is not open.
    pub fn gap_around(&self, slot: usize, occupancy_threshold: f64) -> (usize, u32) {
        if !self.is_open(slot, occupancy_threshold) {
            return (0, self.slot_freq(slot));
        }

        let mut start = slot;
        while start > 0 && self.is_open(start - 1, occupancy_threshold) {
            start -= 1;
        }
        let mut end = slot;
        while end + 1 < self.slot_count() && self.is_open(end + 1, occupancy_threshold) {
            end += 1;
        }

        let width = end - start + 1;
        let center = (self.slot_freq(start) + self.slot_freq(end)) / 2;
        (width, center)
    }

    /// True when nothing contributed any occupancy at all.
    pub fn is_silent(&self) -> bool {
        self.occupancy.iter().all(|&o| o == 0.0)
    }
}
