//! Confidence tiers and their weights.

/// Confidence ranking of a spot's relevance to the target's actual RF
/// environment, from the target's own reports down to global activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// The target's own reception reports.
    Direct,
    /// Reports from receivers in the target's 4-char grid square.
    SameSquare,
    /// Reports from receivers in the target's 2-char grid field.
    SameField,
    /// Everything else recent on the band.
    Global,
}

impl Tier {
    /// All tiers in priority order, highest confidence first.
    pub const ALL: [Tier; 4] = [Tier::Direct, Tier::SameSquare, Tier::SameField, Tier::Global];
}

/// Downstream weight carried by each tier.
///
/// These are configuration, not derived values. The defaults are the
/// documented 1.0 / 0.8 / 0.5 / 0.3 ladder the recommendation engine
/// multiplies occupancy contributions by.
#[derive(Debug, Clone, PartialEq)]
pub struct TierWeights {
    /// Weight for [`Tier::Direct`].
    pub direct: f64,
    /// Weight for [`Tier::SameSquare`].
    pub same_square: f64,
    /// Weight for [`Tier::SameField`].
    pub same_field: f64,
    /// Weight for [`Tier::Global`].
    pub global: f64,
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            direct: 1.0,
            same_square: 0.8,
            same_field: 0.5,
            global: 0.3,
        }
    }
}

impl TierWeights {
    /// Weight for the given tier.
    pub fn weight(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Direct => self.direct,
            Tier::SameSquare => self.same_square,
            Tier::SameField => self.same_field,
            Tier::Global => self.global,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_ordered_by_confidence() {
        assert!(Tier::Direct < Tier::SameSquare);
        assert!(Tier::SameSquare < Tier::SameField);
        assert!(Tier::SameField < Tier::Global);
    }

    #[test]
    fn default_weights_descend() {
        let weights = TierWeights::default();
        assert_eq!(weights.weight(Tier::Direct), 1.0);
        assert_eq!(weights.weight(Tier::SameSquare), 0.8);
        assert_eq!(weights.weight(Tier::SameField), 0.5);
        assert_eq!(weights.weight(Tier::Global), 0.3);
    }
}
