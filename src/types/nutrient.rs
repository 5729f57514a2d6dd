//! Tracked nutrients and deficiency tiers.

use serde::{Deserialize, Serialize};

/// The closed set of nutrients tracked by the adequacy snapshots.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Calcium,
    Iron,
    Zinc,
    Folate,
    Niacin,
    Riboflavin,
    Thiamin,
    VitaminA,
    VitaminB12,
    VitaminB6,
    VitaminC,
    Protein,
    Energy,
}

impl Nutrient {
    /// All tracked nutrients, in canonical (sort) order.
    pub const ALL: [Self; 13] = [
        Self::Calcium,
        Self::Iron,
        Self::Zinc,
        Self::Folate,
        Self::Niacin,
        Self::Riboflavin,
        Self::Thiamin,
        Self::VitaminA,
        Self::VitaminB12,
        Self::VitaminB6,
        Self::VitaminC,
        Self::Protein,
        Self::Energy,
    ];
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Calcium => "calcium",
            Self::Iron => "iron",
            Self::Zinc => "zinc",
            Self::Folate => "folate",
            Self::Niacin => "niacin",
            Self::Riboflavin => "riboflavin",
            Self::Thiamin => "thiamin",
            Self::VitaminA => "vitamin_a",
            Self::VitaminB12 => "vitamin_b12",
            Self::VitaminB6 => "vitamin_b6",
            Self::VitaminC => "vitamin_c",
            Self::Protein => "protein",
            Self::Energy => "energy",
        };
        f.write_str(name)
    }
}

/// Deficiency severity derived from an adequacy ratio against configured
/// thresholds. Recomputed on demand, never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeficiencyTier {
    None,
    Moderate,
    Severe,
}

impl DeficiencyTier {
    /// Classify an adequacy ratio (fraction of recommended intake).
    ///
    /// `moderate_below` and `severe_below` are ratio-scale thresholds,
    /// e.g. 0.8 and 0.5.
    pub fn classify(adequacy_ratio: f64, moderate_below: f64, severe_below: f64) -> Self {
        if adequacy_ratio < severe_below {
            Self::Severe
        } else if adequacy_ratio < moderate_below {
            Self::Moderate
        } else {
            Self::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(DeficiencyTier::classify(0.3, 0.8, 0.5), DeficiencyTier::Severe);
        assert_eq!(DeficiencyTier::classify(0.5, 0.8, 0.5), DeficiencyTier::Moderate);
        assert_eq!(DeficiencyTier::classify(0.79, 0.8, 0.5), DeficiencyTier::Moderate);
        assert_eq!(DeficiencyTier::classify(0.8, 0.8, 0.5), DeficiencyTier::None);
        assert_eq!(DeficiencyTier::classify(1.2, 0.8, 0.5), DeficiencyTier::None);
    }
}
