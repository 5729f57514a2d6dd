//! Intervention catalogue and mix validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

use super::units::Ratio;

/// The closed set of intervention channels the planner allocates across.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InterventionType {
    Fortification,
    Supplementation,
    Biofortification,
    DietaryDiversification,
}

impl InterventionType {
    pub const ALL: [Self; 4] = [
        Self::Fortification,
        Self::Supplementation,
        Self::Biofortification,
        Self::DietaryDiversification,
    ];
}

impl std::fmt::Display for InterventionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Fortification => "fortification",
            Self::Supplementation => "supplementation",
            Self::Biofortification => "biofortification",
            Self::DietaryDiversification => "dietary_diversification",
        };
        f.write_str(name)
    }
}

/// Fixed per-intervention cost/effectiveness configuration.
/// Loaded once, read-only thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterventionProfile {
    /// Annual delivery cost per person reached.
    pub annual_cost_per_person: f64,
    /// Base effectiveness in (0, 1].
    pub effectiveness: Ratio,
    /// Achievable coverage ceiling in (0, 1] — logistics saturate before
    /// reaching everyone regardless of budget.
    pub coverage_ceiling: Ratio,
}

/// A budget split across intervention channels, as fractions of the total.
///
/// Fractions must sum to 1.0 within the configured tolerance; anything else
/// is an [`PlanError::InvalidMix`], never a silent renormalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterventionMix(pub BTreeMap<InterventionType, f64>);

impl InterventionMix {
    /// Validate that fractions are non-negative and sum to 1 ± `tolerance`.
    pub fn validate(&self, tolerance: f64) -> Result<(), PlanError> {
        let sum: f64 = self.0.values().sum();
        if self.0.values().any(|f| *f < 0.0 || !f.is_finite())
            || (sum - 1.0).abs() > tolerance
        {
            return Err(PlanError::InvalidMix { sum, tolerance });
        }
        Ok(())
    }

    /// Mix-fraction-weighted average of a per-intervention attribute.
    ///
    /// Only meaningful after [`Self::validate`]; fractions are used as-is.
    pub fn weighted<F>(&self, profiles: &BTreeMap<InterventionType, InterventionProfile>, f: F) -> f64
    where
        F: Fn(&InterventionProfile) -> f64,
    {
        self.0
            .iter()
            .filter_map(|(kind, fraction)| profiles.get(kind).map(|p| fraction * f(p)))
            .sum()
    }
}
