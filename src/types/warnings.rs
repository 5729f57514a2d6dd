//! Structured data-quality warnings.
//!
//! Warnings accompany results instead of replacing them: a planning run
//! with anomalous inputs still produces numbers, but every correction or
//! exclusion is visible to the caller (and mirrored to the log).

use serde::{Deserialize, Serialize};

use super::geography::UnitId;
use super::nutrient::Nutrient;

/// A recoverable data-quality anomaly recorded during a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// Adequacy arrived on the percentage scale and was divided by 100.
    AdequacyRescaled {
        unit: UnitId,
        nutrient: Nutrient,
        original: f64,
        corrected: f64,
    },
    /// Adequacy remains implausibly high after correction.
    OutOfRangeInput {
        unit: UnitId,
        nutrient: Nutrient,
        adequacy: f64,
    },
    /// A unit references a nutrient absent from the scoring weight table.
    /// The term is excluded from that unit's CNRI, never zeroed.
    MissingNutrientWeight { unit: UnitId, nutrient: Nutrient },
    /// Clamped coverage exceeds the mix's achievable coverage ceiling;
    /// the budget buys more reach than the interventions can deliver.
    CoverageAboveAchievableCeiling {
        coverage: f64,
        achievable_ceiling: f64,
    },
}

impl std::fmt::Display for DataWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AdequacyRescaled {
                unit,
                nutrient,
                original,
                corrected,
            } => write!(
                f,
                "{unit}/{nutrient}: adequacy {:.2}% rescaled to {:.2}%",
                original * 100.0,
                corrected * 100.0
            ),
            Self::OutOfRangeInput {
                unit,
                nutrient,
                adequacy,
            } => write!(
                f,
                "{unit}/{nutrient}: adequacy {:.2}% above plausible bound",
                adequacy * 100.0
            ),
            Self::MissingNutrientWeight { unit, nutrient } => write!(
                f,
                "{unit}/{nutrient}: no scoring weight configured, term excluded"
            ),
            Self::CoverageAboveAchievableCeiling {
                coverage,
                achievable_ceiling,
            } => write!(
                f,
                "coverage {:.1}% exceeds achievable ceiling {:.1}%",
                coverage * 100.0,
                achievable_ceiling * 100.0
            ),
        }
    }
}
