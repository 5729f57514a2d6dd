//! Geographic units and population profiles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::nutrient::Nutrient;
use super::warnings::DataWarning;

/// Stable identifier of a geographic unit (district, county, …).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitId(pub String);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One geographic unit of the planning snapshot.
///
/// Created once per planning cycle from the external data loader and
/// immutable during a run. Adequacy values are ratio-scale (1.0 = meets the
/// recommended intake); malformed inputs above 10.0 are rescaled by
/// [`GeographicUnit::sanitize`] before any scoring happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeographicUnit {
    pub id: UnitId,
    pub population: u64,
    pub children_under_5: u64,
    pub pregnant_women: u64,
    pub lactating_women: u64,
    /// Fraction of recommended intake per nutrient. Nominally ≤ 1 but
    /// upstream unit-scaling defects can produce values like 136.63.
    pub adequacy: BTreeMap<Nutrient, f64>,
    pub health_facilities: u32,
    /// Share of the unit's population below the poverty line.
    pub poverty_rate: super::Percent,
}

impl GeographicUnit {
    /// Correct implausible adequacy values in place and report what changed.
    ///
    /// Heuristic for the known upstream defect: a ratio above
    /// `rescale_threshold` (default 10.0, i.e. 1000%) is a percentage that
    /// leaked through as a ratio, so it is divided by 100. A corrected value
    /// still above `plausible_max` keeps an `OutOfRangeInput` warning flag —
    /// corrected, logged, never silently dropped.
    pub fn sanitize(
        &mut self,
        rescale_threshold: f64,
        plausible_max: f64,
    ) -> Vec<DataWarning> {
        let mut warnings = Vec::new();
        for (nutrient, adequacy) in &mut self.adequacy {
            if *adequacy > rescale_threshold {
                let original = *adequacy;
                *adequacy /= 100.0;
                warn!(
                    unit = %self.id,
                    nutrient = %nutrient,
                    original_percent = original * 100.0,
                    corrected_percent = *adequacy * 100.0,
                    "adequacy ratio rescaled (percentage supplied as ratio)"
                );
                warnings.push(DataWarning::AdequacyRescaled {
                    unit: self.id.clone(),
                    nutrient: *nutrient,
                    original,
                    corrected: *adequacy,
                });
            }
            if *adequacy > plausible_max {
                warn!(
                    unit = %self.id,
                    nutrient = %nutrient,
                    adequacy = *adequacy,
                    "adequacy ratio above plausible bound"
                );
                warnings.push(DataWarning::OutOfRangeInput {
                    unit: self.id.clone(),
                    nutrient: *nutrient,
                    adequacy: *adequacy,
                });
            }
        }
        warnings
    }

    /// Eligible population for anemia outcomes: young children plus
    /// pregnant and lactating women.
    pub fn anemia_risk_group(&self) -> u64 {
        self.children_under_5 + self.pregnant_women + self.lactating_women
    }
}

/// Aggregate population targeted by a sweep: either one unit or a sum over
/// the prioritized units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationProfile {
    pub total: u64,
    pub children_under_5: u64,
    pub pregnant_women: u64,
    pub lactating_women: u64,
}

impl PopulationProfile {
    /// Population targeted by interventions: children under five plus
    /// pregnant and lactating women.
    pub fn target_population(&self) -> u64 {
        self.children_under_5 + self.pregnant_women + self.lactating_women
    }

    pub fn anemia_risk_group(&self) -> u64 {
        self.children_under_5 + self.pregnant_women + self.lactating_women
    }

    /// Sum the sub-populations of a set of units.
    pub fn aggregate<'a>(units: impl IntoIterator<Item = &'a GeographicUnit>) -> Self {
        let mut profile = Self {
            total: 0,
            children_under_5: 0,
            pregnant_women: 0,
            lactating_women: 0,
        };
        for unit in units {
            profile.total += unit.population;
            profile.children_under_5 += unit.children_under_5;
            profile.pregnant_women += unit.pregnant_women;
            profile.lactating_women += unit.lactating_women;
        }
        profile
    }
}
