//! Health impact projection.
//!
//! Converts a coverage outcome into counts of lives saved, stunting cases
//! prevented, and anemia cases prevented, using externally supplied
//! epidemiological baselines and reduction rates. Counts round down so
//! impact is never overstated, and a count exceeding its eligible
//! population is a typed error, never a silent cap.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use statrs::function::erf::erf_inv;

use crate::config::PlannerConfig;
use crate::coverage::Coverage;
use crate::error::PlanError;
use crate::synergy::SynergyModel;
use crate::types::{Nutrient, PopulationProfile};

/// One projected outcome count with its normal-approximation interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCount {
    pub count: u64,
    /// Lower bound of the confidence interval, floored at zero.
    pub ci_low: u64,
    pub ci_high: u64,
}

/// Projected health outcomes for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthImpact {
    pub lives_saved: OutcomeCount,
    pub stunting_prevented: OutcomeCount,
    pub anemia_prevented: OutcomeCount,
    /// Disability-adjusted life years averted across outcomes.
    pub dalys_averted: f64,
    pub people_reached: u64,
    /// Compounded synergy multiplier applied to every outcome.
    pub synergy_multiplier: f64,
}

/// Project health outcomes for a coverage result over a population profile.
///
/// Each count is `floor(reached × baseline × reduction × synergy ×
/// efficiency)` where `reached` is coverage applied to the outcome's
/// eligible group: children under five for mortality and stunting, the
/// anemia risk group (children plus pregnant and lactating women) for
/// anemia.
pub fn project(
    coverage: &Coverage,
    profile: &PopulationProfile,
    nutrients: &BTreeSet<Nutrient>,
    synergy: &SynergyModel,
    config: &PlannerConfig,
) -> Result<HealthImpact, PlanError> {
    let epi = &config.epidemiology;
    let multiplier = synergy.combined_multiplier(nutrients);
    let scale = multiplier * coverage.efficiency;
    let ratio = coverage.ratio.get();

    let reached_children = profile.children_under_5 as f64 * ratio;
    let reached_women = (profile.pregnant_women + profile.lactating_women) as f64 * ratio;

    let lives = count_outcome(
        reached_children * epi.u5_mortality_rate * epi.mortality_reduction * scale,
        profile.children_under_5,
        "lives_saved",
        epi,
    )?;
    let stunting = count_outcome(
        reached_children * epi.stunting_prevalence * epi.stunting_reduction * scale,
        profile.children_under_5,
        "stunting_prevented",
        epi,
    )?;
    let anemia = count_outcome(
        (reached_children * epi.anemia_child_prevalence
            + reached_women * epi.anemia_women_prevalence)
            * epi.anemia_reduction
            * scale,
        profile.anemia_risk_group(),
        "anemia_prevented",
        epi,
    )?;

    let people_reached = (profile.target_population() as f64 * ratio).floor() as u64;
    Ok(HealthImpact {
        lives_saved: lives,
        stunting_prevented: stunting,
        anemia_prevented: anemia,
        dalys_averted: lives.count as f64 * epi.dalys_per_life_saved
            + stunting.count as f64 * epi.dalys_per_stunting_prevented,
        people_reached,
        synergy_multiplier: multiplier,
    })
}

/// Floor a raw expected count, attach its confidence interval, and reject
/// counts that exceed the eligible population.
fn count_outcome(
    raw: f64,
    eligible: u64,
    outcome: &'static str,
    epi: &crate::config::EpidemiologyConfig,
) -> Result<OutcomeCount, PlanError> {
    let count = raw.max(0.0).floor() as u64;
    if count > eligible {
        return Err(PlanError::ImpactExceedsEligible {
            outcome,
            count,
            eligible,
        });
    }

    // Normal approximation: sd = cv × count, two-sided interval.
    let z = std::f64::consts::SQRT_2 * erf_inv(epi.confidence_level_percent / 100.0);
    let half_width = z * epi.outcome_cv * count as f64;
    let ci_low = (count as f64 - half_width).max(0.0).floor() as u64;
    let ci_high = ((count as f64 + half_width).ceil() as u64).min(eligible);
    Ok(OutcomeCount {
        count,
        ci_low,
        ci_high,
    })
}
