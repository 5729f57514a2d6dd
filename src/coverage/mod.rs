//! Coverage and diminishing-returns model.
//!
//! Translates a budget and intervention mix into the fraction of the target
//! population reached and a delivery efficiency factor. Coverage is linear
//! in budget up to full coverage and hard-capped at 1.0; the pre-clamp
//! ratio is preserved as an oversupply diagnostic instead of being reported
//! as a coverage above 100%.

use tracing::warn;

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::types::{DataWarning, InterventionMix, Ratio};

/// Coverage outcome for one (budget, population, mix) scenario.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coverage {
    /// Fraction of the target population reached, clamped to `[0, 1]`.
    pub ratio: Ratio,
    /// Pre-clamp budget/need ratio. Values above 1 mean the budget exceeds
    /// what full coverage costs; the excess buys nothing.
    pub raw_ratio: f64,
    /// Delivery efficiency after diminishing returns, in `[floor, 1]`.
    pub efficiency: f64,
    /// Mix-weighted annual cost per person reached.
    pub weighted_cost: f64,
    /// Mix-weighted base effectiveness of the intervention portfolio.
    pub weighted_effectiveness: f64,
    /// People reached at this coverage, rounded down.
    pub people_reached: u64,
    /// Non-fatal diagnostics for this scenario.
    pub warnings: Vec<DataWarning>,
}

/// Compute coverage for a budget over a target population under a mix.
///
/// Errors on a non-finite or negative budget, an empty target population,
/// or a mix whose fractions do not sum to 1 within tolerance. A zero budget
/// is valid and yields zero coverage at full efficiency.
pub fn coverage(
    budget: f64,
    target_population: u64,
    mix: &InterventionMix,
    config: &PlannerConfig,
) -> Result<Coverage, PlanError> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(PlanError::InvalidBudget(budget));
    }
    if target_population == 0 {
        return Err(PlanError::InvalidTarget(target_population));
    }
    mix.validate(config.coverage.mix_tolerance)?;

    let weighted_cost = mix.weighted(&config.interventions, |p| p.annual_cost_per_person);
    if weighted_cost <= 0.0 {
        return Err(PlanError::Config(
            "intervention mix resolves to a non-positive cost per person".into(),
        ));
    }
    let weighted_effectiveness = mix.weighted(&config.interventions, |p| p.effectiveness.get());
    let achievable_ceiling = mix.weighted(&config.interventions, |p| p.coverage_ceiling.get());

    let raw_ratio = budget / (target_population as f64 * weighted_cost);
    let ratio = Ratio::clamped(raw_ratio);

    let mut warnings = Vec::new();
    if ratio.get() > achievable_ceiling {
        let w = DataWarning::CoverageAboveAchievableCeiling {
            coverage: ratio.get(),
            achievable_ceiling,
        };
        warn!("{w}");
        warnings.push(w);
    }
    if raw_ratio > 1.0 {
        warn!(
            raw_ratio,
            "budget exceeds full-coverage cost; excess is unspent"
        );
    }

    let c = &config.coverage;
    let efficiency = (1.0 - c.diminishing_returns_factor * ratio.get()).max(c.efficiency_floor);
    let people_reached = (target_population as f64 * ratio.get()).floor() as u64;

    Ok(Coverage {
        ratio,
        raw_ratio,
        efficiency,
        weighted_cost,
        weighted_effectiveness,
        people_reached,
        warnings,
    })
}

/// The budget at which coverage saturates for this population and mix.
/// Purely diagnostic; useful for sizing sweep ranges.
pub fn full_coverage_budget(
    target_population: u64,
    mix: &InterventionMix,
    config: &PlannerConfig,
) -> f64 {
    let weighted_cost = mix.weighted(&config.interventions, |p| p.annual_cost_per_person);
    target_population as f64 * weighted_cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InterventionProfile, InterventionType};
    use std::collections::BTreeMap;

    fn supplementation_only() -> InterventionMix {
        InterventionMix(BTreeMap::from([(InterventionType::Supplementation, 1.0)]))
    }

    /// Config with a flat 40,000/person cost so scenarios are hand-checkable.
    fn flat_cost_config() -> PlannerConfig {
        let mut config = PlannerConfig::default();
        config.interventions.insert(
            InterventionType::Supplementation,
            InterventionProfile {
                annual_cost_per_person: 40_000.0,
                effectiveness: Ratio::clamped(0.73),
                coverage_ceiling: Ratio::clamped(0.60),
            },
        );
        config
    }

    #[test]
    fn national_scenario_matches_hand_calculation() {
        // 50B budget over 11.1M people at 40,000/person reaches ~11.2%
        let config = flat_cost_config();
        let cov = coverage(
            50_000_000_000.0,
            11_146_856,
            &supplementation_only(),
            &config,
        )
        .unwrap();
        assert!((cov.ratio.get() - 0.11214).abs() < 5e-4);
        assert!((cov.efficiency - 0.9664).abs() < 5e-4);
        assert_eq!(cov.people_reached, 1_250_000);
        assert!(cov.warnings.is_empty());
    }

    #[test]
    fn oversupply_clamps_and_keeps_raw_ratio() {
        let config = flat_cost_config();
        // 10× the full-coverage cost
        let budget = 10.0 * full_coverage_budget(100_000, &supplementation_only(), &config);
        let cov = coverage(budget, 100_000, &supplementation_only(), &config).unwrap();
        assert_eq!(cov.ratio.get(), 1.0);
        assert!((cov.raw_ratio - 10.0).abs() < 1e-9);
        assert_eq!(cov.people_reached, 100_000);
    }

    #[test]
    fn efficiency_floors_at_configured_minimum() {
        let mut config = flat_cost_config();
        config.coverage.diminishing_returns_factor = 0.5;
        config.coverage.efficiency_floor = 0.7;
        let budget = full_coverage_budget(100_000, &supplementation_only(), &config);
        let cov = coverage(budget, 100_000, &supplementation_only(), &config).unwrap();
        // 1 − 0.5×1.0 = 0.5 would undercut the floor
        assert_eq!(cov.efficiency, 0.7);
    }

    #[test]
    fn coverage_is_monotone_in_budget() {
        let config = PlannerConfig::default();
        let mix = InterventionMix(BTreeMap::from([
            (InterventionType::Fortification, 0.5),
            (InterventionType::Supplementation, 0.5),
        ]));
        let mut last = -1.0;
        for step in 0..20 {
            let budget = f64::from(step) * 25_000_000_000.0;
            let cov = coverage(budget, 11_146_856, &mix, &config).unwrap();
            assert!(cov.ratio.get() >= last);
            last = cov.ratio.get();
        }
    }

    #[test]
    fn zero_budget_is_zero_coverage_not_error() {
        let config = PlannerConfig::default();
        let cov = coverage(0.0, 100_000, &supplementation_only(), &config).unwrap();
        assert_eq!(cov.ratio.get(), 0.0);
        assert_eq!(cov.efficiency, 1.0);
        assert_eq!(cov.people_reached, 0);
    }

    #[test]
    fn negative_budget_is_rejected() {
        let config = PlannerConfig::default();
        let err = coverage(-1.0, 100_000, &supplementation_only(), &config).unwrap_err();
        assert!(matches!(err, PlanError::InvalidBudget(_)));
    }

    #[test]
    fn zero_population_is_rejected() {
        let config = PlannerConfig::default();
        let err = coverage(1e9, 0, &supplementation_only(), &config).unwrap_err();
        assert!(matches!(err, PlanError::InvalidTarget(0)));
    }

    #[test]
    fn invalid_mix_is_rejected_before_any_math() {
        let config = PlannerConfig::default();
        let mix = InterventionMix(BTreeMap::from([
            (InterventionType::Fortification, 0.5),
            (InterventionType::Supplementation, 0.47),
        ]));
        let err = coverage(1e9, 100_000, &mix, &config).unwrap_err();
        assert!(matches!(err, PlanError::InvalidMix { .. }));
    }

    #[test]
    fn coverage_past_logistics_ceiling_warns() {
        let config = flat_cost_config();
        // Supplementation saturates at 60% achievable coverage
        let budget = 0.9 * full_coverage_budget(100_000, &supplementation_only(), &config);
        let cov = coverage(budget, 100_000, &supplementation_only(), &config).unwrap();
        assert!(cov
            .warnings
            .iter()
            .any(|w| matches!(w, DataWarning::CoverageAboveAchievableCeiling { .. })));
    }
}
