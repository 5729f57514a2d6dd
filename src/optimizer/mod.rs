//! Budget sweep and optimum selection.
//!
//! Evaluates evenly spaced budget points across a range, each point an
//! independent coverage → impact → valuation computation, then selects the
//! argmax scenario per metric and for the combined score. Points share no
//! state, so the sweep is a rayon data-parallel map; ordering is by budget
//! position, never by completion order.

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::coverage::{self, Coverage};
use crate::economics::{self, EconomicMetrics};
use crate::error::PlanError;
use crate::impact::{self, HealthImpact};
use crate::synergy::SynergyModel;
use crate::types::{InterventionMix, Nutrient, PopulationProfile};

/// One fully evaluated budget point. Value object, never mutated after the
/// sweep (the marginal column is filled in before the result is returned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub budget: f64,
    pub coverage: Coverage,
    pub impact: HealthImpact,
    pub metrics: EconomicMetrics,
    /// Budget per life saved; `None` when no lives are saved at this point.
    pub cost_per_life_saved: Option<f64>,
    pub cost_per_person_reached: Option<f64>,
    /// Finite-difference change in discounted benefits per unit of extra
    /// budget versus the previous point. `None` for the first scenario.
    pub marginal_benefit: Option<f64>,
}

/// The scenario curve plus the index of the best point per metric.
///
/// Optima are stored as indices into `scenarios`, so an optimum is by
/// construction an element of the curve. No recomputation drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Scenarios ordered by budget ascending.
    pub scenarios: Vec<Scenario>,
    pub best_financial: usize,
    pub best_economic: usize,
    pub best_social: usize,
    pub best_combined: usize,
    /// Budget at which coverage saturates for this population and mix.
    pub full_coverage_budget: f64,
}

impl OptimizationResult {
    pub fn best_financial_scenario(&self) -> &Scenario {
        &self.scenarios[self.best_financial]
    }

    pub fn best_economic_scenario(&self) -> &Scenario {
        &self.scenarios[self.best_economic]
    }

    pub fn best_social_scenario(&self) -> &Scenario {
        &self.scenarios[self.best_social]
    }

    pub fn best_combined_scenario(&self) -> &Scenario {
        &self.scenarios[self.best_combined]
    }
}

/// Sweep a budget range and select the optima.
///
/// Requires `0 < min < max` and at least two steps; every point must be a
/// valid budget for valuation, so a range touching zero is rejected here
/// rather than failing mid-sweep.
pub fn sweep(
    budget_min: f64,
    budget_max: f64,
    profile: &PopulationProfile,
    mix: &InterventionMix,
    nutrients: &BTreeSet<Nutrient>,
    config: &PlannerConfig,
) -> Result<OptimizationResult, PlanError> {
    let steps = config.sweep.steps;
    if steps < 2
        || !budget_min.is_finite()
        || !budget_max.is_finite()
        || budget_min <= 0.0
        || budget_max <= budget_min
    {
        return Err(PlanError::InvalidSweep {
            min: budget_min,
            max: budget_max,
            steps,
        });
    }
    mix.validate(config.coverage.mix_tolerance)?;

    let synergy = SynergyModel::from_config(&config.synergy);
    let target = profile.target_population();
    let spacing = (budget_max - budget_min) / (steps - 1) as f64;
    info!(
        budget_min,
        budget_max, steps, target, "starting budget sweep"
    );

    let mut scenarios: Vec<Scenario> = (0..steps)
        .into_par_iter()
        .map(|step| {
            let budget = budget_min + spacing * step as f64;
            evaluate(budget, target, profile, mix, nutrients, &synergy, config)
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Marginal benefits are a post-pass: each point stays independent
    // during the sweep, the finite difference is derived afterwards.
    for i in 1..scenarios.len() {
        let delta_budget = scenarios[i].budget - scenarios[i - 1].budget;
        let delta_benefit = scenarios[i].metrics.npv_benefits - scenarios[i - 1].metrics.npv_benefits;
        scenarios[i].marginal_benefit = Some(delta_benefit / delta_budget);
    }

    let result = OptimizationResult {
        best_financial: argmax(&scenarios, |s| s.metrics.financial_roi.value),
        best_economic: argmax(&scenarios, |s| s.metrics.economic_bcr.value),
        best_social: argmax(&scenarios, |s| s.metrics.social_value_ratio.value),
        best_combined: argmax(&scenarios, |s| s.metrics.combined_score),
        full_coverage_budget: coverage::full_coverage_budget(target, mix, config),
        scenarios,
    };
    debug!(
        best_combined_budget = result.best_combined_scenario().budget,
        "sweep complete"
    );
    Ok(result)
}

/// Evaluate a single budget point.
fn evaluate(
    budget: f64,
    target: u64,
    profile: &PopulationProfile,
    mix: &InterventionMix,
    nutrients: &BTreeSet<Nutrient>,
    synergy: &SynergyModel,
    config: &PlannerConfig,
) -> Result<Scenario, PlanError> {
    let cov: Coverage = coverage::coverage(budget, target, mix, config)?;
    let impact: HealthImpact = impact::project(&cov, profile, nutrients, synergy, config)?;
    let metrics = economics::valuate(&impact, budget, config)?;
    Ok(Scenario {
        budget,
        cost_per_life_saved: (impact.lives_saved.count > 0)
            .then(|| budget / impact.lives_saved.count as f64),
        cost_per_person_reached: (impact.people_reached > 0)
            .then(|| budget / impact.people_reached as f64),
        coverage: cov,
        impact,
        metrics,
        marginal_benefit: None,
    })
}

/// Index of the maximum; scenarios are budget-ascending and only a strictly
/// greater value displaces the incumbent, so ties go to the lowest budget.
fn argmax(scenarios: &[Scenario], score: impl Fn(&Scenario) -> f64) -> usize {
    let mut best = 0;
    for (i, scenario) in scenarios.iter().enumerate() {
        if score(scenario) > score(&scenarios[best]) {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InterventionType;
    use std::collections::BTreeMap;

    fn profile() -> PopulationProfile {
        PopulationProfile {
            total: 45_000_000,
            children_under_5: 6_750_000,
            pregnant_women: 1_700_000,
            lactating_women: 2_000_000,
        }
    }

    fn mix() -> InterventionMix {
        InterventionMix(BTreeMap::from([
            (InterventionType::Fortification, 0.4),
            (InterventionType::Supplementation, 0.3),
            (InterventionType::Biofortification, 0.2),
            (InterventionType::DietaryDiversification, 0.1),
        ]))
    }

    fn nutrients() -> BTreeSet<Nutrient> {
        [Nutrient::Iron, Nutrient::VitaminB12, Nutrient::VitaminC]
            .into_iter()
            .collect()
    }

    fn run(config: &PlannerConfig) -> OptimizationResult {
        sweep(
            1_000_000_000.0,
            500_000_000_000.0,
            &profile(),
            &mix(),
            &nutrients(),
            config,
        )
        .unwrap()
    }

    #[test]
    fn scenarios_are_budget_ordered_and_sized() {
        let config = PlannerConfig::default();
        let result = run(&config);
        assert_eq!(result.scenarios.len(), config.sweep.steps);
        for pair in result.scenarios.windows(2) {
            assert!(pair[0].budget < pair[1].budget);
            assert!(pair[0].coverage.ratio.get() <= pair[1].coverage.ratio.get());
        }
    }

    #[test]
    fn optima_point_into_the_sequence() {
        let config = PlannerConfig::default();
        let result = run(&config);
        for index in [
            result.best_financial,
            result.best_economic,
            result.best_social,
            result.best_combined,
        ] {
            assert!(index < result.scenarios.len());
        }
        // Accessors agree with the stored indices
        assert_eq!(
            result.best_combined_scenario().budget,
            result.scenarios[result.best_combined].budget
        );
    }

    #[test]
    fn sweep_is_deterministic() {
        let config = PlannerConfig::default();
        let a = serde_json::to_string(&run(&config)).unwrap();
        let b = serde_json::to_string(&run(&config)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ties_resolve_to_the_lowest_budget() {
        let mut config = PlannerConfig::default();
        // Degenerate ranges clamp every metric to a single value, making
        // all scenarios score-equal.
        for range in [
            &mut config.economics.financial_roi_range,
            &mut config.economics.economic_bcr_range,
            &mut config.economics.social_value_range,
        ] {
            range.hard_min = 1.0;
            range.hard_max = 1.0;
            range.typical_min = 1.0;
            range.typical_max = 1.0;
        }
        let result = run(&config);
        assert_eq!(result.best_financial, 0);
        assert_eq!(result.best_economic, 0);
        assert_eq!(result.best_social, 0);
        assert_eq!(result.best_combined, 0);
    }

    #[test]
    fn marginal_benefit_is_a_post_pass() {
        let config = PlannerConfig::default();
        let result = run(&config);
        assert!(result.scenarios[0].marginal_benefit.is_none());
        assert!(result.scenarios[1..]
            .iter()
            .all(|s| s.marginal_benefit.is_some()));
    }

    #[test]
    fn marginal_benefit_vanishes_past_saturation() {
        let config = PlannerConfig::default();
        let result = run(&config);
        // The range extends beyond the full-coverage budget, so the last
        // interval buys no additional benefit.
        assert!(result.full_coverage_budget < 500_000_000_000.0);
        let last = result.scenarios.last().unwrap();
        assert_eq!(last.coverage.ratio.get(), 1.0);
        assert_eq!(last.marginal_benefit, Some(0.0));
    }

    #[test]
    fn degenerate_ranges_are_rejected() {
        let config = PlannerConfig::default();
        let p = profile();
        let err = sweep(0.0, 1e9, &p, &mix(), &nutrients(), &config).unwrap_err();
        assert!(matches!(err, PlanError::InvalidSweep { .. }));
        let err = sweep(1e9, 1e9, &p, &mix(), &nutrients(), &config).unwrap_err();
        assert!(matches!(err, PlanError::InvalidSweep { .. }));

        let mut config = PlannerConfig::default();
        config.sweep.steps = 1;
        let err = sweep(1e9, 2e9, &p, &mix(), &nutrients(), &config).unwrap_err();
        assert!(matches!(err, PlanError::InvalidSweep { steps: 1, .. }));
    }

    #[test]
    fn invalid_mix_fails_the_whole_sweep() {
        let config = PlannerConfig::default();
        let bad = InterventionMix(BTreeMap::from([(InterventionType::Fortification, 0.97)]));
        let err = sweep(1e9, 1e10, &profile(), &bad, &nutrients(), &config).unwrap_err();
        assert!(matches!(err, PlanError::InvalidMix { .. }));
    }
}
