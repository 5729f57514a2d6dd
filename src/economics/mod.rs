//! Three-tier economic valuation.
//!
//! Financial ROI, Economic BCR, and Social Value Ratio answer different
//! questions over different horizons and discount rates. The motivating
//! defect in this domain is a 40-year social value presented as a 1-year
//! financial return, so the three metrics are computed, clamped, and
//! reported independently and are never merged. The combined optimization
//! score is a separate, explicitly weighted figure.

use serde::{Deserialize, Serialize};

use crate::config::{EconomicsConfig, OutcomeValues, PlannerConfig};
use crate::error::PlanError;
use crate::impact::HealthImpact;
use crate::types::{MetricUnit, MetricValue};

/// The three return metrics plus the separate weighted ranking score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicMetrics {
    /// Year-1 financial return on budget, in percent.
    pub financial_roi: MetricValue,
    /// Discounted benefit-cost ratio over the multi-year horizon.
    pub economic_bcr: MetricValue,
    /// Discounted lifetime social value per unit budget.
    pub social_value_ratio: MetricValue,
    /// Weighted combination of the three metrics, each normalized by its
    /// typical upper bound. A ranking device, not a fourth return metric.
    pub combined_score: f64,
    /// Undiscounted year-1 return backing the ROI, in currency.
    pub year1_return: f64,
    /// NPV of benefits and of the front-loaded cost schedule.
    pub npv_benefits: f64,
    pub npv_costs: f64,
}

/// Discounted cash-flow sum with flows starting at year 1.
pub fn npv(rate: f64, cash_flows: impl IntoIterator<Item = f64>) -> f64 {
    cash_flows
        .into_iter()
        .enumerate()
        .map(|(i, cf)| cf / (1.0 + rate).powi(i as i32 + 1))
        .sum()
}

/// Monetary value of an impact at one set of per-outcome rates.
fn outcome_value(impact: &HealthImpact, rates: &OutcomeValues) -> f64 {
    impact.lives_saved.count as f64 * rates.per_life_saved
        + impact.stunting_prevented.count as f64 * rates.per_stunting_prevented
        + impact.anemia_prevented.count as f64 * rates.per_anemia_prevented
}

/// Value an impact against a budget.
///
/// Budget must be positive; the three ratios are undefined at zero spend.
pub fn valuate(
    impact: &HealthImpact,
    budget: f64,
    config: &PlannerConfig,
) -> Result<EconomicMetrics, PlanError> {
    if !budget.is_finite() || budget <= 0.0 {
        return Err(PlanError::InvalidBudget(budget));
    }
    let econ = &config.economics;

    // Financial: immediate rates, ramp-up friction, one year only.
    let year1_return = outcome_value(impact, &econ.immediate) * econ.first_year_factor;
    let raw_roi = (year1_return - budget) / budget * 100.0;
    let financial_roi = econ.financial_roi_range.apply(raw_roi, MetricUnit::Percent);

    // Economic: year 1 at immediate rates with the ramp-up factor, later
    // years at recurring rates, against the front-loaded cost schedule.
    let recurring = outcome_value(impact, &econ.recurring);
    let benefits =
        (1..=econ.horizon_years).map(|year| if year == 1 { year1_return } else { recurring });
    let npv_benefits = npv(econ.economic_discount_rate, benefits);
    let npv_costs = npv(
        econ.economic_discount_rate,
        econ.cost_schedule.iter().map(|share| share * budget),
    );
    let raw_bcr = if npv_costs > 0.0 {
        npv_benefits / npv_costs
    } else {
        0.0
    };
    let economic_bcr = econ.economic_bcr_range.apply(raw_bcr, MetricUnit::Ratio);

    // Social: lifetime valuation discounted once at the horizon midpoint.
    let lifetime = outcome_value(impact, &econ.lifetime) * econ.intergenerational_bonus;
    let discounted_lifetime =
        lifetime / (1.0 + econ.social_discount_rate).powf(econ.horizon_midpoint_years);
    let social_value_ratio = econ
        .social_value_range
        .apply(discounted_lifetime / budget, MetricUnit::Ratio);

    Ok(EconomicMetrics {
        financial_roi,
        economic_bcr,
        social_value_ratio,
        combined_score: combined_score(econ, financial_roi, economic_bcr, social_value_ratio),
        year1_return,
        npv_benefits,
        npv_costs,
    })
}

/// Weighted combination over typical-bound-normalized metrics.
fn combined_score(
    econ: &EconomicsConfig,
    roi: MetricValue,
    bcr: MetricValue,
    svr: MetricValue,
) -> f64 {
    let w = econ.combined_weights;
    w.financial * (roi.value / econ.financial_roi_range.typical_max)
        + w.economic * (bcr.value / econ.economic_bcr_range.typical_max)
        + w.social * (svr.value / econ.social_value_range.typical_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impact::OutcomeCount;

    fn counts(lives: u64, stunting: u64, anemia: u64) -> HealthImpact {
        let c = |count| OutcomeCount {
            count,
            ci_low: count,
            ci_high: count,
        };
        HealthImpact {
            lives_saved: c(lives),
            stunting_prevented: c(stunting),
            anemia_prevented: c(anemia),
            dalys_averted: lives as f64 * 30.0 + stunting as f64 * 5.0,
            people_reached: 1_000_000,
            synergy_multiplier: 1.0,
        }
    }

    #[test]
    fn npv_discounts_from_year_one() {
        let flows = vec![100.0, 100.0];
        let value = npv(0.05, flows);
        let expected = 100.0 / 1.05 + 100.0 / (1.05 * 1.05);
        assert!((value - expected).abs() < 1e-9);
    }

    #[test]
    fn financial_roi_matches_hand_calculation() {
        let config = PlannerConfig::default();
        // 100 lives × 5M + 1,000 stunting × 500K + 10,000 anemia × 100K
        // = 2.0B immediate, × 0.6 ramp-up = 1.2B year-1 return
        let impact = counts(100, 1_000, 10_000);
        let metrics = valuate(&impact, 1_000_000_000.0, &config).unwrap();
        assert!((metrics.year1_return - 1_200_000_000.0).abs() < 1.0);
        // (1.2B − 1.0B) / 1.0B × 100 = 20%
        assert!((metrics.financial_roi.value - 20.0).abs() < 1e-6);
        assert_eq!(metrics.financial_roi.unit, MetricUnit::Percent);
        assert!(!metrics.financial_roi.clamped);
        assert!(!metrics.financial_roi.outside_typical);
    }

    #[test]
    fn bcr_uses_recurring_rates_after_year_one() {
        let config = PlannerConfig::default();
        let impact = counts(100, 1_000, 10_000);
        let budget = 1_000_000_000.0;
        let metrics = valuate(&impact, budget, &config).unwrap();

        let immediate = 2_000_000_000.0 * 0.6;
        // 100×1M + 1,000×250K + 10,000×50K = 850M recurring
        let recurring = 850_000_000.0;
        let r = 0.05;
        let expected_benefits: f64 = (1..=5)
            .map(|t| {
                let cf = if t == 1 { immediate } else { recurring };
                cf / (1.0_f64 + r).powi(t)
            })
            .sum();
        let expected_costs = 0.6 * budget / 1.05 + 0.4 * budget / (1.05 * 1.05);
        assert!((metrics.npv_benefits - expected_benefits).abs() < 1.0);
        assert!((metrics.npv_costs - expected_costs).abs() < 1.0);
        assert!(
            (metrics.economic_bcr.value - expected_benefits / expected_costs).abs() < 1e-9
        );
        assert_eq!(metrics.economic_bcr.unit, MetricUnit::Ratio);
    }

    #[test]
    fn social_value_discounts_lifetime_once_at_midpoint() {
        let config = PlannerConfig::default();
        let impact = counts(10, 0, 0);
        let budget = 1_000_000_000.0;
        let metrics = valuate(&impact, budget, &config).unwrap();
        // 10 × 150M VSL × 1.15 bonus, discounted 20 years at 3%
        let expected = 10.0 * 150_000_000.0 * 1.15 / 1.03_f64.powf(20.0) / budget;
        assert!((metrics.social_value_ratio.value - expected).abs() < 1e-9);
    }

    #[test]
    fn runaway_metric_is_clamped_and_flagged() {
        let config = PlannerConfig::default();
        // Enormous impact on a trivial budget
        let impact = counts(100_000, 1_000_000, 5_000_000);
        let metrics = valuate(&impact, 1_000_000.0, &config).unwrap();
        assert_eq!(metrics.financial_roi.value, 500.0);
        assert!(metrics.financial_roi.clamped);
        assert!(metrics.financial_roi.outside_typical);
        assert_eq!(metrics.economic_bcr.value, 40.0);
        assert!(metrics.economic_bcr.clamped);
        assert_eq!(metrics.social_value_ratio.value, 100.0);
        assert!(metrics.social_value_ratio.clamped);
    }

    #[test]
    fn social_and_financial_scales_stay_apart() {
        // The same impact produces a modest financial ROI and a much larger
        // social ratio; conflating them is the defect this module guards
        // against.
        let config = PlannerConfig::default();
        let impact = counts(50, 500, 5_000);
        let metrics = valuate(&impact, 2_000_000_000.0, &config).unwrap();
        assert!(metrics.financial_roi.value < 0.0, "year-1 return under budget");
        assert!(metrics.social_value_ratio.value > 1.0);
    }

    #[test]
    fn combined_score_uses_documented_weights() {
        let config = PlannerConfig::default();
        let impact = counts(100, 1_000, 10_000);
        let metrics = valuate(&impact, 1_000_000_000.0, &config).unwrap();
        let expected = 0.3 * (metrics.financial_roi.value / 100.0)
            + 0.4 * (metrics.economic_bcr.value / 15.0)
            + 0.3 * (metrics.social_value_ratio.value / 25.0);
        assert!((metrics.combined_score - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_budget_is_rejected() {
        let config = PlannerConfig::default();
        let impact = counts(1, 1, 1);
        assert!(matches!(
            valuate(&impact, 0.0, &config).unwrap_err(),
            PlanError::InvalidBudget(_)
        ));
    }
}
