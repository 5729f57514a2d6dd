//! Config validation: range checks on tunable values.
//!
//! Warnings never break an existing config; they are logged at load time
//! so a suspicious value (an efficiency floor above 1, a discount rate of
//! 40%) is visible before it distorts a planning run.

use super::PlannerConfig;

/// A non-fatal config warning (suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

fn check(
    warnings: &mut Vec<ValidationWarning>,
    ok: bool,
    field: &str,
    message: impl Into<String>,
) {
    if !ok {
        warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.into(),
        });
    }
}

/// Validate value ranges across the whole config tree.
pub fn validate_ranges(config: &PlannerConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let d = &config.deficiency;
    check(
        &mut warnings,
        d.severe_below < d.moderate_below,
        "deficiency",
        format!(
            "severe_below ({}) should be below moderate_below ({})",
            d.severe_below, d.moderate_below
        ),
    );

    let r = &config.risk;
    check(
        &mut warnings,
        r.critical_amplifier >= 1.0,
        "risk.critical_amplifier",
        format!("critical_amplifier {} dampens critical nutrients", r.critical_amplifier),
    );
    check(
        &mut warnings,
        r.prevention_band_low < r.prevention_band_high,
        "risk.prevention_band",
        format!(
            "prevention band [{}, {}] is empty",
            r.prevention_band_low, r.prevention_band_high
        ),
    );
    check(
        &mut warnings,
        r.emergency_top_k > 0,
        "risk.emergency_top_k",
        "emergency_top_k of 0 selects no units",
    );
    for (nutrient, weight) in &r.nutrient_weights {
        check(
            &mut warnings,
            *weight >= 0.0 && weight.is_finite(),
            "risk.nutrient_weights",
            format!("weight for {nutrient} is {weight}"),
        );
    }

    let s = &config.synergy;
    check(
        &mut warnings,
        s.floor > 0.0 && s.floor <= 1.0 && s.ceiling >= 1.0,
        "synergy",
        format!("bounds [{}, {}] should bracket 1.0", s.floor, s.ceiling),
    );
    for pair in &s.pairs {
        check(
            &mut warnings,
            pair.multiplier > 0.0 && pair.multiplier.is_finite(),
            "synergy.pairs",
            format!("{}+{} multiplier {} must be positive", pair.a, pair.b, pair.multiplier),
        );
    }

    let c = &config.coverage;
    check(
        &mut warnings,
        (0.0..1.0).contains(&c.diminishing_returns_factor),
        "coverage.diminishing_returns_factor",
        format!("factor {} outside [0, 1)", c.diminishing_returns_factor),
    );
    check(
        &mut warnings,
        (0.0..=1.0).contains(&c.efficiency_floor),
        "coverage.efficiency_floor",
        format!("floor {} outside [0, 1]", c.efficiency_floor),
    );

    for (kind, profile) in &config.interventions {
        check(
            &mut warnings,
            profile.annual_cost_per_person > 0.0,
            "interventions",
            format!("{kind} has non-positive annual cost"),
        );
        check(
            &mut warnings,
            profile.effectiveness.get() > 0.0,
            "interventions",
            format!("{kind} has zero effectiveness"),
        );
        check(
            &mut warnings,
            profile.coverage_ceiling.get() > 0.0,
            "interventions",
            format!("{kind} has zero coverage ceiling"),
        );
    }

    let e = &config.economics;
    check(
        &mut warnings,
        e.first_year_factor > 0.0 && e.first_year_factor <= 1.0,
        "economics.first_year_factor",
        format!("first_year_factor {} outside (0, 1]", e.first_year_factor),
    );
    for (name, rate) in [
        ("economic_discount_rate", e.economic_discount_rate),
        ("social_discount_rate", e.social_discount_rate),
    ] {
        check(
            &mut warnings,
            (0.0..0.25).contains(&rate),
            &format!("economics.{name}"),
            format!("discount rate {rate} outside the plausible [0, 0.25) band"),
        );
    }
    let schedule_sum: f64 = e.cost_schedule.iter().sum();
    check(
        &mut warnings,
        !e.cost_schedule.is_empty() && (schedule_sum - 1.0).abs() < 1e-6,
        "economics.cost_schedule",
        format!("cost schedule sums to {schedule_sum}, expected 1.0"),
    );
    check(
        &mut warnings,
        e.horizon_years >= 1,
        "economics.horizon_years",
        "horizon must be at least one year",
    );
    let w = e.combined_weights;
    check(
        &mut warnings,
        (w.financial + w.economic + w.social - 1.0).abs() < 1e-6,
        "economics.combined_weights",
        format!(
            "combined weights sum to {}, expected 1.0",
            w.financial + w.economic + w.social
        ),
    );
    for (name, range) in [
        ("financial_roi_range", &e.financial_roi_range),
        ("economic_bcr_range", &e.economic_bcr_range),
        ("social_value_range", &e.social_value_range),
    ] {
        check(
            &mut warnings,
            range.hard_min <= range.typical_min
                && range.typical_min <= range.typical_max
                && range.typical_max <= range.hard_max,
            &format!("economics.{name}"),
            "typical band must nest inside the hard range",
        );
    }

    check(
        &mut warnings,
        config.sweep.steps >= 2,
        "sweep.steps",
        format!("{} steps cannot form a curve", config.sweep.steps),
    );

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let warnings = validate_ranges(&PlannerConfig::default());
        assert!(
            warnings.is_empty(),
            "defaults should be clean: {:?}",
            warnings
        );
    }

    #[test]
    fn inverted_thresholds_warn() {
        let mut cfg = PlannerConfig::default();
        cfg.deficiency.severe_below = 0.9;
        let warnings = validate_ranges(&cfg);
        assert!(warnings.iter().any(|w| w.field == "deficiency"));
    }

    #[test]
    fn bad_cost_schedule_warns() {
        let mut cfg = PlannerConfig::default();
        cfg.economics.cost_schedule = vec![0.6, 0.6];
        let warnings = validate_ranges(&cfg);
        assert!(warnings.iter().any(|w| w.field == "economics.cost_schedule"));
    }

    #[test]
    fn non_nested_metric_range_warns() {
        let mut cfg = PlannerConfig::default();
        cfg.economics.economic_bcr_range.typical_max = 99.0;
        let warnings = validate_ranges(&cfg);
        assert!(warnings
            .iter()
            .any(|w| w.field == "economics.economic_bcr_range"));
    }
}
