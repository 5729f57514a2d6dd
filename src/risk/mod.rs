//! Composite Nutritional Risk Index (CNRI) scoring and prioritization.
//!
//! Ranks geographic units by aggregate deficiency burden. Scoring is a
//! pure function of the immutable snapshot and configuration; per-unit
//! scores are computed once per planning run into a read-only cache
//! (data-parallel across units) and never invalidated mid-run.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{PlannerConfig, PrioritizationMode};
use crate::types::{DataWarning, DeficiencyTier, GeographicUnit, Nutrient, Percent, UnitId};

/// A unit's scored risk entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedUnit {
    pub id: UnitId,
    pub cnri: f64,
    pub population: u64,
    pub moderate_count: u32,
    pub severe_count: u32,
    /// Mean adequacy across the unit's scored nutrients.
    pub mean_adequacy: Percent,
}

/// Per-run scoring engine with a snapshot-scoped CNRI cache.
pub struct RiskScorer<'a> {
    config: &'a PlannerConfig,
    /// Read-only after construction; safe to share across threads.
    cache: HashMap<UnitId, RankedUnit>,
    warnings: Vec<DataWarning>,
}

impl<'a> RiskScorer<'a> {
    /// Score every unit in the snapshot. Units are scored in parallel;
    /// warnings are collected in input order so output is deterministic.
    pub fn new(units: &[GeographicUnit], config: &'a PlannerConfig) -> Self {
        let scored: Vec<(RankedUnit, Vec<DataWarning>)> = units
            .par_iter()
            .map(|unit| score_unit(unit, config))
            .collect();

        let mut cache = HashMap::with_capacity(scored.len());
        let mut warnings = Vec::new();
        for (entry, unit_warnings) in scored {
            for w in &unit_warnings {
                warn!("{w}");
            }
            warnings.extend(unit_warnings);
            cache.insert(entry.id.clone(), entry);
        }
        Self {
            config,
            cache,
            warnings,
        }
    }

    /// Data-quality warnings recorded during scoring.
    pub fn warnings(&self) -> &[DataWarning] {
        &self.warnings
    }

    /// Cached CNRI for a unit, if the unit was in the snapshot.
    pub fn cnri(&self, id: &UnitId) -> Option<f64> {
        self.cache.get(id).map(|e| e.cnri)
    }

    /// All units ranked by CNRI descending. Ties break by population
    /// descending, then identifier ascending — a total order, required
    /// for reproducible output.
    pub fn ranked(&self) -> Vec<RankedUnit> {
        let mut ranked: Vec<RankedUnit> = self.cache.values().cloned().collect();
        ranked.sort_by(compare_by_cnri);
        ranked
    }

    /// Apply the configured prioritization mode to the ranked list.
    ///
    /// All three modes are pure functions over the same ranking; the mode
    /// is a configuration value, not a separate code path.
    pub fn prioritize(&self) -> Vec<RankedUnit> {
        let ranked = self.ranked();
        let risk = &self.config.risk;
        match risk.mode {
            PrioritizationMode::Emergency => {
                ranked.into_iter().take(risk.emergency_top_k).collect()
            }
            PrioritizationMode::Balanced => {
                let mut weighted = ranked;
                weighted.sort_by(|a, b| {
                    let wa = a.cnri * a.population as f64;
                    let wb = b.cnri * b.population as f64;
                    wb.partial_cmp(&wa)
                        .unwrap_or(Ordering::Equal)
                        .then_with(|| a.id.cmp(&b.id))
                });
                weighted
            }
            PrioritizationMode::Prevention => ranked
                .into_iter()
                .filter(|u| {
                    let mean = u.mean_adequacy.as_ratio().get();
                    mean >= risk.prevention_band_low && mean <= risk.prevention_band_high
                })
                .collect(),
        }
    }
}

/// Nutrients deficient (adequacy below `moderate_below`) in any of the
/// given units.
///
/// Callers planning an intervention pass the prioritized selection, not the
/// whole snapshot, so a unit excluded by the prioritization mode cannot
/// steer the nutrient set.
pub fn deficient_nutrients<'a>(
    units: impl IntoIterator<Item = &'a GeographicUnit>,
    moderate_below: f64,
) -> BTreeSet<Nutrient> {
    units
        .into_iter()
        .flat_map(|u| u.adequacy.iter())
        .filter(|(_, adequacy)| **adequacy < moderate_below)
        .map(|(nutrient, _)| *nutrient)
        .collect()
}

/// Total order: CNRI desc, population desc, id asc.
fn compare_by_cnri(a: &RankedUnit, b: &RankedUnit) -> Ordering {
    b.cnri
        .partial_cmp(&a.cnri)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.population.cmp(&a.population))
        .then_with(|| a.id.cmp(&b.id))
}

/// Score one unit.
///
/// CNRI = Σ over scored nutrients of `weight × tier_points / adequacy`,
/// amplified for configured critical nutrients when their adequacy is
/// below the amplifier threshold. Nutrients missing from the weight table
/// are excluded with a warning — defaulting them to zero would silently
/// understate risk.
fn score_unit(unit: &GeographicUnit, config: &PlannerConfig) -> (RankedUnit, Vec<DataWarning>) {
    let risk = &config.risk;
    let deficiency = &config.deficiency;

    let mut cnri = 0.0;
    let mut moderate_count = 0u32;
    let mut severe_count = 0u32;
    let mut adequacy_sum = 0.0;
    let mut scored_nutrients = 0u32;
    let mut warnings = Vec::new();

    for (nutrient, adequacy) in &unit.adequacy {
        let Some(weight) = risk.nutrient_weights.get(nutrient) else {
            warnings.push(DataWarning::MissingNutrientWeight {
                unit: unit.id.clone(),
                nutrient: *nutrient,
            });
            continue;
        };

        adequacy_sum += adequacy;
        scored_nutrients += 1;

        let tier = DeficiencyTier::classify(
            *adequacy,
            deficiency.moderate_below,
            deficiency.severe_below,
        );
        let points = match tier {
            DeficiencyTier::Severe => {
                severe_count += 1;
                risk.severe_points
            }
            DeficiencyTier::Moderate => {
                moderate_count += 1;
                risk.moderate_points
            }
            DeficiencyTier::None => continue,
        };

        let mut contribution = weight * points / adequacy.max(risk.adequacy_floor);
        if risk.critical_nutrients.contains(nutrient) && *adequacy < risk.critical_below {
            contribution *= risk.critical_amplifier;
        }
        cnri += contribution;
    }

    let mean_adequacy = if scored_nutrients > 0 {
        Percent::clamped(adequacy_sum / f64::from(scored_nutrients) * 100.0)
    } else {
        Percent::clamped(0.0)
    };

    (
        RankedUnit {
            id: unit.id.clone(),
            cnri,
            population: unit.population,
            moderate_count,
            severe_count,
            mean_adequacy,
        },
        warnings,
    )
}
