//! Planner Configuration
//!
//! Every tunable constant of the engine lives here as an operator-editable
//! TOML value: deficiency thresholds, synergy table, coverage curve shape,
//! epidemiological baselines, valuation constants, metric ranges, and sweep
//! shape. Each struct implements `Default` with the documented evidence
//! values, so behavior is fully defined with no config file present.
//!
//! ## Loading Order
//!
//! 1. Explicit path passed to [`PlannerConfig::load_from`]
//! 2. `NUTRIPLAN_CONFIG` environment variable (path to TOML file)
//! 3. `nutriplan.toml` in the current working directory
//! 4. Built-in defaults
//!
//! Once loaded, the config is passed explicitly into every component call;
//! there is no ambient global lookup.

mod validation;

pub use validation::{validate_ranges, ValidationWarning};

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PlanError;
use crate::types::{InterventionProfile, InterventionType, Nutrient, MetricRange, Ratio};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a planning deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Adequacy sanitization heuristics
    pub input: InputConfig,
    /// Deficiency tier thresholds
    pub deficiency: DeficiencyConfig,
    /// Risk scoring weights and prioritization
    pub risk: RiskConfig,
    /// Nutrient synergy table and bounds
    pub synergy: SynergyConfig,
    /// Coverage / diminishing-returns curve
    pub coverage: CoverageConfig,
    /// Intervention catalogue
    #[serde(default = "default_interventions")]
    pub interventions: BTreeMap<InterventionType, InterventionProfile>,
    /// Epidemiological baseline and reduction rates
    pub epidemiology: EpidemiologyConfig,
    /// Valuation constants, discount rates, metric ranges
    pub economics: EconomicsConfig,
    /// Budget sweep shape
    pub sweep: SweepConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            deficiency: DeficiencyConfig::default(),
            risk: RiskConfig::default(),
            synergy: SynergyConfig::default(),
            coverage: CoverageConfig::default(),
            interventions: default_interventions(),
            epidemiology: EpidemiologyConfig::default(),
            economics: EconomicsConfig::default(),
            sweep: SweepConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("NUTRIPLAN_CONFIG") {
            return Self::load_from(Path::new(&path)).unwrap_or_else(|e| {
                warn!("failed to load {path}: {e} — using defaults");
                Self::default()
            });
        }
        let local = Path::new("nutriplan.toml");
        if local.exists() {
            return Self::load_from(local).unwrap_or_else(|e| {
                warn!("failed to load nutriplan.toml: {e} — using defaults");
                Self::default()
            });
        }
        info!("no config file found — using built-in defaults");
        Self::default()
    }

    /// Load and validate a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self, PlanError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| PlanError::Config(format!("read {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| PlanError::Config(format!("parse {}: {e}", path.display())))?;
        for warning in validate_ranges(&config) {
            warn!(field = %warning.field, "{}", warning.message);
        }
        info!(path = %path.display(), "planner configuration loaded");
        Ok(config)
    }
}

// ============================================================================
// Input Sanitization
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Adequacy ratios above this are percentages that leaked through as
    /// ratios and are divided by 100.
    pub adequacy_rescale_threshold: f64,
    /// Corrected adequacy above this keeps an out-of-range warning flag.
    pub adequacy_plausible_max: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            adequacy_rescale_threshold: 10.0,
            adequacy_plausible_max: 1.25,
        }
    }
}

// ============================================================================
// Deficiency Tiers
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeficiencyConfig {
    /// Adequacy below this ratio is at least a moderate deficiency.
    pub moderate_below: f64,
    /// Adequacy below this ratio is a severe deficiency.
    pub severe_below: f64,
}

impl Default for DeficiencyConfig {
    fn default() -> Self {
        Self {
            moderate_below: 0.80,
            severe_below: 0.50,
        }
    }
}

// ============================================================================
// Risk Scoring
// ============================================================================

/// Prioritization mode — one closed variant consumed by a single ranking
/// function, not separate code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrioritizationMode {
    /// Top-K units by CNRI.
    Emergency,
    /// Re-rank by population × CNRI.
    #[default]
    Balanced,
    /// Units whose mean adequacy sits in the tipping-point band, by CNRI.
    Prevention,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Per-nutrient scoring weights. A unit referencing a nutrient absent
    /// from this table has that term excluded (with a warning), never
    /// treated as zero risk.
    pub nutrient_weights: BTreeMap<Nutrient, f64>,
    /// Nutrients whose deficiency is amplified in the CNRI.
    pub critical_nutrients: Vec<Nutrient>,
    /// Amplification factor applied when a critical nutrient's adequacy is
    /// below `critical_below`.
    pub critical_amplifier: f64,
    pub critical_below: f64,
    /// Contribution points per tier.
    pub moderate_points: f64,
    pub severe_points: f64,
    /// Floor on the adequacy divisor, so near-zero adequacy does not
    /// produce unbounded scores.
    pub adequacy_floor: f64,
    pub mode: PrioritizationMode,
    /// K for the emergency mode.
    pub emergency_top_k: usize,
    /// Mean-adequacy band for the prevention mode (ratio scale).
    pub prevention_band_low: f64,
    pub prevention_band_high: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            nutrient_weights: Nutrient::ALL.iter().map(|n| (*n, 1.0)).collect(),
            critical_nutrients: vec![Nutrient::VitaminB12, Nutrient::Iron],
            critical_amplifier: 2.0,
            critical_below: 0.30,
            moderate_points: 2.0,
            severe_points: 3.0,
            adequacy_floor: 0.01,
            mode: PrioritizationMode::Balanced,
            emergency_top_k: 15,
            prevention_band_low: 0.40,
            prevention_band_high: 0.60,
        }
    }
}

// ============================================================================
// Synergy
// ============================================================================

/// One nutrient-pair interaction entry. Order of the pair is irrelevant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynergyPair {
    pub a: Nutrient,
    pub b: Nutrient,
    /// Multiplier > 0; above 1 is synergistic, below 1 antagonistic.
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynergyConfig {
    pub pairs: Vec<SynergyPair>,
    /// Compounded multipliers are clamped to this ceiling. The cap is an
    /// invariant of the model, not a tuning artifact.
    pub ceiling: f64,
    /// Lower bound admitting antagonistic combinations.
    pub floor: f64,
}

impl Default for SynergyConfig {
    fn default() -> Self {
        Self {
            pairs: vec![
                SynergyPair { a: Nutrient::VitaminB12, b: Nutrient::Folate, multiplier: 1.4 },
                SynergyPair { a: Nutrient::Iron, b: Nutrient::VitaminC, multiplier: 2.5 },
                SynergyPair { a: Nutrient::Zinc, b: Nutrient::VitaminA, multiplier: 1.3 },
                SynergyPair { a: Nutrient::Iron, b: Nutrient::VitaminB12, multiplier: 1.2 },
                SynergyPair { a: Nutrient::Calcium, b: Nutrient::Iron, multiplier: 0.9 },
            ],
            ceiling: 2.0,
            floor: 0.5,
        }
    }
}

// ============================================================================
// Coverage
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Slope of the efficiency penalty: efficiency = 1 − factor × coverage.
    pub diminishing_returns_factor: f64,
    /// Efficiency never drops below this.
    pub efficiency_floor: f64,
    /// Allowed deviation of mix fractions from summing to 1.
    pub mix_tolerance: f64,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            diminishing_returns_factor: 0.3,
            efficiency_floor: 0.7,
            mix_tolerance: 0.01,
        }
    }
}

fn default_interventions() -> BTreeMap<InterventionType, InterventionProfile> {
    // Annual per-person delivery costs and evidence-based effectiveness,
    // currency units match the population snapshot (UGX).
    BTreeMap::from([
        (
            InterventionType::Fortification,
            InterventionProfile {
                annual_cost_per_person: 8_000.0,
                effectiveness: Ratio::clamped(0.61),
                coverage_ceiling: Ratio::clamped(0.85),
            },
        ),
        (
            InterventionType::Supplementation,
            InterventionProfile {
                annual_cost_per_person: 18_000.0,
                effectiveness: Ratio::clamped(0.73),
                coverage_ceiling: Ratio::clamped(0.60),
            },
        ),
        (
            InterventionType::Biofortification,
            InterventionProfile {
                annual_cost_per_person: 24_000.0,
                effectiveness: Ratio::clamped(0.65),
                coverage_ceiling: Ratio::clamped(0.75),
            },
        ),
        (
            InterventionType::DietaryDiversification,
            InterventionProfile {
                annual_cost_per_person: 30_000.0,
                effectiveness: Ratio::clamped(0.55),
                coverage_ceiling: Ratio::clamped(0.90),
            },
        ),
    ])
}

// ============================================================================
// Epidemiology
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EpidemiologyConfig {
    /// Under-5 mortality: 46.4 deaths per 1,000.
    pub u5_mortality_rate: f64,
    /// Fraction of under-5 deaths preventable by the interventions.
    pub mortality_reduction: f64,
    /// Stunting prevalence among children under 5.
    pub stunting_prevalence: f64,
    pub stunting_reduction: f64,
    /// Anemia prevalence among children under 5.
    pub anemia_child_prevalence: f64,
    /// Anemia prevalence among pregnant/lactating women.
    pub anemia_women_prevalence: f64,
    pub anemia_reduction: f64,
    /// DALY weights per outcome (WHO standard values).
    pub dalys_per_life_saved: f64,
    pub dalys_per_stunting_prevented: f64,
    /// Confidence level for the reported outcome intervals.
    pub confidence_level_percent: f64,
    /// Assumed coefficient of variation of outcome counts.
    pub outcome_cv: f64,
}

impl Default for EpidemiologyConfig {
    fn default() -> Self {
        Self {
            u5_mortality_rate: 0.0464,
            mortality_reduction: 0.23,
            stunting_prevalence: 0.232,
            stunting_reduction: 0.36,
            anemia_child_prevalence: 0.53,
            anemia_women_prevalence: 0.28,
            anemia_reduction: 0.42,
            dalys_per_life_saved: 30.0,
            dalys_per_stunting_prevented: 5.0,
            confidence_level_percent: 95.0,
            outcome_cv: 0.15,
        }
    }
}

// ============================================================================
// Economics
// ============================================================================

/// Per-outcome monetary rates on one of the three valuation horizons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeValues {
    pub per_life_saved: f64,
    pub per_stunting_prevented: f64,
    pub per_anemia_prevented: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedWeights {
    pub financial: f64,
    pub economic: f64,
    pub social: f64,
}

impl Default for CombinedWeights {
    fn default() -> Self {
        Self {
            financial: 0.3,
            economic: 0.4,
            social: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    /// Immediate (year-1) benefit rates: healthcare costs avoided plus
    /// first-year productivity, per outcome.
    pub immediate: OutcomeValues,
    /// Recurring annual benefit rates from year 2 onward.
    pub recurring: OutcomeValues,
    /// Lifetime social valuation: statistical value of life and lifetime
    /// costs per prevented condition.
    pub lifetime: OutcomeValues,
    /// Ramp-up friction on year-1 benefits (< 1).
    pub first_year_factor: f64,
    /// Discount rate for the economic benefit-cost ratio.
    pub economic_discount_rate: f64,
    /// Discount rate for lifetime social value.
    pub social_discount_rate: f64,
    /// Horizon for the BCR, in years.
    pub horizon_years: u32,
    /// Midpoint of the multi-decade social horizon, used to discount the
    /// lifetime value once.
    pub horizon_midpoint_years: f64,
    /// Multiplier for benefits that carry into the next generation.
    pub intergenerational_bonus: f64,
    /// Cost disbursement schedule as fractions of the budget per year,
    /// front-loaded. Must sum to 1.
    pub cost_schedule: Vec<f64>,
    pub financial_roi_range: MetricRange,
    pub economic_bcr_range: MetricRange,
    pub social_value_range: MetricRange,
    pub combined_weights: CombinedWeights,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            immediate: OutcomeValues {
                per_life_saved: 5_000_000.0,
                per_stunting_prevented: 500_000.0,
                per_anemia_prevented: 100_000.0,
            },
            recurring: OutcomeValues {
                per_life_saved: 1_000_000.0,
                per_stunting_prevented: 250_000.0,
                per_anemia_prevented: 50_000.0,
            },
            lifetime: OutcomeValues {
                per_life_saved: 150_000_000.0,
                per_stunting_prevented: 25_000_000.0,
                per_anemia_prevented: 2_000_000.0,
            },
            first_year_factor: 0.6,
            economic_discount_rate: 0.05,
            social_discount_rate: 0.03,
            horizon_years: 5,
            horizon_midpoint_years: 20.0,
            intergenerational_bonus: 1.15,
            cost_schedule: vec![0.6, 0.4],
            financial_roi_range: MetricRange {
                hard_min: -100.0,
                hard_max: 500.0,
                typical_min: -50.0,
                typical_max: 100.0,
            },
            economic_bcr_range: MetricRange {
                hard_min: 0.0,
                hard_max: 40.0,
                typical_min: 1.0,
                typical_max: 15.0,
            },
            social_value_range: MetricRange {
                hard_min: 0.0,
                hard_max: 100.0,
                typical_min: 2.0,
                typical_max: 25.0,
            },
            combined_weights: CombinedWeights::default(),
        }
    }
}

// ============================================================================
// Sweep
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Number of evenly spaced budget points.
    pub steps: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { steps: 50 }
    }
}
