//! nutriplan: Intervention Planning & Economic Optimization
//!
//! Computation engine for national nutrition-intervention planning: given
//! per-district deficiency data and a budget, it ranks districts by need,
//! models nutrient interactions, and searches a budget range for the
//! allocation with the best return under diminishing returns.
//!
//! ## Pipeline
//!
//! - **RiskScorer**: composite risk index (CNRI) and unit prioritization
//! - **SynergyModel**: pairwise nutrient-interaction multipliers
//! - **CoverageModel**: budget → population coverage and delivery efficiency
//! - **HealthImpactProjector**: coverage → outcome counts with intervals
//! - **EconomicValuator**: financial / economic / social return metrics
//! - **BudgetOptimizer**: parallel budget sweep and optimum selection
//!
//! The engine performs no I/O of its own; snapshots arrive as typed values
//! and every computation is a deterministic function of (inputs, config).

pub mod config;
pub mod coverage;
pub mod economics;
pub mod error;
pub mod impact;
pub mod optimizer;
pub mod risk;
pub mod synergy;
pub mod types;

// Re-export planner configuration
pub use config::{PlannerConfig, PrioritizationMode};

// Re-export commonly used types
pub use types::{
    DataWarning, DeficiencyTier, GeographicUnit, InterventionMix, InterventionProfile,
    InterventionType, MetricUnit, MetricValue, Nutrient, Percent, PopulationProfile, Ratio,
    UnitId,
};

// Re-export pipeline entry points
pub use coverage::{coverage, Coverage};
pub use economics::{valuate, EconomicMetrics};
pub use error::PlanError;
pub use impact::{project, HealthImpact, OutcomeCount};
pub use optimizer::{sweep, OptimizationResult, Scenario};
pub use risk::{deficient_nutrients, RankedUnit, RiskScorer};
pub use synergy::SynergyModel;
