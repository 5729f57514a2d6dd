//! Planner error types.
//!
//! Invalid analytical input is a hard error, never a silent correction:
//! a mix that does not sum to 1 or an impact count exceeding its eligible
//! population indicates an upstream defect the caller must see.

use thiserror::Error;

/// Errors surfaced by planning computations.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Intervention mix fractions do not sum to 1 within tolerance, or a
    /// fraction is negative or non-finite. Never silently renormalized.
    #[error("intervention mix fractions sum to {sum:.4}, expected 1.0 ± {tolerance}")]
    InvalidMix { sum: f64, tolerance: f64 },

    /// Budget is negative or non-finite.
    #[error("invalid budget: {0}")]
    InvalidBudget(f64),

    /// Target population is empty.
    #[error("invalid target population: {0}")]
    InvalidTarget(u64),

    /// A projected outcome count exceeds the population eligible for it.
    #[error("{outcome}: projected {count} exceeds eligible population {eligible}")]
    ImpactExceedsEligible {
        outcome: &'static str,
        count: u64,
        eligible: u64,
    },

    /// Sweep bounds or step count cannot form a budget sequence.
    #[error("invalid sweep: min {min}, max {max}, steps {steps}")]
    InvalidSweep { min: f64, max: f64, steps: usize },

    /// Configuration could not be read or parsed.
    #[error("config: {0}")]
    Config(String),
}
