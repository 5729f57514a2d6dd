//! Core Data Model
//!
//! Immutable input records and the semantic unit types shared by every
//! component. All entities here are produced fresh per planning request
//! from externally supplied snapshots; nothing is mutated in place after
//! sanitization.

mod geography;
mod intervention;
mod nutrient;
mod units;
mod warnings;

pub use geography::{GeographicUnit, PopulationProfile, UnitId};
pub use intervention::{InterventionMix, InterventionProfile, InterventionType};
pub use nutrient::{DeficiencyTier, Nutrient};
pub use units::{MetricRange, MetricUnit, MetricValue, Percent, Ratio};
pub use warnings::DataWarning;
