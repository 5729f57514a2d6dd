//! Nutrient Synergy Model
//!
//! Pairwise interaction multipliers between nutrients. Treating iron and
//! vitamin C together absorbs better than either alone; calcium dampens
//! iron uptake. Multipliers compound multiplicatively across co-occurring
//! pairs and the compounded product is clamped into `[floor, ceiling]` —
//! the ceiling is an invariant that prevents runaway amplification when
//! many synergistic nutrients are combined.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::SynergyConfig;
use crate::types::Nutrient;

/// Immutable pairwise interaction table, keyed on normalized (sorted)
/// nutrient pairs so lookup is order-independent.
#[derive(Debug, Clone)]
pub struct SynergyModel {
    pairs: BTreeMap<(Nutrient, Nutrient), f64>,
    ceiling: f64,
    floor: f64,
}

/// Sort a pair into canonical key order.
fn key(a: Nutrient, b: Nutrient) -> (Nutrient, Nutrient) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl SynergyModel {
    pub fn from_config(config: &SynergyConfig) -> Self {
        let mut pairs = BTreeMap::new();
        for entry in &config.pairs {
            // Last entry wins on duplicate pairs, matching config file order
            pairs.insert(key(entry.a, entry.b), entry.multiplier);
        }
        Self {
            pairs,
            ceiling: config.ceiling,
            floor: config.floor,
        }
    }

    /// Multiplier for a single unordered pair; 1.0 when no entry exists
    /// (neutral, not penalized).
    pub fn pair_multiplier(&self, a: Nutrient, b: Nutrient) -> f64 {
        self.pairs.get(&key(a, b)).copied().unwrap_or(1.0)
    }

    /// Compounded multiplier for a nutrient set: the product of all
    /// pairwise entries among nutrients in the set, clamped into
    /// `[floor, ceiling]`.
    ///
    /// The set is iterated in canonical order, so the result is identical
    /// for any caller-side ordering of the same nutrients.
    pub fn combined_multiplier(&self, nutrients: &BTreeSet<Nutrient>) -> f64 {
        let mut product = 1.0;
        let sorted: Vec<Nutrient> = nutrients.iter().copied().collect();
        for (i, a) in sorted.iter().enumerate() {
            for b in &sorted[i + 1..] {
                product *= self.pair_multiplier(*a, *b);
            }
        }
        product.clamp(self.floor, self.ceiling)
    }

    pub const fn ceiling(&self) -> f64 {
        self.ceiling
    }
}
