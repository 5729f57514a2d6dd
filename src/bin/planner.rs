//! Planning CLI
//!
//! Demo front-end for the nutriplan engine: loads (or synthesizes) a
//! district snapshot, ranks districts by risk, and runs budget sweeps.
//! All file and terminal I/O lives here; the library stays pure.
//!
//! # Usage
//! ```bash
//! planner generate --districts 120 --seed 7 > snapshot.json
//! planner rank --snapshot snapshot.json
//! planner sweep --snapshot snapshot.json --min 1e9 --max 5e11
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::prelude::*;
use tracing::info;

use nutriplan::{
    deficient_nutrients, optimizer, GeographicUnit, InterventionMix, InterventionType, Nutrient,
    Percent, PlannerConfig, PopulationProfile, RiskScorer, UnitId,
};

#[derive(Parser, Debug)]
#[command(name = "planner")]
#[command(about = "Nutrition intervention planning and budget optimization")]
#[command(version)]
struct Args {
    /// Path to a TOML config file (falls back to NUTRIPLAN_CONFIG, then
    /// ./nutriplan.toml, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a synthetic district snapshot as JSON on stdout
    Generate {
        /// Number of districts
        #[arg(long, default_value = "120")]
        districts: u32,

        /// Random seed for reproducibility
        #[arg(long, default_value = "7")]
        seed: u64,
    },

    /// Rank districts by composite risk under the configured mode
    Rank {
        /// Snapshot JSON file (array of geographic units)
        #[arg(short, long)]
        snapshot: PathBuf,
    },

    /// Sweep a budget range over the prioritized districts
    Sweep {
        /// Snapshot JSON file (array of geographic units)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Lower budget bound
        #[arg(long, default_value = "1000000000")]
        min: f64,

        /// Upper budget bound
        #[arg(long, default_value = "500000000000")]
        max: f64,

        /// Emit the full scenario curve instead of the optima summary
        #[arg(long)]
        full: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PlannerConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlannerConfig::load(),
    };

    match args.command {
        Command::Generate { districts, seed } => generate(districts, seed),
        Command::Rank { snapshot } => rank(&snapshot, &config),
        Command::Sweep {
            snapshot,
            min,
            max,
            full,
        } => run_sweep(&snapshot, min, max, full, &config),
    }
}

/// Load a snapshot and sanitize adequacy values in place.
fn load_snapshot(path: &PathBuf, config: &PlannerConfig) -> Result<Vec<GeographicUnit>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let mut units: Vec<GeographicUnit> =
        serde_json::from_str(&text).context("parsing snapshot JSON")?;
    if units.is_empty() {
        bail!("snapshot contains no districts");
    }
    let mut corrections = 0usize;
    for unit in &mut units {
        corrections += unit
            .sanitize(
                config.input.adequacy_rescale_threshold,
                config.input.adequacy_plausible_max,
            )
            .len();
    }
    info!(
        districts = units.len(),
        corrections, "snapshot loaded"
    );
    Ok(units)
}

fn rank(snapshot: &PathBuf, config: &PlannerConfig) -> Result<()> {
    let units = load_snapshot(snapshot, config)?;
    let scorer = RiskScorer::new(&units, config);
    let prioritized = scorer.prioritize();
    println!("{}", serde_json::to_string_pretty(&prioritized)?);
    Ok(())
}

fn run_sweep(snapshot: &PathBuf, min: f64, max: f64, full: bool, config: &PlannerConfig) -> Result<()> {
    let units = load_snapshot(snapshot, config)?;
    let scorer = RiskScorer::new(&units, config);
    let prioritized = scorer.prioritize();
    let selected: BTreeSet<UnitId> = prioritized.iter().map(|u| u.id.clone()).collect();
    let selected_units: Vec<&GeographicUnit> = units
        .iter()
        .filter(|u| selected.contains(&u.id))
        .collect();
    let profile = PopulationProfile::aggregate(selected_units.iter().copied());

    // Even split across all four channels; only the selected districts'
    // deficiencies drive the synergy nutrient set
    let mix = InterventionMix(
        InterventionType::ALL
            .iter()
            .map(|kind| (*kind, 1.0 / InterventionType::ALL.len() as f64))
            .collect(),
    );
    let nutrients = deficient_nutrients(
        selected_units.iter().copied(),
        config.deficiency.moderate_below,
    );
    info!(
        districts = prioritized.len(),
        target = profile.target_population(),
        nutrients = nutrients.len(),
        "sweeping budget range"
    );

    let result = optimizer::sweep(min, max, &profile, &mix, &nutrients, config)?;
    if full {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        summarize(&result);
    }
    Ok(())
}

fn summarize(result: &nutriplan::OptimizationResult) {
    println!(
        "full-coverage budget: {:.0}",
        result.full_coverage_budget
    );
    for (label, scenario) in [
        ("best financial ROI", result.best_financial_scenario()),
        ("best economic BCR", result.best_economic_scenario()),
        ("best social value", result.best_social_scenario()),
        ("best combined", result.best_combined_scenario()),
    ] {
        println!(
            "{label}: budget {:.0}, coverage {:.1}%, ROI {:.1}%, BCR {:.2}, SVR {:.2}, lives {}, score {:.3}",
            scenario.budget,
            scenario.coverage.ratio.get() * 100.0,
            scenario.metrics.financial_roi.value,
            scenario.metrics.economic_bcr.value,
            scenario.metrics.social_value_ratio.value,
            scenario.impact.lives_saved.count,
            scenario.metrics.combined_score,
        );
    }
}

// ============================================================================
// Synthetic Snapshot Generation
// ============================================================================

/// Adequacy profile shape per nutrient: (mean, spread) of a uniform band.
const ADEQUACY_BANDS: [(Nutrient, f64, f64); 13] = [
    (Nutrient::Calcium, 0.55, 0.30),
    (Nutrient::Iron, 0.50, 0.35),
    (Nutrient::Zinc, 0.60, 0.30),
    (Nutrient::VitaminA, 0.65, 0.30),
    (Nutrient::VitaminB12, 0.40, 0.30),
    (Nutrient::VitaminC, 0.80, 0.30),
    (Nutrient::Folate, 0.55, 0.30),
    (Nutrient::VitaminB6, 0.45, 0.30),
    (Nutrient::Thiamin, 0.75, 0.25),
    (Nutrient::Riboflavin, 0.70, 0.25),
    (Nutrient::Niacin, 0.75, 0.25),
    (Nutrient::Protein, 0.85, 0.20),
    (Nutrient::Energy, 0.80, 0.20),
];

fn generate(districts: u32, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let units: Vec<GeographicUnit> = (0..districts)
        .map(|i| {
            let population = rng.gen_range(80_000..2_000_000);
            GeographicUnit {
                id: UnitId(format!("DIST-{i:03}")),
                population,
                children_under_5: (population as f64 * rng.gen_range(0.13..0.18)) as u64,
                pregnant_women: (population as f64 * rng.gen_range(0.030..0.045)) as u64,
                lactating_women: (population as f64 * rng.gen_range(0.035..0.050)) as u64,
                adequacy: ADEQUACY_BANDS
                    .iter()
                    .map(|(nutrient, mean, spread)| {
                        let adequacy =
                            (mean + rng.gen_range(-spread / 2.0..spread / 2.0)).max(0.05);
                        (*nutrient, adequacy)
                    })
                    .collect(),
                health_facilities: rng.gen_range(3..150),
                poverty_rate: Percent::clamped(rng.gen_range(8.0..65.0)),
            }
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&units)?);
    Ok(())
}
