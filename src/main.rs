use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use log::{info, warn};
use nutri_classify::algorithm::population::ChartMode;
use nutri_classify::utils::test::{DEFAULT_SEED, synthetic_cohort};
use nutri_classify::{EngineConfig, Measurement, NutritionEngine};

const SYNTHETIC_COHORT_SIZE: usize = 5_000;
const CHART_TO_MONTHS: u32 = 1_200;

fn load_measurements(path: &Path) -> anyhow::Result<Vec<Measurement>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EngineConfig::default().with_progress(true);
    info!("Engine configuration:\n{config}");

    let measurements = match std::env::args().nth(1) {
        Some(path) => load_measurements(Path::new(&path))?,
        None => {
            warn!("No input file given, scoring a synthetic cohort of {SYNTHETIC_COHORT_SIZE}");
            synthetic_cohort(SYNTHETIC_COHORT_SIZE, DEFAULT_SEED, Utc::now().date_naive())
        }
    };

    let start = Instant::now();
    let engine = NutritionEngine::new(config)?;
    let issues = engine.validate(&measurements);
    let aggregate = engine.aggregate(&measurements)?;
    let composite = engine.composite_statistics(&measurements);
    let chart = engine.chart(&measurements, 0, CHART_TO_MONTHS, ChartMode::AgeAppropriate)?;
    let sample: Vec<_> = measurements
        .iter()
        .take(3)
        .filter_map(|m| match engine.classify_person(m) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("Skipping sample subject {}: {e}", m.id);
                None
            }
        })
        .collect();
    info!("Scored {} subjects in {:?}", measurements.len(), start.elapsed());

    let output = serde_json::json!({
        "aggregate": aggregate,
        "composite": composite,
        "chart": chart,
        "sample": sample,
        "flagged_inputs": issues.len(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
