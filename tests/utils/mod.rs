use chrono::NaiveDate;
use nutri_classify::utils::test::synthetic_cohort;
use nutri_classify::{EngineConfig, Measurement, NutritionEngine, ReferenceTableStore};

/// Fixed "now" so ages do not drift between runs
#[must_use]
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

#[must_use]
pub fn test_config() -> EngineConfig {
    EngineConfig::default().with_reference_date(reference_date())
}

#[must_use]
pub fn engine() -> NutritionEngine {
    NutritionEngine::new(test_config()).unwrap()
}

#[must_use]
pub fn store() -> ReferenceTableStore {
    ReferenceTableStore::who(test_config().lookup_mode).unwrap()
}

#[must_use]
pub fn cohort(n: usize, seed: u64) -> Vec<Measurement> {
    synthetic_cohort(n, seed, reference_date())
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
