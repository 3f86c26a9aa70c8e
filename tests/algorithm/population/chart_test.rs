//! Age-band charting

use nutri_classify::algorithm::population::{CANONICAL_BANDS, ChartMode, PopulationAggregator};
use nutri_classify::models::NO_DATA;
use nutri_classify::{ClassificationError, Sex, SubjectProfile, WhoStandard};

use crate::utils::{cohort, engine, store, test_config};

#[test]
fn test_first_six_years_use_the_canonical_bands() {
    let chart = engine()
        .chart(&cohort(50, 1), 0, 71, ChartMode::Single(WhoStandard::WeightForAge))
        .unwrap();

    let expected: Vec<_> = CANONICAL_BANDS.iter().map(|(name, _, _)| *name).collect();
    assert_eq!(chart.age_groups(), expected);
}

#[test]
fn test_wide_range_uses_equal_bins() {
    let measurements = cohort(200, 2);
    let chart = engine()
        .chart(&measurements, 0, 1200, ChartMode::AgeAppropriate)
        .unwrap();

    assert_eq!(chart.age_groups().len(), 10);
    // Every synthetic subject is at most 80 years old, so all of them land in a band
    assert_eq!(chart.total(), measurements.len());
}

#[test]
fn test_counts_land_in_the_right_band() {
    let store = store();
    let config = test_config();
    let subjects = vec![
        SubjectProfile::new("a", 3, Sex::Female).with_weight(5.8).with_height(59.8),
        SubjectProfile::new("b", 30, Sex::Male).with_weight(13.3).with_height(91.9),
        SubjectProfile::new("c", 30, Sex::Male),
        SubjectProfile::new("d", 100, Sex::Male).with_weight(25.0).with_height(130.0),
    ];
    let chart = PopulationAggregator::new(&store, &config)
        .chart_profiles(&subjects, 0, 71, ChartMode::Single(WhoStandard::WeightForAge))
        .unwrap();

    assert_eq!(chart.series("Normal").unwrap().to_vec(), vec![1, 0, 0, 1, 0, 0, 0]);
    assert_eq!(chart.series(NO_DATA).unwrap().to_vec(), vec![0, 0, 0, 1, 0, 0, 0]);
    assert_eq!(chart.total(), 3);
}

#[test]
fn test_subject_at_the_upper_month_is_counted() {
    let store = store();
    let config = test_config();
    let subjects = vec![
        SubjectProfile::new("a", 2, Sex::Male).with_weight(5.6),
        SubjectProfile::new("b", 6, Sex::Male).with_weight(7.9),
        SubjectProfile::new("c", 7, Sex::Male).with_weight(7.9),
    ];
    let chart = PopulationAggregator::new(&store, &config)
        .chart_profiles(&subjects, 0, 6, ChartMode::Single(WhoStandard::WeightForAge))
        .unwrap();

    assert_eq!(chart.age_groups(), ["0-6m", "6-12m"]);
    assert_eq!(chart.series("Normal").unwrap().to_vec(), vec![1, 1]);
    assert_eq!(chart.total(), 2);
}

#[test]
fn test_inverted_range_is_rejected() {
    assert!(matches!(
        engine().chart(&[], 24, 12, ChartMode::AgeAppropriate),
        Err(ClassificationError::InvalidAgeRange { .. })
    ));
}
