//! Aggregate reports must reconcile and must not depend on chunking

use nutri_classify::algorithm::population::PopulationAggregator;
use nutri_classify::models::NO_DATA;
use nutri_classify::utils::test::synthetic_cohort;
use nutri_classify::{EngineConfig, WhoStandard};

use crate::utils::{cohort, reference_date, store, test_config};

#[test]
fn test_reports_reconcile_to_cohort_size() {
    let measurements = cohort(400, 11);
    let store = store();
    let config = test_config();
    let report = PopulationAggregator::new(&store, &config)
        .aggregate(&measurements)
        .unwrap();

    for standard in WhoStandard::ALL {
        let r = report.report(standard);
        let sum: usize = r.classifications().iter().map(|(_, count)| count).sum();
        assert_eq!(sum, measurements.len(), "{standard}");
        assert_eq!(r.total(), measurements.len());
        assert_eq!(r.classifications().last().map(|(label, _)| *label), Some(NO_DATA));
    }
}

#[test]
fn test_chunk_size_never_changes_the_result() {
    let measurements = cohort(257, 3);
    let store = store();
    let base = test_config();

    let reports: Vec<_> = [Some(1), Some(3), Some(7), Some(1000), None]
        .into_iter()
        .map(|chunk| {
            let config = match chunk {
                Some(size) => base.clone().with_chunk_size(size),
                None => EngineConfig {
                    chunk_size: None,
                    ..base.clone()
                },
            };
            PopulationAggregator::new(&store, &config)
                .aggregate(&measurements)
                .unwrap()
        })
        .collect();

    for report in &reports[1..] {
        assert_eq!(report, &reports[0]);
    }
}

#[test]
fn test_empty_population() {
    let store = store();
    let config = test_config();
    let report = PopulationAggregator::new(&store, &config).aggregate(&[]).unwrap();
    assert!(report.reports().iter().all(|r| r.total() == 0 && r.is_reconciled()));
}

#[test]
fn test_composite_statistics_reconcile() {
    let measurements = synthetic_cohort(300, 5, reference_date());
    let engine = crate::utils::engine();
    let stats = engine.composite_statistics(&measurements);

    assert_eq!(stats.total(), measurements.len());
    assert_eq!(
        stats.children() + stats.pregnant_women() + stats.adults() + stats.unclassifiable(),
        measurements.len()
    );
    assert!(stats.is_reconciled());
}
