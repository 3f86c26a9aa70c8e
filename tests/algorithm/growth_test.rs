//! Reference lookup, z-scores and per-indicator labels

use nutri_classify::algorithm::growth::{Ineligibility, StandardOutcome};
use nutri_classify::config::DateFormatConfig;
use nutri_classify::models::{StandardLabel, WeightForHeightLabel};
use nutri_classify::standards::who_rows;
use nutri_classify::standards::windows::IndicatorWindow;
use nutri_classify::{
    AgeResolver, ClassificationError, IndicatorClassifier, Sex, SubjectProfile, WhoStandard,
};

use crate::utils::{assert_close, reference_date, store};

fn classified(outcome: StandardOutcome) -> (StandardLabel, f64) {
    match outcome {
        StandardOutcome::Classified(result) => (result.label, result.z_score.unwrap()),
        StandardOutcome::NotApplicable(reason) => panic!("not applicable: {reason:?}"),
    }
}

fn median_subject(standard: WhoStandard, sex: Sex, index: f64, median: f64) -> Option<SubjectProfile> {
    let subject = match standard {
        WhoStandard::WeightForAge => {
            SubjectProfile::new("m", index as u32, sex).with_weight(median).with_height(90.0)
        }
        WhoStandard::HeightForAge => {
            SubjectProfile::new("m", index as u32, sex).with_weight(12.0).with_height(median)
        }
        WhoStandard::WeightForHeight => {
            SubjectProfile::new("m", 24, sex).with_weight(median).with_height(index)
        }
        // A height of 1 m makes BMI equal to the weight
        WhoStandard::BmiForAge => {
            SubjectProfile::new("m", index as u32, sex).with_weight(median).with_height(100.0)
        }
        WhoStandard::BmiAdult => return None,
    };
    let window = IndicatorWindow::for_standard(standard);
    (standard == WhoStandard::WeightForHeight || window.contains(subject.age_months))
        .then_some(subject)
}

#[test]
fn test_median_yields_zero_and_normal() {
    let store = store();
    let classifier = IndicatorClassifier::new(&store);

    for standard in WhoStandard::ALL {
        let Some(indicator) = standard.indicator() else {
            continue;
        };
        for sex in [Sex::Male, Sex::Female] {
            for row in who_rows(indicator, sex).unwrap() {
                let Some(subject) = median_subject(standard, sex, row.index, row.median) else {
                    continue;
                };
                let (label, z) = classified(classifier.classify(standard, &subject).unwrap());
                assert_close(z, 0.0);
                assert_eq!(label.as_str(), "Normal", "{standard} {sex} at {}", row.index);
            }
        }
    }
}

#[test]
fn test_wfh_boundaries_resolve_upward() {
    let store = store();
    let classifier = IndicatorClassifier::new(&store);
    // Female reference at 85 cm: median 11.5 kg, SD 1.0 kg
    let at = |weight: f64| {
        let subject = SubjectProfile::new("b", 24, Sex::Female)
            .with_weight(weight)
            .with_height(85.0);
        classified(classifier.classify(WhoStandard::WeightForHeight, &subject).unwrap())
    };

    assert_eq!(
        at(8.5).0,
        StandardLabel::WeightForHeight(WeightForHeightLabel::Wasted)
    );
    assert_eq!(
        at(9.5).0,
        StandardLabel::WeightForHeight(WeightForHeightLabel::Normal)
    );
    assert_eq!(
        at(13.5).0,
        StandardLabel::WeightForHeight(WeightForHeightLabel::Normal)
    );
    assert_eq!(
        at(14.5).0,
        StandardLabel::WeightForHeight(WeightForHeightLabel::Overweight)
    );
    assert_eq!(
        at(8.0).0,
        StandardLabel::WeightForHeight(WeightForHeightLabel::SeverelyWasted)
    );
}

#[test]
fn test_non_positive_weight_only_affects_weight_indicators() {
    let store = store();
    let classifier = IndicatorClassifier::new(&store);
    let subject = SubjectProfile::new("w", 24, Sex::Male)
        .with_weight(0.0)
        .with_height(87.1);

    let outcomes = classifier.classify_all(&subject).unwrap();
    assert_eq!(
        *outcomes.get(WhoStandard::WeightForAge),
        StandardOutcome::NotApplicable(Ineligibility::MissingWeight)
    );
    assert!(outcomes.get(WhoStandard::HeightForAge).is_classified());
    assert_close(outcomes.z_score(WhoStandard::HeightForAge).unwrap(), 0.0);
}

#[test]
fn test_wfh_outside_table_is_not_applicable() {
    let store = store();
    let classifier = IndicatorClassifier::new(&store);
    let subject = SubjectProfile::new("t", 60, Sex::Male)
        .with_weight(25.0)
        .with_height(125.0);

    assert_eq!(
        classifier.classify(WhoStandard::WeightForHeight, &subject).unwrap(),
        StandardOutcome::NotApplicable(Ineligibility::OutsideReferenceRange)
    );
}

#[test]
fn test_unknown_sex_is_an_explicit_error() {
    let store = store();
    let classifier = IndicatorClassifier::new(&store);
    let subject = SubjectProfile::new("u1", 24, Sex::Unknown)
        .with_weight(12.0)
        .with_height(86.0);

    match classifier.classify(WhoStandard::WeightForAge, &subject) {
        Err(ClassificationError::UnknownSex { subject_id }) => assert_eq!(subject_id, "u1"),
        other => panic!("expected UnknownSex, got {other:?}"),
    }
    // Adult BMI is not sex-partitioned
    let adult = SubjectProfile::new("u2", 400, Sex::Unknown)
        .with_weight(60.0)
        .with_height(165.0);
    assert!(classifier.classify(WhoStandard::BmiAdult, &adult).unwrap().is_classified());
}

#[test]
fn test_age_resolver_is_pure_and_never_negative() {
    let formats = DateFormatConfig::default();
    let resolver = AgeResolver::with_today(&formats, reference_date());

    let first = resolver.resolve("2019-07-23", Some("2024-01-02"));
    assert_eq!(first, 53);
    assert_eq!(resolver.resolve("2019-07-23", Some("2024-01-02")), first);

    assert_eq!(resolver.resolve("2025-01-01", Some("2024-01-02")), 0);
    assert_eq!(resolver.resolve("not a date", Some("2024-01-02")), 0);
    assert_eq!(resolver.resolve("2019-07-23", Some("garbage")), 0);
    assert_eq!(resolver.resolve("2022-01-02", None), 24);
}
