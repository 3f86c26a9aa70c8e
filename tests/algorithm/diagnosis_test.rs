//! Single-subject decision tree through the engine facade

use nutri_classify::algorithm::diagnosis::{DecisionBasis, NutritionCategory};
use nutri_classify::models::{AdultBmiLabel, ChildCompositeLabel, MaternalMuacLabel};
use nutri_classify::{
    BranchPrecedence, ClassificationError, LifeStage, Measurement, NutritionEngine,
    OverallClassification, RiskLevel, Sex, SubjectProfile, WhoStandard,
};

use crate::utils::{assert_close, engine, test_config};

#[test]
fn test_female_at_wfh_median_is_normal() {
    let m = Measurement::new("f24", Sex::Female, "2022-01-02", Some("2024-01-02"), 11.5, 85.0);
    let result = engine().classify_person(&m).unwrap();

    assert_eq!(result.age_months, 24);
    assert_eq!(result.life_stage(), LifeStage::ChildAdolescent);
    assert_close(result.diagnosis.wasting_z.unwrap(), 0.0);
    assert_eq!(
        result.overall_classification(),
        OverallClassification::Child(ChildCompositeLabel::Normal)
    );
    assert_eq!(result.basis(), DecisionBasis::WeightForHeight);
    assert_eq!(result.category, NutritionCategory::Normal);
    assert_eq!(result.risk.level, RiskLevel::Low);
}

#[test]
fn test_child_muac_sam_regardless_of_wfh() {
    let m = Measurement::new("c30", Sex::Male, "2021-07-02", Some("2024-01-02"), 13.3, 91.9)
        .with_muac(10.5);
    let result = engine().classify_person(&m).unwrap();

    assert_eq!(result.age_months, 30);
    assert_eq!(
        result.overall_classification(),
        OverallClassification::Child(ChildCompositeLabel::SevereAcuteMalnutrition)
    );
    assert_eq!(result.basis(), DecisionBasis::ChildMuac);
    assert_eq!(result.risk.level, RiskLevel::Severe);
}

#[test]
fn test_adult_bmi_severe_underweight() {
    let m = Measurement::new("a", Sex::Female, "1985-03-10", Some("2024-01-02"), 40.0, 170.0);
    let result = engine().classify_person(&m).unwrap();

    assert_eq!(result.life_stage(), LifeStage::Adult);
    assert_close((result.diagnosis.bmi.unwrap() * 10.0).round() / 10.0, 13.8);
    assert_eq!(
        result.overall_classification(),
        OverallClassification::Adult(AdultBmiLabel::SevereUnderweight)
    );
}

#[test]
fn test_pregnant_muac_irrespective_of_age() {
    let engine = engine();
    for birthday in ["1994-05-01", "2007-01-01"] {
        let m = Measurement::new("p", Sex::Female, birthday, Some("2024-01-02"), 55.0, 160.0)
            .pregnant(true)
            .with_muac(22.0);
        let result = engine.classify_person(&m).unwrap();

        assert_eq!(result.life_stage(), LifeStage::PregnantWoman);
        assert_eq!(
            result.overall_classification(),
            OverallClassification::Maternal(MaternalMuacLabel::Undernutrition)
        );
        assert_eq!(
            result.overall_classification().as_str(),
            "Maternal Undernutrition (At-risk)"
        );
    }
}

#[test]
fn test_child_first_precedence_routes_pregnant_minor_to_child_branch() {
    let config = test_config().with_branch_precedence(BranchPrecedence::ChildFirst);
    let engine = NutritionEngine::new(config).unwrap();
    let subject = SubjectProfile::new("p17", 204, Sex::Female)
        .with_weight(52.0)
        .with_height(160.0)
        .with_muac(22.0)
        .with_pregnancy(true);

    let result = engine.classify_profile(&subject).unwrap();
    assert_eq!(result.life_stage(), LifeStage::ChildAdolescent);
    assert_eq!(result.basis(), DecisionBasis::BmiForAge);
}

#[test]
fn test_pregnant_without_muac_falls_back_to_adult_bmi() {
    let subject = SubjectProfile::new("p", 300, Sex::Female)
        .with_weight(60.0)
        .with_height(165.0)
        .with_pregnancy(true);
    let result = engine().classify_profile(&subject).unwrap();

    assert_eq!(result.life_stage(), LifeStage::PregnantWoman);
    assert_eq!(result.basis(), DecisionBasis::AdultBmi);
    assert_eq!(
        result.overall_classification(),
        OverallClassification::Adult(AdultBmiLabel::Normal)
    );
}

#[test]
fn test_pregnancy_flag_on_male_is_ignored() {
    let m = Measurement::new("m", Sex::Male, "1990-01-01", Some("2024-01-02"), 70.0, 175.0)
        .pregnant(true)
        .with_muac(22.0);
    let result = engine().classify_person(&m).unwrap();

    assert_eq!(result.life_stage(), LifeStage::Adult);
    assert!(!result.issues.is_empty());
}

#[test]
fn test_child_without_measurements_is_no_data() {
    let subject = SubjectProfile::new("empty", 12, Sex::Female);
    let result = engine().classify_profile(&subject).unwrap();

    assert_eq!(result.overall_classification(), OverallClassification::NoData);
    assert_eq!(result.category, NutritionCategory::Unclassified);
}

#[test]
fn test_unknown_sex_adult_in_bmi_for_age_window() {
    let subject = SubjectProfile::new("a220", 220, Sex::Unknown)
        .with_weight(70.0)
        .with_height(175.0);
    let result = engine().classify_profile(&subject).unwrap();

    assert_eq!(result.life_stage(), LifeStage::Adult);
    assert_eq!(
        result.overall_classification(),
        OverallClassification::Adult(AdultBmiLabel::Normal)
    );
    assert_close((result.diagnosis.bmi.unwrap() * 10.0).round() / 10.0, 22.9);
    assert_eq!(result.per_indicator.label(WhoStandard::BmiForAge), None);
}

#[test]
fn test_unknown_sex_pregnant_minor_uses_muac() {
    let subject = SubjectProfile::new("p200", 200, Sex::Unknown)
        .with_weight(50.0)
        .with_height(158.0)
        .with_muac(24.0)
        .with_pregnancy(true);
    let result = engine().classify_profile(&subject).unwrap();

    assert_eq!(result.life_stage(), LifeStage::PregnantWoman);
    assert_eq!(result.basis(), DecisionBasis::MaternalMuac);
    assert_eq!(
        result.overall_classification(),
        OverallClassification::Maternal(MaternalMuacLabel::AtRisk)
    );

    // Without MUAC the child fallback needs BMI-for-age, which is sex-specific
    let without_muac = SubjectProfile::new("p200", 200, Sex::Unknown)
        .with_weight(50.0)
        .with_height(158.0)
        .with_pregnancy(true);
    match engine().classify_profile(&without_muac) {
        Err(ClassificationError::UnknownSex { subject_id }) => assert_eq!(subject_id, "p200"),
        other => panic!("expected UnknownSex, got {other:?}"),
    }
}
