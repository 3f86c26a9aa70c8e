//! Composite severity resolution
//!
//! Combines the per-indicator results selected by the router into one clinical
//! label. The child branch is a first-match decision list; the maternal and
//! adult branches take their single measurement's label directly.

use std::fmt;

use serde::Serialize;

use crate::algorithm::diagnosis::router::{BranchIndicator, LifeStageRouter};
use crate::algorithm::growth::{IndicatorClassifier, IndicatorOutcomes};
use crate::error::{ClassificationError, Result};
use crate::models::labels::{ChildCompositeLabel, ChildMuacLabel, MuacLabel, OverallClassification};
use crate::models::types::{LifeStage, WhoStandard};
use crate::models::SubjectProfile;
use crate::standards::cutpoints::{MILD_WASTING_Z, MODERATE_WASTING_Z, SEVERE_WASTING_Z, STUNTING_Z};
use crate::standards::windows::HFA_PROXY_BELOW_MONTHS;

/// Measurement that decided the composite label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBasis {
    /// Weight-for-height z-score
    WeightForHeight,
    /// BMI-for-age z-score in place of weight-for-height
    BmiForAge,
    /// Height-for-age z-score standing in for weight-for-height
    HeightForAgeProxy,
    /// Child MUAC
    ChildMuac,
    /// Height-for-age z-score (stunting)
    HeightForAge,
    /// Maternal MUAC
    MaternalMuac,
    /// Adult BMI
    AdultBmi,
    /// Nothing usable was measured
    Insufficient,
}

impl DecisionBasis {
    /// Human-readable name of the measurement
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::WeightForHeight => "Weight-for-height z-score",
            Self::BmiForAge => "BMI-for-age z-score",
            Self::HeightForAgeProxy => "Height-for-age z-score (weight-for-height proxy)",
            Self::ChildMuac => "Arm circumference (MUAC)",
            Self::HeightForAge => "Height-for-age z-score",
            Self::MaternalMuac => "Arm circumference (MUAC)",
            Self::AdultBmi => "Body Mass Index (BMI)",
            Self::Insufficient => "No usable measurement",
        }
    }
}

impl fmt::Display for DecisionBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Composite result of the single-subject decision tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Diagnosis {
    /// Branch the subject was routed to
    pub stage: LifeStage,
    /// Composite label
    pub overall: OverallClassification,
    /// Measurement that decided the label
    pub basis: DecisionBasis,
    /// z-score used for the acute-malnutrition rules, child branch only
    pub wasting_z: Option<f64>,
    /// MUAC label, when MUAC was part of the branch
    pub muac: Option<MuacLabel>,
    /// BMI, when weight and height were valid
    pub bmi: Option<f64>,
}

/// Resolves the composite label for a routed subject
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityResolver;

impl SeverityResolver {
    /// Route a subject, evaluate its indicators and resolve the composite label
    ///
    /// Standards outside the routed branch may fail on an unknown sex without
    /// affecting the result; they are reported as not applicable.
    ///
    /// # Errors
    /// `UnknownSex` when a measurement the routed branch relies on needs a
    /// sex-partitioned lookup.
    pub fn diagnose(
        router: &LifeStageRouter,
        classifier: &IndicatorClassifier<'_>,
        subject: &SubjectProfile,
    ) -> Result<(IndicatorOutcomes, Diagnosis)> {
        let stage = router.route(subject);
        let outcomes = classifier.classify_all(subject)?;
        if Self::needs_missing_sex(stage, subject, &outcomes) {
            return Err(ClassificationError::unknown_sex(subject.subject_id.clone()));
        }
        let diagnosis = Self::resolve(stage, subject, &outcomes);
        Ok((outcomes, diagnosis))
    }

    // A maternal subject without MUAC is judged on the fallback branch
    fn needs_missing_sex(
        stage: LifeStage,
        subject: &SubjectProfile,
        outcomes: &IndicatorOutcomes,
    ) -> bool {
        let stage = match stage {
            LifeStage::PregnantWoman => {
                if IndicatorClassifier::classify_maternal_muac(subject).is_some() {
                    return false;
                }
                LifeStageRouter::non_pregnant_stage(subject)
            }
            other => other,
        };
        LifeStageRouter::indicators(stage, subject.age_months)
            .into_iter()
            .filter_map(BranchIndicator::standard)
            .any(|standard| outcomes.get(standard).is_unknown_sex())
    }

    /// Resolve the composite label for a subject in the given branch
    #[must_use]
    pub fn resolve(
        stage: LifeStage,
        subject: &SubjectProfile,
        outcomes: &IndicatorOutcomes,
    ) -> Diagnosis {
        match stage {
            LifeStage::ChildAdolescent => Self::resolve_child(subject, outcomes),
            LifeStage::PregnantWoman => Self::resolve_maternal(subject, outcomes),
            LifeStage::Adult => Self::resolve_adult(subject),
        }
    }

    fn resolve_child(subject: &SubjectProfile, outcomes: &IndicatorOutcomes) -> Diagnosis {
        let available = LifeStageRouter::indicators(LifeStage::ChildAdolescent, subject.age_months);
        let uses = |indicator| available.contains(&indicator);

        let wasting = uses(BranchIndicator::WeightForHeight)
            .then(|| outcomes.z_score(WhoStandard::WeightForHeight))
            .flatten()
            .map(|z| (z, DecisionBasis::WeightForHeight))
            .or_else(|| {
                uses(BranchIndicator::BmiForAge)
                    .then(|| outcomes.z_score(WhoStandard::BmiForAge))
                    .flatten()
                    .map(|z| (z, DecisionBasis::BmiForAge))
            })
            .or_else(|| {
                (subject.age_months < HFA_PROXY_BELOW_MONTHS)
                    .then(|| outcomes.z_score(WhoStandard::HeightForAge))
                    .flatten()
                    .map(|z| (z, DecisionBasis::HeightForAgeProxy))
            });
        let muac = uses(BranchIndicator::ChildMuac)
            .then(|| IndicatorClassifier::classify_child_muac(subject))
            .flatten();
        let hfa_z = uses(BranchIndicator::HeightForAge)
            .then(|| outcomes.z_score(WhoStandard::HeightForAge))
            .flatten();

        let wasting_z = wasting.map(|(z, _)| z);
        let wasting_basis = wasting.map_or(DecisionBasis::Insufficient, |(_, basis)| basis);
        let z_below = |edge: f64| wasting_z.is_some_and(|z| z < edge);

        let (label, basis) = if z_below(SEVERE_WASTING_Z) {
            (ChildCompositeLabel::SevereAcuteMalnutrition, wasting_basis)
        } else if muac == Some(ChildMuacLabel::SevereAcuteMalnutrition) {
            (ChildCompositeLabel::SevereAcuteMalnutrition, DecisionBasis::ChildMuac)
        } else if z_below(MODERATE_WASTING_Z) {
            (ChildCompositeLabel::ModerateAcuteMalnutrition, wasting_basis)
        } else if muac == Some(ChildMuacLabel::ModerateAcuteMalnutrition) {
            (ChildCompositeLabel::ModerateAcuteMalnutrition, DecisionBasis::ChildMuac)
        } else if z_below(MILD_WASTING_Z) {
            (ChildCompositeLabel::MildAcuteMalnutrition, wasting_basis)
        } else if muac == Some(ChildMuacLabel::AtRisk) {
            (ChildCompositeLabel::MildAcuteMalnutrition, DecisionBasis::ChildMuac)
        } else if hfa_z.is_some_and(|z| z < STUNTING_Z) {
            (ChildCompositeLabel::Stunting, DecisionBasis::HeightForAge)
        } else if wasting.is_some() {
            (ChildCompositeLabel::Normal, wasting_basis)
        } else if muac.is_some() {
            (ChildCompositeLabel::Normal, DecisionBasis::ChildMuac)
        } else if hfa_z.is_some() {
            (ChildCompositeLabel::Normal, DecisionBasis::HeightForAge)
        } else {
            return Diagnosis {
                stage: LifeStage::ChildAdolescent,
                overall: OverallClassification::NoData,
                basis: DecisionBasis::Insufficient,
                wasting_z: None,
                muac: None,
                bmi: subject.bmi(),
            };
        };

        Diagnosis {
            stage: LifeStage::ChildAdolescent,
            overall: OverallClassification::Child(label),
            basis,
            wasting_z,
            muac: muac.map(MuacLabel::Child),
            bmi: subject.bmi(),
        }
    }

    // Missing MUAC falls back to the branch the subject would take unflagged
    fn resolve_maternal(subject: &SubjectProfile, outcomes: &IndicatorOutcomes) -> Diagnosis {
        match IndicatorClassifier::classify_maternal_muac(subject) {
            Some(label) => Diagnosis {
                stage: LifeStage::PregnantWoman,
                overall: OverallClassification::Maternal(label),
                basis: DecisionBasis::MaternalMuac,
                wasting_z: None,
                muac: Some(MuacLabel::Maternal(label)),
                bmi: subject.bmi(),
            },
            None => {
                let fallback = match LifeStageRouter::non_pregnant_stage(subject) {
                    LifeStage::ChildAdolescent => Self::resolve_child(subject, outcomes),
                    _ => Self::resolve_adult(subject),
                };
                Diagnosis {
                    stage: LifeStage::PregnantWoman,
                    ..fallback
                }
            }
        }
    }

    fn resolve_adult(subject: &SubjectProfile) -> Diagnosis {
        let bmi = subject.bmi();
        let (overall, basis) = match bmi.and_then(IndicatorClassifier::classify_adult_bmi) {
            Some(label) => (OverallClassification::Adult(label), DecisionBasis::AdultBmi),
            None => (OverallClassification::NoData, DecisionBasis::Insufficient),
        };
        Diagnosis {
            stage: LifeStage::Adult,
            overall,
            basis,
            wasting_z: None,
            muac: None,
            bmi,
        }
    }
}
