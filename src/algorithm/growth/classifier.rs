//! Indicator classification
//!
//! The `IndicatorClassifier` is the one place where an indicator is evaluated
//! for a subject: eligibility window, reference lookup, z-score and cut-point
//! band. The per-standard population reports and the composite decision tree
//! both go through it.

use std::fmt;

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::algorithm::growth::reference::ReferenceTableStore;
use crate::algorithm::growth::zscore::{round2, z_score};
use crate::error::{ClassificationError, Result};
use crate::models::labels::{ChildMuacLabel, MaternalMuacLabel, StandardLabel};
use crate::models::types::{Indicator, WhoStandard};
use crate::models::{AdultBmiLabel, SubjectProfile};
use crate::standards::cutpoints::{
    ADULT_BMI_BANDS, BMI_FOR_AGE_BANDS, CHILD_MUAC_BANDS, HEIGHT_FOR_AGE_BANDS,
    MATERNAL_MUAC_BANDS, WEIGHT_FOR_AGE_BANDS, WEIGHT_FOR_HEIGHT_BANDS,
};
use crate::standards::windows::CHILD_MUAC_WINDOW;
use crate::standards::{IndicatorWindow, classify_bands};

/// Why a standard produced no label for a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligibility {
    /// Age outside the standard's eligibility window
    OutsideAgeWindow,
    /// Weight missing or non-positive
    MissingWeight,
    /// Height missing or non-positive
    MissingHeight,
    /// Index value outside the tabulated reference span
    OutsideReferenceRange,
    /// Computed value could not be placed in a band
    InvalidValue,
    /// The lookup is partitioned by sex and the subject's sex is unknown
    UnknownSex,
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::OutsideAgeWindow => "outside age window",
            Self::MissingWeight => "missing weight",
            Self::MissingHeight => "missing height",
            Self::OutsideReferenceRange => "outside reference range",
            Self::InvalidValue => "invalid value",
            Self::UnknownSex => "unknown sex",
        };
        write!(f, "{reason}")
    }
}

/// A label with the numbers that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorResult {
    /// Assigned label
    pub label: StandardLabel,
    /// z-score, absent for the fixed adult BMI cut-points
    pub z_score: Option<f64>,
    /// Observed value: weight, height or BMI
    pub observed: f64,
}

/// Outcome of evaluating one standard for one subject
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StandardOutcome {
    /// The subject was eligible and received a label
    Classified(IndicatorResult),
    /// The subject counts as "No Data" for this standard
    NotApplicable(Ineligibility),
}

impl StandardOutcome {
    /// Assigned label, if any
    #[must_use]
    pub const fn label(&self) -> Option<StandardLabel> {
        match self {
            Self::Classified(result) => Some(result.label),
            Self::NotApplicable(_) => None,
        }
    }

    /// z-score, if one was computed
    #[must_use]
    pub const fn z_score(&self) -> Option<f64> {
        match self {
            Self::Classified(result) => result.z_score,
            Self::NotApplicable(_) => None,
        }
    }

    /// Whether the subject received a label
    #[must_use]
    pub const fn is_classified(&self) -> bool {
        matches!(self, Self::Classified(_))
    }

    /// Whether the standard needed a sex the subject does not have
    #[must_use]
    pub const fn is_unknown_sex(&self) -> bool {
        matches!(self, Self::NotApplicable(Ineligibility::UnknownSex))
    }
}

/// Outcomes of all five standards for one subject
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorOutcomes {
    outcomes: [StandardOutcome; 5],
}

impl IndicatorOutcomes {
    /// Outcome of one standard
    #[must_use]
    pub const fn get(&self, standard: WhoStandard) -> &StandardOutcome {
        &self.outcomes[standard as usize]
    }

    /// Label of one standard, if eligible
    #[must_use]
    pub const fn label(&self, standard: WhoStandard) -> Option<StandardLabel> {
        self.get(standard).label()
    }

    /// z-score of one standard, if computed
    #[must_use]
    pub const fn z_score(&self, standard: WhoStandard) -> Option<f64> {
        self.get(standard).z_score()
    }

    /// Iterate over (standard, outcome) in report order
    pub fn iter(&self) -> impl Iterator<Item = (WhoStandard, &StandardOutcome)> {
        WhoStandard::ALL.into_iter().zip(self.outcomes.iter())
    }

    /// Rounded z-scores keyed by standard, for reporting
    #[must_use]
    pub fn z_scores(&self) -> ZScores<'_> {
        ZScores(self)
    }
}

// {standard-key: label | null}
impl Serialize for IndicatorOutcomes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.outcomes.len()))?;
        for (standard, outcome) in self.iter() {
            map.serialize_entry(standard.key(), &outcome.label())?;
        }
        map.end()
    }
}

/// Serialization view of the z-scores in an [`IndicatorOutcomes`]
#[derive(Debug, Clone, Copy)]
pub struct ZScores<'a>(&'a IndicatorOutcomes);

impl Serialize for ZScores<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (standard, outcome) in self.0.iter() {
            if standard.indicator().is_some() {
                map.serialize_entry(standard.key(), &outcome.z_score().map(round2))?;
            }
        }
        map.end()
    }
}

/// Classifies individual standards against a shared reference store
#[derive(Debug, Clone, Copy)]
pub struct IndicatorClassifier<'a> {
    store: &'a ReferenceTableStore,
}

impl<'a> IndicatorClassifier<'a> {
    /// Create a classifier over a reference store
    #[must_use]
    pub const fn new(store: &'a ReferenceTableStore) -> Self {
        Self { store }
    }

    /// Evaluate one standard for a subject
    ///
    /// Eligibility (age window, valid measurements) is checked before the sex,
    /// so an unknown sex only fails standards the subject could otherwise use.
    ///
    /// # Errors
    /// `UnknownSex` when a sex-partitioned lookup is required.
    pub fn classify(&self, standard: WhoStandard, subject: &SubjectProfile) -> Result<StandardOutcome> {
        use StandardOutcome::NotApplicable;

        if !IndicatorWindow::for_standard(standard).contains(subject.age_months) {
            return Ok(NotApplicable(Ineligibility::OutsideAgeWindow));
        }

        let age = f64::from(subject.age_months);
        let (indicator, index, observed) = match standard {
            WhoStandard::WeightForAge => match subject.weight_kg {
                Some(weight) => (Indicator::WeightForAge, age, weight),
                None => return Ok(NotApplicable(Ineligibility::MissingWeight)),
            },
            WhoStandard::HeightForAge => match subject.height_cm {
                Some(height) => (Indicator::HeightForAge, age, height),
                None => return Ok(NotApplicable(Ineligibility::MissingHeight)),
            },
            WhoStandard::WeightForHeight => match (subject.weight_kg, subject.height_cm) {
                (Some(weight), Some(height)) => (Indicator::WeightForHeight, height, weight),
                (None, _) => return Ok(NotApplicable(Ineligibility::MissingWeight)),
                (_, None) => return Ok(NotApplicable(Ineligibility::MissingHeight)),
            },
            WhoStandard::BmiForAge => match Self::bmi_or_missing(subject) {
                Ok(bmi) => (Indicator::BmiForAge, age, bmi),
                Err(reason) => return Ok(NotApplicable(reason)),
            },
            WhoStandard::BmiAdult => {
                return Ok(match Self::bmi_or_missing(subject) {
                    Ok(bmi) => match Self::classify_adult_bmi(bmi) {
                        Some(label) => StandardOutcome::Classified(IndicatorResult {
                            label: StandardLabel::BmiAdult(label),
                            z_score: None,
                            observed: bmi,
                        }),
                        None => NotApplicable(Ineligibility::InvalidValue),
                    },
                    Err(reason) => NotApplicable(reason),
                });
            }
        };

        let Some(z) = self.z_for(indicator, subject, index, observed)? else {
            return Ok(NotApplicable(Ineligibility::OutsideReferenceRange));
        };

        let label = match indicator {
            Indicator::WeightForAge => {
                classify_bands(&WEIGHT_FOR_AGE_BANDS, z).map(StandardLabel::WeightForAge)
            }
            Indicator::HeightForAge => {
                classify_bands(&HEIGHT_FOR_AGE_BANDS, z).map(StandardLabel::HeightForAge)
            }
            Indicator::WeightForHeight => {
                classify_bands(&WEIGHT_FOR_HEIGHT_BANDS, z).map(StandardLabel::WeightForHeight)
            }
            Indicator::BmiForAge => {
                classify_bands(&BMI_FOR_AGE_BANDS, z).map(StandardLabel::BmiForAge)
            }
        };

        Ok(label.map_or(NotApplicable(Ineligibility::InvalidValue), |label| {
            StandardOutcome::Classified(IndicatorResult {
                label,
                z_score: Some(z),
                observed,
            })
        }))
    }

    /// Evaluate all five standards for a subject
    ///
    /// A standard that needs a sex-partitioned lookup for a subject of unknown
    /// sex is recorded as [`Ineligibility::UnknownSex`]; whether that is fatal
    /// depends on the branch the subject is routed to.
    ///
    /// # Errors
    /// Any lookup failure other than an unknown sex.
    pub fn classify_all(&self, subject: &SubjectProfile) -> Result<IndicatorOutcomes> {
        let mut outcomes = [StandardOutcome::NotApplicable(Ineligibility::OutsideAgeWindow); 5];
        for (slot, standard) in outcomes.iter_mut().zip(WhoStandard::ALL) {
            *slot = match self.classify(standard, subject) {
                Err(ClassificationError::UnknownSex { .. }) => {
                    StandardOutcome::NotApplicable(Ineligibility::UnknownSex)
                }
                outcome => outcome?,
            };
        }
        Ok(IndicatorOutcomes { outcomes })
    }

    /// z-score of an observation, `None` when the index is outside the table
    fn z_for(
        &self,
        indicator: Indicator,
        subject: &SubjectProfile,
        index: f64,
        observed: f64,
    ) -> Result<Option<f64>> {
        match self.store.lookup(indicator, subject.sex, index) {
            Ok(row) => Ok(z_score(observed, &row).filter(|z| z.is_finite())),
            Err(e) if e.is_out_of_reference_range() => Ok(None),
            Err(ClassificationError::UnknownSex { .. }) => {
                Err(ClassificationError::unknown_sex(subject.subject_id.clone()))
            }
            Err(e) => Err(e),
        }
    }

    fn bmi_or_missing(subject: &SubjectProfile) -> std::result::Result<f64, Ineligibility> {
        match (subject.weight_kg, subject.height_cm) {
            (None, _) => Err(Ineligibility::MissingWeight),
            (_, None) => Err(Ineligibility::MissingHeight),
            _ => subject.bmi().ok_or(Ineligibility::InvalidValue),
        }
    }

    /// Fixed adult BMI cut-points
    #[must_use]
    pub fn classify_adult_bmi(bmi: f64) -> Option<AdultBmiLabel> {
        classify_bands(&ADULT_BMI_BANDS, bmi)
    }

    /// Child MUAC label, for subjects aged 6-59 months with a MUAC
    #[must_use]
    pub fn classify_child_muac(subject: &SubjectProfile) -> Option<ChildMuacLabel> {
        if !CHILD_MUAC_WINDOW.contains(subject.age_months) {
            return None;
        }
        classify_bands(&CHILD_MUAC_BANDS, subject.muac_cm?)
    }

    /// Maternal MUAC label, at any age
    #[must_use]
    pub fn classify_maternal_muac(subject: &SubjectProfile) -> Option<MaternalMuacLabel> {
        classify_bands(&MATERNAL_MUAC_BANDS, subject.muac_cm?)
    }
}
