//! Screening measurements
//!
//! A `Measurement` is the raw record of one screening event as it arrives from
//! the transport or persistence layer. It is immutable input: ages and
//! indicator values are always derived from it, never written back.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::DateFormatConfig;
use crate::models::types::Sex;

/// Largest plausible body weight in kg
pub const MAX_WEIGHT_KG: f64 = 200.0;
/// Largest plausible height in cm
pub const MAX_HEIGHT_CM: f64 = 300.0;

/// A single screening record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Subject identifier
    #[serde(default)]
    pub id: String,
    /// Sex of the subject
    #[serde(default)]
    pub sex: Sex,
    /// Date of birth as recorded
    #[serde(default)]
    pub birthday: String,
    /// Date (or date-time) of screening; absent means "now"
    #[serde(default)]
    pub screening_date: Option<String>,
    /// Body weight in kg
    #[serde(default)]
    pub weight_kg: f64,
    /// Height or recumbent length in cm
    #[serde(default)]
    pub height_cm: f64,
    /// Mid-upper-arm circumference in cm
    #[serde(default)]
    pub muac_cm: Option<f64>,
    /// Pregnancy status
    #[serde(default)]
    pub is_pregnant: bool,
}

impl Measurement {
    /// Create a measurement from a birthday and optional screening date
    pub fn new(
        id: impl Into<String>,
        sex: Sex,
        birthday: impl Into<String>,
        screening_date: Option<&str>,
        weight_kg: f64,
        height_cm: f64,
    ) -> Self {
        Self {
            id: id.into(),
            sex,
            birthday: birthday.into(),
            screening_date: screening_date.map(str::to_string),
            weight_kg,
            height_cm,
            muac_cm: None,
            is_pregnant: false,
        }
    }

    /// Attach a MUAC measurement
    #[must_use]
    pub const fn with_muac(mut self, muac_cm: f64) -> Self {
        self.muac_cm = Some(muac_cm);
        self
    }

    /// Set the pregnancy flag
    #[must_use]
    pub const fn pregnant(mut self, is_pregnant: bool) -> Self {
        self.is_pregnant = is_pregnant;
        self
    }

    /// Check the record for implausible values
    ///
    /// Issues are advisory: classification still runs, and non-positive
    /// values only make the affected indicators not applicable.
    #[must_use]
    pub fn validate(&self, formats: &DateFormatConfig) -> Vec<MeasurementIssue> {
        let mut issues = Vec::new();

        if !self.sex.is_known() {
            issues.push(MeasurementIssue::UnknownSex);
        }
        if !(self.weight_kg > 0.0 && self.weight_kg <= MAX_WEIGHT_KG) {
            issues.push(MeasurementIssue::WeightOutOfRange {
                weight_kg: self.weight_kg,
            });
        }
        if !(self.height_cm > 0.0 && self.height_cm <= MAX_HEIGHT_CM) {
            issues.push(MeasurementIssue::HeightOutOfRange {
                height_cm: self.height_cm,
            });
        }
        if let Some(muac) = self.muac_cm {
            if !(muac > 0.0 && muac.is_finite()) {
                issues.push(MeasurementIssue::MuacOutOfRange { muac_cm: muac });
            }
        }
        if self.is_pregnant && self.sex == Sex::Male {
            issues.push(MeasurementIssue::PregnancyFlagOnMale);
        }

        let birthday = formats.parse(&self.birthday);
        if birthday.is_none() {
            issues.push(MeasurementIssue::UnparsableBirthday {
                value: self.birthday.clone(),
            });
        }

        let screening = match &self.screening_date {
            Some(raw) => {
                let parsed = formats.parse(raw);
                if parsed.is_none() {
                    issues.push(MeasurementIssue::UnparsableScreeningDate { value: raw.clone() });
                }
                parsed
            }
            None => None,
        };

        if let (Some(birthday), Some(screening)) = (birthday, screening) {
            if birthday > screening {
                issues.push(MeasurementIssue::BirthdayAfterScreening {
                    birthday,
                    screening,
                });
            }
        }

        issues
    }
}

/// An implausible value found by [`Measurement::validate`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum MeasurementIssue {
    /// Sex is neither Male nor Female
    UnknownSex,
    /// Weight outside (0, 200] kg
    WeightOutOfRange {
        /// Recorded weight
        weight_kg: f64,
    },
    /// Height outside (0, 300] cm
    HeightOutOfRange {
        /// Recorded height
        height_cm: f64,
    },
    /// MUAC present but not a positive number
    MuacOutOfRange {
        /// Recorded MUAC
        muac_cm: f64,
    },
    /// Pregnancy flag set on a male subject
    PregnancyFlagOnMale,
    /// Birthday could not be parsed
    UnparsableBirthday {
        /// Raw value
        value: String,
    },
    /// Screening date could not be parsed
    UnparsableScreeningDate {
        /// Raw value
        value: String,
    },
    /// Birthday lies after the screening date
    BirthdayAfterScreening {
        /// Parsed birthday
        birthday: NaiveDate,
        /// Parsed screening date
        screening: NaiveDate,
    },
}

impl fmt::Display for MeasurementIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSex => write!(f, "sex must be Male or Female"),
            Self::WeightOutOfRange { weight_kg } => {
                write!(f, "weight {weight_kg} kg outside (0, {MAX_WEIGHT_KG}]")
            }
            Self::HeightOutOfRange { height_cm } => {
                write!(f, "height {height_cm} cm outside (0, {MAX_HEIGHT_CM}]")
            }
            Self::MuacOutOfRange { muac_cm } => write!(f, "MUAC {muac_cm} cm is not positive"),
            Self::PregnancyFlagOnMale => write!(f, "pregnancy flag set on a male subject"),
            Self::UnparsableBirthday { value } => write!(f, "unparsable birthday '{value}'"),
            Self::UnparsableScreeningDate { value } => {
                write!(f, "unparsable screening date '{value}'")
            }
            Self::BirthdayAfterScreening {
                birthday,
                screening,
            } => write!(f, "birthday {birthday} is after screening date {screening}"),
        }
    }
}
