//! Common domain type definitions
//!
//! This module contains the enum types shared across the engine: subject sex,
//! the reference-table indicators, the five reporting standards and life stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sex of a screened subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
    /// Unknown or not specified
    #[default]
    Unknown,
}

impl Sex {
    /// Whether this sex selects a reference-table partition
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl From<&str> for Sex {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "boy" | "1" => Self::Male,
            "f" | "female" | "girl" | "2" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

impl Serialize for Sex {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Transport records carry free-text sex values; anything unrecognised becomes Unknown
impl<'de> Deserialize<'de> for Sex {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Unknown, Self::from))
    }
}

/// Growth indicators that have a tabulated WHO reference distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    /// Weight-for-Age, indexed by age in months
    WeightForAge,
    /// Height/Length-for-Age, indexed by age in months
    HeightForAge,
    /// Weight-for-Height, indexed by height in cm
    WeightForHeight,
    /// BMI-for-Age, indexed by age in months
    BmiForAge,
}

impl Indicator {
    /// All indicators with reference tables
    pub const ALL: [Self; 4] = [
        Self::WeightForAge,
        Self::HeightForAge,
        Self::WeightForHeight,
        Self::BmiForAge,
    ];

    /// Short code used in logs
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::WeightForAge => "WFA",
            Self::HeightForAge => "HFA",
            Self::WeightForHeight => "WFH",
            Self::BmiForAge => "BMI-for-age",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The five WHO standards reported independently for a population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhoStandard {
    /// Weight-for-Age (0-71 months)
    WeightForAge,
    /// Height/Length-for-Age (0-71 months)
    HeightForAge,
    /// Weight-for-Height (0-60 months)
    WeightForHeight,
    /// BMI-for-Age (24-227 months)
    BmiForAge,
    /// Fixed adult BMI cut-points (228 months and over)
    BmiAdult,
}

impl WhoStandard {
    /// All reporting standards in report order
    pub const ALL: [Self; 5] = [
        Self::WeightForAge,
        Self::HeightForAge,
        Self::WeightForHeight,
        Self::BmiForAge,
        Self::BmiAdult,
    ];

    /// Stable key used in serialized output
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::WeightForAge => "weight-for-age",
            Self::HeightForAge => "height-for-age",
            Self::WeightForHeight => "weight-for-height",
            Self::BmiForAge => "bmi-for-age",
            Self::BmiAdult => "bmi-adult",
        }
    }

    /// The reference-table indicator behind this standard, if any
    #[must_use]
    pub const fn indicator(self) -> Option<Indicator> {
        match self {
            Self::WeightForAge => Some(Indicator::WeightForAge),
            Self::HeightForAge => Some(Indicator::HeightForAge),
            Self::WeightForHeight => Some(Indicator::WeightForHeight),
            Self::BmiForAge => Some(Indicator::BmiForAge),
            Self::BmiAdult => None,
        }
    }
}

impl fmt::Display for WhoStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Life stage branch chosen for a single-subject diagnosis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    /// Under 18 years
    ChildAdolescent,
    /// Pregnant, assessed by MUAC
    PregnantWoman,
    /// 18 years or older and not pregnant
    Adult,
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ChildAdolescent => "Child/Adolescent",
            Self::PregnantWoman => "Pregnant Woman",
            Self::Adult => "Adult/Elderly",
        };
        write!(f, "{name}")
    }
}
