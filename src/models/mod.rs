//! Domain models for nutritional classification
//!
//! This module contains the input records, the resolved subject profile and
//! the closed label enumerations produced by the classifiers.

pub mod labels;
pub mod measurement;
pub mod subject;
pub mod types;

// Re-export commonly used types
pub use labels::{
    AdultBmiLabel, BmiForAgeLabel, ChildCompositeLabel, ChildMuacLabel, HeightForAgeLabel,
    MaternalMuacLabel, MuacLabel, NO_DATA, OverallClassification, StandardLabel,
    WeightForAgeLabel, WeightForHeightLabel,
};
pub use measurement::{Measurement, MeasurementIssue};
pub use subject::SubjectProfile;
pub use types::{Indicator, LifeStage, Sex, WhoStandard};
