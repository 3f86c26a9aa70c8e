//! Resolved subject profile
//!
//! The engine never classifies a raw [`Measurement`](super::Measurement)
//! directly. Dates are first resolved to an age in months, and measurement
//! values are normalised so that a non-positive or non-finite number reads as
//! "missing". Every classifier works from this profile.

use serde::Serialize;

use crate::models::types::Sex;

/// A screened subject with a resolved age and validated measurements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectProfile {
    /// Subject identifier
    pub subject_id: String,
    /// Completed months of age
    pub age_months: u32,
    /// Sex of the subject
    pub sex: Sex,
    /// Weight in kg, if positive
    pub weight_kg: Option<f64>,
    /// Height in cm, if positive
    pub height_cm: Option<f64>,
    /// MUAC in cm, if present and positive
    pub muac_cm: Option<f64>,
    /// Pregnancy status
    pub is_pregnant: bool,
}

/// Keep only positive, finite values
#[must_use]
pub fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

impl SubjectProfile {
    /// Create a profile with no measurements
    pub fn new(subject_id: impl Into<String>, age_months: u32, sex: Sex) -> Self {
        Self {
            subject_id: subject_id.into(),
            age_months,
            sex,
            weight_kg: None,
            height_cm: None,
            muac_cm: None,
            is_pregnant: false,
        }
    }

    /// Set the weight
    #[must_use]
    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = positive(weight_kg);
        self
    }

    /// Set the height
    #[must_use]
    pub fn with_height(mut self, height_cm: f64) -> Self {
        self.height_cm = positive(height_cm);
        self
    }

    /// Set the MUAC
    #[must_use]
    pub fn with_muac(mut self, muac_cm: f64) -> Self {
        self.muac_cm = positive(muac_cm);
        self
    }

    /// Set the pregnancy flag
    #[must_use]
    pub const fn with_pregnancy(mut self, is_pregnant: bool) -> Self {
        self.is_pregnant = is_pregnant;
        self
    }

    /// Body mass index, kg/m², when both weight and height are valid
    #[must_use]
    pub fn bmi(&self) -> Option<f64> {
        let weight = self.weight_kg?;
        let height_m = self.height_cm? / 100.0;
        Some(weight / (height_m * height_m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_values_are_missing() {
        let profile = SubjectProfile::new("s", 30, Sex::Male)
            .with_weight(0.0)
            .with_height(-4.0)
            .with_muac(f64::NAN);
        assert_eq!(profile.weight_kg, None);
        assert_eq!(profile.height_cm, None);
        assert_eq!(profile.muac_cm, None);
        assert_eq!(profile.bmi(), None);
    }

    #[test]
    fn test_bmi() {
        let profile = SubjectProfile::new("a", 400, Sex::Female)
            .with_weight(40.0)
            .with_height(170.0);
        let bmi = profile.bmi().unwrap();
        assert!((bmi - 13.84).abs() < 0.01);
    }
}
