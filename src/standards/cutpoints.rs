//! Cut-point bands for every indicator.
//!
//! Each table lists its bands in ascending order. A band covers values from the
//! previous band's upper bound up to its own `upper`. `Below(x)` ends the band
//! before `x`, so `x` opens the next band; `AtMost(x)` keeps `x` inside the band.
//! The last band of every table is `Unbounded`.
//!
//! Changing a value here changes the per-standard population reports and the
//! composite decision tree alike.

use crate::models::labels::{
    AdultBmiLabel, BmiForAgeLabel, ChildMuacLabel, HeightForAgeLabel, MaternalMuacLabel,
    WeightForAgeLabel, WeightForHeightLabel,
};

/// Upper edge of a band
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Upper {
    /// Band ends strictly below this value
    Below(f64),
    /// Band includes this value
    AtMost(f64),
    /// Terminal open-ended band
    Unbounded,
}

impl Upper {
    /// Whether `value` lies below this edge
    #[must_use]
    pub fn admits(self, value: f64) -> bool {
        match self {
            Self::Below(edge) => value < edge,
            Self::AtMost(edge) => value <= edge,
            Self::Unbounded => true,
        }
    }
}

/// One labelled band of a cut-point table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band<L> {
    /// Label assigned inside the band
    pub label: L,
    /// Upper edge of the band
    pub upper: Upper,
}

const fn band<L>(label: L, upper: Upper) -> Band<L> {
    Band { label, upper }
}

/// Map a value to its band label
///
/// Returns `None` for NaN or an empty table.
#[must_use]
pub fn classify_bands<L: Copy>(bands: &[Band<L>], value: f64) -> Option<L> {
    if value.is_nan() {
        return None;
    }
    bands
        .iter()
        .find(|b| b.upper.admits(value))
        .map(|b| b.label)
}

/// Weight-for-Age z-score bands
pub const WEIGHT_FOR_AGE_BANDS: [Band<WeightForAgeLabel>; 4] = [
    band(WeightForAgeLabel::SeverelyUnderweight, Upper::Below(-3.0)),
    band(WeightForAgeLabel::Underweight, Upper::Below(-2.0)),
    band(WeightForAgeLabel::Normal, Upper::AtMost(2.0)),
    band(WeightForAgeLabel::Overweight, Upper::Unbounded),
];

/// Height/Length-for-Age z-score bands
pub const HEIGHT_FOR_AGE_BANDS: [Band<HeightForAgeLabel>; 4] = [
    band(HeightForAgeLabel::SeverelyStunted, Upper::Below(-3.0)),
    band(HeightForAgeLabel::Stunted, Upper::Below(-2.0)),
    band(HeightForAgeLabel::Normal, Upper::AtMost(3.0)),
    band(HeightForAgeLabel::Tall, Upper::Unbounded),
];

/// Weight-for-Height z-score bands
pub const WEIGHT_FOR_HEIGHT_BANDS: [Band<WeightForHeightLabel>; 5] = [
    band(WeightForHeightLabel::SeverelyWasted, Upper::Below(-3.0)),
    band(WeightForHeightLabel::Wasted, Upper::Below(-2.0)),
    band(WeightForHeightLabel::Normal, Upper::AtMost(2.0)),
    band(WeightForHeightLabel::Overweight, Upper::AtMost(3.0)),
    band(WeightForHeightLabel::Obese, Upper::Unbounded),
];

/// BMI-for-Age z-score bands
pub const BMI_FOR_AGE_BANDS: [Band<BmiForAgeLabel>; 5] = [
    band(BmiForAgeLabel::SeverelyUnderweight, Upper::Below(-3.0)),
    band(BmiForAgeLabel::Underweight, Upper::Below(-2.0)),
    band(BmiForAgeLabel::Normal, Upper::AtMost(2.0)),
    band(BmiForAgeLabel::Overweight, Upper::AtMost(3.0)),
    band(BmiForAgeLabel::Obese, Upper::Unbounded),
];

/// Adult BMI bands, kg/m²
pub const ADULT_BMI_BANDS: [Band<AdultBmiLabel>; 8] = [
    band(AdultBmiLabel::SevereUnderweight, Upper::Below(16.0)),
    band(AdultBmiLabel::ModerateUnderweight, Upper::Below(17.0)),
    band(AdultBmiLabel::MildUnderweight, Upper::Below(18.5)),
    band(AdultBmiLabel::Normal, Upper::Below(25.0)),
    band(AdultBmiLabel::Overweight, Upper::Below(30.0)),
    band(AdultBmiLabel::ObesityClassI, Upper::Below(35.0)),
    band(AdultBmiLabel::ObesityClassII, Upper::Below(40.0)),
    band(AdultBmiLabel::ObesityClassIII, Upper::Unbounded),
];

/// Child MUAC bands, cm
pub const CHILD_MUAC_BANDS: [Band<ChildMuacLabel>; 4] = [
    band(ChildMuacLabel::SevereAcuteMalnutrition, Upper::Below(11.5)),
    band(ChildMuacLabel::ModerateAcuteMalnutrition, Upper::Below(12.5)),
    band(ChildMuacLabel::AtRisk, Upper::Below(13.5)),
    band(ChildMuacLabel::Normal, Upper::Unbounded),
];

/// Maternal MUAC bands, cm
pub const MATERNAL_MUAC_BANDS: [Band<MaternalMuacLabel>; 3] = [
    band(MaternalMuacLabel::Undernutrition, Upper::Below(23.0)),
    band(MaternalMuacLabel::AtRisk, Upper::Below(25.0)),
    band(MaternalMuacLabel::Normal, Upper::Unbounded),
];

/// Wasting z-score below which acute malnutrition is severe
pub const SEVERE_WASTING_Z: f64 = -3.0;

/// Wasting z-score below which acute malnutrition is moderate
pub const MODERATE_WASTING_Z: f64 = -2.0;

/// Wasting z-score below which acute malnutrition is mild
pub const MILD_WASTING_Z: f64 = -1.0;

/// Height-for-age z-score below which a child is stunted
pub const STUNTING_Z: f64 = -2.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_end_unbounded() {
        assert_eq!(WEIGHT_FOR_AGE_BANDS[3].upper, Upper::Unbounded);
        assert_eq!(HEIGHT_FOR_AGE_BANDS[3].upper, Upper::Unbounded);
        assert_eq!(WEIGHT_FOR_HEIGHT_BANDS[4].upper, Upper::Unbounded);
        assert_eq!(ADULT_BMI_BANDS[7].upper, Upper::Unbounded);
        assert_eq!(MATERNAL_MUAC_BANDS[2].upper, Upper::Unbounded);
    }

    #[test]
    fn test_boundaries_resolve_upward_for_lower_inclusive_bands() {
        assert_eq!(
            classify_bands(&WEIGHT_FOR_HEIGHT_BANDS, -3.0),
            Some(WeightForHeightLabel::Wasted)
        );
        assert_eq!(
            classify_bands(&WEIGHT_FOR_HEIGHT_BANDS, -2.0),
            Some(WeightForHeightLabel::Normal)
        );
        assert_eq!(
            classify_bands(&ADULT_BMI_BANDS, 18.5),
            Some(AdultBmiLabel::Normal)
        );
        assert_eq!(
            classify_bands(&CHILD_MUAC_BANDS, 11.5),
            Some(ChildMuacLabel::ModerateAcuteMalnutrition)
        );
    }

    #[test]
    fn test_positive_side_follows_inclusive_upper_edges() {
        assert_eq!(
            classify_bands(&WEIGHT_FOR_AGE_BANDS, 2.0),
            Some(WeightForAgeLabel::Normal)
        );
        assert_eq!(
            classify_bands(&HEIGHT_FOR_AGE_BANDS, 3.0),
            Some(HeightForAgeLabel::Normal)
        );
        assert_eq!(
            classify_bands(&WEIGHT_FOR_HEIGHT_BANDS, 3.0),
            Some(WeightForHeightLabel::Overweight)
        );
        assert_eq!(
            classify_bands(&WEIGHT_FOR_HEIGHT_BANDS, 3.01),
            Some(WeightForHeightLabel::Obese)
        );
    }

    #[test]
    fn test_nan_is_unclassified() {
        assert_eq!(classify_bands(&ADULT_BMI_BANDS, f64::NAN), None);
    }
}
