//! Embedded WHO reference rows
//!
//! Median and standard deviation per sex, sampled at fixed ages (months) or,
//! for weight-for-height, fixed heights (cm). These are the only copies of the
//! reference values in the crate; the store and all test fixtures read them
//! from here.

use serde::{Deserialize, Serialize};

use crate::models::types::{Indicator, Sex};

/// One tabulated point of a reference distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    /// Age in months, or height in cm for weight-for-height
    pub index: f64,
    /// Reference median
    pub median: f64,
    /// Reference standard deviation
    pub sd: f64,
}

const fn row(index: f64, median: f64, sd: f64) -> ReferenceRow {
    ReferenceRow { index, median, sd }
}

/// Weight-for-age, boys (kg by age in months)
pub const WEIGHT_FOR_AGE_BOYS: [ReferenceRow; 17] = [
    row(0.0, 3.3, 0.4),
    row(1.0, 4.5, 0.6),
    row(2.0, 5.6, 0.7),
    row(3.0, 6.4, 0.7),
    row(6.0, 7.9, 0.8),
    row(9.0, 8.9, 0.9),
    row(12.0, 9.6, 1.0),
    row(18.0, 10.9, 1.1),
    row(24.0, 12.2, 1.3),
    row(30.0, 13.3, 1.4),
    row(36.0, 14.3, 1.5),
    row(42.0, 15.3, 1.6),
    row(48.0, 16.3, 1.8),
    row(54.0, 17.3, 1.9),
    row(60.0, 18.3, 2.0),
    row(66.0, 19.4, 2.3),
    row(72.0, 20.5, 2.5),
];

/// Weight-for-age, girls (kg by age in months)
pub const WEIGHT_FOR_AGE_GIRLS: [ReferenceRow; 17] = [
    row(0.0, 3.2, 0.4),
    row(1.0, 4.2, 0.5),
    row(2.0, 5.1, 0.6),
    row(3.0, 5.8, 0.7),
    row(6.0, 7.3, 0.8),
    row(9.0, 8.2, 0.9),
    row(12.0, 8.9, 1.0),
    row(18.0, 10.2, 1.2),
    row(24.0, 11.5, 1.3),
    row(30.0, 12.7, 1.5),
    row(36.0, 13.9, 1.6),
    row(42.0, 15.0, 1.8),
    row(48.0, 16.1, 2.0),
    row(54.0, 17.2, 2.1),
    row(60.0, 18.2, 2.3),
    row(66.0, 19.3, 2.5),
    row(72.0, 20.2, 2.7),
];

/// Length/height-for-age, boys (cm by age in months)
pub const HEIGHT_FOR_AGE_BOYS: [ReferenceRow; 17] = [
    row(0.0, 49.9, 1.9),
    row(1.0, 54.7, 2.0),
    row(2.0, 58.4, 2.0),
    row(3.0, 61.4, 2.0),
    row(6.0, 67.6, 2.2),
    row(9.0, 72.0, 2.3),
    row(12.0, 75.7, 2.5),
    row(18.0, 82.3, 2.8),
    row(24.0, 87.1, 3.1),
    row(30.0, 91.9, 3.4),
    row(36.0, 96.1, 3.7),
    row(42.0, 99.9, 3.9),
    row(48.0, 103.3, 4.1),
    row(54.0, 106.7, 4.3),
    row(60.0, 110.0, 4.6),
    row(66.0, 112.9, 4.7),
    row(72.0, 116.0, 4.9),
];

/// Length/height-for-age, girls (cm by age in months)
pub const HEIGHT_FOR_AGE_GIRLS: [ReferenceRow; 17] = [
    row(0.0, 49.1, 1.9),
    row(1.0, 53.7, 2.0),
    row(2.0, 57.1, 2.1),
    row(3.0, 59.8, 2.1),
    row(6.0, 65.7, 2.3),
    row(9.0, 70.1, 2.5),
    row(12.0, 74.0, 2.6),
    row(18.0, 80.7, 2.9),
    row(24.0, 86.4, 3.2),
    row(30.0, 90.7, 3.6),
    row(36.0, 95.1, 3.8),
    row(42.0, 99.0, 4.0),
    row(48.0, 102.7, 4.3),
    row(54.0, 106.2, 4.5),
    row(60.0, 109.4, 4.7),
    row(66.0, 112.3, 4.9),
    row(72.0, 115.1, 5.0),
];

/// Weight-for-height, boys (kg by height in cm)
pub const WEIGHT_FOR_HEIGHT_BOYS: [ReferenceRow; 16] = [
    row(45.0, 2.4, 0.2),
    row(50.0, 3.3, 0.3),
    row(55.0, 4.5, 0.4),
    row(60.0, 5.9, 0.5),
    row(65.0, 7.4, 0.6),
    row(70.0, 8.6, 0.7),
    row(75.0, 9.6, 0.8),
    row(80.0, 10.6, 0.8),
    row(85.0, 11.7, 0.9),
    row(90.0, 12.9, 1.0),
    row(95.0, 14.1, 1.1),
    row(100.0, 15.4, 1.2),
    row(105.0, 16.8, 1.3),
    row(110.0, 18.3, 1.5),
    row(115.0, 20.0, 1.7),
    row(120.0, 21.8, 2.0),
];

/// Weight-for-height, girls (kg by height in cm)
pub const WEIGHT_FOR_HEIGHT_GIRLS: [ReferenceRow; 16] = [
    row(45.0, 2.5, 0.2),
    row(50.0, 3.4, 0.3),
    row(55.0, 4.5, 0.4),
    row(60.0, 5.7, 0.5),
    row(65.0, 7.1, 0.6),
    row(70.0, 8.2, 0.7),
    row(75.0, 9.1, 0.8),
    row(80.0, 10.2, 0.9),
    row(85.0, 11.5, 1.0),
    row(90.0, 12.7, 1.1),
    row(95.0, 13.9, 1.2),
    row(100.0, 15.2, 1.3),
    row(105.0, 16.7, 1.4),
    row(110.0, 18.3, 1.6),
    row(115.0, 20.0, 1.8),
    row(120.0, 22.0, 2.1),
];

/// BMI-for-age, boys (kg/m² by age in months)
pub const BMI_FOR_AGE_BOYS: [ReferenceRow; 19] = [
    row(24.0, 16.0, 1.3),
    row(36.0, 15.6, 1.2),
    row(48.0, 15.3, 1.1),
    row(60.0, 15.2, 1.1),
    row(72.0, 15.3, 1.2),
    row(84.0, 15.5, 1.3),
    row(96.0, 15.7, 1.4),
    row(108.0, 16.0, 1.6),
    row(120.0, 16.4, 1.8),
    row(132.0, 16.9, 2.0),
    row(144.0, 17.5, 2.2),
    row(156.0, 18.2, 2.4),
    row(168.0, 19.0, 2.6),
    row(180.0, 19.8, 2.7),
    row(192.0, 20.5, 2.8),
    row(204.0, 21.1, 2.9),
    row(216.0, 21.7, 3.0),
    row(228.0, 22.2, 3.1),
    row(240.0, 22.6, 3.1),
];

/// BMI-for-age, girls (kg/m² by age in months)
pub const BMI_FOR_AGE_GIRLS: [ReferenceRow; 19] = [
    row(24.0, 15.7, 1.3),
    row(36.0, 15.4, 1.2),
    row(48.0, 15.3, 1.2),
    row(60.0, 15.2, 1.3),
    row(72.0, 15.3, 1.4),
    row(84.0, 15.4, 1.5),
    row(96.0, 15.7, 1.6),
    row(108.0, 16.1, 1.8),
    row(120.0, 16.6, 2.0),
    row(132.0, 17.2, 2.2),
    row(144.0, 18.0, 2.5),
    row(156.0, 18.8, 2.7),
    row(168.0, 19.6, 2.9),
    row(180.0, 20.2, 3.0),
    row(192.0, 20.7, 3.1),
    row(204.0, 21.0, 3.2),
    row(216.0, 21.3, 3.3),
    row(228.0, 21.4, 3.4),
    row(240.0, 21.5, 3.4),
];

/// Embedded rows for an indicator and sex
///
/// Returns `None` for [`Sex::Unknown`]; there is no pooled table.
#[must_use]
pub fn who_rows(indicator: Indicator, sex: Sex) -> Option<&'static [ReferenceRow]> {
    let rows: &'static [ReferenceRow] = match (indicator, sex) {
        (_, Sex::Unknown) => return None,
        (Indicator::WeightForAge, Sex::Male) => &WEIGHT_FOR_AGE_BOYS,
        (Indicator::WeightForAge, Sex::Female) => &WEIGHT_FOR_AGE_GIRLS,
        (Indicator::HeightForAge, Sex::Male) => &HEIGHT_FOR_AGE_BOYS,
        (Indicator::HeightForAge, Sex::Female) => &HEIGHT_FOR_AGE_GIRLS,
        (Indicator::WeightForHeight, Sex::Male) => &WEIGHT_FOR_HEIGHT_BOYS,
        (Indicator::WeightForHeight, Sex::Female) => &WEIGHT_FOR_HEIGHT_GIRLS,
        (Indicator::BmiForAge, Sex::Male) => &BMI_FOR_AGE_BOYS,
        (Indicator::BmiForAge, Sex::Female) => &BMI_FOR_AGE_GIRLS,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_sorted_with_positive_sd() {
        for indicator in Indicator::ALL {
            for sex in [Sex::Male, Sex::Female] {
                let rows = who_rows(indicator, sex).unwrap();
                assert!(rows.windows(2).all(|w| w[0].index < w[1].index));
                assert!(rows.iter().all(|r| r.sd > 0.0 && r.median > 0.0));
            }
        }
    }

    #[test]
    fn test_unknown_sex_has_no_rows() {
        assert!(who_rows(Indicator::WeightForAge, Sex::Unknown).is_none());
    }
}
