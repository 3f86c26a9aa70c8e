//! Age eligibility windows
//!
//! Every window is an inclusive `[min_months, max_months]` range. Windows are
//! independent: a 30-month-old is inside the weight-for-height window and the
//! BMI-for-age window at the same time.

use serde::Serialize;

use crate::models::types::WhoStandard;

/// Inclusive eligibility range in months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorWindow {
    /// First eligible month
    pub min_months: u32,
    /// Last eligible month
    pub max_months: u32,
}

impl IndicatorWindow {
    /// Create a window
    #[must_use]
    pub const fn new(min_months: u32, max_months: u32) -> Self {
        Self {
            min_months,
            max_months,
        }
    }

    /// Whether an age falls inside the window
    #[must_use]
    pub const fn contains(self, age_months: u32) -> bool {
        age_months >= self.min_months && age_months <= self.max_months
    }

    /// Eligibility window of a reporting standard
    #[must_use]
    pub const fn for_standard(standard: WhoStandard) -> Self {
        match standard {
            WhoStandard::WeightForAge => WEIGHT_FOR_AGE_WINDOW,
            WhoStandard::HeightForAge => HEIGHT_FOR_AGE_WINDOW,
            WhoStandard::WeightForHeight => WEIGHT_FOR_HEIGHT_WINDOW,
            WhoStandard::BmiForAge => BMI_FOR_AGE_WINDOW,
            WhoStandard::BmiAdult => BMI_ADULT_WINDOW,
        }
    }
}

/// Weight-for-Age: 0-71 months
pub const WEIGHT_FOR_AGE_WINDOW: IndicatorWindow = IndicatorWindow::new(0, 71);

/// Height/Length-for-Age: 0-71 months
pub const HEIGHT_FOR_AGE_WINDOW: IndicatorWindow = IndicatorWindow::new(0, 71);

/// Weight-for-Height: 0-60 months
pub const WEIGHT_FOR_HEIGHT_WINDOW: IndicatorWindow = IndicatorWindow::new(0, 60);

/// BMI-for-Age: 24-227 months; 228 belongs to the adult standard
pub const BMI_FOR_AGE_WINDOW: IndicatorWindow = IndicatorWindow::new(24, 227);

/// Adult BMI: 228 months and over
pub const BMI_ADULT_WINDOW: IndicatorWindow = IndicatorWindow::new(228, u32::MAX);

/// Child MUAC: 6-59 months
pub const CHILD_MUAC_WINDOW: IndicatorWindow = IndicatorWindow::new(6, 59);

/// Age from which the single-subject router treats a subject as adult (18 years)
pub const ADULT_AGE_MONTHS: u32 = 216;

/// Height-for-age stands in for weight-for-height below this age when no
/// weight-for-height reference is available
pub const HFA_PROXY_BELOW_MONTHS: u32 = 24;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_are_inclusive() {
        assert!(WEIGHT_FOR_AGE_WINDOW.contains(0));
        assert!(WEIGHT_FOR_AGE_WINDOW.contains(71));
        assert!(!WEIGHT_FOR_AGE_WINDOW.contains(72));
        assert!(WEIGHT_FOR_HEIGHT_WINDOW.contains(60));
        assert!(!WEIGHT_FOR_HEIGHT_WINDOW.contains(61));
        assert!(!CHILD_MUAC_WINDOW.contains(5));
        assert!(CHILD_MUAC_WINDOW.contains(59));
    }

    #[test]
    fn test_bmi_windows_do_not_overlap() {
        assert!(BMI_FOR_AGE_WINDOW.contains(227));
        assert!(!BMI_FOR_AGE_WINDOW.contains(228));
        assert!(BMI_ADULT_WINDOW.contains(228));
        assert!(!BMI_ADULT_WINDOW.contains(227));
    }
}
