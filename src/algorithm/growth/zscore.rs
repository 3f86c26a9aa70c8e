//! Z-score calculation

use crate::standards::ReferenceRow;

/// Standardized deviation of an observation from a reference row
///
/// `z = (observed - median) / sd`. Returns `None` for a non-positive SD.
#[must_use]
pub fn z_score(observed: f64, reference: &ReferenceRow) -> Option<f64> {
    (reference.sd > 0.0).then(|| (observed - reference.median) / reference.sd)
}

/// Round to two decimals for reporting
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
