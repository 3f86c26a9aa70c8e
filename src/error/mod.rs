//! Error handling for the classification engine.
//!
//! Most "unusual" inputs are not errors here: unparsable dates resolve to age 0,
//! non-positive measurements make the affected indicator not applicable. The
//! variants below cover what genuinely cannot be classified.

use std::io;

use crate::models::types::{Indicator, Sex, WhoStandard};

/// Errors raised by the classification engine
#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    /// A sex-partitioned reference lookup was needed but the subject's sex is unknown
    #[error("Unknown sex for subject '{subject_id}': sex-partitioned reference lookups require Male or Female")]
    UnknownSex {
        /// Identifier of the subject being classified
        subject_id: String,
    },

    /// The index value lies outside the tabulated span of a reference table
    #[error("No {indicator} reference for {sex} at index value {index_value}")]
    OutOfReferenceRange {
        /// Indicator whose table was consulted
        indicator: Indicator,
        /// Sex partition of the table
        sex: Sex,
        /// Age in months or height in cm that was looked up
        index_value: f64,
    },

    /// A reference table failed validation while the store was being built
    #[error("Invalid reference table: {0}")]
    InvalidReferenceTable(String),

    /// A chart or slice was requested with an empty or inverted age range
    #[error("Invalid age range: {from_months}..{to_months} months")]
    InvalidAgeRange {
        /// Requested lower bound in months
        from_months: u32,
        /// Requested upper bound in months
        to_months: u32,
    },

    /// An aggregate report whose counts do not sum to its subject total
    #[error("Report for {standard} does not reconcile: expected {expected} subjects, counted {actual}")]
    Reconciliation {
        /// Standard of the offending report
        standard: WhoStandard,
        /// Number of subjects considered
        expected: usize,
        /// Sum of all label counts plus the not-applicable bucket
        actual: usize,
    },

    /// Two aggregate reports for different standards were merged
    #[error("Cannot merge a {right} report into a {left} report")]
    IncompatibleReports {
        /// Standard of the receiving report
        left: WhoStandard,
        /// Standard of the merged-in report
        right: WhoStandard,
    },

    /// JSON (de)serialization failure for reference tables or reports
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error reading input data
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ClassificationError {
    /// Build an unknown-sex error for the given subject
    pub fn unknown_sex(subject_id: impl Into<String>) -> Self {
        Self::UnknownSex {
            subject_id: subject_id.into(),
        }
    }

    /// Whether this error only means "no reference row here", which callers
    /// treat as an ineligible indicator rather than a failure
    #[must_use]
    pub const fn is_out_of_reference_range(&self) -> bool {
        matches!(self, Self::OutOfReferenceRange { .. })
    }
}

/// Result type for classification operations
pub type Result<T> = std::result::Result<T, ClassificationError>;
