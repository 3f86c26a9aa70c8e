//! Growth indicator evaluation
//!
//! Age resolution, reference lookup, z-scores and per-indicator labels.

pub mod age;
pub mod classifier;
pub mod reference;
pub mod zscore;

pub use age::{AgeResolver, months_between};
pub use classifier::{
    IndicatorClassifier, IndicatorOutcomes, IndicatorResult, Ineligibility, StandardOutcome,
};
pub use reference::{ReferenceTable, ReferenceTableSpec, ReferenceTableStore, ReferenceTableStoreBuilder};
pub use zscore::{round2, z_score};
