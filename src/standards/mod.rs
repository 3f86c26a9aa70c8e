//! Canonical WHO standards data
//!
//! Cut-points, eligibility windows and reference rows are defined once here.
//! Classifiers, the decision tree and test fixtures all derive from this module.

pub mod cutpoints;
pub mod who_tables;
pub mod windows;

pub use cutpoints::{Band, Upper, classify_bands};
pub use who_tables::{ReferenceRow, who_rows};
pub use windows::IndicatorWindow;
