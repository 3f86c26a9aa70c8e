//! Classification algorithms
//!
//! `growth` turns measurements into per-indicator labels, `diagnosis` combines
//! them into one clinical label per subject, and `population` counts both over
//! a cohort.

pub mod diagnosis;
pub mod growth;
pub mod population;
