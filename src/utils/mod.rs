//! Utility functions
//!
//! Logging and progress helpers shared by the population runs, and synthetic
//! cohorts for tests and demos.

pub mod logging;
pub mod test;
