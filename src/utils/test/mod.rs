//! Test utilities
//!
//! Seeded synthetic cohorts for tests, benchmarks and the demo binary.


pub use fixtures::{DEFAULT_SEED, synthetic_cohort};
