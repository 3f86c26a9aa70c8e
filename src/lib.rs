//! A Rust library for WHO growth-standard z-scores, nutritional-status
//! classification and population reporting.

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod standards;
pub mod utils;

// Core types
pub use config::{BranchPrecedence, DateFormatConfig, EngineConfig, LookupMode};
pub use engine::{NutritionEngine, PersonClassification};
pub use error::{ClassificationError, Result};
pub use models::{
    LifeStage, Measurement, MeasurementIssue, OverallClassification, Sex, StandardLabel,
    SubjectProfile, WhoStandard,
};

// Single-subject pipeline
pub use algorithm::diagnosis::{LifeStageRouter, RiskLevel, SeverityResolver};
pub use algorithm::growth::{AgeResolver, IndicatorClassifier, ReferenceTableStore, z_score};

// Population reporting
pub use algorithm::population::{
    AggregateReport, ChartData, ChartMode, CompositeStatistics, PopulationAggregator,
    PopulationReport,
};
