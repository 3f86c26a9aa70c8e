//! Population reporting
//!
//! Aggregate label counts per WHO standard, age-band charts and composite
//! statistics, all computed over parallel chunks whose results are summed.

pub mod aggregator;
pub mod chart;
pub mod report;
pub mod statistics;

pub use aggregator::PopulationAggregator;
pub use chart::{AgeBand, CANONICAL_BANDS, ChartData, ChartMode, age_bands};
pub use report::{AggregateReport, PopulationReport};
pub use statistics::CompositeStatistics;
