//! Classification engine facade
//!
//! `NutritionEngine` owns the reference store and configuration and exposes
//! the single-subject and population entry points. The store is shared behind
//! an `Arc` and never mutated after construction, so one engine can be cloned
//! into as many threads as needed.

use std::sync::Arc;

use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::algorithm::diagnosis::{
    DecisionBasis, Diagnosis, LifeStageRouter, NutritionCategory, RiskAssessment,
    SeverityResolver, assess_risk,
};
use crate::algorithm::growth::{AgeResolver, IndicatorClassifier, IndicatorOutcomes, ReferenceTableStore};
use crate::algorithm::population::{
    ChartData, ChartMode, CompositeStatistics, PopulationAggregator, PopulationReport,
};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::labels::OverallClassification;
use crate::models::types::LifeStage;
use crate::models::{Measurement, MeasurementIssue, SubjectProfile};
use crate::utils::logging::log_warning;

/// Everything the engine concludes about one subject
#[derive(Debug, Clone, PartialEq)]
pub struct PersonClassification {
    /// Subject identifier
    pub subject_id: String,
    /// Age in completed months at screening
    pub age_months: u32,
    /// Label per standard; `None` where the subject was not eligible
    pub per_indicator: IndicatorOutcomes,
    /// Branch decision and composite label
    pub diagnosis: Diagnosis,
    /// Direction of the composite label
    pub category: NutritionCategory,
    /// Risk grading
    pub risk: RiskAssessment,
    /// Advisory input issues; they never block classification
    pub issues: Vec<MeasurementIssue>,
}

impl PersonClassification {
    /// Composite clinical label
    #[must_use]
    pub const fn overall_classification(&self) -> OverallClassification {
        self.diagnosis.overall
    }

    /// Branch the subject was routed to
    #[must_use]
    pub const fn life_stage(&self) -> LifeStage {
        self.diagnosis.stage
    }

    /// Measurement that decided the composite label
    #[must_use]
    pub const fn basis(&self) -> DecisionBasis {
        self.diagnosis.basis
    }
}

impl Serialize for PersonClassification {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PersonClassification", 11)?;
        state.serialize_field("subject_id", &self.subject_id)?;
        state.serialize_field("age_months", &self.age_months)?;
        state.serialize_field("life_stage", &self.diagnosis.stage)?;
        state.serialize_field("per_indicator", &self.per_indicator)?;
        state.serialize_field("z_scores", &self.per_indicator.z_scores())?;
        state.serialize_field("overall_classification", &self.diagnosis.overall)?;
        state.serialize_field("basis", &self.diagnosis.basis)?;
        state.serialize_field("bmi", &self.diagnosis.bmi)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("risk", &self.risk)?;
        state.serialize_field("issues", &self.issues)?;
        state.end()
    }
}

/// Nutritional-status classification engine
#[derive(Debug, Clone)]
pub struct NutritionEngine {
    store: Arc<ReferenceTableStore>,
    config: EngineConfig,
}

impl NutritionEngine {
    /// Create an engine over the embedded WHO reference tables
    pub fn new(config: EngineConfig) -> Result<Self> {
        let store = ReferenceTableStore::who(config.lookup_mode)?;
        Ok(Self::with_store(Arc::new(store), config))
    }

    /// Create an engine over an existing reference store
    #[must_use]
    pub const fn with_store(store: Arc<ReferenceTableStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Shared reference store
    #[must_use]
    pub fn store(&self) -> &ReferenceTableStore {
        &self.store
    }

    fn aggregator(&self) -> PopulationAggregator<'_> {
        PopulationAggregator::new(&self.store, &self.config)
    }

    /// Classify one screening record
    ///
    /// # Errors
    /// `UnknownSex` when the routed branch needs a sex-partitioned lookup.
    pub fn classify_person(&self, measurement: &Measurement) -> Result<PersonClassification> {
        let profile = AgeResolver::new(&self.config).profile(measurement);
        let issues = measurement.validate(&self.config.date_formats);
        let mut result = self.classify_profile(&profile)?;
        result.issues = issues;
        Ok(result)
    }

    /// Classify an already resolved subject
    ///
    /// # Errors
    /// `UnknownSex` when the routed branch needs a sex-partitioned lookup.
    pub fn classify_profile(&self, subject: &SubjectProfile) -> Result<PersonClassification> {
        let router = LifeStageRouter::new(self.config.branch_precedence);
        let classifier = IndicatorClassifier::new(&self.store);
        let (per_indicator, diagnosis) = SeverityResolver::diagnose(&router, &classifier, subject)?;

        Ok(PersonClassification {
            subject_id: subject.subject_id.clone(),
            age_months: subject.age_months,
            per_indicator,
            diagnosis,
            category: NutritionCategory::of(diagnosis.overall),
            risk: assess_risk(&per_indicator, diagnosis.overall),
            issues: Vec::new(),
        })
    }

    /// Per-standard aggregate reports
    ///
    /// # Errors
    /// `Reconciliation` if a report's counts do not add up to the cohort size.
    pub fn aggregate(&self, measurements: &[Measurement]) -> Result<PopulationReport> {
        self.aggregator().aggregate(measurements)
    }

    /// Age-band chart over an inclusive month range
    ///
    /// # Errors
    /// `InvalidAgeRange` when the range is inverted.
    pub fn chart(
        &self,
        measurements: &[Measurement],
        from_months: u32,
        to_months: u32,
        mode: ChartMode,
    ) -> Result<ChartData> {
        self.aggregator().chart(measurements, from_months, to_months, mode)
    }

    /// Composite label counts per life stage
    #[must_use]
    pub fn composite_statistics(&self, measurements: &[Measurement]) -> CompositeStatistics {
        self.aggregator().composite_statistics(measurements)
    }

    /// Advisory input issues per subject, only for subjects that have any
    #[must_use]
    pub fn validate(&self, measurements: &[Measurement]) -> Vec<(String, Vec<MeasurementIssue>)> {
        let flagged: Vec<_> = measurements
            .iter()
            .filter_map(|m| {
                let issues = m.validate(&self.config.date_formats);
                (!issues.is_empty()).then(|| (m.id.clone(), issues))
            })
            .collect();

        if !flagged.is_empty() {
            log_warning(
                "Measurements with implausible values",
                Some(&format!("{} of {}", flagged.len(), measurements.len())),
            );
        }
        flagged
    }
}
