//! Population aggregation
//!
//! Classifies every subject against every WHO standard independently and
//! counts the labels. The cohort is split into chunks that are scored in
//! parallel with rayon; each chunk produces its own [`PopulationReport`] and the
//! chunk reports are summed. Summation is associative and commutative, so the
//! chunk size never changes the result.

use std::borrow::Cow;
use std::time::Instant;

use log::warn;
use rayon::prelude::*;

use crate::algorithm::growth::{AgeResolver, IndicatorClassifier, ReferenceTableStore, StandardOutcome};
use crate::config::EngineConfig;
use crate::error::{ClassificationError, Result};
use crate::models::types::WhoStandard;
use crate::models::{Measurement, SubjectProfile};
use crate::utils::logging::{finish_progress_bar, log_operation_complete, log_operation_start, progress};

use super::report::PopulationReport;

/// Scores populations against the reference store
#[derive(Debug, Clone, Copy)]
pub struct PopulationAggregator<'a> {
    store: &'a ReferenceTableStore,
    config: &'a EngineConfig,
}

impl<'a> PopulationAggregator<'a> {
    /// Create an aggregator
    #[must_use]
    pub const fn new(store: &'a ReferenceTableStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    /// Classifier shared by every chunk
    #[must_use]
    pub const fn classifier(&self) -> IndicatorClassifier<'a> {
        IndicatorClassifier::new(self.store)
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &'a EngineConfig {
        self.config
    }

    /// Per-standard reports for raw measurements
    pub fn aggregate(&self, measurements: &[Measurement]) -> Result<PopulationReport> {
        let resolver = AgeResolver::new(self.config);
        self.aggregate_with(measurements, |m| Cow::Owned(resolver.profile(m)))
    }

    /// Per-standard reports for already resolved profiles
    pub fn aggregate_profiles(&self, subjects: &[SubjectProfile]) -> Result<PopulationReport> {
        self.aggregate_with(subjects, |s| Cow::Borrowed(s))
    }

    fn aggregate_with<T, F>(&self, items: &[T], to_profile: F) -> Result<PopulationReport>
    where
        T: Sync,
        F: Fn(&T) -> Cow<'_, SubjectProfile> + Sync,
    {
        let start = Instant::now();
        let target = format!("{} subjects", items.len());
        log_operation_start("Aggregating WHO standards for", &target);

        let report = self.par_fold(
            items,
            PopulationReport::new,
            |mut report, item| {
                self.tally(&mut report, &to_profile(item));
                report
            },
            PopulationReport::merged,
        );

        report.reconcile()?;
        log_operation_complete("aggregated", &target, items.len(), Some(start.elapsed()));
        Ok(report)
    }

    /// Add one subject to every standard's report
    pub fn tally(&self, report: &mut PopulationReport, subject: &SubjectProfile) {
        let classifier = self.classifier();
        let mut warned = false;
        for standard in WhoStandard::ALL {
            let target = report.report_mut(standard);
            match classifier.classify(standard, subject) {
                Ok(StandardOutcome::Classified(result)) => target.record_label(result.label),
                Ok(StandardOutcome::NotApplicable(_)) => target.record_not_applicable(),
                Err(e) => {
                    if !warned {
                        warn_unclassifiable(subject, &e);
                        warned = true;
                    }
                    target.record_unclassifiable();
                }
            }
        }
    }

    /// Split `items` into chunks, fold each chunk in parallel and combine the results
    ///
    /// `merge` must be associative and commutative for the result to be
    /// independent of the chunk size.
    pub fn par_fold<T, A, I, F, M>(&self, items: &[T], init: I, fold: F, merge: M) -> A
    where
        T: Sync,
        A: Send,
        I: Fn() -> A + Sync + Send,
        F: Fn(A, &T) -> A + Sync + Send,
        M: Fn(A, A) -> A + Sync + Send,
    {
        let chunk_size = self.config.effective_chunk_size(items.len());
        let pb = self
            .config
            .show_progress
            .then(|| progress::create_main_progress_bar(items.len() as u64, Some("Scoring subjects")));

        let result = items
            .par_chunks(chunk_size)
            .map(|chunk| {
                let acc = chunk.iter().fold(init(), &fold);
                if let Some(pb) = &pb {
                    pb.inc(chunk.len() as u64);
                }
                acc
            })
            .reduce(&init, &merge);

        if let Some(pb) = pb.as_ref() {
            finish_progress_bar(pb, Some("Scoring complete"));
        }
        result
    }
}

pub(crate) fn warn_unclassifiable(subject: &SubjectProfile, error: &ClassificationError) {
    warn!("Subject {} counted as No Data: {error}", subject.subject_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LookupMode;
    use crate::models::labels::{StandardLabel, WeightForAgeLabel};
    use crate::models::types::Sex;

    #[test]
    fn test_unknown_sex_lands_in_no_data() {
        let store = ReferenceTableStore::who(LookupMode::Nearest).unwrap();
        let config = EngineConfig::default().with_chunk_size(2);
        let aggregator = PopulationAggregator::new(&store, &config);

        let subjects = vec![
            SubjectProfile::new("a", 24, Sex::Female).with_weight(11.5).with_height(86.4),
            SubjectProfile::new("b", 24, Sex::Unknown).with_weight(11.5).with_height(86.4),
            SubjectProfile::new("c", 400, Sex::Unknown).with_weight(60.0).with_height(165.0),
        ];
        let report = aggregator.aggregate_profiles(&subjects).unwrap();

        let wfa = report.report(WhoStandard::WeightForAge);
        assert_eq!(wfa.total(), 3);
        assert_eq!(wfa.count(StandardLabel::WeightForAge(WeightForAgeLabel::Normal)), 1);
        assert_eq!(wfa.unclassifiable(), 1);
        assert_eq!(wfa.not_applicable(), 2);

        let adult = report.report(WhoStandard::BmiAdult);
        assert_eq!(adult.classified(), 1);
        assert_eq!(adult.unclassifiable(), 0);
    }
}
