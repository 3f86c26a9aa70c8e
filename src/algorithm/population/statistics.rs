//! Composite population statistics
//!
//! Runs the single-subject decision tree over a population and counts the
//! composite labels per life-stage branch.

use std::borrow::Cow;
use std::time::Instant;

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::algorithm::diagnosis::{LifeStageRouter, SeverityResolver};
use crate::algorithm::growth::AgeResolver;
use crate::models::labels::OverallClassification;
use crate::models::types::LifeStage;
use crate::models::{Measurement, SubjectProfile};
use crate::utils::logging::{log_operation_complete, log_operation_start};

use super::aggregator::{PopulationAggregator, warn_unclassifiable};

const STAGES: [LifeStage; 3] = [
    LifeStage::ChildAdolescent,
    LifeStage::PregnantWoman,
    LifeStage::Adult,
];

/// Composite label counts per branch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeStatistics {
    total: usize,
    counts: FxHashMap<(LifeStage, OverallClassification), usize>,
    unclassifiable: usize,
}

impl CompositeStatistics {
    /// Empty statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a diagnosed subject
    pub fn record(&mut self, stage: LifeStage, overall: OverallClassification) {
        self.total += 1;
        *self.counts.entry((stage, overall)).or_insert(0) += 1;
    }

    /// Count a subject the decision tree could not evaluate
    pub fn record_unclassifiable(&mut self) {
        self.total += 1;
        self.unclassifiable += 1;
    }

    /// Subjects considered
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Subjects the decision tree could not evaluate
    #[must_use]
    pub const fn unclassifiable(&self) -> usize {
        self.unclassifiable
    }

    /// Subjects with a given composite label in a given branch
    #[must_use]
    pub fn count(&self, stage: LifeStage, overall: OverallClassification) -> usize {
        self.counts.get(&(stage, overall)).copied().unwrap_or(0)
    }

    /// Subjects routed to a branch
    #[must_use]
    pub fn stage_total(&self, stage: LifeStage) -> usize {
        self.counts
            .iter()
            .filter(|((s, _), _)| *s == stage)
            .map(|(_, count)| count)
            .sum()
    }

    /// Subjects routed to the child/adolescent branch
    #[must_use]
    pub fn children(&self) -> usize {
        self.stage_total(LifeStage::ChildAdolescent)
    }

    /// Subjects routed to the maternal branch
    #[must_use]
    pub fn pregnant_women(&self) -> usize {
        self.stage_total(LifeStage::PregnantWoman)
    }

    /// Subjects routed to the adult branch
    #[must_use]
    pub fn adults(&self) -> usize {
        self.stage_total(LifeStage::Adult)
    }

    /// Whether the branch counts and unclassifiable subjects add up to the total
    #[must_use]
    pub fn is_reconciled(&self) -> bool {
        self.counts.values().sum::<usize>() + self.unclassifiable == self.total
    }

    /// Non-zero counts in branch then label order
    #[must_use]
    pub fn entries(&self) -> Vec<(LifeStage, OverallClassification, usize)> {
        let labels = OverallClassification::all();
        STAGES
            .iter()
            .flat_map(|&stage| labels.iter().map(move |&overall| (stage, overall)))
            .filter_map(|(stage, overall)| {
                let count = self.count(stage, overall);
                (count > 0).then_some((stage, overall, count))
            })
            .collect()
    }

    /// Add another set of statistics into this one
    pub fn merge(&mut self, other: &Self) {
        self.total += other.total;
        self.unclassifiable += other.unclassifiable;
        for (key, count) in &other.counts {
            *self.counts.entry(*key).or_insert(0) += count;
        }
    }

    /// Combine two sets of statistics
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.merge(&other);
        self
    }
}

#[derive(Serialize)]
struct Entry {
    life_stage: LifeStage,
    classification: OverallClassification,
    count: usize,
}

impl Serialize for CompositeStatistics {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries: Vec<Entry> = self
            .entries()
            .into_iter()
            .map(|(life_stage, classification, count)| Entry {
                life_stage,
                classification,
                count,
            })
            .collect();

        let mut state = serializer.serialize_struct("CompositeStatistics", 6)?;
        state.serialize_field("total_subjects", &self.total)?;
        state.serialize_field("children", &self.children())?;
        state.serialize_field("pregnant_women", &self.pregnant_women())?;
        state.serialize_field("adults", &self.adults())?;
        state.serialize_field("unclassifiable", &self.unclassifiable)?;
        state.serialize_field("classifications", &entries)?;
        state.end()
    }
}

impl PopulationAggregator<'_> {
    /// Composite labels for raw measurements
    ///
    /// A subject whose branch needs a sex-partitioned lookup but has no sex is
    /// counted as unclassifiable.
    #[must_use]
    pub fn composite_statistics(&self, measurements: &[Measurement]) -> CompositeStatistics {
        let resolver = AgeResolver::new(self.config());
        self.composite_with(measurements, |m| Cow::Owned(resolver.profile(m)))
    }

    /// Composite labels for already resolved profiles
    #[must_use]
    pub fn composite_statistics_profiles(&self, subjects: &[SubjectProfile]) -> CompositeStatistics {
        self.composite_with(subjects, |s| Cow::Borrowed(s))
    }

    fn composite_with<T, F>(&self, items: &[T], to_profile: F) -> CompositeStatistics
    where
        T: Sync,
        F: Fn(&T) -> Cow<'_, SubjectProfile> + Sync,
    {
        let start = Instant::now();
        let target = format!("{} subjects", items.len());
        log_operation_start("Diagnosing", &target);

        let router = LifeStageRouter::new(self.config().branch_precedence);
        let classifier = self.classifier();

        let stats = self.par_fold(
            items,
            CompositeStatistics::new,
            |mut stats, item| {
                let subject = to_profile(item);
                match SeverityResolver::diagnose(&router, &classifier, &subject) {
                    Ok((_, diagnosis)) => stats.record(diagnosis.stage, diagnosis.overall),
                    Err(e) => {
                        warn_unclassifiable(&subject, &e);
                        stats.record_unclassifiable();
                    }
                }
                stats
            },
            CompositeStatistics::merged,
        );

        log_operation_complete("diagnosed", &target, items.len(), Some(start.elapsed()));
        stats
    }
}
