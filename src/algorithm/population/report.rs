//! Aggregate reports
//!
//! One `AggregateReport` per WHO standard. Counts are plain integers indexed
//! by label ordinal, so merging two reports is element-wise addition and the
//! result never depends on how a cohort was split.

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeStruct};

use crate::error::{ClassificationError, Result};
use crate::models::labels::{NO_DATA, StandardLabel};
use crate::models::types::WhoStandard;

/// Label counts of one standard over a population slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateReport {
    standard: WhoStandard,
    counts: Vec<usize>,
    not_applicable: usize,
    unclassifiable: usize,
    total: usize,
}

impl AggregateReport {
    /// Empty report for a standard
    #[must_use]
    pub fn new(standard: WhoStandard) -> Self {
        Self {
            standard,
            counts: vec![0; StandardLabel::count_for(standard)],
            not_applicable: 0,
            unclassifiable: 0,
            total: 0,
        }
    }

    /// Standard this report counts
    #[must_use]
    pub const fn standard(&self) -> WhoStandard {
        self.standard
    }

    /// Count a classified subject
    ///
    /// A label from another standard is counted as "No Data".
    pub fn record_label(&mut self, label: StandardLabel) {
        self.total += 1;
        match self.counts.get_mut(label.ordinal()) {
            Some(count) if label.standard() == self.standard => *count += 1,
            _ => self.not_applicable += 1,
        }
    }

    /// Count an ineligible subject
    pub fn record_not_applicable(&mut self) {
        self.total += 1;
        self.not_applicable += 1;
    }

    /// Count a subject that could not be classified (unknown sex); it lands in "No Data"
    pub fn record_unclassifiable(&mut self) {
        self.record_not_applicable();
        self.unclassifiable += 1;
    }

    /// Subjects with a given label
    #[must_use]
    pub fn count(&self, label: StandardLabel) -> usize {
        if label.standard() != self.standard {
            return 0;
        }
        self.counts.get(label.ordinal()).copied().unwrap_or(0)
    }

    /// Subjects in the "No Data" bucket
    #[must_use]
    pub const fn not_applicable(&self) -> usize {
        self.not_applicable
    }

    /// Subjects in "No Data" because their sex was unknown
    #[must_use]
    pub const fn unclassifiable(&self) -> usize {
        self.unclassifiable
    }

    /// Subjects considered
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Subjects that received a label
    #[must_use]
    pub fn classified(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Label counts in report order, ending with "No Data"
    #[must_use]
    pub fn classifications(&self) -> Vec<(&'static str, usize)> {
        StandardLabel::all_for(self.standard)
            .into_iter()
            .map(|label| (label.as_str(), self.count(label)))
            .chain(std::iter::once((NO_DATA, self.not_applicable)))
            .collect()
    }

    /// Whether all counts add up to the subject total
    #[must_use]
    pub fn is_reconciled(&self) -> bool {
        self.classified() + self.not_applicable == self.total
    }

    /// Verify the counts add up to the subject total
    pub fn reconcile(&self) -> Result<()> {
        if self.is_reconciled() {
            Ok(())
        } else {
            Err(ClassificationError::Reconciliation {
                standard: self.standard,
                expected: self.total,
                actual: self.classified() + self.not_applicable,
            })
        }
    }

    /// Add another report's counts into this one
    ///
    /// # Errors
    /// `IncompatibleReports` when the standards differ.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        if self.standard != other.standard {
            return Err(ClassificationError::IncompatibleReports {
                left: self.standard,
                right: other.standard,
            });
        }
        self.add(other);
        Ok(())
    }

    fn add(&mut self, other: &Self) {
        for (count, extra) in self.counts.iter_mut().zip(&other.counts) {
            *count += extra;
        }
        self.not_applicable += other.not_applicable;
        self.unclassifiable += other.unclassifiable;
        self.total += other.total;
    }
}

struct Classifications<'a>(&'a AggregateReport);

impl Serialize for Classifications<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries = self.0.classifications();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (label, count) in entries {
            map.serialize_entry(label, &count)?;
        }
        map.end()
    }
}

// {standard, total_subjects, classifications: {label: count, ..., "No Data": count}, unclassifiable}
impl Serialize for AggregateReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AggregateReport", 4)?;
        state.serialize_field("standard", self.standard.key())?;
        state.serialize_field("total_subjects", &self.total)?;
        state.serialize_field("classifications", &Classifications(self))?;
        state.serialize_field("unclassifiable", &self.unclassifiable)?;
        state.end()
    }
}

/// The five independent per-standard reports of a population
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationReport {
    reports: [AggregateReport; 5],
}

impl Default for PopulationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl PopulationReport {
    /// Empty reports for every standard
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: WhoStandard::ALL.map(AggregateReport::new),
        }
    }

    /// Report of one standard
    #[must_use]
    pub const fn report(&self, standard: WhoStandard) -> &AggregateReport {
        &self.reports[standard as usize]
    }

    /// Mutable report of one standard
    pub const fn report_mut(&mut self, standard: WhoStandard) -> &mut AggregateReport {
        &mut self.reports[standard as usize]
    }

    /// All reports in standard order
    #[must_use]
    pub const fn reports(&self) -> &[AggregateReport; 5] {
        &self.reports
    }

    /// Combine two population reports
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        for (mine, theirs) in self.reports.iter_mut().zip(&other.reports) {
            mine.add(theirs);
        }
        self
    }

    /// Verify every report reconciles
    pub fn reconcile(&self) -> Result<()> {
        self.reports.iter().try_for_each(AggregateReport::reconcile)
    }
}

// {standard-key: report}
impl Serialize for PopulationReport {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.reports.len()))?;
        for report in &self.reports {
            map.serialize_entry(report.standard.key(), report)?;
        }
        map.end()
    }
}
