//! Age-band charting
//!
//! Groups a population into age bands and counts the classification labels in
//! each band. Requests inside the first six years use the fixed child bands;
//! wider requests are split into equal-width bins.

use std::borrow::Cow;

use itertools::Itertools;
use serde::Serialize;
use serde::ser::{SerializeMap, SerializeStruct};

use crate::algorithm::growth::{AgeResolver, StandardOutcome};
use crate::error::{ClassificationError, Result};
use crate::models::labels::{NO_DATA, StandardLabel};
use crate::models::types::WhoStandard;
use crate::models::{Measurement, SubjectProfile};
use crate::standards::windows::{BMI_FOR_AGE_WINDOW, WEIGHT_FOR_AGE_WINDOW};

use super::aggregator::{PopulationAggregator, warn_unclassifiable};

/// Fixed child bands as (name, first month, end month exclusive)
pub const CANONICAL_BANDS: [(&str, u32, u32); 7] = [
    ("0-6m", 0, 6),
    ("6-12m", 6, 12),
    ("1-2y", 12, 24),
    ("2-3y", 24, 36),
    ("3-4y", 36, 48),
    ("4-5y", 48, 60),
    ("5-6y", 60, 72),
];

/// First month past the fixed child bands
pub const CANONICAL_END_MONTHS: u32 = 72;

/// A half-open age band `[from_months, to_months)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeBand {
    /// Display name
    pub name: String,
    /// First month in the band
    pub from_months: u32,
    /// First month after the band
    pub to_months: u32,
}

impl AgeBand {
    /// Whether an age falls in the band
    #[must_use]
    pub const fn contains(&self, age_months: u32) -> bool {
        age_months >= self.from_months && age_months < self.to_months
    }
}

fn band_name(from: u32, to: u32) -> String {
    if from % 12 == 0 && to % 12 == 0 {
        format!("{}-{}y", from / 12, to / 12)
    } else {
        format!("{from}-{to}m")
    }
}

/// Age bands for an inclusive request `[from_months, to_months]`
///
/// When `to_months` is below 72 the fixed child bands that overlap the request
/// are returned in order (`band_start <= to && band_end > from`), so a subject
/// aged exactly `to_months` always has a band. Otherwise the range is split
/// into `bins` equal-width bins, the last of which also holds `to_months`. The
/// bin count is capped at the span in months, so a narrow request such as
/// `[72, 76]` gets four one-month-or-wider bins rather than empty ones.
///
/// # Errors
/// `InvalidAgeRange` when `from_months > to_months` or `bins` is 0.
pub fn age_bands(from_months: u32, to_months: u32, bins: usize) -> Result<Vec<AgeBand>> {
    if from_months > to_months || bins == 0 {
        return Err(ClassificationError::InvalidAgeRange {
            from_months,
            to_months,
        });
    }

    if to_months < CANONICAL_END_MONTHS {
        let end = to_months.saturating_add(1);
        return Ok(CANONICAL_BANDS
            .iter()
            .filter(|(_, start, stop)| *start < end && *stop > from_months)
            .map(|&(name, start, stop)| AgeBand {
                name: name.to_string(),
                from_months: start,
                to_months: stop,
            })
            .collect());
    }

    let span = u64::from(to_months - from_months);
    let bins = u64::try_from(bins).unwrap_or(u64::MAX).min(span.max(1));
    let edge = |i: u64| -> u32 {
        let offset = span * i / bins;
        from_months + u32::try_from(offset).unwrap_or(u32::MAX - from_months)
    };

    Ok((0..bins)
        .map(|i| {
            let start = edge(i);
            let stop = edge(i + 1);
            let last = i + 1 == bins;
            AgeBand {
                name: band_name(start, stop),
                from_months: start,
                to_months: if last { stop.saturating_add(1) } else { stop },
            }
        })
        .collect())
}

/// Which standard a chart counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    /// One standard for every subject
    Single(WhoStandard),
    /// Weight-for-age up to 71 months, BMI-for-age to 227, adult BMI after
    AgeAppropriate,
}

impl ChartMode {
    /// Standard used for a subject of the given age
    #[must_use]
    pub const fn standard_for(self, age_months: u32) -> WhoStandard {
        match self {
            Self::Single(standard) => standard,
            Self::AgeAppropriate => {
                if WEIGHT_FOR_AGE_WINDOW.contains(age_months) {
                    WhoStandard::WeightForAge
                } else if age_months <= BMI_FOR_AGE_WINDOW.max_months {
                    WhoStandard::BmiForAge
                } else {
                    WhoStandard::BmiAdult
                }
            }
        }
    }

    /// Label texts the chart can contain, ending with "No Data"
    #[must_use]
    pub fn classifications(self) -> Vec<&'static str> {
        let standards = match self {
            Self::Single(standard) => vec![standard],
            Self::AgeAppropriate => vec![
                WhoStandard::WeightForAge,
                WhoStandard::BmiForAge,
                WhoStandard::BmiAdult,
            ],
        };
        standards
            .into_iter()
            .flat_map(StandardLabel::all_for)
            .map(StandardLabel::as_str)
            .chain(std::iter::once(NO_DATA))
            .unique()
            .collect()
    }
}

/// Label counts per age band
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartData {
    bands: Vec<AgeBand>,
    classifications: Vec<&'static str>,
    // counts[label * bands.len() + band]
    counts: Vec<usize>,
}

impl ChartData {
    fn empty(bands: Vec<AgeBand>, classifications: Vec<&'static str>) -> Self {
        let counts = vec![0; bands.len() * classifications.len()];
        Self {
            bands,
            classifications,
            counts,
        }
    }

    /// Age bands in order
    #[must_use]
    pub fn age_groups(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.name.as_str()).collect()
    }

    /// Age bands with their month ranges
    #[must_use]
    pub fn bands(&self) -> &[AgeBand] {
        &self.bands
    }

    /// Label texts in order
    #[must_use]
    pub fn classifications(&self) -> &[&'static str] {
        &self.classifications
    }

    /// Counts per band for one label text
    #[must_use]
    pub fn series(&self, label: &str) -> Option<&[usize]> {
        let row = self.classifications.iter().position(|l| *l == label)?;
        let width = self.bands.len();
        self.counts.get(row * width..(row + 1) * width)
    }

    /// Subjects placed in any band
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    fn record(&mut self, band: usize, label: &str) {
        let row = self
            .classifications
            .iter()
            .position(|l| *l == label)
            .or_else(|| self.classifications.iter().position(|l| *l == NO_DATA));
        if let Some(row) = row {
            let width = self.bands.len();
            if let Some(count) = self.counts.get_mut(row * width + band) {
                *count += 1;
            }
        }
    }

    fn merged(mut self, other: Self) -> Self {
        for (count, extra) in self.counts.iter_mut().zip(other.counts) {
            *count += extra;
        }
        self
    }
}

struct Series<'a>(&'a ChartData);

impl Serialize for Series<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let chart = self.0;
        let mut map = serializer.serialize_map(Some(chart.classifications.len()))?;
        for label in &chart.classifications {
            map.serialize_entry(label, chart.series(label).unwrap_or(&[]))?;
        }
        map.end()
    }
}

// {age_groups: [...], classifications: [...], chart_data: {label: [count per band]}}
impl Serialize for ChartData {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ChartData", 3)?;
        state.serialize_field("age_groups", &self.age_groups())?;
        state.serialize_field("classifications", &self.classifications)?;
        state.serialize_field("chart_data", &Series(self))?;
        state.end()
    }
}

impl PopulationAggregator<'_> {
    /// Chart raw measurements over an inclusive age range
    pub fn chart(
        &self,
        measurements: &[Measurement],
        from_months: u32,
        to_months: u32,
        mode: ChartMode,
    ) -> Result<ChartData> {
        let resolver = AgeResolver::new(self.config());
        self.chart_with(measurements, from_months, to_months, mode, |m| {
            Cow::Owned(resolver.profile(m))
        })
    }

    /// Chart resolved profiles over an inclusive age range
    pub fn chart_profiles(
        &self,
        subjects: &[SubjectProfile],
        from_months: u32,
        to_months: u32,
        mode: ChartMode,
    ) -> Result<ChartData> {
        self.chart_with(subjects, from_months, to_months, mode, |s| Cow::Borrowed(s))
    }

    fn chart_with<T, F>(
        &self,
        items: &[T],
        from_months: u32,
        to_months: u32,
        mode: ChartMode,
        to_profile: F,
    ) -> Result<ChartData>
    where
        T: Sync,
        F: Fn(&T) -> Cow<'_, SubjectProfile> + Sync,
    {
        let bands = age_bands(from_months, to_months, self.config().chart_bins)?;
        let template = ChartData::empty(bands, mode.classifications());
        let classifier = self.classifier();

        let chart = self.par_fold(
            items,
            || template.clone(),
            |mut chart, item| {
                let subject = to_profile(item);
                let age = subject.age_months;
                if age < from_months || age > to_months {
                    return chart;
                }
                let Some(band) = chart.bands.iter().position(|b| b.contains(age)) else {
                    return chart;
                };
                let label = match classifier.classify(mode.standard_for(age), &subject) {
                    Ok(StandardOutcome::Classified(result)) => result.label.as_str(),
                    Ok(StandardOutcome::NotApplicable(_)) => NO_DATA,
                    Err(e) => {
                        warn_unclassifiable(&subject, &e);
                        NO_DATA
                    }
                };
                chart.record(band, label);
                chart
            },
            ChartData::merged,
        );

        Ok(chart)
    }
}
