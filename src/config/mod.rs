//! Engine configuration
//!
//! Plain configuration structs for the classification engine: how reference
//! rows are selected, which life-stage branch wins when several could apply,
//! how population runs are batched and which date formats are accepted.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Environment variable that overrides the population batch size
pub const CHUNK_SIZE_ENV: &str = "NUTRI_CHUNK_SIZE";

/// Default number of equal-width bins for charts beyond the canonical child bands
pub const DEFAULT_CHART_BINS: usize = 10;

/// How a reference row is selected for an index value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupMode {
    /// Row with the minimum absolute distance on the index value
    #[default]
    Nearest,
    /// Linear interpolation between the two surrounding rows
    Interpolated,
}

impl fmt::Display for LookupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Interpolated => write!(f, "interpolated"),
        }
    }
}

/// Order in which the single-subject branches are tested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchPrecedence {
    /// Pregnancy (non-male) is tested before age: a pregnant 16-year-old is
    /// assessed by maternal MUAC
    #[default]
    PregnancyFirst,
    /// Age under 18 years is tested before pregnancy
    ChildFirst,
}

impl fmt::Display for BranchPrecedence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PregnancyFirst => write!(f, "pregnancy-first"),
            Self::ChildFirst => write!(f, "child-first"),
        }
    }
}

/// Accepted date and date-time formats for birthdays and screening dates
#[derive(Debug, Clone)]
pub struct DateFormatConfig {
    /// Date formats tried in order
    pub date_formats: Vec<String>,
    /// Date-time formats tried in order, after RFC 3339
    pub datetime_formats: Vec<String>,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2023-01-15
                "%d-%m-%Y".to_string(), // European: 15-01-2023
                "%m/%d/%Y".to_string(), // US: 01/15/2023
                "%d.%m.%Y".to_string(), // 15.01.2023
                "%Y%m%d".to_string(),   // Compact: 20230115
                "%d %b %Y".to_string(), // 15 Jan 2023
                "%d %B %Y".to_string(), // 15 January 2023
            ],
            datetime_formats: vec![
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M".to_string(),
            ],
        }
    }
}

impl DateFormatConfig {
    /// Parse a date or date-time string, keeping only the calendar date
    ///
    /// Returns `None` when no configured format matches.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }

        self.datetime_formats
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|dt| dt.date())
            .or_else(|| {
                self.date_formats
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            })
    }
}

/// Configuration for the classification engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Reference row selection
    pub lookup_mode: LookupMode,
    /// Branch order for single-subject diagnosis
    pub branch_precedence: BranchPrecedence,
    /// Subjects per parallel batch; `None` derives it from the CPU count
    pub chunk_size: Option<usize>,
    /// Number of equal-width bins for wide chart ranges
    pub chart_bins: usize,
    /// Draw a progress bar during population runs
    pub show_progress: bool,
    /// Date used when a measurement has no screening date; `None` means today
    pub reference_date: Option<NaiveDate>,
    /// Accepted date formats
    pub date_formats: DateFormatConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookup_mode: LookupMode::default(),
            branch_precedence: BranchPrecedence::default(),
            chunk_size: chunk_size_from_env(),
            chart_bins: DEFAULT_CHART_BINS,
            show_progress: false,
            reference_date: None,
            date_formats: DateFormatConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Set the reference row selection mode
    #[must_use]
    pub const fn with_lookup_mode(mut self, mode: LookupMode) -> Self {
        self.lookup_mode = mode;
        self
    }

    /// Set the branch precedence rule
    #[must_use]
    pub const fn with_branch_precedence(mut self, precedence: BranchPrecedence) -> Self {
        self.branch_precedence = precedence;
        self
    }

    /// Set an explicit batch size
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Pin the date used in place of "now"
    #[must_use]
    pub const fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Enable or disable the progress bar
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Batch size to use for `total` subjects
    ///
    /// Without an explicit size the cohort is split into roughly four batches
    /// per CPU. Always at least 1.
    #[must_use]
    pub fn effective_chunk_size(&self, total: usize) -> usize {
        match self.chunk_size {
            Some(size) => size.max(1),
            None => {
                let batches = num_cpus::get().max(1) * 4;
                total.div_ceil(batches).max(1)
            }
        }
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Engine Configuration:")?;
        writeln!(f, "  Lookup Mode: {}", self.lookup_mode)?;
        writeln!(f, "  Branch Precedence: {}", self.branch_precedence)?;
        match self.chunk_size {
            Some(size) => writeln!(f, "  Chunk Size: {size}")?,
            None => writeln!(f, "  Chunk Size: auto ({} CPUs)", num_cpus::get())?,
        }
        writeln!(f, "  Chart Bins: {}", self.chart_bins)?;
        writeln!(f, "  Show Progress: {}", self.show_progress)?;
        if let Some(date) = self.reference_date {
            writeln!(f, "  Reference Date: {date}")?;
        }
        Ok(())
    }
}

/// Batch size from the environment, if set to a positive integer
#[must_use]
pub fn chunk_size_from_env() -> Option<usize> {
    std::env::var(CHUNK_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|size| *size > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_dates_and_datetimes() {
        let formats = DateFormatConfig::default();
        let expected = NaiveDate::from_ymd_opt(2023, 1, 15);

        assert_eq!(formats.parse("2023-01-15"), expected);
        assert_eq!(formats.parse("15.01.2023"), expected);
        assert_eq!(formats.parse("2023-01-15 09:30:00"), expected);
        assert_eq!(formats.parse("2023-01-15T09:30:00+02:00"), expected);
        assert_eq!(formats.parse("not a date"), None);
        assert_eq!(formats.parse("   "), None);
    }

    #[test]
    fn test_effective_chunk_size_is_positive() {
        let config = EngineConfig::default().with_chunk_size(0);
        assert_eq!(config.effective_chunk_size(100), 1);

        let auto = EngineConfig {
            chunk_size: None,
            ..EngineConfig::default()
        };
        assert!(auto.effective_chunk_size(0) >= 1);
        assert!(auto.effective_chunk_size(10_000) >= 1);
    }
}
