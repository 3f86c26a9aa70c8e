//! Reference table store
//!
//! Sex- and indicator-partitioned reference distributions. The store is built
//! once, then only read: it holds no interior mutability, so a single instance
//! behind an `Arc` serves every worker thread without locking.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::config::LookupMode;
use crate::error::{ClassificationError, Result};
use crate::models::types::{Indicator, Sex};
use crate::standards::{ReferenceRow, who_rows};

/// Rows of one (indicator, sex) partition, sorted by index value
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
    /// Validate and wrap a list of rows
    ///
    /// Rows must be non-empty, strictly increasing in index, and carry a
    /// positive finite median and standard deviation.
    pub fn new(rows: Vec<ReferenceRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err(ClassificationError::InvalidReferenceTable(
                "table has no rows".to_string(),
            ));
        }
        if let Some(pair) = rows.windows(2).find(|w| w[0].index >= w[1].index) {
            return Err(ClassificationError::InvalidReferenceTable(format!(
                "index values not strictly increasing at {} -> {}",
                pair[0].index, pair[1].index
            )));
        }
        if let Some(bad) = rows.iter().find(|r| {
            !(r.index.is_finite()
                && r.median.is_finite()
                && r.median > 0.0
                && r.sd.is_finite()
                && r.sd > 0.0)
        }) {
            return Err(ClassificationError::InvalidReferenceTable(format!(
                "row at index {} has median {} and sd {}",
                bad.index, bad.median, bad.sd
            )));
        }
        Ok(Self { rows })
    }

    /// Inclusive span of tabulated index values
    #[must_use]
    pub fn span(&self) -> (f64, f64) {
        // new() rejects empty tables
        let first = self.rows.first().map_or(0.0, |r| r.index);
        let last = self.rows.last().map_or(0.0, |r| r.index);
        (first, last)
    }

    /// Whether a value lies within the tabulated span
    #[must_use]
    pub fn covers(&self, value: f64) -> bool {
        let (first, last) = self.span();
        value >= first && value <= last
    }

    /// Row with the minimum absolute distance to `value`; ties go to the lower row
    #[must_use]
    pub fn nearest(&self, value: f64) -> Option<ReferenceRow> {
        if !self.covers(value) {
            return None;
        }
        let i = self.rows.partition_point(|r| r.index < value);
        if i == 0 {
            return self.rows.first().copied();
        }
        let lower = self.rows[i - 1];
        match self.rows.get(i) {
            Some(upper) if upper.index - value < value - lower.index => Some(*upper),
            _ => Some(lower),
        }
    }

    /// Reference values linearly interpolated between the surrounding rows
    #[must_use]
    pub fn interpolated(&self, value: f64) -> Option<ReferenceRow> {
        if !self.covers(value) {
            return None;
        }
        let i = self.rows.partition_point(|r| r.index < value);
        let upper = *self.rows.get(i)?;
        if i == 0 || upper.index == value {
            return Some(upper);
        }
        let lower = self.rows[i - 1];
        let t = (value - lower.index) / (upper.index - lower.index);
        Some(ReferenceRow {
            index: value,
            median: lower.median + t * (upper.median - lower.median),
            sd: lower.sd + t * (upper.sd - lower.sd),
        })
    }
}

/// Serialized form of a custom reference table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceTableSpec {
    /// Indicator the rows belong to
    pub indicator: Indicator,
    /// Sex partition
    pub sex: Sex,
    /// Tabulated rows
    pub rows: Vec<ReferenceRow>,
}

/// Immutable store of all reference tables
#[derive(Debug, Clone)]
pub struct ReferenceTableStore {
    tables: FxHashMap<(Indicator, Sex), ReferenceTable>,
    mode: LookupMode,
}

impl ReferenceTableStore {
    /// Store holding the embedded WHO tables
    pub fn who(mode: LookupMode) -> Result<Self> {
        let mut builder = ReferenceTableStoreBuilder::new(mode);
        for indicator in Indicator::ALL {
            for sex in [Sex::Male, Sex::Female] {
                let rows = who_rows(indicator, sex).ok_or_else(|| {
                    ClassificationError::InvalidReferenceTable(format!(
                        "no embedded {indicator} rows for {sex}"
                    ))
                })?;
                builder = builder.table(indicator, sex, rows.to_vec())?;
            }
        }
        builder.build()
    }

    /// Store built from a JSON array of [`ReferenceTableSpec`]
    ///
    /// Every indicator must be present for both sexes.
    ///
    /// # Errors
    /// `Serialization` for malformed JSON, `InvalidReferenceTable` when a
    /// table fails validation or a partition is missing or duplicated.
    pub fn from_json(json: &str, mode: LookupMode) -> Result<Self> {
        let specs: Vec<ReferenceTableSpec> = serde_json::from_str(json)?;
        specs
            .into_iter()
            .try_fold(ReferenceTableStoreBuilder::new(mode), |builder, spec| {
                builder.table(spec.indicator, spec.sex, spec.rows)
            })?
            .build()
    }

    /// Store built from a JSON file
    ///
    /// # Errors
    /// `Io` when the file cannot be read, otherwise as [`Self::from_json`].
    pub fn from_json_file(path: &Path, mode: LookupMode) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json, mode)
    }

    /// Table for an indicator and sex
    #[must_use]
    pub fn table(&self, indicator: Indicator, sex: Sex) -> Option<&ReferenceTable> {
        self.tables.get(&(indicator, sex))
    }

    /// Reference median and SD at an index value
    ///
    /// # Errors
    /// `UnknownSex` when `sex` is not Male or Female, `OutOfReferenceRange`
    /// when the value lies outside the tabulated span.
    pub fn lookup(&self, indicator: Indicator, sex: Sex, index_value: f64) -> Result<ReferenceRow> {
        if !sex.is_known() {
            return Err(ClassificationError::unknown_sex(""));
        }
        let out_of_range = || ClassificationError::OutOfReferenceRange {
            indicator,
            sex,
            index_value,
        };
        let table = self.table(indicator, sex).ok_or_else(out_of_range)?;
        let row = match self.mode {
            LookupMode::Nearest => table.nearest(index_value),
            LookupMode::Interpolated => table.interpolated(index_value),
        };
        row.ok_or_else(out_of_range)
    }
}

/// Builder collecting validated tables before the store is frozen
#[derive(Debug)]
pub struct ReferenceTableStoreBuilder {
    tables: FxHashMap<(Indicator, Sex), ReferenceTable>,
    mode: LookupMode,
}

impl ReferenceTableStoreBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new(mode: LookupMode) -> Self {
        Self {
            tables: FxHashMap::default(),
            mode,
        }
    }

    /// Add a table, validating its rows
    pub fn table(mut self, indicator: Indicator, sex: Sex, rows: Vec<ReferenceRow>) -> Result<Self> {
        if !sex.is_known() {
            return Err(ClassificationError::InvalidReferenceTable(format!(
                "{indicator} table must be partitioned by Male or Female"
            )));
        }
        let table = ReferenceTable::new(rows).map_err(|e| {
            ClassificationError::InvalidReferenceTable(format!("{indicator} ({sex}): {e}"))
        })?;
        if self.tables.insert((indicator, sex), table).is_some() {
            return Err(ClassificationError::InvalidReferenceTable(format!(
                "duplicate {indicator} table for {sex}"
            )));
        }
        Ok(self)
    }

    /// Freeze the store, requiring every indicator for both sexes
    pub fn build(self) -> Result<ReferenceTableStore> {
        for indicator in Indicator::ALL {
            for sex in [Sex::Male, Sex::Female] {
                if !self.tables.contains_key(&(indicator, sex)) {
                    return Err(ClassificationError::InvalidReferenceTable(format!(
                        "missing {indicator} table for {sex}"
                    )));
                }
            }
        }
        Ok(ReferenceTableStore {
            tables: self.tables,
            mode: self.mode,
        })
    }
}
