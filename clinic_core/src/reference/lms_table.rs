//! Growth-reference LMS table: per sex, age in months → (L, M, S).
//!
//! ## JSON format
//!
//! ```json
//! {
//!   "male":   { "24.0": [-2.01118, 16.5757, 0.080592], "24.5": [...] },
//!   "female": { "24.0": [-1.02427, 16.4243, 0.085438] }
//! }
//! ```
//!
//! Keys are ages in months written as decimal strings; a sex may be
//! omitted, in which case lookups for it report the table as missing.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::demographics::Sex;
use crate::equations::LmsEntry;
use crate::errors::{ClinicError, ClinicResult};

const TABLE_NAME: &str = "lms_table";

/// One row matched by a nearest-age lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmsMatch {
    /// Tabulated age the row belongs to, in months
    pub age_months: f64,
    pub entry: LmsEntry,
}

/// LMS rows for one sex, sorted by strictly increasing age.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LmsSeries {
    rows: Vec<(f64, LmsEntry)>,
}

impl LmsSeries {
    /// Build a series, sorting rows by age.
    ///
    /// Rejects non-finite ages and duplicate ages.
    pub fn new(mut rows: Vec<(f64, LmsEntry)>) -> ClinicResult<Self> {
        if let Some((age, _)) = rows.iter().find(|(age, _)| !age.is_finite()) {
            return Err(ClinicError::reference_data(
                TABLE_NAME,
                format!("age {} is not a finite number", age),
            ));
        }
        if let Some((age, _)) = rows.iter().find(|(_, e)| !valid_entry(e)) {
            return Err(ClinicError::reference_data(
                TABLE_NAME,
                format!("row at {} months needs finite L and positive M, S", age),
            ));
        }
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(pair) = rows.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ClinicError::reference_data(
                TABLE_NAME,
                format!("duplicate age {} months", pair[0].0),
            ));
        }
        Ok(LmsSeries { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row whose tabulated age is closest to `age_months`.
    ///
    /// Ties between two equidistant ages resolve to the lower age. Returns
    /// `None` only for an empty series.
    pub fn nearest(&self, age_months: f64) -> Option<LmsMatch> {
        let mut best: Option<(f64, LmsEntry)> = None;
        for &(age, entry) in &self.rows {
            match best {
                // Rows ascend, so a strict comparison keeps the lower age on ties
                Some((best_age, _)) if (age - age_months).abs() >= (best_age - age_months).abs() => {}
                _ => best = Some((age, entry)),
            }
        }
        best.map(|(age_months, entry)| LmsMatch { age_months, entry })
    }

    /// Exact row for a tabulated age
    pub fn get(&self, age_months: f64) -> Option<LmsEntry> {
        self.rows
            .iter()
            .find(|(age, _)| *age == age_months)
            .map(|(_, entry)| *entry)
    }

    /// Tabulated age range (first, last)
    pub fn age_range(&self) -> Option<(f64, f64)> {
        Some((self.rows.first()?.0, self.rows.last()?.0))
    }
}

/// Sex-specific LMS reference data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LmsTable {
    series: HashMap<Sex, LmsSeries>,
}

impl LmsTable {
    pub fn new() -> Self {
        LmsTable::default()
    }

    /// Add (or replace) the series for one sex
    pub fn with_series(mut self, sex: Sex, series: LmsSeries) -> Self {
        self.series.insert(sex, series);
        self
    }

    /// Series for a sex, if the table has one
    pub fn series(&self, sex: Sex) -> Option<&LmsSeries> {
        self.series.get(&sex)
    }

    /// Parse the JSON format described in the module docs.
    pub fn from_json_str(json: &str) -> ClinicResult<Self> {
        let raw: RawLmsTable = serde_json::from_str(json)?;
        let mut table = LmsTable::new();
        for (sex, rows) in [(Sex::Male, raw.male), (Sex::Female, raw.female)] {
            if let Some(rows) = rows {
                table = table.with_series(sex, parse_series(sex, rows)?);
            }
        }
        Ok(table)
    }
}

fn valid_entry(entry: &LmsEntry) -> bool {
    entry.l.is_finite() && entry.m.is_finite() && entry.s.is_finite() && entry.m > 0.0 && entry.s > 0.0
}

#[derive(Debug, Deserialize)]
struct RawLmsTable {
    #[serde(default)]
    male: Option<BTreeMap<String, [f64; 3]>>,
    #[serde(default)]
    female: Option<BTreeMap<String, [f64; 3]>>,
}

fn parse_series(sex: Sex, rows: BTreeMap<String, [f64; 3]>) -> ClinicResult<LmsSeries> {
    let parsed = rows
        .into_iter()
        .map(|(key, lms)| {
            key.trim()
                .parse::<f64>()
                .map(|age| (age, LmsEntry::from(lms)))
                .map_err(|_| {
                    ClinicError::reference_data(
                        TABLE_NAME,
                        format!("{} age key '{}' is not a number", sex.table_key(), key),
                    )
                })
        })
        .collect::<ClinicResult<Vec<_>>>()?;
    LmsSeries::new(parsed)
}
