//! Height multiplier table: per sex, ordered (age in years, multiplier) rows.
//!
//! ## JSON format
//!
//! ```json
//! {
//!   "male":   [[0.0, 3.535], [0.25, 2.908], ...],
//!   "female": [[0.0, 3.290], [0.25, 2.690], ...]
//! }
//! ```
//!
//! Both sexes are required. Rows must be non-empty with strictly
//! increasing ages.

use serde::Deserialize;

use crate::demographics::Sex;
use crate::errors::{ClinicError, ClinicResult};

const TABLE_NAME: &str = "multiplier_table";

/// A row of the multiplier table: (age in years, multiplier)
pub type MultiplierRow = (f64, f64);

/// Multiplier rows for one sex.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiplierSeries {
    rows: Vec<MultiplierRow>,
}

impl MultiplierSeries {
    /// Build a series from rows already in age order.
    ///
    /// Rejects empty input, non-finite values and ages that do not strictly
    /// increase.
    pub fn new(rows: Vec<MultiplierRow>) -> ClinicResult<Self> {
        if rows.is_empty() {
            return Err(ClinicError::reference_data(TABLE_NAME, "series has no rows"));
        }
        if let Some((age, mult)) = rows.iter().find(|(a, m)| !a.is_finite() || !m.is_finite()) {
            return Err(ClinicError::reference_data(
                TABLE_NAME,
                format!("row ({}, {}) is not finite", age, mult),
            ));
        }
        if let Some(pair) = rows.windows(2).find(|w| w[1].0 <= w[0].0) {
            return Err(ClinicError::reference_data(
                TABLE_NAME,
                format!("ages must strictly increase ({} then {})", pair[0].0, pair[1].0),
            ));
        }
        Ok(MultiplierSeries { rows })
    }

    /// Build from compiled-in rows that the test suite validates.
    pub(crate) fn from_static(rows: &'static [MultiplierRow]) -> Self {
        debug_assert!(MultiplierSeries::new(rows.to_vec()).is_ok());
        MultiplierSeries { rows: rows.to_vec() }
    }

    pub fn rows(&self) -> &[MultiplierRow] {
        &self.rows
    }

    /// Oldest tabulated age; at or past it growth is considered complete
    pub fn max_age(&self) -> f64 {
        // Non-empty by construction
        self.rows.last().map_or(0.0, |row| row.0)
    }

    /// Consecutive rows `(x1, y1), (x2, y2)` with `x1 <= age < x2`.
    ///
    /// Scans from the youngest row and returns the first match. An age below
    /// the first row falls back to the two youngest rows (extrapolating
    /// backwards); an age at or past the last row falls back to the last row
    /// paired with itself. A single-row series always pairs the row with
    /// itself.
    pub fn bracket(&self, age: f64) -> (MultiplierRow, MultiplierRow) {
        if let Some(pair) = self.rows.windows(2).find(|w| w[0].0 <= age && age < w[1].0) {
            return (pair[0], pair[1]);
        }
        let first = self.rows[0];
        let last = self.rows[self.rows.len() - 1];
        if age < first.0 {
            (first, self.rows.get(1).copied().unwrap_or(first))
        } else {
            (last, last)
        }
    }
}

/// Sex-specific height multiplier reference data.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMultiplierTable {
    male: MultiplierSeries,
    female: MultiplierSeries,
}

impl HeightMultiplierTable {
    pub fn new(male: MultiplierSeries, female: MultiplierSeries) -> Self {
        HeightMultiplierTable { male, female }
    }

    /// Series for one sex
    pub fn series(&self, sex: Sex) -> &MultiplierSeries {
        match sex {
            Sex::Male => &self.male,
            Sex::Female => &self.female,
        }
    }

    /// Parse the JSON format described in the module docs.
    pub fn from_json_str(json: &str) -> ClinicResult<Self> {
        let raw: RawMultiplierTable = serde_json::from_str(json)?;
        Ok(HeightMultiplierTable {
            male: MultiplierSeries::new(raw.male)?,
            female: MultiplierSeries::new(raw.female)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawMultiplierTable {
    male: Vec<MultiplierRow>,
    female: Vec<MultiplierRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> MultiplierSeries {
        MultiplierSeries::new(vec![(8.0, 1.40), (10.0, 1.20), (12.0, 1.10), (16.0, 1.0)]).unwrap()
    }

    #[test]
    fn test_bracket_inside() {
        assert_eq!(series().bracket(11.0), ((10.0, 1.20), (12.0, 1.10)));
    }

    #[test]
    fn test_bracket_on_row_uses_row_as_lower() {
        assert_eq!(series().bracket(10.0), ((10.0, 1.20), (12.0, 1.10)));
    }

    #[test]
    fn test_bracket_below_first_row() {
        assert_eq!(series().bracket(5.0), ((8.0, 1.40), (10.0, 1.20)));
    }

    #[test]
    fn test_bracket_past_last_row() {
        assert_eq!(series().bracket(17.0), ((16.0, 1.0), (16.0, 1.0)));
    }

    #[test]
    fn test_single_row_series() {
        let s = MultiplierSeries::new(vec![(18.0, 1.0)]).unwrap();
        assert_eq!(s.bracket(3.0), ((18.0, 1.0), (18.0, 1.0)));
        assert_eq!(s.max_age(), 18.0);
    }

    #[test]
    fn test_rejects_unsorted() {
        let err = MultiplierSeries::new(vec![(1.0, 2.0), (1.0, 1.9)]).unwrap_err();
        assert_eq!(err.error_code(), "REFERENCE_DATA");
        assert!(MultiplierSeries::new(vec![(2.0, 2.0), (1.0, 1.9)]).is_err());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(MultiplierSeries::new(Vec::new()).is_err());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{ "male": [[10, 1.2], [12, 1.1]], "female": [[10, 1.15], [14, 1.0]] }"#;
        let table = HeightMultiplierTable::from_json_str(json).unwrap();
        assert_eq!(table.series(Sex::Male).max_age(), 12.0);
        assert_eq!(table.series(Sex::Female).rows().len(), 2);
    }

    #[test]
    fn test_from_json_missing_sex() {
        let json = r#"{ "male": [[10, 1.2]] }"#;
        let err = HeightMultiplierTable::from_json_str(json).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
