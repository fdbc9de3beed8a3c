//! # Reference Data
//!
//! Immutable growth-reference and height-multiplier tables. Tables are built
//! once (at startup or first use) and passed by reference into engine calls;
//! nothing mutates them afterwards, so any number of threads may share them.
//!
//! ## Sources
//!
//! - LMS table: no bundled copy. Load the CDC 2000 BMI-for-age parameters
//!   from JSON with [`load_lms_table`].
//! - Multiplier table: bundled Paley tables via [`bundled_multipliers`], or
//!   a JSON file through [`load_multiplier_table`].
//!
//! ## Example
//!
//! ```rust
//! use clinic_core::reference::ReferenceData;
//!
//! let reference = ReferenceData::bundled();
//! assert!(reference.lms.is_none());
//! ```

mod lms_table;
mod multipliers;
mod paley_data;

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::errors::{ClinicError, ClinicResult};
use crate::settings::ReferenceSettings;

pub use lms_table::{LmsMatch, LmsSeries, LmsTable};
pub use multipliers::{HeightMultiplierTable, MultiplierRow, MultiplierSeries};
pub use paley_data::{PALEY_BOYS, PALEY_GIRLS};

static BUNDLED_MULTIPLIERS: Lazy<HeightMultiplierTable> = Lazy::new(|| {
    HeightMultiplierTable::new(
        MultiplierSeries::from_static(PALEY_BOYS),
        MultiplierSeries::from_static(PALEY_GIRLS),
    )
});

/// Shown alongside predictions made with [`bundled_multipliers`].
pub const BUNDLED_MULTIPLIER_NOTICE: &str =
    "Bundled Paley multipliers; verify against the published tables before clinical use";

/// The compiled-in Paley multiplier table, built on first use.
pub fn bundled_multipliers() -> &'static HeightMultiplierTable {
    &BUNDLED_MULTIPLIERS
}

/// The full reference set consulted by the engines.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceData {
    /// Pediatric BMI-for-age LMS parameters, when available
    pub lms: Option<LmsTable>,

    /// Adult height prediction multipliers
    pub multipliers: HeightMultiplierTable,
}

impl ReferenceData {
    pub fn new(lms: Option<LmsTable>, multipliers: HeightMultiplierTable) -> Self {
        ReferenceData { lms, multipliers }
    }

    /// Bundled multipliers, no LMS table.
    pub fn bundled() -> Self {
        ReferenceData {
            lms: None,
            multipliers: bundled_multipliers().clone(),
        }
    }

    /// Build the reference set described by settings.
    ///
    /// Configured files must load; unconfigured tables fall back to the
    /// bundled data (or none, for the LMS table).
    pub fn from_settings(settings: &ReferenceSettings) -> ClinicResult<Self> {
        let lms = settings
            .lms_table_path
            .as_deref()
            .map(load_lms_table)
            .transpose()?;
        if lms.is_none() {
            log::warn!("no LMS table configured; pediatric BMI percentiles are unavailable");
        }

        let multipliers = match settings.multiplier_table_path.as_deref() {
            Some(path) => load_multiplier_table(path)?,
            None => bundled_multipliers().clone(),
        };

        Ok(ReferenceData { lms, multipliers })
    }

    /// True when height predictions use the compiled-in multipliers.
    pub fn uses_bundled_multipliers(&self) -> bool {
        self.multipliers == *bundled_multipliers()
    }
}

/// Load an LMS table from a JSON file.
pub fn load_lms_table(path: &Path) -> ClinicResult<LmsTable> {
    let json = read_to_string(path)?;
    let table = LmsTable::from_json_str(&json)?;
    log::info!("loaded LMS table from {}", path.display());
    Ok(table)
}

/// Load a height multiplier table from a JSON file.
pub fn load_multiplier_table(path: &Path) -> ClinicResult<HeightMultiplierTable> {
    let json = read_to_string(path)?;
    let table = HeightMultiplierTable::from_json_str(&json)?;
    log::info!("loaded multiplier table from {}", path.display());
    Ok(table)
}

pub(crate) fn read_to_string(path: &Path) -> ClinicResult<String> {
    fs::read_to_string(path)
        .map_err(|e| ClinicError::file_error("read", path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demographics::Sex;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clinic_core_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_bundled_tables_are_valid() {
        assert!(MultiplierSeries::new(PALEY_BOYS.to_vec()).is_ok());
        assert!(MultiplierSeries::new(PALEY_GIRLS.to_vec()).is_ok());
    }

    #[test]
    fn test_bundled_tables_reach_maturity() {
        let table = bundled_multipliers();
        for sex in Sex::ALL {
            let rows = table.series(sex).rows();
            assert_eq!(rows.last().unwrap().1, 1.0);
            // Multipliers never increase with age
            assert!(rows.windows(2).all(|w| w[1].1 <= w[0].1));
        }
        assert_eq!(table.series(Sex::Male).max_age(), 18.0);
        assert_eq!(table.series(Sex::Female).max_age(), 16.0);
    }

    #[test]
    fn test_from_default_settings() {
        let reference = ReferenceData::from_settings(&ReferenceSettings::default()).unwrap();
        assert!(reference.lms.is_none());
        assert_eq!(&reference.multipliers, bundled_multipliers());
        assert!(reference.uses_bundled_multipliers());
    }

    #[test]
    fn test_from_settings_loads_files() {
        let lms_path = temp_path("lms.json");
        fs::write(&lms_path, r#"{ "female": { "24.0": [-1.02427, 16.4243, 0.085438] } }"#).unwrap();

        let settings = ReferenceSettings {
            lms_table_path: Some(lms_path.clone()),
            multiplier_table_path: None,
        };
        let reference = ReferenceData::from_settings(&settings).unwrap();
        let lms = reference.lms.unwrap();
        assert!(lms.series(Sex::Female).is_some());
        assert!(lms.series(Sex::Male).is_none());

        fs::remove_file(&lms_path).ok();
    }

    #[test]
    fn test_loaded_multipliers_are_not_bundled() {
        let path = temp_path("multipliers.json");
        fs::write(&path, r#"{ "male": [[10, 1.2], [12, 1.1]], "female": [[10, 1.15], [14, 1.0]] }"#).unwrap();

        let settings = ReferenceSettings {
            lms_table_path: None,
            multiplier_table_path: Some(path.clone()),
        };
        let reference = ReferenceData::from_settings(&settings).unwrap();
        assert!(!reference.uses_bundled_multipliers());
        assert!(ReferenceData::bundled().uses_bundled_multipliers());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let settings = ReferenceSettings {
            lms_table_path: None,
            multiplier_table_path: Some(temp_path("does_not_exist.json")),
        };
        let err = ReferenceData::from_settings(&settings).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
