//! # Observations
//!
//! An `Observation` is one stored calculation: the tagged record plus the
//! identifiers that attach it to an encounter. Observations serialize to
//! JSON and are treated as immutable once written.
//!
//! ## Structure
//!
//! ```text
//! Observation
//! ├── id: Uuid (v4)
//! ├── encounter_id: Option<Uuid>
//! ├── observation_date: DateTime<Utc>
//! ├── version: schema version of the stored payload
//! └── record: CalculationRecord (tagged by calculation_type)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use clinic_core::calculations::{bmi, BmiInput, CalculationRecord};
//! use clinic_core::observation::Observation;
//! use clinic_core::reference::ReferenceData;
//!
//! let inputs = BmiInput {
//!     height_cm: 170.0,
//!     weight_kg: 70.0,
//!     birth_date: None,
//!     sex: None,
//!     reference_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
//! };
//! let results = bmi::calculate(&inputs, &ReferenceData::bundled()).unwrap();
//! let observation = Observation::new(CalculationRecord::Bmi { inputs, results });
//!
//! assert_eq!(observation.summary(), "Body Mass Index: 24.2 (Healthy Weight)");
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::CalculationRecord;
use crate::errors::{ClinicError, ClinicResult};
use crate::reference::read_to_string;

/// Current schema version for stored observations
pub const SCHEMA_VERSION: &str = "1.0.0";

/// A stored calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: Uuid,

    /// Encounter the observation belongs to, if any
    #[serde(default)]
    pub encounter_id: Option<Uuid>,

    pub observation_date: DateTime<Utc>,

    /// Schema version (for migration compatibility)
    pub version: String,

    pub record: CalculationRecord,
}

impl Observation {
    /// Wrap a record with a fresh id, stamped now.
    pub fn new(record: CalculationRecord) -> Self {
        Observation {
            id: Uuid::new_v4(),
            encounter_id: None,
            observation_date: Utc::now(),
            version: SCHEMA_VERSION.to_string(),
            record,
        }
    }

    /// Attach to an encounter.
    pub fn with_encounter(mut self, encounter_id: Uuid) -> Self {
        self.encounter_id = Some(encounter_id);
        self
    }

    pub fn calc_type(&self) -> &'static str {
        self.record.calc_type()
    }

    /// One-line display text, e.g. `Body Mass Index: 24.2 (Healthy Weight)`.
    ///
    /// Reads the stored result only.
    pub fn summary(&self) -> String {
        format!("{}: {}", self.record.label(), self.record.headline())
    }

    pub fn to_json(&self) -> ClinicResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a stored observation, rejecting incompatible schema versions.
    pub fn from_json(json: &str) -> ClinicResult<Self> {
        let observation: Observation = serde_json::from_str(json)?;
        validate_version(&observation.version)?;
        Ok(observation)
    }

    /// Write to `path` atomically: write a sibling `.tmp` file, sync, rename.
    pub fn save(&self, path: &Path) -> ClinicResult<()> {
        let json = self.to_json()?;
        let tmp_path = path.with_extension("json.tmp");

        let mut tmp_file = File::create(&tmp_path).map_err(|e| {
            ClinicError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
        })?;
        tmp_file.write_all(json.as_bytes()).map_err(|e| {
            ClinicError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
        })?;
        tmp_file.sync_all().map_err(|e| {
            ClinicError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
        })?;

        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            ClinicError::file_error("rename to final", path.display().to_string(), e.to_string())
        })?;

        log::info!("saved {} observation {} to {}", self.calc_type(), self.id, path.display());
        Ok(())
    }

    /// Load and version-check an observation file.
    pub fn load(path: &Path) -> ClinicResult<Self> {
        let json = read_to_string(path)?;
        Observation::from_json(&json)
    }
}

/// Major versions must match; anything unparsable is rejected.
fn validate_version(stored: &str) -> ClinicResult<()> {
    let major = |version: &str| version.split('.').next().and_then(|p| p.parse::<u32>().ok());
    match (major(stored), major(SCHEMA_VERSION)) {
        (Some(a), Some(b)) if a == b => Ok(()),
        _ => Err(ClinicError::VersionMismatch {
            file_version: stored.to_string(),
            expected_version: SCHEMA_VERSION.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{paley, BmiInput, CalculationRecord, PaleyInput};
    use crate::demographics::Sex;
    use crate::reference::ReferenceData;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
    }

    fn bmi_observation() -> Observation {
        let inputs = BmiInput {
            height_cm: 170.0,
            weight_kg: 70.0,
            birth_date: None,
            sex: Some(Sex::Female),
            reference_date: today(),
        };
        let results = crate::calculations::bmi::calculate(&inputs, &ReferenceData::bundled()).unwrap();
        Observation::new(CalculationRecord::Bmi { inputs, results })
    }

    #[test]
    fn test_new_observation() {
        let obs = bmi_observation();
        assert_eq!(obs.version, SCHEMA_VERSION);
        assert_eq!(obs.calc_type(), "bmi");
        assert!(obs.encounter_id.is_none());
        assert_eq!(obs.summary(), "Body Mass Index: 24.2 (Healthy Weight)");
    }

    #[test]
    fn test_json_roundtrip() {
        let encounter = Uuid::new_v4();
        let obs = bmi_observation().with_encounter(encounter);
        let json = obs.to_json().unwrap();
        assert!(json.contains("\"calculation_type\": \"bmi\""));

        let roundtrip = Observation::from_json(&json).unwrap();
        assert_eq!(roundtrip, obs);
        assert_eq!(roundtrip.encounter_id, Some(encounter));
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("1.4.2").is_ok());
        assert!(validate_version("2.0.0").is_err());
        assert!(validate_version("0.9.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_major_mismatch_rejected() {
        let mut obs = bmi_observation();
        obs.version = "2.0.0".to_string();
        let json = serde_json::to_string(&obs).unwrap();
        let err = Observation::from_json(&json).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let err = Observation::from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_save_and_load() {
        let inputs = PaleyInput {
            current_height_cm: 140.0,
            reference_date: today(),
            birth_date: Some(NaiveDate::from_ymd_opt(2015, 5, 1).unwrap()),
            bone_age_years: None,
            use_bone_age: false,
            sex: Some(Sex::Male),
        };
        let results = paley::compute_from_input(&inputs, &ReferenceData::bundled().multipliers).unwrap();
        let obs = Observation::new(CalculationRecord::PaleyHeight { inputs, results });

        let path = std::env::temp_dir().join(format!("clinic_obs_{}.json", obs.id));
        obs.save(&path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = Observation::load(&path).unwrap();
        assert_eq!(loaded, obs);
        assert!(loaded.summary().starts_with("Predicted Adult Height: "));

        fs::remove_file(&path).ok();
    }
}
