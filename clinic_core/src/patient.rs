//! # Patient Demographics
//!
//! The subset of a patient record the calculators read, and auto-population
//! of it from a national identification number.
//!
//! ## Example
//!
//! ```rust
//! use clinic_core::demographics::Sex;
//! use clinic_core::patient::PatientDemographics;
//!
//! let mut patient = PatientDemographics::default();
//! let decoded = patient.apply_national_id("1960315123451");
//!
//! assert!(decoded.is_valid);
//! assert_eq!(patient.sex, Some(Sex::Male));
//! assert_eq!(patient.region.as_deref(), Some("Cluj"));
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculations::{BmiInput, PaleyInput};
use crate::demographics::Sex;
use crate::national_id::{validate_national_id, NationalIdDecoded};

/// Patient fields consumed by the calculators.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientDemographics {
    pub national_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
    /// County or sector name decoded from the national id
    pub region: Option<String>,
}

impl PatientDemographics {
    /// Record a national id and fill sex, birth date and region from it.
    ///
    /// The id text is always stored. Decoded fields overwrite existing ones
    /// only when the id is valid and its birth date exists on the calendar;
    /// otherwise they are left as they were.
    pub fn apply_national_id(&mut self, id: &str) -> NationalIdDecoded {
        let id = id.trim();
        self.national_id = (!id.is_empty()).then(|| id.to_string());

        let decoded = validate_national_id(id);
        let birth_date = decoded.birth_date();
        match (decoded.is_valid, birth_date, decoded.sex) {
            (true, Some(birth_date), Some(sex)) => {
                self.birth_date = Some(birth_date);
                self.sex = Some(sex);
                self.region = decoded.region.clone();
                log::debug!("demographics populated from national id");
            }
            (true, None, _) => {
                log::warn!(
                    "national id encodes a non-existent date {:?}; demographics unchanged",
                    decoded.date_of_birth
                );
            }
            _ => {}
        }
        decoded
    }

    /// BMI input for measurements taken on `reference_date`
    pub fn bmi_input(&self, height_cm: f64, weight_kg: f64, reference_date: NaiveDate) -> BmiInput {
        BmiInput {
            height_cm,
            weight_kg,
            birth_date: self.birth_date,
            sex: self.sex,
            reference_date,
        }
    }

    /// Height prediction input using chronological age
    pub fn paley_input(&self, current_height_cm: f64, reference_date: NaiveDate) -> PaleyInput {
        PaleyInput {
            current_height_cm,
            reference_date,
            birth_date: self.birth_date,
            bone_age_years: None,
            use_bone_age: false,
            sex: self.sex,
        }
    }
}
