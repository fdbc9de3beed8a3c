//! # Adult Height Prediction
//!
//! Paley multiplier method: predicted adult height is current height times
//! a sex- and age-specific multiplier.
//!
//! ```text
//! predicted = current × multiplier(age)
//! ```
//!
//! The multiplier is linearly interpolated between the bracketing table
//! rows. At or past the oldest tabulated age growth is complete and the
//! multiplier is exactly 1.0. Ages below the youngest row extrapolate from
//! the two youngest rows.
//!
//! The age may be chronological (whole months / 12) or a skeletal (bone)
//! age read from radiographs; the result records which one was used.
//!
//! ## Example
//!
//! ```rust
//! use clinic_core::calculations::paley::compute_height_prediction;
//! use clinic_core::demographics::Sex;
//! use clinic_core::reference::bundled_multipliers;
//!
//! let result = compute_height_prediction(150.0, 18.0, Some(Sex::Male), false, bundled_multipliers()).unwrap();
//! assert_eq!(result.multiplier, 1.0);
//! assert_eq!(result.growth_remaining_cm, 0.0);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::demographics::{age_in_years, Sex};
use crate::equations::linear_interpolate;
use crate::errors::{ClinicError, ClinicResult};
use crate::reference::HeightMultiplierTable;
use crate::units::{round_to, Centimeters};

/// Input parameters for a height prediction, as captured by the calculator
/// form.
///
/// ## JSON Example
///
/// ```json
/// {
///   "current_height_cm": 132.0,
///   "reference_date": "2025-03-10",
///   "birth_date": "2016-01-04",
///   "bone_age_years": 10.5,
///   "use_bone_age": true,
///   "sex": "Male"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaleyInput {
    pub current_height_cm: f64,

    pub reference_date: NaiveDate,

    #[serde(default)]
    pub birth_date: Option<NaiveDate>,

    /// Skeletal age in years
    #[serde(default)]
    pub bone_age_years: Option<f64>,

    /// Prefer `bone_age_years` over chronological age
    #[serde(default)]
    pub use_bone_age: bool,

    #[serde(default)]
    pub sex: Option<Sex>,
}

impl PaleyInput {
    /// Age to predict from, and whether it is a bone age.
    ///
    /// Bone age wins when the override is set and a value is present;
    /// otherwise chronological age from the birth date. `None` when neither
    /// is available.
    pub fn resolve_age(&self) -> Option<(f64, bool)> {
        if self.use_bone_age {
            if let Some(bone_age) = self.bone_age_years {
                return Some((bone_age, true));
            }
            log::debug!("bone age requested but not supplied; using chronological age");
        }
        self.birth_date
            .map(|birth| (age_in_years(birth, self.reference_date), false))
    }

    /// Strict validation for front ends that want an explanation.
    pub fn validate(&self) -> ClinicResult<()> {
        if !self.current_height_cm.is_finite() || self.current_height_cm <= 0.0 {
            return Err(ClinicError::invalid_input(
                "current_height_cm",
                self.current_height_cm.to_string(),
                "Height must be a positive number of centimeters",
            ));
        }
        if self.sex.is_none() {
            return Err(ClinicError::missing_field("sex"));
        }
        match self.resolve_age() {
            None => Err(ClinicError::missing_field(if self.use_bone_age {
                "bone_age_years"
            } else {
                "birth_date"
            })),
            Some((age, _)) if !(age > 0.0) => Err(ClinicError::invalid_input(
                "age",
                age.to_string(),
                "Age must be greater than zero",
            )),
            Some(_) => Ok(()),
        }
    }
}

/// Result of a height prediction. Immutable once returned.
///
/// ## JSON Example
///
/// ```json
/// {
///   "multiplier": 1.2483,
///   "predicted_height_cm": 164.8,
///   "growth_remaining_cm": 32.8,
///   "current_height_cm": 132.0,
///   "age_used": 10.5,
///   "is_bone_age": true,
///   "gender": "Male"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaleyResult {
    /// Interpolated multiplier, 4 decimals
    pub multiplier: f64,

    /// 1 decimal
    pub predicted_height_cm: f64,

    /// 1 decimal
    pub growth_remaining_cm: f64,

    pub current_height_cm: f64,

    /// Years, 2 decimals
    pub age_used: f64,

    /// True when `age_used` is a skeletal age
    pub is_bone_age: bool,

    #[serde(rename = "gender")]
    pub sex: Sex,
}

impl PaleyResult {
    /// True when the prediction adds no height.
    ///
    /// This holds at the maturity cap, and also below it wherever the
    /// bracketing rows are both 1.0.
    pub fn has_no_remaining_growth(&self) -> bool {
        self.multiplier == 1.0 && self.growth_remaining_cm == 0.0
    }
}

/// Predict adult height.
///
/// Returns `None` when height or age is not positive, or sex is unknown.
pub fn compute_height_prediction(
    current_height_cm: f64,
    age_years: f64,
    sex: Option<Sex>,
    uses_bone_age: bool,
    table: &HeightMultiplierTable,
) -> Option<PaleyResult> {
    let sex = sex?;
    if !(current_height_cm > 0.0 && age_years > 0.0) {
        return None;
    }

    let series = table.series(sex);
    let age_used = round_to(age_years, 2);

    if age_years >= series.max_age() {
        log::debug!(
            "age {} at or past maturity ({}) for {}",
            age_years,
            series.max_age(),
            sex.table_key()
        );
        return Some(PaleyResult {
            multiplier: 1.0,
            predicted_height_cm: current_height_cm,
            growth_remaining_cm: 0.0,
            current_height_cm,
            age_used,
            is_bone_age: uses_bone_age,
            sex,
        });
    }

    let (lower, upper) = series.bracket(age_years);
    if age_years < lower.0 {
        log::warn!(
            "age {} below first multiplier row ({}); extrapolating",
            age_years,
            lower.0
        );
    }
    let multiplier = linear_interpolate(age_years, lower, upper);
    let current = Centimeters(current_height_cm);
    let predicted = current * multiplier;

    Some(PaleyResult {
        multiplier: round_to(multiplier, 4),
        predicted_height_cm: round_to(predicted.0, 1),
        growth_remaining_cm: round_to((predicted - current).0, 1),
        current_height_cm,
        age_used,
        is_bone_age: uses_bone_age,
        sex,
    })
}

/// Run [`compute_height_prediction`] for a form input.
pub fn compute_from_input(input: &PaleyInput, table: &HeightMultiplierTable) -> Option<PaleyResult> {
    let (age, is_bone_age) = input.resolve_age()?;
    compute_height_prediction(input.current_height_cm, age, input.sex, is_bone_age, table)
}
