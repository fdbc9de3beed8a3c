//! # Body Mass Index
//!
//! Computes BMI and grades it by age band:
//!
//! - **Infant** (< 24 months): not graded
//! - **Adult** (≥ 240 months), or sex unknown: WHO fixed cut points
//! - **Pediatric**: CDC LMS Z-score and percentile from the nearest
//!   tabulated age, with the CDC severe-obesity rule above the 95th
//!
//! ## Preconditions
//!
//! Height and weight must both be positive. Otherwise no result is produced:
//! the calculation has simply not been attempted yet.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use clinic_core::calculations::bmi::{compute_bmi, BmiCategory};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
//! let result = compute_bmi(170.0, 70.0, None, None, today, None).unwrap();
//!
//! assert_eq!(result.bmi, 24.2);
//! assert_eq!(result.category, BmiCategory::HealthyWeight);
//! ```

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::demographics::{resolve_optional, AgeBand, DemographicContext, Sex};
use crate::equations::{standard_normal_cdf, Equation, LmsEntry};
use crate::errors::{ClinicError, ClinicResult};
use crate::reference::{LmsTable, ReferenceData};
use crate::units::{round_to, Centimeters, Kilograms, Meters};

/// Severe obesity: BMI at or above this multiple of the 95th percentile BMI
pub const SEVERE_OBESITY_RATIO: f64 = 1.2;

/// Severe obesity: BMI at or above this absolute value
pub const SEVERE_OBESITY_BMI: f64 = 35.0;

// ============================================================================
// Categories
// ============================================================================

/// BMI grading outcome. Stored as its label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum BmiCategory {
    Underweight,
    HealthyWeight,
    Overweight,
    /// Pediatric: ≥ 95th percentile
    Obesity,
    /// Pediatric: ≥ 120% of the 95th percentile BMI, or BMI ≥ 35
    SevereObesity,
    /// Adult: 30 to < 35
    ObesityClassI,
    /// Adult: 35 to < 40
    ObesityClassII,
    /// Adult: 40 and over
    ObesityClassIII,
    /// Under 24 months; not graded
    NotApplicableInfant,
    /// No LMS series for the patient's sex
    Unknown,
    /// LMS series present but no row could be retrieved
    LookupFailed,
}

impl BmiCategory {
    pub const ALL: [BmiCategory; 11] = [
        BmiCategory::Underweight,
        BmiCategory::HealthyWeight,
        BmiCategory::Overweight,
        BmiCategory::Obesity,
        BmiCategory::SevereObesity,
        BmiCategory::ObesityClassI,
        BmiCategory::ObesityClassII,
        BmiCategory::ObesityClassIII,
        BmiCategory::NotApplicableInfant,
        BmiCategory::Unknown,
        BmiCategory::LookupFailed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::HealthyWeight => "Healthy Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obesity => "Obesity",
            BmiCategory::SevereObesity => "Severe Obesity",
            BmiCategory::ObesityClassI => "Obesity Class I",
            BmiCategory::ObesityClassII => "Obesity Class II",
            BmiCategory::ObesityClassIII => "Obesity Class III",
            BmiCategory::NotApplicableInfant => "N/A (Infant)",
            BmiCategory::Unknown => "Unknown",
            BmiCategory::LookupFailed => "Unknown (Lookup Failed)",
        }
    }

    /// WHO adult classification. Lower bounds are inclusive.
    pub fn from_adult_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::HealthyWeight
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else if bmi < 35.0 {
            BmiCategory::ObesityClassI
        } else if bmi < 40.0 {
            BmiCategory::ObesityClassII
        } else {
            BmiCategory::ObesityClassIII
        }
    }

    /// CDC pediatric classification from percentile, with the severe
    /// obesity split above the 95th.
    pub fn from_percentile(percentile: f64, bmi: f64, bmi_95th: f64) -> Self {
        if percentile < 5.0 {
            BmiCategory::Underweight
        } else if percentile < 85.0 {
            BmiCategory::HealthyWeight
        } else if percentile < 95.0 {
            BmiCategory::Overweight
        } else if bmi >= SEVERE_OBESITY_RATIO * bmi_95th || bmi >= SEVERE_OBESITY_BMI {
            BmiCategory::SevereObesity
        } else {
            BmiCategory::Obesity
        }
    }

    /// True for the fallback categories that mark degraded reference data
    pub fn is_degraded(&self) -> bool {
        matches!(self, BmiCategory::Unknown | BmiCategory::LookupFailed)
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<BmiCategory> for String {
    fn from(category: BmiCategory) -> Self {
        category.label().to_string()
    }
}

impl TryFrom<String> for BmiCategory {
    type Error = ClinicError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        BmiCategory::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .ok_or_else(|| ClinicError::invalid_input("category", label, "Unknown BMI category"))
    }
}

// ============================================================================
// Methodology
// ============================================================================

/// Which grading method produced a result. Stored as its label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Methodology {
    NoneInfant,
    WhoAdult,
    CdcLms,
    FailedSexTable,
    FailedLmsLookup,
}

impl Methodology {
    pub const ALL: [Methodology; 5] = [
        Methodology::NoneInfant,
        Methodology::WhoAdult,
        Methodology::CdcLms,
        Methodology::FailedSexTable,
        Methodology::FailedLmsLookup,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Methodology::NoneInfant => "None (Infant)",
            Methodology::WhoAdult => "WHO Adult Standards",
            Methodology::CdcLms => "CDC LMS 2000 (Pediatric)",
            Methodology::FailedSexTable => "Failed (Gender Invalid)",
            Methodology::FailedLmsLookup => "Failed (LMS Missing)",
        }
    }

    /// Formula quoted in the metadata for this method
    pub fn formula(&self) -> &'static str {
        match self {
            Methodology::NoneInfant | Methodology::WhoAdult => Equation::BodyMassIndex.formula(),
            Methodology::CdcLms => Equation::LmsZScore.formula(),
            Methodology::FailedSexTable | Methodology::FailedLmsLookup => "N/A",
        }
    }
}

impl From<Methodology> for String {
    fn from(method: Methodology) -> Self {
        method.label().to_string()
    }
}

impl TryFrom<String> for Methodology {
    type Error = ClinicError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Methodology::ALL
            .into_iter()
            .find(|m| m.label() == label)
            .ok_or_else(|| ClinicError::invalid_input("methodology", label, "Unknown methodology"))
    }
}

// ============================================================================
// Input
// ============================================================================

/// Input parameters for a BMI calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "height_cm": 142.0,
///   "weight_kg": 38.5,
///   "birth_date": "2014-09-02",
///   "sex": "Female",
///   "reference_date": "2025-03-10"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiInput {
    pub height_cm: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<Sex>,
    /// Clinical event date the age is measured against
    pub reference_date: NaiveDate,
}

impl BmiInput {
    /// Strict validation for front ends that want an explanation.
    ///
    /// [`calculate`] itself does not call this; it returns `None` for
    /// non-positive measurements.
    pub fn validate(&self) -> ClinicResult<()> {
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(ClinicError::invalid_input(
                "height_cm",
                self.height_cm.to_string(),
                "Height must be a positive number of centimeters",
            ));
        }
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 {
            return Err(ClinicError::invalid_input(
                "weight_kg",
                self.weight_kg.to_string(),
                "Weight must be a positive number of kilograms",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Result
// ============================================================================

/// Audit block recording how a result was produced, sufficient to display
/// it later without recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiMeta {
    pub methodology: Methodology,
    pub formula: String,
    pub reference_date: NaiveDate,
    pub exact_age_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lms_parameters: Option<LmsEntry>,
    /// BMI at the 95th percentile for this age and sex (2 decimals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi_95th_percentile: Option<f64>,
}

impl BmiMeta {
    fn new(methodology: Methodology, demographics: &DemographicContext) -> Self {
        BmiMeta {
            methodology,
            formula: methodology.formula().to_string(),
            reference_date: demographics.reference_date,
            exact_age_months: demographics.age_months,
            lms_parameters: None,
            bmi_95th_percentile: None,
        }
    }
}

/// Result of a BMI calculation. Immutable once returned.
///
/// ## JSON Example
///
/// ```json
/// {
///   "bmi": 19.1,
///   "zScore": 0.38,
///   "percentile": 64.8,
///   "category": "Healthy Weight",
///   "demographics": { "ageMonths": 126, "isInfant": false, "isPediatric": true, ... },
///   "meta": { "methodology": "CDC LMS 2000 (Pediatric)", ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// kg/m², 1 decimal
    pub bmi: f64,

    /// LMS Z-score, 2 decimals (pediatric only)
    #[serde(rename = "zScore", default, skip_serializing_if = "Option::is_none")]
    pub z_score: Option<f64>,

    /// Percentile 0-100, 1 decimal (pediatric only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,

    pub category: BmiCategory,

    pub demographics: DemographicContext,

    pub meta: BmiMeta,
}

impl BmiResult {
    fn ungraded(bmi: f64, category: BmiCategory, methodology: Methodology, demographics: DemographicContext) -> Self {
        BmiResult {
            bmi,
            z_score: None,
            percentile: None,
            category,
            meta: BmiMeta::new(methodology, &demographics),
            demographics,
        }
    }

    /// Evaluation band the result was graded in
    pub fn band(&self) -> AgeBand {
        self.demographics.band()
    }
}

// ============================================================================
// Calculation
// ============================================================================

/// BMI = kg / m², rounded to 1 decimal.
pub fn body_mass_index(height: Centimeters, weight: Kilograms) -> f64 {
    round_to(weight.per_square(Meters::from(height)), 1)
}

/// Compute and grade BMI.
///
/// Returns `None` when height or weight is not positive. `lms` is the
/// pediatric reference table; without it, pediatric patients of known sex
/// degrade to [`BmiCategory::Unknown`].
pub fn compute_bmi(
    height_cm: f64,
    weight_kg: f64,
    birth_date: Option<NaiveDate>,
    sex: Option<Sex>,
    reference_date: NaiveDate,
    lms: Option<&LmsTable>,
) -> Option<BmiResult> {
    if !(height_cm > 0.0 && weight_kg > 0.0) {
        return None;
    }

    let bmi = body_mass_index(Centimeters(height_cm), Kilograms(weight_kg));
    let demographics = resolve_optional(birth_date, reference_date);

    if demographics.is_infant() {
        return Some(BmiResult::ungraded(
            bmi,
            BmiCategory::NotApplicableInfant,
            Methodology::NoneInfant,
            demographics,
        ));
    }

    let sex = match sex {
        Some(sex) if !demographics.is_adult() => sex,
        _ => {
            return Some(BmiResult::ungraded(
                bmi,
                BmiCategory::from_adult_bmi(bmi),
                Methodology::WhoAdult,
                demographics,
            ));
        }
    };

    Some(grade_pediatric(bmi, sex, demographics, lms))
}

/// Run [`compute_bmi`] for a structured input against a reference set.
pub fn calculate(input: &BmiInput, reference: &ReferenceData) -> Option<BmiResult> {
    compute_bmi(
        input.height_cm,
        input.weight_kg,
        input.birth_date,
        input.sex,
        input.reference_date,
        reference.lms.as_ref(),
    )
}

fn grade_pediatric(bmi: f64, sex: Sex, demographics: DemographicContext, lms: Option<&LmsTable>) -> BmiResult {
    let Some(series) = lms.and_then(|table| table.series(sex)) else {
        log::warn!("no LMS series for {}; pediatric BMI left ungraded", sex.table_key());
        return BmiResult::ungraded(bmi, BmiCategory::Unknown, Methodology::FailedSexTable, demographics);
    };

    let Some(matched) = series.nearest(f64::from(demographics.age_months)) else {
        log::warn!("LMS lookup failed for {} at {} months", sex.table_key(), demographics.age_months);
        return BmiResult::ungraded(bmi, BmiCategory::LookupFailed, Methodology::FailedLmsLookup, demographics);
    };
    log::debug!(
        "LMS row {} months used for age {} months",
        matched.age_months,
        demographics.age_months
    );

    let lms = matched.entry;
    let z_score = lms.z_score(bmi);
    let percentile = standard_normal_cdf(z_score) * 100.0;
    let bmi_95th = lms.value_at_95th();

    let mut meta = BmiMeta::new(Methodology::CdcLms, &demographics);
    meta.lms_parameters = Some(lms);
    meta.bmi_95th_percentile = Some(round_to(bmi_95th, 2));

    BmiResult {
        bmi,
        z_score: Some(round_to(z_score, 2)),
        percentile: Some(round_to(percentile, 1)),
        category: BmiCategory::from_percentile(percentile, bmi, bmi_95th),
        demographics,
        meta,
    }
}
