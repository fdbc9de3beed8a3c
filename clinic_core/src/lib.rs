//! # clinic_core - Clinical Calculation Engine
//!
//! `clinic_core` provides the pediatric and adult growth calculations used
//! at the point of care: BMI with age-appropriate grading, adult height
//! prediction, national identification number decoding and age resolution.
//! All inputs and outputs are JSON-serializable so results can be stored
//! verbatim as historical records.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Engines are pure functions over immutable reference data
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Degrade, don't fail**: Missing inputs give no result; sparse reference
//!   data gives a visibly labelled fallback; invalid ids are data, not errors
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use clinic_core::{compute_bmi, validate_national_id};
//!
//! let decoded = validate_national_id("1960315123451");
//! let birth = decoded.birth_date();
//!
//! let visit = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
//! let result = compute_bmi(170.0, 70.0, birth, decoded.sex, visit, None).unwrap();
//! assert_eq!(result.category.label(), "Healthy Weight");
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - BMI and height prediction engines, stored records
//! - [`demographics`] - Age resolution and age bands
//! - [`national_id`] - National identification number validation
//! - [`equations`] - LMS, normal CDF, interpolation and the formula registry
//! - [`reference`] - LMS and height multiplier tables
//! - [`observation`] - Stored calculations with atomic save/load
//! - [`patient`] - Patient demographics auto-population
//! - [`settings`] - Deployment configuration
//! - [`units`] - Unit wrappers and display formatting
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod demographics;
pub mod equations;
pub mod errors;
pub mod national_id;
pub mod observation;
pub mod patient;
pub mod reference;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{compute_bmi, compute_height_prediction, BmiResult, CalculationRecord, PaleyResult};
pub use demographics::{resolve_demographics, DemographicContext, Sex};
pub use errors::{ClinicError, ClinicResult};
pub use national_id::{validate_national_id, NationalIdDecoded};
pub use observation::Observation;
pub use reference::ReferenceData;
pub use settings::Settings;
pub use units::format_imperial_height;
