//! # Clinical Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - a pure function returning `Option<*Result>`; `None` means the inputs
//!   are not yet computable
//!
//! ## Available Calculations
//!
//! - [`bmi`] - Body mass index with WHO adult / CDC pediatric grading
//! - [`paley`] - Adult height prediction by the Paley multiplier method

pub mod bmi;
pub mod paley;

use serde::{Deserialize, Serialize};

pub use bmi::{compute_bmi, BmiCategory, BmiInput, BmiMeta, BmiResult, Methodology};
pub use paley::{compute_height_prediction, PaleyInput, PaleyResult};

/// A completed calculation: the inputs as entered and the result as
/// computed, stored together.
///
/// Stored results are historical facts. They are never recomputed on read,
/// even if the reference tables have since changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculation_type", rename_all = "snake_case")]
pub enum CalculationRecord {
    Bmi {
        inputs: BmiInput,
        results: BmiResult,
    },
    PaleyHeight {
        inputs: PaleyInput,
        results: PaleyResult,
    },
}

impl CalculationRecord {
    /// Tag stored in `calculation_type`
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationRecord::Bmi { .. } => "bmi",
            CalculationRecord::PaleyHeight { .. } => "paley_height",
        }
    }

    /// Display name of the calculation
    pub fn label(&self) -> &'static str {
        match self {
            CalculationRecord::Bmi { .. } => "Body Mass Index",
            CalculationRecord::PaleyHeight { .. } => "Predicted Adult Height",
        }
    }

    /// Headline value with its interpretation, e.g. `24.2 (Healthy Weight)`
    pub fn headline(&self) -> String {
        match self {
            CalculationRecord::Bmi { results, .. } => {
                format!("{:.1} ({})", results.bmi, results.category)
            }
            CalculationRecord::PaleyHeight { results, .. } => {
                let source = if results.is_bone_age { "bone age" } else { "age" };
                format!(
                    "{:.1} cm (+{:.1} cm, {} {:.2})",
                    results.predicted_height_cm, results.growth_remaining_cm, source, results.age_used
                )
            }
        }
    }
}
