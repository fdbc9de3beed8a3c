//! # Equation Registry
//!
//! Central registry of the clinical formulas used by the engines, with a
//! citation for each. Result metadata quotes the plain-text formula so a
//! stored result can be audited later without recomputation.
//!
//! ## Usage
//!
//! ```rust
//! use clinic_core::equations::registry::Equation;
//!
//! let meta = Equation::LmsZScore.metadata();
//! assert_eq!(meta.formula_plain, "Z = ((BMI/M)^L - 1) / (L * S)");
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// References
// ============================================================================

/// Published source of a formula or reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reference {
    /// WHO adult BMI classification (TRS 894, 2000)
    WhoAdult,
    /// CDC 2000 growth charts, BMI-for-age LMS parameters
    Cdc2000,
    /// Abramowitz & Stegun, Handbook of Mathematical Functions, 26.2.17
    AbramowitzStegun,
    /// Paley et al., "The multiplier method for prediction of adult height", 2000
    Paley2000,
    /// Fundamental arithmetic, no citation required
    Arithmetic,
}

impl Reference {
    /// Format the reference for display
    pub fn citation(&self) -> &'static str {
        match self {
            Reference::WhoAdult => "WHO Technical Report Series 894 (2000)",
            Reference::Cdc2000 => "CDC 2000 Growth Charts (BMI-for-age LMS)",
            Reference::AbramowitzStegun => "Abramowitz & Stegun 26.2.17",
            Reference::Paley2000 => "Paley et al., J Pediatr Orthop 2000;20:1-10",
            Reference::Arithmetic => "Arithmetic",
        }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Metadata describing one formula.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name
    pub name: &'static str,
    /// The formula in plain text, as quoted in result metadata
    pub formula_plain: &'static str,
    /// Source of the formula
    pub reference: Reference,
    /// Function implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// Every formula the engines evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equation {
    /// BMI = kg / m²
    BodyMassIndex,
    /// Z = ((X/M)^L - 1) / (L·S)
    LmsZScore,
    /// X = M·(1 + L·S·Z)^(1/L)
    LmsInverse,
    /// Φ(z) polynomial approximation
    NormalCdf,
    /// Two-point linear interpolation
    LinearInterpolation,
    /// Adult height = current height × multiplier
    PaleyPrediction,
}

impl Equation {
    /// All equations, in the order an audit trail lists them
    pub const ALL: [Equation; 6] = [
        Equation::BodyMassIndex,
        Equation::LmsZScore,
        Equation::LmsInverse,
        Equation::NormalCdf,
        Equation::LinearInterpolation,
        Equation::PaleyPrediction,
    ];

    /// Full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::BodyMassIndex => EquationMetadata {
                name: "Body Mass Index",
                formula_plain: "Weight / Height²",
                reference: Reference::WhoAdult,
                source_function: "calculations::bmi::compute_bmi",
            },
            Equation::LmsZScore => EquationMetadata {
                name: "LMS Z-Score",
                formula_plain: "Z = ((BMI/M)^L - 1) / (L * S)",
                reference: Reference::Cdc2000,
                source_function: "equations::lms::LmsEntry::z_score",
            },
            Equation::LmsInverse => EquationMetadata {
                name: "LMS Value at Z",
                formula_plain: "X = M * (1 + L * S * Z)^(1/L)",
                reference: Reference::Cdc2000,
                source_function: "equations::lms::LmsEntry::value_at_z",
            },
            Equation::NormalCdf => EquationMetadata {
                name: "Standard Normal CDF",
                formula_plain: "P = 1 - d·t·(b1 + b2·t + b3·t² + b4·t³ + b5·t⁴), t = 1/(1 + 0.2316419·|z|)",
                reference: Reference::AbramowitzStegun,
                source_function: "equations::normal::standard_normal_cdf",
            },
            Equation::LinearInterpolation => EquationMetadata {
                name: "Linear Interpolation",
                formula_plain: "y = y1 + (x - x1) * (y2 - y1) / (x2 - x1)",
                reference: Reference::Arithmetic,
                source_function: "equations::interpolation::linear_interpolate",
            },
            Equation::PaleyPrediction => EquationMetadata {
                name: "Paley Multiplier Prediction",
                formula_plain: "Predicted Height = Current Height * Multiplier",
                reference: Reference::Paley2000,
                source_function: "calculations::paley::compute_height_prediction",
            },
        }
    }

    /// Plain-text formula shortcut
    pub fn formula(&self) -> &'static str {
        self.metadata().formula_plain
    }
}

/// Generate a markdown listing of every equation with its citation.
pub fn generate_equations_markdown() -> String {
    let mut md = String::from("# Clinical Equations\n\n");
    md.push_str("| Equation | Formula | Reference | Implementation |\n");
    md.push_str("|---|---|---|---|\n");
    for eq in Equation::ALL {
        let meta = eq.metadata();
        md.push_str(&format!(
            "| {} | `{}` | {} | `{}` |\n",
            meta.name,
            meta.formula_plain,
            meta.reference.citation(),
            meta.source_function
        ));
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equations_have_metadata() {
        for eq in Equation::ALL {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty());
            assert!(!meta.formula_plain.is_empty());
        }
    }

    #[test]
    fn test_bmi_formula_text() {
        assert_eq!(Equation::BodyMassIndex.formula(), "Weight / Height²");
    }

    #[test]
    fn test_markdown_lists_every_equation() {
        let md = generate_equations_markdown();
        for eq in Equation::ALL {
            assert!(md.contains(eq.metadata().name));
        }
        assert!(md.contains("Abramowitz & Stegun"));
    }
}
