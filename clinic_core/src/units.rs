//! # Unit Types
//!
//! Type-safe wrappers for clinical measurement units. These provide
//! compile-time safety against unit confusion while remaining lightweight
//! (just f64 wrappers that serialize as bare numbers).
//!
//! ## Metric Units (Primary)
//!
//! All engines work in metric internally:
//! - Length: centimeters (cm), meters (m)
//! - Mass: kilograms (kg)
//!
//! Imperial output exists for display only, see [`format_imperial_height`].
//!
//! ## Example
//!
//! ```rust
//! use clinic_core::units::{Centimeters, Meters};
//!
//! let height = Centimeters(170.0);
//! let height_m: Meters = height.into();
//! assert_eq!(height_m.0, 1.7);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Mul, Sub};

/// Centimeters per inch (exact by definition)
pub const CM_PER_INCH: f64 = 2.54;

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

impl From<Centimeters> for Inches {
    fn from(cm: Centimeters) -> Self {
        Inches(cm.0 / CM_PER_INCH)
    }
}

impl From<Inches> for Centimeters {
    fn from(inches: Inches) -> Self {
        Centimeters(inches.0 * CM_PER_INCH)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

// ============================================================================
// Arithmetic
// ============================================================================

/// Height difference, e.g. growth remaining
impl Sub for Centimeters {
    type Output = Centimeters;
    fn sub(self, rhs: Centimeters) -> Centimeters {
        Centimeters(self.0 - rhs.0)
    }
}

/// Height scaled by a dimensionless multiplier
impl Mul<f64> for Centimeters {
    type Output = Centimeters;
    fn mul(self, rhs: f64) -> Centimeters {
        Centimeters(self.0 * rhs)
    }
}

impl Meters {
    /// Area of a square with this side, in m²
    pub fn squared(self) -> f64 {
        self.0 * self.0
    }
}

impl Kilograms {
    /// Mass per unit area, in kg/m²
    pub fn per_square(self, side: Meters) -> f64 {
        self.0 / side.squared()
    }
}

// ============================================================================
// Precision
// ============================================================================

/// Round to a fixed number of decimal places (half away from zero).
///
/// Stored results keep fixed precision: BMI and heights at 1 decimal,
/// Z-scores at 2, multipliers at 4.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// Imperial Display
// ============================================================================

/// A height split into whole feet and rounded inches, for display.
///
/// `inches` is rounded independently of `feet`, so values just below a
/// foot boundary render as `12` inches (e.g. 182.5 cm is `5' 12"`).
/// Display-only; nothing clinical reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImperialHeight {
    pub feet: u32,
    pub inches: u32,
}

impl ImperialHeight {
    /// Split a centimeter value into feet and inches.
    pub fn from_cm(cm: f64) -> Self {
        let total_inches = Inches::from(Centimeters(cm)).0.max(0.0);
        ImperialHeight {
            feet: (total_inches / 12.0).floor() as u32,
            inches: (total_inches % 12.0).round() as u32,
        }
    }
}

impl fmt::Display for ImperialHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}' {}\"", self.feet, self.inches)
    }
}

/// Format a centimeter height as feet and inches, e.g. `6' 0"`.
///
/// ```rust
/// use clinic_core::units::format_imperial_height;
///
/// assert_eq!(format_imperial_height(182.88), "6' 0\"");
/// ```
pub fn format_imperial_height(cm: f64) -> String {
    ImperialHeight::from_cm(cm).to_string()
}
