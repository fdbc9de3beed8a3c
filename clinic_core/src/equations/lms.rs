//! LMS (Lambda-Mu-Sigma) growth reference transforms.
//!
//! For a measurement X with reference parameters (L, M, S):
//!
//! ```text
//! Z = ((X / M)^L - 1) / (L · S)        L ≠ 0
//! Z = ln(X / M) / S                    L = 0
//!
//! X(z) = M · (1 + L · S · z)^(1 / L)   L ≠ 0
//! X(z) = M · exp(S · z)                L = 0
//! ```

use serde::{Deserialize, Serialize};

/// Z-score of the 95th percentile, as used by the CDC severe-obesity rule
pub const Z_95TH: f64 = 1.64485;

/// Below this |L| the Box-Cox limit (log form) is used
const L_EPSILON: f64 = 1e-12;

/// One (L, M, S) reference triplet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LmsEntry {
    /// Box-Cox power
    pub l: f64,
    /// Median
    pub m: f64,
    /// Coefficient of variation
    pub s: f64,
}

impl LmsEntry {
    pub const fn new(l: f64, m: f64, s: f64) -> Self {
        LmsEntry { l, m, s }
    }

    /// Z-score of a measurement against this reference point.
    ///
    /// ```rust
    /// use clinic_core::equations::LmsEntry;
    ///
    /// let lms = LmsEntry::new(1.0, 16.0, 0.1);
    /// assert_eq!(lms.z_score(16.0), 0.0);
    /// ```
    pub fn z_score(&self, value: f64) -> f64 {
        if self.l.abs() < L_EPSILON {
            (value / self.m).ln() / self.s
        } else {
            ((value / self.m).powf(self.l) - 1.0) / (self.l * self.s)
        }
    }

    /// Measurement value that sits at a given Z-score.
    pub fn value_at_z(&self, z: f64) -> f64 {
        if self.l.abs() < L_EPSILON {
            self.m * (self.s * z).exp()
        } else {
            self.m * (1.0 + self.l * self.s * z).powf(1.0 / self.l)
        }
    }

    /// Measurement value at the 95th percentile
    pub fn value_at_95th(&self) -> f64 {
        self.value_at_z(Z_95TH)
    }
}

impl From<[f64; 3]> for LmsEntry {
    fn from([l, m, s]: [f64; 3]) -> Self {
        LmsEntry { l, m, s }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_median_is_zero() {
        let lms = LmsEntry::new(-2.01118, 16.5757, 0.080592);
        assert_relative_eq!(lms.z_score(16.5757), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_case() {
        // L = 1 reduces to (X - M) / (M · S)
        let lms = LmsEntry::new(1.0, 16.0, 0.1);
        assert_relative_eq!(lms.z_score(17.6), 1.0, epsilon = 1e-12);
        assert_relative_eq!(lms.value_at_z(-1.0), 14.4, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let lms = LmsEntry::new(-1.6, 17.2, 0.12);
        for z in [-2.0, -0.5, 0.0, 1.0, 1.64485, 2.5] {
            let x = lms.value_at_z(z);
            assert_relative_eq!(lms.z_score(x), z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_lambda_uses_log_form() {
        let lms = LmsEntry::new(0.0, 20.0, 0.1);
        let x = 20.0 * (0.1f64).exp();
        assert_relative_eq!(lms.z_score(x), 1.0, epsilon = 1e-12);
        assert_relative_eq!(lms.value_at_z(1.0), x, epsilon = 1e-12);
    }

    #[test]
    fn test_95th_threshold() {
        let lms = LmsEntry::new(1.0, 16.0, 0.1);
        // 16 · (1 + 0.164485)
        assert_relative_eq!(lms.value_at_95th(), 18.63176, epsilon = 1e-9);
    }

    #[test]
    fn test_from_array() {
        let lms: LmsEntry = [1.0, 2.0, 3.0].into();
        assert_eq!(lms, LmsEntry::new(1.0, 2.0, 3.0));
    }
}
