//! Linear interpolation between two tabulated points.

/// Interpolate y at `x` on the line through `(x1, y1)` and `(x2, y2)`.
///
/// Returns `y1` when the two abscissae coincide. Values of `x` outside
/// `[x1, x2]` extrapolate along the same line.
///
/// ```rust
/// use clinic_core::equations::linear_interpolate;
///
/// assert_eq!(linear_interpolate(11.0, (10.0, 1.20), (12.0, 1.10)), 1.15);
/// ```
pub fn linear_interpolate(x: f64, (x1, y1): (f64, f64), (x2, y2): (f64, f64)) -> f64 {
    if x2 == x1 {
        return y1;
    }
    y1 + (x - x1) * ((y2 - y1) / (x2 - x1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_endpoints() {
        assert_eq!(linear_interpolate(2.0, (2.0, 5.0), (4.0, 9.0)), 5.0);
        assert_relative_eq!(linear_interpolate(4.0, (2.0, 5.0), (4.0, 9.0)), 9.0);
    }

    #[test]
    fn test_quarter_point() {
        assert_relative_eq!(linear_interpolate(2.5, (2.0, 5.0), (4.0, 9.0)), 6.0);
    }

    #[test]
    fn test_degenerate_bracket() {
        assert_eq!(linear_interpolate(3.0, (3.0, 1.4), (3.0, 1.2)), 1.4);
    }

    #[test]
    fn test_extrapolates_below() {
        assert_relative_eq!(linear_interpolate(0.0, (1.0, 2.0), (2.0, 1.5)), 2.5);
    }
}
