//! Standard normal cumulative distribution.
//!
//! Uses the Abramowitz & Stegun 26.2.17 polynomial approximation
//! (absolute error below 7.5e-8). Stored percentiles were produced with
//! exactly these coefficients, so a more accurate CDF would make new
//! results disagree with historical ones.

/// Coefficient of |x| in the rational term `t = 1 / (1 + P·|x|)`
pub const P: f64 = 0.2316419;

/// 1/sqrt(2π), truncated as in the published approximation
pub const INV_SQRT_2PI: f64 = 0.3989423;

/// Polynomial coefficients b1..b5
pub const B: [f64; 5] = [0.3193815, -0.3565638, 1.781478, -1.821256, 1.330274];

/// Approximate Φ(x), the probability that a standard normal variate is ≤ x.
///
/// ```rust
/// use clinic_core::equations::standard_normal_cdf;
///
/// assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-6);
/// assert!((standard_normal_cdf(1.64485) - 0.95).abs() < 1e-4);
/// ```
pub fn standard_normal_cdf(x: f64) -> f64 {
    let t = 1.0 / (1.0 + P * x.abs());
    let d = INV_SQRT_2PI * (-x * x / 2.0).exp();
    // Horner form of b1·t + b2·t² + ... + b5·t⁵, divided by t
    let poly = B[0] + t * (B[1] + t * (B[2] + t * (B[3] + t * B[4])));
    let tail = d * t * poly;
    if x > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}
