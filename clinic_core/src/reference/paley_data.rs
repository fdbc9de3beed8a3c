//! Bundled Paley multiplier tables (birth to skeletal maturity).
//!
//! Multipliers after Paley et al. (2000) at half-year resolution past the
//! first year. Verify against the publication before clinical use;
//! deployments that maintain their own copy load it through
//! [`HeightMultiplierTable::from_json_str`](super::HeightMultiplierTable::from_json_str)
//! instead.

use super::multipliers::MultiplierRow;

/// Boys: (age in years, multiplier)
pub const PALEY_BOYS: &[MultiplierRow] = &[
    (0.0, 3.535),
    (0.25, 2.908),
    (0.5, 2.639),
    (0.75, 2.462),
    (1.0, 2.337),
    (1.5, 2.158),
    (2.0, 2.031),
    (2.5, 1.939),
    (3.0, 1.862),
    (3.5, 1.793),
    (4.0, 1.733),
    (4.5, 1.680),
    (5.0, 1.631),
    (5.5, 1.586),
    (6.0, 1.545),
    (6.5, 1.506),
    (7.0, 1.470),
    (7.5, 1.434),
    (8.0, 1.400),
    (8.5, 1.368),
    (9.0, 1.337),
    (9.5, 1.307),
    (10.0, 1.277),
    (10.5, 1.248),
    (11.0, 1.220),
    (11.5, 1.193),
    (12.0, 1.165),
    (12.5, 1.135),
    (13.0, 1.104),
    (13.5, 1.074),
    (14.0, 1.048),
    (14.5, 1.029),
    (15.0, 1.016),
    (15.5, 1.008),
    (16.0, 1.004),
    (16.5, 1.002),
    (17.0, 1.001),
    (17.5, 1.000),
    (18.0, 1.000),
];

/// Girls: (age in years, multiplier)
pub const PALEY_GIRLS: &[MultiplierRow] = &[
    (0.0, 3.290),
    (0.25, 2.690),
    (0.5, 2.447),
    (0.75, 2.283),
    (1.0, 2.162),
    (1.5, 1.999),
    (2.0, 1.890),
    (2.5, 1.810),
    (3.0, 1.740),
    (3.5, 1.676),
    (4.0, 1.617),
    (4.5, 1.564),
    (5.0, 1.515),
    (5.5, 1.470),
    (6.0, 1.428),
    (6.5, 1.389),
    (7.0, 1.352),
    (7.5, 1.316),
    (8.0, 1.282),
    (8.5, 1.249),
    (9.0, 1.216),
    (9.5, 1.183),
    (10.0, 1.150),
    (10.5, 1.118),
    (11.0, 1.087),
    (11.5, 1.060),
    (12.0, 1.038),
    (12.5, 1.023),
    (13.0, 1.013),
    (13.5, 1.007),
    (14.0, 1.004),
    (14.5, 1.002),
    (15.0, 1.001),
    (15.5, 1.000),
    (16.0, 1.000),
];
