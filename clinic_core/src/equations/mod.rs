//! # Clinical Equations
//!
//! The numeric primitives shared by the calculation engines.
//!
//! ## Modules
//!
//! - [`normal`] - Standard normal CDF (Abramowitz & Stegun approximation)
//! - [`lms`] - LMS Z-score and its inverse
//! - [`interpolation`] - Two-point linear interpolation
//! - [`registry`] - Formula metadata quoted in result audit blocks

pub mod interpolation;
pub mod lms;
pub mod normal;
pub mod registry;

pub use interpolation::linear_interpolate;
pub use lms::{LmsEntry, Z_95TH};
pub use normal::standard_normal_cdf;
pub use registry::{generate_equations_markdown, Equation, EquationMetadata, Reference};
