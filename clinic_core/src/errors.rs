//! # Error Types
//!
//! Structured error types for clinic_core. The calculation engines never
//! return these for ordinary clinical inputs: a non-computable input yields
//! `None`, a malformed national ID yields an invalid decode, and sparse
//! reference data yields a labelled fallback category. `ClinicError` covers
//! the loaders and explicit input validation around the engines.
//!
//! ## Example
//!
//! ```rust
//! use clinic_core::errors::{ClinicError, ClinicResult};
//!
//! fn validate_height(height_cm: f64) -> ClinicResult<()> {
//!     if height_cm <= 0.0 {
//!         return Err(ClinicError::InvalidInput {
//!             field: "height_cm".to_string(),
//!             value: height_cm.to_string(),
//!             reason: "Height must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for clinic_core operations
pub type ClinicResult<T> = Result<T, ClinicError>;

/// Structured error type for loaders and input validation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ClinicError {
    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A reference table is malformed (unsorted, empty, bad key)
    #[error("Reference data error in {table}: {reason}")]
    ReferenceData { table: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Stored record schema version mismatch
    #[error("Version mismatch: record version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl ClinicError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ClinicError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        ClinicError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ReferenceData error
    pub fn reference_data(table: impl Into<String>, reason: impl Into<String>) -> Self {
        ClinicError::ReferenceData {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ClinicError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        ClinicError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if the caller can recover by correcting input and retrying
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClinicError::InvalidInput { .. } | ClinicError::MissingField { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ClinicError::InvalidInput { .. } => "INVALID_INPUT",
            ClinicError::MissingField { .. } => "MISSING_FIELD",
            ClinicError::ReferenceData { .. } => "REFERENCE_DATA",
            ClinicError::FileError { .. } => "FILE_ERROR",
            ClinicError::SerializationError { .. } => "SERIALIZATION_ERROR",
            ClinicError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for ClinicError {
    fn from(err: serde_json::Error) -> Self {
        ClinicError::serialization(err.to_string())
    }
}
