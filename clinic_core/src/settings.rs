//! # Settings
//!
//! Deployment configuration: where to find reference tables and how to
//! present results. Settings serialize to JSON; every field has a default,
//! so an empty object (or no file at all) is a valid configuration.
//!
//! ## Example
//!
//! ```rust
//! use clinic_core::settings::Settings;
//!
//! let settings: Settings = serde_json::from_str(r#"{
//!     "reference": { "lms_table_path": "/etc/clinic/cdc_bmi_lms.json" }
//! }"#).unwrap();
//!
//! assert!(settings.reference.lms_table_path.is_some());
//! assert!(settings.reference.multiplier_table_path.is_none());
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ClinicResult;
use crate::reference::read_to_string;

/// Environment variable overriding [`ReferenceSettings::lms_table_path`]
pub const ENV_LMS_TABLE: &str = "CLINIC_LMS_TABLE";

/// Environment variable overriding [`ReferenceSettings::multiplier_table_path`]
pub const ENV_MULTIPLIER_TABLE: &str = "CLINIC_MULTIPLIER_TABLE";

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Reference table locations
    pub reference: ReferenceSettings,

    /// Presentation preferences
    pub display: DisplaySettings,
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> ClinicResult<Self> {
        let json = read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(path) = non_blank(ENV_LMS_TABLE) {
            self.reference.lms_table_path = Some(PathBuf::from(path));
        }
        if let Some(path) = non_blank(ENV_MULTIPLIER_TABLE) {
            self.reference.multiplier_table_path = Some(PathBuf::from(path));
        }
        self
    }
}

/// Reference table locations. Unset paths use bundled data where it exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceSettings {
    /// CDC BMI-for-age LMS parameters (JSON)
    pub lms_table_path: Option<PathBuf>,

    /// Height multiplier table (JSON); bundled Paley tables when unset
    pub multiplier_table_path: Option<PathBuf>,
}

/// Presentation preferences for front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Also show heights in feet and inches
    pub imperial_heights: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            imperial_heights: true,
        }
    }
}
