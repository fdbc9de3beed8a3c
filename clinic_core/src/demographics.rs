//! # Demographics
//!
//! Age resolution and the age bands that select an evaluation mode.
//!
//! Age is counted in whole completed months between a birth date and a
//! reference date (usually the encounter date, not "today"):
//!
//! ```text
//! months = (ref_year - birth_year) * 12 + (ref_month - birth_month)
//! months -= 1 if ref_day < birth_day
//! ```
//!
//! A reference date before the birth date clamps to zero (newborn).
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use clinic_core::demographics::{resolve_demographics, AgeBand};
//!
//! let birth = NaiveDate::from_ymd_opt(2015, 6, 20).unwrap();
//! let visit = NaiveDate::from_ymd_opt(2025, 6, 19).unwrap();
//!
//! let ctx = resolve_demographics(birth, visit);
//! assert_eq!(ctx.age_months, 119);
//! assert_eq!(ctx.band(), AgeBand::Pediatric);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::ClinicError;

/// Upper bound (exclusive) of the infant band, in months
pub const INFANT_MAX_MONTHS: u32 = 24;

/// Upper bound (exclusive) of the pediatric band, in months (20 years)
pub const PEDIATRIC_MAX_MONTHS: u32 = 240;

// ============================================================================
// Sex
// ============================================================================

/// Biological sex as used by the binary reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Both sexes, in table order
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    /// Parse free text leniently.
    ///
    /// Anything starting with `m`/`M` is male, any other non-blank text is
    /// female. Blank text is unknown.
    pub fn parse_lenient(text: &str) -> Option<Sex> {
        let trimmed = text.trim();
        let first = trimmed.chars().next()?;
        if first.eq_ignore_ascii_case(&'m') {
            Some(Sex::Male)
        } else {
            Some(Sex::Female)
        }
    }

    /// Display label ("Male" / "Female")
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }

    /// Lowercase key used in reference data files ("male" / "female")
    pub fn table_key(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sex {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sex::parse_lenient(s).ok_or_else(|| ClinicError::invalid_input("sex", s, "Sex must not be blank"))
    }
}

// ============================================================================
// Age bands
// ============================================================================

/// Evaluation band selected from age in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBand {
    /// Under 24 months
    Infant,
    /// 24 to 239 months
    Pediatric,
    /// 240 months and over
    Adult,
}

impl AgeBand {
    /// Classify an age in whole months
    pub fn from_months(age_months: u32) -> Self {
        if age_months < INFANT_MAX_MONTHS {
            AgeBand::Infant
        } else if age_months < PEDIATRIC_MAX_MONTHS {
            AgeBand::Pediatric
        } else {
            AgeBand::Adult
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Infant => "Infant (<2y)",
            AgeBand::Pediatric => "Pediatric (WHO/CDC)",
            AgeBand::Adult => "Adult Standard",
        }
    }
}

// ============================================================================
// Demographic context
// ============================================================================

/// Age facts for one calculation, relative to a reference date.
///
/// Exactly one of `is_infant` / `is_pediatric` / `is_adult` is true: all
/// three derive from a single [`AgeBand`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "DemographicRecord", from = "DemographicRecord")]
pub struct DemographicContext {
    /// Whole completed months between birth and the reference date
    pub age_months: u32,

    /// Date the age was measured against
    pub reference_date: NaiveDate,

    band: AgeBand,
}

impl DemographicContext {
    /// Build a context for a known age in months
    pub fn from_age_months(age_months: u32, reference_date: NaiveDate) -> Self {
        DemographicContext {
            age_months,
            reference_date,
            band: AgeBand::from_months(age_months),
        }
    }

    /// Context used when no birth date is known: graded as an adult with
    /// an age of zero months.
    pub fn unknown_age(reference_date: NaiveDate) -> Self {
        DemographicContext {
            age_months: 0,
            reference_date,
            band: AgeBand::Adult,
        }
    }

    pub fn band(&self) -> AgeBand {
        self.band
    }

    pub fn is_infant(&self) -> bool {
        self.band == AgeBand::Infant
    }

    pub fn is_pediatric(&self) -> bool {
        self.band == AgeBand::Pediatric
    }

    pub fn is_adult(&self) -> bool {
        self.band == AgeBand::Adult
    }

    pub fn label(&self) -> &'static str {
        self.band.label()
    }

    /// Chronological age in fractional years (months / 12)
    pub fn age_years(&self) -> f64 {
        f64::from(self.age_months) / 12.0
    }
}

/// Stored shape of a [`DemographicContext`]: the booleans and label are
/// written out for display, the band is re-derived on read. Field names
/// match previously stored payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DemographicRecord {
    age_months: u32,
    is_infant: bool,
    is_pediatric: bool,
    is_adult: bool,
    label: String,
    reference_date: NaiveDate,
}

impl From<DemographicContext> for DemographicRecord {
    fn from(ctx: DemographicContext) -> Self {
        DemographicRecord {
            age_months: ctx.age_months,
            is_infant: ctx.is_infant(),
            is_pediatric: ctx.is_pediatric(),
            is_adult: ctx.is_adult(),
            label: ctx.label().to_string(),
            reference_date: ctx.reference_date,
        }
    }
}

impl From<DemographicRecord> for DemographicContext {
    fn from(record: DemographicRecord) -> Self {
        // An unknown-age context is stored as 0 months flagged adult
        let band = if record.is_adult {
            AgeBand::Adult
        } else {
            AgeBand::from_months(record.age_months)
        };
        DemographicContext {
            age_months: record.age_months,
            reference_date: record.reference_date,
            band,
        }
    }
}

// ============================================================================
// Age resolution
// ============================================================================

/// Whole months elapsed from `birth` to `reference`, clamped at zero.
///
/// Truncates to the last completed month boundary; there is no leap-year
/// handling beyond the day-of-month comparison.
pub fn months_between(birth: NaiveDate, reference: NaiveDate) -> u32 {
    let mut months = (reference.year() - birth.year()) * 12
        + (reference.month() as i32 - birth.month() as i32);
    if reference.day() < birth.day() {
        months -= 1;
    }
    months.max(0) as u32
}

/// Chronological age in fractional years, from whole months.
pub fn age_in_years(birth: NaiveDate, reference: NaiveDate) -> f64 {
    f64::from(months_between(birth, reference)) / 12.0
}

/// Resolve the demographic context for a birth date at a reference date.
pub fn resolve_demographics(birth: NaiveDate, reference: NaiveDate) -> DemographicContext {
    let ctx = DemographicContext::from_age_months(months_between(birth, reference), reference);
    log::debug!(
        "resolved age {} months ({}) at {}",
        ctx.age_months,
        ctx.label(),
        reference
    );
    ctx
}

/// Resolve the context when the birth date may be unknown.
pub fn resolve_optional(birth: Option<NaiveDate>, reference: NaiveDate) -> DemographicContext {
    match birth {
        Some(birth) => resolve_demographics(birth, reference),
        None => DemographicContext::unknown_age(reference),
    }
}
