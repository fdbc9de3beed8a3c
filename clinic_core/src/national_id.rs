//! # National Identifier (CNP)
//!
//! Validates a 13-digit personal numeric code and decodes the demographics
//! it carries.
//!
//! ## Layout
//!
//! ```text
//! S AA LL ZZ JJ NNN C
//! │ │  │  │  │  │   └─ control digit
//! │ │  │  │  │  └───── sequence number
//! │ │  │  │  └──────── region (county) code
//! │ │  │  └─────────── day of birth
//! │ │  └────────────── month of birth
//! │ └───────────────── two-digit year of birth
//! └─────────────────── century + sex code
//! ```
//!
//! Validation is deliberately shallow: month and day are range-checked but
//! not cross-checked against month length, so a code can be valid while
//! naming a date that does not exist (see [`NationalIdDecoded::birth_date`]).
//!
//! ## Example
//!
//! ```rust
//! use clinic_core::national_id::validate_national_id;
//! use clinic_core::demographics::Sex;
//!
//! let decoded = validate_national_id("1960315123451");
//! assert!(decoded.is_valid);
//! assert_eq!(decoded.sex, Some(Sex::Male));
//! assert_eq!(decoded.date_of_birth.as_deref(), Some("1996-03-15"));
//! assert_eq!(decoded.region.as_deref(), Some("Cluj"));
//! ```

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::demographics::Sex;

/// Number of digits in a national identifier
pub const ID_LENGTH: usize = 13;

/// Weights applied to the first 12 digits for the control digit
pub const CONTROL_WEIGHTS: [u32; 12] = [2, 7, 9, 1, 4, 6, 3, 5, 8, 2, 7, 9];

/// Region name for codes missing from [`REGIONS`]
pub const UNKNOWN_REGION: &str = "Unknown/Other";

/// Region (county) codes and names
pub const REGIONS: &[(&str, &str)] = &[
    ("01", "Alba"),
    ("02", "Arad"),
    ("03", "Argeș"),
    ("04", "Bacău"),
    ("05", "Bihor"),
    ("06", "Bistrița-Năsăud"),
    ("07", "Botoșani"),
    ("08", "Brașov"),
    ("09", "Brăila"),
    ("10", "Buzău"),
    ("11", "Caraș-Severin"),
    ("12", "Cluj"),
    ("13", "Constanța"),
    ("14", "Covasna"),
    ("15", "Dâmbovița"),
    ("16", "Dolj"),
    ("17", "Galați"),
    ("18", "Gorj"),
    ("19", "Harghita"),
    ("20", "Hunedoara"),
    ("21", "Ialomița"),
    ("22", "Iași"),
    ("23", "Ilfov"),
    ("24", "Maramureș"),
    ("25", "Mehedinți"),
    ("26", "Mureș"),
    ("27", "Neamț"),
    ("28", "Olt"),
    ("29", "Prahova"),
    ("30", "Satu Mare"),
    ("31", "Sălaj"),
    ("32", "Sibiu"),
    ("33", "Suceava"),
    ("34", "Teleorman"),
    ("35", "Timiș"),
    ("36", "Tulcea"),
    ("37", "Vaslui"),
    ("38", "Vâlcea"),
    ("39", "Vrancea"),
    ("40", "București"),
    ("41", "București - Sector 1"),
    ("42", "București - Sector 2"),
    ("43", "București - Sector 3"),
    ("44", "București - Sector 4"),
    ("45", "București - Sector 5"),
    ("46", "București - Sector 6"),
    ("51", "Călărași"),
    ("52", "Giurgiu"),
    ("70", "Rezident/Evidență Specială"),
];

/// Region name for a two-digit code, or [`UNKNOWN_REGION`].
pub fn region_name(code: &str) -> &'static str {
    REGIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(UNKNOWN_REGION, |(_, name)| name)
}

/// Region names in alphabetical order for pick-lists, without duplicates.
///
/// Romanian letters sort with their base letter (`Sălaj` before `Satu Mare`);
/// the exact spelling only breaks ties.
pub fn region_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGIONS.iter().map(|(_, name)| *name).collect();
    names.sort_by_cached_key(|name| (collation_key(name), *name));
    names.dedup();
    names
}

/// Lowercase `text` with Romanian diacritics folded to their base letters.
fn collation_key(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ă' | 'â' | 'Ă' | 'Â' => 'a',
            'î' | 'Î' => 'i',
            'ș' | 'ş' | 'Ș' | 'Ş' => 's',
            'ț' | 'ţ' | 'Ț' | 'Ţ' => 't',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Why an identifier was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NationalIdRejection {
    /// Not exactly 13 ASCII digits
    Format,
    /// Control digit does not match the weighted checksum
    Checksum,
    /// Month or day out of range
    BirthDate,
    /// Leading digit is not a known century/sex code
    CenturySex,
}

impl NationalIdRejection {
    /// Human-readable reason, suitable for re-prompting the user
    pub fn reason(&self) -> &'static str {
        match self {
            NationalIdRejection::Format => "CNP must be exactly 13 digits.",
            NationalIdRejection::Checksum => "Invalid checksum (control digit mismatch).",
            NationalIdRejection::BirthDate => "Invalid birth date in CNP.",
            NationalIdRejection::CenturySex => "Invalid Gender/Century component.",
        }
    }
}

impl fmt::Display for NationalIdRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Outcome of validating an identifier. Invalid input is a value, not an
/// error: `is_valid` is false and `rejection`/`error` say why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalIdDecoded {
    pub is_valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,

    /// Encoded birth date as `YYYY-MM-DD`, exactly as the digits state it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<NationalIdRejection>,

    /// Reason text for `rejection`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NationalIdDecoded {
    fn rejected(rejection: NationalIdRejection) -> Self {
        log::debug!("national id rejected: {}", rejection.reason());
        NationalIdDecoded {
            is_valid: false,
            sex: None,
            date_of_birth: None,
            region: None,
            rejection: Some(rejection),
            error: Some(rejection.reason().to_string()),
        }
    }

    /// Birth date as a calendar date.
    ///
    /// `None` when invalid, or when the encoded date does not exist on the
    /// calendar (e.g. February 30).
    pub fn birth_date(&self) -> Option<NaiveDate> {
        let text = self.date_of_birth.as_deref()?;
        NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
    }
}

/// Century and sex for the leading digit.
fn century_and_sex(code: u32) -> Option<(i32, Sex)> {
    match code {
        1 => Some((1900, Sex::Male)),
        2 => Some((1900, Sex::Female)),
        3 => Some((1800, Sex::Male)),
        4 => Some((1800, Sex::Female)),
        5 => Some((2000, Sex::Male)),
        6 => Some((2000, Sex::Female)),
        // Foreign residents
        7 => Some((1900, Sex::Male)),
        8 => Some((1900, Sex::Female)),
        _ => None,
    }
}

/// Expected control digit for the first 12 digits.
pub fn control_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip(CONTROL_WEIGHTS.iter())
        .map(|(d, w)| d * w)
        .sum();
    match sum % 11 {
        10 => 1,
        c => c,
    }
}

/// Validate an identifier and decode its demographics.
///
/// Checks run in order: format, checksum, month/day range, century/sex
/// code. The region never fails; unmapped codes decode to
/// [`UNKNOWN_REGION`].
pub fn validate_national_id(id: &str) -> NationalIdDecoded {
    if id.len() != ID_LENGTH || !id.bytes().all(|b| b.is_ascii_digit()) {
        return NationalIdDecoded::rejected(NationalIdRejection::Format);
    }
    let digits: Vec<u32> = id.bytes().map(|b| u32::from(b - b'0')).collect();

    if control_digit(&digits[..12]) != digits[12] {
        return NationalIdDecoded::rejected(NationalIdRejection::Checksum);
    }

    let two_digit = |i: usize| digits[i] * 10 + digits[i + 1];
    let year = two_digit(1);
    let month = two_digit(3);
    let day = two_digit(5);
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return NationalIdDecoded::rejected(NationalIdRejection::BirthDate);
    }

    let Some((century, sex)) = century_and_sex(digits[0]) else {
        return NationalIdDecoded::rejected(NationalIdRejection::CenturySex);
    };

    let region = region_name(&id[7..9]);
    let full_year = century + year as i32;

    NationalIdDecoded {
        is_valid: true,
        sex: Some(sex),
        date_of_birth: Some(format!("{:04}-{:02}-{:02}", full_year, month, day)),
        region: Some(region.to_string()),
        rejection: None,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_male_1996() {
        let d = validate_national_id("1960315123451");
        assert!(d.is_valid);
        assert_eq!(d.sex, Some(Sex::Male));
        assert_eq!(d.date_of_birth.as_deref(), Some("1996-03-15"));
        assert_eq!(d.birth_date(), NaiveDate::from_ymd_opt(1996, 3, 15));
        assert_eq!(d.region.as_deref(), Some("Cluj"));
        assert!(d.error.is_none());
    }

    #[test]
    fn test_valid_female_bucharest() {
        let d = validate_national_id("2960315400017");
        assert_eq!(d.sex, Some(Sex::Female));
        assert_eq!(d.region.as_deref(), Some("București"));
    }

    #[test]
    fn test_century_codes() {
        assert_eq!(
            validate_national_id("5000101461237").date_of_birth.as_deref(),
            Some("2000-01-01")
        );
        assert_eq!(
            validate_national_id("3000101000010").date_of_birth.as_deref(),
            Some("1800-01-01")
        );
        let resident = validate_national_id("7021230012347");
        assert_eq!(resident.date_of_birth.as_deref(), Some("1902-12-30"));
        assert_eq!(resident.sex, Some(Sex::Male));
        assert_eq!(resident.region.as_deref(), Some("Alba"));
    }

    #[test]
    fn test_generated_ids_decode_their_birth_date() {
        let centuries = [(1, 1900), (2, 1900), (3, 1800), (4, 1800), (5, 2000), (6, 2000), (7, 1900), (8, 1900)];
        let dates = [(0, 1, 1), (4, 2, 29), (57, 6, 15), (99, 12, 31)];
        for (code, base) in centuries {
            for (yy, mm, dd) in dates {
                let body = format!("{}{:02}{:02}{:02}12345", code, yy, mm, dd);
                let digits: Vec<u32> = body.chars().filter_map(|c| c.to_digit(10)).collect();
                let id = format!("{}{}", body, control_digit(&digits));

                let d = validate_national_id(&id);
                assert!(d.is_valid, "{id}");
                let expected = format!("{}-{:02}-{:02}", base + yy, mm, dd);
                assert_eq!(d.date_of_birth.as_deref(), Some(expected.as_str()), "{id}");
                let sex = if code % 2 == 1 { Sex::Male } else { Sex::Female };
                assert_eq!(d.sex, Some(sex), "{id}");
                assert_eq!(d.region.as_deref(), Some("Cluj"));
            }
        }
    }

    #[test]
    fn test_checksum_ten_maps_to_one() {
        // Weighted sum is 197, 197 % 11 == 10
        let d = validate_national_id("1850505040031");
        assert!(d.is_valid);
        assert_eq!(d.region.as_deref(), Some("Bacău"));
    }

    #[test]
    fn test_altered_control_digit() {
        let d = validate_national_id("1960315123452");
        assert!(!d.is_valid);
        assert_eq!(d.rejection, Some(NationalIdRejection::Checksum));
        assert_eq!(
            d.error.as_deref(),
            Some("Invalid checksum (control digit mismatch).")
        );
    }

    #[test]
    fn test_format_rejections() {
        for id in ["", "196031512345", "19603151234512", "19603151234a1", "１９６０３１５１２３４５"] {
            let d = validate_national_id(id);
            assert!(!d.is_valid, "{id}");
            assert_eq!(d.rejection, Some(NationalIdRejection::Format));
        }
    }

    #[test]
    fn test_month_out_of_range() {
        let d = validate_national_id("1961315123450");
        assert_eq!(d.rejection, Some(NationalIdRejection::BirthDate));
        assert_eq!(d.error.as_deref(), Some("Invalid birth date in CNP."));
    }

    #[test]
    fn test_unknown_century_code() {
        let d = validate_national_id("9960315123454");
        assert_eq!(d.rejection, Some(NationalIdRejection::CenturySex));
    }

    #[test]
    fn test_shallow_date_validation() {
        // February 30 passes the range check but is not a calendar date
        let d = validate_national_id("1960230123453");
        assert!(d.is_valid);
        assert_eq!(d.date_of_birth.as_deref(), Some("1996-02-30"));
        assert!(d.birth_date().is_none());
    }

    #[test]
    fn test_unmapped_region() {
        assert_eq!(
            validate_national_id("1960315991234").region.as_deref(),
            Some(UNKNOWN_REGION)
        );
        assert_eq!(
            validate_national_id("1960315700078").region.as_deref(),
            Some("Rezident/Evidență Specială")
        );
    }

    #[test]
    fn test_region_names_sorted_unique() {
        let names = region_names();
        assert_eq!(names.len(), REGIONS.len());
        assert!(names
            .windows(2)
            .all(|w| (collation_key(w[0]), w[0]) < (collation_key(w[1]), w[1])));
        assert_eq!(region_name("00"), UNKNOWN_REGION);
    }

    #[test]
    fn test_region_names_fold_diacritics() {
        let names = region_names();
        let position = |name: &str| names.iter().position(|n| *n == name).unwrap();
        assert!(position("Sălaj") < position("Satu Mare"));
        assert!(position("Satu Mare") < position("Sibiu"));
        assert!(position("Călărași") < position("Caraș-Severin"));
        assert!(position("Caraș-Severin") < position("Cluj"));
        assert!(position("Brăila") < position("Brașov"));
        assert!(position("Dâmbovița") < position("Dolj"));
        assert!(position("Vâlcea") < position("Vaslui"));
        assert!(position("Vaslui") < position("Vrancea"));
        assert_eq!(collation_key("Ialomița"), "ialomita");
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let json = serde_json::to_value(validate_national_id("123")).unwrap();
        assert_eq!(json["is_valid"], false);
        assert_eq!(json["rejection"], "format");
        assert!(json.get("sex").is_none());

        let valid = serde_json::to_value(validate_national_id("1960315123451")).unwrap();
        assert_eq!(valid["sex"], "Male");
        assert!(valid.get("error").is_none());
    }
}
