//! End-to-end flows: national id → patient → calculation → stored record.

use std::fs;
use std::path::PathBuf;

use approx::assert_relative_eq;
use chrono::NaiveDate;
use clinic_core::calculations::{bmi, paley, BmiCategory, CalculationRecord, Methodology};
use clinic_core::demographics::Sex;
use clinic_core::equations::LmsEntry;
use clinic_core::patient::PatientDemographics;
use clinic_core::settings::{Settings, ENV_LMS_TABLE};
use clinic_core::{format_imperial_height, Observation, ReferenceData};

/// Female, born 2014-09-10, București
const GIRL_ID: &str = "6140910401236";

/// Male, born 2016-01-04, Cluj
const BOY_ID: &str = "5160104123450";

const LMS_JSON: &str = r#"{
    "female": {
        "113.5": [-2.0, 16.5, 0.13],
        "114.5": [-1.9, 16.6, 0.13],
        "115.5": [-1.8, 16.7, 0.13]
    }
}"#;

fn visit() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("clinic_flow_{}_{}", std::process::id(), name))
}

fn reference_with_lms(tag: &str) -> ReferenceData {
    let path = temp_path(&format!("lms_{}.json", tag));
    fs::write(&path, LMS_JSON).unwrap();
    let settings = Settings::default().with_overrides(|key| match key {
        ENV_LMS_TABLE => Some(path.display().to_string()),
        _ => None,
    });
    let reference = ReferenceData::from_settings(&settings.reference).unwrap();
    fs::remove_file(&path).ok();
    reference
}

#[test]
fn pediatric_bmi_from_national_id() {
    let mut patient = PatientDemographics::default();
    let decoded = patient.apply_national_id(GIRL_ID);
    assert!(decoded.is_valid);
    assert_eq!(patient.sex, Some(Sex::Female));
    assert_eq!(patient.birth_date, NaiveDate::from_ymd_opt(2014, 9, 10));
    assert_eq!(patient.region.as_deref(), Some("București"));

    let inputs = patient.bmi_input(140.0, 35.0, visit());
    let results = bmi::calculate(&inputs, &reference_with_lms("pediatric")).unwrap();

    assert_eq!(results.bmi, 17.9);
    assert_eq!(results.demographics.age_months, 114);
    assert!(results.demographics.is_pediatric());
    assert_eq!(results.meta.methodology, Methodology::CdcLms);
    // 114 months sits between 113.5 and 114.5; the lower age wins
    assert_eq!(results.meta.lms_parameters, Some(LmsEntry::new(-2.0, 16.5, 0.13)));
    assert_eq!(results.z_score, Some(0.58));
    assert_eq!(results.percentile, Some(71.8));
    assert_eq!(results.meta.bmi_95th_percentile, Some(21.81));
    assert_eq!(results.category, BmiCategory::HealthyWeight);
}

#[test]
fn pediatric_bmi_without_table_is_labelled() {
    let mut patient = PatientDemographics::default();
    patient.apply_national_id(GIRL_ID);
    let inputs = patient.bmi_input(140.0, 35.0, visit());
    let results = bmi::calculate(&inputs, &ReferenceData::bundled()).unwrap();

    assert_eq!(results.bmi, 17.9);
    assert_eq!(results.category.label(), "Unknown");
    assert_eq!(results.meta.methodology.label(), "Failed (Gender Invalid)");
    assert!(results.percentile.is_none());
}

#[test]
fn height_prediction_stored_and_reloaded() {
    let mut patient = PatientDemographics::default();
    assert!(patient.apply_national_id(BOY_ID).is_valid);
    assert_eq!(patient.region.as_deref(), Some("Cluj"));

    let inputs = patient.paley_input(132.0, visit());
    let results = paley::compute_from_input(&inputs, &ReferenceData::bundled().multipliers).unwrap();

    // 110 months; between the 9.0 and 9.5 year rows
    assert_eq!(results.age_used, 9.17);
    assert!(!results.is_bone_age);
    assert_relative_eq!(results.multiplier, 1.327, epsilon = 1e-9);
    assert_eq!(results.predicted_height_cm, 175.2);
    assert_eq!(results.growth_remaining_cm, 43.2);
    assert_eq!(format_imperial_height(results.predicted_height_cm), "5' 9\"");

    let observation = Observation::new(CalculationRecord::PaleyHeight { inputs, results });
    let path = temp_path("observation.json");
    observation.save(&path).unwrap();

    let stored: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored["record"]["calculation_type"], "paley_height");
    assert_eq!(stored["record"]["results"]["gender"], "Male");
    assert_eq!(stored["record"]["inputs"]["birth_date"], "2016-01-04");

    let reloaded = Observation::load(&path).unwrap();
    assert_eq!(reloaded, observation);
    assert_eq!(
        reloaded.summary(),
        "Predicted Adult Height: 175.2 cm (+43.2 cm, age 9.17)"
    );
    fs::remove_file(&path).ok();
}

#[test]
fn stored_bmi_payload_field_names() {
    let mut patient = PatientDemographics::default();
    patient.apply_national_id(GIRL_ID);
    let inputs = patient.bmi_input(140.0, 35.0, visit());
    let results = bmi::calculate(&inputs, &reference_with_lms("payload")).unwrap();
    let observation = Observation::new(CalculationRecord::Bmi { inputs, results });

    let json: serde_json::Value = serde_json::from_str(&observation.to_json().unwrap()).unwrap();
    let results = &json["record"]["results"];
    assert_eq!(json["record"]["calculation_type"], "bmi");
    assert_eq!(results["zScore"], 0.58);
    assert_eq!(results["demographics"]["ageMonths"], 114);
    assert_eq!(results["demographics"]["label"], "Pediatric (WHO/CDC)");
    assert_eq!(results["meta"]["exact_age_months"], 114);
    assert_eq!(results["meta"]["reference_date"], "2025-03-10");
    assert_eq!(results["meta"]["formula"], "Z = ((BMI/M)^L - 1) / (L * S)");
}

#[test]
fn invalid_id_falls_back_to_adult_grading() {
    let mut patient = PatientDemographics::default();
    let decoded = patient.apply_national_id("6140910401237");
    assert!(!decoded.is_valid);
    assert_eq!(decoded.error.as_deref(), Some("Invalid checksum (control digit mismatch)."));
    assert!(patient.birth_date.is_none());

    let results = bmi::calculate(&patient.bmi_input(140.0, 35.0, visit()), &reference_with_lms("invalid_id")).unwrap();
    assert!(results.demographics.is_adult());
    assert_eq!(results.meta.methodology, Methodology::WhoAdult);
    assert_eq!(results.category, BmiCategory::Underweight);
}
