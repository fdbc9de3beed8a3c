//! # Clinic Calc CLI
//!
//! Command-line front end for the clinical calculators. Every subcommand
//! prints a human-readable summary followed by the JSON payload a front end
//! would store; `--json` prints the payload only.
//!
//! ```text
//! clinic_cli cnp 1960315123451
//! clinic_cli bmi --height 142 --weight 38.5 --dob 2014-09-02 --sex F
//! clinic_cli height --height 132 --sex M --dob 2016-01-04 --bone-age 10.5
//! clinic_cli imperial 182.88
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;

use clinic_core::calculations::{bmi, paley, CalculationRecord};
use clinic_core::demographics::Sex;
use clinic_core::equations::generate_equations_markdown;
use clinic_core::national_id::{region_names, validate_national_id};
use clinic_core::patient::PatientDemographics;
use clinic_core::reference::BUNDLED_MULTIPLIER_NOTICE;
use clinic_core::units::ImperialHeight;
use clinic_core::{ClinicError, ClinicResult, Observation, ReferenceData, Settings};

#[derive(Parser)]
#[command(name = "clinic_cli", version)]
#[command(about = "Growth and body-composition calculators for clinical use")]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true, env = "CLINIC_CONFIG")]
    config: Option<PathBuf>,

    /// Print only the JSON payload
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate and decode a national identification number (CNP)
    Cnp {
        /// 13-digit identifier
        id: String,
    },

    /// Body mass index with age-appropriate grading
    Bmi {
        /// Height in centimeters
        #[arg(long)]
        height: f64,

        /// Weight in kilograms
        #[arg(long)]
        weight: f64,

        #[command(flatten)]
        patient: PatientArgs,

        /// Write the stored observation to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Predicted adult height (Paley multiplier method)
    Height {
        /// Current height in centimeters
        #[arg(long)]
        height: f64,

        /// Skeletal age in years; used instead of chronological age
        #[arg(long)]
        bone_age: Option<f64>,

        #[command(flatten)]
        patient: PatientArgs,

        /// Write the stored observation to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Convert centimeters to feet and inches
    Imperial {
        cm: f64,
    },

    /// List the region names decoded from national ids
    Regions,

    /// Print every formula with its citation (Markdown)
    Formulas,
}

/// Who the measurement belongs to and when it was taken.
#[derive(clap::Args)]
struct PatientArgs {
    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    dob: Option<NaiveDate>,

    /// Sex (M/F)
    #[arg(long)]
    sex: Option<Sex>,

    /// National id; fills birth date and sex when valid
    #[arg(long)]
    cnp: Option<String>,

    /// Measurement date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl PatientArgs {
    fn demographics(&self) -> PatientDemographics {
        let mut patient = PatientDemographics {
            birth_date: self.dob,
            sex: self.sex,
            ..PatientDemographics::default()
        };
        if let Some(id) = &self.cnp {
            let decoded = patient.apply_national_id(id);
            if let Some(reason) = decoded.error {
                log::warn!("ignoring national id: {}", reason);
            }
        }
        patient
    }

    fn reference_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> ClinicResult<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    }
    .with_env_overrides();

    match &cli.command {
        Command::Cnp { id } => {
            let decoded = validate_national_id(id);
            if !cli.json {
                print_header("NATIONAL ID");
                println!("  Id:       {}", id.trim());
                if decoded.is_valid {
                    println!("  Status:   valid");
                    print_opt("Sex", decoded.sex.map(|s| s.label().to_string()));
                    print_opt("Born", decoded.date_of_birth.clone());
                    print_opt("Region", decoded.region.clone());
                    if decoded.birth_date().is_none() {
                        println!("  Note:     encoded birth date is not a calendar date");
                    }
                } else {
                    println!("  Status:   INVALID");
                    print_opt("Reason", decoded.error.clone());
                }
            }
            print_json(cli.json, &decoded)
        }

        Command::Bmi {
            height,
            weight,
            patient,
            save,
        } => {
            let reference = ReferenceData::from_settings(&settings.reference)?;
            let inputs = patient
                .demographics()
                .bmi_input(*height, *weight, patient.reference_date());
            inputs.validate()?;
            let results = bmi::calculate(&inputs, &reference)
                .ok_or_else(|| ClinicError::invalid_input("bmi", "", "Inputs are not computable"))?;

            if !cli.json {
                print_header("BODY MASS INDEX");
                print_height("Height", inputs.height_cm, settings.display.imperial_heights);
                println!("  Weight:     {:.1} kg", inputs.weight_kg);
                println!("  Age:        {} months ({})", results.demographics.age_months, results.demographics.label());
                println!();
                println!("  BMI:        {:.1}", results.bmi);
                if let (Some(z), Some(p)) = (results.z_score, results.percentile) {
                    println!("  Z-score:    {:.2}", z);
                    println!("  Percentile: {:.1}", p);
                }
                println!("  Category:   {}", results.category);
                println!("  Method:     {}", results.meta.methodology.label());
            }

            finish(cli.json, CalculationRecord::Bmi { inputs, results }, save.as_deref())
        }

        Command::Height {
            height,
            bone_age,
            patient,
            save,
        } => {
            let reference = ReferenceData::from_settings(&settings.reference)?;
            let mut inputs = patient
                .demographics()
                .paley_input(*height, patient.reference_date());
            inputs.bone_age_years = *bone_age;
            inputs.use_bone_age = bone_age.is_some();
            inputs.validate()?;
            let results = paley::compute_from_input(&inputs, &reference.multipliers)
                .ok_or_else(|| ClinicError::invalid_input("height", "", "Inputs are not computable"))?;
            let bundled = reference.uses_bundled_multipliers();
            if bundled && cli.json {
                log::warn!("{}", BUNDLED_MULTIPLIER_NOTICE);
            }

            if !cli.json {
                let imperial = settings.display.imperial_heights;
                print_header("PREDICTED ADULT HEIGHT");
                print_height("Current", results.current_height_cm, imperial);
                println!(
                    "  Age used:   {:.2} y ({})",
                    results.age_used,
                    if results.is_bone_age { "bone age" } else { "chronological" }
                );
                println!("  Sex:        {}", results.sex);
                println!("  Multiplier: {:.4}", results.multiplier);
                println!();
                print_height("Predicted", results.predicted_height_cm, imperial);
                println!("  Remaining:  {:.1} cm", results.growth_remaining_cm);
                if bundled {
                    println!();
                    println!("  Note: {}", BUNDLED_MULTIPLIER_NOTICE);
                }
            }

            finish(cli.json, CalculationRecord::PaleyHeight { inputs, results }, save.as_deref())
        }

        Command::Imperial { cm } => {
            let imperial = ImperialHeight::from_cm(*cm);
            if !cli.json {
                println!("{:.1} cm = {}", cm, imperial);
            }
            print_json(cli.json, &imperial)
        }

        Command::Regions => {
            let names = region_names();
            if cli.json {
                print_json(true, &names)
            } else {
                names.iter().for_each(|name| println!("{}", name));
                Ok(())
            }
        }

        Command::Formulas => {
            print!("{}", generate_equations_markdown());
            Ok(())
        }
    }
}

fn finish(json_only: bool, record: CalculationRecord, save: Option<&std::path::Path>) -> ClinicResult<()> {
    let observation = Observation::new(record);
    if !json_only {
        println!();
        println!("═══════════════════════════════════════");
        println!("  {}", observation.summary());
        println!("═══════════════════════════════════════");
    }
    if let Some(path) = save {
        observation.save(path)?;
        if !json_only {
            println!("Saved observation {} to {}", observation.id, path.display());
        }
    }
    print_json(json_only, &observation.record)
}

fn print_header(title: &str) {
    println!("═══════════════════════════════════════");
    println!("  {}", title);
    println!("═══════════════════════════════════════");
}

fn print_opt(label: &str, value: Option<String>) {
    println!("  {:<9} {}", format!("{}:", label), value.as_deref().unwrap_or("-"));
}

fn print_height(label: &str, cm: f64, imperial: bool) {
    let label = format!("{}:", label);
    if imperial {
        println!("  {:<11} {:.1} cm ({})", label, cm, ImperialHeight::from_cm(cm));
    } else {
        println!("  {:<11} {:.1} cm", label, cm);
    }
}

fn print_json<T: Serialize>(json_only: bool, payload: &T) -> ClinicResult<()> {
    let json = serde_json::to_string_pretty(payload)?;
    if !json_only {
        println!();
        println!("JSON Output:");
    }
    println!("{}", json);
    Ok(())
}
