//! Command-line parsing for the property price estimator.
//!
//! The goal of this module is to keep **argument parsing** and **input
//! collection** separate from the prediction pipeline.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{BuildingState, Epc, KitchenType, Locality, PropertyDetails, PropertyType};
use crate::error::{AppError, EXIT_INPUT};

pub mod form;

/// Oldest construction year the input shell accepts.
pub const MIN_CONSTRUCTION_YEAR: i64 = 1800;
/// Newest construction year the input shell accepts.
pub const MAX_CONSTRUCTION_YEAR: i64 = 2024;

pub fn check_construction_year(year: i32) -> Result<(), String> {
    if (MIN_CONSTRUCTION_YEAR..=MAX_CONSTRUCTION_YEAR).contains(&i64::from(year)) {
        Ok(())
    } else {
        Err(format!(
            "Construction year must be between {MIN_CONSTRUCTION_YEAR} and {MAX_CONSTRUCTION_YEAR}."
        ))
    }
}

pub fn check_zip_code(zip_code: u32) -> Result<(), String> {
    if zip_code >= 1 { Ok(()) } else { Err("Zip code must be positive.".to_string()) }
}

/// Range checks owned by the input shell; `validate` does not repeat them.
///
/// Flags and the form enforce these while parsing; records that arrive
/// whole (a JSON input file) go through here.
pub fn check_shell_ranges(details: &PropertyDetails) -> Result<(), AppError> {
    check_construction_year(details.construction_year)
        .and_then(|()| check_zip_code(details.zip_code))
        .map_err(|msg| AppError::new(EXIT_INPUT, msg))
}

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "estimate", version, about = "Property price estimator for Belgium")]
pub struct Cli {
    /// Directory with model and encoder artifacts (overrides ESTIMATOR_ARTIFACTS_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub artifacts: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict a price from flags (or a JSON input file).
    Predict(PredictArgs),
    /// Prompt for each property attribute, then predict.
    Form(OutputArgs),
    /// Load the artifacts and print their schemas and vocabularies.
    Inspect,
}

/// Where to send the result.
#[derive(Debug, Args, Clone, Default)]
pub struct OutputArgs {
    /// Print the result as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Also write a JSON report (input, location, model schema, result).
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Read the property from a JSON file instead of the flags below.
    #[arg(long, value_name = "JSON", conflicts_with = "property_fields")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub property: PropertyArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Property attributes. Defaults describe a recent house in Gent.
#[derive(Debug, Args, Clone)]
#[group(id = "property_fields", multiple = true)]
pub struct PropertyArgs {
    #[arg(long, value_enum, ignore_case = true, default_value_t = PropertyType::House)]
    pub property_type: PropertyType,

    /// Region name (e.g. Gent, Liège, Halle-vilvoorde).
    #[arg(long, default_value = "Gent")]
    pub locality: Locality,

    #[arg(long, default_value_t = 9000, value_parser = clap::value_parser!(u32).range(1..))]
    pub zip_code: u32,

    #[arg(
        long,
        default_value_t = 2020,
        value_parser = clap::value_parser!(i32).range(MIN_CONSTRUCTION_YEAR..=MAX_CONSTRUCTION_YEAR)
    )]
    pub construction_year: i32,

    /// Total living area (m²).
    #[arg(long, default_value_t = 100.0)]
    pub total_area_sqm: f64,

    /// Land surface (m²).
    #[arg(long, default_value_t = 120.0)]
    pub surface_land_sqm: f64,

    /// Garden size (m²).
    #[arg(long, default_value_t = 15.0)]
    pub garden_sqm: f64,

    #[arg(long, default_value_t = 2.0)]
    pub nbr_frontages: f64,

    #[arg(long, default_value_t = 1.0)]
    pub nbr_bedrooms: f64,

    #[arg(long, value_enum, ignore_case = true, default_value_t = KitchenType::Installed)]
    pub kitchen_type: KitchenType,

    #[arg(long, value_enum, ignore_case = true, default_value_t = BuildingState::Good)]
    pub building_state: BuildingState,

    /// Energy class (G, F, E, D, C, B, A, A+, A++).
    #[arg(long, value_enum, ignore_case = true, default_value_t = Epc::B)]
    pub epc: Epc,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub double_glazing: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub terrace: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub swimming_pool: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub floodzone: bool,
}

impl From<PropertyArgs> for PropertyDetails {
    fn from(args: PropertyArgs) -> Self {
        PropertyDetails {
            property_type: args.property_type,
            locality: args.locality,
            zip_code: args.zip_code,
            construction_year: args.construction_year,
            total_area_sqm: args.total_area_sqm,
            surface_land_sqm: args.surface_land_sqm,
            garden_sqm: args.garden_sqm,
            nbr_frontages: args.nbr_frontages,
            nbr_bedrooms: args.nbr_bedrooms,
            kitchen_type: args.kitchen_type,
            building_state: args.building_state,
            epc: args.epc,
            fl_double_glazing: args.double_glazing,
            fl_terrace: args.terrace,
            fl_swimming_pool: args.swimming_pool,
            fl_floodzone: args.floodzone,
        }
    }
}
