//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - read from a JSON input file or built from CLI flags
//! - passed through the prediction pipeline
//! - written back out as JSON reports

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// Which kind of property is being priced.
///
/// Selects both the regression model and the error margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
pub enum PropertyType {
    House,
    Apartment,
}

impl PropertyType {
    pub const ALL: [PropertyType; 2] = [PropertyType::House, PropertyType::Apartment];

    pub fn label(self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Apartment => "Apartment",
        }
    }

    /// Fixed half-width of the price band, derived offline from historical
    /// residual error.
    pub fn error_margin(self) -> i64 {
        match self {
            PropertyType::House => 50102,
            PropertyType::Apartment => 31681,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown property type '{s}' (expected House or Apartment)."))
    }
}

// Callers send "house", "House" or "HOUSE".
impl<'de> Deserialize<'de> for PropertyType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The 43 administrative regions the models were trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locality {
    Aalst,
    Antwerp,
    Arlon,
    Ath,
    Bastogne,
    Brugge,
    Brussels,
    Charleroi,
    Dendermonde,
    Diksmuide,
    Dinant,
    Eeklo,
    Gent,
    HalleVilvoorde,
    Hasselt,
    Huy,
    Ieper,
    Kortrijk,
    Leuven,
    Liege,
    Maaseik,
    MarcheEnFamenne,
    Mechelen,
    Mons,
    Mouscron,
    Namur,
    Neufchateau,
    Nivelles,
    Oostend,
    Oudenaarde,
    Philippeville,
    Roeselare,
    SintNiklaas,
    Soignies,
    Thuin,
    Tielt,
    Tongeren,
    Tournai,
    Turnhout,
    Verviers,
    Veurne,
    Virton,
    Waremme,
}

impl Locality {
    pub const ALL: [Locality; 43] = [
        Locality::Aalst,
        Locality::Antwerp,
        Locality::Arlon,
        Locality::Ath,
        Locality::Bastogne,
        Locality::Brugge,
        Locality::Brussels,
        Locality::Charleroi,
        Locality::Dendermonde,
        Locality::Diksmuide,
        Locality::Dinant,
        Locality::Eeklo,
        Locality::Gent,
        Locality::HalleVilvoorde,
        Locality::Hasselt,
        Locality::Huy,
        Locality::Ieper,
        Locality::Kortrijk,
        Locality::Leuven,
        Locality::Liege,
        Locality::Maaseik,
        Locality::MarcheEnFamenne,
        Locality::Mechelen,
        Locality::Mons,
        Locality::Mouscron,
        Locality::Namur,
        Locality::Neufchateau,
        Locality::Nivelles,
        Locality::Oostend,
        Locality::Oudenaarde,
        Locality::Philippeville,
        Locality::Roeselare,
        Locality::SintNiklaas,
        Locality::Soignies,
        Locality::Thuin,
        Locality::Tielt,
        Locality::Tongeren,
        Locality::Tournai,
        Locality::Turnhout,
        Locality::Verviers,
        Locality::Veurne,
        Locality::Virton,
        Locality::Waremme,
    ];

    /// Region name as it appears in the encoder vocabulary and in geocoding queries.
    pub fn label(self) -> &'static str {
        match self {
            Locality::Aalst => "Aalst",
            Locality::Antwerp => "Antwerp",
            Locality::Arlon => "Arlon",
            Locality::Ath => "Ath",
            Locality::Bastogne => "Bastogne",
            Locality::Brugge => "Brugge",
            Locality::Brussels => "Brussels",
            Locality::Charleroi => "Charleroi",
            Locality::Dendermonde => "Dendermonde",
            Locality::Diksmuide => "Diksmuide",
            Locality::Dinant => "Dinant",
            Locality::Eeklo => "Eeklo",
            Locality::Gent => "Gent",
            Locality::HalleVilvoorde => "Halle-vilvoorde",
            Locality::Hasselt => "Hasselt",
            Locality::Huy => "Huy",
            Locality::Ieper => "Ieper",
            Locality::Kortrijk => "Kortrijk",
            Locality::Leuven => "Leuven",
            Locality::Liege => "Liège",
            Locality::Maaseik => "Maaseik",
            Locality::MarcheEnFamenne => "Marche-en-Famenne",
            Locality::Mechelen => "Mechelen",
            Locality::Mons => "Mons",
            Locality::Mouscron => "Mouscron",
            Locality::Namur => "Namur",
            Locality::Neufchateau => "Neufchâteau",
            Locality::Nivelles => "Nivelles",
            Locality::Oostend => "Oostend",
            Locality::Oudenaarde => "Oudenaarde",
            Locality::Philippeville => "Philippeville",
            Locality::Roeselare => "Roeselare",
            Locality::SintNiklaas => "Sint-Niklaas",
            Locality::Soignies => "Soignies",
            Locality::Thuin => "Thuin",
            Locality::Tielt => "Tielt",
            Locality::Tongeren => "Tongeren",
            Locality::Tournai => "Tournai",
            Locality::Turnhout => "Turnhout",
            Locality::Verviers => "Verviers",
            Locality::Veurne => "Veurne",
            Locality::Virton => "Virton",
            Locality::Waremme => "Waremme",
        }
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Locality {
    type Err = String;

    /// Accepts the label case-insensitively, with or without accents
    /// (`Liège`, `liege`, `NEUFCHATEAU`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold_ascii(s.trim());
        Locality::ALL
            .into_iter()
            .find(|l| fold_ascii(l.label()) == wanted)
            .ok_or_else(|| format!("Unknown locality '{s}'."))
    }
}

impl Serialize for Locality {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Locality {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn fold_ascii(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'è' | 'é' | 'ê' | 'È' | 'É' | 'Ê' => 'e',
            'â' | 'à' | 'Â' | 'À' => 'a',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Kitchen equipment level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenType {
    NotInstalled,
    SemiEquipped,
    UsaSemiEquipped,
    Installed,
    UsaHyperEquipped,
}

impl KitchenType {
    pub const ALL: [KitchenType; 5] = [
        KitchenType::NotInstalled,
        KitchenType::SemiEquipped,
        KitchenType::UsaSemiEquipped,
        KitchenType::Installed,
        KitchenType::UsaHyperEquipped,
    ];

    pub fn label(self) -> &'static str {
        match self {
            KitchenType::NotInstalled => "NOT_INSTALLED",
            KitchenType::SemiEquipped => "SEMI_EQUIPPED",
            KitchenType::UsaSemiEquipped => "USA_SEMI_EQUIPPED",
            KitchenType::Installed => "INSTALLED",
            KitchenType::UsaHyperEquipped => "USA_HYPER_EQUIPPED",
        }
    }
}

/// Condition of the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildingState {
    ToRestore,
    ToRenovate,
    ToBeDoneUp,
    Good,
    JustRenovated,
    AsNew,
}

impl BuildingState {
    pub const ALL: [BuildingState; 6] = [
        BuildingState::ToRestore,
        BuildingState::ToRenovate,
        BuildingState::ToBeDoneUp,
        BuildingState::Good,
        BuildingState::JustRenovated,
        BuildingState::AsNew,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BuildingState::ToRestore => "TO_RESTORE",
            BuildingState::ToRenovate => "TO_RENOVATE",
            BuildingState::ToBeDoneUp => "TO_BE_DONE_UP",
            BuildingState::Good => "GOOD",
            BuildingState::JustRenovated => "JUST_RENOVATED",
            BuildingState::AsNew => "AS_NEW",
        }
    }
}

/// Energy Performance Certificate grade, worst (`G`) to best (`A++`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[value(rename_all = "verbatim")]
pub enum Epc {
    G,
    F,
    E,
    D,
    C,
    B,
    A,
    #[serde(rename = "A+")]
    #[value(name = "A+")]
    APlus,
    #[serde(rename = "A++")]
    #[value(name = "A++")]
    APlusPlus,
}

impl Epc {
    pub const ALL: [Epc; 9] = [
        Epc::G,
        Epc::F,
        Epc::E,
        Epc::D,
        Epc::C,
        Epc::B,
        Epc::A,
        Epc::APlus,
        Epc::APlusPlus,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Epc::G => "G",
            Epc::F => "F",
            Epc::E => "E",
            Epc::D => "D",
            Epc::C => "C",
            Epc::B => "B",
            Epc::A => "A",
            Epc::APlus => "A+",
            Epc::APlusPlus => "A++",
        }
    }
}

/// Raw property attributes as supplied by the caller.
///
/// Counts stay as raw numbers here: a fractional bedroom count is a
/// validation failure, not a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub property_type: PropertyType,
    pub locality: Locality,
    pub zip_code: u32,
    pub construction_year: i32,
    pub total_area_sqm: f64,
    pub surface_land_sqm: f64,
    pub garden_sqm: f64,
    pub nbr_frontages: f64,
    pub nbr_bedrooms: f64,
    pub kitchen_type: KitchenType,
    pub building_state: BuildingState,
    pub epc: Epc,
    #[serde(deserialize_with = "flag")]
    pub fl_double_glazing: bool,
    #[serde(deserialize_with = "flag")]
    pub fl_terrace: bool,
    #[serde(deserialize_with = "flag")]
    pub fl_swimming_pool: bool,
    #[serde(deserialize_with = "flag")]
    pub fl_floodzone: bool,
}

/// Accept `true`/`false` as well as the `1`/`0` the web form used to send.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Int(i64),
    }

    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(b) => Ok(b),
        RawFlag::Int(0) => Ok(false),
        RawFlag::Int(1) => Ok(true),
        RawFlag::Int(other) => Err(serde::de::Error::custom(format!(
            "flag must be 0 or 1, got {other}"
        ))),
    }
}

/// Property attributes that passed validation.
///
/// Only `validate::validate` constructs this; encoding and assembly accept
/// nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProperty {
    pub property_type: PropertyType,
    pub locality: Locality,
    pub zip_code: u32,
    pub construction_year: i32,
    pub total_area_sqm: f64,
    pub surface_land_sqm: f64,
    pub garden_sqm: f64,
    pub nbr_frontages: u32,
    pub nbr_bedrooms: u32,
    pub kitchen_type: KitchenType,
    pub building_state: BuildingState,
    pub epc: Epc,
    pub fl_double_glazing: bool,
    pub fl_terrace: bool,
    pub fl_swimming_pool: bool,
    pub fl_floodzone: bool,
}

/// Resolved location of a property. Never supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

/// Output of a single prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub property_type: PropertyType,
    pub predicted_price: i64,
    pub predicted_price_range: PriceRange,
}
