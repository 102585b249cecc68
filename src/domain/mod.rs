//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - categorical input enums (`PropertyType`, `Locality`, `KitchenType`, `BuildingState`, `Epc`)
//! - raw and validated property records (`PropertyDetails`, `ValidatedProperty`)
//! - pipeline outputs (`GeoCoordinate`, `PredictionResult`, `PriceRange`)

pub mod types;

pub use types::*;
