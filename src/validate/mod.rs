//! Structural and logical checks on raw property input.
//!
//! Rules run in a fixed order and the first violation wins:
//!
//! 1. bedrooms is a positive integer
//! 2. frontages is a positive integer
//! 3. garden fits inside both the land surface and the total area
//! 4. total area fits inside the land surface
//!
//! Range checks on construction year, zip code and area magnitudes belong to
//! the input shell (`cli`) and are not repeated here.

use crate::domain::{PropertyDetails, ValidatedProperty};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid input, Please enter an integer values for Bedrooms and Frontages.")]
    NotPositiveInteger { field: &'static str, value: f64 },
    #[error("Garden size cannot be larger than the surface land area or total area.")]
    GardenTooLarge,
    #[error("Invalid input: Total area cannot be larger than the surface land.")]
    TotalAreaTooLarge,
}

/// Validate raw input and promote it to a `ValidatedProperty`.
pub fn validate(details: &PropertyDetails) -> Result<ValidatedProperty, ValidationError> {
    let nbr_bedrooms = positive_count("nbr_bedrooms", details.nbr_bedrooms)?;
    let nbr_frontages = positive_count("nbr_frontages", details.nbr_frontages)?;

    if details.garden_sqm > details.surface_land_sqm || details.garden_sqm > details.total_area_sqm {
        return Err(ValidationError::GardenTooLarge);
    }
    if details.total_area_sqm > details.surface_land_sqm {
        return Err(ValidationError::TotalAreaTooLarge);
    }

    Ok(ValidatedProperty {
        property_type: details.property_type,
        locality: details.locality,
        zip_code: details.zip_code,
        construction_year: details.construction_year,
        total_area_sqm: details.total_area_sqm,
        surface_land_sqm: details.surface_land_sqm,
        garden_sqm: details.garden_sqm,
        nbr_frontages,
        nbr_bedrooms,
        kitchen_type: details.kitchen_type,
        building_state: details.building_state,
        epc: details.epc,
        fl_double_glazing: details.fl_double_glazing,
        fl_terrace: details.fl_terrace,
        fl_swimming_pool: details.fl_swimming_pool,
        fl_floodzone: details.fl_floodzone,
    })
}

fn positive_count(field: &'static str, value: f64) -> Result<u32, ValidationError> {
    let integral = value.is_finite() && value.fract() == 0.0;
    if !integral || value <= 0.0 || value > f64::from(u32::MAX) {
        return Err(ValidationError::NotPositiveInteger { field, value });
    }
    Ok(value as u32)
}
