//! Feature vector assembly.
//!
//! The models were trained on a fixed column order. That order is captured
//! here as a `FeatureLayout` derived from the loaded encoders, and every model
//! artifact carries the layout it expects; `io::artifacts` refuses to start if
//! the two disagree.
//!
//! Layout (with ordinal kitchen/building/EPC encoders):
//!
//! ```text
//! construction_year, total_area_sqm, nbr_frontages, nbr_bedrooms,
//! kitchen_type_encoded, building_state_encoded, epc_encoded,
//! garden_sqm, surface_land_sqm,
//! fl_double_glazing, fl_terrace, fl_swimming_pool, fl_floodzone,
//! latitude, longitude, zip_code,
//! locality_<name>...
//! ```

use crate::domain::{GeoCoordinate, ValidatedProperty};
use crate::encode::{EncodedCategories, EncoderBank};

const HEAD_COLUMNS: [&str; 4] = ["construction_year", "total_area_sqm", "nbr_frontages", "nbr_bedrooms"];

const TAIL_COLUMNS: [&str; 9] = [
    "garden_sqm",
    "surface_land_sqm",
    "fl_double_glazing",
    "fl_terrace",
    "fl_swimming_pool",
    "fl_floodzone",
    "latitude",
    "longitude",
    "zip_code",
];

/// Ordered column names of the model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLayout {
    columns: Vec<String>,
}

impl FeatureLayout {
    pub fn from_encoders(encoders: &EncoderBank) -> Self {
        let mut columns: Vec<String> = HEAD_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(encoders.kitchen_type.column_names());
        columns.extend(encoders.building_state.column_names());
        columns.extend(encoders.epc.column_names());
        columns.extend(TAIL_COLUMNS.iter().map(|c| c.to_string()));
        columns.extend(encoders.locality.column_names());
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One row of model input, in `FeatureLayout` order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    #[cfg(test)]
    pub(crate) fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Merge validated inputs, resolved coordinates and encoded categories.
pub fn assemble(
    layout: &FeatureLayout,
    property: &ValidatedProperty,
    location: GeoCoordinate,
    encoded: &EncodedCategories,
) -> FeatureVector {
    let mut values = Vec::with_capacity(layout.len());

    values.push(f64::from(property.construction_year));
    values.push(property.total_area_sqm);
    values.push(f64::from(property.nbr_frontages));
    values.push(f64::from(property.nbr_bedrooms));

    values.extend_from_slice(&encoded.kitchen_type);
    values.extend_from_slice(&encoded.building_state);
    values.extend_from_slice(&encoded.epc);

    values.push(property.garden_sqm);
    values.push(property.surface_land_sqm);
    values.push(flag(property.fl_double_glazing));
    values.push(flag(property.fl_terrace));
    values.push(flag(property.fl_swimming_pool));
    values.push(flag(property.fl_floodzone));
    values.push(location.latitude);
    values.push(location.longitude);
    values.push(f64::from(property.zip_code));

    values.extend_from_slice(&encoded.locality);

    debug_assert_eq!(values.len(), layout.len(), "feature vector does not match layout");
    FeatureVector { values }
}

fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::tests::full_bank;
    use crate::validate::{tests::gent_house, validate};

    const GENT: GeoCoordinate = GeoCoordinate {
        latitude: 51.05,
        longitude: 3.72,
    };

    #[test]
    fn layout_matches_training_order() {
        let layout = FeatureLayout::from_encoders(&full_bank());
        assert_eq!(layout.len(), 16 + 43);
        let head: Vec<&str> = layout.columns()[..16].iter().map(String::as_str).collect();
        assert_eq!(
            head,
            vec![
                "construction_year",
                "total_area_sqm",
                "nbr_frontages",
                "nbr_bedrooms",
                "kitchen_type_encoded",
                "building_state_encoded",
                "epc_encoded",
                "garden_sqm",
                "surface_land_sqm",
                "fl_double_glazing",
                "fl_terrace",
                "fl_swimming_pool",
                "fl_floodzone",
                "latitude",
                "longitude",
                "zip_code",
            ]
        );
        assert_eq!(layout.columns()[16], "locality_Aalst");
        assert_eq!(layout.columns()[16 + 42], "locality_Waremme");
    }

    #[test]
    fn gent_house_assembles_in_order() {
        let bank = full_bank();
        let layout = FeatureLayout::from_encoders(&bank);
        let property = validate(&gent_house()).unwrap();
        let encoded = bank.encode(&property).unwrap();

        let fv = assemble(&layout, &property, GENT, &encoded);
        assert_eq!(fv.len(), layout.len());
        assert_eq!(
            &fv.values()[..16],
            &[
                2020.0, 100.0, 2.0, 1.0, // year, area, frontages, bedrooms
                3.0, 3.0, 5.0, // kitchen, state, epc
                15.0, 120.0, // garden, land
                1.0, 1.0, 1.0, 1.0, // flags
                51.05, 3.72, 9000.0,
            ]
        );
        let locality = &fv.values()[16..];
        assert_eq!(locality.iter().filter(|v| **v == 1.0).count(), 1);
        assert_eq!(locality[12], 1.0);
    }

    #[test]
    fn false_flags_become_zero() {
        let bank = full_bank();
        let layout = FeatureLayout::from_encoders(&bank);
        let mut details = gent_house();
        details.fl_terrace = false;
        details.fl_floodzone = false;
        let property = validate(&details).unwrap();
        let encoded = bank.encode(&property).unwrap();

        let fv = assemble(&layout, &property, GENT, &encoded);
        assert_eq!(&fv.values()[9..13], &[1.0, 0.0, 1.0, 0.0]);
    }
}
