//! Load the model and encoder artifacts from disk.
//!
//! Artifacts are read once at startup into a single `Artifacts` value and
//! never mutated afterwards. Any missing, unreadable or inconsistent artifact
//! is an error here, before the first prediction is attempted.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::domain::PropertyType;
use crate::encode::{CategoricalEncoder, EncodedField, EncoderArtifact, EncoderBank};
use crate::features::FeatureLayout;
use crate::models::{MODEL_FORMAT_VERSION, ModelArtifact, ModelBank};

pub const HOUSE_MODEL_FILE: &str = "house_model.json";
pub const APARTMENT_MODEL_FILE: &str = "apartment_model.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to open artifact '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid artifact JSON '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid artifact '{artifact}': {message}")]
    Invalid { artifact: String, message: String },
    #[error("The {model} model (schema '{version}') does not match the encoder feature layout: {detail}")]
    SchemaMismatch {
        model: PropertyType,
        version: String,
        detail: String,
    },
}

pub fn encoder_file(field: EncodedField) -> String {
    format!("{}_encoder.json", field.name())
}

pub fn model_file(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::House => HOUSE_MODEL_FILE,
        PropertyType::Apartment => APARTMENT_MODEL_FILE,
    }
}

/// Everything a prediction needs besides the caller's input and the geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    encoders: EncoderBank,
    models: ModelBank,
    layout: FeatureLayout,
}

impl Artifacts {
    /// Read and cross-check all six artifacts in `dir`.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let load_encoder = |field: EncodedField| -> Result<CategoricalEncoder, ArtifactError> {
            let path = dir.join(encoder_file(field));
            let artifact: EncoderArtifact = read_json(&path)?;
            let encoder = CategoricalEncoder::from_artifact(field, artifact).map_err(|message| {
                ArtifactError::Invalid {
                    artifact: path.display().to_string(),
                    message,
                }
            })?;
            debug!(path = %path.display(), width = encoder.width(), "loaded encoder");
            Ok(encoder)
        };

        let encoders = EncoderBank {
            locality: load_encoder(EncodedField::Locality)?,
            kitchen_type: load_encoder(EncodedField::KitchenType)?,
            building_state: load_encoder(EncodedField::BuildingState)?,
            epc: load_encoder(EncodedField::Epc)?,
        };

        let models = ModelBank {
            house: read_json(&dir.join(HOUSE_MODEL_FILE))?,
            apartment: read_json(&dir.join(APARTMENT_MODEL_FILE))?,
        };

        let artifacts = Self::from_parts(encoders, models)?;
        info!(
            dir = %dir.display(),
            columns = artifacts.layout.len(),
            house_schema = %artifacts.models.house.schema.version,
            apartment_schema = %artifacts.models.apartment.schema.version,
            "artifacts loaded"
        );
        Ok(artifacts)
    }

    /// Cross-check already-parsed artifacts.
    pub fn from_parts(encoders: EncoderBank, models: ModelBank) -> Result<Self, ArtifactError> {
        let layout = FeatureLayout::from_encoders(&encoders);
        for property_type in PropertyType::ALL {
            check_model(property_type, models.select(property_type), &layout)?;
        }
        Ok(Self {
            encoders,
            models,
            layout,
        })
    }

    pub fn encoders(&self) -> &EncoderBank {
        &self.encoders
    }

    pub fn models(&self) -> &ModelBank {
        &self.models
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }
}

fn check_model(expected: PropertyType, model: &ModelArtifact, layout: &FeatureLayout) -> Result<(), ArtifactError> {
    let invalid = |message: String| ArtifactError::Invalid {
        artifact: model_file(expected).to_string(),
        message,
    };

    if model.format_version != MODEL_FORMAT_VERSION {
        return Err(invalid(format!(
            "unsupported format_version {} (expected {MODEL_FORMAT_VERSION})",
            model.format_version
        )));
    }
    if model.property_type != expected {
        return Err(invalid(format!(
            "artifact is a {} model, expected {expected}",
            model.property_type
        )));
    }
    model.regressor.check(model.n_features()).map_err(invalid)?;

    if let Some(detail) = layout_difference(&model.schema.columns, layout.columns()) {
        return Err(ArtifactError::SchemaMismatch {
            model: expected,
            version: model.schema.version.clone(),
            detail,
        });
    }
    Ok(())
}

fn layout_difference(schema: &[String], layout: &[String]) -> Option<String> {
    if let Some(i) = schema.iter().zip(layout).position(|(a, b)| a != b) {
        return Some(format!(
            "column {i} is '{}' in the model but '{}' in the layout",
            schema[i], layout[i]
        ));
    }
    if schema.len() != layout.len() {
        return Some(format!(
            "model has {} columns, layout has {}",
            schema.len(),
            layout.len()
        ));
    }
    None
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;
    use crate::domain::{BuildingState, Epc, KitchenType, Locality};

    fn labels<T: Copy>(all: &[T], label: fn(T) -> &'static str) -> Vec<&'static str> {
        all.iter().map(|v| label(*v)).collect()
    }

    /// Write a complete, consistent artifact set into `dir`.
    ///
    /// Linear models: 1500/m² plus 20k per bedroom on top of the intercept.
    pub(crate) fn write_artifacts(dir: &Path) {
        let encoders = [
            ("locality", "one_hot", labels(&Locality::ALL, Locality::label)),
            ("kitchen_type", "ordinal", labels(&KitchenType::ALL, KitchenType::label)),
            ("building_state", "ordinal", labels(&BuildingState::ALL, BuildingState::label)),
            ("epc", "ordinal", labels(&Epc::ALL, Epc::label)),
        ];
        for (field, kind, categories) in &encoders {
            let body = json!({"field": field, "kind": kind, "categories": categories});
            fs::write(dir.join(format!("{field}_encoder.json")), body.to_string()).unwrap();
        }

        let mut columns: Vec<String> = [
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
        .iter()
        .map(|c| c.to_string())
        .collect();
        columns.extend(Locality::ALL.iter().map(|l| format!("locality_{}", l.label())));

        let mut coefficients = vec![0.0; columns.len()];
        coefficients[1] = 1500.0;
        coefficients[3] = 20_000.0;

        for (file, property_type, intercept) in [
            (HOUSE_MODEL_FILE, "House", 100_000.0),
            (APARTMENT_MODEL_FILE, "Apartment", 50_000.0),
        ] {
            let body = json!({
                "format_version": 1,
                "property_type": property_type,
                "schema": {"version": format!("{}-test", property_type.to_lowercase()), "columns": columns},
                "regressor": {"kind": "linear", "intercept": intercept, "coefficients": coefficients},
            });
            fs::write(dir.join(file), body.to_string()).unwrap();
        }
    }

    #[test]
    fn loads_consistent_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());

        let artifacts = Artifacts::load(dir.path()).unwrap();
        assert_eq!(artifacts.layout().len(), 59);
        assert_eq!(artifacts.models().house.schema.version, "house-test");
        assert_eq!(artifacts.encoders().locality.width(), 43);
    }

    #[test]
    fn missing_artifact_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        fs::remove_file(dir.path().join("epc_encoder.json")).unwrap();

        let err = Artifacts::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
        assert!(err.to_string().contains("epc_encoder.json"));
    }

    #[test]
    fn unreadable_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        fs::write(dir.path().join(HOUSE_MODEL_FILE), "not json").unwrap();

        assert!(matches!(
            Artifacts::load(dir.path()),
            Err(ArtifactError::Parse { .. })
        ));
    }

    #[test]
    fn swapped_model_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        let house = dir.path().join(HOUSE_MODEL_FILE);
        let apartment = dir.path().join(APARTMENT_MODEL_FILE);
        let house_body = fs::read_to_string(&house).unwrap();
        fs::copy(&apartment, &house).unwrap();
        fs::write(&apartment, house_body).unwrap();

        let err = Artifacts::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("expected House"), "{err}");
    }

    #[test]
    fn schema_that_disagrees_with_encoders_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path());
        // Drop one locality from the encoder: the models now expect a wider row.
        let body = json!({
            "field": "locality",
            "kind": "one_hot",
            "categories": labels(&Locality::ALL[..42], Locality::label),
        });
        fs::write(dir.path().join("locality_encoder.json"), body.to_string()).unwrap();

        let err = Artifacts::load(dir.path()).unwrap_err();
        match err {
            ArtifactError::SchemaMismatch { model, detail, .. } => {
                assert_eq!(model, PropertyType::House);
                assert_eq!(detail, "model has 59 columns, layout has 58");
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn reordered_columns_are_reported_by_position() {
        let layout = vec!["a".to_string(), "b".to_string()];
        let schema = vec!["b".to_string(), "a".to_string()];
        assert_eq!(
            layout_difference(&schema, &layout).unwrap(),
            "column 0 is 'b' in the model but 'a' in the layout"
        );
        assert!(layout_difference(&layout, &layout).is_none());
    }
}
