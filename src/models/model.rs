//! Model artifacts, selection by property type, and scoring.
//!
//! Each artifact carries the versioned feature schema it was trained on, so
//! the column-order contract lives next to the weights instead of being
//! implied by how the feature vector happens to be built.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::PropertyType;
use crate::features::FeatureVector;
use crate::models::linear::LinearModel;
use crate::models::tree::TreeEnsemble;

/// Artifact format understood by this build.
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("Model scoring failed: {model} model expects {expected} features, got {actual}.")]
    WidthMismatch {
        model: PropertyType,
        expected: usize,
        actual: usize,
    },
    #[error("Model scoring failed: {model} model produced a non-numeric prediction.")]
    NonFinite { model: PropertyType },
    #[error("Model scoring failed: {model} model prediction {value} is out of range.")]
    OutOfRange { model: PropertyType, value: f64 },
}

/// Ordered, versioned input columns a model was trained on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl Regressor {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Regressor::Linear(_) => "linear",
            Regressor::TreeEnsemble(_) => "tree_ensemble",
        }
    }

    pub fn predict(&self, x: &[f64]) -> f64 {
        match self {
            Regressor::Linear(m) => m.predict(x),
            Regressor::TreeEnsemble(m) => m.predict(x),
        }
    }

    /// Check the regressor is usable with `n_features` input columns.
    pub fn check(&self, n_features: usize) -> Result<(), String> {
        match self {
            Regressor::Linear(m) => {
                m.check()?;
                if m.n_features() != n_features {
                    return Err(format!(
                        "linear model has {} coefficients but the schema has {n_features} columns",
                        m.n_features()
                    ));
                }
                Ok(())
            }
            Regressor::TreeEnsemble(m) => m.check(n_features),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub property_type: PropertyType,
    pub schema: FeatureSchema,
    pub regressor: Regressor,
}

impl ModelArtifact {
    pub fn n_features(&self) -> usize {
        self.schema.columns.len()
    }

    /// Raw model output for a row with the right width.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        if features.len() != self.n_features() {
            return Err(InferenceError::WidthMismatch {
                model: self.property_type,
                expected: self.n_features(),
                actual: features.len(),
            });
        }
        Ok(self.regressor.predict(features.values()))
    }
}

/// House and apartment models, loaded once and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBank {
    pub house: ModelArtifact,
    pub apartment: ModelArtifact,
}

impl ModelBank {
    pub fn select(&self, property_type: PropertyType) -> &ModelArtifact {
        match property_type {
            PropertyType::House => &self.house,
            PropertyType::Apartment => &self.apartment,
        }
    }

    /// Score a feature row and truncate the prediction toward zero.
    pub fn score(&self, property_type: PropertyType, features: &FeatureVector) -> Result<i64, InferenceError> {
        let model = self.select(property_type);
        let raw = model.predict(features)?;
        debug!(model = %property_type, schema = %model.schema.version, raw, "scored");
        truncate_price(property_type, raw)
    }
}

fn truncate_price(model: PropertyType, raw: f64) -> Result<i64, InferenceError> {
    if !raw.is_finite() {
        return Err(InferenceError::NonFinite { model });
    }
    let truncated = raw.trunc();
    // `i64::MAX as f64` rounds up to 2^63, which is itself out of range.
    if truncated >= i64::MAX as f64 || truncated < i64::MIN as f64 {
        return Err(InferenceError::OutOfRange { model, value: raw });
    }
    Ok(truncated as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureLayout;

    fn linear_artifact(
        property_type: PropertyType,
        layout: &FeatureLayout,
        intercept: f64,
        weights: &[(&str, f64)],
    ) -> ModelArtifact {
        let coefficients = layout
            .columns()
            .iter()
            .map(|col| {
                weights
                    .iter()
                    .find(|(name, _)| *name == col.as_str())
                    .map(|(_, w)| *w)
                    .unwrap_or(0.0)
            })
            .collect();
        ModelArtifact {
            format_version: MODEL_FORMAT_VERSION,
            property_type,
            schema: FeatureSchema {
                version: format!("{}-test", property_type.label().to_lowercase()),
                columns: layout.columns().to_vec(),
            },
            regressor: Regressor::Linear(LinearModel {
                intercept,
                coefficients,
            }),
        }
    }

    fn two_column_bank(house_intercept: f64, apartment_intercept: f64) -> ModelBank {
        let schema = FeatureSchema {
            version: "v1".to_string(),
            columns: vec!["a".to_string(), "b".to_string()],
        };
        let make = |property_type, intercept| ModelArtifact {
            format_version: MODEL_FORMAT_VERSION,
            property_type,
            schema: schema.clone(),
            regressor: Regressor::Linear(LinearModel {
                intercept,
                coefficients: vec![1.0, 1.0],
            }),
        };
        ModelBank {
            house: make(PropertyType::House, house_intercept),
            apartment: make(PropertyType::Apartment, apartment_intercept),
        }
    }

    fn row(values: &[f64]) -> FeatureVector {
        FeatureVector::from_values(values.to_vec())
    }

    #[test]
    fn selects_model_by_property_type() {
        let bank = two_column_bank(300_000.0, 200_000.0);
        assert_eq!(bank.score(PropertyType::House, &row(&[0.0, 0.0])).unwrap(), 300_000);
        assert_eq!(bank.score(PropertyType::Apartment, &row(&[0.0, 0.0])).unwrap(), 200_000);
    }

    #[test]
    fn prediction_is_truncated_toward_zero() {
        let bank = two_column_bank(0.0, 0.0);
        assert_eq!(bank.score(PropertyType::House, &row(&[250_000.9, 0.0])).unwrap(), 250_000);
        assert_eq!(bank.score(PropertyType::House, &row(&[-10.7, 0.0])).unwrap(), -10);
    }

    #[test]
    fn scoring_is_deterministic() {
        let bank = two_column_bank(123_456.0, 0.0);
        let fv = row(&[0.125, 7.0]);
        let first = bank.score(PropertyType::House, &fv).unwrap();
        for _ in 0..10 {
            assert_eq!(bank.score(PropertyType::House, &fv).unwrap(), first);
        }
    }

    #[test]
    fn width_mismatch_is_an_inference_error() {
        let bank = two_column_bank(0.0, 0.0);
        let err = bank.score(PropertyType::Apartment, &row(&[1.0])).unwrap_err();
        assert_eq!(
            err,
            InferenceError::WidthMismatch {
                model: PropertyType::Apartment,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn non_finite_prediction_is_an_inference_error() {
        let bank = two_column_bank(0.0, 0.0);
        let err = bank.score(PropertyType::House, &row(&[f64::INFINITY, 0.0])).unwrap_err();
        assert_eq!(err, InferenceError::NonFinite { model: PropertyType::House });

        let err = bank.score(PropertyType::House, &row(&[1e30, 0.0])).unwrap_err();
        assert!(matches!(err, InferenceError::OutOfRange { .. }));
    }

    #[test]
    fn artifact_round_trips_through_json() {
        let json = r#"{
            "format_version": 1,
            "property_type": "apartment",
            "schema": {"version": "apartment-2024-11", "columns": ["a", "b"]},
            "regressor": {"kind": "linear", "intercept": 10.0, "coefficients": [1.0, 2.0]}
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.property_type, PropertyType::Apartment);
        assert_eq!(artifact.regressor.kind_name(), "linear");
        assert!(artifact.regressor.check(artifact.n_features()).is_ok());
        assert_eq!(artifact.predict(&row(&[1.0, 1.0])).unwrap(), 13.0);
    }

    #[test]
    fn weights_follow_layout_column_names() {
        let encoders = crate::encode::tests::full_bank();
        let layout = FeatureLayout::from_encoders(&encoders);
        let property = crate::validate::validate(&crate::validate::tests::gent_house()).unwrap();
        let encoded = encoders.encode(&property).unwrap();
        let location = crate::domain::GeoCoordinate {
            latitude: 51.05,
            longitude: 3.72,
        };
        let fv = crate::features::assemble(&layout, &property, location, &encoded);

        let model = linear_artifact(
            PropertyType::House,
            &layout,
            50_000.0,
            &[("total_area_sqm", 2_000.0), ("locality_Gent", 10_000.0), ("locality_Namur", -5_000.0)],
        );
        assert_eq!(model.predict(&fv).unwrap(), 260_000.0);
    }

    #[test]
    fn linear_width_must_match_schema() {
        let regressor = Regressor::Linear(LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0],
        });
        assert!(regressor.check(2).is_err());
    }
}
