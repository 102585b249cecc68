//! Categorical encoders for locality, kitchen type, building state and EPC.
//!
//! Encoders are fitted offline and shipped as JSON artifacts. This module does
//! not choose the scheme; it applies whichever one the artifact was fitted
//! with (`ordinal` or `one_hot`) and reports values outside the fitted
//! vocabulary instead of guessing.

use serde::{Deserialize, Serialize};

use crate::domain::ValidatedProperty;

/// The four categorical inputs the models consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodedField {
    Locality,
    KitchenType,
    BuildingState,
    Epc,
}

impl EncodedField {
    pub const ALL: [EncodedField; 4] = [
        EncodedField::Locality,
        EncodedField::KitchenType,
        EncodedField::BuildingState,
        EncodedField::Epc,
    ];

    /// Field name used in artifacts and feature column names.
    pub fn name(self) -> &'static str {
        match self {
            EncodedField::Locality => "locality",
            EncodedField::KitchenType => "kitchen_type",
            EncodedField::BuildingState => "building_state",
            EncodedField::Epc => "epc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("Unknown {field} value '{value}': not part of the fitted encoder vocabulary.")]
    UnknownCategory { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingKind {
    /// One column holding the category's index in the vocabulary.
    Ordinal,
    /// One 0/1 column per category.
    OneHot,
}

/// On-disk encoder definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderArtifact {
    pub field: String,
    pub kind: EncodingKind,
    pub categories: Vec<String>,
    /// One-hot only: omit the first category's column (it encodes as all zeros).
    #[serde(default)]
    pub drop_first: bool,
}

/// A fitted encoder bound to one field.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalEncoder {
    field: EncodedField,
    kind: EncodingKind,
    categories: Vec<String>,
    drop_first: bool,
}

impl CategoricalEncoder {
    /// Check an artifact against the field it is expected to encode.
    pub fn from_artifact(field: EncodedField, artifact: EncoderArtifact) -> Result<Self, String> {
        if artifact.field != field.name() {
            return Err(format!(
                "encoder is for field '{}', expected '{}'",
                artifact.field,
                field.name()
            ));
        }
        if artifact.categories.is_empty() {
            return Err("encoder has no categories".to_string());
        }
        for (i, cat) in artifact.categories.iter().enumerate() {
            if artifact.categories[..i].contains(cat) {
                return Err(format!("duplicate category '{cat}'"));
            }
        }
        if artifact.drop_first && artifact.kind != EncodingKind::OneHot {
            return Err("drop_first is only valid for one_hot encoders".to_string());
        }
        if artifact.drop_first && artifact.categories.len() < 2 {
            return Err("drop_first needs at least two categories".to_string());
        }

        Ok(Self {
            field,
            kind: artifact.kind,
            categories: artifact.categories,
            drop_first: artifact.drop_first,
        })
    }

    pub fn field(&self) -> EncodedField {
        self.field
    }

    pub fn kind(&self) -> EncodingKind {
        self.kind
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Number of feature columns this encoder produces.
    pub fn width(&self) -> usize {
        match self.kind {
            EncodingKind::Ordinal => 1,
            EncodingKind::OneHot if self.drop_first => self.categories.len() - 1,
            EncodingKind::OneHot => self.categories.len(),
        }
    }

    /// Feature column names, in output order.
    pub fn column_names(&self) -> Vec<String> {
        let field = self.field.name();
        match self.kind {
            EncodingKind::Ordinal => vec![format!("{field}_encoded")],
            EncodingKind::OneHot => self
                .categories
                .iter()
                .skip(usize::from(self.drop_first))
                .map(|cat| format!("{field}_{cat}"))
                .collect(),
        }
    }

    pub fn encode(&self, value: &str) -> Result<Vec<f64>, EncodeError> {
        let index = self
            .categories
            .iter()
            .position(|c| c == value)
            .ok_or_else(|| EncodeError::UnknownCategory {
                field: self.field.name(),
                value: value.to_string(),
            })?;

        Ok(match self.kind {
            EncodingKind::Ordinal => vec![index as f64],
            EncodingKind::OneHot => {
                let mut out = vec![0.0; self.categories.len()];
                out[index] = 1.0;
                if self.drop_first {
                    out.remove(0);
                }
                out
            }
        })
    }
}

/// Encoded columns for one property, one block per field.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCategories {
    pub locality: Vec<f64>,
    pub kitchen_type: Vec<f64>,
    pub building_state: Vec<f64>,
    pub epc: Vec<f64>,
}

/// The four fitted encoders, loaded once and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderBank {
    pub locality: CategoricalEncoder,
    pub kitchen_type: CategoricalEncoder,
    pub building_state: CategoricalEncoder,
    pub epc: CategoricalEncoder,
}

impl EncoderBank {
    pub fn get(&self, field: EncodedField) -> &CategoricalEncoder {
        match field {
            EncodedField::Locality => &self.locality,
            EncodedField::KitchenType => &self.kitchen_type,
            EncodedField::BuildingState => &self.building_state,
            EncodedField::Epc => &self.epc,
        }
    }

    pub fn encode(&self, property: &ValidatedProperty) -> Result<EncodedCategories, EncodeError> {
        Ok(EncodedCategories {
            locality: self.locality.encode(property.locality.label())?,
            kitchen_type: self.kitchen_type.encode(property.kitchen_type.label())?,
            building_state: self.building_state.encode(property.building_state.label())?,
            epc: self.epc.encode(property.epc.label())?,
        })
    }
}
