//! Shared prediction pipeline used by every front-end command.
//!
//! validate -> geocode -> encode -> assemble -> score -> range
//!
//! The CLI and the interactive form only differ in how they collect input
//! and print the result.

use tracing::{debug, info_span, warn};

use crate::domain::{GeoCoordinate, PredictionResult, PropertyDetails};
use crate::error::PredictError;
use crate::features::assemble;
use crate::geo::Geocoder;
use crate::io::Artifacts;
use crate::report::estimate_range;
use crate::validate::validate;

/// A prediction plus the intermediate values worth reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub result: PredictionResult,
    pub location: GeoCoordinate,
    pub schema_version: String,
}

/// Read-only artifacts plus a geocoder; one instance serves any number of
/// sequential predictions.
pub struct Estimator<G> {
    artifacts: Artifacts,
    geocoder: G,
}

impl<G: Geocoder> Estimator<G> {
    pub fn new(artifacts: Artifacts, geocoder: G) -> Self {
        Self { artifacts, geocoder }
    }

    pub fn predict(&self, details: &PropertyDetails) -> Result<PredictionResult, PredictError> {
        self.estimate(details).map(|e| e.result)
    }

    /// Run the full pipeline for one property.
    pub fn estimate(&self, details: &PropertyDetails) -> Result<Estimate, PredictError> {
        let span = info_span!(
            "predict",
            property_type = %details.property_type,
            locality = %details.locality
        );
        let _guard = span.enter();

        let outcome = self.run(details);
        if let Err(err) = &outcome {
            warn!(error = %err, "prediction failed");
        }
        outcome
    }

    fn run(&self, details: &PropertyDetails) -> Result<Estimate, PredictError> {
        // 1) Validate before touching the network or the models.
        let property = validate(details)?;

        // 2) Resolve coordinates.
        let location = self.geocoder.locate(property.zip_code, property.locality)?;

        // 3) Encode categorical fields.
        let encoded = self.artifacts.encoders().encode(&property)?;

        // 4) Assemble the model input row.
        let features = assemble(self.artifacts.layout(), &property, location, &encoded);
        debug!(columns = features.len(), "features assembled");

        // 5) Score with the model for this property type.
        let predicted_price = self.artifacts.models().score(property.property_type, &features)?;

        // 6) Widen into a range.
        let predicted_price_range = estimate_range(property.property_type, predicted_price);
        debug!(predicted_price, min = predicted_price_range.min, max = predicted_price_range.max, "estimated");

        Ok(Estimate {
            result: PredictionResult {
                property_type: property.property_type,
                predicted_price,
                predicted_price_range,
            },
            location,
            schema_version: self.artifacts.models().select(property.property_type).schema.version.clone(),
        })
    }
}
