//! Export a prediction as a JSON report.
//!
//! The report is meant for downstream scripts: the caller's input, the
//! resolved location, the schema version of the model that scored it, and
//! the result.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::pipeline::Estimate;
use crate::domain::{GeoCoordinate, PredictionResult, PropertyDetails};
use crate::error::{AppError, EXIT_INPUT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub input: PropertyDetails,
    pub location: GeoCoordinate,
    pub model_schema: String,
    pub result: PredictionResult,
}

impl PredictionReport {
    pub fn new(input: &PropertyDetails, estimate: &Estimate) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            generated_at: Utc::now(),
            input: input.clone(),
            location: estimate.location,
            model_schema: estimate.schema_version.clone(),
            result: estimate.result.clone(),
        }
    }
}

pub fn write_report_json(path: &Path, report: &PredictionReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create report '{}': {e}", path.display())))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write report '{}': {e}", path.display())))?;

    // Small reports never leave the buffer before this point.
    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write report '{}': {e}", path.display())))
}
