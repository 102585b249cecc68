//! Read a `PropertyDetails` record from a JSON file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::domain::PropertyDetails;
use crate::error::{AppError, EXIT_INPUT};

pub fn read_property_details(path: &Path) -> Result<PropertyDetails, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open input '{}': {e}", path.display())))?;
    let details: PropertyDetails = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid property JSON '{}': {e}", path.display())))?;

    crate::cli::check_shell_ranges(&details)
        .map_err(|e| AppError::new(e.exit_code(), format!("Invalid property in '{}': {e}", path.display())))?;
    Ok(details)
}
