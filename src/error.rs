use crate::encode::EncodeError;
use crate::geo::GeoError;
use crate::io::artifacts::ArtifactError;
use crate::models::InferenceError;
use crate::validate::ValidationError;

/// Exit code for bad input, bad configuration, or failed validation.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for missing/invalid artifacts or vocabulary mismatches.
pub const EXIT_ARTIFACTS: u8 = 3;
/// Exit code for geolocation failures.
pub const EXIT_LOCATION: u8 = 4;
/// Exit code for model scoring failures.
pub const EXIT_INFERENCE: u8 = 5;

/// Everything that can end a single prediction attempt.
///
/// All variants are request-scoped: none of them touch the loaded artifacts.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Location(#[from] GeoError),
    #[error(transparent)]
    Encoding(#[from] EncodeError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PredictError {
    pub fn exit_code(&self) -> u8 {
        match self {
            PredictError::Validation(_) => EXIT_INPUT,
            PredictError::Location(_) => EXIT_LOCATION,
            PredictError::Encoding(_) => EXIT_ARTIFACTS,
            PredictError::Inference(_) => EXIT_INFERENCE,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl From<ArtifactError> for AppError {
    fn from(err: ArtifactError) -> Self {
        AppError::new(EXIT_ARTIFACTS, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_errors_map_to_exit_codes() {
        let err: AppError = PredictError::from(ValidationError::TotalAreaTooLarge).into();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert_eq!(
            err.to_string(),
            "Invalid input: Total area cannot be larger than the surface land."
        );

        let err: AppError = PredictError::from(GeoError::NotFound {
            query: "Gent, 9000".to_string(),
        })
        .into();
        assert_eq!(err.exit_code(), EXIT_LOCATION);
        assert_eq!(err.to_string(), "Location not found.");
    }
}
