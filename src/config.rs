//! Runtime settings read from the environment (and an optional `.env`).

use std::path::PathBuf;

use crate::error::{AppError, EXIT_INPUT};

pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "property_price_predictor";

const ENV_ARTIFACTS_DIR: &str = "ESTIMATOR_ARTIFACTS_DIR";
const ENV_GEOCODER_URL: &str = "ESTIMATOR_GEOCODER_URL";
const ENV_USER_AGENT: &str = "ESTIMATOR_USER_AGENT";
const ENV_GEOCODER_TIMEOUT: &str = "ESTIMATOR_GEOCODER_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding the model and encoder JSON artifacts.
    pub artifacts_dir: PathBuf,
    /// Base URL of the Nominatim-compatible geocoding service.
    pub geocoder_url: String,
    pub user_agent: String,
    /// Request timeout for geocoding. `None` keeps the HTTP client default.
    pub geocoder_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            geocoder_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Settings::default();

        let geocoder_timeout_secs = match get(ENV_GEOCODER_TIMEOUT) {
            None => None,
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(secs),
                _ => {
                    return Err(AppError::new(
                        EXIT_INPUT,
                        format!("{ENV_GEOCODER_TIMEOUT} must be a positive integer, got '{raw}'."),
                    ));
                }
            },
        };

        Ok(Self {
            artifacts_dir: get(ENV_ARTIFACTS_DIR).map(PathBuf::from).unwrap_or(defaults.artifacts_dir),
            geocoder_url: get(ENV_GEOCODER_URL).unwrap_or(defaults.geocoder_url),
            user_agent: get(ENV_USER_AGENT).unwrap_or(defaults.user_agent),
            geocoder_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn overrides_are_applied() {
        let settings = Settings::from_lookup(lookup(&[
            (ENV_ARTIFACTS_DIR, "/opt/models"),
            (ENV_GEOCODER_URL, "http://localhost:8080"),
            (ENV_USER_AGENT, "test-agent"),
            (ENV_GEOCODER_TIMEOUT, "10"),
        ]))
        .unwrap();
        assert_eq!(settings.artifacts_dir, PathBuf::from("/opt/models"));
        assert_eq!(settings.geocoder_url, "http://localhost:8080");
        assert_eq!(settings.user_agent, "test-agent");
        assert_eq!(settings.geocoder_timeout_secs, Some(10));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let settings = Settings::from_lookup(lookup(&[(ENV_USER_AGENT, "  ")])).unwrap();
        assert_eq!(settings.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn bad_timeout_is_rejected() {
        for raw in ["0", "soon", "-3"] {
            let err = Settings::from_lookup(lookup(&[(ENV_GEOCODER_TIMEOUT, raw)])).unwrap_err();
            assert_eq!(err.exit_code(), EXIT_INPUT);
        }
    }
}
