//! OpenStreetMap Nominatim search integration.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::domain::{GeoCoordinate, Locality};
use crate::error::{AppError, EXIT_INPUT};
use crate::geo::{GeoError, Geocoder, location_query};

const SEARCH_PATH: &str = "/search";

pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let mut builder = Client::builder().user_agent(settings.user_agent.clone());
        if let Some(secs) = settings.geocoder_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.geocoder_url.trim_end_matches('/').to_string(),
        })
    }

    fn search(&self, query: &str) -> Result<String, String> {
        let url = format!("{}{SEARCH_PATH}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .map_err(|e| format!("request failed: {e}"))?;

        if !resp.status().is_success() {
            return Err(format!("request failed with status {}", resp.status()));
        }

        resp.text().map_err(|e| format!("failed to read response body: {e}"))
    }
}

impl Geocoder for NominatimGeocoder {
    fn locate(&self, zip_code: u32, locality: Locality) -> Result<GeoCoordinate, GeoError> {
        let query = location_query(zip_code, locality);
        debug!(%query, "geocoding");

        let body = self.search(&query).map_err(|detail| {
            warn!(%query, %detail, "geocoding request failed");
            GeoError::Service {
                query: query.clone(),
                detail,
            }
        })?;

        let coord = parse_search_response(&query, &body)?;
        debug!(%query, lat = coord.latitude, lon = coord.longitude, "geocoded");
        Ok(coord)
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Extract the first hit from a Nominatim `format=json` search body.
///
/// Nominatim returns coordinates as strings; anything that does not parse
/// to a finite number is a service error, not a miss.
fn parse_search_response(query: &str, body: &str) -> Result<GeoCoordinate, GeoError> {
    let service_err = |detail: String| GeoError::Service {
        query: query.to_string(),
        detail,
    };

    let places: Vec<Place> =
        serde_json::from_str(body).map_err(|e| service_err(format!("invalid response: {e}")))?;

    let Some(place) = places.into_iter().next() else {
        return Err(GeoError::NotFound {
            query: query.to_string(),
        });
    };

    let latitude = parse_coord(&place.lat).ok_or_else(|| service_err(format!("invalid latitude '{}'", place.lat)))?;
    let longitude = parse_coord(&place.lon).ok_or_else(|| service_err(format!("invalid longitude '{}'", place.lon)))?;

    Ok(GeoCoordinate { latitude, longitude })
}

fn parse_coord(raw: &str) -> Option<f64> {
    let v = raw.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
