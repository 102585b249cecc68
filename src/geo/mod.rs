//! Geolocation: `(zip_code, locality)` → `(latitude, longitude)`.
//!
//! Every prediction resolves its location from scratch. There is no cache and
//! no fallback coordinate; a failed lookup ends the request.

use crate::domain::{GeoCoordinate, Locality};

pub mod nominatim;

pub use nominatim::NominatimGeocoder;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    /// The service answered but had no match for the query.
    #[error("Location not found.")]
    NotFound { query: String },
    /// The lookup itself failed (transport, status, or malformed body).
    #[error("Error fetching location details.")]
    Service { query: String, detail: String },
}

/// Anything that can resolve a property location.
pub trait Geocoder {
    fn locate(&self, zip_code: u32, locality: Locality) -> Result<GeoCoordinate, GeoError>;
}

/// Free-text query sent to the geocoding service.
pub fn location_query(zip_code: u32, locality: Locality) -> String {
    format!("{}, {zip_code}", locality.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_locality_then_zip() {
        assert_eq!(location_query(9000, Locality::Gent), "Gent, 9000");
        assert_eq!(location_query(4000, Locality::Liege), "Liège, 4000");
    }
}
