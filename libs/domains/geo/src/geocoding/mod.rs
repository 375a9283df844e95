//! Address <-> coordinates bridge.

mod config;
mod nominatim;

pub use config::GeocoderConfig;
pub use nominatim::NominatimGeocoder;

use crate::coordinates::Coordinates;
use crate::error::ClassifiedError;
use async_trait::async_trait;
use thiserror::Error;

/// Upstream geocoding failure
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Geocoding request failed: {0}")]
    Request(String),

    #[error("Geocoder responded with status {0}")]
    Status(u16),

    #[error("No results found for address '{0}'")]
    NoResults(String),

    #[error("No address found for coordinates {0}")]
    NoAddress(Coordinates),

    #[error("Invalid geocoder response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ResolutionError {
    fn from(err: reqwest::Error) -> Self {
        ResolutionError::Request(err.without_url().to_string())
    }
}

/// Geocoding failures are reported to callers as bad input.
impl From<ResolutionError> for ClassifiedError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::NoResults(address) => ClassifiedError::bad_request(format!(
                "Could not resolve coordinates for address '{address}'"
            )),
            ResolutionError::NoAddress(coordinates) => ClassifiedError::bad_request(format!(
                "Could not resolve an address for coordinates {coordinates}"
            )),
            other => {
                tracing::warn!(error = %other, "Geocoding failed");
                ClassifiedError::bad_request("Unable to resolve location")
            }
        }
    }
}

/// Resolves addresses and coordinates against an external geocoder.
///
/// One upstream call per invocation: no caching and no retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Reverse lookup: coordinates to a human-readable address.
    async fn address_from_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<String, ResolutionError>;

    /// Forward lookup: free-text address to its best matching coordinates.
    async fn coordinates_from_address(&self, address: &str)
    -> Result<Coordinates, ResolutionError>;
}
