use super::{Geocoder, GeocoderConfig, ResolutionError};
use crate::coordinates::Coordinates;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

/// [`Geocoder`] backed by a Nominatim (OpenStreetMap) service.
#[derive(Clone, Debug)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, ResolutionError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ResolutionError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolutionError::Status(response.status().as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ResolutionError::InvalidResponse(e.without_url().to_string()))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn address_from_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<String, ResolutionError> {
        let query = [
            ("lat", coordinates.latitude.to_string()),
            ("lon", coordinates.longitude.to_string()),
            ("format", "json".to_string()),
        ];
        let response: ReverseResponse = self.get_json("/reverse", &query).await?;

        if let Some(error) = response.error {
            tracing::debug!(%error, "Reverse lookup returned no address");
        }

        response
            .display_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(ResolutionError::NoAddress(coordinates))
    }

    #[instrument(skip(self))]
    async fn coordinates_from_address(
        &self,
        address: &str,
    ) -> Result<Coordinates, ResolutionError> {
        let query = [("format", "json".to_string()), ("q", address.to_string())];
        let results: Vec<SearchResult> = self.get_json("/search", &query).await?;

        let first = results
            .into_iter()
            .next()
            .ok_or_else(|| ResolutionError::NoResults(address.to_string()))?;

        parse_search_result(&first)
    }
}

fn parse_search_result(result: &SearchResult) -> Result<Coordinates, ResolutionError> {
    let latitude = result
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|_| ResolutionError::InvalidResponse(format!("lat '{}'", result.lat)))?;
    let longitude = result
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|_| ResolutionError::InvalidResponse(format!("lon '{}'", result.lon)))?;

    let coordinates = Coordinates::new(longitude, latitude);
    if !coordinates.is_valid() {
        return Err(ResolutionError::InvalidResponse(format!(
            "out of range coordinates {coordinates}"
        )));
    }

    Ok(coordinates)
}
