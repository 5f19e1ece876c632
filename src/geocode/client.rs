use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::geocode::types::{Coordinates, GeocodeError, GeocodeRequest, GeocodeResult};

pub const GOOGLE_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Turns an address into coordinates by asking a remote service.
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    async fn geocode(&self, request: &GeocodeRequest<'_>) -> GeocodeResult;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResponseEntry>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponseEntry {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Client for the Google Maps Geocoding API.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleGeocoder {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: GOOGLE_GEOCODE_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for GoogleGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a geocoding response body. Only `"OK"` counts as success, and then
/// the first result's location is used.
pub fn parse_geocode_response(address: &str, body: &[u8]) -> GeocodeResult {
    let response: GeocodeResponse = serde_json::from_slice(body).map_err(|e| {
        error!("Invalid geocoding response for address={}: {}", address, e);
        GeocodeError::transport(address)
    })?;

    if response.status != "OK" {
        warn!(
            "Geocoding failed for address={} status={}",
            address, response.status
        );
        return Err(GeocodeError::service(
            address,
            &response.status,
            response.error_message,
        ));
    }

    let Some(first) = response.results.first() else {
        error!("Geocoding response for address={} has no results", address);
        return Err(GeocodeError::transport(address));
    };
    let location = &first.geometry.location;
    Ok(Coordinates::new(location.lat, location.lng))
}

#[async_trait]
impl GeocodingClient for GoogleGeocoder {
    async fn geocode(&self, request: &GeocodeRequest<'_>) -> GeocodeResult {
        debug!("Geocoding address={}", request.address);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("address", request.address), ("key", request.api_key)])
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, "mapcache")
            .send()
            .await
            .map_err(|e| {
                error!("Geocoding request failed for address={}: {}", request.address, e);
                GeocodeError::transport(request.address)
            })?;
        let body = response.bytes().await.map_err(|e| {
            error!("Could not read geocoding response for address={}: {}", request.address, e);
            GeocodeError::transport(request.address)
        })?;
        debug!("Body length: {:?}", body.len());
        parse_geocode_response(request.address, &body)
    }
}
