// src/services/geocoder.rs
// DOCUMENTATION: Reverse-geocoding API client
// PURPOSE: Turn a photo's coordinates into a human-readable place label

use crate::errors::PhotoShareError;
use crate::services::GeocodeCache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const USER_AGENT: &str = concat!("photoshare/", env!("CARGO_PKG_VERSION"));

/// Reverse-geocoding client
/// DOCUMENTATION: Talks to a Nominatim-compatible /reverse endpoint,
/// with responses cached by rounded coordinates
pub struct GeocodingClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL of the geocoding API
    base_url: String,
    /// Shared response cache
    cache: Arc<GeocodeCache>,
}

/// Response from the reverse-geocoding API
#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    display_name: Option<String>,
    address: Option<ReverseGeocodeAddress>,
    error: Option<String>,
}

/// Address breakdown from the reverse-geocoding API
/// DOCUMENTATION: The locality can arrive under several keys depending on
/// the place; city, town and village are tried in that order
#[derive(Debug, Deserialize)]
struct ReverseGeocodeAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

/// A resolved place for a pair of coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub display_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl ReverseGeocodeResponse {
    fn into_location(self) -> ResolvedLocation {
        let (city, country) = match self.address {
            Some(address) => (
                address.city.or(address.town).or(address.village),
                address.country,
            ),
            None => (None, None),
        };

        ResolvedLocation {
            display_name: self.display_name.unwrap_or_default(),
            city,
            country,
        }
    }
}

impl GeocodingClient {
    pub fn new(base_url: String, cache: Arc<GeocodeCache>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            cache,
        }
    }

    /// Resolve coordinates to a place label
    /// DOCUMENTATION: Cache is consulted first; API failures surface as
    /// ExternalApiError and are never cached
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<ResolvedLocation, PhotoShareError> {
        let key = GeocodeCache::generate_key(lat, lon);

        if let Some(cached) = self.cache.get(&key).await {
            if let Ok(location) = serde_json::from_str::<ResolvedLocation>(&cached) {
                return Ok(location);
            }
        }

        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "jsonv2".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                log::error!("Reverse geocoding request failed: {}", e);
                PhotoShareError::ExternalApiError(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(PhotoShareError::ExternalApiError(format!(
                "Geocoder returned status {}",
                response.status()
            )));
        }

        let body: ReverseGeocodeResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse geocoder response: {}", e);
            PhotoShareError::ExternalApiError(e.to_string())
        })?;

        if let Some(error) = body.error {
            return Err(PhotoShareError::ExternalApiError(error));
        }

        let location = body.into_location();

        if let Ok(serialized) = serde_json::to_string(&location) {
            self.cache.set(key, serialized).await;
        }

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_city_response() {
        let raw = r#"{
            "display_name": "Kursaal, Zurriola Hiribidea, Donostia, Gipuzkoa, Spain",
            "address": {
                "city": "Donostia",
                "country": "Spain"
            }
        }"#;

        let response: ReverseGeocodeResponse = serde_json::from_str(raw).unwrap();
        let location = response.into_location();

        assert_eq!(location.city.as_deref(), Some("Donostia"));
        assert_eq!(location.country.as_deref(), Some("Spain"));
        assert!(location.display_name.starts_with("Kursaal"));
    }

    #[test]
    fn falls_back_to_town_or_village() {
        let raw = r#"{
            "display_name": "Somewhere rural",
            "address": { "village": "Zerain", "country": "Spain" }
        }"#;

        let response: ReverseGeocodeResponse = serde_json::from_str(raw).unwrap();
        let location = response.into_location();

        assert_eq!(location.city.as_deref(), Some("Zerain"));
    }

    #[test]
    fn error_payload_is_detected() {
        let raw = r#"{ "error": "Unable to geocode" }"#;
        let response: ReverseGeocodeResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.error.as_deref(), Some("Unable to geocode"));
    }

    #[test]
    fn resolved_location_round_trips_through_cache_serialization() {
        let location = ResolvedLocation {
            display_name: "Donostia, Spain".to_string(),
            city: Some("Donostia".to_string()),
            country: Some("Spain".to_string()),
        };

        let serialized = serde_json::to_string(&location).unwrap();
        let restored: ResolvedLocation = serde_json::from_str(&serialized).unwrap();
        assert_eq!(restored.display_name, location.display_name);
        assert_eq!(restored.city, location.city);
    }
}
