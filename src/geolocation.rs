//! IP geolocation and reverse geocoding collaborators
//!
//! IP lookup uses an ipinfo-compatible `GET {base}/json`; reverse geocoding
//! uses a Nominatim-compatible `GET {base}/reverse`. Neither needs a key.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::GeolocationConfig;
use crate::models::{Coordinates, Location, UNKNOWN_PLACE};
use crate::{Result, WeatherAiError};

const USER_AGENT: &str = concat!("WeatherAI/", env!("CARGO_PKG_VERSION"));

/// Looks up where the caller is and what a point is called
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Approximate location of the machine making the request
    async fn locate_by_ip(&self) -> Result<Location>;

    /// Best-effort `(city, country)` for a point
    async fn place_name(&self, coordinates: Coordinates) -> Result<Option<(String, String)>>;
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
    country: Option<String>,
    /// "lat,lng"
    loc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country_code: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    fn into_names(self) -> Option<(String, String)> {
        let country = self
            .country_code
            .map(|code| code.to_uppercase())
            .or(self.country)
            .unwrap_or_else(|| UNKNOWN_PLACE.to_string());
        let place = self
            .city
            .or(self.town)
            .or(self.village)
            .or(self.municipality)
            .or(self.county)
            .or(self.state)?;
        Some((place, country))
    }
}

/// HTTP implementation of [`GeoLocator`]
#[derive(Debug, Clone)]
pub struct HttpGeoLocator {
    client: Client,
    ip_lookup_url: String,
    reverse_geocode_url: String,
}

impl HttpGeoLocator {
    pub fn new(config: &GeolocationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherAiError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            ip_lookup_url: config.ip_lookup_url.trim_end_matches('/').to_string(),
            reverse_geocode_url: config.reverse_geocode_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeoLocator for HttpGeoLocator {
    #[instrument(skip(self))]
    async fn locate_by_ip(&self) -> Result<Location> {
        let url = format!("{}/json", self.ip_lookup_url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("IP lookup request failed: {}", e);
            WeatherAiError::location_unavailable(format!("IP lookup failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(WeatherAiError::location_unavailable(format!(
                "IP lookup returned status {}",
                response.status()
            )));
        }

        let body: IpInfoResponse = response.json().await.map_err(|e| {
            WeatherAiError::location_unavailable(format!("IP lookup response unreadable: {e}"))
        })?;

        let coordinates = body
            .loc
            .as_deref()
            .and_then(parse_loc)
            .ok_or_else(|| {
                WeatherAiError::location_unavailable("IP lookup returned no coordinates")
            })?;

        let location = Location::new(
            coordinates,
            non_empty(body.city).unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
            non_empty(body.country).unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        );
        debug!(city = %location.city, "Located by IP");
        Ok(location)
    }

    #[instrument(skip(self))]
    async fn place_name(&self, coordinates: Coordinates) -> Result<Option<(String, String)>> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1&zoom=10",
            self.reverse_geocode_url, coordinates.latitude, coordinates.longitude
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherAiError::transient(format!("Reverse geocode failed: {e}")))?;

        if !response.status().is_success() {
            debug!("Reverse geocode returned status {}", response.status());
            return Ok(None);
        }

        let body: NominatimResponse = response.json().await.map_err(|e| {
            WeatherAiError::data_unavailable(format!("Reverse geocode response unreadable: {e}"))
        })?;

        Ok(body.address.and_then(NominatimAddress::into_names))
    }
}

/// Parse ipinfo's `"lat,lng"` into validated coordinates
fn parse_loc(loc: &str) -> Option<Coordinates> {
    let (lat, lng) = loc.split_once(',')?;
    let latitude = lat.trim().parse().ok()?;
    let longitude = lng.trim().parse().ok()?;
    Coordinates::new(latitude, longitude).ok()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loc() {
        assert_eq!(
            parse_loc("12.9716,77.5946"),
            Some(Coordinates::new(12.9716, 77.5946).unwrap())
        );
        assert_eq!(parse_loc(" -33.8, 151.2 "), Coordinates::new(-33.8, 151.2).ok());
        assert_eq!(parse_loc("12.97"), None);
        assert_eq!(parse_loc("123.0,10.0"), None);
        assert_eq!(parse_loc("abc,def"), None);
    }

    #[test]
    fn test_nominatim_prefers_city() {
        let address = NominatimAddress {
            city: None,
            town: Some("Hosur".into()),
            village: None,
            municipality: None,
            county: Some("Krishnagiri".into()),
            state: Some("Tamil Nadu".into()),
            country_code: Some("in".into()),
            country: Some("India".into()),
        };
        assert_eq!(
            address.into_names(),
            Some(("Hosur".to_string(), "IN".to_string()))
        );
    }

    #[test]
    fn test_nominatim_without_place() {
        let address = NominatimAddress {
            city: None,
            town: None,
            village: None,
            municipality: None,
            county: None,
            state: None,
            country_code: None,
            country: Some("Atlantis".into()),
        };
        assert_eq!(address.into_names(), None);
    }
}
