//! Location model for geographic coordinates and place names

use serde::{Deserialize, Serialize};

use crate::{Result, WeatherAiError};

/// Name used when a collaborator does not tell us the city or country
pub const UNKNOWN_PLACE: &str = "Unknown";

/// Validated coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Validate and build coordinates.
    ///
    /// Latitude must lie in [-90, 90] and longitude in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherAiError::invalid_coordinates(format!(
                "latitude {latitude} must be between -90 and 90"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherAiError::invalid_coordinates(format!(
                "longitude {longitude} must be between -180 and 180"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Parse raw query values. Both must be present, or neither. Blank
    /// values count as absent.
    pub fn from_query(lat: Option<&str>, lng: Option<&str>) -> Result<Option<Self>> {
        match (non_blank(lat), non_blank(lng)) {
            (None, None) => Ok(None),
            (Some(lat), Some(lng)) => {
                let latitude = parse_degrees("lat", lat)?;
                let longitude = parse_degrees("lng", lng)?;
                Self::new(latitude, longitude).map(Some)
            }
            _ => Err(WeatherAiError::invalid_coordinates(
                "both lat and lng must be supplied together",
            )),
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.2}°, {:.2}°", self.latitude, self.longitude)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_degrees(name: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| WeatherAiError::invalid_coordinates(format!("{name}={raw:?} is not a number")))
}

/// A resolved place: coordinates plus a human-readable name
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    pub city: String,
    pub country: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Location {
    /// Create a location with a known name
    #[must_use]
    pub fn new(coordinates: Coordinates, city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        }
    }

    /// Create a location whose name could not be determined
    #[must_use]
    pub fn unnamed(coordinates: Coordinates) -> Self {
        Self::new(coordinates, UNKNOWN_PLACE, UNKNOWN_PLACE)
    }

    /// Coordinates of this location. Locations are only ever built from
    /// validated [`Coordinates`], so this does not re-check the range.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// "City, Country" label
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}
