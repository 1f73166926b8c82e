//! Current weather observation used by the feels-like report

use serde::{Deserialize, Serialize};

/// Current conditions at a location as reported by the weather service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Station or city name reported upstream
    pub city: String,
    /// Country code (ISO 3166-1 alpha-2), empty when unknown
    pub country: String,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Upstream "feels like" temperature in Celsius
    pub feels_like: f64,
    /// Relative humidity (0-100)
    pub humidity: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Human-readable description, title-cased
    pub description: String,
}

impl CurrentConditions {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.2}°C", self.temperature)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.2} m/s", self.wind_speed)
    }

    /// Format atmospheric pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        format!("{:.0} hPa", self.pressure)
    }
}

/// Capitalize the first letter of every word ("light rain" -> "Light Rain")
#[must_use]
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
