//! `WeatherAI` - Rain probability and feels-like estimates
//!
//! This library resolves where the caller is, fetches a 4-day forecast from
//! `OpenWeatherMap` and evaluates two small regression models on it. The
//! results are served as JSON over HTTP or printed by the CLI.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod estimator;
pub mod geolocation;
pub mod location_resolver;
pub mod models;
pub mod rain_forecast;
pub mod report;
pub mod telemetry;
pub mod weather;
pub mod web;

use std::sync::Arc;

// Re-export core types for public API
pub use config::WeatherAiConfig;
pub use error::WeatherAiError;
pub use estimator::{Estimators, FeelsLikePrediction, RainPrediction};
pub use geolocation::{GeoLocator, HttpGeoLocator};
pub use location_resolver::LocationResolver;
pub use models::{Coordinates, CurrentConditions, DailyForecast, Location};
pub use rain_forecast::{CurrentReport, DayOutlook, ForecastReport, RainForecastService};
pub use weather::{ForecastSource, OpenWeatherClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherAiError>;

/// Wire the HTTP collaborators from configuration and fit the models
pub fn build_service(config: &WeatherAiConfig) -> Result<RainForecastService> {
    let locator = HttpGeoLocator::new(&config.geolocation)?;
    let resolver = LocationResolver::new(Arc::new(locator), config.geolocation.reverse_geocode);
    let source = OpenWeatherClient::new(config.weather.clone())?;
    let estimators = Estimators::train()?;

    Ok(RainForecastService::new(
        resolver,
        Arc::new(source),
        Arc::new(estimators),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_build_service_without_api_key() {
        let config = WeatherAiConfig::default();
        assert!(build_service(&config).is_ok());
    }
}
