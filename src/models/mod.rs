//! Data models for the WeatherAI application
//!
//! This module contains the core domain models organized by concern:
//! - Location: validated coordinates and resolved place names
//! - Forecast: raw samples and their daily aggregates
//! - Weather: current conditions for the feels-like report

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{DailyForecast, ForecastSample, summarize_days};
pub use location::{Coordinates, Location, UNKNOWN_PLACE};
pub use weather::CurrentConditions;
