//! Configuration management for `WeatherAI`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::{Result, WeatherAiError};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the OpenWeatherMap credential
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Root configuration structure for the `WeatherAI` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherAiConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// IP lookup and reverse geocoding
    #[serde(default)]
    pub geolocation: GeolocationConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: Option<String>,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Geolocation collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// ipinfo-compatible lookup service
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
    /// Nominatim-compatible reverse geocoder
    #[serde(default = "default_reverse_geocode_url")]
    pub reverse_geocode_url: String,
    /// Name explicit coordinates through the reverse geocoder
    #[serde(default = "default_true")]
    pub reverse_geocode: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the dashboard page
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_ip_lookup_url() -> String {
    "https://ipinfo.io".to_string()
}

fn default_reverse_geocode_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            ip_lookup_url: default_ip_lookup_url(),
            reverse_geocode_url: default_reverse_geocode_url(),
            reverse_geocode: true,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WeatherConfig {
    /// The configured credential, or a configuration error naming the variable
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                WeatherAiError::config(format!("API key not configured (set {API_KEY_ENV})"))
            })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl GeolocationConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl ServerConfig {
    /// `host:port` string for binding
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl WeatherAiConfig {
    /// Load configuration from an explicit file, or from the default
    /// location when none is given, then apply environment overrides.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(WeatherAiError::config(format!(
                        "Configuration file {} does not exist",
                        path.display()
                    )));
                }
                path
            }
            None => Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml")),
        };

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(true)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. WEATHERAI_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("WEATHERAI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build().map_err(|e| {
            WeatherAiError::config(format!(
                "Failed to read configuration from {}: {e}",
                config_file.display()
            ))
        })?;

        let mut config: WeatherAiConfig = settings
            .try_deserialize()
            .map_err(|e| WeatherAiError::config(format!("Failed to deserialize configuration: {e}")))?;

        if config.weather.api_key.is_none() {
            config.weather.api_key = env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty());
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weatherai").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.geolocation.ip_lookup_url.is_empty() {
            self.geolocation.ip_lookup_url = default_ip_lookup_url();
        }
        if self.geolocation.reverse_geocode_url.is_empty() {
            self.geolocation.reverse_geocode_url = default_reverse_geocode_url();
        }
        if self.geolocation.timeout_seconds == 0 {
            self.geolocation.timeout_seconds = default_timeout();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// A present key must look like a key. Absence is allowed here and is
    /// reported when the forecast path is used.
    pub fn validate_api_key(&self) -> Result<()> {
        if let Some(api_key) = &self.weather.api_key {
            if api_key.trim().is_empty() {
                return Err(WeatherAiError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                ));
            }
            if api_key.len() > 100 {
                return Err(WeatherAiError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key.",
                ));
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(WeatherAiError::config(
                "Weather API timeout cannot exceed 300 seconds",
            ));
        }
        if self.geolocation.timeout_seconds > 300 {
            return Err(WeatherAiError::config(
                "Geolocation timeout cannot exceed 300 seconds",
            ));
        }
        if self.server.port == 0 {
            return Err(WeatherAiError::config("Server port cannot be 0"));
        }
        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherAiError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherAiError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("weather.base_url", &self.weather.base_url),
            ("geolocation.ip_lookup_url", &self.geolocation.ip_lookup_url),
            ("geolocation.reverse_geocode_url", &self.geolocation.reverse_geocode_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherAiError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }
}
