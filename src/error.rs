//! Error types and handling for the `WeatherAI` service

use thiserror::Error;

/// Main error type for the `WeatherAI` application
#[derive(Error, Debug)]
pub enum WeatherAiError {
    /// Configuration-related errors, including a missing API credential
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The IP geolocation collaborator gave no usable position
    #[error("Location unavailable: {message}")]
    LocationUnavailable { message: String },

    /// The weather collaborator rejected our credential
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Network failure, timeout or a temporarily failing upstream
    #[error("Transient fetch failure: {message}")]
    TransientFetch { message: String },

    /// Upstream answered but the payload was unusable or incomplete
    #[error("Data unavailable: {message}")]
    DataUnavailable { message: String },

    /// Caller-supplied coordinates are missing, malformed or out of range
    #[error("Invalid coordinates: {message}")]
    InvalidCoordinates { message: String },

    /// Fitting a regression model failed
    #[error("Model error: {message}")]
    Model { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WeatherAiError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new location error
    pub fn location_unavailable<S: Into<String>>(message: S) -> Self {
        Self::LocationUnavailable {
            message: message.into(),
        }
    }

    /// Create a new authentication error
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a new transient fetch error
    pub fn transient<S: Into<String>>(message: S) -> Self {
        Self::TransientFetch {
            message: message.into(),
        }
    }

    /// Create a new data error
    pub fn data_unavailable<S: Into<String>>(message: S) -> Self {
        Self::DataUnavailable {
            message: message.into(),
        }
    }

    /// Create a new coordinate validation error
    pub fn invalid_coordinates<S: Into<String>>(message: S) -> Self {
        Self::InvalidCoordinates {
            message: message.into(),
        }
    }

    /// Create a new model error
    pub fn model<S: Into<String>>(message: S) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    /// Stable machine-readable code, surfaced as `kind` in API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            WeatherAiError::Config { .. } => "configuration",
            WeatherAiError::LocationUnavailable { .. } => "location_unavailable",
            WeatherAiError::Authentication { .. } => "authentication_failure",
            WeatherAiError::TransientFetch { .. } => "transient_fetch_failure",
            WeatherAiError::DataUnavailable { .. } => "data_unavailable",
            WeatherAiError::InvalidCoordinates { .. } => "invalid_coordinates",
            WeatherAiError::Model { .. } => "model",
            WeatherAiError::Io { .. } => "io",
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherAiError::Config { message } => format!("Configuration error: {message}"),
            WeatherAiError::LocationUnavailable { .. } => "Could not detect location".to_string(),
            WeatherAiError::Authentication { .. } => {
                "Weather service rejected the API key. Please check OPENWEATHER_API_KEY."
                    .to_string()
            }
            WeatherAiError::TransientFetch { .. } => {
                "Unable to reach the weather service. Please try again later.".to_string()
            }
            WeatherAiError::DataUnavailable { .. } => "Could not fetch forecast".to_string(),
            WeatherAiError::InvalidCoordinates { message } => {
                format!("Invalid coordinates: {message}")
            }
            WeatherAiError::Model { .. } => "Prediction model is unavailable".to_string(),
            WeatherAiError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
