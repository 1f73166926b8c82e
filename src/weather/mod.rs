//! Weather API client for `OpenWeatherMap`
//!
//! One request per call, no retries. Transport failures, credential
//! problems and unusable payloads map onto distinct error kinds.

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::WeatherConfig;
use crate::models::{Coordinates, CurrentConditions, DailyForecast, summarize_days};
use crate::{Result, WeatherAiError};

pub mod openweather;

/// Number of forecast days returned, starting tomorrow
pub const FORECAST_DAYS: u64 = 4;

/// 3-hour entries requested from the forecast endpoint (5 days)
const FORECAST_ENTRIES: u32 = 40;

const USER_AGENT: &str = concat!("WeatherAI/", env!("CARGO_PKG_VERSION"));

/// Where forecasts and current conditions come from
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Exactly [`FORECAST_DAYS`] daily aggregates, in date order
    async fn daily_forecast(&self, coordinates: Coordinates) -> Result<Vec<DailyForecast>>;

    /// The current observation at a point
    async fn current_conditions(&self, coordinates: Coordinates) -> Result<CurrentConditions>;
}

/// HTTP client for the `OpenWeatherMap` 2.5 API
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    /// Create a new client. A missing API key is not an error here; it is
    /// reported on every call instead.
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherAiError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        coordinates: Coordinates,
        extra_query: &str,
    ) -> Result<T> {
        let api_key = self.config.require_api_key()?;
        let url = format!(
            "{}/{endpoint}?lat={}&lon={}&appid={}&units=metric{extra_query}",
            self.config.base_url.trim_end_matches('/'),
            coordinates.latitude,
            coordinates.longitude,
            urlencoding::encode(api_key),
        );

        let start_time = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(endpoint, "Weather request failed: {}", e);
            WeatherAiError::transient(format!("request to {endpoint} failed: {e}"))
        })?;
        let response = check_status(endpoint, response)?;

        let body = response.json::<T>().await.map_err(|e| {
            warn!(endpoint, "Weather response unreadable: {}", e);
            if e.is_decode() {
                WeatherAiError::data_unavailable(format!("invalid {endpoint} response: {e}"))
            } else {
                WeatherAiError::transient(format!("reading {endpoint} response failed: {e}"))
            }
        })?;

        let elapsed = start_time.elapsed();
        debug!(endpoint, "Weather response received in {:.3}s", elapsed.as_secs_f64());
        if elapsed.as_secs() > 5 {
            warn!("Slow API response detected: {:.3}s", elapsed.as_secs_f64());
        }
        Ok(body)
    }
}

fn check_status(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!(endpoint, %status, "Weather service returned an error status");
    Err(match status {
        StatusCode::UNAUTHORIZED => {
            WeatherAiError::authentication(format!("{endpoint} rejected the API key"))
        }
        StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT => {
            WeatherAiError::transient(format!("{endpoint} returned {status}"))
        }
        s if s.is_server_error() => {
            WeatherAiError::transient(format!("{endpoint} returned {status}"))
        }
        _ => WeatherAiError::data_unavailable(format!("{endpoint} returned {status}")),
    })
}

#[async_trait]
impl ForecastSource for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn daily_forecast(&self, coordinates: Coordinates) -> Result<Vec<DailyForecast>> {
        info!("Getting {}-day forecast for {}", FORECAST_DAYS, coordinates.format());

        let response: openweather::ForecastResponse = self
            .get_json("forecast", coordinates, &format!("&cnt={FORECAST_ENTRIES}"))
            .await?;

        let offset = response.offset()?;
        let samples = response.samples()?;
        let today = Utc::now().with_timezone(&offset).date_naive();

        let days = summarize_days(&samples, offset, today, FORECAST_DAYS)?;
        debug!("Aggregated {} samples into {} days", samples.len(), days.len());
        Ok(days)
    }

    #[instrument(skip(self))]
    async fn current_conditions(&self, coordinates: Coordinates) -> Result<CurrentConditions> {
        info!("Getting current weather for {}", coordinates.format());

        let response: openweather::CurrentResponse =
            self.get_json("weather", coordinates, "").await?;
        CurrentConditions::try_from(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let config = WeatherConfig {
            api_key: None,
            // Nothing listens here; the call must not get that far
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 1,
        };
        let client = OpenWeatherClient::new(config).unwrap();
        let coords = Coordinates::new(12.97, 77.59).unwrap();

        let err = client.daily_forecast(coords).await.unwrap_err();
        assert!(matches!(err, WeatherAiError::Config { .. }));

        let err = client.current_conditions(coords).await.unwrap_err();
        assert!(matches!(err, WeatherAiError::Config { .. }));
    }

    #[tokio::test]
    async fn test_truncated_body_is_transient() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            // Promise more bytes than are sent, then hang up
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 500\r\n\r\n{\"list\": [",
                )
                .await;
            let _ = socket.shutdown().await;
        });

        let config = WeatherConfig {
            api_key: Some("test-key".to_string()),
            base_url: format!("http://{addr}"),
            timeout_seconds: 5,
        };
        let client = OpenWeatherClient::new(config).unwrap();
        let coords = Coordinates::new(12.97, 77.59).unwrap();

        let err = client.daily_forecast(coords).await.unwrap_err();
        assert!(matches!(err, WeatherAiError::TransientFetch { .. }), "{err}");
    }
}
