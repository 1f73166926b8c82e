use std::sync::Arc;

use axum::{
    Router,
    extract::{OriginalUri, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::estimator::round_to;
use crate::models::{Coordinates, Location};
use crate::rain_forecast::{DayOutlook, ForecastReport, RainForecastService};
use crate::{VERSION, WeatherAiError};

const SERVICE_NAME: &str = "WeatherAI";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RainForecastService>,
}

impl AppState {
    #[must_use]
    pub fn new(service: RainForecastService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthPayload {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationPayload {
    pub success: bool,
    pub location: Location,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub success: bool,
    pub location: Location,
    pub forecast: Vec<ForecastDayPayload>,
    pub timestamp: DateTime<Utc>,
}

/// One forecast day as presented to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDayPayload {
    pub date: NaiveDate,
    pub day: String,
    pub min_temp: f64,
    pub avg_temp: f64,
    pub max_temp: f64,
    pub humidity: i64,
    pub cloud_cover: i64,
    pub wind_speed: f64,
    pub pressure: i64,
    pub condition: String,
    pub icon: String,
    pub rain_probability: f64,
    pub will_rain: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub success: bool,
    pub error: String,
    pub kind: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotFoundPayload {
    pub success: bool,
    pub error: String,
    pub path: String,
}

impl From<ForecastReport> for ForecastPayload {
    fn from(report: ForecastReport) -> Self {
        Self {
            success: true,
            forecast: report.days.iter().map(ForecastDayPayload::from).collect(),
            location: report.location,
            timestamp: report.generated_at,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
impl From<&DayOutlook> for ForecastDayPayload {
    fn from(outlook: &DayOutlook) -> Self {
        let day = &outlook.forecast;
        Self {
            date: day.date,
            day: day.day.clone(),
            min_temp: round_to(day.min_temp, 1),
            avg_temp: round_to(day.avg_temp, 1),
            max_temp: round_to(day.max_temp, 1),
            humidity: day.humidity.trunc() as i64,
            cloud_cover: day.cloud_cover.trunc() as i64,
            wind_speed: round_to(day.wind_speed, 1),
            pressure: day.pressure.round() as i64,
            condition: day.condition.clone(),
            icon: day.icon.clone(),
            rain_probability: outlook.prediction.rain_probability,
            will_rain: outlook.prediction.will_rain,
        }
    }
}

/// Query string of the forecast endpoint. Values stay raw so that a
/// non-numeric coordinate is reported like any other invalid coordinate.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

/// Error wrapper turning [`WeatherAiError`] into a JSON response
#[derive(Debug)]
pub struct ApiError(pub WeatherAiError);

impl From<WeatherAiError> for ApiError {
    fn from(err: WeatherAiError) -> Self {
        Self(err)
    }
}

/// HTTP status for each error kind
#[must_use]
pub fn status_for(err: &WeatherAiError) -> StatusCode {
    match err {
        WeatherAiError::InvalidCoordinates { .. } | WeatherAiError::LocationUnavailable { .. } => {
            StatusCode::BAD_REQUEST
        }
        WeatherAiError::Authentication { .. } | WeatherAiError::DataUnavailable { .. } => {
            StatusCode::BAD_GATEWAY
        }
        WeatherAiError::TransientFetch { .. } => StatusCode::SERVICE_UNAVAILABLE,
        WeatherAiError::Config { .. } | WeatherAiError::Model { .. } | WeatherAiError::Io { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            error!(kind = self.0.code(), "Request failed: {}", self.0);
        } else {
            warn!(kind = self.0.code(), "Request rejected: {}", self.0);
        }

        let payload = ErrorPayload {
            success: false,
            error: self.0.user_message(),
            kind: self.0.code().to_string(),
        };
        (status, Json(payload)).into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/location", get(get_location))
        .route("/forecast", get(get_forecast))
        .fallback(not_found)
}

async fn health() -> Json<HealthPayload> {
    Json(HealthPayload {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: VERSION.to_string(),
        timestamp: Utc::now(),
    })
}

async fn get_location(State(state): State<AppState>) -> Result<Json<LocationPayload>, ApiError> {
    let location = state.service.locate().await?;
    Ok(Json(LocationPayload {
        success: true,
        location,
        timestamp: Utc::now(),
    }))
}

async fn get_forecast(
    State(state): State<AppState>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<ForecastPayload>, ApiError> {
    let Query(query) = query.map_err(|e| WeatherAiError::invalid_coordinates(e.body_text()))?;
    let coordinates = Coordinates::from_query(query.lat.as_deref(), query.lng.as_deref())?;
    let report = state.service.forecast(coordinates).await?;

    Ok(Json(ForecastPayload::from(report)))
}

async fn not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<NotFoundPayload>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundPayload {
            success: false,
            error: "Endpoint not found".to_string(),
            path: uri.path().to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::RainPrediction;
    use crate::models::DailyForecast;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (WeatherAiError::invalid_coordinates("x"), 400),
            (WeatherAiError::location_unavailable("x"), 400),
            (WeatherAiError::config("x"), 500),
            (WeatherAiError::authentication("x"), 502),
            (WeatherAiError::data_unavailable("x"), 502),
            (WeatherAiError::transient("x"), 503),
            (WeatherAiError::model("x"), 500),
        ];
        for (err, expected) in cases {
            assert_eq!(status_for(&err).as_u16(), expected, "{err}");
        }
    }

    #[test]
    fn test_day_payload_rounding() {
        let outlook = DayOutlook {
            forecast: DailyForecast {
                date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                day: "Sunday".into(),
                min_temp: 18.04,
                avg_temp: 21.456,
                max_temp: 25.96,
                humidity: 71.875,
                cloud_cover: 64.5,
                wind_speed: 3.449,
                pressure: 1011.625,
                condition: "Rain".into(),
                icon: "10d".into(),
            },
            prediction: RainPrediction {
                rain_probability: 61.3,
                will_rain: true,
            },
        };

        let payload = ForecastDayPayload::from(&outlook);
        assert_eq!(payload.min_temp, 18.0);
        assert_eq!(payload.avg_temp, 21.5);
        assert_eq!(payload.max_temp, 26.0);
        assert_eq!(payload.humidity, 71);
        assert_eq!(payload.cloud_cover, 64);
        assert_eq!(payload.wind_speed, 3.4);
        assert_eq!(payload.pressure, 1012);
        assert!(payload.will_rain);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["date"], "2025-03-02");
        assert_eq!(json["rain_probability"], 61.3);
    }

    #[test]
    fn test_error_payload_shape() {
        let payload = ErrorPayload {
            success: false,
            error: WeatherAiError::location_unavailable("x").user_message(),
            kind: "location_unavailable".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Could not detect location");
    }
}
