//! Rain Forecast Module
//!
//! Runs the request pipeline: resolve the location, fetch the weather and
//! evaluate the fitted estimators. Each call is independent; the only
//! shared state is the read-only [`Estimators`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::Result;
use crate::estimator::{Estimators, FeelsLikePrediction, RainPrediction};
use crate::location_resolver::LocationResolver;
use crate::models::{Coordinates, CurrentConditions, DailyForecast, Location};
use crate::weather::ForecastSource;

/// One forecast day with its rain estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOutlook {
    pub forecast: DailyForecast,
    pub prediction: RainPrediction,
}

/// Multi-day rain forecast for a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    pub location: Location,
    /// Days in increasing date order, starting tomorrow
    pub days: Vec<DayOutlook>,
    /// When this forecast was generated
    pub generated_at: DateTime<Utc>,
}

/// Current conditions with the feels-like estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentReport {
    pub location: Location,
    pub conditions: CurrentConditions,
    pub prediction: FeelsLikePrediction,
}

/// Rain forecast service
#[derive(Clone)]
pub struct RainForecastService {
    resolver: LocationResolver,
    source: Arc<dyn ForecastSource>,
    estimators: Arc<Estimators>,
}

impl RainForecastService {
    #[must_use]
    pub fn new(
        resolver: LocationResolver,
        source: Arc<dyn ForecastSource>,
        estimators: Arc<Estimators>,
    ) -> Self {
        Self {
            resolver,
            source,
            estimators,
        }
    }

    /// Fitted models used by this service
    #[must_use]
    pub fn estimators(&self) -> &Estimators {
        &self.estimators
    }

    /// Location of the caller as seen by the IP lookup
    pub async fn locate(&self) -> Result<Location> {
        self.resolver.resolve_by_ip().await
    }

    /// Generate the multi-day rain forecast. Either every day is present or
    /// the whole call fails.
    #[instrument(skip(self))]
    pub async fn forecast(&self, coordinates: Option<Coordinates>) -> Result<ForecastReport> {
        let location = self.resolver.resolve(coordinates).await?;
        info!("Generating rain forecast for {}", location.label());

        let days = self
            .source
            .daily_forecast(location.coordinates())
            .await?
            .into_iter()
            .map(|forecast| {
                let prediction = self.estimators.predict_rain(&forecast);
                debug!(
                    date = %forecast.date,
                    probability = prediction.rain_probability,
                    "Rain estimate"
                );
                DayOutlook {
                    forecast,
                    prediction,
                }
            })
            .collect();

        Ok(ForecastReport {
            location,
            days,
            generated_at: Utc::now(),
        })
    }

    /// Current conditions plus the feels-like estimate
    #[instrument(skip(self))]
    pub async fn current(&self, coordinates: Option<Coordinates>) -> Result<CurrentReport> {
        let location = self.resolver.resolve(coordinates).await?;
        let conditions = self
            .source
            .current_conditions(location.coordinates())
            .await?;
        let prediction = self.estimators.predict_feels_like(&conditions);

        Ok(CurrentReport {
            location,
            conditions,
            prediction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WeatherAiError;
    use crate::geolocation::GeoLocator;
    use async_trait::async_trait;
    use chrono::{Days, NaiveDate};
    use std::sync::Mutex;

    struct FixedLocator;

    #[async_trait]
    impl GeoLocator for FixedLocator {
        async fn locate_by_ip(&self) -> Result<Location> {
            Ok(Location::new(
                Coordinates::new(12.97, 77.59).unwrap(),
                "Bengaluru",
                "IN",
            ))
        }

        async fn place_name(&self, _coordinates: Coordinates) -> Result<Option<(String, String)>> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct FakeSource {
        requested: Mutex<Vec<Coordinates>>,
        fail: bool,
    }

    fn day(offset: u64, humidity: f64) -> DailyForecast {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap();
        DailyForecast {
            date,
            day: date.format("%A").to_string(),
            min_temp: 18.0,
            avg_temp: 22.0,
            max_temp: 26.0,
            humidity,
            cloud_cover: 50.0,
            wind_speed: 4.0,
            pressure: 1010.0,
            condition: "Clouds".into(),
            icon: "04d".into(),
        }
    }

    #[async_trait]
    impl ForecastSource for FakeSource {
        async fn daily_forecast(&self, coordinates: Coordinates) -> Result<Vec<DailyForecast>> {
            self.requested.lock().unwrap().push(coordinates);
            if self.fail {
                return Err(WeatherAiError::data_unavailable("day 3 missing"));
            }
            Ok((1..=4).map(|i| day(i, 40.0 + 10.0 * i as f64)).collect())
        }

        async fn current_conditions(&self, _coordinates: Coordinates) -> Result<CurrentConditions> {
            Ok(CurrentConditions {
                city: "Bengaluru".into(),
                country: "IN".into(),
                temperature: 20.0,
                feels_like: 19.5,
                humidity: 50.0,
                wind_speed: 3.0,
                pressure: 1012.0,
                description: "Clear Sky".into(),
            })
        }
    }

    fn service(source: Arc<FakeSource>) -> RainForecastService {
        RainForecastService::new(
            LocationResolver::new(Arc::new(FixedLocator), false),
            source,
            Arc::new(Estimators::train().unwrap()),
        )
    }

    #[tokio::test]
    async fn test_forecast_predicts_every_day() {
        let source = Arc::new(FakeSource::default());
        let service = service(source.clone());

        let report = service.forecast(None).await.unwrap();
        assert_eq!(report.location.city, "Bengaluru");
        assert_eq!(report.days.len(), 4);
        for outlook in &report.days {
            assert_eq!(
                outlook.prediction,
                service.estimators().predict_rain(&outlook.forecast)
            );
        }
        assert!(report
            .days
            .windows(2)
            .all(|w| w[0].forecast.date < w[1].forecast.date));
    }

    #[tokio::test]
    async fn test_forecast_fetches_explicit_coordinates() {
        let source = Arc::new(FakeSource::default());
        let service = service(source.clone());
        let coords = Coordinates::new(-33.87, 151.21).unwrap();

        let report = service.forecast(Some(coords)).await.unwrap();
        assert_eq!(report.location.coordinates(), coords);
        assert_eq!(*source.requested.lock().unwrap(), vec![coords]);
    }

    #[tokio::test]
    async fn test_forecast_failure_returns_no_partial_result() {
        let source = Arc::new(FakeSource {
            fail: true,
            ..Default::default()
        });
        let err = service(source).forecast(None).await.unwrap_err();
        assert!(matches!(err, WeatherAiError::DataUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_current_report() {
        let service = service(Arc::new(FakeSource::default()));
        let report = service.current(None).await.unwrap();

        // 20 * 0.9 + 0.5 * 3
        assert!((report.prediction.feels_like - 19.5).abs() < 1e-6);
        assert!(report.prediction.difference.abs() < 1e-6);
        assert_eq!(report.conditions.description, "Clear Sky");
    }
}
