//! `OpenWeatherMap` API response structures and conversion utilities

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

use crate::models::weather::title_case;
use crate::models::{CurrentConditions, ForecastSample};
use crate::{Result, WeatherAiError};

/// 5-day / 3-hour forecast response
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastItem>,
    pub city: Option<CityInfo>,
}

/// City block of the forecast response
#[derive(Debug, Deserialize)]
pub struct CityInfo {
    pub name: Option<String>,
    pub country: Option<String>,
    /// Shift from UTC in seconds
    pub timezone: Option<i32>,
}

/// One 3-hourly entry of the forecast
#[derive(Debug, Deserialize)]
pub struct ForecastItem {
    /// Unix timestamp, UTC
    pub dt: i64,
    pub main: MainBlock,
    pub weather: Vec<ConditionBlock>,
    pub clouds: CloudsBlock,
    pub wind: WindBlock,
}

#[derive(Debug, Deserialize)]
pub struct MainBlock {
    pub temp: f64,
    pub feels_like: Option<f64>,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub struct ConditionBlock {
    /// Group label, e.g. "Rain"
    pub main: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CloudsBlock {
    pub all: f64,
}

#[derive(Debug, Deserialize)]
pub struct WindBlock {
    pub speed: f64,
}

/// Current weather response
#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub name: Option<String>,
    pub main: MainBlock,
    pub weather: Vec<ConditionBlock>,
    pub wind: WindBlock,
    pub sys: Option<SysBlock>,
}

#[derive(Debug, Deserialize)]
pub struct SysBlock {
    pub country: Option<String>,
}

impl ForecastResponse {
    /// UTC offset of the forecast location; UTC when the response omits it
    pub fn offset(&self) -> Result<FixedOffset> {
        let seconds = self.city.as_ref().and_then(|c| c.timezone).unwrap_or(0);
        FixedOffset::east_opt(seconds).ok_or_else(|| {
            WeatherAiError::data_unavailable(format!("invalid timezone offset {seconds}"))
        })
    }

    /// Convert every entry, failing on the first incomplete one
    pub fn samples(&self) -> Result<Vec<ForecastSample>> {
        self.list.iter().map(ForecastItem::to_sample).collect()
    }
}

impl ForecastItem {
    fn to_sample(&self) -> Result<ForecastSample> {
        let timestamp = DateTime::<Utc>::from_timestamp(self.dt, 0).ok_or_else(|| {
            WeatherAiError::data_unavailable(format!("invalid forecast timestamp {}", self.dt))
        })?;
        let condition = self.weather.first().ok_or_else(|| {
            WeatherAiError::data_unavailable(format!("forecast entry {} has no condition", self.dt))
        })?;

        Ok(ForecastSample {
            timestamp,
            temperature: self.main.temp,
            humidity: self.main.humidity,
            cloud_cover: self.clouds.all,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            condition: condition.main.clone(),
            icon: condition.icon.clone().unwrap_or_default(),
        })
    }
}

impl TryFrom<CurrentResponse> for CurrentConditions {
    type Error = WeatherAiError;

    fn try_from(response: CurrentResponse) -> Result<Self> {
        let condition = response
            .weather
            .first()
            .ok_or_else(|| WeatherAiError::data_unavailable("current weather has no condition"))?;
        let description = condition
            .description
            .as_deref()
            .map_or_else(|| condition.main.clone(), title_case);

        Ok(Self {
            city: response.name.unwrap_or_default(),
            country: response.sys.and_then(|s| s.country).unwrap_or_default(),
            temperature: response.main.temp,
            feels_like: response.main.feels_like.unwrap_or(response.main.temp),
            humidity: response.main.humidity,
            wind_speed: response.wind.speed,
            pressure: response.main.pressure,
            description,
        })
    }
}
