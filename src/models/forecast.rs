//! Daily forecast model and the day-bucketing of raw samples

use std::collections::BTreeMap;

use chrono::{DateTime, Days, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, WeatherAiError};

/// One raw point of the weather collaborator's 3-hourly series
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity (0-100)
    pub humidity: f64,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: f64,
    /// Sea-level pressure in hPa
    pub pressure: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Short condition label, e.g. "Rain"
    pub condition: String,
    /// Upstream icon code, e.g. "10d"
    pub icon: String,
}

/// Aggregated weather for one calendar day.
///
/// Means are kept unrounded; rounding is a presentation concern.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Weekday name, e.g. "Saturday"
    pub day: String,
    pub min_temp: f64,
    pub avg_temp: f64,
    pub max_temp: f64,
    pub humidity: f64,
    pub cloud_cover: f64,
    pub wind_speed: f64,
    pub pressure: f64,
    /// Most frequent condition label of the day
    pub condition: String,
    /// Icon of the first sample of the day
    pub icon: String,
}

impl DailyForecast {
    /// Aggregate the samples of one day. Returns `None` for an empty bucket.
    #[must_use]
    pub fn from_samples(date: NaiveDate, samples: &[&ForecastSample]) -> Option<Self> {
        let first = samples.first()?;
        let count = samples.len() as f64;
        let mean = |field: fn(&ForecastSample) -> f64| {
            samples.iter().map(|s| field(s)).sum::<f64>() / count
        };

        let min_temp = samples
            .iter()
            .map(|s| s.temperature)
            .fold(f64::INFINITY, f64::min);
        let max_temp = samples
            .iter()
            .map(|s| s.temperature)
            .fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            date,
            day: date.format("%A").to_string(),
            min_temp,
            avg_temp: mean(|s| s.temperature),
            max_temp,
            humidity: mean(|s| s.humidity),
            cloud_cover: mean(|s| s.cloud_cover),
            wind_speed: mean(|s| s.wind_speed),
            pressure: mean(|s| s.pressure),
            condition: dominant_condition(samples),
            icon: first.icon.clone(),
        })
    }
}

/// Most frequent label; ties go to the one seen first.
fn dominant_condition(samples: &[&ForecastSample]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for sample in samples {
        match counts.iter_mut().find(|(label, _)| *label == sample.condition) {
            Some((_, n)) => *n += 1,
            None => counts.push((sample.condition.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((label, n));
        }
    }
    best.map(|(label, _)| label.to_string()).unwrap_or_default()
}

/// Bucket samples by local calendar date and summarize the `days` days
/// following `today`.
///
/// All-or-nothing: if any of the target days has no samples the whole call
/// fails with `DataUnavailable`.
pub fn summarize_days(
    samples: &[ForecastSample],
    offset: FixedOffset,
    today: NaiveDate,
    days: u64,
) -> Result<Vec<DailyForecast>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        let local_date = sample.timestamp.with_timezone(&offset).date_naive();
        buckets.entry(local_date).or_default().push(sample);
    }

    (1..=days)
        .map(|offset_days| {
            let date = today
                .checked_add_days(Days::new(offset_days))
                .ok_or_else(|| WeatherAiError::data_unavailable("forecast date overflow"))?;
            buckets
                .get(&date)
                .and_then(|bucket| DailyForecast::from_samples(date, bucket))
                .ok_or_else(|| {
                    WeatherAiError::data_unavailable(format!("no forecast samples for {date}"))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(timestamp: DateTime<Utc>, temperature: f64, condition: &str) -> ForecastSample {
        ForecastSample {
            timestamp,
            temperature,
            humidity: 60.0,
            cloud_cover: 40.0,
            pressure: 1012.0,
            wind_speed: 3.0,
            condition: condition.to_string(),
            icon: format!("{condition}-icon"),
        }
    }

    fn series(start: DateTime<Utc>, days: i64) -> Vec<ForecastSample> {
        (0..days * 8)
            .map(|i| {
                sample(
                    start + chrono::Duration::hours(3 * i),
                    10.0 + (i % 8) as f64,
                    "Clouds",
                )
            })
            .collect()
    }

    #[test]
    fn test_summarize_returns_requested_days_in_order() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let days = summarize_days(&series(start, 6), FixedOffset::east_opt(0).unwrap(), today, 4)
            .unwrap();

        assert_eq!(days.len(), 4);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert!(days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(days[0].day, "Sunday");
        assert_eq!(days[0].min_temp, 10.0);
        assert_eq!(days[0].max_temp, 17.0);
        assert_eq!(days[0].avg_temp, 13.5);
    }

    #[test]
    fn test_summarize_uses_local_dates() {
        // 20:00 UTC on the 1st is already the 2nd at UTC+05:30
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 20, 0, 0).unwrap();
        let offset = FixedOffset::east_opt(19_800).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let result = summarize_days(&[sample(ts, 20.0, "Rain")], offset, today, 1).unwrap();
        assert_eq!(result[0].date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn test_summarize_missing_day_is_data_unavailable() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let err = summarize_days(&series(start, 3), FixedOffset::east_opt(0).unwrap(), today, 4)
            .unwrap_err();
        assert!(matches!(err, WeatherAiError::DataUnavailable { .. }));
    }

    #[test]
    fn test_dominant_condition_prefers_first_on_tie() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        let a = sample(ts, 1.0, "Rain");
        let b = sample(ts, 1.0, "Clear");
        let c = sample(ts, 1.0, "Clear");
        let d = sample(ts, 1.0, "Rain");

        assert_eq!(dominant_condition(&[&a, &b, &c, &d]), "Rain");
        assert_eq!(dominant_condition(&[&a, &b, &c]), "Clear");
    }

    #[test]
    fn test_from_samples_empty_bucket() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        assert!(DailyForecast::from_samples(date, &[]).is_none());
    }

    #[test]
    fn test_from_samples_icon_is_first() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        let a = sample(ts, 1.0, "Snow");
        let b = sample(ts, 1.0, "Clear");
        let b2 = sample(ts, 1.0, "Clear");
        let day = DailyForecast::from_samples(ts.date_naive(), &[&a, &b, &b2]).unwrap();
        assert_eq!(day.icon, "Snow-icon");
        assert_eq!(day.condition, "Clear");
    }
}
