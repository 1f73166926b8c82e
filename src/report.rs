//! Plain-text reports for the command line

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::rain_forecast::{CurrentReport, ForecastReport};

const RULE_WIDTH: usize = 75;

fn rule(out: &mut String) {
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
}

/// Direction marker for the feels-like difference
fn trend(difference: f64) -> &'static str {
    if difference > 0.0 {
        "[UP]"
    } else if difference < 0.0 {
        "[DOWN]"
    } else {
        "[SAME]"
    }
}

/// Current conditions and the feels-like estimate
#[must_use]
pub fn render_current(report: &CurrentReport, now: DateTime<Utc>) -> String {
    let weather = &report.conditions;
    let place = if weather.city.is_empty() {
        report.location.label()
    } else {
        format!("{}, {}", weather.city, weather.country)
    };

    let mut out = String::new();
    rule(&mut out);
    let _ = writeln!(out, "WEATHER REPORT");
    rule(&mut out);
    let _ = writeln!(out, "[*] Location: {}", place.to_uppercase());
    let _ = writeln!(out, "[*] Time: {}", now.format("%Y-%m-%d %H:%M:%S UTC"));

    let _ = writeln!(out, "\n[---] CURRENT WEATHER CONDITIONS [---]");
    let _ = writeln!(out, "| [TEMP]      {}", weather.format_temperature());
    let _ = writeln!(out, "| [FEELS]     {:.2}°C", weather.feels_like);
    let _ = writeln!(out, "| [WIND]      {}", weather.format_wind());
    let _ = writeln!(out, "| [HUMIDITY]  {:.0}%", weather.humidity);
    let _ = writeln!(out, "| [PRESSURE]  {}", weather.format_pressure());
    let _ = writeln!(out, "| [CONDITION] {}", weather.description);

    let prediction = &report.prediction;
    let _ = writeln!(out, "\n[---] MODEL PREDICTION [---]");
    let _ = writeln!(out, "| [PREDICTED]  {:.2}°C", prediction.feels_like);
    let _ = writeln!(
        out,
        "| [DIFFERENCE] {} {:+.2}°C",
        trend(prediction.difference),
        prediction.difference
    );
    let _ = writeln!(
        out,
        "| Based on humidity ({:.0}%) and temperature ({:.2}°C)",
        weather.humidity, weather.temperature
    );
    rule(&mut out);
    out
}

/// Four-day rain table
#[must_use]
pub fn render_forecast(report: &ForecastReport) -> String {
    let mut out = String::new();
    rule(&mut out);
    let _ = writeln!(
        out,
        "RAIN FORECAST: {} ({:.2}°, {:.2}°)",
        report.location.label(),
        report.location.latitude,
        report.location.longitude
    );
    rule(&mut out);
    let _ = writeln!(
        out,
        "{:<10} {:<10} {:>14} {:>6} {:>6} {:>6} {:<12} {:>6}",
        "Date", "Day", "Temp (°C)", "Hum%", "Cloud%", "hPa", "Condition", "Rain%"
    );

    for outlook in &report.days {
        let day = &outlook.forecast;
        let rain = &outlook.prediction;
        let _ = writeln!(
            out,
            "{:<10} {:<10} {:>14} {:>6.0} {:>6.0} {:>6.0} {:<12} {:>5.1}{}",
            day.date.format("%Y-%m-%d"),
            day.day,
            format!("{:.1} / {:.1}", day.min_temp, day.max_temp),
            day.humidity.trunc(),
            day.cloud_cover.trunc(),
            day.pressure,
            day.condition,
            rain.rain_probability,
            if rain.will_rain { " RAIN" } else { "" }
        );
    }
    rule(&mut out);
    out
}
