//! Fixed synthetic training sets.
//!
//! These are fabricated samples that encode the intuitive relationships
//! (humid, cloudy, low-pressure days rain; humid days feel warmer). They are
//! not observations and are never extended at runtime.

/// `[humidity %, cloud cover %, pressure hPa, wind m/s]`
pub const RAIN_INPUTS: [[f64; 4]; 10] = [
    [80.0, 90.0, 1005.0, 5.0],
    [75.0, 85.0, 1008.0, 4.0],
    [70.0, 75.0, 1010.0, 3.0],
    [30.0, 20.0, 1020.0, 2.0],
    [25.0, 15.0, 1022.0, 1.0],
    [35.0, 25.0, 1018.0, 2.0],
    [85.0, 95.0, 1000.0, 6.0],
    [20.0, 10.0, 1025.0, 1.0],
    [65.0, 60.0, 1012.0, 3.0],
    [90.0, 100.0, 995.0, 8.0],
];

/// Whether it rained for the matching row of [`RAIN_INPUTS`]
pub const RAIN_LABELS: [bool; 10] = [
    true, true, true, false, false, false, true, false, true, true,
];

pub const FEELS_LIKE_HUMIDITY: [f64; 14] = [
    30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 35.0, 45.0, 55.0, 65.0, 75.0, 85.0, 95.0,
];

pub const FEELS_LIKE_TEMPERATURE: [f64; 14] = [
    15.0, 18.0, 20.0, 22.0, 25.0, 28.0, 30.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0,
];

/// Reference relationship used to label the feels-like samples
#[must_use]
pub fn reference_feels_like(humidity: f64, temperature: f64) -> f64 {
    temperature * 0.9 + (humidity / 100.0) * 3.0
}

/// `(humidity, temperature)` pairs and their labels
#[must_use]
pub fn feels_like_samples() -> (Vec<(f64, f64)>, Vec<f64>) {
    FEELS_LIKE_HUMIDITY
        .iter()
        .zip(FEELS_LIKE_TEMPERATURE.iter())
        .map(|(&h, &t)| ((h, t), reference_feels_like(h, t)))
        .unzip()
}
