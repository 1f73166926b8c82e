//! Logistic rain model
//!
//! Fit by projected gradient descent on standardized features with an L2
//! penalty. After every step the humidity and cloud-cover weights are clamped
//! to be non-negative and the pressure weight non-positive, so the fitted
//! model can never predict less rain for a more humid, cloudier or
//! lower-pressure day.

use nalgebra::{DMatrix, DVector, SVector};
use serde::{Deserialize, Serialize};

use super::{RAIN_THRESHOLD, RainPrediction, round_to};
use crate::models::DailyForecast;
use crate::{Result, WeatherAiError};

const FEATURES: usize = 4;
const LEARNING_RATE: f64 = 0.5;
const ITERATIONS: usize = 5_000;
const L2_PENALTY: f64 = 0.1;
const MIN_SCALE: f64 = 1e-9;

type FeatureVector = SVector<f64, FEATURES>;

/// Required direction of each feature's effect on the rain probability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Increasing,
    Decreasing,
    Free,
}

/// humidity, cloud cover, pressure, wind speed
const DIRECTIONS: [Direction; FEATURES] = [
    Direction::Increasing,
    Direction::Increasing,
    Direction::Decreasing,
    Direction::Free,
];

/// The inputs the rain model looks at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainFeatures {
    pub humidity: f64,
    pub cloud_cover: f64,
    pub pressure: f64,
    pub wind_speed: f64,
}

impl RainFeatures {
    fn to_vector(self) -> FeatureVector {
        FeatureVector::new(self.humidity, self.cloud_cover, self.pressure, self.wind_speed)
    }
}

impl From<&DailyForecast> for RainFeatures {
    fn from(day: &DailyForecast) -> Self {
        Self {
            humidity: day.humidity,
            cloud_cover: day.cloud_cover,
            pressure: day.pressure,
            wind_speed: day.wind_speed,
        }
    }
}

/// Fitted logistic regression over [`RainFeatures`]
#[derive(Debug, Clone, PartialEq)]
pub struct RainModel {
    weights: FeatureVector,
    intercept: f64,
    means: FeatureVector,
    scales: FeatureVector,
}

impl RainModel {
    /// Fit on `[humidity, cloud, pressure, wind]` rows and their labels
    pub fn fit(inputs: &[[f64; FEATURES]], labels: &[bool]) -> Result<Self> {
        if inputs.is_empty() || inputs.len() != labels.len() {
            return Err(WeatherAiError::model(format!(
                "rain model needs matching, non-empty inputs ({} rows, {} labels)",
                inputs.len(),
                labels.len()
            )));
        }

        let n = inputs.len();
        let count = n as f64;
        let raw = DMatrix::from_fn(n, FEATURES, |r, c| inputs[r][c]);

        let means = FeatureVector::from_fn(|c, _| raw.column(c).mean());
        let scales = FeatureVector::from_fn(|c, _| {
            let variance = raw
                .column(c)
                .iter()
                .map(|v| (v - means[c]).powi(2))
                .sum::<f64>()
                / count;
            let std = variance.sqrt();
            if std < MIN_SCALE { 1.0 } else { std }
        });

        let z = DMatrix::from_fn(n, FEATURES, |r, c| (raw[(r, c)] - means[c]) / scales[c]);
        let y = DVector::from_iterator(n, labels.iter().map(|&l| if l { 1.0 } else { 0.0 }));

        let mut weights = DVector::<f64>::zeros(FEATURES);
        let mut intercept = 0.0;

        for _ in 0..ITERATIONS {
            let logits = &z * &weights;
            let residual = DVector::from_fn(n, |i, _| sigmoid(logits[i] + intercept) - y[i]);

            let grad_w = z.transpose() * &residual / count + &weights * L2_PENALTY;
            let grad_b = residual.sum() / count;

            weights -= grad_w * LEARNING_RATE;
            intercept -= grad_b * LEARNING_RATE;
            project(&mut weights);
        }

        if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(WeatherAiError::model("rain model fit diverged"));
        }

        Ok(Self {
            weights: FeatureVector::from_iterator(weights.iter().copied()),
            intercept,
            means,
            scales,
        })
    }

    /// Probability of rain in [0, 1]
    #[must_use]
    pub fn probability(&self, features: &RainFeatures) -> f64 {
        let z = (features.to_vector() - self.means).component_div(&self.scales);
        sigmoid(self.weights.dot(&z) + self.intercept)
    }

    /// Probability as a percentage with one decimal, plus the threshold flag
    #[must_use]
    pub fn predict(&self, features: &RainFeatures) -> RainPrediction {
        let percent = round_to((self.probability(features) * 100.0).clamp(0.0, 100.0), 1);
        RainPrediction {
            rain_probability: percent,
            will_rain: percent >= RAIN_THRESHOLD,
        }
    }

    /// Effect of one unit of each raw feature on the log-odds,
    /// in `[humidity, cloud, pressure, wind]` order
    #[must_use]
    pub fn coefficients(&self) -> [f64; FEATURES] {
        let raw = self.weights.component_div(&self.scales);
        [raw[0], raw[1], raw[2], raw[3]]
    }
}

fn project(weights: &mut DVector<f64>) {
    for (w, direction) in weights.iter_mut().zip(DIRECTIONS) {
        match direction {
            Direction::Increasing => *w = w.max(0.0),
            Direction::Decreasing => *w = w.min(0.0),
            Direction::Free => {}
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::training::{RAIN_INPUTS, RAIN_LABELS};
    use rstest::rstest;

    fn model() -> RainModel {
        RainModel::fit(&RAIN_INPUTS, &RAIN_LABELS).unwrap()
    }

    fn features(humidity: f64, cloud_cover: f64, pressure: f64, wind_speed: f64) -> RainFeatures {
        RainFeatures {
            humidity,
            cloud_cover,
            pressure,
            wind_speed,
        }
    }

    #[test]
    fn test_fit_respects_directions() {
        let [humidity, cloud, pressure, _wind] = model().coefficients();
        assert!(humidity >= 0.0);
        assert!(cloud >= 0.0);
        assert!(pressure <= 0.0);
    }

    #[test]
    fn test_fit_is_deterministic() {
        assert_eq!(model(), model());
    }

    #[test]
    fn test_extremes_classified() {
        let model = model();
        assert!(model.predict(&features(90.0, 100.0, 995.0, 8.0)).will_rain);
        assert!(!model.predict(&features(20.0, 10.0, 1025.0, 1.0)).will_rain);
    }

    #[rstest]
    #[case(features(0.0, 0.0, 1100.0, 0.0))]
    #[case(features(100.0, 100.0, 900.0, 40.0))]
    #[case(features(55.0, 50.0, 1013.0, 3.0))]
    fn test_probability_in_range(#[case] input: RainFeatures) {
        let prediction = model().predict(&input);
        assert!((0.0..=100.0).contains(&prediction.rain_probability));
        assert_eq!(prediction.will_rain, prediction.rain_probability >= RAIN_THRESHOLD);
    }

    #[test]
    fn test_monotonic_in_each_feature() {
        let model = model();
        let base = features(50.0, 50.0, 1013.0, 3.0);

        let mut last = model.probability(&base);
        for humidity in (51..=100).map(f64::from) {
            let p = model.probability(&RainFeatures { humidity, ..base });
            assert!(p >= last);
            last = p;
        }

        let mut last = model.probability(&base);
        for cloud_cover in (51..=100).map(f64::from) {
            let p = model.probability(&RainFeatures { cloud_cover, ..base });
            assert!(p >= last);
            last = p;
        }

        let mut last = model.probability(&base);
        for pressure in (1014..=1060).map(f64::from) {
            let p = model.probability(&RainFeatures { pressure, ..base });
            assert!(p <= last);
            last = p;
        }
    }

    #[test]
    fn test_fit_rejects_mismatched_input() {
        assert!(RainModel::fit(&RAIN_INPUTS, &RAIN_LABELS[..3]).is_err());
        assert!(RainModel::fit(&[], &[]).is_err());
    }

    #[test]
    fn test_sigmoid_is_stable() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(800.0) <= 1.0);
    }
}
