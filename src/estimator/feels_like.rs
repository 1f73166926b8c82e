//! Linear feels-like model, fit by ordinary least squares

use nalgebra::{DMatrix, DVector};

use super::{FeelsLikePrediction, round_to};
use crate::models::CurrentConditions;
use crate::{Result, WeatherAiError};

/// `feels_like = humidity * humidity_coef + temperature * temperature_coef + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeelsLikeModel {
    pub humidity_coef: f64,
    pub temperature_coef: f64,
    pub intercept: f64,
}

impl FeelsLikeModel {
    /// Solve the normal equations for `(humidity, temperature)` inputs
    pub fn fit(inputs: &[(f64, f64)], targets: &[f64]) -> Result<Self> {
        if inputs.len() < 3 || inputs.len() != targets.len() {
            return Err(WeatherAiError::model(format!(
                "feels-like model needs at least 3 matching samples ({} inputs, {} targets)",
                inputs.len(),
                targets.len()
            )));
        }

        let design = DMatrix::from_fn(inputs.len(), 3, |r, c| match c {
            0 => 1.0,
            1 => inputs[r].0,
            _ => inputs[r].1,
        });
        let y = DVector::from_column_slice(targets);

        let gram = design.transpose() * &design;
        let moment = design.transpose() * &y;
        let beta = gram
            .cholesky()
            .ok_or_else(|| WeatherAiError::model("feels-like samples are collinear"))?
            .solve(&moment);

        Ok(Self {
            intercept: beta[0],
            humidity_coef: beta[1],
            temperature_coef: beta[2],
        })
    }

    /// Unrounded prediction in Celsius
    #[must_use]
    pub fn predict(&self, humidity: f64, temperature: f64) -> f64 {
        humidity * self.humidity_coef + temperature * self.temperature_coef + self.intercept
    }

    /// Prediction for a current observation, compared to the reported feels-like
    #[must_use]
    pub fn predict_conditions(&self, conditions: &CurrentConditions) -> FeelsLikePrediction {
        let feels_like = round_to(self.predict(conditions.humidity, conditions.temperature), 2);
        FeelsLikePrediction {
            feels_like,
            difference: round_to(feels_like - conditions.feels_like, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::training::{feels_like_samples, reference_feels_like};

    fn model() -> FeelsLikeModel {
        let (inputs, targets) = feels_like_samples();
        FeelsLikeModel::fit(&inputs, &targets).unwrap()
    }

    #[test]
    fn test_dry_air_is_temperature_scaled() {
        let model = model();
        for temperature in [-10.0, 0.0, 12.5, 30.0, 42.0] {
            assert!((model.predict(0.0, temperature) - temperature * 0.9).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_degrees_is_humidity_scaled() {
        let model = model();
        for humidity in [0.0, 25.0, 50.0, 100.0] {
            assert!((model.predict(humidity, 0.0) - humidity / 100.0 * 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_recovers_reference_formula() {
        let model = model();
        assert!((model.temperature_coef - 0.9).abs() < 1e-7);
        assert!((model.humidity_coef - 0.03).abs() < 1e-7);
        assert!(model.intercept.abs() < 1e-6);
        assert!((model.predict(63.0, 21.0) - reference_feels_like(63.0, 21.0)).abs() < 1e-6);
    }

    #[test]
    fn test_predict_conditions_difference() {
        let conditions = CurrentConditions {
            city: "Bengaluru".into(),
            country: "IN".into(),
            temperature: 20.0,
            feels_like: 19.0,
            humidity: 50.0,
            wind_speed: 2.0,
            pressure: 1010.0,
            description: "Clear Sky".into(),
        };
        let prediction = model().predict_conditions(&conditions);
        assert_eq!(prediction.feels_like, 19.5);
        assert_eq!(prediction.difference, 0.5);
    }

    #[test]
    fn test_fit_rejects_too_few_samples() {
        assert!(FeelsLikeModel::fit(&[(10.0, 10.0), (20.0, 15.0)], &[1.0, 2.0]).is_err());
        assert!(FeelsLikeModel::fit(&[(10.0, 10.0), (20.0, 15.0), (5.0, 1.0)], &[1.0]).is_err());
    }
}
