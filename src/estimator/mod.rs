//! Rain and feels-like estimators
//!
//! Both models are fit once on fixed synthetic samples when the process
//! starts. The fitted [`Estimators`] value is read-only afterwards and is
//! shared between requests behind an `Arc`.

pub mod feels_like;
pub mod rain;
pub mod training;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

pub use feels_like::FeelsLikeModel;
pub use rain::{RainFeatures, RainModel};

use crate::Result;
use crate::models::{CurrentConditions, DailyForecast};

/// Percent at or above which a day is flagged as rainy
pub const RAIN_THRESHOLD: f64 = 50.0;

/// Rain estimate for one forecast day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainPrediction {
    /// Probability in percent, one decimal
    pub rain_probability: f64,
    pub will_rain: bool,
}

/// Feels-like estimate for a current observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeelsLikePrediction {
    /// Predicted feels-like temperature in Celsius, two decimals
    pub feels_like: f64,
    /// Prediction minus the feels-like reported upstream
    pub difference: f64,
}

/// The fitted model set
#[derive(Debug, Clone, PartialEq)]
pub struct Estimators {
    pub rain: RainModel,
    pub feels_like: FeelsLikeModel,
}

impl Estimators {
    /// Fit both models on the built-in synthetic samples
    #[instrument(name = "train_estimators")]
    pub fn train() -> Result<Self> {
        let rain = RainModel::fit(&training::RAIN_INPUTS, &training::RAIN_LABELS)?;
        debug!(coefficients = ?rain.coefficients(), "Rain model fitted");

        let (inputs, targets) = training::feels_like_samples();
        let feels_like = FeelsLikeModel::fit(&inputs, &targets)?;
        debug!(?feels_like, "Feels-like model fitted");

        info!("Prediction models trained");
        Ok(Self { rain, feels_like })
    }

    /// Rain estimate for a forecast day
    #[must_use]
    pub fn predict_rain(&self, day: &DailyForecast) -> RainPrediction {
        self.rain.predict(&RainFeatures::from(day))
    }

    /// Feels-like estimate for a current observation
    #[must_use]
    pub fn predict_feels_like(&self, conditions: &CurrentConditions) -> FeelsLikePrediction {
        self.feels_like.predict_conditions(conditions)
    }
}

/// Round half away from zero to `decimals` places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
