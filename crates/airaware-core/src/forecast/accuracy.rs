//! Forecast error metrics for comparing models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::{ForecastHorizon, Forecaster};

/// Error of a forecast against what was actually observed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// Number of pairs both values were finite for
    pub samples: usize,
}

impl ForecastAccuracy {
    /// Score `predicted` against `actual`, position by position.
    ///
    /// Pairs where either side is not finite are ignored, and extra values on
    /// the longer side are dropped. Returns `None` when nothing is left.
    #[allow(clippy::cast_precision_loss)]
    pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Option<Self> {
        let errors: Vec<f64> = actual
            .iter()
            .zip(predicted)
            .filter(|(a, p)| a.is_finite() && p.is_finite())
            .map(|(a, p)| p - a)
            .collect();

        if errors.is_empty() {
            return None;
        }

        let n = errors.len() as f64;
        let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;
        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

        Some(Self {
            rmse: mse.sqrt(),
            mae,
            samples: errors.len(),
        })
    }
}

impl ForecastAccuracy {
    /// Hold back the last `holdout` observations, forecast them from the rest
    /// and score the forecast on the dates both sides share.
    ///
    /// `history` must be in date order. The horizon spans from the last
    /// training date to the last held-out date, so gaps in the series are
    /// skipped rather than shifted.
    pub fn backtest<F: Forecaster + ?Sized>(
        forecaster: &F,
        history: &[(NaiveDate, f64)],
        holdout: usize,
    ) -> Result<Self> {
        if holdout == 0 || holdout >= history.len() {
            return Err(Error::validation(format!(
                "holdout of {holdout} needs between 1 and {} observations",
                history.len().saturating_sub(1)
            )));
        }

        let (train, test) = history.split_at(history.len() - holdout);
        let Some(&(last_train, _)) = train.last() else {
            return Err(Error::validation("nothing left to train on"));
        };

        let span = test
            .iter()
            .map(|(date, _)| (*date - last_train).num_days())
            .max()
            .unwrap_or(0);
        let steps = u32::try_from(span)
            .ok()
            .filter(|steps| *steps > 0)
            .ok_or_else(|| Error::validation("held-out observations must follow the training data"))?;

        let points = forecaster.forecast(train, ForecastHorizon::days(steps)?)?;

        let (actual, predicted): (Vec<f64>, Vec<f64>) = test
            .iter()
            .filter_map(|(date, actual)| {
                points
                    .iter()
                    .find(|p| p.date == *date)
                    .map(|p| (*actual, p.predicted))
            })
            .unzip();

        let accuracy = Self::evaluate(&actual, &predicted)
            .ok_or_else(|| Error::forecast("no held-out observation could be scored"))?;
        debug!(
            model = forecaster.name(),
            holdout,
            rmse = accuracy.rmse,
            mae = accuracy.mae,
            "Backtest scored"
        );
        Ok(accuracy)
    }
}
