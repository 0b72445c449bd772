//! Persistence (naive) forecaster

use chrono::{Days, NaiveDate};

use crate::error::{Error, Result};
use crate::models::ForecastPoint;

use super::{ForecastHorizon, Forecaster};

/// Two-sided 95% normal quantile
const Z_95: f64 = 1.959_964;

/// Baseline forecaster that carries the last observation forward.
///
/// The interval is the random-walk one: the standard deviation of the
/// first differences, widened by `sqrt(h)` at step `h`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistenceForecaster;

impl PersistenceForecaster {
    /// Create a persistence forecaster
    pub fn new() -> Self {
        Self
    }
}

impl Forecaster for PersistenceForecaster {
    fn name(&self) -> &str {
        "persistence"
    }

    fn forecast(
        &self,
        history: &[(NaiveDate, f64)],
        horizon: ForecastHorizon,
    ) -> Result<Vec<ForecastPoint>> {
        let clean: Vec<(NaiveDate, f64)> = history
            .iter()
            .copied()
            .filter(|(_, v)| v.is_finite())
            .collect();

        let Some(&(last_date, last_value)) = clean.last() else {
            return Err(Error::forecast("no usable history"));
        };
        if clean.len() < 2 {
            return Err(Error::forecast(format!(
                "need at least 2 observations, got {}",
                clean.len()
            )));
        }

        let sigma = step_deviation(&clean);

        (1..=horizon.steps())
            .map(|h| {
                let date = last_date
                    .checked_add_days(Days::new(u64::from(h)))
                    .ok_or_else(|| Error::forecast("forecast date out of range"))?;
                let spread = Z_95 * sigma * f64::from(h).sqrt();
                Ok(ForecastPoint::new(
                    date,
                    last_value,
                    last_value - spread,
                    last_value + spread,
                ))
            })
            .collect()
    }
}

/// Sample standard deviation of first differences
#[allow(clippy::cast_precision_loss)]
fn step_deviation(series: &[(NaiveDate, f64)]) -> f64 {
    let diffs: Vec<f64> = series.windows(2).map(|w| w[1].1 - w[0].1).collect();
    if diffs.len() < 2 {
        return diffs.first().map_or(0.0, |d| d.abs());
    }

    let n = diffs.len() as f64;
    let mean = diffs.iter().sum::<f64>() / n;
    let var = diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}
