//! Forecasting collaborators
//!
//! Model fitting lives outside this crate. A [`Forecaster`] turns an AQI
//! history into forecast points; [`request_forecast`] is the only way the
//! alerting side consumes one, and it never fails: errors become
//! [`ForecastOutcome::Unavailable`].

mod accuracy;
mod horizon;
mod persistence;

pub use accuracy::ForecastAccuracy;
pub use horizon::ForecastHorizon;
pub use persistence::PersistenceForecaster;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{ForecastOutcome, ForecastPoint};

/// Source of forward-looking predictions for a daily series
pub trait Forecaster {
    /// Short model name used in logs
    fn name(&self) -> &str;

    /// Predict `horizon` daily steps after the last history entry.
    ///
    /// `history` is in date order and may contain non-finite values.
    fn forecast(
        &self,
        history: &[(NaiveDate, f64)],
        horizon: ForecastHorizon,
    ) -> Result<Vec<ForecastPoint>>;
}

impl<F: Forecaster + ?Sized> Forecaster for &F {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn forecast(
        &self,
        history: &[(NaiveDate, f64)],
        horizon: ForecastHorizon,
    ) -> Result<Vec<ForecastPoint>> {
        (**self).forecast(history, horizon)
    }
}

impl<F: Forecaster + ?Sized> Forecaster for Box<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn forecast(
        &self,
        history: &[(NaiveDate, f64)],
        horizon: ForecastHorizon,
    ) -> Result<Vec<ForecastPoint>> {
        (**self).forecast(history, horizon)
    }
}

/// Ask a forecaster for a forecast, turning failure into `Unavailable`
pub fn request_forecast<F: Forecaster + ?Sized>(
    forecaster: &F,
    history: &[(NaiveDate, f64)],
    horizon: ForecastHorizon,
) -> ForecastOutcome {
    match forecaster.forecast(history, horizon) {
        Ok(points) => {
            debug!(
                model = forecaster.name(),
                steps = points.len(),
                "Forecast produced"
            );
            ForecastOutcome::available(points)
        }
        Err(e) => {
            warn!(model = forecaster.name(), error = %e, "Forecast failed");
            ForecastOutcome::unavailable(e.to_string())
        }
    }
}
