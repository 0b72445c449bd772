//! One evaluation cycle for one station

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::data::StationHistory;
use crate::error::{Error, Result};
use crate::forecast::{request_forecast, ForecastHorizon, Forecaster};
use crate::models::{Alert, Category, ForecastOutcome, LimitTable, PollutantReadings};

use super::categorizer::categorize_with;
use super::deriver::AlertDeriver;

/// Everything a renderer needs to draw one station's alert view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    /// Station name
    pub city: String,
    /// Date of the latest reading
    pub as_of: NaiveDate,
    /// Latest AQI after applying the missing-AQI policy
    pub current_aqi: Option<f64>,
    /// Category of `current_aqi`
    pub category: Option<Category>,
    /// Latest pollutant concentrations
    pub pollutants: PollutantReadings,
    /// Forecast, or why there is none
    pub forecast: ForecastOutcome,
    /// Triggered alerts, in display order
    pub alerts: Vec<Alert>,
}

impl StationReport {
    /// Whether nothing needs attention
    pub fn all_clear(&self) -> bool {
        self.alerts.is_empty()
    }
}

/// Runs the categorizer, forecaster and alert deriver for a station.
///
/// Holds only configuration; every call starts from scratch.
pub struct StationEvaluator<'a> {
    deriver: AlertDeriver,
    limits: LimitTable,
    horizon: ForecastHorizon,
    forecaster: Option<&'a dyn Forecaster>,
}

impl<'a> StationEvaluator<'a> {
    /// Create an evaluator with default rules and no forecaster
    pub fn new(limits: LimitTable) -> Self {
        Self {
            deriver: AlertDeriver::default(),
            limits,
            horizon: ForecastHorizon::default(),
            forecaster: None,
        }
    }

    /// Create an evaluator from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            deriver: AlertDeriver::from_config(&config.alerting),
            limits: config.alerting.limits.clone(),
            horizon: config.forecast.horizon()?,
            forecaster: None,
        })
    }

    /// Use this forecaster for the forecast step
    #[must_use]
    pub fn with_forecaster(mut self, forecaster: &'a dyn Forecaster) -> Self {
        self.forecaster = Some(forecaster);
        self
    }

    /// Override the forecast horizon
    #[must_use]
    pub fn with_horizon(mut self, horizon: ForecastHorizon) -> Self {
        self.horizon = horizon;
        self
    }

    /// Override the alert rules
    #[must_use]
    pub fn with_deriver(mut self, deriver: AlertDeriver) -> Self {
        self.deriver = deriver;
        self
    }

    /// Limit table in use
    pub fn limits(&self) -> &LimitTable {
        &self.limits
    }

    /// Evaluate the latest state of a station.
    ///
    /// Fails only when the station has no readings at all. A failing
    /// forecaster yields an unavailable forecast, not an error.
    pub fn evaluate(&self, station: &StationHistory) -> Result<StationReport> {
        let latest = station
            .latest()
            .ok_or_else(|| Error::not_found("readings for station", &station.city))?;

        let policy = self.deriver.missing_aqi();
        let current_aqi = policy.resolve(latest.aqi);
        let category = categorize_with(latest.aqi, policy);

        if latest.aqi_value().is_none() {
            debug!(city = %station.city, policy = ?policy, "Latest AQI missing");
        }

        let forecast = match self.forecaster {
            Some(forecaster) => {
                request_forecast(forecaster, &station.aqi_series(), self.horizon)
            }
            None => ForecastOutcome::unavailable("forecasting disabled"),
        };

        let alerts = self
            .deriver
            .derive(latest.aqi, &forecast, &latest.pollutants, &self.limits);

        info!(
            city = %station.city,
            as_of = %latest.date,
            aqi = ?current_aqi,
            category = ?category,
            alerts = alerts.len(),
            "Evaluated station"
        );

        Ok(StationReport {
            city: station.city.clone(),
            as_of: latest.date,
            current_aqi,
            category,
            pollutants: latest.pollutants.clone(),
            forecast,
            alerts,
        })
    }
}
