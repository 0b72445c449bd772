//! # AirAware
//!
//! Air quality categorization and alerting.
//!
//! AirAware turns air quality readings into severity categories and
//! human-readable alerts. Forecasting and rendering are collaborators: a
//! forecaster hands over predicted points, a renderer draws categories and
//! alert messages.
//!
//! ## Architecture
//!
//! - **Alerting**: the AQI categorizer and the alert deriver, both pure
//! - **Forecast**: forecaster trait, horizons and a persistence baseline
//! - **Data**: station datasets, unit normalization and summary statistics
//! - **Config**: layered configuration (defaults, TOML file, environment)
//!
//! ## Quick Start
//!
//! ```
//! use airaware::alerting::{categorize, derive_alerts};
//! use airaware::models::{Category, ForecastOutcome, LimitTable, PollutantReadings};
//!
//! assert_eq!(categorize(162.0), Category::Moderate);
//!
//! let readings: PollutantReadings = [("PM2.5", 20.0)].into_iter().collect();
//! let alerts = derive_alerts(
//!     90.0,
//!     &ForecastOutcome::available(vec![]),
//!     &readings,
//!     &LimitTable::who(),
//! );
//! assert_eq!(alerts.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod alerting;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod models;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::{
        categorize, categorize_with, derive_alerts, AlertDeriver, MissingAqiPolicy,
        StationEvaluator, StationReport,
    };
    pub use crate::config::Config;
    pub use crate::data::{Dataset, StationHistory};
    pub use crate::error::{Error, Result};
    pub use crate::forecast::{request_forecast, ForecastHorizon, Forecaster};
    pub use crate::models::*;
}
