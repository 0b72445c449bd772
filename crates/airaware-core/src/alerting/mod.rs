//! AQI categorization and alert derivation
//!
//! [`categorize`] and [`AlertDeriver`] are pure functions of their inputs.
//! [`StationEvaluator`] wires them to a station history and a forecaster.

mod categorizer;
mod deriver;
mod evaluator;

pub use categorizer::{categorize, categorize_with, MissingAqiPolicy};
pub use deriver::{derive_alerts, AlertDeriver, FORECAST_ALERT_THRESHOLD};
pub use evaluator::{StationEvaluator, StationReport};
