//! Forecast data models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::alerting::categorize;
use crate::models::Category;

/// One predicted step produced by a forecasting collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Date the prediction is for
    pub date: NaiveDate,
    /// Predicted value
    pub predicted: f64,
    /// Lower bound of the uncertainty interval
    pub lower: f64,
    /// Upper bound of the uncertainty interval
    pub upper: f64,
}

impl ForecastPoint {
    /// Create a forecast point
    pub fn new(date: NaiveDate, predicted: f64, lower: f64, upper: f64) -> Self {
        Self {
            date,
            predicted,
            lower,
            upper,
        }
    }
}

/// Result of asking the forecasting collaborator for a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastOutcome {
    /// The collaborator returned a forecast
    Available {
        /// Predicted points in date order
        points: Vec<ForecastPoint>,
    },
    /// No forecast could be obtained
    Unavailable {
        /// Why the forecast is missing
        reason: String,
    },
}

impl ForecastOutcome {
    /// Wrap a materialized forecast
    pub fn available(points: Vec<ForecastPoint>) -> Self {
        Self::Available { points }
    }

    /// Signal that no forecast exists
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Forecast points, empty when unavailable
    pub fn points(&self) -> &[ForecastPoint] {
        match self {
            Self::Available { points } => points,
            Self::Unavailable { .. } => &[],
        }
    }

    /// Whether the collaborator produced a forecast
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Each point paired with the category of its predicted value
    pub fn categorized(&self) -> Vec<(ForecastPoint, Category)> {
        self.points()
            .iter()
            .map(|p| (*p, categorize(p.predicted)))
            .collect()
    }
}

impl From<Vec<ForecastPoint>> for ForecastOutcome {
    fn from(points: Vec<ForecastPoint>) -> Self {
        Self::available(points)
    }
}
