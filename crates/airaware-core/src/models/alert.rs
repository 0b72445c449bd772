//! Alert data models

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Category, Pollutant, CONCENTRATION_UNIT};

/// Line renderers show when there are no alerts
pub const NO_ACTIVE_ALERTS: &str = "No active alerts.";

/// Alert severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Info,
    /// Warning
    #[default]
    Warning,
    /// Critical
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Condition that raised an alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertKind {
    /// Current AQI is in an unhealthy band
    CurrentLevel {
        /// Band of the current AQI
        category: Category,
        /// AQI value the band was derived from
        aqi: f64,
    },
    /// The forecast predicts severe air on some dates
    Forecast {
        /// Dates predicted above the forecast threshold, in forecast order
        dates: Vec<NaiveDate>,
    },
    /// A pollutant concentration exceeds its regulatory limit
    LimitBreach {
        /// Offending pollutant
        pollutant: Pollutant,
        /// Measured concentration
        value: f64,
        /// Limit that was exceeded
        limit: f64,
    },
}

/// A triggered condition, ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Severity level
    pub severity: Severity,
    /// What triggered it
    pub kind: AlertKind,
    /// Human-readable message
    pub message: String,
}

impl Alert {
    /// Alert for the current AQI band.
    ///
    /// Returns `None` for bands that do not warrant an alert (Good,
    /// Satisfactory).
    pub fn current_level(category: Category, aqi: f64) -> Option<Self> {
        let (severity, message) = match category {
            Category::Good | Category::Satisfactory => return None,
            Category::Moderate => (
                Severity::Info,
                "Moderate AQI - Sensitive groups should reduce outdoor activity.",
            ),
            Category::Poor => (
                Severity::Warning,
                "Poor Air Quality - Breathing discomfort likely.",
            ),
            Category::VeryPoor => (
                Severity::Critical,
                "Very Poor Air - Respiratory illness on prolonged exposure.",
            ),
            Category::Severe => (
                Severity::Critical,
                "Severe AQI - Serious health impact for all groups.",
            ),
        };

        Some(Self {
            severity,
            kind: AlertKind::CurrentLevel { category, aqi },
            message: message.to_string(),
        })
    }

    /// Aggregate alert for all forecast dates predicted to be severe
    pub fn forecast(dates: Vec<NaiveDate>) -> Self {
        let listed = dates
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            severity: Severity::Critical,
            message: format!("Severe AQI expected on {listed}."),
            kind: AlertKind::Forecast { dates },
        }
    }

    /// Alert for a pollutant above its limit
    pub fn limit_breach(pollutant: Pollutant, value: f64, limit: f64) -> Self {
        Self {
            severity: Severity::Warning,
            message: format!(
                "{pollutant}: {value:.1} {CONCENTRATION_UNIT} exceeds WHO limit ({limit})."
            ),
            kind: AlertKind::LimitBreach {
                pollutant,
                value,
                limit,
            },
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_current_level_alert_for_healthy_bands() {
        assert!(Alert::current_level(Category::Good, 10.0).is_none());
        assert!(Alert::current_level(Category::Satisfactory, 99.0).is_none());
    }

    #[test]
    fn test_current_level_severity() {
        let moderate = Alert::current_level(Category::Moderate, 150.0).unwrap();
        assert_eq!(moderate.severity, Severity::Info);

        let severe = Alert::current_level(Category::Severe, 450.0).unwrap();
        assert_eq!(severe.severity, Severity::Critical);
        assert!(severe.message.starts_with("Severe AQI"));
    }

    #[test]
    fn test_forecast_message_lists_dates() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2024, 11, 3).unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
        ];
        let alert = Alert::forecast(dates);
        assert_eq!(
            alert.message,
            "Severe AQI expected on 2024-11-03, 2024-11-05."
        );
    }

    #[test]
    fn test_limit_breach_message() {
        let alert = Alert::limit_breach(Pollutant::pm25(), 20.04, 15.0);
        assert_eq!(alert.message, "PM2.5: 20.0 µg/m³ exceeds WHO limit (15).");
        assert_eq!(alert.to_string(), alert.message);
    }
}
