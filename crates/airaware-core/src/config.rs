//! Configuration management for AirAware
//!
//! Sources are layered, later ones winning: built-in defaults, a TOML file,
//! then `AIRAWARE__SECTION__KEY` environment variables.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use crate::alerting::{MissingAqiPolicy, FORECAST_ALERT_THRESHOLD};
use crate::error::{Error, Result};
use crate::forecast::ForecastHorizon;
use crate::models::LimitTable;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "AIRAWARE";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Alerting configuration
    pub alerting: AlertingConfig,

    /// Forecast configuration
    pub forecast: ForecastConfig,

    /// Dataset configuration
    pub data: DataConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// `path` names a TOML file that must exist. Without it the platform
    /// config file (e.g. `~/.config/airaware/config.toml`) is used when
    /// present. Nothing is logged here: this runs before the subscriber is
    /// installed, so callers report [`Config::resolve_path`] afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Config::default())?);

        if let Some(file) = Self::resolve_path(path) {
            builder = builder.add_source(config::File::from(file).required(true));
        }

        let config: Config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Configuration file [`Config::load`] reads for `path`, if any
    pub fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        }
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.alerting.validate()?;
        self.forecast.horizon()?;
        Ok(())
    }
}

/// Platform configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "airaware", "airaware")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Alerting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertingConfig {
    /// Pollutant limits, in alert order
    pub limits: LimitTable,
    /// Predicted AQI above which a forecast date is reported
    pub forecast_threshold: f64,
    /// Handling of a missing current AQI
    pub missing_aqi: MissingAqiPolicy,
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            limits: LimitTable::who(),
            forecast_threshold: FORECAST_ALERT_THRESHOLD,
            missing_aqi: MissingAqiPolicy::default(),
        }
    }
}

impl AlertingConfig {
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in self.limits.iter() {
            if !seen.insert(entry.pollutant.as_str()) {
                return Err(Error::validation(format!(
                    "duplicate limit for {}",
                    entry.pollutant
                )));
            }
            if !entry.limit.is_finite() || entry.limit < 0.0 {
                return Err(Error::validation(format!(
                    "limit for {} must be a non-negative number, got {}",
                    entry.pollutant, entry.limit
                )));
            }
        }

        if !self.forecast_threshold.is_finite() {
            return Err(Error::validation("forecast_threshold must be finite"));
        }
        if let MissingAqiPolicy::Substitute { value } = self.missing_aqi {
            if !value.is_finite() {
                return Err(Error::validation("missing_aqi substitute must be finite"));
            }
        }
        Ok(())
    }
}

/// Forecast configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Whether to run the forecaster at all
    pub enabled: bool,
    /// How far ahead to forecast, e.g. "24h", "3d", "7d"
    #[serde(with = "humantime_serde")]
    pub horizon: Duration,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            horizon: ForecastHorizon::default().as_duration(),
        }
    }
}

impl ForecastConfig {
    /// Horizon in daily steps
    pub fn horizon(&self) -> Result<ForecastHorizon> {
        ForecastHorizon::from_duration(self.horizon)
    }
}

/// Dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Dataset used when no `--data` flag is given
    pub path: Option<PathBuf>,
    /// Rescale normalized AQI and pollutant columns on load
    pub normalize_units: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            normalize_units: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}
