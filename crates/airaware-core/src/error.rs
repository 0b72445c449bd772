//! Error types for AirAware
//!
//! The categorizer and alert deriver never fail. These errors belong to the
//! layers around them: configuration, dataset loading and forecasting.

use thiserror::Error;

/// Result type alias using AirAware's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for AirAware operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of thing that was looked up
        entity: String,
        /// Key it was looked up by
        id: String,
    },

    /// The forecasting collaborator could not produce a forecast
    #[error("Forecast unavailable: {0}")]
    Forecast(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a forecast error
    pub fn forecast(msg: impl Into<String>) -> Self {
        Self::Forecast(msg.into())
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
