//! Station datasets
//!
//! Loads per-station reading histories, fixes up units, and hands plain
//! [`Reading`] values to the categorizer and alert deriver. Nothing here is
//! cached between evaluation cycles.

mod normalize;
pub mod summary;

pub use normalize::{normalize_units, NormalizationReport};

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::Reading;

/// Readings for every monitored station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Station histories
    pub stations: Vec<StationHistory>,
}

impl Dataset {
    /// Load a dataset from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading dataset");

        let raw = fs::read_to_string(path)?;
        let dataset = Self::from_json_str(&raw)?;

        info!(
            path = %path.display(),
            stations = dataset.stations.len(),
            readings = dataset.reading_count(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse a dataset from JSON, sorting each station's readings by date
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let mut dataset: Self = serde_json::from_str(raw)?;
        for station in &mut dataset.stations {
            station.readings.sort_by_key(|r| r.date);
        }
        Ok(dataset)
    }

    /// Sorted, de-duplicated station names
    pub fn cities(&self) -> Vec<&str> {
        self.stations
            .iter()
            .map(|s| s.city.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// History for one station
    pub fn station(&self, city: &str) -> Result<&StationHistory> {
        self.stations
            .iter()
            .find(|s| s.city == city)
            .ok_or_else(|| Error::not_found("station", city))
    }

    /// Total readings across all stations
    pub fn reading_count(&self) -> usize {
        self.stations.iter().map(|s| s.readings.len()).sum()
    }

    /// Iterate over every reading of every station
    pub fn readings(&self) -> impl Iterator<Item = &Reading> {
        self.stations.iter().flat_map(|s| s.readings.iter())
    }

    /// Mutable iteration over every reading of every station
    pub fn readings_mut(&mut self) -> impl Iterator<Item = &mut Reading> {
        self.stations.iter_mut().flat_map(|s| s.readings.iter_mut())
    }
}

/// Date-ordered readings for one station
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationHistory {
    /// Station or city name
    pub city: String,
    /// Readings, oldest first
    #[serde(default)]
    pub readings: Vec<Reading>,
}

impl StationHistory {
    /// Create a history, sorting readings by date
    pub fn new(city: impl Into<String>, mut readings: Vec<Reading>) -> Self {
        readings.sort_by_key(|r| r.date);
        Self {
            city: city.into(),
            readings,
        }
    }

    /// Most recent reading
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Dated AQI values with missing entries dropped
    pub fn aqi_series(&self) -> Vec<(NaiveDate, f64)> {
        self.readings
            .iter()
            .filter_map(|r| r.aqi_value().map(|v| (r.date, v)))
            .collect()
    }

    /// Dated values of one pollutant with missing entries dropped
    pub fn pollutant_series(&self, pollutant: &str) -> Vec<(NaiveDate, f64)> {
        self.readings
            .iter()
            .filter_map(|r| r.pollutants.get(pollutant).map(|v| (r.date, v)))
            .collect()
    }

    /// AQI series, or the series of `pollutant` when one is given
    pub fn series(&self, pollutant: Option<&str>) -> Vec<(NaiveDate, f64)> {
        match pollutant {
            Some(pollutant) => self.pollutant_series(pollutant),
            None => self.aqi_series(),
        }
    }

    /// Readings dated within `start..=end`; open ends are unbounded
    pub fn between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> &[Reading] {
        let from = start.map_or(0, |d| self.readings.partition_point(|r| r.date < d));
        let to = end.map_or(self.readings.len(), |d| {
            self.readings.partition_point(|r| r.date <= d)
        });

        if from >= to {
            &[]
        } else {
            &self.readings[from..to]
        }
    }

    /// The last `n` readings
    pub fn tail(&self, n: usize) -> &[Reading] {
        let start = self.readings.len().saturating_sub(n);
        &self.readings[start..]
    }
}
