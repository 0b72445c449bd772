//! Reading data models

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Concentration unit every pollutant is reported in
pub const CONCENTRATION_UNIT: &str = "µg/m³";

/// Pollutant identifier, e.g. `"PM2.5"` or `"O3"`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pollutant(String);

impl Pollutant {
    /// Create a pollutant identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fine particulate matter
    pub fn pm25() -> Self {
        Self::new("PM2.5")
    }

    /// Coarse particulate matter
    pub fn pm10() -> Self {
        Self::new("PM10")
    }

    /// Ozone
    pub fn o3() -> Self {
        Self::new("O3")
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Pollutant {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Pollutant {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Latest concentration per pollutant at one station
///
/// A pollutant that was not measured is simply absent. NaN values may still
/// appear when upstream data is malformed; consumers treat them as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollutantReadings(
    #[serde(deserialize_with = "deserialize_present")] BTreeMap<Pollutant, f64>,
);

impl PollutantReadings {
    /// Create an empty set of readings
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a concentration
    pub fn insert(&mut self, pollutant: impl Into<Pollutant>, value: f64) {
        self.0.insert(pollutant.into(), value);
    }

    /// Concentration for a pollutant, `None` when absent or NaN
    pub fn get(&self, pollutant: &str) -> Option<f64> {
        self.0.get(pollutant).copied().filter(|v| !v.is_nan())
    }

    /// Raw concentration for a pollutant, NaN included
    pub fn get_raw(&self, pollutant: &str) -> Option<f64> {
        self.0.get(pollutant).copied()
    }

    /// Iterate over all recorded values
    pub fn iter(&self) -> impl Iterator<Item = (&Pollutant, f64)> {
        self.0.iter().map(|(p, v)| (p, *v))
    }

    /// Mutable access to every recorded value
    pub fn values_mut(&mut self) -> impl Iterator<Item = (&Pollutant, &mut f64)> {
        self.0.iter_mut()
    }

    /// Number of recorded pollutants
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no pollutant was recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P: Into<Pollutant>> FromIterator<(P, f64)> for PollutantReadings {
    fn from_iter<I: IntoIterator<Item = (P, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(p, v)| (p.into(), v)).collect())
    }
}

/// Drops `null` entries so absent and unmeasured pollutants look the same.
fn deserialize_present<'de, D>(deserializer: D) -> Result<BTreeMap<Pollutant, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<Pollutant, Option<f64>> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(p, v)| v.map(|v| (p, v)))
        .collect())
}

/// One dated row of observations for a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Observation date
    pub date: NaiveDate,

    /// Aggregate AQI, `None` when not reported
    #[serde(default)]
    pub aqi: Option<f64>,

    /// Pollutant concentrations
    #[serde(default)]
    pub pollutants: PollutantReadings,
}

impl Reading {
    /// AQI if reported and numeric
    pub fn aqi_value(&self) -> Option<f64> {
        self.aqi.filter(|v| !v.is_nan())
    }
}
