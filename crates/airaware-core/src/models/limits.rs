//! Regulatory concentration limits

use serde::{Deserialize, Serialize};

use super::Pollutant;

/// Threshold for one pollutant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantLimit {
    /// Pollutant the limit applies to
    pub pollutant: Pollutant,
    /// Concentration above which the limit is breached
    pub limit: f64,
}

impl PollutantLimit {
    /// Create a limit entry
    pub fn new(pollutant: impl Into<Pollutant>, limit: f64) -> Self {
        Self {
            pollutant: pollutant.into(),
            limit,
        }
    }
}

/// Ordered pollutant limit table
///
/// Order is significant: breach alerts are emitted in table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LimitTable(Vec<PollutantLimit>);

impl LimitTable {
    /// Create a table from entries in the desired order
    pub fn new(entries: Vec<PollutantLimit>) -> Self {
        Self(entries)
    }

    /// WHO guideline limits for PM2.5, PM10 and O3
    pub fn who() -> Self {
        Self(vec![
            PollutantLimit::new(Pollutant::pm25(), 15.0),
            PollutantLimit::new(Pollutant::pm10(), 45.0),
            PollutantLimit::new(Pollutant::o3(), 100.0),
        ])
    }

    /// Limit for a pollutant
    pub fn get(&self, pollutant: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|entry| entry.pollutant.as_str() == pollutant)
            .map(|entry| entry.limit)
    }

    /// Entries in table order
    pub fn iter(&self) -> impl Iterator<Item = &PollutantLimit> {
        self.0.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P: Into<Pollutant>> FromIterator<(P, f64)> for LimitTable {
    fn from_iter<I: IntoIterator<Item = (P, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(p, limit)| PollutantLimit::new(p, limit))
                .collect(),
        )
    }
}
