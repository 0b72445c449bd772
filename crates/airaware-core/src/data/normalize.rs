//! Rescaling of normalized datasets to real-world units

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use super::Dataset;
use crate::models::Pollutant;

/// Factor mapping a [0, 1] AQI onto the 0 to 500 scale
pub const AQI_SCALE: f64 = 500.0;

/// Factor mapping [0, 1] concentrations onto µg/m³
pub const POLLUTANT_SCALE: f64 = 1000.0;

/// A pollutant whose dataset-wide maximum is below this is assumed normalized
const POLLUTANT_NORMALIZED_MAX: f64 = 10.0;

/// What [`normalize_units`] changed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationReport {
    /// AQI values were multiplied by [`AQI_SCALE`]
    pub aqi_rescaled: bool,
    /// Pollutants whose values were multiplied by [`POLLUTANT_SCALE`]
    pub pollutants_rescaled: Vec<Pollutant>,
}

/// Rescale a dataset exported with min-max normalized columns.
///
/// If the largest AQI anywhere in the dataset is at most 1, every AQI is
/// multiplied by 500. Each pollutant whose largest value is below 10 has all
/// of its values multiplied by 1000. Columns without any finite value are
/// left alone.
pub fn normalize_units(dataset: &mut Dataset) -> NormalizationReport {
    let aqi_max = column_max(dataset.readings().filter_map(|r| r.aqi));
    let aqi_rescaled = aqi_max.is_some_and(|max| max <= 1.0);

    let mut pollutant_max: BTreeMap<Pollutant, f64> = BTreeMap::new();
    for reading in dataset.readings() {
        for (pollutant, value) in reading.pollutants.iter() {
            if value.is_finite() {
                pollutant_max
                    .entry(pollutant.clone())
                    .and_modify(|m| *m = m.max(value))
                    .or_insert(value);
            }
        }
    }
    let pollutants_rescaled: Vec<Pollutant> = pollutant_max
        .into_iter()
        .filter(|(_, max)| *max < POLLUTANT_NORMALIZED_MAX)
        .map(|(p, _)| p)
        .collect();

    for reading in dataset.readings_mut() {
        if aqi_rescaled {
            if let Some(aqi) = reading.aqi.as_mut() {
                *aqi *= AQI_SCALE;
            }
        }
        for (pollutant, value) in reading.pollutants.values_mut() {
            if pollutants_rescaled.contains(pollutant) {
                *value *= POLLUTANT_SCALE;
            }
        }
    }

    if aqi_rescaled || !pollutants_rescaled.is_empty() {
        info!(
            aqi = aqi_rescaled,
            pollutants = ?pollutants_rescaled,
            "Rescaled normalized columns"
        );
    }

    NormalizationReport {
        aqi_rescaled,
        pollutants_rescaled,
    }
}

fn column_max(values: impl Iterator<Item = f64>) -> Option<f64> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}
