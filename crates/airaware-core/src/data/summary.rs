//! Descriptive statistics and data quality for station histories

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{Pollutant, Reading};

/// Share of usable cells in a block of readings, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Cells that hold a value at all
    pub completeness: f64,
    /// Present cells that hold a finite, non-negative value
    pub validity: f64,
}

impl DataQuality {
    /// Assess the AQI column plus every pollutant seen in `readings`.
    ///
    /// A pollutant absent from a row counts as a missing cell. Empty input
    /// scores 0 on both measures.
    pub fn assess(readings: &[Reading]) -> Self {
        let columns = pollutant_columns(readings);
        let total = readings.len() * (columns.len() + 1);
        if total == 0 {
            return Self {
                completeness: 0.0,
                validity: 0.0,
            };
        }

        let mut present = 0usize;
        let mut valid = 0usize;
        for reading in readings {
            let cells = std::iter::once(reading.aqi)
                .chain(columns.iter().map(|p| reading.pollutants.get_raw(p.as_str())));
            for value in cells.flatten().filter(|v| !v.is_nan()) {
                present += 1;
                if value.is_finite() && value >= 0.0 {
                    valid += 1;
                }
            }
        }

        Self {
            completeness: percent(present, total),
            validity: if present == 0 {
                0.0
            } else {
                percent(valid, present)
            },
        }
    }
}

/// Every pollutant that appears in at least one reading, sorted
pub fn pollutant_columns(readings: &[Reading]) -> Vec<Pollutant> {
    readings
        .iter()
        .flat_map(|r| r.pollutants.iter().map(|(p, _)| p.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64 * 100.0
}

/// Summary of one numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Describe {
    /// Number of finite values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (NaN for a single value)
    pub std: f64,
    /// Minimum
    pub min: f64,
    /// First quartile
    pub p25: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub p75: f64,
    /// Maximum
    pub max: f64,
}

/// Summarize the finite values of a column; `None` if there are none
#[allow(clippy::cast_precision_loss)]
pub fn describe(values: &[f64]) -> Option<Describe> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let std = if sorted.len() > 1 {
        (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        f64::NAN
    };

    Some(Describe {
        count: sorted.len(),
        mean,
        std,
        min: sorted[0],
        p25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        p75: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Linear-interpolation quantile of sorted, non-empty data
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Pearson correlation over rows where both values are finite.
///
/// `None` with fewer than two such rows or when either side is constant.
#[allow(clippy::cast_precision_loss)]
pub fn correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .map(|(x, y)| (*x, *y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Column of one pollutant aligned with `readings`, NaN where missing
pub fn pollutant_column(readings: &[Reading], pollutant: &str) -> Vec<f64> {
    readings
        .iter()
        .map(|r| r.pollutants.get(pollutant).unwrap_or(f64::NAN))
        .collect()
}
