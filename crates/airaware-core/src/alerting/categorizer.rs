//! AQI categorization
//!
//! One categorizer serves both display (gauges, forecast cards) and alerting,
//! so the two can never disagree about where a band starts.

use serde::{Deserialize, Serialize};

use crate::models::{Category, BREAKPOINTS};

/// Map an AQI value to its severity band.
///
/// Each breakpoint is inclusive on the lower band: 50 is Good, 50.01 is
/// Satisfactory. Negative values are Good. NaN is treated as 0 and is
/// therefore Good; use [`categorize_with`] to choose a different policy.
pub fn categorize(value: f64) -> Category {
    let value = if value.is_nan() { 0.0 } else { value };

    BREAKPOINTS
        .iter()
        .position(|&upper| value <= upper)
        .map_or(Category::Severe, |idx| Category::ALL[idx])
}

/// Categorize a possibly missing AQI under an explicit policy.
///
/// Returns `None` only when the policy is [`MissingAqiPolicy::Skip`] and the
/// value is missing or NaN.
pub fn categorize_with(value: Option<f64>, policy: MissingAqiPolicy) -> Option<Category> {
    policy.resolve(value).map(categorize)
}

/// What to do when the aggregate AQI is missing or NaN
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MissingAqiPolicy {
    /// Evaluate as if this value had been reported.
    ///
    /// With the default value of 0 a missing AQI reads as Good air, which can
    /// hide a dead sensor.
    Substitute {
        /// Stand-in AQI
        value: f64,
    },
    /// Leave the AQI unevaluated: no category and no current-level alert
    Skip,
}

impl Default for MissingAqiPolicy {
    fn default() -> Self {
        Self::Substitute { value: 0.0 }
    }
}

impl MissingAqiPolicy {
    /// Apply the policy, yielding the AQI to evaluate
    pub fn resolve(self, value: Option<f64>) -> Option<f64> {
        match (value.filter(|v| !v.is_nan()), self) {
            (Some(v), _) => Some(v),
            (None, Self::Substitute { value }) => Some(value),
            (None, Self::Skip) => None,
        }
    }
}
