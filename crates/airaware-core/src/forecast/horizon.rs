//! Forecast horizon

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SECONDS_PER_DAY: u64 = 86_400;

/// Number of daily steps to forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ForecastHorizon(u32);

impl ForecastHorizon {
    /// Next 24 hours
    pub const DAY: Self = Self(1);
    /// Next three days
    pub const THREE_DAYS: Self = Self(3);
    /// Next seven days
    pub const WEEK: Self = Self(7);

    /// Longest supported horizon, in days
    pub const MAX_DAYS: u32 = 366;

    /// Horizon of `days` steps, between one and [`Self::MAX_DAYS`]
    pub fn days(days: u32) -> Result<Self> {
        if days == 0 {
            return Err(Error::validation("forecast horizon must be at least one day"));
        }
        if days > Self::MAX_DAYS {
            return Err(Error::validation(format!(
                "forecast horizon of {days} days exceeds the maximum of {} days",
                Self::MAX_DAYS
            )));
        }
        Ok(Self(days))
    }

    /// Convert a duration that spans a whole number of days
    pub fn from_duration(duration: Duration) -> Result<Self> {
        let secs = duration.as_secs();
        if duration.subsec_nanos() != 0 || secs % SECONDS_PER_DAY != 0 {
            return Err(Error::validation(format!(
                "forecast horizon {} is not a whole number of days",
                humantime::format_duration(duration)
            )));
        }

        let days = u32::try_from(secs / SECONDS_PER_DAY)
            .map_err(|_| Error::validation("forecast horizon is too long"))?;
        Self::days(days)
    }

    /// Number of steps
    pub fn steps(self) -> u32 {
        self.0
    }

    /// Horizon as a duration
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(u64::from(self.0) * SECONDS_PER_DAY)
    }
}

impl Default for ForecastHorizon {
    fn default() -> Self {
        Self::WEEK
    }
}

impl FromStr for ForecastHorizon {
    type Err = Error;

    /// Parses human durations such as `24h`, `3d` or `7days`
    fn from_str(s: &str) -> Result<Self> {
        let duration = humantime::parse_duration(s.trim())
            .map_err(|e| Error::validation(format!("invalid forecast horizon '{s}': {e}")))?;
        Self::from_duration(duration)
    }
}

impl TryFrom<u32> for ForecastHorizon {
    type Error = Error;

    fn try_from(days: u32) -> Result<Self> {
        Self::days(days)
    }
}

impl From<ForecastHorizon> for u32 {
    fn from(horizon: ForecastHorizon) -> Self {
        horizon.0
    }
}

impl fmt::Display for ForecastHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            1 => write!(f, "24 hours"),
            n => write!(f, "{n} days"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("24h", 1)]
    #[case("1day", 1)]
    #[case("3d", 3)]
    #[case("7days", 7)]
    #[case("2weeks", 14)]
    fn test_parse(#[case] input: &str, #[case] steps: u32) {
        let horizon: ForecastHorizon = input.parse().unwrap();
        assert_eq!(horizon.steps(), steps);
    }

    #[rstest]
    #[case("36h")]
    #[case("0d")]
    #[case("soon")]
    #[case("367d")]
    #[case("100000000d")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(input.parse::<ForecastHorizon>().is_err());
    }

    #[test]
    fn test_upper_bound() {
        assert_eq!(
            ForecastHorizon::days(ForecastHorizon::MAX_DAYS).unwrap().steps(),
            366
        );
        assert!(ForecastHorizon::try_from(ForecastHorizon::MAX_DAYS + 1).is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(ForecastHorizon::default(), ForecastHorizon::WEEK);
        assert_eq!(ForecastHorizon::DAY.to_string(), "24 hours");
        assert_eq!(ForecastHorizon::THREE_DAYS.to_string(), "3 days");
        assert_eq!(
            ForecastHorizon::from_duration(ForecastHorizon::WEEK.as_duration()).unwrap(),
            ForecastHorizon::WEEK
        );
    }
}
