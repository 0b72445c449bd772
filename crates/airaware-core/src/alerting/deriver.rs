//! Alert derivation from current readings, forecasts and limits

use crate::config::AlertingConfig;
use crate::models::{Alert, ForecastOutcome, LimitTable, PollutantReadings};

use super::categorizer::{categorize, MissingAqiPolicy};

/// Predicted AQI above which a forecast date is reported
pub const FORECAST_ALERT_THRESHOLD: f64 = 300.0;

/// Derive alerts with the default policies.
///
/// See [`AlertDeriver::derive`] for the rules. A NaN `current_aqi` is
/// evaluated as 0.
pub fn derive_alerts(
    current_aqi: f64,
    forecast: &ForecastOutcome,
    readings: &PollutantReadings,
    limits: &LimitTable,
) -> Vec<Alert> {
    AlertDeriver::default().derive(Some(current_aqi), forecast, readings, limits)
}

/// Stateless rule evaluator turning one snapshot into a list of alerts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertDeriver {
    forecast_threshold: f64,
    missing_aqi: MissingAqiPolicy,
}

impl Default for AlertDeriver {
    fn default() -> Self {
        Self {
            forecast_threshold: FORECAST_ALERT_THRESHOLD,
            missing_aqi: MissingAqiPolicy::default(),
        }
    }
}

impl AlertDeriver {
    /// Create a deriver with the default thresholds and policies
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deriver from alerting configuration
    pub fn from_config(config: &AlertingConfig) -> Self {
        Self {
            forecast_threshold: config.forecast_threshold,
            missing_aqi: config.missing_aqi,
        }
    }

    /// Override the forecast alert threshold
    #[must_use]
    pub fn with_forecast_threshold(mut self, threshold: f64) -> Self {
        self.forecast_threshold = threshold;
        self
    }

    /// Override the missing-AQI policy
    #[must_use]
    pub fn with_missing_aqi(mut self, policy: MissingAqiPolicy) -> Self {
        self.missing_aqi = policy;
        self
    }

    /// Policy applied to a missing current AQI
    pub fn missing_aqi(&self) -> MissingAqiPolicy {
        self.missing_aqi
    }

    /// Evaluate every rule and return the triggered alerts.
    ///
    /// Alerts come out in a fixed order:
    /// 1. at most one current-level alert, for the most severe band above
    ///    Satisfactory;
    /// 2. at most one forecast alert listing every date predicted above the
    ///    forecast threshold (nothing when the forecast is unavailable);
    /// 3. one alert per pollutant whose reading strictly exceeds its limit, in
    ///    limit table order. Missing or NaN readings and non-finite limits are
    ///    skipped.
    ///
    /// An empty result means all clear.
    pub fn derive(
        &self,
        current_aqi: Option<f64>,
        forecast: &ForecastOutcome,
        readings: &PollutantReadings,
        limits: &LimitTable,
    ) -> Vec<Alert> {
        let mut alerts = Vec::with_capacity(2 + limits.len());

        alerts.extend(self.current_level_alert(current_aqi));
        alerts.extend(self.forecast_alert(forecast));
        alerts.extend(limit_breach_alerts(readings, limits));

        alerts
    }

    fn current_level_alert(&self, current_aqi: Option<f64>) -> Option<Alert> {
        let aqi = self.missing_aqi.resolve(current_aqi)?;
        Alert::current_level(categorize(aqi), aqi)
    }

    fn forecast_alert(&self, forecast: &ForecastOutcome) -> Option<Alert> {
        let dates: Vec<_> = forecast
            .points()
            .iter()
            .filter(|point| point.predicted > self.forecast_threshold)
            .map(|point| point.date)
            .collect();

        if dates.is_empty() {
            None
        } else {
            Some(Alert::forecast(dates))
        }
    }
}

fn limit_breach_alerts<'a>(
    readings: &'a PollutantReadings,
    limits: &'a LimitTable,
) -> impl Iterator<Item = Alert> + 'a {
    limits
        .iter()
        .filter(|entry| entry.limit.is_finite())
        .filter_map(move |entry| {
            let value = readings.get(entry.pollutant.as_str())?;
            (value > entry.limit)
                .then(|| Alert::limit_breach(entry.pollutant.clone(), value, entry.limit))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertKind, Category, ForecastPoint, Pollutant, Severity};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
    }

    fn point(d: u32, predicted: f64) -> ForecastPoint {
        ForecastPoint::new(day(d), predicted, predicted - 20.0, predicted + 20.0)
    }

    fn no_forecast() -> ForecastOutcome {
        ForecastOutcome::available(vec![])
    }

    #[test]
    fn test_current_level_picks_most_severe_tier() {
        let alerts = derive_alerts(
            350.0,
            &no_forecast(),
            &PollutantReadings::new(),
            &LimitTable::default(),
        );

        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].kind,
            AlertKind::CurrentLevel {
                category: Category::VeryPoor,
                aqi: 350.0
            }
        );
    }

    #[test]
    fn test_current_level_thresholds_are_strict() {
        let empty = PollutantReadings::new();
        let limits = LimitTable::default();

        assert!(derive_alerts(100.0, &no_forecast(), &empty, &limits).is_empty());

        let at_200 = derive_alerts(200.0, &no_forecast(), &empty, &limits);
        assert_eq!(at_200[0].severity, Severity::Info);

        let above_200 = derive_alerts(200.5, &no_forecast(), &empty, &limits);
        assert_eq!(above_200[0].severity, Severity::Warning);
    }

    #[test]
    fn test_forecast_alert_aggregates_dates() {
        let forecast = ForecastOutcome::available(vec![
            point(1, 320.0),
            point(2, 280.0),
            point(3, 301.0),
            point(4, 300.0),
        ]);

        let alerts = derive_alerts(
            50.0,
            &forecast,
            &PollutantReadings::new(),
            &LimitTable::default(),
        );

        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].kind,
            AlertKind::Forecast {
                dates: vec![day(1), day(3)]
            }
        );
    }

    #[test]
    fn test_unavailable_forecast_is_skipped() {
        let alerts = derive_alerts(
            20.0,
            &ForecastOutcome::unavailable("model failed"),
            &PollutantReadings::new(),
            &LimitTable::who(),
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_nan_forecast_points_never_alert() {
        let forecast = ForecastOutcome::available(vec![point(1, f64::NAN)]);
        let alerts = derive_alerts(
            0.0,
            &forecast,
            &PollutantReadings::new(),
            &LimitTable::default(),
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_limit_breaches_follow_table_order() {
        let readings: PollutantReadings =
            [("O3", 180.0), ("PM2.5", 40.0), ("PM10", 44.0), ("SO2", 900.0)]
                .into_iter()
                .collect();

        let alerts = derive_alerts(10.0, &no_forecast(), &readings, &LimitTable::who());

        let breached: Vec<_> = alerts
            .iter()
            .map(|a| match &a.kind {
                AlertKind::LimitBreach { pollutant, .. } => pollutant.clone(),
                other => panic!("unexpected alert {other:?}"),
            })
            .collect();
        assert_eq!(breached, vec![Pollutant::pm25(), Pollutant::o3()]);
    }

    #[test]
    fn test_limit_equal_to_reading_does_not_breach() {
        let readings: PollutantReadings = [("PM10", 45.0)].into_iter().collect();
        let alerts = derive_alerts(10.0, &no_forecast(), &readings, &LimitTable::who());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_nan_reading_and_nan_limit_are_skipped() {
        let readings: PollutantReadings =
            [("PM2.5", f64::NAN), ("PM10", 90.0)].into_iter().collect();
        let limits: LimitTable = [("PM2.5", 15.0), ("PM10", f64::NAN)].into_iter().collect();

        assert!(derive_alerts(10.0, &no_forecast(), &readings, &limits).is_empty());
    }

    #[test]
    fn test_output_order() {
        let forecast = ForecastOutcome::available(vec![point(2, 410.0)]);
        let readings: PollutantReadings = [("PM2.5", 99.0)].into_iter().collect();

        let alerts = derive_alerts(420.0, &forecast, &readings, &LimitTable::who());

        let kinds: Vec<&str> = alerts
            .iter()
            .map(|a| match a.kind {
                AlertKind::CurrentLevel { .. } => "current",
                AlertKind::Forecast { .. } => "forecast",
                AlertKind::LimitBreach { .. } => "limit",
            })
            .collect();
        assert_eq!(kinds, vec!["current", "forecast", "limit"]);
    }

    #[test]
    fn test_skip_policy_suppresses_current_level() {
        let deriver = AlertDeriver::new().with_missing_aqi(MissingAqiPolicy::Skip);
        let alerts = deriver.derive(
            None,
            &no_forecast(),
            &PollutantReadings::new(),
            &LimitTable::default(),
        );
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_substitute_policy_can_raise_alert() {
        let deriver =
            AlertDeriver::new().with_missing_aqi(MissingAqiPolicy::Substitute { value: 500.0 });
        let alerts = deriver.derive(
            Some(f64::NAN),
            &no_forecast(),
            &PollutantReadings::new(),
            &LimitTable::default(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn test_custom_forecast_threshold() {
        let deriver = AlertDeriver::new().with_forecast_threshold(150.0);
        let forecast = ForecastOutcome::available(vec![point(1, 160.0), point(2, 120.0)]);
        let alerts = deriver.derive(
            Some(0.0),
            &forecast,
            &PollutantReadings::new(),
            &LimitTable::default(),
        );
        assert_eq!(
            alerts[0].kind,
            AlertKind::Forecast {
                dates: vec![day(1)]
            }
        );
    }
}
