//! End-to-end alert scenarios through the public API

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;

use airaware::alerting::{derive_alerts, StationEvaluator};
use airaware::data::{normalize_units, Dataset};
use airaware::forecast::{ForecastHorizon, PersistenceForecaster};
use airaware::models::{
    AlertKind, Category, ForecastOutcome, ForecastPoint, LimitTable, PollutantReadings, Severity,
};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

fn point(d: u32, predicted: f64) -> ForecastPoint {
    ForecastPoint::new(date(d), predicted, predicted - 20.0, predicted + 20.0)
}

fn quiet_readings() -> PollutantReadings {
    [("PM2.5", 10.0), ("PM10", 30.0), ("O3", 50.0)]
        .into_iter()
        .collect()
}

#[rstest]
#[case(450.0, Category::Severe, Severity::Critical)]
#[case(350.0, Category::VeryPoor, Severity::Critical)]
#[case(250.0, Category::Poor, Severity::Warning)]
#[case(150.0, Category::Moderate, Severity::Info)]
fn current_level_alone(#[case] aqi: f64, #[case] category: Category, #[case] severity: Severity) {
    let alerts = derive_alerts(
        aqi,
        &ForecastOutcome::available(vec![]),
        &quiet_readings(),
        &LimitTable::who(),
    );

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, severity);
    assert_eq!(
        alerts[0].kind,
        AlertKind::CurrentLevel { category, aqi }
    );
}

#[test]
fn single_limit_breach_on_clean_day() {
    let readings: PollutantReadings = [("PM2.5", 20.0)].into_iter().collect();
    let limits: LimitTable = [("PM2.5", 15.0)].into_iter().collect();

    let alerts = derive_alerts(90.0, &ForecastOutcome::available(vec![]), &readings, &limits);

    assert_eq!(alerts.len(), 1);
    assert_eq!(
        alerts[0].message,
        "PM2.5: 20.0 µg/m³ exceeds WHO limit (15)."
    );
}

#[test]
fn forecast_alert_names_only_dates_over_threshold() {
    let forecast = ForecastOutcome::available(vec![point(1, 320.0), point(2, 280.0)]);

    let alerts = derive_alerts(50.0, &forecast, &quiet_readings(), &LimitTable::who());

    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].severity, Severity::Critical);
    assert_eq!(
        alerts[0].kind,
        AlertKind::Forecast {
            dates: vec![date(1)]
        }
    );
    assert_eq!(alerts[0].message, "Severe AQI expected on 2025-01-01.");
}

#[test]
fn everything_within_bounds_is_quiet() {
    let forecast = ForecastOutcome::available(vec![point(1, 120.0), point(2, 300.0)]);
    let alerts = derive_alerts(100.0, &forecast, &quiet_readings(), &LimitTable::who());
    assert!(alerts.is_empty());
}

#[test]
fn alerts_come_out_in_display_order() {
    let forecast = ForecastOutcome::available(vec![point(1, 410.0)]);
    let readings: PollutantReadings = [("O3", 140.0), ("PM10", 80.0), ("PM2.5", 60.0)]
        .into_iter()
        .collect();

    let alerts = derive_alerts(310.0, &forecast, &readings, &LimitTable::who());

    let kinds: Vec<&str> = alerts
        .iter()
        .map(|a| match &a.kind {
            AlertKind::CurrentLevel { .. } => "current",
            AlertKind::Forecast { .. } => "forecast",
            AlertKind::LimitBreach { pollutant, .. } => pollutant.as_str(),
        })
        .collect();
    assert_eq!(kinds, vec!["current", "forecast", "PM2.5", "PM10", "O3"]);
}

#[test]
fn unavailable_forecast_is_skipped() {
    let alerts = derive_alerts(
        50.0,
        &ForecastOutcome::unavailable("model offline"),
        &quiet_readings(),
        &LimitTable::who(),
    );
    assert!(alerts.is_empty());
}

const DATASET: &str = r#"{
  "stations": [
    {
      "city": "Delhi",
      "readings": [
        { "date": "2025-01-03", "aqi": 0.86, "pollutants": { "PM2.5": 0.21, "PM10": 0.39, "O3": 0.04 } },
        { "date": "2025-01-01", "aqi": 0.70, "pollutants": { "PM2.5": 0.15, "PM10": 0.30, "O3": 0.03 } },
        { "date": "2025-01-02", "aqi": 0.78, "pollutants": { "PM2.5": 0.18, "PM10": 0.35, "O3": 0.05 } }
      ]
    },
    {
      "city": "Shillong",
      "readings": [
        { "date": "2025-01-01", "aqi": 0.06, "pollutants": { "PM2.5": 0.004, "PM10": 0.012, "O3": 0.02 } },
        { "date": "2025-01-02", "aqi": null, "pollutants": { "PM2.5": 0.005, "PM10": null, "O3": 0.02 } }
      ]
    }
  ]
}"#;

#[test]
fn dataset_to_station_reports() {
    let mut dataset = Dataset::from_json_str(DATASET).unwrap();
    let report = normalize_units(&mut dataset);
    assert!(report.aqi_rescaled);

    let forecaster = PersistenceForecaster::new();
    let evaluator = StationEvaluator::new(LimitTable::who())
        .with_forecaster(&forecaster)
        .with_horizon(ForecastHorizon::THREE_DAYS);

    let delhi = evaluator.evaluate(dataset.station("Delhi").unwrap()).unwrap();
    assert_eq!(delhi.as_of, date(3));
    assert_eq!(delhi.category, Some(Category::Severe));
    assert_eq!(delhi.forecast.points().len(), 3);
    assert_eq!(delhi.alerts[0].severity, Severity::Critical);
    assert!(matches!(delhi.alerts[1].kind, AlertKind::Forecast { .. }));
    assert!(delhi
        .alerts
        .iter()
        .any(|a| matches!(&a.kind, AlertKind::LimitBreach { pollutant, .. } if pollutant.as_str() == "PM2.5")));

    // Missing AQI on the latest day falls back to Good
    let shillong = evaluator
        .evaluate(dataset.station("Shillong").unwrap())
        .unwrap();
    assert_eq!(shillong.category, Some(Category::Good));
    assert!(shillong
        .alerts
        .iter()
        .all(|a| !matches!(a.kind, AlertKind::CurrentLevel { .. })));
}

#[test]
fn unknown_station_is_not_found() {
    let dataset = Dataset::from_json_str(DATASET).unwrap();
    let err = dataset.station("Atlantis").unwrap_err();
    assert!(matches!(err, airaware::Error::NotFound { .. }));
}
