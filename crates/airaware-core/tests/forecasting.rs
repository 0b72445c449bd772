//! Forecasting a station's AQI or a single pollutant

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use airaware::data::Dataset;
use airaware::forecast::{request_forecast, ForecastAccuracy, ForecastHorizon, PersistenceForecaster};

const DATASET: &str = r#"{
  "stations": [
    {
      "city": "Lucknow",
      "readings": [
        { "date": "2025-02-01", "aqi": 180.0, "pollutants": { "PM2.5": 70.0, "NO2": 30.0 } },
        { "date": "2025-02-02", "aqi": 190.0, "pollutants": { "PM2.5": 80.0, "NO2": 32.0 } },
        { "date": "2025-02-03", "aqi": 210.0, "pollutants": { "PM2.5": null, "NO2": 35.0 } },
        { "date": "2025-02-04", "aqi": 205.0, "pollutants": { "PM2.5": 95.0, "NO2": 31.0 } },
        { "date": "2025-02-05", "aqi": 220.0, "pollutants": { "PM2.5": 105.0, "NO2": 36.0 } }
      ]
    }
  ]
}"#;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
}

#[test]
fn pollutant_forecast_uses_its_own_series() {
    let dataset = Dataset::from_json_str(DATASET).unwrap();
    let station = dataset.station("Lucknow").unwrap();

    let series = station.series(Some("PM2.5"));
    assert_eq!(series.len(), 4);

    let outcome = request_forecast(
        &PersistenceForecaster::new(),
        &series,
        ForecastHorizon::THREE_DAYS,
    );

    let points = outcome.points();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0].date, date(6));
    assert!(points.iter().all(|p| (p.predicted - 105.0).abs() < f64::EPSILON));
}

#[test]
fn aqi_is_the_default_series() {
    let dataset = Dataset::from_json_str(DATASET).unwrap();
    let station = dataset.station("Lucknow").unwrap();

    let outcome = request_forecast(
        &PersistenceForecaster::new(),
        &station.series(None),
        ForecastHorizon::DAY,
    );
    assert!((outcome.points()[0].predicted - 220.0).abs() < f64::EPSILON);
}

#[test]
fn holdout_scores_the_pollutant_tail() {
    let dataset = Dataset::from_json_str(DATASET).unwrap();
    let station = dataset.station("Lucknow").unwrap();

    // trained through Feb 2 (80.0); Feb 3 is missing, Feb 4 and 5 are scored
    let accuracy =
        ForecastAccuracy::backtest(&PersistenceForecaster::new(), &station.series(Some("PM2.5")), 2)
            .unwrap();

    assert_eq!(accuracy.samples, 2);
    assert!((accuracy.mae - 20.0).abs() < 1e-9);
    assert!((accuracy.rmse - 425.0_f64.sqrt()).abs() < 1e-9);
}

#[test]
fn missing_pollutant_has_no_forecast() {
    let dataset = Dataset::from_json_str(DATASET).unwrap();
    let station = dataset.station("Lucknow").unwrap();

    let outcome = request_forecast(
        &PersistenceForecaster::new(),
        &station.series(Some("O3")),
        ForecastHorizon::WEEK,
    );
    assert!(!outcome.is_available());
}
