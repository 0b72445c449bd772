//! AirAware CLI
//!
//! Command-line interface for the AirAware alerting engine.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use console::{style, Color, StyledObject};
use serde::Serialize;
use tracing::{debug, info};

use airaware::alerting::{categorize, StationEvaluator, StationReport};
use airaware::data::summary::{self, DataQuality, Describe};
use airaware::data::{normalize_units, Dataset};
use airaware::forecast::{
    request_forecast, ForecastAccuracy, ForecastHorizon, Forecaster, PersistenceForecaster,
};
use airaware::models::{Category, ForecastOutcome, Severity, CONCENTRATION_UNIT, NO_ACTIVE_ALERTS};
use airaware::Config;

/// AirAware - Air quality categorization and alerts
#[derive(Parser)]
#[command(name = "airaware")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "AIRAWARE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the AQI category of one or more values
    Categorize {
        /// AQI values
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
    },

    /// Evaluate alerts for stations in a dataset
    Alerts {
        /// Dataset file (JSON)
        #[arg(long, env = "AIRAWARE_DATA")]
        data: Option<PathBuf>,

        /// Station to evaluate (all stations if omitted)
        #[arg(long)]
        city: Option<String>,

        /// Forecast horizon (e.g. "24h", "3d", "7d")
        #[arg(long)]
        horizon: Option<ForecastHorizon>,

        /// Skip the forecast step
        #[arg(long)]
        no_forecast: bool,
    },

    /// Forecast AQI or one pollutant for a station
    Forecast {
        /// Dataset file (JSON)
        #[arg(long, env = "AIRAWARE_DATA")]
        data: Option<PathBuf>,

        /// Station to forecast
        #[arg(long)]
        city: String,

        /// Pollutant to forecast (AQI if omitted), e.g. "PM2.5"
        #[arg(long)]
        pollutant: Option<String>,

        /// Forecast horizon (e.g. "24h", "3d", "7d")
        #[arg(long)]
        horizon: Option<ForecastHorizon>,

        /// Score the model on the last N observations
        #[arg(long)]
        holdout: Option<usize>,
    },

    /// Data quality and descriptive statistics for a station
    Summary {
        /// Dataset file (JSON)
        #[arg(long, env = "AIRAWARE_DATA")]
        data: Option<PathBuf>,

        /// Station to summarize
        #[arg(long)]
        city: String,

        /// First date to include
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last date to include
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Only the most recent N readings of the selected range
        #[arg(long)]
        recent: Option<usize>,
    },

    /// Show the pollutant limit table in effect
    Limits,

    /// List the stations in a dataset
    Stations {
        /// Dataset file (JSON)
        #[arg(long, env = "AIRAWARE_DATA")]
        data: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    init_logging(&config, cli.verbose);
    match Config::resolve_path(cli.config.as_deref()) {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => debug!("Using built-in configuration"),
    }

    // Execute command
    let result = match cli.command {
        Commands::Categorize { values } => run_categorize(&values, cli.format),
        Commands::Alerts {
            data,
            city,
            horizon,
            no_forecast,
        } => run_alerts(&config, data, city.as_deref(), horizon, no_forecast, cli.format),
        Commands::Forecast {
            data,
            city,
            pollutant,
            horizon,
            holdout,
        } => run_forecast(
            &config,
            data,
            &city,
            pollutant.as_deref(),
            horizon,
            holdout,
            cli.format,
        ),
        Commands::Summary {
            data,
            city,
            from,
            to,
            recent,
        } => run_summary(&config, data, &city, from, to, recent, cli.format),
        Commands::Limits => run_limits(&config, cli.format),
        Commands::Stations { data } => run_stations(&config, data, cli.format),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_dataset(config: &Config, data: Option<PathBuf>) -> anyhow::Result<Dataset> {
    let path = data
        .or_else(|| config.data.path.clone())
        .context("no dataset given; pass --data or set data.path in the config")?;

    let mut dataset = Dataset::from_json_file(&path)
        .with_context(|| format!("failed to load dataset {}", path.display()))?;

    if config.data.normalize_units {
        let report = normalize_units(&mut dataset);
        debug!(?report, "Unit normalization");
    }
    Ok(dataset)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_categorize(values: &[f64], format: OutputFormat) -> anyhow::Result<()> {
    #[derive(Serialize)]
    struct Categorized {
        value: f64,
        category: Category,
        color: &'static str,
    }

    let results: Vec<Categorized> = values
        .iter()
        .map(|&value| {
            let category = categorize(value);
            Categorized {
                value,
                category,
                color: category.color(),
            }
        })
        .collect();

    if format == OutputFormat::Json {
        return print_json(&results);
    }

    for r in &results {
        println!("{:>8.1}  {}", r.value, styled_category(r.category));
    }
    Ok(())
}

fn run_alerts(
    config: &Config,
    data: Option<PathBuf>,
    city: Option<&str>,
    horizon: Option<ForecastHorizon>,
    no_forecast: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let dataset = load_dataset(config, data)?;

    let forecaster = PersistenceForecaster::new();
    let mut evaluator = StationEvaluator::from_config(config)?;
    if let Some(horizon) = horizon {
        evaluator = evaluator.with_horizon(horizon);
    }
    if config.forecast.enabled && !no_forecast {
        evaluator = evaluator.with_forecaster(&forecaster);
    }

    let stations = match city {
        Some(city) => vec![dataset.station(city)?],
        None => dataset.stations.iter().collect(),
    };
    info!(stations = stations.len(), "Evaluating alerts");

    let reports = stations
        .into_iter()
        .map(|station| evaluator.evaluate(station))
        .collect::<airaware::Result<Vec<_>>>()?;

    if format == OutputFormat::Json {
        return print_json(&reports);
    }

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &StationReport) {
    println!(
        "{} (as of {})",
        style(&report.city).bold(),
        report.as_of
    );

    match (report.current_aqi, report.category) {
        (Some(aqi), Some(category)) => {
            println!("  Current AQI: {aqi:.1}  {}", styled_category(category));
        }
        _ => println!("  Current AQI: {}", style("not reported").dim()),
    }

    if !report.pollutants.is_empty() {
        let pollutants = report
            .pollutants
            .iter()
            .filter(|(_, v)| !v.is_nan())
            .map(|(p, v)| format!("{p} {v:.1}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  Pollutants ({CONCENTRATION_UNIT}): {pollutants}");
    }

    match &report.forecast {
        ForecastOutcome::Available { points } => {
            println!("  Forecast ({} days):", points.len());
            for (point, category) in report.forecast.categorized() {
                println!(
                    "    {} {}  {:>5.0}  [{:.0}, {:.0}]  {}",
                    point.date.format("%a"),
                    point.date,
                    point.predicted,
                    point.lower,
                    point.upper,
                    styled_category(category)
                );
            }
        }
        ForecastOutcome::Unavailable { reason } => {
            println!("  Forecast: {}", style(format!("unavailable ({reason})")).dim());
        }
    }

    println!("  Alerts:");
    if report.all_clear() {
        println!("    {}", style(NO_ACTIVE_ALERTS).green());
    }
    for alert in &report.alerts {
        let tag = match alert.severity {
            Severity::Info => style(alert.severity.to_string()).cyan(),
            Severity::Warning => style(alert.severity.to_string()).yellow(),
            Severity::Critical => style(alert.severity.to_string()).red().bold(),
        };
        println!("    [{tag}] {alert}");
    }
}

#[derive(Serialize)]
struct ForecastView {
    city: String,
    column: String,
    unit: Option<&'static str>,
    model: String,
    horizon: ForecastHorizon,
    limit: Option<f64>,
    forecast: ForecastOutcome,
    accuracy: Option<ForecastAccuracy>,
}

fn run_forecast(
    config: &Config,
    data: Option<PathBuf>,
    city: &str,
    pollutant: Option<&str>,
    horizon: Option<ForecastHorizon>,
    holdout: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let dataset = load_dataset(config, data)?;
    let station = dataset.station(city)?;

    let series = station.series(pollutant);
    if let Some(pollutant) = pollutant {
        if series.is_empty() {
            anyhow::bail!("no {pollutant} readings for {}", station.city);
        }
    }

    let horizon = match horizon {
        Some(horizon) => horizon,
        None => config.forecast.horizon()?,
    };
    let forecaster = PersistenceForecaster::new();
    let forecast = request_forecast(&forecaster, &series, horizon);
    let accuracy = holdout
        .map(|n| ForecastAccuracy::backtest(&forecaster, &series, n))
        .transpose()?;

    let view = ForecastView {
        city: station.city.clone(),
        column: pollutant.unwrap_or("AQI").to_string(),
        unit: pollutant.map(|_| CONCENTRATION_UNIT),
        model: forecaster.name().to_string(),
        horizon,
        limit: pollutant.and_then(|p| config.alerting.limits.get(p)),
        forecast,
        accuracy,
    };

    if format == OutputFormat::Json {
        return print_json(&view);
    }

    println!(
        "{} {} forecast, next {} ({})",
        style(&view.city).bold(),
        view.column,
        view.horizon,
        view.model
    );
    match &view.forecast {
        ForecastOutcome::Available { points } => {
            for point in points {
                // AQI bands only apply to AQI; pollutants are checked against their limit
                let status = match (pollutant, view.limit) {
                    (None, _) => styled_category(categorize(point.predicted)).to_string(),
                    (Some(_), Some(limit)) if point.predicted > limit => {
                        style(format!("exceeds limit ({limit})")).red().to_string()
                    }
                    (Some(_), _) => String::new(),
                };
                println!(
                    "  {} {}  {:>7.1}  [{:.1}, {:.1}]  {status}",
                    point.date.format("%a"),
                    point.date,
                    point.predicted,
                    point.lower,
                    point.upper,
                );
            }
        }
        ForecastOutcome::Unavailable { reason } => {
            println!("  {}", style(format!("Forecast unavailable ({reason})")).dim());
        }
    }

    if let Some(accuracy) = &view.accuracy {
        println!(
            "  Backtest over {} observations: RMSE {:.2}  MAE {:.2}",
            accuracy.samples, accuracy.rmse, accuracy.mae
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct ColumnSummary {
    column: String,
    stats: Option<Describe>,
}

#[derive(Serialize)]
struct SummaryReport {
    city: String,
    readings: usize,
    first: Option<NaiveDate>,
    last: Option<NaiveDate>,
    quality: DataQuality,
    columns: Vec<ColumnSummary>,
    correlations: Vec<(String, String, Option<f64>)>,
}

fn run_summary(
    config: &Config,
    data: Option<PathBuf>,
    city: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    recent: Option<usize>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let dataset = load_dataset(config, data)?;
    let station = dataset.station(city)?;

    let mut readings = station.between(from, to);
    if let Some(n) = recent {
        readings = &readings[readings.len().saturating_sub(n)..];
    }

    let pollutants = summary::pollutant_columns(readings);
    let aqi: Vec<f64> = readings.iter().map(|r| r.aqi.unwrap_or(f64::NAN)).collect();

    let mut columns = vec![ColumnSummary {
        column: "AQI".to_string(),
        stats: summary::describe(&aqi),
    }];
    let pollutant_values: Vec<Vec<f64>> = pollutants
        .iter()
        .map(|p| summary::pollutant_column(readings, p.as_str()))
        .collect();
    for (p, values) in pollutants.iter().zip(&pollutant_values) {
        columns.push(ColumnSummary {
            column: p.to_string(),
            stats: summary::describe(values),
        });
    }

    let mut correlations = Vec::new();
    for i in 0..pollutants.len() {
        for j in (i + 1)..pollutants.len() {
            correlations.push((
                pollutants[i].to_string(),
                pollutants[j].to_string(),
                summary::correlation(&pollutant_values[i], &pollutant_values[j]),
            ));
        }
    }

    let report = SummaryReport {
        city: station.city.clone(),
        readings: readings.len(),
        first: readings.first().map(|r| r.date),
        last: readings.last().map(|r| r.date),
        quality: DataQuality::assess(readings),
        columns,
        correlations,
    };

    if format == OutputFormat::Json {
        return print_json(&report);
    }

    println!("{}", style(&report.city).bold());
    match (report.first, report.last) {
        (Some(first), Some(last)) => {
            println!("  {} readings from {first} to {last}", report.readings);
        }
        _ => println!("  No readings in range"),
    }
    println!(
        "  Completeness: {:.0}%   Validity: {:.0}%",
        report.quality.completeness, report.quality.validity
    );
    println!();
    println!(
        "  {:<10} {:>6} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for column in &report.columns {
        match &column.stats {
            Some(s) => println!(
                "  {:<10} {:>6} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2}",
                column.column, s.count, s.mean, s.std, s.min, s.p25, s.median, s.p75, s.max
            ),
            None => println!("  {:<10} {:>6}", column.column, 0),
        }
    }

    if !report.correlations.is_empty() {
        println!();
        println!("  Correlations:");
        for (a, b, r) in &report.correlations {
            match r {
                Some(r) => println!("    {a:<8} ~ {b:<8} {r:>6.2}"),
                None => println!("    {a:<8} ~ {b:<8} {:>6}", "n/a"),
            }
        }
    }
    Ok(())
}

fn run_limits(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let limits = &config.alerting.limits;
    if format == OutputFormat::Json {
        return print_json(limits);
    }

    if limits.is_empty() {
        println!("No pollutant limits configured.");
        return Ok(());
    }
    for entry in limits.iter() {
        println!(
            "{:<8} {:>8} {CONCENTRATION_UNIT}",
            entry.pollutant.as_str(),
            entry.limit
        );
    }
    Ok(())
}

fn run_stations(config: &Config, data: Option<PathBuf>, format: OutputFormat) -> anyhow::Result<()> {
    let dataset = load_dataset(config, data)?;
    let cities = dataset.cities();

    if format == OutputFormat::Json {
        return print_json(&cities);
    }
    for city in cities {
        println!("{city}");
    }
    Ok(())
}

fn styled_category(category: Category) -> StyledObject<&'static str> {
    let color = match category {
        Category::Good => Color::Green,
        Category::Satisfactory => Color::Color256(34),
        Category::Moderate => Color::Yellow,
        Category::Poor => Color::Color256(208),
        Category::VeryPoor => Color::Red,
        Category::Severe => Color::Magenta,
    };
    style(category.label()).fg(color).bold()
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "airaware", &mut io::stdout());
}
