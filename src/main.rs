use analytics::{AnalyticsEngine, ElasticityKind, best_lag};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use configuration::{Config, LoggingSettings, OutputFormat, load_config};
use core_types::{DailyRecord, Dimension, Metric};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod render;

/// The main entry point for the Salesight analytics CLI.
fn main() {
    // Load SALESIGHT__* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration from {}: {e}", cli.config.display());
            std::process::exit(2);
        }
    };

    let _guard = match init_tracing(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {e:#}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(cli, config) {
        tracing::error!(error = ?e, "Command failed.");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Statistical analytics over daily sales, spend and weather records.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. A missing file means built-in defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides the configured output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Period totals, ROAS, AOV, conversion rate and optional growth.
    Kpis(KpisArgs),
    /// Pearson correlation and OLS fit between two metrics.
    Correlate(CorrelateArgs),
    /// Days whose z-score crosses the outlier threshold.
    Outliers(OutliersArgs),
    /// Pareto ranking and ABC classes by a record dimension.
    Pareto(ParetoArgs),
    /// Price or discount elasticity of quantity.
    Elasticity(ElasticityArgs),
    /// Moving average and flat short-horizon forecast.
    Forecast(ForecastArgs),
    /// Lagged cross-correlation sweep between two metrics.
    Lags(LagsArgs),
    /// Welch comparison of event days against regular days.
    EventUplift(EventUpliftArgs),
}

#[derive(Parser)]
struct InputArgs {
    /// JSON file holding an array of daily records.
    #[arg(long, short)]
    input: PathBuf,
}

#[derive(Parser)]
struct KpisArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Records of the comparison period, for growth rates.
    #[arg(long)]
    previous: Option<PathBuf>,
}

#[derive(Parser)]
struct CorrelateArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, value_enum)]
    x: Metric,
    #[arg(long, value_enum)]
    y: Metric,
    /// Take `y` from this record file instead of the input (e.g. weather data).
    #[arg(long)]
    other: Option<PathBuf>,
}

#[derive(Parser)]
struct OutliersArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long)]
    threshold: Option<f64>,
    /// Keep only the N most extreme days.
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Parser)]
struct ParetoArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, value_enum)]
    by: Dimension,
    #[arg(long, value_enum, default_value = "revenue")]
    metric: Metric,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Price,
    Discount,
}

impl From<KindArg> for ElasticityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Price => ElasticityKind::Price,
            KindArg::Discount => ElasticityKind::Discount,
        }
    }
}

#[derive(Parser)]
struct ElasticityArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, value_enum, default_value = "price")]
    kind: KindArg,
}

#[derive(Parser)]
struct ForecastArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, value_enum, default_value = "revenue")]
    metric: Metric,
    #[arg(long)]
    window: Option<usize>,
    #[arg(long)]
    horizon: Option<usize>,
}

#[derive(Parser)]
struct LagsArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, value_enum)]
    a: Metric,
    #[arg(long, value_enum)]
    b: Metric,
    /// Take `b` from this record file instead of the input.
    #[arg(long)]
    other: Option<PathBuf>,
    #[arg(long)]
    max_lag: Option<i64>,
}

#[derive(Parser)]
struct EventUpliftArgs {
    #[command(flatten)]
    input: InputArgs,
    #[arg(long, value_enum, default_value = "revenue")]
    metric: Metric,
}

// ==============================================================================
// Command Logic
// ==============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ForecastOutput {
    metric: Metric,
    smoothed: Vec<analytics::ForecastPoint>,
    forecast: Vec<analytics::ForecastPoint>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LagOutput {
    lags: Vec<analytics::LagCorrelation>,
    best: Option<analytics::LagCorrelation>,
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let format = cli.format.unwrap_or(config.output.format);
    let mut settings = config.analytics;

    match cli.command {
        Commands::Kpis(args) => {
            let records = read_records(&args.input.input)?;
            let previous = args.previous.as_deref().map(read_records).transpose()?;
            let kpis = AnalyticsEngine::new(settings).aggregate_kpis(&records, previous.as_deref());
            emit(format, &kpis, render::kpis)
        }
        Commands::Correlate(args) => {
            let records = read_records(&args.input.input)?;
            let other = args.other.as_deref().map(read_records).transpose()?;
            let right = other.as_deref().unwrap_or(&records);
            let result = AnalyticsEngine::new(settings).correlate_metrics(&records, right, args.x, args.y);
            emit(format, &result, render::correlation)
        }
        Commands::Outliers(args) => {
            let records = read_records(&args.input.input)?;
            if let Some(threshold) = args.threshold {
                settings.outlier_threshold = threshold;
            }
            if args.top.is_some() {
                settings.outlier_top_n = args.top;
            }
            settings.validate().context("invalid outlier options")?;
            let outliers = AnalyticsEngine::new(settings).detect_outliers(&records);
            emit(format, &outliers, |o| render::outliers(o))
        }
        Commands::Pareto(args) => {
            let records = read_records(&args.input.input)?;
            let ranked = AnalyticsEngine::new(settings).pareto_by(&records, args.by, args.metric);
            emit(format, &ranked, |r| render::pareto(r))
        }
        Commands::Elasticity(args) => {
            let records = read_records(&args.input.input)?;
            let result = AnalyticsEngine::new(settings)
                .elasticity_from_records(&records, args.kind.into())
                .context("failed to estimate elasticity")?;
            emit(format, &result, render::elasticity)
        }
        Commands::Forecast(args) => {
            let records = read_records(&args.input.input)?;
            if let Some(window) = args.window {
                settings.moving_average_window = window;
            }
            if let Some(horizon) = args.horizon {
                settings.forecast_horizon = horizon;
            }
            settings.validate().context("invalid forecast options")?;
            let engine = AnalyticsEngine::new(settings);
            let output = ForecastOutput {
                metric: args.metric,
                smoothed: engine.moving_average(&records, args.metric),
                forecast: engine.forecast(&records, args.metric),
            };
            emit(format, &output, |o| render::forecast(&o.smoothed, &o.forecast))
        }
        Commands::Lags(args) => {
            let records = read_records(&args.input.input)?;
            let other = args.other.as_deref().map(read_records).transpose()?;
            let right = other.as_deref().unwrap_or(&records);
            if let Some(max_lag) = args.max_lag {
                settings.max_lag_days = max_lag;
            }
            settings.validate().context("invalid lag options")?;
            let lags = AnalyticsEngine::new(settings).lagged_cross_correlation(&records, args.a, right, args.b);
            let output = LagOutput {
                best: best_lag(&lags),
                lags,
            };
            emit(format, &output, |o| render::lags(&o.lags, o.best))
        }
        Commands::EventUplift(args) => {
            let records = read_records(&args.input.input)?;
            let result = AnalyticsEngine::new(settings)
                .event_uplift(&records, args.metric)
                .context("failed to compare event days")?;
            emit(format, &result, render::welch)
        }
    }
}

/// Reads a JSON array of daily records.
fn read_records(path: &Path) -> Result<Vec<DailyRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let records: Vec<DailyRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse records from {}", path.display()))?;
    tracing::info!(path = %path.display(), records = records.len(), "Loaded records.");
    Ok(records)
}

/// Prints `value` as pretty JSON or as the table built by `table`.
fn emit<T, F>(format: OutputFormat, value: &T, table: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> comfy_table::Table,
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).context("failed to serialize result")?;
            println!("{json}");
        }
        OutputFormat::Table => println!("{}", table(value)),
    }
    Ok(())
}

/// Installs the stderr subscriber and, when a directory is configured, a daily rolling log file.
///
/// The returned guard must be held until exit so buffered file logs get flushed.
fn init_tracing(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("invalid log filter '{}'", settings.level))?;

    let (file_layer, guard) = match &settings.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "salesight.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}
