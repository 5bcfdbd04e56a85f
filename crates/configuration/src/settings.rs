use core_types::Metric;
use serde::{Deserialize, Serialize};

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analytics: AnalyticsSettings,
    pub logging: LoggingSettings,
    pub output: OutputSettings,
}

/// Upper bound on `max_lag_days`; a year either side covers any seasonal delay.
pub const MAX_LAG_DAYS: i64 = 366;

/// Upper bound on `forecast_horizon`.
pub const MAX_FORECAST_HORIZON: usize = 366;

/// Tunables of the analytics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Minimum absolute z-score for a day to be flagged as an outlier.
    pub outlier_threshold: f64,
    /// The metrics whose z-scores are tracked by the outlier detector.
    pub outlier_metrics: Vec<Metric>,
    /// Caps the ranked outlier list. `None` keeps every flagged day.
    pub outlier_top_n: Option<usize>,
    /// Trailing window (in days) of the moving average.
    pub moving_average_window: usize,
    /// Number of days projected by the flat forecast, at most [`MAX_FORECAST_HORIZON`].
    pub forecast_horizon: usize,
    /// The lag sweep covers `-max_lag_days..=max_lag_days`, with
    /// `0 <= max_lag_days <= MAX_LAG_DAYS`.
    pub max_lag_days: i64,
    /// Matched days required before a lag gets a non-zero correlation.
    pub min_lag_overlap: usize,
    /// Cumulative share up to which entries are class A.
    pub pareto_a_cutoff: f64,
    /// Cumulative share up to which entries are class B.
    pub pareto_b_cutoff: f64,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            outlier_threshold: 2.0,
            outlier_metrics: vec![Metric::Revenue, Metric::Quantity],
            outlier_top_n: None,
            moving_average_window: 7,
            forecast_horizon: 7,
            max_lag_days: 7,
            min_lag_overlap: 3,
            pareto_a_cutoff: 0.80,
            pareto_b_cutoff: 0.95,
        }
    }
}

/// Contains parameters for the tracing subscriber installed by the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, e.g. "info" or "analytics=debug". `RUST_LOG` takes precedence.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

/// How the CLI renders results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
