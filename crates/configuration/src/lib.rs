use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalyticsSettings, Config, LoggingSettings, MAX_FORECAST_HORIZON, MAX_LAG_DAYS, OutputFormat,
    OutputSettings,
};

/// Prefix of environment variables that override file settings,
/// e.g. `SALESIGHT__ANALYTICS__OUTLIER_THRESHOLD=2.5`.
pub const ENV_PREFIX: &str = "SALESIGHT";

/// Loads the application configuration.
///
/// Built-in defaults are overlaid by the TOML file at `path` (when it exists)
/// and then by `SALESIGHT__*` environment variables. The merged result is
/// validated before it is returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("analytics.outlier_metrics")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(config)
}

/// Parses configuration from a TOML string. Missing keys fall back to defaults.
pub fn from_toml_str(contents: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(contents, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analytics.validate()
    }
}

impl AnalyticsSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.outlier_threshold.is_finite() && self.outlier_threshold > 0.0) {
            return Err(invalid(format!(
                "outlier_threshold must be a positive number, got {}",
                self.outlier_threshold
            )));
        }
        if self.outlier_metrics.is_empty() {
            return Err(invalid("outlier_metrics must name at least one metric".to_string()));
        }
        if self.moving_average_window == 0 {
            return Err(invalid("moving_average_window must be at least 1".to_string()));
        }
        if self.forecast_horizon > MAX_FORECAST_HORIZON {
            return Err(invalid(format!(
                "forecast_horizon must be at most {MAX_FORECAST_HORIZON}, got {}",
                self.forecast_horizon
            )));
        }
        if !(0..=MAX_LAG_DAYS).contains(&self.max_lag_days) {
            return Err(invalid(format!(
                "max_lag_days must be between 0 and {MAX_LAG_DAYS}, got {}",
                self.max_lag_days
            )));
        }
        if self.min_lag_overlap < 2 {
            return Err(invalid(format!(
                "min_lag_overlap must be at least 2, got {}",
                self.min_lag_overlap
            )));
        }
        let (a, b) = (self.pareto_a_cutoff, self.pareto_b_cutoff);
        if !(a > 0.0 && a < b && b <= 1.0) {
            return Err(invalid(format!(
                "pareto cutoffs must satisfy 0 < a < b <= 1, got a={a}, b={b}"
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::ValidationError(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Metric;

    #[test]
    fn empty_document_yields_defaults() {
        let config = from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.analytics.outlier_threshold, 2.0);
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn file_values_override_defaults() {
        let config = from_toml_str(
            r#"
            [analytics]
            outlier_threshold = 3.0
            outlier_metrics = ["revenue"]
            outlier_top_n = 10
            pareto_a_cutoff = 0.7

            [logging]
            level = "debug"

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.analytics.outlier_threshold, 3.0);
        assert_eq!(config.analytics.outlier_metrics, vec![Metric::Revenue]);
        assert_eq!(config.analytics.outlier_top_n, Some(10));
        assert_eq!(config.analytics.pareto_a_cutoff, 0.7);
        assert_eq!(config.analytics.pareto_b_cutoff, 0.95);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn rejects_inverted_pareto_cutoffs() {
        let err = from_toml_str("[analytics]\npareto_a_cutoff = 0.96\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_non_positive_threshold_and_tiny_overlap() {
        assert!(from_toml_str("[analytics]\noutlier_threshold = 0.0\n").is_err());
        assert!(from_toml_str("[analytics]\nmin_lag_overlap = 1\n").is_err());
        assert!(from_toml_str("[analytics]\nmoving_average_window = 0\n").is_err());
    }

    #[test]
    fn rejects_out_of_range_lag_and_horizon() {
        assert!(from_toml_str("[analytics]\nmax_lag_days = -1\n").is_err());
        assert!(from_toml_str("[analytics]\nmax_lag_days = 200000000000000\n").is_err());
        assert!(from_toml_str("[analytics]\nforecast_horizon = 100000000\n").is_err());

        let config = from_toml_str("[analytics]\nmax_lag_days = 366\nforecast_horizon = 366\n").unwrap();
        assert_eq!(config.analytics.max_lag_days, MAX_LAG_DAYS);
        assert_eq!(config.analytics.forecast_horizon, MAX_FORECAST_HORIZON);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let config = load_config("definitely/not/here/salesight.toml").unwrap();
        assert_eq!(config.analytics.moving_average_window, 7);
    }
}
