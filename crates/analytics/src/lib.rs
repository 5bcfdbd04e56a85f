//! # Salesight Analytics Engine
//!
//! Statistical routines for daily business series: correlation and regression,
//! moving averages and a flat forecast, z-score outliers, Pareto/ABC
//! segmentation, price and discount elasticity, lag sweeps, Welch tests and
//! KPI aggregation.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` and `configuration` (Layer 0).
//! - **Stateless Calculation:** every function is pure. Degenerate input (empty
//!   series, zero variance, zero totals) saturates to neutral values rather than
//!   `NaN` or infinity; only caller contract violations return an error.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: facade that applies the configured tunables.
//! - One module per analysis, usable directly with explicit parameters.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod alignment;
pub mod correlation;
pub mod descriptive;
pub mod elasticity;
pub mod engine;
pub mod error;
pub mod kpi;
pub mod moving_average;
pub mod outliers;
pub mod pareto;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use alignment::{align, align_series, align_with_lag, daily_series};
pub use correlation::{correlate, correlate_pairs};
pub use elasticity::{best_lag, estimate_elasticity, event_uplift, lagged_cross_correlation, welch_approx};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use kpi::{aggregate_kpis, growth_rate};
pub use moving_average::{forecast, forecast_dated, moving_average};
pub use outliers::detect_outliers;
pub use pareto::{ParetoCutoffs, pareto_by, pareto_classify};
pub use report::{
    AbcClass, CorrelationResult, CorrelationStrength, ElasticityKind, ElasticityResult,
    ForecastPoint, KeyedValue, KpiMetric, KpiSet, LagCorrelation, OutlierRecord, ParetoEntry,
    Summary, WelchResult,
};
