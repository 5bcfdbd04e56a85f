//! Descriptive statistics shared by the higher-level analyses.
//!
//! Every function saturates on degenerate input: an empty slice has mean 0 and
//! variance 0, so nothing downstream ever sees `NaN`.

use crate::report::Summary;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by `n`).
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean(values);
    values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Sample variance (divides by `n - 1`). Zero below two values.
pub fn sample_variance(values: &[f64]) -> f64 {
    let n_vals = values.len();
    if n_vals < 2 {
        return 0.0;
    }
    let mean = mean(values);
    values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / (n_vals - 1) as f64
}

pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

pub fn sample_std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// `(value - mean) / std_dev`, or 0 when the spread is zero.
pub fn z_score(value: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }
    (value - mean) / std_dev
}

pub fn summarize(values: &[f64]) -> Summary {
    if values.is_empty() {
        return Summary::default();
    }
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    Summary {
        count: values.len(),
        mean: mean(values),
        std_dev: std_dev(values),
        min,
        max,
    }
}
