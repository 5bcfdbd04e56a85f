//! Trailing moving average and the flat short-horizon forecast built on it.

use crate::report::ForecastPoint;
use chrono::Duration;
use core_types::DatedValue;

/// Averages `series[max(0, i - window + 1)..=i]` for every index `i`.
///
/// The window is shorter at the start of the series rather than padded, so
/// the output always has the input's length. A `window` of 0 behaves as 1.
pub fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..series.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &series[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Longest projection `forecast` will produce; larger horizons are clamped.
pub const MAX_FORECAST_HORIZON: usize = configuration::MAX_FORECAST_HORIZON;

/// Repeats the last moving-average value `horizon` times.
///
/// Deliberately naive: no trend, no seasonality. Empty input forecasts nothing.
/// `horizon` is clamped to [`MAX_FORECAST_HORIZON`].
pub fn forecast(series: &[f64], window: usize, horizon: usize) -> Vec<f64> {
    if horizon > MAX_FORECAST_HORIZON {
        tracing::warn!(horizon, max = MAX_FORECAST_HORIZON, "Forecast horizon clamped.");
    }
    match moving_average(series, window).last() {
        Some(&level) => vec![level; horizon.min(MAX_FORECAST_HORIZON)],
        None => Vec::new(),
    }
}

/// Dated variant of [`forecast`]: points continue one calendar day at a time
/// after the last observed date. `points` must be in date order.
pub fn forecast_dated(points: &[DatedValue], window: usize, horizon: usize) -> Vec<ForecastPoint> {
    let Some(last) = points.last() else {
        return Vec::new();
    };
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let levels = forecast(&values, window, horizon);

    levels
        .into_iter()
        .zip(1..)
        .map_while(|(value, step)| {
            last.date
                .checked_add_signed(Duration::try_days(step)?)
                .map(|date| ForecastPoint { date, value })
        })
        .collect()
}
