//! Demand sensitivity: log-log elasticity, lagged cross-correlation and the
//! Welch two-sample comparison used for event uplift.

use crate::alignment::{align_with_lag, daily_series};
use crate::correlation::{PairedMoments, correlate_pairs};
use crate::descriptive;
use crate::error::{AnalyticsError, ensure_same_len};
use crate::report::{ElasticityKind, ElasticityResult, LagCorrelation, WelchResult};
use core_types::{DailyRecord, DatedValue, Metric};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Overlap below which a lag is reported with `r = 0`.
pub const DEFAULT_MIN_OVERLAP: usize = 3;

/// Band around 1 (price) or 0 (discount) treated as "no clear direction".
const NEUTRAL_BAND: f64 = 0.05;

/// Regresses `ln(quantity + 1)` on the transformed driver; the slope is the elasticity.
///
/// Price drivers are log-transformed, discount rates are used as-is. Pairs
/// whose transform is undefined (price <= 0, quantity <= -1, non-finite input)
/// are dropped and not counted in `sample_size`.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidArgument`] if the lengths differ.
pub fn estimate_elasticity(
    drivers: &[f64],
    quantities: &[f64],
    kind: ElasticityKind,
) -> Result<ElasticityResult, AnalyticsError> {
    ensure_same_len("estimate_elasticity", drivers.len(), quantities.len())?;

    let (xs, ys): (Vec<f64>, Vec<f64>) = drivers
        .iter()
        .zip(quantities)
        .filter_map(|(&driver, &quantity)| {
            let x = match kind {
                ElasticityKind::Price if driver > 0.0 => driver.ln(),
                ElasticityKind::Price => return None,
                ElasticityKind::Discount => driver,
            };
            let y = (quantity + 1.0).ln();
            (x.is_finite() && y.is_finite()).then_some((x, y))
        })
        .unzip();

    let sample_size = xs.len();
    let slope = if sample_size < 2 {
        0.0
    } else {
        PairedMoments::compute(&xs, &ys).slope()
    };

    tracing::debug!(
        ?kind,
        submitted = drivers.len(),
        sample_size,
        slope,
        "Estimated elasticity."
    );

    Ok(ElasticityResult {
        slope,
        interpretation: interpret(kind, slope, sample_size).to_string(),
        sample_size,
    })
}

fn interpret(kind: ElasticityKind, slope: f64, sample_size: usize) -> &'static str {
    if sample_size < 2 {
        return "insufficient data";
    }
    match kind {
        ElasticityKind::Price => {
            let magnitude = slope.abs();
            if (magnitude - 1.0).abs() <= NEUTRAL_BAND {
                "unit elastic"
            } else if magnitude > 1.0 {
                "elastic"
            } else {
                "inelastic"
            }
        }
        ElasticityKind::Discount => {
            if slope > NEUTRAL_BAND {
                "discount-responsive"
            } else if slope < -NEUTRAL_BAND {
                "discount-averse"
            } else {
                "discount-insensitive"
            }
        }
    }
}

/// Correlates `a(d)` with `b(d + lag)` for every lag in `lags` (calendar days).
///
/// Lags with fewer than `min_overlap` matched days report `r = 0`.
pub fn lagged_cross_correlation(
    a: &[DatedValue],
    b: &[DatedValue],
    lags: RangeInclusive<i64>,
    min_overlap: usize,
) -> Vec<LagCorrelation> {
    lags.map(|lag| {
        let pairs = align_with_lag(a, b, lag);
        let r = if pairs.len() < min_overlap {
            0.0
        } else {
            correlate_pairs(&pairs).r
        };
        LagCorrelation {
            lag,
            r,
            sample_size: pairs.len(),
        }
    })
    .collect()
}

/// The lag with the largest `|r|`; ties go to the smaller `|lag|`, then the earlier lag.
pub fn best_lag(results: &[LagCorrelation]) -> Option<LagCorrelation> {
    results.iter().copied().reduce(|best, candidate| {
        let by_r = candidate.r.abs().total_cmp(&best.r.abs());
        let by_lag = best.lag.abs().cmp(&candidate.lag.abs());
        if by_r.is_gt() || (by_r.is_eq() && by_lag.is_gt()) {
            candidate
        } else {
            best
        }
    })
}

/// Welch's unequal-variance t-test with Welch–Satterthwaite degrees of freedom
/// and a two-sided p-value.
///
/// Groups with fewer than two samples, or with no variance at all, are
/// reported as inconclusive (`t = 0`, `df = 0`, `p = 1`).
///
/// # Errors
///
/// Returns [`AnalyticsError::Distribution`] if the t distribution rejects the
/// computed degrees of freedom.
pub fn welch_approx(group_a: &[f64], group_b: &[f64]) -> Result<WelchResult, AnalyticsError> {
    let mean_difference = descriptive::mean(group_a) - descriptive::mean(group_b);
    let (n_a, n_b) = (group_a.len() as f64, group_b.len() as f64);
    if group_a.len() < 2 || group_b.len() < 2 {
        return Ok(WelchResult::inconclusive(mean_difference));
    }

    let se2_a = descriptive::sample_variance(group_a) / n_a;
    let se2_b = descriptive::sample_variance(group_b) / n_b;
    let se2 = se2_a + se2_b;
    if !(se2 > 0.0 && se2.is_finite()) {
        tracing::debug!(mean_difference, "Welch test has zero pooled error; inconclusive.");
        return Ok(WelchResult::inconclusive(mean_difference));
    }

    let t_stat = mean_difference / se2.sqrt();
    let df = se2.powi(2) / (se2_a.powi(2) / (n_a - 1.0) + se2_b.powi(2) / (n_b - 1.0));

    let t_dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| AnalyticsError::Distribution(e.to_string()))?;
    let p_value = (2.0 * (1.0 - t_dist.cdf(t_stat.abs()))).clamp(0.0, 1.0);

    tracing::debug!(t_stat, df, p_value, "Computed Welch test.");
    Ok(WelchResult {
        t_stat,
        df,
        p_value,
        mean_difference,
    })
}

/// Compares daily `metric` on event days against regular days (event group first).
///
/// A date counts as an event day if any of its records is flagged.
pub fn event_uplift(records: &[DailyRecord], metric: Metric) -> Result<WelchResult, AnalyticsError> {
    let event_dates: HashSet<_> = records
        .iter()
        .filter(|r| r.is_event())
        .map(|r| r.date)
        .collect();

    let (event_days, regular_days): (Vec<DatedValue>, Vec<DatedValue>) = daily_series(records, metric)
        .into_iter()
        .partition(|point| event_dates.contains(&point.date));

    let event: Vec<f64> = event_days.iter().map(|p| p.value).collect();
    let regular: Vec<f64> = regular_days.iter().map(|p| p.value).collect();
    tracing::debug!(
        %metric,
        event_days = event.len(),
        regular_days = regular.len(),
        "Splitting series for event uplift."
    );
    welch_approx(&event, &regular)
}
