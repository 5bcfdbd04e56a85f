//! Joins daily record sets on their date key.
//!
//! Only dates present on both sides survive a join; nothing is interpolated.
//! Every join returns pairs in ascending date order.

use chrono::{Duration, NaiveDate};
use core_types::{AlignedPair, DailyRecord, DatedValue, Metric};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Collapses `records` into one value of `metric` per date, sorted by date.
///
/// Records that don't carry the metric are skipped. Where several records
/// share a date (one per SKU, channel, ...) additive metrics are summed and
/// the others are averaged.
pub fn daily_series(records: &[DailyRecord], metric: Metric) -> Vec<DatedValue> {
    let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in records {
        if let Some(value) = record.metric(metric) {
            let slot = by_date.entry(record.date).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }
    }

    let additive = metric.is_additive();
    by_date
        .into_iter()
        .map(|(date, (sum, count))| {
            let value = if additive { sum } else { sum / count as f64 };
            DatedValue::new(date, value)
        })
        .collect()
}

/// Pairs `a(d)` with `b(d + lag_days)`; each pair is dated by `a`.
///
/// If a series repeats a date, its first occurrence wins. A lag that pushes a
/// date outside the calendar simply matches nothing.
pub fn align_with_lag(a: &[DatedValue], b: &[DatedValue], lag_days: i64) -> Vec<AlignedPair> {
    let mut lookup: HashMap<NaiveDate, f64> = HashMap::with_capacity(b.len());
    for point in b {
        lookup.entry(point.date).or_insert(point.value);
    }

    let mut seen = HashSet::with_capacity(a.len());
    let mut pairs: Vec<AlignedPair> = a
        .iter()
        .filter(|point| seen.insert(point.date))
        .filter_map(|point| {
            let target = point.date.checked_add_signed(Duration::try_days(lag_days)?)?;
            lookup.get(&target).map(|&y| AlignedPair {
                x: point.value,
                y,
                date: point.date,
            })
        })
        .collect();

    pairs.sort_by_key(|pair| pair.date);
    pairs
}

/// Joins two dated series on identical dates.
pub fn align_series(a: &[DatedValue], b: &[DatedValue]) -> Vec<AlignedPair> {
    align_with_lag(a, b, 0)
}

/// Joins two record sets: `x` is taken from `left`, `y` from `right`.
///
/// Pass the same slice twice to relate two metrics of one data set
/// (e.g. spend against revenue).
pub fn align(
    left: &[DailyRecord],
    right: &[DailyRecord],
    x_metric: Metric,
    y_metric: Metric,
) -> Vec<AlignedPair> {
    let xs = daily_series(left, x_metric);
    let ys = daily_series(right, y_metric);
    let pairs = align_series(&xs, &ys);
    tracing::debug!(
        x = %x_metric,
        y = %y_metric,
        left_days = xs.len(),
        right_days = ys.len(),
        matched = pairs.len(),
        "Aligned record sets."
    );
    pairs
}

/// Splits aligned pairs into their `x` and `y` columns.
pub fn unzip(pairs: &[AlignedPair]) -> (Vec<f64>, Vec<f64>) {
    pairs.iter().map(|p| (p.x, p.y)).unzip()
}
