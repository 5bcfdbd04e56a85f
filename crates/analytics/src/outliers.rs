//! Z-score outlier detection over one or more record metrics.

use crate::descriptive;
use crate::report::OutlierRecord;
use core_types::{DailyRecord, Metric};
use std::collections::BTreeMap;

pub const DEFAULT_THRESHOLD: f64 = 2.0;

/// Flags records whose z-score reaches `threshold` (in absolute value) for any
/// tracked metric.
///
/// Mean and standard deviation are population statistics over the records
/// that carry each metric. A flat metric scores 0 everywhere. Every tracked
/// metric a flagged record carries is reported, not only the one that tripped
/// the threshold. Results are ordered by descending max `|z|` (ties keep input
/// order) and truncated to `top_n` when given.
pub fn detect_outliers(
    records: &[DailyRecord],
    metrics: &[Metric],
    threshold: f64,
    top_n: Option<usize>,
) -> Vec<OutlierRecord> {
    let moments: Vec<(Metric, f64, f64)> = metrics
        .iter()
        .filter_map(|&metric| {
            let values: Vec<f64> = records.iter().filter_map(|r| r.metric(metric)).collect();
            if values.is_empty() {
                return None;
            }
            Some((metric, descriptive::mean(&values), descriptive::std_dev(&values)))
        })
        .collect();

    let mut flagged: Vec<OutlierRecord> = records
        .iter()
        .filter_map(|record| {
            let metric_z_scores: BTreeMap<Metric, f64> = moments
                .iter()
                .filter_map(|&(metric, mean, std_dev)| {
                    record
                        .metric(metric)
                        .map(|value| (metric, descriptive::z_score(value, mean, std_dev)))
                })
                .collect();

            let outlier = OutlierRecord {
                date: record.date,
                metric_z_scores,
            };
            (outlier.max_abs_z() >= threshold).then_some(outlier)
        })
        .collect();

    flagged.sort_by(|a, b| b.max_abs_z().total_cmp(&a.max_abs_z()));
    if let Some(n) = top_n {
        flagged.truncate(n);
    }

    tracing::debug!(
        records = records.len(),
        tracked = moments.len(),
        flagged = flagged.len(),
        threshold,
        "Outlier detection finished."
    );
    flagged
}
