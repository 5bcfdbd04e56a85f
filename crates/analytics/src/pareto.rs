//! Pareto ranking and ABC segmentation.

use crate::report::{AbcClass, KeyedValue, ParetoEntry};
use core_types::{DailyRecord, Dimension, Metric};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key used for records that don't carry the grouping dimension.
pub const MISSING_KEY: &str = "(none)";

/// Absorbs rounding in running sums that land exactly on a cutoff.
const SHARE_TOLERANCE: f64 = 1e-12;

/// Cumulative-share cutoffs: A up to `a`, B up to `b`, C beyond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParetoCutoffs {
    pub a: f64,
    pub b: f64,
}

impl Default for ParetoCutoffs {
    fn default() -> Self {
        Self { a: 0.80, b: 0.95 }
    }
}

impl ParetoCutoffs {
    pub fn classify(&self, cumulative_share: f64) -> AbcClass {
        if cumulative_share <= self.a + SHARE_TOLERANCE {
            AbcClass::A
        } else if cumulative_share <= self.b + SHARE_TOLERANCE {
            AbcClass::B
        } else {
            AbcClass::C
        }
    }
}

/// Ranks entries by value (descending) and assigns cumulative shares and ABC classes.
///
/// The sort is stable, so equal values keep their input order. Shares are
/// taken against the total of the positive values only, so they never
/// decrease and never exceed 1. Entries with a non-positive value (returns,
/// refunds) are always class C. When no value is positive every share is 0
/// and every entry is class C.
pub fn pareto_classify(entries: &[KeyedValue], cutoffs: ParetoCutoffs) -> Vec<ParetoEntry> {
    let mut ranked: Vec<&KeyedValue> = entries.iter().collect();
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));

    let total: f64 = ranked.iter().map(|e| e.value).filter(|v| *v > 0.0).sum();
    if !(total > 0.0 && total.is_finite()) {
        tracing::debug!(entries = entries.len(), total, "Pareto total is not positive; all entries are C.");
        return ranked
            .into_iter()
            .map(|e| ParetoEntry {
                key: e.key.clone(),
                value: e.value,
                cumulative_share: 0.0,
                abc_class: AbcClass::C,
            })
            .collect();
    }

    let mut acc = 0.0;
    ranked
        .into_iter()
        .map(|e| {
            acc += e.value.max(0.0);
            let cumulative_share = (acc / total).min(1.0);
            let abc_class = if e.value > 0.0 {
                cutoffs.classify(cumulative_share)
            } else {
                AbcClass::C
            };
            ParetoEntry {
                key: e.key.clone(),
                value: e.value,
                cumulative_share,
                abc_class,
            }
        })
        .collect()
}

/// Sums `metric` per value of `dimension`, in first-seen key order.
pub fn group_by_dimension(
    records: &[DailyRecord],
    dimension: Dimension,
    metric: Metric,
) -> Vec<KeyedValue> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<KeyedValue> = Vec::new();

    for record in records {
        let Some(value) = record.metric(metric) else {
            continue;
        };
        let key = record.dimension(dimension).unwrap_or(MISSING_KEY);
        match index.get(key) {
            Some(&i) => groups[i].value += value,
            None => {
                index.insert(key, groups.len());
                groups.push(KeyedValue::new(key, value));
            }
        }
    }
    groups
}

/// Groups records by `dimension` and classifies the per-key totals of `metric`.
pub fn pareto_by(
    records: &[DailyRecord],
    dimension: Dimension,
    metric: Metric,
    cutoffs: ParetoCutoffs,
) -> Vec<ParetoEntry> {
    pareto_classify(&group_by_dimension(records, dimension, metric), cutoffs)
}
