use chrono::NaiveDate;
use core_types::Metric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Bucketing of `|r|`: `< 0.1` negligible, `< 0.3` weak, `< 0.6` moderate,
/// `< 0.8` strong, otherwise very strong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrelationStrength {
    Negligible,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl CorrelationStrength {
    pub fn from_r(r: f64) -> Self {
        let abs = r.abs();
        if abs < 0.1 {
            Self::Negligible
        } else if abs < 0.3 {
            Self::Weak
        } else if abs < 0.6 {
            Self::Moderate
        } else if abs < 0.8 {
            Self::Strong
        } else {
            Self::VeryStrong
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Negligible => "negligible",
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
            Self::VeryStrong => "very strong",
        };
        f.write_str(label)
    }
}

/// Pearson correlation plus the OLS line fitted to the same pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationResult {
    pub r: f64,
    pub slope: f64,
    pub intercept: f64,
    pub sample_size: usize,
    pub strength: CorrelationStrength,
}

impl CorrelationResult {
    /// The neutral result returned for empty input.
    pub fn empty() -> Self {
        Self {
            r: 0.0,
            slope: 0.0,
            intercept: 0.0,
            sample_size: 0,
            strength: CorrelationStrength::Negligible,
        }
    }
}

impl Default for CorrelationResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// Count, mean, population standard deviation and range of a series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A day with at least one tracked metric beyond the z-score threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierRecord {
    pub date: NaiveDate,
    pub metric_z_scores: BTreeMap<Metric, f64>,
}

impl OutlierRecord {
    /// The largest absolute z-score across tracked metrics.
    pub fn max_abs_z(&self) -> f64 {
        self.metric_z_scores
            .values()
            .fold(0.0_f64, |acc, z| acc.max(z.abs()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
        };
        f.write_str(label)
    }
}

/// Input item of the Pareto classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedValue {
    pub key: String,
    pub value: f64,
}

impl KeyedValue {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoEntry {
    pub key: String,
    pub value: f64,
    pub cumulative_share: f64,
    pub abc_class: AbcClass,
}

/// Which transform the elasticity regression applies to its driver series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElasticityKind {
    /// `x = ln(price)`.
    Price,
    /// `x = discount rate`, untransformed.
    Discount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElasticityResult {
    pub slope: f64,
    pub interpretation: String,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LagCorrelation {
    pub lag: i64,
    pub r: f64,
    pub sample_size: usize,
}

/// Welch two-sample t-test approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelchResult {
    pub t_stat: f64,
    pub df: f64,
    pub p_value: f64,
    /// `mean(group_a) - mean(group_b)`.
    pub mean_difference: f64,
}

impl WelchResult {
    /// The neutral result for groups that cannot be compared.
    pub fn inconclusive(mean_difference: f64) -> Self {
        Self {
            t_stat: 0.0,
            df: 0.0,
            p_value: 1.0,
            mean_difference,
        }
    }
}

/// Headline figures a KPI set carries growth rates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiMetric {
    TotalRevenue,
    TotalQuantity,
    TotalSpend,
    Roas,
    AvgOrderValue,
    ConversionRate,
}

impl KpiMetric {
    pub const ALL: [KpiMetric; 6] = [
        KpiMetric::TotalRevenue,
        KpiMetric::TotalQuantity,
        KpiMetric::TotalSpend,
        KpiMetric::Roas,
        KpiMetric::AvgOrderValue,
        KpiMetric::ConversionRate,
    ];
}

impl fmt::Display for KpiMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            KpiMetric::TotalRevenue => "totalRevenue",
            KpiMetric::TotalQuantity => "totalQuantity",
            KpiMetric::TotalSpend => "totalSpend",
            KpiMetric::Roas => "roas",
            KpiMetric::AvgOrderValue => "avgOrderValue",
            KpiMetric::ConversionRate => "conversionRate",
        };
        f.write_str(label)
    }
}

/// Period totals, derived ratios and (optionally) growth against a previous period.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSet {
    pub total_revenue: f64,
    pub total_quantity: f64,
    pub total_spend: f64,
    pub roas: f64,
    pub avg_order_value: f64,
    pub conversion_rate: f64,
    pub growth: BTreeMap<KpiMetric, f64>,
}

impl KpiSet {
    pub fn value(&self, metric: KpiMetric) -> f64 {
        match metric {
            KpiMetric::TotalRevenue => self.total_revenue,
            KpiMetric::TotalQuantity => self.total_quantity,
            KpiMetric::TotalSpend => self.total_spend,
            KpiMetric::Roas => self.roas,
            KpiMetric::AvgOrderValue => self.avg_order_value,
            KpiMetric::ConversionRate => self.conversion_rate,
        }
    }
}
