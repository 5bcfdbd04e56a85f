use crate::enums::{Dimension, Metric};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of business activity, optionally scoped to a dimension (SKU, channel, ...).
///
/// Produced by the data source and never mutated afterwards. `date` is the
/// natural join key across record sets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roas: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_event: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl DailyRecord {
    /// Creates a record carrying only a date and revenue.
    pub fn new(date: NaiveDate, revenue: f64) -> Self {
        Self {
            date,
            revenue,
            ..Default::default()
        }
    }

    /// Returns the value of `metric`, or `None` if the record doesn't carry it.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Revenue => Some(self.revenue),
            Metric::Quantity => self.quantity,
            Metric::Spend => self.spend,
            Metric::Roas => self.roas,
            Metric::Temperature => self.temperature,
            Metric::DiscountRate => self.discount_rate,
            Metric::Orders => self.orders.map(|v| v as f64),
            Metric::Sessions => self.sessions.map(|v| v as f64),
        }
    }

    pub fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Sku => self.sku.as_deref(),
            Dimension::Category => self.category.as_deref(),
            Dimension::Channel => self.channel.as_deref(),
            Dimension::Region => self.region.as_deref(),
        }
    }

    pub fn is_event(&self) -> bool {
        self.is_event.unwrap_or(false)
    }
}

/// A single observation of a dated series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: f64,
}

impl DatedValue {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Two values observed on the same date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
}
