use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A numeric field of a [`DailyRecord`](crate::DailyRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Revenue,
    Quantity,
    Spend,
    Roas,
    Temperature,
    #[cfg_attr(feature = "clap", value(name = "discountRate", alias = "discount-rate"))]
    DiscountRate,
    Orders,
    Sessions,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Revenue,
        Metric::Quantity,
        Metric::Spend,
        Metric::Roas,
        Metric::Temperature,
        Metric::DiscountRate,
        Metric::Orders,
        Metric::Sessions,
    ];

    /// Additive metrics are summed when several records share a date;
    /// the rest (ratios and readings) are averaged.
    pub fn is_additive(&self) -> bool {
        matches!(
            self,
            Metric::Revenue | Metric::Quantity | Metric::Spend | Metric::Orders | Metric::Sessions
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::Quantity => "quantity",
            Metric::Spend => "spend",
            Metric::Roas => "roas",
            Metric::Temperature => "temperature",
            Metric::DiscountRate => "discountRate",
            Metric::Orders => "orders",
            Metric::Sessions => "sessions",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownName {
                kind: "metric",
                name: s.to_string(),
            })
    }
}

/// A categorical attribute records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Sku,
    Category,
    Channel,
    Region,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Sku => "sku",
            Dimension::Category => "category",
            Dimension::Channel => "channel",
            Dimension::Region => "region",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Dimension::Sku,
            Dimension::Category,
            Dimension::Channel,
            Dimension::Region,
        ]
        .into_iter()
        .find(|d| d.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| CoreError::UnknownName {
            kind: "dimension",
            name: s.to_string(),
        })
    }
}
