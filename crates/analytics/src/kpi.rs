//! Period totals, derived ratios and period-over-period growth.

use crate::report::{KpiMetric, KpiSet};
use core_types::DailyRecord;
use std::collections::BTreeMap;

/// `numerator / denominator`, or 0 when the result wouldn't be finite.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// `(current - previous) / previous`; 0 when `previous` is 0.
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    safe_ratio(current - previous, previous)
}

#[derive(Debug, Default)]
struct Totals {
    revenue: f64,
    quantity: f64,
    spend: f64,
    orders: f64,
    sessions: f64,
}

impl Totals {
    fn sum(records: &[DailyRecord]) -> Self {
        records.iter().fold(Totals::default(), |mut acc, r| {
            acc.revenue += r.revenue;
            acc.quantity += r.quantity.unwrap_or(0.0);
            acc.spend += r.spend.unwrap_or(0.0);
            acc.orders += r.orders.unwrap_or(0) as f64;
            acc.sessions += r.sessions.unwrap_or(0) as f64;
            acc
        })
    }

    fn into_kpis(self) -> KpiSet {
        KpiSet {
            total_revenue: self.revenue,
            total_quantity: self.quantity,
            total_spend: self.spend,
            roas: safe_ratio(self.revenue, self.spend),
            avg_order_value: safe_ratio(self.revenue, self.orders),
            conversion_rate: safe_ratio(self.orders, self.sessions),
            growth: BTreeMap::new(),
        }
    }
}

/// Sums the period and derives ROAS, AOV and conversion rate.
///
/// With a `previous_period`, `growth` holds one rate per [`KpiMetric`].
/// Missing optional fields count as 0; ratios with a zero denominator are 0.
pub fn aggregate_kpis(records: &[DailyRecord], previous_period: Option<&[DailyRecord]>) -> KpiSet {
    let mut kpis = Totals::sum(records).into_kpis();

    if let Some(previous) = previous_period {
        let baseline = Totals::sum(previous).into_kpis();
        kpis.growth = KpiMetric::ALL
            .into_iter()
            .map(|metric| (metric, growth_rate(kpis.value(metric), baseline.value(metric))))
            .collect();
    }

    tracing::debug!(
        records = records.len(),
        with_growth = previous_period.is_some(),
        total_revenue = kpis.total_revenue,
        "Aggregated KPIs."
    );
    kpis
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(day: u32, revenue: f64, spend: f64, orders: u64, sessions: u64) -> DailyRecord {
        DailyRecord {
            quantity: Some(orders as f64 * 2.0),
            spend: Some(spend),
            orders: Some(orders),
            sessions: Some(sessions),
            ..DailyRecord::new(NaiveDate::from_ymd_opt(2024, 7, day).unwrap(), revenue)
        }
    }

    #[test]
    fn zero_spend_gives_zero_roas() {
        let records = vec![DailyRecord {
            spend: Some(0.0),
            ..DailyRecord::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 1_000_000.0)
        }];

        let kpis = aggregate_kpis(&records, None);

        assert_eq!(kpis.total_revenue, 1_000_000.0);
        assert_eq!(kpis.roas, 0.0);
        assert_eq!(kpis.avg_order_value, 0.0);
        assert_eq!(kpis.conversion_rate, 0.0);
        assert!(kpis.growth.is_empty());
    }

    #[test]
    fn derives_ratios_from_totals() {
        let records = vec![record(1, 300.0, 100.0, 3, 100), record(2, 500.0, 100.0, 5, 100)];

        let kpis = aggregate_kpis(&records, None);

        assert_eq!(kpis.total_revenue, 800.0);
        assert_eq!(kpis.total_quantity, 16.0);
        assert_eq!(kpis.total_spend, 200.0);
        assert_eq!(kpis.roas, 4.0);
        assert_eq!(kpis.avg_order_value, 100.0);
        assert_eq!(kpis.conversion_rate, 0.04);
    }

    #[test]
    fn growth_against_itself_is_zero() {
        let records = vec![record(1, 300.0, 100.0, 3, 100), record(2, 0.0, 0.0, 0, 0)];
        let kpis = aggregate_kpis(&records, Some(&records));
        assert_eq!(kpis.growth.len(), KpiMetric::ALL.len());
        assert!(kpis.growth.values().all(|&g| g == 0.0));
    }

    #[test]
    fn growth_is_relative_and_never_infinite() {
        let current = vec![record(8, 150.0, 50.0, 3, 60)];
        let previous = vec![record(1, 100.0, 0.0, 2, 40)];

        let kpis = aggregate_kpis(&current, Some(&previous));

        assert_eq!(kpis.growth[&KpiMetric::TotalRevenue], 0.5);
        // Previous spend was zero: growth saturates to 0 instead of infinity.
        assert_eq!(kpis.growth[&KpiMetric::TotalSpend], 0.0);
        assert_eq!(kpis.growth[&KpiMetric::ConversionRate], 0.0);
        assert!(kpis.growth.values().all(|g| g.is_finite()));
    }

    #[test]
    fn growth_rate_edge_cases() {
        assert_eq!(growth_rate(5.0, 0.0), 0.0);
        assert_eq!(growth_rate(0.0, 0.0), 0.0);
        assert_eq!(growth_rate(50.0, 100.0), -0.5);
    }
}
