//! Terminal tables for each analysis result.

use analytics::{
    CorrelationResult, ElasticityResult, ForecastPoint, KpiMetric, KpiSet, LagCorrelation,
    OutlierRecord, ParetoEntry, WelchResult,
};
use comfy_table::{Table, presets::UTF8_FULL};

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header.to_vec());
    table
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

pub fn kpis(kpis: &KpiSet) -> Table {
    let mut out = table(&["KPI", "Value", "Growth"]);
    for metric in KpiMetric::ALL {
        let value = match metric {
            KpiMetric::ConversionRate => pct(kpis.value(metric)),
            _ => format!("{:.2}", kpis.value(metric)),
        };
        let growth = kpis
            .growth
            .get(&metric)
            .map(|&g| pct(g))
            .unwrap_or_else(|| "-".to_string());
        out.add_row(vec![metric.to_string(), value, growth]);
    }
    out
}

pub fn correlation(result: &CorrelationResult) -> Table {
    let mut out = table(&["r", "Slope", "Intercept", "Days", "Strength"]);
    out.add_row(vec![
        format!("{:.4}", result.r),
        format!("{:.4}", result.slope),
        format!("{:.4}", result.intercept),
        result.sample_size.to_string(),
        result.strength.to_string(),
    ]);
    out
}

pub fn outliers(outliers: &[OutlierRecord]) -> Table {
    let mut out = table(&["Date", "Max |z|", "Scores"]);
    for outlier in outliers {
        let scores = outlier
            .metric_z_scores
            .iter()
            .map(|(metric, z)| format!("{metric}={z:+.2}"))
            .collect::<Vec<_>>()
            .join(", ");
        out.add_row(vec![
            outlier.date.to_string(),
            format!("{:.2}", outlier.max_abs_z()),
            scores,
        ]);
    }
    out
}

pub fn pareto(entries: &[ParetoEntry]) -> Table {
    let mut out = table(&["Key", "Value", "Cumulative", "Class"]);
    for entry in entries {
        out.add_row(vec![
            entry.key.clone(),
            format!("{:.2}", entry.value),
            pct(entry.cumulative_share),
            entry.abc_class.to_string(),
        ]);
    }
    out
}

pub fn elasticity(result: &ElasticityResult) -> Table {
    let mut out = table(&["Elasticity", "Interpretation", "Days"]);
    out.add_row(vec![
        format!("{:.4}", result.slope),
        result.interpretation.clone(),
        result.sample_size.to_string(),
    ]);
    out
}

pub fn forecast(smoothed: &[ForecastPoint], projected: &[ForecastPoint]) -> Table {
    let mut out = table(&["Date", "Value", "Kind"]);
    let rows = smoothed
        .iter()
        .map(|p| (p, "moving average"))
        .chain(projected.iter().map(|p| (p, "forecast")));
    for (point, kind) in rows {
        out.add_row(vec![point.date.to_string(), format!("{:.2}", point.value), kind.to_string()]);
    }
    out
}

pub fn lags(lags: &[LagCorrelation], best: Option<LagCorrelation>) -> Table {
    let mut out = table(&["Lag (days)", "r", "Days", ""]);
    for lag in lags {
        let marker = if best.is_some_and(|b| b.lag == lag.lag) { "best" } else { "" };
        out.add_row(vec![
            lag.lag.to_string(),
            format!("{:.4}", lag.r),
            lag.sample_size.to_string(),
            marker.to_string(),
        ]);
    }
    out
}

pub fn welch(result: &WelchResult) -> Table {
    let mut out = table(&["Mean difference", "t", "df", "p-value"]);
    out.add_row(vec![
        format!("{:.2}", result.mean_difference),
        format!("{:.4}", result.t_stat),
        format!("{:.2}", result.df),
        format!("{:.4}", result.p_value),
    ]);
    out
}
