use analytics::{
    AbcClass, AnalyticsEngine, ElasticityKind, KeyedValue, KpiMetric, aggregate_kpis, correlate,
    detect_outliers, estimate_elasticity, moving_average, pareto_classify, welch_approx,
};
use analytics::ParetoCutoffs;
use chrono::{Duration, NaiveDate};
use core_types::{DailyRecord, Metric};

const TOL: f64 = 1e-9;

/// Deterministic, irregular test series.
fn wobble(n: usize, seed: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64 + seed;
            100.0 + 40.0 * (t * 0.7).sin() + 15.0 * (t * 1.9).cos() + (i % 5) as f64
        })
        .collect()
}

fn daily(values: &[f64]) -> Vec<DailyRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| DailyRecord::new(start + Duration::days(i as i64), v))
        .collect()
}

#[test]
fn identical_series_correlate_perfectly() {
    for n in [2, 3, 10, 250] {
        let xs = wobble(n, 0.3);
        let result = correlate(&xs, &xs).unwrap();
        assert!((result.r - 1.0).abs() < TOL, "n={n} r={}", result.r);
    }
}

#[test]
fn negated_series_correlate_negatively() {
    let xs = wobble(60, 1.1);
    let ys: Vec<f64> = xs.iter().map(|x| -x).collect();
    let result = correlate(&xs, &ys).unwrap();
    assert!((result.r + 1.0).abs() < TOL);
    assert!((result.slope + 1.0).abs() < TOL);
}

#[test]
fn r_stays_in_unit_interval() {
    for seed in 0..20 {
        let xs = wobble(40, seed as f64);
        let ys = wobble(40, seed as f64 * 2.7 + 0.5);
        let r = correlate(&xs, &ys).unwrap().r;
        assert!((-1.0..=1.0).contains(&r), "r={r}");
        assert!(r.is_finite());
    }
}

#[test]
fn scenario_correlate_linear_revenue() {
    let result = correlate(&[10.0, 12.0, 14.0, 16.0, 18.0], &[100.0, 120.0, 140.0, 160.0, 180.0])
        .unwrap();
    assert!((result.r - 1.0).abs() < TOL);
    assert!((result.slope - 10.0).abs() < TOL);
    assert!(result.intercept.abs() < TOL);
}

#[test]
fn unit_window_moving_average_is_identity() {
    for n in [0, 1, 7, 100] {
        let series = wobble(n, 4.2);
        assert_eq!(moving_average(&series, 1), series);
    }
}

#[test]
fn scenario_moving_average() {
    assert_eq!(moving_average(&[10.0, 20.0, 30.0], 2), vec![10.0, 15.0, 25.0]);
}

#[test]
fn pareto_shares_are_monotone_and_end_at_one() {
    let entries: Vec<KeyedValue> = wobble(30, 0.9)
        .into_iter()
        .enumerate()
        .map(|(i, v)| KeyedValue::new(format!("sku-{i}"), v))
        .collect();

    let ranked = pareto_classify(&entries, ParetoCutoffs::default());

    assert_eq!(ranked.len(), entries.len());
    for pair in ranked.windows(2) {
        assert!(pair[0].value >= pair[1].value);
        assert!(pair[0].cumulative_share <= pair[1].cumulative_share);
    }
    assert!((ranked.last().unwrap().cumulative_share - 1.0).abs() < TOL);
    assert_eq!(ranked[0].abc_class, AbcClass::A);
    assert_eq!(ranked.last().unwrap().abc_class, AbcClass::C);
}

#[test]
fn scenario_pareto_abc() {
    let entries = vec![
        KeyedValue::new("A", 80.0),
        KeyedValue::new("B", 15.0),
        KeyedValue::new("C", 5.0),
    ];
    let ranked = AnalyticsEngine::default().pareto_classify(&entries);
    let shares: Vec<f64> = ranked.iter().map(|e| e.cumulative_share).collect();
    assert!((shares[0] - 0.80).abs() < TOL);
    assert!((shares[1] - 0.95).abs() < TOL);
    assert!((shares[2] - 1.00).abs() < TOL);
    assert_eq!(
        ranked.iter().map(|e| e.abc_class).collect::<Vec<_>>(),
        vec![AbcClass::A, AbcClass::B, AbcClass::C]
    );
}

#[test]
fn scenario_outlier_spike() {
    let records = daily(&[100.0, 102.0, 98.0, 101.0, 500.0, 99.0]);
    let outliers = detect_outliers(&records, &[Metric::Revenue], 2.0, None);
    assert_eq!(outliers.len(), 1);
    assert_eq!(outliers[0].date, records[4].date);
    assert!(outliers[0].metric_z_scores[&Metric::Revenue] > 0.0);
}

#[test]
fn growth_against_same_period_is_zero() {
    let mut records = daily(&wobble(14, 2.0));
    for (i, record) in records.iter_mut().enumerate() {
        record.spend = Some(20.0 + i as f64);
        record.quantity = Some(3.0);
        record.orders = Some(2);
        record.sessions = Some(50);
    }
    let kpis = aggregate_kpis(&records, Some(&records));
    for metric in KpiMetric::ALL {
        assert_eq!(kpis.growth[&metric], 0.0, "{metric}");
    }
}

#[test]
fn scenario_zero_spend_roas() {
    let mut records = daily(&[1_000_000.0]);
    records[0].spend = Some(0.0);
    assert_eq!(aggregate_kpis(&records, None).roas, 0.0);
}

#[test]
fn elasticity_tolerates_zero_quantities() {
    let result = estimate_elasticity(&[4.0, 5.0, 6.0], &[0.0, 0.0, 0.0], ElasticityKind::Price);
    let result = result.unwrap();
    assert!(result.slope.is_finite());
    assert_eq!(result.sample_size, 3);
}

#[test]
fn welch_degrees_of_freedom_are_positive() {
    for seed in 0..10 {
        let a = wobble(2 + seed, seed as f64);
        let b = wobble(3 + seed * 2, seed as f64 + 10.0);
        let result = welch_approx(&a, &b).unwrap();
        assert!(result.df > 0.0, "df={} for seed {seed}", result.df);
        assert!((0.0..=1.0).contains(&result.p_value));
    }
}

#[test]
fn results_serialize_with_camel_case_fields() {
    let kpis = aggregate_kpis(&daily(&[10.0]), Some(&daily(&[5.0])));
    let json = serde_json::to_value(&kpis).unwrap();
    assert_eq!(json["totalRevenue"], 10.0);
    assert_eq!(json["growth"]["totalRevenue"], 1.0);

    let correlation = correlate(&[1.0, 2.0], &[2.0, 4.0]).unwrap();
    let json = serde_json::to_value(&correlation).unwrap();
    assert_eq!(json["sampleSize"], 2);
    assert_eq!(json["strength"], "VERY_STRONG");
}
