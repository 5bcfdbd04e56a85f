use crate::alignment::{align, daily_series};
use crate::correlation::{correlate, correlate_pairs};
use crate::elasticity::{self, estimate_elasticity, lagged_cross_correlation, welch_approx};
use crate::error::AnalyticsError;
use crate::kpi::aggregate_kpis;
use crate::moving_average::{forecast_dated, moving_average};
use crate::outliers::detect_outliers;
use crate::pareto::{ParetoCutoffs, pareto_by, pareto_classify};
use crate::report::{
    CorrelationResult, ElasticityKind, ElasticityResult, ForecastPoint, KeyedValue, KpiSet,
    LagCorrelation, OutlierRecord, ParetoEntry, WelchResult,
};
use configuration::AnalyticsSettings;
use core_types::{DailyRecord, DatedValue, Dimension, Metric};

/// A stateless calculator for deriving analytics from daily business records.
///
/// The engine only carries its tunables; every method is a pure function of
/// its arguments, so one instance can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    settings: AnalyticsSettings,
}

impl AnalyticsEngine {
    pub fn new(settings: AnalyticsSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    fn cutoffs(&self) -> ParetoCutoffs {
        ParetoCutoffs {
            a: self.settings.pareto_a_cutoff,
            b: self.settings.pareto_b_cutoff,
        }
    }

    pub fn correlate(&self, xs: &[f64], ys: &[f64]) -> Result<CorrelationResult, AnalyticsError> {
        correlate(xs, ys)
    }

    /// Aligns `x_metric` of `left` with `y_metric` of `right` by date, then correlates.
    pub fn correlate_metrics(
        &self,
        left: &[DailyRecord],
        right: &[DailyRecord],
        x_metric: Metric,
        y_metric: Metric,
    ) -> CorrelationResult {
        correlate_pairs(&align(left, right, x_metric, y_metric))
    }

    /// Moving average of the daily series of `metric`, using the configured window.
    pub fn moving_average(&self, records: &[DailyRecord], metric: Metric) -> Vec<ForecastPoint> {
        let series = daily_series(records, metric);
        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        series
            .iter()
            .zip(moving_average(&values, self.settings.moving_average_window))
            .map(|(point, value)| ForecastPoint {
                date: point.date,
                value,
            })
            .collect()
    }

    pub fn forecast(&self, records: &[DailyRecord], metric: Metric) -> Vec<ForecastPoint> {
        forecast_dated(
            &daily_series(records, metric),
            self.settings.moving_average_window,
            self.settings.forecast_horizon,
        )
    }

    /// Runs the outlier detector with the configured threshold, metrics and cap.
    pub fn detect_outliers(&self, records: &[DailyRecord]) -> Vec<OutlierRecord> {
        detect_outliers(
            records,
            &self.settings.outlier_metrics,
            self.settings.outlier_threshold,
            self.settings.outlier_top_n,
        )
    }

    pub fn pareto_classify(&self, entries: &[KeyedValue]) -> Vec<ParetoEntry> {
        pareto_classify(entries, self.cutoffs())
    }

    pub fn pareto_by(
        &self,
        records: &[DailyRecord],
        dimension: Dimension,
        metric: Metric,
    ) -> Vec<ParetoEntry> {
        pareto_by(records, dimension, metric, self.cutoffs())
    }

    pub fn estimate_elasticity(
        &self,
        drivers: &[f64],
        quantities: &[f64],
        kind: ElasticityKind,
    ) -> Result<ElasticityResult, AnalyticsError> {
        estimate_elasticity(drivers, quantities, kind)
    }

    /// Elasticity from records: discount kind regresses on `discountRate`,
    /// price kind on the implied unit price `revenue / quantity`.
    ///
    /// Records are collapsed per date first; days missing either side are skipped.
    pub fn elasticity_from_records(
        &self,
        records: &[DailyRecord],
        kind: ElasticityKind,
    ) -> Result<ElasticityResult, AnalyticsError> {
        let quantities = daily_series(records, Metric::Quantity);
        let drivers: Vec<DatedValue> = match kind {
            ElasticityKind::Discount => daily_series(records, Metric::DiscountRate),
            ElasticityKind::Price => {
                let revenue = daily_series(records, Metric::Revenue);
                crate::alignment::align_series(&revenue, &quantities)
                    .into_iter()
                    .filter(|pair| pair.y > 0.0)
                    .map(|pair| DatedValue::new(pair.date, pair.x / pair.y))
                    .collect()
            }
        };
        let (xs, ys) = crate::alignment::unzip(&crate::alignment::align_series(&drivers, &quantities));
        estimate_elasticity(&xs, &ys, kind)
    }

    /// Sweeps `-max_lag_days..=max_lag_days` between two metrics' daily series.
    ///
    /// `max_lag_days` is clamped to `0..=MAX_LAG_DAYS` for settings that were
    /// never validated.
    pub fn lagged_cross_correlation(
        &self,
        a: &[DailyRecord],
        a_metric: Metric,
        b: &[DailyRecord],
        b_metric: Metric,
    ) -> Vec<LagCorrelation> {
        let max_lag = self.settings.max_lag_days.clamp(0, configuration::MAX_LAG_DAYS);
        lagged_cross_correlation(
            &daily_series(a, a_metric),
            &daily_series(b, b_metric),
            -max_lag..=max_lag,
            self.settings.min_lag_overlap,
        )
    }

    pub fn welch_approx(&self, group_a: &[f64], group_b: &[f64]) -> Result<WelchResult, AnalyticsError> {
        welch_approx(group_a, group_b)
    }

    pub fn event_uplift(&self, records: &[DailyRecord], metric: Metric) -> Result<WelchResult, AnalyticsError> {
        elasticity::event_uplift(records, metric)
    }

    pub fn aggregate_kpis(&self, records: &[DailyRecord], previous_period: Option<&[DailyRecord]>) -> KpiSet {
        aggregate_kpis(records, previous_period)
    }
}
