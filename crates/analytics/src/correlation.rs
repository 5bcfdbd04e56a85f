//! Pearson correlation and ordinary least squares over paired series.

use crate::error::{AnalyticsError, ensure_same_len};
use crate::report::{CorrelationResult, CorrelationStrength};
use core_types::AlignedPair;

/// Centered sums of a paired sample.
///
/// Each side is divided by a power of two near its largest magnitude before
/// accumulating, so huge inputs can't overflow the sums. Power-of-two scaling
/// is exact; `sxx`, `syy` and `sxy` are in scaled units, the means are not.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PairedMoments {
    pub n: usize,
    pub mean_x: f64,
    pub mean_y: f64,
    pub sxx: f64,
    pub syy: f64,
    pub sxy: f64,
    scale_x: f64,
    scale_y: f64,
    x_degenerate: bool,
    y_degenerate: bool,
}

impl PairedMoments {
    /// Caller guarantees `xs.len() == ys.len()`.
    pub(crate) fn compute(xs: &[f64], ys: &[f64]) -> Self {
        let n = xs.len();
        if n == 0 {
            return Self {
                n,
                mean_x: 0.0,
                mean_y: 0.0,
                sxx: 0.0,
                syy: 0.0,
                sxy: 0.0,
                scale_x: 1.0,
                scale_y: 1.0,
                x_degenerate: true,
                y_degenerate: true,
            };
        }

        let scale_x = power_of_two_scale(xs);
        let scale_y = power_of_two_scale(ys);
        let xs: Vec<f64> = xs.iter().map(|x| x / scale_x).collect();
        let ys: Vec<f64> = ys.iter().map(|y| y / scale_y).collect();

        let mean_x = xs.iter().sum::<f64>() / n as f64;
        let mean_y = ys.iter().sum::<f64>() / n as f64;

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (&x, &y) in xs.iter().zip(&ys) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        Self {
            n,
            mean_x: mean_x * scale_x,
            mean_y: mean_y * scale_y,
            sxx,
            syy,
            sxy,
            scale_x,
            scale_y,
            x_degenerate: negligible_spread(sxx, &xs),
            y_degenerate: negligible_spread(syy, &ys),
        }
    }

    /// OLS slope, 0 when `x` has no spread.
    pub(crate) fn slope(&self) -> f64 {
        if self.x_degenerate {
            return 0.0;
        }
        let slope = self.sxy / self.sxx * self.scale_y / self.scale_x;
        if slope.is_finite() { slope } else { 0.0 }
    }

    pub(crate) fn intercept(&self) -> f64 {
        let intercept = self.mean_y - self.slope() * self.mean_x;
        if intercept.is_finite() { intercept } else { 0.0 }
    }

    /// Pearson r clamped to `[-1, 1]`, 0 when either side has no spread.
    pub(crate) fn pearson_r(&self) -> f64 {
        if self.x_degenerate || self.y_degenerate {
            return 0.0;
        }
        let r = self.sxy / (self.sxx * self.syy).sqrt();
        if r.is_finite() { r.clamp(-1.0, 1.0) } else { 0.0 }
    }
}

/// The power of two at or just below the largest finite magnitude, or 1.
fn power_of_two_scale(values: &[f64]) -> f64 {
    let max_abs = values
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if max_abs == 0.0 {
        return 1.0;
    }
    2.0_f64.powi(max_abs.log2().floor() as i32)
}

/// A sum of squared deviations this small is rounding noise around a constant series.
fn negligible_spread(sum_sq_dev: f64, values: &[f64]) -> bool {
    let max_abs = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let ulp_scale = f64::EPSILON * max_abs;
    !(sum_sq_dev > 16.0 * values.len() as f64 * ulp_scale * ulp_scale)
}

/// Correlates two equal-length series and fits `y = slope * x + intercept`.
///
/// Empty input and zero-variance series yield neutral zeros instead of `NaN`.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidArgument`] if the lengths differ.
pub fn correlate(xs: &[f64], ys: &[f64]) -> Result<CorrelationResult, AnalyticsError> {
    ensure_same_len("correlate", xs.len(), ys.len())?;
    if xs.is_empty() {
        return Ok(CorrelationResult::empty());
    }

    let moments = PairedMoments::compute(xs, ys);
    let r = moments.pearson_r();
    tracing::debug!(
        sample_size = moments.n,
        r,
        x_flat = moments.x_degenerate,
        y_flat = moments.y_degenerate,
        "Computed correlation."
    );

    Ok(CorrelationResult {
        r,
        slope: moments.slope(),
        intercept: moments.intercept(),
        sample_size: moments.n,
        strength: CorrelationStrength::from_r(r),
    })
}

/// Correlates aligned pairs, `x` against `y`.
pub fn correlate_pairs(pairs: &[AlignedPair]) -> CorrelationResult {
    let (xs, ys) = crate::alignment::unzip(pairs);
    // Both columns come from the same pairs, so the lengths always agree.
    correlate(&xs, &ys).unwrap_or_else(|_| CorrelationResult::empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn perfect_linear_relation() {
        let result = correlate(&[10.0, 12.0, 14.0, 16.0, 18.0], &[100.0, 120.0, 140.0, 160.0, 180.0])
            .unwrap();
        assert!(close(result.r, 1.0));
        assert!(close(result.slope, 10.0));
        assert!(close(result.intercept, 0.0));
        assert_eq!(result.sample_size, 5);
        assert_eq!(result.strength, CorrelationStrength::VeryStrong);
    }

    #[test]
    fn mismatched_lengths_name_both_sizes() {
        let err = correlate(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InvalidArgument { operation: "correlate", left: 3, right: 2 }
        );
        assert!(err.to_string().contains("3 vs 2"));
    }

    #[test]
    fn empty_input_is_neutral() {
        assert_eq!(correlate(&[], &[]).unwrap(), CorrelationResult::empty());
    }

    #[test]
    fn flat_series_saturates_to_zero() {
        let result = correlate(&[0.1, 0.1, 0.1], &[3.0, 5.0, 9.0]).unwrap();
        assert_eq!(result.r, 0.0);
        assert_eq!(result.slope, 0.0);
        assert!(close(result.intercept, 17.0 / 3.0));
        assert_eq!(result.strength, CorrelationStrength::Negligible);

        let result = correlate(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0]).unwrap();
        assert_eq!(result.r, 0.0);
        assert!(close(result.slope, 0.0));
        assert!(r_is_finite(&result));
    }

    fn r_is_finite(result: &CorrelationResult) -> bool {
        result.r.is_finite() && result.slope.is_finite() && result.intercept.is_finite()
    }

    #[test]
    fn large_offsets_keep_their_signal() {
        let xs = [1e9, 1e9 + 1.0, 1e9 + 2.0, 1e9 + 3.0];
        let ys = [1.0, 2.0, 3.0, 4.0];
        let result = correlate(&xs, &ys).unwrap();
        assert!(close(result.r, 1.0));
        assert!(close(result.slope, 1.0));
    }

    #[test]
    fn extreme_magnitudes_keep_their_signal() {
        let result = correlate(&[1e200, -1e200, 3e200], &[1.0, 2.0, 3.0]).unwrap();
        assert!(close(result.r, 0.5), "r {}", result.r);
        assert!(((result.slope - 2.5e-201) / 2.5e-201).abs() < 1e-9, "slope {}", result.slope);
        assert!(close(result.intercept, 2.0 - 2.5e-201 * 1e200));
        assert_eq!(result.strength, CorrelationStrength::Moderate);

        let result = correlate(&[1.0, 2.0, 3.0], &[1e-300, 2e-300, 3e-300]).unwrap();
        assert!(close(result.r, 1.0));
        assert!(((result.slope - 1e-300) / 1e-300).abs() < 1e-9);
    }

    #[test]
    fn strength_buckets() {
        assert_eq!(CorrelationStrength::from_r(0.05), CorrelationStrength::Negligible);
        assert_eq!(CorrelationStrength::from_r(-0.1), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::from_r(0.29), CorrelationStrength::Weak);
        assert_eq!(CorrelationStrength::from_r(0.3), CorrelationStrength::Moderate);
        assert_eq!(CorrelationStrength::from_r(-0.6), CorrelationStrength::Strong);
        assert_eq!(CorrelationStrength::from_r(0.8), CorrelationStrength::VeryStrong);
        assert_eq!(CorrelationStrength::from_r(-1.0), CorrelationStrength::VeryStrong);
    }
}
