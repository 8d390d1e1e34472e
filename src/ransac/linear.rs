//! Ordinary least squares line fitting.

use crate::error::{check_xy, Result};

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    /// Least squares fit over all points.
    ///
    /// When `x` has no spread the slope is 0 and the intercept is the
    /// mean of `y`.
    pub fn fit(x: &[f64], y: &[f64]) -> Result<Self> {
        check_xy(x, y)?;
        Ok(Self::fit_points(x.iter().copied().zip(y.iter().copied())))
    }

    /// Least squares fit over the points at `indices`.
    pub(crate) fn fit_indices(x: &[f64], y: &[f64], indices: &[usize]) -> Self {
        Self::fit_points(indices.iter().map(|&i| (x[i], y[i])))
    }

    fn fit_points<I>(points: I) -> Self
    where
        I: Iterator<Item = (f64, f64)> + Clone,
    {
        let (count, sum_x, sum_y) = points
            .clone()
            .fold((0usize, 0.0, 0.0), |(c, sx, sy), (x, y)| (c + 1, sx + x, sy + y));
        if count == 0 {
            return Self {
                slope: 0.0,
                intercept: 0.0,
            };
        }
        let mean_x = sum_x / count as f64;
        let mean_y = sum_y / count as f64;

        let (sxx, sxy) = points.fold((0.0, 0.0), |(sxx, sxy), (x, y)| {
            let dx = x - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });

        let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        Self {
            slope,
            intercept: mean_y - slope * mean_x,
        }
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Coefficient of determination of this line on `(x, y)`.
    pub fn score(&self, x: &[f64], y: &[f64]) -> f64 {
        let predicted: Vec<f64> = x.iter().map(|&v| self.predict(v)).collect();
        r2_score(y, &predicted)
    }
}

/// Coefficient of determination `1 - SS_res / SS_tot`.
///
/// At most 1.0; negative when the prediction is worse than the mean of
/// `y_true`. A constant `y_true` gives 1.0 for a perfect prediction and
/// 0.0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len().min(y_pred.len());
    if n == 0 {
        return 0.0;
    }
    let mean = y_true[..n].iter().sum::<f64>() / n as f64;
    let (ss_res, ss_tot) = y_true
        .iter()
        .zip(y_pred)
        .fold((0.0, 0.0), |(res, tot), (&t, &p)| {
            (res + (t - p) * (t - p), tot + (t - mean) * (t - mean))
        });

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Median of `values`, `NaN` for an empty slice.
pub(crate) fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Median absolute deviation from the median.
pub fn median_absolute_deviation(values: &[f64]) -> f64 {
    let center = median(values);
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_fit_exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let line = Line::fit(&x, &y).unwrap();
        assert!((line.slope - 2.0).abs() < 1e-12);
        assert!((line.intercept - 1.0).abs() < 1e-12);
        assert!((line.score(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_constant_x() {
        let line = Line::fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 6.0]).unwrap();
        assert_eq!(line.slope, 0.0);
        assert!((line.intercept - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_indices_uses_subset() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 100.0, 2.0, 3.0];
        let line = Line::fit_indices(&x, &y, &[0, 2, 3]);
        assert!((line.slope - 1.0).abs() < 1e-12);
        assert!(line.intercept.abs() < 1e-12);
    }

    #[test]
    fn test_fit_rejects_mismatch() {
        assert!(matches!(
            Line::fit(&[1.0], &[1.0, 2.0]),
            Err(Error::LengthMismatch { x: 1, y: 2 })
        ));
    }

    #[test]
    fn test_r2_worse_than_mean_is_negative() {
        let y = [1.0, 2.0, 3.0];
        assert!(r2_score(&y, &[3.0, 2.0, 1.0]) < 0.0);
        assert!(r2_score(&y, &[2.0, 2.0, 2.0]).abs() < 1e-12);
    }

    #[test]
    fn test_r2_constant_target() {
        assert_eq!(r2_score(&[4.0, 4.0], &[4.0, 4.0]), 1.0);
        assert_eq!(r2_score(&[4.0, 4.0], &[4.0, 5.0]), 0.0);
    }

    #[test]
    fn test_median_and_mad() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
        // |v - 2.5| = [1.5, 0.5, 0.5, 97.5] -> median 1
        assert_eq!(median_absolute_deviation(&[1.0, 2.0, 3.0, 100.0]), 1.0);
        assert!(median(&[]).is_nan());
    }
}
