//! Ordinary Least Squares (OLS) line fitting.
//!
//! Fits `y = intercept + slope * x` with a single regressor. The regressor
//! is centered before solving so that large ordinals (day numbers in the
//! hundreds of thousands) do not cost precision in the normal equations.

use crate::error::{AnalyticsError, Result};

/// A fitted straight line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OLSResult {
    /// Regression coefficient of `x`.
    pub slope: f64,
    /// Intercept term.
    pub intercept: f64,
}

impl OLSResult {
    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit an OLS line through `(x, y)`.
///
/// Requires at least two observations and at least two distinct `x`
/// values.
pub fn ols_fit(x: &[f64], y: &[f64]) -> Result<OLSResult> {
    let n = y.len();
    if x.len() != n {
        return Err(AnalyticsError::DimensionMismatch {
            expected: n,
            got: x.len(),
        });
    }
    if n < 2 {
        return Err(AnalyticsError::InsufficientData { needed: 2, got: n });
    }

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let y_mean = y.iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        sxx += dx * dx;
        sxy += dx * (yi - y_mean);
    }

    if sxx <= 0.0 {
        return Err(AnalyticsError::InvalidParameter(
            "OLS regression failed: regressor has zero variance".into(),
        ));
    }

    let slope = sxy / sxx;
    Ok(OLSResult {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ols_recovers_exact_line() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 3.0 + 2.0 * v).collect();

        let fit = ols_fit(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.intercept, 3.0, epsilon = 1e-10);
        assert!(x.iter().zip(&y).all(|(&xi, &yi)| (fit.predict(xi) - yi).abs() < 1e-9));
    }

    #[test]
    fn ols_stable_on_large_ordinals() {
        let x: Vec<f64> = (0..60).map(|i| 739_252.0 + i as f64).collect();
        let y: Vec<f64> = (0..60).map(|i| 1_000.0 + 5.0 * i as f64).collect();

        let fit = ols_fit(&x, &y).unwrap();
        assert_relative_eq!(fit.slope, 5.0, epsilon = 1e-8);
        assert_relative_eq!(fit.predict(739_252.0 + 60.0), 1_300.0, epsilon = 1e-6);
    }

    #[test]
    fn ols_flat_series_has_zero_slope() {
        let fit = ols_fit(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0]).unwrap();
        assert_relative_eq!(fit.slope, 0.0);
        assert_relative_eq!(fit.predict(100.0), 7.0);
    }

    #[test]
    fn ols_rejects_degenerate_input() {
        assert!(matches!(
            ols_fit(&[1.0], &[1.0]),
            Err(AnalyticsError::InsufficientData { needed: 2, got: 1 })
        ));
        assert!(matches!(
            ols_fit(&[1.0, 1.0], &[1.0, 2.0]),
            Err(AnalyticsError::InvalidParameter(_))
        ));
        assert!(matches!(
            ols_fit(&[1.0, 2.0], &[1.0]),
            Err(AnalyticsError::DimensionMismatch { .. })
        ));
    }
}
