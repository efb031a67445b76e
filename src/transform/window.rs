//! Trailing window statistics for daily series.

/// Trailing rolling mean over `window` observations.
///
/// Positions with fewer than `window` observations behind them are NaN,
/// so a 30-day average of a 20-day series is all NaN.
pub fn rolling_mean(series: &[f64], window: usize) -> Vec<f64> {
    let n = series.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }

    let mut sum: f64 = series[..window].iter().sum();
    result[window - 1] = sum / window as f64;
    for i in window..n {
        sum += series[i] - series[i - window];
        result[i] = sum / window as f64;
    }

    result
}

/// Rolling means for several window sizes, in the order given.
pub fn moving_averages(series: &[f64], windows: &[usize]) -> Vec<(usize, Vec<f64>)> {
    windows
        .iter()
        .map(|&w| (w, rolling_mean(series, w)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rolling_mean_trailing() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = rolling_mean(&series, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_relative_eq!(result[2], 2.0, epsilon = 1e-10);
        assert_relative_eq!(result[3], 3.0, epsilon = 1e-10);
        assert_relative_eq!(result[4], 4.0, epsilon = 1e-10);
    }

    #[test]
    fn rolling_mean_window_one_is_identity() {
        let series = vec![4.0, 8.0, 15.0];
        assert_eq!(rolling_mean(&series, 1), series);
    }

    #[test]
    fn rolling_mean_short_series_all_nan() {
        let series = vec![1.0; 5];
        assert!(rolling_mean(&series, 7).iter().all(|v| v.is_nan()));
        assert!(rolling_mean(&series, 0).iter().all(|v| v.is_nan()));
        assert!(rolling_mean(&[], 3).is_empty());
    }

    #[test]
    fn moving_averages_keep_window_order() {
        let series: Vec<f64> = (1..=10).map(f64::from).collect();
        let mas = moving_averages(&series, &[7, 3]);
        assert_eq!(mas[0].0, 7);
        assert_eq!(mas[1].0, 3);
        assert_relative_eq!(mas[0].1[9], 7.0, epsilon = 1e-10);
        assert_relative_eq!(mas[1].1[9], 9.0, epsilon = 1e-10);
    }
}
