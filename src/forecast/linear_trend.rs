//! Ordinary least squares trend on a day ordinal.
//!
//! A naive baseline: no seasonality and no prediction intervals.

use crate::core::Category;
use crate::error::{AnalyticsError, MetricOutcome, Result, SkipReason};
use crate::utils::{ols_fit, OLSResult};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Forecast settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of future days to project
    pub horizon_days: usize,
    /// Category whose daily Total is forecast
    pub category: Category,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            category: Category::Enrolment,
        }
    }
}

/// One projected day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_total: f64,
}

/// A straight line of Total against the day ordinal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    fit: OLSResult,
    last_date: NaiveDate,
}

fn ordinal(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

impl LinearTrend {
    /// Fit the trend to (date, Total) observations in any order.
    pub fn fit(daily: &[(NaiveDate, f64)]) -> Result<Self> {
        let last_date = daily
            .iter()
            .map(|(d, _)| *d)
            .max()
            .ok_or(AnalyticsError::EmptyData)?;

        let x: Vec<f64> = daily.iter().map(|(d, _)| ordinal(*d)).collect();
        let y: Vec<f64> = daily.iter().map(|(_, t)| *t).collect();
        let fit = ols_fit(&x, &y)?;

        Ok(Self { fit, last_date })
    }

    /// Daily change in Total.
    pub fn slope(&self) -> f64 {
        self.fit.slope
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last_date
    }

    /// Fitted Total on `date`.
    pub fn predict_on(&self, date: NaiveDate) -> f64 {
        self.fit.predict(ordinal(date))
    }

    /// One point per day for the `horizon` days after the last observation.
    pub fn forecast(&self, horizon: usize) -> Vec<ForecastPoint> {
        (1..=horizon as i64)
            .map(|step| {
                let date = self.last_date + Duration::days(step);
                ForecastPoint {
                    date,
                    predicted_total: self.predict_on(date),
                }
            })
            .collect()
    }
}

/// Fit a linear trend and project `horizon_days` days ahead.
///
/// Needs at least two distinct observed dates.
pub fn fit_and_forecast(
    daily: &[(NaiveDate, f64)],
    horizon_days: usize,
) -> MetricOutcome<Vec<ForecastPoint>> {
    let model = LinearTrend::fit(daily).map_err(|e| match e {
        AnalyticsError::EmptyData => SkipReason::InsufficientData { needed: 2, got: 0 },
        AnalyticsError::InsufficientData { needed, got } => {
            SkipReason::InsufficientData { needed, got }
        }
        other => SkipReason::Degenerate(other.to_string()),
    })?;
    Ok(model.forecast(horizon_days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn linear(days: i64, base: f64, slope: f64) -> Vec<(NaiveDate, f64)> {
        (0..days)
            .map(|i| (date(2025, 3, 1) + Duration::days(i), base + slope * i as f64))
            .collect()
    }

    #[test]
    fn projects_exact_line() {
        let daily = linear(10, 50.0, 3.0);
        let points = fit_and_forecast(&daily, 5).unwrap();

        assert_eq!(points.len(), 5);
        assert_eq!(points[0].date, date(2025, 3, 11));
        assert_eq!(points[4].date, date(2025, 3, 15));
        assert_relative_eq!(points[0].predicted_total, 80.0, epsilon = 1e-6);
        assert_relative_eq!(points[4].predicted_total, 92.0, epsilon = 1e-6);
    }

    #[test]
    fn horizon_dates_follow_last_observation() {
        let mut daily = linear(40, 10.0, -0.5);
        daily.reverse();
        let points = fit_and_forecast(&daily, 30).unwrap();

        assert_eq!(points.len(), 30);
        let last = daily.iter().map(|(d, _)| *d).max().unwrap();
        assert!(points.iter().all(|p| p.date > last));
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn gaps_use_calendar_ordinals() {
        let daily = vec![(date(2025, 1, 1), 0.0), (date(2025, 1, 11), 10.0)];
        let model = LinearTrend::fit(&daily).unwrap();
        assert_relative_eq!(model.slope(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(model.predict_on(date(2025, 1, 21)), 20.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_horizon_is_empty() {
        assert!(fit_and_forecast(&linear(5, 1.0, 1.0), 0).unwrap().is_empty());
    }

    #[test]
    fn too_little_history_is_skipped() {
        assert_eq!(
            fit_and_forecast(&[], 3),
            Err(SkipReason::InsufficientData { needed: 2, got: 0 })
        );
        assert_eq!(
            fit_and_forecast(&[(date(2025, 1, 1), 5.0)], 3),
            Err(SkipReason::InsufficientData { needed: 2, got: 1 })
        );
    }
}
