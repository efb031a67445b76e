//! Trend extrapolation of daily Total series.
//!
//! # Example
//!
//! ```
//! use aadhaar_analytics::forecast::fit_and_forecast;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let daily: Vec<_> = (0..10)
//!     .map(|i| (start + chrono::Duration::days(i), 100.0 + 2.0 * i as f64))
//!     .collect();
//! let points = fit_and_forecast(&daily, 3).unwrap();
//! assert_eq!(points.len(), 3);
//! assert!((points[0].predicted_total - 120.0).abs() < 1e-6);
//! ```

mod linear_trend;

pub use linear_trend::{fit_and_forecast, ForecastConfig, ForecastPoint, LinearTrend};
