//! Data transformations.
//!
//! Provides feature standardization and trailing window averages.
//!
//! # Example
//!
//! ```
//! use aadhaar_analytics::transform::{rolling_mean, standardize};
//!
//! let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//!
//! // Standardize to zero mean, unit variance
//! let scaled = standardize(&series);
//! assert!(scaled.data[2].abs() < 1e-12);
//!
//! // Rolling mean with window 3
//! let rm = rolling_mean(&series, 3);
//! assert_eq!(rm[4], 4.0);
//! ```

pub mod scale;
pub mod window;

pub use scale::{standardize, standardize_columns, ScaleResult};
pub use window::{moving_averages, rolling_mean};
