//! Utility functions shared by the analytical modules.

pub mod ols;
pub mod stats;

pub use ols::{ols_fit, OLSResult};
pub use stats::{mean, quantile};
