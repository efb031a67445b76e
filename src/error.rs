//! Error types for the analytics engine.
//!
//! Two layers exist: [`AnalyticsError`] for hard failures (I/O, malformed
//! input, bad parameters) and [`SkipReason`] for metrics that were not
//! computed. A skipped metric never aborts the run.

use crate::core::Category;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Outcome of a single metric: the value, or the reason it was skipped.
pub type MetricOutcome<T> = std::result::Result<T, SkipReason>;

/// Errors that can occur while loading data or configuring the engine.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between a row and its frame.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A measure value was negative or not finite.
    #[error("measure '{column}' has invalid value {value}")]
    InvalidMeasure { column: String, value: f64 },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Why a metric produced no output.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// A category the metric depends on is absent from the dataset.
    #[error("category '{0}' missing from dataset")]
    MissingCategory(Category),

    /// A required column is absent.
    #[error("column '{column}' missing from {category}")]
    MissingColumn { category: String, column: String },

    /// No additive measure columns were found.
    #[error("no numeric measures to aggregate")]
    NoMeasures,

    /// Too few entities for the metric to be defined.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The metric is undefined for this input (e.g. division by zero).
    #[error("degenerate metric: {0}")]
    Degenerate(String),

    /// The metric configuration is invalid.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = AnalyticsError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = AnalyticsError::InsufficientData { needed: 3, got: 2 };
        assert_eq!(err.to_string(), "insufficient data: need at least 3, got 2");

        let err = AnalyticsError::InvalidMeasure {
            column: "age_5_17".to_string(),
            value: -4.0,
        };
        assert_eq!(err.to_string(), "measure 'age_5_17' has invalid value -4");
    }

    #[test]
    fn skip_reasons_render_category() {
        let skip = SkipReason::MissingCategory(Category::Enrolment);
        assert_eq!(skip.to_string(), "category 'enrolment' missing from dataset");

        let skip = SkipReason::MissingColumn {
            category: "biometric".to_string(),
            column: "state".to_string(),
        };
        assert_eq!(skip.to_string(), "column 'state' missing from biometric");
    }

    #[test]
    fn skip_reasons_are_clonable_and_comparable() {
        let a = SkipReason::InsufficientData { needed: 3, got: 1 };
        assert_eq!(a.clone(), a);
        assert_ne!(a, SkipReason::NoMeasures);
    }

    #[test]
    fn skip_reason_serializes_with_tag() {
        let json = serde_json::to_string(&SkipReason::NoMeasures).unwrap();
        assert_eq!(json, r#"{"reason":"no_measures"}"#);

        let json = serde_json::to_string(&SkipReason::MissingCategory(Category::Biometric)).unwrap();
        assert_eq!(json, r#"{"reason":"missing_category","detail":"biometric"}"#);
    }
}
