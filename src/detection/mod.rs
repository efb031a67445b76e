//! Anomaly detection on daily Total series.

mod isolation_forest;

pub use isolation_forest::{
    average_path_length, detect_anomalies, AnomalyFlag, IsolationForest, IsolationForestConfig,
};
