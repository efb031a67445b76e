//! # aadhaar-analytics
//!
//! Analytics engine for state-tagged enrolment and update transactions.
//!
//! Turns cleaned category frames into time and region rollups, an
//! operational maturity index, holiday-aware day-type buckets, region
//! clusters, anomaly flags, trend forecasts and weekday burstiness scores.
//!
//! ```
//! use aadhaar_analytics::prelude::*;
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let frame = Frame::from_records(
//!     ["age_0_5"],
//!     vec![Record::new("Kerala", day, vec![12.0]), Record::new("Goa", day, vec![3.0])],
//! )
//! .unwrap();
//! let dataset = NormalizedDataset::new().with_frame(Category::Enrolment, frame);
//!
//! let report = run_analysis(&dataset, &AnalyticsConfig::default(), &RegionTable::india());
//! assert!(report.maturity.is_err());
//! ```

#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]
#![allow(clippy::needless_range_loop)]

pub mod aggregate;
pub mod burstiness;
pub mod calendar;
pub mod clustering;
pub mod config;
pub mod core;
pub mod daytype;
pub mod detection;
pub mod error;
pub mod forecast;
pub mod io;
pub mod maturity;
pub mod pipeline;
pub mod transform;
pub mod utils;

pub use error::{AnalyticsError, MetricOutcome, Result, SkipReason};

pub mod prelude {
    pub use crate::config::AnalyticsConfig;
    pub use crate::core::{Category, Frame, NormalizedDataset, Record, RegionTable};
    pub use crate::error::{AnalyticsError, MetricOutcome, Result, SkipReason};
    pub use crate::pipeline::{run_analysis, AnalysisReport};
}
