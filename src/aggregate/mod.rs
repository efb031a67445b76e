//! Rollups over normalized frames.
//!
//! # Example
//!
//! ```
//! use aadhaar_analytics::aggregate::{aggregate_by_region, aggregate_by_time};
//! use aadhaar_analytics::core::{Frame, Record, RegionTable};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let frame = Frame::from_records(
//!     ["enc"],
//!     vec![
//!         Record::new("StateA", day, vec![100.0]),
//!         Record::new("StateB", day, vec![200.0]),
//!     ],
//! )
//! .unwrap();
//!
//! let measures = frame.measures();
//! let by_time = aggregate_by_time(&frame, &measures).unwrap();
//! assert_eq!(by_time.total_of(&day), Some(300.0));
//!
//! let table = RegionTable::from_names(["StateA", "StateB"]);
//! let by_region = aggregate_by_region(&frame, &measures, &table).unwrap();
//! assert_eq!(by_region.total_of("StateB"), Some(200.0));
//! ```

mod intensity;
mod rollup;
mod weekday;

pub use intensity::{weekday_month_intensity, weekday_profile, IntensityMatrix};
pub use rollup::{
    aggregate_by_region, aggregate_by_time, RegionRollup, Rollup, RollupRow, TimeSeriesRollup,
};
pub use weekday::{aggregate_by_region_weekday, weekday_name, RegionWeekdayMatrix, WEEKDAYS};
