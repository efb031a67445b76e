//! Holiday calendar service.
//!
//! # Example
//!
//! ```
//! use aadhaar_analytics::calendar::holidays_for;
//! use aadhaar_analytics::core::RegionTable;
//! use chrono::NaiveDate;
//!
//! let table = RegionTable::india();
//! let index = holidays_for(["Maharashtra"], [2025], &table);
//! let may_day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
//! assert_eq!(index.lookup(may_day, "Maharashtra"), Some("Maharashtra Day"));
//! ```

mod holidays;
mod index;

pub use holidays::{easter_sunday, national_holidays, regional_holidays, supports_region};
pub use index::{holidays_for, HolidayEntry, HolidayIndex, HolidayScope};
