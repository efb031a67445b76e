//! Core data structures: categories, regions, and normalized frames.

mod category;
mod frame;
mod measures;
mod region;

pub use category::Category;
pub use frame::{Frame, NormalizedDataset, Record};
pub use measures::{discover_measures, is_measure_column, EXCLUDED_MEASURE_MARKERS};
pub use region::{RegionTable, INDIA_REGIONS};
