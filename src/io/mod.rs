//! Reading raw category files into a normalized dataset.

mod loader;

pub use loader::{
    load_category, load_dataset, LoadReport, LoadedCategory, LoadedDataset, DATE_COLUMN,
    MISSING_VALUES, REGION_COLUMN,
};
