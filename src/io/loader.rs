//! CSV loading and cleaning.
//!
//! Each category lives in its own directory of `*.csv` files sharing a
//! `date` and a `state` column. Other columns are kept when every
//! non-missing cell parses as a number.

use crate::config::InputConfig;
use crate::core::{Category, Frame, NormalizedDataset, Record};
use crate::error::{AnalyticsError, Result};
use chrono::NaiveDate;
use csv::StringRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Column holding the region name.
pub const REGION_COLUMN: &str = "state";
/// Column holding the activity date.
pub const DATE_COLUMN: &str = "date";

/// Row and file counts from loading one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub files_read: usize,
    pub files_skipped: usize,
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Rows whose date did not parse.
    pub invalid_dates: usize,
    /// Rows with a negative or non-finite measure.
    pub invalid_measures: usize,
}

/// A cleaned category frame with its load counts.
#[derive(Debug, Clone)]
pub struct LoadedCategory {
    pub frame: Frame,
    pub report: LoadReport,
}

struct RawTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl RawTable {
    fn position(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == column)
    }
}

fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().map_or(false, |ext| ext == "csv"))
        .collect();
    files.sort();
    Ok(files)
}

/// Cells read as missing, matching the pandas `read_csv` defaults.
pub const MISSING_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Missing cells fill to zero; anything else must parse as a number.
fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if MISSING_VALUES.contains(&cell) {
        Some(0.0)
    } else {
        cell.parse().ok()
    }
}

fn read_table(path: &Path) -> csv::Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    let rows = reader.records().collect::<csv::Result<Vec<_>>>()?;
    Ok(RawTable { headers, rows })
}

/// Columns whose non-missing cells all parse as numbers, in first-seen order.
fn numeric_columns(tables: &[RawTable]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut numeric: BTreeMap<String, bool> = BTreeMap::new();

    for table in tables {
        for (i, header) in table.headers.iter().enumerate() {
            let name = header.trim();
            if name == REGION_COLUMN || name == DATE_COLUMN {
                continue;
            }
            let parses = table
                .rows
                .iter()
                .all(|row| row.get(i).map_or(true, |cell| parse_cell(cell).is_some()));
            match numeric.get_mut(name) {
                Some(flag) => *flag &= parses,
                None => {
                    order.push(name.to_string());
                    numeric.insert(name.to_string(), parses);
                }
            }
        }
    }

    order.retain(|name| numeric.get(name).copied().unwrap_or(false));
    order
}

/// Load and clean every CSV file in `dir`.
///
/// Returns `Ok(None)` when no usable file exists. Files that fail to parse
/// or lack a `state` or `date` column are skipped with a warning.
pub fn load_category(
    category: Category,
    dir: &Path,
    date_format: &str,
) -> Result<Option<LoadedCategory>> {
    if !dir.is_dir() {
        warn!(%category, dir = %dir.display(), "data directory not found");
        return Ok(None);
    }

    let mut report = LoadReport::default();
    let mut tables = Vec::new();

    for path in csv_files(dir)? {
        let table = match read_table(&path) {
            Ok(table) => table,
            Err(e) => {
                warn!(%category, file = %path.display(), error = %e, "skipping unreadable csv file");
                report.files_skipped += 1;
                continue;
            }
        };
        if table.position(REGION_COLUMN).is_none() || table.position(DATE_COLUMN).is_none() {
            warn!(
                %category,
                file = %path.display(),
                "skipping file without 'state' or 'date' column"
            );
            report.files_skipped += 1;
            continue;
        }
        debug!(file = %path.display(), rows = table.rows.len(), "read csv");
        report.files_read += 1;
        report.rows_read += table.rows.len();
        tables.push(table);
    }

    if tables.is_empty() {
        warn!(%category, dir = %dir.display(), "no usable csv files");
        return Ok(None);
    }

    let columns = numeric_columns(&tables);
    let mut frame = Frame::new(columns.iter().cloned()).with_name(category.as_str());

    for table in &tables {
        let region_idx = table.position(REGION_COLUMN);
        let date_idx = table.position(DATE_COLUMN);
        let value_idx: Vec<Option<usize>> = columns.iter().map(|c| table.position(c)).collect();

        for row in &table.rows {
            let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("").trim();

            let Ok(date) = NaiveDate::parse_from_str(cell(date_idx), date_format) else {
                report.invalid_dates += 1;
                continue;
            };
            let values: Vec<f64> = value_idx
                .iter()
                .map(|&idx| parse_cell(cell(idx)).unwrap_or(0.0))
                .collect();

            match frame.push(Record::new(cell(region_idx), date, values)) {
                Ok(()) => report.rows_kept += 1,
                Err(AnalyticsError::InvalidMeasure { .. }) => report.invalid_measures += 1,
                Err(e) => return Err(e),
            }
        }
    }

    frame.sort_by_date();

    if report.invalid_dates > 0 {
        warn!(%category, dropped = report.invalid_dates, "dropped rows with invalid dates");
    }
    if report.invalid_measures > 0 {
        warn!(%category, dropped = report.invalid_measures, "dropped rows with invalid measures");
    }
    info!(
        %category,
        files = report.files_read,
        rows = report.rows_kept,
        columns = ?frame.columns(),
        "loaded category"
    );

    Ok(Some(LoadedCategory { frame, report }))
}

/// A dataset loaded from disk with per-category counts.
#[derive(Debug, Clone, Default)]
pub struct LoadedDataset {
    pub dataset: NormalizedDataset,
    pub reports: BTreeMap<Category, LoadReport>,
}

/// Load every category found under `root`.
///
/// Missing categories are left out of the dataset; the pipeline reports
/// them when a metric needs them.
pub fn load_dataset(root: &Path, input: &InputConfig) -> Result<LoadedDataset> {
    let mut loaded = LoadedDataset::default();
    for category in Category::ALL {
        let dir = root.join(input.category_dirs.get(category));
        if let Some(LoadedCategory { frame, report }) =
            load_category(category, &dir, &input.date_format)?
        {
            loaded.dataset.insert(category, frame);
            loaded.reports.insert(category, report);
        }
    }
    Ok(loaded)
}
