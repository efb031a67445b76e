//! Normalized tabular records.

use super::category::Category;
use super::measures::discover_measures;
use crate::error::{AnalyticsError, MetricOutcome, Result, SkipReason};
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

/// One row of activity for a region on a date.
///
/// `values` is aligned with the owning frame's numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub region: String,
    pub date: NaiveDate,
    pub values: Vec<f64>,
}

impl Record {
    pub fn new(region: impl Into<String>, date: NaiveDate, values: Vec<f64>) -> Self {
        Self {
            region: region.into(),
            date,
            values,
        }
    }
}

/// A cleaned table of records sharing one set of numeric columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    name: String,
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Frame {
    /// Create an empty frame with the given numeric columns.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: "frame".to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
            records: Vec::new(),
        }
    }

    /// Build a frame from records, validating each one.
    pub fn from_records<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        records: Vec<Record>,
    ) -> Result<Self> {
        let mut frame = Self::new(columns);
        frame.records.reserve(records.len());
        for record in records {
            frame.push(record)?;
        }
        Ok(frame)
    }

    /// Set the name used in skip reports.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a record.
    ///
    /// Values must match the column count and be finite and non-negative.
    pub fn push(&mut self, record: Record) -> Result<()> {
        if record.values.len() != self.columns.len() {
            return Err(AnalyticsError::DimensionMismatch {
                expected: self.columns.len(),
                got: record.values.len(),
            });
        }
        for (column, &value) in self.columns.iter().zip(&record.values) {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalyticsError::InvalidMeasure {
                    column: column.clone(),
                    value,
                });
            }
        }
        self.records.push(record);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Additive measures among this frame's numeric columns.
    pub fn measures(&self) -> Vec<String> {
        discover_measures(&self.columns)
    }

    /// Column positions of `measures`.
    ///
    /// An empty measure list is reported as [`SkipReason::NoMeasures`];
    /// an unknown name as [`SkipReason::MissingColumn`].
    pub fn measure_indices(&self, measures: &[String]) -> MetricOutcome<Vec<usize>> {
        if measures.is_empty() {
            return Err(SkipReason::NoMeasures);
        }
        measures
            .iter()
            .map(|m| {
                self.columns
                    .iter()
                    .position(|c| c == m)
                    .ok_or_else(|| SkipReason::MissingColumn {
                        category: self.name.clone(),
                        column: m.clone(),
                    })
            })
            .collect()
    }

    /// Calendar years present in the frame.
    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|r| r.date.year()).collect()
    }

    /// Distinct region names present in the frame.
    pub fn regions(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.region.as_str()).collect()
    }

    /// Distinct (date, region) pairs in date order.
    pub fn date_regions(&self) -> BTreeSet<(NaiveDate, &str)> {
        self.records
            .iter()
            .map(|r| (r.date, r.region.as_str()))
            .collect()
    }

    /// Sort records by date, keeping the relative order of same-day rows.
    pub fn sort_by_date(&mut self) {
        self.records.sort_by_key(|r| r.date);
    }
}

/// Cleaned frames keyed by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedDataset {
    frames: BTreeMap<Category, Frame>,
}

impl NormalizedDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the frame for `category`, naming it after the category.
    pub fn insert(&mut self, category: Category, frame: Frame) {
        self.frames
            .insert(category, frame.with_name(category.as_str()));
    }

    pub fn with_frame(mut self, category: Category, frame: Frame) -> Self {
        self.insert(category, frame);
        self
    }

    /// The frame for `category`, or a skip if it is absent.
    pub fn frame(&self, category: Category) -> MetricOutcome<&Frame> {
        self.frames
            .get(&category)
            .ok_or(SkipReason::MissingCategory(category))
    }

    pub fn contains(&self, category: Category) -> bool {
        self.frames.contains_key(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.frames.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &Frame)> {
        self.frames.iter().map(|(c, f)| (*c, f))
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn push_rejects_misaligned_rows() {
        let mut frame = Frame::new(["a", "b"]);
        let err = frame
            .push(Record::new("X", date(2025, 1, 1), vec![1.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::DimensionMismatch { expected: 2, got: 1 }
        ));
    }

    #[test]
    fn push_rejects_negative_and_nan() {
        let mut frame = Frame::new(["a"]);
        assert!(frame.push(Record::new("X", date(2025, 1, 1), vec![-1.0])).is_err());
        assert!(frame
            .push(Record::new("X", date(2025, 1, 1), vec![f64::NAN]))
            .is_err());
        assert!(frame.is_empty());
    }

    #[test]
    fn measures_exclude_pincode() {
        let frame = Frame::new(["pincode", "age_0_5", "age_5_17"]);
        assert_eq!(frame.measures(), vec!["age_0_5", "age_5_17"]);
    }

    #[test]
    fn measure_indices_reports_missing_column() {
        let frame = Frame::new(["a"]).with_name("enrolment");
        assert_eq!(frame.measure_indices(&["a".to_string()]), Ok(vec![0]));
        assert_eq!(
            frame.measure_indices(&["b".to_string()]),
            Err(SkipReason::MissingColumn {
                category: "enrolment".to_string(),
                column: "b".to_string(),
            })
        );
        assert_eq!(frame.measure_indices(&[]), Err(SkipReason::NoMeasures));
    }

    #[test]
    fn dataset_reports_missing_category() {
        let ds = NormalizedDataset::new().with_frame(Category::Biometric, Frame::new(["x"]));
        assert_eq!(ds.frame(Category::Biometric).unwrap().name(), "biometric");
        assert_eq!(
            ds.frame(Category::Enrolment).unwrap_err(),
            SkipReason::MissingCategory(Category::Enrolment)
        );
    }

    #[test]
    fn years_and_regions_are_distinct() {
        let frame = Frame::from_records(
            ["a"],
            vec![
                Record::new("B", date(2024, 12, 31), vec![1.0]),
                Record::new("A", date(2025, 1, 1), vec![1.0]),
                Record::new("A", date(2025, 1, 1), vec![2.0]),
            ],
        )
        .unwrap();
        assert_eq!(frame.years().into_iter().collect::<Vec<_>>(), vec![2024, 2025]);
        assert_eq!(frame.regions().into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(frame.date_regions().len(), 2);
    }
}
