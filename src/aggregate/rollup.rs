//! Sum rollups keyed by date or region.

use crate::core::{Frame, RegionTable};
use crate::error::MetricOutcome;
use crate::transform::rolling_mean;
use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::BTreeMap;
use tracing::warn;

/// Per-measure sums for one key, plus their total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupRow {
    /// Sums aligned with the rollup's measures.
    pub values: Vec<f64>,
    /// Sum of `values`.
    pub total: f64,
}

impl RollupRow {
    fn zeros(n: usize) -> Self {
        Self {
            values: vec![0.0; n],
            total: 0.0,
        }
    }

    fn add(&mut self, values: &[f64], indices: &[usize]) {
        for (slot, &idx) in self.values.iter_mut().zip(indices) {
            *slot += values[idx];
            self.total += values[idx];
        }
    }
}

/// A sum-aggregated table keyed by one dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rollup<K: Ord> {
    measures: Vec<String>,
    rows: BTreeMap<K, RollupRow>,
    dropped_rows: usize,
}

/// Rollup keyed by date.
pub type TimeSeriesRollup = Rollup<NaiveDate>;

/// Rollup keyed by region name.
pub type RegionRollup = Rollup<String>;

impl<K: Ord> Rollup<K> {
    fn empty(measures: &[String]) -> Self {
        Self {
            measures: measures.to_vec(),
            rows: BTreeMap::new(),
            dropped_rows: 0,
        }
    }

    /// Build a rollup directly from rows.
    pub fn from_rows(measures: Vec<String>, rows: impl IntoIterator<Item = (K, Vec<f64>)>) -> Self {
        let rows = rows
            .into_iter()
            .map(|(k, values)| {
                let total = values.iter().sum();
                (k, RollupRow { values, total })
            })
            .collect();
        Self {
            measures,
            rows,
            dropped_rows: 0,
        }
    }

    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    pub fn rows(&self) -> &BTreeMap<K, RollupRow> {
        &self.rows
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&RollupRow>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.rows.get(key)
    }

    /// Total for `key`, if present.
    pub fn total_of<Q>(&self, key: &Q) -> Option<f64>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.rows.get(key).map(|r| r.total)
    }

    /// Sum of every row's total.
    pub fn grand_total(&self) -> f64 {
        self.rows.values().map(|r| r.total).sum()
    }

    /// Rows excluded because their key was not admissible.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TimeSeriesRollup {
    /// (date, Total) pairs in date order.
    pub fn daily_totals(&self) -> Vec<(NaiveDate, f64)> {
        self.rows.iter().map(|(d, r)| (*d, r.total)).collect()
    }

    /// Trailing moving average of the Total series over `window` rows.
    ///
    /// The first `window - 1` entries are NaN.
    pub fn moving_average(&self, window: usize) -> Vec<f64> {
        let totals: Vec<f64> = self.rows.values().map(|r| r.total).collect();
        rolling_mean(&totals, window)
    }
}

impl RegionRollup {
    /// The `n` regions with the largest Total, ties in name order.
    pub fn top_by_total(&self, n: usize) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .rows
            .iter()
            .map(|(k, r)| (k.as_str(), r.total))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(n);
        ranked
    }
}

/// Sum `measures` per distinct date.
///
/// Every record participates regardless of region.
pub fn aggregate_by_time(frame: &Frame, measures: &[String]) -> MetricOutcome<TimeSeriesRollup> {
    let indices = frame.measure_indices(measures)?;
    let mut rollup = Rollup::empty(measures);

    for record in frame.records() {
        rollup
            .rows
            .entry(record.date)
            .or_insert_with(|| RollupRow::zeros(indices.len()))
            .add(&record.values, &indices);
    }

    Ok(rollup)
}

/// Sum `measures` per distinct region.
///
/// Records whose region is not in `regions` are dropped and counted.
pub fn aggregate_by_region(
    frame: &Frame,
    measures: &[String],
    regions: &RegionTable,
) -> MetricOutcome<RegionRollup> {
    let indices = frame.measure_indices(measures)?;
    let mut rollup = Rollup::empty(measures);

    for record in frame.records() {
        if !regions.contains(&record.region) {
            rollup.dropped_rows += 1;
            continue;
        }
        if let Some(row) = rollup.rows.get_mut(record.region.as_str()) {
            row.add(&record.values, &indices);
        } else {
            let mut row = RollupRow::zeros(indices.len());
            row.add(&record.values, &indices);
            rollup.rows.insert(record.region.clone(), row);
        }
    }

    if rollup.dropped_rows > 0 {
        warn!(
            frame = frame.name(),
            dropped = rollup.dropped_rows,
            "dropped rows with invalid region names"
        );
    }

    Ok(rollup)
}
