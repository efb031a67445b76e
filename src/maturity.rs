//! Operational Maturity Index (OMI).
//!
//! OMI = updates / (enrolments + updates) per region. Low values mark
//! regions still enrolling (expansion), high values regions whose traffic
//! is dominated by updates (maintenance).

use crate::aggregate::RegionRollup;
use crate::core::Category;
use crate::error::{MetricOutcome, SkipReason};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Operational phase implied by a region's OMI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityPhase {
    /// New enrolments dominate.
    Expansion,
    Transition,
    /// Updates dominate.
    Maintenance,
}

/// OMI cut-offs for phase labelling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaturityThresholds {
    /// OMI strictly below this is `Expansion`.
    pub growth_below: f64,
    /// OMI strictly above this is `Maintenance`.
    pub mature_above: f64,
}

impl Default for MaturityThresholds {
    fn default() -> Self {
        Self {
            growth_below: 0.3,
            mature_above: 0.7,
        }
    }
}

impl MaturityThresholds {
    pub fn phase(&self, omi: f64) -> MaturityPhase {
        if omi > self.mature_above {
            MaturityPhase::Maintenance
        } else if omi < self.growth_below {
            MaturityPhase::Expansion
        } else {
            MaturityPhase::Transition
        }
    }
}

/// Maturity figures for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaturityRecord {
    pub region: String,
    pub total_enrolment: f64,
    pub total_updates: f64,
    pub total_volume: f64,
    /// In [0, 1].
    pub omi: f64,
    pub phase: MaturityPhase,
}

/// Compute OMI per region with the default phase thresholds.
pub fn compute_omi(
    enrolment: &RegionRollup,
    updates: &BTreeMap<Category, RegionRollup>,
) -> MetricOutcome<Vec<MaturityRecord>> {
    compute_omi_with(enrolment, updates, &MaturityThresholds::default())
}

/// Compute OMI per region, sorted by OMI descending.
///
/// Update totals are summed over whichever update categories are present.
/// Regions absent from either the enrolment side or every update rollup
/// are excluded, as are regions with zero total volume.
pub fn compute_omi_with(
    enrolment: &RegionRollup,
    updates: &BTreeMap<Category, RegionRollup>,
    thresholds: &MaturityThresholds,
) -> MetricOutcome<Vec<MaturityRecord>> {
    if updates.is_empty() {
        return Err(SkipReason::Degenerate(
            "no update category rollups available".into(),
        ));
    }

    let mut update_totals: BTreeMap<&str, f64> = BTreeMap::new();
    for rollup in updates.values() {
        for (region, row) in rollup.rows() {
            *update_totals.entry(region.as_str()).or_insert(0.0) += row.total;
        }
    }

    let mut records = Vec::new();
    for (region, row) in enrolment.rows() {
        let Some(&total_updates) = update_totals.get(region.as_str()) else {
            continue;
        };
        let total_volume = row.total + total_updates;
        if total_volume <= 0.0 {
            debug!(region = %region, "zero volume, OMI undefined");
            continue;
        }
        let omi = total_updates / total_volume;
        records.push(MaturityRecord {
            region: region.clone(),
            total_enrolment: row.total,
            total_updates,
            total_volume,
            omi,
            phase: thresholds.phase(omi),
        });
    }

    records.sort_by(|a, b| cmp_f64(b.omi, a.omi));
    Ok(records)
}

/// Regions worth annotating: the top `n` by OMI, the bottom `n` by OMI and
/// the top `n` by total volume.
///
/// Ties are broken by position in `records`; the result keeps that order.
pub fn notable_regions(records: &[MaturityRecord], n: usize) -> Vec<&MaturityRecord> {
    let mut picked: BTreeSet<usize> = BTreeSet::new();
    picked.extend(ranked(records, n, |a, b| cmp_f64(b.omi, a.omi)));
    picked.extend(ranked(records, n, |a, b| cmp_f64(a.omi, b.omi)));
    picked.extend(ranked(records, n, |a, b| {
        cmp_f64(b.total_volume, a.total_volume)
    }));

    picked.into_iter().map(|i| &records[i]).collect()
}

/// Indices of the first `n` records under a stable sort by `cmp`.
fn ranked<F>(records: &[MaturityRecord], n: usize, cmp: F) -> Vec<usize>
where
    F: Fn(&MaturityRecord, &MaturityRecord) -> Ordering,
{
    let mut idx: Vec<usize> = (0..records.len()).collect();
    idx.sort_by(|&a, &b| cmp(&records[a], &records[b]));
    idx.truncate(n);
    idx
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
