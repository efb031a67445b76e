//! Mean per-record volume by day of week and month.

use crate::core::Frame;
use crate::error::MetricOutcome;
use chrono::Datelike;
use serde::Serialize;

/// Mean record volume for each (weekday, month) cell.
///
/// `cells[d][m]` is Monday-first weekday `d` and zero-based month `m`;
/// `None` marks cells with no records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityMatrix {
    pub cells: [[Option<f64>; 12]; 7],
}

impl IntensityMatrix {
    /// Zero-based months with at least one populated cell.
    pub fn months_present(&self) -> Vec<usize> {
        (0..12)
            .filter(|&m| self.cells.iter().any(|row| row[m].is_some()))
            .collect()
    }
}

/// Mean per-record volume for each (weekday, month) present in the frame.
pub fn weekday_month_intensity(frame: &Frame, measures: &[String]) -> MetricOutcome<IntensityMatrix> {
    let indices = frame.measure_indices(measures)?;
    let mut sums = [[0.0_f64; 12]; 7];
    let mut counts = [[0_usize; 12]; 7];

    for record in frame.records() {
        let d = record.date.weekday().num_days_from_monday() as usize;
        let m = record.date.month0() as usize;
        sums[d][m] += indices.iter().map(|&i| record.values[i]).sum::<f64>();
        counts[d][m] += 1;
    }

    let mut cells = [[None; 12]; 7];
    for d in 0..7 {
        for m in 0..12 {
            if counts[d][m] > 0 {
                cells[d][m] = Some(sums[d][m] / counts[d][m] as f64);
            }
        }
    }

    Ok(IntensityMatrix { cells })
}

/// Mean per-record volume for each weekday, Monday first.
pub fn weekday_profile(frame: &Frame, measures: &[String]) -> MetricOutcome<[Option<f64>; 7]> {
    let indices = frame.measure_indices(measures)?;
    let mut sums = [0.0_f64; 7];
    let mut counts = [0_usize; 7];

    for record in frame.records() {
        let d = record.date.weekday().num_days_from_monday() as usize;
        sums[d] += indices.iter().map(|&i| record.values[i]).sum::<f64>();
        counts[d] += 1;
    }

    let mut profile = [None; 7];
    for d in 0..7 {
        if counts[d] > 0 {
            profile[d] = Some(sums[d] / counts[d] as f64);
        }
    }
    Ok(profile)
}
