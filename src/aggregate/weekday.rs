//! Region x day-of-week load matrix.

use crate::core::{Frame, RegionTable};
use crate::error::MetricOutcome;
use chrono::{Datelike, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// Days of the week, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English day name.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Total volume per region for each day of the week, Monday first.
///
/// Days with no activity hold zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionWeekdayMatrix {
    rows: BTreeMap<String, [f64; 7]>,
    dropped_rows: usize,
}

impl RegionWeekdayMatrix {
    /// Build a matrix from explicit rows.
    pub fn from_rows<S: Into<String>>(rows: impl IntoIterator<Item = (S, [f64; 7])>) -> Self {
        Self {
            rows: rows.into_iter().map(|(r, v)| (r.into(), v)).collect(),
            dropped_rows: 0,
        }
    }

    pub fn rows(&self) -> &BTreeMap<String, [f64; 7]> {
        &self.rows
    }

    pub fn row(&self, region: &str) -> Option<&[f64; 7]> {
        self.rows.get(region)
    }

    /// Sum across all regions for each weekday.
    pub fn column_totals(&self) -> [f64; 7] {
        let mut totals = [0.0; 7];
        for row in self.rows.values() {
            for (t, v) in totals.iter_mut().zip(row) {
                *t += v;
            }
        }
        totals
    }

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

/// Sum `measures` per (region, day of week) across all dates.
///
/// Records whose region is not in `regions` are dropped and counted.
pub fn aggregate_by_region_weekday(
    frame: &Frame,
    measures: &[String],
    regions: &RegionTable,
) -> MetricOutcome<RegionWeekdayMatrix> {
    let indices = frame.measure_indices(measures)?;
    let mut matrix = RegionWeekdayMatrix::default();

    for record in frame.records() {
        if !regions.contains(&record.region) {
            matrix.dropped_rows += 1;
            continue;
        }
        let day = record.date.weekday().num_days_from_monday() as usize;
        let volume: f64 = indices.iter().map(|&i| record.values[i]).sum();
        match matrix.rows.get_mut(record.region.as_str()) {
            Some(row) => row[day] += volume,
            None => {
                let mut row = [0.0; 7];
                row[day] = volume;
                matrix.rows.insert(record.region.clone(), row);
            }
        }
    }

    if matrix.dropped_rows > 0 {
        warn!(
            frame = frame.name(),
            dropped = matrix.dropped_rows,
            "dropped rows with invalid region names"
        );
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Record;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sums_by_weekday_across_weeks() {
        // 2025-01-06 and 2025-01-13 are Mondays; 2025-01-11 is a Saturday.
        let frame = Frame::from_records(
            ["a", "b"],
            vec![
                Record::new("X", date(2025, 1, 6), vec![1.0, 2.0]),
                Record::new("X", date(2025, 1, 13), vec![3.0, 4.0]),
                Record::new("X", date(2025, 1, 11), vec![5.0, 0.0]),
                Record::new("Y", date(2025, 1, 7), vec![1.0, 1.0]),
                Record::new("Nowhere", date(2025, 1, 7), vec![9.0, 9.0]),
            ],
        )
        .unwrap();
        let table = RegionTable::from_names(["X", "Y"]);
        let matrix = aggregate_by_region_weekday(&frame, &frame.measures(), &table).unwrap();

        assert_eq!(matrix.row("X"), Some(&[10.0, 0.0, 0.0, 0.0, 0.0, 5.0, 0.0]));
        assert_eq!(matrix.row("Y"), Some(&[0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0]));
        assert_eq!(matrix.dropped_rows(), 1);
        assert_eq!(matrix.column_totals(), [10.0, 2.0, 0.0, 0.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn weekday_names_start_monday() {
        let names: Vec<_> = WEEKDAYS.iter().map(|d| weekday_name(*d)).collect();
        assert_eq!(names[0], "Monday");
        assert_eq!(names[6], "Sunday");
    }
}
