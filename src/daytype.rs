//! Weekday / weekend / holiday classification.
//!
//! Classification is per (date, region): a state holiday makes the date a
//! holiday for that state only. Precedence is Holiday > Weekend > Weekday.

use crate::calendar::HolidayIndex;
use crate::core::Frame;
use crate::error::MetricOutcome;
use crate::utils::mean;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Kind of day for a (date, region) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayType {
    Weekday,
    Weekend,
    Holiday,
}

/// Classification of one (date, region) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTypeRecord {
    pub date: NaiveDate,
    pub region: String,
    pub day_type: DayType,
    /// Holiday name when `day_type` is `Holiday`.
    pub holiday: Option<String>,
}

/// Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Holiday over Weekend over Weekday.
fn day_type_of(date: NaiveDate, holiday: bool) -> DayType {
    if holiday {
        DayType::Holiday
    } else if is_weekend(date) {
        DayType::Weekend
    } else {
        DayType::Weekday
    }
}

/// Classify a single (date, region).
pub fn classify_day(date: NaiveDate, region: &str, index: &HolidayIndex) -> DayType {
    day_type_of(date, index.is_holiday(date, region))
}

/// Classify each distinct (date, region) pair, ordered by date then region.
pub fn classify<'a, I>(pairs: I, index: &HolidayIndex) -> Vec<DayTypeRecord>
where
    I: IntoIterator<Item = (NaiveDate, &'a str)>,
{
    let distinct: BTreeSet<(NaiveDate, &str)> = pairs.into_iter().collect();
    distinct
        .into_iter()
        .map(|(date, region)| {
            let holiday = index.lookup(date, region).map(str::to_string);
            let day_type = day_type_of(date, holiday.is_some());
            DayTypeRecord {
                date,
                region: region.to_string(),
                day_type,
                holiday,
            }
        })
        .collect()
}

/// Summed volume of all regions sharing a day type on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTypeVolume {
    pub date: NaiveDate,
    pub day_type: DayType,
    pub total: f64,
}

/// Daily volumes bucketed by day type, with per-bucket averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTypeSummary {
    pub rows: Vec<DayTypeVolume>,
    pub avg_weekday: Option<f64>,
    pub avg_weekend: Option<f64>,
    pub avg_holiday: Option<f64>,
}

impl DayTypeSummary {
    pub fn average(&self, day_type: DayType) -> Option<f64> {
        match day_type {
            DayType::Weekday => self.avg_weekday,
            DayType::Weekend => self.avg_weekend,
            DayType::Holiday => self.avg_holiday,
        }
    }
}

/// Sum record volume per (date, day type) and average each bucket.
///
/// A date on which some regions observe a state holiday and others do not
/// contributes one Holiday row and one non-holiday row.
pub fn daily_volume_by_day_type(
    frame: &Frame,
    measures: &[String],
    index: &HolidayIndex,
) -> MetricOutcome<DayTypeSummary> {
    let indices = frame.measure_indices(measures)?;

    let labels: HashMap<(NaiveDate, &str), DayType> = frame
        .date_regions()
        .into_iter()
        .map(|(date, region)| ((date, region), classify_day(date, region, index)))
        .collect();

    let mut buckets: BTreeMap<(NaiveDate, DayType), f64> = BTreeMap::new();
    for record in frame.records() {
        let day_type = labels[&(record.date, record.region.as_str())];
        let volume: f64 = indices.iter().map(|&i| record.values[i]).sum();
        *buckets.entry((record.date, day_type)).or_insert(0.0) += volume;
    }

    let rows: Vec<DayTypeVolume> = buckets
        .into_iter()
        .map(|((date, day_type), total)| DayTypeVolume {
            date,
            day_type,
            total,
        })
        .collect();

    let average = |kind: DayType| {
        let totals: Vec<f64> = rows
            .iter()
            .filter(|r| r.day_type == kind)
            .map(|r| r.total)
            .collect();
        (!totals.is_empty()).then(|| mean(&totals))
    };

    Ok(DayTypeSummary {
        avg_weekday: average(DayType::Weekday),
        avg_weekend: average(DayType::Weekend),
        avg_holiday: average(DayType::Holiday),
        rows,
    })
}
