//! Precomputed (date, region) holiday lookup.

use super::holidays::{national_holidays, regional_holidays};
use crate::core::RegionTable;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Where a holiday applies.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayScope {
    National,
    Regional(String),
}

/// One resolved holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub scope: HolidayScope,
    pub name: String,
}

/// Holiday lookup built once per run for a set of regions and years.
///
/// A date is a holiday for a region when it is in the national set or in
/// that region's own set. When both apply the regional name is reported.
#[derive(Debug, Clone, Default)]
pub struct HolidayIndex {
    years: BTreeSet<i32>,
    national: HashMap<NaiveDate, String>,
    /// region name -> date -> holiday name
    regional: HashMap<String, HashMap<NaiveDate, String>>,
    codes: HashMap<String, String>,
    unsupported: BTreeSet<String>,
}

/// Build the holiday index for `regions` over `years`.
///
/// Regions without a code in `table` use the national set only. Regions
/// whose code has no regional calendar are recorded as unsupported and
/// also fall back to the national set.
pub fn holidays_for<'a, R, Y>(regions: R, years: Y, table: &RegionTable) -> HolidayIndex
where
    R: IntoIterator<Item = &'a str>,
    Y: IntoIterator<Item = i32>,
{
    let years: BTreeSet<i32> = years.into_iter().collect();
    let mut index = HolidayIndex {
        years: years.clone(),
        ..Default::default()
    };

    for &year in &years {
        for (date, name) in national_holidays(year) {
            insert_name(&mut index.national, date, name);
        }
    }

    let regions: BTreeSet<&str> = regions.into_iter().collect();
    for region in regions {
        let Some(code) = table.code(region) else {
            debug!(region, "no subdivision code, using national holidays only");
            continue;
        };
        index.codes.insert(region.to_string(), code.to_string());

        let mut dates = HashMap::new();
        for &year in &years {
            match regional_holidays(code, year) {
                Some(hols) => {
                    for (date, name) in hols {
                        insert_name(&mut dates, date, name);
                    }
                }
                None => {
                    index.unsupported.insert(region.to_string());
                    break;
                }
            }
        }

        if index.unsupported.contains(region) {
            warn!(region, code, "regional holiday calendar unavailable, using national holidays only");
        } else {
            index.regional.insert(region.to_string(), dates);
        }
    }

    index
}

fn insert_name(map: &mut HashMap<NaiveDate, String>, date: NaiveDate, name: &str) {
    map.entry(date)
        .and_modify(|existing| {
            existing.push_str("; ");
            existing.push_str(name);
        })
        .or_insert_with(|| name.to_string());
}

impl HolidayIndex {
    /// Holiday name for `region` on `date`, if any.
    pub fn lookup(&self, date: NaiveDate, region: &str) -> Option<&str> {
        self.regional
            .get(region)
            .and_then(|dates| dates.get(&date))
            .or_else(|| self.national.get(&date))
            .map(String::as_str)
    }

    /// Whether `date` is a holiday for `region`.
    pub fn is_holiday(&self, date: NaiveDate, region: &str) -> bool {
        self.lookup(date, region).is_some()
    }

    /// Whether `date` is a national holiday.
    pub fn is_national_holiday(&self, date: NaiveDate) -> bool {
        self.national.contains_key(&date)
    }

    /// Years covered by the index.
    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    /// Regions whose code had no regional calendar.
    pub fn unsupported_regions(&self) -> &BTreeSet<String> {
        &self.unsupported
    }

    /// All resolved holidays, national first, then by date and region.
    pub fn entries(&self) -> Vec<HolidayEntry> {
        let mut out: Vec<HolidayEntry> = self
            .national
            .iter()
            .map(|(date, name)| HolidayEntry {
                date: *date,
                scope: HolidayScope::National,
                name: name.clone(),
            })
            .collect();

        for (region, dates) in &self.regional {
            let code = self.codes.get(region).cloned().unwrap_or_default();
            out.extend(dates.iter().map(|(date, name)| HolidayEntry {
                date: *date,
                scope: HolidayScope::Regional(code.clone()),
                name: name.clone(),
            }));
        }

        out.sort_by(|a, b| a.scope.cmp(&b.scope).then(a.date.cmp(&b.date)));
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn national_holidays_apply_everywhere() {
        let table = RegionTable::india();
        let index = holidays_for(["Maharashtra", "Bengaluru"], [2025], &table);
        assert_eq!(index.lookup(date(2025, 1, 26), "Maharashtra"), Some("Republic Day"));
        assert_eq!(index.lookup(date(2025, 1, 26), "Bengaluru"), Some("Republic Day"));
        assert!(index.is_national_holiday(date(2025, 8, 15)));
    }

    #[test]
    fn regional_holidays_apply_only_to_their_region() {
        let table = RegionTable::india();
        let index = holidays_for(["Maharashtra", "Kerala"], [2025], &table);
        assert!(index.is_holiday(date(2025, 5, 1), "Maharashtra"));
        assert!(!index.is_holiday(date(2025, 5, 1), "Kerala"));
        assert!(index.is_holiday(date(2025, 11, 1), "Kerala"));
    }

    #[test]
    fn unsupported_region_degrades_to_national() {
        let table = RegionTable::india();
        let index = holidays_for(["Dadra and Nagar Haveli"], [2025], &table);
        assert!(index.unsupported_regions().contains("Dadra and Nagar Haveli"));
        assert!(index.is_holiday(date(2025, 10, 2), "Dadra and Nagar Haveli"));
        assert!(!index.is_holiday(date(2025, 5, 1), "Dadra and Nagar Haveli"));
    }

    #[test]
    fn regional_name_wins_on_shared_date() {
        let table = RegionTable::from_names(["X"]).with_region("X", Some("GA"));
        let index = holidays_for(["X"], [2025], &table);
        assert_eq!(index.lookup(date(2025, 12, 19), "X"), Some("Goa Liberation Day"));
    }

    #[test]
    fn colliding_national_names_are_joined() {
        let index = holidays_for(std::iter::empty(), [2025], &RegionTable::india());
        assert_eq!(
            index.lookup(date(2025, 10, 2), "anywhere"),
            Some("Gandhi Jayanti; Dussehra")
        );
    }

    #[test]
    fn entries_cover_regions_and_nation() {
        let table = RegionTable::india();
        let index = holidays_for(["Tamil Nadu"], [2025], &table);
        let entries = index.entries();
        assert!(entries
            .iter()
            .any(|e| e.scope == HolidayScope::Regional("TN".into()) && e.name == "Pongal"));
        assert!(entries
            .iter()
            .any(|e| e.scope == HolidayScope::National && e.name == "Christmas"));
    }
}
