//! Holiday reference data.
//!
//! National holidays are the fixed gazetted dates, Good Friday derived from
//! the Gregorian Easter date, and a table of lunar-calendar festivals.
//! Regional holidays are fixed-date foundation days and festivals keyed by
//! subdivision code.

use chrono::{Duration, NaiveDate};

/// Fixed-date national holidays as (month, day, name).
const NATIONAL_FIXED: [(u32, u32, &str); 4] = [
    (1, 26, "Republic Day"),
    (8, 15, "Independence Day"),
    (10, 2, "Gandhi Jayanti"),
    (12, 25, "Christmas"),
];

/// Lunar-calendar national festivals as (year, month, day, name).
///
/// Years outside this table carry only the fixed and Easter-derived holidays.
const LUNAR_FESTIVALS: [(i32, u32, u32, &str); 16] = [
    (2023, 3, 8, "Holi"),
    (2023, 4, 22, "Eid ul-Fitr"),
    (2023, 10, 24, "Dussehra"),
    (2023, 11, 12, "Diwali"),
    (2024, 3, 25, "Holi"),
    (2024, 4, 11, "Eid ul-Fitr"),
    (2024, 10, 12, "Dussehra"),
    (2024, 10, 31, "Diwali"),
    (2025, 3, 14, "Holi"),
    (2025, 3, 31, "Eid ul-Fitr"),
    (2025, 10, 2, "Dussehra"),
    (2025, 10, 20, "Diwali"),
    (2026, 3, 4, "Holi"),
    (2026, 3, 21, "Eid ul-Fitr"),
    (2026, 10, 20, "Dussehra"),
    (2026, 11, 8, "Diwali"),
];

/// Regional fixed-date holidays as (code, month, day, name).
const REGIONAL_FIXED: [(&str, u32, u32, &str); 30] = [
    ("AP", 11, 1, "Andhra Pradesh Foundation Day"),
    ("AR", 2, 20, "Arunachal Pradesh Statehood Day"),
    ("AS", 4, 14, "Bohag Bihu"),
    ("BR", 3, 22, "Bihar Day"),
    ("CG", 11, 1, "Chhattisgarh Foundation Day"),
    ("GA", 12, 19, "Goa Liberation Day"),
    ("GJ", 5, 1, "Gujarat Day"),
    ("HP", 4, 15, "Himachal Day"),
    ("HR", 11, 1, "Haryana Foundation Day"),
    ("JH", 11, 15, "Jharkhand Formation Day"),
    ("KA", 11, 1, "Karnataka Rajyotsava"),
    ("KL", 11, 1, "Kerala Piravi"),
    ("MH", 5, 1, "Maharashtra Day"),
    ("ML", 1, 21, "Meghalaya Statehood Day"),
    ("MN", 1, 21, "Manipur Statehood Day"),
    ("MP", 11, 1, "Madhya Pradesh Foundation Day"),
    ("MZ", 2, 20, "Mizoram Statehood Day"),
    ("NL", 12, 1, "Nagaland Statehood Day"),
    ("OR", 4, 1, "Odisha Day"),
    ("PB", 4, 13, "Vaisakhi"),
    ("PY", 11, 1, "Puducherry Liberation Day"),
    ("RJ", 3, 30, "Rajasthan Day"),
    ("SK", 5, 16, "Sikkim State Day"),
    ("TN", 1, 14, "Pongal"),
    ("TN", 4, 14, "Tamil New Year"),
    ("TR", 1, 21, "Tripura Statehood Day"),
    ("TS", 6, 2, "Telangana Formation Day"),
    ("UK", 11, 9, "Uttarakhand Foundation Day"),
    ("UP", 1, 24, "Uttar Pradesh Foundation Day"),
    ("WB", 4, 15, "Pohela Boishakh"),
];

/// Gregorian Easter Sunday (anonymous Gregorian algorithm).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// National holidays for `year`, sorted by date.
pub fn national_holidays(year: i32) -> Vec<(NaiveDate, &'static str)> {
    let mut out: Vec<(NaiveDate, &'static str)> = NATIONAL_FIXED
        .iter()
        .filter_map(|&(m, d, name)| NaiveDate::from_ymd_opt(year, m, d).map(|dt| (dt, name)))
        .collect();

    if let Some(easter) = easter_sunday(year) {
        out.push((easter - Duration::days(2), "Good Friday"));
    }

    out.extend(
        LUNAR_FESTIVALS
            .iter()
            .filter(|(y, ..)| *y == year)
            .filter_map(|&(y, m, d, name)| NaiveDate::from_ymd_opt(y, m, d).map(|dt| (dt, name))),
    );

    out.sort_by_key(|(d, _)| *d);
    out
}

/// Whether a regional calendar exists for `code`.
pub fn supports_region(code: &str) -> bool {
    REGIONAL_FIXED.iter().any(|(c, ..)| *c == code)
}

/// Regional holidays for `code` in `year`.
///
/// Returns `None` when no regional calendar exists for the code.
pub fn regional_holidays(code: &str, year: i32) -> Option<Vec<(NaiveDate, &'static str)>> {
    if !supports_region(code) {
        return None;
    }
    let mut out: Vec<(NaiveDate, &'static str)> = REGIONAL_FIXED
        .iter()
        .filter(|(c, ..)| *c == code)
        .filter_map(|&(_, m, d, name)| NaiveDate::from_ymd_opt(year, m, d).map(|dt| (dt, name)))
        .collect();
    out.sort_by_key(|(d, _)| *d);
    Some(out)
}
