//! Measure discovery.
//!
//! Numeric columns are additive measures unless their name marks them as
//! an identifier or a derived period. The exclusion is a case-sensitive
//! substring match on `pincode` and `Year`.

/// Substrings that disqualify a numeric column from aggregation.
pub const EXCLUDED_MEASURE_MARKERS: [&str; 2] = ["pincode", "Year"];

/// Whether a numeric column is an additive measure.
pub fn is_measure_column(name: &str) -> bool {
    !EXCLUDED_MEASURE_MARKERS
        .iter()
        .any(|marker| name.contains(marker))
}

/// Select the additive measures from a list of numeric column names.
///
/// Input order is preserved.
pub fn discover_measures<S: AsRef<str>>(numeric_columns: &[S]) -> Vec<String> {
    numeric_columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| is_measure_column(c))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_identifiers_and_periods() {
        let cols = ["age_0_5", "pincode", "age_5_17", "YearMonth", "age_18_greater"];
        assert_eq!(
            discover_measures(&cols),
            vec!["age_0_5", "age_5_17", "age_18_greater"]
        );
    }

    #[test]
    fn match_is_substring_and_case_sensitive() {
        assert!(!is_measure_column("office_pincode"));
        assert!(!is_measure_column("FiscalYear"));
        assert!(is_measure_column("PINCODE"));
        assert!(is_measure_column("year_total"));
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let cols: [&str; 0] = [];
        assert!(discover_measures(&cols).is_empty());
        assert!(discover_measures(&["pincode"]).is_empty());
    }
}
