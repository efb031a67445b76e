//! The closed table of administrative regions.
//!
//! Region-keyed aggregation only admits names found in a [`RegionTable`].
//! Rows naming anything else (cities and districts leak into the state
//! column in practice) are dropped and counted.

use std::collections::BTreeMap;

/// State and union territory names with their two-letter subdivision codes.
pub const INDIA_REGIONS: [(&str, &str); 37] = [
    ("Andaman and Nicobar Islands", "AN"),
    ("Andhra Pradesh", "AP"),
    ("Arunachal Pradesh", "AR"),
    ("Assam", "AS"),
    ("Bihar", "BR"),
    ("Chandigarh", "CH"),
    ("Chhattisgarh", "CG"),
    ("Dadra and Nagar Haveli", "DN"),
    ("Daman and Diu", "DD"),
    ("Delhi", "DL"),
    ("Goa", "GA"),
    ("Gujarat", "GJ"),
    ("Haryana", "HR"),
    ("Himachal Pradesh", "HP"),
    ("Jammu and Kashmir", "JK"),
    ("Jharkhand", "JH"),
    ("Karnataka", "KA"),
    ("Kerala", "KL"),
    ("Ladakh", "LA"),
    ("Lakshadweep", "LD"),
    ("Madhya Pradesh", "MP"),
    ("Maharashtra", "MH"),
    ("Manipur", "MN"),
    ("Meghalaya", "ML"),
    ("Mizoram", "MZ"),
    ("Nagaland", "NL"),
    ("Odisha", "OR"),
    ("Puducherry", "PY"),
    ("Punjab", "PB"),
    ("Rajasthan", "RJ"),
    ("Sikkim", "SK"),
    ("Tamil Nadu", "TN"),
    ("Telangana", "TS"),
    ("Tripura", "TR"),
    ("Uttar Pradesh", "UP"),
    ("Uttarakhand", "UK"),
    ("West Bengal", "WB"),
];

/// A closed set of valid region names, each with an optional code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable {
    regions: BTreeMap<String, Option<String>>,
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::india()
    }
}

impl RegionTable {
    /// The 37 Indian states and union territories.
    pub fn india() -> Self {
        Self {
            regions: INDIA_REGIONS
                .iter()
                .map(|(name, code)| (name.to_string(), Some(code.to_string())))
                .collect(),
        }
    }

    /// A table of names without subdivision codes.
    ///
    /// Every region resolves to the national calendar only.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            regions: names.into_iter().map(|n| (n.into(), None)).collect(),
        }
    }

    /// Add or replace a region with an explicit code.
    pub fn with_region(mut self, name: impl Into<String>, code: Option<&str>) -> Self {
        self.regions.insert(name.into(), code.map(str::to_string));
        self
    }

    /// Whether `name` belongs to the table.
    pub fn contains(&self, name: &str) -> bool {
        self.regions.contains_key(name)
    }

    /// Subdivision code for `name`, if the region is known and has one.
    pub fn code(&self, name: &str) -> Option<&str> {
        self.regions.get(name).and_then(|c| c.as_deref())
    }

    /// Region names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
