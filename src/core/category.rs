//! Transaction categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of an administrative transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// New enrolments.
    Enrolment,
    /// Biometric updates.
    Biometric,
    /// Demographic updates.
    Demographic,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 3] = [
        Category::Enrolment,
        Category::Biometric,
        Category::Demographic,
    ];

    /// Categories counted as updates by the maturity index.
    pub const UPDATES: [Category; 2] = [Category::Biometric, Category::Demographic];

    /// Lowercase name used in file names and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Enrolment => "enrolment",
            Category::Biometric => "biometric",
            Category::Demographic => "demographic",
        }
    }

    /// Whether this category is an update (not a new enrolment).
    pub fn is_update(&self) -> bool {
        !matches!(self, Category::Enrolment)
    }

    /// Capitalized name for report headings.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Enrolment => "Enrolment",
            Category::Biometric => "Biometric",
            Category::Demographic => "Demographic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enrolment" | "enrollment" => Ok(Category::Enrolment),
            "biometric" => Ok(Category::Biometric),
            "demographic" => Ok(Category::Demographic),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_display() {
        for cat in Category::ALL {
            assert_eq!(cat.to_string().parse::<Category>().unwrap(), cat);
        }
        assert_eq!("Enrollment".parse::<Category>().unwrap(), Category::Enrolment);
        assert!("payments".parse::<Category>().is_err());
    }

    #[test]
    fn only_enrolment_is_not_an_update() {
        assert!(!Category::Enrolment.is_update());
        assert!(Category::Biometric.is_update());
        assert!(Category::Demographic.is_update());
    }
}
