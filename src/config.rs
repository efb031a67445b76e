//! Run configuration.
//!
//! Every section has defaults, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! [clustering]
//! k = 4
//!
//! [anomaly]
//! contamination = 0.02
//!
//! [input.category_dirs]
//! enrolment = "api_data_aadhar_enrolment"
//! ```

use crate::burstiness::BurstinessConfig;
use crate::clustering::KMeansConfig;
use crate::core::Category;
use crate::detection::IsolationForestConfig;
use crate::error::{AnalyticsError, Result};
use crate::forecast::ForecastConfig;
use crate::maturity::MaturityThresholds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Maturity index settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaturityConfig {
    /// Regions kept from each extreme for annotation
    pub notable_n: usize,
    pub mature_above: f64,
    pub growth_below: f64,
}

impl Default for MaturityConfig {
    fn default() -> Self {
        let thresholds = MaturityThresholds::default();
        Self {
            notable_n: 5,
            mature_above: thresholds.mature_above,
            growth_below: thresholds.growth_below,
        }
    }
}

impl MaturityConfig {
    pub fn thresholds(&self) -> MaturityThresholds {
        MaturityThresholds {
            growth_below: self.growth_below,
            mature_above: self.mature_above,
        }
    }
}

/// Trend outputs attached to each time rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Trailing moving-average windows, in days
    pub moving_average_windows: Vec<usize>,
    /// Regions listed in the top-N ranking
    pub top_regions: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            moving_average_windows: vec![7, 30],
            top_regions: 10,
        }
    }
}

/// Day-type analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Category whose records are bucketed by day type
    pub day_type_category: Category,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            day_type_category: Category::Enrolment,
        }
    }
}

/// Sub-directory of the data root holding each category's CSV files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryDirs {
    pub enrolment: String,
    pub biometric: String,
    pub demographic: String,
}

impl Default for CategoryDirs {
    fn default() -> Self {
        Self {
            enrolment: "api_data_aadhar_enrolment".to_string(),
            biometric: "api_data_aadhar_biometric".to_string(),
            demographic: "api_data_aadhar_demographic".to_string(),
        }
    }
}

impl CategoryDirs {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Enrolment => &self.enrolment,
            Category::Biometric => &self.biometric,
            Category::Demographic => &self.demographic,
        }
    }
}

/// Where and how raw CSV files are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// chrono format string of the `date` column
    pub date_format: String,
    pub category_dirs: CategoryDirs,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            date_format: "%d-%m-%Y".to_string(),
            category_dirs: CategoryDirs::default(),
        }
    }
}

/// Configuration for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub clustering: KMeansConfig,
    pub anomaly: IsolationForestConfig,
    pub forecast: ForecastConfig,
    pub burstiness: BurstinessConfig,
    pub maturity: MaturityConfig,
    pub trend: TrendConfig,
    pub calendar: CalendarConfig,
    pub input: InputConfig,
}

impl AnalyticsConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AnalyticsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.clustering.k == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "clustering.k must be at least 1".into(),
            ));
        }
        if self.clustering.n_init == 0 || self.clustering.max_iter == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "clustering.n_init and clustering.max_iter must be at least 1".into(),
            ));
        }
        self.anomaly.validate()?;
        if self.trend.moving_average_windows.contains(&0) {
            return Err(AnalyticsError::InvalidParameter(
                "trend.moving_average_windows must be positive".into(),
            ));
        }
        if self.maturity.growth_below > self.maturity.mature_above {
            return Err(AnalyticsError::InvalidParameter(format!(
                "maturity.growth_below ({}) exceeds maturity.mature_above ({})",
                self.maturity.growth_below, self.maturity.mature_above
            )));
        }
        if !self.burstiness.high_risk_pmr.is_finite() {
            return Err(AnalyticsError::InvalidParameter(
                "burstiness.high_risk_pmr must be finite".into(),
            ));
        }
        Ok(())
    }
}
