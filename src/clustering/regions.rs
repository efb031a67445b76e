//! Behavioural clustering of regions.
//!
//! Each region is described by the Totals of two or more region rollups
//! (for example enrolment and biometric volume). Features are standardized
//! before k-means so that no single magnitude dominates.

use super::kmeans::{kmeans, KMeansConfig};
use crate::aggregate::RegionRollup;
use crate::error::{AnalyticsError, MetricOutcome, Result, SkipReason};
use crate::transform::standardize_columns;
use crate::utils::quantile;
use serde::Serialize;

/// Region x feature table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionFeatures {
    features: Vec<String>,
    regions: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl RegionFeatures {
    /// Build from explicit rows; each row must have one value per feature.
    pub fn new(
        features: Vec<String>,
        rows: impl IntoIterator<Item = (String, Vec<f64>)>,
    ) -> Result<Self> {
        let mut regions = Vec::new();
        let mut values = Vec::new();
        for (region, row) in rows {
            if row.len() != features.len() {
                return Err(AnalyticsError::DimensionMismatch {
                    expected: features.len(),
                    got: row.len(),
                });
            }
            regions.push(region);
            values.push(row);
        }
        Ok(Self {
            features,
            regions,
            values,
        })
    }

    /// Inner-join region Totals: only regions present in every rollup are
    /// kept, in name order.
    pub fn from_rollups(rollups: &[(&str, &RegionRollup)]) -> Self {
        let features = rollups.iter().map(|(name, _)| name.to_string()).collect();
        let mut regions = Vec::new();
        let mut values = Vec::new();

        if let Some((_, first)) = rollups.first() {
            for region in first.rows().keys() {
                let row: Option<Vec<f64>> = rollups
                    .iter()
                    .map(|(_, r)| r.total_of(region.as_str()))
                    .collect();
                if let Some(row) = row {
                    regions.push(region.clone());
                    values.push(row);
                }
            }
        }

        Self {
            features,
            regions,
            values,
        }
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Cluster label of one region, with its raw feature values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCluster {
    pub region: String,
    pub label: usize,
    pub features: Vec<f64>,
}

/// Partition of regions into clusters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    pub k: usize,
    pub features: Vec<String>,
    pub assignments: Vec<RegionCluster>,
    /// Centroids in standardized feature space.
    pub centroids: Vec<Vec<f64>>,
    pub inertia: f64,
}

impl ClusterAssignment {
    pub fn label_of(&self, region: &str) -> Option<usize> {
        self.assignments
            .iter()
            .find(|a| a.region == region)
            .map(|a| a.label)
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.k];
        for a in &self.assignments {
            sizes[a.label] += 1;
        }
        sizes
    }
}

/// Standardize the features and run seeded k-means.
///
/// Skips with `InsufficientData` when there are fewer regions than `k`,
/// and with `InvalidParameter` when there are fewer than two features.
pub fn cluster_regions(
    features: &RegionFeatures,
    config: &KMeansConfig,
) -> MetricOutcome<ClusterAssignment> {
    if config.k == 0 {
        return Err(SkipReason::InvalidParameter("k must be at least 1".into()));
    }
    if features.features.len() < 2 {
        return Err(SkipReason::InvalidParameter(format!(
            "clustering needs at least 2 features, got {}",
            features.features.len()
        )));
    }
    if features.len() < config.k {
        return Err(SkipReason::InsufficientData {
            needed: config.k,
            got: features.len(),
        });
    }

    let (scaled, _) = standardize_columns(&features.values);
    let result = kmeans(&scaled, config);

    let assignments = features
        .regions
        .iter()
        .zip(&features.values)
        .zip(&result.labels)
        .map(|((region, row), &label)| RegionCluster {
            region: region.clone(),
            label,
            features: row.clone(),
        })
        .collect();

    Ok(ClusterAssignment {
        k: result.centroids.len(),
        features: features.features.clone(),
        assignments,
        centroids: result.centroids,
        inertia: result.inertia,
    })
}

/// Regions whose value on any feature exceeds that feature's `q` quantile.
pub fn prominent_regions(features: &RegionFeatures, q: f64) -> Vec<&str> {
    let cutoffs: Vec<f64> = (0..features.features.len())
        .map(|j| {
            let column: Vec<f64> = features.values.iter().map(|r| r[j]).collect();
            quantile(&column, q)
        })
        .collect();

    features
        .regions
        .iter()
        .zip(&features.values)
        .filter(|(_, row)| row.iter().zip(&cutoffs).any(|(v, c)| v > c))
        .map(|(region, _)| region.as_str())
        .collect()
}
