//! Isolation forest anomaly scoring for univariate series.
//!
//! Random partitioning trees isolate each point; points isolated in fewer
//! splits get higher scores. Scores follow Liu et al. (2008):
//! `s(x) = 2^(-E[h(x)] / c(psi))` with `psi` the subsample size.

use crate::error::{AnalyticsError, MetricOutcome, Result, SkipReason};
use crate::utils::quantile;
use chrono::NaiveDate;
use rand::prelude::*;
use rand::seq::index;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

const EULER_GAMMA: f64 = 0.577_215_664_9;

/// Isolation forest configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationForestConfig {
    /// Number of trees
    pub n_trees: usize,
    /// Subsample size per tree (capped at the series length)
    pub max_samples: usize,
    /// Expected fraction of anomalies, in (0, 0.5]
    pub contamination: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for IsolationForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_samples: 256,
            contamination: 0.05,
            seed: 42,
        }
    }
}

impl IsolationForestConfig {
    /// Set number of trees.
    pub fn n_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    /// Set subsample size.
    pub fn max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Set contamination rate.
    pub fn contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination;
        self
    }

    /// Set random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "contamination must lie in (0, 0.5], got {}",
                self.contamination
            )));
        }
        if self.n_trees == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "n_trees must be at least 1".into(),
            ));
        }
        if self.max_samples < 2 {
            return Err(AnalyticsError::InvalidParameter(
                "max_samples must be at least 2".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        size: usize,
    },
    Split {
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn build(sample: &mut [f64], depth: usize, max_depth: usize, rng: &mut impl Rng) -> Node {
        let size = sample.len();
        if depth >= max_depth || size <= 1 {
            return Node::Leaf { size };
        }

        let (min, max) = sample
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if max <= min {
            return Node::Leaf { size };
        }

        let value = rng.gen_range(min..max);
        let mut pivot = 0;
        for i in 0..size {
            if sample[i] < value {
                sample.swap(i, pivot);
                pivot += 1;
            }
        }
        let (left, right) = sample.split_at_mut(pivot);

        Node::Split {
            value,
            left: Box::new(Node::build(left, depth + 1, max_depth, rng)),
            right: Box::new(Node::build(right, depth + 1, max_depth, rng)),
        }
    }

    fn path_length(&self, x: f64) -> f64 {
        let mut node = self;
        let mut depth = 0.0;
        loop {
            match node {
                Node::Leaf { size } => return depth + average_path_length(*size),
                Node::Split { value, left, right } => {
                    node = if x < *value { left } else { right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let m = (n - 1) as f64;
            2.0 * (m.ln() + EULER_GAMMA) - 2.0 * m / n as f64
        }
    }
}

/// A fitted forest.
#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<Node>,
    sample_size: usize,
}

impl IsolationForest {
    /// Grow `n_trees` trees, each on a subsample drawn without replacement.
    pub fn fit(data: &[f64], config: &IsolationForestConfig) -> Result<Self> {
        config.validate()?;
        if data.len() < 2 {
            return Err(AnalyticsError::InsufficientData {
                needed: 2,
                got: data.len(),
            });
        }

        let sample_size = config.max_samples.min(data.len());
        let max_depth = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.n_trees)
            .map(|_| {
                let mut sample: Vec<f64> = index::sample(&mut rng, data.len(), sample_size)
                    .into_iter()
                    .map(|i| data[i])
                    .collect();
                Node::build(&mut sample, 0, max_depth, &mut rng)
            })
            .collect();

        Ok(Self { trees, sample_size })
    }

    /// Anomaly score in (0, 1]; values near 1 are anomalous, near 0.5 normal.
    pub fn score(&self, x: f64) -> f64 {
        let mean_path =
            self.trees.iter().map(|t| t.path_length(x)).sum::<f64>() / self.trees.len() as f64;
        let norm = average_path_length(self.sample_size);
        if norm <= 0.0 {
            return 0.5;
        }
        2f64.powf(-mean_path / norm)
    }

    pub fn score_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.score(x)).collect()
    }
}

/// One day of the Total series with its anomaly verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyFlag {
    pub date: NaiveDate,
    pub total: f64,
    pub score: f64,
    pub anomaly: bool,
}

/// Flag unusual days in a daily Total series.
///
/// A day is flagged when its score exceeds the `1 - contamination`
/// quantile of all scores, so roughly `contamination` of the days are
/// flagged.
pub fn detect_anomalies(
    daily: &[(NaiveDate, f64)],
    config: &IsolationForestConfig,
) -> MetricOutcome<Vec<AnomalyFlag>> {
    let totals: Vec<f64> = daily.iter().map(|(_, t)| *t).collect();
    let forest = IsolationForest::fit(&totals, config).map_err(|e| match e {
        AnalyticsError::InsufficientData { needed, got } => {
            SkipReason::InsufficientData { needed, got }
        }
        other => SkipReason::InvalidParameter(other.to_string()),
    })?;

    let scores = forest.score_many(&totals);
    let threshold = quantile(&scores, 1.0 - config.contamination);

    Ok(daily
        .iter()
        .zip(scores)
        .map(|(&(date, total), score)| AnomalyFlag {
            date,
            total,
            score,
            anomaly: score > threshold,
        })
        .collect())
}
