//! K-means clustering on dense feature vectors.
//!
//! Seeded k-means++ initialisation with several restarts; the run with the
//! lowest inertia wins. Distances are squared Euclidean.

use rand::prelude::*;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// K-means configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    /// Number of clusters
    pub k: usize,
    /// Maximum Lloyd iterations per restart
    pub max_iter: usize,
    /// Number of k-means++ restarts
    pub n_init: usize,
    /// Random seed for initialisation
    pub seed: u64,
    /// Stop when the summed squared centroid shift falls below this
    pub tolerance: f64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: 3,
            max_iter: 300,
            n_init: 10,
            seed: 42,
            tolerance: 1e-4,
        }
    }
}

impl KMeansConfig {
    /// Set number of clusters.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k.max(1);
        self
    }

    /// Set maximum iterations.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set number of restarts.
    pub fn n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    /// Set random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set convergence tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// K-means clustering result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KMeansResult {
    /// Cluster assignment for each point (0-indexed)
    pub labels: Vec<usize>,
    /// Cluster centroids
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances to the assigned centroid
    pub inertia: f64,
    /// Iterations of the winning restart
    pub n_iter: usize,
}

impl KMeansResult {
    /// Indices of the points in `cluster`.
    pub fn cluster_members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == cluster)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of points in each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &label in &self.labels {
            if let Some(size) = sizes.get_mut(label) {
                *size += 1;
            }
        }
        sizes
    }
}

/// Cluster `points` into at most `config.k` groups.
///
/// `k` is capped at the number of points. Identical input and seed give
/// identical labels.
pub fn kmeans(points: &[Vec<f64>], config: &KMeansConfig) -> KMeansResult {
    let n = points.len();
    let k = config.k.min(n);

    if n == 0 || k == 0 {
        return KMeansResult {
            labels: Vec::new(),
            centroids: Vec::new(),
            inertia: 0.0,
            n_iter: 0,
        };
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut best: Option<KMeansResult> = None;

    for _ in 0..config.n_init.max(1) {
        let init = kmeans_plus_plus(points, k, &mut rng);
        let run = lloyd(points, init, config);
        if best.as_ref().map_or(true, |b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }

    best.unwrap_or_else(|| lloyd(points, points[..k].to_vec(), config))
}

/// Pick `k` starting centroids, each new one with probability proportional
/// to its squared distance from the nearest already chosen.
fn kmeans_plus_plus(points: &[Vec<f64>], k: usize, rng: &mut impl Rng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)].clone());

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let sum: f64 = nearest.iter().sum();
        let selected = if sum > 0.0 {
            let threshold = rng.gen::<f64>() * sum;
            let mut cumsum = 0.0;
            let mut selected = n - 1;
            for (i, &d) in nearest.iter().enumerate() {
                cumsum += d;
                if cumsum > threshold {
                    selected = i;
                    break;
                }
            }
            selected
        } else {
            // all points coincide with a chosen centroid
            rng.gen_range(0..n)
        };

        let centroid = points[selected].clone();
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

/// Lloyd iterations from the given centroids.
fn lloyd(points: &[Vec<f64>], mut centroids: Vec<Vec<f64>>, config: &KMeansConfig) -> KMeansResult {
    let mut labels = vec![0; points.len()];
    let mut n_iter = 0;

    for iter in 0..config.max_iter {
        n_iter = iter + 1;

        for (label, p) in labels.iter_mut().zip(points) {
            *label = find_nearest_centroid(p, &centroids).0;
        }

        let updated = update_centroids(points, &labels, &centroids);
        let shift: f64 = centroids
            .iter()
            .zip(&updated)
            .map(|(a, b)| squared_distance(a, b))
            .sum();
        centroids = updated;

        if shift <= config.tolerance {
            break;
        }
    }

    // labels consistent with the final centroids
    let mut inertia = 0.0;
    for (label, p) in labels.iter_mut().zip(points) {
        let (nearest, dist) = find_nearest_centroid(p, &centroids);
        *label = nearest;
        inertia += dist;
    }

    KMeansResult {
        labels,
        centroids,
        inertia,
        n_iter,
    }
}

fn find_nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    let mut min_dist = f64::INFINITY;
    let mut nearest = 0;

    for (i, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < min_dist {
            min_dist = dist;
            nearest = i;
        }
    }

    (nearest, min_dist)
}

/// Mean of each cluster's members; an empty cluster keeps its centroid.
fn update_centroids(points: &[Vec<f64>], labels: &[usize], previous: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let dims = previous.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; dims]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (p, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for (s, &v) in sums[label].iter_mut().zip(p) {
            *s += v;
        }
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous)
        .map(|((sum, count), prev)| {
            if count == 0 {
                prev.clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Elbow method helper: inertia for k = 1..=max_k.
///
/// Diagnostic only; nothing picks k from it.
pub fn elbow_inertias(points: &[Vec<f64>], max_k: usize, config: &KMeansConfig) -> Vec<f64> {
    (1..=max_k.min(points.len()))
        .map(|k| kmeans(points, &config.clone().k(k)).inertia)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn generate_cluster_data() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 2.0],
            vec![1.5, 2.5],
            vec![1.2, 2.2],
            vec![10.0, 11.0],
            vec![10.5, 11.5],
            vec![10.2, 11.2],
        ]
    }

    #[test]
    fn kmeans_finds_clusters() {
        let data = generate_cluster_data();
        let result = kmeans(&data, &KMeansConfig::default().k(2));

        assert_eq!(result.labels.len(), 6);
        assert_eq!(result.centroids.len(), 2);
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[1], result.labels[2]);
        assert_eq!(result.labels[3], result.labels[4]);
        assert_eq!(result.labels[4], result.labels[5]);
        assert_ne!(result.labels[0], result.labels[3]);
    }

    #[test]
    fn kmeans_is_reproducible() {
        let data = generate_cluster_data();
        let config = KMeansConfig::default().k(3).seed(7);
        assert_eq!(kmeans(&data, &config), kmeans(&data, &config));
    }

    #[test]
    fn kmeans_single_cluster() {
        let data = vec![vec![1.0, 2.0, 3.0], vec![1.1, 2.1, 3.1], vec![0.9, 1.9, 2.9]];
        let result = kmeans(&data, &KMeansConfig::default().k(1));

        assert!(result.labels.iter().all(|&l| l == 0));
        assert_eq!(result.centroids.len(), 1);
        assert_relative_eq!(result.centroids[0][0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn kmeans_k_equals_n() {
        let data = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let result = kmeans(&data, &KMeansConfig::default().k(3));

        assert_eq!(result.centroids.len(), 3);
        assert_relative_eq!(result.inertia, 0.0, epsilon = 1e-10);
        let mut labels = result.labels.clone();
        labels.sort_unstable();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn kmeans_duplicate_points() {
        let data = vec![vec![1.0, 1.0]; 4];
        let result = kmeans(&data, &KMeansConfig::default().k(2));
        assert_eq!(result.labels.len(), 4);
        assert_relative_eq!(result.inertia, 0.0);
    }

    #[test]
    fn kmeans_empty() {
        let data: Vec<Vec<f64>> = vec![];
        let result = kmeans(&data, &KMeansConfig::default());

        assert!(result.labels.is_empty());
        assert!(result.centroids.is_empty());
    }

    #[test]
    fn cluster_sizes_basic() {
        let data = generate_cluster_data();
        let result = kmeans(&data, &KMeansConfig::default().k(2));

        let mut sizes = result.cluster_sizes();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 3]);
        assert_eq!(
            result.cluster_members(0).len() + result.cluster_members(1).len(),
            6
        );
    }

    #[test]
    fn empty_cluster_keeps_centroid() {
        let points = vec![vec![0.0], vec![1.0]];
        let previous = vec![vec![0.5], vec![100.0]];
        let updated = update_centroids(&points, &[0, 0], &previous);
        assert_eq!(updated, vec![vec![0.5], vec![100.0]]);
    }

    #[test]
    fn elbow_inertias_decreasing() {
        let data = generate_cluster_data();
        let inertias = elbow_inertias(&data, 4, &KMeansConfig::default());

        assert_eq!(inertias.len(), 4);
        for i in 1..inertias.len() {
            assert!(inertias[i] <= inertias[i - 1] + 1e-6);
        }
    }

    #[test]
    fn config_builder() {
        let config = KMeansConfig::default()
            .k(5)
            .max_iter(50)
            .n_init(0)
            .seed(123)
            .tolerance(1e-6);

        assert_eq!(config.k, 5);
        assert_eq!(config.max_iter, 50);
        assert_eq!(config.n_init, 1);
        assert_eq!(config.seed, 123);
        assert_eq!(KMeansConfig::default().k(0).k, 1);
    }
}
