//! Region clustering.
//!
//! # Example
//!
//! ```
//! use aadhaar_analytics::clustering::{cluster_regions, KMeansConfig, RegionFeatures};
//!
//! let features = RegionFeatures::new(
//!     vec!["enrolment".into(), "biometric".into()],
//!     [
//!         ("A".to_string(), vec![10.0, 1.0]),
//!         ("B".to_string(), vec![11.0, 1.1]),
//!         ("C".to_string(), vec![900.0, 60.0]),
//!         ("D".to_string(), vec![950.0, 62.0]),
//!     ],
//! )
//! .unwrap();
//! let clusters = cluster_regions(&features, &KMeansConfig::default().k(2)).unwrap();
//! assert_eq!(clusters.label_of("A"), clusters.label_of("B"));
//! assert_ne!(clusters.label_of("A"), clusters.label_of("C"));
//! ```

pub mod kmeans;
pub mod regions;

pub use kmeans::{elbow_inertias, kmeans, KMeansConfig, KMeansResult};
pub use regions::{
    cluster_regions, prominent_regions, ClusterAssignment, RegionCluster, RegionFeatures,
};
