//! Clustering algorithms for points in the plane.
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! Assign each point to the nearest centroid, then move each centroid to the
//! mean of its points. Repeat until no label changes.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! ### K-medoids
//!
//! Same assignment step, but every representative must be an actual data point.
//! The update picks, per cluster, the member with the smallest total squared
//! distance to the others, evaluating at most `candidate_limit` members.
//!
//! ### DBSCAN
//!
//! Density-based clustering that discovers non-convex clusters and labels
//! outliers as noise. The number of clusters is not fixed in advance, and
//! there is no iteration: one call clusters everything.
//!
//! ## Stepping
//!
//! The caller owns the samples. An [`Engine`] owns the centers and advances one
//! step per call, so a front end can show every intermediate configuration.
//!
//! ```rust
//! use clump_sandbox::cluster::{Algorithm, Engine, Sample, StepOutcome};
//! use clump_sandbox::EngineConfig;
//!
//! let mut samples: Vec<Sample> = [(0.0, 0.0), (1.0, 0.0), (50.0, 50.0), (51.0, 50.0)]
//!     .into_iter()
//!     .map(Sample::from)
//!     .collect();
//!
//! let mut engine = Engine::new(EngineConfig::new(Algorithm::KMeans, 2)).unwrap();
//! engine.reset(&mut samples);
//! while !engine.step(&mut samples).unwrap().is_converged() {}
//!
//! assert_eq!(samples[0].label, samples[1].label);
//! assert_ne!(samples[0].label, samples[2].label);
//! assert!(engine.inertia(&samples) <= 1.0);
//! assert_eq!(engine.step(&mut samples).unwrap(), StepOutcome::AlreadyConverged);
//! ```

mod assign;
mod dbscan;
mod driver;
mod evaluation;
mod geometry;
mod kmeans;
mod kmedoids;
mod spatial;
mod traits;

pub use assign::{assign, nearest_center};
pub use dbscan::{dbscan, noise_count, Dbscan};
pub use driver::{Algorithm, Engine, RunState, StepOutcome};
pub use evaluation::{
    cluster_metrics, elbow_k, elbow_sweep, inertia, ClusterMetrics, ElbowPoint, InertiaHistory,
    DEFAULT_HISTORY_CAPACITY, ELBOW_MAX_ITERATIONS,
};
pub use geometry::{clear_labels, labels, squared_distance, Center, Label, Position, Sample};
pub use kmeans::{draw_seeds, update_means, MeanUpdate};
pub use kmedoids::{update_medoids, MedoidUpdate, DEFAULT_CANDIDATE_LIMIT};
pub use spatial::GridIndex;
pub use traits::CenterUpdate;
