//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points by neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Determines the number of clusters itself
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **eps**: Maximum distance between two points to be neighbors.
//! - **min_samples**: Minimum neighborhood size, the point itself included,
//!   for a point to be "core".
//! - **Border point**: Within eps of a core point but not core itself.
//! - **Noise point**: Neither core nor border.
//!
//! ## Algorithm Steps
//!
//! 1. Scan samples in their given order. For each unvisited sample P:
//!    - Find neighbors within eps
//!    - If there are fewer than min_samples, mark P as noise (may change later)
//!    - Else P is core: open the next cluster id and expand from its neighbors
//!
//! 2. Expansion: every worklist member that is unassigned or noise joins the
//!    cluster; members that are themselves core add their neighbors.
//!
//! Cluster ids therefore follow discovery order. Which cluster a border point
//! joins can depend on scan order; core/noise status and the grouping of core
//! points cannot.
//!
//! ## Complexity
//!
//! Neighbor queries go through a [`GridIndex`] with cell size eps, so each query
//! touches a 3×3 block of cells. Near-uniform data runs in roughly O(n · density);
//! the worst case (everything in one cell) is O(n²).
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use super::geometry::{clear_labels, Label, Sample};
use super::spatial::GridIndex;
use crate::error::{Error, Result};

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Neighborhood radius.
    eps: f64,
    /// Minimum neighborhood size for core classification.
    min_samples: usize,
    /// Grid cell size; `None` means `eps`.
    cell_size: Option<f64>,
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `eps` - Neighborhood radius, in coordinate units. Clamped to at least 1.
    /// * `min_samples` - Core threshold, counting the point itself. Clamped to at least 1.
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self {
            eps,
            min_samples,
            cell_size: None,
        }
    }

    /// Set eps (neighborhood radius).
    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Set the core-point threshold.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Override the grid cell size. Results do not depend on it; only query cost does.
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    /// Radius actually used after clamping.
    pub fn effective_eps(&self) -> f64 {
        self.eps.max(1.0)
    }

    /// Core threshold actually used after clamping.
    pub fn effective_min_samples(&self) -> usize {
        self.min_samples.max(1)
    }

    fn validate(&self) -> Result<(f64, f64, usize)> {
        if !self.eps.is_finite() {
            return Err(Error::config("eps", "must be finite"));
        }
        let eps = self.effective_eps();
        let cell = match self.cell_size {
            None => eps,
            Some(c) if c > 0.0 && c.is_finite() => c,
            Some(_) => return Err(Error::config("cell_size", "must be positive and finite")),
        };
        Ok((eps, cell, self.effective_min_samples()))
    }

    /// Label `samples` in place and return the number of clusters (noise excluded).
    ///
    /// Every label is rewritten, so running twice on the same data gives the
    /// same result. An empty slice yields 0.
    #[instrument(skip(self, samples), fields(n = samples.len(), eps = self.eps, min_samples = self.min_samples))]
    pub fn run(&self, samples: &mut [Sample]) -> Result<usize> {
        let (eps, cell, min_samples) = self.validate()?;

        clear_labels(samples);
        let n = samples.len();
        if n == 0 {
            return Ok(0);
        }

        let index = GridIndex::build(samples, cell);
        let mut visited = vec![false; n];
        let mut queued = vec![false; n];
        let mut cluster_id = 0usize;

        for point_idx in 0..n {
            if visited[point_idx] {
                continue;
            }
            visited[point_idx] = true;

            let neighbors = index.neighbors(samples, point_idx, eps);
            if neighbors.len() < min_samples {
                // Not dense enough: noise for now, may become a border point later.
                samples[point_idx].label = Label::Noise;
                continue;
            }

            samples[point_idx].label = Label::Cluster(cluster_id);
            Self::expand_cluster(
                samples,
                &index,
                &neighbors,
                (eps, min_samples),
                cluster_id,
                &mut visited,
                &mut queued,
            );
            cluster_id += 1;
        }

        debug!(clusters = cluster_id, noise = noise_count(samples), "dbscan finished");
        Ok(cluster_id)
    }

    /// Grow cluster `cluster_id` outward from a core point's neighborhood.
    fn expand_cluster(
        samples: &mut [Sample],
        index: &GridIndex,
        neighbors: &[usize],
        (eps, min_samples): (f64, usize),
        cluster_id: usize,
        visited: &mut [bool],
        queued: &mut [bool],
    ) {
        let mut to_process: VecDeque<usize> = VecDeque::with_capacity(neighbors.len());
        for &nb in neighbors {
            if !queued[nb] {
                queued[nb] = true;
                to_process.push_back(nb);
            }
        }

        while let Some(idx) = to_process.pop_front() {
            // Relabel before the visited check so earlier noise can be promoted
            // to a border point of this cluster.
            if matches!(samples[idx].label, Label::Unassigned | Label::Noise) {
                samples[idx].label = Label::Cluster(cluster_id);
            }

            if visited[idx] {
                continue;
            }
            visited[idx] = true;

            let reachable = index.neighbors(samples, idx, eps);
            if reachable.len() >= min_samples {
                for nb in reachable {
                    if !queued[nb] {
                        queued[nb] = true;
                        to_process.push_back(nb);
                    }
                }
            }
        }
    }

    /// Cluster raw coordinates and return one label per point.
    pub fn fit_predict(&self, points: &[(f64, f64)]) -> Result<Vec<Label>> {
        let mut samples: Vec<Sample> = points.iter().copied().map(Sample::from).collect();
        self.run(&mut samples)?;
        Ok(samples.into_iter().map(|s| s.label).collect())
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(45.0, 5)
    }
}

/// Run DBSCAN over `samples` in place; see [`Dbscan::run`].
pub fn dbscan(samples: &mut [Sample], eps: f64, min_samples: usize) -> Result<usize> {
    Dbscan::new(eps, min_samples).run(samples)
}

/// Number of samples currently labeled as noise.
pub fn noise_count(samples: &[Sample]) -> usize {
    samples.iter().filter(|s| s.label.is_noise()).count()
}
