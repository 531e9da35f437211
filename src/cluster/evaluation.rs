//! Inertia, convergence history, and multi-k evaluation.
//!
//! Everything here is for centroid/medoid clustering. Density clustering has no
//! centers and therefore no inertia.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::assign::assign;
use super::geometry::{Center, Sample};
use super::kmeans::{draw_seeds, update_means};
use crate::config::Seeding;
use crate::error::{Error, Result};

/// Iteration ceiling for each k in an elbow sweep.
pub const ELBOW_MAX_ITERATIONS: usize = 50;

/// Default number of inertia values kept per run.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Within-cluster sum of squares.
///
/// Samples without a cluster label (unassigned, noise, or an id with no center)
/// contribute nothing. Returns 0 for an empty dataset.
pub fn inertia(samples: &[Sample], centers: &[Center]) -> f64 {
    samples
        .iter()
        .filter_map(|s| {
            let center = centers.get(s.label.id()?)?;
            Some(s.distance_squared_to(center))
        })
        .sum()
}

/// Most recent inertia values of one run, oldest first.
///
/// Holds at most `capacity` values; pushing past that evicts the oldest.
#[derive(Debug, Clone, PartialEq)]
pub struct InertiaHistory {
    values: VecDeque<f64>,
    capacity: usize,
}

impl InertiaHistory {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn last(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }
}

impl Default for InertiaHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// One point of an elbow curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElbowPoint {
    pub k: usize,
    pub inertia: f64,
}

/// Run k-means independently for every k in `k_min..=k_max` and record the
/// final inertia of each run.
///
/// Each run works on its own copy of the samples, seeded with k-means++ and
/// capped at [`ELBOW_MAX_ITERATIONS`]. The caller's samples are only read.
/// `k_max` is clamped to the number of samples; an empty dataset gives an
/// empty curve.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`] if `k_min` is 0.
#[instrument(skip(samples, rng), fields(n = samples.len()))]
pub fn elbow_sweep<R: Rng + ?Sized>(
    samples: &[Sample],
    k_min: usize,
    k_max: usize,
    rng: &mut R,
) -> Result<Vec<ElbowPoint>> {
    if k_min == 0 {
        return Err(Error::config("k_min", "must be at least 1"));
    }

    let k_max = k_max.min(samples.len());
    let mut curve = Vec::with_capacity(k_max.saturating_sub(k_min) + 1);

    for k in k_min..=k_max {
        let mut scratch: Vec<Sample> = samples.to_vec();
        for s in scratch.iter_mut() {
            s.clear_label();
        }
        let mut centers = draw_seeds(&scratch, k, Seeding::PlusPlus, rng);

        let mut iterations = 0;
        while iterations < ELBOW_MAX_ITERATIONS {
            iterations += 1;
            let changed = assign(&mut scratch, &centers)?;
            update_means(&scratch, &mut centers);
            if !changed {
                break;
            }
        }

        let value = inertia(&scratch, &centers);
        debug!(k, iterations, inertia = value, "elbow point");
        curve.push(ElbowPoint { k, inertia: value });
    }

    Ok(curve)
}

/// Suggested k: the point that ends the largest relative inertia decrease.
///
/// Relative rather than absolute so the first step, which is always large in
/// absolute terms, does not dominate. `None` for curves shorter than two points
/// or with no decrease at all.
pub fn elbow_k(curve: &[ElbowPoint]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for pair in curve.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        if prev.inertia <= 0.0 {
            continue;
        }
        let drop = (prev.inertia - cur.inertia) / prev.inertia;
        if drop <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_drop)) if drop <= best_drop => {}
            _ => best = Some((cur.k, drop)),
        }
    }
    best.map(|(k, _)| k)
}

/// Summary statistics of one non-empty cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterMetrics {
    pub cluster: usize,
    pub size: usize,
    /// Mean Euclidean distance from members to the center.
    pub avg_distance: f64,
    /// Population variance of those distances.
    pub variance: f64,
    /// `1 / (1 + variance)`; 1.0 for a perfectly even spread.
    pub compactness: f64,
}

/// Per-cluster size and spread for every center that has members, in id order.
pub fn cluster_metrics(samples: &[Sample], centers: &[Center]) -> Vec<ClusterMetrics> {
    let mut distances: Vec<Vec<f64>> = vec![Vec::new(); centers.len()];
    for sample in samples {
        if let Some(id) = sample.label.id().filter(|&id| id < centers.len()) {
            distances[id].push(sample.distance_squared_to(&centers[id]).sqrt());
        }
    }

    distances
        .into_iter()
        .enumerate()
        .filter(|(_, d)| !d.is_empty())
        .map(|(cluster, d)| {
            let n = d.len() as f64;
            let avg = d.iter().sum::<f64>() / n;
            let variance = d.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / n;
            ClusterMetrics {
                cluster,
                size: d.len(),
                avg_distance: avg,
                variance,
                compactness: 1.0 / (1.0 + variance),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::geometry::Label;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn labeled(coords: &[(f64, f64, Label)]) -> Vec<Sample> {
        coords
            .iter()
            .map(|&(x, y, label)| {
                let mut s = Sample::new(x, y);
                s.label = label;
                s
            })
            .collect()
    }

    #[test]
    fn inertia_sums_squared_distances() {
        let samples = labeled(&[
            (1.0, 0.0, Label::Cluster(0)),
            (0.0, 2.0, Label::Cluster(0)),
            (10.0, 13.0, Label::Cluster(1)),
            (99.0, 99.0, Label::Unassigned),
            (50.0, 50.0, Label::Noise),
        ]);
        let centers = [Center::new(0.0, 0.0), Center::new(10.0, 10.0)];

        assert_relative_eq!(inertia(&samples, &centers), 1.0 + 4.0 + 9.0);
        assert_eq!(inertia(&[], &centers), 0.0);
    }

    #[test]
    fn history_evicts_oldest() {
        let mut history = InertiaHistory::new(3);
        for v in [5.0, 4.0, 3.0, 2.0] {
            history.push(v);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.to_vec(), vec![4.0, 3.0, 2.0]);
        assert_eq!(history.last(), Some(2.0));

        history.clear();
        assert!(history.is_empty());
        assert_eq!(InertiaHistory::default().capacity(), DEFAULT_HISTORY_CAPACITY);
        assert_eq!(InertiaHistory::new(0).capacity(), 1);
    }

    #[test]
    fn elbow_leaves_input_untouched() {
        let mut samples: Vec<Sample> = (0..12)
            .map(|i| Sample::new((i % 4) as f64 * 10.0, (i / 4) as f64))
            .collect();
        samples[3].label = Label::Cluster(5);
        samples[4].label = Label::Noise;
        let before = samples.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let curve = elbow_sweep(&samples, 1, 4, &mut rng).unwrap();

        assert_eq!(samples, before);
        assert_eq!(curve.iter().map(|p| p.k).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn elbow_clamps_k_max_to_sample_count() {
        let samples = vec![Sample::new(0.0, 0.0), Sample::new(4.0, 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let curve = elbow_sweep(&samples, 1, 10, &mut rng).unwrap();

        assert_eq!(curve.len(), 2);
        assert_relative_eq!(curve[0].inertia, 8.0);
        assert_relative_eq!(curve[1].inertia, 0.0);
    }

    #[test]
    fn elbow_rejects_zero_k_min_and_handles_empty_data() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(elbow_sweep(&[Sample::new(0.0, 0.0)], 0, 3, &mut rng).is_err());
        assert!(elbow_sweep(&[], 1, 5, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn elbow_k_uses_relative_drop() {
        let curve = [
            ElbowPoint { k: 1, inertia: 1000.0 },
            ElbowPoint { k: 2, inertia: 400.0 },
            ElbowPoint { k: 3, inertia: 10.0 },
            ElbowPoint { k: 4, inertia: 8.0 },
        ];
        // 1→2 is the largest absolute drop, 2→3 the largest relative one.
        assert_eq!(elbow_k(&curve), Some(3));
        assert_eq!(elbow_k(&curve[..1]), None);
        assert_eq!(
            elbow_k(&[ElbowPoint { k: 1, inertia: 0.0 }, ElbowPoint { k: 2, inertia: 0.0 }]),
            None
        );
    }

    #[test]
    fn metrics_for_non_empty_clusters_only() {
        let samples = labeled(&[
            (3.0, 4.0, Label::Cluster(0)),
            (-3.0, -4.0, Label::Cluster(0)),
            (0.0, 1.0, Label::Cluster(0)),
            (20.0, 20.0, Label::Cluster(2)),
        ]);
        let centers = [Center::new(0.0, 0.0), Center::new(50.0, 50.0), Center::new(20.0, 20.0)];

        let metrics = cluster_metrics(&samples, &centers);

        assert_eq!(metrics.len(), 2);
        let m0 = metrics[0];
        assert_eq!(m0.cluster, 0);
        assert_eq!(m0.size, 3);
        // distances 5, 5, 1
        assert_relative_eq!(m0.avg_distance, 11.0 / 3.0);
        let mean = 11.0 / 3.0;
        let var = (2.0 * (5.0 - mean) * (5.0 - mean) + (1.0 - mean) * (1.0 - mean)) / 3.0;
        assert_relative_eq!(m0.variance, var, epsilon = 1e-12);
        assert_relative_eq!(m0.compactness, 1.0 / (1.0 + var), epsilon = 1e-12);

        let m2 = metrics[1];
        assert_eq!(m2.cluster, 2);
        assert_eq!(m2.size, 1);
        assert_eq!(m2.variance, 0.0);
        assert_eq!(m2.compactness, 1.0);
    }
}
