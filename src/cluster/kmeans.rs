//! K-means center update and center seeding.
//!
//! One k-means iteration is an [`assign`](super::assign::assign) pass followed by
//! [`update_means`]: every center moves to the arithmetic mean of its members.
//! Under exact recompute the within-cluster sum of squares never increases, so
//! repeated steps reach a fixed point.
//!
//! An empty cluster keeps its stale center. A centroid may occupy empty space,
//! and the cluster can pick members up again on a later assignment.

use rand::seq::index;
use rand::{Rng, RngCore};
use tracing::trace;

use super::assign::nearest_center;
use super::geometry::{Center, Sample};
use super::traits::CenterUpdate;
use crate::config::Seeding;

/// Exact mean update (Lloyd's algorithm).
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanUpdate;

impl CenterUpdate for MeanUpdate {
    fn update(&self, samples: &[Sample], centers: &mut [Center], _rng: &mut dyn RngCore) {
        update_means(samples, centers);
    }
}

/// Move each center to the mean of its members; empty clusters are left alone.
pub fn update_means(samples: &[Sample], centers: &mut [Center]) {
    let k = centers.len();
    let mut sums = vec![(0.0f64, 0.0f64); k];
    let mut counts = vec![0usize; k];

    for sample in samples {
        if let Some(id) = sample.label.id().filter(|&id| id < k) {
            sums[id].0 += sample.x;
            sums[id].1 += sample.y;
            counts[id] += 1;
        }
    }

    for (idx, center) in centers.iter_mut().enumerate() {
        let count = counts[idx];
        if count == 0 {
            trace!(cluster = idx, "empty cluster, keeping stale centroid");
            continue;
        }
        let n = count as f64;
        center.x = sums[idx].0 / n;
        center.y = sums[idx].1 / n;
    }
}

/// Draw `k` initial centers from `samples`.
///
/// [`Seeding::Random`] picks distinct samples when `k <= samples.len()` and falls
/// back to sampling with replacement otherwise. [`Seeding::PlusPlus`] uses
/// D²-weighted selection. Returns an empty vector for an empty dataset.
pub fn draw_seeds<R: Rng + ?Sized>(
    samples: &[Sample],
    k: usize,
    seeding: Seeding,
    rng: &mut R,
) -> Vec<Center> {
    let n = samples.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }

    match seeding {
        Seeding::Random if k <= n => index::sample(rng, n, k)
            .iter()
            .map(|i| Center::from_sample(&samples[i]))
            .collect(),
        Seeding::Random => (0..k)
            .map(|_| Center::from_sample(&samples[rng.random_range(0..n)]))
            .collect(),
        Seeding::PlusPlus => plus_plus(samples, k, rng),
    }
}

/// k-means++ seeding (Arthur & Vassilvitskii, 2007).
fn plus_plus<R: Rng + ?Sized>(samples: &[Sample], k: usize, rng: &mut R) -> Vec<Center> {
    let n = samples.len();
    let mut centers = Vec::with_capacity(k);
    centers.push(Center::from_sample(&samples[rng.random_range(0..n)]));

    while centers.len() < k {
        let weights: Vec<f64> = samples
            .iter()
            .map(|s| nearest_center(s.x, s.y, &centers).map_or(0.0, |(_, d)| d))
            .collect();
        let total: f64 = weights.iter().sum();

        // Every sample already coincides with a center.
        if total <= 0.0 || !total.is_finite() {
            centers.push(Center::from_sample(&samples[rng.random_range(0..n)]));
            continue;
        }

        let mut target = rng.random::<f64>() * total;
        let mut chosen = n - 1;
        for (idx, &w) in weights.iter().enumerate() {
            if w > 0.0 && target < w {
                chosen = idx;
                break;
            }
            target -= w;
        }
        // Rounding can leave `target` past the last positive weight.
        if weights[chosen] <= 0.0 {
            if let Some(idx) = weights.iter().rposition(|&w| w > 0.0) {
                chosen = idx;
            }
        }
        centers.push(Center::from_sample(&samples[chosen]));
    }

    centers
}
