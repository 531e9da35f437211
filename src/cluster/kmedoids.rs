//! K-medoids center update (approximate PAM).
//!
//! Each medoid is replaced by the cluster member with the smallest total squared
//! distance to the rest of its cluster. This is the PAM SWAP step restricted to
//! within-cluster candidates, and for large clusters the candidates are further
//! limited to a random subset of size `candidate_limit`. Cost per cluster is
//! `O(|cluster| * candidate_limit)` rather than `O(|cluster|^2)`.
//!
//! A medoid must bind to a real point, so an empty cluster is reseeded from a
//! uniformly random sample of the whole dataset.

use rand::seq::index;
use rand::{Rng, RngCore};
use tracing::trace;

use super::geometry::{squared_distance, Center, Sample};
use super::traits::CenterUpdate;

/// Default number of medoid candidates evaluated per cluster.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 25;

/// Approximate-medoid update.
#[derive(Debug, Clone, Copy)]
pub struct MedoidUpdate {
    candidate_limit: usize,
}

impl MedoidUpdate {
    /// `candidate_limit` is clamped to at least 1.
    pub fn new(candidate_limit: usize) -> Self {
        Self {
            candidate_limit: candidate_limit.max(1),
        }
    }

    pub fn candidate_limit(&self) -> usize {
        self.candidate_limit
    }
}

impl Default for MedoidUpdate {
    fn default() -> Self {
        Self::new(DEFAULT_CANDIDATE_LIMIT)
    }
}

impl CenterUpdate for MedoidUpdate {
    fn update(&self, samples: &[Sample], centers: &mut [Center], rng: &mut dyn RngCore) {
        if samples.is_empty() {
            return;
        }

        let k = centers.len();
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); k];
        for (idx, sample) in samples.iter().enumerate() {
            if let Some(id) = sample.label.id().filter(|&id| id < k) {
                members[id].push(idx);
            }
        }

        for (cluster, center) in centers.iter_mut().enumerate() {
            let cluster_members = &members[cluster];
            if cluster_members.is_empty() {
                let pick = rng.random_range(0..samples.len());
                trace!(cluster, sample = pick, "empty cluster, reseeding medoid");
                *center = Center::from_sample(&samples[pick]);
                continue;
            }

            let candidates: Vec<usize> = if cluster_members.len() <= self.candidate_limit {
                cluster_members.clone()
            } else {
                index::sample(rng, cluster_members.len(), self.candidate_limit)
                    .iter()
                    .map(|i| cluster_members[i])
                    .collect()
            };

            if let Some(best) = best_candidate(samples, cluster_members, &candidates) {
                *center = Center::from_sample(&samples[best]);
            }
        }
    }
}

/// The candidate with the lowest total squared distance to `members`.
/// Equal costs keep the earlier candidate.
fn best_candidate(samples: &[Sample], members: &[usize], candidates: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &candidate in candidates {
        let c = &samples[candidate];
        let cost: f64 = members
            .iter()
            .map(|&m| squared_distance(samples[m].x, samples[m].y, c.x, c.y))
            .sum();
        match best {
            Some((_, best_cost)) if cost >= best_cost => {}
            _ => best = Some((candidate, cost)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Replace each medoid with its best sampled cluster member; reseed empty clusters.
pub fn update_medoids<R: RngCore>(
    samples: &[Sample],
    centers: &mut [Center],
    candidate_limit: usize,
    rng: &mut R,
) {
    MedoidUpdate::new(candidate_limit).update(samples, centers, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::assign::assign;
    use crate::cluster::geometry::Label;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn labeled(coords: &[(f64, f64, usize)]) -> Vec<Sample> {
        coords
            .iter()
            .map(|&(x, y, c)| {
                let mut s = Sample::new(x, y);
                s.label = Label::Cluster(c);
                s
            })
            .collect()
    }

    #[test]
    fn picks_the_true_medoid_when_all_members_are_candidates() {
        // The middle point of a line minimizes the total squared distance.
        let samples = labeled(&[(0.0, 0.0, 0), (1.0, 0.0, 0), (2.0, 0.0, 0), (10.0, 0.0, 0)]);
        let mut centers = vec![Center::new(0.0, 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        update_medoids(&samples, &mut centers, 25, &mut rng);

        // mean is 3.25; the closest member is (2, 0)
        assert_eq!(centers[0], Center::new(2.0, 0.0));
    }

    #[test]
    fn equal_cost_keeps_first_candidate() {
        let samples = labeled(&[(0.0, 0.0, 0), (2.0, 0.0, 0)]);
        let mut centers = vec![Center::new(2.0, 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        update_medoids(&samples, &mut centers, 25, &mut rng);

        assert_eq!(centers[0], Center::new(0.0, 0.0));
    }

    #[test]
    fn empty_cluster_reseeds_from_whole_dataset() {
        let samples = labeled(&[(0.0, 0.0, 0), (1.0, 1.0, 0), (2.0, 2.0, 0)]);
        let mut centers = vec![Center::new(1.0, 1.0), Center::new(500.0, 500.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        update_medoids(&samples, &mut centers, 25, &mut rng);

        assert_eq!(centers[0], Center::new(1.0, 1.0));
        assert!(samples.iter().any(|s| centers[1].coincides_with(s)));
    }

    #[test]
    fn large_clusters_use_sampled_candidates_that_are_members() {
        let mut samples: Vec<Sample> = (0..200)
            .map(|i| Sample::new((i % 20) as f64, (i / 20) as f64))
            .collect();
        let mut centers = vec![Center::new(0.0, 0.0), Center::new(19.0, 9.0)];
        assign(&mut samples, &centers).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        update_medoids(&samples, &mut centers, 5, &mut rng);

        for (cluster, center) in centers.iter().enumerate() {
            assert!(samples
                .iter()
                .any(|s| s.label == Label::Cluster(cluster) && center.coincides_with(s)));
        }
    }

    #[test]
    fn zero_candidate_limit_is_clamped() {
        assert_eq!(MedoidUpdate::new(0).candidate_limit(), 1);
        assert_eq!(MedoidUpdate::default().candidate_limit(), DEFAULT_CANDIDATE_LIMIT);
    }

    #[test]
    fn empty_dataset_is_a_noop() {
        let mut centers = vec![Center::new(4.0, 4.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        update_medoids(&[], &mut centers, 25, &mut rng);
        assert_eq!(centers[0], Center::new(4.0, 4.0));
    }
}
