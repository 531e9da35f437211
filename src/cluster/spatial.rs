//! Uniform-grid spatial hash for radius queries in the plane.
//!
//! Samples are bucketed by `(floor(x / cell), floor(y / cell))`. A radius query
//! scans the block of cells that can contain points within `eps` (the 3×3 block
//! when `cell == eps`) and then filters candidates by exact squared distance, so
//! the grid only prunes and never approximates. When the block would hold more
//! slots than there are occupied cells, the occupied cells are walked instead.

use std::collections::HashMap;

use super::geometry::{squared_distance, Sample};

type CellKey = (i64, i64);

/// Transient neighbor index over a sample slice.
#[derive(Debug, Clone)]
pub struct GridIndex {
    cell: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl GridIndex {
    /// Bucket every sample. `cell` must be positive and finite.
    pub fn build(samples: &[Sample], cell: f64) -> Self {
        debug_assert!(cell > 0.0 && cell.is_finite());
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (idx, sample) in samples.iter().enumerate() {
            cells
                .entry(Self::key(sample.x, sample.y, cell))
                .or_default()
                .push(idx);
        }
        Self { cell, cells }
    }

    /// Cell coordinates of a point. The float-to-int cast saturates, so far-out
    /// coordinates share the edge cells and are still separated by the exact
    /// distance filter.
    #[inline]
    fn key(x: f64, y: f64, cell: f64) -> CellKey {
        ((x / cell).floor() as i64, (y / cell).floor() as i64)
    }

    /// Side length of a grid cell.
    pub fn cell_size(&self) -> f64 {
        self.cell
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Indices of all samples within `eps` of `samples[idx]`, the sample itself
    /// included, in ascending order.
    ///
    /// `samples` must be the slice the index was built from.
    pub fn neighbors(&self, samples: &[Sample], idx: usize, eps: f64) -> Vec<usize> {
        let p = &samples[idx];
        let (cx, cy) = Self::key(p.x, p.y, self.cell);
        let reach_cells = (eps / self.cell).ceil().max(1.0);
        let reach = reach_cells as i64;
        let eps_sq = eps * eps;
        let within = |q: &Sample| squared_distance(p.x, p.y, q.x, q.y) <= eps_sq;

        let mut out = Vec::new();
        let block = (2.0 * reach_cells + 1.0).powi(2);
        if block > self.cells.len() as f64 {
            // Fewer occupied cells than block slots: walk the occupied ones.
            let reach = reach.unsigned_abs();
            for (&(gx, gy), bucket) in &self.cells {
                if gx.abs_diff(cx) <= reach && gy.abs_diff(cy) <= reach {
                    out.extend(bucket.iter().copied().filter(|&j| within(&samples[j])));
                }
            }
        } else {
            for gx in cx.saturating_sub(reach)..=cx.saturating_add(reach) {
                for gy in cy.saturating_sub(reach)..=cy.saturating_add(reach) {
                    if let Some(bucket) = self.cells.get(&(gx, gy)) {
                        out.extend(bucket.iter().copied().filter(|&j| within(&samples[j])));
                    }
                }
            }
        }
        out.sort_unstable();
        out
    }
}

/// Brute-force radius query, used to check the grid.
#[cfg(test)]
pub(crate) fn neighbors_brute_force(samples: &[Sample], idx: usize, eps: f64) -> Vec<usize> {
    let p = &samples[idx];
    samples
        .iter()
        .enumerate()
        .filter(|(_, q)| squared_distance(p.x, p.y, q.x, q.y) <= eps * eps)
        .map(|(j, _)| j)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn buckets_by_floor() {
        let samples = vec![
            Sample::new(0.5, 0.5),
            Sample::new(9.9, 9.9),
            Sample::new(-0.1, 0.0),
            Sample::new(10.0, 0.0),
        ];
        let index = GridIndex::build(&samples, 10.0);
        // (0,0) holds two points; (-1,0) and (1,0) one each.
        assert_eq!(index.occupied_cells(), 3);
        assert_eq!(index.cell_size(), 10.0);
    }

    #[test]
    fn boundary_distance_is_inclusive() {
        let samples = vec![Sample::new(0.0, 0.0), Sample::new(3.0, 4.0), Sample::new(3.0, 4.1)];
        let index = GridIndex::build(&samples, 5.0);
        assert_eq!(index.neighbors(&samples, 0, 5.0), vec![0, 1]);
    }

    #[test]
    fn neighbors_cross_cell_borders_and_negative_coordinates() {
        let samples = vec![
            Sample::new(-0.5, -0.5),
            Sample::new(0.5, 0.5),
            Sample::new(-1.9, 0.0),
            Sample::new(4.0, 4.0),
        ];
        let index = GridIndex::build(&samples, 2.0);
        assert_eq!(index.neighbors(&samples, 0, 2.0), vec![0, 1, 2]);
    }

    #[test]
    fn matches_brute_force_for_any_cell_size() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let samples: Vec<Sample> = (0..300)
            .map(|_| Sample::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0)))
            .collect();
        let eps = 6.0;

        for cell in [eps, 2.5, 17.0] {
            let index = GridIndex::build(&samples, cell);
            for idx in 0..samples.len() {
                assert_eq!(
                    index.neighbors(&samples, idx, eps),
                    neighbors_brute_force(&samples, idx, eps),
                    "cell={cell} idx={idx}"
                );
            }
        }
    }

    #[test]
    fn tiny_cells_walk_occupied_cells() {
        let samples = vec![Sample::new(0.0, 0.0), Sample::new(0.7, 0.7), Sample::new(3.0, 0.0)];
        let index = GridIndex::build(&samples, 1e-6);
        for idx in 0..samples.len() {
            assert_eq!(
                index.neighbors(&samples, idx, 1.0),
                neighbors_brute_force(&samples, idx, 1.0)
            );
        }
    }

    #[test]
    fn huge_coordinates_stay_their_own_neighbors() {
        let samples = vec![
            Sample::new(1e300, 0.0),
            Sample::new(1e300, 0.5),
            Sample::new(-1e300, 0.0),
            Sample::new(9.3e18, 0.0),
        ];
        let index = GridIndex::build(&samples, 2.0);
        assert_eq!(index.neighbors(&samples, 0, 2.0), vec![0, 1]);
        assert_eq!(index.neighbors(&samples, 2, 2.0), vec![2]);
        assert_eq!(index.neighbors(&samples, 3, 2.0), vec![3]);

        // Enough occupied cells that the 3x3 block is scanned slot by slot.
        let mut crowded = vec![Sample::new(9.3e18, 0.0), Sample::new(-9.3e18, 0.0)];
        crowded.extend((0..12).map(|i| Sample::new(i as f64 * 10.0, 0.0)));
        let index = GridIndex::build(&crowded, 1.0);
        assert!(index.occupied_cells() > 9);
        assert_eq!(index.neighbors(&crowded, 0, 1.0), vec![0]);
        assert_eq!(index.neighbors(&crowded, 1, 1.0), vec![1]);
    }
}
