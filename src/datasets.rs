//! Synthetic point sets for experimenting with the clustering algorithms.
//!
//! Every generator draws from the supplied random source and keeps its points
//! inside a [`Bounds`] rectangle.

use std::f64::consts::{PI, TAU};

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::cluster::Sample;

/// Axis-aligned rectangle that generated points are clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: min_x.max(max_x),
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (x.clamp(self.min_x, self.max_x), y.clamp(self.min_y, self.max_y))
    }

    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        (
            uniform_in(rng, self.min_x, self.max_x),
            uniform_in(rng, self.min_y, self.max_y),
        )
    }
}

impl Default for Bounds {
    /// The play area of the sandbox's default window.
    fn default() -> Self {
        Self::new(80.0, 1120.0, 80.0, 640.0)
    }
}

fn uniform_in<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

fn polar(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.cos(), cy + radius * angle.sin())
}

/// `n` points spread uniformly over `bounds`.
pub fn uniform<R: Rng + ?Sized>(n: usize, bounds: Bounds, rng: &mut R) -> Vec<Sample> {
    (0..n)
        .map(|_| Sample::from(bounds.random_point(rng)))
        .collect()
}

/// `n` uniform points kept at least `min_dist` apart where possible.
///
/// Each point gets `max_tries` attempts; if none satisfies the spacing, the last
/// attempt is kept so the result always has exactly `n` points.
pub fn spaced_random<R: Rng + ?Sized>(
    n: usize,
    min_dist: f64,
    max_tries: usize,
    bounds: Bounds,
    rng: &mut R,
) -> Vec<Sample> {
    let min_dist_sq = min_dist * min_dist;
    let mut points: Vec<Sample> = Vec::with_capacity(n);

    for _ in 0..n {
        let mut candidate = bounds.random_point(rng);
        for _ in 0..max_tries {
            let (x, y) = candidate;
            let clear = points.iter().all(|p| {
                let (dx, dy) = (p.x - x, p.y - y);
                dx * dx + dy * dy >= min_dist_sq
            });
            if clear {
                break;
            }
            candidate = bounds.random_point(rng);
        }
        points.push(Sample::from(candidate));
    }

    points
}

/// `centers` Gaussian blobs with radial standard deviation `spread`, padded with
/// uniform points when `n` does not divide evenly.
pub fn blobs<R: Rng + ?Sized>(
    n: usize,
    centers: usize,
    spread: f64,
    bounds: Bounds,
    rng: &mut R,
) -> Vec<Sample> {
    let centers = centers.max(1);
    let per_cluster = (n / centers).max(1);
    let spread = if spread.is_finite() { spread.abs() } else { 0.0 };
    let radius = Normal::new(0.0, spread).ok();

    // Keep blob centers away from the edges so most of each blob fits.
    let pad_x = (bounds.width() * 0.15).min(2.0 * spread);
    let pad_y = (bounds.height() * 0.15).min(2.0 * spread);

    let mut points = Vec::with_capacity(n.max(centers * per_cluster));
    for _ in 0..centers {
        let cx = uniform_in(rng, bounds.min_x + pad_x, bounds.max_x - pad_x);
        let cy = uniform_in(rng, bounds.min_y + pad_y, bounds.max_y - pad_y);
        for _ in 0..per_cluster {
            let angle = rng.random_range(0.0..TAU);
            let r = radius.as_ref().map_or(0.0, |d| d.sample(rng));
            let (x, y) = polar(cx, cy, r, angle);
            points.push(Sample::from(bounds.clamp(x, y)));
        }
    }
    while points.len() < n {
        points.push(Sample::from(bounds.random_point(rng)));
    }
    points
}

/// Two interleaved half rings.
pub fn moons<R: Rng + ?Sized>(n: usize, bounds: Bounds, rng: &mut R) -> Vec<Sample> {
    let (cx, cy) = bounds.center();
    let scale = (bounds.width().min(bounds.height()) / 560.0).max(f64::EPSILON);
    let half = n / 2;

    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let (ox, oy, start) = if i < half {
            (cx - 150.0 * scale, cy - 120.0 * scale, 0.0)
        } else {
            (cx + 150.0 * scale, cy + 30.0 * scale, PI)
        };
        let angle = rng.random_range(start..start + PI);
        let r = rng.random_range(60.0..100.0) * scale;
        let (x, y) = polar(ox, oy, r, angle);
        points.push(Sample::from(bounds.clamp(x, y)));
    }
    points
}

/// A small disc inside a wider ring; one third of the points form the disc.
pub fn circles<R: Rng + ?Sized>(n: usize, bounds: Bounds, rng: &mut R) -> Vec<Sample> {
    let (cx, cy) = bounds.center();
    let scale = (bounds.width().min(bounds.height()) / 560.0).max(f64::EPSILON);
    let inner = n / 3;

    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let (lo, hi) = if i < inner { (30.0, 70.0) } else { (120.0, 180.0) };
        let angle = rng.random_range(0.0..TAU);
        let r = rng.random_range(lo..hi) * scale;
        let (x, y) = polar(cx, cy, r, angle);
        points.push(Sample::from(bounds.clamp(x, y)));
    }
    points
}
