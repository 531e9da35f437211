//! Nearest-center assignment shared by k-means and k-medoids.

use super::geometry::{squared_distance, Center, Label, Sample};
use crate::error::{Error, Result};

/// Index and squared distance of the center closest to `(x, y)`.
///
/// Ties go to the lowest index: a later center must be strictly closer to win.
/// Returns `None` only for an empty center slice.
#[inline]
pub fn nearest_center(x: f64, y: f64, centers: &[Center]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, center) in centers.iter().enumerate() {
        let d = squared_distance(x, y, center.x, center.y);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((idx, d)),
        }
    }
    best
}

/// Label every sample with its nearest center.
///
/// All samples see the same `centers` snapshot. Returns `true` iff at least one
/// label changed; `false` means the configuration is a fixed point. A sample
/// whose label changes keeps the old one in `previous_label`.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`] if `centers` is empty.
pub fn assign(samples: &mut [Sample], centers: &[Center]) -> Result<bool> {
    if centers.is_empty() {
        return Err(Error::config("centers", "at least one center is required"));
    }

    let mut changed = false;
    for sample in samples.iter_mut() {
        let Some((closest, _)) = nearest_center(sample.x, sample.y, centers) else {
            continue;
        };
        let label = Label::Cluster(closest);
        if sample.label != label {
            sample.previous_label = sample.label;
            sample.label = label;
            changed = true;
        }
    }
    Ok(changed)
}
