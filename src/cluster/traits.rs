use rand::RngCore;

use super::geometry::{Center, Sample};

/// Moves centers after an assignment pass.
///
/// Implementations read the current labels and write new center positions in
/// place. The number and order of centers never change.
pub trait CenterUpdate {
    /// Recompute `centers` from the labeled `samples`.
    ///
    /// Randomized strategies draw from `rng` only.
    fn update(&self, samples: &[Sample], centers: &mut [Center], rng: &mut dyn RngCore);
}
