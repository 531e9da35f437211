//! Points, centers, and labels in the plane.

use serde::{Deserialize, Serialize};

/// Cluster membership of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Label {
    /// Not yet assigned (fresh data, or after a reset).
    #[default]
    Unassigned,
    /// Density clustering found the sample in no dense region.
    Noise,
    /// Member of the cluster with this id.
    Cluster(usize),
}

impl Label {
    /// The cluster id, if the sample belongs to a cluster.
    #[inline]
    pub fn id(self) -> Option<usize> {
        match self {
            Label::Cluster(id) => Some(id),
            _ => None,
        }
    }

    /// True for density-clustering noise.
    #[inline]
    pub fn is_noise(self) -> bool {
        self == Label::Noise
    }

    /// True if the sample has no label at all.
    #[inline]
    pub fn is_unassigned(self) -> bool {
        self == Label::Unassigned
    }

    /// Flat integer encoding used in exported records: `-1` for noise,
    /// the id for clusters, nothing for unassigned samples.
    pub fn to_i64(self) -> Option<i64> {
        match self {
            Label::Unassigned => None,
            Label::Noise => Some(-1),
            Label::Cluster(id) => Some(id as i64),
        }
    }

    /// Inverse of [`Label::to_i64`]. Any negative value decodes as noise.
    pub fn from_i64(value: Option<i64>) -> Self {
        match value {
            None => Label::Unassigned,
            Some(v) if v < 0 => Label::Noise,
            Some(v) => Label::Cluster(v as usize),
        }
    }
}

/// Anything with a position in the plane.
pub trait Position {
    /// Horizontal coordinate.
    fn x(&self) -> f64;
    /// Vertical coordinate.
    fn y(&self) -> f64;
}

/// A data point together with its (mutable) cluster label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    /// Current label. The engine only ever writes this field and `previous_label`.
    pub label: Label,
    /// Label held before the most recent change made by assignment.
    pub previous_label: Label,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            label: Label::Unassigned,
            previous_label: Label::Unassigned,
        }
    }

    /// Forget both the current and the previous label.
    pub fn clear_label(&mut self) {
        self.label = Label::Unassigned;
        self.previous_label = Label::Unassigned;
    }

    #[inline]
    pub fn distance_squared_to(&self, other: &impl Position) -> f64 {
        squared_distance(self.x, self.y, other.x(), other.y())
    }
}

impl Position for Sample {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    fn y(&self) -> f64 {
        self.y
    }
}

impl From<(f64, f64)> for Sample {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A cluster representative. Its index in the center sequence is its cluster id.
///
/// Centroids (k-means) may sit anywhere; medoids (k-medoids) always coincide
/// with a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub x: f64,
    pub y: f64,
}

impl Center {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A center placed exactly on a sample.
    pub fn from_sample(sample: &Sample) -> Self {
        Self::new(sample.x, sample.y)
    }

    #[inline]
    pub fn coincides_with(&self, sample: &Sample) -> bool {
        self.x == sample.x && self.y == sample.y
    }
}

impl Position for Center {
    #[inline]
    fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    fn y(&self) -> f64 {
        self.y
    }
}

#[inline]
pub fn squared_distance(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

/// Reset every sample to [`Label::Unassigned`].
pub fn clear_labels(samples: &mut [Sample]) {
    for sample in samples {
        sample.clear_label();
    }
}

/// Snapshot of the current labels, in sample order.
pub fn labels(samples: &[Sample]) -> Vec<Label> {
    samples.iter().map(|s| s.label).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_flat_encoding() {
        assert_eq!(Label::Unassigned.to_i64(), None);
        assert_eq!(Label::Noise.to_i64(), Some(-1));
        assert_eq!(Label::Cluster(3).to_i64(), Some(3));

        assert_eq!(Label::from_i64(None), Label::Unassigned);
        assert_eq!(Label::from_i64(Some(-7)), Label::Noise);
        assert_eq!(Label::from_i64(Some(2)), Label::Cluster(2));
    }

    #[test]
    fn squared_distance_is_exact_for_small_integers() {
        let s = Sample::new(1.0, 2.0);
        let c = Center::new(4.0, 6.0);
        assert_eq!(s.distance_squared_to(&c), 25.0);
        assert_eq!(squared_distance(0.0, 0.0, -3.0, 4.0), 25.0);
    }

    #[test]
    fn clear_labels_resets_previous_too() {
        let mut samples = vec![Sample::new(0.0, 0.0), Sample::new(1.0, 1.0)];
        samples[0].label = Label::Cluster(1);
        samples[0].previous_label = Label::Cluster(0);
        samples[1].label = Label::Noise;

        clear_labels(&mut samples);

        assert!(samples.iter().all(|s| s.label.is_unassigned()));
        assert!(samples.iter().all(|s| s.previous_label.is_unassigned()));
    }
}
