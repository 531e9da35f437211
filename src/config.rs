use serde::{Deserialize, Serialize};

use crate::cluster::Algorithm;
use crate::error::{Error, Result};

/// How a fresh run picks its initial centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Seeding {
    /// Uniformly random samples, distinct whenever the dataset is large enough.
    #[default]
    Random,
    /// D²-weighted sampling (k-means++).
    #[serde(alias = "kmeans++", alias = "k-means++")]
    PlusPlus,
}

/// Configuration for an [`Engine`](crate::cluster::Engine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Algorithm advanced by each step.
    pub algorithm: Algorithm,

    /// Number of centers for k-means / k-medoids.
    pub k: usize,

    /// Maximum number of medoid candidates evaluated per cluster.
    pub candidate_limit: usize,

    /// DBSCAN neighborhood radius (clamped to at least 1 when used).
    pub eps: f64,

    /// DBSCAN core-point threshold, counting the point itself (clamped to at least 1).
    pub min_samples: usize,

    /// Number of inertia values retained per run.
    pub history_capacity: usize,

    /// Initial center selection.
    pub seeding: Seeding,

    /// Seed for the engine's random source.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::KMeans,
            k: 3,
            candidate_limit: 25,
            eps: 45.0,
            min_samples: 5,
            history_capacity: 100,
            seeding: Seeding::Random,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with the given algorithm and cluster count.
    pub fn new(algorithm: Algorithm, k: usize) -> Self {
        Self {
            algorithm,
            k,
            ..Default::default()
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_candidate_limit(mut self, candidate_limit: usize) -> Self {
        self.candidate_limit = candidate_limit;
        self
    }

    /// Set the DBSCAN radius and core threshold together.
    pub fn with_dbscan(mut self, eps: f64, min_samples: usize) -> Self {
        self.eps = eps;
        self.min_samples = min_samples;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject values no run can proceed with.
    ///
    /// DBSCAN parameters are clamped rather than rejected, except for a
    /// non-finite radius.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::config("k", "must be at least 1"));
        }
        if self.candidate_limit == 0 {
            return Err(Error::config("candidate_limit", "must be at least 1"));
        }
        if self.history_capacity == 0 {
            return Err(Error::config("history_capacity", "must be at least 1"));
        }
        if !self.eps.is_finite() {
            return Err(Error::config("eps", "must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_sandbox() {
        let config = EngineConfig::default();
        assert_eq!(config.algorithm, Algorithm::KMeans);
        assert_eq!(config.k, 3);
        assert_eq!(config.candidate_limit, 25);
        assert_eq!(config.min_samples, 5);
        assert_eq!(config.history_capacity, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_k_is_rejected() {
        let config = EngineConfig::new(Algorithm::KMedoids, 0);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { name: "k", .. })
        ));
    }

    #[test]
    fn nan_eps_is_rejected() {
        let config = EngineConfig::default().with_dbscan(f64::NAN, 4);
        assert!(config.validate().is_err());
    }

    #[test]
    fn builder_chains() {
        let config = EngineConfig::default()
            .with_algorithm(Algorithm::Dbscan)
            .with_k(7)
            .with_candidate_limit(10)
            .with_dbscan(12.0, 4)
            .with_history_capacity(5)
            .with_seeding(Seeding::PlusPlus)
            .with_seed(9);
        assert_eq!(config.algorithm, Algorithm::Dbscan);
        assert_eq!(config.k, 7);
        assert_eq!(config.candidate_limit, 10);
        assert_eq!(config.eps, 12.0);
        assert_eq!(config.min_samples, 4);
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.seeding, Seeding::PlusPlus);
        assert_eq!(config.seed, 9);
    }
}
