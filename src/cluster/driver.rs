//! Externally driven iteration: one call, one algorithm step.
//!
//! An [`Engine`] owns the center sequence, the inertia history, and the random
//! source of a run. The caller owns the samples and lends them to each call.
//!
//! ```text
//! Uninitialized --step (changed)--> Running --step (changed)--> Running
//!       |                              |
//!       +------step (fixed point)------+--> Converged --step--> Converged (no-op)
//!
//! reset / set_k / set_algorithm / ...  --> Uninitialized
//! ```

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::assign::assign;
use super::dbscan::Dbscan;
use super::evaluation::{cluster_metrics, elbow_sweep, inertia, ClusterMetrics, ElbowPoint, InertiaHistory};
use super::geometry::{clear_labels, Center, Sample};
use super::kmeans::{draw_seeds, MeanUpdate};
use super::kmedoids::MedoidUpdate;
use super::traits::CenterUpdate;
use crate::config::EngineConfig;
use crate::error::{Error, Result};

/// Clustering algorithm advanced by [`Engine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Lloyd's k-means with exact mean updates.
    #[default]
    #[serde(alias = "kmeans")]
    KMeans,
    /// Approximate PAM with sampled medoid candidates.
    #[serde(alias = "kmedoids")]
    KMedoids,
    /// One-shot density clustering.
    Dbscan,
}

impl Algorithm {
    /// True for the algorithms that maintain a center sequence.
    pub fn uses_centers(self) -> bool {
        !matches!(self, Algorithm::Dbscan)
    }
}

/// Where a run is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Uninitialized,
    Running,
    Converged,
}

/// What a single [`Engine::step`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Labels changed; the run continues.
    Stepped { iteration: usize, inertia: f64 },
    /// This step reached a fixed point (or finished a one-shot DBSCAN pass).
    /// `inertia` is `None` when the algorithm has no centers or there was no data.
    Converged { iteration: usize, inertia: Option<f64> },
    /// The run had already converged; nothing was touched.
    AlreadyConverged,
}

impl StepOutcome {
    pub fn is_converged(&self) -> bool {
        !matches!(self, StepOutcome::Stepped { .. })
    }
}

/// Stepwise clustering engine.
#[derive(Debug)]
pub struct Engine<R = ChaCha8Rng> {
    config: EngineConfig,
    rng: R,
    centers: Vec<Center>,
    history: InertiaHistory,
    iterations: usize,
    state: RunState,
    clusters: usize,
}

impl Engine<ChaCha8Rng> {
    /// Engine with a `ChaCha8Rng` seeded from `config.seed`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RngCore> Engine<R> {
    /// Engine drawing all randomness (seeds, medoid candidates, reseeding) from `rng`.
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let history = InertiaHistory::new(config.history_capacity);
        Ok(Self {
            config,
            rng,
            centers: Vec::new(),
            history,
            iterations: 0,
            state: RunState::Uninitialized,
            clusters: 0,
        })
    }

    /// Start a fresh run: clear every label, drop the history, and draw new
    /// seed centers from `samples` (none for DBSCAN or an empty dataset).
    pub fn reset(&mut self, samples: &mut [Sample]) {
        let seeds = if self.config.algorithm.uses_centers() {
            draw_seeds(samples, self.config.k, self.config.seeding, &mut self.rng)
        } else {
            Vec::new()
        };
        self.reset_state(samples, seeds);
    }

    /// Start a fresh run from caller-chosen centers.
    ///
    /// Lets two engines start from identical positions. For k-medoids the seeds
    /// should be sample positions. Ignored for DBSCAN.
    ///
    /// # Errors
    ///
    /// [`Error::SeedCountMismatch`] if `seeds.len() != k` for a center-based algorithm.
    pub fn reset_with_centers(&mut self, samples: &mut [Sample], seeds: &[Center]) -> Result<()> {
        if !self.config.algorithm.uses_centers() {
            self.reset_state(samples, Vec::new());
            return Ok(());
        }
        if seeds.len() != self.config.k {
            return Err(Error::SeedCountMismatch {
                expected: self.config.k,
                found: seeds.len(),
            });
        }
        self.reset_state(samples, seeds.to_vec());
        Ok(())
    }

    fn reset_state(&mut self, samples: &mut [Sample], centers: Vec<Center>) {
        clear_labels(samples);
        self.centers = centers;
        self.history.clear();
        self.iterations = 0;
        self.clusters = 0;
        self.state = RunState::Uninitialized;
        info!(
            algorithm = ?self.config.algorithm,
            k = self.config.k,
            n = samples.len(),
            "run reset"
        );
    }

    /// Change the cluster count and reset.
    pub fn set_k(&mut self, k: usize, samples: &mut [Sample]) -> Result<()> {
        self.reconfigure(self.config.clone().with_k(k), samples)
    }

    /// Switch algorithms and reset.
    pub fn set_algorithm(&mut self, algorithm: Algorithm, samples: &mut [Sample]) -> Result<()> {
        self.reconfigure(self.config.clone().with_algorithm(algorithm), samples)
    }

    /// Change the DBSCAN parameters and reset.
    pub fn set_dbscan_params(
        &mut self,
        eps: f64,
        min_samples: usize,
        samples: &mut [Sample],
    ) -> Result<()> {
        self.reconfigure(self.config.clone().with_dbscan(eps, min_samples), samples)
    }

    /// Change the medoid candidate limit and reset.
    pub fn set_candidate_limit(&mut self, limit: usize, samples: &mut [Sample]) -> Result<()> {
        self.reconfigure(self.config.clone().with_candidate_limit(limit), samples)
    }

    fn reconfigure(&mut self, config: EngineConfig, samples: &mut [Sample]) -> Result<()> {
        config.validate()?;
        if config.history_capacity != self.history.capacity() {
            self.history = InertiaHistory::new(config.history_capacity);
        }
        self.config = config;
        self.reset(samples);
        Ok(())
    }

    /// Advance the run by one step.
    ///
    /// k-means / k-medoids: one assignment pass, one center update, one inertia
    /// value appended to the history. The run converges the first time
    /// assignment changes nothing. DBSCAN runs to completion in a single step.
    /// Once converged, further calls return [`StepOutcome::AlreadyConverged`]
    /// without touching labels or centers.
    pub fn step(&mut self, samples: &mut [Sample]) -> Result<StepOutcome> {
        if self.state == RunState::Converged {
            return Ok(StepOutcome::AlreadyConverged);
        }

        if samples.is_empty() {
            self.state = RunState::Converged;
            return Ok(StepOutcome::Converged {
                iteration: self.iterations,
                inertia: None,
            });
        }

        if !self.config.algorithm.uses_centers() {
            let dbscan = Dbscan::new(self.config.eps, self.config.min_samples);
            self.clusters = dbscan.run(samples)?;
            self.iterations += 1;
            self.state = RunState::Converged;
            info!(clusters = self.clusters, "density clustering finished");
            return Ok(StepOutcome::Converged {
                iteration: self.iterations,
                inertia: None,
            });
        }

        // The dataset was empty at reset time.
        if self.centers.is_empty() {
            self.centers = draw_seeds(samples, self.config.k, self.config.seeding, &mut self.rng);
        }

        self.state = RunState::Running;
        let changed = assign(samples, &self.centers)?;
        self.update_centers(samples);

        let value = inertia(samples, &self.centers);
        self.history.push(value);
        self.iterations += 1;
        debug!(iteration = self.iterations, changed, inertia = value, "step");

        if changed {
            return Ok(StepOutcome::Stepped {
                iteration: self.iterations,
                inertia: value,
            });
        }

        self.state = RunState::Converged;
        info!(iterations = self.iterations, inertia = value, "converged");
        Ok(StepOutcome::Converged {
            iteration: self.iterations,
            inertia: Some(value),
        })
    }

    fn update_centers(&mut self, samples: &[Sample]) {
        match self.config.algorithm {
            Algorithm::KMeans => MeanUpdate.update(samples, &mut self.centers, &mut self.rng),
            Algorithm::KMedoids => MedoidUpdate::new(self.config.candidate_limit).update(
                samples,
                &mut self.centers,
                &mut self.rng,
            ),
            Algorithm::Dbscan => {}
        }
    }

    /// Step until converged or `max_steps` steps have been taken; returns the
    /// number of steps taken by this call.
    pub fn run_to_convergence(&mut self, samples: &mut [Sample], max_steps: usize) -> Result<usize> {
        let mut taken = 0;
        while taken < max_steps {
            let outcome = self.step(samples)?;
            if matches!(outcome, StepOutcome::AlreadyConverged) {
                break;
            }
            taken += 1;
            if outcome.is_converged() {
                break;
            }
        }
        Ok(taken)
    }

    /// Inertia of the current labels against the current centers (0 for DBSCAN).
    pub fn inertia(&self, samples: &[Sample]) -> f64 {
        inertia(samples, &self.centers)
    }

    /// Per-cluster statistics for the current run (empty for DBSCAN).
    pub fn metrics(&self, samples: &[Sample]) -> Vec<ClusterMetrics> {
        cluster_metrics(samples, &self.centers)
    }

    /// Elbow sweep over `1..=k_max` using the engine's random source.
    /// Leaves the samples and the current run untouched.
    pub fn elbow(&mut self, samples: &[Sample], k_max: usize) -> Result<Vec<ElbowPoint>> {
        elbow_sweep(samples, 1, k_max, &mut self.rng)
    }

    pub fn centers(&self) -> &[Center] {
        &self.centers
    }

    pub fn history(&self) -> &InertiaHistory {
        &self.history
    }

    /// Steps taken since the last reset.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_converged(&self) -> bool {
        self.state == RunState::Converged
    }

    /// Clusters found by the last DBSCAN step (0 otherwise).
    pub fn cluster_count(&self) -> usize {
        self.clusters
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
