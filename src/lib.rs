//! Stepwise 2-D clustering engine.
//!
//! `clump_sandbox` drives K-means, K-medoids (approximate PAM) and DBSCAN over a
//! caller-owned point set one step at a time, and provides the diagnostics an
//! interactive front end needs: inertia history, elbow sweeps, and per-cluster
//! metrics.
//!
//! The primary API is under [`cluster`]. [`datasets`] generates synthetic point
//! sets and [`io`] reads and writes flat `x,y[,cluster]` files.
//!
//! All randomness flows through an injected [`rand::Rng`], so seeded runs are
//! reproducible.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod datasets;
pub mod error;
pub mod io;

pub use cluster::{
    assign, dbscan, elbow_sweep, inertia, update_means, update_medoids, Algorithm, Center,
    Dbscan, ElbowPoint, Engine, InertiaHistory, Label, Sample, StepOutcome,
};
pub use config::{EngineConfig, Seeding};
pub use error::{Error, Result};
