//! K-means, K-medoids and DBSCAN on generated 2D blobs, plus an elbow sweep.
//!
//! Run with `RUST_LOG=debug` to see per-step tracing output.

use clump_sandbox::cluster::{elbow_k, noise_count, Algorithm, Engine, StepOutcome};
use clump_sandbox::datasets::{blobs, Bounds};
use clump_sandbox::EngineConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut samples = blobs(150, 3, 30.0, Bounds::default(), &mut rng);

    for algorithm in [Algorithm::KMeans, Algorithm::KMedoids] {
        let mut engine = Engine::new(EngineConfig::new(algorithm, 3).with_seed(7))?;
        engine.reset(&mut samples);

        println!("=== {algorithm:?} (k=3) ===");
        loop {
            match engine.step(&mut samples)? {
                StepOutcome::Stepped { iteration, inertia } => {
                    println!("  step {iteration:2}: inertia {inertia:12.2}");
                }
                StepOutcome::Converged { iteration, inertia } => {
                    println!("  converged after {iteration} steps, inertia {:.2}", inertia.unwrap_or(0.0));
                    break;
                }
                StepOutcome::AlreadyConverged => break,
            }
        }
        for m in engine.metrics(&samples) {
            println!(
                "  cluster {}: {:3} points, avg distance {:6.2}, compactness {:.4}",
                m.cluster, m.size, m.avg_distance, m.compactness
            );
        }
    }

    let config = EngineConfig::new(Algorithm::Dbscan, 1).with_dbscan(25.0, 5);
    let mut engine = Engine::new(config)?;
    engine.reset(&mut samples);
    engine.step(&mut samples)?;
    println!("\n=== DBSCAN (eps=25, min_samples=5) ===");
    println!(
        "  {} clusters, {} noise points",
        engine.cluster_count(),
        noise_count(&samples)
    );

    let curve = engine.elbow(&samples, 8)?;
    println!("\n=== Elbow sweep ===");
    for point in &curve {
        println!("  k={}: {:12.2}", point.k, point.inertia);
    }
    if let Some(k) = elbow_k(&curve) {
        println!("  suggested k = {k}");
    }

    Ok(())
}
