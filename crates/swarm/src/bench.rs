//! # Tick Benchmark
//!
//! Builds a [`World`], fills it with a seeded population and times a fixed
//! number of move + damage ticks.

use std::time::{Duration, Instant};

use swarm_core::{SimdBackend, SwarmConfig, SwarmResult, World};
use tracing::info;

use crate::population::Populator;

/// Benchmark parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchConfig {
    /// Entities to spawn before timing starts.
    pub entities: usize,
    /// Ticks to time.
    pub iters: usize,
    /// Time step passed to the move system.
    pub dt: f32,
    /// Population seed.
    pub seed: u64,
    /// Engine settings.
    pub swarm: SwarmConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            entities: 1_000_000,
            iters: 50,
            dt: 1.0,
            seed: Populator::DEFAULT_SEED,
            swarm: SwarmConfig::default(),
        }
    }
}

/// Result of one benchmark run.
#[derive(Clone, Debug)]
pub struct BenchReport {
    /// Entities stored.
    pub entities: usize,
    /// Chunks allocated for them.
    pub chunks: usize,
    /// Ticks timed.
    pub iters: usize,
    /// Kernel backend in use.
    pub backend: SimdBackend,
    /// Worker threads in use.
    pub workers: usize,
    /// Time spent spawning the population.
    pub populate_time: Duration,
    /// Time spent in all timed ticks.
    pub total_time: Duration,
}

impl BenchReport {
    /// Average wall time of one tick. Zero when no tick ran.
    #[must_use]
    pub fn per_iter(&self) -> Duration {
        match u32::try_from(self.iters) {
            Ok(0) => Duration::ZERO,
            Ok(iters) => self.total_time / iters,
            Err(_) => Duration::from_secs_f64(self.total_time.as_secs_f64() / self.iters as f64),
        }
    }

    /// Entity updates per second across all ticks.
    #[must_use]
    pub fn entity_updates_per_sec(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs > 0.0 {
            (self.entities as f64 * self.iters as f64) / secs
        } else {
            0.0
        }
    }
}

/// Runs the benchmark described by `config`.
///
/// # Errors
///
/// Returns any error from building the world or allocating chunks.
pub fn run_bench(config: &BenchConfig) -> SwarmResult<BenchReport> {
    let mut world = World::new(&config.swarm)?;
    let mut populator = Populator::new(config.seed);

    let start = Instant::now();
    populator.populate_world(&mut world, config.entities)?;
    let populate_time = start.elapsed();

    info!(
        entities = world.len(),
        chunks = world.archetype().num_chunks(),
        elapsed_ms = populate_time.as_millis() as u64,
        "population ready"
    );

    let start = Instant::now();
    for _ in 0..config.iters {
        world.tick(config.dt);
    }
    let total_time = start.elapsed();

    info!(
        iters = config.iters,
        elapsed_ms = total_time.as_millis() as u64,
        "ticks complete"
    );

    Ok(BenchReport {
        entities: world.len(),
        chunks: world.archetype().num_chunks(),
        iters: config.iters,
        backend: world.executor().backend(),
        workers: world.executor().worker_count(),
        populate_time,
        total_time,
    })
}
