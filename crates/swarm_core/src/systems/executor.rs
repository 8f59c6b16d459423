//! # System Executor
//!
//! Runs the move and damage systems over every chunk of an archetype.
//!
//! ```text
//! chunks:   [C0 C1 C2 | C3 C4 C5 | C6 C7 C8 | C9 C10]    4 workers
//!            worker 0   worker 1   worker 2   worker 3
//! ```
//!
//! Chunks are split into contiguous ranges of `ceil(chunks / workers)`, one
//! task per range. Within a chunk the bound kernels run vector groups and a
//! scalar remainder. A pass returns only after every range is done, so passes
//! never overlap.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::OnceLock;
use tracing::info;

use super::backend::SimdBackend;
use super::kernels::Kernels;
use crate::config::ExecutorConfig;
use crate::ecs::{Archetype, Chunk};
use crate::error::{SwarmError, SwarmResult};

/// Owns a worker pool and a kernel table.
///
/// # Example
///
/// ```rust,ignore
/// let executor = Executor::new(&ExecutorConfig::default())?;
/// for _ in 0..ticks {
///     executor.tick(&mut archetype, 1.0);
/// }
/// ```
pub struct Executor {
    /// Dedicated workers for chunk tasks.
    pool: ThreadPool,
    /// Kernels chosen at construction.
    kernels: Kernels,
    /// Number of workers in `pool`.
    worker_count: usize,
}

impl Executor {
    /// Builds an executor from validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfig`] for out-of-range settings,
    /// [`SwarmError::UnsupportedBackend`] if the selected backend cannot run,
    /// and [`SwarmError::ThreadPool`] if the workers cannot be spawned.
    pub fn new(config: &ExecutorConfig) -> SwarmResult<Self> {
        config.validate()?;
        let backend = SimdBackend::select(config.vector_width, config.allow_intrinsics)?;
        let kernels = Kernels::new(backend)?;
        Self::with_kernels(kernels, config.resolved_worker_count())
    }

    /// Builds an executor around explicit kernels.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfig`] if `worker_count` is zero and
    /// [`SwarmError::ThreadPool`] if the workers cannot be spawned.
    pub fn with_kernels(kernels: Kernels, worker_count: usize) -> SwarmResult<Self> {
        if worker_count == 0 {
            return Err(SwarmError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("swarm-worker-{i}"))
            .build()
            .map_err(|e| SwarmError::ThreadPool(e.to_string()))?;

        info!(
            backend = %kernels.backend(),
            workers = worker_count,
            "system executor ready"
        );

        Ok(Self {
            pool,
            kernels,
            worker_count,
        })
    }

    /// Returns the kernel backend in use.
    #[inline]
    #[must_use]
    pub const fn backend(&self) -> SimdBackend {
        self.kernels.backend()
    }

    /// Returns the number of workers.
    #[inline]
    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Integrates every position by its velocity over `dt`.
    pub fn run_move(&self, archetype: &mut Archetype, dt: f32) {
        let kernels = self.kernels;
        self.pool.install(|| {
            for_each_chunk(archetype, self.worker_count, |chunk| {
                kernels.move_chunk(chunk, dt);
            });
        });
    }

    /// Decays every health value by one, floored at zero.
    pub fn run_damage(&self, archetype: &mut Archetype) {
        let kernels = self.kernels;
        self.pool.install(|| {
            for_each_chunk(archetype, self.worker_count, |chunk| {
                kernels.damage_chunk(chunk);
            });
        });
    }

    /// One simulation tick: move, then damage.
    pub fn tick(&self, archetype: &mut Archetype, dt: f32) {
        self.run_move(archetype, dt);
        self.run_damage(archetype);
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("kernels", &self.kernels)
            .field("worker_count", &self.worker_count)
            .finish_non_exhaustive()
    }
}

/// Applies `f` to every chunk, one task per contiguous range of chunks.
///
/// Runs on whichever rayon pool is current and returns once all tasks finish.
fn for_each_chunk<F>(archetype: &mut Archetype, workers: usize, f: F)
where
    F: Fn(&mut Chunk) + Send + Sync,
{
    let chunks = archetype.chunks_mut();
    if chunks.is_empty() {
        return;
    }

    let per_task = chunks.len().div_ceil(workers.max(1));
    chunks
        .par_chunks_mut(per_task)
        .for_each(|range| range.iter_mut().for_each(&f));
}

/// Kernels for the free-function entry points, detected on first use.
fn default_kernels() -> Kernels {
    static KERNELS: OnceLock<Kernels> = OnceLock::new();
    *KERNELS.get_or_init(Kernels::detect)
}

/// Integrates every position of `archetype` by its velocity over `dt`, using
/// the global rayon pool and the best kernels for this CPU.
pub fn run_move(archetype: &mut Archetype, dt: f32) {
    let kernels = default_kernels();
    for_each_chunk(archetype, rayon::current_num_threads(), |chunk| {
        kernels.move_chunk(chunk, dt);
    });
}

/// Decays every health value of `archetype` by one, floored at zero, using
/// the global rayon pool and the best kernels for this CPU.
pub fn run_damage(archetype: &mut Archetype) {
    let kernels = default_kernels();
    for_each_chunk(archetype, rayon::current_num_threads(), |chunk| {
        kernels.damage_chunk(chunk);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{EntityIdAllocator, Position, Velocity};

    fn build(n: usize, chunk_capacity: usize) -> Archetype {
        let mut ids = EntityIdAllocator::new();
        let mut archetype = Archetype::with_chunk_capacity(4, chunk_capacity);
        for i in 0..n {
            let f = i as f32;
            archetype
                .add_entity(
                    ids.create(),
                    Position::new(f * 0.5, -f),
                    Velocity::new(0.01 * f, 1.0 - 0.02 * f),
                    (i % 7) as i32,
                )
                .unwrap();
        }
        archetype
    }

    fn executor(backend: SimdBackend, workers: usize) -> Executor {
        Executor::with_kernels(Kernels::new(backend).unwrap(), workers).unwrap()
    }

    #[test]
    fn test_move_single_entity() {
        let mut archetype = Archetype::with_chunk_capacity(1, 4);
        archetype
            .add_entity(
                EntityIdAllocator::new().create(),
                Position::new(0.0, 0.0),
                Velocity::new(2.0, 3.0),
                10,
            )
            .unwrap();

        executor(SimdBackend::Scalar, 1).run_move(&mut archetype, 1.0);

        let row = archetype.iter_rows().next().unwrap();
        assert_eq!(row.position, Position::new(2.0, 3.0));
        assert_eq!(row.health, 10);
    }

    #[test]
    fn test_damage_to_floor() {
        let mut archetype = Archetype::with_chunk_capacity(1, 4);
        archetype
            .add_entity(
                EntityIdAllocator::new().create(),
                Position::default(),
                Velocity::default(),
                3,
            )
            .unwrap();

        let exec = executor(SimdBackend::detect(), 2);
        for _ in 0..5 {
            exec.run_damage(&mut archetype);
            assert!(archetype.chunks()[0].health()[0] >= 0);
        }
        assert_eq!(archetype.chunks()[0].health()[0], 0);
    }

    #[test]
    fn test_results_independent_of_workers_and_backend() {
        let mut reference = build(1_000, 64);
        let scalar = executor(SimdBackend::Scalar, 1);
        for _ in 0..3 {
            scalar.tick(&mut reference, 0.25);
        }
        let expected: Vec<_> = reference.iter_rows().collect();

        for backend in SimdBackend::available() {
            for workers in [1, 2, 3, 8] {
                let mut archetype = build(1_000, 64);
                let exec = executor(backend, workers);
                for _ in 0..3 {
                    exec.tick(&mut archetype, 0.25);
                }
                let actual: Vec<_> = archetype.iter_rows().collect();
                assert_eq!(expected, actual, "{backend} with {workers} workers");
            }
        }
    }

    #[test]
    fn test_empty_archetype_is_a_no_op() {
        let mut archetype = Archetype::new(0);
        executor(SimdBackend::Lanes8, 4).tick(&mut archetype, 1.0);
        run_move(&mut archetype, 1.0);
        run_damage(&mut archetype);
        assert!(archetype.is_empty());
    }

    #[test]
    fn test_free_functions_match_executor() {
        let mut a = build(300, 16);
        let mut b = build(300, 16);

        run_move(&mut a, 0.5);
        run_damage(&mut a);
        executor(SimdBackend::Scalar, 1).tick(&mut b, 0.5);

        assert!(a.iter_rows().eq(b.iter_rows()));
    }

    #[test]
    fn test_new_from_config() {
        let config = ExecutorConfig {
            vector_width: 4,
            allow_intrinsics: false,
            worker_count: Some(2),
        };
        let exec = Executor::new(&config).unwrap();
        assert_eq!(exec.backend(), SimdBackend::Lanes4);
        assert_eq!(exec.worker_count(), 2);

        assert!(Executor::with_kernels(Kernels::scalar(), 0).is_err());
    }
}
