//! # SWARM Core Engine
//!
//! Archetype-based entity storage with data-parallel systems, designed for:
//! - Millions of homogeneous entities updated every tick
//! - Cache-friendly, structure-of-arrays chunks
//! - SIMD within a chunk, one task per range of chunks across cores
//!
//! ## Architecture Rules
//!
//! 1. **One archetype** - position, velocity and health, nothing else
//! 2. **Append-only chunks** - rows are never moved once written
//! 3. **Identical numerics** - every kernel backend agrees bit for bit
//!
//! ## Example
//!
//! ```rust,ignore
//! use swarm_core::{run_damage, run_move, Archetype, EntityIdAllocator, Position, Velocity};
//!
//! let mut ids = EntityIdAllocator::new();
//! let mut archetype = Archetype::new(16);
//! archetype.add_entity(ids.create(), Position::new(0.0, 0.0), Velocity::new(2.0, 3.0), 3)?;
//!
//! run_move(&mut archetype, 1.0);
//! run_damage(&mut archetype);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod memory;
pub mod systems;

pub use config::{ExecutorConfig, StorageConfig, SwarmConfig};
pub use ecs::{
    Archetype, Chunk, EntityId, EntityIdAllocator, EntityRow, Health, MotionColumns, Position,
    RowLocation, Velocity, World,
};
pub use error::{SwarmError, SwarmResult};
pub use memory::{AlignedBuf, COLUMN_ALIGN};
pub use systems::{run_damage, run_move, Executor, Kernels, SimdBackend};
