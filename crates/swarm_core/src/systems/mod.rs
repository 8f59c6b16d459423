//! # Systems
//!
//! Stateless bulk transformations applied to every row of an archetype once
//! per tick:
//!
//! - **Move**: `pos += vel * dt`
//! - **Damage**: `health = max(health - 1, 0)`
//!
//! Task parallelism across chunks, data parallelism within a chunk. Neither
//! system can fail, and both accept empty chunks.

mod backend;
mod executor;
mod kernels;

pub use backend::{SimdBackend, SUPPORTED_VECTOR_WIDTHS};
pub use executor::{run_damage, run_move, Executor};
pub use kernels::{DamageKernel, Kernels, MoveKernel};
