//! # Entity Storage
//!
//! A single fixed archetype stored as chunked structure-of-arrays.
//!
//! ## Design Philosophy
//!
//! - Entity ids are plain counters with a LIFO free list
//! - Rows live in fixed-capacity chunks, one aligned array per field
//! - Chunks are appended, never compacted; a chunk is the unit of parallel work

mod archetype;
mod chunk;
mod component;
mod entity;
mod world;

pub use archetype::{Archetype, RowLocation};
pub use chunk::{Chunk, EntityRow, MotionColumns};
pub use component::{Health, Position, Velocity};
pub use entity::{EntityId, EntityIdAllocator};
pub use world::World;
