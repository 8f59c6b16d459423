//! # Archetype Storage
//!
//! An archetype is an ordered, growable list of equally sized chunks that
//! share one fixed component layout (id, position, velocity, health).
//!
//! ```text
//! Archetype (chunk capacity C):
//! [Chunk 0: C/C] [Chunk 1: C/C] ... [Chunk N-1: k/C]   0 <= k <= C
//!                                    ^ new rows land here
//! ```
//!
//! Every chunk except the last is full. Rows are only appended; there is no
//! removal or compaction path, and no id -> row index. Callers that need
//! random access keep their own map from the [`RowLocation`] returned on
//! insertion.

use tracing::debug;

use super::chunk::{Chunk, EntityRow};
use super::component::{Health, Position, Velocity};
use super::entity::EntityId;
use crate::config::StorageConfig;
use crate::error::SwarmResult;

/// Where an inserted row ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowLocation {
    /// Index of the chunk within the archetype.
    pub chunk: usize,
    /// Row index within the chunk.
    pub row: usize,
}

/// A collection of chunks sharing the (position, velocity, health) layout.
///
/// # Thread Safety
///
/// Insertion takes `&mut self`; system passes take `&mut Archetype` too, so
/// the chunk list can never change while a pass is reading it.
///
/// # Example
///
/// ```rust,ignore
/// let mut ids = EntityIdAllocator::new();
/// let mut archetype = Archetype::new(16);
/// archetype.add_entity(ids.create(), Position::new(0.0, 0.0), Velocity::new(2.0, 3.0), 100)?;
/// run_move(&mut archetype, 1.0);
/// ```
#[derive(Debug)]
pub struct Archetype {
    /// Owned chunks, in insertion order.
    chunks: Vec<Chunk>,
    /// Rows per chunk for every chunk this archetype allocates.
    chunk_capacity: usize,
}

impl Archetype {
    /// Chunk-slot reservation used when `0` is requested.
    pub const DEFAULT_CHUNK_SLOTS: usize = 16;

    /// Creates an empty archetype with [`Chunk::DEFAULT_CAPACITY`] rows per chunk.
    ///
    /// # Arguments
    ///
    /// * `initial_chunk_slots` - Chunks the list can hold before growing
    ///   (0 selects [`DEFAULT_CHUNK_SLOTS`](Self::DEFAULT_CHUNK_SLOTS))
    #[must_use]
    pub fn new(initial_chunk_slots: usize) -> Self {
        Self::with_chunk_capacity(initial_chunk_slots, Chunk::DEFAULT_CAPACITY)
    }

    /// Creates an empty archetype with `chunk_capacity` rows per chunk.
    ///
    /// No chunk is allocated until the first insertion.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_capacity` is zero.
    #[must_use]
    pub fn with_chunk_capacity(initial_chunk_slots: usize, chunk_capacity: usize) -> Self {
        assert!(chunk_capacity > 0, "Chunk capacity must be greater than zero");

        let slots = if initial_chunk_slots > 0 {
            initial_chunk_slots
        } else {
            Self::DEFAULT_CHUNK_SLOTS
        };

        Self {
            chunks: Vec::with_capacity(slots),
            chunk_capacity,
        }
    }

    /// Creates an empty archetype from validated storage settings.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfig`](crate::SwarmError::InvalidConfig)
    /// if the settings are out of range.
    pub fn from_config(config: &StorageConfig) -> SwarmResult<Self> {
        config.validate()?;
        Ok(Self::with_chunk_capacity(
            config.initial_chunk_slots,
            config.chunk_capacity,
        ))
    }

    /// Appends an entity row.
    ///
    /// Allocates a new chunk first when there is none or the last one is
    /// full; the chunk list doubles its slot count when exhausted.
    ///
    /// # Returns
    ///
    /// The chunk and row the entity was written to.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if a new chunk is needed and its memory
    /// cannot be obtained. Existing rows are left untouched.
    pub fn add_entity(
        &mut self,
        id: EntityId,
        position: Position,
        velocity: Velocity,
        health: Health,
    ) -> SwarmResult<RowLocation> {
        let needs_chunk = match self.chunks.last() {
            Some(last) => last.is_full(),
            None => true,
        };
        if needs_chunk {
            self.push_chunk()?;
        }

        let chunk_index = self.chunks.len() - 1;
        let chunk = &mut self.chunks[chunk_index];
        let row = chunk.len();

        let written = chunk.push(id, position, velocity, health);
        debug_assert!(written, "last chunk must have room after push_chunk");

        Ok(RowLocation {
            chunk: chunk_index,
            row,
        })
    }

    /// Allocates a fresh chunk at the end of the list.
    fn push_chunk(&mut self) -> SwarmResult<()> {
        let chunk = Chunk::new(self.chunk_capacity)?;

        if self.chunks.len() == self.chunks.capacity() {
            let slots = self.chunks.capacity().max(1);
            self.chunks.reserve_exact(slots);
            debug!(
                chunk_slots = self.chunks.capacity(),
                "archetype chunk list grown"
            );
        }

        self.chunks.push(chunk);
        debug!(
            chunk = self.chunks.len() - 1,
            capacity = self.chunk_capacity,
            "allocated chunk"
        );

        Ok(())
    }

    /// Returns the number of allocated chunks.
    #[inline]
    #[must_use]
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Returns the number of chunks the list holds before it grows.
    #[inline]
    #[must_use]
    pub fn chunk_slots(&self) -> usize {
        self.chunks.capacity()
    }

    /// Returns the rows per chunk.
    #[inline]
    #[must_use]
    pub const fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    /// Returns the total number of rows across all chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Chunk::len).sum()
    }

    /// Checks if no row is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(Chunk::is_empty)
    }

    /// Returns the chunks, in insertion order.
    #[inline]
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Returns the chunks mutably, for system passes.
    ///
    /// The slice itself cannot grow or shrink, so the "all but the last chunk
    /// are full" invariant is preserved.
    #[inline]
    pub fn chunks_mut(&mut self) -> &mut [Chunk] {
        &mut self.chunks
    }

    /// Returns the chunk at `index`.
    #[inline]
    #[must_use]
    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// Copies out the row at `location`.
    #[must_use]
    pub fn row(&self, location: RowLocation) -> Option<EntityRow> {
        self.chunks.get(location.chunk)?.row(location.row)
    }

    /// Iterates over copies of every row, chunk by chunk, in insertion order.
    pub fn iter_rows(&self) -> impl Iterator<Item = EntityRow> + '_ {
        self.chunks.iter().flat_map(Chunk::iter_rows)
    }
}
