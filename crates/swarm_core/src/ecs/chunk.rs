//! # Chunk Storage
//!
//! A chunk is a fixed-capacity block of entity rows stored as a structure of
//! arrays. It is the unit of storage and the unit of parallel work.
//!
//! ```text
//! entity_ids: [E0, E1, E2, ..., E(count-1) | unused ... ]
//! pos_x:      [x0, x1, x2, ...             | unused ... ]   <- 64-byte aligned
//! pos_y:      [y0, y1, y2, ...             | unused ... ]   <- 64-byte aligned
//! vel_x:      ...
//! vel_y:      ...
//! health:     ...
//! ```
//!
//! A system that only touches `pos_x`/`vel_x` streams exactly those two
//! arrays through the cache.

use super::component::{Health, Position, Velocity};
use super::entity::EntityId;
use crate::error::SwarmResult;
use crate::memory::AlignedBuf;

/// A copy of one occupied row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityRow {
    /// The entity occupying the row.
    pub id: EntityId,
    /// Position at the time of the copy.
    pub position: Position,
    /// Velocity at the time of the copy.
    pub velocity: Velocity,
    /// Health at the time of the copy.
    pub health: Health,
}

/// Mutable view of the columns the move system touches.
///
/// Kernels process `rows()` elements: the shortest of the four slices.
/// Views handed out by [`Chunk::motion_columns`] always have equal lengths.
#[derive(Debug)]
pub struct MotionColumns<'a> {
    /// Position X column, rewritten in place.
    pub pos_x: &'a mut [f32],
    /// Position Y column, rewritten in place.
    pub pos_y: &'a mut [f32],
    /// Velocity X column.
    pub vel_x: &'a [f32],
    /// Velocity Y column.
    pub vel_y: &'a [f32],
}

impl MotionColumns<'_> {
    /// Number of rows a kernel may touch.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.pos_x
            .len()
            .min(self.pos_y.len())
            .min(self.vel_x.len())
            .min(self.vel_y.len())
    }
}

/// A fixed-capacity structure-of-arrays block of entity rows.
///
/// Rows `0..len()` are occupied; rows beyond are zeroed and never exposed.
/// Rows are only ever appended, never removed or reordered.
pub struct Chunk {
    /// Number of occupied rows.
    count: usize,
    /// Entity id per row.
    entity_ids: AlignedBuf<EntityId>,
    /// Position X per row.
    pos_x: AlignedBuf<f32>,
    /// Position Y per row.
    pos_y: AlignedBuf<f32>,
    /// Velocity X per row.
    vel_x: AlignedBuf<f32>,
    /// Velocity Y per row.
    vel_y: AlignedBuf<f32>,
    /// Health per row.
    health: AlignedBuf<Health>,
}

impl Chunk {
    /// Rows per chunk unless configured otherwise. 2048 rows keep the two
    /// move-pass position columns (16 KiB) inside a typical L1 data cache.
    pub const DEFAULT_CAPACITY: usize = 2048;

    /// Creates an empty chunk with room for `capacity` rows.
    ///
    /// All six columns are allocated up front, zeroed and 64-byte aligned.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if any column cannot be obtained. Columns
    /// that were already allocated are released.
    pub fn new(capacity: usize) -> SwarmResult<Self> {
        Ok(Self {
            count: 0,
            entity_ids: AlignedBuf::zeroed(capacity)?,
            pos_x: AlignedBuf::zeroed(capacity)?,
            pos_y: AlignedBuf::zeroed(capacity)?,
            vel_x: AlignedBuf::zeroed(capacity)?,
            vel_y: AlignedBuf::zeroed(capacity)?,
            health: AlignedBuf::zeroed(capacity)?,
        })
    }

    /// Returns the maximum number of rows.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.entity_ids.len()
    }

    /// Returns the number of occupied rows.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Checks if no row is occupied.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Checks if every row is occupied.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.count >= self.capacity()
    }

    /// Returns the number of free rows.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.capacity() - self.count
    }

    /// Appends a row.
    ///
    /// # Returns
    ///
    /// `true` if the row was written, `false` if the chunk was already full.
    /// A full chunk is left untouched and the row is dropped; callers that
    /// cannot tolerate the loss must check [`is_full`](Self::is_full) first.
    #[inline]
    #[must_use = "a full chunk drops the row"]
    pub fn push(
        &mut self,
        id: EntityId,
        position: Position,
        velocity: Velocity,
        health: Health,
    ) -> bool {
        let i = self.count;
        if i >= self.capacity() {
            return false;
        }

        self.entity_ids.as_mut_slice()[i] = id;
        self.pos_x.as_mut_slice()[i] = position.x;
        self.pos_y.as_mut_slice()[i] = position.y;
        self.vel_x.as_mut_slice()[i] = velocity.x;
        self.vel_y.as_mut_slice()[i] = velocity.y;
        self.health.as_mut_slice()[i] = health;
        self.count = i + 1;

        true
    }

    /// Entity ids of the occupied rows.
    #[inline]
    #[must_use]
    pub fn entity_ids(&self) -> &[EntityId] {
        &self.entity_ids.as_slice()[..self.count]
    }

    /// Position X of the occupied rows.
    #[inline]
    #[must_use]
    pub fn pos_x(&self) -> &[f32] {
        &self.pos_x.as_slice()[..self.count]
    }

    /// Position Y of the occupied rows.
    #[inline]
    #[must_use]
    pub fn pos_y(&self) -> &[f32] {
        &self.pos_y.as_slice()[..self.count]
    }

    /// Velocity X of the occupied rows.
    #[inline]
    #[must_use]
    pub fn vel_x(&self) -> &[f32] {
        &self.vel_x.as_slice()[..self.count]
    }

    /// Velocity Y of the occupied rows.
    #[inline]
    #[must_use]
    pub fn vel_y(&self) -> &[f32] {
        &self.vel_y.as_slice()[..self.count]
    }

    /// Health of the occupied rows.
    #[inline]
    #[must_use]
    pub fn health(&self) -> &[Health] {
        &self.health.as_slice()[..self.count]
    }

    /// Splits out the columns the move system reads and writes.
    #[inline]
    pub fn motion_columns(&mut self) -> MotionColumns<'_> {
        let n = self.count;
        MotionColumns {
            pos_x: &mut self.pos_x.as_mut_slice()[..n],
            pos_y: &mut self.pos_y.as_mut_slice()[..n],
            vel_x: &self.vel_x.as_slice()[..n],
            vel_y: &self.vel_y.as_slice()[..n],
        }
    }

    /// Health of the occupied rows, mutable.
    #[inline]
    pub fn health_mut(&mut self) -> &mut [Health] {
        let n = self.count;
        &mut self.health.as_mut_slice()[..n]
    }

    /// Copies out the row at `index`.
    ///
    /// # Returns
    ///
    /// The row, or None if `index` is not occupied.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<EntityRow> {
        if index >= self.count {
            return None;
        }

        Some(EntityRow {
            id: self.entity_ids.as_slice()[index],
            position: Position::new(self.pos_x.as_slice()[index], self.pos_y.as_slice()[index]),
            velocity: Velocity::new(self.vel_x.as_slice()[index], self.vel_y.as_slice()[index]),
            health: self.health.as_slice()[index],
        })
    }

    /// Iterates over copies of the occupied rows, in insertion order.
    pub fn iter_rows(&self) -> impl Iterator<Item = EntityRow> + '_ {
        (0..self.count).filter_map(move |i| self.row(i))
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("count", &self.count)
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::COLUMN_ALIGN;

    fn push_n(chunk: &mut Chunk, n: u64) -> usize {
        (1..=n)
            .filter(|&i| {
                let f = i as f32;
                chunk.push(
                    EntityId::from_raw(i),
                    Position::new(f, -f),
                    Velocity::new(0.5 * f, 0.25 * f),
                    i as i32,
                )
            })
            .count()
    }

    #[test]
    fn test_chunk_creation() {
        let chunk = Chunk::new(Chunk::DEFAULT_CAPACITY).unwrap();
        assert_eq!(chunk.capacity(), 2048);
        assert_eq!(chunk.len(), 0);
        assert!(chunk.is_empty());
        assert!(!chunk.is_full());
    }

    #[test]
    fn test_columns_are_aligned() {
        let mut chunk = Chunk::new(100).unwrap();
        assert_eq!(push_n(&mut chunk, 1), 1);
        for ptr in [
            chunk.pos_x().as_ptr() as usize,
            chunk.pos_y().as_ptr() as usize,
            chunk.vel_x().as_ptr() as usize,
            chunk.vel_y().as_ptr() as usize,
            chunk.health().as_ptr() as usize,
            chunk.entity_ids().as_ptr() as usize,
        ] {
            assert_eq!(ptr % COLUMN_ALIGN, 0);
        }
    }

    #[test]
    fn test_push_and_row() {
        let mut chunk = Chunk::new(4).unwrap();
        assert!(chunk.push(
            EntityId::from_raw(9),
            Position::new(1.0, 2.0),
            Velocity::new(3.0, 4.0),
            5,
        ));

        let row = chunk.row(0).unwrap();
        assert_eq!(row.id, EntityId::from_raw(9));
        assert_eq!(row.position, Position::new(1.0, 2.0));
        assert_eq!(row.velocity, Velocity::new(3.0, 4.0));
        assert_eq!(row.health, 5);
        assert!(chunk.row(1).is_none());
    }

    #[test]
    fn test_push_into_full_chunk_is_dropped() {
        let mut chunk = Chunk::new(4).unwrap();
        assert_eq!(push_n(&mut chunk, 4), 4);
        assert!(chunk.is_full());
        assert_eq!(chunk.remaining(), 0);

        let before: Vec<EntityRow> = chunk.iter_rows().collect();
        // Excess pushes are refused and never written past capacity.
        assert_eq!(push_n(&mut chunk, 3), 0);
        let after: Vec<EntityRow> = chunk.iter_rows().collect();

        assert_eq!(chunk.len(), 4);
        assert_eq!(before, after);
    }

    #[test]
    fn test_views_cover_only_occupied_rows() {
        let mut chunk = Chunk::new(16).unwrap();
        assert_eq!(push_n(&mut chunk, 5), 5);

        assert_eq!(chunk.entity_ids().len(), 5);
        assert_eq!(chunk.health_mut().len(), 5);

        let cols = chunk.motion_columns();
        assert_eq!(cols.rows(), 5);
        assert_eq!(cols.pos_x.len(), 5);
    }

    #[test]
    fn test_iter_rows_in_insertion_order() {
        let mut chunk = Chunk::new(8).unwrap();
        assert_eq!(push_n(&mut chunk, 6), 6);
        let ids: Vec<u64> = chunk.iter_rows().map(|r| r.id.raw()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }
}
