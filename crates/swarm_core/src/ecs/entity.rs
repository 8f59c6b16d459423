//! # Entity Management
//!
//! Entities are opaque 64-bit handles. They carry no data themselves; a handle
//! is only correlated positionally with a row inside a chunk.

use bytemuck::{Pod, Zeroable};

/// Unique identifier for a live entity.
///
/// Issued by [`EntityIdAllocator`]. The value `0` is never issued, so a
/// zeroed column slot never aliases a real entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Wraps a raw 64-bit value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw 64-bit value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Issues entity ids and recycles destroyed ones.
///
/// Fresh ids come from a monotonic counter starting at 1. Destroyed ids are
/// pushed onto a free list and handed out again last-in, first-out.
///
/// # Thread Safety
///
/// Single-threaded by contract: every method takes `&mut self`. Use it during
/// population or teardown, never while a system pass is running.
///
/// # Example
///
/// ```rust,ignore
/// let mut ids = EntityIdAllocator::new();
/// let a = ids.create();
/// ids.destroy(a);
/// assert_eq!(ids.create(), a); // recycled
/// ```
#[derive(Debug)]
pub struct EntityIdAllocator {
    /// Next never-issued id.
    next_id: u64,
    /// Recycled ids, popped from the back.
    free_list: Vec<EntityId>,
}

impl EntityIdAllocator {
    /// Initial free-list reservation, matching one page of ids.
    const DEFAULT_FREE_CAPACITY: usize = 1024;

    /// Creates an allocator whose first fresh id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_free_capacity(Self::DEFAULT_FREE_CAPACITY)
    }

    /// Creates an allocator with room for `capacity` recycled ids before
    /// the free list reallocates.
    #[must_use]
    pub fn with_free_capacity(capacity: usize) -> Self {
        Self {
            next_id: 1,
            free_list: Vec::with_capacity(capacity),
        }
    }

    /// Returns a recycled id if one is available, otherwise a fresh one.
    ///
    /// Never fails.
    #[inline]
    pub fn create(&mut self) -> EntityId {
        if let Some(id) = self.free_list.pop() {
            return id;
        }

        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Makes `id` available for reuse by a later [`create`](Self::create).
    ///
    /// # Preconditions
    ///
    /// `id` must have been returned by this allocator, must currently be live
    /// and must not have been destroyed already. This is not checked: a
    /// violation puts the same id on the free list twice (or an id that was
    /// never issued), after which two live entities can share an id.
    #[inline]
    pub fn destroy(&mut self, id: EntityId) {
        self.free_list.push(id);
    }

    /// Returns the number of ids currently live, assuming the preconditions
    /// of [`destroy`](Self::destroy) were respected.
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        let issued = usize::try_from(self.next_id - 1).unwrap_or(usize::MAX);
        issued.saturating_sub(self.free_list.len())
    }

    /// Returns the number of ids waiting on the free list.
    #[inline]
    #[must_use]
    pub fn recycled_count(&self) -> usize {
        self.free_list.len()
    }
}

impl Default for EntityIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
