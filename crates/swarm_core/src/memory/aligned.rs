//! # Aligned Buffer
//!
//! A fixed-length, zero-initialized array whose first element sits on a
//! caller-chosen power-of-two boundary (64 bytes by default).

// SAFETY: This module owns raw allocations for the column storage.
// Every unsafe block is documented with the invariant it relies on.
#![allow(unsafe_code)]

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::fmt;
use std::ptr::NonNull;
use std::slice;

use bytemuck::Pod;

use crate::error::{SwarmError, SwarmResult};

/// Default column alignment: one x86 cache line, two AVX2 registers.
pub const COLUMN_ALIGN: usize = 64;

/// An owned, aligned, fixed-length array of plain-old-data values.
///
/// The buffer is allocated zeroed, which is a valid bit pattern for any
/// [`Pod`] type, so the whole array is always initialized. The length never
/// changes after construction; the memory is released on drop.
///
/// # Example
///
/// ```rust,ignore
/// let mut xs: AlignedBuf<f32> = AlignedBuf::zeroed(2048)?;
/// assert_eq!(xs.as_slice().as_ptr() as usize % 64, 0);
/// xs.as_mut_slice()[0] = 1.0;
/// ```
pub struct AlignedBuf<T: Pod> {
    /// Start of the array. Dangling when the layout has zero size.
    ptr: NonNull<T>,
    /// Number of elements.
    len: usize,
    /// Layout used for allocation and deallocation.
    layout: Layout,
}

impl<T: Pod> AlignedBuf<T> {
    /// Allocates `len` zeroed elements aligned to [`COLUMN_ALIGN`].
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::CapacityOverflow`] if the byte size overflows and
    /// [`SwarmError::Allocation`] if the allocator refuses the request.
    pub fn zeroed(len: usize) -> SwarmResult<Self> {
        Self::zeroed_with_align(len, COLUMN_ALIGN)
    }

    /// Allocates `len` zeroed elements aligned to `align` bytes.
    ///
    /// The effective alignment is never lower than the natural alignment of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfig`] if `align` is not a power of two,
    /// [`SwarmError::CapacityOverflow`] if the byte size overflows and
    /// [`SwarmError::Allocation`] if the allocator refuses the request.
    pub fn zeroed_with_align(len: usize, align: usize) -> SwarmResult<Self> {
        if !align.is_power_of_two() {
            return Err(SwarmError::InvalidConfig(format!(
                "alignment {align} is not a power of two"
            )));
        }

        let elem_size = std::mem::size_of::<T>();
        let align = align.max(std::mem::align_of::<T>());
        let overflow = || SwarmError::CapacityOverflow { len, elem_size };

        let bytes = elem_size.checked_mul(len).ok_or_else(overflow)?;
        let layout = Layout::from_size_align(bytes, align).map_err(|_| overflow())?;

        if bytes == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                len,
                layout,
            });
        }

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(SwarmError::Allocation { bytes, align })?;

        Ok(Self { ptr, len, layout })
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Checks if the buffer holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the alignment the buffer was allocated with.
    #[inline]
    #[must_use]
    pub const fn align(&self) -> usize {
        self.layout.align()
    }

    /// Returns the elements as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `ptr` is valid for `len` initialized elements (zeroed at
        // allocation, `T: Pod`) or dangling-but-aligned with a zero byte size.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Returns the elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Pod> Drop for AlignedBuf<T> {
    fn drop(&mut self) {
        if self.layout.size() > 0 {
            // SAFETY: allocated in `zeroed_with_align` with this exact layout.
            unsafe { dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout) }
        }
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for AlignedBuf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

// SAFETY: AlignedBuf uniquely owns its allocation, like a `Box<[T]>`.
unsafe impl<T: Pod + Send> Send for AlignedBuf<T> {}
// SAFETY: shared access only hands out `&[T]`.
unsafe impl<T: Pod + Sync> Sync for AlignedBuf<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_is_aligned_and_zeroed() {
        let buf: AlignedBuf<f32> = AlignedBuf::zeroed(2048).unwrap();
        assert_eq!(buf.len(), 2048);
        assert_eq!(buf.align(), COLUMN_ALIGN);
        assert_eq!(buf.as_slice().as_ptr() as usize % COLUMN_ALIGN, 0);
        assert!(buf.as_slice().iter().all(|&x| x.to_bits() == 0));
    }

    #[test]
    fn test_buffer_write_read() {
        let mut buf: AlignedBuf<i32> = AlignedBuf::zeroed(10).unwrap();
        buf.as_mut_slice()[9] = -7;
        assert_eq!(buf.as_slice()[9], -7);
        assert_eq!(buf.as_slice()[0], 0);
    }

    #[test]
    fn test_empty_buffer() {
        let buf: AlignedBuf<u64> = AlignedBuf::zeroed(0).unwrap();
        assert!(buf.is_empty());
        assert!(buf.as_slice().is_empty());
    }

    #[test]
    fn test_custom_alignment() {
        let buf: AlignedBuf<u8> = AlignedBuf::zeroed_with_align(33, 128).unwrap();
        assert_eq!(buf.as_slice().as_ptr() as usize % 128, 0);
    }

    #[test]
    fn test_bad_alignment_rejected() {
        let result: SwarmResult<AlignedBuf<u8>> = AlignedBuf::zeroed_with_align(8, 48);
        assert!(matches!(result, Err(SwarmError::InvalidConfig(_))));
    }

    #[test]
    fn test_overflow_rejected() {
        let result: SwarmResult<AlignedBuf<u64>> = AlignedBuf::zeroed(usize::MAX);
        assert!(matches!(
            result,
            Err(SwarmError::CapacityOverflow { elem_size: 8, .. })
        ));
    }
}
