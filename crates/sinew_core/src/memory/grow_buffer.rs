//! # Grow Buffer
//!
//! A reusable array whose physical capacity is tracked separately from its logical
//! length.
//!
//! Vertex and index streams are uploaded at their full physical size, so the part past
//! the logical length must stay defined (zeroed or default) instead of being truncated.

/// A growable, reusable buffer of plain values.
///
/// - `capacity()` is the physical size. It only changes in [`ensure_capacity`] and
///   [`resize_exact`], which reallocate to the exact requested size.
/// - `len()` is the logical size, set by the writer each frame.
///
/// Reallocation does NOT preserve contents: every new slot is `T::default()`.
///
/// # Example
///
/// ```rust
/// use sinew_core::GrowBuffer;
///
/// let mut indices: GrowBuffer<u32> = GrowBuffer::new();
/// indices.resize_exact(6);
/// indices.as_mut_slice().copy_from_slice(&[0, 2, 1, 2, 3, 1]);
///
/// indices.set_len(3);
/// indices.zero_tail();
/// assert_eq!(indices.physical(), &[0, 2, 1, 0, 0, 0]);
/// ```
///
/// [`ensure_capacity`]: GrowBuffer::ensure_capacity
/// [`resize_exact`]: GrowBuffer::resize_exact
#[derive(Debug, Clone, Default)]
pub struct GrowBuffer<T: Copy + Default> {
    /// Physical storage. Its length IS the capacity.
    items: Vec<T>,
    /// Logical length (always <= items.len()).
    len: usize,
}

impl<T: Copy + Default> GrowBuffer<T> {
    /// Creates an empty buffer with zero capacity.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            len: 0,
        }
    }

    /// Returns the physical capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    /// Returns the logical length.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the logical length is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Grows the buffer to exactly `required` slots if it is smaller.
    ///
    /// Returns `true` if a reallocation happened. The logical length is clamped
    /// to the new capacity; contents are reset to defaults on reallocation.
    pub fn ensure_capacity(&mut self, required: usize) -> bool {
        if required <= self.items.len() {
            return false;
        }
        self.items = vec![T::default(); required];
        self.len = self.len.min(required);
        true
    }

    /// Reallocates to exactly `size` slots unless the capacity already matches.
    ///
    /// Returns `true` if a reallocation happened. After a reallocation the
    /// logical length equals `size` and every slot holds `T::default()`.
    pub fn resize_exact(&mut self, size: usize) -> bool {
        if self.items.len() == size {
            self.len = size;
            return false;
        }
        self.items = vec![T::default(); size];
        self.len = size;
        true
    }

    /// Sets the logical length.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the physical capacity.
    #[inline]
    pub fn set_len(&mut self, len: usize) {
        assert!(
            len <= self.items.len(),
            "logical length {len} exceeds capacity {}",
            self.items.len()
        );
        self.len = len;
    }

    /// Writes `T::default()` over every slot past the logical length.
    #[inline]
    pub fn zero_tail(&mut self) {
        let len = self.len;
        self.items[len..].fill(T::default());
    }

    /// Writes `value` over every physical slot.
    #[inline]
    pub fn fill(&mut self, value: T) {
        self.items.fill(value);
    }

    /// Returns the logical contents.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.len]
    }

    /// Returns the logical contents mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items[..self.len]
    }

    /// Returns the whole physical array, tail included.
    #[inline]
    #[must_use]
    pub fn physical(&self) -> &[T] {
        &self.items
    }

    /// Returns the whole physical array mutably, tail included.
    #[inline]
    pub fn physical_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}
