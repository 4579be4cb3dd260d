//! # Double-Buffered Resource
//!
//! Two owned copies of a resource, alternated on every request.
//!
//! ## Architecture
//!
//! ```text
//!        ┌─────────────────────────────┐
//!        │       DoubleBuffered<T>     │
//!        │                             │
//!        │  ┌─────────┐  ┌─────────┐  │
//!        │  │ Slot 0  │  │ Slot 1  │  │
//!        │  └────┬────┘  └────┬────┘  │
//!        │       │            │       │
//!        │  ┌────┴────────────┴────┐  │
//!        │  │   Current Index 0/1  │  │
//!        │  └──────────────────────┘  │
//!        └─────────────────────────────┘
//! ```
//!
//! The current index starts at 1, so the very first [`DoubleBuffered::get_next`]
//! returns slot 0.

/// A pair of resources used alternately.
///
/// ## Usage
///
/// ```rust
/// use sinew_core::DoubleBuffered;
///
/// let mut meshes: DoubleBuffered<Vec<f32>> = DoubleBuffered::default();
///
/// // Frame 1 writes slot 0
/// meshes.get_next().push(1.0);
/// assert_eq!(meshes.current_index(), 0);
///
/// // Frame 2 writes slot 1, slot 0 is untouched
/// meshes.get_next().push(2.0);
/// assert_eq!(meshes.current_index(), 1);
/// assert_eq!(meshes.slot(0), &vec![1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct DoubleBuffered<T> {
    /// The two buffers.
    buffers: [T; 2],
    /// Index of the most recently handed out buffer (0 or 1).
    current: usize,
}

impl<T> DoubleBuffered<T> {
    /// Creates a double buffer from two initial values.
    #[must_use]
    pub const fn new(first: T, second: T) -> Self {
        Self {
            buffers: [first, second],
            current: 1,
        }
    }

    /// Toggles to the other buffer and returns it for writing.
    #[inline]
    pub fn get_next(&mut self) -> &mut T {
        self.current ^= 1;
        &mut self.buffers[self.current]
    }

    /// Returns the most recently handed out buffer.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &T {
        &self.buffers[self.current]
    }

    /// Returns the index of the current buffer (0 or 1).
    #[inline]
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// Returns a buffer by index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not 0 or 1.
    #[inline]
    #[must_use]
    pub fn slot(&self, index: usize) -> &T {
        &self.buffers[index]
    }
}

impl<T: Default> Default for DoubleBuffered<T> {
    fn default() -> Self {
        Self::new(T::default(), T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_get_next_is_slot_zero() {
        let mut db: DoubleBuffered<u32> = DoubleBuffered::new(10, 20);
        assert_eq!(db.current_index(), 1);

        assert_eq!(*db.get_next(), 10);
        assert_eq!(db.current_index(), 0);
    }

    #[test]
    fn test_alternates() {
        let mut db: DoubleBuffered<u32> = DoubleBuffered::default();

        *db.get_next() = 1;
        *db.get_next() = 2;
        *db.get_next() += 10;

        assert_eq!(*db.slot(0), 11);
        assert_eq!(*db.slot(1), 2);
        assert_eq!(*db.current(), 11);
    }
}
