//! # Handle Arena
//!
//! Owning storage that hands out stable, opaque handles.
//!
//! A [`Handle`] is the identity of the value it points to. Two handles compare equal
//! only when they name the same slot *and* the same generation, so a slot that is
//! freed and reused never aliases a handle from its previous occupant.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Handle to a value stored in an [`Arena`].
///
/// Handles are `Copy` and cheap to compare. Equality is identity: a handle is never
/// equal to a handle of a different value, even if both values are structurally equal.
pub struct Handle<T> {
    /// Slot index in the arena.
    index: u32,
    /// Generation of the slot when this handle was issued.
    generation: u32,
    /// Marker for T.
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

/// A slot in the arena.
struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// An owning arena for values addressed by [`Handle`].
///
/// Insertion and removal are **O(1)**. Freed slots are recycled through a free list,
/// and their generation is bumped so stale handles resolve to `None`.
///
/// # Thread Safety
///
/// This arena is NOT thread-safe. It is owned by a single renderer.
///
/// # Example
///
/// ```rust
/// use sinew_core::Arena;
///
/// let mut arena: Arena<&str> = Arena::new();
/// let a = arena.insert("head");
/// let b = arena.insert("head");
///
/// // Same contents, different identity
/// assert_ne!(a, b);
/// assert_eq!(arena.get(a), Some(&"head"));
/// ```
pub struct Arena<T> {
    /// The storage array.
    entries: Vec<Entry<T>>,
    /// Free list - indices of vacant slots.
    free_list: Vec<u32>,
    /// Number of occupied slots.
    len: usize,
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of stored values.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the arena holds no values.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores a value and returns its handle.
    pub fn insert(&mut self, value: T) -> Handle<T> {
        self.len += 1;

        if let Some(index) = self.free_list.pop() {
            let entry = &mut self.entries[index as usize];
            entry.value = Some(value);
            return Handle {
                index,
                generation: entry.generation,
                _phantom: PhantomData,
            };
        }

        debug_assert!(self.entries.len() < u32::MAX as usize, "arena slot count exceeds u32");
        #[allow(clippy::cast_possible_truncation)]
        let index = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 0,
            value: Some(value),
        });
        Handle {
            index,
            generation: 0,
            _phantom: PhantomData,
        }
    }

    /// Removes a value, invalidating every copy of its handle.
    ///
    /// Returns the removed value, or `None` if the handle was stale.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let entry = self.entries.get_mut(handle.index as usize)?;
        if entry.generation != handle.generation {
            return None;
        }

        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.len -= 1;

        Some(value)
    }

    /// Returns true if the handle still points to a live value.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Gets a reference to a stored value.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        let entry = self.entries.get(handle.index as usize)?;
        if entry.generation == handle.generation {
            entry.value.as_ref()
        } else {
            None
        }
    }

    /// Gets a mutable reference to a stored value.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let entry = self.entries.get_mut(handle.index as usize)?;
        if entry.generation == handle.generation {
            entry.value.as_mut()
        } else {
            None
        }
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
