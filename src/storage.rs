//! Storage traits and backends for queue blocks.
//!
//! A queue handle never allocates directly: its blocks live in a storage
//! backend with stable keys, and the chain links blocks by key. Splicing a
//! chain from one queue onto another is then a transfer of root keys, which
//! is what keeps `join`/`pop_all` O(1).
//!
//! # Storage Invariant
//!
//! A queue instance must always be used with the same storage instance.
//! Passing a different storage is a logic error (the keys index the wrong
//! pool) and the caller's responsibility to prevent, same discipline as the
//! `slab` crate. Queues that take part in a `join` must share one storage.
//!
//! # Bounded vs Unbounded
//!
//! Insertion is split into two traits so data structures can expose both a
//! fallible and an infallible API:
//!
//! ```text
//! Storage<T>            - base trait: get, remove, len
//!     ├── BoundedStorage<T>    - fixed capacity, try_insert -> Result
//!     └── UnboundedStorage<T>  - growable, insert -> Key (infallible)
//! ```
//!
//! [`FixedStorage`] is the preallocated bounded backend in this crate;
//! `slab::Slab` is the growable backend (feature `slab`, on by default).

use crate::Key;

/// Slab-like storage with stable keys.
///
/// Implementations must provide stable keys (a key stays valid until its
/// slot is explicitly removed), O(1) get/remove, and slot reuse.
pub trait Storage<T> {
    /// Key type handed out by this storage.
    type Key: Key;

    /// Returns a reference to the value at `key`, if present.
    fn get(&self, key: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `key`, if present.
    fn get_mut(&mut self, key: Self::Key) -> Option<&mut T>;

    /// Removes and returns the value at `key`, if present.
    fn remove(&mut self, key: Self::Key) -> Option<T>;

    /// Returns the number of occupied slots.
    fn len(&self) -> usize;

    /// Returns `true` if no slots are occupied.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fixed-capacity storage: insertion can fail with [`Full`].
pub trait BoundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its stable key.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if every slot is occupied.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Returns the total number of slots.
    fn capacity(&self) -> usize;
}

/// Growable storage: insertion never fails (short of allocator OOM).
pub trait UnboundedStorage<T>: Storage<T> {
    /// Inserts a value, returning its stable key.
    fn insert(&mut self, value: T) -> Self::Key;
}

/// Error returned when fixed-capacity storage is full.
///
/// Carries the value back so the caller can retry or drop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// FixedStorage - preallocated, free-list slot reuse
// =============================================================================

enum Entry<T, K> {
    Occupied(T),
    /// Vacant slot holding the next entry of the free list (`K::NONE` ends it).
    Vacant(K),
}

/// Fixed-capacity storage with a LIFO free list.
///
/// All slots are reserved up front; no allocation happens after
/// construction. Removed slots are reused by later inserts.
///
/// # Example
///
/// ```
/// use compactq::{BoundedStorage, FixedStorage, Storage};
///
/// let mut storage: FixedStorage<u64> = FixedStorage::with_capacity(8);
/// let key = storage.try_insert(42).unwrap();
/// assert_eq!(storage.get(key), Some(&42));
/// assert_eq!(storage.remove(key), Some(42));
/// ```
pub struct FixedStorage<T, K: Key = u32> {
    entries: Vec<Entry<T, K>>,
    /// Head of the free list, `K::NONE` when no removed slot is available.
    free_head: K,
    capacity: usize,
    len: usize,
}

impl<T, K: Key> FixedStorage<T, K> {
    /// Creates storage with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or does not fit the key type.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            capacity < K::NONE.as_usize(),
            "capacity exceeds key type maximum"
        );
        Self {
            entries: Vec::with_capacity(capacity),
            free_head: K::NONE,
            capacity,
            len: 0,
        }
    }

    /// Returns `true` if all slots are occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Removes all values, making every slot available for reuse.
    ///
    /// Any queue handle still holding keys into this storage must be reset
    /// first; its keys dangle afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.free_head = K::NONE;
        self.len = 0;
    }
}

impl<T, K: Key> Storage<T> for FixedStorage<T, K> {
    type Key = K;

    #[inline]
    fn get(&self, key: K) -> Option<&T> {
        match self.entries.get(key.as_usize()) {
            Some(Entry::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, key: K) -> Option<&mut T> {
        match self.entries.get_mut(key.as_usize()) {
            Some(Entry::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.entries.get_mut(key.as_usize())?;
        if matches!(slot, Entry::Vacant(_)) {
            return None;
        }
        let entry = core::mem::replace(slot, Entry::Vacant(self.free_head));
        self.free_head = key;
        self.len -= 1;
        match entry {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant(_) => unreachable!(),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }
}

impl<T, K: Key> BoundedStorage<T> for FixedStorage<T, K> {
    #[inline]
    fn try_insert(&mut self, value: T) -> Result<K, Full<T>> {
        if self.free_head.is_some() {
            let key = self.free_head;
            let slot = &mut self.entries[key.as_usize()];
            self.free_head = match slot {
                Entry::Vacant(next) => *next,
                Entry::Occupied(_) => unreachable!("free list points at occupied slot"),
            };
            *slot = Entry::Occupied(value);
            self.len += 1;
            return Ok(key);
        }
        if self.entries.len() == self.capacity {
            return Err(Full(value));
        }
        let key = K::from_usize(self.entries.len());
        self.entries.push(Entry::Occupied(value));
        self.len += 1;
        Ok(key)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn get(&self, key: usize) -> Option<&T> {
        self.get(key)
    }

    #[inline]
    fn get_mut(&mut self, key: usize) -> Option<&mut T> {
        self.get_mut(key)
    }

    #[inline]
    fn remove(&mut self, key: usize) -> Option<T> {
        self.try_remove(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }
}

#[cfg(feature = "slab")]
impl<T> UnboundedStorage<T> for slab::Slab<T> {
    #[inline]
    fn insert(&mut self, value: T) -> usize {
        self.insert(value)
    }
}
