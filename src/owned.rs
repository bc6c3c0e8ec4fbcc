//! OwnedQueue - a queue that owns its block storage.
//!
//! Convenience wrapper around [`Queue`] + `slab::Slab` for the common case
//! of a single queue that does not share storage with others. Cross-queue
//! `join` stays on the storage-parameterized [`Queue`]: an O(1) splice is
//! only possible between queues whose blocks live in the same pool.

use crate::block::BLOCK_CAP;
use crate::queue::{Iter, Queue, SlabBlockStorage};

/// A FIFO queue owning its own growable block storage.
///
/// # Example
///
/// ```
/// use compactq::OwnedQueue;
///
/// let mut queue: OwnedQueue<u64> = OwnedQueue::new();
/// queue.push(1);
/// queue.push(2);
///
/// assert_eq!(queue.peek(), Some(&1));
/// assert_eq!(queue.pop(), Some(1));
/// assert_eq!(queue.pop(), Some(2));
/// assert_eq!(queue.pop(), None);
/// ```
pub struct OwnedQueue<T> {
    storage: SlabBlockStorage<T>,
    queue: Queue<T, SlabBlockStorage<T>, usize>,
}

impl<T> OwnedQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            storage: SlabBlockStorage::new(),
            queue: Queue::new(),
        }
    }

    /// Creates an empty queue with room for at least `items` items before
    /// the block storage reallocates.
    pub fn with_capacity(items: usize) -> Self {
        Self {
            storage: SlabBlockStorage::with_capacity(items.div_ceil(BLOCK_CAP)),
            queue: Queue::new(),
        }
    }

    /// Returns the number of items in the queue.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if the queue holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Appends `item` as the new last element.
    #[inline]
    pub fn push(&mut self, item: T) {
        self.queue.push(&mut self.storage, item);
    }

    /// Returns a reference to the front item without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.queue.peek(&self.storage)
    }

    /// Removes and returns the front item.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop(&mut self.storage)
    }

    /// Removes all items and frees every block.
    pub fn clear(&mut self) {
        self.queue.clear(&mut self.storage);
    }

    /// Extracts the entire content into a fresh queue, leaving `self`
    /// empty and reusable. O(1): storage and handle move wholesale.
    pub fn pop_all(&mut self) -> Self {
        core::mem::replace(self, Self::new())
    }

    /// Returns an iterator over item references, front to back.
    pub fn iter(&self) -> Iter<'_, T, SlabBlockStorage<T>, usize> {
        self.queue.iter(&self.storage)
    }

    /// Returns the number of blocks currently backing the queue.
    pub fn block_count(&self) -> usize {
        self.queue.block_count(&self.storage)
    }
}

impl<T> Default for OwnedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for OwnedQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for OwnedQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<T> core::fmt::Debug for OwnedQueue<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OwnedQueue")
            .field("len", &self.len())
            .field("blocks", &self.block_count())
            .finish()
    }
}
