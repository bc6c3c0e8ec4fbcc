//! Fixed-capacity queue block.
//!
//! A block holds up to [`BLOCK_CAP`] items plus a tag describing its role in
//! the chain. The last (or only) block of a chain keeps its items
//! left-justified so pushes append in place; every other block keeps its
//! items right-justified so pops advance a start index without shifting.
//!
//! The tag is an explicit discriminated enum rather than the low bits of a
//! next pointer: the block spends one extra word and in exchange the two
//! roles ("has a successor" / "is the tail") cannot be confused.

use core::fmt;
use core::mem::MaybeUninit;
use core::ptr;

use crate::Key;

/// Number of item slots per block.
///
/// Seven slots plus the tag keep the block at a cache-friendly size for
/// pointer-sized items (64 bytes on 64-bit targets with a `u32` key).
pub const BLOCK_CAP: usize = 7;

/// Block role within a chain.
///
/// `Linked { first: 0 }` is the fully occupied middle-block case; a nonzero
/// `first` marks a right-justified block produced by a splice or by pops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag<K: Key> {
    /// Last or only block: items occupy slots `0..=last`.
    Last {
        /// Index of the last occupied slot.
        last: u8,
    },
    /// Non-last block: items occupy slots `first..=BLOCK_CAP-1`.
    Linked {
        /// Key of the successor block.
        next: K,
        /// Index of the first occupied slot.
        first: u8,
    },
}

/// A node of the unrolled chain: seven item slots plus a role tag.
///
/// Blocks are created with one item and are freed the moment their last
/// item leaves; an empty block is not representable. Slot contents outside
/// the occupied window encoded by the tag are uninitialized.
pub struct Block<T, K: Key = u32> {
    slots: [MaybeUninit<T>; BLOCK_CAP],
    pub(crate) tag: Tag<K>,
}

impl<T, K: Key> Block<T, K> {
    /// Creates a block holding a single item in slot 0.
    pub(crate) fn seed(item: T) -> Self {
        let mut slots = [(); BLOCK_CAP].map(|()| MaybeUninit::uninit());
        slots[0] = MaybeUninit::new(item);
        Self {
            slots,
            tag: Tag::Last { last: 0 },
        }
    }

    /// Inclusive bounds of the occupied slot window.
    #[inline]
    pub(crate) fn bounds(&self) -> (usize, usize) {
        match self.tag {
            Tag::Last { last } => {
                let last = last as usize;
                assert!(last < BLOCK_CAP, "corrupt last-slot index");
                (0, last)
            }
            Tag::Linked { first, .. } => {
                let first = first as usize;
                assert!(first < BLOCK_CAP, "corrupt first-slot index");
                (first, BLOCK_CAP - 1)
            }
        }
    }

    /// Number of items stored in this block (always ≥ 1).
    #[inline]
    pub(crate) fn occupancy(&self) -> usize {
        let (start, end) = self.bounds();
        end - start + 1
    }

    /// Successor key, or `None` on the tail block.
    #[inline]
    pub(crate) fn next(&self) -> Option<K> {
        match self.tag {
            Tag::Last { .. } => None,
            Tag::Linked { next, .. } => Some(next),
        }
    }

    /// Reference to the item at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is outside the occupied window.
    #[inline]
    pub(crate) fn slot(&self, slot: usize) -> &T {
        let (start, end) = self.bounds();
        assert!(slot >= start && slot <= end, "slot outside occupied window");
        // Safety: the tag says this slot is occupied.
        unsafe { self.slots[slot].assume_init_ref() }
    }

    /// Reference to the front (oldest) item.
    #[inline]
    pub(crate) fn front(&self) -> &T {
        self.slot(self.bounds().0)
    }

    /// Appends an item after the current last slot.
    ///
    /// Only valid on the tail block. Returns the item back when the block
    /// is already full.
    #[inline]
    pub(crate) fn append(&mut self, item: T) -> Result<(), T> {
        match &mut self.tag {
            Tag::Last { last } => {
                if *last as usize == BLOCK_CAP - 1 {
                    return Err(item);
                }
                *last += 1;
                self.slots[*last as usize] = MaybeUninit::new(item);
                Ok(())
            }
            Tag::Linked { .. } => unreachable!("append to a non-tail block"),
        }
    }

    /// Removes the front item, keeping at least one item behind.
    ///
    /// On a tail block the remainder shifts left one slot so the block stays
    /// left-justified; on a linked block the start index advances instead.
    ///
    /// # Panics
    ///
    /// Panics if this is the block's only item; use [`Block::into_front`]
    /// and free the block in that case.
    pub(crate) fn take_front(&mut self) -> T {
        match &mut self.tag {
            Tag::Last { last } => {
                assert!(*last > 0, "take_front would empty the block");
                // Safety: slot 0 is occupied on a left-justified block.
                let item = unsafe { self.slots[0].assume_init_read() };
                let remaining = *last as usize;
                // Safety: slots 1..=last are occupied; a MaybeUninit copy
                // relocates them without reading the values.
                unsafe {
                    ptr::copy(self.slots.as_ptr().add(1), self.slots.as_mut_ptr(), remaining);
                }
                *last -= 1;
                item
            }
            Tag::Linked { first, .. } => {
                assert!(
                    (*first as usize) < BLOCK_CAP - 1,
                    "take_front would empty the block"
                );
                // Safety: slot `first` is occupied on a right-justified block.
                let item = unsafe { self.slots[*first as usize].assume_init_read() };
                *first += 1;
                item
            }
        }
    }

    /// Consumes a block holding exactly one item and returns it.
    ///
    /// # Panics
    ///
    /// Panics if the block holds more than one item.
    pub(crate) fn into_front(self) -> T {
        let (start, end) = self.bounds();
        assert_eq!(start, end, "into_front on a block with multiple items");
        // Safety: the single occupied slot is `start`; `forget` below keeps
        // Drop from reading it a second time.
        let item = unsafe { self.slots[start].assume_init_read() };
        core::mem::forget(self);
        item
    }

    /// Converts a tail block into a linked block with successor `next`.
    ///
    /// A partially filled block is right-justified first, so the occupied
    /// window becomes `first..=BLOCK_CAP-1` and later pops advance `first`
    /// without any shifting.
    pub(crate) fn link_to(&mut self, next: K) {
        match self.tag {
            Tag::Last { last } => {
                let occupancy = last as usize + 1;
                let first = BLOCK_CAP - occupancy;
                if first > 0 {
                    // Safety: slots 0..occupancy are occupied; the windows
                    // may overlap, `ptr::copy` handles that.
                    unsafe {
                        ptr::copy(
                            self.slots.as_ptr(),
                            self.slots.as_mut_ptr().add(first),
                            occupancy,
                        );
                    }
                }
                self.tag = Tag::Linked {
                    next,
                    first: first as u8,
                };
            }
            Tag::Linked { .. } => unreachable!("link_to on an already linked block"),
        }
    }
}

impl<T, K: Key> Drop for Block<T, K> {
    fn drop(&mut self) {
        if !core::mem::needs_drop::<T>() {
            return;
        }
        let (start, end) = self.bounds();
        for slot in start..=end {
            // Safety: the tag says these slots are occupied, and nothing
            // reads them after drop.
            unsafe { self.slots[slot].assume_init_drop() };
        }
    }
}

impl<T, K: Key + fmt::Debug> fmt::Debug for Block<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("tag", &self.tag)
            .field("occupancy", &self.occupancy())
            .finish_non_exhaustive()
    }
}
