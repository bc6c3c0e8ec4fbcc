//! Compact unrolled FIFO queue with O(1) cross-queue splicing.
//!
//! This crate provides a queue for latency-sensitive runtimes that hand
//! batches of work between owners: items are packed seven to a block, blocks
//! live in external storage with stable keys, and a queue handle is just
//! three words. The key insight: separate storage from structure.
//!
//! # Design Philosophy
//!
//! A traditional linked queue pays one allocation and one pointer hop per
//! item. This crate's chain is *unrolled*:
//!
//! ```text
//! Queue handle      - head key, tail key, length
//! Block             - 7 item slots + role tag, lives in storage
//! Storage           - owns the blocks, hands out stable keys
//! ```
//!
//! Benefits:
//! - **One allocation per 7 pushes**: blocks amortize the per-item cost
//! - **O(1) splicing**: `join` moves a whole chain by relinking root keys
//! - **O(1) extraction**: `pop_all` swaps the handle, not the items
//! - **Shared storage**: many queues can draw blocks from one pool
//! - **Opaque items**: values (raw pointers included) are relocated, never
//!   read, compared, or cloned
//!
//! The last block of a chain keeps its items left-justified so pushes append
//! in place; every other block is right-justified so pops advance a start
//! index without shifting. A block's role is carried by an explicit tag
//! (successor key or last-slot index) instead of bit-packing an index into
//! pointer bits, trading one extra word per block for a layout the compiler
//! can check.
//!
//! # Quick Start
//!
//! ```
//! use compactq::OwnedQueue;
//!
//! let mut queue: OwnedQueue<u64> = OwnedQueue::new();
//! for i in 1..=10 {
//!     queue.push(i);
//! }
//! assert_eq!(queue.len(), 10);
//! assert_eq!(queue.pop(), Some(1));
//! ```
//!
//! # Shared Storage and Splicing
//!
//! Queues that exchange items in O(1) must draw their blocks from the same
//! storage instance:
//!
//! ```
//! use compactq::{Queue, SlabBlockStorage};
//!
//! let mut storage: SlabBlockStorage<u64> = SlabBlockStorage::new();
//! let mut pending: Queue<u64, SlabBlockStorage<u64>, usize> = Queue::new();
//! let mut active: Queue<u64, SlabBlockStorage<u64>, usize> = Queue::new();
//!
//! for i in 0..32 {
//!     pending.push(&mut storage, i);
//! }
//!
//! // Hand the whole backlog over without touching a single item.
//! active.join(&mut storage, &mut pending);
//! assert_eq!(active.len(), 32);
//! assert!(pending.is_empty()); // still a valid, reusable queue
//! ```
//!
//! # Critical Invariant: Same Storage Instance
//!
//! All operations on a queue must use the same storage instance, and queues
//! joined together must share one. This is the caller's responsibility
//! (same discipline as the `slab` crate); a mismatched storage panics as
//! soon as a held key is missing.
//!
//! # Storage Options
//!
//! | Storage | Capacity | Allocation | Use Case |
//! |---------|----------|------------|----------|
//! | [`FixedStorage`] | Fixed (runtime) | Preallocated | Latency-critical, no growth |
//! | `slab::Slab` | Growable | May reallocate | Default choice (feature `slab`) |
//!
//! # Operations
//!
//! | Operation | Cost | Notes |
//! |-----------|------|-------|
//! | `push` / `try_push` | O(1) amortized | one block allocation per 7 pushes |
//! | `peek` / `pop` | O(1) | pop shifts ≤ 6 slots on a single block |
//! | `len` | O(1) | |
//! | `join` | O(1) | O(k) for sources shorter than a block, k ≤ 6 |
//! | `pop_all` | O(1) | handle swap |
//! | `clear` | O(blocks) | |
//!
//! # Concurrency
//!
//! None. The queue has no internal synchronization and no operation blocks;
//! callers that share a queue across threads must wrap it in their own
//! mutual exclusion, and `join`/`pop_all` need exclusive access to both
//! handles involved.
//!
//! # Feature Flags
//!
//! - `slab` (default) - growable storage backend via the `slab` crate,
//!   plus the [`OwnedQueue`] convenience wrapper

#![warn(missing_docs)]
#![warn(clippy::all)]

mod block;
pub mod key;
pub mod queue;
pub mod storage;

#[cfg(feature = "slab")]
pub mod owned;

pub use block::{BLOCK_CAP, Block};
pub use key::Key;
pub use queue::{FixedBlockStorage, Iter, Queue};
pub use storage::{BoundedStorage, FixedStorage, Full, Storage, UnboundedStorage};

#[cfg(feature = "slab")]
pub use owned::OwnedQueue;
#[cfg(feature = "slab")]
pub use queue::SlabBlockStorage;
