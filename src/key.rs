//! Key trait for block storage indices.
//!
//! Blocks in a queue chain reference each other by key, not by pointer.
//! The [`Key`] trait abstracts over the index types a storage backend hands
//! out, and provides the sentinel (`NONE`) that marks an empty chain link.

/// Trait for key/index types used by block storage.
///
/// Provides a sentinel value (`NONE`) and conversion to/from `usize`.
/// Implemented for the common unsigned integer widths; a storage backend
/// with its own key type can implement it as well.
///
/// # Example
///
/// ```
/// use compactq::Key;
///
/// // u32 is a Key with NONE = u32::MAX
/// let key: u32 = 7;
/// assert!(!key.is_none());
/// assert!(u32::NONE.is_none());
/// ```
pub trait Key: Copy + Eq {
    /// Sentinel value representing "no block".
    ///
    /// Used for the head/tail of an empty queue and for the chain link of
    /// a block with no successor. For integer types this is `MAX`.
    const NONE: Self;

    /// Creates a key from a `usize` value.
    fn from_usize(val: usize) -> Self;

    /// Returns the key as a `usize`, for indexing into storage.
    fn as_usize(&self) -> usize;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Returns `true` if this is NOT the sentinel value.
    #[inline]
    fn is_some(&self) -> bool {
        !self.is_none()
    }
}

impl Key for u32 {
    const NONE: Self = u32::MAX;

    #[inline]
    fn from_usize(val: usize) -> Self {
        val as u32
    }

    #[inline]
    fn as_usize(&self) -> usize {
        *self as usize
    }
}

impl Key for u64 {
    const NONE: Self = u64::MAX;

    #[inline]
    fn from_usize(val: usize) -> Self {
        val as u64
    }

    #[inline]
    fn as_usize(&self) -> usize {
        *self as usize
    }
}

impl Key for usize {
    const NONE: Self = usize::MAX;

    #[inline]
    fn from_usize(val: usize) -> Self {
        val
    }

    #[inline]
    fn as_usize(&self) -> usize {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_key_basics() {
        let key: u32 = 42;
        assert!(!key.is_none());
        assert!(key.is_some());
        assert_eq!(key.as_usize(), 42);

        assert!(u32::NONE.is_none());
        assert!(!u32::NONE.is_some());
    }

    #[test]
    fn from_usize_roundtrip() {
        for i in [0usize, 1, 6, 7, 4096] {
            assert_eq!(u32::from_usize(i).as_usize(), i);
            assert_eq!(usize::from_usize(i).as_usize(), i);
        }
    }

    #[test]
    fn none_values() {
        assert_eq!(u32::NONE, u32::MAX);
        assert_eq!(u64::NONE, u64::MAX);
        assert_eq!(usize::NONE, usize::MAX);
    }
}
