//! Key comparators
//!
//! A tree orders its keys with a caller-supplied comparator that is fixed for
//! the tree's lifetime. It must be a strict total order and must answer the
//! same way every time it sees the same two keys.

use std::cmp::Ordering;

/// Total order over opaque byte keys
pub trait KeyComparator {
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering;
}

impl<F> KeyComparator for F
where
    F: Fn(&[u8], &[u8]) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        self(left, right)
    }
}

/// Byte-wise lexicographic order (the order of `[u8]::cmp`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lexicographic;

impl KeyComparator for Lexicographic {
    #[inline]
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        left.cmp(right)
    }
}
