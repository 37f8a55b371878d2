use std::cmp::Ordering;


/// A strict weak ordering over keys.
///
/// Implemented for [`Natural`] (the key's own [`Ord`]), [`Reversed`], and any
/// `Fn(&K, &K) -> Ordering` closure.
pub trait Compare<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders keys by the reverse of their [`Ord`] implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reversed;

impl<K: Ord + ?Sized> Compare<K> for Reversed {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

impl<K: ?Sized, F: Fn(&K, &K) -> Ordering> Compare<K> for F {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}


/// Whether a tree admits several elements with equal keys.
///
/// Picked once when the tree is built. It only matters when inserting
/// (is an equal key a rejection?) and when erasing by key (how many go?).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// At most one element per key. Inserting an equal key is a no-op.
    #[default]
    Unique,
    /// Any number of equal keys. New ones are placed after the equal keys already present.
    Multi,
}
