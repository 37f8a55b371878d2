//! Ordered maps: [`Map`] holds one value per key, [`MultiMap`] any number of them.

use std::fmt::{self, Debug};
use std::ops::Index;

use crate::rbtree::{Compare, DuplicatePolicy, Iter, IterMut, IntoIter, Keys, Natural, Position, RBTree, RevPosition, Values};
use crate::TreeError;


/// An ordered map with unique keys.
#[derive(Clone)]
pub struct Map<K, V, C = Natural> {
    tree: RBTree<K, V, C>,
}

/// An ordered map that may hold several entries with equal keys.
///
/// Entries with equal keys are kept in insertion order.
#[derive(Clone)]
pub struct MultiMap<K, V, C = Natural> {
    tree: RBTree<K, V, C>,
}

// everything except inserting and removing by key
macro_rules! impl_map_common {
    ($map:ident, $policy:expr) => {
        impl<K: Ord, V> $map<K, V> {
            pub fn new() -> Self {
                Self::with_comparator(Natural)
            }
        }

        impl<K, V, C> $map<K, V, C> {
            pub fn with_comparator(comparator: C) -> Self {
                Self { tree: RBTree::with_comparator(comparator, $policy) }
            }

            pub fn len(&self) -> usize {
                self.tree.len()
            }

            pub fn is_empty(&self) -> bool {
                self.tree.is_empty()
            }

            pub fn max_size(&self) -> usize {
                self.tree.max_size()
            }

            pub fn key_comp(&self) -> &C {
                self.tree.comparator()
            }

            /// The underlying tree.
            pub fn as_tree(&self) -> &RBTree<K, V, C> {
                &self.tree
            }

            pub fn begin(&self) -> Position {
                self.tree.begin()
            }

            pub fn end(&self) -> Position {
                self.tree.end()
            }

            pub fn rbegin(&self) -> RevPosition {
                self.tree.rbegin()
            }

            pub fn rend(&self) -> RevPosition {
                self.tree.rend()
            }

            pub fn next(&self, pos: Position) -> Result<Position, TreeError> {
                self.tree.next(pos)
            }

            pub fn prev(&self, pos: Position) -> Result<Position, TreeError> {
                self.tree.prev(pos)
            }

            pub fn rnext(&self, pos: RevPosition) -> Result<RevPosition, TreeError> {
                self.tree.rnext(pos)
            }

            /// The entry at `pos`.
            pub fn at(&self, pos: Position) -> Result<(&K, &V), TreeError> {
                self.tree.get(pos)
            }

            /// The value of the entry at `pos`.
            pub fn at_mut(&mut self, pos: Position) -> Result<&mut V, TreeError> {
                self.tree.get_mut(pos)
            }

            pub fn first(&self) -> Option<(&K, &V)> {
                self.tree.first()
            }

            pub fn last(&self) -> Option<(&K, &V)> {
                self.tree.last()
            }

            pub fn iter(&self) -> Iter<'_, K, V> {
                self.tree.iter()
            }

            pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
                self.tree.iter_mut()
            }

            pub fn range(&self, first: Position, last: Position) -> Result<Iter<'_, K, V>, TreeError> {
                self.tree.range(first, last)
            }

            pub fn keys(&self) -> Keys<'_, K, V> {
                self.tree.keys()
            }

            pub fn values(&self) -> Values<'_, K, V> {
                self.tree.values()
            }

            pub fn clear(&mut self) {
                self.tree.clear()
            }

            pub fn swap(&mut self, other: &mut Self) {
                self.tree.swap(&mut other.tree)
            }
        }

        impl<K, V, C: Compare<K>> $map<K, V, C> {
            /// Inserts every entry from `iter`, returning how many were added.
            pub fn insert_iter<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) -> usize {
                self.tree.insert_iter(iter)
            }

            /// Inserts an entry, ignoring the hint.
            pub fn insert_hint(&mut self, _hint: Position, key: K, value: V) -> Position {
                self.tree.insert(key, value).0
            }

            pub fn erase(&mut self, pos: Position) -> Result<Position, TreeError> {
                self.tree.erase(pos)
            }

            pub fn erase_range(&mut self, first: Position, last: Position) -> Result<Position, TreeError> {
                self.tree.erase_range(first, last)
            }

            /// Removes the entry at `pos` and returns it.
            pub fn remove_at(&mut self, pos: Position) -> Result<(K, V), TreeError> {
                self.tree.remove_at(pos)
            }

            pub fn contains_key(&self, key: &K) -> bool {
                self.tree.contains_key(key)
            }

            /// The value of the (first) entry with key `key`.
            pub fn get(&self, key: &K) -> Option<&V> {
                self.tree.get_key_value(key).map(|(_, value)| value)
            }

            pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
                self.tree.get_key_value(key)
            }

            pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
                let pos = self.tree.find(key);
                self.tree.get_mut(pos).ok()
            }

            pub fn find(&self, key: &K) -> Position {
                self.tree.find(key)
            }

            pub fn count(&self, key: &K) -> usize {
                self.tree.count(key)
            }

            pub fn lower_bound(&self, key: &K) -> Position {
                self.tree.lower_bound(key)
            }

            pub fn upper_bound(&self, key: &K) -> Position {
                self.tree.upper_bound(key)
            }

            pub fn equal_range(&self, key: &K) -> (Position, Position) {
                self.tree.equal_range(key)
            }

            pub fn pop_first(&mut self) -> Option<(K, V)> {
                self.tree.pop_first()
            }

            pub fn pop_last(&mut self) -> Option<(K, V)> {
                self.tree.pop_last()
            }
        }

        impl<K, V, C: Default> Default for $map<K, V, C> {
            fn default() -> Self {
                Self::with_comparator(C::default())
            }
        }

        impl<K: Debug, V: Debug, C> Debug for $map<K, V, C> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.tree.fmt(f)
            }
        }

        impl<K: PartialEq, V: PartialEq, C> PartialEq for $map<K, V, C> {
            fn eq(&self, other: &Self) -> bool {
                self.tree == other.tree
            }
        }

        impl<K: Eq, V: Eq, C> Eq for $map<K, V, C> {}

        impl<K, V, C: Compare<K>> Extend<(K, V)> for $map<K, V, C> {
            fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
                self.insert_iter(iter);
            }
        }

        impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for $map<K, V, C> {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut map = Self::default();
                map.insert_iter(iter);
                map
            }
        }

        impl<K, V, C> IntoIterator for $map<K, V, C> {
            type Item = (K, V);
            type IntoIter = IntoIter<K, V>;

            fn into_iter(self) -> Self::IntoIter {
                self.tree.into_iter()
            }
        }

        impl<'a, K, V, C> IntoIterator for &'a $map<K, V, C> {
            type Item = (&'a K, &'a V);
            type IntoIter = Iter<'a, K, V>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<K, V, C: Compare<K>> Index<&K> for $map<K, V, C> {
            type Output = V;

            /// Panics if there is no entry with that key.
            fn index(&self, key: &K) -> &V {
                match self.get(key) {
                    Some(value) => value,
                    None => panic!("no entry found for key"),
                }
            }
        }
    };
}

impl_map_common!(Map, DuplicatePolicy::Unique);
impl_map_common!(MultiMap, DuplicatePolicy::Multi);

impl<K, V, C: Compare<K>> Map<K, V, C> {
    /// Inserts `key` with `value` unless the key is already present, in which case nothing changes.
    ///
    /// Returns the position of the entry with that key, and whether it was just inserted.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        self.tree.insert(key, value)
    }

    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Position, bool), TreeError> {
        self.tree.try_insert(key, value)
    }

    /// Inserts `key` with `value`, overwriting and returning the old value if the key was present.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Option<V> {
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.tree.insert(key, value);
                None
            }
        }
    }

    /// The value for `key`, inserting `default()` first if there is none.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: K, default: F) -> &mut V {
        let mut pos = self.tree.find(&key);
        if pos.is_end() {
            pos = self.tree.insert(key, default()).0;
        }
        self.tree.get_mut(pos).expect("the entry was found or just inserted")
    }

    /// Removes the entry with key `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let pos = self.tree.find(key);
        if pos.is_end() { return None }
        self.tree.remove_at(pos).ok().map(|(_, value)| value)
    }
}

impl<K, V, C: Compare<K>> MultiMap<K, V, C> {
    /// Inserts an entry after any entries with an equal key, returning its position.
    pub fn insert(&mut self, key: K, value: V) -> Position {
        self.tree.insert(key, value).0
    }

    pub fn try_insert(&mut self, key: K, value: V) -> Result<Position, TreeError> {
        self.tree.try_insert(key, value).map(|(pos, _)| pos)
    }

    /// All entries with key `key`, in insertion order.
    pub fn get_all(&self, key: &K) -> Iter<'_, K, V> {
        let (first, last) = self.tree.equal_range(key);
        self.tree.range(first, last).expect("bounds come straight from the tree")
    }

    /// Removes every entry with key `key`, returning how many were removed.
    pub fn remove(&mut self, key: &K) -> usize {
        self.tree.erase_key(key)
    }
}
