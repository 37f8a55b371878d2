//! Ordered sets: [`Set`] keeps one copy of each value, [`MultiSet`] keeps them all.
//!
//! Both are thin wrappers over [`RBTree`] with a unit value type. All the balancing happens there.

use std::fmt::{self, Debug};

use crate::rbtree::{self, Compare, DuplicatePolicy, Natural, Position, RBTree, RevPosition};
use crate::TreeError;

/// In-order iterator over a set's values.
pub type Iter<'a, T> = rbtree::Keys<'a, T, ()>;
/// Owning in-order iterator over a set's values.
pub type IntoIter<T> = rbtree::IntoKeys<T, ()>;


/// An ordered set of unique values.
#[derive(Clone)]
pub struct Set<T, C = Natural> {
    tree: RBTree<T, (), C>,
}

/// An ordered set that may hold several equal values.
///
/// Equal values are kept in insertion order.
#[derive(Clone)]
pub struct MultiSet<T, C = Natural> {
    tree: RBTree<T, (), C>,
}

// everything except `insert`, which differs in what it returns
macro_rules! impl_set_common {
    ($set:ident, $policy:expr) => {
        impl<T: Ord> $set<T> {
            pub fn new() -> Self {
                Self::with_comparator(Natural)
            }
        }

        impl<T, C> $set<T, C> {
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

            /// The comparator ordering the values.
            pub fn key_comp(&self) -> &C {
                self.tree.comparator()
            }

            /// The comparator ordering the values. For sets this is the same as [`Self::key_comp`].
            pub fn value_comp(&self) -> &C {
                self.tree.comparator()
            }

            /// The underlying tree.
            pub fn as_tree(&self) -> &RBTree<T, (), C> {
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

            /// The value at `pos`.
            pub fn get(&self, pos: Position) -> Result<&T, TreeError> {
                self.tree.key(pos)
            }

            pub fn first(&self) -> Option<&T> {
                self.tree.first().map(|(value, _)| value)
            }

            pub fn last(&self) -> Option<&T> {
                self.tree.last().map(|(value, _)| value)
            }

            pub fn iter(&self) -> Iter<'_, T> {
                self.tree.keys()
            }

            /// Iterates over `[first, last)`.
            pub fn range(&self, first: Position, last: Position) -> Result<Iter<'_, T>, TreeError> {
                self.tree.range(first, last).map(rbtree::Keys)
            }

            pub fn clear(&mut self) {
                self.tree.clear()
            }

            /// Exchanges the contents (and comparators) of two sets.
            pub fn swap(&mut self, other: &mut Self) {
                self.tree.swap(&mut other.tree)
            }
        }

        impl<T, C: Compare<T>> $set<T, C> {
            /// Inserts every value from `iter`, returning how many were added.
            pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) -> usize {
                self.tree.insert_iter(iter.into_iter().map(|value| (value, ())))
            }

            /// Inserts `value`, returning the position of the element with that value.
            ///
            /// The hint is accepted for API compatibility and ignored, the search always starts at the root.
            pub fn insert_hint(&mut self, _hint: Position, value: T) -> Position {
                self.tree.insert(value, ()).0
            }

            /// Erases the element at `pos`, returning the position after it.
            pub fn erase(&mut self, pos: Position) -> Result<Position, TreeError> {
                self.tree.erase(pos)
            }

            /// Erases `[first, last)`, returning `last`.
            pub fn erase_range(&mut self, first: Position, last: Position) -> Result<Position, TreeError> {
                self.tree.erase_range(first, last)
            }

            /// Removes the element at `pos` and returns it.
            pub fn take_at(&mut self, pos: Position) -> Result<T, TreeError> {
                self.tree.remove_at(pos).map(|(value, _)| value)
            }

            /// Removes every element equal to `value`, returning how many were removed.
            pub fn remove(&mut self, value: &T) -> usize {
                self.tree.erase_key(value)
            }

            pub fn contains(&self, value: &T) -> bool {
                self.tree.contains_key(value)
            }

            pub fn find(&self, value: &T) -> Position {
                self.tree.find(value)
            }

            pub fn count(&self, value: &T) -> usize {
                self.tree.count(value)
            }

            pub fn lower_bound(&self, value: &T) -> Position {
                self.tree.lower_bound(value)
            }

            pub fn upper_bound(&self, value: &T) -> Position {
                self.tree.upper_bound(value)
            }

            pub fn equal_range(&self, value: &T) -> (Position, Position) {
                self.tree.equal_range(value)
            }

            pub fn pop_first(&mut self) -> Option<T> {
                self.tree.pop_first().map(|(value, _)| value)
            }

            pub fn pop_last(&mut self) -> Option<T> {
                self.tree.pop_last().map(|(value, _)| value)
            }
        }

        impl<T, C: Default> Default for $set<T, C> {
            fn default() -> Self {
                Self::with_comparator(C::default())
            }
        }

        impl<T: Debug, C> Debug for $set<T, C> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_set().entries(self.iter()).finish()
            }
        }

        impl<T: PartialEq, C> PartialEq for $set<T, C> {
            fn eq(&self, other: &Self) -> bool {
                self.tree == other.tree
            }
        }

        impl<T: Eq, C> Eq for $set<T, C> {}

        impl<T, C: Compare<T>> Extend<T> for $set<T, C> {
            fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
                self.insert_iter(iter);
            }
        }

        impl<T, C: Compare<T> + Default> FromIterator<T> for $set<T, C> {
            fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
                let mut set = Self::default();
                set.insert_iter(iter);
                set
            }
        }

        impl<T, C> IntoIterator for $set<T, C> {
            type Item = T;
            type IntoIter = IntoIter<T>;

            fn into_iter(self) -> Self::IntoIter {
                self.tree.into_keys()
            }
        }

        impl<'a, T, C> IntoIterator for &'a $set<T, C> {
            type Item = &'a T;
            type IntoIter = Iter<'a, T>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }
    };
}

impl_set_common!(Set, DuplicatePolicy::Unique);
impl_set_common!(MultiSet, DuplicatePolicy::Multi);

impl<T, C: Compare<T>> Set<T, C> {
    /// Inserts `value` unless an equal value is already present.
    ///
    /// Returns the position of the element holding that value, and whether it was just inserted.
    pub fn insert(&mut self, value: T) -> (Position, bool) {
        self.tree.insert(value, ())
    }

    /// Fallible version of [`Self::insert`], reporting allocation failure.
    pub fn try_insert(&mut self, value: T) -> Result<(Position, bool), TreeError> {
        self.tree.try_insert(value, ())
    }
}

impl<T, C: Compare<T>> MultiSet<T, C> {
    /// Inserts `value` after any equal values already present, returning its position.
    pub fn insert(&mut self, value: T) -> Position {
        self.tree.insert(value, ()).0
    }

    /// Fallible version of [`Self::insert`], reporting allocation failure.
    pub fn try_insert(&mut self, value: T) -> Result<Position, TreeError> {
        self.tree.try_insert(value, ()).map(|(pos, _)| pos)
    }
}
