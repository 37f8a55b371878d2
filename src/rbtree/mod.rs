//! Arena-backed red-black tree.
//!
//! This is the ordered index behind every container in the crate. Nodes live in a slab and refer to
//! each other by slot index, with slot 0 reserved for a black sentinel that stands in for every
//! missing child and for the past-the-end position.

use std::fmt::{self, Debug};

use log::{debug, error, trace};

use crate::TreeError;

mod balance;
mod check;
mod compare;
mod cursor;
mod node;

pub use check::InvariantViolation;
pub use compare::{Compare, DuplicatePolicy, Natural, Reversed};
pub use cursor::{IntoIter, IntoKeys, Iter, IterMut, Keys, Values};
pub use node::{Position, RevPosition};

use node::{Arena, Node, NodeId, NIL};

// PROVE: any node with height `h` has black height at least `h/2`
// PROVE: the subtree located at any node `x` contains at least `2^bh(x) - 1` nodes (use induction)
// LEMMA: An RBTree with `n` internal nodes has height at most `2*log₂(n+1)`

/// A red-black tree mapping keys to values, ordered by a [`Compare`] implementation.
///
/// Whether equal keys may coexist is decided by the [`DuplicatePolicy`] given at construction.
/// Elements are addressed by [`Position`]s, which survive any insertion or erasure of *other* elements.
///
/// Complexity: O(log n) insert, erase, lookup. O(n) clear and full traversal.
#[derive(Clone)]
pub struct RBTree<K, V, C = Natural> {
    arena: Arena<K, V>,
    len: usize,
    comparator: C,
    policy: DuplicatePolicy,
}

impl<K: Ord, V> RBTree<K, V> {
    /// Creates an empty tree ordered by `K`'s [`Ord`] implementation.
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self::with_comparator(Natural, policy)
    }
}

impl<K, V, C> RBTree<K, V, C> {
    /// Creates an empty tree ordered by `comparator`.
    pub fn with_comparator(comparator: C, policy: DuplicatePolicy) -> Self {
        Self {
            arena: Arena::new(),
            len: 0,
            comparator,
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// The number of elements in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An upper bound on how many elements a tree could ever hold.
    pub fn max_size(&self) -> usize {
        isize::MAX as usize / size_of::<Node<K, V>>()
    }

    /// Position of the smallest element, or [`Self::end`] if the tree is empty.
    pub fn begin(&self) -> Position {
        self.arena.position(self.arena.minimum(self.arena.root()))
    }

    /// The past-the-end position. It never names an element.
    pub fn end(&self) -> Position {
        Position::END
    }

    /// Reverse position of the largest element, or [`Self::rend`] if the tree is empty.
    pub fn rbegin(&self) -> RevPosition {
        RevPosition(self.arena.position(self.arena.predecessor(NIL)))
    }

    pub fn rend(&self) -> RevPosition {
        RevPosition(Position::END)
    }

    /// Looks up the node a position names, rejecting the end position.
    fn resolve(&self, pos: Position) -> Result<NodeId, TreeError> {
        if pos.is_end() {
            error!("the end position was used where an element was expected");
            return Err(TreeError::EndPosition)
        }
        self.resolve_bound(pos)
    }

    /// Like [`Self::resolve`], but the end position is fine (it resolves to the sentinel).
    fn resolve_bound(&self, pos: Position) -> Result<NodeId, TreeError> {
        if pos.is_end() {
            return Ok(NIL)
        }
        if !self.arena.is_live(pos.node) || self.arena.nodes[pos.node].generation != pos.generation {
            error!("{pos:?} refers to an element that is no longer in the tree");
            return Err(TreeError::StalePosition)
        }
        Ok(pos.node)
    }

    /// The position after `pos`. Stepping forward from the end is an error.
    pub fn next(&self, pos: Position) -> Result<Position, TreeError> {
        let id = self.resolve(pos)?;
        Ok(self.arena.position(self.arena.successor(id)))
    }

    /// The position before `pos`.
    ///
    /// Stepping back from the end lands on the largest element, and stepping back from the smallest
    /// element lands on the end.
    pub fn prev(&self, pos: Position) -> Result<Position, TreeError> {
        let id = self.resolve_bound(pos)?;
        Ok(self.arena.position(self.arena.predecessor(id)))
    }

    /// Advances a reverse position, i.e. moves it to the next smaller element.
    pub fn rnext(&self, pos: RevPosition) -> Result<RevPosition, TreeError> {
        let id = self.resolve(pos.0)?;
        Ok(RevPosition(self.arena.position(self.arena.predecessor(id))))
    }

    /// The element at `pos`.
    pub fn get(&self, pos: Position) -> Result<(&K, &V), TreeError> {
        let id = self.resolve(pos)?;
        let (key, value) = self.arena.entry(id);
        Ok((key, value))
    }

    pub fn key(&self, pos: Position) -> Result<&K, TreeError> {
        self.get(pos).map(|(key, _)| key)
    }

    /// Mutable access to the value at `pos`. Keys can't be changed in place, that could break the ordering.
    pub fn get_mut(&mut self, pos: Position) -> Result<&mut V, TreeError> {
        let id = self.resolve(pos)?;
        Ok(&mut self.arena.entry_mut(id).1)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        let id = self.arena.minimum(self.arena.root());
        if id == NIL { return None }
        let (key, value) = self.arena.entry(id);
        Some((key, value))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        let id = self.arena.maximum(self.arena.root());
        if id == NIL { return None }
        let (key, value) = self.arena.entry(id);
        Some((key, value))
    }

    /// Drops every element. All outstanding positions except `end()` become stale.
    ///
    /// Complexity: O(n)
    pub fn clear(&mut self) {
        debug!("clearing tree of {} elements", self.len);
        self.arena.clear();
        self.len = 0;
    }

    /// Exchanges the contents of two trees, in O(1).
    ///
    /// Everything travels together: nodes (with their sentinels), comparator and duplicate policy.
    /// Positions keep naming the same elements, which now live in the other tree.
    pub fn swap(&mut self, other: &mut Self) {
        debug!("swapping trees of {} and {} elements", self.len, other.len);
        std::mem::swap(self, other);
    }

    /// Iterates over all elements in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.arena.minimum(self.arena.root()), NIL, self.len)
    }

    /// Resolves both ends of `[first, last)` and counts the elements in between.
    ///
    /// Fails with [`TreeError::InvalidRange`] if walking forward from `first` never meets `last`.
    fn span(&self, first: Position, last: Position) -> Result<(NodeId, NodeId, usize), TreeError> {
        let start = self.resolve_bound(first)?;
        let end = self.resolve_bound(last)?;

        let mut count = 0;
        let mut probe = start;
        while probe != end {
            if probe == NIL {
                error!("{last:?} can't be reached from {first:?}");
                return Err(TreeError::InvalidRange)
            }
            probe = self.arena.successor(probe);
            count += 1;
        }
        Ok((start, end, count))
    }

    /// Iterates over the half-open range `[first, last)`.
    ///
    /// Fails with [`TreeError::InvalidRange`] if `last` comes before `first`.
    ///
    /// Complexity: O(k) to set up, for a range of k elements
    pub fn range(&self, first: Position, last: Position) -> Result<Iter<'_, K, V>, TreeError> {
        let (start, end, count) = self.span(first, last)?;
        Ok(Iter::new(&self.arena, start, end, count))
    }

    /// Iterates over all elements in key order, with mutable access to the values.
    ///
    /// Complexity: O(n) to set up
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.arena)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys(self.into_iter())
    }
}

impl<K, V, C: Compare<K>> RBTree<K, V, C> {
    /// Where a new `key` would be attached: `Ok((parent, side))`, or `Err(existing)` if the policy
    /// rejects it because of an equal key.
    fn locate_insert(&self, key: &K) -> Result<(NodeId, node::Side), NodeId> {
        let mut parent = NIL;
        let mut side = node::Side::Left;
        let mut current = self.arena.root();

        while current != NIL {
            parent = current;
            side = match self.comparator.compare(key, self.arena.key(current)) {
                std::cmp::Ordering::Less => node::Side::Left,
                std::cmp::Ordering::Greater => node::Side::Right,
                std::cmp::Ordering::Equal => match self.policy {
                    DuplicatePolicy::Unique => return Err(current),
                    // equal keys go to the right, after every equal key already present
                    DuplicatePolicy::Multi => node::Side::Right,
                },
            };
            current = self.arena.child(current, side);
        }

        Ok((parent, side))
    }

    /// Inserts `key` with `value`.
    ///
    /// Returns the position of the new element and `true`, or, when the policy is
    /// [`DuplicatePolicy::Unique`] and an equal key is present, the position of that element and
    /// `false` (in which case nothing changed, and `key` and `value` are dropped).
    ///
    /// A failed node allocation is reported as [`TreeError::OutOfMemory`] and leaves the tree untouched.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Position, bool), TreeError> {
        let (parent, side) = match self.locate_insert(&key) {
            Ok(slot) => slot,
            Err(existing) => return Ok((self.arena.position(existing), false)),
        };

        let id = self.arena.alloc(key, value, parent)?;
        if parent == NIL {
            self.arena.set_root(id);
        } else {
            self.arena.set_child(parent, side, id);
        }
        self.len += 1;
        trace!("linked slot {id} under slot {parent} ({side:?})");

        self.insert_fixup(id);
        self.debug_validate();
        Ok((self.arena.position(id), true))
    }

    /// Like [`Self::try_insert`], but panics if the node can't be allocated.
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        match self.try_insert(key, value) {
            Ok(inserted) => inserted,
            Err(err) => panic!("failed to insert into red-black tree: {err}"),
        }
    }

    /// Inserts every pair from `iter` in turn, returning how many were actually added.
    ///
    /// Not atomic: if an insertion panics, the pairs before it stay in the tree.
    pub fn insert_iter<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) -> usize {
        let before = self.len;
        for (key, value) in iter {
            self.insert(key, value);
        }
        debug!("bulk insert added {} elements", self.len - before);
        self.len - before
    }

    /// Unlinks, frees and returns the element in slot `id`.
    fn detach(&mut self, id: NodeId) -> (K, V) {
        self.unlink(id);
        self.len -= 1;
        let entry = self.arena.release(id);
        trace!("released slot {id}");
        entry
    }

    /// Erases the element at `pos`, returning the position of the element that followed it.
    ///
    /// Only `pos` itself is invalidated.
    pub fn erase(&mut self, pos: Position) -> Result<Position, TreeError> {
        let id = self.resolve(pos)?;
        let next = self.arena.successor(id);
        self.detach(id);
        self.debug_validate();
        Ok(self.arena.position(next))
    }

    /// Erases the element at `pos` and hands it back.
    pub fn remove_at(&mut self, pos: Position) -> Result<(K, V), TreeError> {
        let id = self.resolve(pos)?;
        let entry = self.detach(id);
        self.debug_validate();
        Ok(entry)
    }

    /// Erases every element in `[first, last)` and returns `last`.
    ///
    /// If `last` is not reachable from `first`, nothing is erased.
    pub fn erase_range(&mut self, first: Position, last: Position) -> Result<Position, TreeError> {
        let (mut current, end, _) = self.span(first, last)?;
        while current != end {
            let next = self.arena.successor(current);
            self.detach(current);
            current = next;
        }
        self.debug_validate();
        Ok(last)
    }

    /// Erases every element whose key equals `key`, returning how many went.
    ///
    /// That is 0 or 1 for [`DuplicatePolicy::Unique`].
    pub fn erase_key(&mut self, key: &K) -> usize {
        match self.policy {
            DuplicatePolicy::Unique => {
                let id = self.find_node(key);
                if id == NIL { return 0 }
                self.detach(id);
                self.debug_validate();
                1
            }
            DuplicatePolicy::Multi => {
                let mut current = self.lower_bound_node(key);
                let end = self.upper_bound_node(key);
                let mut removed = 0;
                while current != end {
                    let next = self.arena.successor(current);
                    self.detach(current);
                    current = next;
                    removed += 1;
                }
                self.debug_validate();
                removed
            }
        }
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let id = self.arena.minimum(self.arena.root());
        if id == NIL { return None }
        let entry = self.detach(id);
        self.debug_validate();
        Some(entry)
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let id = self.arena.maximum(self.arena.root());
        if id == NIL { return None }
        let entry = self.detach(id);
        self.debug_validate();
        Some(entry)
    }

    /// First node whose key is not ordered before `key`.
    fn lower_bound_node(&self, key: &K) -> NodeId {
        let mut best = NIL;
        let mut current = self.arena.root();
        while current != NIL {
            if self.comparator.compare(self.arena.key(current), key).is_lt() {
                current = self.arena.right(current);
            } else {
                best = current;
                current = self.arena.left(current);
            }
        }
        best
    }

    /// First node whose key is ordered after `key`.
    fn upper_bound_node(&self, key: &K) -> NodeId {
        let mut best = NIL;
        let mut current = self.arena.root();
        while current != NIL {
            if self.comparator.compare(self.arena.key(current), key).is_gt() {
                best = current;
                current = self.arena.left(current);
            } else {
                current = self.arena.right(current);
            }
        }
        best
    }

    fn find_node(&self, key: &K) -> NodeId {
        let id = self.lower_bound_node(key);
        if id != NIL && self.comparator.compare(key, self.arena.key(id)).is_eq() {
            id
        } else {
            NIL
        }
    }

    /// Position of an element with key `key`, or [`Self::end`] if there is none.
    ///
    /// With duplicates, this is the first of the equal keys.
    pub fn find(&self, key: &K) -> Position {
        self.arena.position(self.find_node(key))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_node(key) != NIL
    }

    /// The element with key `key`, if any.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let id = self.find_node(key);
        if id == NIL { return None }
        let (key, value) = self.arena.entry(id);
        Some((key, value))
    }

    /// How many elements have a key equal to `key`.
    ///
    /// Complexity: O(log n + count)
    pub fn count(&self, key: &K) -> usize {
        let mut current = self.lower_bound_node(key);
        let end = self.upper_bound_node(key);
        let mut count = 0;
        while current != end {
            count += 1;
            current = self.arena.successor(current);
        }
        count
    }

    /// Position of the first element whose key is not ordered before `key`.
    pub fn lower_bound(&self, key: &K) -> Position {
        self.arena.position(self.lower_bound_node(key))
    }

    /// Position of the first element whose key is ordered after `key`.
    pub fn upper_bound(&self, key: &K) -> Position {
        self.arena.position(self.upper_bound_node(key))
    }

    /// The half-open range of elements whose key equals `key`.
    pub fn equal_range(&self, key: &K) -> (Position, Position) {
        (self.lower_bound(key), self.upper_bound(key))
    }
}

impl<K, V, C: Default> Default for RBTree<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default(), DuplicatePolicy::default())
    }
}

impl<K: Debug, V: Debug, C> Debug for RBTree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RBTree<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for RBTree<K, V, C> {}

impl<K, V, C: Compare<K>> Extend<(K, V)> for RBTree<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.insert_iter(iter);
    }
}

/// Collects into a [`DuplicatePolicy::Unique`] tree. Later duplicates are dropped.
impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for RBTree<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.insert_iter(iter);
        tree
    }
}

impl<K, V, C> IntoIterator for RBTree<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.arena)
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBTree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut RBTree<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn unique_of(keys: &[i32]) -> RBTree<i32, ()> {
        let mut tree = RBTree::new(DuplicatePolicy::Unique);
        for &k in keys {
            tree.insert(k, ());
        }
        tree
    }

    fn keys<V, C>(tree: &RBTree<i32, V, C>) -> Vec<i32> {
        tree.keys().copied().collect()
    }

    #[test]
    fn scenario_single_key() {
        crate::test_logging::init();
        let mut tree = unique_of(&[5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(keys(&tree), [1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(tree.len(), 7);
        assert!(tree.arena.is_black(tree.arena.root()));

        assert_eq!(tree.erase_key(&3), 1);
        assert_eq!(keys(&tree), [1, 4, 5, 7, 8, 9]);
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.validate(), Ok(()));

        let eight = tree.find(&8);
        assert_ne!(eight, tree.end());
        assert_eq!(tree.key(eight), Ok(&8));
        assert_eq!(tree.find(&100), tree.end());

        assert_eq!(tree.key(tree.lower_bound(&4)), Ok(&4));
        assert_eq!(tree.key(tree.upper_bound(&4)), Ok(&5));
    }

    #[test]
    fn scenario_multi_key() {
        crate::test_logging::init();
        let mut tree = RBTree::new(DuplicatePolicy::Multi);
        for (i, k) in [2, 2, 2, 1, 3].into_iter().enumerate() {
            assert!(tree.insert(k, i).1);
        }
        assert_eq!(tree.count(&2), 3);

        let (lo, hi) = tree.equal_range(&2);
        let run: Vec<_> = tree.range(lo, hi).unwrap().collect();
        // equal keys keep their insertion order
        assert_eq!(run, [(&2, &0), (&2, &1), (&2, &2)]);
        assert_eq!(tree.prev(lo).map(|p| tree.key(p).copied()), Ok(Ok(1)));
        assert_eq!(tree.key(hi), Ok(&3));

        assert_eq!(tree.find(&2), lo);
        assert_eq!(tree.erase_key(&2), 3);
        assert_eq!(tree.count(&2), 0);
        assert_eq!(keys(&tree), [1, 3]);
    }

    #[test]
    fn duplicate_insert_is_rejected_without_changes() {
        let mut tree = RBTree::new(DuplicatePolicy::Unique);
        let (first, inserted) = tree.insert(1, "one");
        assert!(inserted);
        let (again, inserted) = tree.insert(1, "uno");
        assert!(!inserted);
        assert_eq!(again, first);
        assert_eq!(tree.get(first), Ok((&1, &"one")));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn erase_returns_following_position() {
        let mut tree = unique_of(&[1, 2, 3, 4]);
        let two = tree.find(&2);
        let next = tree.erase(two).unwrap();
        assert_eq!(tree.key(next), Ok(&3));

        let last = tree.find(&4);
        assert_eq!(tree.erase(last), Ok(tree.end()));
        assert_eq!(keys(&tree), [1, 3]);
    }

    #[test]
    fn end_and_stale_positions_fail_loudly() {
        let mut tree = unique_of(&[1, 2, 3]);
        assert_eq!(tree.get(tree.end()), Err(TreeError::EndPosition));
        assert_eq!(tree.erase(tree.end()), Err(TreeError::EndPosition));
        assert_eq!(tree.next(tree.end()), Err(TreeError::EndPosition));

        let two = tree.find(&2);
        tree.erase(two).unwrap();
        assert_eq!(tree.get(two), Err(TreeError::StalePosition));
        assert_eq!(tree.erase(two), Err(TreeError::StalePosition));

        // the freed slot gets reused, the old position must not alias the new element
        let (fresh, _) = tree.insert(10, ());
        assert_ne!(fresh, two);
        assert_eq!(tree.get(two), Err(TreeError::StalePosition));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn positions_survive_unrelated_mutations() {
        let mut tree = RBTree::new(DuplicatePolicy::Unique);
        for k in 0..100 {
            tree.insert(k, k * 2);
        }
        let kept = tree.find(&50);
        // 51 is the successor of 50, erasing 50's neighbours moves nodes around it
        for k in (0..100).filter(|k| *k != 50) {
            if k % 3 == 0 {
                tree.erase_key(&k);
            }
        }
        tree.erase_key(&49);
        tree.erase_key(&51);
        for k in 100..150 {
            tree.insert(k, k * 2);
        }
        assert_eq!(tree.get(kept), Ok((&50, &100)));
        *tree.get_mut(kept).unwrap() = 7;
        assert_eq!(tree.get_key_value(&50), Some((&50, &7)));
    }

    #[test]
    fn erasing_a_two_child_node_keeps_its_successor_position() {
        let mut tree = unique_of(&[5, 3, 8, 1, 4, 7, 9]);
        // 5 is the root and has two children, its successor 7 is relinked into its place
        let seven = tree.find(&7);
        tree.erase_key(&5);
        assert_eq!(tree.key(seven), Ok(&7));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn reverse_positions() {
        let tree = unique_of(&[2, 1, 3]);
        let mut seen = vec![];
        let mut pos = tree.rbegin();
        while pos != tree.rend() {
            seen.push(*tree.key(pos.position()).unwrap());
            pos = tree.rnext(pos).unwrap();
        }
        assert_eq!(seen, [3, 2, 1]);
        assert_eq!(tree.rnext(tree.rend()), Err(TreeError::EndPosition));

        let empty = RBTree::<i32, ()>::new(DuplicatePolicy::Unique);
        assert_eq!(empty.rbegin(), empty.rend());
        assert_eq!(empty.begin(), empty.end());
        assert_eq!(empty.prev(empty.end()), Ok(empty.end()));
    }

    #[test]
    fn forward_walk_with_positions() {
        let tree = unique_of(&[4, 2, 6]);
        let mut pos = tree.begin();
        let mut seen = vec![];
        while pos != tree.end() {
            seen.push(*tree.key(pos).unwrap());
            pos = tree.next(pos).unwrap();
        }
        assert_eq!(seen, [2, 4, 6]);
        assert_eq!(tree.prev(tree.end()).and_then(|p| tree.key(p).copied()), Ok(6));
        assert_eq!(tree.prev(tree.begin()), Ok(tree.end()));
    }

    #[test]
    fn erase_range_removes_half_open_range() {
        let mut tree = unique_of(&(1..=10).collect::<Vec<_>>());
        let first = tree.find(&3);
        let last = tree.find(&7);
        assert_eq!(tree.erase_range(first, last), Ok(last));
        assert_eq!(keys(&tree), [1, 2, 7, 8, 9, 10]);

        // backwards range: nothing happens
        let (a, b) = (tree.find(&9), tree.find(&2));
        assert_eq!(tree.erase_range(a, b), Err(TreeError::InvalidRange));
        assert_eq!(tree.len(), 6);

        let begin = tree.begin();
        assert_eq!(tree.erase_range(begin, tree.end()), Ok(tree.end()));
        assert!(tree.is_empty());
        assert_eq!(tree.begin(), tree.end());
    }

    #[test]
    fn range_agrees_from_both_ends() {
        let tree = unique_of(&[1, 2, 3, 4, 5]);
        let (two, four) = (tree.find(&2), tree.find(&4));

        let range = tree.range(two, four).unwrap();
        assert_eq!(range.len(), 2);
        assert_eq!(range.clone().map(|(k, _)| *k).collect::<Vec<_>>(), [2, 3]);
        assert_eq!(range.rev().map(|(k, _)| *k).collect::<Vec<_>>(), [3, 2]);

        let mut range = tree.range(two, tree.end()).unwrap();
        assert_eq!(range.next_back(), Some((&5, &())));
        assert_eq!(range.next(), Some((&2, &())));
        assert_eq!(range.map(|(k, _)| *k).collect::<Vec<_>>(), [3, 4]);

        assert_eq!(tree.range(four, four).unwrap().next_back(), None);
        assert_eq!(tree.range(tree.end(), tree.end()).unwrap().count(), 0);
    }

    #[test]
    fn unreachable_range_is_rejected() {
        let tree = unique_of(&[1, 2, 3, 4, 5]);
        let (two, three, four) = (tree.find(&2), tree.find(&3), tree.find(&4));
        assert!(matches!(tree.range(four, two), Err(TreeError::InvalidRange)));
        assert!(matches!(tree.range(tree.end(), three), Err(TreeError::InvalidRange)));
    }

    #[test]
    fn round_trip_to_empty() {
        let mut tree = RBTree::new(DuplicatePolicy::Unique);
        let keys: Vec<u32> = (0..200).map(|i| (i * 7919) % 200).collect();
        for &k in &keys {
            tree.insert(k, ());
        }
        assert_eq!(tree.len(), 200);
        for &k in keys.iter().rev() {
            assert_eq!(tree.erase_key(&k), 1);
        }
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.begin(), tree.end());
        assert_eq!(tree.erase_key(&3), 0);
    }

    #[test]
    fn clear_and_swap() {
        let mut a = unique_of(&[1, 2, 3]);
        let mut b = RBTree::new(DuplicatePolicy::Multi);
        b.insert(9, ());
        b.insert(9, ());

        let one = a.find(&1);
        a.swap(&mut b);
        assert_eq!(keys(&a), [9, 9]);
        assert_eq!(a.policy(), DuplicatePolicy::Multi);
        assert_eq!(keys(&b), [1, 2, 3]);
        // positions follow their elements
        assert_eq!(b.key(one), Ok(&1));
        assert_eq!(a.begin(), a.find(&9));

        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.begin(), b.end());
        assert_eq!(b.key(one), Err(TreeError::StalePosition));
        b.insert(5, ());
        assert_eq!(keys(&b), [5]);
        assert_eq!(b.validate(), Ok(()));
    }

    #[test]
    fn positions_from_before_clear_stay_stale() {
        let mut tree = unique_of(&(0..100).collect::<Vec<_>>());
        let held: Vec<_> = (0..100).map(|k| tree.find(&k)).collect();
        tree.clear();
        assert_eq!(tree.arena.nodes.len(), 1);

        // refill, the same slot numbers come back
        for k in 0..100 {
            tree.insert(k, ());
        }
        assert!(held.iter().all(|&pos| tree.get(pos) == Err(TreeError::StalePosition)));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn custom_comparator() {
        let mut tree = RBTree::with_comparator(Reversed, DuplicatePolicy::Unique);
        tree.extend([(1, 'a'), (3, 'c'), (2, 'b')]);
        assert_eq!(keys(&tree), [3, 2, 1]);
        assert_eq!(tree.key(tree.lower_bound(&2)), Ok(&2));
        assert_eq!(tree.key(tree.upper_bound(&2)), Ok(&1));

        let by_abs = |a: &i32, b: &i32| a.abs().cmp(&b.abs());
        let mut tree = RBTree::with_comparator(by_abs, DuplicatePolicy::Unique);
        tree.insert(-2, ());
        assert!(!tree.insert(2, ()).1);
        tree.insert(1, ());
        assert_eq!(keys(&tree), [1, -2]);
    }

    #[test]
    fn pops_and_ends() {
        let mut tree: RBTree<i32, &str> = [(2, "b"), (1, "a"), (3, "c"), (1, "z")].into_iter().collect();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.first(), Some((&1, &"a")));
        assert_eq!(tree.last(), Some((&3, &"c")));
        assert_eq!(tree.pop_first(), Some((1, "a")));
        assert_eq!(tree.pop_last(), Some((3, "c")));
        assert_eq!(tree.remove_at(tree.begin()), Ok((2, "b")));
        assert_eq!(tree.pop_first(), None);
        assert_eq!(tree.first(), None);
    }

    #[test]
    fn clone_eq_and_debug() {
        let tree = unique_of(&[3, 1, 2]);
        let copy = tree.clone();
        assert_eq!(tree, copy);
        assert_eq!(format!("{copy:?}"), "{1: (), 2: (), 3: ()}");
        assert_ne!(tree, unique_of(&[1, 2]));
        assert!(tree.max_size() > 0);
    }
}
