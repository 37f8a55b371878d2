//! In-order traversal: successor/predecessor and the iterator types.

use std::iter::FusedIterator;

use super::node::{Arena, Node, NodeId, NIL};


impl<K, V> Arena<K, V> {
    /// The next node in key order, or the sentinel after the largest one.
    ///
    /// The sentinel's own successor is the sentinel.
    pub(super) fn successor(&self, id: NodeId) -> NodeId {
        if id == NIL { return NIL }

        let right = self.right(id);
        if right != NIL {
            return self.minimum(right)
        }

        let mut current = id;
        let mut parent = self.parent(current);
        while parent != NIL && self.right(parent) == current {
            current = parent;
            parent = self.parent(current);
        }
        parent
    }

    /// The previous node in key order.
    ///
    /// The predecessor of the sentinel is the largest node, and the predecessor of the smallest node
    /// is the sentinel, which is what makes reverse iteration from `end()` work.
    pub(super) fn predecessor(&self, id: NodeId) -> NodeId {
        if id == NIL {
            return self.maximum(self.root())
        }

        let left = self.left(id);
        if left != NIL {
            return self.maximum(left)
        }

        let mut current = id;
        let mut parent = self.parent(current);
        while parent != NIL && self.left(parent) == current {
            current = parent;
            parent = self.parent(current);
        }
        parent
    }

    /// Slot indices of every live node, in key order.
    pub(super) fn in_order(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut current = self.minimum(self.root());
        while current != NIL {
            order.push(current);
            current = self.successor(current);
        }
        order
    }
}


/// Borrowing iterator over `(&K, &V)` pairs in key order, between two positions.
///
/// Created by [`RBTree::iter`](super::RBTree::iter) and [`RBTree::range`](super::RBTree::range).
pub struct Iter<'a, K, V> {
    arena: &'a Arena<K, V>,
    // next node to yield from the front
    front: NodeId,
    // one past the last node to yield from the back
    back: NodeId,
    // exactly how many nodes lie in `[front, back)`
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(arena: &'a Arena<K, V>, front: NodeId, back: NodeId, remaining: usize) -> Self {
        Self { arena, front, back, remaining }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None
        }
        let arena = self.arena;
        let id = self.front;
        self.front = arena.successor(id);
        self.remaining -= 1;
        let (key, value) = arena.entry(id);
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None
        }
        let arena = self.arena;
        let id = arena.predecessor(self.back);
        self.back = id;
        self.remaining -= 1;
        let (key, value) = arena.entry(id);
        Some((key, value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}


/// Iterator over `(&K, &mut V)` pairs in key order.
pub struct IterMut<'a, K, V> {
    order: std::vec::IntoIter<NodeId>,
    // indexed by slot, each entry is handed out at most once
    entries: Vec<Option<(&'a K, &'a mut V)>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(super) fn new(arena: &'a mut Arena<K, V>) -> Self {
        let order = arena.in_order().into_iter();
        let entries = arena.nodes.iter_mut()
            .map(|node| node.entry.as_mut().map(|(key, value)| (&*key, value)))
            .collect();
        Self { order, entries }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        self.entries[id].take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.order.next_back()?;
        self.entries[id].take()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}


/// Owning iterator over `(K, V)` pairs in key order.
pub struct IntoIter<K, V> {
    order: std::vec::IntoIter<NodeId>,
    nodes: Vec<Node<K, V>>,
}

impl<K, V> IntoIter<K, V> {
    pub(super) fn new(arena: Arena<K, V>) -> Self {
        let order = arena.in_order().into_iter();
        Self { order, nodes: arena.nodes }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        self.nodes[id].entry.take()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.order.next_back()?;
        self.nodes[id].entry.take()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}


/// Iterator over the keys of a tree, in order.
pub struct Keys<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}


/// Iterator over the values of a tree, in key order.
pub struct Values<'a, K, V>(pub(crate) Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}


/// Owning iterator over the keys of a tree, in order.
pub struct IntoKeys<K, V>(pub(crate) IntoIter<K, V>);

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {}
impl<K, V> FusedIterator for IntoKeys<K, V> {}


#[cfg(test)]
mod tests {
    use crate::{DuplicatePolicy, RBTree};

    fn tree_of(keys: &[i32]) -> RBTree<i32, i32> {
        let mut tree = RBTree::new(DuplicatePolicy::Unique);
        for &k in keys {
            tree.insert(k, k * 10);
        }
        tree
    }

    #[test]
    fn successor_and_predecessor_walk_every_node() {
        let tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let arena = &tree.arena;

        let mut forward = vec![];
        let mut id = arena.minimum(arena.root());
        while id != super::NIL {
            forward.push(*arena.key(id));
            id = arena.successor(id);
        }
        assert_eq!(forward, [1, 3, 4, 5, 7, 8, 9]);

        // walking back starts from the sentinel
        let mut backward = vec![];
        let mut id = arena.predecessor(super::NIL);
        while id != super::NIL {
            backward.push(*arena.key(id));
            id = arena.predecessor(id);
        }
        assert_eq!(backward, [9, 8, 7, 5, 4, 3, 1]);
        assert_eq!(arena.successor(super::NIL), super::NIL);
    }

    #[test]
    fn iter_from_both_ends() {
        let tree = tree_of(&[5, 3, 8, 1, 4, 7, 9]);
        let mut iter = tree.keys();
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&9));
        assert_eq!(iter.next_back(), Some(&8));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.collect::<Vec<_>>(), [&4, &5, &7]);

        assert_eq!(tree.values().rev().copied().collect::<Vec<_>>(), [90, 80, 70, 50, 40, 30, 10]);
    }

    #[test]
    fn empty_tree_iterators() {
        let tree = RBTree::<i32, ()>::new(DuplicatePolicy::Multi);
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.iter().next_back(), None);
        assert_eq!(tree.into_iter().next(), None);
    }

    #[test]
    fn iter_mut_and_into_iter() {
        let mut tree = tree_of(&[2, 1, 3]);
        for (k, v) in tree.iter_mut() {
            *v += k;
        }
        assert_eq!(tree.iter_mut().len(), 3);
        assert_eq!(tree.into_iter().rev().collect::<Vec<_>>(), [(3, 33), (2, 22), (1, 11)]);
    }
}
