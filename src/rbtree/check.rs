use std::cmp::Ordering;

use log::error;
use thiserror::Error;

use super::compare::{Compare, DuplicatePolicy};
use super::node::{NodeId, NIL};
use super::RBTree;


/// The first broken red-black or search-tree invariant found by [`RBTree::validate`].
///
/// Node numbers are arena slots, only useful for telling nodes apart in a dump.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("the sentinel is not black, or has children")]
    CorruptSentinel,
    #[error("the root (slot {root}) is red")]
    RedRoot { root: usize },
    #[error("red node at slot {node} has a red parent")]
    RedParent { node: usize },
    #[error("leaf edge under slot {node} has black height {found}, expected {expected}")]
    BlackHeight { node: usize, expected: usize, found: usize },
    #[error("slot {child} does not link back to its parent (slot {parent})")]
    BrokenParentLink { child: usize, parent: usize },
    #[error("slot {node} is not ordered after its predecessor (slot {previous})")]
    OutOfOrder { node: usize, previous: usize },
    #[error("the tree claims {expected} elements but {found} are reachable")]
    SizeMismatch { expected: usize, found: usize },
}

impl<K, V, C: Compare<K>> RBTree<K, V, C> {
    /// Checks every structural invariant of the tree.
    ///
    /// - the sentinel is black
    /// - the root is black
    /// - no red node has a red parent
    /// - every root-to-leaf path has the same number of black nodes
    /// - parent links mirror child links, and the root's parent is the sentinel
    /// - keys are in order (strictly, for [`DuplicatePolicy::Unique`])
    /// - `len()` matches the number of reachable nodes
    ///
    /// Complexity: O(n)
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let arena = &self.arena;
        let root = arena.root();

        if arena.is_red(NIL) || arena.left(NIL) != NIL || arena.right(NIL) != NIL {
            return Err(InvariantViolation::CorruptSentinel)
        }
        if arena.is_red(root) {
            return Err(InvariantViolation::RedRoot { root })
        }
        if root != NIL && arena.parent(root) != NIL {
            return Err(InvariantViolation::BrokenParentLink { child: root, parent: NIL })
        }

        // depth first, carrying the number of black nodes seen on the way down
        let mut expected_black_height: Option<usize> = None;
        let mut reachable = 0;
        let mut stack: Vec<(NodeId, usize)> = Vec::new();
        if root != NIL {
            stack.push((root, 0));
        }

        while let Some((node, blacks_above)) = stack.pop() {
            reachable += 1;
            let blacks = blacks_above + usize::from(arena.is_black(node));

            if arena.is_red(node) && arena.is_red(arena.parent(node)) {
                return Err(InvariantViolation::RedParent { node })
            }

            for child in [arena.left(node), arena.right(node)] {
                if child == NIL {
                    let expected = *expected_black_height.get_or_insert(blacks);
                    if expected != blacks {
                        return Err(InvariantViolation::BlackHeight { node, expected, found: blacks })
                    }
                    continue
                }
                if arena.parent(child) != node {
                    return Err(InvariantViolation::BrokenParentLink { child, parent: node })
                }
                stack.push((child, blacks));
            }
        }

        if reachable != self.len {
            return Err(InvariantViolation::SizeMismatch { expected: self.len, found: reachable })
        }

        let mut previous = arena.minimum(root);
        let mut current = arena.successor(previous);
        while current != NIL {
            let ordering = self.comparator.compare(arena.key(previous), arena.key(current));
            let in_order = match self.policy {
                DuplicatePolicy::Unique => ordering == Ordering::Less,
                DuplicatePolicy::Multi => ordering != Ordering::Greater,
            };
            if !in_order {
                return Err(InvariantViolation::OutOfOrder { node: current, previous })
            }
            previous = current;
            current = arena.successor(current);
        }

        Ok(())
    }

    /// Runs [`Self::validate`] in debug builds, panicking on the first violation.
    ///
    /// Called once at the end of every public mutation, never per node.
    pub(super) fn debug_validate(&self) {
        if !cfg!(debug_assertions) { return }
        #[cfg(test)]
        VALIDATIONS.with(|count| count.set(count.get() + 1));
        if let Err(violation) = self.validate() {
            error!("red-black tree invariant violated: {violation}");
            panic!("red-black tree invariant violated: {violation}");
        }
    }
}

#[cfg(test)]
thread_local! {
    /// How many times `debug_validate` ran on this thread.
    pub(crate) static VALIDATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

#[cfg(test)]
impl<K, V, C> RBTree<K, V, C> {
    /// Number of nodes on the longest root-to-leaf path.
    pub(crate) fn height(&self) -> usize {
        let arena = &self.arena;
        let mut tallest = 0;
        let mut stack = vec![(arena.root(), 0)];
        while let Some((node, depth)) = stack.pop() {
            if node == NIL {
                tallest = tallest.max(depth);
                continue
            }
            stack.push((arena.left(node), depth + 1));
            stack.push((arena.right(node), depth + 1));
        }
        tallest
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::rbtree::node::Color;

    fn sample() -> RBTree<i32, ()> {
        let mut tree = RBTree::new(DuplicatePolicy::Unique);
        for k in [5, 3, 8, 1, 4, 7, 9] {
            tree.insert(k, ());
        }
        tree
    }

    #[test]
    fn healthy_tree_passes() {
        assert_eq!(sample().validate(), Ok(()));
        assert_eq!(RBTree::<i32, ()>::new(DuplicatePolicy::Multi).validate(), Ok(()));
    }

    #[test]
    fn detects_red_root() {
        let mut tree = sample();
        let root = tree.arena.root();
        tree.arena.set_color(root, Color::Red);
        assert_eq!(tree.validate(), Err(InvariantViolation::RedRoot { root }));
    }

    #[test]
    fn detects_root_with_a_parent() {
        let mut tree = sample();
        let root = tree.arena.root();
        let leaf = tree.arena.maximum(root);
        tree.arena.set_parent(root, leaf);
        assert_eq!(tree.validate(), Err(InvariantViolation::BrokenParentLink { child: root, parent: NIL }));
    }

    #[test]
    fn detects_black_height_mismatch() {
        let mut tree = sample();
        // recolor one leaf so its paths carry one black too many
        let leaf = tree.arena.minimum(tree.arena.root());
        tree.arena.set_color(leaf, Color::Black);
        assert!(matches!(tree.validate(), Err(InvariantViolation::BlackHeight { .. })));
    }

    #[test]
    fn detects_out_of_order_keys() {
        let mut tree = sample();
        let first = tree.arena.minimum(tree.arena.root());
        tree.arena.entry_mut(first).0 = 100;
        assert!(matches!(tree.validate(), Err(InvariantViolation::OutOfOrder { .. })));
    }

    #[test]
    fn detects_size_mismatch() {
        let mut tree = sample();
        tree.len += 1;
        assert_eq!(tree.validate(), Err(InvariantViolation::SizeMismatch { expected: 8, found: 7 }));
    }

    #[test]
    fn bulk_erasure_validates_once() {
        if !cfg!(debug_assertions) { return }
        let mut tree = RBTree::new(DuplicatePolicy::Multi);
        for k in 0..60 {
            tree.insert(k % 3, ());
        }

        let validations = || VALIDATIONS.with(|count| count.get());
        let before = validations();
        assert_eq!(tree.erase_key(&1), 20);
        assert_eq!(validations(), before + 1);

        let (first, last) = (tree.begin(), tree.upper_bound(&0));
        tree.erase_range(first, last).unwrap();
        assert_eq!(validations(), before + 2);
        assert_eq!(tree.len(), 20);
    }

    #[test]
    fn height_of_small_trees() {
        assert_eq!(RBTree::<i32, ()>::new(DuplicatePolicy::Unique).height(), 0);
        assert_eq!(sample().height(), 3);
    }
}
