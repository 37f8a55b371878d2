//! Rotations and the red-black fixup passes.
//!
//! Everything here only rewires links and colors. None of it looks at keys.

use log::trace;

use super::node::{Color, NodeId, Side, NIL};
use super::RBTree;


impl<K, V, C> RBTree<K, V, C> {
    /// Points whatever referenced `old` (its parent, or the root link) at `new` instead.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if parent == NIL {
            self.arena.set_root(new);
        } else if self.arena.left(parent) == old {
            self.arena.set_child(parent, Side::Left, new);
        } else {
            self.arena.set_child(parent, Side::Right, new);
        }
    }

    /// Rotates `pivot` down towards `dir`, so its child on the other side takes its place.
    ///
    /// ```text
    ///       pivot                child
    ///      /     \              /     \
    ///     a     child   -->  pivot     c        (dir = Left)
    ///          /     \      /     \
    ///       inner     c    a     inner
    /// ```
    pub(super) fn rotate(&mut self, pivot: NodeId, dir: Side) {
        let child = self.arena.child(pivot, dir.opposite());
        debug_assert_ne!(child, NIL, "rotating towards a missing child");
        trace!("rotating slot {pivot} {dir:?} (slot {child} moves up)");

        let inner = self.arena.child(child, dir);
        self.arena.set_child(pivot, dir.opposite(), inner);
        self.arena.set_parent(inner, pivot);

        let parent = self.arena.parent(pivot);
        self.arena.set_parent(child, parent);
        self.replace_child(parent, pivot, child);

        self.arena.set_child(child, dir, pivot);
        self.arena.set_parent(pivot, child);
    }

    /// Restores the coloring after `node` was linked in as a red leaf.
    pub(super) fn insert_fixup(&mut self, mut node: NodeId) {
        // the sentinel is black, so this also stops once `node` is the root
        while self.arena.is_red(self.arena.parent(node)) {
            let parent = self.arena.parent(node);
            // a red parent is never the root, so the grandparent is a real node
            let grandparent = self.arena.parent(parent);
            let side = self.arena.side_of(parent);
            let uncle = self.arena.child(grandparent, side.opposite());

            if self.arena.is_red(uncle) {
                trace!("insert fixup: red uncle at slot {uncle}, recoloring");
                self.arena.set_color(parent, Color::Black);
                self.arena.set_color(uncle, Color::Black);
                self.arena.set_color(grandparent, Color::Red);
                node = grandparent;
                continue
            }

            if self.arena.child(parent, side.opposite()) == node {
                trace!("insert fixup: inner grandchild at slot {node}");
                node = parent;
                self.rotate(node, side);
            }

            trace!("insert fixup: outer grandchild at slot {node}");
            let parent = self.arena.parent(node);
            let grandparent = self.arena.parent(parent);
            self.arena.set_color(parent, Color::Black);
            self.arena.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
        }

        let root = self.arena.root();
        self.arena.set_color(root, Color::Black);
    }

    /// Puts `new` where `old` was, as far as `old`'s parent is concerned.
    fn transplant(&mut self, old: NodeId, new: NodeId) {
        let parent = self.arena.parent(old);
        self.replace_child(parent, old, new);
        self.arena.set_parent(new, parent);
    }

    /// Takes `node` out of the tree structure and rebalances. The slot itself stays allocated.
    ///
    /// When `node` has two children its in-order successor is relinked into its place, rather than
    /// moving the successor's payload, so positions naming the successor stay valid.
    pub(super) fn unlink(&mut self, node: NodeId) {
        let left = self.arena.left(node);
        let right = self.arena.right(node);

        // `slot` is whatever ends up where a node was physically spliced out (maybe the sentinel),
        // `slot_parent` its parent, since the sentinel can't remember one.
        let slot;
        let slot_parent;
        let removed_color;

        if left == NIL || right == NIL {
            slot = if left == NIL { right } else { left };
            slot_parent = self.arena.parent(node);
            removed_color = self.arena.color(node);
            self.transplant(node, slot);
        } else {
            let successor = self.arena.minimum(right);
            removed_color = self.arena.color(successor);
            slot = self.arena.right(successor);

            if self.arena.parent(successor) == node {
                slot_parent = successor;
            } else {
                slot_parent = self.arena.parent(successor);
                self.transplant(successor, slot);
                self.arena.set_child(successor, Side::Right, right);
                self.arena.set_parent(right, successor);
            }

            self.transplant(node, successor);
            self.arena.set_child(successor, Side::Left, left);
            self.arena.set_parent(left, successor);
            self.arena.set_color(successor, self.arena.color(node));
        }

        if removed_color == Color::Black {
            self.delete_fixup(slot, slot_parent);
        }
    }

    /// Resolves the missing black at `node`, whose parent is `parent`.
    ///
    /// `node` may be the sentinel, which is why the parent is passed along separately.
    pub(super) fn delete_fixup(&mut self, mut node: NodeId, mut parent: NodeId) {
        while node != self.arena.root() && self.arena.is_black(node) {
            // the subtree on the other side has a black height of at least 1, so `sibling` is never the sentinel
            let side = if self.arena.left(parent) == node { Side::Left } else { Side::Right };
            let mut sibling = self.arena.child(parent, side.opposite());

            if self.arena.is_red(sibling) {
                trace!("delete fixup: red sibling at slot {sibling}");
                self.arena.set_color(sibling, Color::Black);
                self.arena.set_color(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.arena.child(parent, side.opposite());
            }

            let near = self.arena.child(sibling, side);
            let far = self.arena.child(sibling, side.opposite());

            if self.arena.is_black(near) && self.arena.is_black(far) {
                trace!("delete fixup: black sibling with black children, moving up from slot {parent}");
                self.arena.set_color(sibling, Color::Red);
                node = parent;
                parent = self.arena.parent(node);
                continue
            }

            if self.arena.is_black(far) {
                trace!("delete fixup: only the near nephew (slot {near}) is red");
                self.arena.set_color(near, Color::Black);
                self.arena.set_color(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.arena.child(parent, side.opposite());
            }

            trace!("delete fixup: far nephew is red, finishing at slot {parent}");
            self.arena.set_color(sibling, self.arena.color(parent));
            self.arena.set_color(parent, Color::Black);
            let far = self.arena.child(sibling, side.opposite());
            self.arena.set_color(far, Color::Black);
            self.rotate(parent, side);
            node = self.arena.root();
        }

        self.arena.set_color(node, Color::Black);
    }
}
