use crate::TreeError;


/// Index of a node inside its tree's arena.
pub(super) type NodeId = usize;

/// The sentinel lives in slot 0 of every arena.
///
/// It terminates every leaf edge, doubles as the root's parent, and is the `end()` position.
/// Its own `parent` link tracks the root, its children always point back at itself, and it is always black.
pub(super) const NIL: NodeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Side {
    Left,
    Right,
}

impl Side {
    pub(super) fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Debug, Clone)]
pub(super) struct Node<K, V> {
    // `None` for the sentinel and for slots sitting in the free list
    pub(super) entry: Option<(K, V)>,
    pub(super) parent: NodeId,
    pub(super) left: NodeId,
    pub(super) right: NodeId,
    pub(super) color: Color,
    /// Bumped every time the slot is freed, so stale `Position`s can be told apart from live ones.
    pub(super) generation: u32,
}

impl<K, V> Node<K, V> {
    fn sentinel() -> Self {
        Self {
            entry: None,
            parent: NIL,
            left: NIL,
            right: NIL,
            color: Color::Black,
            generation: 0,
        }
    }
}


/// Slab of nodes addressed by stable indices.
///
/// Freed slots are recycled through `free`, so a node keeps its index for as long as it is in the tree,
/// no matter what else gets inserted or erased around it.
#[derive(Debug, Clone)]
pub(super) struct Arena<K, V> {
    pub(super) nodes: Vec<Node<K, V>>,
    free: Vec<NodeId>,
    // highest generation any slot has carried since the last clear
    newest_generation: u32,
    // generation given to slots pushed after a clear, above everything handed out before it
    fresh_generation: u32,
}

impl<K, V> Arena<K, V> {
    pub(super) fn new() -> Self {
        Self {
            nodes: vec![Node::sentinel()],
            free: Vec::new(),
            newest_generation: 0,
            fresh_generation: 0,
        }
    }

    /// Creates a detached red node.
    ///
    /// Nothing is touched if the allocation fails.
    pub(super) fn alloc(&mut self, key: K, value: V, parent: NodeId) -> Result<NodeId, TreeError> {
        if let Some(id) = self.free.pop() {
            let node = &mut self.nodes[id];
            node.entry = Some((key, value));
            node.parent = parent;
            node.left = NIL;
            node.right = NIL;
            node.color = Color::Red;
            return Ok(id)
        }

        self.nodes.try_reserve(1).map_err(|_| TreeError::OutOfMemory)?;
        self.nodes.push(Node {
            entry: Some((key, value)),
            parent,
            left: NIL,
            right: NIL,
            color: Color::Red,
            generation: self.fresh_generation,
        });
        Ok(self.nodes.len() - 1)
    }

    /// Takes the payload out of a node that has already been unlinked, and recycles its slot.
    pub(super) fn release(&mut self, id: NodeId) -> (K, V) {
        debug_assert_ne!(id, NIL, "the sentinel is never released");
        let node = &mut self.nodes[id];
        let entry = node.entry.take().expect("released a slot that was already free");
        node.generation = node.generation.wrapping_add(1);
        self.newest_generation = self.newest_generation.max(node.generation);
        node.parent = NIL;
        node.left = NIL;
        node.right = NIL;
        self.free.push(id);
        entry
    }

    /// Drops every payload and gives the memory back, keeping only the sentinel.
    ///
    /// Slots allocated afterwards start above every generation seen so far, so positions from
    /// before the clear stay stale even when their slot index comes back.
    pub(super) fn clear(&mut self) {
        self.set_root(NIL);
        self.nodes.truncate(1);
        self.nodes.shrink_to_fit();
        self.free = Vec::new();
        self.fresh_generation = self.newest_generation.wrapping_add(1);
        self.newest_generation = self.fresh_generation;
    }

    pub(super) fn root(&self) -> NodeId {
        self.nodes[NIL].parent
    }

    pub(super) fn set_root(&mut self, root: NodeId) {
        self.nodes[NIL].parent = root;
    }

    pub(super) fn is_live(&self, id: NodeId) -> bool {
        id != NIL && self.nodes.get(id).is_some_and(|node| node.entry.is_some())
    }

    pub(super) fn entry(&self, id: NodeId) -> &(K, V) {
        self.nodes[id].entry.as_ref().expect("tree links only ever point at live nodes")
    }

    pub(super) fn entry_mut(&mut self, id: NodeId) -> &mut (K, V) {
        self.nodes[id].entry.as_mut().expect("tree links only ever point at live nodes")
    }

    pub(super) fn key(&self, id: NodeId) -> &K {
        &self.entry(id).0
    }

    pub(super) fn parent(&self, id: NodeId) -> NodeId {
        self.nodes[id].parent
    }

    pub(super) fn left(&self, id: NodeId) -> NodeId {
        self.nodes[id].left
    }

    pub(super) fn right(&self, id: NodeId) -> NodeId {
        self.nodes[id].right
    }

    pub(super) fn child(&self, id: NodeId, side: Side) -> NodeId {
        match side {
            Side::Left => self.nodes[id].left,
            Side::Right => self.nodes[id].right,
        }
    }

    pub(super) fn color(&self, id: NodeId) -> Color {
        self.nodes[id].color
    }

    pub(super) fn is_red(&self, id: NodeId) -> bool {
        self.color(id) == Color::Red
    }

    pub(super) fn is_black(&self, id: NodeId) -> bool {
        self.color(id) == Color::Black
    }

    // NOTE: the three setters below silently ignore the sentinel. The fixup code paths
    //       would otherwise need a branch at every site where a child might be missing.
    //       The root link is only ever changed through `set_root`.

    pub(super) fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        if id != NIL {
            self.nodes[id].parent = parent;
        }
    }

    pub(super) fn set_child(&mut self, id: NodeId, side: Side, child: NodeId) {
        if id == NIL { return }
        match side {
            Side::Left => self.nodes[id].left = child,
            Side::Right => self.nodes[id].right = child,
        }
    }

    pub(super) fn set_color(&mut self, id: NodeId, color: Color) {
        if id != NIL {
            self.nodes[id].color = color;
        }
    }

    /// Which side of its parent `id` hangs from. Only meaningful for non-root nodes.
    pub(super) fn side_of(&self, id: NodeId) -> Side {
        if self.left(self.parent(id)) == id { Side::Left } else { Side::Right }
    }

    pub(super) fn minimum(&self, mut id: NodeId) -> NodeId {
        while self.left(id) != NIL {
            id = self.left(id);
        }
        id
    }

    pub(super) fn maximum(&self, mut id: NodeId) -> NodeId {
        while self.right(id) != NIL {
            id = self.right(id);
        }
        id
    }

    pub(super) fn position(&self, id: NodeId) -> Position {
        Position { node: id, generation: self.nodes[id].generation }
    }
}


/// A handle naming one element of an [`RBTree`](super::RBTree), or its end.
///
/// Positions are cheap to copy and don't borrow the tree. A position stays valid until the element it
/// names is erased (or the tree is cleared); inserting or erasing *other* elements never invalidates it.
/// Using a position after its element is gone is reported as [`TreeError::StalePosition`].
///
/// Two positions compare equal iff they name the same element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(super) node: NodeId,
    pub(super) generation: u32,
}

impl Position {
    pub(super) const END: Self = Self { node: NIL, generation: 0 };

    /// Whether this is the past-the-end position.
    pub fn is_end(&self) -> bool {
        self.node == NIL
    }
}


/// A position that walks the tree backwards.
///
/// `rbegin()` names the largest element, and stepping past the smallest element lands on `rend()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevPosition(pub(super) Position);

impl RevPosition {
    /// The element this reverse position names.
    pub fn position(&self) -> Position {
        self.0
    }

    pub fn is_end(&self) -> bool {
        self.0.is_end()
    }
}
