use std::fmt;

use generational_arena::Index;

use crate::domain::tree::OrderedTree;

/// Tree node stored in the arena.
///
/// Child slots are the only owning links; `parent` is a back-reference that
/// never keeps a node alive.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) value: i64,
    pub(crate) parent: Option<Index>,
    pub(crate) left: Option<Index>,
    pub(crate) right: Option<Index>,
    /// Nodes below this one that hang off a right-child slot
    pub(crate) right_descendant_count: usize,
}

impl Node {
    pub(crate) fn new(value: i64, parent: Option<Index>) -> Self {
        Self {
            value,
            parent,
            left: None,
            right: None,
            right_descendant_count: 0,
        }
    }
}

/// Read-only handle to a node, borrowed from its tree.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a OrderedTree,
    idx: Index,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a OrderedTree, idx: Index, node: &'a Node) -> Self {
        Self { tree, idx, node }
    }

    pub fn index(&self) -> Index {
        self.idx
    }

    pub fn value(&self) -> i64 {
        self.node.value
    }

    pub fn right_descendant_count(&self) -> usize {
        self.node.right_descendant_count
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        self.node.left.and_then(|idx| tree.node_ref(idx))
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        self.node.right.and_then(|idx| tree.node_ref(idx))
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        self.node.parent.and_then(|idx| tree.node_ref(idx))
    }

    pub fn is_leaf(&self) -> bool {
        self.node.left.is_none() && self.node.right.is_none()
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", &self.node.value)
            .field("right_descendant_count", &self.node.right_descendant_count)
            .field("left", &self.node.left.is_some())
            .field("right", &self.node.right.is_some())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (r={})", self.node.value, self.node.right_descendant_count)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.idx == other.idx
    }
}
