use generational_arena::Index;
use tracing::instrument;

use crate::domain::node::NodeRef;
use crate::domain::tree::OrderedTree;

pub struct PreOrderIterator<'a> {
    tree: &'a OrderedTree,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    #[instrument(level = "trace", skip(tree))]
    pub(crate) fn new(tree: &'a OrderedTree) -> Self {
        Self {
            tree,
            stack: tree.root_index().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.tree.node_ref(current)?;
        // right first so the left subtree is visited first
        if let Some(right) = node.right() {
            self.stack.push(right.index());
        }
        if let Some(left) = node.left() {
            self.stack.push(left.index());
        }
        Some(node)
    }
}

pub struct InOrderIterator<'a> {
    tree: &'a OrderedTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> InOrderIterator<'a> {
    #[instrument(level = "trace", skip(tree))]
    pub(crate) fn new(tree: &'a OrderedTree) -> Self {
        Self {
            tree,
            stack: tree.root_index().map(|idx| (idx, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, expanded)) = self.stack.pop() {
            let Some(node) = self.tree.node_ref(current) else {
                continue;
            };
            if expanded {
                return Some(node);
            }
            if let Some(right) = node.right() {
                self.stack.push((right.index(), false));
            }
            self.stack.push((current, true));
            if let Some(left) = node.left() {
                self.stack.push((left.index(), false));
            }
        }
        None
    }
}
