use termtree::Tree;
use tracing::instrument;

use crate::domain::node::NodeRef;
use crate::domain::tree::OrderedTree;

/// Levels rendered before deeper subtrees are elided.
pub const MAX_RENDER_DEPTH: usize = 64;

/// Label standing in for an elided subtree.
pub const ELIDED: &str = "...";

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_string_with_depth(MAX_RENDER_DEPTH)
    }

    /// Renders at most `max_depth` levels; nodes with hidden children get
    /// a single `...` leaf.
    fn to_tree_string_with_depth(&self, max_depth: usize) -> Tree<String>;
}

impl TreeNodeConvert for OrderedTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string_with_depth(&self, max_depth: usize) -> Tree<String> {
        if let Some(root) = self.root() {
            let mut tree = Tree::new(root.to_string());

            fn build_tree(node: NodeRef<'_>, parent_tree: &mut Tree<String>, remaining: usize) {
                if remaining == 0 {
                    if !node.is_leaf() {
                        parent_tree.push(Tree::new(ELIDED.to_string()));
                    }
                    return;
                }
                for (slot, child) in [("L", node.left()), ("R", node.right())] {
                    if let Some(child) = child {
                        let mut child_tree = Tree::new(format!("{slot} {child}"));
                        build_tree(child, &mut child_tree, remaining - 1);
                        parent_tree.push(child_tree);
                    }
                }
            }

            build_tree(root, &mut tree, max_depth.saturating_sub(1));
            tree
        } else {
            Tree::new("(empty)".to_string())
        }
    }
}
