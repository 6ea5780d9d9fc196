//! Grid placement of tree nodes
//!
//! Left children sit directly below their parent. A right child is shifted
//! past every right-linked node of its left sibling's subtree, which the
//! tree already counts, so no subtree has to be walked to find the offset.

use tracing::{instrument, trace};

use crate::config::LayoutConfig;
use crate::domain::{NodeRef, OrderedTree};

/// Cell and coordinates of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub value: i64,
    pub column: usize,
    pub depth: usize,
    pub x: f64,
    pub y: f64,
}

/// Number of grid columns the tree occupies.
pub fn column_span(tree: &OrderedTree) -> usize {
    tree.root()
        .map(|root| root.right_descendant_count() + 1)
        .unwrap_or(0)
}

/// Places every node, root first.
#[instrument(level = "debug", skip(tree))]
pub fn place(tree: &OrderedTree, config: &LayoutConfig) -> Vec<Placement> {
    let mut placements = Vec::with_capacity(tree.len());
    let mut stack: Vec<(NodeRef<'_>, usize, usize)> =
        tree.root().map(|root| (root, 0, 0)).into_iter().collect();

    while let Some((node, column, depth)) = stack.pop() {
        let left = node.left();
        if let Some(right) = node.right() {
            let offset = left.map(|l| l.right_descendant_count()).unwrap_or(0);
            stack.push((right, column + 1 + offset, depth + 1));
        }
        if let Some(left) = left {
            stack.push((left, column, depth + 1));
        }

        let placement = Placement {
            value: node.value(),
            column,
            depth,
            x: config.origin_x + column as f64 * (config.cell_width + config.padding),
            y: config.origin_y + depth as f64 * (config.cell_height + config.padding),
        };
        trace!(?placement, "placed");
        placements.push(placement);
    }

    placements
}
