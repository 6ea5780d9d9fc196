use std::cmp::Ordering;
use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, trace};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::iter::{InOrderIterator, PreOrderIterator};
use crate::domain::node::{Node, NodeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Unbalanced binary search tree over unique `i64` keys.
///
/// Nodes live in a generational arena and link to each other by index.
/// Every node tracks how many nodes below it are attached through a
/// right-child slot, so callers can space right siblings without walking
/// the subtree again.
#[derive(Debug)]
pub struct OrderedTree {
    /// Arena storage for all live nodes
    arena: Arena<Node>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
    /// Value lookup for removal
    registry: HashMap<i64, Index>,
}

impl Default for OrderedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderedTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            registry: HashMap::new(),
        }
    }

    /// Builds a tree by inserting `values` in order, skipping duplicates.
    pub fn from_values<I>(values: I) -> TreeResult<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut tree = Self::new();
        for value in values {
            tree.insert(value)?;
        }
        Ok(tree)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.and_then(|idx| self.node_ref(idx))
    }

    pub fn get(&self, value: i64) -> Option<NodeRef<'_>> {
        self.registry
            .get(&value)
            .and_then(|&idx| self.node_ref(idx))
    }

    pub fn contains(&self, value: i64) -> bool {
        self.registry.contains_key(&value)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|idx| (idx, 1)).into_iter().collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.arena.get(idx) {
                for child in [node.left, node.right].into_iter().flatten() {
                    stack.push((child, depth + 1));
                }
            }
        }

        max_depth
    }

    /// Pre-order traversal: node, left subtree, right subtree.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    /// In-order traversal, ascending by value.
    pub fn iter_inorder(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    pub fn values(&self) -> Vec<i64> {
        self.iter_inorder().map(|node| node.value()).collect()
    }

    /// Inserts `value` unless it is already present.
    ///
    /// Returns `Ok(false)` for duplicates. Linking a node into a right slot
    /// bumps the right-descendant count of every ancestor by one.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, value: i64) -> TreeResult<bool> {
        let Some(root) = self.root else {
            let idx = self.arena.insert(Node::new(value, None));
            self.root = Some(idx);
            self.registry.insert(value, idx);
            debug!(value, "inserted as root");
            return Ok(true);
        };

        let Some(parent_idx) = self.find_insertion_point(root, value)? else {
            debug!(value, "duplicate value rejected");
            return Ok(false);
        };

        let side = if value < self.node(parent_idx)?.value {
            Side::Left
        } else {
            Side::Right
        };
        let idx = self.arena.insert(Node::new(value, Some(parent_idx)));
        self.set_child(parent_idx, side, Some(idx))?;
        if side == Side::Right {
            self.increase_right_counts(parent_idx, None, 1)?;
        }
        self.registry.insert(value, idx);

        debug!(value, ?side, len = self.len(), "inserted");
        Ok(true)
    }

    /// Removes the node holding `value`; absent values are ignored.
    ///
    /// The removed node's slot is taken by its right child when there is
    /// one, and its left subtree is reattached under the minimum of that
    /// right subtree. Without a right child the left child moves up.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, value: i64) -> TreeResult<()> {
        let Some(&idx) = self.registry.get(&value) else {
            debug!(value, "value not present, nothing to remove");
            return Ok(());
        };

        let (parent, left, right) = {
            let node = self.node(idx)?;
            (node.parent, node.left, node.right)
        };
        let slot = match parent {
            Some(parent_idx) => Some((parent_idx, self.side_of(parent_idx, idx)?)),
            None if self.root == Some(idx) => None,
            None => {
                return Err(TreeError::inconsistency(format!(
                    "node {value} has no parent but is not the root"
                )))
            }
        };

        self.registry.remove(&value);
        self.arena.remove(idx);

        match slot {
            None => self.replace_root(left, right)?,
            Some((parent_idx, side)) => self.replace_child(parent_idx, side, left, right)?,
        }

        debug!(value, len = self.len(), "removed");
        Ok(())
    }

    /// Recomputes every invariant from scratch.
    ///
    /// Checks ordering, parent back-links, right-descendant counts and that
    /// the registry holds exactly the reachable nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self) -> TreeResult<()> {
        let mut reachable = 0;
        if let Some(root) = self.root {
            if self.node(root)?.parent.is_some() {
                return Err(TreeError::inconsistency("root has a parent link"));
            }
            self.validate_from(root, &mut reachable)?;
        }

        if reachable != self.arena.len() {
            return Err(TreeError::inconsistency(format!(
                "{reachable} nodes reachable from root, {} stored",
                self.arena.len()
            )));
        }
        if reachable != self.registry.len() {
            return Err(TreeError::inconsistency(format!(
                "{reachable} nodes reachable from root, {} registered",
                self.registry.len()
            )));
        }
        Ok(())
    }

    pub(crate) fn node_ref(&self, idx: Index) -> Option<NodeRef<'_>> {
        self.arena.get(idx).map(|node| NodeRef::new(self, idx, node))
    }

    pub(crate) fn root_index(&self) -> Option<Index> {
        self.root
    }

    fn node(&self, idx: Index) -> TreeResult<&Node> {
        self.arena
            .get(idx)
            .ok_or_else(|| TreeError::inconsistency(format!("dangling node index {idx:?}")))
    }

    fn node_mut(&mut self, idx: Index) -> TreeResult<&mut Node> {
        self.arena
            .get_mut(idx)
            .ok_or_else(|| TreeError::inconsistency(format!("dangling node index {idx:?}")))
    }

    /// Parent for a new `value`, or None when the value already exists.
    #[instrument(level = "trace", skip(self))]
    fn find_insertion_point(&self, root: Index, value: i64) -> TreeResult<Option<Index>> {
        let mut current = root;
        loop {
            let node = self.node(current)?;
            let next = match value.cmp(&node.value) {
                Ordering::Equal => return Ok(None),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            match next {
                Some(child) => current = child,
                None => return Ok(Some(current)),
            }
        }
    }

    fn side_of(&self, parent_idx: Index, child_idx: Index) -> TreeResult<Side> {
        let parent = self.node(parent_idx)?;
        if parent.left == Some(child_idx) {
            Ok(Side::Left)
        } else if parent.right == Some(child_idx) {
            Ok(Side::Right)
        } else {
            Err(TreeError::inconsistency(format!(
                "node {} does not link back to its child",
                parent.value
            )))
        }
    }

    fn set_child(&mut self, parent_idx: Index, side: Side, child: Option<Index>) -> TreeResult<()> {
        let parent = self.node_mut(parent_idx)?;
        match side {
            Side::Left => parent.left = child,
            Side::Right => parent.right = child,
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    fn replace_root(&mut self, left: Option<Index>, right: Option<Index>) -> TreeResult<()> {
        match (right, left) {
            (Some(right_idx), left) => {
                self.node_mut(right_idx)?.parent = None;
                self.root = Some(right_idx);
                if let Some(left_idx) = left {
                    self.splice_left(right_idx, left_idx, None)?;
                }
            }
            (None, Some(left_idx)) => {
                self.node_mut(left_idx)?.parent = None;
                self.root = Some(left_idx);
            }
            (None, None) => self.root = None,
        }
        Ok(())
    }

    #[instrument(level = "trace", skip(self))]
    fn replace_child(
        &mut self,
        parent_idx: Index,
        side: Side,
        left: Option<Index>,
        right: Option<Index>,
    ) -> TreeResult<()> {
        let Some(right_idx) = right else {
            self.set_child(parent_idx, side, left)?;
            match left {
                Some(left_idx) => self.node_mut(left_idx)?.parent = Some(parent_idx),
                // a right slot emptied without replacement loses one unit
                None if side == Side::Right => self.decrease_right_counts(parent_idx)?,
                None => {}
            }
            return Ok(());
        };

        self.set_child(parent_idx, side, Some(right_idx))?;
        self.node_mut(right_idx)?.parent = Some(parent_idx);
        self.decrease_right_counts(parent_idx)?;
        if let Some(left_idx) = left {
            self.splice_left(right_idx, left_idx, Some(parent_idx))?;
        }
        Ok(())
    }

    /// Hangs `orphan` under the minimum node of `subtree` and credits its
    /// right-descendant count to every node from the splice point up to,
    /// but excluding, `stop`.
    #[instrument(level = "trace", skip(self))]
    fn splice_left(&mut self, subtree: Index, orphan: Index, stop: Option<Index>) -> TreeResult<()> {
        let min_idx = self.min_node(subtree)?;
        let min = self.node_mut(min_idx)?;
        if min.left.is_some() {
            return Err(TreeError::inconsistency(format!(
                "splice target {} already has a left child",
                min.value
            )));
        }
        min.left = Some(orphan);

        let orphan_node = self.node_mut(orphan)?;
        orphan_node.parent = Some(min_idx);
        let amount = orphan_node.right_descendant_count;
        trace!(amount, "spliced left subtree");

        self.increase_right_counts(min_idx, stop, amount)
    }

    fn min_node(&self, mut idx: Index) -> TreeResult<Index> {
        while let Some(left) = self.node(idx)?.left {
            idx = left;
        }
        Ok(idx)
    }

    /// Adds `amount` from `from` upwards until `until` is reached (exclusive).
    fn increase_right_counts(&mut self, from: Index, until: Option<Index>, amount: usize) -> TreeResult<()> {
        let mut cursor = Some(from);
        while cursor != until {
            let Some(idx) = cursor else {
                return Err(TreeError::inconsistency(
                    "reached the root before the expected ancestor",
                ));
            };
            let node = self.node_mut(idx)?;
            node.right_descendant_count += amount;
            cursor = node.parent;
        }
        Ok(())
    }

    /// Subtracts one from `from` and every ancestor up to the root.
    fn decrease_right_counts(&mut self, from: Index) -> TreeResult<()> {
        let mut cursor = Some(from);
        while let Some(idx) = cursor {
            let node = self.node_mut(idx)?;
            let value = node.value;
            node.right_descendant_count = node.right_descendant_count.checked_sub(1).ok_or_else(|| {
                TreeError::inconsistency(format!("right-descendant count underflow at {value}"))
            })?;
            cursor = node.parent;
        }
        Ok(())
    }

    /// Post-order walk over an explicit stack; each node is checked against
    /// the counts recomputed for its children.
    fn validate_from(&self, root: Index, reachable: &mut usize) -> TreeResult<()> {
        let mut recomputed: HashMap<Index, usize> = HashMap::new();
        let mut stack: Vec<(Index, Option<i64>, Option<i64>, bool)> = vec![(root, None, None, false)];

        while let Some((idx, lower, upper, visited)) = stack.pop() {
            let node = self.node(idx)?;

            if visited {
                let mut expected = 0;
                if let Some(left) = node.left {
                    expected += self.take_recomputed(&mut recomputed, left)?;
                }
                if let Some(right) = node.right {
                    expected += 1 + self.take_recomputed(&mut recomputed, right)?;
                }
                if node.right_descendant_count != expected {
                    return Err(TreeError::inconsistency(format!(
                        "node {} counts {} right descendants, expected {expected}",
                        node.value, node.right_descendant_count
                    )));
                }
                recomputed.insert(idx, expected);
                continue;
            }

            *reachable += 1;
            if *reachable > self.arena.len() {
                return Err(TreeError::inconsistency("cycle between nodes"));
            }
            if lower.is_some_and(|lo| node.value <= lo) || upper.is_some_and(|hi| node.value >= hi) {
                return Err(TreeError::inconsistency(format!(
                    "node {} violates ordering bounds {lower:?}..{upper:?}",
                    node.value
                )));
            }
            if self.registry.get(&node.value) != Some(&idx) {
                return Err(TreeError::inconsistency(format!(
                    "node {} is not registered",
                    node.value
                )));
            }

            stack.push((idx, lower, upper, true));
            if let Some(right) = node.right {
                self.check_parent_link(right, idx)?;
                stack.push((right, Some(node.value), upper, false));
            }
            if let Some(left) = node.left {
                self.check_parent_link(left, idx)?;
                stack.push((left, lower, Some(node.value), false));
            }
        }
        Ok(())
    }

    fn take_recomputed(&self, recomputed: &mut HashMap<Index, usize>, child: Index) -> TreeResult<usize> {
        recomputed
            .remove(&child)
            .ok_or_else(|| TreeError::inconsistency(format!("child {child:?} was not visited")))
    }

    fn check_parent_link(&self, child: Index, parent: Index) -> TreeResult<()> {
        let node = self.node(child)?;
        if node.parent != Some(parent) {
            return Err(TreeError::inconsistency(format!(
                "node {} has a stale parent link",
                node.value
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing;

    fn sample() -> OrderedTree {
        OrderedTree::from_values([50, 30, 70, 20, 40, 60, 80]).unwrap()
    }

    fn count_of(tree: &OrderedTree, value: i64) -> usize {
        tree.get(value).unwrap().right_descendant_count()
    }

    #[test]
    fn test_empty_tree_has_no_root() {
        let tree = OrderedTree::new();
        assert!(tree.root().is_none());
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        tree.validate().unwrap();
    }

    #[test]
    fn test_insert_counts_right_links_per_ancestor() {
        testing::init_test_setup();
        let tree = sample();
        let root = tree.root().unwrap();
        assert_eq!(root.value(), 50);
        assert_eq!(root.right_descendant_count(), 3);
        assert_eq!(root.left().unwrap().value(), 30);
        assert_eq!(count_of(&tree, 30), 1);
        assert_eq!(count_of(&tree, 70), 1);
        assert_eq!(count_of(&tree, 20), 0);
        tree.validate().unwrap();
    }

    #[test]
    fn test_insert_duplicate_is_rejected() {
        let mut tree = sample();
        assert!(!tree.insert(40).unwrap());
        assert_eq!(tree.len(), 7);
        assert_eq!(count_of(&tree, 50), 3);
    }

    #[test]
    fn test_remove_left_child_with_right_child_promotes_it() {
        let mut tree = sample();
        tree.remove(30).unwrap();

        let root = tree.root().unwrap();
        let promoted = root.left().unwrap();
        assert_eq!(promoted.value(), 40);
        assert_eq!(promoted.left().unwrap().value(), 20);
        assert!(promoted.right().is_none());
        assert_eq!(root.right_descendant_count(), 2);
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_root_splices_left_subtree_under_minimum() {
        let mut tree = sample();
        tree.remove(50).unwrap();

        let root = tree.root().unwrap();
        assert_eq!(root.value(), 70);
        assert!(root.parent().is_none());
        let min = root.left().unwrap();
        assert_eq!(min.value(), 60);
        assert_eq!(min.left().unwrap().value(), 30);
        assert_eq!(min.left().unwrap().parent().unwrap().value(), 60);
        assert_eq!(count_of(&tree, 60), 1);
        assert_eq!(count_of(&tree, 70), 2);
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_right_leaf_decrements_every_ancestor() {
        let mut tree = sample();
        tree.remove(80).unwrap();
        assert_eq!(count_of(&tree, 70), 0);
        assert_eq!(count_of(&tree, 50), 2);
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_right_child_replaced_by_left_keeps_counts() {
        let mut tree = OrderedTree::from_values([50, 70, 60]).unwrap();
        tree.remove(70).unwrap();
        assert_eq!(tree.root().unwrap().right().unwrap().value(), 60);
        assert_eq!(count_of(&tree, 50), 1);
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_absent_value_is_noop() {
        let mut tree = sample();
        tree.remove(99).unwrap();
        assert_eq!(tree.len(), 7);
        tree.validate().unwrap();
    }

    #[test]
    fn test_validate_detects_corrupted_count() {
        let mut tree = sample();
        let idx = tree.registry[&70];
        tree.arena[idx].right_descendant_count = 5;
        let err = tree.validate().unwrap_err();
        assert!(err.to_string().contains("node 70 counts 5"));
    }

    #[test]
    fn test_validate_detects_stale_parent_link() {
        let mut tree = sample();
        let idx = tree.registry[&20];
        tree.arena[idx].parent = tree.root;
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_remove_fails_fast_on_broken_back_link() {
        let mut tree = sample();
        let idx = tree.registry[&40];
        tree.arena[idx].parent = tree.root;
        let err = tree.remove(40).unwrap_err();
        assert!(matches!(err, TreeError::StructuralInconsistency { .. }));
    }
}
