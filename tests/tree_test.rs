//! Integration tests for OrderedTree insert/remove and its invariants

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rstest::rstest;

use bstree::util::testing;
use bstree::OrderedTree;

fn sample() -> OrderedTree {
    OrderedTree::from_values([50, 30, 70, 20, 40, 60, 80]).unwrap()
}

/// Pre-order (value, right-descendant count) pairs.
fn snapshot(tree: &OrderedTree) -> Vec<(i64, usize)> {
    tree.iter()
        .map(|n| (n.value(), n.right_descendant_count()))
        .collect()
}

// ============================================================
// Insert
// ============================================================

#[test]
fn given_empty_tree_when_inserting_then_value_becomes_root() {
    let mut tree = OrderedTree::new();

    assert!(tree.insert(7).unwrap());

    let root = tree.root().unwrap();
    assert_eq!(root.value(), 7);
    assert!(root.is_leaf());
    assert!(root.parent().is_none());
    assert_eq!(tree.len(), 1);
}

#[test]
fn given_sample_tree_when_inspecting_root_then_counts_right_links() {
    testing::init_test_setup();
    let tree = sample();

    let root = tree.root().unwrap();
    assert_eq!(root.value(), 50);
    assert_eq!(root.right_descendant_count(), 3);
    assert_eq!(root.left().unwrap().value(), 30);
    assert_eq!(root.right().unwrap().value(), 70);
    assert_eq!(tree.depth(), 3);
}

#[rstest]
#[case(50)]
#[case(20)]
#[case(80)]
fn given_existing_value_when_inserting_then_returns_false_and_keeps_structure(#[case] value: i64) {
    let mut tree = sample();
    let before = snapshot(&tree);

    assert!(!tree.insert(value).unwrap());

    assert_eq!(snapshot(&tree), before);
    assert_eq!(tree.len(), 7);
}

#[test]
fn given_ascending_inserts_when_building_then_every_ancestor_counts_the_chain() {
    let tree = OrderedTree::from_values(1..=5).unwrap();

    let counts: Vec<usize> = tree.iter().map(|n| n.right_descendant_count()).collect();
    assert_eq!(counts, vec![4, 3, 2, 1, 0]);
    assert_eq!(tree.depth(), 5);
}

// ============================================================
// Remove
// ============================================================

#[rstest]
#[case::left_leaf(20, vec![(50, 3), (30, 1), (40, 0), (70, 1), (60, 0), (80, 0)])]
#[case::right_leaf_under_left(40, vec![(50, 2), (30, 0), (20, 0), (70, 1), (60, 0), (80, 0)])]
#[case::inner_left(30, vec![(50, 2), (40, 0), (20, 0), (70, 1), (60, 0), (80, 0)])]
#[case::root(50, vec![(70, 2), (60, 1), (30, 1), (20, 0), (40, 0), (80, 0)])]
#[case::inner_right(70, vec![(50, 2), (30, 1), (20, 0), (40, 0), (80, 0), (60, 0)])]
#[case::left_leaf_under_right(60, vec![(50, 3), (30, 1), (20, 0), (40, 0), (70, 1), (80, 0)])]
#[case::right_leaf(80, vec![(50, 2), (30, 1), (20, 0), (40, 0), (70, 0), (60, 0)])]
fn given_sample_tree_when_removing_then_relinks_and_recounts(
    #[case] value: i64,
    #[case] expected: Vec<(i64, usize)>,
) {
    let mut tree = sample();

    tree.remove(value).unwrap();

    assert_eq!(snapshot(&tree), expected);
    assert!(!tree.contains(value));
    assert_eq!(tree.len(), 6);
    tree.validate().unwrap();
}

#[test]
fn given_root_with_deep_left_subtree_when_removing_root_then_new_root_counts_spliced_links() {
    let mut tree = OrderedTree::from_values([50, 30, 35, 33, 37, 70, 60, 55, 65]).unwrap();

    tree.remove(50).unwrap();

    let root = tree.root().unwrap();
    assert_eq!(root.value(), 70);
    assert_eq!(root.right_descendant_count(), 3);
    let spliced = tree.get(30).unwrap();
    assert_eq!(spliced.parent().unwrap().value(), 55);
    assert_eq!(tree.get(55).unwrap().right_descendant_count(), 2);
    assert_eq!(tree.get(60).unwrap().right_descendant_count(), 3);
    tree.validate().unwrap();
}

#[test]
fn given_root_with_only_left_child_when_removing_root_then_left_child_is_root() {
    let mut tree = OrderedTree::from_values([50, 30, 40]).unwrap();

    tree.remove(50).unwrap();

    let root = tree.root().unwrap();
    assert_eq!(root.value(), 30);
    assert!(root.parent().is_none());
    assert_eq!(root.right_descendant_count(), 1);
    tree.validate().unwrap();
}

#[test]
fn given_single_node_when_removing_it_then_tree_is_empty() {
    let mut tree = OrderedTree::from_values([1]).unwrap();

    tree.remove(1).unwrap();

    assert!(tree.root().is_none());
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
}

#[test]
fn given_removed_value_when_removing_again_then_tree_is_unchanged() {
    let mut tree = sample();
    tree.remove(30).unwrap();
    let before = snapshot(&tree);

    tree.remove(30).unwrap();

    assert_eq!(snapshot(&tree), before);
    tree.validate().unwrap();
}

#[test]
fn given_removed_value_when_reinserting_then_it_is_accepted() {
    let mut tree = sample();
    tree.remove(70).unwrap();

    assert!(tree.insert(70).unwrap());

    assert!(tree.contains(70));
    tree.validate().unwrap();
}

// ============================================================
// Properties over random operation sequences
// ============================================================

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
#[case(1234)]
fn given_random_operations_when_applied_then_invariants_hold_after_each(#[case] seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree = OrderedTree::new();
    let mut model = BTreeSet::new();

    for _ in 0..500 {
        let value = rng.gen_range(-50..50);
        if rng.gen_bool(0.6) {
            assert_eq!(tree.insert(value).unwrap(), model.insert(value));
        } else {
            tree.remove(value).unwrap();
            model.remove(&value);
        }
        tree.validate().unwrap();
    }

    assert_eq!(tree.values(), model.into_iter().collect::<Vec<_>>());
}

#[rstest]
#[case(3)]
#[case(99)]
fn given_distinct_values_when_removing_all_in_any_order_then_tree_is_empty(#[case] seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values: Vec<i64> = (-200..200).collect();
    values.shuffle(&mut rng);
    let mut tree = OrderedTree::from_values(values.iter().copied()).unwrap();
    assert_eq!(tree.len(), 400);

    values.shuffle(&mut rng);
    for value in &values {
        tree.remove(*value).unwrap();
    }

    assert!(tree.root().is_none());
    assert_eq!(tree.len(), 0);
    tree.validate().unwrap();
}

// ============================================================
// Degenerate shapes
// ============================================================

#[rstest]
#[case::ascending((0..20_000).collect())]
#[case::descending((0..20_000).rev().collect())]
fn given_degenerate_chain_when_validating_then_walks_without_recursion(#[case] values: Vec<i64>) {
    let tree = OrderedTree::from_values(values).unwrap();

    assert_eq!(tree.depth(), 20_000);
    tree.validate().unwrap();
}

#[test]
fn given_ascending_chain_when_inspecting_root_then_counts_whole_chain() {
    let mut tree = OrderedTree::from_values(0..20_000).unwrap();
    assert_eq!(tree.root().unwrap().right_descendant_count(), 19_999);

    tree.remove(10_000).unwrap();

    assert_eq!(tree.root().unwrap().right_descendant_count(), 19_998);
    tree.validate().unwrap();
}
