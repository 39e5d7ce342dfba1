use icicle::hierarchy::NodeOrigin;
use icicle::{HierarchyBuilder, HierarchyError, IdValue, NodeIdx, Tree, ROOT_KEY};

fn sample() -> Tree {
    HierarchyBuilder::new(["Root", "A", "B", "b"], ["", "Root", "Root", "B"])
        .build()
        .unwrap()
}

fn labels(tree: &Tree, nodes: &[NodeIdx]) -> Vec<String> {
    nodes
        .iter()
        .map(|idx| tree.display_label(*idx).to_string())
        .collect()
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_exactly_one_root() {
    let tree = sample();
    let roots: Vec<_> = tree.iter().filter(|(_, node)| node.parent.is_none()).collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].0, tree.root());
}

#[test]
fn test_depth_follows_parent() {
    let tree = sample();
    for (idx, node) in tree.iter() {
        match node.parent {
            Some(parent) => assert_eq!(node.depth, tree.get(parent).depth + 1),
            None => {
                assert_eq!(idx, tree.root());
                assert_eq!(node.depth, 0);
            }
        }
    }
}

#[test]
fn test_children_keep_input_order() {
    let tree = sample();
    assert_eq!(labels(&tree, tree.children(tree.root())), vec!["A", "B"]);
}

#[test]
fn test_descendants_are_breadth_first() {
    let tree = sample();
    assert_eq!(
        labels(&tree, &tree.descendants(tree.root())),
        vec!["Root", "A", "B", "b"]
    );
}

#[test]
fn test_ancestry_queries() {
    let tree = sample();
    let root = tree.root();
    let a = tree.find("A").unwrap();
    let b = tree.find("b").unwrap();
    assert!(tree.is_ancestor(root, b));
    assert!(!tree.is_ancestor(a, b));
    assert!(!tree.is_ancestor(b, b));
    assert!(tree.is_within(b, b));
    assert!(tree.is_leaf(a));
    assert!(!tree.is_leaf(tree.find("B").unwrap()));
}

#[test]
fn test_label_path_has_trailing_slash() {
    let tree = sample();
    assert_eq!(tree.label_path(tree.find("b").unwrap()), "Root/B/");
    assert_eq!(tree.label_path(tree.root()), "/");
}

#[test]
fn test_root_key_is_stable() {
    let tree = sample();
    assert_eq!(tree.key(tree.root()), ROOT_KEY);
    assert_eq!(tree.find_key(ROOT_KEY), Some(tree.root()));
    assert_eq!(tree.key(tree.find("A").unwrap()), "A");
}

// ============================================================================
// Ids
// ============================================================================

#[test]
fn test_ids_override_labels() {
    let tree = HierarchyBuilder::new(["Top", "Left", "Right"], ["", "t", "t"])
        .ids(["t", "l", "r"])
        .build()
        .unwrap();
    let left = tree.find("l").unwrap();
    assert_eq!(tree.display_label(left), "Left");
    assert_eq!(tree.parent(left), Some(tree.root()));
}

#[test]
fn test_ids_are_compared_canonically() {
    let tree = HierarchyBuilder::new(
        ["one", "two", "three"],
        [IdValue::Empty, IdValue::from(1.0), IdValue::from("2")],
    )
    .ids([IdValue::from(1i64), IdValue::from(2.0), IdValue::from("3")])
    .build()
    .unwrap();
    let three = tree.find("3").unwrap();
    assert_eq!(tree.get(three).depth, 2);
    assert_eq!(tree.parent(three), tree.find("2"));
}

#[test]
fn test_rows_without_id_are_skipped() {
    let tree = HierarchyBuilder::new(["r", "x", "c"], ["", "r", "r"])
        .ids(["r", "", "c"])
        .build()
        .unwrap();
    assert_eq!(tree.len(), 2);
    assert!(tree.find("x").is_none());
}

#[test]
fn test_extra_rows_are_dropped() {
    let tree = HierarchyBuilder::new(["Root", "A", "B"], ["", "Root"])
        .build()
        .unwrap();
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_negative_values_are_discarded() {
    let tree = HierarchyBuilder::new(["Root", "A"], ["", "Root"])
        .values([None, Some(-1.0)])
        .build()
        .unwrap();
    assert_eq!(tree.get(tree.find("A").unwrap()).input_value, None);
}

// ============================================================================
// Implied and synthesized roots
// ============================================================================

#[test]
fn test_single_missing_parent_is_implied_root() {
    let tree = HierarchyBuilder::new(["A", "B"], ["Root", "Root"])
        .build()
        .unwrap();
    assert_eq!(tree.len(), 3);
    let root = tree.root();
    assert_eq!(tree.get(root).id, "Root");
    assert_eq!(tree.get(root).origin, NodeOrigin::ImpliedRoot);
    assert_eq!(tree.display_label(root), "Root");
    assert_eq!(labels(&tree, tree.children(root)), vec!["A", "B"]);
}

#[test]
fn test_root_of_roots_for_several_top_level_nodes() {
    let tree = HierarchyBuilder::new(["A", "B", "a"], ["", "", "A"])
        .root_id("forest")
        .build()
        .unwrap();
    let root = tree.root();
    assert_eq!(tree.get(root).id, "forest");
    assert!(tree.get(root).is_synthetic());
    assert!(tree.has_multiple_roots());
    assert_eq!(labels(&tree, tree.children(root)), vec!["A", "B"]);

    let a = tree.find("a").unwrap();
    assert_eq!(tree.get(a).depth, 2);
    // The synthetic root takes no part in label paths.
    assert_eq!(tree.label_path(a), "A/");
}

#[test]
fn test_root_of_roots_gets_fresh_id() {
    let tree = HierarchyBuilder::new(["A", "B"], ["", ""]).build().unwrap();
    let id = &tree.get(tree.root()).id;
    assert!(!id.is_empty());
    assert_ne!(id, "A");
    assert_ne!(id, "B");
}

#[test]
fn test_entry_id_hides_root_of_roots() {
    let forest = HierarchyBuilder::new(["A", "B"], ["", ""]).build().unwrap();
    assert_eq!(forest.entry_id(forest.root()), ROOT_KEY);
    assert_eq!(forest.entry_id(forest.find("A").unwrap()), "A");

    let tree = sample();
    assert_eq!(tree.entry_id(tree.root()), "Root");
    assert!(tree.contains(NodeIdx(3)));
    assert!(!tree.contains(NodeIdx(4)));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_duplicate_ids_are_ambiguous() {
    let err = HierarchyBuilder::new(["A", "A", "B"], ["Root", "Root", "A"])
        .build()
        .unwrap_err();
    assert_eq!(err, HierarchyError::AmbiguousHierarchy("A".to_string()));
}

#[test]
fn test_several_missing_parents_are_rejected() {
    let err = HierarchyBuilder::new(["A", "B"], ["X", "Y"])
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        HierarchyError::MultipleImpliedRoots(vec!["X".to_string(), "Y".to_string()])
    );
    assert!(err.to_string().starts_with("Multiple implied roots"));
}

#[test]
fn test_cycle_is_rejected() {
    let err = HierarchyBuilder::new(["A", "B"], ["B", "A"])
        .build()
        .unwrap_err();
    assert!(matches!(err, HierarchyError::Cycle(_)));
}

#[test]
fn test_empty_input_is_rejected() {
    let err = HierarchyBuilder::new(Vec::<String>::new(), Vec::<IdValue>::new())
        .build()
        .unwrap_err();
    assert_eq!(err, HierarchyError::EmptyInput);
}

#[test]
fn test_short_id_column_is_rejected() {
    let err = HierarchyBuilder::new(["A", "B"], ["", "A"])
        .ids(["A"])
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        HierarchyError::LengthMismatch {
            column: "ids",
            expected: 2,
            found: 1,
        }
    );
}
