use std::time::Duration;

use icicle::layout::depth_budget;
use icicle::{
    aggregate, interpolate, layout, Easing, Extent, FamilyConfig, HierarchyBuilder, LayoutOptions,
    MonospaceMeasure, NodeIdx, Phase, PositionedTree, PrevLookup, TransitionConfig,
    TransitionContext, TransitionPlan, Tree, ValueMode, Viewport, ROOT_KEY,
};

const EPS: f64 = 1e-6;
const VIEWPORT: Viewport = Viewport {
    width: 200.0,
    height: 100.0,
};

fn sample() -> Tree {
    let mut tree = HierarchyBuilder::new(["Root", "A", "B", "b"], ["", "Root", "Root", "B"])
        .build()
        .unwrap();
    aggregate(&mut tree, ValueMode::CountLeaves).unwrap();
    tree
}

fn position(tree: &Tree, entry: NodeIdx, options: &LayoutOptions) -> PositionedTree {
    layout(tree, entry, options, VIEWPORT, &MonospaceMeasure::default())
}

fn transition(
    tree: &Tree,
    prev: &PositionedTree,
    next: &PositionedTree,
    options: &LayoutOptions,
) -> TransitionPlan {
    let measure = MonospaceMeasure::default();
    let ctx = TransitionContext {
        max_depth: depth_budget(tree, next.entry, options.max_depth),
        measure: &measure,
        font_size: options.font_size,
    };
    let family = options.partition();
    interpolate(&PrevLookup::capture(prev, tree), next, tree, family.as_ref(), &ctx)
}

fn encloses(outer: &Extent, inner: &Extent) -> bool {
    match (outer, inner) {
        (Extent::Rect(a), Extent::Rect(b)) => a.encloses(b, EPS),
        (Extent::Arc(a), Extent::Arc(b)) => a.encloses(b, EPS),
        _ => false,
    }
}

// ============================================================================
// Easing
// ============================================================================

#[test]
fn test_easing_endpoints() {
    for easing in [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::CubicInOut,
    ] {
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(1.0), 1.0);
    }
}

#[test]
fn test_easing_is_monotonic_and_bounded() {
    for easing in [Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut, Easing::CubicInOut] {
        let mut last = 0.0;
        for step in 0..=100 {
            let v = easing.apply(step as f64 / 100.0);
            assert!((0.0..=1.0).contains(&v));
            assert!(v >= last - 1e-12);
            last = v;
        }
    }
}

#[test]
fn test_cubic_in_out_midpoint() {
    assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-12);
    assert!(Easing::CubicInOut.apply(0.25) < 0.25);
}

#[test]
fn test_easing_clamps_input() {
    assert_eq!(Easing::EaseIn.apply(-1.0), 0.0);
    assert_eq!(Easing::EaseIn.apply(2.0), 1.0);
}

#[test]
fn test_config_progress() {
    let config = TransitionConfig::new(Duration::from_millis(100), Easing::Linear);
    assert!((config.progress(Duration::from_millis(50)) - 0.5).abs() < 1e-9);
    assert_eq!(config.progress(Duration::from_millis(300)), 1.0);
    assert_eq!(TransitionConfig::instant().progress(Duration::ZERO), 1.0);
    assert_eq!(TransitionConfig::default().duration, Duration::from_millis(750));
}

// ============================================================================
// Update
// ============================================================================

#[test]
fn test_identical_layouts_do_not_move() {
    let tree = sample();
    let options = LayoutOptions::default();
    let positioned = position(&tree, tree.root(), &options);
    let plan = transition(&tree, &positioned, &positioned, &options);

    assert!(plan.is_static());
    for t in [0.0, 0.3, 1.0] {
        for node in plan.frame(t) {
            assert_eq!(node.phase, Phase::Update);
            assert_eq!(Some(node.extent), positioned.extent(node.idx.unwrap()));
        }
    }
}

#[test]
fn test_settled_plan_matches_layout() {
    let tree = sample();
    let positioned = position(&tree, tree.root(), &LayoutOptions::default());
    let frame = TransitionPlan::settled(&positioned, &tree).frame(0.0);
    assert_eq!(frame.len(), positioned.len());
    assert_eq!(frame[0].key, ROOT_KEY);
}

// ============================================================================
// Enter
// ============================================================================

#[test]
fn test_entering_node_grows_from_parent() {
    let tree = sample();
    let shallow = LayoutOptions::default().max_depth(Some(2));
    let deep = LayoutOptions::default();
    let prev = position(&tree, tree.root(), &shallow);
    let next = position(&tree, tree.root(), &deep);
    let plan = transition(&tree, &prev, &next, &deep);

    let b = tree.find("B").unwrap();
    let tween = plan.get("b").unwrap();
    assert_eq!(tween.phase, Phase::Enter);
    assert!(encloses(&prev.extent(b).unwrap(), &tween.from));
    assert_eq!(tween.extent_at(1.0), next.extent(tree.find("b").unwrap()).unwrap());

    let parent_scale = prev.get(b).unwrap().text.map(|t| t.scale);
    assert_eq!(tween.text_from.map(|t| t.scale), parent_scale);
}

#[test]
fn test_entering_arc_grows_from_parent() {
    let tree = sample();
    let shallow = LayoutOptions::default()
        .family(FamilyConfig::sunburst())
        .max_depth(Some(2));
    let deep = LayoutOptions::default().family(FamilyConfig::sunburst());
    let prev = position(&tree, tree.root(), &shallow);
    let next = position(&tree, tree.root(), &deep);
    let plan = transition(&tree, &prev, &next, &deep);

    let tween = plan.get("b").unwrap();
    assert_eq!(tween.phase, Phase::Enter);
    assert!(encloses(&prev.extent(tree.find("B").unwrap()).unwrap(), &tween.from));
}

#[test]
fn test_zoom_out_slides_in_from_viewport_edge() {
    let tree = sample();
    let options = LayoutOptions::default();
    let b = tree.find("B").unwrap();
    let prev = position(&tree, b, &options);
    let next = position(&tree, tree.root(), &options);
    let plan = transition(&tree, &prev, &next, &options);

    let root = plan.get(ROOT_KEY).unwrap();
    assert_eq!(root.phase, Phase::Enter);
    assert_eq!(root.from, root.to);

    let a = plan.get("A").unwrap();
    assert_eq!(a.phase, Phase::Enter);
    assert!(encloses(&Extent::Rect(VIEWPORT.rect()), &a.from));

    assert_eq!(plan.get("B").unwrap().phase, Phase::Update);
    assert_eq!(plan.get("b").unwrap().phase, Phase::Update);
}

#[test]
fn test_without_history_nodes_snap() {
    let tree = sample();
    let options = LayoutOptions::default();
    let next = position(&tree, tree.root(), &options);
    let measure = MonospaceMeasure::default();
    let ctx = TransitionContext {
        max_depth: None,
        measure: &measure,
        font_size: 12.0,
    };
    let family = options.partition();
    let plan = interpolate(&PrevLookup::default(), &next, &tree, family.as_ref(), &ctx);
    for tween in plan.tweens() {
        assert_eq!(tween.phase, Phase::Enter);
        assert_eq!(tween.from, tween.to);
    }
}

// ============================================================================
// Exit
// ============================================================================

#[test]
fn test_node_below_entry_collapses_in_place() {
    let tree = sample();
    let deep = LayoutOptions::default();
    let shallow = LayoutOptions::default().max_depth(Some(2));
    let prev = position(&tree, tree.root(), &deep);
    let next = position(&tree, tree.root(), &shallow);
    let plan = transition(&tree, &prev, &next, &shallow);

    let tween = plan.get("b").unwrap();
    assert_eq!(tween.phase, Phase::Exit);
    let from = tween.from.as_rect().unwrap();
    let to = tween.to.as_rect().unwrap();
    assert!(to.is_empty());
    assert_eq!(to.center(), from.center());
    assert_eq!(tween.text_to.map(|t| t.scale), Some(0.0));
}

#[test]
fn test_zoom_in_pushes_siblings_out() {
    let tree = sample();
    let options = LayoutOptions::default();
    let prev = position(&tree, tree.root(), &options);
    let next = position(&tree, tree.find("B").unwrap(), &options);
    let plan = transition(&tree, &prev, &next, &options);

    // Exits are listed first.
    let phases: Vec<Phase> = plan.tweens().iter().map(|t| t.phase).collect();
    let first_kept = phases.iter().position(|p| *p != Phase::Exit).unwrap();
    assert!(phases[first_kept..].iter().all(|p| *p != Phase::Exit));

    let a = plan.get("A").unwrap();
    assert_eq!(a.phase, Phase::Exit);
    assert!(encloses(&Extent::Rect(VIEWPORT.rect()), &a.to));
    assert_eq!(plan.get(ROOT_KEY).unwrap().phase, Phase::Exit);
    assert_eq!(plan.get("b").unwrap().phase, Phase::Update);
}

#[test]
fn test_exits_are_dropped_at_the_end() {
    let tree = sample();
    let options = LayoutOptions::default();
    let prev = position(&tree, tree.root(), &options);
    let next = position(&tree, tree.find("B").unwrap(), &options);
    let plan = transition(&tree, &prev, &next, &options);

    let keys = |t: f64| -> Vec<String> { plan.frame(t).into_iter().map(|n| n.key).collect() };
    assert!(keys(0.5).contains(&"A".to_string()));
    assert_eq!(keys(1.0), vec!["B".to_string(), "b".to_string()]);
    assert_eq!(keys(f64::NAN), keys(1.0));
}

#[test]
fn test_frame_endpoints_are_exact() {
    let tree = sample();
    let options = LayoutOptions::default();
    let prev = position(&tree, tree.root(), &options);
    let next = position(&tree, tree.find("B").unwrap(), &options);
    let plan = transition(&tree, &prev, &next, &options);

    for node in plan.frame(0.0) {
        assert_eq!(Some(node.extent), prev.extent(node.idx.unwrap()));
    }
    for node in plan.frame(1.0) {
        assert_eq!(Some(node.extent), next.extent(node.idx.unwrap()));
    }
}
