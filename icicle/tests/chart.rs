use std::time::{Duration, Instant};

use icicle::{
    Chart, ChartConfig, Easing, InteractionState, NodeIdx, Notification, Phase, TraceData,
    TraceError, TransitionConfig, Tree, ValueMode, Viewport, ROOT_KEY,
};

fn data() -> TraceData {
    TraceData::new(["Root", "A", "B", "b"], ["", "Root", "Root", "B"])
}

fn linear() -> TransitionConfig {
    TransitionConfig::new(Duration::from_millis(100), Easing::Linear)
}

fn chart(config: ChartConfig) -> Chart {
    Chart::new(&data(), config.transition(linear()), Viewport::new(200.0, 100.0))
}

fn find(chart: &Chart, id: &str) -> NodeIdx {
    chart.tree().unwrap().find(id).unwrap()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_new_chart_is_settled() {
    let chart = chart(ChartConfig::treemap());
    assert!(chart.is_renderable());
    assert!(chart.diagnostics().is_empty());
    assert_eq!(chart.entry(), Some(chart.tree().unwrap().root()));
    assert_eq!(chart.state(), InteractionState::Idle);
    assert_eq!(chart.frame(Instant::now()).len(), 4);
}

#[test]
fn test_values_pick_remainder_by_default() {
    let data = data().values([0.0, 1.0, 2.0, 3.0]);
    let chart = Chart::new(&data, ChartConfig::treemap(), Viewport::new(200.0, 100.0));
    let tree = chart.tree().unwrap();
    assert_eq!(tree.value(tree.root()), 6.0);
}

#[test]
fn test_total_violation_is_not_renderable() {
    let data = data().values([0.0, 1.0, 2.0, 3.0]);
    let config = ChartConfig::treemap().value_mode(ValueMode::Total);
    let chart = Chart::new(&data, config, Viewport::new(200.0, 100.0));
    assert!(!chart.is_renderable());
    assert_eq!(chart.diagnostics().errors().len(), 2);
    assert!(chart.diagnostics().has_fatal());
    assert!(chart.frame(Instant::now()).is_empty());
}

#[test]
fn test_ambiguous_data_is_not_renderable() {
    let data = TraceData::new(["A", "A", "B"], ["Root", "Root", "A"]);
    let chart = Chart::new(&data, ChartConfig::treemap(), Viewport::new(200.0, 100.0));
    assert!(!chart.is_renderable());
    assert!(chart.tree().is_none());
    assert_eq!(chart.diagnostics().errors().len(), 1);
    assert!(matches!(chart.diagnostics().errors()[0], TraceError::Hierarchy(_)));
}

#[test]
fn test_unknown_level_falls_back_to_root() {
    let chart = chart(ChartConfig::treemap().level("nope"));
    assert!(chart.is_renderable());
    assert_eq!(chart.entry(), Some(chart.tree().unwrap().root()));
    assert_eq!(
        chart.diagnostics().errors(),
        &[TraceError::InvalidEntry("nope".to_string())]
    );
    assert!(!chart.diagnostics().has_fatal());
}

#[test]
fn test_initial_level() {
    let chart = chart(ChartConfig::treemap().level("B"));
    assert_eq!(chart.entry(), Some(find(&chart, "B")));
    assert_eq!(chart.positioned().unwrap().len(), 2);
}

// ============================================================================
// Click to zoom
// ============================================================================

#[test]
fn test_click_zooms_and_animates() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    let a = find(&chart, "A");
    let b = find(&chart, "B");
    let a_before = chart.positioned().unwrap().extent(a).unwrap();

    let out = chart.click(b, now);
    assert_eq!(
        out,
        vec![
            Notification::Click { idx: b },
            Notification::EntryChanged { id: "B".to_string() },
            Notification::Animating,
        ]
    );
    assert_eq!(chart.entry(), Some(b));
    assert_eq!(chart.state(), InteractionState::Transitioning);

    let start = chart.frame(now);
    let a_node = start.iter().find(|n| n.key == "A").unwrap();
    assert_eq!(a_node.phase, Phase::Exit);
    assert_eq!(a_node.extent, a_before);

    let end = chart.frame_at(1.0);
    assert!(end.iter().all(|n| n.key != "A" && n.key != ROOT_KEY));
    let b_leaf = find(&chart, "b");
    let settled = chart.positioned().unwrap().extent(b_leaf).unwrap();
    assert_eq!(end.iter().find(|n| n.key == "b").unwrap().extent, settled);
}

#[test]
fn test_tick_completes_transition() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    chart.click(find(&chart, "B"), now);

    assert!(chart.tick(now + Duration::from_millis(50)).is_empty());
    assert!(chart.is_animating());
    assert_eq!(
        chart.tick(now + Duration::from_millis(100)),
        vec![Notification::AnimationComplete]
    );
    assert!(!chart.is_animating());
    assert_eq!(chart.state(), InteractionState::Idle);
}

#[test]
fn test_clicks_during_transition_are_dropped() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    let b = find(&chart, "B");
    chart.click(b, now);

    // Clicking the entry would zoom out, but a transition is running.
    assert!(chart.click(b, now).is_empty());
    assert_eq!(chart.entry(), Some(b));
}

#[test]
fn test_cancel_transition_jumps_to_target() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    chart.click(find(&chart, "B"), now);

    assert_eq!(chart.cancel_transition(), vec![Notification::AnimationComplete]);
    assert!(chart.cancel_transition().is_empty());
    let frame = chart.frame(now);
    assert_eq!(frame.len(), 2);
    assert!(frame.iter().all(|n| n.phase == Phase::Update));
}

#[test]
fn test_zoom_out_after_transition() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    let b = find(&chart, "B");
    chart.click(b, now);
    chart.tick(now + Duration::from_millis(100));

    let out = chart.click(b, now + Duration::from_millis(200));
    assert!(out.contains(&Notification::EntryChanged { id: "Root".to_string() }));
    assert_eq!(chart.entry(), Some(chart.tree().unwrap().root()));
}

#[test]
fn test_zoom_out_to_root_of_roots_survives_reload() {
    let forest = TraceData::new(["A", "B", "a"], ["", "", "A"]);
    let config = ChartConfig::treemap().transition(TransitionConfig::instant());
    let mut chart = Chart::new(&forest, config, Viewport::new(200.0, 100.0));
    let now = Instant::now();
    let a = find(&chart, "A");
    chart.click(a, now);
    assert_eq!(chart.entry(), Some(a));

    let out = chart.click(a, now);
    assert_eq!(
        out,
        vec![
            Notification::Click { idx: a },
            Notification::EntryChanged { id: ROOT_KEY.to_string() },
        ]
    );
    assert_eq!(chart.entry(), Some(chart.tree().unwrap().root()));

    // The rebuilt root of roots has a new id; the entry must still resolve.
    chart.set_data(&forest, now);
    assert!(chart.diagnostics().is_empty());
    assert_eq!(chart.entry(), Some(chart.tree().unwrap().root()));
}

#[test]
fn test_veto_keeps_entry() {
    let data = data();
    let mut chart = Chart::new(&data, ChartConfig::treemap(), Viewport::new(200.0, 100.0))
        .with_click_handler(|_: &Tree, _: NodeIdx| false);
    let b = find(&chart, "B");
    assert_eq!(chart.click(b, Instant::now()), vec![Notification::Click { idx: b }]);
    assert_eq!(chart.entry(), Some(chart.tree().unwrap().root()));
}

#[test]
fn test_instant_transition_does_not_animate() {
    let mut chart = Chart::new(
        &data(),
        ChartConfig::treemap().transition(TransitionConfig::instant()),
        Viewport::new(200.0, 100.0),
    );
    let b = find(&chart, "B");
    let out = chart.click(b, Instant::now());
    assert!(!out.contains(&Notification::Animating));
    assert!(!chart.is_animating());
    assert_eq!(chart.entry(), Some(b));
}

#[test]
fn test_sunburst_leaf_click_is_plain() {
    let mut chart = chart(ChartConfig::sunburst());
    let a = find(&chart, "A");
    assert_eq!(chart.click(a, Instant::now()), vec![Notification::Click { idx: a }]);
}

#[test]
fn test_interrupted_transition_reports_completion() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    let mut notes = chart.click(find(&chart, "B"), now);

    // Same depth: the replacement plan is static and starts no animation.
    let out = chart.set_max_depth(None, now);
    assert_eq!(out, vec![Notification::AnimationComplete]);
    notes.extend(out);
    notes.extend(chart.tick(now + Duration::from_secs(5)));

    let count = |n: &Notification| notes.iter().filter(|x| *x == n).count();
    assert_eq!(count(&Notification::Animating), 1);
    assert_eq!(count(&Notification::AnimationComplete), 1);
    assert!(!chart.is_animating());
}

#[test]
fn test_interrupting_transition_starts_the_next() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    chart.click(find(&chart, "B"), now);

    assert_eq!(
        chart.set_max_depth(Some(1), now),
        vec![Notification::AnimationComplete, Notification::Animating]
    );
    assert_eq!(
        chart.tick(now + Duration::from_millis(100)),
        vec![Notification::AnimationComplete]
    );
}

// ============================================================================
// Pointer
// ============================================================================

#[test]
fn test_pointer_move_hovers_deepest_node() {
    let mut chart = chart(ChartConfig::treemap());
    let b = find(&chart, "b");
    let (x, y) = chart
        .positioned()
        .unwrap()
        .extent(b)
        .unwrap()
        .as_rect()
        .unwrap()
        .center();
    let out = chart.pointer_move(x, y);
    assert!(matches!(&out[..], [Notification::Hover(info)] if info.idx == b && info.path == "Root/B/"));
    assert_eq!(chart.pointer_move(-10.0, -10.0), vec![Notification::Unhover { idx: b }]);
}

#[test]
fn test_click_at_point() {
    let mut chart = chart(ChartConfig::treemap());
    let b = find(&chart, "B");
    let leaf = find(&chart, "b");
    let (x, y) = chart
        .positioned()
        .unwrap()
        .extent(leaf)
        .unwrap()
        .as_rect()
        .unwrap()
        .center();
    // A leaf selects its parent.
    let out = chart.click_at(x, y, Instant::now());
    assert_eq!(out[0], Notification::Click { idx: leaf });
    assert_eq!(chart.entry(), Some(b));
}

#[test]
fn test_stale_node_index_is_ignored() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    let stale = NodeIdx(chart.tree().unwrap().len() - 1);
    chart.set_data(&TraceData::new(["Root", "A"], ["", "Root"]), now);
    chart.cancel_transition();

    assert!(chart.click(stale, now).is_empty());
    assert!(chart.pointer_enter(stale).is_empty());
    assert_eq!(chart.entry(), Some(chart.tree().unwrap().root()));
}

#[test]
fn test_hit_test_uses_target_layout_during_transition() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    chart.click(find(&chart, "B"), now);
    assert!(chart.is_animating());

    let leaf = find(&chart, "b");
    let (x, y) = chart
        .positioned()
        .unwrap()
        .extent(leaf)
        .unwrap()
        .as_rect()
        .unwrap()
        .center();
    assert_eq!(chart.hit_test(x, y), Some(leaf));
}

#[test]
fn test_hover_disabled_ignores_pointer() {
    let mut chart = chart(ChartConfig::treemap().hover_enabled(false));
    assert!(chart.pointer_move(10.0, 10.0).is_empty());
    assert!(chart.click(find(&chart, "B"), Instant::now()).is_empty());
}

#[test]
fn test_hover_allowed_during_transition() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    chart.click(find(&chart, "B"), now);
    let leaf = find(&chart, "b");
    assert_eq!(chart.pointer_enter(leaf).len(), 1);
}

// ============================================================================
// Updates
// ============================================================================

#[test]
fn test_max_depth_change_animates_exit() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    assert_eq!(chart.set_max_depth(Some(2), now), vec![Notification::Animating]);
    let frame = chart.frame_at(0.5);
    assert_eq!(frame.iter().find(|n| n.key == "b").unwrap().phase, Phase::Exit);
    assert!(chart.frame_at(1.0).iter().all(|n| n.key != "b"));
}

#[test]
fn test_set_level_reports_entry_change() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    let out = chart.set_level(Some("B".to_string()), now);
    assert_eq!(out[0], Notification::EntryChanged { id: "B".to_string() });
    chart.cancel_transition();
    assert!(chart.set_level(Some("B".to_string()), now).is_empty());
}

#[test]
fn test_set_data_animates_new_nodes() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    let next = TraceData::new(["Root", "A", "B", "b", "c"], ["", "Root", "Root", "B", "Root"]);
    assert_eq!(chart.set_data(&next, now), vec![Notification::Animating]);
    let frame = chart.frame_at(0.0);
    assert_eq!(frame.iter().find(|n| n.key == "c").unwrap().phase, Phase::Enter);
}

#[test]
fn test_resize_cancels_and_relayouts() {
    let mut chart = chart(ChartConfig::treemap());
    let now = Instant::now();
    chart.click(find(&chart, "B"), now);
    assert_eq!(chart.resize(Viewport::new(80.0, 40.0)), vec![Notification::AnimationComplete]);
    let entry = chart.entry().unwrap();
    assert_eq!(
        chart.positioned().unwrap().extent(entry).unwrap().as_rect().unwrap().x1,
        80.0
    );
}
