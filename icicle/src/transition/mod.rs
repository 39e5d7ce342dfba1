//! Bridges two positioned trees with per-node tweens.
//!
//! Nodes are matched by their stable key. The plan is a pure function of
//! progress: the caller owns the clock and asks for one frame at a time.

mod easing;

use std::collections::{HashMap, HashSet};

pub use easing::{Easing, TransitionConfig};

use crate::hierarchy::{NodeIdx, Tree};
use crate::layout::{Extent, PartitionFamily, PositionedNode, PositionedTree, Viewport};
use crate::text::{TextBox, TextMeasure, TextTransform};

/// What a node captured before re-layout looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct PrevState {
    pub extent: Extent,
    pub text: Option<TextTransform>,
    pub label: String,
    pub level: usize,
}

/// Extents and text transforms of the last positioned tree, by stable key.
#[derive(Debug, Clone, Default)]
pub struct PrevLookup {
    order: Vec<String>,
    states: HashMap<String, PrevState>,
    entry_key: Option<String>,
}

impl PrevLookup {
    pub fn capture(positioned: &PositionedTree, tree: &Tree) -> Self {
        let mut lookup = PrevLookup {
            entry_key: positioned.get(positioned.entry).map(|n| n.key.clone()),
            ..Default::default()
        };
        for node in positioned.iter() {
            lookup.order.push(node.key.clone());
            lookup.states.insert(
                node.key.clone(),
                PrevState {
                    extent: node.extent,
                    text: node.text,
                    label: tree.display_label(node.idx).to_string(),
                    level: node.level,
                },
            );
        }
        lookup
    }

    pub fn get(&self, key: &str) -> Option<&PrevState> {
        self.states.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.states.contains_key(key)
    }

    pub fn entry_key(&self) -> Option<&str> {
        self.entry_key.as_deref()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in capture order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Inputs to [`interpolate`] besides the two layouts.
pub struct TransitionContext<'a> {
    /// Depth budget of the next layout; bounds the ancestor walk for
    /// entering nodes. `None` walks all the way up.
    pub max_depth: Option<usize>,
    pub measure: &'a dyn TextMeasure,
    pub font_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Update,
    Enter,
    Exit,
}

/// Geometry of one node from progress 0 to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub key: String,
    /// Index in the current tree, if the node is still part of it.
    pub idx: Option<NodeIdx>,
    pub label: String,
    pub level: usize,
    pub phase: Phase,
    pub from: Extent,
    pub to: Extent,
    pub text_from: Option<TextTransform>,
    pub text_to: Option<TextTransform>,
}

impl Tween {
    pub fn extent_at(&self, t: f64) -> Extent {
        if t <= 0.0 {
            self.from
        } else if t >= 1.0 {
            self.to
        } else {
            self.from.lerp(&self.to, t)
        }
    }

    pub fn text_at(&self, t: f64) -> Option<TextTransform> {
        match (self.text_from, self.text_to) {
            (_, to) if t >= 1.0 => to,
            (Some(from), _) if t <= 0.0 => Some(from),
            (Some(from), Some(to)) => Some(from.lerp(&to, t)).filter(TextTransform::is_finite),
            (None, to) => to,
            (from, None) => from,
        }
    }

    pub fn is_static(&self) -> bool {
        self.from == self.to && self.text_from == self.text_to
    }
}

/// One node of an animation frame, ready for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameNode {
    pub key: String,
    pub idx: Option<NodeIdx>,
    pub label: String,
    pub level: usize,
    pub phase: Phase,
    pub extent: Extent,
    pub text: Option<TextTransform>,
}

/// Every tween of one transition. Exits come first so they draw underneath.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionPlan {
    tweens: Vec<Tween>,
}

impl TransitionPlan {
    /// A plan that shows `positioned` without motion.
    pub fn settled(positioned: &PositionedTree, tree: &Tree) -> Self {
        let tweens = positioned
            .iter()
            .map(|node| Tween {
                key: node.key.clone(),
                idx: Some(node.idx),
                label: tree.display_label(node.idx).to_string(),
                level: node.level,
                phase: Phase::Update,
                from: node.extent,
                to: node.extent,
                text_from: node.text,
                text_to: node.text,
            })
            .collect();
        Self { tweens }
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn get(&self, key: &str) -> Option<&Tween> {
        self.tweens.iter().find(|t| t.key == key)
    }

    pub fn is_static(&self) -> bool {
        self.tweens.iter().all(Tween::is_static)
    }

    /// Interpolated nodes at `progress`. Exiting nodes are dropped at 1.
    pub fn frame(&self, progress: f64) -> Vec<FrameNode> {
        let t = if progress.is_nan() { 1.0 } else { progress.clamp(0.0, 1.0) };
        self.tweens
            .iter()
            .filter(|tween| t < 1.0 || tween.phase != Phase::Exit)
            .map(|tween| FrameNode {
                key: tween.key.clone(),
                idx: tween.idx,
                label: tween.label.clone(),
                level: tween.level,
                phase: tween.phase,
                extent: tween.extent_at(t),
                text: tween.text_at(t),
            })
            .collect()
    }
}

/// Build the tweens that carry `prev` into `next`.
pub fn interpolate(
    prev: &PrevLookup,
    next: &PositionedTree,
    tree: &Tree,
    family: &dyn PartitionFamily,
    ctx: &TransitionContext<'_>,
) -> TransitionPlan {
    let viewport = next.viewport;
    let bounds = family.bounds(viewport);
    let next_keys: HashSet<&str> = next.iter().map(|n| n.key.as_str()).collect();

    // The next entry's extent in the previous frame is the exit reference.
    let next_entry_key = tree.key(next.entry);
    let next_entry_prev = prev.get(next_entry_key).map(|p| p.extent);

    let mut tweens = Vec::new();

    for key in prev.keys().filter(|k| !next_keys.contains(k)) {
        let Some(state) = prev.get(key) else {
            continue;
        };
        let idx = tree.find_key(key);
        let below_entry = idx.is_some_and(|i| tree.is_within(next.entry, i));
        let to = match next_entry_prev {
            Some(reference) if !below_entry => {
                family.closest_edge(&state.extent, &reference, &bounds)
            }
            _ => family.collapsed(&state.extent),
        }
        .sanitized();
        tweens.push(Tween {
            key: key.to_string(),
            idx,
            label: state.label.clone(),
            level: state.level,
            phase: Phase::Exit,
            from: state.extent,
            to,
            text_from: state.text,
            text_to: state.text.map(|_| vanishing_text(&to, viewport)),
        });
    }

    let mut entering = 0;
    for node in next.iter() {
        let label = tree.display_label(node.idx).to_string();
        let text_box = ctx.measure.measure(&label, ctx.font_size);
        let (phase, from, text_from) = match prev.get(&node.key) {
            Some(state) => {
                let text_from = state.text.or_else(|| {
                    node.text
                        .and_then(|_| synthesize_text(family, node, &state.extent, None, text_box, viewport))
                });
                (Phase::Update, state.extent, text_from)
            }
            None => {
                entering += 1;
                let (from, scale) = enter_origin(prev, next, tree, family, ctx, node, &bounds)
                    .unwrap_or((node.extent, None));
                let from = from.sanitized();
                let text_from = node
                    .text
                    .and_then(|_| synthesize_text(family, node, &from, scale, text_box, viewport));
                (Phase::Enter, from, text_from)
            }
        };
        tweens.push(Tween {
            key: node.key.clone(),
            idx: Some(node.idx),
            label,
            level: node.level,
            phase,
            from,
            to: node.extent,
            text_from,
            text_to: node.text,
        });
    }

    log::debug!(
        "[transition] entry={:?} prev_entry={:?} update={} enter={} exit={}",
        next_entry_key,
        prev.entry_key(),
        next.len() - entering,
        entering,
        tweens.len() - next.len()
    );

    TransitionPlan { tweens }
}

/// Where an entering node starts.
///
/// The nearest ancestor with a previous extent wins: the node grows out of
/// that ancestor's prior silhouette. When zooming out, nodes outside the
/// previous entry slide in from the viewport edge nearest to them. The
/// previous entry's old extent is the last resort.
fn enter_origin(
    prev: &PrevLookup,
    next: &PositionedTree,
    tree: &Tree,
    family: &dyn PartitionFamily,
    ctx: &TransitionContext<'_>,
    node: &PositionedNode,
    bounds: &Extent,
) -> Option<(Extent, Option<f64>)> {
    let hops = ctx.max_depth.unwrap_or(usize::MAX).max(1);
    for ancestor in tree.ancestors(node.idx).take(hops) {
        let Some(state) = prev.get(tree.key(ancestor)) else {
            continue;
        };
        let scale = state.text.map(|t| t.scale);
        let origin = match next.extent(ancestor) {
            Some(reference) => family
                .closest_edge(&node.extent, &reference, &state.extent)
                .clamp_into(&state.extent),
            None => state.extent,
        };
        return Some((origin, scale));
    }

    let prev_entry_key = prev.entry_key()?;
    let prev_entry = tree.find_key(prev_entry_key);
    if let Some(prev_entry) = prev_entry {
        if let Some(reference) = next.extent(prev_entry) {
            if !tree.is_within(prev_entry, node.idx) {
                return Some((family.closest_edge(&node.extent, &reference, bounds), None));
            }
        }
    }

    prev.get(prev_entry_key).map(|state| (state.extent, state.text.map(|t| t.scale)))
}

/// Text transform for a node drawn in `extent`, keeping position only and
/// starting at `scale` when an ancestor's scale is known.
fn synthesize_text(
    family: &dyn PartitionFamily,
    node: &PositionedNode,
    extent: &Extent,
    scale: Option<f64>,
    text_box: TextBox,
    viewport: Viewport,
) -> Option<TextTransform> {
    let placed = family
        .place_label(extent, text_box, node.is_header, viewport)
        .unwrap_or_else(|| vanishing_text(extent, viewport));
    let scale = scale.unwrap_or(placed.scale);
    Some(TextTransform { scale, ..placed }).filter(TextTransform::is_finite)
}

/// Zero-scale text at the visual center of `extent`.
fn vanishing_text(extent: &Extent, viewport: Viewport) -> TextTransform {
    let (x, y) = match extent {
        Extent::Rect(r) => r.center(),
        Extent::Arc(a) => viewport.polar_to_xy(a.mid_angle(), a.mid_radius()),
    };
    TextTransform::new(x, y, 0.0)
}
