//! Partition layout: assigns an extent to every node of the entry subtree.

pub mod extent;
pub mod rect;
pub mod sunburst;
pub mod tiling;
pub mod treemap;

use std::collections::{HashMap, VecDeque};

pub use extent::{Arc, Extent};
pub use rect::Rect;
pub use sunburst::Sunburst;
pub use tiling::{Packing, GOLDEN_RATIO};
pub use treemap::{Flip, MarkerPad, TilingConfig, Treemap};

use crate::hierarchy::{NodeIdx, Tree};
use crate::text::{TextMeasure, TextPosition, TextTransform};

/// Drawing surface size in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_size(self.width.max(0.0), self.height.max(0.0))
    }

    pub fn center(&self) -> (f64, f64) {
        self.rect().center()
    }

    /// Outer radius of an angular layout.
    pub fn radius(&self) -> f64 {
        (self.width.min(self.height) / 2.0).max(0.0)
    }

    /// Point at `angle` (radians clockwise from 12 o'clock) and `radius`.
    pub fn polar_to_xy(&self, angle: f64, radius: f64) -> (f64, f64) {
        let (cx, cy) = self.center();
        (cx + radius * angle.sin(), cy - radius * angle.cos())
    }

    /// Inverse of [`Viewport::polar_to_xy`], angle normalized to `[0, TAU)`.
    pub fn xy_to_polar(&self, x: f64, y: f64) -> (f64, f64) {
        let (cx, cy) = self.center();
        let (dx, dy) = (x - cx, y - cy);
        let angle = dx.atan2(-dy).rem_euclid(std::f64::consts::TAU);
        (angle, dx.hypot(dy))
    }
}

/// Which partition family a chart uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyKind {
    Treemap,
    Sunburst,
}

/// Family specific options.
#[derive(Debug, Clone, PartialEq)]
pub enum FamilyConfig {
    Treemap {
        tiling: TilingConfig,
        marker_pad: MarkerPad,
    },
    Sunburst {
        /// Angular gap between siblings, in radians.
        pad: f64,
    },
}

impl FamilyConfig {
    pub fn treemap() -> Self {
        FamilyConfig::Treemap {
            tiling: TilingConfig::default(),
            marker_pad: MarkerPad::default(),
        }
    }

    pub fn sunburst() -> Self {
        FamilyConfig::Sunburst { pad: 0.0 }
    }

    pub fn kind(&self) -> FamilyKind {
        match self {
            FamilyConfig::Treemap { .. } => FamilyKind::Treemap,
            FamilyConfig::Sunburst { .. } => FamilyKind::Sunburst,
        }
    }
}

impl Default for FamilyConfig {
    fn default() -> Self {
        Self::treemap()
    }
}

/// Everything [`layout`] needs besides the tree and viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub family: FamilyConfig,
    /// Levels shown below and including the entry. `None` shows all.
    pub max_depth: Option<usize>,
    pub font_size: f64,
    pub text_position: TextPosition,
    /// Gap between a label and the edge of its extent.
    pub text_pad: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            family: FamilyConfig::default(),
            max_depth: None,
            font_size: 12.0,
            text_position: TextPosition::default(),
            text_pad: 3.0,
        }
    }
}

impl LayoutOptions {
    pub fn family(mut self, family: FamilyConfig) -> Self {
        self.family = family;
        self
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn text_position(mut self, text_position: TextPosition) -> Self {
        self.text_position = text_position;
        self
    }

    pub fn text_pad(mut self, text_pad: f64) -> Self {
        self.text_pad = text_pad;
        self
    }

    pub fn kind(&self) -> FamilyKind {
        self.family.kind()
    }

    /// Build the partition family these options describe.
    pub fn partition(&self) -> Box<dyn PartitionFamily> {
        match &self.family {
            FamilyConfig::Treemap { tiling, marker_pad } => Box::new(Treemap {
                tiling: *tiling,
                marker_pad: *marker_pad,
                font_size: self.font_size,
                text_position: self.text_position,
                text_pad: self.text_pad,
            }),
            FamilyConfig::Sunburst { pad } => Box::new(Sunburst {
                pad: *pad,
                text_pad: self.text_pad,
            }),
        }
    }
}

/// Where in the positioned subtree a split happens.
#[derive(Debug, Clone, Copy)]
pub struct LevelContext {
    pub viewport: Viewport,
    /// Tree depth of the node being split.
    pub depth: usize,
    /// Level of the node being split, the entry being level 0.
    pub level: usize,
    /// Number of positioned levels, including the entry.
    pub levels: usize,
    /// The node being split is a synthetic root of roots.
    pub synthetic: bool,
}

/// Geometry operations that differ between treemaps and sunbursts.
pub trait PartitionFamily {
    fn kind(&self) -> FamilyKind;

    /// Extent of the entry node.
    fn entry_extent(&self, ctx: &LevelContext) -> Extent;

    /// Split `parent` among children proportional to `weights`, in order.
    fn child_extents(&self, parent: &Extent, weights: &[f64], ctx: &LevelContext) -> Vec<Extent>;

    /// Snap every edge of `pt` that lies within padding tolerance of the
    /// matching edge of `reference` onto the corresponding edge of `bounds`.
    fn closest_edge(&self, pt: &Extent, reference: &Extent, bounds: &Extent) -> Extent;

    /// Whole drawable area.
    fn bounds(&self, viewport: Viewport) -> Extent;

    /// Degenerate extent at the position of `extent`.
    fn collapsed(&self, extent: &Extent) -> Extent {
        match extent {
            Extent::Rect(r) => Extent::Rect(r.collapsed()),
            Extent::Arc(a) => Extent::Arc(a.collapsed()),
        }
    }

    /// Post-processing applied once every extent is known.
    fn finish(&self, extent: Extent, _viewport: Viewport) -> Extent {
        extent
    }

    /// SVG path data outlining `extent`; empty when there is nothing to draw.
    fn path_for_extent(&self, extent: &Extent, viewport: Viewport) -> String;

    /// Fit a label of size `text` into `extent`.
    fn place_label(
        &self,
        extent: &Extent,
        text: crate::text::TextBox,
        is_header: bool,
        viewport: Viewport,
    ) -> Option<TextTransform>;

    fn contains(&self, extent: &Extent, x: f64, y: f64, viewport: Viewport) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub idx: NodeIdx,
    /// Stable transition key.
    pub key: String,
    pub extent: Extent,
    /// Levels below the entry.
    pub level: usize,
    /// Has positioned children, so its label is drawn as a header.
    pub is_header: bool,
    pub synthetic: bool,
    pub text: Option<TextTransform>,
}

/// Result of one layout pass, in breadth-first order from the entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedTree {
    pub entry: NodeIdx,
    pub kind: FamilyKind,
    pub viewport: Viewport,
    /// Number of positioned levels, including the entry.
    pub levels: usize,
    nodes: Vec<PositionedNode>,
    by_idx: HashMap<NodeIdx, usize>,
}

impl PositionedTree {
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, idx: NodeIdx) -> Option<&PositionedNode> {
        self.by_idx.get(&idx).map(|i| &self.nodes[*i])
    }

    pub fn contains(&self, idx: NodeIdx) -> bool {
        self.by_idx.contains_key(&idx)
    }

    pub fn extent(&self, idx: NodeIdx) -> Option<Extent> {
        self.get(idx).map(|n| n.extent)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PositionedNode> {
        self.nodes.iter()
    }
}

/// Effective depth budget: a synthetic entry does not use up a level.
pub fn depth_budget(tree: &Tree, entry: NodeIdx, max_depth: Option<usize>) -> Option<usize> {
    let synthetic = tree.get(entry).is_synthetic();
    max_depth.map(|d| if synthetic { d.max(1) + 1 } else { d.max(1) })
}

/// Position the subtree under `entry`.
pub fn layout(
    tree: &Tree,
    entry: NodeIdx,
    options: &LayoutOptions,
    viewport: Viewport,
    measure: &dyn TextMeasure,
) -> PositionedTree {
    let family = options.partition();
    let budget = depth_budget(tree, entry, options.max_depth);
    let shown = |level: usize| match budget {
        Some(b) => level < b,
        None => true,
    };

    // Breadth-first walk of the visible subtree.
    let mut order: Vec<(NodeIdx, usize)> = Vec::new();
    let mut queue = VecDeque::from([(entry, 0usize)]);
    while let Some((idx, level)) = queue.pop_front() {
        order.push((idx, level));
        if shown(level + 1) {
            queue.extend(tree.children(idx).iter().map(|c| (*c, level + 1)));
        }
    }
    let levels = order.iter().map(|(_, l)| l + 1).max().unwrap_or(1);

    let context = |idx: NodeIdx, level: usize| LevelContext {
        viewport,
        depth: tree.get(idx).depth,
        level,
        levels,
        synthetic: tree.get(idx).is_synthetic(),
    };

    let mut extents: HashMap<NodeIdx, Extent> = HashMap::new();
    extents.insert(entry, family.entry_extent(&context(entry, 0)).sanitized());

    for &(idx, level) in &order {
        let children = tree.children(idx);
        if children.is_empty() || !shown(level + 1) {
            continue;
        }
        let Some(parent) = extents.get(&idx).copied() else {
            continue;
        };
        let weights: Vec<f64> = children
            .iter()
            .map(|c| {
                let node = tree.get(*c);
                if node.hidden || !node.value.is_finite() {
                    0.0
                } else {
                    node.value.max(0.0)
                }
            })
            .collect();
        let placed = family.child_extents(&parent, &weights, &context(idx, level));
        for (child, extent) in children.iter().zip(placed) {
            extents.insert(*child, extent.sanitized());
        }
    }

    let mut nodes = Vec::with_capacity(order.len());
    let mut by_idx = HashMap::with_capacity(order.len());
    for (idx, level) in order {
        let Some(extent) = extents.get(&idx).copied() else {
            continue;
        };
        let extent = family.finish(extent, viewport).sanitized();
        let node = tree.get(idx);
        let is_header = !node.children.is_empty() && shown(level + 1);
        let label = tree.display_label(idx);
        let text = family
            .place_label(&extent, measure.measure(label, options.font_size), is_header, viewport)
            .filter(TextTransform::is_finite);

        by_idx.insert(idx, nodes.len());
        nodes.push(PositionedNode {
            idx,
            key: tree.key(idx).to_string(),
            extent,
            level,
            is_header,
            synthetic: node.is_synthetic(),
            text,
        });
    }

    log::debug!(
        "[layout] {:?} entry={:?} levels={} nodes={}",
        family.kind(),
        tree.key(entry),
        levels,
        nodes.len()
    );

    PositionedTree {
        entry,
        kind: family.kind(),
        viewport,
        levels,
        nodes,
        by_idx,
    }
}

/// One edge of a closest-edge projection: `lo` if `probe` is within `e` of
/// the reference's low edge, `hi` if within `e` of its high edge, else `v`.
pub(crate) fn snap_edge(
    v: f64,
    probe: f64,
    e: f64,
    reference: (f64, f64),
    bounds: (f64, f64),
) -> f64 {
    if probe - e <= reference.0 {
        bounds.0
    } else if probe + e >= reference.1 {
        bounds.1
    } else {
        v
    }
}
