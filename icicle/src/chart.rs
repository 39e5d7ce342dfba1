//! One chart instance: owns the tree, the entry, the current layout and
//! the transition in flight.

use std::time::Instant;

use crate::aggregate::{aggregate, ValueMode};
use crate::animation::Animation;
use crate::config::ChartConfig;
use crate::error::{Diagnostics, TraceError};
use crate::event::{ClickHandler, Notification};
use crate::hierarchy::{HierarchyBuilder, IdValue, NodeIdx, Tree};
use crate::hit::hit_test;
use crate::interaction::{Interaction, InteractionState};
use crate::layout::{depth_budget, layout, Extent, PositionedTree, Viewport};
use crate::text::{MonospaceMeasure, TextMeasure};
use crate::transition::{interpolate, FrameNode, PrevLookup, TransitionContext, TransitionPlan};

/// Flat input columns for one chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceData {
    pub labels: Vec<String>,
    pub parents: Vec<IdValue>,
    pub ids: Option<Vec<IdValue>>,
    pub values: Option<Vec<Option<f64>>>,
    pub hidden: Option<Vec<bool>>,
    pub text: Option<Vec<Option<String>>>,
    /// Pins the id of a synthesized root of roots.
    pub root_id: Option<String>,
}

impl TraceData {
    pub fn new<L, P>(labels: L, parents: P) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<IdValue>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            parents: parents.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<IdValue>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<f64>>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn hidden(mut self, hidden: impl IntoIterator<Item = bool>) -> Self {
        self.hidden = Some(hidden.into_iter().collect());
        self
    }

    pub fn text<I>(mut self, text: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<String>>,
    {
        self.text = Some(text.into_iter().map(Into::into).collect());
        self
    }

    pub fn root_id(mut self, id: impl Into<String>) -> Self {
        self.root_id = Some(id.into());
        self
    }

    pub fn has_values(&self) -> bool {
        self.values
            .as_ref()
            .is_some_and(|values| values.iter().any(Option::is_some))
    }

    fn builder(&self) -> HierarchyBuilder {
        let mut builder = HierarchyBuilder::new(self.labels.clone(), self.parents.clone());
        if let Some(ids) = &self.ids {
            builder = builder.ids(ids.clone());
        }
        if let Some(values) = &self.values {
            builder = builder.values(values.clone());
        }
        if let Some(hidden) = &self.hidden {
            builder = builder.hidden(hidden.clone());
        }
        if let Some(text) = &self.text {
            builder = builder.text(text.clone());
        }
        if let Some(id) = &self.root_id {
            builder = builder.root_id(id.clone());
        }
        builder
    }
}

/// An interactive, animated treemap or sunburst.
///
/// Every input method returns the notifications it produced. Frames are
/// pulled with [`Chart::frame`]; the caller owns the clock.
pub struct Chart {
    config: ChartConfig,
    viewport: Viewport,
    measure: Box<dyn TextMeasure>,
    click_handler: Option<Box<dyn ClickHandler>>,
    diagnostics: Diagnostics,
    tree: Option<Tree>,
    /// Id of the requested entry; `None` is the hierarchy root.
    level: Option<String>,
    entry: Option<NodeIdx>,
    positioned: Option<PositionedTree>,
    interaction: Interaction,
    animation: Option<Animation>,
}

impl Chart {
    pub fn new(data: &TraceData, config: ChartConfig, viewport: Viewport) -> Self {
        let mut interaction = Interaction::new();
        interaction.set_hover_enabled(config.hover_enabled);
        let mut chart = Self {
            level: config.level.clone(),
            config,
            viewport,
            measure: Box::new(MonospaceMeasure::default()),
            click_handler: None,
            diagnostics: Diagnostics::new(),
            tree: None,
            entry: None,
            positioned: None,
            interaction,
            animation: None,
        };
        chart.load(data);
        chart.relayout();
        chart
    }

    /// Use `measure` for label boxes and lay out again.
    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self.relayout();
        self
    }

    pub fn with_click_handler(mut self, handler: impl ClickHandler + 'static) -> Self {
        self.click_handler = Some(Box::new(handler));
        self
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The current tree, absent while the data is invalid.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn entry(&self) -> Option<NodeIdx> {
        self.entry
    }

    /// Layout of the current (target) state.
    pub fn positioned(&self) -> Option<&PositionedTree> {
        self.positioned.as_ref()
    }

    pub fn is_renderable(&self) -> bool {
        self.positioned.is_some()
    }

    pub fn state(&self) -> InteractionState {
        self.interaction.state()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// SVG path data for an extent of this chart's family.
    pub fn path_for_extent(&self, extent: &Extent) -> String {
        self.config
            .layout
            .partition()
            .path_for_extent(extent, self.viewport)
    }

    // Data and options

    /// Replace the data, animating from the previous layout.
    pub fn set_data(&mut self, data: &TraceData, now: Instant) -> Vec<Notification> {
        let (prev, mut out) = self.capture();
        self.interaction.reset_hover();
        self.diagnostics.clear();
        self.load(data);
        self.relayout();
        out.extend(self.animate_from(prev, now));
        out
    }

    /// Change how many levels are shown, animating the difference.
    pub fn set_max_depth(&mut self, max_depth: Option<usize>, now: Instant) -> Vec<Notification> {
        let (prev, mut out) = self.capture();
        self.config.layout.max_depth = max_depth;
        self.relayout();
        out.extend(self.animate_from(prev, now));
        out
    }

    /// Select the entry by id (`None` = root), animating the zoom.
    pub fn set_level(&mut self, level: Option<String>, now: Instant) -> Vec<Notification> {
        let (prev, mut out) = self.capture();
        let before = self.entry;
        self.level = level;
        self.relayout();
        if let (Some(tree), Some(entry)) = (&self.tree, self.entry) {
            if before != Some(entry) {
                out.push(Notification::EntryChanged {
                    id: tree.entry_id(entry).to_string(),
                });
            }
        }
        out.extend(self.animate_from(prev, now));
        out
    }

    /// Lay out for a new viewport without animating.
    pub fn resize(&mut self, viewport: Viewport) -> Vec<Notification> {
        self.viewport = viewport;
        let cancelled = self.cancel_transition();
        self.relayout();
        cancelled
    }

    // Pointer input

    pub fn set_dragging(&mut self, dragging: bool) {
        self.interaction.set_dragging(dragging);
    }

    pub fn set_hover_enabled(&mut self, enabled: bool) {
        self.config.hover_enabled = enabled;
        self.interaction.set_hover_enabled(enabled);
    }

    /// Node under a point of the target layout. While a transition runs the
    /// frames on screen still show interpolated geometry, so a hit may land
    /// on a node drawn elsewhere until the transition settles.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<NodeIdx> {
        let positioned = self.positioned.as_ref()?;
        hit_test(positioned, self.config.layout.partition().as_ref(), x, y)
    }

    /// Hover whatever lies under the pointer.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<Notification> {
        match self.hit_test(x, y) {
            Some(idx) => self.pointer_enter(idx),
            None => self.pointer_leave(),
        }
    }

    /// Hover `idx`; indices that do not belong to the current tree are
    /// ignored.
    pub fn pointer_enter(&mut self, idx: NodeIdx) -> Vec<Notification> {
        let (Some(tree), Some(entry)) = (&self.tree, self.entry) else {
            return Vec::new();
        };
        if !tree.contains(idx) {
            return Vec::new();
        }
        self.interaction.pointer_enter(tree, entry, idx)
    }

    pub fn pointer_leave(&mut self) -> Vec<Notification> {
        self.interaction.pointer_leave()
    }

    pub fn click_at(&mut self, x: f64, y: f64, now: Instant) -> Vec<Notification> {
        match self.hit_test(x, y) {
            Some(idx) => self.click(idx, now),
            None => Vec::new(),
        }
    }

    pub fn click(&mut self, idx: NodeIdx, now: Instant) -> Vec<Notification> {
        let (Some(tree), Some(entry)) = (&self.tree, self.entry) else {
            return Vec::new();
        };
        if !tree.contains(idx) {
            log::debug!("[chart] click on stale node {:?}", idx);
            return Vec::new();
        }
        let kind = self.config.layout.kind();
        let handler = self
            .click_handler
            .as_mut()
            .map(|h| h.as_mut() as &mut dyn ClickHandler);
        let outcome = self.interaction.click(tree, entry, kind, idx, handler);

        let mut out = outcome.notifications;
        if let Some(target) = outcome.zoom {
            out.extend(self.zoom_to(target, now));
        }
        out
    }

    // Animation

    /// Finish the transition once its duration has elapsed.
    pub fn tick(&mut self, now: Instant) -> Vec<Notification> {
        match &self.animation {
            Some(animation) if animation.is_complete(now) => self.finish_animation(),
            _ => Vec::new(),
        }
    }

    /// Jump straight to the target state.
    pub fn cancel_transition(&mut self) -> Vec<Notification> {
        if self.animation.is_none() {
            return Vec::new();
        }
        log::debug!("[chart] transition cancelled");
        self.finish_animation()
    }

    /// Nodes to draw at `now`; empty when the trace is not renderable.
    pub fn frame(&self, now: Instant) -> Vec<FrameNode> {
        match &self.animation {
            Some(animation) => animation.frame(now),
            None => self.settled_frame(),
        }
    }

    /// Nodes to draw at a caller-chosen linear progress of the transition
    /// in flight, or the settled state without one.
    pub fn frame_at(&self, progress: f64) -> Vec<FrameNode> {
        match &self.animation {
            Some(animation) => animation.frame_at(progress),
            None => self.settled_frame(),
        }
    }

    fn settled_frame(&self) -> Vec<FrameNode> {
        match (&self.tree, &self.positioned) {
            (Some(tree), Some(positioned)) => TransitionPlan::settled(positioned, tree).frame(1.0),
            _ => Vec::new(),
        }
    }

    fn finish_animation(&mut self) -> Vec<Notification> {
        self.animation = None;
        self.interaction.set_transitioning(false);
        vec![Notification::AnimationComplete]
    }

    // Internals

    fn load(&mut self, data: &TraceData) {
        self.tree = None;
        let mut tree = match data.builder().build() {
            Ok(tree) => tree,
            Err(err) => {
                self.diagnostics.report(TraceError::Hierarchy(err));
                return;
            }
        };

        let mode = self.config.value_mode.unwrap_or(if data.has_values() {
            ValueMode::Remainder
        } else {
            ValueMode::CountLeaves
        });
        if let Err(failures) = aggregate(&mut tree, mode) {
            for failure in failures {
                self.diagnostics.report(TraceError::Value(failure));
            }
            return;
        }

        log::debug!("[chart] loaded {} nodes, {:?}", tree.len(), mode);
        self.tree = Some(tree);
    }

    fn resolve_entry(&mut self) -> Option<NodeIdx> {
        let tree = self.tree.as_ref()?;
        let Some(level) = self.level.as_deref().filter(|l| !l.is_empty()) else {
            return Some(tree.root());
        };
        match tree.find(level) {
            Some(idx) => Some(idx),
            None => {
                self.diagnostics
                    .report(TraceError::InvalidEntry(level.to_string()));
                Some(tree.root())
            }
        }
    }

    fn relayout(&mut self) {
        self.entry = self.resolve_entry();
        self.positioned = match (&self.tree, self.entry) {
            (Some(tree), Some(entry)) => Some(layout(
                tree,
                entry,
                &self.config.layout,
                self.viewport,
                self.measure.as_ref(),
            )),
            _ => None,
        };
    }

    /// Snapshot the current layout. A transition in flight completes first,
    /// and its `AnimationComplete` is returned with the snapshot.
    fn capture(&mut self) -> (Option<PrevLookup>, Vec<Notification>) {
        let completed = if self.animation.is_some() {
            log::debug!("[chart] transition interrupted");
            self.finish_animation()
        } else {
            Vec::new()
        };
        let prev = match (&self.tree, &self.positioned) {
            (Some(tree), Some(positioned)) => Some(PrevLookup::capture(positioned, tree)),
            _ => None,
        };
        (prev, completed)
    }

    fn zoom_to(&mut self, target: NodeIdx, now: Instant) -> Vec<Notification> {
        let (prev, mut out) = self.capture();
        // The root is stored as no level: a root of roots gets a fresh id
        // on every build.
        self.level = self
            .tree
            .as_ref()
            .filter(|tree| !tree.is_root(target))
            .map(|tree| tree.get(target).id.clone());
        self.relayout();
        out.extend(self.animate_from(prev, now));
        out
    }

    fn animate_from(&mut self, prev: Option<PrevLookup>, now: Instant) -> Vec<Notification> {
        let plan = match (&self.tree, &self.positioned, prev) {
            (Some(tree), Some(next), Some(prev)) if !prev.is_empty() => {
                let family = self.config.layout.partition();
                let ctx = TransitionContext {
                    max_depth: depth_budget(tree, next.entry, self.config.layout.max_depth),
                    measure: self.measure.as_ref(),
                    font_size: self.config.layout.font_size,
                };
                interpolate(&prev, next, tree, family.as_ref(), &ctx)
            }
            _ => return Vec::new(),
        };
        if plan.is_static() || self.config.transition.duration.is_zero() {
            return Vec::new();
        }

        self.animation = Some(Animation::start(plan, self.config.transition, now));
        self.interaction.set_transitioning(true);
        vec![Notification::Animating]
    }
}
