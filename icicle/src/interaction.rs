//! Hover and click handling for one chart.

use crate::event::{ClickHandler, HoverInfo, Notification};
use crate::hierarchy::{NodeIdx, Tree};
use crate::layout::FamilyKind;

/// Observable state derived from the interaction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Hovering(NodeIdx),
    Dragging,
    Transitioning,
}

/// Result of a click: notifications to deliver and the entry to zoom to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickOutcome {
    pub notifications: Vec<Notification>,
    pub zoom: Option<NodeIdx>,
}

/// Tracks hover and click state for one chart.
///
/// While dragging or with hover disabled every pointer event is ignored.
/// Zoom clicks during a transition are dropped.
#[derive(Debug)]
pub struct Interaction {
    hovered: Option<NodeIdx>,
    hover_emitted: bool,
    dragging: bool,
    transitioning: bool,
    hover_enabled: bool,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            hovered: None,
            hover_emitted: false,
            dragging: false,
            transitioning: false,
            hover_enabled: true,
        }
    }
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        if self.dragging {
            InteractionState::Dragging
        } else if self.transitioning {
            InteractionState::Transitioning
        } else if let Some(idx) = self.hovered {
            InteractionState::Hovering(idx)
        } else {
            InteractionState::Idle
        }
    }

    pub fn hovered(&self) -> Option<NodeIdx> {
        self.hovered
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn hover_enabled(&self) -> bool {
        self.hover_enabled
    }

    fn ignoring(&self) -> bool {
        self.dragging || !self.hover_enabled
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn set_hover_enabled(&mut self, enabled: bool) {
        self.hover_enabled = enabled;
    }

    pub(crate) fn set_transitioning(&mut self, transitioning: bool) {
        self.transitioning = transitioning;
    }

    /// Forget the hovered node without notifying, e.g. after the tree it
    /// pointed into was replaced.
    pub(crate) fn reset_hover(&mut self) {
        self.hovered = None;
        self.hover_emitted = false;
    }

    pub fn pointer_enter(&mut self, tree: &Tree, entry: NodeIdx, idx: NodeIdx) -> Vec<Notification> {
        if self.ignoring() || self.hovered == Some(idx) {
            return Vec::new();
        }
        let mut out = self.pointer_leave();
        self.hovered = Some(idx);
        self.hover_emitted = true;
        out.push(Notification::Hover(HoverInfo::new(tree, entry, idx)));
        out
    }

    pub fn pointer_leave(&mut self) -> Vec<Notification> {
        if self.ignoring() {
            return Vec::new();
        }
        let previous = self.hovered.take();
        let emitted = std::mem::take(&mut self.hover_emitted);
        match previous {
            Some(idx) if emitted => vec![Notification::Unhover { idx }],
            _ => Vec::new(),
        }
    }

    pub fn click(
        &mut self,
        tree: &Tree,
        entry: NodeIdx,
        kind: FamilyKind,
        idx: NodeIdx,
        handler: Option<&mut dyn ClickHandler>,
    ) -> ClickOutcome {
        if self.ignoring() {
            return ClickOutcome::default();
        }

        let allowed = match handler {
            Some(handler) => handler.on_click(tree, idx),
            None => true,
        };
        let click = Notification::Click { idx };
        if !allowed {
            log::debug!("[click] {:?} vetoed", tree.key(idx));
            return ClickOutcome {
                notifications: vec![click],
                zoom: None,
            };
        }

        let Some(target) = zoom_target(tree, entry, kind, idx) else {
            return ClickOutcome {
                notifications: vec![click],
                zoom: None,
            };
        };

        if self.transitioning {
            log::debug!("[click] {:?} dropped during transition", tree.key(idx));
            return ClickOutcome::default();
        }

        log::debug!("[click] {:?} -> entry {:?}", tree.key(idx), tree.key(target));
        ClickOutcome {
            notifications: vec![
                click,
                Notification::EntryChanged {
                    id: tree.entry_id(target).to_string(),
                },
            ],
            zoom: Some(target),
        }
    }
}

/// Entry a click on `idx` selects, or `None` for a plain click.
pub fn zoom_target(tree: &Tree, entry: NodeIdx, kind: FamilyKind, idx: NodeIdx) -> Option<NodeIdx> {
    if kind == FamilyKind::Sunburst && (tree.is_root(idx) || tree.is_leaf(idx)) {
        return None;
    }
    if idx == entry {
        return tree.parent(entry);
    }
    if tree.is_ancestor(idx, entry) {
        return Some(idx);
    }
    let target = match kind {
        FamilyKind::Treemap if tree.is_leaf(idx) => tree.parent(idx)?,
        _ => idx,
    };
    (target != entry).then_some(target)
}
