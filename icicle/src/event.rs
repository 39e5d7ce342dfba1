use crate::hierarchy::{NodeIdx, Tree};

/// Data attached to hover notifications.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverInfo {
    pub idx: NodeIdx,
    pub id: String,
    pub label: String,
    pub value: f64,
    /// `value / parent.value`; absent for the hierarchy root.
    pub percent_parent: Option<f64>,
    pub percent_entry: f64,
    pub percent_root: f64,
    /// Ancestor labels joined by `/` with a trailing `/`, e.g. `"Eve/Seth/"`.
    pub path: String,
}

impl HoverInfo {
    pub fn new(tree: &Tree, entry: NodeIdx, idx: NodeIdx) -> Self {
        let value = tree.value(idx);
        let ratio = |of: NodeIdx| {
            let total = tree.value(of);
            if total > 0.0 {
                value / total
            } else {
                0.0
            }
        };
        Self {
            idx,
            id: tree.get(idx).id.clone(),
            label: tree.display_label(idx).to_string(),
            value,
            percent_parent: tree.parent(idx).map(ratio),
            percent_entry: ratio(entry),
            percent_root: ratio(tree.root()),
            path: tree.label_path(idx),
        }
    }
}

/// Notifications emitted by a chart in response to input.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Hover(HoverInfo),
    Unhover { idx: NodeIdx },
    /// Plain click, also sent along with a zoom.
    Click { idx: NodeIdx },
    EntryChanged { id: String },
    Animating,
    AnimationComplete,
}

/// Collaborator consulted before a click zooms. Returning `false` vetoes
/// the zoom; only the plain click notification fires.
pub trait ClickHandler {
    fn on_click(&mut self, tree: &Tree, idx: NodeIdx) -> bool;
}

impl<F> ClickHandler for F
where
    F: FnMut(&Tree, NodeIdx) -> bool,
{
    fn on_click(&mut self, tree: &Tree, idx: NodeIdx) -> bool {
        self(tree, idx)
    }
}
