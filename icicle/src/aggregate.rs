//! Bottom-up value aggregation.

use crate::error::ValueInconsistency;
use crate::hierarchy::{NodeIdx, Tree};

/// How a node's display value relates to its input value and children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueMode {
    /// Each leaf counts 1.
    #[default]
    CountLeaves,
    /// Leaves and branches each count 1.
    CountLeavesAndBranches,
    /// Each branch counts 1.
    CountBranches,
    /// Input value is the increment on top of the children's sum.
    Remainder,
    /// Input value is the node's total and must cover its children.
    Total,
}

impl ValueMode {
    pub fn uses_values(self) -> bool {
        matches!(self, ValueMode::Remainder | ValueMode::Total)
    }
}

/// Annotate every node of `tree` with its aggregated value.
///
/// In [`ValueMode::Total`] every node whose explicit value is smaller than
/// its children's sum is reported, root first. Values are still written so
/// callers can inspect them, but the trace should not be rendered.
pub fn aggregate(tree: &mut Tree, mode: ValueMode) -> Result<(), Vec<ValueInconsistency>> {
    let order = tree.descendants(tree.root());
    let mut failures = Vec::new();

    // Breadth-first order reversed visits every child before its parent.
    for &idx in order.iter().rev() {
        let child_sum: f64 = tree.children(idx).iter().map(|c| tree.value(*c)).sum();
        let node = tree.get(idx);
        let is_leaf = node.is_leaf();
        let own = own_contribution(mode, is_leaf, node.is_synthetic());

        let value = match mode {
            ValueMode::Remainder => node.input_value.unwrap_or(0.0) + child_sum,
            ValueMode::Total => match node.input_value {
                Some(v) if !is_leaf && v < child_sum => {
                    failures.push((
                        idx,
                        ValueInconsistency {
                            id: node.id.clone(),
                            parent_value: v,
                            child_sum,
                        },
                    ));
                    v
                }
                Some(v) => v,
                None => child_sum,
            },
            _ => own + child_sum,
        };

        tree.get_mut(idx).value = value;
    }

    if failures.is_empty() {
        return Ok(());
    }

    let position = |idx: NodeIdx| order.iter().position(|o| *o == idx).unwrap_or(usize::MAX);
    failures.sort_by_key(|(idx, _)| position(*idx));
    Err(failures.into_iter().map(|(_, f)| f).collect())
}

fn own_contribution(mode: ValueMode, is_leaf: bool, synthetic: bool) -> f64 {
    if synthetic {
        return 0.0;
    }
    let counts = match mode {
        ValueMode::CountLeaves => is_leaf,
        ValueMode::CountBranches => !is_leaf,
        ValueMode::CountLeavesAndBranches => true,
        ValueMode::Remainder | ValueMode::Total => false,
    };
    if counts {
        1.0
    } else {
        0.0
    }
}
