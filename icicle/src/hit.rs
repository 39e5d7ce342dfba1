use crate::hierarchy::NodeIdx;
use crate::layout::{PartitionFamily, PositionedTree};

/// Find the deepest positioned node at the given coordinates.
/// Synthetic roots and zero-area nodes are never hit.
pub fn hit_test(
    positioned: &PositionedTree,
    family: &dyn PartitionFamily,
    x: f64,
    y: f64,
) -> Option<NodeIdx> {
    // Breadth-first order, reversed: deeper levels come first.
    let hit = positioned
        .iter()
        .rev()
        .filter(|node| !node.synthetic && !node.extent.is_empty())
        .find(|node| family.contains(&node.extent, x, y, positioned.viewport))
        .map(|node| node.idx);
    log::trace!("[hit] ({:.1}, {:.1}) -> {:?}", x, y, hit);
    hit
}
