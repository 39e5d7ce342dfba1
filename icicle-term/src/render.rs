//! Rasterizes chart frames into terminal cells.

use icicle::text::{display_width, truncate_to_width};
use icicle::{Extent, FrameNode, NodeIdx, Tree, Viewport};
use palette::{IntoColor, Oklch, Srgb};

use crate::buffer::{Buffer, Rgb};

/// Chart units per terminal row. Cells are about twice as tall as wide.
pub const ROW_UNITS: f64 = 2.0;

pub fn viewport_for(cols: u16, rows: u16) -> Viewport {
    Viewport::new(cols as f64, rows as f64 * ROW_UNITS)
}

/// Chart coordinates of the center of a cell.
pub fn cell_center(col: u16, row: u16) -> (f64, f64) {
    (col as f64 + 0.5, (row as f64 + 0.5) * ROW_UNITS)
}

fn covers(extent: &Extent, viewport: Viewport, x: f64, y: f64) -> bool {
    match extent {
        Extent::Rect(r) => r.contains(x, y),
        Extent::Arc(a) => {
            let (angle, radius) = viewport.xy_to_polar(x, y);
            a.contains_polar(angle, radius)
        }
    }
}

/// Cell range worth scanning for `extent`, clipped to `rows` x `cols`.
fn cell_bounds(extent: &Extent, cols: u16, rows: u16) -> (u16, u16, u16, u16) {
    match extent {
        Extent::Rect(r) => {
            let clip = |v: f64, max: u16| v.max(0.0).min(max as f64) as u16;
            (
                clip(r.x0.floor(), cols),
                clip(r.x1.ceil(), cols),
                clip((r.y0 / ROW_UNITS).floor(), rows),
                clip((r.y1 / ROW_UNITS).ceil(), rows),
            )
        }
        Extent::Arc(_) => (0, cols, 0, rows),
    }
}

fn oklch(l: f32, c: f32, h: f32) -> Rgb {
    let srgb: Srgb = Oklch::new(l, c, h).into_color();
    let (r, g, b) = srgb.into_format::<u8>().into_components();
    Rgb::new(r, g, b)
}

/// Hue of the top-level branch `idx` belongs to, `None` for the root.
fn branch_hue(tree: &Tree, idx: NodeIdx) -> Option<f32> {
    let root = tree.root();
    let top = std::iter::once(idx)
        .chain(tree.ancestors(idx))
        .find(|a| tree.parent(*a) == Some(root))?;
    let siblings = tree.children(root);
    let position = siblings.iter().position(|s| *s == top)?;
    Some(360.0 * position as f32 / siblings.len().max(1) as f32 + 25.0)
}

/// Fill color of a node: hue from its top-level branch, lighter with depth.
pub fn node_color(tree: &Tree, node: &FrameNode, hovered: bool) -> Rgb {
    let lightness = (0.42 + 0.07 * node.level as f32).min(0.82);
    let lightness = if hovered { lightness + 0.1 } else { lightness };
    match node.idx.and_then(|idx| branch_hue(tree, idx)) {
        Some(hue) => oklch(lightness, 0.11, hue),
        None => oklch(lightness * 0.7, 0.0, 0.0),
    }
}

fn label_color(fill: Rgb) -> Rgb {
    let luma = 0.299 * fill.r as f32 + 0.587 * fill.g as f32 + 0.114 * fill.b as f32;
    if luma > 140.0 {
        Rgb::new(16, 16, 16)
    } else {
        Rgb::new(240, 240, 240)
    }
}

/// Paint `frame` into the top `rows` rows of `buf`.
pub fn paint_frame(
    buf: &mut Buffer,
    rows: u16,
    frame: &[FrameNode],
    tree: &Tree,
    viewport: Viewport,
    hovered: Option<NodeIdx>,
) {
    let cols = buf.width();
    let rows = rows.min(buf.height());

    for node in frame {
        if node.extent.is_empty() {
            continue;
        }
        let is_hovered = node.idx.is_some() && node.idx == hovered;
        let fill = node_color(tree, node, is_hovered);

        let (x0, x1, y0, y1) = cell_bounds(&node.extent, cols, rows);
        for row in y0..y1 {
            for col in x0..x1 {
                let (x, y) = cell_center(col, row);
                if !covers(&node.extent, viewport, x, y) {
                    continue;
                }
                if let Some(cell) = buf.get_mut(col, row) {
                    cell.bg = fill;
                    cell.char = ' ';
                    cell.wide_continuation = false;
                }
            }
        }

        if let Some(text) = node.text {
            paint_label(buf, rows, node, text.x, text.y, text.scale, fill, is_hovered);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn paint_label(
    buf: &mut Buffer,
    rows: u16,
    node: &FrameNode,
    x: f64,
    y: f64,
    scale: f64,
    fill: Rgb,
    bold: bool,
) {
    let width = display_width(&node.label) as f64 * scale;
    // Anything shrunk below one cell is not legible.
    let max = (width + 1e-6).floor();
    if max < 1.0 || !x.is_finite() || !y.is_finite() {
        return;
    }
    let col = x.round().max(0.0) as u16;
    let row = (y / ROW_UNITS).floor().max(0.0) as u16;
    if row >= rows {
        return;
    }
    let label = truncate_to_width(&node.label, max as usize);
    buf.put_str(col, row, buf.width(), &label, label_color(fill), bold);
}
