//! Rectangular partition family.

use super::tiling::{tile, Packing};
use super::{snap_edge, Extent, FamilyKind, LevelContext, PartitionFamily, Rect, Viewport};
use crate::text::{fit_scale, HorizontalPosition, TextBox, TextPosition, TextTransform, VerticalPosition};

/// Mirror the finished layout within the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flip {
    pub x: bool,
    pub y: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilingConfig {
    pub packing: Packing,
    /// Gap between sibling cells.
    pub pad: f64,
    pub flip: Flip,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            packing: Packing::default(),
            pad: 3.0,
            flip: Flip::default(),
        }
    }
}

impl TilingConfig {
    pub fn packing(mut self, packing: Packing) -> Self {
        self.packing = packing;
        self
    }

    pub fn pad(mut self, pad: f64) -> Self {
        self.pad = pad;
        self
    }

    pub fn flip(mut self, flip: Flip) -> Self {
        self.flip = flip;
        self
    }
}

/// Space a branch reserves around its children. Unset edges derive from
/// the font size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarkerPad {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl MarkerPad {
    pub fn uniform(pad: f64) -> Self {
        Self {
            top: Some(pad),
            right: Some(pad),
            bottom: Some(pad),
            left: Some(pad),
        }
    }
}

/// Resolved per-edge padding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Treemap {
    pub tiling: TilingConfig,
    pub marker_pad: MarkerPad,
    pub font_size: f64,
    pub text_position: TextPosition,
    pub text_pad: f64,
}

impl Default for Treemap {
    fn default() -> Self {
        Self {
            tiling: TilingConfig::default(),
            marker_pad: MarkerPad::default(),
            font_size: 12.0,
            text_position: TextPosition::default(),
            text_pad: 3.0,
        }
    }
}

impl Treemap {
    /// Padding a branch keeps around its children. The header edge is
    /// twice the font size, the other edges a quarter of that.
    pub fn branch_pad(&self, synthetic: bool) -> Edges {
        if synthetic {
            return Edges::default();
        }
        let header = self.font_size * 2.0;
        let (top, bottom) = if self.text_position.is_bottom() {
            (header / 4.0, header)
        } else {
            (header, header / 4.0)
        };
        let pad = self.marker_pad;
        Edges {
            top: pad.top.unwrap_or(top).max(0.0),
            right: pad.right.unwrap_or(header / 4.0).max(0.0),
            bottom: pad.bottom.unwrap_or(bottom).max(0.0),
            left: pad.left.unwrap_or(header / 4.0).max(0.0),
        }
    }

    fn flip(&self, rect: Rect, viewport: Viewport) -> Rect {
        let mut out = rect;
        if self.tiling.flip.x {
            out.x0 = viewport.width - rect.x1;
            out.x1 = viewport.width - rect.x0;
        }
        if self.tiling.flip.y {
            out.y0 = viewport.height - rect.y1;
            out.y1 = viewport.height - rect.y0;
        }
        out
    }
}

impl PartitionFamily for Treemap {
    fn kind(&self) -> FamilyKind {
        FamilyKind::Treemap
    }

    fn entry_extent(&self, ctx: &LevelContext) -> Extent {
        Extent::Rect(ctx.viewport.rect())
    }

    fn child_extents(&self, parent: &Extent, weights: &[f64], ctx: &LevelContext) -> Vec<Extent> {
        let Some(parent) = parent.as_rect().copied() else {
            return vec![*parent; weights.len()];
        };
        let p = self.tiling.pad.max(0.0) / 2.0;
        let edges = self.branch_pad(ctx.synthetic);

        // Tiles are grown by half a gap so that insetting each one by the
        // same amount leaves a full gap between siblings.
        let content = Rect::new(
            parent.x0 + edges.left - p,
            parent.x1 - edges.right + p,
            parent.y0 + edges.top - p,
            parent.y1 - edges.bottom + p,
        )
        .normalized();

        tile(self.tiling.packing, weights, content, ctx.depth)
            .into_iter()
            .map(|cell| Extent::Rect(cell.inset(p).clamp_into(&parent)))
            .collect()
    }

    fn closest_edge(&self, pt: &Extent, reference: &Extent, bounds: &Extent) -> Extent {
        let (Extent::Rect(pt), Extent::Rect(r), Extent::Rect(b)) = (pt, reference, bounds) else {
            return *pt;
        };
        let e = self.tiling.pad.max(0.0);
        let x = |v: f64, probe: f64| snap_edge(v, probe, e, (r.x0, r.x1), (b.x0, b.x1));
        let y = |v: f64, probe: f64| snap_edge(v, probe, e, (r.y0, r.y1), (b.y0, b.y1));
        Extent::Rect(Rect::new(
            x(pt.x0, pt.x0 - e),
            x(pt.x1, pt.x1 + e),
            y(pt.y0, pt.y0 - e),
            y(pt.y1, pt.y1 + e),
        ))
    }

    fn bounds(&self, viewport: Viewport) -> Extent {
        Extent::Rect(viewport.rect())
    }

    fn finish(&self, extent: Extent, viewport: Viewport) -> Extent {
        match extent {
            Extent::Rect(r) => Extent::Rect(self.flip(r, viewport)),
            other => other,
        }
    }

    fn path_for_extent(&self, extent: &Extent, _viewport: Viewport) -> String {
        match extent {
            Extent::Rect(r) if !r.is_empty() => format!(
                "M{},{}L{},{}L{},{}L{},{}Z",
                r.x0, r.y0, r.x1, r.y0, r.x1, r.y1, r.x0, r.y1
            ),
            _ => String::new(),
        }
    }

    fn place_label(
        &self,
        extent: &Extent,
        text: TextBox,
        is_header: bool,
        _viewport: Viewport,
    ) -> Option<TextTransform> {
        let rect = extent.as_rect()?;
        if rect.is_empty() {
            return None;
        }

        let area = if is_header {
            let edges = self.branch_pad(false);
            if self.text_position.is_bottom() {
                Rect::new(rect.x0, rect.x1, (rect.y1 - edges.bottom).max(rect.y0), rect.y1)
            } else {
                Rect::new(rect.x0, rect.x1, rect.y0, (rect.y0 + edges.top).min(rect.y1))
            }
        } else {
            *rect
        };
        let inner = area.inset(self.text_pad.max(0.0));

        let scale = fit_scale(text, inner.width(), inner.height());
        let (w, h) = (text.width * scale, text.height * scale);
        let (cx, cy) = inner.center();

        let x = match self.text_position.horizontal {
            HorizontalPosition::Left => inner.x0,
            HorizontalPosition::Center => cx - w / 2.0,
            HorizontalPosition::Right => inner.x1 - w,
        };
        let y = match self.text_position.vertical {
            _ if is_header => inner.y0,
            VerticalPosition::Top => inner.y0,
            VerticalPosition::Middle => cy - h / 2.0,
            VerticalPosition::Bottom => inner.y1 - h,
        };
        Some(TextTransform::new(x, y, scale))
    }

    fn contains(&self, extent: &Extent, x: f64, y: f64, _viewport: Viewport) -> bool {
        extent.as_rect().is_some_and(|r| r.contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_pad_defaults_follow_font_size() {
        let treemap = Treemap {
            font_size: 12.0,
            ..Treemap::default()
        };
        let edges = treemap.branch_pad(false);
        assert_eq!(edges, Edges { top: 24.0, right: 6.0, bottom: 6.0, left: 6.0 });
    }

    #[test]
    fn test_branch_pad_bottom_text_swaps() {
        let treemap = Treemap {
            text_position: TextPosition::new(VerticalPosition::Bottom, HorizontalPosition::Left),
            ..Treemap::default()
        };
        let edges = treemap.branch_pad(false);
        assert_eq!(edges.top, 6.0);
        assert_eq!(edges.bottom, 24.0);
    }

    #[test]
    fn test_branch_pad_synthetic_is_zero() {
        assert_eq!(Treemap::default().branch_pad(true), Edges::default());
    }

    #[test]
    fn test_flip_mirrors() {
        let treemap = Treemap {
            tiling: TilingConfig::default().flip(Flip { x: true, y: false }),
            ..Treemap::default()
        };
        let out = treemap.flip(Rect::new(10.0, 30.0, 0.0, 5.0), Viewport::new(100.0, 50.0));
        assert_eq!(out, Rect::new(70.0, 90.0, 0.0, 5.0));
    }
}
