//! Angular partition family.

use std::f64::consts::{PI, TAU};

use super::{snap_edge, Arc, Extent, FamilyKind, LevelContext, PartitionFamily, Viewport};
use crate::text::{fit_scale, TextBox, TextTransform};

const FULL_CIRCLE_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sunburst {
    /// Angular gap between siblings, in radians.
    pub pad: f64,
    pub text_pad: f64,
}

fn is_full_circle(arc: &Arc) -> bool {
    arc.span() >= TAU - FULL_CIRCLE_EPS
}

impl PartitionFamily for Sunburst {
    fn kind(&self) -> FamilyKind {
        FamilyKind::Sunburst
    }

    fn entry_extent(&self, ctx: &LevelContext) -> Extent {
        if ctx.synthetic {
            return Extent::Arc(Arc::new(0.0, TAU, 0.0, 0.0));
        }
        Extent::Arc(Arc::disc(ctx.viewport.radius() / ctx.levels.max(1) as f64))
    }

    fn child_extents(&self, parent: &Extent, weights: &[f64], ctx: &LevelContext) -> Vec<Extent> {
        let Some(parent) = parent.as_arc().copied() else {
            return vec![*parent; weights.len()];
        };
        let n = weights.len();
        if n == 0 {
            return Vec::new();
        }

        let radius = ctx.viewport.radius();
        let rings = ctx.levels.saturating_sub(ctx.level + 1).max(1);
        let r0 = parent.r1;
        let r1 = r0 + (radius - r0).max(0.0) / rings as f64;

        let span = parent.span().max(0.0);
        let gaps = if is_full_circle(&parent) { n } else { n - 1 };
        let mut gap = self.pad.max(0.0);
        if gaps > 0 && gap * gaps as f64 > span / 2.0 {
            gap = span / 2.0 / gaps as f64;
        }
        let available = span - gap * gaps as f64;

        let total: f64 = weights.iter().sum();
        let k = if total > 0.0 { available / total } else { 0.0 };

        let mut angle = parent.a0 + if gaps == n { gap / 2.0 } else { 0.0 };
        weights
            .iter()
            .map(|w| {
                let a0 = angle;
                let a1 = a0 + w * k;
                angle = a1 + gap;
                Extent::Arc(Arc::new(a0, a1, r0, r1))
            })
            .collect()
    }

    fn closest_edge(&self, pt: &Extent, reference: &Extent, bounds: &Extent) -> Extent {
        let (Extent::Arc(pt), Extent::Arc(r), Extent::Arc(b)) = (pt, reference, bounds) else {
            return *pt;
        };
        let e = self.pad.max(0.0);
        let a = |v: f64, probe: f64| snap_edge(v, probe, e, (r.a0, r.a1), (b.a0, b.a1));
        let rad = |v: f64| snap_edge(v, v, 0.0, (r.r0, r.r1), (b.r0, b.r1));
        Extent::Arc(Arc::new(
            a(pt.a0, pt.a0 - e),
            a(pt.a1, pt.a1 + e),
            rad(pt.r0),
            rad(pt.r1),
        ))
    }

    fn bounds(&self, viewport: Viewport) -> Extent {
        Extent::Arc(Arc::disc(viewport.radius()))
    }

    fn path_for_extent(&self, extent: &Extent, viewport: Viewport) -> String {
        let Some(arc) = extent.as_arc() else {
            return String::new();
        };
        if arc.is_empty() {
            return String::new();
        }
        let pt = |a: f64, r: f64| {
            let (x, y) = viewport.polar_to_xy(a, r);
            format!("{},{}", x, y)
        };

        if is_full_circle(arc) {
            // Two half-circle arcs per ring.
            let half = arc.a0 + PI;
            let mut path = format!(
                "M{}A{r},{r} 0 1 1 {}A{r},{r} 0 1 1 {}Z",
                pt(arc.a0, arc.r1),
                pt(half, arc.r1),
                pt(arc.a0, arc.r1),
                r = arc.r1
            );
            if arc.r0 > 0.0 {
                path.push_str(&format!(
                    "M{}A{r},{r} 0 1 0 {}A{r},{r} 0 1 0 {}Z",
                    pt(arc.a0, arc.r0),
                    pt(half, arc.r0),
                    pt(arc.a0, arc.r0),
                    r = arc.r0
                ));
            }
            return path;
        }

        let large = if arc.span() > PI { 1 } else { 0 };
        let mut path = format!(
            "M{}A{r},{r} 0 {large} 1 {}",
            pt(arc.a0, arc.r1),
            pt(arc.a1, arc.r1),
            r = arc.r1
        );
        if arc.r0 > 0.0 {
            path.push_str(&format!(
                "L{}A{r},{r} 0 {large} 0 {}Z",
                pt(arc.a1, arc.r0),
                pt(arc.a0, arc.r0),
                r = arc.r0
            ));
        } else {
            path.push_str(&format!("L{}Z", pt(0.0, 0.0)));
        }
        path
    }

    fn place_label(
        &self,
        extent: &Extent,
        text: TextBox,
        _is_header: bool,
        viewport: Viewport,
    ) -> Option<TextTransform> {
        let arc = extent.as_arc()?;
        if arc.is_empty() {
            return None;
        }

        let ((px, py), width, height) = if arc.r0 <= 0.0 && is_full_circle(arc) {
            // Square inscribed in the center disc.
            let side = arc.r1 * std::f64::consts::SQRT_2;
            (viewport.center(), side, side)
        } else {
            let chord = 2.0 * arc.mid_radius() * (arc.span().min(PI) / 2.0).sin();
            (
                viewport.polar_to_xy(arc.mid_angle(), arc.mid_radius()),
                chord,
                arc.thickness(),
            )
        };
        let pad = self.text_pad.max(0.0) * 2.0;
        let scale = fit_scale(text, width - pad, height - pad);
        Some(TextTransform::new(
            px - text.width * scale / 2.0,
            py - text.height * scale / 2.0,
            scale,
        ))
    }

    fn contains(&self, extent: &Extent, x: f64, y: f64, viewport: Viewport) -> bool {
        let Some(arc) = extent.as_arc() else {
            return false;
        };
        let (angle, radius) = viewport.xy_to_polar(x, y);
        arc.contains_polar(angle, radius)
    }
}
