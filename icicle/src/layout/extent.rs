use std::f64::consts::TAU;

use super::rect::{lerp, Rect};

/// Angular wedge of a ring, in radians and viewport units of radius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Arc {
    pub a0: f64,
    pub a1: f64,
    pub r0: f64,
    pub r1: f64,
}

impl Arc {
    pub const fn new(a0: f64, a1: f64, r0: f64, r1: f64) -> Self {
        Self { a0, a1, r0, r1 }
    }

    /// Full disc of the given radius.
    pub const fn disc(radius: f64) -> Self {
        Self::new(0.0, TAU, 0.0, radius)
    }

    pub fn span(&self) -> f64 {
        self.a1 - self.a0
    }

    pub fn thickness(&self) -> f64 {
        self.r1 - self.r0
    }

    pub fn mid_angle(&self) -> f64 {
        (self.a0 + self.a1) / 2.0
    }

    pub fn mid_radius(&self) -> f64 {
        (self.r0 + self.r1) / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.span() <= 0.0 || self.thickness() <= 0.0
    }

    /// Polar containment; `angle` is normalized to `[0, TAU)`.
    pub fn contains_polar(&self, angle: f64, radius: f64) -> bool {
        let angle = angle.rem_euclid(TAU);
        radius >= self.r0 && radius < self.r1 && angle >= self.a0 && angle < self.a1
    }

    pub fn encloses(&self, other: &Arc, eps: f64) -> bool {
        other.a0 >= self.a0 - eps
            && other.a1 <= self.a1 + eps
            && other.r0 >= self.r0 - eps
            && other.r1 <= self.r1 + eps
    }

    pub fn clamp_into(self, bounds: &Arc) -> Self {
        let ca = |a: f64| a.clamp(bounds.a0, bounds.a1.max(bounds.a0));
        let cr = |r: f64| r.clamp(bounds.r0, bounds.r1.max(bounds.r0));
        Self::new(ca(self.a0), ca(self.a1), cr(self.r0), cr(self.r1))
    }

    /// Zero-width wedge at the middle angle, keeping the outer radius.
    pub fn collapsed(&self) -> Self {
        let mid = self.mid_angle();
        Self::new(mid, mid, self.r1, self.r1)
    }

    pub fn is_finite(&self) -> bool {
        self.a0.is_finite() && self.a1.is_finite() && self.r0.is_finite() && self.r1.is_finite()
    }

    pub fn lerp(&self, to: &Arc, t: f64) -> Arc {
        Arc::new(
            lerp(self.a0, to.a0, t),
            lerp(self.a1, to.a1, t),
            lerp(self.r0, to.r0, t),
            lerp(self.r1, to.r1, t),
        )
    }
}

/// Geometry assigned to a positioned node by one of the layout families.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    Rect(Rect),
    Arc(Arc),
}

impl Extent {
    pub fn as_rect(&self) -> Option<&Rect> {
        match self {
            Extent::Rect(r) => Some(r),
            Extent::Arc(_) => None,
        }
    }

    pub fn as_arc(&self) -> Option<&Arc> {
        match self {
            Extent::Arc(a) => Some(a),
            Extent::Rect(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Extent::Rect(r) => r.is_empty(),
            Extent::Arc(a) => a.is_empty(),
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Extent::Rect(r) => r.is_finite(),
            Extent::Arc(a) => a.is_finite(),
        }
    }

    /// Replace non-finite geometry with a zero-area extent.
    pub fn sanitized(self) -> Self {
        if self.is_finite() {
            return self;
        }
        let zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        match self {
            Extent::Rect(r) => {
                let x = zero(r.x0);
                let y = zero(r.y0);
                Extent::Rect(Rect::new(x, x, y, y))
            }
            Extent::Arc(a) => {
                let angle = zero(a.a0);
                let radius = zero(a.r0);
                Extent::Arc(Arc::new(angle, angle, radius, radius))
            }
        }
    }

    /// Clamp into `bounds` of the same family; mismatched families pass through.
    pub fn clamp_into(self, bounds: &Extent) -> Self {
        match (self, bounds) {
            (Extent::Rect(r), Extent::Rect(b)) => Extent::Rect(r.clamp_into(b)),
            (Extent::Arc(a), Extent::Arc(b)) => Extent::Arc(a.clamp_into(b)),
            (extent, _) => extent,
        }
    }

    /// Interpolate field by field. Mismatched families jump to the target.
    pub fn lerp(&self, to: &Extent, t: f64) -> Extent {
        match (self, to) {
            (Extent::Rect(from), Extent::Rect(to)) => Extent::Rect(from.lerp(to, t)),
            (Extent::Arc(from), Extent::Arc(to)) => Extent::Arc(from.lerp(to, t)),
            _ => *to,
        }
        .sanitized()
    }
}

impl From<Rect> for Extent {
    fn from(rect: Rect) -> Self {
        Extent::Rect(rect)
    }
}

impl From<Arc> for Extent {
    fn from(arc: Arc) -> Self {
        Extent::Arc(arc)
    }
}
