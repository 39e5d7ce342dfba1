/// Axis-aligned rectangle in viewport units, stored by its edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl Rect {
    pub const fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self { x0, x1, y0, y1 }
    }

    pub const fn from_size(width: f64, height: f64) -> Self {
        Self {
            x0: 0.0,
            x1: width,
            y0: 0.0,
            y1: height,
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Shrink by per-edge amounts. An axis that would invert collapses to
    /// its midpoint instead.
    pub fn shrink(self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        let (x0, x1) = collapse_inverted(self.x0 + left, self.x1 - right);
        let (y0, y1) = collapse_inverted(self.y0 + top, self.y1 - bottom);
        Self { x0, x1, y0, y1 }
    }

    /// Collapse inverted axes to their midpoints.
    pub fn normalized(self) -> Self {
        self.shrink(0.0, 0.0, 0.0, 0.0)
    }

    /// Shrink every edge by the same amount.
    pub fn inset(self, amount: f64) -> Self {
        self.shrink(amount, amount, amount, amount)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// True if `other` lies inside this rectangle, allowing `eps` slack.
    pub fn encloses(&self, other: &Rect, eps: f64) -> bool {
        other.x0 >= self.x0 - eps
            && other.x1 <= self.x1 + eps
            && other.y0 >= self.y0 - eps
            && other.y1 <= self.y1 + eps
    }

    /// True if the interiors of the two rectangles intersect.
    pub fn overlaps(&self, other: &Rect, eps: f64) -> bool {
        self.x0 < other.x1 - eps
            && other.x0 < self.x1 - eps
            && self.y0 < other.y1 - eps
            && other.y0 < self.y1 - eps
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Zero-area rectangle at this rectangle's center.
    pub fn collapsed(&self) -> Self {
        let (cx, cy) = self.center();
        Self::new(cx, cx, cy, cy)
    }

    /// Clamp every edge into `bounds`.
    pub fn clamp_into(self, bounds: &Rect) -> Self {
        let cx = |x: f64| x.clamp(bounds.x0, bounds.x1.max(bounds.x0));
        let cy = |y: f64| y.clamp(bounds.y0, bounds.y1.max(bounds.y0));
        Self::new(cx(self.x0), cx(self.x1), cy(self.y0), cy(self.y1))
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.x1.is_finite() && self.y0.is_finite() && self.y1.is_finite()
    }

    pub fn lerp(&self, to: &Rect, t: f64) -> Rect {
        Rect::new(
            lerp(self.x0, to.x0, t),
            lerp(self.x1, to.x1, t),
            lerp(self.y0, to.y0, t),
            lerp(self.y1, to.y1, t),
        )
    }
}

fn collapse_inverted(lo: f64, hi: f64) -> (f64, f64) {
    if hi < lo {
        let mid = (lo + hi) / 2.0;
        (mid, mid)
    } else {
        (lo, hi)
    }
}

/// Linear interpolation between two values.
pub(crate) fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
