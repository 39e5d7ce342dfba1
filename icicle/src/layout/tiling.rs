//! Rectangle tiling algorithms.
//!
//! Each function splits a rectangle among weights, returning one rectangle
//! per weight in input order. Cells always cover the whole area (zero-weight
//! cells get zero area) and never overlap.

use super::Rect;

/// `(1 + sqrt 5) / 2`, the classic squarify target.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// How a rectangle is split among children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Packing {
    /// Rows or columns grown greedily while the worst aspect ratio improves.
    Squarify { ratio: f64 },
    /// Balanced recursive bisection along the longer side.
    Binary,
    /// Stacked rows.
    Slice,
    /// Side-by-side columns.
    Dice,
    /// Dice at even depths, slice at odd depths.
    SliceDice,
    /// Slice at even depths, dice at odd depths.
    DiceSlice,
}

impl Default for Packing {
    fn default() -> Self {
        Packing::Squarify { ratio: 1.0 }
    }
}

/// Tile `area` among `weights` for a parent at `depth`.
pub fn tile(packing: Packing, weights: &[f64], area: Rect, depth: usize) -> Vec<Rect> {
    if weights.is_empty() {
        return Vec::new();
    }
    match packing {
        Packing::Squarify { ratio } => squarify(weights, area, ratio),
        Packing::Binary => binary(weights, area),
        Packing::Slice => slice(weights, area),
        Packing::Dice => dice(weights, area),
        Packing::SliceDice if depth % 2 == 1 => slice(weights, area),
        Packing::SliceDice => dice(weights, area),
        Packing::DiceSlice if depth % 2 == 1 => dice(weights, area),
        Packing::DiceSlice => slice(weights, area),
    }
}

/// Side-by-side columns proportional to weight.
pub fn dice(weights: &[f64], area: Rect) -> Vec<Rect> {
    let total: f64 = weights.iter().sum();
    let k = if total > 0.0 { area.width() / total } else { 0.0 };
    let mut x = area.x0;
    weights
        .iter()
        .map(|w| {
            let x0 = x;
            x += w * k;
            Rect::new(x0, x, area.y0, area.y1)
        })
        .collect()
}

/// Stacked rows proportional to weight.
pub fn slice(weights: &[f64], area: Rect) -> Vec<Rect> {
    let total: f64 = weights.iter().sum();
    let k = if total > 0.0 { area.height() / total } else { 0.0 };
    let mut y = area.y0;
    weights
        .iter()
        .map(|w| {
            let y0 = y;
            y += w * k;
            Rect::new(area.x0, area.x1, y0, y)
        })
        .collect()
}

/// Recursive bisection choosing the split that best balances both halves.
pub fn binary(weights: &[f64], area: Rect) -> Vec<Rect> {
    let mut sums = Vec::with_capacity(weights.len() + 1);
    sums.push(0.0);
    let mut acc = 0.0;
    for w in weights {
        acc += w;
        sums.push(acc);
    }
    let mut out = vec![Rect::default(); weights.len()];
    bisect(&sums, 0, weights.len(), acc, area, &mut out);
    out
}

fn bisect(sums: &[f64], i: usize, j: usize, value: f64, area: Rect, out: &mut [Rect]) {
    if i + 1 >= j {
        out[i] = area;
        return;
    }

    let offset = sums[i];
    let target = value / 2.0 + offset;
    let mut k = i + 1;
    let mut hi = j - 1;
    while k < hi {
        let mid = (k + hi) / 2;
        if sums[mid] < target {
            k = mid + 1;
        } else {
            hi = mid;
        }
    }
    if target - sums[k - 1] < sums[k] - target && i + 1 < k {
        k -= 1;
    }

    let left = sums[k] - offset;
    let right = value - left;

    if area.width() > area.height() {
        let xk = if value > 0.0 {
            (area.x0 * right + area.x1 * left) / value
        } else {
            area.x1
        };
        bisect(sums, i, k, left, Rect::new(area.x0, xk, area.y0, area.y1), out);
        bisect(sums, k, j, right, Rect::new(xk, area.x1, area.y0, area.y1), out);
    } else {
        let yk = if value > 0.0 {
            (area.y0 * right + area.y1 * left) / value
        } else {
            area.y1
        };
        bisect(sums, i, k, left, Rect::new(area.x0, area.x1, area.y0, yk), out);
        bisect(sums, k, j, right, Rect::new(area.x0, area.x1, yk, area.y1), out);
    }
}

/// Squarified treemap. Weights are processed largest first; the result is
/// returned in input order.
pub fn squarify(weights: &[f64], area: Rect, ratio: f64) -> Vec<Rect> {
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|a, b| weights[*b].total_cmp(&weights[*a]));
    let sorted: Vec<f64> = order.iter().map(|i| weights[*i]).collect();

    let placed = squarify_sorted(&sorted, area, ratio.max(1.0));

    let mut out = vec![Rect::default(); weights.len()];
    for (rect, original) in placed.into_iter().zip(order) {
        out[original] = rect;
    }
    out
}

fn squarify_sorted(weights: &[f64], area: Rect, ratio: f64) -> Vec<Rect> {
    let n = weights.len();
    let mut out = Vec::with_capacity(n);
    let mut value: f64 = weights.iter().sum();
    let (mut x0, mut y0, x1, y1) = (area.x0, area.y0, area.x1, area.y1);
    let mut i0 = 0;

    if value <= 0.0 {
        return dice(weights, area);
    }

    while i0 < n {
        if value <= 0.0 {
            out.extend(dice(&weights[i0..], Rect::new(x0, x1, y0, y1)));
            break;
        }
        let dx = x1 - x0;
        let dy = y1 - y0;

        // First non-empty weight starts the row.
        let mut i1 = i0;
        let mut sum = 0.0;
        while i1 < n {
            sum = weights[i1];
            i1 += 1;
            if sum > 0.0 {
                break;
            }
        }
        let mut min = sum;
        let mut max = sum;
        let alpha = (dy / dx).max(dx / dy) / (value * ratio);
        let mut beta = sum * sum * alpha;
        let mut min_ratio = (max / beta).max(beta / min);

        // Keep adding while the worst aspect ratio holds or improves.
        while i1 < n {
            let w = weights[i1];
            sum += w;
            min = min.min(w);
            max = max.max(w);
            beta = sum * sum * alpha;
            let new_ratio = (max / beta).max(beta / min);
            if new_ratio > min_ratio {
                sum -= w;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &weights[i0..i1];
        if dx < dy {
            let y = if dy > 0.0 { y0 + dy * sum / value } else { y1 };
            out.extend(dice(row, Rect::new(x0, x1, y0, y)));
            y0 = y;
        } else {
            let x = if dx > 0.0 { x0 + dx * sum / value } else { x1 };
            out.extend(slice(row, Rect::new(x0, x, y0, y1)));
            x0 = x;
        }
        value -= sum;
        i0 = i1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn total_area(rects: &[Rect]) -> f64 {
        rects.iter().map(Rect::area).sum()
    }

    #[test]
    fn test_dice_columns() {
        let rects = dice(&[1.0, 3.0], Rect::from_size(100.0, 10.0));
        assert_eq!(rects[0], Rect::new(0.0, 25.0, 0.0, 10.0));
        assert_eq!(rects[1], Rect::new(25.0, 100.0, 0.0, 10.0));
    }

    #[test]
    fn test_slice_rows() {
        let rects = slice(&[1.0, 1.0], Rect::from_size(10.0, 100.0));
        assert_eq!(rects[0], Rect::new(0.0, 10.0, 0.0, 50.0));
        assert_eq!(rects[1], Rect::new(0.0, 10.0, 50.0, 100.0));
    }

    #[test]
    fn test_squarify_keeps_input_order() {
        let area = Rect::from_size(60.0, 40.0);
        let weights = [1.0, 6.0, 2.0, 3.0];
        let rects = squarify(&weights, area, 1.0);
        assert_eq!(rects.len(), 4);
        for (rect, w) in rects.iter().zip(weights) {
            let expected = area.area() * w / 12.0;
            assert!((rect.area() - expected).abs() < 1e-6, "{:?} vs {}", rect, expected);
        }
        assert!((total_area(&rects) - area.area()).abs() < 1e-6);
    }

    #[test]
    fn test_squarify_single_child_fills() {
        let area = Rect::new(5.0, 25.0, 5.0, 15.0);
        assert_eq!(squarify(&[4.0], area, GOLDEN_RATIO), vec![area]);
    }

    #[test]
    fn test_binary_balances() {
        let area = Rect::from_size(100.0, 10.0);
        let rects = binary(&[1.0, 1.0, 1.0, 1.0], area);
        assert!((rects[0].x1 - 25.0).abs() < EPS);
        assert!((rects[1].x1 - 50.0).abs() < EPS);
        assert!((rects[3].x1 - 100.0).abs() < EPS);
    }

    #[test]
    fn test_zero_total_degenerates() {
        let area = Rect::from_size(10.0, 10.0);
        for packing in [Packing::default(), Packing::Binary, Packing::Slice, Packing::Dice] {
            let rects = tile(packing, &[0.0, 0.0], area, 0);
            assert_eq!(rects.len(), 2);
            assert!(rects.iter().all(|r| r.area() == 0.0), "{:?}", packing);
        }
    }

    #[test]
    fn test_slice_dice_alternates() {
        let area = Rect::from_size(10.0, 10.0);
        let even = tile(Packing::SliceDice, &[1.0, 1.0], area, 0);
        let odd = tile(Packing::SliceDice, &[1.0, 1.0], area, 1);
        assert_eq!(even, dice(&[1.0, 1.0], area));
        assert_eq!(odd, slice(&[1.0, 1.0], area));
    }
}
