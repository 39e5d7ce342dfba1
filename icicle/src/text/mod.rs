//! Label measurement and placement primitives.
//!
//! Real font metrics belong to the renderer; the layout only needs a
//! bounding box per label, supplied through [`TextMeasure`].

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::layout::rect::lerp;

/// Bounding box of a measured label.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBox {
    pub width: f64,
    pub height: f64,
}

impl TextBox {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Measures a label for a given font size.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f64) -> TextBox;
}

/// Terminal cells: one unit per column, one row per line. Ignores font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMeasure;

impl TextMeasure for CellMeasure {
    fn measure(&self, text: &str, _font_size: f64) -> TextBox {
        let width = text.lines().map(display_width).max().unwrap_or(0);
        let height = text.lines().count().max(1);
        TextBox::new(width as f64, height as f64)
    }
}

/// Fixed-advance approximation for pixel viewports.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    /// Advance of one column, as a fraction of the font size.
    pub advance: f64,
    /// Line height, as a fraction of the font size.
    pub line_height: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, text: &str, font_size: f64) -> TextBox {
        let columns = text.lines().map(display_width).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        TextBox::new(
            columns as f64 * font_size * self.advance,
            lines as f64 * font_size * self.line_height,
        )
    }
}

/// Vertical placement of a label inside its extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalPosition {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Horizontal placement of a label inside its extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HorizontalPosition {
    #[default]
    Left,
    Center,
    Right,
}

/// Combined text position flags, e.g. "top left".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextPosition {
    pub vertical: VerticalPosition,
    pub horizontal: HorizontalPosition,
}

impl TextPosition {
    pub const fn new(vertical: VerticalPosition, horizontal: HorizontalPosition) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    pub const fn centered() -> Self {
        Self::new(VerticalPosition::Middle, HorizontalPosition::Center)
    }

    pub fn is_bottom(&self) -> bool {
        self.vertical == VerticalPosition::Bottom
    }
}

/// Where and how a label is drawn. `x`/`y` is the top-left corner of the
/// scaled text box before rotation about that corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextTransform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    /// Degrees, clockwise.
    pub rotate: f64,
}

impl TextTransform {
    pub const fn new(x: f64, y: f64, scale: f64) -> Self {
        Self {
            x,
            y,
            scale,
            rotate: 0.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.scale.is_finite() && self.rotate.is_finite()
    }

    pub fn lerp(&self, to: &TextTransform, t: f64) -> TextTransform {
        TextTransform {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            scale: lerp(self.scale, to.scale, t),
            rotate: lerp(self.rotate, to.rotate, t),
        }
    }
}

/// Scale that fits `text` inside `width` x `height`, never above 1.
pub fn fit_scale(text: TextBox, width: f64, height: f64) -> f64 {
    if text.is_empty() {
        return 1.0;
    }
    if width <= 0.0 || height <= 0.0 {
        return 0.0;
    }
    (width / text.width).min(height / text.height).min(1.0)
}

pub fn display_width(s: &str) -> usize {
    s.width()
}

pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let current_width = display_width(s);
    if current_width <= max_width {
        return s.to_string();
    }

    if max_width == 0 {
        return String::new();
    }

    let ellipsis = "…";
    let target_width = max_width.saturating_sub(1);

    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = char_width(ch);
        if width + ch_width > target_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result.push_str(ellipsis);
    result
}
