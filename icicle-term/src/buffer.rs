use icicle::text::char_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub char: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub wide_continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: ' ',
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            wide_continuation: false,
        }
    }
}

/// Grid of terminal cells, diffed against the previous frame on flush.
#[derive(Debug, Clone)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    pub fn new(width: u16, height: u16) -> Self {
        let cells = vec![Cell::default(); (width as usize) * (height as usize)];
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    fn index(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// Write `text` from `(x, y)` keeping each cell's background. Stops at
    /// `max_x`; wide characters that would straddle it are dropped.
    pub fn put_str(&mut self, x: u16, y: u16, max_x: u16, text: &str, fg: Rgb, bold: bool) {
        let max_x = max_x.min(self.width);
        let mut cx = x;
        for ch in text.chars() {
            let w = char_width(ch).max(1) as u16;
            if cx.saturating_add(w) > max_x {
                break;
            }
            if let Some(cell) = self.get_mut(cx, y) {
                cell.char = ch;
                cell.fg = fg;
                cell.bold = bold;
                cell.wide_continuation = false;
            }
            for extra in 1..w {
                if let Some(cell) = self.get_mut(cx + extra, y) {
                    cell.char = ' ';
                    cell.wide_continuation = true;
                }
            }
            cx += w;
        }
    }

    pub fn diff<'a>(&'a self, other: &'a Buffer) -> impl Iterator<Item = (u16, u16, &'a Cell)> {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(move |(i, (cell, _))| {
                let x = (i % self.width as usize) as u16;
                let y = (i / self.width as usize) as u16;
                (x, y, cell)
            })
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_str_keeps_background() {
        let mut buf = Buffer::new(10, 1);
        let bg = Rgb::new(10, 20, 30);
        for x in 0..10 {
            buf.get_mut(x, 0).unwrap().bg = bg;
        }
        buf.put_str(2, 0, 10, "Eve", Rgb::new(255, 255, 255), false);
        assert_eq!(buf.get(2, 0).unwrap().char, 'E');
        assert_eq!(buf.get(4, 0).unwrap().char, 'e');
        assert_eq!(buf.get(3, 0).unwrap().bg, bg);
    }

    #[test]
    fn test_put_str_stops_at_limit() {
        let mut buf = Buffer::new(10, 1);
        buf.put_str(0, 0, 2, "Seth", Rgb::default(), false);
        assert_eq!(buf.get(1, 0).unwrap().char, 'e');
        assert_eq!(buf.get(2, 0).unwrap().char, ' ');
    }

    #[test]
    fn test_wide_char_marks_continuation() {
        let mut buf = Buffer::new(4, 1);
        buf.put_str(0, 0, 4, "日", Rgb::default(), false);
        assert_eq!(buf.get(0, 0).unwrap().char, '日');
        assert!(buf.get(1, 0).unwrap().wide_continuation);
    }

    #[test]
    fn test_diff_reports_changed_cells() {
        let a = Buffer::new(3, 2);
        let mut b = Buffer::new(3, 2);
        b.get_mut(2, 1).unwrap().char = 'x';
        let changed: Vec<_> = b.diff(&a).map(|(x, y, c)| (x, y, c.char)).collect();
        assert_eq!(changed, vec![(2, 1, 'x')]);
    }
}
