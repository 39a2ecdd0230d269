/// Character-cell canvas the world is drawn onto.
///
/// The world lives in pixels; the terminal in cells. A `Canvas` owns one
/// `FrameBuffer` of cells plus the scale (`cell_width_px × cell_height_px`)
/// and a viewport: the block of rows/columns reserved for the world, placed
/// `origin_row` rows below the top of the screen. Pixel rectangles are
/// mapped to every cell they touch and clipped to that viewport.

use crossterm::style::Color;

use crate::config::RenderConfig;
use crate::domain::rect::Rect;

// ── Cell: the unit of the frame buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    /// Explicit background for every cell outside the world.
    pub const BASE_BG: Color = Color::Rgb { r: 14, g: 18, b: 32 };

    pub const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never produced by drawing; filling the back buffer with it forces a
    /// full repaint.
    pub const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    pub fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Cell::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write `s` at (x, y), one column per char, clipped at the right edge.
    pub fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Paint a whole row with `bg`.
    pub fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Canvas: pixel space on top of the frame buffer ──

pub struct Canvas {
    pub buf: FrameBuffer,
    cell_w: i32,
    cell_h: i32,
    origin_row: usize,
    view_cols: i32,
    view_rows: i32,
}

impl Canvas {
    pub fn new(cfg: &RenderConfig, origin_row: usize) -> Self {
        Canvas {
            buf: FrameBuffer::new(0, 0),
            cell_w: cfg.cell_width_px.max(1),
            cell_h: cfg.cell_height_px.max(1),
            origin_row,
            view_cols: 0,
            view_rows: 0,
        }
    }

    /// Size the world viewport for a `width_px × height_px` screen, clipped to
    /// whatever the terminal can show below `origin_row`.
    pub fn set_view(&mut self, width_px: i32, height_px: i32) {
        let cols = (width_px + self.cell_w - 1) / self.cell_w;
        let rows = (height_px + self.cell_h - 1) / self.cell_h;
        let avail_rows = self.buf.height.saturating_sub(self.origin_row) as i32;
        self.view_cols = cols.min(self.buf.width as i32).max(0);
        self.view_rows = rows.min(avail_rows).max(0);
    }

    pub fn view_cols(&self) -> usize {
        self.view_cols as usize
    }

    pub fn view_rows(&self) -> usize {
        self.view_rows as usize
    }

    /// First screen row below the viewport.
    pub fn below_view(&self) -> usize {
        self.origin_row + self.view_rows()
    }

    /// Fill every viewport cell touched by `r` (screen pixels).
    pub fn fill_px(&mut self, r: Rect, ch: char, fg: Color, bg: Color) {
        if r.width <= 0 || r.height <= 0 {
            return;
        }
        let c0 = r.left().div_euclid(self.cell_w).max(0);
        let c1 = (r.right() - 1).div_euclid(self.cell_w).min(self.view_cols - 1);
        let r0 = r.top().div_euclid(self.cell_h).max(0);
        let r1 = (r.bottom() - 1).div_euclid(self.cell_h).min(self.view_rows - 1);
        if c0 > c1 || r0 > r1 {
            return;
        }

        let cell = Cell::new(ch, fg, bg);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.buf.set(col as usize, self.origin_row + row as usize, cell);
            }
        }
    }

    /// Text inside the viewport, centered horizontally on `row` (viewport row).
    pub fn put_centered(&mut self, row: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = self.view_cols().saturating_sub(len) / 2;
        self.buf.put_str(x, self.origin_row + row, s, fg, bg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(cols: usize, rows: usize) -> Canvas {
        let cfg = RenderConfig { cell_width_px: 16, cell_height_px: 32 };
        let mut c = Canvas::new(&cfg, 1);
        c.buf.resize(cols, rows);
        c.set_view(768, 640);
        c
    }

    fn count(c: &Canvas, ch: char) -> usize {
        c.buf.cells.iter().filter(|cell| cell.ch == ch).count()
    }

    #[test]
    fn view_is_screen_in_cells_clipped_to_terminal() {
        let c = canvas(100, 40);
        assert_eq!((c.view_cols(), c.view_rows()), (48, 20));
        assert_eq!(c.below_view(), 21);

        let small = canvas(30, 10);
        assert_eq!((small.view_cols(), small.view_rows()), (30, 9));
    }

    #[test]
    fn tile_covers_four_by_two_cells() {
        let mut c = canvas(100, 40);
        c.fill_px(Rect::new(64, 64, 64, 64), '#', Color::White, Color::Reset);
        assert_eq!(count(&c, '#'), 8);
        // pixel row 64 is cell row 2, drawn one screen row lower.
        assert_eq!(c.buf.get(4, 3).ch, '#');
        assert_eq!(c.buf.get(7, 4).ch, '#');
        assert_eq!(c.buf.get(8, 4).ch, ' ');
    }

    #[test]
    fn partially_covered_cells_are_filled() {
        let mut c = canvas(100, 40);
        // x 10..20 straddles cells 0 and 1.
        c.fill_px(Rect::new(10, 0, 10, 10), 'o', Color::White, Color::Reset);
        assert_eq!(c.buf.get(0, 1).ch, 'o');
        assert_eq!(c.buf.get(1, 1).ch, 'o');
        assert_eq!(count(&c, 'o'), 2);
    }

    #[test]
    fn offscreen_rects_are_clipped() {
        let mut c = canvas(100, 40);
        c.fill_px(Rect::new(-64, 0, 64, 64), '#', Color::White, Color::Reset);
        c.fill_px(Rect::new(768, 0, 64, 64), '#', Color::White, Color::Reset);
        c.fill_px(Rect::new(0, 640, 64, 64), '#', Color::White, Color::Reset);
        assert_eq!(count(&c, '#'), 0);

        c.fill_px(Rect::new(-8, 0, 16, 32), '#', Color::White, Color::Reset);
        assert_eq!(count(&c, '#'), 1);
        assert_eq!(c.buf.get(0, 1).ch, '#');
    }

    #[test]
    fn hud_rows_are_never_touched() {
        let mut c = canvas(100, 40);
        c.fill_px(Rect::new(0, -100, 768, 120), '#', Color::White, Color::Reset);
        assert_eq!(c.buf.get(0, 0).ch, ' ');
        assert_eq!(c.buf.get(0, 1).ch, '#');
    }
}
