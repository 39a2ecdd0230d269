/// Static level geometry.
/// A tile is a solid square; everything that moves collides against it.

use super::rect::Rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tile {
    pub rect: Rect,
}

impl Tile {
    /// Square tile with its top-left corner at `(x, y)`.
    pub fn new(size: i32, x: i32, y: i32) -> Self {
        Tile { rect: Rect::new(x, y, size, size) }
    }

    /// Move the tile horizontally. Used when scrolling the world instead of
    /// the camera.
    pub fn shift(&mut self, dx: i32) {
        self.rect.x += dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_moves_only_x() {
        let mut t = Tile::new(64, 128, 64);
        t.shift(-1);
        assert_eq!(t.rect, Rect::new(127, 64, 64, 64));
    }
}
