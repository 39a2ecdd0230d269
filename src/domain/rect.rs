/// Integer axis-aligned rectangle in world pixels.
///
/// `x`/`y` is the top-left corner. Edges are half-open: a rect covers
/// `[x, x + width) × [y, y + height)`, so two rects that merely touch
/// along an edge do not overlap.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    #[inline] pub fn left(&self) -> i32 { self.x }
    #[inline] pub fn right(&self) -> i32 { self.x + self.width }
    #[inline] pub fn top(&self) -> i32 { self.y }
    #[inline] pub fn bottom(&self) -> i32 { self.y + self.height }
    #[inline] pub fn centerx(&self) -> i32 { self.x + self.width / 2 }
    #[inline] pub fn centery(&self) -> i32 { self.y + self.height / 2 }

    pub fn center(&self) -> (i32, i32) {
        (self.centerx(), self.centery())
    }

    // Edge setters move the rect; size never changes.

    pub fn set_left(&mut self, v: i32) { self.x = v; }
    pub fn set_right(&mut self, v: i32) { self.x = v - self.width; }
    pub fn set_top(&mut self, v: i32) { self.y = v; }
    pub fn set_bottom(&mut self, v: i32) { self.y = v - self.height; }

    pub fn set_topleft(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Copy of this rect moved by (dx, dy).
    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Strict overlap test. Zero-area rects never collide.
    pub fn collides(&self, other: &Rect) -> bool {
        if self.width <= 0 || self.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Does `other` lie completely inside this rect?
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_and_center() {
        let r = Rect::new(10, 20, 32, 64);
        assert_eq!(r.left(), 10);
        assert_eq!(r.right(), 42);
        assert_eq!(r.top(), 20);
        assert_eq!(r.bottom(), 84);
        assert_eq!(r.center(), (26, 52));
    }

    #[test]
    fn edge_setters_keep_size() {
        let mut r = Rect::new(0, 0, 32, 64);
        r.set_right(100);
        assert_eq!((r.x, r.width), (68, 32));
        r.set_bottom(100);
        assert_eq!((r.y, r.height), (36, 64));
        r.set_top(164);
        assert_eq!(r.bottom(), 228);
    }

    #[test]
    fn touching_rects_do_not_collide() {
        let a = Rect::new(0, 0, 64, 64);
        let b = Rect::new(64, 0, 64, 64);
        let c = Rect::new(0, 64, 64, 64);
        assert!(!a.collides(&b));
        assert!(!a.collides(&c));
        assert!(a.collides(&Rect::new(63, 63, 10, 10)));
    }

    #[test]
    fn zero_area_never_collides() {
        let a = Rect::new(0, 0, 64, 64);
        assert!(!a.collides(&Rect::new(10, 10, 0, 5)));
    }

    #[test]
    fn containment() {
        let view = Rect::new(0, 0, 768, 640);
        assert!(view.contains(&Rect::new(0, 0, 10, 10)));
        assert!(!view.contains(&Rect::new(765, 0, 10, 10)));
    }
}
