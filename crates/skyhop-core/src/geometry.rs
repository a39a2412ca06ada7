use serde::{Deserialize, Serialize};

/// Axis-aligned box in screen-space pixels (y grows downward).
///
/// The size is fixed at construction; only the position is moved afterwards.
/// Overlap is strict: boxes that merely share an edge do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box of the given size whose center lands on `(cx, cy)`.
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn centerx(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn centery(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.width;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.height;
    }

    pub fn set_center(&mut self, cx: f32, cy: f32) {
        self.x = cx - self.width / 2.0;
        self.y = cy - self.height / 2.0;
    }

    /// Strict AABB intersection test.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Grow (or shrink, for negative deltas) around the same center.
    pub fn inflate(&self, dw: f32, dh: f32) -> Rect {
        Rect::new(
            self.x - dw / 2.0,
            self.y - dh / 2.0,
            self.width + dw,
            self.height + dh,
        )
    }

    /// Copy of this box moved by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.centerx(), 25.0);
        assert_eq!(r.centery(), 40.0);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 5.0, 5.0)));
    }

    #[test]
    fn edge_setters_keep_size() {
        let mut r = Rect::new(0.0, 0.0, 28.0, 44.0);
        r.set_right(130.0);
        assert_eq!(r.x, 102.0);
        r.set_bottom(200.0);
        assert_eq!(r.y, 156.0);
        assert_eq!((r.width, r.height), (28.0, 44.0));
    }

    #[test]
    fn inflate_keeps_center() {
        let r = Rect::new(100.0, 100.0, 48.0, 54.0);
        let shrunk = r.inflate(-20.0, -10.0);
        assert_eq!(shrunk.width, 28.0);
        assert_eq!(shrunk.height, 44.0);
        assert_eq!(shrunk.centerx(), r.centerx());
        assert_eq!(shrunk.centery(), r.centery());
    }

    #[test]
    fn from_center_round_trips_center() {
        let r = Rect::from_center(50.0, 60.0, 32.0, 32.0);
        assert_eq!((r.centerx(), r.centery()), (50.0, 60.0));
    }
}
