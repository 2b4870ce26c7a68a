//! Axis-aligned rectangles in level coordinates

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle; `(x, y)` is the top-left corner, y grows down
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Square of side `2 * radius` around `center`
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Penetration depth on each axis, `None` when not overlapping
    pub fn overlap_depth(&self, other: &Rect) -> Option<Vec2> {
        if !self.overlaps(other) {
            return None;
        }
        let dx = (self.right() - other.x).min(other.right() - self.x);
        let dy = (self.bottom() - other.y).min(other.bottom() - self.y);
        Some(Vec2::new(dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(20.0, 0.0, 5.0, 5.0)));
        // Shared edge is not an overlap
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_overlap_depth() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(8.0, 3.0, 10.0, 10.0);
        let depth = a.overlap_depth(&b).unwrap();
        assert!((depth.x - 2.0).abs() < 1e-6);
        assert!((depth.y - 7.0).abs() < 1e-6);
        assert!(a.overlap_depth(&Rect::new(50.0, 50.0, 1.0, 1.0)).is_none());
    }

    #[test]
    fn test_around() {
        let r = Rect::around(Vec2::new(10.0, 20.0), 3.0);
        assert_eq!(r, Rect::new(7.0, 17.0, 6.0, 6.0));
        assert_eq!(r.center(), Vec2::new(10.0, 20.0));
    }
}
