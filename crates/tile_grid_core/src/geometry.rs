//! Screen-space points and rectangles
//!
//! Screen space has its origin at the top-left corner of the canvas with
//! `y` growing downward.

use serde::{Deserialize, Serialize};

/// A point in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector from `other` to `self`
    pub fn delta_from(&self, other: Point) -> (f32, f32) {
        (self.x - other.x, self.y - other.y)
    }
}

/// Axis-aligned rectangle in screen space
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

    /// Create a square with its top-left corner at `(x, y)`
    pub const fn square(x: f32, y: f32, size: f32) -> Self {
        Self::new(x, y, size, size)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open containment: the right and bottom edges are outside
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Strict overlap test. Rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn with_origin(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    /// Shrink by `edge` on every side (used for bordered drawing)
    pub fn inset(&self, edge: f32) -> Rect {
        Rect::new(
            self.x + edge,
            self.y + edge,
            (self.width - 2.0 * edge).max(0.0),
            (self.height - 2.0 * edge).max(0.0),
        )
    }
}

/// Offset that moves `axis` onto the nearest multiple of `cell_size`.
///
/// Positions past the midpoint of a cell round forward, everything else
/// rounds back, so the returned offset never exceeds half a cell.
pub fn snap_offset(axis: f32, cell_size: f32) -> f32 {
    if cell_size <= 0.0 {
        return 0.0;
    }
    let margin = axis.rem_euclid(cell_size);
    if margin == 0.0 {
        0.0
    } else if margin > cell_size / 2.0 {
        cell_size - margin
    } else {
        -margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rect::square(10.0, 10.0, 20.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(29.9, 29.9)));
        assert!(!rect.contains(Point::new(30.0, 15.0)));
        assert!(!rect.contains(Point::new(15.0, 30.0)));
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::square(0.0, 0.0, 50.0);
        let b = Rect::square(50.0, 0.0, 50.0);
        let c = Rect::square(49.0, 49.0, 50.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn test_snap_offset_lands_on_grid_within_half_cell() {
        let cell = 50.0;
        for raw in [0.0, 12.0, 24.0, 25.0, 26.0, 49.0, 51.0, 137.0, -12.0, -37.0] {
            let d = snap_offset(raw, cell);
            let snapped: f32 = raw + d;
            assert!(snapped.rem_euclid(cell).abs() < 1e-3, "raw {raw} snapped to {snapped}");
            assert!(d.abs() <= cell / 2.0, "raw {raw} moved by {d}");
        }
    }

    #[test]
    fn test_snap_offset_direction() {
        assert_eq!(snap_offset(130.0, 100.0), -30.0);
        assert_eq!(snap_offset(170.0, 100.0), 30.0);
        assert_eq!(snap_offset(150.0, 100.0), -50.0);
        assert_eq!(snap_offset(200.0, 100.0), 0.0);
    }

    #[test]
    fn test_inset_keeps_center() {
        let rect = Rect::square(0.0, 0.0, 10.0).inset(2.0);
        assert_eq!(rect, Rect::new(2.0, 2.0, 6.0, 6.0));
        assert_eq!(rect.center(), Point::new(5.0, 5.0));
    }
}
