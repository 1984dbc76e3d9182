use lyon::math::{point, Box2D, Point};
use serde::{Deserialize, Serialize};

/// Axis aligned rectangle in model or pixel units.
///
/// Empty rectangles (zero width or height) still take part in unions, so a
/// bounds accumulator can start from a single point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero sized rectangle at a point.
    pub fn at(p: Point) -> Self {
        Self::new(p.x, p.y, 0.0, 0.0)
    }

    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn from_box(bb: Box2D) -> Self {
        Self::from_ltrb(bb.min.x, bb.min.y, bb.max.x, bb.max.y)
    }

    /// Smallest rectangle containing every point, `None` without points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Self::at(*first);
        for p in iter {
            rect.add_point(p.x, p.y);
        }
        Some(rect)
    }

    pub fn min_x(&self) -> f32 {
        self.x
    }

    pub fn min_y(&self) -> f32 {
        self.y
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        point(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Grow to include `(x, y)`.
    pub fn add_point(&mut self, x: f32, y: f32) {
        let left = self.x.min(x);
        let top = self.y.min(y);
        let right = self.max_x().max(x);
        let bottom = self.max_y().max(y);
        *self = Self::from_ltrb(left, top, right, bottom);
    }

    /// Grow to include another rectangle.
    pub fn add_rect(&mut self, other: &Rect) {
        self.add_point(other.min_x(), other.min_y());
        self.add_point(other.max_x(), other.max_y());
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let mut rect = *self;
        rect.add_rect(other);
        rect
    }

    /// Rectangle grown by `dx` on the left and right and `dy` above and below.
    pub fn inflate(&self, dx: f32, dy: f32) -> Rect {
        Self::new(
            self.x - dx,
            self.y - dy,
            self.width + 2.0 * dx,
            self.height + 2.0 * dy,
        )
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min_x() && x <= self.max_x() && y >= self.min_y() && y <= self.max_y()
    }

    /// Whether the interiors overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }

    /// The four corners, clockwise from the top left one.
    pub fn corners(&self) -> [Point; 4] {
        [
            point(self.min_x(), self.min_y()),
            point(self.max_x(), self.min_y()),
            point(self.max_x(), self.max_y()),
            point(self.min_x(), self.max_y()),
        ]
    }

    pub fn to_box(&self) -> Box2D {
        Box2D::new(
            point(self.min_x(), self.min_y()),
            point(self.max_x(), self.max_y()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_point_grows_both_ways() {
        let mut rect = Rect::at(point(10.0, 10.0));
        rect.add_point(-5.0, 20.0);
        assert_eq!(rect, Rect::new(-5.0, 10.0, 15.0, 10.0));
        assert!(rect.contains(0.0, 15.0));
    }

    #[test]
    fn test_from_points() {
        let points = [point(1.0, 2.0), point(4.0, -1.0), point(2.0, 6.0)];
        let rect = Rect::from_points(&points).expect("points");
        assert_eq!(rect, Rect::from_ltrb(1.0, -1.0, 4.0, 6.0));
        assert!(Rect::from_points(&[]).is_none());
    }

    #[test]
    fn test_intersects_excludes_touching() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    }
}
