use lyon::math::{point, vector, Point};
use plankit_core::{Color, ItemId, LevelId, WallPattern};
use serde::{Deserialize, Serialize};

/// Wall height used when a wall has none.
pub const DEFAULT_WALL_HEIGHT: f32 = 250.0;

const ARC_STEP: f32 = std::f32::consts::PI / 36.0;

/// Straight or curved wall segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: ItemId,
    pub x_start: f32,
    pub y_start: f32,
    pub x_end: f32,
    pub y_end: f32,
    pub wall_at_start: Option<ItemId>,
    pub wall_at_end: Option<ItemId>,
    pub thickness: f32,
    /// Signed angle of the arc in radians, `None` for a straight wall.
    pub arc_extent: Option<f32>,
    pub pattern: Option<WallPattern>,
    pub height: Option<f32>,
    pub height_at_end: Option<f32>,
    pub top_color: Option<Color>,
    pub level: Option<LevelId>,
}

impl Wall {
    pub fn new(x_start: f32, y_start: f32, x_end: f32, y_end: f32, thickness: f32) -> Self {
        Self {
            id: ItemId::new(),
            x_start,
            y_start,
            x_end,
            y_end,
            wall_at_start: None,
            wall_at_end: None,
            thickness,
            arc_extent: None,
            pattern: None,
            height: None,
            height_at_end: None,
            top_color: None,
            level: None,
        }
    }

    pub fn with_pattern(mut self, pattern: WallPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_arc_extent(mut self, arc_extent: f32) -> Self {
        self.arc_extent = Some(arc_extent);
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn on_level(mut self, level: LevelId) -> Self {
        self.level = Some(level);
        self
    }

    pub fn start(&self) -> Point {
        point(self.x_start, self.y_start)
    }

    pub fn end(&self) -> Point {
        point(self.x_end, self.y_end)
    }

    pub fn length(&self) -> f32 {
        (self.end() - self.start()).length()
    }

    /// Direction angle from start to end, in radians.
    pub fn angle(&self) -> f32 {
        (self.y_end - self.y_start).atan2(self.x_end - self.x_start)
    }

    pub fn is_arc(&self) -> bool {
        self.arc_extent.is_some_and(|extent| extent.abs() > 1e-4)
    }

    /// Highest point of the wall top.
    pub fn maximum_height(&self) -> f32 {
        let height = self.height.unwrap_or(DEFAULT_WALL_HEIGHT);
        self.height_at_end.map_or(height, |end| height.max(end))
    }

    /// Outline of the wall alone, left side from start to end then right
    /// side back to start.
    pub fn points(&self) -> Vec<Point> {
        if self.is_arc() {
            self.arc_points()
        } else {
            self.rectangle().to_vec()
        }
    }

    /// Outline of the wall with its ends mitered against the walls joined
    /// to it.
    ///
    /// Only straight walls joined both ways are mitered; a miter point
    /// farther than twice the thickness from the square corner is dropped.
    pub fn joined_points(&self, at_start: Option<&Wall>, at_end: Option<&Wall>) -> Vec<Point> {
        if self.is_arc() {
            return self.arc_points();
        }
        let mut points = self.rectangle();
        let limit = 2.0 * self.thickness;
        if let Some(other) = at_start.filter(|w| !w.is_arc()) {
            let others = other.rectangle();
            if other.wall_at_end == Some(self.id) {
                points[0] = intersection(points[0], points[1], others[1], others[0], limit);
                points[3] = intersection(points[3], points[2], others[2], others[3], limit);
            } else if other.wall_at_start == Some(self.id) {
                points[0] = intersection(points[0], points[1], others[2], others[3], limit);
                points[3] = intersection(points[3], points[2], others[0], others[1], limit);
            }
        }
        if let Some(other) = at_end.filter(|w| !w.is_arc()) {
            let others = other.rectangle();
            if other.wall_at_start == Some(self.id) {
                points[1] = intersection(points[1], points[0], others[0], others[1], limit);
                points[2] = intersection(points[2], points[3], others[3], others[2], limit);
            } else if other.wall_at_end == Some(self.id) {
                points[1] = intersection(points[1], points[0], others[3], others[2], limit);
                points[2] = intersection(points[2], points[3], others[0], others[1], limit);
            }
        }
        points.to_vec()
    }

    fn rectangle(&self) -> [Point; 4] {
        let (sin, cos) = self.angle().sin_cos();
        let offset = vector(sin, -cos) * (self.thickness / 2.0);
        let (start, end) = (self.start(), self.end());
        [start + offset, end + offset, end - offset, start - offset]
    }

    /// Center of the circle the arc wall follows.
    pub fn arc_center(&self) -> Option<Point> {
        let extent = self.arc_extent.filter(|_| self.is_arc())?;
        let length = self.length();
        if length == 0.0 {
            return None;
        }
        let (sin, cos) = self.angle().sin_cos();
        let left = vector(sin, -cos);
        let middle = self.start().lerp(self.end(), 0.5);
        let offset = (length / 2.0) / (extent / 2.0).tan();
        Some(middle - left * offset)
    }

    fn arc_points(&self) -> Vec<Point> {
        let (Some(center), Some(extent)) = (self.arc_center(), self.arc_extent) else {
            return self.rectangle().to_vec();
        };
        let radius = (self.start() - center).length();
        let start_angle = (self.y_start - center.y).atan2(self.x_start - center.x);
        // Growing angles turn left in y-down space, so the left side is the
        // outer one for positive extents.
        let side = extent.signum();
        let left_radius = radius + side * self.thickness / 2.0;
        let right_radius = radius - side * self.thickness / 2.0;

        let steps = ((extent.abs() / ARC_STEP).ceil() as usize).max(4);
        let angles: Vec<f32> = (0..=steps)
            .map(|i| start_angle + extent * i as f32 / steps as f32)
            .collect();
        let on_circle = |angle: f32, r: f32| point(center.x + r * angle.cos(), center.y + r * angle.sin());
        let mut points: Vec<Point> = angles.iter().map(|a| on_circle(*a, left_radius)).collect();
        points.extend(angles.iter().rev().map(|a| on_circle(*a, right_radius)));
        points
    }
}

/// Intersection of the line `p1 p2` with the line `p3 p4`, or `p1` when the
/// lines are parallel or the intersection is farther than `limit`.
fn intersection(p1: Point, p2: Point, p3: Point, p4: Point, limit: f32) -> Point {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denominator = d1.cross(d2);
    if denominator.abs() < 1e-6 {
        return p1;
    }
    let t = (p3 - p1).cross(d2) / denominator;
    let candidate = p1 + d1 * t;
    if (candidate - p1).square_length() < limit * limit {
        candidate
    } else {
        p1
    }
}
