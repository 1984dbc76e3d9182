use lyon::math::{point, Point};
use plankit_core::{Color, ItemId, LevelId, TextStyle};
use serde::{Deserialize, Serialize};

/// Measure drawn between two points, offset from the measured segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionLine {
    pub id: ItemId,
    pub x_start: f32,
    pub y_start: f32,
    pub x_end: f32,
    pub y_end: f32,
    pub offset: f32,
    pub elevation_start: f32,
    pub elevation_end: f32,
    pub pitch: f32,
    pub end_mark_size: f32,
    pub length_style: Option<TextStyle>,
    pub color: Option<Color>,
    pub level: Option<LevelId>,
}

impl DimensionLine {
    pub fn new(x_start: f32, y_start: f32, x_end: f32, y_end: f32, offset: f32) -> Self {
        Self {
            id: ItemId::new(),
            x_start,
            y_start,
            x_end,
            y_end,
            offset,
            elevation_start: 0.0,
            elevation_end: 0.0,
            pitch: 0.0,
            end_mark_size: 10.0,
            length_style: None,
            color: None,
            level: None,
        }
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

    /// Measured length, including the elevation difference.
    pub fn length(&self) -> f32 {
        let dx = self.x_end - self.x_start;
        let dy = self.y_end - self.y_start;
        let dz = self.elevation_end - self.elevation_start;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Whether the line measures a height at a single plan point.
    pub fn is_elevation_dimension_line(&self) -> bool {
        self.x_start == self.x_end
            && self.y_start == self.y_end
            && self.elevation_start != self.elevation_end
    }

    /// Angle of the measured segment in the plan.
    pub fn angle(&self) -> f32 {
        (self.y_end - self.y_start).atan2(self.x_end - self.x_start)
    }

    /// Corners of the area between the measured segment and the line:
    /// start, end, end shifted by the offset, start shifted by the offset.
    pub fn points(&self) -> [Point; 4] {
        let (sin, cos) = self.angle().sin_cos();
        let dx = -sin * self.offset;
        let dy = cos * self.offset;
        [
            self.start(),
            self.end(),
            point(self.x_end + dx, self.y_end + dy),
            point(self.x_start + dx, self.y_start + dy),
        ]
    }
}
