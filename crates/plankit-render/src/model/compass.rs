use lyon::math::Point;
use plankit_core::ItemId;
use serde::{Deserialize, Serialize};

use crate::geometry::shapes::rotated_rect_points;

/// Compass rose showing the north direction of the home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compass {
    pub id: ItemId,
    pub x: f32,
    pub y: f32,
    pub diameter: f32,
    /// North direction in radians, clockwise from the top of the plan.
    pub north_direction: f32,
    pub visible: bool,
}

impl Compass {
    pub fn new(x: f32, y: f32, diameter: f32) -> Self {
        Self {
            id: ItemId::new(),
            x,
            y,
            diameter,
            north_direction: 0.0,
            visible: true,
        }
    }

    /// Corners of the square enclosing the rose.
    pub fn points(&self) -> [Point; 4] {
        rotated_rect_points(
            self.x,
            self.y,
            self.diameter,
            self.diameter,
            self.north_direction,
        )
    }
}

impl Default for Compass {
    fn default() -> Self {
        Self::new(-100.0, 50.0, 100.0)
    }
}
