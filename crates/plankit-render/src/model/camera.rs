use lyon::math::Point;
use plankit_core::ItemId;
use serde::{Deserialize, Serialize};

use crate::geometry::shapes::rotated_rect_points;

/// Virtual visitor camera shown in the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: ItemId,
    pub x: f32,
    pub y: f32,
    /// Eye elevation.
    pub z: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub field_of_view: f32,
    pub width: f32,
    pub depth: f32,
    /// Scale of the visitor, above 1 a camera glyph replaces the human one.
    pub plan_scale: f32,
    /// Whether the 3D view currently looks through this camera, the plan
    /// only draws it then.
    pub active: bool,
}

impl Camera {
    pub fn observer(x: f32, y: f32, z: f32) -> Self {
        Self {
            id: ItemId::new(),
            x,
            y,
            z,
            yaw: 7.0 * std::f32::consts::FRAC_PI_4,
            pitch: std::f32::consts::PI / 16.0,
            field_of_view: 63f32.to_radians(),
            width: 46.6,
            depth: 18.6,
            plan_scale: 1.0,
            active: false,
        }
    }

    /// Corners of the visitor footprint rotated by its yaw.
    pub fn points(&self) -> [Point; 4] {
        rotated_rect_points(self.x, self.y, self.width, self.depth, self.yaw)
    }
}
