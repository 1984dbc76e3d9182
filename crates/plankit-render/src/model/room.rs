use lyon::math::Point;
use plankit_core::{Color, ItemId, LevelId, TextStyle};
use serde::{Deserialize, Serialize};

use super::texture::HomeTexture;
use crate::geometry::{signed_area, Rect};

/// Room polygon with its name and area texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: ItemId,
    pub name: Option<String>,
    pub points: Vec<Point>,
    pub name_x_offset: f32,
    pub name_y_offset: f32,
    pub name_angle: f32,
    pub name_style: Option<TextStyle>,
    pub area_visible: bool,
    pub area_x_offset: f32,
    pub area_y_offset: f32,
    pub area_angle: f32,
    pub area_style: Option<TextStyle>,
    pub floor_visible: bool,
    pub ceiling_visible: bool,
    pub floor_color: Option<Color>,
    pub floor_texture: Option<HomeTexture>,
    pub level: Option<LevelId>,
}

impl Room {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            id: ItemId::new(),
            name: None,
            points,
            name_x_offset: 0.0,
            name_y_offset: 0.0,
            name_angle: 0.0,
            name_style: None,
            area_visible: true,
            area_x_offset: 0.0,
            area_y_offset: 0.0,
            area_angle: 0.0,
            area_style: None,
            floor_visible: true,
            ceiling_visible: true,
            floor_color: None,
            floor_texture: None,
            level: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_level(mut self, level: LevelId) -> Self {
        self.level = Some(level);
        self
    }

    /// Surface in square centimeters.
    pub fn area(&self) -> f32 {
        signed_area(&self.points).abs()
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(&self.points)
    }

    /// Center of the room bounding box, anchor of its texts.
    pub fn center(&self) -> Point {
        self.bounds()
            .map(|b| b.center())
            .unwrap_or_else(|| lyon::math::point(0.0, 0.0))
    }

    /// Whether the points turn clockwise on screen.
    pub fn is_clockwise(&self) -> bool {
        signed_area(&self.points) > 0.0
    }

    /// Name to paint, `None` when blank.
    pub fn visible_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::math::point;

    #[test]
    fn test_area_and_center() {
        let room = Room::new(vec![
            point(0.0, 0.0),
            point(400.0, 0.0),
            point(400.0, 300.0),
            point(0.0, 300.0),
        ]);
        assert!((room.area() - 120_000.0).abs() < 0.5);
        assert_eq!(room.center(), point(200.0, 150.0));
        assert!(room.is_clockwise());
    }

    #[test]
    fn test_blank_name_is_hidden() {
        let room = Room::new(vec![]).with_name("  ");
        assert_eq!(room.visible_name(), None);
        assert_eq!(room.center(), point(0.0, 0.0));
    }
}
