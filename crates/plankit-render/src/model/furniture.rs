use lyon::math::{point, Point};
use plankit_core::{Color, ItemId, LevelId, TextStyle};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::level::Level;
use super::texture::{HomeTexture, ImageRef, ModelRef};
use super::wall::Wall;
use crate::geometry::{shapes::rotated_rect_points, Rect};

/// Size of horizontally rotated pieces as projected in the plan.
///
/// Pieces with a pitch or a roll have a plan footprint that only a 3D
/// engine can compute; the host plugs one in through this trait.
pub trait FurnitureSizeOracle: Send + Sync {
    /// Width, depth and height of the piece bounding box once rotated.
    fn size_in_plan(&self, piece: &Furniture) -> Option<[f32; 3]>;
}

/// Material override of a furniture model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureMaterial {
    pub name: String,
    pub color: Option<Color>,
    pub texture: Option<HomeTexture>,
    pub shininess: Option<f32>,
}

/// Named deformation of a furniture model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureTransformation {
    pub name: String,
    pub matrix: [[f32; 4]; 3],
}

/// Opening part of a door or window.
///
/// Axis and width are ratios of the piece width (x and width) or depth (y).
/// Angles are in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sash {
    pub x_axis: f32,
    pub y_axis: f32,
    pub width: f32,
    pub start_angle: f32,
    pub end_angle: f32,
}

/// Door or window properties.
///
/// Wall values are ratios: thickness and distance of the piece depth, left
/// and width of the piece width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorOrWindow {
    pub wall_thickness: f32,
    pub wall_distance: f32,
    pub wall_left: f32,
    pub wall_width: f32,
    pub wall_cut_out_on_both_sides: bool,
    pub bound_to_wall: bool,
    /// Horizontal extent `(left, width)` of the cut-out shape, as ratios of
    /// the wall part width. `None` for a rectangular cut-out.
    #[serde(default)]
    pub cut_out_extent: Option<(f32, f32)>,
    pub sashes: Vec<Sash>,
}

impl Default for DoorOrWindow {
    fn default() -> Self {
        Self {
            wall_thickness: 1.0,
            wall_distance: 0.0,
            wall_left: 0.0,
            wall_width: 1.0,
            wall_cut_out_on_both_sides: false,
            bound_to_wall: true,
            cut_out_extent: None,
            sashes: Vec::new(),
        }
    }
}

/// What a piece of furniture is beyond its box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FurnitureKind {
    Piece,
    DoorOrWindow(DoorOrWindow),
    Light { power: f32 },
    Group { children: Vec<Furniture> },
}

/// Piece of furniture, door, window, light or group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Furniture {
    pub id: ItemId,
    pub kind: FurnitureKind,
    pub name: Option<String>,
    pub name_visible: bool,
    pub name_x_offset: f32,
    pub name_y_offset: f32,
    pub name_angle: f32,
    pub name_style: Option<TextStyle>,
    /// Center of the piece.
    pub x: f32,
    pub y: f32,
    pub elevation: f32,
    /// Rotation around the vertical axis, in radians.
    pub angle: f32,
    pub pitch: f32,
    pub roll: f32,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub model_mirrored: bool,
    pub visible: bool,
    pub color: Option<Color>,
    pub texture: Option<HomeTexture>,
    pub model_materials: Option<Vec<FurnitureMaterial>>,
    pub shininess: Option<f32>,
    pub model: Option<ModelRef>,
    pub plan_icon: Option<ImageRef>,
    pub icon: Option<ImageRef>,
    pub model_rotation: [[f32; 3]; 3],
    pub model_transformations: Option<Vec<FurnitureTransformation>>,
    pub model_centered_at_origin: bool,
    pub back_face_shown: bool,
    pub resizable: bool,
    pub level: Option<LevelId>,
    /// Footprint of the piece when pitched or rolled.
    #[serde(default)]
    pub plan_size: Option<[f32; 3]>,
}

const IDENTITY_ROTATION: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

impl Furniture {
    pub fn new(name: impl Into<String>, x: f32, y: f32, width: f32, depth: f32, height: f32) -> Self {
        Self {
            id: ItemId::new(),
            kind: FurnitureKind::Piece,
            name: Some(name.into()),
            name_visible: false,
            name_x_offset: 0.0,
            name_y_offset: 0.0,
            name_angle: 0.0,
            name_style: None,
            x,
            y,
            elevation: 0.0,
            angle: 0.0,
            pitch: 0.0,
            roll: 0.0,
            width,
            depth,
            height,
            model_mirrored: false,
            visible: true,
            color: None,
            texture: None,
            model_materials: None,
            shininess: None,
            model: None,
            plan_icon: None,
            icon: None,
            model_rotation: IDENTITY_ROTATION,
            model_transformations: None,
            model_centered_at_origin: true,
            back_face_shown: false,
            resizable: true,
            level: None,
            plan_size: None,
        }
    }

    pub fn door_or_window(
        name: impl Into<String>,
        x: f32,
        y: f32,
        width: f32,
        depth: f32,
        height: f32,
        door_or_window: DoorOrWindow,
    ) -> Self {
        Self {
            kind: FurnitureKind::DoorOrWindow(door_or_window),
            ..Self::new(name, x, y, width, depth, height)
        }
    }

    pub fn light(name: impl Into<String>, x: f32, y: f32, size: f32, power: f32) -> Self {
        Self {
            kind: FurnitureKind::Light { power },
            ..Self::new(name, x, y, size, size, size)
        }
    }

    /// Group sized to the bounding box of its children.
    pub fn group(name: impl Into<String>, children: Vec<Furniture>) -> Self {
        let bounds = children
            .iter()
            .filter_map(|child| Rect::from_points(&child.points()))
            .reduce(|a, b| a.union(&b))
            .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
        let elevation = children
            .iter()
            .map(|c| c.elevation)
            .fold(f32::INFINITY, f32::min);
        let elevation = if elevation.is_finite() { elevation } else { 0.0 };
        let top = children
            .iter()
            .map(|c| c.elevation + c.height_in_plan())
            .fold(elevation, f32::max);
        let center = bounds.center();
        let mut group = Self::new(name, center.x, center.y, bounds.width, bounds.height, top - elevation);
        group.elevation = elevation;
        group.kind = FurnitureKind::Group { children };
        group
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_model(mut self, model: ModelRef) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn on_level(mut self, level: LevelId) -> Self {
        self.level = Some(level);
        self
    }

    pub fn is_door_or_window(&self) -> bool {
        matches!(self.kind, FurnitureKind::DoorOrWindow(_))
    }

    pub fn door_or_window_properties(&self) -> Option<&DoorOrWindow> {
        match &self.kind {
            FurnitureKind::DoorOrWindow(properties) => Some(properties),
            _ => None,
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(self.kind, FurnitureKind::Light { .. })
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, FurnitureKind::Group { .. })
    }

    /// Children of a group, empty for other pieces.
    pub fn children(&self) -> &[Furniture] {
        match &self.kind {
            FurnitureKind::Group { children } => children,
            _ => &[],
        }
    }

    pub fn is_horizontally_rotated(&self) -> bool {
        self.pitch != 0.0 || self.roll != 0.0
    }

    pub fn width_in_plan(&self) -> f32 {
        self.plan_dimension(0, self.width)
    }

    pub fn depth_in_plan(&self) -> f32 {
        self.plan_dimension(1, self.depth)
    }

    pub fn height_in_plan(&self) -> f32 {
        self.plan_dimension(2, self.height)
    }

    fn plan_dimension(&self, index: usize, default: f32) -> f32 {
        match self.plan_size {
            Some(size) if self.is_horizontally_rotated() => size[index],
            _ => default,
        }
    }

    /// Corners of the footprint, clockwise from the back left one.
    pub fn points(&self) -> [Point; 4] {
        rotated_rect_points(
            self.x,
            self.y,
            self.width_in_plan(),
            self.depth_in_plan(),
            self.angle,
        )
    }

    pub fn center(&self) -> Point {
        point(self.x, self.y)
    }

    /// Elevation of the piece bottom from the ground.
    pub fn ground_elevation(&self, level: Option<&Level>) -> f32 {
        self.elevation + level.map_or(0.0, |l| l.elevation)
    }

    /// Whether the piece is oriented along a straight wall.
    pub fn is_parallel_to_wall(&self, wall: &Wall) -> bool {
        if wall.is_arc() || wall.length() == 0.0 {
            return false;
        }
        let difference = (wall.angle() - self.angle).rem_euclid(PI);
        difference < 1e-3 || PI - difference < 1e-3
    }

    pub fn visible_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty() && self.name_visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_follow_angle() {
        let piece = Furniture::new("Table", 100.0, 100.0, 80.0, 40.0, 70.0);
        let points = piece.points();
        assert_eq!(points[0], point(60.0, 80.0));
        assert_eq!(points[2], point(140.0, 120.0));
    }

    #[test]
    fn test_plan_size_only_when_rotated() {
        let mut piece = Furniture::new("Box", 0.0, 0.0, 10.0, 20.0, 30.0);
        piece.plan_size = Some([12.0, 22.0, 32.0]);
        assert_eq!(piece.width_in_plan(), 10.0);
        piece.pitch = 0.3;
        assert_eq!(piece.width_in_plan(), 12.0);
        assert_eq!(piece.height_in_plan(), 32.0);
    }

    #[test]
    fn test_group_bounds() {
        let group = Furniture::group(
            "Set",
            vec![
                Furniture::new("A", 0.0, 0.0, 20.0, 20.0, 50.0),
                Furniture::new("B", 100.0, 0.0, 20.0, 20.0, 80.0),
            ],
        );
        assert_eq!(group.x, 50.0);
        assert_eq!(group.width, 120.0);
        assert_eq!(group.depth, 20.0);
        assert_eq!(group.height, 80.0);
        assert_eq!(group.children().len(), 2);
    }

    #[test]
    fn test_parallel_to_wall() {
        let wall = Wall::new(0.0, 0.0, 0.0, 100.0, 10.0);
        let door = Furniture::new("Door", 0.0, 50.0, 80.0, 10.0, 200.0).with_angle(-PI / 2.0);
        assert!(door.is_parallel_to_wall(&wall));
        assert!(!door.with_angle(0.3).is_parallel_to_wall(&wall));
    }
}
