//! Plan entities and the home document holding them.
//!
//! Entities are plain data; derived shapes that depend on other entities,
//! such as mitered wall outlines, are computed by [`Home`].

mod camera;
mod compass;
mod dimension_line;
mod furniture;
mod home;
mod label;
mod level;
mod polyline;
mod room;
mod texture;
mod wall;

pub use camera::Camera;
pub use compass::Compass;
pub use dimension_line::DimensionLine;
pub use furniture::{
    DoorOrWindow, Furniture, FurnitureKind, FurnitureMaterial, FurnitureSizeOracle,
    FurnitureTransformation, Sash,
};
pub use home::Home;
pub use label::Label;
pub use level::{BackgroundImage, Level};
pub use polyline::{ArrowStyle, CapStyle, DashStyle, JoinStyle, Polyline};
pub use room::Room;
pub use texture::{HomeTexture, ImageRef, ModelRef};
pub use wall::{Wall, DEFAULT_WALL_HEIGHT};

use lyon::math::Point;
use plankit_core::{ItemId, ItemKind, LevelId};
use serde::{Deserialize, Serialize};

/// Any item drawn in the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanItem {
    Wall(Wall),
    Room(Room),
    Furniture(Furniture),
    DimensionLine(DimensionLine),
    Label(Label),
    Polyline(Polyline),
    Compass(Compass),
    Camera(Camera),
}

macro_rules! item_accessors {
    ($($variant:ident => $as_ref:ident, $as_mut:ident;)*) => {
        $(
            pub fn $as_ref(&self) -> Option<&$variant> {
                match self {
                    PlanItem::$variant(item) => Some(item),
                    _ => None,
                }
            }

            pub fn $as_mut(&mut self) -> Option<&mut $variant> {
                match self {
                    PlanItem::$variant(item) => Some(item),
                    _ => None,
                }
            }
        )*
    };
}

macro_rules! item_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for PlanItem {
                fn from(item: $variant) -> Self {
                    PlanItem::$variant(item)
                }
            }
        )*
    };
}

item_from!(Wall, Room, Furniture, DimensionLine, Label, Polyline, Compass, Camera);

impl PlanItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            PlanItem::Wall(_) => ItemKind::Wall,
            PlanItem::Room(_) => ItemKind::Room,
            PlanItem::Furniture(_) => ItemKind::Furniture,
            PlanItem::DimensionLine(_) => ItemKind::DimensionLine,
            PlanItem::Label(_) => ItemKind::Label,
            PlanItem::Polyline(_) => ItemKind::Polyline,
            PlanItem::Compass(_) => ItemKind::Compass,
            PlanItem::Camera(_) => ItemKind::Camera,
        }
    }

    pub fn id(&self) -> ItemId {
        match self {
            PlanItem::Wall(item) => item.id,
            PlanItem::Room(item) => item.id,
            PlanItem::Furniture(item) => item.id,
            PlanItem::DimensionLine(item) => item.id,
            PlanItem::Label(item) => item.id,
            PlanItem::Polyline(item) => item.id,
            PlanItem::Compass(item) => item.id,
            PlanItem::Camera(item) => item.id,
        }
    }

    /// Level of the item; compass and camera belong to the whole home.
    pub fn level(&self) -> Option<LevelId> {
        match self {
            PlanItem::Wall(item) => item.level,
            PlanItem::Room(item) => item.level,
            PlanItem::Furniture(item) => item.level,
            PlanItem::DimensionLine(item) => item.level,
            PlanItem::Label(item) => item.level,
            PlanItem::Polyline(item) => item.level,
            PlanItem::Compass(_) | PlanItem::Camera(_) => None,
        }
    }

    pub fn set_level(&mut self, level: Option<LevelId>) {
        match self {
            PlanItem::Wall(item) => item.level = level,
            PlanItem::Room(item) => item.level = level,
            PlanItem::Furniture(item) => item.level = level,
            PlanItem::DimensionLine(item) => item.level = level,
            PlanItem::Label(item) => item.level = level,
            PlanItem::Polyline(item) => item.level = level,
            PlanItem::Compass(_) | PlanItem::Camera(_) => {}
        }
    }

    /// Characteristic points of the item, as used by selection outlines
    /// and alignment. Walls give their outline without joins.
    pub fn points(&self) -> Vec<Point> {
        match self {
            PlanItem::Wall(wall) => wall.points(),
            PlanItem::Room(room) => room.points.clone(),
            PlanItem::Furniture(piece) => piece.points().to_vec(),
            PlanItem::DimensionLine(line) => line.points().to_vec(),
            PlanItem::Label(label) => vec![label.location()],
            PlanItem::Polyline(polyline) => polyline.points.clone(),
            PlanItem::Compass(compass) => compass.points().to_vec(),
            PlanItem::Camera(camera) => camera.points().to_vec(),
        }
    }

    item_accessors! {
        Wall => as_wall, as_wall_mut;
        Room => as_room, as_room_mut;
        Furniture => as_furniture, as_furniture_mut;
        DimensionLine => as_dimension_line, as_dimension_line_mut;
        Label => as_label, as_label_mut;
        Polyline => as_polyline, as_polyline_mut;
        Compass => as_compass, as_compass_mut;
        Camera => as_camera, as_camera_mut;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_accessors() {
        let wall = Wall::new(0.0, 0.0, 100.0, 0.0, 10.0);
        let id = wall.id;
        let item = PlanItem::from(wall);
        assert_eq!(item.kind(), ItemKind::Wall);
        assert_eq!(item.id(), id);
        assert!(item.as_wall().is_some());
        assert!(item.as_room().is_none());
        assert_eq!(item.points().len(), 4);
    }

    #[test]
    fn test_compass_has_no_level() {
        let mut item = PlanItem::from(Compass::default());
        item.set_level(Some(LevelId::new()));
        assert_eq!(item.level(), None);
    }
}
