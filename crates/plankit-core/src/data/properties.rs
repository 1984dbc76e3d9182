use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ChangeReason, ItemKind};

/// Observable property of a plan item or level.
///
/// Property change events carry one of these; [`reason_for`] classifies it
/// into the [`ChangeReason`] the derived geometry cache understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemProperty {
    // Placement
    X,
    Y,
    XStart,
    YStart,
    XEnd,
    YEnd,
    Points,
    Angle,
    Offset,
    // Walls
    WallAtStart,
    WallAtEnd,
    Thickness,
    ArcExtent,
    Pattern,
    Height,
    HeightAtEnd,
    TopColor,
    // Size and orientation
    Width,
    Depth,
    Pitch,
    Roll,
    ModelMirrored,
    Diameter,
    NorthDirection,
    EndMarkSize,
    Yaw,
    FieldOfView,
    // Texts
    Name,
    NameStyle,
    NameXOffset,
    NameYOffset,
    NameAngle,
    Text,
    TextStyle,
    AreaStyle,
    AreaXOffset,
    AreaYOffset,
    AreaAngle,
    LengthStyle,
    // Appearance
    Color,
    OutlineColor,
    Texture,
    ModelMaterials,
    Shininess,
    Model,
    PlanIcon,
    FloorColor,
    FloorTexture,
    CapStyle,
    JoinStyle,
    DashStyle,
    StartArrowStyle,
    EndArrowStyle,
    ClosedPath,
    Power,
    BackgroundImage,
    // Visibility
    Visible,
    Viewable,
    NameVisible,
    AreaVisible,
    FloorVisible,
    CeilingVisible,
    // Level membership
    Level,
    Elevation,
    ElevationIndex,
    // Doors and windows
    WallCutOut,
    BoundToWall,
}

impl fmt::Display for ItemProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug output of a fieldless enum is its variant name.
        write!(f, "{:?}", self)
    }
}

/// Classify an item property change.
///
/// Wall height drives other-level ghosting, so it is a level membership
/// change for walls while it stays a geometry change for every other kind.
pub fn reason_for(kind: ItemKind, property: ItemProperty) -> ChangeReason {
    use ItemProperty::*;
    match property {
        Visible | Viewable | NameVisible | AreaVisible | FloorVisible | CeilingVisible => {
            ChangeReason::Visibility
        }
        Level | Elevation | ElevationIndex => ChangeReason::LevelMembership,
        Height | HeightAtEnd if kind == ItemKind::Wall => ChangeReason::LevelMembership,
        Pattern | TopColor | NameStyle | TextStyle | AreaStyle | LengthStyle | Color
        | OutlineColor | Texture | ModelMaterials | Shininess | Model | PlanIcon | FloorColor
        | FloorTexture | CapStyle | JoinStyle | DashStyle | StartArrowStyle | EndArrowStyle
        | Power | BackgroundImage => ChangeReason::Style,
        _ => ChangeReason::Geometry,
    }
}

/// Classify a level property change.
pub fn level_reason(property: ItemProperty) -> ChangeReason {
    match property {
        ItemProperty::Visible | ItemProperty::Viewable => ChangeReason::Visibility,
        ItemProperty::BackgroundImage => ChangeReason::Style,
        _ => ChangeReason::LevelMembership,
    }
}

/// User preference observed by the plan component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKey {
    LengthUnit,
    GridVisible,
    DefaultFontName,
    FurnitureViewedFromTop,
    FurnitureModelIconSize,
    RoomFloorColoredOrTextured,
    WallPattern,
    NewWallPattern,
    SelectionColor,
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Classify a preference change.
///
/// Unit and font changes move text bounds; the rest only restyle.
pub fn preference_reason(key: PreferenceKey) -> ChangeReason {
    match key {
        PreferenceKey::LengthUnit | PreferenceKey::DefaultFontName => ChangeReason::Geometry,
        _ => ChangeReason::Style,
    }
}
