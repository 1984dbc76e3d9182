//! Identifiers and vocabularies shared by the model, the event bus and the
//! derived geometry cache.

mod ids;
mod properties;

pub use ids::{ItemId, LevelId};
pub use properties::{level_reason, preference_reason, reason_for, ItemProperty, PreferenceKey};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of plan item kinds.
///
/// Every drawable entity of a home is one of these; indicator lookup and
/// invalidation tables are keyed by this tag instead of runtime type tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A wall segment, straight or curved.
    Wall,
    /// A room polygon.
    Room,
    /// A piece of furniture, door, window, light or group.
    Furniture,
    /// A dimension line.
    DimensionLine,
    /// A free text label.
    Label,
    /// A free polyline.
    Polyline,
    /// The compass rose.
    Compass,
    /// The observer camera.
    Camera,
}

impl ItemKind {
    /// All kinds, in paint order of their main layer.
    pub const ALL: [ItemKind; 8] = [
        ItemKind::Compass,
        ItemKind::Room,
        ItemKind::Wall,
        ItemKind::Furniture,
        ItemKind::Polyline,
        ItemKind::DimensionLine,
        ItemKind::Label,
        ItemKind::Camera,
    ];
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Wall => write!(f, "wall"),
            ItemKind::Room => write!(f, "room"),
            ItemKind::Furniture => write!(f, "furniture"),
            ItemKind::DimensionLine => write!(f, "dimension line"),
            ItemKind::Label => write!(f, "label"),
            ItemKind::Polyline => write!(f, "polyline"),
            ItemKind::Compass => write!(f, "compass"),
            ItemKind::Camera => write!(f, "camera"),
        }
    }
}

/// Why a derived artifact became stale.
///
/// The derived geometry cache clears entries by reason, so the mapping from
/// property names to reasons is the only per-kind knowledge it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    /// Shape, position or size changed.
    Geometry,
    /// Color, texture, pattern or text style changed.
    Style,
    /// Item or part of it was shown or hidden.
    Visibility,
    /// Item moved to another level, or a level moved.
    LevelMembership,
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeReason::Geometry => write!(f, "geometry"),
            ChangeReason::Style => write!(f, "style"),
            ChangeReason::Visibility => write!(f, "visibility"),
            ChangeReason::LevelMembership => write!(f, "levelMembership"),
        }
    }
}
