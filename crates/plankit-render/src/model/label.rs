use lyon::math::{point, Point};
use plankit_core::{Color, ItemId, LevelId, TextStyle};
use serde::{Deserialize, Serialize};

/// Free text anchored at a point of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: ItemId,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub style: Option<TextStyle>,
    pub color: Option<Color>,
    pub outline_color: Option<Color>,
    /// Pitch in the 3D view, `None` when the label is plan only.
    pub pitch: Option<f32>,
    pub elevation: f32,
    pub level: Option<LevelId>,
}

impl Label {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: ItemId::new(),
            text: text.into(),
            x,
            y,
            angle: 0.0,
            style: None,
            color: None,
            outline_color: None,
            pitch: None,
            elevation: 0.0,
            level: None,
        }
    }

    pub fn on_level(mut self, level: LevelId) -> Self {
        self.level = Some(level);
        self
    }

    pub fn location(&self) -> Point {
        point(self.x, self.y)
    }
}
