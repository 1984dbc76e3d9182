use lyon::math::Point;
use plankit_core::{Color, ItemId, LevelId};
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapStyle {
    #[default]
    Butt,
    Square,
    Round,
}

/// Join of polyline segments. `Curved` draws quadratic curves through the
/// middle of each segment instead of corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinStyle {
    Bevel,
    #[default]
    Miter,
    Round,
    Curved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashStyle {
    #[default]
    Solid,
    Dot,
    Dash,
    DashDot,
    DashDotDot,
    Custom,
}

impl DashStyle {
    /// Dash lengths as multiples of the line thickness.
    pub fn pattern(&self) -> Option<&'static [f32]> {
        match self {
            DashStyle::Solid | DashStyle::Custom => None,
            DashStyle::Dot => Some(&[1.0, 1.0]),
            DashStyle::Dash => Some(&[4.0, 2.0]),
            DashStyle::DashDot => Some(&[8.0, 2.0, 2.0, 2.0]),
            DashStyle::DashDotDot => Some(&[8.0, 2.0, 2.0, 2.0, 2.0, 2.0]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowStyle {
    #[default]
    None,
    Delta,
    Open,
    Disc,
}

/// Free line through points, open or closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub id: ItemId,
    pub points: Vec<Point>,
    pub thickness: f32,
    pub cap_style: CapStyle,
    pub join_style: JoinStyle,
    pub dash_style: DashStyle,
    /// Custom dash lengths, in thickness multiples.
    pub dash_pattern: Option<Vec<f32>>,
    pub dash_offset: f32,
    pub start_arrow_style: ArrowStyle,
    pub end_arrow_style: ArrowStyle,
    pub closed_path: bool,
    pub color: Color,
    pub level: Option<LevelId>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            id: ItemId::new(),
            points,
            thickness: 1.0,
            cap_style: CapStyle::Butt,
            join_style: JoinStyle::Miter,
            dash_style: DashStyle::Solid,
            dash_pattern: None,
            dash_offset: 0.0,
            start_arrow_style: ArrowStyle::None,
            end_arrow_style: ArrowStyle::None,
            closed_path: false,
            color: Color::BLACK,
            level: None,
        }
    }

    pub fn on_level(mut self, level: LevelId) -> Self {
        self.level = Some(level);
        self
    }

    /// Effective dash lengths in thickness multiples, `None` when solid.
    pub fn dash_lengths(&self) -> Option<Vec<f32>> {
        match self.dash_style {
            DashStyle::Custom => self.dash_pattern.clone().filter(|p| !p.is_empty()),
            style => style.pattern().map(<[f32]>::to_vec),
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_lengths() {
        let mut polyline = Polyline::new(vec![]);
        assert_eq!(polyline.dash_lengths(), None);
        polyline.dash_style = DashStyle::Dash;
        assert_eq!(polyline.dash_lengths(), Some(vec![4.0, 2.0]));
        polyline.dash_style = DashStyle::Custom;
        polyline.dash_pattern = Some(vec![3.0, 1.0]);
        assert_eq!(polyline.dash_lengths(), Some(vec![3.0, 1.0]));
    }
}
