//! Transient feedback set by the interaction controller and drawn over the
//! plan in paint mode.

use lyon::math::{point, Point};
use lyon::path::Path;
use std::f32::consts::PI;

use crate::alignment::AlignedObject;
use crate::geometry::{shapes, Rect};
use crate::model::{DimensionLine, PlanItem};

/// Point being aligned, drawn with guides to the items it lines up with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentRequest {
    pub aligned: AlignedObject,
    pub point: Point,
    pub show_point_feedback: bool,
}

/// Arc showing the angle at `center` between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleFeedback {
    pub center: Point,
    pub point1: Point,
    pub point2: Point,
}

impl AngleFeedback {
    /// Arc of radius 20 pixels and its two radii of 25 pixels, `None` when a
    /// point lies on the center.
    pub fn shapes(&self, scale: f32) -> Option<(Path, Path)> {
        if self.point1 == self.center || self.point2 == self.center {
            return None;
        }
        let c = self.center;
        let screen_angle = |p: Point| {
            let angle = (c.y - p.y).atan2(p.x - c.x);
            if angle < 0.0 {
                angle + 2.0 * PI
            } else {
                angle
            }
        };
        let angle1 = screen_angle(self.point1);
        let angle2 = screen_angle(self.point2);
        let mut extent = angle2 - angle1;
        if angle1 > angle2 {
            extent += 2.0 * PI;
        }
        let radius = 20.0 / scale;
        let arc = shapes::arc(
            c.x - radius,
            c.y - radius,
            radius * 2.0,
            radius * 2.0,
            angle1.to_degrees(),
            extent.to_degrees(),
            shapes::ArcClosure::Open,
        );
        let radius = radius + 5.0 / scale;
        let mut sides = Path::builder();
        for angle in [angle1, angle1 + extent] {
            sides.begin(c);
            sides.line_to(point(c.x + radius * angle.cos(), c.y - radius * angle.sin()));
            sides.end(false);
        }
        Some((arc, sides.build()))
    }
}

/// Feedback state of the plan.
#[derive(Debug, Clone, Default)]
pub struct PlanFeedback {
    pub alignment: Option<AlignmentRequest>,
    pub angle: Option<AngleFeedback>,
    pub rectangle: Option<Rect>,
    pub dragged_items: Vec<PlanItem>,
    pub dimension_lines: Vec<DimensionLine>,
    pub resize_indicator_visible: bool,
}

impl PlanFeedback {
    pub fn set_alignment(&mut self, aligned: AlignedObject, x: f32, y: f32, show_point_feedback: bool) {
        self.alignment = Some(AlignmentRequest {
            aligned,
            point: point(x, y),
            show_point_feedback,
        });
    }

    pub fn set_angle(&mut self, center: Point, point1: Point, point2: Point) {
        self.angle = Some(AngleFeedback {
            center,
            point1,
            point2,
        });
    }

    /// Selection rectangle between two corners given in any order.
    pub fn set_rectangle(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        self.rectangle = Some(Rect::from_ltrb(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)));
    }

    /// Drop every feedback but the resize indicator flag.
    pub fn clear(&mut self) {
        let resize_indicator_visible = self.resize_indicator_visible;
        *self = Self {
            resize_indicator_visible,
            ..Self::default()
        };
    }

    pub fn is_empty(&self) -> bool {
        self.alignment.is_none()
            && self.angle.is_none()
            && self.rectangle.is_none()
            && self.dragged_items.is_empty()
            && self.dimension_lines.is_empty()
    }
}
