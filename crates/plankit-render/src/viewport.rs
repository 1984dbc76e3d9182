//! Viewport and coordinate transformation for the plan.
//!
//! Handles conversion between model coordinates (centimeters) and pixel
//! coordinates of the drawing surface. Both spaces have their y axis pointing
//! down; pixels are offset by the plan bounds, a fixed margin, the insets and
//! the scroll position of an enclosing scrolled view, if any.

use std::fmt;

use lyon::math::{point, vector, Point, Transform};
use plankit_core::constants::{DEFAULT_PLAN_EXTENT, DEFAULT_SCALE, MARGIN, MAX_SCALE, MIN_SCALE, ZOOM_STEP};

use crate::geometry::Rect;

/// Border between the drawing surface edge and the plan, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

/// Scroll position and client size of the scrolled view hosting the plan.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollState {
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub client_width: f32,
    pub client_height: f32,
}

/// Scale and plan bounds driving model to pixel conversion.
#[derive(Debug, Clone)]
pub struct PlanViewport {
    scale: f32,
    plan_bounds: Rect,
    insets: Insets,
    scroll: Option<ScrollState>,
    canvas_origin: Point,
}

impl PlanViewport {
    /// Creates a viewport at the default scale over the default plan extent.
    pub fn new() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            plan_bounds: Rect::new(0.0, 0.0, DEFAULT_PLAN_EXTENT, DEFAULT_PLAN_EXTENT),
            insets: Insets::default(),
            scroll: None,
            canvas_origin: point(0.0, 0.0),
        }
    }

    /// Creates a viewport hosted in a scrolled view of the given client size.
    pub fn scrolled(client_width: f32, client_height: f32) -> Self {
        let mut viewport = Self::new();
        viewport.scroll = Some(ScrollState {
            client_width,
            client_height,
            ..Default::default()
        });
        viewport
    }

    /// Gets the current scale (pixels per centimeter).
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Length in centimeters of one pixel.
    pub fn pixel_length(&self) -> f32 {
        1.0 / self.scale
    }

    pub fn plan_bounds(&self) -> Rect {
        self.plan_bounds
    }

    /// Replaces the plan bounds.
    ///
    /// When scrolled, the scroll position follows a growth on the left or top
    /// side so the visible items stay still.
    pub fn set_plan_bounds(&mut self, bounds: Rect) {
        let dx = self.length_to_pixel(self.plan_bounds.min_x() - bounds.min_x());
        let dy = self.length_to_pixel(self.plan_bounds.min_y() - bounds.min_y());
        self.plan_bounds = bounds;
        if let Some(scroll) = self.scroll.as_mut() {
            scroll.scroll_left = (scroll.scroll_left + dx).max(0.0);
            scroll.scroll_top = (scroll.scroll_top + dy).max(0.0);
        }
    }

    pub fn insets(&self) -> Insets {
        self.insets
    }

    pub fn set_insets(&mut self, insets: Insets) {
        self.insets = insets;
    }

    pub fn scroll(&self) -> Option<ScrollState> {
        self.scroll
    }

    pub fn set_scroll(&mut self, scroll: Option<ScrollState>) {
        self.scroll = scroll;
    }

    pub fn is_scrolled(&self) -> bool {
        self.scroll.is_some()
    }

    /// Sets the screen position of the drawing surface top left corner.
    pub fn set_canvas_origin(&mut self, x: f32, y: f32) {
        self.canvas_origin = point(x, y);
    }

    /// Size in pixels of a model length, rounded to whole pixels.
    pub fn length_to_pixel(&self, length: f32) -> f32 {
        (length * self.scale).round()
    }

    /// Model length of a size in pixels.
    pub fn pixel_to_length(&self, size: f32) -> f32 {
        size * self.pixel_length()
    }

    /// Converts model coordinates to pixel coordinates.
    ///
    /// ```text
    /// pixel_x = round((x - bounds.min_x + MARGIN) * scale) + insets.left - scroll_left
    /// ```
    pub fn model_to_pixel(&self, x: f32, y: f32) -> Point {
        let (scroll_left, scroll_top) = self.scroll_offset();
        point(
            self.length_to_pixel(x - self.plan_bounds.min_x() + MARGIN) + self.insets.left
                - scroll_left,
            self.length_to_pixel(y - self.plan_bounds.min_y() + MARGIN) + self.insets.top
                - scroll_top,
        )
    }

    /// Converts pixel coordinates to model coordinates.
    ///
    /// ```text
    /// x = (pixel_x - insets.left + scroll_left) / scale - MARGIN + bounds.min_x
    /// ```
    pub fn pixel_to_model(&self, x: f32, y: f32) -> Point {
        let (scroll_left, scroll_top) = self.scroll_offset();
        point(
            self.pixel_to_length(x - self.insets.left + scroll_left) - MARGIN
                + self.plan_bounds.min_x(),
            self.pixel_to_length(y - self.insets.top + scroll_top) - MARGIN
                + self.plan_bounds.min_y(),
        )
    }

    /// Converts model coordinates to screen coordinates.
    pub fn model_to_screen(&self, x: f32, y: f32) -> Point {
        self.model_to_pixel(x, y) + self.canvas_origin.to_vector()
    }

    /// Transform applied to model coordinates when painting on screen.
    pub fn paint_transform(&self) -> Transform {
        let (scroll_left, scroll_top) = self.scroll_offset();
        Transform::translation(
            self.insets.left - scroll_left,
            self.insets.top - scroll_top,
        )
        .pre_scale(self.scale, self.scale)
        .pre_translate(vector(
            MARGIN - self.plan_bounds.min_x(),
            MARGIN - self.plan_bounds.min_y(),
        ))
    }

    /// Sets the scale.
    ///
    /// When scrolled, the model point at the center of the visible area stays
    /// at the center.
    pub fn set_scale(&mut self, scale: f32) {
        if self.scale == scale || !(scale.is_finite() && scale > 0.0) {
            return;
        }
        let center = self
            .scroll
            .map(|s| self.pixel_to_model(s.client_width / 2.0, s.client_height / 2.0));
        self.scale = scale;
        if let (Some(center), Some(scroll)) = (center, self.scroll) {
            let view_width = self.pixel_to_length(scroll.client_width);
            let view_height = self.pixel_to_length(scroll.client_height);
            let left = self.model_to_pixel(center.x - view_width / 2.0, center.y - view_height / 2.0);
            self.scroll_by(left.x, left.y);
        }
        tracing::debug!("Plan scale set to {}", scale);
    }

    /// Multiplies the scale by the zoom step.
    pub fn zoom_in(&mut self) {
        self.set_scale((self.scale * ZOOM_STEP).clamp(MIN_SCALE, MAX_SCALE));
    }

    /// Divides the scale by the zoom step.
    pub fn zoom_out(&mut self) {
        self.set_scale((self.scale / ZOOM_STEP).clamp(MIN_SCALE, MAX_SCALE));
    }

    /// Moves the visible area by a model length.
    ///
    /// Returns whether the view moved.
    pub fn move_view(&mut self, dx: f32, dy: f32) -> bool {
        if self.scroll.is_none() || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        let (px, py) = (self.length_to_pixel(dx), self.length_to_pixel(dy));
        self.scroll_by(px, py);
        true
    }

    /// Scrolls the least needed to show a rectangle given in pixels.
    pub fn scroll_rect_to_visible(&mut self, rect: Rect) -> bool {
        let Some(scroll) = self.scroll else {
            return false;
        };
        let mut dx = 0.0;
        let mut dy = 0.0;
        if rect.x < 0.0 {
            dx = rect.x;
        } else if rect.max_x() > scroll.client_width {
            dx = rect.max_x() - scroll.client_width;
        }
        if rect.y < 0.0 {
            dy = rect.y;
        } else if rect.max_y() > scroll.client_height {
            dy = rect.max_y() - scroll.client_height;
        }
        self.move_view(self.pixel_to_length(dx), self.pixel_to_length(dy))
    }

    /// Scrolls to show the model point `(x, y)`.
    pub fn make_point_visible(&mut self, x: f32, y: f32) -> bool {
        let pixel_length = self.pixel_length();
        let bounds = self.shape_pixel_bounds(&Rect::new(x, y, pixel_length, pixel_length));
        self.scroll_rect_to_visible(bounds)
    }

    /// Bounds in pixels of a rectangle given in model coordinates.
    pub fn shape_pixel_bounds(&self, bounds: &Rect) -> Rect {
        let origin = self.model_to_pixel(bounds.min_x(), bounds.min_y());
        Rect::new(
            origin.x,
            origin.y,
            self.length_to_pixel(bounds.width),
            self.length_to_pixel(bounds.height),
        )
    }

    /// Pixel size needed to show the whole plan with its margin.
    pub fn preferred_size(&self) -> (f32, f32) {
        (
            self.length_to_pixel(self.plan_bounds.width + MARGIN * 2.0)
                + self.insets.left
                + self.insets.right,
            self.length_to_pixel(self.plan_bounds.height + MARGIN * 2.0)
                + self.insets.top
                + self.insets.bottom,
        )
    }

    fn scroll_offset(&self) -> (f32, f32) {
        self.scroll
            .map(|s| (s.scroll_left, s.scroll_top))
            .unwrap_or((0.0, 0.0))
    }

    fn scroll_by(&mut self, dx: f32, dy: f32) {
        let (max_left, max_top) = {
            let (width, height) = self.preferred_size();
            match self.scroll {
                Some(s) => ((width - s.client_width).max(0.0), (height - s.client_height).max(0.0)),
                None => return,
            }
        };
        if let Some(scroll) = self.scroll.as_mut() {
            scroll.scroll_left = (scroll.scroll_left + dx).clamp(0.0, max_left);
            scroll.scroll_top = (scroll.scroll_top + dy).clamp(0.0, max_top);
        }
    }
}

impl fmt::Display for PlanViewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, top) = self.scroll_offset();
        write!(
            f,
            "Scale: {:.2} | Scroll: ({:.0}, {:.0})",
            self.scale, left, top
        )
    }
}

impl Default for PlanViewport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_margin() {
        let vp = PlanViewport::new();
        let p = vp.model_to_pixel(0.0, 0.0);
        assert_eq!(p, point(20.0, 20.0));
    }

    #[test]
    fn test_paint_transform_matches_conversion() {
        let mut vp = PlanViewport::scrolled(300.0, 200.0);
        vp.set_scale(2.0);
        vp.move_view(30.0, 10.0);
        let t = vp.paint_transform();
        let painted = t.transform_point(point(120.0, 80.0));
        let converted = vp.model_to_pixel(120.0, 80.0);
        assert!((painted.x - converted.x).abs() <= 0.5);
        assert!((painted.y - converted.y).abs() <= 0.5);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = PlanViewport::new();
        for _ in 0..40 {
            vp.zoom_in();
        }
        assert_eq!(vp.scale(), MAX_SCALE);
        for _ in 0..80 {
            vp.zoom_out();
        }
        assert_eq!(vp.scale(), MIN_SCALE);
    }

    #[test]
    fn test_move_view_requires_scroll() {
        let mut vp = PlanViewport::new();
        assert!(!vp.move_view(10.0, 10.0));
    }
}
