//! Drawing surface abstraction shared by the raster, SVG and recording
//! backends.
//!
//! Painters work in model coordinates; a surface keeps a stack of states
//! holding the current transform to its own device space and the current
//! alpha, the way a 2D graphics context does.

use image::RgbaImage;
use lyon::math::{vector, Angle, Point, Transform};
use lyon::path::Path;
use plankit_core::{Color, WallPattern};
use std::sync::Arc;

use super::Layer;
use crate::font_manager::{self, FontSpec};
use crate::model::{CapStyle, JoinStyle};

/// Pen used to stroke paths. Widths are in the units of the current
/// transform.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: CapStyle,
    pub join: JoinStyle,
    pub dash: Option<Vec<f32>>,
    pub dash_offset: f32,
}

impl StrokeStyle {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            cap: CapStyle::Square,
            join: JoinStyle::Miter,
            dash: None,
            dash_offset: 0.0,
        }
    }

    pub fn round(width: f32) -> Self {
        Self {
            cap: CapStyle::Round,
            join: JoinStyle::Round,
            ..Self::new(width)
        }
    }

    pub fn with_cap(mut self, cap: CapStyle) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: JoinStyle) -> Self {
        self.join = join;
        self
    }

    pub fn with_dash(mut self, dash: Vec<f32>, offset: f32) -> Self {
        self.dash = Some(dash).filter(|d| d.len() >= 2 && d.iter().any(|v| *v > 0.0));
        self.dash_offset = offset;
        self
    }
}

/// What a fill paints with.
#[derive(Debug, Clone)]
pub enum Fill {
    Solid(Color),
    /// Wall pattern tile, sized in device pixels.
    Hatch {
        pattern: WallPattern,
        foreground: Color,
        background: Color,
    },
    /// Repeated image; `transform` maps image pixels to the current space.
    Texture {
        image: Arc<RgbaImage>,
        transform: Transform,
    },
}

/// Transform and alpha in effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    pub transform: Transform,
    pub alpha: f32,
}

/// Saved states of a surface.
#[derive(Debug, Clone)]
pub struct StateStack {
    current: SurfaceState,
    saved: Vec<SurfaceState>,
}

impl StateStack {
    pub fn new(transform: Transform) -> Self {
        Self {
            current: SurfaceState {
                transform,
                alpha: 1.0,
            },
            saved: Vec::new(),
        }
    }

    pub fn current(&self) -> SurfaceState {
        self.current
    }

    /// Push the current state and return the depth to restore to.
    pub fn save(&mut self) -> usize {
        self.saved.push(self.current);
        self.saved.len() - 1
    }

    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    /// Pop every state saved from `depth` on, as after an aborted layer.
    pub fn restore_to(&mut self, depth: usize) {
        while self.saved.len() > depth {
            self.restore();
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// Target of the paint pipeline.
pub trait Surface {
    fn state(&self) -> &StateStack;
    fn state_mut(&mut self) -> &mut StateStack;

    fn fill_path(&mut self, path: &Path, fill: &Fill);
    fn stroke_path(&mut self, path: &Path, color: Color, stroke: &StrokeStyle);

    /// Draw `image` with its pixels mapped by `transform` to the current
    /// space.
    fn draw_image(&mut self, image: &RgbaImage, transform: &Transform);

    /// Fill a line of text with its baseline starting at `origin`.
    fn draw_text(&mut self, text: &str, font: &FontSpec, origin: Point, color: Color) {
        let outline = font_manager::text_outline(text, font, origin.x, origin.y);
        self.fill_path(&outline, &Fill::Solid(color));
    }

    /// Stroke the glyph outlines of a line of text.
    fn stroke_text(&mut self, text: &str, font: &FontSpec, origin: Point, color: Color, width: f32) {
        let outline = font_manager::text_outline(text, font, origin.x, origin.y);
        self.stroke_path(&outline, color, &StrokeStyle::round(width));
    }

    fn begin_layer(&mut self, _layer: Layer) {}
    fn end_layer(&mut self, _layer: Layer) {}

    fn save(&mut self) -> usize {
        self.state_mut().save()
    }

    fn restore(&mut self) {
        self.state_mut().restore()
    }

    fn restore_to(&mut self, depth: usize) {
        self.state_mut().restore_to(depth)
    }

    fn transform(&self) -> Transform {
        self.state().current().transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.state_mut().current.transform = transform;
    }

    /// Apply `transform` before the current one.
    fn concat(&mut self, transform: &Transform) {
        let current = self.transform();
        self.set_transform(transform.then(&current));
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.concat(&Transform::translation(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.concat(&Transform::rotation(Angle::radians(angle)));
    }

    fn scale(&mut self, factor: f32) {
        self.concat(&Transform::scale(factor, factor));
    }

    fn alpha(&self) -> f32 {
        self.state().current().alpha
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state_mut().current.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_color(&mut self, path: &Path, color: Color) {
        self.fill_path(path, &Fill::Solid(color));
    }
}

/// Transform placing `anchor` at the origin of a shape drawn at `(x, y)`.
pub fn placed_at(x: f32, y: f32, angle: f32) -> Transform {
    Transform::rotation(Angle::radians(angle)).then_translate(vector(x, y))
}

/// Color with its alpha multiplied by `alpha`.
pub fn faded(color: Color, alpha: f32) -> Color {
    color.with_alpha((color.alpha() as f32 * alpha.clamp(0.0, 1.0)).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_to_unwinds_nested_saves() {
        let mut stack = StateStack::new(Transform::identity());
        let depth = stack.save();
        stack.current.alpha = 0.5;
        stack.save();
        stack.current.alpha = 0.2;
        stack.restore_to(depth);
        assert_eq!(stack.current().alpha, 1.0);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_dash_needs_two_lengths() {
        assert_eq!(StrokeStyle::new(1.0).with_dash(vec![2.0], 0.0).dash, None);
        assert!(StrokeStyle::new(1.0).with_dash(vec![2.0, 1.0], 0.0).dash.is_some());
    }

    #[test]
    fn test_faded_scales_alpha() {
        assert_eq!(faded(Color::BLACK, 0.5).alpha(), 128);
        assert_eq!(faded(Color::BLACK.with_alpha(100), 0.5).alpha(), 50);
    }
}
