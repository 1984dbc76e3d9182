//! Surface keeping a log of draw operations in device space, for tests and
//! hit statistics.

use image::RgbaImage;
use lyon::math::{Point, Transform};
use lyon::path::Path;
use plankit_core::{Color, WallPattern};

use super::surface::{Fill, StateStack, StrokeStyle, Surface};
use super::Layer;
use crate::font_manager::FontSpec;
use crate::geometry::{transform_scale, transformed_path_bounds, Rect};

/// Paint of a recorded fill.
#[derive(Debug, Clone, PartialEq)]
pub enum FillKind {
    Solid(Color),
    Hatch(WallPattern),
    Texture,
}

/// Recorded operation. Bounds, widths and origins are in device space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    BeginLayer(Layer),
    EndLayer(Layer),
    Fill {
        layer: Option<Layer>,
        bounds: Option<Rect>,
        fill: FillKind,
        alpha: f32,
    },
    Stroke {
        layer: Option<Layer>,
        bounds: Option<Rect>,
        color: Color,
        width: f32,
        alpha: f32,
    },
    Image {
        layer: Option<Layer>,
        bounds: Option<Rect>,
        alpha: f32,
    },
    Text {
        layer: Option<Layer>,
        text: String,
        origin: Point,
        color: Color,
        alpha: f32,
    },
}

impl DrawOp {
    pub fn layer(&self) -> Option<Layer> {
        match self {
            DrawOp::BeginLayer(layer) | DrawOp::EndLayer(layer) => Some(*layer),
            DrawOp::Fill { layer, .. }
            | DrawOp::Stroke { layer, .. }
            | DrawOp::Image { layer, .. }
            | DrawOp::Text { layer, .. } => *layer,
        }
    }
}

/// Surface recording what it is asked to draw.
#[derive(Debug)]
pub struct RecordingSurface {
    state: StateStack,
    ops: Vec<DrawOp>,
    layer: Option<Layer>,
    failing_layer: Option<Layer>,
}

impl RecordingSurface {
    pub fn new(transform: Transform) -> Self {
        Self {
            state: StateStack::new(transform),
            ops: Vec::new(),
            layer: None,
            failing_layer: None,
        }
    }

    /// Make every draw call of `layer` panic.
    pub fn panic_in_layer(mut self, layer: Layer) -> Self {
        self.failing_layer = Some(layer);
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Layers begun, in order.
    pub fn layers(&self) -> Vec<Layer> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::BeginLayer(layer) => Some(*layer),
                _ => None,
            })
            .collect()
    }

    /// Draw operations of `layer`.
    pub fn ops_in(&self, layer: Layer) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(move |op| {
            op.layer() == Some(layer) && !matches!(op, DrawOp::BeginLayer(_) | DrawOp::EndLayer(_))
        })
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, op: DrawOp) {
        if self.layer.is_some() && self.layer == self.failing_layer {
            panic!("drawing failure in layer {:?}", self.layer);
        }
        self.ops.push(op);
    }
}

impl Surface for RecordingSurface {
    fn state(&self) -> &StateStack {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StateStack {
        &mut self.state
    }

    fn fill_path(&mut self, path: &Path, fill: &Fill) {
        let op = DrawOp::Fill {
            layer: self.layer,
            bounds: transformed_path_bounds(path, &self.transform()),
            fill: match fill {
                Fill::Solid(color) => FillKind::Solid(*color),
                Fill::Hatch { pattern, .. } => FillKind::Hatch(*pattern),
                Fill::Texture { .. } => FillKind::Texture,
            },
            alpha: self.alpha(),
        };
        self.record(op);
    }

    fn stroke_path(&mut self, path: &Path, color: Color, stroke: &StrokeStyle) {
        let transform = self.transform();
        let op = DrawOp::Stroke {
            layer: self.layer,
            bounds: transformed_path_bounds(path, &transform),
            color,
            width: stroke.width * transform_scale(&transform),
            alpha: self.alpha(),
        };
        self.record(op);
    }

    fn draw_image(&mut self, image: &RgbaImage, transform: &Transform) {
        let (w, h) = image.dimensions();
        let corners = Rect::new(0.0, 0.0, w as f32, h as f32).corners();
        let to_device = transform.then(&self.transform());
        let op = DrawOp::Image {
            layer: self.layer,
            bounds: Rect::from_points(&corners.map(|p| to_device.transform_point(p))),
            alpha: self.alpha(),
        };
        self.record(op);
    }

    fn draw_text(&mut self, text: &str, _font: &FontSpec, origin: Point, color: Color) {
        let op = DrawOp::Text {
            layer: self.layer,
            text: text.to_string(),
            origin: self.transform().transform_point(origin),
            color,
            alpha: self.alpha(),
        };
        self.record(op);
    }

    fn begin_layer(&mut self, layer: Layer) {
        self.layer = Some(layer);
        self.ops.push(DrawOp::BeginLayer(layer));
    }

    fn end_layer(&mut self, layer: Layer) {
        self.layer = None;
        self.ops.push(DrawOp::EndLayer(layer));
    }
}
