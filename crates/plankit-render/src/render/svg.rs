//! SVG surface. Geometry is transformed to device space as it is emitted,
//! so the document holds plain pixel coordinates; images and wall
//! patterns are embedded as base64 PNG.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::RgbaImage;
use lyon::math::{Point, Transform};
use lyon::path::{Event, Path};
use plankit_core::{Color, WallPattern};
use std::collections::HashMap;
use std::fmt::Write;

use super::skia::encode_png;
use super::surface::{Fill, StateStack, StrokeStyle, Surface};
use super::{pattern_tile, Layer, PATTERN_TILE_SIZE};
use crate::font_manager::FontSpec;
use crate::geometry::transform_scale;
use crate::model::{CapStyle, JoinStyle};

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn matrix(t: &Transform) -> String {
    format!(
        "matrix({} {} {} {} {} {})",
        t.m11, t.m12, t.m21, t.m22, t.m31, t.m32
    )
}

fn opacity(color: Color, alpha: f32) -> f32 {
    color.alpha() as f32 / 255.0 * alpha
}

/// Path data with every point mapped by `transform`.
fn path_data(path: &Path, transform: &Transform) -> String {
    let mut d = String::new();
    let p = |point: Point| transform.transform_point(point);
    for event in path.iter() {
        // Writing to a String cannot fail
        let _ = match event {
            Event::Begin { at } => {
                let at = p(at);
                write!(d, "M {:.2} {:.2} ", at.x, at.y)
            }
            Event::Line { to, .. } => {
                let to = p(to);
                write!(d, "L {:.2} {:.2} ", to.x, to.y)
            }
            Event::Quadratic { ctrl, to, .. } => {
                let (ctrl, to) = (p(ctrl), p(to));
                write!(d, "Q {:.2} {:.2} {:.2} {:.2} ", ctrl.x, ctrl.y, to.x, to.y)
            }
            Event::Cubic { ctrl1, ctrl2, to, .. } => {
                let (c1, c2, to) = (p(ctrl1), p(ctrl2), p(to));
                write!(
                    d,
                    "C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} ",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                )
            }
            Event::End { close, .. } => {
                if close {
                    d.push_str("Z ");
                }
                Ok(())
            }
        };
    }
    d.trim_end().to_string()
}

fn data_uri(image: &RgbaImage) -> Option<String> {
    match encode_png(image) {
        Ok(bytes) => Some(format!("data:image/png;base64,{}", STANDARD.encode(bytes))),
        Err(e) => {
            tracing::warn!("Image left out of SVG: {}", e);
            None
        }
    }
}

/// Surface writing an SVG document.
pub struct SvgSurface {
    width: f32,
    height: f32,
    background: Option<Color>,
    state: StateStack,
    defs: String,
    body: String,
    patterns: HashMap<(WallPattern, Color, Color), String>,
    next_id: usize,
}

impl SvgSurface {
    pub fn new(width: f32, height: f32, background: Option<Color>, transform: Transform) -> Self {
        Self {
            width,
            height,
            background,
            state: StateStack::new(transform),
            defs: String::new(),
            body: String::new(),
            patterns: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn hatch_pattern(&mut self, pattern: WallPattern, foreground: Color, background: Color) -> Option<String> {
        if let Some(id) = self.patterns.get(&(pattern, foreground, background)) {
            return Some(id.clone());
        }
        let uri = data_uri(&pattern_tile(pattern, foreground, background))?;
        let id = self.next_id("pattern");
        let size = PATTERN_TILE_SIZE;
        let _ = write!(
            self.defs,
            "<pattern id=\"{id}\" patternUnits=\"userSpaceOnUse\" width=\"{size}\" height=\"{size}\">\
             <image width=\"{size}\" height=\"{size}\" href=\"{uri}\"/></pattern>"
        );
        self.patterns.insert((pattern, foreground, background), id.clone());
        Some(id)
    }

    fn texture_pattern(&mut self, image: &RgbaImage, transform: &Transform) -> Option<String> {
        let uri = data_uri(image)?;
        let id = self.next_id("texture");
        let (w, h) = image.dimensions();
        let pattern_transform = matrix(&transform.then(&self.transform()));
        let _ = write!(
            self.defs,
            "<pattern id=\"{id}\" patternUnits=\"userSpaceOnUse\" width=\"{w}\" height=\"{h}\" \
             patternTransform=\"{pattern_transform}\"><image width=\"{w}\" height=\"{h}\" href=\"{uri}\"/></pattern>"
        );
        Some(id)
    }

    /// The finished document.
    pub fn finish(self) -> String {
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = self.width,
            h = self.height
        );
        if !self.defs.is_empty() {
            let _ = write!(svg, "<defs>{}</defs>", self.defs);
        }
        if let Some(background) = self.background {
            let _ = write!(
                svg,
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                background.to_hex_rgb()
            );
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

impl Surface for SvgSurface {
    fn state(&self) -> &StateStack {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StateStack {
        &mut self.state
    }

    fn fill_path(&mut self, path: &Path, fill: &Fill) {
        let d = path_data(path, &self.transform());
        if d.is_empty() {
            return;
        }
        let alpha = self.alpha();
        let paint = match fill {
            Fill::Solid(color) => format!(
                "fill=\"{}\" fill-opacity=\"{:.3}\"",
                color.to_hex_rgb(),
                opacity(*color, alpha)
            ),
            Fill::Hatch {
                pattern,
                foreground,
                background,
            } => match self.hatch_pattern(*pattern, *foreground, *background) {
                Some(id) => format!("fill=\"url(#{id})\" fill-opacity=\"{alpha:.3}\""),
                None => return,
            },
            Fill::Texture { image, transform } => match self.texture_pattern(image, transform) {
                Some(id) => format!("fill=\"url(#{id})\" fill-opacity=\"{alpha:.3}\""),
                None => return,
            },
        };
        let _ = write!(self.body, "<path d=\"{d}\" {paint} fill-rule=\"evenodd\"/>");
    }

    fn stroke_path(&mut self, path: &Path, color: Color, stroke: &StrokeStyle) {
        let transform = self.transform();
        let d = path_data(path, &transform);
        if d.is_empty() {
            return;
        }
        let scale = transform_scale(&transform);
        let stroke_opacity = opacity(color, self.alpha());
        let cap = match stroke.cap {
            CapStyle::Butt => "butt",
            CapStyle::Square => "square",
            CapStyle::Round => "round",
        };
        let join = match stroke.join {
            JoinStyle::Miter => "miter",
            JoinStyle::Bevel => "bevel",
            JoinStyle::Round | JoinStyle::Curved => "round",
        };
        let _ = write!(
            self.body,
            "<path d=\"{d}\" fill=\"none\" stroke=\"{}\" stroke-opacity=\"{:.3}\" stroke-width=\"{:.3}\" \
             stroke-linecap=\"{cap}\" stroke-linejoin=\"{join}\"",
            color.to_hex_rgb(),
            stroke_opacity,
            stroke.width * scale
        );
        if let Some(dash) = &stroke.dash {
            let dash: Vec<String> = dash.iter().map(|v| format!("{:.3}", v * scale)).collect();
            let _ = write!(
                self.body,
                " stroke-dasharray=\"{}\" stroke-dashoffset=\"{:.3}\"",
                dash.join(" "),
                stroke.dash_offset * scale
            );
        }
        self.body.push_str("/>");
    }

    fn draw_image(&mut self, image: &RgbaImage, transform: &Transform) {
        let Some(uri) = data_uri(image) else {
            return;
        };
        let (w, h) = image.dimensions();
        let to_device = matrix(&transform.then(&self.transform()));
        let alpha = self.alpha();
        let _ = write!(
            self.body,
            "<image transform=\"{to_device}\" width=\"{w}\" height=\"{h}\" opacity=\"{alpha:.3}\" href=\"{uri}\"/>"
        );
    }

    fn draw_text(&mut self, text: &str, font: &FontSpec, origin: Point, color: Color) {
        let transform = matrix(&self.transform());
        let fill_opacity = opacity(color, self.alpha());
        let _ = write!(
            self.body,
            "<text transform=\"{}\" x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\"{}{} fill=\"{}\" fill-opacity=\"{:.3}\">{}</text>",
            transform,
            origin.x,
            origin.y,
            escape(font.family.as_deref().unwrap_or("sans-serif")),
            font.size,
            if font.bold { " font-weight=\"bold\"" } else { "" },
            if font.italic { " font-style=\"italic\"" } else { "" },
            color.to_hex_rgb(),
            fill_opacity,
            escape(text)
        );
    }

    fn begin_layer(&mut self, layer: Layer) {
        let _ = write!(self.body, "<g id=\"layer-{}\">", layer.name());
    }

    fn end_layer(&mut self, _layer: Layer) {
        self.body.push_str("</g>");
    }
}
