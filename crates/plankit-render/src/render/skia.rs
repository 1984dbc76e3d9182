//! Raster surface backed by a tiny-skia pixmap.

use image::{ImageFormat, RgbaImage};
use lyon::math::Transform;
use lyon::path::{Event, Path};
use plankit_core::{Color, RenderError};
use std::io::Cursor;
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pattern, Pixmap,
    PixmapPaint, SpreadMode, Stroke, StrokeDash,
};

use super::surface::{Fill, StateStack, StrokeStyle, Surface};
use super::pattern_tile;
use crate::model::{CapStyle, JoinStyle};

fn to_skia_transform(t: &Transform) -> tiny_skia::Transform {
    tiny_skia::Transform::from_row(t.m11, t.m12, t.m21, t.m22, t.m31, t.m32)
}

fn to_skia_color(color: Color, alpha: f32) -> tiny_skia::Color {
    let a = (color.alpha() as f32 * alpha).round().clamp(0.0, 255.0) as u8;
    tiny_skia::Color::from_rgba8(color.red(), color.green(), color.blue(), a)
}

/// Convert a lyon path, closing subpaths the way they were built.
fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for event in path.iter() {
        match event {
            Event::Begin { at } => pb.move_to(at.x, at.y),
            Event::Line { to, .. } => pb.line_to(to.x, to.y),
            Event::Quadratic { ctrl, to, .. } => pb.quad_to(ctrl.x, ctrl.y, to.x, to.y),
            Event::Cubic { ctrl1, ctrl2, to, .. } => {
                pb.cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y)
            }
            Event::End { close, .. } => {
                if close {
                    pb.close();
                }
            }
        }
    }
    pb.finish()
}

fn to_skia_stroke(style: &StrokeStyle) -> Stroke {
    let dash = style.dash.as_ref().and_then(|dash| {
        // Odd dash arrays repeat once to alternate on and off
        let mut intervals = dash.clone();
        if intervals.len() % 2 == 1 {
            intervals.extend_from_slice(dash);
        }
        StrokeDash::new(intervals, style.dash_offset)
    });
    Stroke {
        width: style.width,
        miter_limit: 10.0,
        line_cap: match style.cap {
            CapStyle::Butt => LineCap::Butt,
            CapStyle::Square => LineCap::Square,
            CapStyle::Round => LineCap::Round,
        },
        line_join: match style.join {
            JoinStyle::Miter => LineJoin::Miter,
            JoinStyle::Bevel => LineJoin::Bevel,
            JoinStyle::Round | JoinStyle::Curved => LineJoin::Round,
        },
        dash,
    }
}

/// Premultiplied pixmap of an image.
pub fn pixmap_from_image(image: &RgbaImage) -> Option<Pixmap> {
    let (w, h) = image.dimensions();
    let mut pixmap = Pixmap::new(w, h)?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Anti-aliased raster surface.
pub struct RasterSurface {
    pixmap: Pixmap,
    state: StateStack,
}

impl RasterSurface {
    /// Surface of `width` x `height` pixels filled with `background`, with
    /// `transform` mapping model coordinates to pixels.
    pub fn new(width: u32, height: u32, background: Color, transform: Transform) -> Result<Self, RenderError> {
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation { width, height })?;
        pixmap.fill(to_skia_color(background, 1.0));
        Ok(Self {
            pixmap,
            state: StateStack::new(transform),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight alpha image of the surface.
    pub fn into_image(self) -> RgbaImage {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let mut image = RgbaImage::new(w, h);
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
        image
    }
}

/// PNG bytes of an image.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| RenderError::Encoding(e.to_string()))?;
    Ok(bytes)
}

impl Surface for RasterSurface {
    fn state(&self) -> &StateStack {
        &self.state
    }

    fn state_mut(&mut self) -> &mut StateStack {
        &mut self.state
    }

    fn fill_path(&mut self, path: &Path, fill: &Fill) {
        let Some(skia_path) = to_skia_path(path) else {
            return;
        };
        let transform = to_skia_transform(&self.transform());
        let alpha = self.alpha();
        match fill {
            Fill::Solid(color) => {
                let mut paint = Paint {
                    anti_alias: true,
                    ..Paint::default()
                };
                paint.set_color(to_skia_color(*color, alpha));
                self.pixmap
                    .fill_path(&skia_path, &paint, FillRule::EvenOdd, transform, None);
            }
            Fill::Hatch {
                pattern,
                foreground,
                background,
            } => {
                // Tiles are sized in pixels, so fill the device space path
                let Some(tile) = pixmap_from_image(&pattern_tile(*pattern, *foreground, *background)) else {
                    return;
                };
                let Some(device_path) = skia_path.transform(transform) else {
                    return;
                };
                let paint = Paint {
                    shader: Pattern::new(
                        tile.as_ref(),
                        SpreadMode::Repeat,
                        FilterQuality::Nearest,
                        alpha,
                        tiny_skia::Transform::identity(),
                    ),
                    anti_alias: true,
                    ..Paint::default()
                };
                self.pixmap.fill_path(
                    &device_path,
                    &paint,
                    FillRule::EvenOdd,
                    tiny_skia::Transform::identity(),
                    None,
                );
            }
            Fill::Texture {
                image,
                transform: image_transform,
            } => {
                let Some(texture) = pixmap_from_image(image) else {
                    return;
                };
                let paint = Paint {
                    shader: Pattern::new(
                        texture.as_ref(),
                        SpreadMode::Repeat,
                        FilterQuality::Bilinear,
                        alpha,
                        to_skia_transform(image_transform),
                    ),
                    anti_alias: true,
                    ..Paint::default()
                };
                self.pixmap
                    .fill_path(&skia_path, &paint, FillRule::EvenOdd, transform, None);
            }
        }
    }

    fn stroke_path(&mut self, path: &Path, color: Color, stroke: &StrokeStyle) {
        let Some(skia_path) = to_skia_path(path) else {
            return;
        };
        let mut paint = Paint {
            anti_alias: true,
            ..Paint::default()
        };
        paint.set_color(to_skia_color(color, self.alpha()));
        let transform = to_skia_transform(&self.transform());
        self.pixmap
            .stroke_path(&skia_path, &paint, &to_skia_stroke(stroke), transform, None);
    }

    fn draw_image(&mut self, image: &RgbaImage, transform: &Transform) {
        let Some(source) = pixmap_from_image(image) else {
            return;
        };
        let paint = PixmapPaint {
            opacity: self.alpha(),
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let to_device = to_skia_transform(&transform.then(&self.transform()));
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, to_device, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{shapes, Rect};
    use plankit_core::WallPattern;

    #[test]
    fn test_zero_size_is_allocation_error() {
        let result = RasterSurface::new(0, 10, Color::WHITE, Transform::identity());
        assert!(matches!(result, Err(RenderError::SurfaceAllocation { width: 0, height: 10 })));
    }

    #[test]
    fn test_fill_uses_transform() {
        let mut surface = RasterSurface::new(20, 20, Color::WHITE, Transform::scale(2.0, 2.0)).expect("surface");
        surface.fill_color(&shapes::rect(&Rect::new(0.0, 0.0, 5.0, 5.0)), Color::BLACK);
        let image = surface.into_image();
        assert_eq!(image.get_pixel(8, 8).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(12, 12).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_half_alpha_blends() {
        let mut surface = RasterSurface::new(4, 4, Color::WHITE, Transform::identity()).expect("surface");
        surface.set_alpha(0.5);
        surface.fill_color(&shapes::rect(&Rect::new(0.0, 0.0, 4.0, 4.0)), Color::BLACK);
        let gray = surface.into_image().get_pixel(2, 2).0[0];
        assert!((120..=135).contains(&gray), "got {}", gray);
    }

    #[test]
    fn test_hatch_fill_mixes_colors() {
        let mut surface = RasterSurface::new(20, 20, Color::WHITE, Transform::identity()).expect("surface");
        let fill = Fill::Hatch {
            pattern: WallPattern::HatchUp,
            foreground: Color::BLACK,
            background: Color::WHITE,
        };
        surface.fill_path(&shapes::rect(&Rect::new(0.0, 0.0, 20.0, 20.0)), &fill);
        let image = surface.into_image();
        assert!(image.pixels().any(|p| p.0[0] == 0));
        assert!(image.pixels().any(|p| p.0[0] == 255));
    }

    #[test]
    fn test_png_encoding() {
        let bytes = encode_png(&RgbaImage::new(2, 2)).expect("png");
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
