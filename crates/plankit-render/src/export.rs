//! Plan export to SVG, PNG and clipboard images.

use image::RgbaImage;
use lyon::math::Transform;
use plankit_core::constants::MARGIN;
use plankit_core::{Color, ItemId, RenderError};
use plankit_settings::Preferences;

use crate::cache::DerivedGeometryCache;
use crate::geometry::Rect;
use crate::model::{Home, PlanItem};
use crate::render::skia::encode_png;
use crate::render::svg::SvgSurface;
use crate::render::{CancellationFlag, PaintMode, PlanPainter, RasterSurface};
use crate::textures::TextureManager;

/// Widest outline drawn around an item, in pixels at scale 1.
const OUTLINE_MARGIN: f32 = 1.5;

/// Optional collaborators of an export.
#[derive(Default, Clone, Copy)]
pub struct ExportContext<'a> {
    pub textures: Option<&'a TextureManager>,
    pub cancel: Option<&'a CancellationFlag>,
}

/// Union of the bounds of `items`, `None` when none of them has any.
pub fn items_bounds(
    home: &Home,
    preferences: &Preferences,
    cache: &mut DerivedGeometryCache,
    items: &[ItemId],
) -> Option<Rect> {
    items
        .iter()
        .filter_map(|id| home.item(*id))
        .filter_map(|item| cache.item_bounds(home, item, preferences))
        .reduce(|a, b| a.union(&b))
}

/// Extra room kept around exported items so that their strokes are not
/// clipped.
fn stroke_margin(home: &Home, items: &[ItemId]) -> f32 {
    items
        .iter()
        .filter_map(|id| home.item(*id))
        .filter_map(|item| match item {
            PlanItem::Polyline(polyline) => Some(polyline.thickness / 2.0),
            _ => None,
        })
        .fold(OUTLINE_MARGIN, f32::max)
}

/// SVG document of `items`, every item when `None`, at one pixel per
/// centimeter, sized to their bounds plus the stroke margin.
pub fn export_svg(
    home: &Home,
    preferences: &Preferences,
    cache: &mut DerivedGeometryCache,
    items: Option<&[ItemId]>,
    context: ExportContext,
) -> Result<String, RenderError> {
    let all: Vec<ItemId>;
    let items = match items {
        Some(items) => items,
        None => {
            all = home.items().iter().map(PlanItem::id).collect();
            &all
        }
    };
    let margin = stroke_margin(home, items);
    let bounds = items_bounds(home, preferences, cache, items)
        .unwrap_or_else(|| Rect::new(0.0, 0.0, 0.0, 0.0))
        .inflate(margin, margin);
    let transform = Transform::translation(-bounds.min_x(), -bounds.min_y());
    let mut surface = SvgSurface::new(bounds.width, bounds.height, None, transform);

    let mut painter = PlanPainter::new(home, preferences, cache).with_items(items.iter().copied());
    if let Some(textures) = context.textures {
        painter = painter.with_textures(textures);
    }
    if let Some(cancel) = context.cancel {
        painter = painter.with_cancellation(cancel.clone());
    }
    let report = painter.paint(&mut surface, 1.0, PaintMode::Export)?;
    if !report.is_complete() {
        tracing::warn!("SVG export missing {} layers", report.failed.len());
    }
    Ok(surface.finish())
}

/// Raster image of `bounds`, a model rectangle, at `scale`.
fn raster(
    home: &Home,
    preferences: &Preferences,
    cache: &mut DerivedGeometryCache,
    bounds: Rect,
    scale: f32,
    mode: PaintMode,
    context: ExportContext,
) -> Result<RgbaImage, RenderError> {
    let width = (bounds.width * scale).ceil().max(1.0) as u32;
    let height = (bounds.height * scale).ceil().max(1.0) as u32;
    let transform = Transform::translation(-bounds.min_x(), -bounds.min_y()).then_scale(scale, scale);
    let background = if mode == PaintMode::Paint {
        preferences.plan.background_color
    } else {
        Color::WHITE
    };
    let mut surface = RasterSurface::new(width, height, background, transform)?;

    let mut painter = PlanPainter::new(home, preferences, cache);
    if let Some(textures) = context.textures {
        painter = painter.with_textures(textures);
    }
    if let Some(cancel) = context.cancel {
        painter = painter.with_cancellation(cancel.clone());
    }
    painter.paint(&mut surface, scale, mode)?;
    Ok(surface.into_image())
}

/// PNG image of the whole plan at `scale` in `mode`.
pub fn render_png(
    home: &Home,
    preferences: &Preferences,
    cache: &mut DerivedGeometryCache,
    scale: f32,
    mode: PaintMode,
    context: ExportContext,
) -> Result<Vec<u8>, RenderError> {
    let bounds = cache.plan_bounds(home, preferences).inflate(MARGIN, MARGIN);
    let image = raster(home, preferences, cache, bounds, scale, mode, context)?;
    encode_png(&image)
}

/// Image of the selected items for the clipboard, `None` when nothing is
/// selected.
pub fn clipboard_image(
    home: &Home,
    preferences: &Preferences,
    cache: &mut DerivedGeometryCache,
    scale: f32,
    context: ExportContext,
) -> Result<Option<RgbaImage>, RenderError> {
    let selection = home.selected_items().to_vec();
    let Some(bounds) = items_bounds(home, preferences, cache, &selection) else {
        return Ok(None);
    };
    let margin = stroke_margin(home, &selection);
    let bounds = bounds.inflate(margin, margin);
    raster(home, preferences, cache, bounds, scale, PaintMode::Clipboard, context).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Label, Wall};

    #[test]
    fn test_svg_sized_to_items() {
        let mut home = Home::default();
        let wall = home.add_item(Wall::new(0.0, 0.0, 200.0, 0.0, 20.0));
        let prefs = Preferences::default();
        let mut cache = DerivedGeometryCache::default();
        let svg = export_svg(&home, &prefs, &mut cache, Some(&[wall]), ExportContext::default()).expect("svg");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"203\""), "{}", &svg[..120.min(svg.len())]);
        assert!(svg.contains("height=\"23\""));
    }

    #[test]
    fn test_cancelled_export_fails() {
        let mut home = Home::default();
        home.add_item(Label::new("Hall", 0.0, 0.0));
        let prefs = Preferences::default();
        let mut cache = DerivedGeometryCache::default();
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let context = ExportContext {
            textures: None,
            cancel: Some(&cancel),
        };
        let result = export_svg(&home, &prefs, &mut cache, None, context);
        assert!(matches!(result, Err(RenderError::Cancelled { .. })));
    }

    #[test]
    fn test_clipboard_needs_selection() {
        let mut home = Home::default();
        let wall = home.add_item(Wall::new(0.0, 0.0, 200.0, 0.0, 20.0));
        let prefs = Preferences::default();
        let mut cache = DerivedGeometryCache::default();
        let none = clipboard_image(&home, &prefs, &mut cache, 1.0, ExportContext::default()).expect("image");
        assert!(none.is_none());

        home.set_selected_items([wall]);
        let image = clipboard_image(&home, &prefs, &mut cache, 1.0, ExportContext::default())
            .expect("image")
            .expect("selection");
        assert_eq!(image.dimensions(), (203, 23));
    }

    #[test]
    fn test_png_signature() {
        let home = Home::default();
        let prefs = Preferences::default();
        let mut cache = DerivedGeometryCache::default();
        let png = render_png(&home, &prefs, &mut cache, 0.1, PaintMode::Print, ExportContext::default()).expect("png");
        assert_eq!(&png[..4], b"\x89PNG");
    }
}
