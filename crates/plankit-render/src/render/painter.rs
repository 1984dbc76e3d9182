//! Layer loop of the plan painter.

use image::RgbaImage;
use lyon::math::Transform;
use lyon::path::Path;
use plankit_core::event_bus::RenderEvent;
use plankit_core::{Color, ItemId, PlanEvent, RenderError};
use plankit_settings::Preferences;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::surface::{Fill, StrokeStyle, Surface};
use super::{items, overlays, CancellationFlag, Layer, PaintMode, PaintReport};
use crate::cache::DerivedGeometryCache;
use crate::feedback::PlanFeedback;
use crate::model::{FurnitureSizeOracle, Home, ImageRef, PlanItem};
use crate::text::{block_transform, PlacedText, OUTLINE_RATIO};
use crate::textures::TextureManager;

/// Everything a layer painter reads while drawing one paint.
pub struct PaintContext<'a> {
    pub home: &'a Home,
    pub preferences: &'a Preferences,
    pub cache: &'a mut DerivedGeometryCache,
    pub textures: Option<&'a TextureManager>,
    pub feedback: Option<&'a PlanFeedback>,
    /// Plan footprint of pitched and rolled pieces, when a 3D engine is plugged.
    pub size_oracle: Option<&'a dyn FurnitureSizeOracle>,
    pub scale: f32,
    pub mode: PaintMode,
    pub background: Color,
    pub foreground: Color,
    pub selection: Color,
    only: Option<Vec<ItemId>>,
}

impl<'a> PaintContext<'a> {
    /// Pen of `pixels` on screen, thinned for print and export.
    pub fn stroke(&self, pixels: f32) -> StrokeStyle {
        StrokeStyle::new(self.width(pixels))
    }

    /// Model width of a line `pixels` wide on screen.
    pub fn width(&self, pixels: f32) -> f32 {
        pixels * self.mode.stroke_factor() / self.scale
    }

    /// Whether `item` is drawn: viewable at the selected level and, when the
    /// paint is restricted, one of the items asked for.
    pub fn is_painted(&self, item: &PlanItem) -> bool {
        self.home.is_viewable_at_selected_level(item)
            && self.only.as_ref().map_or(true, |only| only.contains(&item.id()))
    }

    pub fn default_font(&self) -> Option<&'a str> {
        self.preferences.text.default_font_name.as_deref()
    }

    pub fn is_touch(&self) -> bool {
        self.preferences.is_touch()
    }

    /// Pixels of `image`, placeholders included. Exports wait for the load.
    pub fn texture(&self, image: &ImageRef) -> Option<Arc<RgbaImage>> {
        self.textures
            .map(|textures| textures.texture(image, !self.mode.is_interactive()).image())
    }

    /// Draw a text block, its outline stroked first.
    pub fn draw_text(&self, surface: &mut dyn Surface, text: &PlacedText, color: Color) {
        let layout = text.layout(self.default_font());
        surface.save();
        surface.concat(&block_transform(text.x, text.y, text.angle));
        if let Some(outline) = text.outline_color {
            let width = layout.font().size * OUTLINE_RATIO;
            for (line, origin) in layout.positioned_lines() {
                surface.stroke_text(line, layout.font(), origin, outline, width);
            }
        }
        let color = text.color.unwrap_or(color);
        for (line, origin) in layout.positioned_lines() {
            surface.draw_text(line, layout.font(), origin, color);
        }
        surface.restore();
    }

    pub fn fill_and_stroke(&self, surface: &mut dyn Surface, path: &Path, fill: Color, stroke: Color, pixels: f32) {
        surface.fill_path(path, &Fill::Solid(fill));
        surface.stroke_path(path, stroke, &self.stroke(pixels));
    }
}

/// Paints a home, layer after layer, on a [`Surface`].
///
/// Each layer runs on its own: a layer that fails or panics is logged and
/// reported, the surface state is unwound and the next layer still paints.
pub struct PlanPainter<'a> {
    home: &'a Home,
    preferences: &'a Preferences,
    cache: &'a mut DerivedGeometryCache,
    textures: Option<&'a TextureManager>,
    feedback: Option<&'a PlanFeedback>,
    size_oracle: Option<&'a dyn FurnitureSizeOracle>,
    cancel: Option<CancellationFlag>,
    items: Option<Vec<ItemId>>,
}

impl<'a> PlanPainter<'a> {
    pub fn new(home: &'a Home, preferences: &'a Preferences, cache: &'a mut DerivedGeometryCache) -> Self {
        Self {
            home,
            preferences,
            cache,
            textures: None,
            feedback: None,
            size_oracle: None,
            cancel: None,
            items: None,
        }
    }

    pub fn with_textures(mut self, textures: &'a TextureManager) -> Self {
        self.textures = Some(textures);
        self
    }

    pub fn with_feedback(mut self, feedback: &'a PlanFeedback) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn with_size_oracle(mut self, oracle: &'a dyn FurnitureSizeOracle) -> Self {
        self.size_oracle = Some(oracle);
        self
    }

    /// Flag checked before each layer of an export.
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Restrict the paint to `items`. Clipboard paints default to the
    /// selection.
    pub fn with_items(mut self, items: impl IntoIterator<Item = ItemId>) -> Self {
        self.items = Some(items.into_iter().collect());
        self
    }

    /// Paint every layer of `mode` at `scale` pixels per model unit.
    pub fn paint(&mut self, surface: &mut dyn Surface, scale: f32, mode: PaintMode) -> Result<PaintReport, RenderError> {
        let (background, foreground) = if mode == PaintMode::Paint {
            (
                self.preferences.plan.background_color,
                self.preferences.plan.foreground_color,
            )
        } else {
            (Color::WHITE, Color::BLACK)
        };
        let only = match (&self.items, mode) {
            (Some(items), _) => Some(items.clone()),
            (None, PaintMode::Clipboard) => Some(self.home.selected_items().to_vec()),
            (None, _) => None,
        };
        let mut ctx = PaintContext {
            home: self.home,
            preferences: self.preferences,
            cache: &mut *self.cache,
            textures: self.textures,
            feedback: self.feedback,
            size_oracle: self.size_oracle,
            scale,
            mode,
            background,
            foreground,
            selection: self.preferences.plan.selection_color,
            only,
        };

        let mut report = PaintReport::default();
        for layer in Layer::ORDER {
            if !layer.is_painted_in(mode) {
                continue;
            }
            if mode == PaintMode::Export && self.cancel.as_ref().is_some_and(CancellationFlag::is_cancelled) {
                tracing::info!("Export cancelled before layer {}", layer);
                self.home
                    .bus()
                    .publish(PlanEvent::Render(RenderEvent::ExportCancelled))
                    .ok();
                return Err(RenderError::Cancelled {
                    layer: layer.name().to_string(),
                });
            }

            surface.begin_layer(layer);
            let depth = surface.save();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| paint_layer(&mut ctx, &mut *surface, layer)));
            surface.restore_to(depth);
            surface.end_layer(layer);

            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(payload) => Some(panic_message(payload.as_ref())),
            };
            match failure {
                None => report.painted.push(layer),
                Some(reason) => {
                    tracing::error!("Layer {} failed: {}", layer, reason);
                    report.failed.push((layer, reason));
                }
            }
        }
        Ok(report)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}

fn paint_layer(ctx: &mut PaintContext, surface: &mut dyn Surface, layer: Layer) -> Result<(), RenderError> {
    match layer {
        Layer::BackgroundImage => items::paint_background_image(ctx, surface),
        Layer::Grid => items::paint_grid(ctx, surface),
        Layer::OtherLevels => items::paint_other_levels(ctx, surface),
        Layer::Compass => items::paint_compass(ctx, surface),
        Layer::Rooms => items::paint_rooms(ctx, surface),
        Layer::Walls => items::paint_walls(ctx, surface),
        Layer::Furniture => items::paint_furniture(ctx, surface),
        Layer::Polylines => items::paint_polylines(ctx, surface),
        Layer::DimensionLines => items::paint_dimension_lines(ctx, surface),
        Layer::RoomTexts => items::paint_room_texts(ctx, surface),
        Layer::FurnitureNames => items::paint_furniture_names(ctx, surface),
        Layer::Labels => items::paint_labels(ctx, surface),
        Layer::Selection => overlays::paint_selection(ctx, surface),
        Layer::Camera => overlays::paint_camera(ctx, surface),
        Layer::AlignmentFeedback => overlays::paint_alignment_feedback(ctx, surface),
        Layer::AngleFeedback => overlays::paint_angle_feedback(ctx, surface),
        Layer::DimensionLinesFeedback => overlays::paint_dimension_lines_feedback(ctx, surface),
        Layer::DraggedItemsFeedback => overlays::paint_dragged_items_feedback(ctx, surface),
        Layer::RectangleFeedback => overlays::paint_rectangle_feedback(ctx, surface),
    }
}

/// Transform of the unit frame `(0, 0)-(1, 1)` onto an image of `image`
/// pixels drawn `width` by `height` model units.
pub(super) fn image_fit(image: &RgbaImage, width: f32, height: f32) -> Transform {
    let (w, h) = image.dimensions();
    Transform::scale(width / w.max(1) as f32, height / h.max(1) as f32)
}
