//! Paint pipeline of the plan: layer order, paint modes and the surfaces
//! the layers draw on.

mod items;
mod overlays;
mod painter;
pub mod recording;
pub mod skia;
pub mod surface;
pub mod svg;

pub use painter::{PaintContext, PlanPainter};
pub use recording::{DrawOp, RecordingSurface};
pub use skia::RasterSurface;
pub use surface::{Fill, StrokeStyle, Surface};
pub use svg::SvgSurface;

use image::{Rgba, RgbaImage};
use plankit_core::{Color, WallPattern};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Purpose of a paint, which decides colors, stroke widths and the layers
/// drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaintMode {
    /// Interactive view with grid, ghosts, selection and feedback.
    Paint,
    Print,
    /// Selected items only, on a white background.
    Clipboard,
    Export,
}

impl PaintMode {
    /// Factor applied to every stroke width.
    pub fn stroke_factor(&self) -> f32 {
        match self {
            PaintMode::Print | PaintMode::Export => 0.5,
            _ => 1.0,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, PaintMode::Paint)
    }
}

/// Layers in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    BackgroundImage,
    Grid,
    OtherLevels,
    Compass,
    Rooms,
    Walls,
    Furniture,
    Polylines,
    DimensionLines,
    RoomTexts,
    FurnitureNames,
    Labels,
    Selection,
    Camera,
    AlignmentFeedback,
    AngleFeedback,
    DimensionLinesFeedback,
    DraggedItemsFeedback,
    RectangleFeedback,
}

impl Layer {
    pub const ORDER: [Layer; 19] = [
        Layer::BackgroundImage,
        Layer::Grid,
        Layer::OtherLevels,
        Layer::Compass,
        Layer::Rooms,
        Layer::Walls,
        Layer::Furniture,
        Layer::Polylines,
        Layer::DimensionLines,
        Layer::RoomTexts,
        Layer::FurnitureNames,
        Layer::Labels,
        Layer::Selection,
        Layer::Camera,
        Layer::AlignmentFeedback,
        Layer::AngleFeedback,
        Layer::DimensionLinesFeedback,
        Layer::DraggedItemsFeedback,
        Layer::RectangleFeedback,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Layer::BackgroundImage => "background-image",
            Layer::Grid => "grid",
            Layer::OtherLevels => "other-levels",
            Layer::Compass => "compass",
            Layer::Rooms => "rooms",
            Layer::Walls => "walls",
            Layer::Furniture => "furniture",
            Layer::Polylines => "polylines",
            Layer::DimensionLines => "dimension-lines",
            Layer::RoomTexts => "room-texts",
            Layer::FurnitureNames => "furniture-names",
            Layer::Labels => "labels",
            Layer::Selection => "selection",
            Layer::Camera => "camera",
            Layer::AlignmentFeedback => "alignment-feedback",
            Layer::AngleFeedback => "angle-feedback",
            Layer::DimensionLinesFeedback => "dimension-lines-feedback",
            Layer::DraggedItemsFeedback => "dragged-items-feedback",
            Layer::RectangleFeedback => "rectangle-feedback",
        }
    }

    /// Whether the layer is drawn in `mode`.
    pub fn is_painted_in(&self, mode: PaintMode) -> bool {
        match self {
            Layer::BackgroundImage => mode != PaintMode::Clipboard,
            Layer::Grid | Layer::OtherLevels => mode == PaintMode::Paint,
            layer if *layer >= Layer::Selection => mode == PaintMode::Paint,
            _ => true,
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Flag checked between layers of an export to abandon it.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Outcome of a paint: the layers drawn and those that failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaintReport {
    pub painted: Vec<Layer>,
    pub failed: Vec<(Layer, String)>,
}

impl PaintReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Side in device pixels of a wall pattern tile.
pub const PATTERN_TILE_SIZE: u32 = 10;

/// Device-space tile of a wall pattern.
pub fn pattern_tile(pattern: WallPattern, foreground: Color, background: Color) -> RgbaImage {
    let fg = Rgba([foreground.red(), foreground.green(), foreground.blue(), foreground.alpha()]);
    let bg = Rgba([background.red(), background.green(), background.blue(), background.alpha()]);
    let n = PATTERN_TILE_SIZE;
    let up = |x: u32, y: u32| (x + y) % n == n - 1;
    let down = |x: u32, y: u32| x % n == y % n;
    RgbaImage::from_fn(n, n, |x, y| {
        let on = match pattern {
            WallPattern::Foreground => true,
            WallPattern::Background => false,
            WallPattern::HatchUp => up(x, y),
            WallPattern::HatchDown => down(x, y),
            // Thick foreground with thin background lines
            WallPattern::ReversedHatchUp => !up(x, y),
            WallPattern::ReversedHatchDown => !down(x, y),
            WallPattern::CrossHatch => up(x, y) || down(x, y),
        };
        if on {
            fg
        } else {
            bg
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlays_only_in_paint_mode() {
        assert!(Layer::Selection.is_painted_in(PaintMode::Paint));
        assert!(!Layer::Selection.is_painted_in(PaintMode::Print));
        assert!(!Layer::Grid.is_painted_in(PaintMode::Export));
        assert!(!Layer::BackgroundImage.is_painted_in(PaintMode::Clipboard));
        assert!(Layer::Walls.is_painted_in(PaintMode::Clipboard));
    }

    #[test]
    fn test_order_is_sorted() {
        let mut sorted = Layer::ORDER;
        sorted.sort();
        assert_eq!(sorted, Layer::ORDER);
    }

    #[test]
    fn test_hatch_tile() {
        let tile = pattern_tile(WallPattern::HatchUp, Color::BLACK, Color::WHITE);
        assert_eq!(tile.get_pixel(9, 0).0, [0, 0, 0, 255]);
        assert_eq!(tile.get_pixel(0, 0).0, [255, 255, 255, 255]);
        let solid = pattern_tile(WallPattern::Foreground, Color::BLACK, Color::WHITE);
        assert!(solid.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_cancellation_flag_is_shared() {
        let flag = CancellationFlag::new();
        let clone = flag.clone();
        clone.cancel();
        assert!(flag.is_cancelled());
        flag.reset();
        assert!(!clone.is_cancelled());
    }
}
