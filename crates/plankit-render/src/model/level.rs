use lyon::math::{point, Point};
use plankit_core::LevelId;
use serde::{Deserialize, Serialize};

use super::texture::ImageRef;
use crate::geometry::{distance, Rect};

/// Image drawn under the plan, such as a scanned blueprint.
///
/// The image is scaled so the distance between the two scale points, given
/// in image pixels, matches `scale_distance` centimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub image: ImageRef,
    /// Image size in pixels.
    pub image_width: u32,
    pub image_height: u32,
    pub scale_distance: f32,
    pub scale_distance_start: Point,
    pub scale_distance_end: Point,
    /// Image pixel placed at the model origin.
    pub x_origin: f32,
    pub y_origin: f32,
    pub visible: bool,
}

impl BackgroundImage {
    pub fn new(image: ImageRef, image_width: u32, image_height: u32, scale_distance: f32) -> Self {
        Self {
            image,
            image_width,
            image_height,
            scale_distance,
            scale_distance_start: point(0.0, 0.0),
            scale_distance_end: point(image_width as f32, 0.0),
            x_origin: 0.0,
            y_origin: 0.0,
            visible: true,
        }
    }

    /// Centimeters per image pixel.
    pub fn scale(&self) -> f32 {
        let pixels = distance(self.scale_distance_start, self.scale_distance_end);
        if pixels > 0.0 {
            self.scale_distance / pixels
        } else {
            1.0
        }
    }

    /// Model rectangle covered by the image.
    pub fn bounds(&self) -> Rect {
        let scale = self.scale();
        Rect::new(
            -self.x_origin * scale,
            -self.y_origin * scale,
            self.image_width as f32 * scale,
            self.image_height as f32 * scale,
        )
    }
}

/// Storey of a home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,
    pub name: String,
    /// Elevation of the level floor in centimeters.
    pub elevation: f32,
    pub floor_thickness: f32,
    pub height: f32,
    /// Order among levels sharing the same elevation.
    pub elevation_index: i32,
    /// User toggle hiding the level in the 3D view and as ghost.
    pub viewable: bool,
    pub visible: bool,
    pub background_image: Option<BackgroundImage>,
}

impl Level {
    pub fn new(name: impl Into<String>, elevation: f32, floor_thickness: f32, height: f32) -> Self {
        Self {
            id: LevelId::new(),
            name: name.into(),
            elevation,
            floor_thickness,
            height,
            elevation_index: 0,
            viewable: true,
            visible: true,
            background_image: None,
        }
    }

    pub fn with_elevation_index(mut self, elevation_index: i32) -> Self {
        self.elevation_index = elevation_index;
        self
    }

    pub fn is_viewable_and_visible(&self) -> bool {
        self.viewable && self.visible
    }

    /// Whether this level shares the elevation of `other` and comes before it.
    pub fn is_below_at_same_elevation(&self, other: &Level) -> bool {
        self.elevation == other.elevation && self.elevation_index < other.elevation_index
    }
}
