use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to an image resolved by a texture provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a 3D model resolved by the icon renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelRef(pub String);

impl ModelRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tiled image applied to a floor or a piece of furniture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeTexture {
    pub image: ImageRef,
    /// Width in centimeters of one tile.
    pub width: f32,
    /// Height in centimeters of one tile.
    pub height: f32,
    /// Rotation of the tiles in radians.
    #[serde(default)]
    pub angle: f32,
    /// Scale applied to the tile size.
    #[serde(default = "default_texture_scale")]
    pub scale: f32,
}

fn default_texture_scale() -> f32 {
    1.0
}

impl HomeTexture {
    pub fn new(image: ImageRef, width: f32, height: f32) -> Self {
        Self {
            image,
            width,
            height,
            angle: 0.0,
            scale: 1.0,
        }
    }

    /// Tile width once scaled.
    pub fn scaled_width(&self) -> f32 {
        self.width * self.scale
    }

    /// Tile height once scaled.
    pub fn scaled_height(&self) -> f32 {
        self.height * self.scale
    }
}
