//! Error handling for Plankit
//!
//! Provides error types for every layer of the plan engine:
//! - Geometry errors (degenerate shapes, boolean operations)
//! - Render errors (surfaces, layer painters, export)
//! - Texture errors (image acquisition)
//! - Model errors (item lookup)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::data::{ItemId, ItemKind, LevelId};

/// Geometry error type
///
/// Raised by region construction and boolean algebra. Callers that feed
/// plan bounds usually degrade these to an empty region.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Polygon has fewer than three distinct points
    #[error("Degenerate polygon with {points} point(s)")]
    DegeneratePolygon {
        /// Number of points supplied.
        points: usize,
    },

    /// A coordinate was NaN or infinite
    #[error("Non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Boolean operation failed inside the polygon kernel
    #[error("Boolean {operation} failed: {reason}")]
    BooleanFailed {
        /// Operation name (union, intersection, difference).
        operation: String,
        /// Failure description.
        reason: String,
    },
}

/// Render error type
///
/// Represents failures of the paint pipeline and its drawing surfaces.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The drawing surface could not be allocated
    #[error("Cannot allocate {width}x{height} surface")]
    SurfaceAllocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// A layer painter failed
    #[error("Layer '{layer}' failed: {reason}")]
    LayerFailed {
        /// Layer name.
        layer: String,
        /// Failure description.
        reason: String,
    },

    /// Export was cancelled between two layers
    #[error("Export cancelled before layer '{layer}'")]
    Cancelled {
        /// Layer that would have been painted next.
        layer: String,
    },

    /// Encoding the painted surface failed
    #[error("Encoding failed: {0}")]
    Encoding(String),
}

/// Texture error type
///
/// Texture failures never surface from painting; they are converted into
/// the error placeholder image and reported through the loader observer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextureError {
    /// Image reference could not be resolved
    #[error("Image not found: {0}")]
    NotFound(String),

    /// Image data could not be decoded
    #[error("Cannot decode image {image}: {reason}")]
    Decode {
        /// Image reference.
        image: String,
        /// Decoder message.
        reason: String,
    },

    /// The icon renderer service could not produce an icon
    #[error("Icon rendering failed for {model}: {reason}")]
    IconRendering {
        /// Model reference.
        model: String,
        /// Failure description.
        reason: String,
    },
}

/// Model error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// No item with this id exists in the home
    #[error("Unknown item {0}")]
    UnknownItem(ItemId),

    /// No level with this id exists in the home
    #[error("Unknown level {0}")]
    UnknownLevel(LevelId),

    /// The item exists but is not of the expected kind
    #[error("Item {id} is a {actual}, expected {expected}")]
    WrongKind {
        /// Item id.
        id: ItemId,
        /// Expected kind.
        expected: ItemKind,
        /// Actual kind.
        actual: ItemKind,
    },
}

/// Main error type for Plankit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Render error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Texture error
    #[error(transparent)]
    Texture(#[from] TextureError),

    /// Model error
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an export cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Render(RenderError::Cancelled { .. }))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a texture error
    pub fn is_texture_error(&self) -> bool {
        matches!(self, Error::Texture(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_display() {
        let err = GeometryError::DegeneratePolygon { points: 2 };
        assert_eq!(err.to_string(), "Degenerate polygon with 2 point(s)");
    }

    #[test]
    fn test_cancelled_detection() {
        let err: Error = RenderError::Cancelled {
            layer: "walls".to_string(),
        }
        .into();
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "Export cancelled before layer 'walls'");
    }

    #[test]
    fn test_texture_error_conversion() {
        let err: Error = TextureError::NotFound("floor.png".to_string()).into();
        assert!(err.is_texture_error());
        assert!(!err.is_geometry_error());
    }
}
