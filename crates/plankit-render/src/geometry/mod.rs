//! Plane geometry used by the cache and the painters.
//!
//! Points and paths come from `lyon`, boolean region algebra from `csgrs`.

mod rect;
mod region;
pub mod shapes;

pub use lyon::math::{point, vector, Angle, Point, Transform, Vector};
pub use lyon::path::Path;
pub use rect::Rect;
pub use region::{Region, RegionPolygon};
pub(crate) use region::{ring_contains, signed_area};

/// Tolerance used when flattening curves into polygons.
pub const FLATTENING_TOLERANCE: f32 = 0.1;

/// Bounding box of a path, `None` for an empty path.
pub fn path_bounds(path: &Path) -> Option<Rect> {
    if path.iter().next().is_none() {
        return None;
    }
    let bb = lyon::algorithms::aabb::bounding_box(path.iter());
    Some(Rect::from_box(bb))
}

/// Bounding box of a path once transformed.
pub fn transformed_path_bounds(path: &Path, transform: &Transform) -> Option<Rect> {
    path_bounds(&path.clone().transformed(transform))
}

/// Transform applied to `(x, y)`.
pub fn transform_xy(transform: &Transform, x: f32, y: f32) -> Point {
    transform.transform_point(point(x, y))
}

/// Distance between two points.
pub fn distance(a: Point, b: Point) -> f32 {
    (b - a).length()
}

/// Average scale factor of a transform, used to map stroke widths.
pub fn transform_scale(transform: &Transform) -> f32 {
    let det = transform.m11 * transform.m22 - transform.m12 * transform.m21;
    det.abs().sqrt()
}
