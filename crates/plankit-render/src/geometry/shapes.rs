//! Path builders for the shapes drawn in the plan.
//!
//! Arcs follow the drawing convention of angles in degrees, starting at
//! three o'clock and growing counter-clockwise as seen on screen, where the
//! y axis points down.

use lyon::math::{point, Box2D, Point};
use lyon::path::{Path, Winding};

use super::{Rect, FLATTENING_TOLERANCE};

/// How an arc is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcClosure {
    /// Open curve.
    Open,
    /// Closed by the chord between its ends.
    Chord,
    /// Closed through the ellipse center.
    Pie,
}

const ARC_STEP_DEGREES: f32 = 5.0;

/// Points of an elliptic arc inscribed in the `(x, y, width, height)` frame.
pub fn arc_points(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    start_degrees: f32,
    extent_degrees: f32,
) -> Vec<Point> {
    let cx = x + width / 2.0;
    let cy = y + height / 2.0;
    let steps = ((extent_degrees.abs() / ARC_STEP_DEGREES).ceil() as usize).max(1);
    (0..=steps)
        .map(|i| {
            let angle = (start_degrees + extent_degrees * i as f32 / steps as f32).to_radians();
            point(
                cx + width / 2.0 * angle.cos(),
                cy - height / 2.0 * angle.sin(),
            )
        })
        .collect()
}

/// Elliptic arc path.
pub fn arc(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    start_degrees: f32,
    extent_degrees: f32,
    closure: ArcClosure,
) -> Path {
    let mut builder = Path::builder();
    append_arc(
        &mut builder,
        x,
        y,
        width,
        height,
        start_degrees,
        extent_degrees,
        closure,
    );
    builder.build()
}

/// Append an elliptic arc as a new sub path.
#[allow(clippy::too_many_arguments)]
pub fn append_arc(
    builder: &mut lyon::path::path::Builder,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    start_degrees: f32,
    extent_degrees: f32,
    closure: ArcClosure,
) {
    let points = arc_points(x, y, width, height, start_degrees, extent_degrees);
    match closure {
        ArcClosure::Pie => {
            builder.begin(point(x + width / 2.0, y + height / 2.0));
            for p in &points {
                builder.line_to(*p);
            }
            builder.close();
        }
        ArcClosure::Open | ArcClosure::Chord => {
            let mut iter = points.iter();
            if let Some(first) = iter.next() {
                builder.begin(*first);
                for p in iter {
                    builder.line_to(*p);
                }
                builder.end(closure == ArcClosure::Chord);
            }
        }
    }
}

/// Ellipse inscribed in a frame.
pub fn ellipse(x: f32, y: f32, width: f32, height: f32) -> Path {
    let mut builder = Path::builder();
    builder.add_ellipse(
        point(x + width / 2.0, y + height / 2.0),
        lyon::math::vector(width / 2.0, height / 2.0),
        lyon::math::Angle::radians(0.0),
        Winding::Positive,
    );
    builder.build()
}

pub fn circle(cx: f32, cy: f32, radius: f32) -> Path {
    ellipse(cx - radius, cy - radius, radius * 2.0, radius * 2.0)
}

pub fn rect(rect: &Rect) -> Path {
    let mut builder = Path::builder();
    builder.add_rectangle(
        &Box2D::new(
            point(rect.min_x(), rect.min_y()),
            point(rect.max_x(), rect.max_y()),
        ),
        Winding::Positive,
    );
    builder.build()
}

pub fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> Path {
    polyline(&[point(x1, y1), point(x2, y2)], false)
}

/// Path through points, closed on request.
pub fn polyline(points: &[Point], closed: bool) -> Path {
    let mut builder = Path::builder();
    append_polyline(&mut builder, points, closed);
    builder.build()
}

/// Append a sub path through points.
pub fn append_polyline(builder: &mut lyon::path::path::Builder, points: &[Point], closed: bool) {
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        builder.begin(*first);
        for p in iter {
            builder.line_to(*p);
        }
        builder.end(closed);
    }
}

/// Path through points with quadratic curves joining the middle of each edge.
pub fn curved_polyline(points: &[Point], closed: bool) -> Path {
    if points.len() < 3 {
        return polyline(points, closed);
    }
    let mut builder = Path::builder();
    let n = points.len();
    let mid = |a: Point, b: Point| point((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    if closed {
        builder.begin(mid(points[n - 1], points[0]));
        for i in 0..n {
            builder.quadratic_bezier_to(points[i], mid(points[i], points[(i + 1) % n]));
        }
        builder.close();
    } else {
        builder.begin(points[0]);
        for i in 1..n - 1 {
            builder.quadratic_bezier_to(points[i], mid(points[i], points[i + 1]));
        }
        builder.line_to(points[n - 1]);
        builder.end(false);
    }
    builder.build()
}

/// Points of a flattened path, one list per sub path.
pub fn flattened_points(path: &Path) -> Vec<Vec<Point>> {
    use lyon::path::iterator::PathIterator;

    let mut result = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for event in path.iter().flattened(FLATTENING_TOLERANCE) {
        match event {
            lyon::path::Event::Begin { at } => {
                current.clear();
                current.push(at);
            }
            lyon::path::Event::Line { to, .. } => current.push(to),
            lyon::path::Event::End { .. } => {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }
    result
}

/// Corners of a `width` x `depth` rectangle centered on `(x, y)` and rotated
/// by `angle`, clockwise from the back left corner.
pub fn rotated_rect_points(x: f32, y: f32, width: f32, depth: f32, angle: f32) -> [Point; 4] {
    let (sin, cos) = angle.sin_cos();
    let corner = |dx: f32, dy: f32| point(x + dx * cos - dy * sin, y + dx * sin + dy * cos);
    [
        corner(-width / 2.0, -depth / 2.0),
        corner(width / 2.0, -depth / 2.0),
        corner(width / 2.0, depth / 2.0),
        corner(-width / 2.0, depth / 2.0),
    ]
}
