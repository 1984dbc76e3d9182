use csgrs::sketch::Sketch;
use csgrs::traits::CSG;
use lyon::math::{point, Point, Transform};
use lyon::path::Path;
use nalgebra::Matrix4;
use plankit_core::GeometryError;

use super::Rect;

/// One connected polygon of a region, with its holes.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPolygon {
    pub exterior: Vec<Point>,
    pub holes: Vec<Vec<Point>>,
}

/// Planar area built with boolean algebra.
///
/// Wraps a `csgrs` sketch and keeps its contours extracted, so painting and
/// hit testing never go back to the polygon kernel. Two regions are equal
/// when their boundaries are.
#[derive(Debug, Clone)]
pub struct Region {
    sketch: Sketch<()>,
    polygons: Vec<RegionPolygon>,
}

impl Region {
    /// The empty region.
    pub fn empty() -> Self {
        Self {
            sketch: Sketch::new(),
            polygons: Vec::new(),
        }
    }

    /// Region enclosed by a simple polygon.
    pub fn polygon(points: &[Point]) -> Result<Self, GeometryError> {
        let mut coords: Vec<[f64; 2]> = Vec::with_capacity(points.len());
        for p in points {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(GeometryError::NonFiniteCoordinate {
                    x: p.x as f64,
                    y: p.y as f64,
                });
            }
            let c = [p.x as f64, p.y as f64];
            if coords.last() != Some(&c) {
                coords.push(c);
            }
        }
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        if coords.len() < 3 || signed_area_f64(&coords).abs() < f64::EPSILON {
            return Err(GeometryError::DegeneratePolygon {
                points: coords.len(),
            });
        }
        Ok(Self::from_sketch(Sketch::polygon(&coords, None)))
    }

    /// Region of a polygon, empty when the polygon is degenerate.
    pub fn polygon_or_empty(points: &[Point]) -> Self {
        Self::polygon(points).unwrap_or_else(|e| {
            tracing::trace!("Ignoring polygon: {}", e);
            Self::empty()
        })
    }

    pub fn rect(rect: &Rect) -> Self {
        Self::polygon_or_empty(&rect.corners())
    }

    fn from_sketch(sketch: Sketch<()>) -> Self {
        let polygons = sketch
            .to_multipolygon()
            .0
            .iter()
            .map(|poly| RegionPolygon {
                exterior: open_ring(
                    poly.exterior()
                        .0
                        .iter()
                        .map(|c| point(c.x as f32, c.y as f32))
                        .collect(),
                ),
                holes: poly
                    .interiors()
                    .iter()
                    .map(|ring| {
                        open_ring(
                            ring.0
                                .iter()
                                .map(|c| point(c.x as f32, c.y as f32))
                                .collect(),
                        )
                    })
                    .filter(|ring| ring.len() >= 3)
                    .collect(),
            })
            .filter(|poly| poly.exterior.len() >= 3)
            .collect();
        Self { sketch, polygons }
    }

    pub fn union(&self, other: &Region) -> Region {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        Self::from_sketch(self.sketch.union(&other.sketch))
    }

    pub fn intersection(&self, other: &Region) -> Region {
        if self.is_empty() || other.is_empty() {
            return Region::empty();
        }
        Self::from_sketch(self.sketch.intersection(&other.sketch))
    }

    pub fn difference(&self, other: &Region) -> Region {
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        Self::from_sketch(self.sketch.difference(&other.sketch))
    }

    /// Union of every region of an iterator.
    pub fn union_all<'a>(regions: impl IntoIterator<Item = &'a Region>) -> Region {
        regions
            .into_iter()
            .fold(Region::empty(), |acc, region| acc.union(region))
    }

    /// Region transformed by an affine transform.
    pub fn transformed(&self, t: &Transform) -> Region {
        if self.is_empty() {
            return Region::empty();
        }
        let m = Matrix4::new(
            t.m11 as f64,
            t.m21 as f64,
            0.0,
            t.m31 as f64,
            t.m12 as f64,
            t.m22 as f64,
            0.0,
            t.m32 as f64,
            0.0,
            0.0,
            1.0,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        );
        Self::from_sketch(self.sketch.transform(&m))
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn polygons(&self) -> &[RegionPolygon] {
        &self.polygons
    }

    /// Every boundary ring, exteriors and holes.
    pub fn contours(&self) -> impl Iterator<Item = &Vec<Point>> {
        self.polygons
            .iter()
            .flat_map(|poly| std::iter::once(&poly.exterior).chain(poly.holes.iter()))
    }

    /// Even-odd containment test over every ring.
    pub fn contains(&self, p: Point) -> bool {
        self.contours()
            .filter(|ring| ring_contains(ring, p))
            .count()
            % 2
            == 1
    }

    /// Surface in square units.
    pub fn area(&self) -> f32 {
        self.polygons
            .iter()
            .map(|poly| {
                signed_area(&poly.exterior).abs()
                    - poly
                        .holes
                        .iter()
                        .map(|hole| signed_area(hole).abs())
                        .sum::<f32>()
            })
            .sum()
    }

    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(self.polygons.iter().flat_map(|poly| poly.exterior.iter()))
    }

    /// Closed path of every ring, to be filled with the even-odd rule.
    pub fn to_path(&self) -> Path {
        let mut builder = Path::builder();
        for ring in self.contours() {
            let mut first = true;
            for p in ring {
                if first {
                    builder.begin(*p);
                    first = false;
                } else {
                    builder.line_to(*p);
                }
            }
            builder.close();
        }
        builder.build()
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.polygons == other.polygons
    }
}

/// Drop the closing point the polygon kernel repeats at the end of rings.
fn open_ring(mut points: Vec<Point>) -> Vec<Point> {
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Signed shoelace area, positive for clockwise rings in y-down space.
pub(crate) fn signed_area(points: &[Point]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

fn signed_area_f64(points: &[[f64; 2]]) -> f64 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a[0] * b[1] - b[0] * a[1];
    }
    sum / 2.0
}

/// Crossing number containment test of a single ring.
pub(crate) fn ring_contains(ring: &[Point], p: Point) -> bool {
    let n = ring.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, size: f32) -> Region {
        Region::rect(&Rect::new(x, y, size, size))
    }

    #[test]
    fn test_degenerate_polygon() {
        let err = Region::polygon(&[point(0.0, 0.0), point(1.0, 1.0)]).unwrap_err();
        assert_eq!(err, GeometryError::DegeneratePolygon { points: 2 });
        let collinear = [point(0.0, 0.0), point(1.0, 1.0), point(2.0, 2.0)];
        assert!(Region::polygon(&collinear).is_err());
        assert!(Region::polygon_or_empty(&collinear).is_empty());
    }

    #[test]
    fn test_union_of_overlapping_squares() {
        let union = square(0.0, 0.0, 10.0).union(&square(5.0, 0.0, 10.0));
        assert_eq!(union.polygons().len(), 1);
        assert!((union.area() - 150.0).abs() < 0.01);
        assert_eq!(union.bounds(), Some(Rect::new(0.0, 0.0, 15.0, 10.0)));
    }

    #[test]
    fn test_difference_makes_hole() {
        let ring = square(0.0, 0.0, 10.0).difference(&square(3.0, 3.0, 4.0));
        assert!((ring.area() - 84.0).abs() < 0.01);
        assert!(!ring.contains(point(5.0, 5.0)));
        assert!(ring.contains(point(1.0, 1.0)));
    }

    #[test]
    fn test_empty_operands() {
        let a = square(0.0, 0.0, 10.0);
        assert_eq!(a.union(&Region::empty()), a);
        assert!(a.intersection(&Region::empty()).is_empty());
        assert!(Region::union_all(std::iter::empty()).is_empty());
    }
}
