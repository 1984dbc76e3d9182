//! Manipulation indicator glyphs.
//!
//! Glyphs are defined in pixels around their anchor. They are placed by
//! translating to a model point, scaling by `1 / scale` and rotating, so they
//! keep the same on-screen size at every zoom level.

use lyon::math::{point, vector, Angle, Point, Transform};
use lyon::path::Path;
use plankit_core::ItemKind;
use std::f32::consts::PI;
use std::sync::OnceLock;

use crate::geometry::shapes::{append_arc, append_polyline, flattened_points, ArcClosure};
use crate::geometry::{path_bounds, Rect, Region};
use crate::model::{DimensionLine, Furniture, PlanItem};

/// Stroke width of indicators, in pixels.
pub const INDICATOR_STROKE_WIDTH: f32 = 1.5;
/// Stroke width of point markers, in pixels.
pub const POINT_STROKE_WIDTH: f32 = 2.0;

/// Gesture an indicator advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Rotate,
    Resize,
    Elevate,
    ResizeHeight,
    ChangePower,
    MoveText,
    RotateText,
    RotatePitch,
    RotateRoll,
    ArcExtent,
}

impl IndicatorType {
    pub const ALL: [IndicatorType; 10] = [
        IndicatorType::Rotate,
        IndicatorType::Resize,
        IndicatorType::Elevate,
        IndicatorType::ResizeHeight,
        IndicatorType::ChangePower,
        IndicatorType::MoveText,
        IndicatorType::RotateText,
        IndicatorType::RotatePitch,
        IndicatorType::RotateRoll,
        IndicatorType::ArcExtent,
    ];
}

/// What the indicator table needs to know about an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorSubject {
    pub kind: ItemKind,
    pub is_light: bool,
    pub is_elevation_dimension_line: bool,
}

impl IndicatorSubject {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            is_light: false,
            is_elevation_dimension_line: false,
        }
    }

    pub fn of_furniture(piece: &Furniture) -> Self {
        Self {
            is_light: piece.is_light(),
            ..Self::new(ItemKind::Furniture)
        }
    }

    pub fn of_dimension_line(line: &DimensionLine) -> Self {
        Self {
            is_elevation_dimension_line: line.is_elevation_dimension_line(),
            ..Self::new(ItemKind::DimensionLine)
        }
    }

    pub fn of(item: &PlanItem) -> Self {
        match item {
            PlanItem::Furniture(piece) => Self::of_furniture(piece),
            PlanItem::DimensionLine(line) => Self::of_dimension_line(line),
            other => Self::new(other.kind()),
        }
    }
}

/// A stroked pixel-sized shape.
#[derive(Debug, Clone)]
pub struct IndicatorGlyph {
    pub name: &'static str,
    pub path: Path,
}

impl IndicatorGlyph {
    fn new(name: &'static str, path: Path) -> Self {
        Self { name, path }
    }

    /// Transform drawing the glyph at `anchor`, rotated by `angle`, for a
    /// plan drawn at `scale`.
    pub fn placement(anchor: Point, angle: f32, scale: f32) -> Transform {
        Transform::rotation(Angle::radians(angle))
            .then_scale(1.0 / scale, 1.0 / scale)
            .then_translate(anchor.to_vector())
    }

    /// Glyph bounds in its own pixel frame.
    pub fn bounds(&self) -> Rect {
        path_bounds(&self.path).unwrap_or_else(|| Rect::at(point(0.0, 0.0)))
    }
}

/// Glyph of `indicator_type` for `subject`, `None` when the item has no
/// such gesture.
pub fn indicator(
    subject: IndicatorSubject,
    indicator_type: IndicatorType,
) -> Option<&'static IndicatorGlyph> {
    let g = glyphs();
    let kind = subject.kind;
    match indicator_type {
        IndicatorType::Resize => Some(match kind {
            ItemKind::Furniture => &g.furniture_resize,
            ItemKind::Compass => &g.compass_resize,
            _ => &g.wall_and_line_resize,
        }),
        IndicatorType::Rotate => match kind {
            ItemKind::Furniture => Some(&g.furniture_rotation),
            ItemKind::Compass => Some(&g.compass_rotation),
            ItemKind::Camera => Some(&g.camera_yaw_rotation),
            ItemKind::DimensionLine if subject.is_elevation_dimension_line => {
                Some(&g.dimension_line_height_rotation)
            }
            _ => None,
        },
        IndicatorType::Elevate => Some(match kind {
            ItemKind::Camera => &g.camera_elevation,
            _ => &g.elevation,
        }),
        IndicatorType::ResizeHeight => match kind {
            ItemKind::Furniture | ItemKind::DimensionLine => Some(&g.furniture_height),
            _ => None,
        },
        IndicatorType::ChangePower => {
            (kind == ItemKind::Furniture && subject.is_light).then_some(&g.light_power)
        }
        IndicatorType::MoveText => Some(&g.text_location),
        IndicatorType::RotateText => Some(&g.text_angle),
        IndicatorType::RotatePitch => match kind {
            ItemKind::Furniture => Some(&g.furniture_pitch_rotation),
            ItemKind::Camera => Some(&g.camera_pitch_rotation),
            _ => None,
        },
        IndicatorType::RotateRoll => {
            (kind == ItemKind::Furniture).then_some(&g.furniture_roll_rotation)
        }
        IndicatorType::ArcExtent => (kind == ItemKind::Wall).then_some(&g.wall_arc_extent),
    }
}

/// Markers drawn with indicators but not tied to a gesture.
pub struct Marks {
    /// Filled disc at wall and room points.
    pub wall_point: Path,
    /// Chevron showing the wall direction.
    pub wall_orientation: Path,
    /// Small disc under rotation indicators.
    pub point: Path,
    /// Square under elevation and height indicators.
    pub elevation_point: Path,
    /// Dot at a label anchor.
    pub label_center: Path,
    /// Tick at each end of a dimension line, 10 units wide.
    pub dimension_line_end: Path,
    /// Circle of an elevation dimension line.
    pub vertical_dimension_line: Path,
    pub vertical_dimension_line_disc: Path,
    /// Polyline arrow head pointing along +x.
    pub arrow: Path,
}

/// Unit shapes of the compass and the camera, drawn scaled to the item.
pub struct ItemShapes {
    pub compass_disc: Path,
    pub compass_ticks: Path,
    pub compass_needle: Path,
    pub compass_north: Path,
    pub camera_human_body: Path,
    pub camera_human_head: Path,
    pub camera_body: Path,
    pub camera_button: Path,
}

struct Glyphs {
    furniture_rotation: IndicatorGlyph,
    furniture_pitch_rotation: IndicatorGlyph,
    furniture_roll_rotation: IndicatorGlyph,
    elevation: IndicatorGlyph,
    furniture_height: IndicatorGlyph,
    light_power: IndicatorGlyph,
    furniture_resize: IndicatorGlyph,
    wall_arc_extent: IndicatorGlyph,
    wall_and_line_resize: IndicatorGlyph,
    camera_yaw_rotation: IndicatorGlyph,
    camera_pitch_rotation: IndicatorGlyph,
    camera_elevation: IndicatorGlyph,
    text_location: IndicatorGlyph,
    text_angle: IndicatorGlyph,
    compass_rotation: IndicatorGlyph,
    dimension_line_height_rotation: IndicatorGlyph,
    compass_resize: IndicatorGlyph,
    marks: Marks,
    shapes: ItemShapes,
}

pub fn marks() -> &'static Marks {
    &glyphs().marks
}

pub fn item_shapes() -> &'static ItemShapes {
    &glyphs().shapes
}

fn glyphs() -> &'static Glyphs {
    static GLYPHS: OnceLock<Glyphs> = OnceLock::new();
    GLYPHS.get_or_init(build_glyphs)
}

/// Small path language for glyph definitions.
struct Sketch {
    builder: Option<lyon::path::path::Builder>,
    open: bool,
}

impl Sketch {
    fn new() -> Self {
        Self {
            builder: Some(Path::builder()),
            open: false,
        }
    }

    fn b(&mut self) -> &mut lyon::path::path::Builder {
        self.builder.get_or_insert_with(Path::builder)
    }

    fn end_open(&mut self) {
        if self.open {
            self.b().end(false);
            self.open = false;
        }
    }

    fn move_to(mut self, x: f32, y: f32) -> Self {
        self.end_open();
        self.b().begin(point(x, y));
        self.open = true;
        self
    }

    fn line_to(mut self, x: f32, y: f32) -> Self {
        self.b().line_to(point(x, y));
        self
    }

    fn close(mut self) -> Self {
        if self.open {
            self.b().close();
            self.open = false;
        }
        self
    }

    fn ellipse(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.end_open();
        append_arc(self.b(), x, y, w, h, 0.0, 360.0, ArcClosure::Chord);
        self
    }

    fn rect(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.end_open();
        let corners = [
            point(x, y),
            point(x + w, y),
            point(x + w, y + h),
            point(x, y + h),
        ];
        append_polyline(self.b(), &corners, true);
        self
    }

    #[allow(clippy::too_many_arguments)]
    fn arc(mut self, x: f32, y: f32, w: f32, h: f32, start: f32, extent: f32, closure: ArcClosure) -> Self {
        self.end_open();
        append_arc(self.b(), x, y, w, h, start, extent, closure);
        self
    }

    fn build(mut self) -> Path {
        self.end_open();
        self.builder.take().map(|b| b.build()).unwrap_or_else(|| Path::builder().build())
    }
}

fn union_outline(paths: &[Path]) -> Path {
    let regions: Vec<Region> = paths
        .iter()
        .flat_map(flattened_points)
        .map(|ring| Region::polygon_or_empty(&ring))
        .collect();
    Region::union_all(&regions).to_path()
}

fn build_glyphs() -> Glyphs {
    let point_indicator = || Sketch::new().ellipse(-1.5, -1.5, 3.0, 3.0);

    let furniture_rotation = point_indicator()
        .arc(-8.0, -8.0, 16.0, 16.0, 45.0, 180.0, ArcClosure::Open)
        .move_to(2.66, -5.66)
        .line_to(5.66, -5.66)
        .line_to(4.0, -8.3)
        .build();

    let furniture_pitch_rotation = point_indicator()
        .move_to(-4.5, 0.0)
        .line_to(-5.2, 0.0)
        .move_to(-9.0, 0.0)
        .line_to(-10.0, 0.0)
        .arc(-12.0, -8.0, 5.0, 16.0, 200.0, 320.0, ArcClosure::Open)
        .move_to(-10.0, -4.5)
        .line_to(-12.3, -2.0)
        .line_to(-12.8, -5.8)
        .build();

    let roll_transform = Transform::scale(1.0, -1.0).then_rotate(Angle::radians(-PI / 2.0));
    let furniture_roll_rotation = furniture_pitch_rotation.clone().transformed(&roll_transform);

    let elevation = Sketch::new()
        .move_to(0.0, -5.0)
        .line_to(0.0, 5.0)
        .move_to(-2.5, 5.0)
        .line_to(2.5, 5.0)
        .move_to(-1.2, 1.5)
        .line_to(0.0, 4.5)
        .line_to(1.2, 1.5)
        .build();

    let furniture_height = Sketch::new()
        .move_to(0.0, -6.0)
        .line_to(0.0, 6.0)
        .move_to(-2.5, -6.0)
        .line_to(2.5, -6.0)
        .move_to(-2.5, 6.0)
        .line_to(2.5, 6.0)
        .move_to(-1.2, -2.5)
        .line_to(0.0, -5.5)
        .line_to(1.2, -2.5)
        .move_to(-1.2, 2.5)
        .line_to(0.0, 5.5)
        .line_to(1.2, 2.5)
        .build();

    let light_power = Sketch::new()
        .move_to(-8.0, 0.0)
        .line_to(-6.0, 0.0)
        .line_to(-6.0, -1.0)
        .close()
        .move_to(-3.0, 0.0)
        .line_to(-1.0, 0.0)
        .line_to(-1.0, -2.5)
        .line_to(-3.0, -1.8)
        .close()
        .move_to(2.0, 0.0)
        .line_to(4.0, 0.0)
        .line_to(4.0, -3.5)
        .line_to(2.0, -2.8)
        .close()
        .build();

    let furniture_resize = Sketch::new()
        .rect(-1.5, -1.5, 3.0, 3.0)
        .move_to(5.0, -4.0)
        .line_to(7.0, -4.0)
        .line_to(7.0, 7.0)
        .line_to(-4.0, 7.0)
        .line_to(-4.0, 5.0)
        .move_to(3.5, 3.5)
        .line_to(9.0, 9.0)
        .move_to(7.0, 9.5)
        .line_to(10.0, 10.0)
        .line_to(9.5, 7.0)
        .build();

    let wall_arc_extent = Sketch::new()
        .arc(-4.0, 1.0, 8.0, 5.0, 210.0, 120.0, ArcClosure::Open)
        .move_to(0.0, 6.0)
        .line_to(0.0, 11.0)
        .move_to(-1.8, 8.7)
        .line_to(0.0, 12.0)
        .line_to(1.8, 8.7)
        .build();

    let wall_and_line_resize = Sketch::new()
        .move_to(5.0, -2.0)
        .line_to(5.0, 2.0)
        .move_to(6.0, 0.0)
        .line_to(11.0, 0.0)
        .move_to(8.7, -1.8)
        .line_to(12.0, 0.0)
        .line_to(8.7, 1.8)
        .build();

    let camera_yaw_rotation = furniture_rotation
        .clone()
        .transformed(&Transform::rotation(Angle::radians(-PI / 4.0)));
    let camera_pitch_rotation = furniture_pitch_rotation
        .clone()
        .transformed(&Transform::rotation(Angle::radians(PI)));

    let camera_elevation = Sketch::new()
        .move_to(0.0, -4.0)
        .line_to(0.0, 4.0)
        .move_to(-2.5, 4.0)
        .line_to(2.5, 4.0)
        .move_to(-1.2, 0.5)
        .line_to(0.0, 3.5)
        .line_to(1.2, 0.5)
        .build();

    let text_location = Sketch::new()
        .arc(-2.0, 0.0, 4.0, 4.0, 190.0, 160.0, ArcClosure::Chord)
        .move_to(0.0, 4.0)
        .line_to(0.0, 12.0)
        .move_to(-1.2, 8.5)
        .line_to(0.0, 11.5)
        .line_to(1.2, 8.5)
        .move_to(2.0, 3.0)
        .line_to(9.0, 6.0)
        .move_to(6.0, 6.5)
        .line_to(10.0, 7.0)
        .line_to(7.5, 3.5)
        .move_to(-2.0, 3.0)
        .line_to(-9.0, 6.0)
        .move_to(-6.0, 6.5)
        .line_to(-10.0, 7.0)
        .line_to(-7.5, 3.5)
        .build();

    let text_angle = Sketch::new()
        .arc(-1.25, -1.25, 2.5, 2.5, 10.0, 160.0, ArcClosure::Chord)
        .arc(-8.0, -8.0, 16.0, 16.0, 30.0, 120.0, ArcClosure::Open)
        .move_to(4.0, -5.2)
        .line_to(6.9, -4.0)
        .line_to(5.8, -7.0)
        .build();

    let compass_rotation = point_indicator()
        .arc(-8.0, -7.0, 16.0, 16.0, 210.0, 120.0, ArcClosure::Open)
        .move_to(4.0, 5.66)
        .line_to(7.0, 5.66)
        .line_to(5.6, 8.3)
        .build();
    let dimension_line_height_rotation = compass_rotation
        .clone()
        .transformed(&Transform::rotation(Angle::radians(PI / 2.0)));

    let compass_resize = Sketch::new()
        .rect(-1.5, -1.5, 3.0, 3.0)
        .move_to(4.0, -6.0)
        .line_to(6.0, -6.0)
        .line_to(6.0, 6.0)
        .line_to(4.0, 6.0)
        .move_to(5.0, 0.0)
        .line_to(9.0, 0.0)
        .move_to(9.0, -1.5)
        .line_to(12.0, 0.0)
        .line_to(9.0, 1.5)
        .build();

    let marks = Marks {
        wall_point: Sketch::new().ellipse(-3.0, -3.0, 6.0, 6.0).build(),
        wall_orientation: Sketch::new()
            .move_to(-4.0, -4.0)
            .line_to(4.0, 0.0)
            .line_to(-4.0, 4.0)
            .build(),
        point: point_indicator().build(),
        elevation_point: Sketch::new().rect(-1.5, -1.5, 3.0, 3.0).build(),
        label_center: Sketch::new().ellipse(-1.0, -1.0, 2.0, 2.0).build(),
        dimension_line_end: Sketch::new()
            .move_to(-5.0, 5.0)
            .line_to(5.0, -5.0)
            .move_to(0.0, 5.0)
            .line_to(0.0, -5.0)
            .build(),
        vertical_dimension_line: Sketch::new().ellipse(-5.0, -5.0, 10.0, 10.0).build(),
        vertical_dimension_line_disc: Sketch::new().ellipse(-1.5, -1.5, 3.0, 3.0).build(),
        arrow: Sketch::new()
            .move_to(-5.0, -2.0)
            .line_to(0.0, 0.0)
            .line_to(-5.0, 2.0)
            .build(),
    };

    let shapes = ItemShapes {
        compass_disc: Sketch::new().ellipse(-0.5, -0.5, 1.0, 1.0).build(),
        compass_ticks: Sketch::new()
            .move_to(-0.6, 0.0)
            .line_to(-0.5, 0.0)
            .move_to(0.6, 0.0)
            .line_to(0.5, 0.0)
            .move_to(0.0, 0.6)
            .line_to(0.0, 0.5)
            .build(),
        compass_needle: Sketch::new()
            .move_to(0.0, -0.47)
            .line_to(0.15, 0.46)
            .line_to(0.0, 0.32)
            .line_to(-0.15, 0.46)
            .close()
            .build(),
        compass_north: Sketch::new()
            .move_to(-0.07, -0.55)
            .line_to(-0.07, -0.69)
            .line_to(0.07, -0.56)
            .line_to(0.07, -0.7)
            .build(),
        camera_human_body: union_outline(&[
            Sketch::new().ellipse(-0.5, -0.425, 1.0, 0.85).build(),
            Sketch::new().ellipse(-0.5, -0.3, 0.24, 0.6).build(),
            Sketch::new().ellipse(0.26, -0.3, 0.24, 0.6).build(),
        ]),
        camera_human_head: union_outline(&[
            Sketch::new().ellipse(-0.18, -0.45, 0.36, 1.0).build(),
            Sketch::new()
                .move_to(-0.04, 0.55)
                .line_to(0.0, 0.65)
                .line_to(0.04, 0.55)
                .close()
                .build(),
        ]),
        camera_body: Sketch::new()
            .move_to(0.5, 0.3)
            .line_to(0.45, 0.35)
            .line_to(0.2, 0.35)
            .line_to(0.2, 0.5)
            .line_to(-0.2, 0.5)
            .line_to(-0.2, 0.35)
            .line_to(-0.3, 0.35)
            .line_to(-0.35, 0.5)
            .line_to(-0.5, 0.3)
            .line_to(-0.5, -0.45)
            .line_to(-0.45, -0.5)
            .line_to(0.45, -0.5)
            .line_to(0.5, -0.45)
            .close()
            .build(),
        camera_button: Sketch::new().ellipse(-0.37, -0.2, 0.15, 0.32).build(),
    };

    Glyphs {
        furniture_rotation: IndicatorGlyph::new("furniture_rotation", furniture_rotation),
        furniture_pitch_rotation: IndicatorGlyph::new(
            "furniture_pitch_rotation",
            furniture_pitch_rotation,
        ),
        furniture_roll_rotation: IndicatorGlyph::new(
            "furniture_roll_rotation",
            furniture_roll_rotation,
        ),
        elevation: IndicatorGlyph::new("elevation", elevation),
        furniture_height: IndicatorGlyph::new("height", furniture_height),
        light_power: IndicatorGlyph::new("light_power", light_power),
        furniture_resize: IndicatorGlyph::new("furniture_resize", furniture_resize),
        wall_arc_extent: IndicatorGlyph::new("wall_arc_extent", wall_arc_extent),
        wall_and_line_resize: IndicatorGlyph::new("wall_and_line_resize", wall_and_line_resize),
        camera_yaw_rotation: IndicatorGlyph::new("camera_yaw_rotation", camera_yaw_rotation),
        camera_pitch_rotation: IndicatorGlyph::new("camera_pitch_rotation", camera_pitch_rotation),
        camera_elevation: IndicatorGlyph::new("camera_elevation", camera_elevation),
        text_location: IndicatorGlyph::new("text_location", text_location),
        text_angle: IndicatorGlyph::new("text_angle", text_angle),
        compass_rotation: IndicatorGlyph::new("compass_rotation", compass_rotation),
        dimension_line_height_rotation: IndicatorGlyph::new(
            "dimension_line_height_rotation",
            dimension_line_height_rotation,
        ),
        compass_resize: IndicatorGlyph::new("compass_resize", compass_resize),
        marks,
        shapes,
    }
}

/// Orientation of resize indicators at each point of a shape.
///
/// Inner points use the bisector of the normals of their two edges. Closed
/// shapes flip it to point outside, probing one unit along it with
/// `contains`; open ones flip it toward the inner side of the turn. Ends of
/// open shapes take `angle_at_start` and `angle_at_end`.
pub fn point_indicator_angles(
    points: &[Point],
    closed: bool,
    angle_at_start: f32,
    angle_at_end: f32,
    contains: Option<&dyn Fn(Point) -> bool>,
) -> Vec<f32> {
    let n = points.len();
    (0..n)
        .map(|i| {
            if !closed && i == 0 {
                return angle_at_start;
            }
            if !closed && i == n - 1 {
                return angle_at_end;
            }
            let p = points[i];
            let previous = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            let d1 = (p - previous).length().max(f32::EPSILON);
            let d2 = (next - p).length().max(f32::EPSILON);
            let n1 = vector((p.y - previous.y) / d1, (previous.x - p.x) / d1);
            let n2 = vector((next.y - p.y) / d2, (p.x - next.x) / d2);
            let mut angle = (n1.y + n2.y).atan2(n1.x + n2.x);
            let flip = match contains {
                Some(contains) => contains(p + vector(angle.cos(), angle.sin())),
                None => n1.x * n2.y - n1.y * n2.x < 0.0,
            };
            if flip {
                angle += PI;
            }
            angle
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_item_gestures() {
        let wall = IndicatorSubject::new(ItemKind::Wall);
        assert!(indicator(wall, IndicatorType::ArcExtent).is_some());
        assert!(indicator(wall, IndicatorType::Rotate).is_none());
        assert_eq!(
            indicator(wall, IndicatorType::Resize).map(|g| g.name),
            Some("wall_and_line_resize")
        );

        let lamp = Furniture::light("Lamp", 0.0, 0.0, 30.0, 0.5);
        assert!(indicator(IndicatorSubject::of_furniture(&lamp), IndicatorType::ChangePower).is_some());
        let chair = Furniture::new("Chair", 0.0, 0.0, 40.0, 40.0, 90.0);
        assert!(indicator(IndicatorSubject::of_furniture(&chair), IndicatorType::ChangePower).is_none());

        let camera = IndicatorSubject::new(ItemKind::Camera);
        assert_eq!(
            indicator(camera, IndicatorType::Elevate).map(|g| g.name),
            Some("camera_elevation")
        );
        assert!(indicator(camera, IndicatorType::RotateRoll).is_none());
    }

    #[test]
    fn test_glyphs_are_shared() {
        let subject = IndicatorSubject::new(ItemKind::Room);
        let a = indicator(subject, IndicatorType::MoveText).expect("glyph");
        let b = indicator(subject, IndicatorType::MoveText).expect("glyph");
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_square_corners_point_outward() {
        let square = [
            point(0.0, 0.0),
            point(100.0, 0.0),
            point(100.0, 100.0),
            point(0.0, 100.0),
        ];
        let region = Region::polygon_or_empty(&square);
        let contains = |p: Point| region.contains(p);
        let angles = point_indicator_angles(&square, true, 0.0, 0.0, Some(&contains));
        // First corner points up-left, away from the square.
        let (sin, cos) = angles[0].sin_cos();
        assert!(cos < 0.0 && sin < 0.0);
        let (sin, cos) = angles[2].sin_cos();
        assert!(cos > 0.0 && sin > 0.0);
    }
}
