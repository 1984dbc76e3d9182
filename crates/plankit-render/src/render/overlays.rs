//! Painters of the interactive layers: selection outlines with their
//! indicators, the observer camera and the feedback of the current gesture.

use lyon::math::{point, vector, Angle, Point, Transform};
use lyon::path::Path;
use plankit_core::{Color, ItemKind, RenderError};
use std::f32::consts::PI;

use super::items::{paint_dimension_line, paint_piece, paint_polyline};
use super::painter::PaintContext;
use super::surface::{faded, Fill, StrokeStyle, Surface};
use crate::alignment::{point_feedback_shapes, AlignmentFeedback};
use crate::cache::bounds::compass_transform;
use crate::geometry::{distance, shapes, Region};
use crate::indicators::{
    indicator, item_shapes, marks, point_indicator_angles, IndicatorGlyph, IndicatorSubject, IndicatorType,
    INDICATOR_STROKE_WIDTH, POINT_STROKE_WIDTH,
};
use crate::model::{Camera, CapStyle, Furniture, JoinStyle, PlanItem, Room, Wall};
use crate::text::item_texts;

const SELECTION_OUTLINE_WIDTH: f32 = 6.0;
const TEXT_OUTLINE_WIDTH: f32 = 4.0;

fn midpoint(a: Point, b: Point) -> Point {
    a.lerp(b, 0.5)
}

/// Shapes outlined around a selected item with their width in pixels.
fn selection_outlines(ctx: &mut PaintContext, item: &PlanItem) -> Vec<(Path, f32)> {
    let home = ctx.home;
    let mut outlines = match item {
        PlanItem::Wall(wall) => vec![(shapes::polyline(&home.wall_points(wall), true), SELECTION_OUTLINE_WIDTH)],
        PlanItem::Room(room) => vec![(shapes::polyline(&room.points, true), SELECTION_OUTLINE_WIDTH)],
        PlanItem::Furniture(piece) => vec![(shapes::polyline(&piece.points(), true), SELECTION_OUTLINE_WIDTH)],
        PlanItem::Polyline(polyline) => {
            let width = SELECTION_OUTLINE_WIDTH + polyline.thickness * ctx.scale;
            vec![(shapes::polyline(&polyline.points, polyline.closed_path), width)]
        }
        PlanItem::DimensionLine(line) => vec![(shapes::polyline(&line.points(), false), TEXT_OUTLINE_WIDTH)],
        PlanItem::Compass(compass) => {
            let disc = item_shapes().compass_disc.clone().transformed(&compass_transform(compass));
            vec![(disc, SELECTION_OUTLINE_WIDTH)]
        }
        PlanItem::Camera(camera) => vec![(shapes::polyline(&camera.points(), true), SELECTION_OUTLINE_WIDTH)],
        PlanItem::Label(_) => Vec::new(),
    };
    if let Some(bounds) = ctx.cache.cached_text_bounds(item, ctx.preferences) {
        if matches!(item, PlanItem::Room(_) | PlanItem::Furniture(_) | PlanItem::Label(_)) {
            outlines.push((shapes::rect(&bounds), TEXT_OUTLINE_WIDTH));
        }
    }
    outlines
}

fn draw_indicator(
    ctx: &PaintContext,
    surface: &mut dyn Surface,
    subject: IndicatorSubject,
    indicator_type: IndicatorType,
    anchor: Point,
    angle: f32,
) {
    let Some(glyph) = indicator(subject, indicator_type) else {
        return;
    };
    surface.save();
    surface.concat(&IndicatorGlyph::placement(anchor, angle, ctx.scale));
    surface.stroke_path(&glyph.path, ctx.foreground, &StrokeStyle::new(INDICATOR_STROKE_WIDTH));
    surface.restore();
}

/// Filled, or stroked with a width in pixels.
#[derive(Clone, Copy)]
enum Pen {
    Fill,
    Stroke(f32),
}

fn draw_mark(surface: &mut dyn Surface, mark: &Path, placement: &Transform, color: Color, pen: Pen) {
    surface.save();
    surface.concat(placement);
    match pen {
        Pen::Fill => surface.fill_color(mark, color),
        Pen::Stroke(width) => surface.stroke_path(mark, color, &StrokeStyle::new(width)),
    }
    surface.restore();
}

/// Point `(dx, dy)` pixels away from `anchor` in a frame turned by `angle`.
fn offset_anchor(anchor: Point, angle: f32, dx: f32, dy: f32, scale: f32) -> Point {
    anchor + Transform::rotation(Angle::radians(angle)).transform_vector(vector(dx, dy)) / scale
}

/// Indicator drawn upright next to a square point mark, like elevation and
/// height handles.
fn draw_pointed_indicator(
    ctx: &PaintContext,
    surface: &mut dyn Surface,
    subject: IndicatorSubject,
    indicator_type: IndicatorType,
    anchor: Point,
    angle: f32,
    offset: (f32, f32),
) {
    if indicator(subject, indicator_type).is_none() {
        return;
    }
    let placement = IndicatorGlyph::placement(anchor, angle, ctx.scale);
    draw_mark(surface, &marks().elevation_point, &placement, ctx.foreground, Pen::Stroke(INDICATOR_STROKE_WIDTH));
    let glyph_anchor = offset_anchor(anchor, angle, offset.0, offset.1, ctx.scale);
    draw_indicator(ctx, surface, subject, indicator_type, glyph_anchor, 0.0);
}

/// Discs at the ends of a selected wall and chevrons showing its direction.
///
/// Walls shorter than 30 pixels on screen get a single chevron at their
/// middle; longer ones get one past the start and one before the end,
/// tangent to the arc for round walls.
fn paint_wall_marks(ctx: &PaintContext, surface: &mut dyn Surface, wall: &Wall) {
    let (scale, color) = (ctx.scale, ctx.selection);
    let marks = marks();
    let chevron = Pen::Stroke(POINT_STROKE_WIDTH);
    let (start, end) = (wall.start(), wall.end());
    let wall_angle = wall.angle();
    let arc = wall.arc_center().zip(wall.arc_extent);
    let (start_angle, span) = match arc {
        Some((center, extent)) => {
            let radius = distance(start, center);
            let turn = if extent > 0.0 { -PI / 2.0 } else { PI / 2.0 };
            ((center - start).angle_from_x_axis().radians + turn, radius * extent.abs() * scale)
        }
        None => (wall_angle, wall.length() * scale),
    };

    draw_mark(surface, &marks.wall_point, &IndicatorGlyph::placement(start, 0.0, scale), color, Pen::Fill);
    draw_mark(surface, &marks.wall_point, &IndicatorGlyph::placement(end, 0.0, scale), color, Pen::Fill);
    if span < 30.0 {
        let middle = match arc {
            Some((center, extent)) => {
                center + Transform::rotation(Angle::radians(extent / 2.0)).transform_vector(start - center)
            }
            None => midpoint(start, end),
        };
        draw_mark(surface, &marks.wall_orientation, &IndicatorGlyph::placement(middle, wall_angle, scale), color, chevron);
    } else {
        let end_angle = start_angle + arc.map_or(0.0, |(_, extent)| extent);
        let after_start = offset_anchor(start, start_angle, 8.0, 0.0, scale);
        let before_end = offset_anchor(end, end_angle, -10.0, 0.0, scale);
        for (anchor, angle) in [(after_start, start_angle), (before_end, end_angle)] {
            draw_mark(surface, &marks.wall_orientation, &IndicatorGlyph::placement(anchor, angle, scale), color, chevron);
        }
    }
}

fn paint_room_marks(ctx: &PaintContext, surface: &mut dyn Surface, room: &Room) {
    for p in &room.points {
        let placement = IndicatorGlyph::placement(*p, 0.0, ctx.scale);
        draw_mark(surface, &marks().wall_point, &placement, ctx.selection, Pen::Fill);
    }
}

/// Footprints of the visible pieces of a group, nested groups flattened.
fn visible_child_footprints(group: &Furniture, footprints: &mut Vec<Path>) {
    for child in group.children().iter().filter(|child| child.visible) {
        if child.is_group() {
            visible_child_footprints(child, footprints);
        } else {
            footprints.push(shapes::polyline(&child.points(), true));
        }
    }
}

/// Resize indicators at each point of a shape, oriented away from it.
fn point_indicators(ctx: &PaintContext, surface: &mut dyn Surface, subject: IndicatorSubject, points: &[Point], closed: bool) {
    let angles = if closed {
        let region = Region::polygon_or_empty(points);
        let contains = |p: Point| region.contains(p);
        point_indicator_angles(points, true, 0.0, 0.0, Some(&contains))
    } else {
        let n = points.len();
        if n < 2 {
            return;
        }
        let at_start = (points[0] - points[1]).angle_from_x_axis().radians;
        let at_end = (points[n - 1] - points[n - 2]).angle_from_x_axis().radians;
        point_indicator_angles(points, false, at_start, at_end, None)
    };
    for (p, angle) in points.iter().zip(angles) {
        draw_indicator(ctx, surface, subject, IndicatorType::Resize, *p, angle);
    }
}

/// Move and rotate indicators of the texts of an item.
fn text_indicators(ctx: &PaintContext, surface: &mut dyn Surface, item: &PlanItem) {
    let subject = IndicatorSubject::of(item);
    for text in item_texts(item, ctx.preferences) {
        let anchor = point(text.x, text.y);
        draw_indicator(ctx, surface, subject, IndicatorType::MoveText, anchor, text.angle);
        let half_width = text.layout(ctx.default_font()).width() / 2.0;
        let end = anchor + Transform::rotation(Angle::radians(text.angle)).transform_vector(vector(half_width, 0.0));
        draw_indicator(ctx, surface, subject, IndicatorType::RotateText, end, text.angle);
    }
}

/// Indicators of the gestures available on the only selected item.
fn paint_indicators(ctx: &PaintContext, surface: &mut dyn Surface, item: &PlanItem) {
    let subject = IndicatorSubject::of(item);
    match item {
        PlanItem::Wall(wall) => {
            let angle = wall.angle();
            draw_indicator(ctx, surface, subject, IndicatorType::Resize, wall.start(), angle + PI);
            draw_indicator(ctx, surface, subject, IndicatorType::Resize, wall.end(), angle);
            let middle = midpoint(wall.start(), wall.end());
            draw_indicator(ctx, surface, subject, IndicatorType::ArcExtent, middle, angle);
        }
        PlanItem::Room(room) => {
            point_indicators(ctx, surface, subject, &room.points, true);
            text_indicators(ctx, surface, item);
        }
        PlanItem::Polyline(polyline) => {
            point_indicators(ctx, surface, subject, &polyline.points, polyline.closed_path);
        }
        PlanItem::Furniture(piece) => {
            let [p0, p1, p2, p3] = piece.points();
            let angle = piece.angle;
            draw_indicator(ctx, surface, subject, IndicatorType::Rotate, p0, angle);
            draw_pointed_indicator(ctx, surface, subject, IndicatorType::Elevate, p1, angle, (6.5, -6.5));
            // One handle at the front right corner.
            let sized_in_plan = ctx.size_oracle.is_some();
            if piece.pitch != 0.0 && sized_in_plan {
                draw_indicator(ctx, surface, subject, IndicatorType::RotatePitch, p3, angle);
            } else if piece.roll != 0.0 && sized_in_plan {
                draw_indicator(ctx, surface, subject, IndicatorType::RotateRoll, p3, angle);
            } else if piece.is_light() {
                draw_pointed_indicator(ctx, surface, subject, IndicatorType::ChangePower, p3, angle, (-7.5, 7.5));
            } else if piece.resizable && !piece.is_horizontally_rotated() {
                draw_pointed_indicator(ctx, surface, subject, IndicatorType::ResizeHeight, p3, angle, (-7.5, 7.5));
            }
            if piece.resizable {
                draw_indicator(ctx, surface, subject, IndicatorType::Resize, p2, angle);
            }
            text_indicators(ctx, surface, item);
        }
        PlanItem::DimensionLine(line) => {
            let [_, _, end, start] = line.points();
            let angle = line.angle();
            draw_indicator(ctx, surface, subject, IndicatorType::Resize, start, angle + PI);
            draw_indicator(ctx, surface, subject, IndicatorType::Resize, end, angle);
            if line.is_elevation_dimension_line() {
                draw_indicator(ctx, surface, subject, IndicatorType::Rotate, end, angle);
            } else {
                draw_indicator(ctx, surface, subject, IndicatorType::ResizeHeight, midpoint(start, end), angle);
            }
        }
        PlanItem::Label(label) => {
            let center = IndicatorGlyph::placement(label.location(), label.angle, ctx.scale);
            draw_mark(surface, &marks().label_center, &center, ctx.foreground, Pen::Stroke(INDICATOR_STROKE_WIDTH));
            draw_indicator(ctx, surface, subject, IndicatorType::RotateText, label.location(), label.angle);
            if label.pitch.is_some() {
                draw_indicator(ctx, surface, subject, IndicatorType::Elevate, label.location(), label.angle);
            }
        }
        PlanItem::Compass(compass) => {
            let [p0, _, p2, _] = compass.points();
            draw_indicator(ctx, surface, subject, IndicatorType::Rotate, p0, compass.north_direction);
            draw_indicator(ctx, surface, subject, IndicatorType::Resize, p2, compass.north_direction);
        }
        // Camera indicators belong to the camera layer.
        PlanItem::Camera(_) => {}
    }
}

pub(super) fn paint_selection(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let home = ctx.home;
    let selected: Vec<&PlanItem> = home
        .selected_items()
        .iter()
        .filter_map(|id| home.item(*id))
        .filter(|item| home.is_viewable_at_selected_level(item))
        .collect();
    if selected.is_empty() {
        return Ok(());
    }
    let outline = faded(ctx.selection, 0.5);
    for item in &selected {
        for (path, pixels) in selection_outlines(ctx, item) {
            surface.stroke_path(&path, outline, &StrokeStyle::round(pixels / ctx.scale));
        }
        match item {
            PlanItem::Wall(wall) => paint_wall_marks(ctx, surface, wall),
            PlanItem::Room(room) => paint_room_marks(ctx, surface, room),
            PlanItem::Furniture(piece) if piece.is_group() => {
                let mut footprints = Vec::new();
                visible_child_footprints(piece, &mut footprints);
                for footprint in &footprints {
                    surface.stroke_path(footprint, ctx.foreground, &ctx.stroke(1.0));
                }
            }
            _ => {}
        }
    }
    let resize_indicator_visible = ctx.feedback.is_some_and(|f| f.resize_indicator_visible);
    if let [item] = selected.as_slice() {
        if resize_indicator_visible {
            paint_indicators(ctx, surface, item);
        }
    }
    Ok(())
}

/// Human or camera glyph of `camera` in its own frame, looking down +y.
fn camera_shapes(camera: &Camera) -> Vec<(Path, bool)> {
    let [p0, p1, p2, _] = camera.points();
    let (width, depth) = (distance(p0, p1), distance(p1, p2));
    let scale = Transform::scale(width, depth);
    let shapes = item_shapes();
    if camera.plan_scale > 1.0 {
        vec![
            (shapes.camera_body.clone().transformed(&scale), true),
            (shapes.camera_button.clone().transformed(&scale), false),
        ]
    } else {
        vec![
            (shapes.camera_human_body.clone().transformed(&scale), true),
            (shapes.camera_human_head.clone().transformed(&scale), true),
        ]
    }
}

fn field_of_view_lines(camera: &Camera, depth: f32) -> Path {
    let (sin, cos) = (camera.field_of_view / 2.0).sin_cos();
    let mut builder = Path::builder();
    for side in [-1.0, 1.0] {
        builder.begin(point(side * 0.9 * depth * sin, 0.9 * depth * cos));
        builder.line_to(point(side * 2.2 * depth * sin, 2.2 * depth * cos));
        builder.end(false);
    }
    builder.build()
}

pub(super) fn paint_camera(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let Some(camera) = ctx.home.camera().filter(|camera| camera.active) else {
        return Ok(());
    };
    let points = camera.points();
    let depth = distance(points[1], points[2]);

    surface.save();
    surface.translate(camera.x, camera.y);
    surface.rotate(camera.yaw);
    for (path, filled) in camera_shapes(camera) {
        if filled {
            surface.fill_color(&path, ctx.background);
        }
        surface.stroke_path(&path, ctx.foreground, &ctx.stroke(1.0));
    }
    surface.stroke_path(&field_of_view_lines(camera, depth), ctx.foreground, &ctx.stroke(1.0));
    surface.restore();

    let only_selection = ctx.home.selected_items() == [camera.id];
    let resize_indicator_visible = ctx.feedback.is_some_and(|f| f.resize_indicator_visible);
    if only_selection && resize_indicator_visible {
        let subject = IndicatorSubject::new(ItemKind::Camera);
        draw_indicator(ctx, surface, subject, IndicatorType::Rotate, midpoint(points[0], points[3]), camera.yaw);
        draw_indicator(ctx, surface, subject, IndicatorType::RotatePitch, midpoint(points[1], points[2]), camera.yaw);
        let side = midpoint(points[0], points[1]);
        let pen = Pen::Stroke(INDICATOR_STROKE_WIDTH);
        draw_mark(surface, &marks().point, &IndicatorGlyph::placement(side, 0.0, ctx.scale), ctx.foreground, pen);
        let (sin, cos) = camera.yaw.sin_cos();
        let anchor = side + vector(sin * 8.0, -cos * 8.0) / ctx.scale;
        draw_indicator(ctx, surface, subject, IndicatorType::Elevate, anchor, 0.0);
    }
    Ok(())
}

pub(super) fn paint_alignment_feedback(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let Some(request) = ctx.feedback.and_then(|f| f.alignment) else {
        return Ok(());
    };
    let home = ctx.home;
    let level = home.selected_level();
    let ghosts = ctx.cache.other_levels(home);
    let feedback =
        AlignmentFeedback::compute_with_ghosts(home, level, &ghosts, request.aligned, request.point, ctx.scale);
    let touch = ctx.is_touch();

    let scale = ctx.scale;
    let pen = StrokeStyle::new(1.0 / scale)
        .with_cap(CapStyle::Square)
        .with_join(JoinStyle::Bevel)
        .with_dash(vec![20.0 / scale, 5.0 / scale, 5.0 / scale, 5.0 / scale], 4.0 / scale);
    for (from, to) in feedback.guides(scale, touch) {
        surface.stroke_path(&shapes::line(from.x, from.y, to.x, to.y), ctx.foreground, &pen);
    }

    if request.show_point_feedback {
        let (circle, cross) = point_feedback_shapes(request.point, scale, touch);
        surface.fill_path(&circle, &Fill::Solid(faded(ctx.selection, 0.5)));
        let pen = StrokeStyle::new(1.0 / scale);
        surface.stroke_path(&circle, ctx.selection, &pen);
        surface.stroke_path(&cross, ctx.selection, &pen);
    }
    Ok(())
}

pub(super) fn paint_angle_feedback(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let Some((arc, sides)) = ctx.feedback.and_then(|f| f.angle).and_then(|a| a.shapes(ctx.scale)) else {
        return Ok(());
    };
    let pen = StrokeStyle::new(1.0 / ctx.scale);
    surface.stroke_path(&arc, ctx.foreground, &pen);
    surface.stroke_path(&sides, ctx.foreground, &pen);
    Ok(())
}

pub(super) fn paint_dimension_lines_feedback(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let Some(feedback) = ctx.feedback else {
        return Ok(());
    };
    for line in &feedback.dimension_lines {
        paint_dimension_line(ctx, surface, line, ctx.selection);
    }
    Ok(())
}

pub(super) fn paint_dragged_items_feedback(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let Some(feedback) = ctx.feedback else {
        return Ok(());
    };
    let outline = ctx.stroke(1.5);
    for item in &feedback.dragged_items {
        match item {
            PlanItem::DimensionLine(line) => paint_dimension_line(ctx, surface, line, ctx.foreground),
            PlanItem::Label(_) => {
                for text in item_texts(item, ctx.preferences) {
                    ctx.draw_text(surface, &text, ctx.foreground);
                }
            }
            PlanItem::Room(room) => {
                surface.stroke_path(&shapes::polyline(&room.points, true), ctx.foreground, &outline);
            }
            PlanItem::Wall(wall) => {
                let points = ctx.home.wall_points(wall);
                surface.stroke_path(&shapes::polyline(&points, true), ctx.foreground, &outline);
            }
            PlanItem::Furniture(piece) => {
                paint_piece(ctx, surface, piece);
                surface.stroke_path(&shapes::polyline(&piece.points(), true), ctx.foreground, &outline);
            }
            PlanItem::Polyline(polyline) => paint_polyline(ctx, surface, polyline, polyline.color),
            PlanItem::Compass(_) | PlanItem::Camera(_) => {}
        }
    }
    Ok(())
}

pub(super) fn paint_rectangle_feedback(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let Some(rectangle) = ctx.feedback.and_then(|f| f.rectangle) else {
        return Ok(());
    };
    let path = shapes::rect(&rectangle);
    surface.fill_color(&path, ctx.selection.with_alpha(32));
    surface.stroke_path(&path, ctx.selection, &StrokeStyle::new(1.0 / ctx.scale));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::AlignedObject;
    use crate::cache::DerivedGeometryCache;
    use crate::feedback::PlanFeedback;
    use crate::geometry::transformed_path_bounds;
    use crate::model::{FurnitureSizeOracle, Home};
    use crate::render::{DrawOp, Layer, PaintMode, PlanPainter, RecordingSurface};
    use plankit_core::ItemProperty;
    use plankit_settings::Preferences;

    fn paint(home: &Home, feedback: &PlanFeedback, scale: f32) -> RecordingSurface {
        let prefs = Preferences::default();
        let mut cache = DerivedGeometryCache::default();
        let mut surface = RecordingSurface::new(Transform::scale(scale, scale));
        PlanPainter::new(home, &prefs, &mut cache)
            .with_feedback(feedback)
            .paint(&mut surface, scale, PaintMode::Paint)
            .expect("paint");
        surface
    }

    fn stroke_bounds(surface: &RecordingSurface, layer: Layer) -> Vec<crate::geometry::Rect> {
        surface
            .ops_in(layer)
            .filter_map(|op| match op {
                DrawOp::Stroke { bounds, .. } => *bounds,
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_indicators_only_for_single_selection() {
        let mut home = Home::default();
        let a = home.add_item(Wall::new(0.0, 0.0, 300.0, 0.0, 20.0));
        let b = home.add_item(Wall::new(0.0, 200.0, 300.0, 200.0, 20.0));
        let mut feedback = PlanFeedback::default();
        feedback.resize_indicator_visible = true;

        home.set_selected_items([a]);
        let single = paint(&home, &feedback, 1.0);
        // outline, two direction chevrons, two resize and one arc extent indicator
        assert_eq!(stroke_bounds(&single, Layer::Selection).len(), 6);

        home.set_selected_items([a, b]);
        let double = paint(&home, &feedback, 1.0);
        assert_eq!(stroke_bounds(&double, Layer::Selection).len(), 6);

        feedback.resize_indicator_visible = false;
        home.set_selected_items([a]);
        let hidden = paint(&home, &feedback, 1.0);
        assert_eq!(stroke_bounds(&hidden, Layer::Selection).len(), 3);
    }

    #[test]
    fn test_indicator_size_independent_of_scale() {
        let mut home = Home::default();
        let wall = home.add_item(Wall::new(0.0, 0.0, 300.0, 0.0, 20.0));
        home.set_selected_items([wall]);
        let mut feedback = PlanFeedback::default();
        feedback.resize_indicator_visible = true;

        let glyph_size = |scale: f32| {
            let surface = paint(&home, &feedback, scale);
            let bounds = stroke_bounds(&surface, Layer::Selection);
            let glyph = bounds.last().expect("indicator");
            (glyph.width, glyph.height)
        };
        let (w1, h1) = glyph_size(0.5);
        let (w2, h2) = glyph_size(2.0);
        assert!((w1 - w2).abs() < 0.01 && (h1 - h2).abs() < 0.01);
    }

    #[test]
    fn test_alignment_guides_and_point_feedback() {
        let mut home = Home::default();
        home.add_item(Wall::new(300.0, 100.0, 500.0, 100.0, 10.0));
        let mut feedback = PlanFeedback::default();
        feedback.set_alignment(AlignedObject::Wall(None), 100.0, 100.0, true);
        let surface = paint(&home, &feedback, 1.0);
        let strokes = stroke_bounds(&surface, Layer::AlignmentFeedback);
        // guide, circle and crosshair
        assert_eq!(strokes.len(), 3);
    }

    #[test]
    fn test_rectangle_feedback_translucent_fill() {
        let home = Home::default();
        let mut feedback = PlanFeedback::default();
        feedback.set_rectangle(10.0, 10.0, 110.0, 60.0);
        let surface = paint(&home, &feedback, 1.0);
        let fill = surface.ops_in(Layer::RectangleFeedback).find_map(|op| match op {
            DrawOp::Fill {
                fill: crate::render::recording::FillKind::Solid(color),
                ..
            } => Some(*color),
            _ => None,
        });
        assert_eq!(fill.map(|c| c.alpha()), Some(32));
    }

    struct FootprintOracle;

    impl FurnitureSizeOracle for FootprintOracle {
        fn size_in_plan(&self, piece: &Furniture) -> Option<[f32; 3]> {
            Some([piece.width, piece.depth, piece.height])
        }
    }

    fn paint_piece_selected(piece: Furniture, oracle: Option<&dyn FurnitureSizeOracle>) -> (RecordingSurface, [Point; 4]) {
        let mut home = Home::default();
        let points = piece.points();
        let id = home.add_item(piece);
        home.set_selected_items([id]);
        let feedback = PlanFeedback {
            resize_indicator_visible: true,
            ..PlanFeedback::default()
        };
        let prefs = Preferences::default();
        let mut cache = DerivedGeometryCache::default();
        let mut surface = RecordingSurface::new(Transform::identity());
        let mut painter = PlanPainter::new(&home, &prefs, &mut cache).with_feedback(&feedback);
        if let Some(oracle) = oracle {
            painter = painter.with_size_oracle(oracle);
        }
        painter.paint(&mut surface, 1.0, PaintMode::Paint).expect("paint");
        (surface, points)
    }

    /// Whether the glyph of `indicator_type` was stroked at `anchor` on a
    /// plan painted at scale 1.
    fn glyph_at(surface: &RecordingSurface, layer: Layer, subject: IndicatorSubject, indicator_type: IndicatorType, anchor: Point, angle: f32) -> bool {
        let glyph = indicator(subject, indicator_type).expect("glyph");
        let expected = transformed_path_bounds(&glyph.path, &IndicatorGlyph::placement(anchor, angle, 1.0)).expect("bounds");
        stroke_bounds(surface, layer).iter().any(|b| {
            (b.x - expected.x).abs() < 1e-3
                && (b.y - expected.y).abs() < 1e-3
                && (b.width - expected.width).abs() < 1e-3
                && (b.height - expected.height).abs() < 1e-3
        })
    }

    #[test]
    fn test_front_corner_shows_height_for_level_piece() {
        let chair = Furniture::new("Chair", 100.0, 100.0, 40.0, 40.0, 80.0);
        let subject = IndicatorSubject::of_furniture(&chair);
        let (surface, [_, _, _, p3]) = paint_piece_selected(chair, Some(&FootprintOracle));
        let height_anchor = offset_anchor(p3, 0.0, -7.5, 7.5, 1.0);
        assert!(glyph_at(&surface, Layer::Selection, subject, IndicatorType::ResizeHeight, height_anchor, 0.0));
        assert!(!glyph_at(&surface, Layer::Selection, subject, IndicatorType::RotatePitch, p3, 0.0));
        assert!(!glyph_at(&surface, Layer::Selection, subject, IndicatorType::RotateRoll, p3, 0.0));
    }

    #[test]
    fn test_front_corner_shows_pitch_when_pitched() {
        let mut chair = Furniture::new("Chair", 100.0, 100.0, 40.0, 40.0, 80.0);
        chair.pitch = 0.3;
        chair.roll = 0.2;
        let subject = IndicatorSubject::of_furniture(&chair);
        let (surface, [_, _, _, p3]) = paint_piece_selected(chair, Some(&FootprintOracle));
        assert!(glyph_at(&surface, Layer::Selection, subject, IndicatorType::RotatePitch, p3, 0.0));
        assert!(!glyph_at(&surface, Layer::Selection, subject, IndicatorType::RotateRoll, p3, 0.0));
        let height_anchor = offset_anchor(p3, 0.0, -7.5, 7.5, 1.0);
        assert!(!glyph_at(&surface, Layer::Selection, subject, IndicatorType::ResizeHeight, height_anchor, 0.0));
    }

    #[test]
    fn test_front_corner_shows_roll_when_only_rolled() {
        let mut chair = Furniture::new("Chair", 100.0, 100.0, 40.0, 40.0, 80.0);
        chair.roll = 0.2;
        let subject = IndicatorSubject::of_furniture(&chair);
        let (surface, [_, _, _, p3]) = paint_piece_selected(chair, Some(&FootprintOracle));
        assert!(glyph_at(&surface, Layer::Selection, subject, IndicatorType::RotateRoll, p3, 0.0));
        assert!(!glyph_at(&surface, Layer::Selection, subject, IndicatorType::RotatePitch, p3, 0.0));
    }

    #[test]
    fn test_rotated_piece_without_size_oracle_has_no_front_corner_handle() {
        let mut chair = Furniture::new("Chair", 100.0, 100.0, 40.0, 40.0, 80.0);
        chair.pitch = 0.3;
        let subject = IndicatorSubject::of_furniture(&chair);
        let (surface, [_, _, _, p3]) = paint_piece_selected(chair, None);
        let height_anchor = offset_anchor(p3, 0.0, -7.5, 7.5, 1.0);
        assert!(!glyph_at(&surface, Layer::Selection, subject, IndicatorType::RotatePitch, p3, 0.0));
        assert!(!glyph_at(&surface, Layer::Selection, subject, IndicatorType::ResizeHeight, height_anchor, 0.0));
    }

    #[test]
    fn test_light_front_corner_shows_power() {
        let lamp = Furniture::light("Lamp", 100.0, 100.0, 30.0, 0.5);
        let subject = IndicatorSubject::of_furniture(&lamp);
        let (surface, [_, p1, _, p3]) = paint_piece_selected(lamp, None);
        let power_anchor = offset_anchor(p3, 0.0, -7.5, 7.5, 1.0);
        assert!(glyph_at(&surface, Layer::Selection, subject, IndicatorType::ChangePower, power_anchor, 0.0));
        let elevation_anchor = offset_anchor(p1, 0.0, 6.5, -6.5, 1.0);
        assert!(glyph_at(&surface, Layer::Selection, subject, IndicatorType::Elevate, elevation_anchor, 0.0));
    }

    #[test]
    fn test_selected_group_outlines_visible_children() {
        let mut hidden = Furniture::new("Stool", 200.0, 0.0, 30.0, 30.0, 40.0);
        hidden.visible = false;
        let group = Furniture::group(
            "Set",
            vec![
                Furniture::new("Table", 0.0, 0.0, 100.0, 60.0, 75.0),
                Furniture::new("Chair", 0.0, 60.0, 40.0, 40.0, 80.0),
                hidden,
            ],
        );
        let mut home = Home::default();
        let id = home.add_item(group);
        home.set_selected_items([id]);
        let surface = paint(&home, &PlanFeedback::default(), 1.0);
        let foreground = Preferences::default().plan.foreground_color;
        let child_outlines = surface
            .ops_in(Layer::Selection)
            .filter(|op| matches!(op, DrawOp::Stroke { color, .. } if *color == foreground))
            .count();
        assert_eq!(child_outlines, 2);
    }

    #[test]
    fn test_selected_wall_and_room_point_marks() {
        let mut home = Home::default();
        let wall = home.add_item(Wall::new(0.0, 0.0, 300.0, 0.0, 20.0));
        let room = home.add_item(Room::new(vec![
            point(0.0, 100.0),
            point(200.0, 100.0),
            point(200.0, 200.0),
            point(0.0, 200.0),
        ]));
        home.set_selected_items([wall, room]);
        let surface = paint(&home, &PlanFeedback::default(), 1.0);
        let discs = surface
            .ops_in(Layer::Selection)
            .filter(|op| matches!(op, DrawOp::Fill { .. }))
            .count();
        // two wall ends and four room points
        assert_eq!(discs, 6);
        let chevrons = surface
            .ops_in(Layer::Selection)
            .filter(|op| matches!(op, DrawOp::Stroke { width, .. } if (*width - POINT_STROKE_WIDTH).abs() < 1e-3))
            .count();
        assert_eq!(chevrons, 2);
    }

    #[test]
    fn test_short_wall_gets_one_chevron() {
        let mut home = Home::default();
        let wall = home.add_item(Wall::new(0.0, 0.0, 20.0, 0.0, 5.0));
        home.set_selected_items([wall]);
        let surface = paint(&home, &PlanFeedback::default(), 1.0);
        let chevrons = surface
            .ops_in(Layer::Selection)
            .filter(|op| matches!(op, DrawOp::Stroke { width, .. } if (*width - POINT_STROKE_WIDTH).abs() < 1e-3))
            .count();
        assert_eq!(chevrons, 1);
    }

    #[test]
    fn test_camera_indicators_include_elevation() {
        let mut home = Home::default();
        let camera = home.camera().map(|camera| camera.id).expect("camera");
        home.update_camera(camera, ItemProperty::Visible, |camera| camera.active = true)
            .expect("update");
        home.set_selected_items([camera]);
        let feedback = PlanFeedback {
            resize_indicator_visible: true,
            ..PlanFeedback::default()
        };
        let surface = paint(&home, &feedback, 1.0);
        let observer = home.camera().expect("camera");
        let [p0, p1, p2, p3] = observer.points();
        let subject = IndicatorSubject::new(ItemKind::Camera);
        assert!(glyph_at(&surface, Layer::Camera, subject, IndicatorType::Rotate, midpoint(p0, p3), observer.yaw));
        assert!(glyph_at(&surface, Layer::Camera, subject, IndicatorType::RotatePitch, midpoint(p1, p2), observer.yaw));
        let (sin, cos) = observer.yaw.sin_cos();
        let elevation = midpoint(p0, p1) + vector(sin * 8.0, -cos * 8.0);
        assert_eq!(indicator(subject, IndicatorType::Elevate).map(|g| g.name), Some("camera_elevation"));
        assert!(glyph_at(&surface, Layer::Camera, subject, IndicatorType::Elevate, elevation, 0.0));
    }

    #[test]
    fn test_inactive_camera_not_drawn() {
        let home = Home::default();
        let surface = paint(&home, &PlanFeedback::default(), 1.0);
        assert_eq!(surface.ops_in(Layer::Camera).count(), 0);
    }
}
