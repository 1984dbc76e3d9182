//! Painters of the item layers, drawn in every paint mode.

use image::RgbaImage;
use lyon::math::{point, vector, Angle, Point, Transform};
use lyon::path::Path;
use plankit_core::constants::MARGIN;
use plankit_core::{Color, RenderError};
use std::sync::Arc;

use super::painter::{image_fit, PaintContext};
use super::surface::{faded, Fill, StrokeStyle, Surface};
use super::PaintMode;
use crate::cache::bounds::{compass_transform, dimension_line_transform, end_mark_scale};
use crate::cache::{sash_path, wall_areas_for};
use crate::geometry::shapes;
use crate::icons::{tinted, IconSource, TopViewIconKey};
use crate::indicators::{item_shapes, marks};
use crate::model::{ArrowStyle, DimensionLine, Furniture, JoinStyle, PlanItem, Polyline, Room};
use crate::text::{item_texts, TextRole};

/// Outline width of rooms, walls and furniture, in pixels.
const OUTLINE_WIDTH: f32 = 1.5;

pub(super) fn paint_background_image(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let Some(image) = ctx.home.displayed_background_image() else {
        return Ok(());
    };
    let Some(pixels) = ctx.texture(&image.image) else {
        return Ok(());
    };
    let scale = image.scale();
    let transform = image_fit(&pixels, image.image_width as f32, image.image_height as f32)
        .then_translate(vector(-image.x_origin, -image.y_origin))
        .then_scale(scale, scale);
    surface.set_alpha(0.7);
    surface.draw_image(&pixels, &transform);
    Ok(())
}

/// Grid lines `size` apart covering `[min, max]` on one axis.
fn grid_positions(min: f32, max: f32, size: f32) -> impl Iterator<Item = f32> {
    let first = (min / size).floor() as i64;
    let last = (max / size).ceil() as i64;
    (first..=last).map(move |i| i as f32 * size)
}

fn grid_path(left: f32, top: f32, right: f32, bottom: f32, size: f32) -> Path {
    let mut builder = Path::builder();
    for x in grid_positions(left, right, size) {
        builder.begin(point(x, top));
        builder.line_to(point(x, bottom));
        builder.end(false);
    }
    for y in grid_positions(top, bottom, size) {
        builder.begin(point(left, y));
        builder.line_to(point(right, y));
        builder.end(false);
    }
    builder.build()
}

pub(super) fn paint_grid(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    if !ctx.preferences.plan.grid_visible {
        return Ok(());
    }
    let margin = MARGIN / ctx.scale;
    let bounds = ctx
        .cache
        .plan_bounds(ctx.home, ctx.preferences)
        .inflate(margin, margin);
    let unit = ctx.preferences.length_unit();
    let size = unit.grid_size(ctx.scale);
    let main_size = unit.main_grid_size(ctx.scale);
    let color = ctx.background.mix(ctx.foreground);
    let (left, top, right, bottom) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());

    surface.stroke_path(&grid_path(left, top, right, bottom, size), color, &ctx.stroke(0.5));
    surface.stroke_path(&grid_path(left, top, right, bottom, main_size), color, &ctx.stroke(1.5));
    Ok(())
}

pub(super) fn paint_other_levels(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let ghosts = ctx.cache.other_levels(ctx.home);
    if ghosts.is_empty() {
        return Ok(());
    }
    surface.set_alpha(if ctx.preferences.plan.grid_visible { 0.2 } else { 0.1 });
    if !ghosts.rooms_region.is_empty() {
        let rooms = ghosts.rooms_region.to_path();
        ctx.fill_and_stroke(surface, &rooms, Color::GRAY, ctx.foreground, OUTLINE_WIDTH);
    }
    if !ghosts.walls_region.is_empty() {
        let walls = ghosts.walls_region.to_path();
        ctx.fill_and_stroke(surface, &walls, ctx.foreground, ctx.foreground, OUTLINE_WIDTH);
    }
    Ok(())
}

pub(super) fn paint_compass(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let Some(item) = ctx.home.items().iter().find(|item| item.as_compass().is_some()) else {
        return Ok(());
    };
    let Some(compass) = item.as_compass().filter(|c| c.visible && ctx.is_painted(item)) else {
        return Ok(());
    };
    let shapes = item_shapes();
    surface.concat(&compass_transform(compass));
    let pen = StrokeStyle::new(ctx.width(OUTLINE_WIDTH) / compass.diameter.max(f32::EPSILON));
    surface.fill_color(&shapes.compass_disc, ctx.background);
    surface.stroke_path(&shapes.compass_disc, ctx.foreground, &pen);
    surface.stroke_path(&shapes.compass_ticks, ctx.foreground, &pen);
    surface.fill_color(&shapes.compass_needle, ctx.foreground);
    surface.stroke_path(&shapes.compass_north, ctx.foreground, &pen);
    Ok(())
}

/// Floor paint of a room: its color or texture when floors are colored,
/// gray otherwise.
fn room_fill(ctx: &PaintContext, room: &Room) -> Fill {
    if ctx.preferences.plan.room_floor_colored_or_textured && room.floor_visible {
        if let Some(texture) = &room.floor_texture {
            if let Some(image) = ctx.texture(&texture.image) {
                let transform = image_fit(&image, texture.scaled_width(), texture.scaled_height())
                    .then_rotate(Angle::radians(texture.angle));
                return Fill::Texture { image, transform };
            }
        }
        if let Some(color) = room.floor_color {
            return Fill::Solid(color);
        }
    }
    Fill::Solid(Color::GRAY)
}

pub(super) fn paint_rooms(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let sorted = ctx.cache.sorted_rooms(ctx.home);
    let rooms: Vec<&Room> = sorted
        .iter()
        .filter_map(|id| ctx.home.item(*id))
        .filter(|item| ctx.is_painted(item))
        .filter_map(PlanItem::as_room)
        .collect();
    for room in &rooms {
        let path = shapes::polyline(&room.points, true);
        surface.save();
        surface.set_alpha(if room.floor_visible { 0.75 } else { 0.5 });
        surface.fill_path(&path, &room_fill(ctx, room));
        surface.restore();
    }
    for room in &rooms {
        let path = shapes::polyline(&room.points, true);
        surface.stroke_path(&path, ctx.foreground, &ctx.stroke(OUTLINE_WIDTH));
    }
    Ok(())
}

pub(super) fn paint_walls(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let pattern = ctx.preferences.plan.wall_pattern;
    let areas = if ctx.mode == PaintMode::Clipboard {
        let walls = ctx
            .home
            .items()
            .iter()
            .filter(|item| ctx.is_painted(item))
            .filter_map(PlanItem::as_wall);
        Arc::new(wall_areas_for(ctx.home, walls, pattern))
    } else {
        ctx.cache.wall_areas(ctx.home, ctx.preferences)
    };
    for area in &areas.by_pattern {
        let fill = Fill::Hatch {
            pattern: area.pattern,
            foreground: ctx.foreground,
            background: ctx.background,
        };
        surface.fill_path(&area.region.to_path(), &fill);
    }
    if !areas.outline.is_empty() {
        surface.stroke_path(&areas.outline.to_path(), ctx.foreground, &ctx.stroke(OUTLINE_WIDTH));
    }
    Ok(())
}

/// Pixels of the icon of `piece` and whether it keeps its aspect ratio.
fn piece_icon(ctx: &mut PaintContext, piece: &Furniture) -> Option<(Arc<RgbaImage>, bool)> {
    let icon = ctx.cache.icon(piece, ctx.preferences)?;
    let catalog = matches!(icon.key, TopViewIconKey::CatalogIcon(_));
    let pixels = match &icon.source {
        IconSource::Rendered(image) => image.clone(),
        IconSource::Texture(image) => {
            let pixels = ctx.texture(image)?;
            match icon.tint {
                Some(color) => Arc::new(tinted(&pixels, color)),
                None => pixels,
            }
        }
        IconSource::Unavailable => return None,
    };
    Some((pixels, catalog))
}

/// Footprint, icon and outline of a piece, then its cut-out and sashes for
/// doors and windows. Groups paint their children.
pub(super) fn paint_piece(ctx: &mut PaintContext, surface: &mut dyn Surface, piece: &Furniture) {
    if piece.is_group() {
        for child in piece.children().iter().filter(|child| child.visible) {
            paint_piece(ctx, surface, child);
        }
        return;
    }
    let footprint = shapes::polyline(&piece.points(), true);
    surface.fill_color(&footprint, ctx.background);

    if let Some((pixels, catalog)) = piece_icon(ctx, piece) {
        let (width, depth) = (piece.width_in_plan(), piece.depth_in_plan());
        let (w, h) = (pixels.width().max(1) as f32, pixels.height().max(1) as f32);
        let (sx, sy) = if catalog {
            let s = (width / w).min(depth / h);
            (s, s)
        } else {
            (width / w, depth / h)
        };
        let mirror = if piece.model_mirrored && !catalog { -1.0 } else { 1.0 };
        let transform = Transform::translation(-w / 2.0, -h / 2.0)
            .then_scale(sx * mirror, sy)
            .then_rotate(Angle::radians(piece.angle))
            .then_translate(vector(piece.x, piece.y));
        surface.draw_image(&pixels, &transform);
    }

    surface.stroke_path(&footprint, faded(ctx.foreground, 0.33), &ctx.stroke(OUTLINE_WIDTH));

    if let Some(properties) = piece.door_or_window_properties() {
        let cutout = ctx.cache.door_cutout(ctx.home, piece);
        if !cutout.is_empty() {
            let path = cutout.to_path();
            ctx.fill_and_stroke(surface, &path, ctx.background, ctx.foreground, OUTLINE_WIDTH);
        }
        for sash in &properties.sashes {
            surface.stroke_path(&sash_path(piece, sash), ctx.foreground, &ctx.stroke(OUTLINE_WIDTH));
        }
    }
}

pub(super) fn paint_furniture(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let sorted = ctx.cache.sorted_furniture(ctx.home);
    let home = ctx.home;
    for id in sorted.iter() {
        let Some(item) = home.item(*id).filter(|item| ctx.is_painted(item)) else {
            continue;
        };
        if let Some(piece) = item.as_furniture() {
            paint_piece(ctx, surface, piece);
        }
    }
    Ok(())
}

fn arrow_head(surface: &mut dyn Surface, style: ArrowStyle, at: Point, from: Point, size: f32, color: Color) {
    if style == ArrowStyle::None || at == from {
        return;
    }
    let direction = (at - from).angle_from_x_axis();
    surface.save();
    surface.concat(&Transform::scale(size, size).then_rotate(direction).then_translate(at.to_vector()));
    match style {
        ArrowStyle::Delta => surface.fill_color(&marks().arrow, color),
        ArrowStyle::Open => surface.stroke_path(&marks().arrow, color, &StrokeStyle::new(1.0)),
        ArrowStyle::Disc => surface.fill_color(&shapes::circle(-2.5, 0.0, 2.5), color),
        ArrowStyle::None => {}
    }
    surface.restore();
}

pub(super) fn paint_polyline(ctx: &PaintContext, surface: &mut dyn Surface, polyline: &Polyline, color: Color) {
    let points = &polyline.points;
    if points.len() < 2 {
        return;
    }
    let path = if polyline.join_style == JoinStyle::Curved {
        shapes::curved_polyline(points, polyline.closed_path)
    } else {
        shapes::polyline(points, polyline.closed_path)
    };
    let thickness = polyline.thickness * ctx.mode.stroke_factor();
    let mut pen = StrokeStyle::new(thickness)
        .with_cap(polyline.cap_style)
        .with_join(polyline.join_style);
    if let Some(dash) = polyline.dash_lengths() {
        let dash = dash.iter().map(|length| length * polyline.thickness).collect();
        pen = pen.with_dash(dash, polyline.dash_offset * polyline.thickness);
    }
    surface.stroke_path(&path, color, &pen);

    if !polyline.closed_path {
        let n = points.len();
        let size = polyline.thickness.max(1.0);
        arrow_head(surface, polyline.start_arrow_style, points[0], points[1], size, color);
        arrow_head(surface, polyline.end_arrow_style, points[n - 1], points[n - 2], size, color);
    }
}

pub(super) fn paint_polylines(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    for item in ctx.home.items().iter().filter(|item| ctx.is_painted(item)) {
        if let Some(polyline) = item.as_polyline() {
            paint_polyline(ctx, surface, polyline, polyline.color);
        }
    }
    Ok(())
}

/// Line, end marks, extension lines and length text of a dimension line.
pub(super) fn paint_dimension_line(ctx: &PaintContext, surface: &mut dyn Surface, line: &DimensionLine, color: Color) {
    let color = line.color.unwrap_or(color);
    let length = line.length();
    let mark_scale = end_mark_scale(line);
    let pen = ctx.stroke(1.0);

    surface.save();
    surface.concat(&dimension_line_transform(line));
    surface.stroke_path(&shapes::line(0.0, 0.0, length, 0.0), color, &pen);
    if line.is_elevation_dimension_line() {
        surface.save();
        surface.scale(mark_scale);
        let mark_pen = StrokeStyle::new(pen.width / mark_scale.max(f32::EPSILON));
        surface.stroke_path(&marks().vertical_dimension_line, color, &mark_pen);
        surface.fill_color(&marks().vertical_dimension_line_disc, color);
        surface.restore();
    } else {
        for x in [0.0, length] {
            surface.save();
            surface.translate(x, 0.0);
            surface.scale(mark_scale);
            let mark_pen = StrokeStyle::new(pen.width / mark_scale.max(f32::EPSILON));
            surface.stroke_path(&marks().dimension_line_end, color, &mark_pen);
            surface.restore();
        }
        let mut extensions = Path::builder();
        for x in [0.0, length] {
            extensions.begin(point(x, -line.offset));
            extensions.line_to(point(x, 0.0));
            extensions.end(false);
        }
        surface.stroke_path(&extensions.build(), color, &pen);
    }
    surface.restore();

    let item = PlanItem::DimensionLine(line.clone());
    for text in item_texts(&item, ctx.preferences) {
        ctx.draw_text(surface, &text, color);
    }
}

pub(super) fn paint_dimension_lines(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    for item in ctx.home.items().iter().filter(|item| ctx.is_painted(item)) {
        if let Some(line) = item.as_dimension_line() {
            paint_dimension_line(ctx, surface, line, ctx.foreground);
        }
    }
    Ok(())
}

fn paint_texts_of(ctx: &PaintContext, surface: &mut dyn Surface, item: &PlanItem, roles: &[TextRole]) {
    for text in item_texts(item, ctx.preferences) {
        if roles.contains(&text.role) {
            ctx.draw_text(surface, &text, ctx.foreground);
        }
    }
}

pub(super) fn paint_room_texts(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let sorted = ctx.cache.sorted_rooms(ctx.home);
    for item in sorted.iter().filter_map(|id| ctx.home.item(*id)) {
        if ctx.is_painted(item) {
            paint_texts_of(ctx, surface, item, &[TextRole::Name, TextRole::Area]);
        }
    }
    Ok(())
}

pub(super) fn paint_furniture_names(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    let sorted = ctx.cache.sorted_furniture(ctx.home);
    for item in sorted.iter().filter_map(|id| ctx.home.item(*id)) {
        if ctx.is_painted(item) {
            paint_texts_of(ctx, surface, item, &[TextRole::Name]);
        }
    }
    Ok(())
}

pub(super) fn paint_labels(ctx: &mut PaintContext, surface: &mut dyn Surface) -> Result<(), RenderError> {
    for item in ctx.home.items().iter().filter(|item| ctx.is_painted(item)) {
        if item.as_label().is_some() {
            paint_texts_of(ctx, surface, item, &[TextRole::Label]);
        }
    }
    Ok(())
}
