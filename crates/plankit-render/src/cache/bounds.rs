//! Model bounds of items and of the whole plan.

use lyon::math::{vector, Angle, Transform};
use plankit_core::constants::DEFAULT_PLAN_EXTENT;
use plankit_settings::Preferences;

use super::doors::{door_cutout, sash_path};
use crate::geometry::{transformed_path_bounds, Rect};
use crate::indicators::{item_shapes, marks};
use crate::model::{Compass, DimensionLine, Furniture, Home, PlanItem};
use crate::text::item_texts;

fn union(bounds: Option<Rect>, other: Option<Rect>) -> Option<Rect> {
    match (bounds, other) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (a, b) => a.or(b),
    }
}

/// Bounds of the texts drawn for `item`.
pub fn text_bounds(item: &PlanItem, preferences: &Preferences) -> Option<Rect> {
    let font = preferences.text.default_font_name.as_deref();
    item_texts(item, preferences)
        .iter()
        .map(|text| text.bounds(font))
        .reduce(|a, b| a.union(&b))
}

/// Bounds of the shapes drawn for `item`, texts excluded.
pub fn shape_bounds(home: &Home, item: &PlanItem) -> Option<Rect> {
    match item {
        PlanItem::Wall(wall) => Rect::from_points(&home.wall_points(wall)),
        PlanItem::Room(room) => room.bounds(),
        PlanItem::Furniture(piece) => furniture_bounds(home, piece),
        PlanItem::DimensionLine(line) => dimension_line_bounds(line),
        PlanItem::Label(label) => Some(Rect::at(label.location())),
        PlanItem::Polyline(polyline) => polyline
            .bounds()
            .map(|b| b.inflate(polyline.thickness / 2.0, polyline.thickness / 2.0)),
        PlanItem::Compass(compass) => compass_bounds(compass),
        PlanItem::Camera(camera) => Rect::from_points(&camera.points()),
    }
}

/// Bounds of `item` with its texts.
pub fn item_bounds(home: &Home, item: &PlanItem, preferences: &Preferences) -> Option<Rect> {
    union(shape_bounds(home, item), text_bounds(item, preferences))
}

fn furniture_bounds(home: &Home, piece: &Furniture) -> Option<Rect> {
    let mut bounds = Rect::from_points(&piece.points());
    if let Some(properties) = piece.door_or_window_properties() {
        for sash in &properties.sashes {
            bounds = union(bounds, crate::geometry::path_bounds(&sash_path(piece, sash)));
        }
        bounds = union(bounds, door_cutout(home, piece).bounds());
    }
    for child in piece.children() {
        bounds = union(bounds, furniture_bounds(home, child));
    }
    bounds
}

/// Transform from the frame of a dimension line, x along the line and y
/// across it at its offset, to the model.
pub fn dimension_line_transform(line: &DimensionLine) -> Transform {
    let angle = if line.is_elevation_dimension_line() {
        (line.pitch + std::f32::consts::TAU) % std::f32::consts::TAU
    } else {
        line.angle()
    };
    Transform::translation(0.0, line.offset)
        .then_rotate(Angle::radians(angle))
        .then_translate(vector(line.x_start, line.y_start))
}

/// Scale of the end marks, drawn 10 units wide.
pub fn end_mark_scale(line: &DimensionLine) -> f32 {
    line.end_mark_size / 10.0
}

fn dimension_line_bounds(line: &DimensionLine) -> Option<Rect> {
    let frame = dimension_line_transform(line);
    let mark_scale = end_mark_scale(line);
    let scaled = Transform::scale(mark_scale, mark_scale);
    let mut bounds = Rect::from_points(&line.points());
    if line.is_elevation_dimension_line() {
        bounds = union(
            bounds,
            transformed_path_bounds(&marks().vertical_dimension_line, &scaled.then(&frame)),
        );
    } else {
        let mark = &marks().dimension_line_end;
        bounds = union(bounds, transformed_path_bounds(mark, &scaled.then(&frame)));
        let at_end = scaled
            .then_translate(vector(line.length(), 0.0))
            .then(&frame);
        bounds = union(bounds, transformed_path_bounds(mark, &at_end));
    }
    bounds
}

/// Transform from the unit compass shapes to the model.
pub fn compass_transform(compass: &Compass) -> Transform {
    Transform::scale(compass.diameter, compass.diameter)
        .then_rotate(Angle::radians(compass.north_direction))
        .then_translate(vector(compass.x, compass.y))
}

fn compass_bounds(compass: &Compass) -> Option<Rect> {
    let shapes = item_shapes();
    let transform = compass_transform(compass);
    [&shapes.compass_disc, &shapes.compass_ticks, &shapes.compass_north]
        .into_iter()
        .filter_map(|shape| transformed_path_bounds(shape, &transform))
        .reduce(|a, b| a.union(&b))
}

/// Plan extent: the default area, background images and every item with
/// `item_bounds`. Hidden furniture and compass take no room.
pub fn plan_bounds(home: &Home, mut item_bounds: impl FnMut(&PlanItem) -> Option<Rect>) -> Rect {
    let mut bounds = Rect::new(0.0, 0.0, DEFAULT_PLAN_EXTENT, DEFAULT_PLAN_EXTENT);
    let images = home
        .background_image()
        .into_iter()
        .chain(home.levels().iter().filter_map(|l| l.background_image.as_ref()));
    for image in images {
        bounds = bounds.union(&image.bounds());
    }
    for item in home.items() {
        let shown = match item {
            PlanItem::Furniture(piece) => piece.visible,
            PlanItem::Compass(compass) => compass.visible,
            _ => true,
        };
        if let Some(item_bounds) = item_bounds(item).filter(|_| shown) {
            bounds = bounds.union(&item_bounds);
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Label, Wall};

    #[test]
    fn test_default_extent() {
        let mut home = Home::default();
        home.update_compass(
            home.compass().map(|c| c.id).expect("compass"),
            plankit_core::ItemProperty::Visible,
            |c| c.visible = false,
        )
        .expect("compass");
        let bounds = plan_bounds(&home, |item| shape_bounds(&home, item));
        assert_eq!(bounds.min_x(), 0.0);
        assert_eq!(bounds.max_x(), DEFAULT_PLAN_EXTENT);
    }

    #[test]
    fn test_items_grow_plan() {
        let mut home = Home::default();
        home.add_item(Wall::new(0.0, 0.0, 1500.0, 0.0, 20.0));
        let prefs = Preferences::default();
        let bounds = plan_bounds(&home, |item| item_bounds(&home, item, &prefs));
        assert!(bounds.max_x() >= 1500.0);
        assert!(bounds.min_x() < 0.0, "default compass sits left of the origin");
    }

    #[test]
    fn test_label_bounds_cover_text() {
        let home = Home::default();
        let label = PlanItem::from(Label::new("Garden", 100.0, 100.0));
        let bounds = item_bounds(&home, &label, &Preferences::default()).expect("label");
        assert!(bounds.width > 20.0);
        assert!(bounds.max_y() >= 100.0);
        assert!(bounds.min_y() < 100.0);
    }

    #[test]
    fn test_end_marks_extend_dimension_line() {
        let line = DimensionLine::new(0.0, 0.0, 200.0, 0.0, 0.0);
        let bounds = dimension_line_bounds(&line).expect("line");
        assert!(bounds.height > 0.0);
    }
}
