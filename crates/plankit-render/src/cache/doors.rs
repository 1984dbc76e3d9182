//! Door and window shapes cut in walls.

use lyon::math::{vector, Angle, Point, Transform};
use lyon::path::Path;

use crate::geometry::shapes::{arc, ArcClosure};
use crate::geometry::{Rect, Region};
use crate::model::{DoorOrWindow, Furniture, Home, PlanItem, Sash};

/// Rectangle of a door or window before rotation, restricted to the part
/// lying in its wall when `only_wall_part` is set.
pub fn door_or_window_rectangle(piece: &Furniture, properties: &DoorOrWindow, only_wall_part: bool) -> Rect {
    let (thickness, distance) = if only_wall_part {
        (
            piece.depth * properties.wall_thickness,
            piece.depth * properties.wall_distance,
        )
    } else {
        (piece.depth, 0.0)
    };
    let width = piece.width;
    let mut wall_width = properties.wall_width * width;
    let mut x = piece.x - width / 2.0
        + if piece.model_mirrored {
            (1.0 - properties.wall_left - properties.wall_width) * width
        } else {
            properties.wall_left * width
        };
    if let Some((left, extent)) = properties.cut_out_extent {
        x += if piece.model_mirrored {
            (1.0 - left - extent) * wall_width
        } else {
            left * wall_width
        };
        wall_width *= extent;
    }
    Rect::new(x, piece.y - piece.depth / 2.0 + distance, wall_width, thickness)
}

fn rotation_around(piece: &Furniture) -> Transform {
    Transform::translation(-piece.x, -piece.y)
        .then_rotate(Angle::radians(piece.angle))
        .then_translate(vector(piece.x, piece.y))
}

fn rotated(rect: &Rect, transform: &Transform) -> [Point; 4] {
    rect.corners().map(|c| transform.transform_point(c))
}

/// Outline of the part of a door or window inside its wall.
pub fn wall_part_points(piece: &Furniture) -> Option<[Point; 4]> {
    let properties = piece.door_or_window_properties()?;
    let rect = door_or_window_rectangle(piece, properties, true);
    Some(rotated(&rect, &rotation_around(piece)))
}

/// Area cleared in the walls crossed by a door or window cut out on both
/// sides. Empty for other pieces.
pub fn door_cutout(home: &Home, piece: &Furniture) -> Region {
    let Some(properties) = piece
        .door_or_window_properties()
        .filter(|p| p.wall_cut_out_on_both_sides)
    else {
        return Region::empty();
    };
    let rect = door_or_window_rectangle(piece, properties, false);
    let rotation = rotation_around(piece);
    let piece_region = Region::polygon_or_empty(&rotated(&rect, &rotation));
    let piece_item = PlanItem::Furniture(piece.clone());
    let piece_level = home.item_level(&piece_item);

    let mut cutout = Region::empty();
    for wall in home.walls() {
        let wall_item = PlanItem::Wall(wall.clone());
        if !home.is_at_level(&wall_item, piece_level) || !piece.is_parallel_to_wall(wall) {
            continue;
        }
        let wall_region = Region::polygon_or_empty(&home.wall_points(wall));
        if wall_region.intersection(&piece_region).is_empty() {
            continue;
        }
        let extended = Rect::new(
            rect.x,
            rect.y - 2.0 * wall.thickness,
            rect.width,
            rect.height + 4.0 * wall.thickness,
        );
        let extended = Region::polygon_or_empty(&rotated(&extended, &rotation));
        cutout = cutout.union(&wall_region.intersection(&extended));
    }
    cutout
}

/// Pie shape swept by a sash.
pub fn sash_path(piece: &Furniture, sash: &Sash) -> Path {
    let mirrored = if piece.model_mirrored { -1.0 } else { 1.0 };
    let x_axis = mirrored * sash.x_axis * piece.width;
    let y_axis = sash.y_axis * piece.depth;
    let sash_width = sash.width * piece.width;
    let mut start = sash.start_angle.to_degrees();
    if piece.model_mirrored {
        start = 180.0 - start;
    }
    let extent = mirrored * (sash.end_angle - sash.start_angle).to_degrees();
    let shape = arc(
        x_axis - sash_width,
        y_axis - sash_width,
        2.0 * sash_width,
        2.0 * sash_width,
        start,
        extent,
        ArcClosure::Pie,
    );
    let transform = Transform::translation(mirrored * -piece.width / 2.0, -piece.depth / 2.0)
        .then_rotate(Angle::radians(piece.angle))
        .then_translate(vector(piece.x, piece.y));
    shape.transformed(&transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Wall;

    fn door(cut_out_both_sides: bool) -> Furniture {
        Furniture::door_or_window(
            "Door",
            150.0,
            0.0,
            80.0,
            10.0,
            210.0,
            DoorOrWindow {
                wall_cut_out_on_both_sides: cut_out_both_sides,
                sashes: vec![Sash {
                    x_axis: 0.0,
                    y_axis: 1.0,
                    width: 1.0,
                    start_angle: 0.0,
                    end_angle: -std::f32::consts::FRAC_PI_2,
                }],
                ..DoorOrWindow::default()
            },
        )
    }

    #[test]
    fn test_cutout_spans_wall_thickness() {
        let mut home = Home::default();
        home.add_item(Wall::new(0.0, 0.0, 300.0, 0.0, 20.0));
        let cutout = door_cutout(&home, &door(true));
        let bounds = cutout.bounds().expect("cutout");
        assert!((bounds.width - 80.0).abs() < 1e-2);
        assert!((bounds.min_y() + 10.0).abs() < 1e-2);
        assert!((bounds.max_y() - 10.0).abs() < 1e-2);
    }

    #[test]
    fn test_no_cutout_without_flag_or_parallel_wall() {
        let mut home = Home::default();
        home.add_item(Wall::new(0.0, 0.0, 300.0, 0.0, 20.0));
        assert!(door_cutout(&home, &door(false)).is_empty());
        let mut turned = door(true);
        turned.angle = 0.7;
        assert!(door_cutout(&home, &turned).is_empty());
    }

    #[test]
    fn test_sash_sweeps_quarter_circle() {
        let piece = door(false);
        let sash = &piece.door_or_window_properties().expect("door").sashes[0];
        let bounds = crate::geometry::path_bounds(&sash_path(&piece, sash)).expect("sash");
        assert!((bounds.width - 80.0).abs() < 0.5);
        assert!((bounds.height - 80.0).abs() < 0.5);
    }
}
