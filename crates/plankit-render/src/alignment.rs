//! Alignment feedback shown while drawing or moving a point.
//!
//! The point being edited is compared with the points of the items viewed
//! at its level. A candidate whose abscissa is within the snap margin of the
//! point gives a vertical guide, one whose ordinate is within the margin a
//! horizontal guide. For each axis the closest candidate is kept; on ties
//! the first one found wins.

use lyon::math::{point, Point};
use lyon::path::Path;
use plankit_core::constants::{ALIGNMENT_LINE_OFFSET, ALIGNMENT_MARGIN_PIXELS};
use plankit_core::ItemId;

use crate::cache::{other_levels, OtherLevels};
use crate::geometry::shapes;
use crate::model::{Home, Level, PlanItem, Room, Wall};

/// Item whose point is being edited, by kind, with its id once it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignedObject {
    Wall(Option<ItemId>),
    Room(Option<ItemId>),
    DimensionLine(Option<ItemId>),
    Polyline(Option<ItemId>),
}

/// Closest aligned candidates around a point.
///
/// Deltas are the offsets from the point to the candidate: `delta_x` is
/// measured along a horizontal guide, to a candidate sharing the point
/// ordinate, and `delta_y` along a vertical guide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentFeedback {
    pub point: Point,
    pub delta_x: Option<f32>,
    pub delta_y: Option<f32>,
}

/// Snap margin in model units at `scale`.
pub fn snap_margin(scale: f32) -> f32 {
    ALIGNMENT_MARGIN_PIXELS / scale
}

struct Nearest {
    point: Point,
    margin: f32,
    delta_x: Option<f32>,
    delta_y: Option<f32>,
}

impl Nearest {
    /// Consider a candidate for the vertical guide. Returns whether its
    /// abscissa is within the margin.
    fn vertical(&mut self, candidate: Point) -> bool {
        if (self.point.x - candidate.x).abs() >= self.margin {
            return false;
        }
        let delta = candidate.y - self.point.y;
        if self.delta_y.map_or(true, |current| current.abs() > delta.abs()) {
            self.delta_y = Some(delta);
        }
        true
    }

    fn horizontal(&mut self, candidate: Point) -> bool {
        if (self.point.y - candidate.y).abs() >= self.margin {
            return false;
        }
        let delta = candidate.x - self.point.x;
        if self.delta_x.map_or(true, |current| current.abs() > delta.abs()) {
            self.delta_x = Some(delta);
        }
        true
    }

    fn both(&mut self, candidate: Point) {
        self.vertical(candidate);
        self.horizontal(candidate);
    }
}

fn viewable_at(home: &Home, item: &PlanItem, level: Option<&Level>) -> bool {
    match home.item_level(item) {
        None => true,
        Some(item_level) => item_level.viewable && home.is_at_level(item, level),
    }
}

/// First, last and middle corners of a wall outline, which are the ends of
/// its two sides for straight and arc walls alike.
fn wall_corners(home: &Home, wall: &Wall) -> Vec<Point> {
    let points = home.wall_points(wall);
    let n = points.len();
    if n < 4 {
        return points;
    }
    vec![points[0], points[n / 2 - 1], points[n / 2], points[n - 1]]
}

/// Ghost items first, then the items viewable at `level`.
fn viewed<'a, T: 'a>(
    home: &'a Home,
    level: Option<&Level>,
    ghosts: &'a [T],
    as_kind: impl Fn(&'a PlanItem) -> Option<&'a T>,
) -> Vec<&'a T> {
    ghosts
        .iter()
        .chain(
            home.items()
                .iter()
                .filter(|item| viewable_at(home, item, level))
                .filter_map(as_kind),
        )
        .collect()
}

fn same_point(a: Point, b: Point) -> bool {
    a.x == b.x && a.y == b.y
}

impl AlignmentFeedback {
    /// Alignment of `point` for `aligned` at `level`, with the ghosts of the
    /// neighbouring levels when `level` is the selected one.
    pub fn compute(home: &Home, level: Option<&Level>, aligned: AlignedObject, point: Point, scale: f32) -> Self {
        let selected = home.selected_level().map(|l| l.id) == level.map(|l| l.id);
        let ghosts = if selected {
            other_levels(home)
        } else {
            OtherLevels::default()
        };
        Self::compute_with_ghosts(home, level, &ghosts, aligned, point, scale)
    }

    /// Same as [`compute`](Self::compute) with ghosts computed by the caller.
    pub fn compute_with_ghosts(
        home: &Home,
        level: Option<&Level>,
        ghosts: &OtherLevels,
        aligned: AlignedObject,
        point: Point,
        scale: f32,
    ) -> Self {
        let mut nearest = Nearest {
            point,
            margin: snap_margin(scale),
            delta_x: None,
            delta_y: None,
        };
        let walls = viewed(home, level, &ghosts.walls, PlanItem::as_wall);
        let rooms = viewed(home, level, &ghosts.rooms, PlanItem::as_room);

        match aligned {
            AlignedObject::Wall(id) => {
                let aligned_wall = id.and_then(|id| home.wall(id));
                let excluded = |p: Point| {
                    aligned_wall.is_some_and(|w| same_point(p, w.start()) || same_point(p, w.end()))
                };
                for wall in walls.iter().filter(|w| Some(w.id) != id) {
                    let (start, end) = (wall.start(), wall.end());
                    if !(!excluded(start) && nearest.vertical(start)) && !excluded(end) {
                        nearest.vertical(end);
                    }
                    if !(!excluded(start) && nearest.horizontal(start)) && !excluded(end) {
                        nearest.horizontal(end);
                    }
                    for corner in wall_corners(home, wall) {
                        if !excluded(corner) {
                            nearest.both(corner);
                        }
                    }
                }
            }
            AlignedObject::Room(id) => {
                for room in &rooms {
                    room_candidates(&mut nearest, room, id, point);
                }
                for wall in &walls {
                    wall_corners(home, wall).into_iter().for_each(|c| nearest.both(c));
                }
            }
            AlignedObject::DimensionLine(id) => {
                for room in &rooms {
                    room.points.iter().for_each(|p| nearest.both(*p));
                }
                let aligned_line = id.and_then(|id| home.item(id)).and_then(PlanItem::as_dimension_line);
                let excluded = |p: Point| {
                    aligned_line.is_some_and(|l| same_point(p, l.start()) || same_point(p, l.end()))
                };
                for item in home.items().iter().filter(|item| viewable_at(home, item, level)) {
                    let Some(line) = item.as_dimension_line().filter(|l| Some(l.id) != id) else {
                        continue;
                    };
                    let (start, end) = (line.start(), line.end());
                    if !(!excluded(start) && nearest.vertical(start)) && !excluded(end) {
                        nearest.vertical(end);
                    }
                    if !(!excluded(start) && nearest.horizontal(start)) && !excluded(end) {
                        nearest.horizontal(end);
                    }
                }
                for wall in &walls {
                    wall_corners(home, wall).into_iter().for_each(|c| nearest.both(c));
                }
                for item in home.items().iter().filter(|item| viewable_at(home, item, level)) {
                    if let Some(piece) = item.as_furniture().filter(|p| p.visible) {
                        piece.points().iter().for_each(|p| nearest.both(*p));
                    }
                }
            }
            AlignedObject::Polyline(id) => {
                for item in home.items().iter().filter(|item| viewable_at(home, item, level)) {
                    if let Some(polyline) = item.as_polyline().filter(|p| Some(p.id) != id) {
                        polyline.points.iter().for_each(|p| nearest.both(*p));
                    }
                }
            }
        }

        Self {
            point,
            delta_x: nearest.delta_x,
            delta_y: nearest.delta_y,
        }
    }

    pub fn is_aligned(&self) -> bool {
        self.delta_x.is_some() || self.delta_y.is_some()
    }

    /// Guide segments, running from the point past the aligned candidate and
    /// standing off both by the alignment line offset.
    pub fn guides(&self, scale: f32, touch: bool) -> Vec<(Point, Point)> {
        let offset = alignment_line_offset(touch) / scale;
        let (x, y) = (self.point.x, self.point.y);
        let mut guides = Vec::new();
        if let Some(dx) = self.delta_x {
            let sign = if dx < 0.0 { -1.0 } else { 1.0 };
            guides.push((point(x - sign * offset, y), point(x + dx + sign * offset, y)));
        }
        if let Some(dy) = self.delta_y {
            let sign = if dy < 0.0 { -1.0 } else { 1.0 };
            guides.push((point(x, y - sign * offset), point(x, y + dy + sign * offset)));
        }
        guides
    }
}

fn room_candidates(nearest: &mut Nearest, room: &Room, aligned: Option<ItemId>, point: Point) {
    let edited = if aligned == Some(room.id) {
        room.points.iter().position(|p| same_point(*p, point))
    } else {
        None
    };
    for (i, p) in room.points.iter().enumerate() {
        let kept = match edited {
            None => true,
            Some(edited) => i != edited && room.points.len() > 2,
        };
        if kept {
            nearest.both(*p);
        }
    }
}

/// Stand-off of guides in pixels, doubled for touch pointers.
pub fn alignment_line_offset(touch: bool) -> f32 {
    if touch {
        ALIGNMENT_LINE_OFFSET * 2.0
    } else {
        ALIGNMENT_LINE_OFFSET
    }
}

/// Radius in pixels of the magnetized point feedback.
pub fn point_feedback_radius(touch: bool) -> f32 {
    if touch {
        20.0
    } else {
        10.0
    }
}

/// Circle and crosshair of the point feedback at `at`.
pub fn point_feedback_shapes(at: Point, scale: f32, touch: bool) -> (Path, Path) {
    let r = point_feedback_radius(touch) / scale;
    let circle = shapes::circle(at.x, at.y, r);
    let mut cross = Path::builder();
    cross.begin(point(at.x, at.y - r));
    cross.line_to(point(at.x, at.y + r));
    cross.end(false);
    cross.begin(point(at.x - r, at.y));
    cross.line_to(point(at.x + r, at.y));
    cross.end(false);
    (circle, cross.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DimensionLine;

    fn home_with_wall_end_at(y: f32) -> Home {
        let mut home = Home::default();
        home.add_item(Wall::new(0.0, 0.0, 100.0, y, 10.0));
        home
    }

    #[test]
    fn test_drag_snaps_to_nearby_wall_end() {
        let home = home_with_wall_end_at(100.02);
        let feedback = AlignmentFeedback::compute(
            &home,
            None,
            AlignedObject::Wall(None),
            point(100.0, 100.0),
            1.0,
        );
        let delta = feedback.delta_y.expect("vertical alignment");
        assert!((delta - 0.02).abs() < 1e-4, "delta {}", delta);
    }

    #[test]
    fn test_margin_is_exclusive() {
        let margin = snap_margin(1.0);
        let mut home = Home::default();
        home.add_item(crate::model::Polyline::new(vec![point(margin, 50.0), point(margin, 70.0)]));
        let at_margin = AlignmentFeedback::compute(&home, None, AlignedObject::Polyline(None), point(0.0, 0.0), 1.0);
        assert!(!at_margin.is_aligned());

        let mut home = Home::default();
        home.add_item(crate::model::Polyline::new(vec![point(margin, 50.0), point(margin - 0.001, 60.0)]));
        let inside = AlignmentFeedback::compute(&home, None, AlignedObject::Polyline(None), point(0.0, 0.0), 1.0);
        assert_eq!(inside.delta_y, Some(60.0));
    }

    #[test]
    fn test_first_closest_candidate_wins() {
        let mut home = Home::default();
        home.add_item(DimensionLine::new(0.2, 50.0, 300.0, 50.0, 0.0));
        home.add_item(DimensionLine::new(-0.2, -50.0, 300.0, -50.0, 0.0));
        let feedback = AlignmentFeedback::compute(
            &home,
            None,
            AlignedObject::DimensionLine(None),
            point(0.0, 0.0),
            1.0,
        );
        assert_eq!(feedback.delta_y, Some(50.0));
    }

    #[test]
    fn test_room_point_being_edited_is_ignored() {
        let mut home = Home::default();
        let room = Room::new(vec![
            point(0.0, 0.0),
            point(400.0, 0.0),
            point(400.0, 300.0),
            point(0.0, 300.0),
        ]);
        let id = room.id;
        home.add_item(room);
        let feedback = AlignmentFeedback::compute(
            &home,
            None,
            AlignedObject::Room(Some(id)),
            point(400.0, 300.0),
            1.0,
        );
        // Neighbours of the edited corner still align it
        assert_eq!(feedback.delta_y, Some(-300.0));
        assert_eq!(feedback.delta_x, Some(-400.0));
    }

    #[test]
    fn test_guides_stand_off_past_candidate() {
        let feedback = AlignmentFeedback {
            point: point(0.0, 0.0),
            delta_x: Some(100.0),
            delta_y: None,
        };
        let guides = feedback.guides(0.5, false);
        assert_eq!(guides, vec![(point(-50.0, 0.0), point(150.0, 0.0))]);
        let touch = feedback.guides(1.0, true);
        assert_eq!(touch[0].0, point(-50.0, 0.0));
    }
}
