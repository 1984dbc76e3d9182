//! Items of a neighbouring level drawn faded under the selected one.

use plankit_core::LevelId;

use crate::geometry::Region;
use crate::model::{Home, Level, PlanItem, Room, Wall};

/// Ghost geometry of the other level group.
#[derive(Debug, Clone, Default)]
pub struct OtherLevels {
    /// Whether the levels shown are above the selected one, which happens
    /// when the selected level is at the lowest elevation.
    pub above: bool,
    pub levels: Vec<LevelId>,
    pub rooms: Vec<Room>,
    pub walls: Vec<Wall>,
    pub rooms_region: Region,
    pub walls_region: Region,
}

impl OtherLevels {
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.walls.is_empty()
    }
}

/// Viewable levels of the elevation group next to the selected level: the
/// group above when the selected level is at the lowest elevation, the
/// nearest group below otherwise.
fn other_level_group<'a>(levels: &[&'a Level], selected: &Level) -> (bool, Vec<&'a Level>) {
    let Some(lowest) = levels.first() else {
        return (false, Vec::new());
    };
    let above = lowest.elevation == selected.elevation;
    let elevation = if above {
        levels
            .iter()
            .map(|level| level.elevation)
            .find(|elevation| *elevation > selected.elevation)
    } else {
        levels
            .iter()
            .rev()
            .map(|level| level.elevation)
            .find(|elevation| *elevation < selected.elevation)
    };
    let group = match elevation {
        Some(elevation) => levels
            .iter()
            .filter(|level| level.elevation == elevation && level.viewable)
            .copied()
            .collect(),
        None => Vec::new(),
    };
    (above, group)
}

/// Rooms and walls of the other level group. Rooms show by their floor when
/// the group is above and by their ceiling when it is below; walls already
/// viewable at the selected level are left out.
pub fn other_levels(home: &Home) -> OtherLevels {
    let levels = home.sorted_levels();
    let Some(selected) = home.selected_level() else {
        return OtherLevels::default();
    };
    if levels.len() < 2 {
        return OtherLevels::default();
    }
    let (above, group) = other_level_group(&levels, selected);
    if group.is_empty() {
        return OtherLevels {
            above,
            ..OtherLevels::default()
        };
    }
    let in_group = |level: Option<LevelId>| level.is_some_and(|id| group.iter().any(|l| l.id == id));

    let rooms: Vec<Room> = home
        .rooms()
        .filter(|room| in_group(room.level))
        .filter(|room| if above { room.floor_visible } else { room.ceiling_visible })
        .cloned()
        .collect();
    let walls: Vec<Wall> = home
        .items()
        .iter()
        .filter(|item| !home.is_viewable_at_selected_level(item))
        .filter_map(PlanItem::as_wall)
        .filter(|wall| in_group(wall.level))
        .cloned()
        .collect();

    let room_regions: Vec<Region> = rooms
        .iter()
        .map(|room| Region::polygon_or_empty(&room.points))
        .collect();
    let wall_regions: Vec<Region> = walls
        .iter()
        .map(|wall| Region::polygon_or_empty(&home.wall_points(wall)))
        .collect();
    tracing::debug!(
        "Other level ghosts: {} room(s), {} wall(s) {}",
        rooms.len(),
        walls.len(),
        if above { "above" } else { "below" }
    );
    OtherLevels {
        above,
        levels: group.iter().map(|level| level.id).collect(),
        rooms_region: Region::union_all(&room_regions),
        walls_region: Region::union_all(&wall_regions),
        rooms,
        walls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::math::point;

    fn square(level: LevelId) -> Room {
        Room::new(vec![
            point(0.0, 0.0),
            point(100.0, 0.0),
            point(100.0, 100.0),
            point(0.0, 100.0),
        ])
        .on_level(level)
    }

    #[test]
    fn test_lowest_level_shows_floors_above() {
        let mut home = Home::default();
        let ground = home.add_level(Level::new("Ground", 0.0, 12.0, 250.0));
        let upper = home.add_level(Level::new("Upper", 262.0, 12.0, 250.0));
        home.add_item(square(upper));
        let mut hidden_floor = square(upper);
        hidden_floor.floor_visible = false;
        home.add_item(hidden_floor);
        home.add_item(Wall::new(0.0, 0.0, 100.0, 0.0, 10.0).on_level(upper));

        home.select_level(Some(ground));
        let ghosts = other_levels(&home);
        assert!(ghosts.above);
        assert_eq!(ghosts.rooms.len(), 1);
        assert_eq!(ghosts.walls.len(), 1);
        assert!((ghosts.rooms_region.area() - 10_000.0).abs() < 1.0);
    }

    #[test]
    fn test_upper_level_shows_ceilings_below() {
        let mut home = Home::default();
        let ground = home.add_level(Level::new("Ground", 0.0, 12.0, 250.0));
        let middle = home.add_level(Level::new("Middle", 262.0, 12.0, 250.0));
        let top = home.add_level(Level::new("Top", 524.0, 12.0, 250.0));
        home.add_item(square(ground));
        let mut no_ceiling = square(middle);
        no_ceiling.ceiling_visible = false;
        home.add_item(no_ceiling);

        home.select_level(Some(top));
        let ghosts = other_levels(&home);
        assert!(!ghosts.above);
        assert_eq!(ghosts.levels, vec![middle]);
        assert!(ghosts.rooms.is_empty());
    }

    #[test]
    fn test_single_level_has_no_ghosts() {
        let mut home = Home::default();
        let only = home.add_level(Level::new("Only", 0.0, 12.0, 250.0));
        home.add_item(square(only));
        assert!(other_levels(&home).is_empty());
    }

    #[test]
    fn test_unviewable_level_is_skipped() {
        let mut home = Home::default();
        let ground = home.add_level(Level::new("Ground", 0.0, 12.0, 250.0));
        let upper = home.add_level(Level::new("Upper", 262.0, 12.0, 250.0));
        home.add_item(square(upper));
        home.update_level(upper, plankit_core::ItemProperty::Viewable, |level| {
            level.viewable = false
        })
        .expect("level");
        home.select_level(Some(ground));
        assert!(other_levels(&home).rooms.is_empty());
    }
}
