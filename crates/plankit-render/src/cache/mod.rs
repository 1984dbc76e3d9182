//! Derived geometry cache.
//!
//! Every artifact the painters derive from the home (plan bounds, wall areas,
//! ghosts of other levels, door and window cutouts, paint order of rooms and
//! furniture, text bounds and furniture icons) is built on first use and
//! kept until [`DerivedGeometryCache::invalidate`] drops it. Invalidation is
//! driven by change reasons, so a style change never discards geometry and a
//! change of one item leaves the entries of the others alone.

pub mod bounds;
pub mod doors;
pub mod levels;
pub mod walls;

pub use bounds::{item_bounds, plan_bounds, shape_bounds, text_bounds};
pub use doors::{door_cutout, door_or_window_rectangle, sash_path, wall_part_points};
pub use levels::{other_levels, OtherLevels};
pub use walls::{viewable_wall_areas, wall_areas_for, WallArea, WallAreas};

use plankit_core::{ChangeReason, ItemId, ItemKind};
use plankit_settings::Preferences;
use std::collections::HashMap;
use std::sync::Arc;

use crate::geometry::{Rect, Region};
use crate::icons::{IconCache, IconRenderer, TopViewIcon};
use crate::model::{Furniture, Home, PlanItem, Room};

/// Part of the home a change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheScope {
    /// Everything, icons included.
    All,
    /// Levels were added, removed, changed or selected.
    Levels,
    /// A home-wide property, such as its background image.
    Home,
    /// Every item of one kind.
    Kind(ItemKind),
    /// One item.
    Item { id: ItemId, kind: ItemKind },
}

/// Count of rebuilds per artifact, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub plan_bounds: usize,
    pub wall_areas: usize,
    pub other_levels: usize,
    pub door_cutouts: usize,
    pub text_bounds: usize,
}

/// Paint rank of a room: neither floor nor ceiling, floor only, both,
/// ceiling only.
fn surface_rank(room: &Room) -> u8 {
    match (room.floor_visible, room.ceiling_visible) {
        (false, false) => 0,
        (true, false) => 1,
        (true, true) => 2,
        (false, true) => 3,
    }
}

#[derive(Default)]
pub struct DerivedGeometryCache {
    plan_bounds: Option<Rect>,
    wall_areas: Option<Arc<WallAreas>>,
    other_levels: Option<Arc<OtherLevels>>,
    door_cutouts: HashMap<ItemId, Arc<Region>>,
    sorted_rooms: Option<Arc<Vec<ItemId>>>,
    sorted_furniture: Option<Arc<Vec<ItemId>>>,
    text_bounds: HashMap<ItemId, (ItemKind, Option<Rect>)>,
    icons: IconCache,
    stats: CacheStats,
}

impl DerivedGeometryCache {
    pub fn new(icon_renderer: Option<Arc<dyn IconRenderer>>) -> Self {
        Self {
            icons: IconCache::new(icon_renderer),
            ..Self::default()
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn set_icon_renderer(&mut self, renderer: Option<Arc<dyn IconRenderer>>) {
        self.icons.set_renderer(renderer);
    }

    /// Extent of the plan in model units, margin excluded.
    pub fn plan_bounds(&mut self, home: &Home, preferences: &Preferences) -> Rect {
        if let Some(bounds) = self.plan_bounds {
            return bounds;
        }
        let bounds = plan_bounds(home, |item| self.item_bounds(home, item, preferences));
        self.stats.plan_bounds += 1;
        self.plan_bounds = Some(bounds);
        bounds
    }

    /// Bounds of `item` with its texts.
    pub fn item_bounds(&mut self, home: &Home, item: &PlanItem, preferences: &Preferences) -> Option<Rect> {
        let text = self.cached_text_bounds(item, preferences);
        match (shape_bounds(home, item), text) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    /// Bounds of the texts of `item`, measured once per item.
    pub fn cached_text_bounds(&mut self, item: &PlanItem, preferences: &Preferences) -> Option<Rect> {
        if let Some((_, bounds)) = self.text_bounds.get(&item.id()) {
            return *bounds;
        }
        let bounds = text_bounds(item, preferences);
        self.stats.text_bounds += 1;
        self.text_bounds.insert(item.id(), (item.kind(), bounds));
        bounds
    }

    /// Walls viewable at the selected level merged by pattern.
    pub fn wall_areas(&mut self, home: &Home, preferences: &Preferences) -> Arc<WallAreas> {
        if let Some(areas) = &self.wall_areas {
            return areas.clone();
        }
        let areas = Arc::new(viewable_wall_areas(home, preferences.plan.wall_pattern));
        self.stats.wall_areas += 1;
        self.wall_areas = Some(areas.clone());
        areas
    }

    /// Ghosts of the level group next to the selected one.
    pub fn other_levels(&mut self, home: &Home) -> Arc<OtherLevels> {
        if let Some(ghosts) = &self.other_levels {
            return ghosts.clone();
        }
        let ghosts = Arc::new(other_levels(home));
        self.stats.other_levels += 1;
        self.other_levels = Some(ghosts.clone());
        ghosts
    }

    /// Wall area cleared by a door or window.
    pub fn door_cutout(&mut self, home: &Home, piece: &Furniture) -> Arc<Region> {
        if let Some(region) = self.door_cutouts.get(&piece.id) {
            return region.clone();
        }
        let region = Arc::new(door_cutout(home, piece));
        self.stats.door_cutouts += 1;
        self.door_cutouts.insert(piece.id, region.clone());
        region
    }

    /// Rooms viewable at the selected level, lower levels first, then
    /// bare rooms, floors, rooms with both, and ceilings last.
    pub fn sorted_rooms(&mut self, home: &Home) -> Arc<Vec<ItemId>> {
        if let Some(rooms) = &self.sorted_rooms {
            return rooms.clone();
        }
        let mut rooms: Vec<(f32, i32, u8, ItemId)> = home
            .items()
            .iter()
            .filter(|item| home.is_viewable_at_selected_level(item))
            .filter_map(|item| {
                let room = item.as_room()?;
                let (elevation, index) = home
                    .item_level(item)
                    .map_or((0.0, 0), |l| (l.elevation, l.elevation_index));
                Some((elevation, index, surface_rank(room), room.id))
            })
            .collect();
        rooms.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
        let rooms = Arc::new(rooms.into_iter().map(|(_, _, _, id)| id).collect::<Vec<_>>());
        self.sorted_rooms = Some(rooms.clone());
        rooms
    }

    /// Visible furniture at the selected level, by ground elevation then
    /// level elevation.
    pub fn sorted_furniture(&mut self, home: &Home) -> Arc<Vec<ItemId>> {
        if let Some(furniture) = &self.sorted_furniture {
            return furniture.clone();
        }
        let mut furniture: Vec<(f32, f32, ItemId)> = home
            .items()
            .iter()
            .filter(|item| home.is_visible_at_selected_level(item))
            .filter_map(|item| {
                let piece = item.as_furniture()?;
                let level = home.item_level(item);
                Some((
                    piece.ground_elevation(level),
                    level.map_or(0.0, |l| l.elevation),
                    piece.id,
                ))
            })
            .collect();
        furniture.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        let furniture = Arc::new(furniture.into_iter().map(|(_, _, id)| id).collect::<Vec<_>>());
        self.sorted_furniture = Some(furniture.clone());
        furniture
    }

    /// Icon of a piece, shared with the pieces of equal key.
    pub fn icon(&mut self, piece: &Furniture, preferences: &Preferences) -> Option<Arc<TopViewIcon>> {
        self.icons.icon_for(piece, preferences)
    }

    pub fn icon_count(&self) -> usize {
        self.icons.icon_count()
    }

    /// Drop the entries made stale by a change.
    pub fn invalidate(&mut self, reason: ChangeReason, scope: CacheScope) {
        tracing::debug!("Invalidating {:?} for {}", scope, reason);
        self.plan_bounds = None;
        match scope {
            CacheScope::All => self.clear(),
            CacheScope::Home => {}
            CacheScope::Levels => {
                self.wall_areas = None;
                self.other_levels = None;
                self.sorted_rooms = None;
                self.sorted_furniture = None;
                self.door_cutouts.clear();
            }
            CacheScope::Kind(kind) => self.invalidate_items(reason, kind, None),
            CacheScope::Item { id, kind } => self.invalidate_items(reason, kind, Some(id)),
        }
    }

    fn invalidate_items(&mut self, reason: ChangeReason, kind: ItemKind, id: Option<ItemId>) {
        let restyled = reason == ChangeReason::Style;
        if reason == ChangeReason::LevelMembership {
            self.wall_areas = None;
            self.other_levels = None;
            self.sorted_rooms = None;
            self.sorted_furniture = None;
        }
        match kind {
            ItemKind::Wall => {
                self.wall_areas = None;
                if !restyled {
                    self.other_levels = None;
                    self.door_cutouts.clear();
                }
            }
            ItemKind::Room if !restyled => {
                self.other_levels = None;
                self.sorted_rooms = None;
            }
            ItemKind::Furniture => {
                if !restyled {
                    self.sorted_furniture = None;
                }
                match id {
                    Some(id) => {
                        if !restyled {
                            self.door_cutouts.remove(&id);
                        }
                        if matches!(reason, ChangeReason::Style | ChangeReason::Geometry) {
                            self.icons.release(id);
                        }
                    }
                    None => {
                        if !restyled {
                            self.door_cutouts.clear();
                        } else {
                            self.icons.clear();
                        }
                    }
                }
            }
            _ => {}
        }
        match id {
            Some(id) => {
                self.text_bounds.remove(&id);
            }
            None => self.text_bounds.retain(|_, (k, _)| *k != kind),
        }
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.plan_bounds = None;
        self.wall_areas = None;
        self.other_levels = None;
        self.door_cutouts.clear();
        self.sorted_rooms = None;
        self.sorted_furniture = None;
        self.text_bounds.clear();
        self.icons.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DoorOrWindow, Level, Room, Wall};
    use lyon::math::point;

    #[test]
    fn test_wall_areas_memoized_until_wall_change() {
        let mut home = Home::default();
        let id = home.add_item(Wall::new(0.0, 0.0, 300.0, 0.0, 20.0));
        let prefs = Preferences::default();
        let mut cache = DerivedGeometryCache::default();
        let first = cache.wall_areas(&home, &prefs);
        let second = cache.wall_areas(&home, &prefs);
        assert!(Arc::ptr_eq(&first, &second));

        cache.invalidate(ChangeReason::Style, CacheScope::Item { id: ItemId::new(), kind: ItemKind::Label });
        assert!(Arc::ptr_eq(&first, &cache.wall_areas(&home, &prefs)));

        cache.invalidate(ChangeReason::Geometry, CacheScope::Item { id, kind: ItemKind::Wall });
        cache.wall_areas(&home, &prefs);
        assert_eq!(cache.stats().wall_areas, 2);
    }

    #[test]
    fn test_plan_bounds_follow_items() {
        let mut home = Home::default();
        let prefs = Preferences::default();
        let mut cache = DerivedGeometryCache::default();
        let before = cache.plan_bounds(&home, &prefs);
        let id = home.add_item(Wall::new(0.0, 0.0, 2000.0, 0.0, 20.0));
        cache.invalidate(ChangeReason::Geometry, CacheScope::Item { id, kind: ItemKind::Wall });
        let after = cache.plan_bounds(&home, &prefs);
        assert!(after.max_x() > before.max_x());
    }

    #[test]
    fn test_empty_home_has_empty_regions() {
        let home = Home::default();
        let mut cache = DerivedGeometryCache::default();
        assert!(cache.wall_areas(&home, &Preferences::default()).outline.is_empty());
        assert!(cache.other_levels(&home).walls_region.is_empty());
    }

    #[test]
    fn test_text_bounds_of_one_item_dropped() {
        let prefs = Preferences::default();
        let mut cache = DerivedGeometryCache::default();
        let a = PlanItem::from(crate::model::Label::new("A", 0.0, 0.0));
        let b = PlanItem::from(crate::model::Label::new("B", 0.0, 0.0));
        cache.cached_text_bounds(&a, &prefs);
        cache.cached_text_bounds(&b, &prefs);
        cache.invalidate(ChangeReason::Style, CacheScope::Item { id: a.id(), kind: ItemKind::Label });
        cache.cached_text_bounds(&a, &prefs);
        cache.cached_text_bounds(&b, &prefs);
        assert_eq!(cache.stats().text_bounds, 3);
    }

    #[test]
    fn test_cutout_memoized_per_door() {
        let mut home = Home::default();
        let wall = home.add_item(Wall::new(0.0, 0.0, 300.0, 0.0, 20.0));
        let door = Furniture::door_or_window(
            "Door",
            150.0,
            0.0,
            80.0,
            10.0,
            210.0,
            DoorOrWindow {
                wall_cut_out_on_both_sides: true,
                ..DoorOrWindow::default()
            },
        );
        let mut cache = DerivedGeometryCache::default();
        let first = cache.door_cutout(&home, &door);
        assert!(!first.is_empty());
        assert!(Arc::ptr_eq(&first, &cache.door_cutout(&home, &door)));
        cache.invalidate(ChangeReason::Geometry, CacheScope::Item { id: wall, kind: ItemKind::Wall });
        cache.door_cutout(&home, &door);
        assert_eq!(cache.stats().door_cutouts, 2);
    }

    #[test]
    fn test_rooms_sorted_by_level() {
        let mut home = Home::default();
        let upper = home.add_level(Level::new("Upper", 300.0, 12.0, 250.0));
        let ground = home.add_level(Level::new("Ground", 0.0, 12.0, 250.0));
        let square = vec![point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)];
        let high = home.add_item(Room::new(square.clone()).on_level(upper));
        let low = home.add_item(Room::new(square).on_level(ground));
        home.select_level(Some(upper));
        let mut cache = DerivedGeometryCache::default();
        assert_eq!(cache.sorted_rooms(&home).as_slice(), [high]);

        home.update_level(ground, plankit_core::ItemProperty::Elevation, |l| l.elevation = 300.0)
            .expect("level");
        home.update_level(ground, plankit_core::ItemProperty::ElevationIndex, |l| l.elevation_index = -1)
            .expect("level");
        cache.invalidate(ChangeReason::LevelMembership, CacheScope::Levels);
        assert_eq!(cache.sorted_rooms(&home).as_slice(), [low, high]);
    }

    #[test]
    fn test_rooms_sorted_by_floor_and_ceiling() {
        let mut home = Home::default();
        let square = vec![point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0)];
        let room = |floor_visible, ceiling_visible| Room {
            floor_visible,
            ceiling_visible,
            ..Room::new(square.clone())
        };
        let floor = home.add_item(room(true, false));
        let ceiling = home.add_item(room(false, true));
        let both = home.add_item(room(true, true));
        let bare = home.add_item(room(false, false));
        let mut cache = DerivedGeometryCache::default();
        assert_eq!(cache.sorted_rooms(&home).as_slice(), [bare, floor, both, ceiling]);

        home.update_room(floor, plankit_core::ItemProperty::CeilingVisible, |r| r.ceiling_visible = true)
            .expect("room");
        cache.invalidate(
            ChangeReason::Visibility,
            CacheScope::Item { id: floor, kind: ItemKind::Room },
        );
        assert_eq!(cache.sorted_rooms(&home).as_slice(), [bare, floor, both, ceiling]);
        home.update_room(floor, plankit_core::ItemProperty::FloorVisible, |r| r.floor_visible = false)
            .expect("room");
        cache.invalidate(
            ChangeReason::Visibility,
            CacheScope::Item { id: floor, kind: ItemKind::Room },
        );
        assert_eq!(cache.sorted_rooms(&home).as_slice(), [bare, both, floor, ceiling]);
    }
}
