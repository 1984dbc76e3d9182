use lyon::math::Point;
use plankit_core::event_bus::{
    CollectionEvent, HomeEvent, LevelEvent, SelectionEvent,
};
use plankit_core::{
    level_reason, EventBus, ItemId, ItemKind, ItemProperty, LevelId, ModelError, PlanEvent,
};
use std::sync::Arc;

use super::{
    BackgroundImage, Camera, Compass, DimensionLine, Furniture, Label, Level, PlanItem, Polyline,
    Room, Wall,
};

/// Home document: the items of a plan, its levels and the selection.
///
/// Every mutation goes through a method that publishes the matching
/// [`PlanEvent`] on the home bus, so views can keep their caches in step.
pub struct Home {
    items: Vec<PlanItem>,
    levels: Vec<Level>,
    selected_level: Option<LevelId>,
    selected_items: Vec<ItemId>,
    background_image: Option<BackgroundImage>,
    bus: Arc<EventBus>,
}

macro_rules! typed_update {
    ($($name:ident => $ty:ident, $kind:ident, $accessor:ident;)*) => {
        $(
            pub fn $name(
                &mut self,
                id: ItemId,
                property: ItemProperty,
                f: impl FnOnce(&mut $ty),
            ) -> Result<(), ModelError> {
                self.update(id, property, |item| match item.$accessor() {
                    Some(value) => {
                        f(value);
                        Ok(())
                    }
                    None => Err(ItemKind::$kind),
                })
            }
        )*
    };
}

macro_rules! typed_iter {
    ($($name:ident => $ty:ident, $accessor:ident;)*) => {
        $(
            pub fn $name(&self) -> impl Iterator<Item = &$ty> + '_ {
                self.items.iter().filter_map(PlanItem::$accessor)
            }
        )*
    };
}

impl Home {
    /// Empty home with a compass and an inactive observer camera.
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            items: vec![
                PlanItem::Compass(Compass::default()),
                PlanItem::Camera(Camera::observer(50.0, 50.0, 170.0)),
            ],
            levels: Vec::new(),
            selected_level: None,
            selected_items: Vec::new(),
            background_image: None,
            bus,
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    fn publish(&self, event: PlanEvent) {
        // Nobody listening is fine for a document.
        self.bus.publish(event).ok();
    }

    // ---------------------------------------------------------------------
    // Items
    // ---------------------------------------------------------------------

    pub fn items(&self) -> &[PlanItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&PlanItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    typed_iter! {
        walls => Wall, as_wall;
        rooms => Room, as_room;
        furniture => Furniture, as_furniture;
        dimension_lines => DimensionLine, as_dimension_line;
        labels => Label, as_label;
        polylines => Polyline, as_polyline;
    }

    pub fn wall(&self, id: ItemId) -> Option<&Wall> {
        self.item(id).and_then(PlanItem::as_wall)
    }

    pub fn compass(&self) -> Option<&Compass> {
        self.items.iter().find_map(PlanItem::as_compass)
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.items.iter().find_map(PlanItem::as_camera)
    }

    /// Add an item and return its id.
    pub fn add_item(&mut self, item: impl Into<PlanItem>) -> ItemId {
        let item = item.into();
        let (id, kind) = (item.id(), item.kind());
        self.items.push(item);
        tracing::debug!("Added {} {}", kind, id);
        self.publish(PlanEvent::Collection(CollectionEvent::Added { id, kind }));
        id
    }

    /// Remove an item, detaching walls joined to a removed wall.
    pub fn remove_item(&mut self, id: ItemId) -> Result<PlanItem, ModelError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(ModelError::UnknownItem(id))?;
        let item = self.items.remove(index);
        let kind = item.kind();

        if kind == ItemKind::Wall {
            let mut detached = Vec::new();
            for other in self.items.iter_mut().filter_map(PlanItem::as_wall_mut) {
                if other.wall_at_start == Some(id) {
                    other.wall_at_start = None;
                    detached.push((other.id, ItemProperty::WallAtStart));
                }
                if other.wall_at_end == Some(id) {
                    other.wall_at_end = None;
                    detached.push((other.id, ItemProperty::WallAtEnd));
                }
            }
            for (wall, property) in detached {
                self.publish(PlanEvent::item_changed(wall, ItemKind::Wall, property));
            }
        }

        if let Some(position) = self.selected_items.iter().position(|s| *s == id) {
            self.selected_items.remove(position);
            self.publish(PlanEvent::Selection(SelectionEvent::Changed {
                count: self.selected_items.len(),
            }));
        }

        tracing::debug!("Removed {} {}", kind, id);
        self.publish(PlanEvent::Collection(CollectionEvent::Removed { id, kind }));
        Ok(item)
    }

    /// Change one property of an item.
    ///
    /// `f` returns the expected kind as error when the item is not of the
    /// kind it edits; nothing is published then.
    pub fn update(
        &mut self,
        id: ItemId,
        property: ItemProperty,
        f: impl FnOnce(&mut PlanItem) -> Result<(), ItemKind>,
    ) -> Result<(), ModelError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(ModelError::UnknownItem(id))?;
        let actual = item.kind();
        f(item).map_err(|expected| ModelError::WrongKind {
            id,
            expected,
            actual,
        })?;
        self.publish(PlanEvent::item_changed(id, actual, property));
        Ok(())
    }

    typed_update! {
        update_wall => Wall, Wall, as_wall_mut;
        update_room => Room, Room, as_room_mut;
        update_furniture => Furniture, Furniture, as_furniture_mut;
        update_dimension_line => DimensionLine, DimensionLine, as_dimension_line_mut;
        update_label => Label, Label, as_label_mut;
        update_polyline => Polyline, Polyline, as_polyline_mut;
        update_compass => Compass, Compass, as_compass_mut;
        update_camera => Camera, Camera, as_camera_mut;
    }

    /// Join the end of `first` to the start of `second`.
    pub fn join_walls(&mut self, first: ItemId, second: ItemId) -> Result<(), ModelError> {
        if self.wall(second).is_none() {
            return Err(ModelError::UnknownItem(second));
        }
        self.update_wall(first, ItemProperty::WallAtEnd, |wall| {
            wall.wall_at_end = Some(second)
        })?;
        self.update_wall(second, ItemProperty::WallAtStart, |wall| {
            wall.wall_at_start = Some(first)
        })
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn selected_items(&self) -> &[ItemId] {
        &self.selected_items
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected_items.contains(&id)
    }

    /// Replace the selection, ignoring unknown ids.
    pub fn set_selected_items(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        let selected: Vec<ItemId> = ids
            .into_iter()
            .filter(|id| self.item(*id).is_some())
            .collect();
        self.selected_items = selected;
        self.publish(PlanEvent::Selection(SelectionEvent::Changed {
            count: self.selected_items.len(),
        }));
    }

    // ---------------------------------------------------------------------
    // Levels
    // ---------------------------------------------------------------------

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, id: LevelId) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// Levels ordered by elevation then elevation index.
    pub fn sorted_levels(&self) -> Vec<&Level> {
        let mut levels: Vec<&Level> = self.levels.iter().collect();
        levels.sort_by(|a, b| {
            a.elevation
                .total_cmp(&b.elevation)
                .then(a.elevation_index.cmp(&b.elevation_index))
        });
        levels
    }

    /// Add a level; the first level added becomes the selected one.
    pub fn add_level(&mut self, level: Level) -> LevelId {
        let id = level.id;
        self.levels.push(level);
        self.publish(PlanEvent::Level(LevelEvent::Added { id }));
        if self.selected_level.is_none() {
            self.select_level(Some(id));
        }
        id
    }

    pub fn remove_level(&mut self, id: LevelId) -> Result<Level, ModelError> {
        let index = self
            .levels
            .iter()
            .position(|level| level.id == id)
            .ok_or(ModelError::UnknownLevel(id))?;
        let level = self.levels.remove(index);
        self.publish(PlanEvent::Level(LevelEvent::Removed { id }));
        if self.selected_level == Some(id) {
            let next = self.sorted_levels().first().map(|level| level.id);
            self.select_level(next);
        }
        Ok(level)
    }

    pub fn update_level(
        &mut self,
        id: LevelId,
        property: ItemProperty,
        f: impl FnOnce(&mut Level),
    ) -> Result<(), ModelError> {
        let level = self
            .levels
            .iter_mut()
            .find(|level| level.id == id)
            .ok_or(ModelError::UnknownLevel(id))?;
        f(level);
        self.publish(PlanEvent::Level(LevelEvent::Changed {
            id,
            property,
            reason: level_reason(property),
        }));
        Ok(())
    }

    pub fn selected_level(&self) -> Option<&Level> {
        self.selected_level.and_then(|id| self.level(id))
    }

    pub fn select_level(&mut self, id: Option<LevelId>) {
        if self.selected_level != id {
            self.selected_level = id;
            self.publish(PlanEvent::Level(LevelEvent::Selected { id }));
        }
    }

    pub fn item_level(&self, item: &PlanItem) -> Option<&Level> {
        item.level().and_then(|id| self.level(id))
    }

    /// Whether `item` shows at `level`: it belongs to it, to a level at the
    /// same elevation listed before it, or it rises from a lower level
    /// through the floor of `level`.
    pub fn is_at_level(&self, item: &PlanItem, level: Option<&Level>) -> bool {
        let item_level = self.item_level(item);
        if item_level.map(|l| l.id) == level.map(|l| l.id) {
            return true;
        }
        let (Some(item_level), Some(level)) = (item_level, level) else {
            return false;
        };
        if item_level.is_below_at_same_elevation(level) {
            return true;
        }
        if item_level.elevation >= level.elevation {
            return false;
        }
        match item {
            PlanItem::Wall(wall) => item_level.elevation + wall.maximum_height() > level.elevation,
            PlanItem::Furniture(piece) => {
                item_level.elevation + piece.elevation + piece.height_in_plan() > level.elevation
            }
            _ => false,
        }
    }

    /// Whether `item` is drawn at the selected level.
    pub fn is_viewable_at_selected_level(&self, item: &PlanItem) -> bool {
        match self.item_level(item) {
            None => true,
            Some(level) => level.viewable && self.is_at_level(item, self.selected_level()),
        }
    }

    /// Whether `item` is drawn at the selected level and visible.
    pub fn is_visible_at_selected_level(&self, item: &PlanItem) -> bool {
        let visible = match item {
            PlanItem::Furniture(piece) => piece.visible,
            PlanItem::Compass(compass) => compass.visible,
            _ => true,
        };
        visible && self.is_viewable_at_selected_level(item)
    }

    // ---------------------------------------------------------------------
    // Derived shapes
    // ---------------------------------------------------------------------

    /// Outline of a wall mitered against the walls joined to it.
    pub fn wall_points(&self, wall: &Wall) -> Vec<Point> {
        let at_start = wall.wall_at_start.and_then(|id| self.wall(id));
        let at_end = wall.wall_at_end.and_then(|id| self.wall(id));
        wall.joined_points(at_start, at_end)
    }

    // ---------------------------------------------------------------------
    // Background image
    // ---------------------------------------------------------------------

    pub fn background_image(&self) -> Option<&BackgroundImage> {
        self.background_image.as_ref()
    }

    /// Image shown under the plan: the one of the selected level, or the
    /// home one when there are no levels.
    pub fn displayed_background_image(&self) -> Option<&BackgroundImage> {
        let image = match self.selected_level() {
            Some(level) => level.background_image.as_ref(),
            None => self.background_image.as_ref(),
        };
        image.filter(|image| image.visible)
    }

    pub fn set_background_image(&mut self, image: Option<BackgroundImage>) {
        self.background_image = image;
        self.publish(PlanEvent::Home(HomeEvent::BackgroundImageChanged));
    }
}

impl Default for Home {
    fn default() -> Self {
        Self::new(Arc::new(EventBus::new()))
    }
}

impl std::fmt::Debug for Home {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Home")
            .field("items", &self.items.len())
            .field("levels", &self.levels.len())
            .field("selected_items", &self.selected_items)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plankit_core::event_bus::EventFilter;
    use parking_lot::Mutex;

    #[test]
    fn test_add_and_update_publish_events() {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(EventFilter::All, move |event| sink.lock().push(event));

        let mut home = Home::new(bus);
        let id = home.add_item(Room::new(Vec::new()));
        home.update_room(id, ItemProperty::Name, |room| {
            room.name = Some("Kitchen".into())
        })
        .expect("room");

        let events = seen.lock();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            PlanEvent::Item(ref e) if e.id == id && e.property == ItemProperty::Name
        ));
    }

    #[test]
    fn test_update_wrong_kind() {
        let mut home = Home::default();
        let id = home.add_item(Label::new("Hi", 0.0, 0.0));
        let err = home
            .update_wall(id, ItemProperty::Thickness, |w| w.thickness = 3.0)
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::WrongKind {
                id,
                expected: ItemKind::Wall,
                actual: ItemKind::Label
            }
        );
    }

    #[test]
    fn test_remove_wall_detaches_joins() {
        let mut home = Home::default();
        let a = home.add_item(Wall::new(0.0, 0.0, 100.0, 0.0, 10.0));
        let b = home.add_item(Wall::new(100.0, 0.0, 100.0, 100.0, 10.0));
        home.join_walls(a, b).expect("join");
        home.remove_item(a).expect("remove");
        assert_eq!(home.wall(b).and_then(|w| w.wall_at_start), None);
    }

    #[test]
    fn test_wall_rising_through_upper_level() {
        let mut home = Home::default();
        let ground = home.add_level(Level::new("Ground", 0.0, 12.0, 250.0));
        let upper = home.add_level(Level::new("Upper", 250.0, 12.0, 250.0));
        let tall = Wall::new(0.0, 0.0, 100.0, 0.0, 10.0)
            .with_height(400.0)
            .on_level(ground);
        let low = Wall::new(0.0, 0.0, 100.0, 0.0, 10.0).on_level(ground);
        let tall = PlanItem::from(tall);
        let low = PlanItem::from(low);
        assert!(home.is_at_level(&tall, home.level(upper)));
        assert!(!home.is_at_level(&low, home.level(upper)));
        home.select_level(Some(upper));
        assert!(home.is_viewable_at_selected_level(&tall));
    }
}
