//! Preferences manager
//!
//! Owns the live preferences, publishes a [`PreferencesEvent`] on every
//! change, and resolves the platform preferences file.

use parking_lot::RwLock;
use plankit_core::event_bus::PreferencesEvent;
use plankit_core::{
    Color, EventBus, LengthUnit, PlanEvent, PreferenceKey, WallPattern,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{PointerType, Preferences};
use crate::error::{ConfigError, SettingsError, SettingsResult};

const APP_DIR: &str = "plankit";
const PREFERENCES_FILE: &str = "preferences.toml";

/// Live preferences shared by the plan views
pub struct PreferencesManager {
    preferences: RwLock<Preferences>,
    bus: Arc<EventBus>,
}

impl PreferencesManager {
    pub fn new(preferences: Preferences, bus: Arc<EventBus>) -> Self {
        Self {
            preferences: RwLock::new(preferences),
            bus,
        }
    }

    /// Copy of the current preferences.
    pub fn snapshot(&self) -> Preferences {
        self.preferences.read().clone()
    }

    /// Read the current preferences without copying them.
    pub fn with<R>(&self, f: impl FnOnce(&Preferences) -> R) -> R {
        f(&self.preferences.read())
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn set_length_unit(&self, unit: LengthUnit) {
        self.update(PreferenceKey::LengthUnit, |p| {
            std::mem::replace(&mut p.units.length_unit, unit) != unit
        });
    }

    pub fn set_grid_visible(&self, visible: bool) {
        self.update(PreferenceKey::GridVisible, |p| {
            std::mem::replace(&mut p.plan.grid_visible, visible) != visible
        });
    }

    pub fn set_furniture_viewed_from_top(&self, from_top: bool) {
        self.update(PreferenceKey::FurnitureViewedFromTop, |p| {
            std::mem::replace(&mut p.plan.furniture_viewed_from_top, from_top) != from_top
        });
    }

    pub fn set_furniture_model_icon_size(&self, size: u32) {
        if size == 0 {
            tracing::warn!("Ignoring furniture icon size 0");
            return;
        }
        self.update(PreferenceKey::FurnitureModelIconSize, |p| {
            std::mem::replace(&mut p.plan.furniture_model_icon_size, size) != size
        });
    }

    pub fn set_room_floor_colored_or_textured(&self, enabled: bool) {
        self.update(PreferenceKey::RoomFloorColoredOrTextured, |p| {
            std::mem::replace(&mut p.plan.room_floor_colored_or_textured, enabled) != enabled
        });
    }

    pub fn set_wall_pattern(&self, pattern: WallPattern) {
        self.update(PreferenceKey::WallPattern, |p| {
            std::mem::replace(&mut p.plan.wall_pattern, pattern) != pattern
        });
    }

    pub fn set_new_wall_pattern(&self, pattern: Option<WallPattern>) {
        self.update(PreferenceKey::NewWallPattern, |p| {
            std::mem::replace(&mut p.plan.new_wall_pattern, pattern) != pattern
        });
    }

    pub fn set_selection_color(&self, color: Color) {
        self.update(PreferenceKey::SelectionColor, |p| {
            std::mem::replace(&mut p.plan.selection_color, color) != color
        });
    }

    pub fn set_default_font_name(&self, font_name: Option<String>) {
        self.update(PreferenceKey::DefaultFontName, |p| {
            let changed = p.text.default_font_name != font_name;
            p.text.default_font_name = font_name;
            changed
        });
    }

    pub fn set_pointer_type(&self, pointer_type: PointerType) {
        // Pointer type only sizes feedback drawn on the next paint.
        self.preferences.write().plan.pointer_type = pointer_type;
    }

    /// Replace all preferences, publishing one change per differing key.
    pub fn replace(&self, preferences: Preferences) {
        let previous = std::mem::replace(&mut *self.preferences.write(), preferences.clone());
        let mut changed = Vec::new();
        if previous.units.length_unit != preferences.units.length_unit {
            changed.push(PreferenceKey::LengthUnit);
        }
        if previous.plan.grid_visible != preferences.plan.grid_visible {
            changed.push(PreferenceKey::GridVisible);
        }
        if previous.plan.furniture_viewed_from_top != preferences.plan.furniture_viewed_from_top {
            changed.push(PreferenceKey::FurnitureViewedFromTop);
        }
        if previous.plan.furniture_model_icon_size != preferences.plan.furniture_model_icon_size {
            changed.push(PreferenceKey::FurnitureModelIconSize);
        }
        if previous.plan.room_floor_colored_or_textured
            != preferences.plan.room_floor_colored_or_textured
        {
            changed.push(PreferenceKey::RoomFloorColoredOrTextured);
        }
        if previous.plan.wall_pattern != preferences.plan.wall_pattern {
            changed.push(PreferenceKey::WallPattern);
        }
        if previous.plan.new_wall_pattern != preferences.plan.new_wall_pattern {
            changed.push(PreferenceKey::NewWallPattern);
        }
        if previous.plan.selection_color != preferences.plan.selection_color {
            changed.push(PreferenceKey::SelectionColor);
        }
        if previous.text != preferences.text {
            changed.push(PreferenceKey::DefaultFontName);
        }
        for key in changed {
            self.publish(key);
        }
    }

    /// Load preferences from `path` and publish the differences.
    pub fn load(&self, path: &Path) -> SettingsResult<()> {
        let preferences = Preferences::load_from_file(path)?;
        self.replace(preferences);
        self.bus
            .publish(PlanEvent::Preferences(PreferencesEvent::Loaded {
                path: path.display().to_string(),
            }))
            .ok();
        Ok(())
    }

    /// Save the current preferences to `path`.
    pub fn save(&self, path: &Path) -> SettingsResult<()> {
        self.snapshot().save_to_file(path)
    }

    /// Get the platform preferences directory
    pub fn config_directory() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| {
                ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string()).into()
            })
    }

    /// Get the platform preferences file path
    pub fn config_file_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_directory()?.join(PREFERENCES_FILE))
    }

    /// Create the preferences directory if missing
    pub fn ensure_config_dir() -> SettingsResult<PathBuf> {
        let dir = Self::config_directory()?;
        std::fs::create_dir_all(&dir)
            .map_err(|e| SettingsError::ConfigDirectory(format!("{}: {}", dir.display(), e)))?;
        Ok(dir)
    }

    fn update(&self, key: PreferenceKey, apply: impl FnOnce(&mut Preferences) -> bool) {
        let changed = apply(&mut *self.preferences.write());
        if changed {
            self.publish(key);
        }
    }

    fn publish(&self, key: PreferenceKey) {
        tracing::debug!("Preference {} changed", key);
        // Nobody listening is fine: preferences are read on the next paint.
        self.bus
            .publish(PlanEvent::Preferences(PreferencesEvent::Changed { key }))
            .ok();
    }
}

impl std::fmt::Debug for PreferencesManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferencesManager")
            .field("preferences", &*self.preferences.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plankit_core::{EventCategory, EventFilter};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_change_publishes_once() {
        let bus = Arc::new(EventBus::new());
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Preferences]),
            move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            },
        );

        let manager = PreferencesManager::new(Preferences::default(), bus);
        manager.set_grid_visible(false);
        manager.set_grid_visible(false);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!manager.snapshot().plan.grid_visible);
    }

    #[test]
    fn test_replace_publishes_differences() {
        let bus = Arc::new(EventBus::new());
        let keys = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = keys.clone();
        bus.subscribe(EventFilter::All, move |event| {
            if let PlanEvent::Preferences(PreferencesEvent::Changed { key }) = event {
                sink.lock().push(key);
            }
        });
        let manager = PreferencesManager::new(Preferences::default(), bus.clone());

        let mut next = Preferences::default();
        next.units.length_unit = LengthUnit::Meter;
        next.plan.wall_pattern = WallPattern::CrossHatch;
        manager.replace(next);

        assert_eq!(keys.lock().len(), 2);
    }
}
