//! Event type definitions for the event bus.
//!
//! Every observable change of a home document, its selection or the user
//! preferences is published as a [`PlanEvent`]. Events are cloneable and
//! serializable for logging and replay.

use serde::{Deserialize, Serialize};

use crate::data::{ChangeReason, ItemId, ItemKind, ItemProperty, LevelId, PreferenceKey};

/// Root event enum for all plan events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlanEvent {
    /// Items added to or removed from a home collection
    Collection(CollectionEvent),
    /// A property of an item changed
    Item(ItemEvent),
    /// Level list or level property changes
    Level(LevelEvent),
    /// Selection changed
    Selection(SelectionEvent),
    /// A user preference changed
    Preferences(PreferencesEvent),
    /// Renderer notifications (textures, icons, export)
    Render(RenderEvent),
    /// Home-wide property changes
    Home(HomeEvent),
}

impl PlanEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            PlanEvent::Collection(_) => EventCategory::Collection,
            PlanEvent::Item(_) => EventCategory::Item,
            PlanEvent::Level(_) => EventCategory::Level,
            PlanEvent::Selection(_) => EventCategory::Selection,
            PlanEvent::Preferences(_) => EventCategory::Preferences,
            PlanEvent::Render(_) => EventCategory::Render,
            PlanEvent::Home(_) => EventCategory::Home,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            PlanEvent::Collection(e) => e.description(),
            PlanEvent::Item(e) => e.description(),
            PlanEvent::Level(e) => e.description(),
            PlanEvent::Selection(e) => e.description(),
            PlanEvent::Preferences(e) => e.description(),
            PlanEvent::Render(e) => e.description(),
            PlanEvent::Home(e) => e.description(),
        }
    }

    /// Shorthand for an item property change with its derived reason.
    pub fn item_changed(id: ItemId, kind: ItemKind, property: ItemProperty) -> Self {
        PlanEvent::Item(ItemEvent {
            id,
            kind,
            property,
            reason: crate::data::reason_for(kind, property),
        })
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Item collection events.
    Collection,
    /// Item property events.
    Item,
    /// Level events.
    Level,
    /// Selection events.
    Selection,
    /// User preference events.
    Preferences,
    /// Renderer events.
    Render,
    /// Home-wide events.
    Home,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Collection => write!(f, "Collection"),
            EventCategory::Item => write!(f, "Item"),
            EventCategory::Level => write!(f, "Level"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::Preferences => write!(f, "Preferences"),
            EventCategory::Render => write!(f, "Render"),
            EventCategory::Home => write!(f, "Home"),
        }
    }
}

/// Collection membership events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CollectionEvent {
    /// An item was added to the home.
    Added {
        /// New item.
        id: ItemId,
        /// Item kind.
        kind: ItemKind,
    },
    /// An item was removed from the home.
    Removed {
        /// Removed item.
        id: ItemId,
        /// Item kind.
        kind: ItemKind,
    },
}

impl CollectionEvent {
    /// Kind of the added or removed item.
    pub fn kind(&self) -> ItemKind {
        match self {
            CollectionEvent::Added { kind, .. } | CollectionEvent::Removed { kind, .. } => *kind,
        }
    }

    fn description(&self) -> String {
        match self {
            CollectionEvent::Added { id, kind } => format!("Added {} {}", kind, id),
            CollectionEvent::Removed { id, kind } => format!("Removed {} {}", kind, id),
        }
    }
}

/// Property change of a single item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEvent {
    /// Changed item.
    pub id: ItemId,
    /// Item kind.
    pub kind: ItemKind,
    /// Changed property.
    pub property: ItemProperty,
    /// Classified change reason.
    pub reason: ChangeReason,
}

impl ItemEvent {
    fn description(&self) -> String {
        format!(
            "{} {} changed {} ({})",
            self.kind, self.id, self.property, self.reason
        )
    }
}

/// Level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LevelEvent {
    /// A level was added.
    Added {
        /// New level.
        id: LevelId,
    },
    /// A level was removed.
    Removed {
        /// Removed level.
        id: LevelId,
    },
    /// A level property changed.
    Changed {
        /// Changed level.
        id: LevelId,
        /// Changed property.
        property: ItemProperty,
        /// Classified change reason.
        reason: ChangeReason,
    },
    /// The selected level changed.
    Selected {
        /// Newly selected level, if any.
        id: Option<LevelId>,
    },
}

impl LevelEvent {
    fn description(&self) -> String {
        match self {
            LevelEvent::Added { id } => format!("Added {}", id),
            LevelEvent::Removed { id } => format!("Removed {}", id),
            LevelEvent::Changed {
                id,
                property,
                reason,
            } => format!("{} changed {} ({})", id, property, reason),
            LevelEvent::Selected { id: Some(id) } => format!("Selected {}", id),
            LevelEvent::Selected { id: None } => "Selected no level".to_string(),
        }
    }
}

/// Selection events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// Selected items changed.
    Changed {
        /// Number of selected items.
        count: usize,
    },
}

impl SelectionEvent {
    fn description(&self) -> String {
        match self {
            SelectionEvent::Changed { count } => format!("Selection changed ({} items)", count),
        }
    }
}

/// Preference events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PreferencesEvent {
    /// A preference value changed.
    Changed {
        /// Changed preference.
        key: PreferenceKey,
    },
    /// Preferences were reloaded from disk.
    Loaded {
        /// Path of the loaded file.
        path: String,
    },
}

impl PreferencesEvent {
    fn description(&self) -> String {
        match self {
            PreferencesEvent::Changed { key } => format!("Preference changed: {}", key),
            PreferencesEvent::Loaded { path } => format!("Preferences loaded from {}", path),
        }
    }
}

/// Renderer events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenderEvent {
    /// A texture image finished loading.
    TextureLoaded {
        /// Image reference.
        image: String,
    },
    /// A texture image failed to load.
    TextureFailed {
        /// Image reference.
        image: String,
        /// Failure description.
        error: String,
    },
    /// A paint was requested.
    RepaintRequested,
    /// The paint watchdog flushed a coalesced request.
    WatchdogFired,
    /// An export was cancelled.
    ExportCancelled,
}

impl RenderEvent {
    fn description(&self) -> String {
        match self {
            RenderEvent::TextureLoaded { image } => format!("Texture loaded: {}", image),
            RenderEvent::TextureFailed { image, error } => {
                format!("Texture failed: {} ({})", image, error)
            }
            RenderEvent::RepaintRequested => "Repaint requested".to_string(),
            RenderEvent::WatchdogFired => "Paint watchdog fired".to_string(),
            RenderEvent::ExportCancelled => "Export cancelled".to_string(),
        }
    }
}

/// Home-wide events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HomeEvent {
    /// The home background image, used when the home has no level, changed.
    BackgroundImageChanged,
}

impl HomeEvent {
    fn description(&self) -> String {
        match self {
            HomeEvent::BackgroundImageChanged => "Home background image changed".to_string(),
        }
    }
}
