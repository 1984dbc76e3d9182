//! Mapping from plan events to cache invalidations and paint requests.
//!
//! Every event a home publishes is classified into a [`ChangeReason`] and the
//! [`CacheScope`] it touches, plus the [`UpdateAction`] the view needs: a
//! plain repaint when only colors changed, a revalidation when the plan
//! bounds may have moved.

use parking_lot::Mutex;
use plankit_core::event_bus::{
    CollectionEvent, HomeEvent, LevelEvent, PreferencesEvent, RenderEvent,
};
use plankit_core::{
    preference_reason, reason_for, ChangeReason, EventBus, EventFilter, ItemKind, ItemProperty,
    PlanEvent, PreferenceKey, SubscriptionId,
};
use std::sync::Arc;

use crate::cache::{CacheScope, DerivedGeometryCache};
use crate::scheduler::PaintScheduler;

/// What the view does after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpdateAction {
    /// Paint again with the same size.
    Repaint,
    /// Recompute the plan bounds, then paint.
    Revalidate,
}

impl UpdateAction {
    /// The stronger of two actions.
    pub fn merge(self, other: UpdateAction) -> UpdateAction {
        self.max(other)
    }
}

/// Cache entries to drop and the update to request for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    pub reason: ChangeReason,
    pub scopes: Vec<CacheScope>,
    pub action: UpdateAction,
}

impl Invalidation {
    fn new(reason: ChangeReason, scopes: Vec<CacheScope>, action: UpdateAction) -> Self {
        Self {
            reason,
            scopes,
            action,
        }
    }

    fn repaint_only() -> Self {
        Self::new(ChangeReason::Style, Vec::new(), UpdateAction::Repaint)
    }

    /// Drop the stale entries of `cache`.
    pub fn apply(&self, cache: &mut DerivedGeometryCache) {
        for scope in &self.scopes {
            cache.invalidate(self.reason, *scope);
        }
    }
}

/// Properties whose change never moves a shape or a text.
fn is_paint_only(property: ItemProperty) -> bool {
    use ItemProperty::*;
    matches!(
        property,
        Color
            | OutlineColor
            | Texture
            | ModelMaterials
            | Shininess
            | FloorColor
            | FloorTexture
            | TopColor
            | Pattern
            | CapStyle
            | JoinStyle
            | DashStyle
            | Power
            | CeilingVisible
    )
}

/// Reason and update action of an item property change.
pub fn classify(kind: ItemKind, property: ItemProperty) -> (ChangeReason, UpdateAction) {
    let action = if is_paint_only(property) {
        UpdateAction::Repaint
    } else {
        UpdateAction::Revalidate
    };
    (reason_for(kind, property), action)
}

/// Reason, scopes and update action of a preference change.
pub fn preference_invalidation(key: PreferenceKey) -> Invalidation {
    let reason = preference_reason(key);
    match key {
        PreferenceKey::LengthUnit => Invalidation::new(
            reason,
            vec![
                CacheScope::Kind(ItemKind::Room),
                CacheScope::Kind(ItemKind::DimensionLine),
            ],
            UpdateAction::Revalidate,
        ),
        PreferenceKey::DefaultFontName => Invalidation::new(
            reason,
            [ItemKind::Room, ItemKind::Furniture, ItemKind::DimensionLine, ItemKind::Label]
                .into_iter()
                .map(CacheScope::Kind)
                .collect(),
            UpdateAction::Revalidate,
        ),
        PreferenceKey::FurnitureViewedFromTop | PreferenceKey::FurnitureModelIconSize => Invalidation::new(
            reason,
            vec![CacheScope::Kind(ItemKind::Furniture)],
            UpdateAction::Repaint,
        ),
        PreferenceKey::WallPattern | PreferenceKey::NewWallPattern => Invalidation::new(
            reason,
            vec![CacheScope::Kind(ItemKind::Wall)],
            UpdateAction::Repaint,
        ),
        PreferenceKey::GridVisible
        | PreferenceKey::RoomFloorColoredOrTextured
        | PreferenceKey::SelectionColor => Invalidation::new(reason, Vec::new(), UpdateAction::Repaint),
    }
}

/// Classify `event`, `None` when the view ignores it.
pub fn invalidation_for(event: &PlanEvent) -> Option<Invalidation> {
    let invalidation = match event {
        PlanEvent::Collection(CollectionEvent::Added { id, kind } | CollectionEvent::Removed { id, kind }) => {
            Invalidation::new(
                ChangeReason::Geometry,
                vec![CacheScope::Item { id: *id, kind: *kind }],
                UpdateAction::Revalidate,
            )
        }
        PlanEvent::Item(change) => {
            let (_, action) = classify(change.kind, change.property);
            Invalidation::new(
                change.reason,
                vec![CacheScope::Item {
                    id: change.id,
                    kind: change.kind,
                }],
                action,
            )
        }
        PlanEvent::Level(LevelEvent::Changed { reason, .. }) => {
            let action = if *reason == ChangeReason::Style {
                UpdateAction::Repaint
            } else {
                UpdateAction::Revalidate
            };
            Invalidation::new(*reason, vec![CacheScope::Levels], action)
        }
        PlanEvent::Level(_) => Invalidation::new(
            ChangeReason::LevelMembership,
            vec![CacheScope::Levels],
            UpdateAction::Revalidate,
        ),
        PlanEvent::Selection(_) => Invalidation::repaint_only(),
        PlanEvent::Preferences(PreferencesEvent::Changed { key }) => preference_invalidation(*key),
        PlanEvent::Preferences(PreferencesEvent::Loaded { .. }) => {
            Invalidation::new(ChangeReason::Geometry, vec![CacheScope::All], UpdateAction::Revalidate)
        }
        PlanEvent::Home(HomeEvent::BackgroundImageChanged) => {
            Invalidation::new(ChangeReason::Style, vec![CacheScope::Home], UpdateAction::Revalidate)
        }
        PlanEvent::Render(
            RenderEvent::TextureLoaded { .. } | RenderEvent::TextureFailed { .. } | RenderEvent::RepaintRequested,
        ) => Invalidation::repaint_only(),
        PlanEvent::Render(RenderEvent::WatchdogFired | RenderEvent::ExportCancelled) => return None,
    };
    Some(invalidation)
}

/// Subscribe `cache` and `scheduler` to the events of `bus`.
///
/// Entries are dropped inside the publish call, before the publisher
/// returns, so a paint following a change never sees stale geometry.
/// Renderer events never lock the cache: they are published from inside a
/// paint when textures load synchronously.
pub fn subscribe(
    bus: &EventBus,
    cache: Arc<Mutex<DerivedGeometryCache>>,
    scheduler: PaintScheduler,
) -> SubscriptionId {
    bus.subscribe(EventFilter::All, move |event| {
        let Some(invalidation) = invalidation_for(&event) else {
            return;
        };
        if !invalidation.scopes.is_empty() {
            invalidation.apply(&mut cache.lock());
        }
        tracing::trace!("{} -> {:?}", event.description(), invalidation.action);
        scheduler.request(invalidation.action);
    })
}
