//! # Plankit Core
//!
//! Core types, events, and utilities shared by the Plankit crates.
//! Provides item identifiers and kinds, the change-reason vocabulary used
//! for cache invalidation, the typed event bus, length units, style values, and
//! the unified error type.

pub mod constants;
pub mod data;
pub mod error;
pub mod event_bus;
pub mod style;
pub mod types;
pub mod units;

pub use data::{
    level_reason, preference_reason, reason_for, ChangeReason, ItemId, ItemKind, ItemProperty,
    LevelId, PreferenceKey,
};

pub use error::{Error, GeometryError, ModelError, RenderError, Result, TextureError};

// Re-export event bus for convenience
pub use event_bus::{
    EventBus, EventBusError, EventCategory, EventFilter, PlanEvent, SubscriptionId,
};

pub use types::{
    shared, thread_safe, thread_safe_map, thread_safe_rw, DataCallback, Shared, ThreadSafe,
    ThreadSafeMap, ThreadSafeRw,
};

pub use style::{Color, TextAlignment, TextStyle, WallPattern};

pub use units::LengthUnit;
