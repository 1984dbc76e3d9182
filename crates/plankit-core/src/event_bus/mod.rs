//! # Event Bus Module
//!
//! Typed publish/subscribe channel between a home document and the views
//! that derive geometry from it.
//!
//! ## Overview
//!
//! - Homes publish [`PlanEvent`]s without knowing their observers
//! - Observers filter by [`EventCategory`]
//! - Item events carry a [`crate::ChangeReason`] so caches can clear
//!   exactly the artifacts that depend on it
//!
//! ## Usage
//!
//! ```rust,ignore
//! use plankit_core::event_bus::{EventBus, EventCategory, EventFilter, PlanEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Item]),
//!     |event| {
//!         if let PlanEvent::Item(change) = event {
//!             println!("{} changed ({})", change.id, change.reason);
//!         }
//!     },
//! );
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
