//! Plan event bus.
//!
//! Each home owns a bus and publishes its changes on it; preference managers
//! may share it or bring their own. Plan views subscribe to drop derived
//! geometry and schedule repaints.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::events::{EventCategory, PlanEvent};

/// Capacity of the channel behind [`EventBus::receiver`].
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Subscription handle, ordered by subscription time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &PlanEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Arc<dyn Fn(PlanEvent) + Send + Sync>;

struct Subscriber {
    filter: EventFilter,
    handler: EventHandler,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EventBusError {
    /// Neither a handler nor a receiver took the event.
    #[error("No active subscribers")]
    NoSubscribers,
}

/// Publish/subscribe hub for plan events.
///
/// Handlers run on the publishing thread in subscription order, so a view
/// that subscribed first has dropped its stale geometry before later
/// subscribers react. They may subscribe or unsubscribe while being called:
/// matching handlers are collected before dispatch.
pub struct EventBus {
    sender: broadcast::Sender<PlanEvent>,
    subscribers: RwLock<BTreeMap<SubscriptionId, Subscriber>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CHANNEL_CAPACITY)
    }

    /// Bus whose async receivers lag after `capacity` unread events.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            subscribers: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Call the matching handlers, then forward `event` to the receivers.
    ///
    /// Returns how many handlers and receivers got the event.
    pub fn publish(&self, event: PlanEvent) -> Result<usize, EventBusError> {
        tracing::trace!("Publishing {}", event.description());

        let matching: Vec<EventHandler> = self
            .subscribers
            .read()
            .values()
            .filter(|subscriber| subscriber.filter.matches(&event))
            .map(|subscriber| subscriber.handler.clone())
            .collect();
        for handler in &matching {
            handler(event.clone());
        }

        let received = self.sender.send(event).unwrap_or(0);
        match matching.len() + received {
            0 if self.subscriber_count() == 0 => Err(EventBusError::NoSubscribers),
            reached => Ok(reached),
        }
    }

    /// Register a handler called on the publishing thread.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(PlanEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let subscriber = Subscriber {
            filter,
            handler: Arc::new(handler),
        };
        self.subscribers.write().insert(id, subscriber);
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Channel receiver for a tokio task reacting to plan changes.
    pub fn receiver(&self) -> broadcast::Receiver<PlanEvent> {
        self.sender.subscribe()
    }

    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.subscribers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}
