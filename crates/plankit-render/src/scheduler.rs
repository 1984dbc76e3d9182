//! Paint request coalescing.
//!
//! Changes arriving while a paint is running are not served one by one: they
//! are merged into a single deferred request replayed when the paint
//! finishes. A watchdog flushes that request if the paint never reports its
//! end.

use parking_lot::Mutex;
use plankit_core::event_bus::RenderEvent;
use plankit_core::{EventBus, PlanEvent};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::invalidation::UpdateAction;

/// Configuration of the paint scheduler
#[derive(Debug, Clone)]
pub struct PaintSchedulerConfig {
    /// Longest time a deferred request may wait for the running paint.
    pub watchdog_timeout: Duration,
    /// Period of the watchdog task.
    pub check_interval: Duration,
}

impl Default for PaintSchedulerConfig {
    fn default() -> Self {
        Self {
            watchdog_timeout: Duration::from_secs(2),
            check_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Default)]
struct SchedulerState {
    painting: bool,
    pending: Option<UpdateAction>,
    deferred: Option<(UpdateAction, Instant)>,
    paints: usize,
    coalesced: usize,
}

/// Shared handle on the paint request queue of one plan view.
#[derive(Clone)]
pub struct PaintScheduler {
    state: Arc<Mutex<SchedulerState>>,
    config: PaintSchedulerConfig,
    bus: Option<Arc<EventBus>>,
}

impl PaintScheduler {
    pub fn new(config: PaintSchedulerConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SchedulerState::default())),
            config,
            bus: None,
        }
    }

    /// Publish watchdog notifications on `bus`.
    pub fn with_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn config(&self) -> &PaintSchedulerConfig {
        &self.config
    }

    pub fn request_repaint(&self) {
        self.request(UpdateAction::Repaint);
    }

    pub fn request_revalidate(&self) {
        self.request(UpdateAction::Revalidate);
    }

    /// Queue `action`, deferring it while a paint runs.
    pub fn request(&self, action: UpdateAction) {
        let mut state = self.state.lock();
        if state.painting {
            let deferred = match state.deferred {
                Some((deferred, since)) => {
                    state.coalesced += 1;
                    (deferred.merge(action), since)
                }
                None => (action, Instant::now()),
            };
            state.deferred = Some(deferred);
        } else {
            state.pending = Some(state.pending.map_or(action, |pending| pending.merge(action)));
        }
    }

    /// Request waiting to be served, if any.
    pub fn pending(&self) -> Option<UpdateAction> {
        self.state.lock().pending
    }

    pub fn is_painting(&self) -> bool {
        self.state.lock().painting
    }

    /// Start a paint, taking the pending request it serves.
    pub fn begin_paint(&self) -> Option<UpdateAction> {
        let mut state = self.state.lock();
        state.painting = true;
        state.paints += 1;
        state.pending.take()
    }

    /// End the running paint. Returns the request made meanwhile, which is
    /// now pending and must be served by one more paint.
    pub fn finish_paint(&self) -> Option<UpdateAction> {
        let mut state = self.state.lock();
        state.painting = false;
        let replay = state.deferred.take().map(|(action, _)| action);
        if let Some(action) = replay {
            state.pending = Some(state.pending.map_or(action, |pending| pending.merge(action)));
        }
        replay
    }

    /// Number of paints begun so far.
    pub fn paint_count(&self) -> usize {
        self.state.lock().paints
    }

    /// Number of requests merged into an already deferred one.
    pub fn coalesced_count(&self) -> usize {
        self.state.lock().coalesced
    }

    /// Flush a deferred request that waited longer than the watchdog
    /// timeout at `now`. Returns whether it fired.
    pub fn check_watchdog(&self, now: Instant) -> bool {
        let fired = {
            let mut state = self.state.lock();
            match state.deferred {
                Some((action, since)) if now.saturating_duration_since(since) > self.config.watchdog_timeout => {
                    tracing::warn!(
                        "Paint still running after {:?}, flushing deferred {:?}",
                        now.saturating_duration_since(since),
                        action
                    );
                    state.deferred = None;
                    state.painting = false;
                    state.pending = Some(state.pending.map_or(action, |pending| pending.merge(action)));
                    true
                }
                _ => false,
            }
        };
        if fired {
            if let Some(bus) = &self.bus {
                bus.publish(PlanEvent::Render(RenderEvent::WatchdogFired)).ok();
            }
        }
        fired
    }

    /// Run [`check_watchdog`](Self::check_watchdog) periodically on the
    /// tokio runtime. The task ends once every handle on this scheduler is
    /// dropped.
    pub fn spawn_watchdog(&self) -> JoinHandle<()> {
        let state: Weak<Mutex<SchedulerState>> = Arc::downgrade(&self.state);
        let config = self.config.clone();
        let bus = self.bus.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(config.check_interval);
            loop {
                interval.tick().await;
                let Some(state) = state.upgrade() else {
                    tracing::debug!("Paint scheduler dropped, stopping watchdog");
                    break;
                };
                let scheduler = PaintScheduler {
                    state,
                    config: config.clone(),
                    bus: bus.clone(),
                };
                scheduler.check_watchdog(Instant::now());
            }
        })
    }
}

impl Default for PaintScheduler {
    fn default() -> Self {
        Self::new(PaintSchedulerConfig::default())
    }
}

impl std::fmt::Debug for PaintScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PaintScheduler")
            .field("painting", &state.painting)
            .field("pending", &state.pending)
            .field("deferred", &state.deferred.map(|(action, _)| action))
            .finish()
    }
}
