//! Power-state notification boundary.
//!
//! The platform tells the component when the display is about to sleep and
//! when it has finished waking. The subscription is explicit: `subscribe`
//! hands back a token and `unsubscribe` takes it, so registration state is
//! never hidden in a global listener list.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Callbacks delivered by a [`PowerStateNotifier`].
///
/// Delivery happens on an arbitrary caller thread; implementations must be
/// safe to invoke from any thread.
pub trait PowerStateObserver: Send + Sync {
    fn on_going_to_sleep(&self);
    fn on_finished_waking_up(&self);
}

/// Wake/sleep signal source consumed by the component.
pub trait PowerStateNotifier: Send + Sync {
    fn subscribe(&self, observer: Arc<dyn PowerStateObserver>) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Opaque token identifying one registration with a notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Registry-backed notifier implementation.
///
/// Hosts forward their platform power events by calling [`signal_sleep`] and
/// [`signal_wake`]; observers receive them in subscription order, one event
/// delivered to completion before the next is dispatched. The registry lock
/// is not held across callbacks, so observers may subscribe or unsubscribe
/// from within a callback.
///
/// [`signal_sleep`]: PowerSignalHub::signal_sleep
/// [`signal_wake`]: PowerSignalHub::signal_wake
#[derive(Default)]
pub struct PowerSignalHub {
    registry: Mutex<Registry>,
    // Serializes delivery so sleep/wake handling never overlaps.
    dispatch: Mutex<()>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: Vec<(u64, Arc<dyn PowerStateObserver>)>,
}

impl PowerSignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        self.lock_registry().observers.len()
    }

    /// Delivers `on_going_to_sleep` to every observer.
    pub fn signal_sleep(&self) {
        let _ordered = self.lock_dispatch();
        for observer in self.snapshot() {
            observer.on_going_to_sleep();
        }
    }

    /// Delivers `on_finished_waking_up` to every observer.
    pub fn signal_wake(&self) {
        let _ordered = self.lock_dispatch();
        for observer in self.snapshot() {
            observer.on_finished_waking_up();
        }
    }

    fn snapshot(&self) -> Vec<Arc<dyn PowerStateObserver>> {
        self.lock_registry()
            .observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    fn lock_registry(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_dispatch(&self) -> std::sync::MutexGuard<'_, ()> {
        self.dispatch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PowerStateNotifier for PowerSignalHub {
    fn subscribe(&self, observer: Arc<dyn PowerStateObserver>) -> SubscriptionId {
        let mut registry = self.lock_registry();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.observers.push((id, observer));
        debug!(id, observers = registry.observers.len(), "Power observer subscribed");
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let mut registry = self.lock_registry();
        let before = registry.observers.len();
        registry.observers.retain(|(slot, _)| *slot != id.0);
        if registry.observers.len() == before {
            debug!(id = id.0, "Unsubscribe for unknown power observer ignored");
        }
    }
}
