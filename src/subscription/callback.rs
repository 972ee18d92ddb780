// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for state change subscriptions.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;
use crate::types::{Percent, PowerState, Segment};

/// Unique identifier for a subscription.
///
/// IDs are unique within an accessory's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type PowerCallback = Arc<dyn Fn(PowerState) + Send + Sync>;
type SpeedCallback = Arc<dyn Fn(Percent) + Send + Sync>;
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry of state change listeners.
///
/// Uses `parking_lot::RwLock` so it can be shared between handler tasks.
/// Callbacks are cloned out of the lock before they run, so a callback may
/// itself subscribe or unsubscribe.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    power_callbacks: RwLock<HashMap<SubscriptionId, PowerCallback>>,
    speed_callbacks: RwLock<HashMap<SubscriptionId, SpeedCallback>>,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            power_callbacks: RwLock::new(HashMap::new()),
            speed_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for power state changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.power_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for speed changes, reported as a percentage.
    pub fn on_speed_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Percent) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.speed_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback receiving every state change.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.power_callbacks.write().remove(&id).is_some()
            || self.speed_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.power_callbacks.read().len()
            + self.speed_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if no callback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dispatches a state change to the matching callbacks.
    ///
    /// `segment` converts rank changes to the percentage speed listeners
    /// receive. Callbacks run synchronously in an arbitrary order.
    pub fn dispatch(&self, change: &StateChange, segment: Segment) {
        let generic: Vec<StateChangedCallback> =
            self.state_changed_callbacks.read().values().cloned().collect();
        for callback in generic {
            callback(change);
        }

        match change {
            StateChange::Power(state) => {
                let callbacks: Vec<PowerCallback> =
                    self.power_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(*state);
                }
            }
            StateChange::Rank(rank) => {
                let percent = segment.percent_for(*rank);
                let callbacks: Vec<SpeedCallback> =
                    self.speed_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(percent);
                }
            }
        }
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("power_callbacks", &self.power_callbacks.read().len())
            .field("speed_callbacks", &self.speed_callbacks.read().len())
            .field(
                "state_changed_callbacks",
                &self.state_changed_callbacks.read().len(),
            )
            .finish_non_exhaustive()
    }
}
