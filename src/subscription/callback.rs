// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for supervisor notifications.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;
use crate::supervisor::SupervisorState;

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within a supervisor's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

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

/// Callback fired with no payload whenever the snapshot changes.
type UpdateCallback = Arc<dyn Fn() + Send + Sync>;

/// Callback receiving each committed field change.
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Callback receiving supervisor lifecycle transitions.
type ConnectionCallback = Arc<dyn Fn(SupervisorState) + Send + Sync>;

/// Registry for supervisor subscription callbacks.
///
/// Callbacks run on the supervisor worker, in the order changes are decoded.
/// They are invoked after the registry lock is released, so a callback may
/// itself subscribe or unsubscribe. Callbacks should return quickly: the
/// worker does not read from the device while they run.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    update_callbacks: RwLock<HashMap<SubscriptionId, UpdateCallback>>,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
    connection_callbacks: RwLock<HashMap<SubscriptionId, ConnectionCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            update_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
            connection_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback fired whenever any field changes.
    pub fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.update_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback receiving each field change.
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

    /// Registers a callback receiving connection state transitions.
    pub fn on_connection_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(SupervisorState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.connection_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.update_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
            || self.connection_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.update_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
        self.connection_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches a committed field change.
    ///
    /// Per-field callbacks run first, then the payload-free update callbacks.
    pub fn dispatch(&self, change: &StateChange) {
        for callback in snapshot_of(&self.state_changed_callbacks) {
            callback(change);
        }
        for callback in snapshot_of(&self.update_callbacks) {
            callback();
        }
    }

    /// Dispatches a connection state transition.
    pub fn dispatch_connection(&self, state: SupervisorState) {
        for callback in snapshot_of(&self.connection_callbacks) {
            callback(state);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.update_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
            + self.connection_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

/// Clones the registered callbacks so they can run without holding the lock.
fn snapshot_of<C: Clone>(map: &RwLock<HashMap<SubscriptionId, C>>) -> Vec<C> {
    map.read().values().cloned().collect()
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
