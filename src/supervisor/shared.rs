// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State shared between the supervisor handle and its worker.

use std::sync::Arc;

use tokio::sync::watch;

use crate::event::{EventBus, SupervisorEvent};
use crate::state::{DeviceSnapshot, SnapshotCell, StateChange};
use crate::subscription::CallbackRegistry;

use super::SupervisorState;

/// Snapshot, subscribers and lifecycle state of one supervisor.
///
/// The worker is the only writer; the handle and subscribers only read.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) snapshot: Arc<SnapshotCell>,
    pub(crate) callbacks: CallbackRegistry,
    pub(crate) events: EventBus,
    state_tx: watch::Sender<SupervisorState>,
}

impl Shared {
    pub(crate) fn new(event_capacity: usize) -> Self {
        let (state_tx, _) = watch::channel(SupervisorState::Idle);
        Self {
            snapshot: Arc::new(SnapshotCell::new()),
            callbacks: CallbackRegistry::new(),
            events: EventBus::with_capacity(event_capacity),
            state_tx,
        }
    }

    pub(crate) fn snapshot(&self) -> Arc<DeviceSnapshot> {
        self.snapshot.load()
    }

    /// Commits a change, then notifies. Returns false if nothing changed.
    pub(crate) fn publish(&self, change: StateChange) -> bool {
        if !self.snapshot.apply(&change) {
            return false;
        }
        tracing::trace!(field = %change.field(), value = %change.value(), "State changed");
        self.callbacks.dispatch(&change);
        self.events.publish(SupervisorEvent::StateChanged { change });
        true
    }

    pub(crate) fn state(&self) -> SupervisorState {
        *self.state_tx.borrow()
    }

    pub(crate) fn watch_state(&self) -> watch::Receiver<SupervisorState> {
        self.state_tx.subscribe()
    }

    /// Moves to `state`, notifying subscribers on an actual transition.
    ///
    /// `Stopped` is terminal: later transitions are ignored.
    pub(crate) fn set_state(&self, state: SupervisorState) {
        let changed = self.state_tx.send_if_modified(|current| {
            if *current == state || current.is_stopped() {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            tracing::debug!(state = %state, "Supervisor state changed");
            self.callbacks.dispatch_connection(state);
            self.events
                .publish(SupervisorEvent::ConnectionChanged { state });
        }
    }
}
