// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting supervisor events.

use tokio::sync::broadcast;

use super::SupervisorEvent;

/// Default channel capacity for the event bus.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Event bus for broadcasting supervisor events to multiple subscribers.
///
/// # Capacity
///
/// The event bus has a fixed capacity (default 256). If a subscriber falls
/// behind, older events are dropped for that subscriber (it receives a
/// `RecvError::Lagged` error). Publishing never blocks the worker.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SupervisorEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to supervisor events.
    ///
    /// Returns a receiver that will receive all events published after
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn publish(&self, event: SupervisorEvent) {
        // Ignore errors (no subscribers)
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateChange;
    use crate::supervisor::SupervisorState;
    use crate::types::Field;

    #[test]
    fn new_bus_has_no_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn drop_subscriber_decrements_count() {
        let bus = EventBus::new();

        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn publish_delivers_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(SupervisorEvent::StateChanged {
            change: StateChange::switch(Field::Lights, true),
        });
        bus.publish(SupervisorEvent::ConnectionChanged {
            state: SupervisorState::Disconnected,
        });

        assert_eq!(
            rx.recv().await.unwrap(),
            SupervisorEvent::StateChanged {
                change: StateChange::switch(Field::Lights, true)
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            SupervisorEvent::ConnectionChanged {
                state: SupervisorState::Disconnected
            }
        );
    }

    #[test]
    fn publish_without_subscribers_is_discarded() {
        let bus = EventBus::new();
        bus.publish(SupervisorEvent::ConnectionChanged {
            state: SupervisorState::Stopped,
        });
        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn clone_shares_same_channel() {
        let bus1 = EventBus::with_capacity(8);
        let bus2 = bus1.clone();

        let _rx = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1);
    }
}
