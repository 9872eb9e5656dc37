// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish supervisor notifications.

use crate::state::StateChange;
use crate::subscription::SubscriptionId;
use crate::supervisor::SupervisorState;

/// Trait for types that support change subscriptions.
///
/// # Examples
///
/// ```
/// use aqualogic_lib::{ConnectionConfig, ConnectionSupervisor, Subscribable};
/// # use aqualogic_lib::decoder::{Decoder, Session};
/// # use aqualogic_lib::connection::BoxedTransport;
/// # struct Idle;
/// # impl Decoder for Idle {
/// #     async fn process(&mut self, _t: BoxedTransport, _s: &mut Session<'_>)
/// #         -> Result<(), aqualogic_lib::DecodeError> { Ok(()) }
/// # }
///
/// let supervisor = ConnectionSupervisor::builder(ConnectionConfig::serial("/dev/ttyUSB0"))
///     .build(|| Idle);
/// let reader = supervisor.snapshot_reader();
///
/// // Re-read the snapshot whenever something changed
/// let sub_id = supervisor.on_update(move || {
///     println!("lights: {:?}", reader.switch(aqualogic_lib::types::Field::Lights));
/// });
///
/// supervisor.unsubscribe(sub_id);
/// ```
pub trait Subscribable {
    /// Subscribes to snapshot updates.
    ///
    /// The callback carries no payload: it signals that something changed,
    /// and subscribers re-read the snapshot. It fires once per changed field.
    fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static;

    /// Subscribes to individual field changes.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Subscribes to connection state transitions.
    fn on_connection_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(SupervisorState) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
