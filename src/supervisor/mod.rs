// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Supervised, auto-reconnecting connection to one pool controller.
//!
//! A [`ConnectionSupervisor`] owns a background worker task that opens the
//! configured transport, runs the decoder over it, and reconnects after a
//! fixed interval whenever the connection fails or is lost. It keeps going
//! until [`ConnectionSupervisor::shutdown`] is called.
//!
//! # Examples
//!
//! ```no_run
//! use aqualogic_lib::{ConnectionConfig, ConnectionSupervisor, Subscribable};
//! use aqualogic_lib::types::Field;
//! # use aqualogic_lib::decoder::{Decoder, Session};
//! # use aqualogic_lib::connection::BoxedTransport;
//! # struct PanelDecoder;
//! # impl Decoder for PanelDecoder {
//! #     async fn process(&mut self, _t: BoxedTransport, _s: &mut Session<'_>)
//! #         -> Result<(), aqualogic_lib::DecodeError> { Ok(()) }
//! # }
//!
//! #[tokio::main]
//! async fn main() -> aqualogic_lib::Result<()> {
//!     let supervisor = ConnectionSupervisor::builder(ConnectionConfig::socket("10.0.0.5", 23))
//!         .build(|| PanelDecoder);
//!
//!     let reader = supervisor.snapshot_reader();
//!     supervisor.on_update(move || {
//!         println!("pool temperature: {:?}", reader.load().number(Field::PoolTemp));
//!     });
//!
//!     supervisor.start()?;
//!     // ...
//!     supervisor.set_output(Field::Lights, true)?;
//!
//!     supervisor.shutdown();
//!     supervisor.wait_stopped().await;
//!     Ok(())
//! }
//! ```

mod config;
mod lifecycle;
mod shared;
mod worker;

pub use config::{DEFAULT_COMMAND_BUFFER, DEFAULT_CONNECT_TIMEOUT, RECONNECT_INTERVAL, SupervisorConfig};
pub use lifecycle::SupervisorState;
pub(crate) use shared::Shared;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::connection::{ConnectionConfig, Connector, DeviceConnector};
use crate::decoder::{MakeDecoder, OutputCommand};
use crate::error::{Error, Result};
use crate::event::SupervisorEvent;
use crate::state::{DeviceSnapshot, SnapshotReader, StateChange};
use crate::subscription::{Subscribable, SubscriptionId};
use crate::types::Field;

use worker::Worker;

type WorkerFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Supervisor for a single pool-controller connection.
///
/// Built with [`ConnectionSupervisor::builder`]. The worker is prepared at
/// build time and spawned by [`start`](Self::start); all device I/O happens
/// on that task. Dropping the supervisor requests shutdown.
pub struct ConnectionSupervisor {
    connection: ConnectionConfig,
    shared: Arc<Shared>,
    commands: mpsc::Sender<OutputCommand>,
    cancel: CancellationToken,
    worker: Mutex<Option<WorkerFuture>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectionSupervisor {
    /// Creates a builder for a supervisor connecting to `connection`.
    #[must_use]
    pub fn builder(connection: ConnectionConfig) -> SupervisorBuilder {
        SupervisorBuilder::new(connection)
    }

    /// Returns the connection configuration.
    #[must_use]
    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Spawns the worker on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] when called outside a tokio runtime and
    /// [`Error::AlreadyStarted`] if the worker was already spawned or the
    /// supervisor was shut down before starting.
    pub fn start(&self) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let worker = self.worker.lock().take().ok_or(Error::AlreadyStarted)?;

        tracing::debug!(device = %self.connection, "Starting supervisor");
        *self.handle.lock() = Some(runtime.spawn(worker));
        Ok(())
    }

    /// Requests shutdown. Never blocks; safe to call from any thread and
    /// more than once.
    ///
    /// The worker observes the request at its next await point, interrupting
    /// a pending connect, decode or reconnect wait, and then moves to
    /// [`SupervisorState::Stopped`].
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(device = %self.connection, "Supervisor shutdown signalled");
        }
        self.cancel.cancel();

        // Never started: there is no worker to observe the token
        if self.worker.lock().take().is_some() {
            self.shared.set_state(SupervisorState::Stopped);
        }
    }

    /// Waits until the supervisor reaches [`SupervisorState::Stopped`].
    pub async fn wait_stopped(&self) {
        let mut state = self.shared.watch_state();
        let _ = state.wait_for(SupervisorState::is_stopped).await;
    }

    /// Returns true once the worker task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(JoinHandle::is_finished)
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SupervisorState {
        self.shared.state()
    }

    /// Returns true while a transport is live.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state().is_connected()
    }

    /// Returns a receiver following lifecycle state changes.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<SupervisorState> {
        self.shared.watch_state()
    }

    /// Returns the latest snapshot. Never blocks on I/O.
    ///
    /// Empty until the decoder reports its first field.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DeviceSnapshot> {
        self.shared.snapshot()
    }

    /// Returns a cloneable read handle on the snapshot.
    #[must_use]
    pub fn snapshot_reader(&self) -> SnapshotReader {
        SnapshotReader::new(Arc::clone(&self.shared.snapshot))
    }

    /// Subscribes to supervisor events on the broadcast bus.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SupervisorEvent> {
        self.shared.events.subscribe()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Asks the device to switch an output on or off.
    ///
    /// The command is queued for the worker, which hands it to the decoder.
    /// The snapshot changes only once the device reports the new state.
    ///
    /// # Errors
    ///
    /// - [`Error::NotSwitchable`] if `field` is a sensor
    /// - [`Error::DeviceUnavailable`] if no transport is live
    /// - [`Error::CommandQueueFull`] if the worker is not keeping up
    pub fn set_output(&self, field: Field, on: bool) -> Result<()> {
        if !field.is_switchable() {
            return Err(Error::NotSwitchable(field));
        }
        if !self.is_available() {
            tracing::debug!(field = %field, on, "Device unavailable, command dropped");
            return Err(Error::DeviceUnavailable);
        }

        self.commands
            .try_send(OutputCommand::new(field, on))
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => Error::CommandQueueFull,
                mpsc::error::TrySendError::Closed(_) => Error::DeviceUnavailable,
            })
    }

    /// Switches an output on.
    ///
    /// # Errors
    ///
    /// See [`set_output`](Self::set_output).
    pub fn turn_on(&self, field: Field) -> Result<()> {
        self.set_output(field, true)
    }

    /// Switches an output off.
    ///
    /// # Errors
    ///
    /// See [`set_output`](Self::set_output).
    pub fn turn_off(&self, field: Field) -> Result<()> {
        self.set_output(field, false)
    }
}

impl Subscribable for ConnectionSupervisor {
    fn on_update<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.callbacks.on_update(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_state_changed(callback)
    }

    fn on_connection_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(SupervisorState) + Send + Sync + 'static,
    {
        self.shared.callbacks.on_connection_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.callbacks.unsubscribe(id)
    }
}

impl Drop for ConnectionSupervisor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for ConnectionSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSupervisor")
            .field("connection", &self.connection)
            .field("state", &self.state())
            .field("callbacks", &self.shared.callbacks)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ConnectionSupervisor`].
///
/// The connector defaults to [`DeviceConnector`]; tests and embedders may
/// substitute their own with [`connector`](Self::connector).
#[derive(Debug)]
pub struct SupervisorBuilder<C = DeviceConnector> {
    connection: ConnectionConfig,
    settings: SupervisorConfig,
    connector: C,
}

impl SupervisorBuilder<DeviceConnector> {
    fn new(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            settings: SupervisorConfig::default(),
            connector: DeviceConnector::new(),
        }
    }
}

impl<C: Connector> SupervisorBuilder<C> {
    /// Replaces all tuning settings.
    #[must_use]
    pub fn settings(mut self, settings: SupervisorConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the delay between connection attempts.
    #[must_use]
    pub fn reconnect_interval(mut self, interval: std::time::Duration) -> Self {
        self.settings = self.settings.with_reconnect_interval(interval);
        self
    }

    /// Sets the time allowed for opening a transport.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.settings = self.settings.with_connect_timeout(timeout);
        self
    }

    /// Uses a different connector to open transports.
    #[must_use]
    pub fn connector<C2: Connector>(self, connector: C2) -> SupervisorBuilder<C2> {
        SupervisorBuilder {
            connection: self.connection,
            settings: self.settings,
            connector,
        }
    }

    /// Builds the supervisor. The worker does not run until
    /// [`ConnectionSupervisor::start`].
    #[must_use]
    pub fn build<M: MakeDecoder>(self, make_decoder: M) -> ConnectionSupervisor {
        let shared = Arc::new(Shared::new(self.settings.event_capacity()));
        let (commands_tx, commands_rx) = mpsc::channel(self.settings.command_buffer());
        let cancel = CancellationToken::new();

        let worker = Worker {
            connection: self.connection.clone(),
            settings: self.settings,
            connector: self.connector,
            make_decoder,
            shared: Arc::clone(&shared),
            commands: commands_rx,
            cancel: cancel.clone(),
        };

        ConnectionSupervisor {
            connection: self.connection,
            shared,
            commands: commands_tx,
            cancel,
            worker: Mutex::new(Some(Box::pin(worker.run()))),
            handle: Mutex::new(None),
        }
    }
}
