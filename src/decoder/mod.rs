// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The decoder seam between the supervisor and the panel byte protocol.
//!
//! The frame-level protocol of the panel lives outside this crate. A protocol
//! implementation plugs in through the [`Decoder`] trait: the supervisor hands
//! it an open transport and a [`Session`], and the decoder runs its read loop
//! until the transport closes or fails. Every decoded field is reported with
//! [`Session::publish`]; outbound on/off requests arrive through
//! [`Session::next_command`].
//!
//! A fresh decoder is created for each connection through [`MakeDecoder`],
//! which is implemented for any `Fn() -> D` closure.
//!
//! # Examples
//!
//! A decoder for a line protocol of `field=value` records:
//!
//! ```
//! use aqualogic_lib::connection::BoxedTransport;
//! use aqualogic_lib::decoder::{Decoder, Session};
//! use aqualogic_lib::state::StateChange;
//! use aqualogic_lib::types::Field;
//! use aqualogic_lib::DecodeError;
//! use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
//!
//! struct LineDecoder;
//!
//! impl Decoder for LineDecoder {
//!     async fn process(
//!         &mut self,
//!         transport: BoxedTransport,
//!         session: &mut Session<'_>,
//!     ) -> Result<(), DecodeError> {
//!         let (reader, mut writer) = tokio::io::split(transport);
//!         let mut lines = BufReader::new(reader).lines();
//!         loop {
//!             tokio::select! {
//!                 line = lines.next_line() => {
//!                     let Some(line) = line? else { return Ok(()) };
//!                     let (key, value) = line
//!                         .split_once('=')
//!                         .ok_or_else(|| DecodeError::Malformed(line.clone()))?;
//!                     let field: Field = key
//!                         .parse()
//!                         .map_err(|_| DecodeError::Malformed(line.clone()))?;
//!                     session.publish(StateChange::switch(field, value == "1"));
//!                 }
//!                 command = session.next_command() => {
//!                     let record = format!("{}={}\n", command.field(), u8::from(command.on()));
//!                     writer.write_all(record.as_bytes()).await?;
//!                 }
//!             }
//!         }
//!     }
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::connection::BoxedTransport;
use crate::error::DecodeError;
use crate::state::{DeviceSnapshot, StateChange};
use crate::supervisor::Shared;
use crate::types::Field;

/// Request to switch an output on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputCommand {
    field: Field,
    on: bool,
}

impl OutputCommand {
    pub(crate) fn new(field: Field, on: bool) -> Self {
        Self { field, on }
    }

    /// Returns the output to switch.
    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }

    /// Returns the requested state.
    #[must_use]
    pub fn on(&self) -> bool {
        self.on
    }
}

/// Stateful decoder for the panel byte protocol.
pub trait Decoder: Send {
    /// Runs the read loop over `transport`.
    ///
    /// Returns `Ok(())` when the transport reaches end of stream. The
    /// supervisor treats both outcomes as a lost connection.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] on I/O failure or an undecodable stream.
    fn process(
        &mut self,
        transport: BoxedTransport,
        session: &mut Session<'_>,
    ) -> impl Future<Output = Result<(), DecodeError>> + Send;
}

/// Creates a decoder for each new connection.
pub trait MakeDecoder: Send + Sync + 'static {
    /// The decoder type produced.
    type Decoder: Decoder + 'static;

    /// Creates a decoder with fresh protocol state.
    fn make_decoder(&self) -> Self::Decoder;
}

impl<F, D> MakeDecoder for F
where
    F: Fn() -> D + Send + Sync + 'static,
    D: Decoder + 'static,
{
    type Decoder = D;

    fn make_decoder(&self) -> D {
        self()
    }
}

/// The decoder's view of the supervisor for one connection.
pub struct Session<'a> {
    shared: &'a Shared,
    commands: &'a mut mpsc::Receiver<OutputCommand>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(shared: &'a Shared, commands: &'a mut mpsc::Receiver<OutputCommand>) -> Self {
        Self { shared, commands }
    }

    /// Commits a decoded field to the snapshot and notifies subscribers.
    ///
    /// Subscribers are notified only after the change is visible in the
    /// snapshot, and only if the value actually changed. Returns whether it
    /// did.
    pub fn publish(&self, change: StateChange) -> bool {
        self.shared.publish(change)
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DeviceSnapshot> {
        self.shared.snapshot()
    }

    /// Waits for the next outbound command.
    ///
    /// Cancel safe, so it can be used as a `tokio::select!` branch next to
    /// the transport read. Never resolves once the supervisor is gone.
    pub async fn next_command(&mut self) -> OutputCommand {
        match self.commands.recv().await {
            Some(command) => command,
            None => std::future::pending().await,
        }
    }

    /// Returns the next outbound command if one is already queued.
    pub fn try_next_command(&mut self) -> Option<OutputCommand> {
        self.commands.try_recv().ok()
    }
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("pending_commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}
