// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The supervisor's connect/decode/reconnect loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::connection::{ConnectionConfig, Connector, connect_with_timeout};
use crate::decoder::{Decoder, MakeDecoder, OutputCommand, Session};

use super::{Shared, SupervisorConfig, SupervisorState};

/// Moves the supervisor to `Stopped` however the worker exits.
struct StopGuard(Arc<Shared>);

impl Drop for StopGuard {
    fn drop(&mut self) {
        self.0.set_state(SupervisorState::Stopped);
    }
}

/// Everything the worker task owns.
///
/// The transport and decoder live only inside [`Worker::run`], so at most
/// one pair exists at a time and no other task touches them.
pub(crate) struct Worker<C, M> {
    pub(crate) connection: ConnectionConfig,
    pub(crate) settings: SupervisorConfig,
    pub(crate) connector: C,
    pub(crate) make_decoder: M,
    pub(crate) shared: Arc<Shared>,
    pub(crate) commands: mpsc::Receiver<OutputCommand>,
    pub(crate) cancel: CancellationToken,
}

impl<C, M> Worker<C, M>
where
    C: Connector,
    M: MakeDecoder,
{
    /// Runs until cancelled. Every failure leads to a retry.
    pub(crate) async fn run(mut self) {
        let _guard = StopGuard(Arc::clone(&self.shared));
        tracing::debug!(device = %self.connection, "Supervisor worker started");

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            self.shared.set_state(SupervisorState::Connecting);
            log_connecting(&self.connection);

            let opened = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                result = connect_with_timeout(
                    &self.connector,
                    &self.connection,
                    self.settings.connect_timeout(),
                ) => result,
            };

            match opened {
                Err(e) => {
                    tracing::warn!(device = %self.connection, error = %e, "Failed to connect");
                }
                Ok(transport) => {
                    tracing::info!(device = %self.connection, "Connected");
                    // Stale commands accepted during the previous teardown
                    self.discard_pending_commands();
                    self.shared.set_state(SupervisorState::Connected);

                    let mut decoder = self.make_decoder.make_decoder();
                    let outcome = {
                        let mut session = Session::new(&self.shared, &mut self.commands);
                        tokio::select! {
                            biased;
                            () = self.cancel.cancelled() => None,
                            result = decoder.process(transport, &mut session) => Some(result),
                        }
                    };

                    let result = match outcome {
                        Some(_) if self.cancel.is_cancelled() => break,
                        None => break,
                        Some(result) => result,
                    };

                    // Unavailable before draining, so no command can slip in behind
                    self.shared.set_state(SupervisorState::Disconnected);
                    drop(decoder);
                    self.discard_pending_commands();

                    match result {
                        Ok(()) => {
                            tracing::error!(device = %self.connection, "Connection lost");
                        }
                        Err(e) => {
                            tracing::error!(device = %self.connection, error = %e, "Connection lost");
                        }
                    }
                }
            }

            self.shared.set_state(SupervisorState::Disconnected);

            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.settings.reconnect_interval()) => {}
            }
        }

        tracing::debug!(device = %self.connection, "Supervisor worker stopped");
    }

    /// Drops commands that were addressed to the lost connection.
    fn discard_pending_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            tracing::debug!(
                field = %command.field(),
                on = command.on(),
                "Discarding command queued for lost connection"
            );
        }
    }
}

fn log_connecting(connection: &ConnectionConfig) {
    match connection {
        ConnectionConfig::Socket { host, port } => {
            tracing::info!(%host, port, "Connecting");
        }
        ConnectionConfig::Serial { path } => {
            tracing::info!(%path, "Connecting");
        }
    }
}
