// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Supervisor lifecycle states.

use std::fmt;

use serde::Serialize;

/// Lifecycle state of a connection supervisor.
///
/// ```text
/// Idle → Connecting → Connected → Disconnected ─┐
///            ↑                                   │
///            └───────────────────────────────────┘
/// any state → Stopped (after shutdown)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisorState {
    /// Created but not started.
    Idle,
    /// Opening the transport.
    Connecting,
    /// Transport open; the decoder is running.
    Connected,
    /// Connection failed or was lost; waiting for the reconnect interval.
    Disconnected,
    /// Shut down. Terminal.
    Stopped,
}

impl SupervisorState {
    /// Returns true while a transport is live.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns true once the supervisor has stopped for good.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns the state name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for SupervisorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connected_is_connected() {
        assert!(SupervisorState::Connected.is_connected());
        assert!(!SupervisorState::Connecting.is_connected());
        assert!(!SupervisorState::Disconnected.is_connected());
    }

    #[test]
    fn display() {
        assert_eq!(SupervisorState::Disconnected.to_string(), "disconnected");
        assert!(SupervisorState::Stopped.is_stopped());
    }
}
