// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Supervisor event types.

use crate::state::StateChange;
use crate::supervisor::SupervisorState;

/// Events emitted by a connection supervisor.
#[derive(Debug, Clone, PartialEq)]
pub enum SupervisorEvent {
    /// A field change was committed to the snapshot.
    StateChanged {
        /// The committed change.
        change: StateChange,
    },

    /// The supervisor moved to a new lifecycle state.
    ConnectionChanged {
        /// The new state.
        state: SupervisorState,
    },
}

impl SupervisorEvent {
    /// Returns true if this event reports a field change.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }
}
