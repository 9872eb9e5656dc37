// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! The [`DeviceSnapshot`] holds the last known value of every field the panel
//! has reported, while [`StateChange`] represents one decoded field update.
//! The supervisor publishes snapshots through a [`SnapshotReader`], which any
//! thread may clone and read without observing a partially applied change.
//!
//! # Examples
//!
//! ```
//! use aqualogic_lib::state::{DeviceSnapshot, StateChange};
//! use aqualogic_lib::types::Field;
//!
//! let mut snapshot = DeviceSnapshot::new();
//!
//! let change = StateChange::new(Field::Lights, true);
//! assert!(snapshot.apply(&change));
//!
//! assert_eq!(snapshot.switch(Field::Lights), Some(true));
//! ```

mod snapshot;
mod state_change;

pub use snapshot::{DeviceSnapshot, SnapshotReader};
pub(crate) use snapshot::SnapshotCell;
pub use state_change::StateChange;
