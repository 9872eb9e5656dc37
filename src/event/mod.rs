// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel-based notification of supervisor events.
//!
//! The [`EventBus`] uses tokio's broadcast channel so that any number of
//! async consumers can follow a supervisor. It carries the same information
//! as the callback registry, as [`SupervisorEvent`] values.
//!
//! # Examples
//!
//! ```
//! use aqualogic_lib::event::{EventBus, SupervisorEvent};
//! use aqualogic_lib::SupervisorState;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(SupervisorEvent::ConnectionChanged {
//!     state: SupervisorState::Connecting,
//! });
//! assert!(rx.try_recv().is_ok());
//! ```

mod event_bus;
mod supervisor_event;

pub use event_bus::{DEFAULT_CHANNEL_CAPACITY, EventBus};
pub use supervisor_event::SupervisorEvent;
