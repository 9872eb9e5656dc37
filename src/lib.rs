// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `AquaLogic` Lib - A supervised connection to `AquaLogic` pool controllers.
//!
//! This library keeps a long-lived connection to a pool controller open over
//! a TCP socket (serial-to-network bridge) or a local serial port. It
//! reconnects after any failure, keeps the latest known panel state, and
//! notifies subscribers whenever a field changes.
//!
//! # Supported Features
//!
//! - **Supervision**: Automatic reconnection with a fixed backoff, until shutdown
//! - **State snapshot**: Readable from any thread without observing partial updates
//! - **Subscriptions**: Callbacks and a broadcast event bus for field and connection changes
//! - **Output control**: Switch lights, pumps, valves and auxiliary outputs
//! - **Setup helpers**: One-shot connection probe and duplicate-device detection
//!
//! The panel's frame protocol is supplied by the caller through the
//! [`decoder::Decoder`] trait.
//!
//! # Quick Start
//!
//! ```no_run
//! use aqualogic_lib::{ConnectionConfig, ConnectionSupervisor, Field, Subscribable};
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
//!     let config = ConnectionConfig::from_json(r#"{"protocol": "socket", "host": "10.0.0.5"}"#)?;
//!     let supervisor = ConnectionSupervisor::builder(config).build(|| PanelDecoder);
//!
//!     supervisor.on_state_changed(|change| {
//!         println!("{change}");
//!     });
//!     supervisor.on_connection_changed(|state| {
//!         println!("connection: {state}");
//!     });
//!
//!     supervisor.start()?;
//!
//!     if supervisor.is_available() {
//!         supervisor.set_output(Field::Filter, true)?;
//!     }
//!
//!     supervisor.shutdown();
//!     supervisor.wait_stopped().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Setup Validation
//!
//! ```no_run
//! use aqualogic_lib::{ConnectionConfig, probe};
//!
//! # async fn example(existing: &[ConnectionConfig]) {
//! let candidate = ConnectionConfig::serial("/dev/ttyUSB0");
//!
//! if aqualogic_lib::connection::is_already_configured(existing, &candidate) {
//!     println!("already_configured");
//! } else if let Err(failure) = probe(&candidate).await {
//!     println!("{}", failure.reason());
//! }
//! # }
//! ```

pub mod connection;
pub mod decoder;
pub mod error;
pub mod event;
pub mod state;
pub mod subscription;
pub mod supervisor;
pub mod types;

pub use connection::{ConnectionConfig, ProbeFailure, Protocol, probe};
pub use decoder::{Decoder, MakeDecoder, OutputCommand, Session};
pub use error::{ConfigError, DecodeError, Error, Result, TransportError};
pub use event::SupervisorEvent;
pub use state::{DeviceSnapshot, SnapshotReader, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use supervisor::{ConnectionSupervisor, SupervisorBuilder, SupervisorConfig, SupervisorState};
pub use types::{Field, FieldValue};
