// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection configuration and transports.
//!
//! This module describes how to reach a pool controller and how to open the
//! byte stream to it:
//!
//! - [`ConnectionConfig`] - Socket (`host:port`) or serial (`path`) settings
//! - [`Connector`] - Opens a [`Transport`] for a configuration
//! - [`DeviceConnector`] - Production connector for TCP sockets and serial ports
//! - [`probe`] - One-shot reachability check with classified failures

mod config;
mod probe;
mod transport;

pub use config::{
    ConnectionConfig, DEFAULT_HOST, DEFAULT_PATH, DEFAULT_PORT, Protocol, is_already_configured,
};
pub use probe::{DEFAULT_PROBE_TIMEOUT, ProbeFailure, probe, probe_with};
pub(crate) use transport::connect_with_timeout;
pub use transport::{BoxedTransport, Connector, DeviceConnector, SERIAL_BAUD_RATE, Transport};
