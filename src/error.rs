// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `AquaLogic` library.
//!
//! This module provides the error hierarchy used across the crate: opening a
//! transport, decoding the device byte stream, parsing configuration, and
//! driving the connection supervisor.
//!
//! None of these errors is fatal to the supervisor. Transport and decode
//! errors are logged by the worker and lead to a reconnect after the backoff
//! interval; they surface to callers only through the one-shot
//! [`probe`](crate::connection::probe).

use std::io;

use thiserror::Error;

use crate::types::Field;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Opening the transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The device byte stream could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The connection configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No transport is live, so the command cannot reach the device.
    #[error("device unavailable")]
    DeviceUnavailable,

    /// The field is a sensor reading and cannot be set.
    #[error("field {0} is not a switchable output")]
    NotSwitchable(Field),

    /// Too many commands are waiting for the worker.
    #[error("command queue is full")]
    CommandQueueFull,

    /// The supervisor worker was already spawned.
    #[error("supervisor already started")]
    AlreadyStarted,

    /// `start` was called outside of a tokio runtime.
    #[error("no tokio runtime available to spawn the supervisor")]
    NoRuntime,
}

/// Errors raised while opening a socket or serial transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote end actively refused the connection.
    #[error("connection refused by {0}")]
    Refused(String),

    /// The host name could not be resolved.
    #[error("failed to resolve {host}: {source}")]
    Resolution {
        /// The host that failed to resolve.
        host: String,
        /// The underlying resolver error.
        #[source]
        source: io::Error,
    },

    /// The host name resolved to no usable address.
    #[error("no address found for {0}")]
    NoAddress(String),

    /// The connection attempt did not complete in time.
    #[error("connection timed out after {0} ms")]
    Timeout(u64),

    /// The serial device could not be opened.
    #[error("failed to open serial port {path}: {message}")]
    Serial {
        /// Path of the serial device.
        path: String,
        /// Description of the failure.
        message: String,
    },

    /// Serial support was disabled at compile time.
    #[error("serial transport support is not compiled in")]
    SerialUnsupported,

    /// Any other I/O failure while connecting.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised by a decoder while processing the byte stream.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Reading from or writing to the transport failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The byte stream is malformed or lost frame synchronization.
    #[error("malformed frame: {0}")]
    Malformed(String),
}

/// Errors related to connection configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration could not be parsed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is missing or out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The protocol name is neither `socket` nor `serial`.
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
