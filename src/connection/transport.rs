// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening socket and serial transports.
//!
//! A [`Transport`] is any bidirectional async byte stream. The [`Connector`]
//! trait opens one from a [`ConnectionConfig`]; [`DeviceConnector`] is the
//! production implementation backed by tokio TCP sockets and, with the
//! `serial` feature, `tokio-serial` ports.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::error::TransportError;

use super::ConnectionConfig;

/// Baud rate of the panel's RS-485 bus.
pub const SERIAL_BAUD_RATE: u32 = 19_200;

/// A bidirectional byte stream to the panel.
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T> Transport for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

/// An open transport with its concrete type erased.
pub type BoxedTransport = Box<dyn Transport>;

/// Opens transports for a connection configuration.
///
/// The supervisor calls [`Connector::connect`] once per connection attempt.
/// Tests substitute scripted connectors returning in-memory streams.
pub trait Connector: Send + Sync + 'static {
    /// Opens a new transport.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] describing why the device could not be
    /// reached.
    fn connect(
        &self,
        config: &ConnectionConfig,
    ) -> impl Future<Output = Result<BoxedTransport, TransportError>> + Send;
}

impl<C: Connector> Connector for Arc<C> {
    fn connect(
        &self,
        config: &ConnectionConfig,
    ) -> impl Future<Output = Result<BoxedTransport, TransportError>> + Send {
        self.as_ref().connect(config)
    }
}

/// Opens a transport, giving up after `timeout`.
pub(crate) async fn connect_with_timeout<C: Connector>(
    connector: &C,
    config: &ConnectionConfig,
    timeout: Duration,
) -> Result<BoxedTransport, TransportError> {
    match tokio::time::timeout(timeout, connector.connect(config)).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(duration_ms(timeout))),
    }
}

// Safe: configured timeouts never approach u64::MAX milliseconds
#[allow(clippy::cast_possible_truncation)]
fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

/// Connector for real devices: TCP sockets and serial ports.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceConnector;

impl DeviceConnector {
    /// Creates a new device connector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn connect_socket(host: &str, port: u16) -> Result<BoxedTransport, TransportError> {
        let addrs: Vec<_> = tokio::net::lookup_host((host, port))
            .await
            .map_err(|source| TransportError::Resolution {
                host: host.to_string(),
                source,
            })?
            .collect();

        if addrs.is_empty() {
            return Err(TransportError::NoAddress(host.to_string()));
        }

        let mut last_error = None;
        for addr in addrs {
            tracing::trace!(%addr, "Trying address");
            match TcpStream::connect(addr).await {
                Ok(stream) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        tracing::debug!(error = %e, "Failed to set TCP_NODELAY");
                    }
                    return Ok(Box::new(stream));
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(match last_error {
            Some(e) if e.kind() == io::ErrorKind::ConnectionRefused => {
                TransportError::Refused(format!("{host}:{port}"))
            }
            Some(e) => TransportError::Io(e),
            None => TransportError::NoAddress(host.to_string()),
        })
    }

    #[cfg(feature = "serial")]
    #[allow(clippy::unused_async)]
    async fn connect_serial(path: &str) -> Result<BoxedTransport, TransportError> {
        use tokio_serial::SerialPortBuilderExt;

        let port = tokio_serial::new(path, SERIAL_BAUD_RATE)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::Two)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| TransportError::Serial {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        Ok(Box::new(port))
    }

    #[cfg(not(feature = "serial"))]
    #[allow(clippy::unused_async)]
    async fn connect_serial(_path: &str) -> Result<BoxedTransport, TransportError> {
        Err(TransportError::SerialUnsupported)
    }
}

impl Connector for DeviceConnector {
    async fn connect(&self, config: &ConnectionConfig) -> Result<BoxedTransport, TransportError> {
        match config {
            ConnectionConfig::Socket { host, port } => Self::connect_socket(host, *port).await,
            ConnectionConfig::Serial { path } => Self::connect_serial(path).await,
        }
    }
}
