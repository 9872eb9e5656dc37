// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-shot connection probe used by setup flows.
//!
//! A probe opens the transport once and drops it immediately. It never
//! retries; the classification of its failure is meant to be shown to a
//! person filling in a setup form.

use std::fmt;
use std::time::Duration;

use crate::error::TransportError;

use super::transport::connect_with_timeout;
use super::{ConnectionConfig, Connector, DeviceConnector};

/// Default time allowed for a probe to connect.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a probe failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The device refused the connection.
    CannotConnect,
    /// The host name could not be resolved.
    InvalidHost,
    /// Any other failure, including timeouts, with its description.
    Unknown(String),
}

impl ProbeFailure {
    /// Returns the machine-readable reason shown by setup forms.
    ///
    /// # Examples
    ///
    /// ```
    /// use aqualogic_lib::connection::ProbeFailure;
    ///
    /// assert_eq!(ProbeFailure::CannotConnect.reason(), "cannot_connect");
    /// assert_eq!(ProbeFailure::InvalidHost.reason(), "invalid_host");
    /// ```
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::CannotConnect => "cannot_connect",
            Self::InvalidHost => "invalid_host",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(message) => write!(f, "unknown: {message}"),
            other => f.write_str(other.reason()),
        }
    }
}

impl std::error::Error for ProbeFailure {}

impl From<&TransportError> for ProbeFailure {
    fn from(error: &TransportError) -> Self {
        match error {
            TransportError::Refused(_) => Self::CannotConnect,
            TransportError::Resolution { .. } | TransportError::NoAddress(_) => Self::InvalidHost,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Probes a device with the production connector and default timeout.
///
/// # Errors
///
/// Returns the classified [`ProbeFailure`] if the device cannot be reached.
///
/// # Examples
///
/// ```no_run
/// use aqualogic_lib::ConnectionConfig;
/// use aqualogic_lib::connection::probe;
///
/// # async fn example() {
/// match probe(&ConnectionConfig::socket("10.0.0.5", 23)).await {
///     Ok(()) => println!("panel reachable"),
///     Err(failure) => println!("setup error: {}", failure.reason()),
/// }
/// # }
/// ```
pub async fn probe(config: &ConnectionConfig) -> Result<(), ProbeFailure> {
    probe_with(&DeviceConnector::new(), config, DEFAULT_PROBE_TIMEOUT).await
}

/// Probes a device through a specific connector.
///
/// # Errors
///
/// Returns the classified [`ProbeFailure`] if the device cannot be reached.
pub async fn probe_with<C: Connector>(
    connector: &C,
    config: &ConnectionConfig,
    timeout: Duration,
) -> Result<(), ProbeFailure> {
    if let Err(e) = config.validate() {
        return Err(ProbeFailure::Unknown(e.to_string()));
    }

    match connect_with_timeout(connector, config, timeout).await {
        Ok(transport) => {
            drop(transport);
            tracing::debug!(device = %config, "Probe connected");
            Ok(())
        }
        Err(e) => {
            let failure = ProbeFailure::from(&e);
            if matches!(failure, ProbeFailure::Unknown(_)) {
                tracing::error!(device = %config, error = %e, "Unexpected error during probe");
            } else {
                tracing::debug!(device = %config, error = %e, "Probe failed");
            }
            Err(failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn classification() {
        assert_eq!(
            ProbeFailure::from(&TransportError::Refused("h:23".to_string())),
            ProbeFailure::CannotConnect
        );
        assert_eq!(
            ProbeFailure::from(&TransportError::Timeout(10)).reason(),
            "unknown"
        );
        assert_eq!(
            ProbeFailure::from(&TransportError::Resolution {
                host: "bad.invalid".to_string(),
                source: io::Error::other("nxdomain"),
            }),
            ProbeFailure::InvalidHost
        );
        assert_eq!(
            ProbeFailure::from(&TransportError::NoAddress("h".to_string())).reason(),
            "invalid_host"
        );
        assert_eq!(
            ProbeFailure::from(&TransportError::Serial {
                path: "/dev/ttyUSB0".to_string(),
                message: "permission denied".to_string(),
            })
            .reason(),
            "unknown"
        );
    }

    #[test]
    fn display() {
        assert_eq!(ProbeFailure::InvalidHost.to_string(), "invalid_host");
        assert_eq!(
            ProbeFailure::Unknown("boom".to_string()).to_string(),
            "unknown: boom"
        );
    }

    #[tokio::test]
    async fn invalid_config_is_unknown() {
        let result = probe(&ConnectionConfig::socket("", 23)).await;
        assert!(matches!(result, Err(ProbeFailure::Unknown(_))));
    }
}
