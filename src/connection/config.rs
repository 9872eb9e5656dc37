// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection configuration for a pool controller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default host for socket connections.
pub const DEFAULT_HOST: &str = "localhost";

/// Default TCP port of serial-to-network bridges.
pub const DEFAULT_PORT: u16 = 23;

/// Default serial device path.
pub const DEFAULT_PATH: &str = "/dev/ttyUSB0";

/// Transport protocol used to reach the panel.
///
/// # Examples
///
/// ```
/// use aqualogic_lib::connection::Protocol;
///
/// let protocol: Protocol = "serial".parse().unwrap();
/// assert_eq!(protocol, Protocol::Serial);
/// assert_eq!(Protocol::Socket.to_string(), "socket");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Raw TCP socket, usually a serial-to-Ethernet bridge.
    Socket,
    /// Local serial line.
    Serial,
}

impl Protocol {
    /// Returns the protocol name used in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Socket => "socket",
            Self::Serial => "serial",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "socket" => Ok(Self::Socket),
            "serial" => Ok(Self::Serial),
            _ => Err(ConfigError::UnknownProtocol(s.to_string())),
        }
    }
}

/// How to reach the pool controller.
///
/// Serialized with a `protocol` tag, matching the data stored by the setup
/// flow. Missing fields fall back to their defaults.
///
/// # Examples
///
/// ```
/// use aqualogic_lib::ConnectionConfig;
///
/// let config = ConnectionConfig::from_json(r#"{"protocol": "socket", "host": "10.0.0.5"}"#).unwrap();
/// assert_eq!(config, ConnectionConfig::socket("10.0.0.5", 23));
/// assert_eq!(config.title(), "10.0.0.5:23");
///
/// let serial = ConnectionConfig::from_json(r#"{"protocol": "serial"}"#).unwrap();
/// assert_eq!(serial.title(), "/dev/ttyUSB0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "protocol", rename_all = "lowercase")]
pub enum ConnectionConfig {
    /// TCP connection to `host:port`.
    Socket {
        /// Host name or IP address.
        #[serde(default = "default_host")]
        host: String,
        /// TCP port.
        #[serde(default = "default_port")]
        port: u16,
    },
    /// Serial connection on a local device.
    Serial {
        /// Path of the serial device.
        #[serde(default = "default_path")]
        path: String,
    },
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

impl ConnectionConfig {
    /// Creates a socket configuration.
    #[must_use]
    pub fn socket(host: impl Into<String>, port: u16) -> Self {
        Self::Socket {
            host: host.into(),
            port,
        }
    }

    /// Creates a serial configuration.
    #[must_use]
    pub fn serial(path: impl Into<String>) -> Self {
        Self::Serial { path: path.into() }
    }

    /// Returns the default configuration for a protocol.
    #[must_use]
    pub fn default_for(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Socket => Self::socket(DEFAULT_HOST, DEFAULT_PORT),
            Protocol::Serial => Self::serial(DEFAULT_PATH),
        }
    }

    /// Parses and validates a configuration from JSON entry data.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the data cannot be parsed and
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configured values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty host, port 0, or an
    /// empty serial path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Socket { host, port } => {
                if host.trim().is_empty() {
                    return Err(ConfigError::Invalid("host cannot be empty".to_string()));
                }
                if *port == 0 {
                    return Err(ConfigError::Invalid("port must be non-zero".to_string()));
                }
            }
            Self::Serial { path } => {
                if path.trim().is_empty() {
                    return Err(ConfigError::Invalid(
                        "serial path cannot be empty".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Returns the protocol of this configuration.
    #[must_use]
    pub fn protocol(&self) -> Protocol {
        match self {
            Self::Socket { .. } => Protocol::Socket,
            Self::Serial { .. } => Protocol::Serial,
        }
    }

    /// Returns a short title: `host:port` or the serial path.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::Socket { host, port } => format!("{host}:{port}"),
            Self::Serial { path } => path.clone(),
        }
    }

    /// Returns true if both configurations address the same physical device.
    ///
    /// Socket configurations match on host and port; serial configurations
    /// match on path. A socket and a serial configuration never match.
    ///
    /// # Examples
    ///
    /// ```
    /// use aqualogic_lib::ConnectionConfig;
    ///
    /// let a = ConnectionConfig::socket("h", 23);
    /// assert!(a.is_same_device(&ConnectionConfig::socket("h", 23)));
    /// assert!(!a.is_same_device(&ConnectionConfig::socket("h", 24)));
    /// ```
    #[must_use]
    pub fn is_same_device(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Socket { host, port },
                Self::Socket {
                    host: other_host,
                    port: other_port,
                },
            ) => host == other_host && port == other_port,
            (Self::Serial { path }, Self::Serial { path: other_path }) => path == other_path,
            _ => false,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::default_for(Protocol::Socket)
    }
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.protocol(), self.title())
    }
}

/// Returns true if `candidate` addresses a device already present in `existing`.
///
/// Used by setup flows to refuse adding the same controller twice.
#[must_use]
pub fn is_already_configured<'a>(
    existing: impl IntoIterator<Item = &'a ConnectionConfig>,
    candidate: &ConnectionConfig,
) -> bool {
    existing
        .into_iter()
        .any(|config| config.is_same_device(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_socket_is_duplicate() {
        let a = ConnectionConfig::socket("h", 23);
        let b = ConnectionConfig::socket("h", 23);
        assert!(a.is_same_device(&b));
    }

    #[test]
    fn different_port_is_not_duplicate() {
        let a = ConnectionConfig::socket("h", 23);
        let b = ConnectionConfig::socket("h", 24);
        assert!(!a.is_same_device(&b));
    }

    #[test]
    fn serial_matches_on_path() {
        let a = ConnectionConfig::serial("/dev/ttyUSB0");
        assert!(a.is_same_device(&ConnectionConfig::serial("/dev/ttyUSB0")));
        assert!(!a.is_same_device(&ConnectionConfig::serial("/dev/ttyUSB1")));
    }

    #[test]
    fn socket_never_matches_serial() {
        let socket = ConnectionConfig::socket("/dev/ttyUSB0", 23);
        let serial = ConnectionConfig::serial("/dev/ttyUSB0");
        assert!(!socket.is_same_device(&serial));
        assert!(!serial.is_same_device(&socket));
    }

    #[test]
    fn already_configured_scans_entries() {
        let entries = vec![
            ConnectionConfig::socket("10.0.0.5", 23),
            ConnectionConfig::serial("/dev/ttyUSB0"),
        ];
        assert!(is_already_configured(
            &entries,
            &ConnectionConfig::serial("/dev/ttyUSB0")
        ));
        assert!(!is_already_configured(
            &entries,
            &ConnectionConfig::socket("10.0.0.6", 23)
        ));
        assert!(!is_already_configured(
            &[],
            &ConnectionConfig::socket("10.0.0.5", 23)
        ));
    }

    #[test]
    fn json_defaults() {
        let config = ConnectionConfig::from_json(r#"{"protocol": "socket"}"#).unwrap();
        assert_eq!(config, ConnectionConfig::socket("localhost", 23));

        let config = ConnectionConfig::from_json(r#"{"protocol": "serial"}"#).unwrap();
        assert_eq!(config, ConnectionConfig::serial("/dev/ttyUSB0"));
    }

    #[test]
    fn json_round_trip_keeps_tag() {
        let config = ConnectionConfig::socket("pool.local", 8899);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"protocol": "socket", "host": "pool.local", "port": 8899})
        );
    }

    #[test]
    fn json_rejects_unknown_protocol() {
        let err = ConnectionConfig::from_json(r#"{"protocol": "bluetooth"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(ConnectionConfig::socket("", 23).validate().is_err());
        assert!(ConnectionConfig::socket("h", 0).validate().is_err());
        assert!(ConnectionConfig::serial("  ").validate().is_err());
        assert!(ConnectionConfig::default().validate().is_ok());
    }

    #[test]
    fn protocol_parsing() {
        assert_eq!("Socket".parse::<Protocol>().unwrap(), Protocol::Socket);
        assert!(matches!(
            "usb".parse::<Protocol>(),
            Err(ConfigError::UnknownProtocol(_))
        ));
    }

    #[test]
    fn display_and_title() {
        let config = ConnectionConfig::socket("10.0.0.5", 23);
        assert_eq!(config.to_string(), "socket://10.0.0.5:23");
        assert_eq!(
            ConnectionConfig::serial("/dev/ttyS1").to_string(),
            "serial:///dev/ttyS1"
        );
    }

    #[test]
    fn default_for_protocol() {
        assert_eq!(
            ConnectionConfig::default_for(Protocol::Serial).protocol(),
            Protocol::Serial
        );
    }
}
