// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for setup helpers: connection probe and duplicate
//! detection.

mod common;

use std::time::Duration;

use aqualogic_lib::connection::{
    BoxedTransport, Connector, is_already_configured, probe, probe_with,
};
use aqualogic_lib::{ConnectionConfig, ProbeFailure, TransportError};
use common::ScriptedConnector;
use tokio::net::TcpListener;

// ============================================================================
// Probe
// ============================================================================

mod probing {
    use super::*;

    #[tokio::test]
    async fn refused_port_cannot_connect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let failure = probe(&ConnectionConfig::socket("127.0.0.1", port))
            .await
            .unwrap_err();
        assert_eq!(failure, ProbeFailure::CannotConnect);
        assert_eq!(failure.reason(), "cannot_connect");
    }

    #[tokio::test]
    async fn unresolvable_host_is_invalid() {
        let failure = probe(&ConnectionConfig::socket("bad.invalid", 23))
            .await
            .unwrap_err();
        assert_eq!(failure.reason(), "invalid_host");
    }

    #[tokio::test]
    async fn listening_port_succeeds() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let accept = tokio::spawn(async move { listener.accept().await.map(|_| ()) });

        probe(&ConnectionConfig::socket("127.0.0.1", port))
            .await
            .unwrap();
        accept.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn missing_serial_device_is_unknown() {
        let failure = probe(&ConnectionConfig::serial("/dev/does-not-exist-aqualogic"))
            .await
            .unwrap_err();
        assert_eq!(failure.reason(), "unknown");
    }

    #[tokio::test]
    async fn probe_never_retries() {
        let connector = ScriptedConnector::new();
        connector.push_failure(TransportError::Refused("pool.local:23".to_string()));

        let result = probe_with(
            &connector,
            &ConnectionConfig::socket("pool.local", 23),
            Duration::from_secs(10),
        )
        .await;

        assert_eq!(result, Err(ProbeFailure::CannotConnect));
        assert_eq!(connector.attempts(), 1);
    }

    /// Connector whose connection attempts never complete.
    struct Unresponsive;

    impl Connector for Unresponsive {
        async fn connect(
            &self,
            _config: &ConnectionConfig,
        ) -> Result<BoxedTransport, TransportError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_unknown() {
        let result = probe_with(
            &Unresponsive,
            &ConnectionConfig::socket("pool.local", 23),
            Duration::from_secs(10),
        )
        .await;

        let failure = result.unwrap_err();
        assert!(matches!(failure, ProbeFailure::Unknown(_)));
        assert_eq!(failure.reason(), "unknown");
    }
}

// ============================================================================
// Duplicate detection
// ============================================================================

mod duplicates {
    use super::*;

    #[test]
    fn same_socket_is_duplicate() {
        let a = ConnectionConfig::socket("h", 23);
        assert!(a.is_same_device(&ConnectionConfig::socket("h", 23)));
        assert!(!a.is_same_device(&ConnectionConfig::socket("h", 24)));
    }

    #[test]
    fn configured_list_is_scanned() {
        let existing = vec![
            ConnectionConfig::from_json(r#"{"protocol": "socket", "host": "h"}"#).unwrap(),
            ConnectionConfig::from_json(r#"{"protocol": "serial"}"#).unwrap(),
        ];

        assert!(is_already_configured(
            &existing,
            &ConnectionConfig::socket("h", 23)
        ));
        assert!(is_already_configured(
            &existing,
            &ConnectionConfig::serial("/dev/ttyUSB0")
        ));
        assert!(!is_already_configured(
            &existing,
            &ConnectionConfig::socket("h", 24)
        ));
        assert!(!is_already_configured(&[], &ConnectionConfig::default()));
    }
}
