// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Supervisor tuning.

use std::time::Duration;

use crate::event::DEFAULT_CHANNEL_CAPACITY;

/// Fixed delay between connection attempts.
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(10);

/// Default time allowed for opening a transport.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of outbound commands that may wait for the worker.
pub const DEFAULT_COMMAND_BUFFER: usize = 16;

/// Tuning for a [`ConnectionSupervisor`](super::ConnectionSupervisor).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use aqualogic_lib::supervisor::SupervisorConfig;
///
/// let config = SupervisorConfig::default();
/// assert_eq!(config.reconnect_interval(), Duration::from_secs(10));
///
/// let fast = SupervisorConfig::new().with_reconnect_interval(Duration::from_millis(50));
/// assert_eq!(fast.reconnect_interval(), Duration::from_millis(50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    reconnect_interval: Duration,
    connect_timeout: Duration,
    event_capacity: usize,
    command_buffer: usize,
}

impl SupervisorConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay between connection attempts.
    #[must_use]
    pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = interval;
        self
    }

    /// Sets the time allowed for opening a transport.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the event bus capacity. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Sets the outbound command queue size. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_command_buffer(mut self, size: usize) -> Self {
        self.command_buffer = size.max(1);
        self
    }

    /// Returns the delay between connection attempts.
    #[must_use]
    pub fn reconnect_interval(&self) -> Duration {
        self.reconnect_interval
    }

    /// Returns the time allowed for opening a transport.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the event bus capacity.
    #[must_use]
    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }

    /// Returns the outbound command queue size.
    #[must_use]
    pub fn command_buffer(&self) -> usize {
        self.command_buffer
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            reconnect_interval: RECONNECT_INTERVAL,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}
