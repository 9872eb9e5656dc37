// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-known device state.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::types::{Field, FieldValue};

use super::StateChange;

/// Last known value of every field reported by the panel.
///
/// A snapshot starts empty: fields appear as the decoder reports them. Values
/// are kept across reconnects, so a snapshot describes the last state seen,
/// not necessarily the current one; check the supervisor's connection state
/// for availability.
///
/// # Examples
///
/// ```
/// use aqualogic_lib::state::{DeviceSnapshot, StateChange};
/// use aqualogic_lib::types::Field;
///
/// let mut snapshot = DeviceSnapshot::new();
/// assert!(snapshot.is_empty());
///
/// snapshot.apply(&StateChange::new(Field::AirTemp, 21.0));
/// assert_eq!(snapshot.number(Field::AirTemp), Some(21.0));
/// assert!(snapshot.updated_at().is_some());
///
/// // Re-applying the same value is not a change
/// assert!(!snapshot.apply(&StateChange::new(Field::AirTemp, 21.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    values: BTreeMap<Field, FieldValue>,
    updated_at: Option<DateTime<Utc>>,
}

impl DeviceSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a change.
    ///
    /// Returns true if the stored value actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        if self.values.get(&change.field()) == Some(change.value()) {
            return false;
        }
        self.values.insert(change.field(), change.value().clone());
        self.updated_at = Some(Utc::now());
        true
    }

    /// Returns the value of a field, if it has been reported.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Returns the on/off state of a switchable output.
    #[must_use]
    pub fn switch(&self, field: Field) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    /// Returns a numeric sensor reading.
    #[must_use]
    pub fn number(&self, field: Field) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    /// Returns a text sensor reading.
    #[must_use]
    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Iterates over the reported fields in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// Returns the number of reported fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing has been reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns when the last change was applied.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

/// Shared, copy-on-write storage for the current snapshot.
///
/// Only the supervisor worker writes. Readers clone the inner `Arc` under a
/// short read lock and then work on an immutable snapshot.
#[derive(Debug, Default)]
pub(crate) struct SnapshotCell {
    current: RwLock<Arc<DeviceSnapshot>>,
}

impl SnapshotCell {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn load(&self) -> Arc<DeviceSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Commits a change. Returns true if the snapshot changed.
    pub(crate) fn apply(&self, change: &StateChange) -> bool {
        let mut current = self.current.write();
        if current.get(change.field()) == Some(change.value()) {
            return false;
        }
        Arc::make_mut(&mut current).apply(change)
    }
}

/// Cloneable read handle on a supervisor's snapshot.
///
/// Entity adapters hold one of these to read state without holding on to the
/// supervisor itself.
///
/// # Examples
///
/// ```
/// use aqualogic_lib::{ConnectionConfig, ConnectionSupervisor};
/// use aqualogic_lib::types::Field;
/// # use aqualogic_lib::decoder::{Decoder, Session};
/// # use aqualogic_lib::connection::BoxedTransport;
/// # struct Idle;
/// # impl Decoder for Idle {
/// #     async fn process(&mut self, _t: BoxedTransport, _s: &mut Session<'_>)
/// #         -> Result<(), aqualogic_lib::DecodeError> { Ok(()) }
/// # }
///
/// let supervisor = ConnectionSupervisor::builder(ConnectionConfig::socket("localhost", 23))
///     .build(|| Idle);
/// let reader = supervisor.snapshot_reader();
///
/// assert!(reader.load().is_empty());
/// assert_eq!(reader.switch(Field::Lights), None);
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    cell: Arc<SnapshotCell>,
}

impl SnapshotReader {
    pub(crate) fn new(cell: Arc<SnapshotCell>) -> Self {
        Self { cell }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<DeviceSnapshot> {
        self.cell.load()
    }

    /// Returns the current value of a field.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        self.load().get(field).cloned()
    }

    /// Returns the current on/off state of a switchable output.
    #[must_use]
    pub fn switch(&self, field: Field) -> Option<bool> {
        self.load().switch(field)
    }
}
