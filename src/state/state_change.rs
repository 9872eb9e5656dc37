// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A decoder reports every field it decodes from the byte stream as one
//! [`StateChange`]. Changes are applied to the snapshot one at a time, so a
//! burst of decoded fields yields one notification per changed field.

use serde::{Deserialize, Serialize};

use crate::types::{Field, FieldValue};

/// A single decoded field update.
///
/// # Examples
///
/// ```
/// use aqualogic_lib::state::StateChange;
/// use aqualogic_lib::types::{Field, FieldValue};
///
/// let change = StateChange::new(Field::PoolTemp, 27.5);
/// assert_eq!(change.field(), Field::PoolTemp);
/// assert_eq!(change.value(), &FieldValue::Number(27.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    field: Field,
    value: FieldValue,
}

impl StateChange {
    /// Creates a change setting `field` to `value`.
    #[must_use]
    pub fn new(field: Field, value: impl Into<FieldValue>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Creates an on/off change for a switchable output.
    #[must_use]
    pub fn switch(field: Field, on: bool) -> Self {
        Self::new(field, on)
    }

    /// Returns the field that changed.
    #[must_use]
    pub fn field(&self) -> Field {
        self.field
    }

    /// Returns the new value.
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Consumes the change and returns its parts.
    #[must_use]
    pub fn into_parts(self) -> (Field, FieldValue) {
        (self.field, self.value)
    }
}

impl std::fmt::Display for StateChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.field, self.value)
    }
}
