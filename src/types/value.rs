// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field values reported by the panel.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The value of a single [`Field`](super::Field).
///
/// Switchable outputs carry [`FieldValue::Bool`]; sensors carry a number or,
/// for the status line, text.
///
/// # Examples
///
/// ```
/// use aqualogic_lib::types::FieldValue;
///
/// let on = FieldValue::from(true);
/// assert_eq!(on.as_bool(), Some(true));
///
/// let temp = FieldValue::from(27.5);
/// assert_eq!(temp.as_number(), Some(27.5));
/// assert_eq!(temp.to_string(), "27.5");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// On/off state of an output.
    Bool(bool),
    /// Numeric sensor reading.
    Number(f64),
    /// Free-form text such as the panel status line.
    Text(String),
}

impl FieldValue {
    /// Returns the boolean value, if this is a [`FieldValue::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the numeric value, if this is a [`FieldValue::Number`].
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text value, if this is a [`FieldValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("on"),
            Self::Bool(false) => f.write_str("off"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        assert_eq!(FieldValue::Bool(false).as_number(), None);
        assert_eq!(FieldValue::from(3).as_number(), Some(3.0));
        assert_eq!(FieldValue::from("Heater1 On").as_text(), Some("Heater1 On"));
        assert_eq!(FieldValue::from("x").as_bool(), None);
    }

    #[test]
    fn display() {
        assert_eq!(FieldValue::Bool(true).to_string(), "on");
        assert_eq!(FieldValue::Bool(false).to_string(), "off");
        assert_eq!(FieldValue::from(3400).to_string(), "3400");
    }

    #[test]
    fn untagged_serde() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"[true, 81.5, "Check System"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Bool(true),
                FieldValue::Number(81.5),
                FieldValue::Text("Check System".to_string())
            ]
        );
    }
}
