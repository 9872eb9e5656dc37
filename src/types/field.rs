// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Addressable fields of an `AquaLogic` panel.
//!
//! A [`Field`] is either a switchable output (lights, filter pump, aux
//! relays, ...) carrying a boolean, or a sensor reading carrying a number or
//! text. Fields are the keys of the [`DeviceSnapshot`](crate::state::DeviceSnapshot).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An output or sensor exposed by the pool controller.
///
/// # Examples
///
/// ```
/// use aqualogic_lib::types::Field;
///
/// assert_eq!(Field::Lights.key(), "lights");
/// assert_eq!(Field::Lights.display_name(), "Lights");
/// assert!(Field::Lights.is_switchable());
/// assert!(!Field::PoolTemp.is_switchable());
///
/// let parsed: Field = "aux_3".parse().unwrap();
/// assert_eq!(parsed, Field::Aux3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Pool and spa lights.
    Lights,
    /// Filter pump.
    Filter,
    /// Filter pump at low speed.
    FilterLowSpeed,
    /// Pool mode, routing water through the pool.
    Pool,
    /// Spa mode, routing water through the spa.
    Spa,
    /// Auxiliary relay 1.
    #[serde(rename = "aux_1")]
    Aux1,
    /// Auxiliary relay 2.
    #[serde(rename = "aux_2")]
    Aux2,
    /// Auxiliary relay 3.
    #[serde(rename = "aux_3")]
    Aux3,
    /// Auxiliary relay 4.
    #[serde(rename = "aux_4")]
    Aux4,
    /// Auxiliary relay 5.
    #[serde(rename = "aux_5")]
    Aux5,
    /// Auxiliary relay 6.
    #[serde(rename = "aux_6")]
    Aux6,
    /// Auxiliary relay 7.
    #[serde(rename = "aux_7")]
    Aux7,
    /// Auxiliary relay 8.
    #[serde(rename = "aux_8")]
    Aux8,
    /// Auxiliary relay 9.
    #[serde(rename = "aux_9")]
    Aux9,
    /// Auxiliary relay 10.
    #[serde(rename = "aux_10")]
    Aux10,
    /// Auxiliary relay 11.
    #[serde(rename = "aux_11")]
    Aux11,
    /// Auxiliary relay 12.
    #[serde(rename = "aux_12")]
    Aux12,
    /// Auxiliary relay 13.
    #[serde(rename = "aux_13")]
    Aux13,
    /// Auxiliary relay 14.
    #[serde(rename = "aux_14")]
    Aux14,
    /// Valve 3 actuator.
    #[serde(rename = "valve_3")]
    Valve3,
    /// Valve 4 actuator.
    #[serde(rename = "valve_4")]
    Valve4,
    /// Automatic heater control.
    HeaterAutoMode,
    /// Service mode, which suspends automatic control.
    Service,
    /// Air temperature.
    AirTemp,
    /// Pool water temperature.
    PoolTemp,
    /// Spa water temperature.
    SpaTemp,
    /// Chlorinator output while in pool mode, in percent.
    PoolChlorinator,
    /// Chlorinator output while in spa mode, in percent.
    SpaChlorinator,
    /// Salt level reported by the cell.
    SaltLevel,
    /// Variable-speed pump speed, in percent.
    PumpSpeed,
    /// Pump power draw, in watts.
    PumpPower,
    /// Panel status line, such as "Check System".
    Status,
}

impl Field {
    /// All switchable outputs, in panel order.
    pub const SWITCHES: [Self; 23] = [
        Self::Lights,
        Self::Filter,
        Self::FilterLowSpeed,
        Self::Pool,
        Self::Spa,
        Self::Aux1,
        Self::Aux2,
        Self::Aux3,
        Self::Aux4,
        Self::Aux5,
        Self::Aux6,
        Self::Aux7,
        Self::Aux8,
        Self::Aux9,
        Self::Aux10,
        Self::Aux11,
        Self::Aux12,
        Self::Aux13,
        Self::Aux14,
        Self::Valve3,
        Self::Valve4,
        Self::HeaterAutoMode,
        Self::Service,
    ];

    /// All sensor readings.
    pub const SENSORS: [Self; 9] = [
        Self::AirTemp,
        Self::PoolTemp,
        Self::SpaTemp,
        Self::PoolChlorinator,
        Self::SpaChlorinator,
        Self::SaltLevel,
        Self::PumpSpeed,
        Self::PumpPower,
        Self::Status,
    ];

    /// Returns an iterator over every field.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::SWITCHES.into_iter().chain(Self::SENSORS)
    }

    /// Returns the stable identifier used in configuration and logs.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Lights => "lights",
            Self::Filter => "filter",
            Self::FilterLowSpeed => "filter_low_speed",
            Self::Pool => "pool",
            Self::Spa => "spa",
            Self::Aux1 => "aux_1",
            Self::Aux2 => "aux_2",
            Self::Aux3 => "aux_3",
            Self::Aux4 => "aux_4",
            Self::Aux5 => "aux_5",
            Self::Aux6 => "aux_6",
            Self::Aux7 => "aux_7",
            Self::Aux8 => "aux_8",
            Self::Aux9 => "aux_9",
            Self::Aux10 => "aux_10",
            Self::Aux11 => "aux_11",
            Self::Aux12 => "aux_12",
            Self::Aux13 => "aux_13",
            Self::Aux14 => "aux_14",
            Self::Valve3 => "valve_3",
            Self::Valve4 => "valve_4",
            Self::HeaterAutoMode => "heater_auto_mode",
            Self::Service => "service",
            Self::AirTemp => "air_temp",
            Self::PoolTemp => "pool_temp",
            Self::SpaTemp => "spa_temp",
            Self::PoolChlorinator => "pool_chlorinator",
            Self::SpaChlorinator => "spa_chlorinator",
            Self::SaltLevel => "salt_level",
            Self::PumpSpeed => "pump_speed",
            Self::PumpPower => "pump_power",
            Self::Status => "status",
        }
    }

    /// Returns the human-readable name shown by entity adapters.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Lights => "Lights",
            Self::Filter => "Filter",
            Self::FilterLowSpeed => "Filter Low Speed",
            Self::Pool => "Pool",
            Self::Spa => "Spa",
            Self::Aux1 => "Aux 1",
            Self::Aux2 => "Aux 2",
            Self::Aux3 => "Aux 3",
            Self::Aux4 => "Aux 4",
            Self::Aux5 => "Aux 5",
            Self::Aux6 => "Aux 6",
            Self::Aux7 => "Aux 7",
            Self::Aux8 => "Aux 8",
            Self::Aux9 => "Aux 9",
            Self::Aux10 => "Aux 10",
            Self::Aux11 => "Aux 11",
            Self::Aux12 => "Aux 12",
            Self::Aux13 => "Aux 13",
            Self::Aux14 => "Aux 14",
            Self::Valve3 => "Valve 3",
            Self::Valve4 => "Valve 4",
            Self::HeaterAutoMode => "Heater Auto Mode",
            Self::Service => "Service",
            Self::AirTemp => "Air Temperature",
            Self::PoolTemp => "Pool Temperature",
            Self::SpaTemp => "Spa Temperature",
            Self::PoolChlorinator => "Pool Chlorinator",
            Self::SpaChlorinator => "Spa Chlorinator",
            Self::SaltLevel => "Salt Level",
            Self::PumpSpeed => "Pump Speed",
            Self::PumpPower => "Pump Power",
            Self::Status => "Status",
        }
    }

    /// Returns true for outputs that accept on/off commands.
    #[must_use]
    pub const fn is_switchable(&self) -> bool {
        !self.is_sensor()
    }

    /// Returns true for read-only sensor readings.
    #[must_use]
    pub const fn is_sensor(&self) -> bool {
        matches!(
            self,
            Self::AirTemp
                | Self::PoolTemp
                | Self::SpaTemp
                | Self::PoolChlorinator
                | Self::SpaChlorinator
                | Self::SaltLevel
                | Self::PumpSpeed
                | Self::PumpPower
                | Self::Status
        )
    }

    /// Returns the unit of a sensor reading, if it has one.
    ///
    /// Temperatures and salt level are reported in the unit configured on
    /// the panel, so they carry no fixed unit here.
    #[must_use]
    pub const fn unit(&self) -> Option<&'static str> {
        match self {
            Self::PoolChlorinator | Self::SpaChlorinator | Self::PumpSpeed => Some("%"),
            Self::PumpPower => Some("W"),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .find(|field| field.key() == wanted)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown field: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switches_and_sensors_are_disjoint() {
        assert!(Field::SWITCHES.iter().all(Field::is_switchable));
        assert!(Field::SENSORS.iter().all(Field::is_sensor));
        assert_eq!(Field::all().count(), 32);
    }

    #[test]
    fn keys_round_trip_through_from_str() {
        for field in Field::all() {
            assert_eq!(field.key().parse::<Field>().unwrap(), field);
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("LIGHTS".parse::<Field>().unwrap(), Field::Lights);
        assert_eq!(" Heater_Auto_Mode ".parse::<Field>().unwrap(), Field::HeaterAutoMode);
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!("jacuzzi".parse::<Field>().is_err());
    }

    #[test]
    fn serde_uses_keys() {
        let json = serde_json::to_string(&Field::Aux10).unwrap();
        assert_eq!(json, "\"aux_10\"");
        let field: Field = serde_json::from_str("\"filter_low_speed\"").unwrap();
        assert_eq!(field, Field::FilterLowSpeed);
    }

    #[test]
    fn units() {
        assert_eq!(Field::PumpPower.unit(), Some("W"));
        assert_eq!(Field::PumpSpeed.unit(), Some("%"));
        assert_eq!(Field::PoolTemp.unit(), None);
        assert_eq!(Field::Lights.unit(), None);
    }
}
