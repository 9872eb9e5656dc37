// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for `AquaLogic` panel state.
//!
//! # Types
//!
//! - [`Field`] - Switchable outputs and sensor readings exposed by the panel
//! - [`FieldValue`] - Boolean, numeric or text value of a field

mod field;
mod value;

pub use field::Field;
pub use value::FieldValue;
