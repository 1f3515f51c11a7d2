// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device listing response shapes.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

/// The `result` of a device listing call.
///
/// Listing endpoints return either an object wrapping the records or a bare
/// array. Both normalize to the same record list.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::protocol::DeviceListing;
/// use serde_json::json;
///
/// let paged = DeviceListing::parse(json!({"devices": [{"id": "a"}], "has_more": false})).unwrap();
/// let flat = DeviceListing::parse(json!([{"id": "a"}])).unwrap();
/// assert_eq!(paged.into_devices(), flat.into_devices());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DeviceListing {
    /// `{"devices": [...], ...}`
    Paged {
        /// Device records.
        #[serde(default)]
        devices: Vec<Value>,
        /// Whether more pages exist.
        #[serde(default)]
        has_more: bool,
        /// Cursor for the next page.
        #[serde(default)]
        last_row_key: Option<String>,
    },
    /// `[...]`
    Flat(Vec<Value>),
}

impl DeviceListing {
    /// Parses a listing `result` value.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnexpectedFormat` if `result` is neither shape.
    pub fn parse(result: Value) -> Result<Self, ParseError> {
        serde_json::from_value(result)
            .map_err(|e| ParseError::UnexpectedFormat(format!("device listing: {e}")))
    }

    /// Returns the device records.
    #[must_use]
    pub fn into_devices(self) -> Vec<Value> {
        match self {
            Self::Paged { devices, .. } | Self::Flat(devices) => devices,
        }
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Paged { devices, .. } | Self::Flat(devices) => devices.is_empty(),
        }
    }

    /// Returns `true` if the vendor reported further pages.
    #[must_use]
    pub fn has_more(&self) -> bool {
        matches!(self, Self::Paged { has_more: true, .. })
    }
}
