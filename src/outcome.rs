// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Uniform result of a vendor call.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Outcome of a control request, independent of the vendor.
///
/// Every vendor control call returns this shape. Expected failures
/// (missing credentials, rejected token, HTTP errors, vendor rejections,
/// malformed bodies) are reported with `success: false` and a message that
/// keeps the vendor message or HTTP status.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::OperationResult;
///
/// let ok = OperationResult::ok("done");
/// assert!(ok.success);
///
/// let json = serde_json::to_value(&ok).unwrap();
/// assert_eq!(json, serde_json::json!({"success": true, "message": "done"}));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Whether the vendor accepted the request.
    pub success: bool,
    /// Vendor message or failure description.
    pub message: String,
}

impl OperationResult {
    /// Creates a successful result.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Returns `true` if the request was accepted.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<Error> for OperationResult {
    fn from(err: Error) -> Self {
        Self::failure(err.to_string())
    }
}

impl From<&Error> for OperationResult {
    fn from(err: &Error) -> Self {
        Self::failure(err.to_string())
    }
}
