// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `LightBridge` library.
//!
//! This module provides the error hierarchy used internally by the vendor
//! clients and the activity log: configuration, authentication, transport,
//! vendor rejections, malformed responses, invalid command payloads and
//! file storage.
//!
//! Public control operations collapse every variant into an
//! [`OperationResult`](crate::OperationResult); the typed errors remain
//! available to callers of the lower-level APIs.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials or other settings are missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The vendor refused to issue an access token.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The request could not be delivered or the HTTP status was not 2xx.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// HTTP succeeded but the vendor reported `success: false`.
    ///
    /// The display string is the vendor's own message, unchanged.
    #[error("{message}")]
    VendorRejection {
        /// Vendor error code, when one was returned.
        code: Option<i64>,
        /// Vendor error message.
        message: String,
    },

    /// The response body was not JSON or did not have the expected shape.
    #[error("malformed response: {0}")]
    Parse(#[from] ParseError),

    /// A command payload could not be interpreted.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The activity log file could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Errors raised before any request is attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Tuya client id or secret is empty.
    #[error("Tuya client id and secret are not configured")]
    MissingCredentials,

    /// Govee API key is empty.
    #[error("Govee API key is not configured")]
    MissingApiKey,

    /// A base URL could not be used.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Errors related to HTTP communication.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client failed to send or receive.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} {reason}: {body}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
        /// Response body, possibly empty.
        body: String,
    },
}

/// Errors related to parsing vendor responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to command payloads and other caller-supplied values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The payload had the wrong JSON type for the command.
    #[error("invalid value for `{command}`: expected {expected}")]
    InvalidPayload {
        /// The unified command name.
        command: String,
        /// Description of the expected payload.
        expected: &'static str,
    },

    /// A hex color string could not be parsed.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),

    /// A required field was empty or missing.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
