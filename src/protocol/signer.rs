// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tuya OpenAPI request signing.
//!
//! Every request carries an `HMAC-SHA256` signature over a canonical string:
//!
//! ```text
//! METHOD
//! hex(sha256(body))
//! <empty headers line>
//! /path?query
//! ```
//!
//! The token request signs `client_id + t + string_to_sign`; every other
//! request signs `client_id + access_token + t + string_to_sign`. The key is
//! the client secret and the digest is sent as uppercase hex.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::protocol::Credentials;

type HmacSha256 = Hmac<Sha256>;

/// Value of the `sign_method` header.
pub const SIGN_METHOD: &str = "HMAC-SHA256";

/// Returns the lowercase hex SHA-256 digest of a request body.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::protocol::signer::content_hash;
///
/// assert_eq!(
///     content_hash(""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn content_hash(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

/// Builds the canonical string-to-sign.
#[must_use]
pub fn string_to_sign(method: &str, content_hash: &str, path_with_query: &str) -> String {
    [method, content_hash, "", path_with_query].join("\n")
}

/// Computes request signatures for one set of credentials.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    /// Creates a signer.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Returns the client id used as the `client_id` header.
    #[must_use]
    pub fn client_id(&self) -> &str {
        self.credentials.client_id()
    }

    /// Signs the `GET` token request for `path_with_query`.
    #[must_use]
    pub fn sign_token_request(&self, timestamp_ms: i64, path_with_query: &str) -> String {
        let sts = string_to_sign("GET", &content_hash(""), path_with_query);
        let message = format!("{}{timestamp_ms}{sts}", self.credentials.client_id());
        self.hmac_upper_hex(&message)
    }

    /// Signs an authenticated business request.
    #[must_use]
    pub fn sign_request(
        &self,
        access_token: &str,
        timestamp_ms: i64,
        method: &str,
        path_with_query: &str,
        body: &str,
    ) -> String {
        let sts = string_to_sign(method, &content_hash(body), path_with_query);
        let message = format!(
            "{}{access_token}{timestamp_ms}{sts}",
            self.credentials.client_id()
        );
        self.hmac_upper_hex(&message)
    }

    fn hmac_upper_hex(&self, message: &str) -> String {
        // HMAC accepts any key length; keys over the block size are hashed.
        let mut mac = HmacSha256::new_from_slice(self.credentials.client_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(message.as_bytes());
        hex::encode_upper(mac.finalize().into_bytes())
    }
}
