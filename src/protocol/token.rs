// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access token lease and cache.

use std::fmt;
use std::future::Future;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::protocol::Clock;

/// A bearer token with its local expiry.
///
/// The local expiry is one minute before the vendor's, so a request is
/// never signed with a token about to lapse.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    expires_at_ms: i64,
}

impl AccessToken {
    /// How long before the vendor expiry the token is considered stale.
    pub const REFRESH_MARGIN_MS: i64 = 60_000;

    /// Creates a token from a lease granted at `issued_at_ms` for
    /// `lease_secs` seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use lightbridge_lib::protocol::AccessToken;
    ///
    /// let token = AccessToken::from_lease("abc", 1_000_000, 7200);
    /// assert_eq!(token.expires_at_ms(), 1_000_000 + 7_200_000 - 60_000);
    /// assert!(token.is_valid_at(1_000_000));
    /// assert!(!token.is_valid_at(token.expires_at_ms()));
    /// ```
    #[must_use]
    pub fn from_lease(token: impl Into<String>, issued_at_ms: i64, lease_secs: i64) -> Self {
        Self {
            token: token.into(),
            expires_at_ms: issued_at_ms
                .saturating_add(lease_secs.saturating_mul(1000))
                .saturating_sub(Self::REFRESH_MARGIN_MS),
        }
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the local expiry in epoch milliseconds.
    #[must_use]
    pub fn expires_at_ms(&self) -> i64 {
        self.expires_at_ms
    }

    /// Returns `true` if the token may still be used at `now_ms`.
    #[must_use]
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        !self.token.is_empty() && now_ms < self.expires_at_ms
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.token.chars().take(4).collect();
        f.debug_struct("AccessToken")
            .field("token", &format_args!("{prefix}…"))
            .field("expires_at_ms", &self.expires_at_ms)
            .finish()
    }
}

/// Single-slot token cache.
///
/// The lock is held while a refresh is in flight, so concurrent callers
/// wait for one refresh and then reuse its token.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    slot: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the cached token if still valid, otherwise runs `fetch` and
    /// caches its result. A failed fetch leaves the cache empty.
    pub(crate) async fn get_or_refresh<F, Fut>(
        &self,
        clock: &dyn Clock,
        fetch: F,
    ) -> Result<AccessToken>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AccessToken>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(token) = slot.as_ref().filter(|t| t.is_valid_at(clock.now_millis())) {
            return Ok(token.clone());
        }

        *slot = None;
        let token = fetch().await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Returns the cached token regardless of validity.
    pub(crate) async fn current(&self) -> Option<AccessToken> {
        self.slot.lock().await.clone()
    }
}
