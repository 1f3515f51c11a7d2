// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration for the Tuya cloud client.

use std::env;
use std::fmt;
use std::time::Duration;

use reqwest::Client;

use crate::error::{ConfigError, TransportError};

/// Tuya OpenAPI regional endpoints.
///
/// Projects are bound to the data center chosen when the cloud project was
/// created; requests to another region fail authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataCenter {
    /// China.
    China,
    /// Western America.
    #[default]
    WesternAmerica,
    /// Eastern America.
    EasternAmerica,
    /// Central Europe.
    CentralEurope,
    /// Western Europe.
    WesternEurope,
    /// India.
    India,
}

impl DataCenter {
    /// Returns the OpenAPI base URL for this region.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::China => "https://openapi.tuyacn.com",
            Self::WesternAmerica => "https://openapi.tuyaus.com",
            Self::EasternAmerica => "https://openapi-ueaz.tuyaus.com",
            Self::CentralEurope => "https://openapi.tuyaeu.com",
            Self::WesternEurope => "https://openapi-weaz.tuyaeu.com",
            Self::India => "https://openapi.tuyain.com",
        }
    }
}

/// Tuya cloud project credentials.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Creates credentials, returning `None` if either part is empty.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Option<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return None;
        }
        Some(Self {
            client_id,
            client_secret,
        })
    }

    /// Returns the client (access) id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Configuration for a [`TuyaClient`](crate::protocol::TuyaClient).
///
/// Missing credentials are not an error here: a client built without them
/// answers every call with a configuration-error result and sends nothing.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::protocol::{DataCenter, TuyaConfig};
/// use std::time::Duration;
///
/// let config = TuyaConfig::new("my-client-id", "my-secret")
///     .with_data_center(DataCenter::CentralEurope)
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "https://openapi.tuyaeu.com");
/// assert!(config.credentials().is_some());
///
/// let unconfigured = TuyaConfig::new("", "");
/// assert!(unconfigured.credentials().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct TuyaConfig {
    credentials: Option<Credentials>,
    base_url: String,
    timeout: Duration,
    device_list_path: String,
    fallback_device_list_path: String,
}

impl TuyaConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Primary device listing endpoint.
    pub const DEFAULT_DEVICE_LIST_PATH: &'static str = "/v1.0/iot-03/devices";

    /// Fallback device listing endpoint.
    pub const DEFAULT_FALLBACK_DEVICE_LIST_PATH: &'static str =
        "/v1.0/iot-01/associated-users/devices";

    /// Environment variable holding the client id.
    pub const ENV_CLIENT_ID: &'static str = "TUYA_CLIENT_ID";

    /// Environment variable holding the client secret.
    pub const ENV_CLIENT_SECRET: &'static str = "TUYA_CLIENT_SECRET";

    /// Environment variable overriding the base URL.
    pub const ENV_BASE_URL: &'static str = "TUYA_BASE_URL";

    /// Creates a configuration for the default (Western America) region.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(client_id, client_secret),
            base_url: DataCenter::default().base_url().to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            device_list_path: Self::DEFAULT_DEVICE_LIST_PATH.to_string(),
            fallback_device_list_path: Self::DEFAULT_FALLBACK_DEVICE_LIST_PATH.to_string(),
        }
    }

    /// Reads `TUYA_CLIENT_ID`, `TUYA_CLIENT_SECRET` and optionally
    /// `TUYA_BASE_URL` from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let config = Self::new(
            env::var(Self::ENV_CLIENT_ID).unwrap_or_default(),
            env::var(Self::ENV_CLIENT_SECRET).unwrap_or_default(),
        );
        match env::var(Self::ENV_BASE_URL) {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url),
            _ => config,
        }
    }

    /// Selects a regional endpoint.
    #[must_use]
    pub fn with_data_center(mut self, data_center: DataCenter) -> Self {
        self.base_url = data_center.base_url().to_string();
        self
    }

    /// Sets an explicit base URL (for proxies and tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the device listing endpoints.
    #[must_use]
    pub fn with_device_list_paths(
        mut self,
        primary: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        self.device_list_path = primary.into();
        self.fallback_device_list_path = fallback.into();
        self
    }

    /// Returns the credentials, if configured.
    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the primary device listing path.
    #[must_use]
    pub fn device_list_path(&self) -> &str {
        &self.device_list_path
    }

    /// Returns the fallback device listing path.
    #[must_use]
    pub fn fallback_device_list_path(&self) -> &str {
        &self.fallback_device_list_path
    }

    /// Checks the base URL scheme.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` unless the URL is `http(s)://`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.starts_with("https://") || self.base_url.starts_with("http://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidBaseUrl(self.base_url.clone()))
        }
    }

    pub(crate) fn build_http_client(&self) -> Result<Client, TransportError> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(TransportError::Http)
    }
}

impl Default for TuyaConfig {
    fn default() -> Self {
        Self::new("", "")
    }
}
