// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client for the Govee developer API.
//!
//! Govee authenticates with a single `Govee-API-Key` header; there is no
//! signing and no token lease.

use std::env;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::{ConfigError, Error, ParseError, Result, TransportError};
use crate::outcome::OperationResult;
use crate::types::{PowerState, RgbColor};

const API_KEY_HEADER: &str = "Govee-API-Key";

/// Configuration for a [`GoveeClient`].
///
/// # Examples
///
/// ```
/// use lightbridge_lib::protocol::GoveeConfig;
///
/// let config = GoveeConfig::new("key").with_base_url("http://127.0.0.1:9000/");
/// assert_eq!(config.base_url(), "http://127.0.0.1:9000");
/// assert_eq!(config.router_url(), "https://openapi.api.govee.com");
/// ```
#[derive(Clone)]
pub struct GoveeConfig {
    api_key: Option<String>,
    base_url: String,
    router_url: String,
    timeout: Duration,
}

impl GoveeConfig {
    /// Default developer API host.
    pub const DEFAULT_BASE_URL: &'static str = "https://developer-api.govee.com";

    /// Default host of the capability router API.
    pub const DEFAULT_ROUTER_URL: &'static str = "https://openapi.api.govee.com";

    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Environment variable holding the API key.
    pub const ENV_API_KEY: &'static str = "GOVEE_API_KEY";

    /// Creates a configuration. A blank key counts as missing.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            api_key: (!api_key.trim().is_empty()).then_some(api_key),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            router_url: Self::DEFAULT_ROUTER_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Reads `GOVEE_API_KEY` from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(env::var(Self::ENV_API_KEY).unwrap_or_default())
    }

    /// Sets the developer API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the router API base URL.
    #[must_use]
    pub fn with_router_url(mut self, router_url: impl Into<String>) -> Self {
        self.router_url = router_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns `true` if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns the developer API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the router API base URL.
    #[must_use]
    pub fn router_url(&self) -> &str {
        &self.router_url
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for GoveeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoveeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("router_url", &self.router_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A device as reported by the Govee listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoveeDevice {
    /// Device MAC-style identifier.
    pub device: String,
    /// Product model (SKU).
    pub model: String,
    /// User-assigned name.
    #[serde(default)]
    pub device_name: String,
    /// Whether the device accepts control commands.
    #[serde(default)]
    pub controllable: bool,
    /// Whether the device state can be queried.
    #[serde(default)]
    pub retrievable: bool,
    /// Command names the device accepts.
    #[serde(default)]
    pub support_cmds: Vec<String>,
    /// Last known state, when included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<GoveeProperties>,
}

impl GoveeDevice {
    /// Returns `true` if the device lists `command` among its supported
    /// commands.
    #[must_use]
    pub fn supports(&self, command: &str) -> bool {
        self.support_cmds.iter().any(|c| c == command)
    }
}

/// Last known device state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoveeProperties {
    /// Current color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<RgbColor>,
    /// Brightness percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    /// `"on"` or `"off"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_state: Option<String>,
    /// Whether the device is reachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
}

impl GoveeProperties {
    /// Returns the parsed power state.
    #[must_use]
    pub fn power(&self) -> Option<PowerState> {
        self.power_state.as_deref().and_then(|s| s.parse().ok())
    }
}

/// A Govee control command, sent as `cmd`.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::protocol::GoveeCommand;
/// use lightbridge_lib::types::RgbColor;
/// use serde_json::json;
///
/// let cmd = GoveeCommand::color(RgbColor::new(255, 0, 0));
/// assert_eq!(
///     serde_json::to_value(&cmd).unwrap(),
///     json!({"name": "color", "value": {"r": 255, "g": 0, "b": 0}})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoveeCommand {
    /// Command name.
    pub name: String,
    /// Command value.
    pub value: Value,
}

impl GoveeCommand {
    /// Creates an arbitrary command.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Power on or off.
    #[must_use]
    pub fn turn(state: PowerState) -> Self {
        Self::new("turn", state.as_str())
    }

    /// Brightness percentage, clamped to 100.
    #[must_use]
    pub fn brightness(percent: u8) -> Self {
        Self::new("brightness", percent.min(100))
    }

    /// RGB color.
    #[must_use]
    pub fn color(color: RgbColor) -> Self {
        Self::new("color", json!(color))
    }

    /// Color temperature in kelvin.
    #[must_use]
    pub fn color_temperature(kelvin: u16) -> Self {
        Self::new("colorTem", kelvin)
    }
}

#[derive(Deserialize)]
struct DeviceListResponse {
    data: DeviceListData,
}

#[derive(Deserialize)]
struct DeviceListData {
    #[serde(default)]
    devices: Vec<GoveeDevice>,
}

#[derive(Deserialize)]
struct ControlResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the Govee developer API.
///
/// # Examples
///
/// ```no_run
/// use lightbridge_lib::protocol::{GoveeClient, GoveeCommand, GoveeConfig};
/// use lightbridge_lib::types::PowerState;
///
/// # async fn example() -> lightbridge_lib::Result<()> {
/// let client = GoveeClient::new(GoveeConfig::from_env())?;
///
/// for device in client.list_devices().await? {
///     let result = client
///         .control(&device.device, &device.model, &GoveeCommand::turn(PowerState::On))
///         .await;
///     println!("{}: {}", device.device_name, result.message);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GoveeClient {
    config: GoveeConfig,
    http: Client,
}

impl GoveeClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: GoveeConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TransportError::Http)?;
        Ok(Self { config, http })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GoveeConfig {
        &self.config
    }

    /// Lists devices on the account.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` without an API key, or the transport or
    /// parse error of the request.
    pub async fn list_devices(&self) -> Result<Vec<GoveeDevice>> {
        let url = format!("{}/v1/devices", self.config.base_url);
        let text = self.send(Method::GET, &url, None).await?;
        let response: DeviceListResponse = serde_json::from_str(&text).map_err(ParseError::Json)?;
        Ok(response.data.devices)
    }

    /// Sends one control command.
    ///
    /// A 2xx reply with a `code` other than 200 is reported as a failure
    /// carrying the vendor message.
    pub async fn control(&self, device: &str, model: &str, command: &GoveeCommand) -> OperationResult {
        match self.try_control(device, model, command).await {
            Ok(message) => OperationResult::ok(message),
            Err(err) => {
                tracing::warn!(device, model, command = %command.name, error = %err, "Govee control failed");
                OperationResult::from(err)
            }
        }
    }

    /// Fetches the dynamic scenes a device offers.
    ///
    /// Devices without dynamic scenes answer with an error status; that and
    /// every other failure yield an empty list.
    pub async fn dynamic_scenes(&self, device: &str, model: &str) -> Vec<Value> {
        match self.try_dynamic_scenes(device, model).await {
            Ok(scenes) => scenes,
            Err(err) => {
                tracing::warn!(device, model, error = %err, "Govee dynamic scene query failed");
                Vec::new()
            }
        }
    }

    async fn try_control(&self, device: &str, model: &str, command: &GoveeCommand) -> Result<String> {
        let url = format!("{}/v1/devices/control", self.config.base_url);
        let body = json!({ "device": device, "model": model, "cmd": command });
        let text = self.send(Method::PUT, &url, Some(&body)).await?;

        let response: ControlResponse = serde_json::from_str(&text).map_err(ParseError::Json)?;
        let message = response.message.unwrap_or_else(|| "success".into());
        match response.code {
            Some(code) if code != 200 => Err(Error::VendorRejection {
                code: Some(code),
                message,
            }),
            _ => Ok(message),
        }
    }

    async fn try_dynamic_scenes(&self, device: &str, model: &str) -> Result<Vec<Value>> {
        let url = format!(
            "{}/router/api/v1/device/queryDynamicScene",
            self.config.router_url
        );
        let body = json!({
            "requestId": Uuid::new_v4().to_string(),
            "payload": { "sku": model, "device": device },
        });
        let text = self.send(Method::POST, &url, Some(&body)).await?;
        let response: Value = serde_json::from_str(&text).map_err(ParseError::Json)?;
        Ok(extract_dynamic_scenes(&response))
    }

    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)?;

        tracing::debug!(method = %method, url, "Sending Govee request");

        let mut request = self.http.request(method, url).header(API_KEY_HEADER, api_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(TransportError::Http)?;
        let status = response.status();
        let text = response.text().await.map_err(TransportError::Http)?;

        tracing::debug!(status = status.as_u16(), body = %text, "Received Govee response");

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body: text,
            }
            .into());
        }
        Ok(text)
    }
}

/// Returns the `dynamicScene` list of the first capability that has one.
fn extract_dynamic_scenes(response: &Value) -> Vec<Value> {
    response
        .pointer("/payload/capabilities")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find_map(|cap| cap.pointer("/parameters/dynamicScene").and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}
