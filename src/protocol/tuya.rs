// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Signed client for the Tuya OpenAPI.

use std::sync::Arc;

use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::command::{CommandTranslator, DataPointCodes, UnifiedCommand, VendorOperation};
use crate::error::{ConfigError, Error, ParseError, Result, TransportError};
use crate::outcome::OperationResult;
use crate::protocol::signer::{RequestSigner, SIGN_METHOD};
use crate::protocol::token::TokenCache;
use crate::protocol::{AccessToken, Clock, DeviceListing, SystemClock, TuyaConfig};
use crate::scene::SceneCatalog;

const TOKEN_PATH: &str = "/v1.0/token?grant_type=1";

/// Common response wrapper of every Tuya endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    code: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expire_time: Option<i64>,
}

/// Client for the Tuya cloud.
///
/// Owns the HTTP client, the access token cache and a command translator.
/// Control operations never return an error: every failure is collapsed
/// into an [`OperationResult`] with `success: false` and logged.
///
/// A client built without credentials is valid. Each call then fails with a
/// configuration message and nothing is sent.
///
/// # Examples
///
/// ```no_run
/// use lightbridge_lib::command::UnifiedCommand;
/// use lightbridge_lib::protocol::{TuyaClient, TuyaConfig};
/// use lightbridge_lib::types::PowerState;
///
/// # async fn example() -> lightbridge_lib::Result<()> {
/// let client = TuyaClient::new(TuyaConfig::from_env())?;
///
/// let result = client
///     .translate_and_send("bf1234567890abcdef", &UnifiedCommand::Turn(PowerState::On))
///     .await;
/// println!("{}: {}", result.success, result.message);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TuyaClient {
    config: TuyaConfig,
    http: Client,
    signer: Option<RequestSigner>,
    tokens: TokenCache,
    clock: Arc<dyn Clock>,
    translator: CommandTranslator,
}

impl TuyaClient {
    /// Creates a client with the system clock and built-in scenes.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// created.
    pub fn new(config: TuyaConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder(config: TuyaConfig) -> TuyaClientBuilder {
        TuyaClientBuilder::new(config)
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TuyaConfig {
        &self.config
    }

    /// Returns the command translator.
    #[must_use]
    pub fn translator(&self) -> &CommandTranslator {
        &self.translator
    }

    /// Returns the scene catalog used for `scene` commands.
    #[must_use]
    pub fn scenes(&self) -> &Arc<SceneCatalog> {
        self.translator.catalog()
    }

    /// Returns a valid access token, fetching one if needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` without credentials, `Error::Authentication`
    /// if the vendor refuses the token request, and transport or parse
    /// errors otherwise.
    pub async fn access_token(&self) -> Result<AccessToken> {
        let signer = self.signer()?;
        self.tokens
            .get_or_refresh(&*self.clock, || self.fetch_token(signer))
            .await
    }

    /// Returns the cached token without refreshing it.
    pub async fn cached_token(&self) -> Option<AccessToken> {
        self.tokens.current().await
    }

    /// Sends a signed request and normalizes the outcome.
    ///
    /// `path` includes any query string. On success the message is the
    /// vendor's `msg`, or `"success"` when the vendor sent none.
    pub async fn execute(&self, method: Method, path: &str, body: Option<&Value>) -> OperationResult {
        match self.request(method.clone(), path, body).await {
            Ok(envelope) => OperationResult::ok(envelope.msg.unwrap_or_else(|| "success".into())),
            Err(err) => {
                tracing::warn!(method = %method, path, error = %err, "Tuya request failed");
                OperationResult::from(err)
            }
        }
    }

    /// Sends data-point operations to a device.
    ///
    /// The list is posted as is, including when it is empty.
    pub async fn control_device(
        &self,
        device_id: &str,
        operations: &[VendorOperation],
    ) -> OperationResult {
        let path = format!("/v1.0/iot-03/devices/{}/commands", urlencoding::encode(device_id));
        let body = json!({ "commands": operations });

        tracing::debug!(device_id, operations = operations.len(), "Sending Tuya commands");

        self.execute(Method::POST, &path, Some(&body)).await
    }

    /// Translates a unified command and sends the resulting operations.
    pub async fn translate_and_send(
        &self,
        device_id: &str,
        command: &UnifiedCommand,
    ) -> OperationResult {
        let operations = self.translator.translate(command);
        self.control_device(device_id, &operations).await
    }

    /// Lists the devices visible to the project.
    ///
    /// Tries the primary listing endpoint, then the fallback when the first
    /// fails or returns nothing. Both failing yields an empty list.
    pub async fn list_devices(&self) -> Vec<Value> {
        let primary = self.config.device_list_path();
        let fallback = self.config.fallback_device_list_path();

        match self.fetch_listing(primary).await {
            Ok(devices) if !devices.is_empty() => return devices,
            Ok(_) => tracing::warn!(path = primary, "Tuya device listing was empty, trying fallback"),
            Err(err) => {
                tracing::warn!(path = primary, error = %err, "Tuya device listing failed, trying fallback");
            }
        }

        match self.fetch_listing(fallback).await {
            Ok(devices) => devices,
            Err(err) => {
                tracing::warn!(path = fallback, error = %err, "Tuya fallback device listing failed");
                Vec::new()
            }
        }
    }

    /// Reads the current data-point values of a device.
    ///
    /// # Errors
    ///
    /// Returns the underlying error if the request fails or the result is
    /// not a list of `{code, value}` objects.
    pub async fn device_status(&self, device_id: &str) -> Result<Vec<VendorOperation>> {
        let path = format!("/v1.0/iot-03/devices/{}/status", urlencoding::encode(device_id));
        let envelope = self.request(Method::GET, &path, None).await?;
        let status = serde_json::from_value(envelope.result).map_err(ParseError::Json)?;
        Ok(status)
    }

    async fn fetch_listing(&self, path: &str) -> Result<Vec<Value>> {
        let envelope = self.request(Method::GET, path, None).await?;
        Ok(DeviceListing::parse(envelope.result)?.into_devices())
    }

    fn signer(&self) -> Result<&RequestSigner> {
        self.signer
            .as_ref()
            .ok_or(Error::Config(ConfigError::MissingCredentials))
    }

    async fn fetch_token(&self, signer: &RequestSigner) -> Result<AccessToken> {
        let timestamp = self.clock.now_millis();
        let sign = signer.sign_token_request(timestamp, TOKEN_PATH);
        let url = format!("{}{TOKEN_PATH}", self.config.base_url());

        tracing::debug!(url = %url, "Requesting Tuya access token");

        let response = self
            .http
            .get(&url)
            .header("client_id", signer.client_id())
            .header("sign", sign)
            .header("t", timestamp.to_string())
            .header("sign_method", SIGN_METHOD)
            .send()
            .await
            .map_err(TransportError::Http)?;

        let envelope = read_envelope(response).await?;
        if !envelope.success {
            return Err(Error::Authentication(
                envelope.msg.unwrap_or_else(|| "token request rejected".into()),
            ));
        }

        let grant: TokenGrant = serde_json::from_value(envelope.result).map_err(ParseError::Json)?;
        let access_token = grant
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ParseError::MissingField("access_token".into()))?;
        let expire_time = grant
            .expire_time
            .ok_or_else(|| ParseError::MissingField("expire_time".into()))?;
        let token = AccessToken::from_lease(access_token, timestamp, expire_time);

        tracing::info!(expires_at_ms = token.expires_at_ms(), "Obtained Tuya access token");
        Ok(token)
    }

    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Envelope> {
        let signer = self.signer()?;
        let token = self.access_token().await?;

        let body = body.map(serde_json::to_string).transpose().map_err(ParseError::Json)?;
        let payload = body.as_deref().unwrap_or("");
        let timestamp = self.clock.now_millis();
        let sign = signer.sign_request(token.token(), timestamp, method.as_str(), path, payload);
        let url = format!("{}{path}", self.config.base_url());

        tracing::debug!(method = %method, path, "Sending Tuya request");

        let mut request = self
            .http
            .request(method, &url)
            .header("client_id", signer.client_id())
            .header("access_token", token.token())
            .header("sign", sign)
            .header("t", timestamp.to_string())
            .header("sign_method", SIGN_METHOD)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(TransportError::Http)?;
        let envelope = read_envelope(response).await?;

        if envelope.success {
            Ok(envelope)
        } else {
            Err(Error::VendorRejection {
                code: envelope.code,
                message: envelope
                    .msg
                    .unwrap_or_else(|| "vendor reported failure".into()),
            })
        }
    }
}

async fn read_envelope(response: reqwest::Response) -> Result<Envelope> {
    let status = response.status();
    let text = response.text().await.map_err(TransportError::Http)?;

    tracing::debug!(status = status.as_u16(), body = %text, "Received Tuya response");

    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body: text,
        }
        .into());
    }

    Ok(serde_json::from_str(&text).map_err(ParseError::Json)?)
}

/// Builder for [`TuyaClient`].
#[derive(Debug)]
pub struct TuyaClientBuilder {
    config: TuyaConfig,
    clock: Option<Arc<dyn Clock>>,
    catalog: Option<Arc<SceneCatalog>>,
    codes: Option<DataPointCodes>,
}

impl TuyaClientBuilder {
    /// Creates a builder for `config`.
    #[must_use]
    pub fn new(config: TuyaConfig) -> Self {
        Self {
            config,
            clock: None,
            catalog: None,
            codes: None,
        }
    }

    /// Sets the time source used for signing and token expiry.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the scene catalog.
    #[must_use]
    pub fn scenes(mut self, catalog: Arc<SceneCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Sets the data-point code family.
    #[must_use]
    pub fn codes(mut self, codes: DataPointCodes) -> Self {
        self.codes = Some(codes);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid or the HTTP client cannot be
    /// created.
    pub fn build(self) -> Result<TuyaClient> {
        self.config.validate()?;
        let http = self.config.build_http_client()?;

        let translator = CommandTranslator::new(
            self.catalog.unwrap_or_else(|| Arc::new(SceneCatalog::builtin())),
            self.codes.unwrap_or_default(),
        );

        Ok(TuyaClient {
            signer: self.config.credentials().cloned().map(RequestSigner::new),
            config: self.config,
            http,
            tokens: TokenCache::new(),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            translator,
        })
    }
}
