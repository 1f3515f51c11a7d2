// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `LightBridge` Lib - Control Tuya and Govee smart lights from one API.
//!
//! This library turns vendor-neutral light commands into the requests each
//! cloud expects, and normalizes every outcome into an [`OperationResult`].
//!
//! # Supported Features
//!
//! - **Unified commands**: power, brightness, RGB color, white temperature,
//!   scenes, countdown timers
//! - **Tuya cloud**: HMAC-SHA256 request signing, cached access token,
//!   device listing with endpoint fallback, data-point status
//! - **Govee cloud** (feature `govee`): device listing, control, dynamic
//!   scene discovery
//! - **Scenes**: eight built-in effects, extendable from JSON
//! - **Activity feed**: a small JSON-file log of dashboard actions
//!
//! # Quick Start
//!
//! ## Tuya Device
//!
//! ```no_run
//! use lightbridge_lib::{TuyaClient, TuyaConfig, UnifiedCommand};
//! use lightbridge_lib::types::RgbColor;
//!
//! #[tokio::main]
//! async fn main() -> lightbridge_lib::Result<()> {
//!     // Reads TUYA_CLIENT_ID and TUYA_CLIENT_SECRET
//!     let client = TuyaClient::new(TuyaConfig::from_env())?;
//!
//!     for device in client.list_devices().await {
//!         println!("{}", device["name"]);
//!     }
//!
//!     let result = client
//!         .translate_and_send("bf1234567890abcdef", &UnifiedCommand::Color(RgbColor::new(0, 0, 255)))
//!         .await;
//!     if !result.success {
//!         eprintln!("failed: {}", result.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Commands from JSON
//!
//! ```
//! use lightbridge_lib::{CommandTranslator, UnifiedCommand};
//! use serde_json::json;
//!
//! let command: UnifiedCommand =
//!     serde_json::from_value(json!({"name": "scene", "value": {"id": 6}})).unwrap();
//!
//! let operations = CommandTranslator::default().translate(&command);
//! assert_eq!(operations[0].code, "scene_data");
//! assert_eq!(operations[0].value["scene_num"], 6);
//! ```

pub mod activity;
pub mod command;
pub mod error;
mod outcome;
pub mod protocol;
pub mod scene;
pub mod types;

pub use command::{CommandTranslator, DataPointCodes, UnifiedCommand, VendorOperation};
pub use error::{ConfigError, Error, ParseError, Result, TransportError, ValueError};
pub use outcome::OperationResult;
#[cfg(feature = "govee")]
pub use protocol::{GoveeClient, GoveeCommand, GoveeConfig, GoveeDevice};
pub use protocol::{TuyaClient, TuyaClientBuilder, TuyaConfig};
pub use scene::{SceneCatalog, SceneDescriptor};
pub use types::{Brightness, ColorTemperature, HsvColor, PowerState, RgbColor};
