// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unified command vocabulary and its translation to vendor operations.
//!
//! The dashboard emits vendor-neutral commands shaped as
//! `{"name": ..., "value": ...}`. A [`CommandTranslator`] expands each into
//! the Tuya data-point operations that implement it.
//!
//! # Available Commands
//!
//! | Name | Value | Operations |
//! |------|-------|------------|
//! | `turn` | `"on"` / `"off"` | `switch_led` |
//! | `brightness` | percent 0-100 | `bright_value` (10-1000) |
//! | `color` | `{r, g, b}` or hex string | `work_mode = "colour"`, `colour_data` |
//! | `colorTemp` | percent 0-100 | `work_mode = "white"`, `temp_value` (0-1000) |
//! | `scene` | `{id}` | `scene_data` with the full descriptor |
//! | `countdown` | seconds, 0 cancels | `countdown` |
//!
//! Any other name parses to [`UnifiedCommand::Unsupported`] and translates
//! to no operations.
//!
//! # Examples
//!
//! ```
//! use lightbridge_lib::command::{CommandTranslator, UnifiedCommand};
//! use serde_json::json;
//!
//! let command: UnifiedCommand =
//!     serde_json::from_value(json!({"name": "color", "value": {"r": 0, "g": 0, "b": 255}})).unwrap();
//!
//! let operations = CommandTranslator::default().translate(&command);
//! assert_eq!(operations.len(), 2);
//! assert_eq!(operations[0].code, "work_mode");
//! assert_eq!(operations[0].value, json!("colour"));
//! assert_eq!(operations[1].value, json!({"h": 240, "s": 1000, "v": 1000}));
//! ```

mod codes;
mod translate;

pub use codes::DataPointCodes;
pub use translate::CommandTranslator;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValueError;
use crate::types::{PowerState, RgbColor};

/// One atomic instruction in the Tuya command schema.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::command::VendorOperation;
/// use serde_json::json;
///
/// let op = VendorOperation::new("switch_led", true);
/// assert_eq!(serde_json::to_value(&op).unwrap(), json!({"code": "switch_led", "value": true}));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorOperation {
    /// Data-point code.
    pub code: String,
    /// Value in the type the code expects.
    pub value: Value,
}

impl VendorOperation {
    /// Creates an operation.
    #[must_use]
    pub fn new(code: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for VendorOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.code, self.value)
    }
}

/// A vendor-neutral light command.
///
/// Deserializes from `{"name": ..., "value": ...}`. Percentages and color
/// channels are kept as given and clamped during translation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawCommand")]
pub enum UnifiedCommand {
    /// Switch the light on or off.
    Turn(PowerState),
    /// Set brightness as a percentage.
    Brightness(f64),
    /// Set an RGB color.
    Color(RgbColor),
    /// Set white temperature as a percentage (0 warmest, 100 coolest).
    ColorTemp(f64),
    /// Play a canned scene by slot.
    Scene {
        /// Scene slot. Unknown slots, negative ones included, still play a
        /// default scene.
        id: i64,
    },
    /// Switch off after the given number of seconds; 0 cancels.
    Countdown(u32),
    /// A command name this library does not know.
    Unsupported {
        /// The unrecognized name.
        name: String,
    },
}

impl UnifiedCommand {
    /// Returns the wire name of the command.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Turn(_) => "turn",
            Self::Brightness(_) => "brightness",
            Self::Color(_) => "color",
            Self::ColorTemp(_) => "colorTemp",
            Self::Scene { .. } => "scene",
            Self::Countdown(_) => "countdown",
            Self::Unsupported { name } => name,
        }
    }

    /// Parses a command from its name and raw value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPayload` if the value has the wrong shape
    /// for a known command. Unknown names never fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use lightbridge_lib::command::UnifiedCommand;
    /// use lightbridge_lib::types::PowerState;
    /// use serde_json::json;
    ///
    /// let cmd = UnifiedCommand::parse("turn", &json!("on")).unwrap();
    /// assert_eq!(cmd, UnifiedCommand::Turn(PowerState::On));
    ///
    /// assert!(UnifiedCommand::parse("brightness", &json!({"level": 3})).is_err());
    /// ```
    pub fn parse(name: &str, value: &Value) -> Result<Self, ValueError> {
        let invalid = |expected| ValueError::InvalidPayload {
            command: name.to_string(),
            expected,
        };

        let command = match name {
            "turn" => Self::Turn(PowerState::from_value(value)),
            "brightness" => {
                Self::Brightness(number(value).ok_or_else(|| invalid("a percentage"))?)
            }
            "colorTemp" => Self::ColorTemp(number(value).ok_or_else(|| invalid("a percentage"))?),
            "color" => Self::Color(color(value).ok_or_else(|| invalid("an {r, g, b} object"))?),
            "scene" => Self::Scene {
                id: scene_id(value).ok_or_else(|| invalid("an {id} object with an integer id"))?,
            },
            "countdown" => Self::Countdown(
                whole_number(value).ok_or_else(|| invalid("a non-negative number of seconds"))?,
            ),
            other => Self::Unsupported {
                name: other.to_string(),
            },
        };
        Ok(command)
    }
}

#[derive(Deserialize)]
struct RawCommand {
    name: String,
    #[serde(default)]
    value: Value,
}

impl TryFrom<RawCommand> for UnifiedCommand {
    type Error = ValueError;

    fn try_from(raw: RawCommand) -> Result<Self, Self::Error> {
        Self::parse(&raw.name, &raw.value)
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn whole_number(value: &Value) -> Option<u32> {
    let n = number(value)?;
    if !(0.0..=f64::from(u32::MAX)).contains(&n) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = n.round() as u32;
    Some(whole)
}

fn color(value: &Value) -> Option<RgbColor> {
    match value {
        Value::Object(_) => serde_json::from_value(value.clone()).ok(),
        Value::String(s) => RgbColor::from_hex(s).ok(),
        _ => None,
    }
}

/// Reads an exact integer; fractional values are rejected.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            integral(f)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| integral(s.parse().ok()?))
        }
        _ => None,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| f as i64)
}

fn scene_id(value: &Value) -> Option<i64> {
    match value {
        Value::Object(map) => integer(map.get("id")?),
        other => integer(other),
    }
}
