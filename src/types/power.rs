// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state for the `turn` command.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

/// Represents the requested power state of a light.
///
/// The dashboard sends `"on"` or `"off"`. Only the exact string `"on"` (or a
/// JSON `true`) means on; anything else means off.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::types::PowerState;
///
/// assert_eq!("on".parse::<PowerState>().unwrap(), PowerState::On);
/// assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
/// assert!(PowerState::On.is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Power is off.
    Off,
    /// Power is on.
    On,
}

impl PowerState {
    /// Returns the dashboard string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Returns `true` for [`PowerState::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Interprets a raw `turn` payload.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let on = match value {
            Value::String(s) => s == "on",
            Value::Bool(b) => *b,
            _ => false,
        };
        Self::from(on)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "on" { Self::On } else { Self::Off })
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_only_on_means_on() {
        assert_eq!(PowerState::from_value(&json!("on")), PowerState::On);
        assert_eq!(PowerState::from_value(&json!(true)), PowerState::On);
        assert_eq!(PowerState::from_value(&json!("off")), PowerState::Off);
        assert_eq!(PowerState::from_value(&json!("ON")), PowerState::Off);
        assert_eq!(PowerState::from_value(&json!(1)), PowerState::Off);
        assert_eq!(PowerState::from_value(&Value::Null), PowerState::Off);
    }

    #[test]
    fn display_and_bool() {
        assert_eq!(PowerState::from(true).to_string(), "on");
        assert_eq!(PowerState::from(false).to_string(), "off");
    }
}
