// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canned multi-step lighting effects.
//!
//! Tuya lights do not store scenes by reference: every scene command carries
//! the full effect description. This module defines that description
//! ([`SceneDescriptor`]) and the [`SceneCatalog`] that maps small slot
//! numbers to effects.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "scene_num": 1,
//!   "scene_units": [
//!     {"unit_change_mode": "gradient", "unit_switch_duration": 70,
//!      "unit_gradient_duration": 70, "h": 30, "s": 1000, "v": 1000,
//!      "bright": 0, "temperature": 0}
//!   ]
//! }
//! ```

mod catalog;

pub use catalog::{SceneCatalog, SceneSummary};

use serde::{Deserialize, Serialize};

/// How a light moves from one scene unit to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    /// Hold the unit without moving on.
    Static,
    /// Fade smoothly into the next unit.
    Gradient,
    /// Switch abruptly to the next unit.
    Jump,
}

impl TransitionMode {
    /// Returns the vendor string for this mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Gradient => "gradient",
            Self::Jump => "jump",
        }
    }
}

/// One step of a scene.
///
/// Colour steps set `h`/`s`/`v` and leave `bright`/`temperature` at 0;
/// white steps do the opposite. Durations are in the vendor's own units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneUnit {
    /// Transition into the next unit.
    #[serde(rename = "unit_change_mode")]
    pub mode: TransitionMode,
    /// Time spent on this unit.
    #[serde(rename = "unit_switch_duration")]
    pub switch_duration: u16,
    /// Time spent fading (gradient mode).
    #[serde(rename = "unit_gradient_duration")]
    pub gradient_duration: u16,
    /// Hue in degrees (0-359).
    pub h: u16,
    /// Saturation (0-1000).
    pub s: u16,
    /// Value (0-1000).
    pub v: u16,
    /// White brightness (0-1000).
    pub bright: u16,
    /// White temperature (0-1000).
    pub temperature: u16,
}

impl SceneUnit {
    /// Creates a full-saturation colour unit.
    #[must_use]
    pub const fn colour(mode: TransitionMode, duration: u16, h: u16) -> Self {
        Self {
            mode,
            switch_duration: duration,
            gradient_duration: duration,
            h,
            s: 1000,
            v: 1000,
            bright: 0,
            temperature: 0,
        }
    }

    /// Creates a white unit.
    #[must_use]
    pub const fn white(mode: TransitionMode, bright: u16, temperature: u16) -> Self {
        Self {
            mode,
            switch_duration: 0,
            gradient_duration: 0,
            h: 0,
            s: 0,
            v: 0,
            bright,
            temperature,
        }
    }

    /// Overrides saturation and value.
    #[must_use]
    pub const fn with_sv(mut self, s: u16, v: u16) -> Self {
        self.s = s;
        self.v = v;
        self
    }

    /// Returns a copy with every component clamped into the vendor ranges.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.h %= 360;
        self.s = self.s.min(1000);
        self.v = self.v.min(1000);
        self.bright = self.bright.min(1000);
        self.temperature = self.temperature.min(1000);
        self
    }
}

/// A complete scene as sent in a `scene_data` operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneDescriptor {
    /// Slot number the scene is tagged with.
    #[serde(rename = "scene_num")]
    pub scene_number: i64,
    /// Ordered effect steps.
    #[serde(rename = "scene_units")]
    pub units: Vec<SceneUnit>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn descriptor_serializes_with_vendor_names() {
        let descriptor = SceneDescriptor {
            scene_number: 6,
            units: vec![SceneUnit::colour(TransitionMode::Static, 0, 330).with_sv(400, 1000)],
        };
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({
                "scene_num": 6,
                "scene_units": [{
                    "unit_change_mode": "static",
                    "unit_switch_duration": 0,
                    "unit_gradient_duration": 0,
                    "h": 330,
                    "s": 400,
                    "v": 1000,
                    "bright": 0,
                    "temperature": 0
                }]
            })
        );
    }

    #[test]
    fn normalized_clamps() {
        let unit = SceneUnit {
            mode: TransitionMode::Jump,
            switch_duration: 10,
            gradient_duration: 10,
            h: 400,
            s: 2000,
            v: 1001,
            bright: 5000,
            temperature: 1500,
        }
        .normalized();
        assert_eq!(unit.h, 40);
        assert_eq!(unit.s, 1000);
        assert_eq!(unit.v, 1000);
        assert_eq!(unit.bright, 1000);
        assert_eq!(unit.temperature, 1000);
    }

    #[test]
    fn transition_mode_strings() {
        assert_eq!(TransitionMode::Gradient.as_str(), "gradient");
        let mode: TransitionMode = serde_json::from_value(json!("jump")).unwrap();
        assert_eq!(mode, TransitionMode::Jump);
    }
}
