// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data-point code names.

/// Names of the Tuya data points that commands are translated into.
///
/// Lighting products expose the same functions under two naming families.
/// [`DataPointCodes::default`] uses the plain names; [`DataPointCodes::v2`]
/// uses the `_v2` names found on newer firmware.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::command::DataPointCodes;
///
/// assert_eq!(DataPointCodes::default().colour, "colour_data");
/// assert_eq!(DataPointCodes::v2().colour, "colour_data_v2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPointCodes {
    /// Boolean on/off switch.
    pub switch: String,
    /// Work mode (`"colour"`, `"white"`, `"scene"`).
    pub mode: String,
    /// Brightness (10-1000).
    pub brightness: String,
    /// White temperature (0-1000).
    pub temperature: String,
    /// HSV colour object.
    pub colour: String,
    /// Scene descriptor object.
    pub scene: String,
    /// Countdown in seconds.
    pub countdown: String,
}

impl DataPointCodes {
    /// Work mode value for colour output.
    pub const MODE_COLOUR: &'static str = "colour";

    /// Work mode value for white output.
    pub const MODE_WHITE: &'static str = "white";

    /// Returns the `_v2` naming family.
    #[must_use]
    pub fn v2() -> Self {
        Self {
            switch: "switch_led".to_string(),
            mode: "work_mode".to_string(),
            brightness: "bright_value_v2".to_string(),
            temperature: "temp_value_v2".to_string(),
            colour: "colour_data_v2".to_string(),
            scene: "scene_data_v2".to_string(),
            countdown: "countdown_1".to_string(),
        }
    }
}

impl Default for DataPointCodes {
    fn default() -> Self {
        Self {
            switch: "switch_led".to_string(),
            mode: "work_mode".to_string(),
            brightness: "bright_value".to_string(),
            temperature: "temp_value".to_string(),
            colour: "colour_data".to_string(),
            scene: "scene_data".to_string(),
            countdown: "countdown".to_string(),
        }
    }
}
