// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for light control.
//!
//! Each type holds a value already converted to, and clamped into, the range
//! the vendor accepts.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off for the `turn` command
//! - [`Brightness`] - Brightness on the vendor scale (10-1000)
//! - [`ColorTemperature`] - White temperature on the vendor scale (0-1000)
//! - [`RgbColor`] - RGB color (0-255 per channel) with HSV conversion
//! - [`HsvColor`] - HSV color (hue 0-359, saturation/value 0-1000)

mod hsv_color;
mod level;
mod power;
mod rgb_color;

pub use hsv_color::HsvColor;
pub use level::{Brightness, ColorTemperature};
pub use power::PowerState;
pub use rgb_color::RgbColor;
