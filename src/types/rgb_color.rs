// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type with hex parsing and HSV conversion.
//!
//! Colors arrive from the dashboard as `{r, g, b}` objects (or hex strings)
//! and are converted to the vendor's HSV ranges before being sent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

use super::HsvColor;

/// RGB color with 8-bit channels (0-255).
///
/// Deserializing accepts any JSON numbers and clamps each channel to
/// `[0, 255]`, rounding fractional values.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::types::RgbColor;
///
/// let color = RgbColor::new(255, 128, 0);
/// assert_eq!(color.to_hex(), "FF8000");
///
/// let parsed: RgbColor = serde_json::from_str(r#"{"r": 300, "g": -4, "b": 12.6}"#).unwrap();
/// assert_eq!(parsed, RgbColor::new(255, 0, 13));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRgb")]
pub struct RgbColor {
    r: u8,
    g: u8,
    b: u8,
}

#[derive(Deserialize)]
struct RawRgb {
    #[serde(default)]
    r: f64,
    #[serde(default)]
    g: f64,
    #[serde(default)]
    b: f64,
}

impl From<RawRgb> for RgbColor {
    fn from(raw: RawRgb) -> Self {
        Self::new(clamp_channel(raw.r), clamp_channel(raw.g), clamp_channel(raw.b))
    }
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses an RGB color from a hex string.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidHexColor` if the string is not a hex color.
    ///
    /// # Examples
    ///
    /// ```
    /// use lightbridge_lib::types::RgbColor;
    ///
    /// assert_eq!(RgbColor::from_hex("#FF5733").unwrap(), RgbColor::new(255, 87, 51));
    /// assert_eq!(RgbColor::from_hex("0f0").unwrap(), RgbColor::new(0, 255, 0));
    /// assert!(RgbColor::from_hex("#FF00").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ValueError> {
        let digits = hex.trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(ValueError::InvalidHexColor(hex.to_string()));
        }

        match digits.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (slot, c) in channels.iter_mut().zip(digits.chars()) {
                    // 0-F expands to 0-255
                    *slot = parse_hex_digit(c, hex)? * 17;
                }
                Ok(Self::new(channels[0], channels[1], channels[2]))
            }
            6 => Ok(Self::new(
                parse_hex_pair(&digits[0..2], hex)?,
                parse_hex_pair(&digits[2..4], hex)?,
                parse_hex_pair(&digits[4..6], hex)?,
            )),
            _ => Err(ValueError::InvalidHexColor(hex.to_string())),
        }
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.r
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.g
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.b
    }

    /// Returns the color as an uppercase hex string without the hash prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Converts this color to the vendor HSV ranges.
    ///
    /// Hue is in degrees `[0, 360)`, saturation and value in `[0, 1000]`.
    /// Black and all greys have hue 0; black also has saturation 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use lightbridge_lib::types::{HsvColor, RgbColor};
    ///
    /// assert_eq!(RgbColor::new(0, 0, 255).to_hsv(), HsvColor::new(240, 1000, 1000));
    /// assert_eq!(RgbColor::new(255, 255, 255).to_hsv(), HsvColor::new(0, 0, 1000));
    /// ```
    #[must_use]
    pub fn to_hsv(&self) -> HsvColor {
        let (h, s, v) = rgb_to_hsv(self.r, self.g, self.b);
        HsvColor::new(h, s, v)
    }

    /// Creates a white color.
    #[must_use]
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Creates a black color.
    #[must_use]
    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    // Clamped to [0, 255] before the cast
    value.round().clamp(0.0, 255.0) as u8
}

fn parse_hex_digit(c: char, input: &str) -> Result<u8, ValueError> {
    c.to_digit(16)
        .and_then(|d| u8::try_from(d).ok())
        .ok_or_else(|| ValueError::InvalidHexColor(input.to_string()))
}

fn parse_hex_pair(pair: &str, input: &str) -> Result<u8, ValueError> {
    u8::from_str_radix(pair, 16).map_err(|_| ValueError::InvalidHexColor(input.to_string()))
}

/// Converts RGB values to HSV.
///
/// Returns (hue: 0-359, saturation: 0-1000, value: 0-1000).
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp,
    clippy::many_single_char_names
)]
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u16, u16, u16) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = (max * 1000.0).round() as u16;

    let saturation = if max <= 0.0 {
        0
    } else {
        ((delta / max) * 1000.0).round() as u16
    };

    let hue = if delta <= 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    // Rounding can land exactly on 360
    let hue = (hue.round() as u16) % 360;

    (hue, saturation, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_colors() {
        assert_eq!(RgbColor::new(255, 0, 0).to_hsv(), HsvColor::new(0, 1000, 1000));
        assert_eq!(RgbColor::new(0, 255, 0).to_hsv(), HsvColor::new(120, 1000, 1000));
        assert_eq!(RgbColor::new(0, 0, 255).to_hsv(), HsvColor::new(240, 1000, 1000));
    }

    #[test]
    fn achromatic_colors() {
        assert_eq!(RgbColor::white().to_hsv(), HsvColor::new(0, 0, 1000));
        assert_eq!(RgbColor::black().to_hsv(), HsvColor::new(0, 0, 0));

        let grey = RgbColor::new(128, 128, 128).to_hsv();
        assert_eq!(grey.hue(), 0);
        assert_eq!(grey.saturation(), 0);
        assert_eq!(grey.value(), 502);
    }

    #[test]
    fn secondary_colors() {
        assert_eq!(RgbColor::new(255, 255, 0).to_hsv().hue(), 60);
        assert_eq!(RgbColor::new(0, 255, 255).to_hsv().hue(), 180);
        assert_eq!(RgbColor::new(255, 0, 255).to_hsv().hue(), 300);
    }

    #[test]
    fn hue_near_red_wraps_below_360() {
        // 359.76 degrees rounds to 360 and must wrap
        let hsv = RgbColor::new(255, 0, 1).to_hsv();
        assert!(hsv.hue() < 360);
    }

    #[test]
    fn ranges_hold_over_a_sampled_cube() {
        for r in (0..=255u8).step_by(15) {
            for g in (0..=255u8).step_by(15) {
                for b in (0..=255u8).step_by(15) {
                    let hsv = RgbColor::new(r, g, b).to_hsv();
                    assert!(hsv.hue() < 360, "{r},{g},{b} -> {hsv:?}");
                    assert!(hsv.saturation() <= 1000);
                    assert!(hsv.value() <= 1000);
                }
            }
        }
    }

    #[test]
    fn deserialize_clamps_channels() {
        let color: RgbColor = serde_json::from_str(r#"{"r": 512, "g": -1, "b": 0}"#).unwrap();
        assert_eq!(color, RgbColor::new(255, 0, 0));

        let missing: RgbColor = serde_json::from_str(r#"{"b": 255}"#).unwrap();
        assert_eq!(missing, RgbColor::new(0, 0, 255));
    }

    #[test]
    fn serialize_uses_short_field_names() {
        let json = serde_json::to_value(RgbColor::new(1, 2, 3)).unwrap();
        assert_eq!(json, serde_json::json!({"r": 1, "g": 2, "b": 3}));
    }

    #[test]
    fn hex_round_trip() {
        let color = RgbColor::from_hex("#1E90FF").unwrap();
        assert_eq!(color.to_string(), "#1E90FF");
        assert_eq!("#1e90ff".parse::<RgbColor>().unwrap(), color);
    }

    #[test]
    fn hex_invalid() {
        assert!(RgbColor::from_hex("#GG0000").is_err());
        assert!(RgbColor::from_hex("").is_err());
        assert!(RgbColor::from_hex("#ééé").is_err());
    }
}
