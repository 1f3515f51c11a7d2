// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness and white temperature levels.
//!
//! The dashboard speaks percentages (0-100); Tuya lighting data points use a
//! 0-1000 scale. Both types here are built from a percentage and always hold
//! a value the vendor accepts.

use std::fmt;

/// Brightness on the vendor scale (10-1000).
///
/// The vendor never accepts 0 for brightness, so the floor is 10.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::types::Brightness;
///
/// assert_eq!(Brightness::from_percent(0.0).value(), 10);
/// assert_eq!(Brightness::from_percent(50.0).value(), 500);
/// assert_eq!(Brightness::from_percent(100.0).value(), 1000);
/// assert_eq!(Brightness::from_percent(250.0).value(), 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u16);

impl Brightness {
    /// Lowest brightness the vendor accepts.
    pub const MIN: Self = Self(10);

    /// Full brightness.
    pub const MAX: Self = Self(1000);

    /// Scales a percentage ×10 and clamps it to `[10, 1000]`.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        Self(scale_percent(percent, Self::MIN.0, Self::MAX.0))
    }

    /// Returns the vendor-scale value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// White color temperature on the vendor scale (0-1000).
///
/// 0 is the warmest white the light supports, 1000 the coolest.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::types::ColorTemperature;
///
/// assert_eq!(ColorTemperature::from_percent(0.0).value(), 0);
/// assert_eq!(ColorTemperature::from_percent(100.0).value(), 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorTemperature(u16);

impl ColorTemperature {
    /// Warmest white.
    pub const WARMEST: Self = Self(0);

    /// Coolest white.
    pub const COOLEST: Self = Self(1000);

    /// Scales a percentage ×10 and clamps it to `[0, 1000]`.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        Self(scale_percent(percent, Self::WARMEST.0, Self::COOLEST.0))
    }

    /// Returns the vendor-scale value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ColorTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_percent(percent: f64, min: u16, max: u16) -> u16 {
    if percent.is_nan() {
        return min;
    }
    // Clamped into [min, max] before the cast
    (percent * 10.0)
        .round()
        .clamp(f64::from(min), f64::from(max)) as u16
}
