// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HSV color in the vendor's integer ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HSV color as expected by Tuya colour data points.
///
/// Hue is in degrees (0-359); saturation and value use the 0-1000 scale.
/// Serializes as `{"h": .., "s": .., "v": ..}`.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::types::HsvColor;
///
/// let blue = HsvColor::new(240, 1000, 1000);
/// assert_eq!(
///     serde_json::to_value(blue).unwrap(),
///     serde_json::json!({"h": 240, "s": 1000, "v": 1000})
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HsvColor {
    h: u16,
    s: u16,
    v: u16,
}

impl HsvColor {
    /// Exclusive upper bound for hue.
    pub const HUE_RANGE: u16 = 360;

    /// Maximum saturation and value.
    pub const MAX_LEVEL: u16 = 1000;

    /// Creates a new HSV color, clamping each component into range.
    #[must_use]
    pub const fn new(h: u16, s: u16, v: u16) -> Self {
        Self {
            h: h % Self::HUE_RANGE,
            s: if s > Self::MAX_LEVEL { Self::MAX_LEVEL } else { s },
            v: if v > Self::MAX_LEVEL { Self::MAX_LEVEL } else { v },
        }
    }

    /// Returns the hue in degrees.
    #[must_use]
    pub const fn hue(&self) -> u16 {
        self.h
    }

    /// Returns the saturation (0-1000).
    #[must_use]
    pub const fn saturation(&self) -> u16 {
        self.s
    }

    /// Returns the value (0-1000).
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.v
    }
}

impl fmt::Display for HsvColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.h, self.s, self.v)
    }
}
