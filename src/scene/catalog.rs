// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene slot table.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

use super::{SceneDescriptor, SceneUnit};

use super::TransitionMode::{Gradient, Jump, Static};

struct BuiltinScene {
    slot: i64,
    name: &'static str,
    units: &'static [SceneUnit],
}

const BUILTIN_SCENES: [BuiltinScene; 8] = [
    BuiltinScene {
        slot: 1,
        name: "Sunset Glow",
        units: &[
            SceneUnit::colour(Gradient, 70, 30),
            SceneUnit::colour(Gradient, 70, 60),
        ],
    },
    BuiltinScene {
        slot: 2,
        name: "Ocean Breeze",
        units: &[
            SceneUnit::colour(Gradient, 80, 180),
            SceneUnit::colour(Gradient, 80, 220),
        ],
    },
    BuiltinScene {
        slot: 3,
        name: "Forest Walk",
        units: &[
            SceneUnit::colour(Gradient, 90, 90).with_sv(800, 900),
            SceneUnit::colour(Gradient, 90, 140).with_sv(900, 900),
        ],
    },
    BuiltinScene {
        slot: 4,
        name: "Party",
        units: &[
            SceneUnit::colour(Jump, 20, 0),
            SceneUnit::colour(Jump, 20, 280),
        ],
    },
    BuiltinScene {
        slot: 5,
        name: "Aurora",
        units: &[
            SceneUnit::colour(Gradient, 100, 120),
            SceneUnit::colour(Gradient, 100, 270),
        ],
    },
    BuiltinScene {
        slot: 6,
        name: "Soft Pink",
        units: &[SceneUnit::colour(Static, 0, 330).with_sv(400, 1000)],
    },
    BuiltinScene {
        slot: 7,
        name: "Campfire",
        units: &[
            SceneUnit::colour(Jump, 30, 10),
            SceneUnit::colour(Jump, 30, 35).with_sv(1000, 800),
        ],
    },
    BuiltinScene {
        slot: 8,
        name: "Lavender Dream",
        units: &[
            SceneUnit::colour(Gradient, 80, 260).with_sv(600, 1000),
            SceneUnit::colour(Gradient, 80, 300).with_sv(600, 1000),
        ],
    },
];

/// Unit used for slots with no definition.
const FALLBACK_UNIT: SceneUnit = SceneUnit::white(Static, 1000, 500);

#[derive(Debug, Clone)]
struct CatalogEntry {
    name: String,
    units: Vec<SceneUnit>,
}

/// Slot number and display name of a catalog scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSummary {
    /// Scene slot.
    pub slot: i64,
    /// Display name.
    pub name: String,
}

#[derive(Deserialize)]
struct SceneDefinition {
    slot: i64,
    #[serde(default)]
    name: Option<String>,
    units: Vec<SceneUnit>,
}

/// Maps scene slots to effect descriptors.
///
/// Slots 1-8 hold the built-in effects. Any other slot resolves to a single
/// static near-white unit tagged with the requested slot, so lookups never
/// fail. Additional scenes can be loaded from JSON or registered at runtime.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::scene::SceneCatalog;
///
/// let catalog = SceneCatalog::builtin();
///
/// let pink = catalog.lookup(6);
/// assert_eq!(pink.scene_number, 6);
/// assert_eq!(pink.units.len(), 1);
///
/// let unknown = catalog.lookup(99);
/// assert_eq!(unknown.scene_number, 99);
/// ```
#[derive(Debug)]
pub struct SceneCatalog {
    entries: RwLock<BTreeMap<i64, CatalogEntry>>,
}

impl SceneCatalog {
    /// Creates a catalog holding the eight built-in scenes.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = BUILTIN_SCENES
            .iter()
            .map(|scene| {
                (
                    scene.slot,
                    CatalogEntry {
                        name: scene.name.to_string(),
                        units: scene.units.to_vec(),
                    },
                )
            })
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Creates a catalog from the built-ins plus definitions in `json`.
    ///
    /// The document is an array of `{"slot", "name"?, "units": [...]}`
    /// objects whose units use the vendor field names. A definition for an
    /// existing slot replaces it.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the JSON is invalid or a definition has no
    /// units.
    ///
    /// # Examples
    ///
    /// ```
    /// use lightbridge_lib::scene::SceneCatalog;
    ///
    /// let catalog = SceneCatalog::from_json(r#"[{
    ///     "slot": 9,
    ///     "name": "Mint",
    ///     "units": [{"unit_change_mode": "static", "unit_switch_duration": 0,
    ///                "unit_gradient_duration": 0, "h": 150, "s": 500, "v": 1000,
    ///                "bright": 0, "temperature": 0}]
    /// }]"#).unwrap();
    ///
    /// assert_eq!(catalog.lookup(9).units[0].h, 150);
    /// assert_eq!(catalog.len(), 9);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let definitions: Vec<SceneDefinition> = serde_json::from_str(json)?;
        let catalog = Self::builtin();
        for definition in definitions {
            if definition.units.is_empty() {
                return Err(ParseError::UnexpectedFormat(format!(
                    "scene slot {} has no units",
                    definition.slot
                )));
            }
            let name = definition
                .name
                .unwrap_or_else(|| format!("Scene {}", definition.slot));
            catalog.insert(definition.slot, name, definition.units);
        }
        Ok(catalog)
    }

    /// Registers or replaces the scene for `slot`.
    ///
    /// Unit components are clamped into the vendor ranges.
    pub fn insert(&self, slot: i64, name: impl Into<String>, units: Vec<SceneUnit>) {
        let units = units.into_iter().map(SceneUnit::normalized).collect();
        self.entries.write().insert(
            slot,
            CatalogEntry {
                name: name.into(),
                units,
            },
        );
    }

    /// Returns the descriptor for `slot`.
    ///
    /// Unknown slots get a default static white unit tagged with `slot`.
    #[must_use]
    pub fn lookup(&self, slot: i64) -> SceneDescriptor {
        let units = self
            .entries
            .read()
            .get(&slot)
            .map_or_else(|| vec![FALLBACK_UNIT], |entry| entry.units.clone());

        SceneDescriptor {
            scene_number: slot,
            units,
        }
    }

    /// Returns `true` if `slot` has a definition.
    #[must_use]
    pub fn contains(&self, slot: i64) -> bool {
        self.entries.read().contains_key(&slot)
    }

    /// Lists defined scenes in slot order.
    #[must_use]
    pub fn summaries(&self) -> Vec<SceneSummary> {
        self.entries
            .read()
            .iter()
            .map(|(slot, entry)| SceneSummary {
                slot: *slot,
                name: entry.name.clone(),
            })
            .collect()
    }

    /// Returns the number of defined scenes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no scenes are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for SceneCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
