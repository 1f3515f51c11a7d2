// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unified command to vendor operation mapping.

use std::sync::Arc;

use serde_json::json;

use crate::command::{DataPointCodes, UnifiedCommand, VendorOperation};
use crate::scene::SceneCatalog;
use crate::types::{Brightness, ColorTemperature};

/// Expands [`UnifiedCommand`]s into ordered [`VendorOperation`]s.
///
/// Translation is a pure mapping: it performs no I/O and never fails.
/// Unsupported commands produce an empty list.
///
/// # Examples
///
/// ```
/// use lightbridge_lib::command::{CommandTranslator, UnifiedCommand};
/// use serde_json::json;
///
/// let translator = CommandTranslator::default();
///
/// let ops = translator.translate(&UnifiedCommand::Brightness(0.0));
/// assert_eq!(ops[0].code, "bright_value");
/// assert_eq!(ops[0].value, json!(10));
///
/// let ops = translator.translate(&UnifiedCommand::Countdown(0));
/// assert_eq!(ops[0].code, "countdown");
/// assert_eq!(ops[0].value, json!(0));
/// ```
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    catalog: Arc<SceneCatalog>,
    codes: DataPointCodes,
}

impl CommandTranslator {
    /// Creates a translator over a scene catalog and code family.
    #[must_use]
    pub fn new(catalog: Arc<SceneCatalog>, codes: DataPointCodes) -> Self {
        Self { catalog, codes }
    }

    /// Returns the scene catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<SceneCatalog> {
        &self.catalog
    }

    /// Returns the data-point codes in use.
    #[must_use]
    pub fn codes(&self) -> &DataPointCodes {
        &self.codes
    }

    /// Translates one command.
    #[must_use]
    pub fn translate(&self, command: &UnifiedCommand) -> Vec<VendorOperation> {
        let codes = &self.codes;

        match command {
            UnifiedCommand::Turn(state) => {
                vec![VendorOperation::new(&codes.switch, state.is_on())]
            }
            UnifiedCommand::Brightness(percent) => {
                let level = Brightness::from_percent(*percent);
                vec![VendorOperation::new(&codes.brightness, level.value())]
            }
            UnifiedCommand::Color(rgb) => {
                let hsv = rgb.to_hsv();
                vec![
                    VendorOperation::new(&codes.mode, DataPointCodes::MODE_COLOUR),
                    VendorOperation::new(&codes.colour, json!(hsv)),
                ]
            }
            UnifiedCommand::ColorTemp(percent) => {
                let temperature = ColorTemperature::from_percent(*percent);
                vec![
                    VendorOperation::new(&codes.mode, DataPointCodes::MODE_WHITE),
                    VendorOperation::new(&codes.temperature, temperature.value()),
                ]
            }
            UnifiedCommand::Scene { id } => {
                let descriptor = self.catalog.lookup(*id);
                vec![VendorOperation::new(&codes.scene, json!(descriptor))]
            }
            UnifiedCommand::Countdown(seconds) => {
                vec![VendorOperation::new(&codes.countdown, *seconds)]
            }
            UnifiedCommand::Unsupported { name } => {
                tracing::warn!(command = %name, "Unsupported command, no operations produced");
                Vec::new()
            }
        }
    }
}

impl Default for CommandTranslator {
    fn default() -> Self {
        Self::new(Arc::new(SceneCatalog::builtin()), DataPointCodes::default())
    }
}
