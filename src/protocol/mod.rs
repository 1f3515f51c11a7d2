// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vendor cloud clients.
//!
//! - [`TuyaClient`]: signed OpenAPI client with a cached access token
//! - [`GoveeClient`]: API-key client for the Govee developer API
//!   (feature `govee`)
//!
//! Control calls on both return an [`OperationResult`](crate::OperationResult)
//! instead of an error.

mod clock;
mod config;
#[cfg(feature = "govee")]
mod govee;
mod listing;
pub mod signer;
mod token;
mod tuya;

pub use clock::{Clock, SystemClock};
pub use config::{Credentials, DataCenter, TuyaConfig};
#[cfg(feature = "govee")]
pub use govee::{GoveeClient, GoveeCommand, GoveeConfig, GoveeDevice, GoveeProperties};
pub use listing::DeviceListing;
pub use token::AccessToken;
pub use tuya::{TuyaClient, TuyaClientBuilder};
