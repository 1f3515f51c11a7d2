// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test program: list Govee devices and their dynamic scenes, optionally
//! switching each one on or off.
//!
//! The API key comes from `GOVEE_API_KEY`.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example govee_devices -- [on|off]
//! ```

use std::env;

use lightbridge_lib::protocol::{GoveeClient, GoveeCommand, GoveeConfig};
use lightbridge_lib::types::PowerState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let power: Option<PowerState> = env::args().nth(1).map(|arg| arg.parse()).transpose()?;

    let client = GoveeClient::new(GoveeConfig::from_env())?;
    let devices = client.list_devices().await?;

    println!("Found {} device(s)", devices.len());

    for device in devices {
        println!(
            "{} [{} / {}] controllable={} commands={:?}",
            device.device_name, device.model, device.device, device.controllable, device.support_cmds
        );

        let scenes = client.dynamic_scenes(&device.device, &device.model).await;
        for scene in &scenes {
            println!("  scene: {}", scene["name"]);
        }

        if let Some(state) = power
            && device.controllable
            && device.supports("turn")
        {
            let result = client
                .control(&device.device, &device.model, &GoveeCommand::turn(state))
                .await;
            println!("  turn {state}: {}", result.message);
        }
    }

    Ok(())
}
