// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test program: send one unified command to a Tuya light.
//!
//! Credentials come from `TUYA_CLIENT_ID` and `TUYA_CLIENT_SECRET`
//! (and optionally `TUYA_BASE_URL`).
//!
//! # Usage
//!
//! ```bash
//! cargo run --example tuya_control -- <device_id> <command> <json_value>
//! ```
//!
//! # Example
//!
//! ```bash
//! cargo run --example tuya_control -- bf1234567890abcdef color '{"r":255,"g":80,"b":0}'
//! cargo run --example tuya_control -- bf1234567890abcdef scene 6
//! cargo run --example tuya_control -- list
//! ```

use std::env;

use lightbridge_lib::{TuyaClient, TuyaConfig, UnifiedCommand};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let client = TuyaClient::new(TuyaConfig::from_env())?;

    if args.len() == 2 && args[1] == "list" {
        let devices = client.list_devices().await;
        println!("Found {} device(s)", devices.len());
        for device in devices {
            println!(
                "  {} {} (online: {})",
                device["id"], device["name"], device["online"]
            );
        }
        return Ok(());
    }

    if args.len() != 4 {
        eprintln!("Usage: {} <device_id> <command> <json_value>", args[0]);
        eprintln!("       {} list", args[0]);
        eprintln!();
        eprintln!("Commands: turn, brightness, color, colorTemp, scene, countdown");
        std::process::exit(1);
    }

    let device_id = &args[1];
    let value: serde_json::Value =
        serde_json::from_str(&args[3]).unwrap_or_else(|_| serde_json::Value::String(args[3].clone()));
    let command = UnifiedCommand::parse(&args[2], &value)?;

    let operations = client.translator().translate(&command);
    println!("Sending {} operation(s) to {device_id}:", operations.len());
    for op in &operations {
        println!("  {op}");
    }

    let result = client.control_device(device_id, &operations).await;
    if result.success {
        println!("OK: {}", result.message);
    } else {
        println!("FAILED: {}", result.message);
    }

    match client.device_status(device_id).await {
        Ok(status) => {
            println!("Current status:");
            for dp in status {
                println!("  {dp}");
            }
        }
        Err(e) => println!("Status unavailable: {e}"),
    }

    Ok(())
}
