// SPDX-License-Identifier: MPL-2.0

//! Test program: read a purifier's state, set a speed, then switch it off.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example purifier_control -- <config.json> <percent>
//! ```
//!
//! # Example
//!
//! ```bash
//! cargo run --example purifier_control -- bedroom.json 75
//! ```
//!
//! The configuration file holds the accessory block from the host:
//!
//! ```json
//! { "name": "Bedroom", "hash": "...", "userId": "...", "deviceId": "...", "segment": 4 }
//! ```

use std::env;
use std::sync::Arc;
use std::time::Duration;

use airproce_lib::host::{Characteristic, HandlerRegistry};
use airproce_lib::{Accessory, AccessoryConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <config.json> <percent>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example purifier_control -- bedroom.json 75");
        std::process::exit(1);
    }

    let config = AccessoryConfig::from_json(&std::fs::read_to_string(&args[1])?)?;
    let percent: f64 = args[2].parse()?;

    let accessory = Arc::new(Accessory::http(config)?);
    accessory.on_power_changed(|state| println!("  -> power is now {}", state.as_str()));
    accessory.on_speed_changed(|percent| println!("  -> speed is now {percent}"));

    let host = HandlerRegistry::new();
    accessory.register(&host);
    host.identify();

    println!("Querying current state...");
    let active = host.get(Characteristic::Active).await?;
    let speed = host.get(Characteristic::RotationSpeed).await?;
    println!("Active: {active:?}, speed: {speed:?}");
    if host.handles_get(Characteristic::CurrentAirPurifierState) {
        let purifier = host.get(Characteristic::CurrentAirPurifierState).await?;
        println!("Purifier state: {purifier:?}");
    }

    println!("Setting speed to {percent}%...");
    host.set(Characteristic::RotationSpeed, percent).await?;
    println!("State: {:?}", accessory.state());

    println!("Running for 8 seconds...");
    tokio::time::sleep(Duration::from_secs(8)).await;

    println!("Switching off...");
    host.set(Characteristic::Active, false).await?;
    println!("State: {:?}", accessory.state());

    Ok(())
}
