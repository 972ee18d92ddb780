// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Airproce Lib - control Airproce air purifiers through the Airproce cloud.
//!
//! This library exposes a purifier as a home-automation accessory. Every
//! operation goes through the signed `controlStatus` endpoint of the
//! Airproce cloud; the device itself is never contacted directly.
//!
//! # Supported Features
//!
//! - **Power control**: switch the purifier on or off
//! - **Speed control**: percentages mapped onto the device's discrete ranks
//! - **Purifier state**: current and target air purifier characteristics
//! - **Change listeners**: callbacks on power and speed changes
//!
//! # Request Signing
//!
//! Each request carries a `sec` parameter: the first 8 hex characters of
//! the SHA-1 of the pairing hash followed by every other parameter as
//! `key` + `value`, keys sorted. See [`signer`].
//!
//! # Quick Start
//!
//! ```no_run
//! use airproce_lib::{Accessory, AccessoryConfig};
//! use airproce_lib::types::{Percent, PowerState};
//!
//! #[tokio::main]
//! async fn main() -> airproce_lib::Result<()> {
//!     let config = AccessoryConfig::new("Living Room", "pairing-hash", "12345", "AP-0001", 4);
//!     let accessory = Accessory::http(config)?;
//!
//!     accessory.set_power(PowerState::On).await;
//!     accessory.set_speed(Percent::new(50)?).await;
//!
//!     println!("power: {:?}, speed: {}", accessory.power().await, accessory.speed());
//!     Ok(())
//! }
//! ```
//!
//! ## Registering with a Host
//!
//! ```no_run
//! use std::sync::Arc;
//! use airproce_lib::{Accessory, AccessoryConfig};
//! use airproce_lib::host::{Characteristic, HandlerRegistry};
//!
//! #[tokio::main]
//! async fn main() -> airproce_lib::Result<()> {
//!     let config = AccessoryConfig::from_json(
//!         r#"{"name": "Purifier", "hash": "abc", "userId": "1", "deviceId": "d", "segment": 4}"#,
//!     )?;
//!     let accessory = Arc::new(Accessory::http(config)?);
//!
//!     let host = HandlerRegistry::new();
//!     accessory.register(&host);
//!
//!     host.set(Characteristic::RotationSpeed, 75.0).await?;
//!     let active = host.get(Characteristic::Active).await?;
//!     println!("active: {active:?}");
//!     Ok(())
//! }
//! ```

mod accessory;
pub mod command;
mod config;
pub mod error;
pub mod host;
pub mod protocol;
pub mod response;
pub mod signer;
pub mod state;
pub mod subscription;
pub mod types;

pub use accessory::Accessory;
pub use command::{ControlCommand, Identity, RequestParams};
pub use config::AccessoryConfig;
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result, ValueError};
pub use host::{AccessoryHost, AccessoryInformation, Characteristic, CharacteristicValue};
#[cfg(feature = "http")]
pub use protocol::{HttpClient, HttpConfig};
pub use protocol::Protocol;
pub use response::ControlStatusResponse;
pub use state::{DeviceState, StateChange};
pub use subscription::{CallbackRegistry, SubscriptionId};
pub use types::{
    CurrentPurifierState, DeviceClass, Percent, PowerState, Rank, Segment, TargetPurifierState,
};
