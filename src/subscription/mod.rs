// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for cached state changes.
//!
//! The cloud never pushes updates, so changes only happen when a handler
//! writes tentatively or reconciles a response. Listeners registered here
//! see each of those changes, which lets a host push characteristic updates
//! instead of waiting for the next poll.
//!
//! ```no_run
//! use airproce_lib::{Accessory, AccessoryConfig};
//!
//! # fn example(config: AccessoryConfig) -> airproce_lib::Result<()> {
//! let accessory = Accessory::http(config)?;
//! let sub_id = accessory.on_speed_changed(|percent| {
//!     println!("speed is now {percent}");
//! });
//!
//! accessory.unsubscribe(sub_id);
//! # Ok(())
//! # }
//! ```

mod callback;

pub use callback::{CallbackRegistry, SubscriptionId};
