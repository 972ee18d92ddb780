// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached device state.
//!
//! The Airproce cloud has no push channel, so [`DeviceState`] is the only
//! place the accessory knows the purifier's power and speed from. It is
//! overwritten by every cloud answer and reset to "off" when a call fails.
//! [`StateChange`] describes individual updates so they can be forwarded to
//! listeners.

mod device_state;
mod state_change;

pub use device_state::DeviceState;
pub use state_change::StateChange;
