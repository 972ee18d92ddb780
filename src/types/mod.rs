// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for purifier control.
//!
//! Each type ensures values are within their valid ranges at construction
//! time.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off
//! - [`Mode`] - Vendor control codes (on, off, set speed)
//! - [`Segment`] - Number of discrete speed steps (1-100)
//! - [`Rank`] - Discrete speed level reported by the cloud
//! - [`Percent`] - Rotation speed as seen by the host (0-100%)
//! - [`DeviceClass`] - Air purifier or fan presentation

mod power;
mod purifier;
mod speed;

pub use power::{Mode, PowerState};
pub use purifier::{CurrentPurifierState, DeviceClass, TargetPurifierState};
pub use speed::{Percent, Rank, Segment};
