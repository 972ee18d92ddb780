// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! Changes come from two places: tentative local writes made by SET handlers
//! before the cloud answers, and reconciliation of a cloud response (or of a
//! failed call) into the cached state.
//!
//! # Examples
//!
//! ```
//! use airproce_lib::state::{DeviceState, StateChange};
//! use airproce_lib::types::{PowerState, Segment};
//!
//! let mut state = DeviceState::new(Segment::new(4).unwrap());
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::Power(PowerState::On)));
//! assert!(!state.apply(&StateChange::Power(PowerState::On)));
//! ```

use crate::types::{PowerState, Rank};

/// A change to the cached purifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// The power state changed.
    Power(PowerState),
    /// The speed rank changed.
    Rank(Rank),
}

impl StateChange {
    /// Returns `true` if this is a power state change.
    #[must_use]
    pub fn is_power(&self) -> bool {
        matches!(self, Self::Power(_))
    }

    /// Returns `true` if this is a speed change.
    #[must_use]
    pub fn is_speed(&self) -> bool {
        matches!(self, Self::Rank(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(StateChange::Power(PowerState::Off).is_power());
        assert!(!StateChange::Power(PowerState::Off).is_speed());
        assert!(StateChange::Rank(Rank::new(2)).is_speed());
    }

    #[test]
    fn serializes_for_listeners() {
        let json = serde_json::to_string(&StateChange::Rank(Rank::new(3))).unwrap();
        assert_eq!(json, r#"{"Rank":3}"#);
    }
}
