// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state and control mode codes.

use std::fmt;

use super::Rank;

/// Represents the power state of the purifier.
///
/// # Examples
///
/// ```
/// use airproce_lib::types::PowerState;
///
/// assert_eq!(PowerState::from(true), PowerState::On);
/// assert!(!PowerState::Off.is_on());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum PowerState {
    /// Power is off.
    #[default]
    Off,
    /// Power is on.
    On,
}

impl PowerState {
    /// Returns `true` if the device is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Returns the power state implied by a rank reported by the cloud.
    #[must_use]
    pub const fn from_rank(rank: Rank) -> Self {
        if rank.is_running() { Self::On } else { Self::Off }
    }

    /// Returns the mode code that switches the device to this state.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Self::On => Mode::PowerOn,
            Self::Off => Mode::PowerOff,
        }
    }

    /// Returns the upper-case label used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<PowerState> for bool {
    fn from(state: PowerState) -> Self {
        state.is_on()
    }
}

/// Vendor control code sent as the `mode` request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Switch the device on.
    PowerOn,
    /// Apply the `rank` sent alongside.
    SetSpeed,
    /// Switch the device off.
    PowerOff,
}

impl Mode {
    /// Returns the numeric code expected by the cloud.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::PowerOn => 0,
            Self::SetSpeed => 1,
            Self::PowerOff => 16,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
