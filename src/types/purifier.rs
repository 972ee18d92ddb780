// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air purifier characteristic values and the device class switch.

use super::PowerState;

/// Value of the `CurrentAirPurifierState` characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrentPurifierState {
    /// The purifier is off.
    Inactive,
    /// The purifier is on but not moving air.
    Idle,
    /// The purifier is running.
    PurifyingAir,
}

impl CurrentPurifierState {
    /// Returns the numeric value reported to the host.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Inactive => 0,
            Self::Idle => 1,
            Self::PurifyingAir => 2,
        }
    }
}

impl From<PowerState> for CurrentPurifierState {
    fn from(power: PowerState) -> Self {
        match power {
            PowerState::On => Self::PurifyingAir,
            PowerState::Off => Self::Inactive,
        }
    }
}

/// Value of the `TargetAirPurifierState` characteristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TargetPurifierState {
    /// Speed is controlled by the user.
    Manual,
    /// Speed is controlled by the device.
    #[default]
    Auto,
}

impl TargetPurifierState {
    /// Returns the numeric value reported to the host.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Manual => 0,
            Self::Auto => 1,
        }
    }
}

/// Which kind of accessory the device is exposed as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceClass {
    /// Air purifier service: active, current/target purifier state, speed.
    #[default]
    AirPurifier,
    /// Plain fan service: active and speed only.
    Fan,
}

impl DeviceClass {
    /// Returns `true` if the purifier state characteristics are exposed.
    #[must_use]
    pub const fn has_purifier_state(&self) -> bool {
        matches!(self, Self::AirPurifier)
    }
}
