// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cloud command definitions.
//!
//! Every request to the Airproce cloud goes to the same `controlStatus`
//! endpoint; what differs is the parameter set. [`ControlCommand`] names the
//! three things the accessory asks for and turns them into
//! [`RequestParams`] for a given device [`Identity`].
//!
//! | Command | Parameters beyond identity |
//! |---------|----------------------------|
//! | [`ControlCommand::Status`] | none |
//! | [`ControlCommand::Power`] | `mode` (0 on, 16 off), `function`, `time`, `lang` |
//! | [`ControlCommand::Speed`] | `mode` (1), `rank`, `function`, `time`, `lang` |
//!
//! # Examples
//!
//! ```
//! use airproce_lib::command::{ControlCommand, Identity, ParamValue};
//! use airproce_lib::types::Rank;
//!
//! let identity = Identity::new("u1", "d1");
//! let params = ControlCommand::Speed(Rank::new(3)).to_params(&identity, 1_700_000_000_000);
//!
//! assert_eq!(params.get("mode"), Some(&ParamValue::Int(1)));
//! assert_eq!(params.get("rank"), Some(&ParamValue::Int(3)));
//! ```

mod params;

pub use params::{ParamValue, RequestParams, SIGNATURE_KEY};

use std::fmt;

use crate::types::{Mode, PowerState, Rank};

/// Opaque device-function code sent with every control request.
pub const FUNCTION_CODE: &str = "021300000000";

/// Locale tag sent with every control request.
pub const LANG: &str = "zh-CN";

/// The account and device a request is made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: String,
    device_id: String,
}

impl Identity {
    /// Creates an identity.
    #[must_use]
    pub fn new(user_id: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            device_id: device_id.into(),
        }
    }

    /// Returns the account id.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the device id.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Returns the parameters every request carries.
    #[must_use]
    pub fn params(&self) -> RequestParams {
        RequestParams::new()
            .with("userId", self.user_id.as_str())
            .with("deviceId", self.device_id.as_str())
    }
}

/// A request to the `controlStatus` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Query the current rank without changing anything.
    Status,
    /// Switch the device on or off.
    Power(PowerState),
    /// Run the device at the given rank.
    Speed(Rank),
}

impl ControlCommand {
    /// Returns the mode code, if this command carries one.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        match self {
            Self::Status => None,
            Self::Power(state) => Some(state.mode()),
            Self::Speed(_) => Some(Mode::SetSpeed),
        }
    }

    /// Builds the unsigned request parameters.
    ///
    /// `time_ms` is the request timestamp in milliseconds since the epoch.
    /// It only feeds the signature and is ignored by status queries.
    #[must_use]
    pub fn to_params(&self, identity: &Identity, time_ms: i64) -> RequestParams {
        let mut params = identity.params();
        let Some(mode) = self.mode() else {
            return params;
        };

        params.insert("mode", mode.code());
        params.insert("function", FUNCTION_CODE);
        params.insert("time", time_ms);
        params.insert("lang", LANG);
        if let Self::Speed(rank) = self {
            params.insert("rank", rank.value());
        }
        params
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status => f.write_str("status"),
            Self::Power(state) => write!(f, "power {state}"),
            Self::Speed(rank) => write!(f, "speed rank {rank}"),
        }
    }
}
