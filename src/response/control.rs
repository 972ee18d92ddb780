// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `controlStatus` response parsing.

use serde::Deserialize;

use crate::error::ParseError;
use crate::types::{PowerState, Rank};

/// Minimal projection of the device state returned by `controlStatus`.
///
/// The cloud answers with `{"control": {"rank": 3, ...}, ...}`. Only the
/// rank is used; every other field is ignored.
///
/// # Examples
///
/// ```
/// use airproce_lib::response::ControlStatusResponse;
///
/// let response = ControlStatusResponse::parse(r#"{"control": {"rank": 3}}"#).unwrap();
/// assert_eq!(response.rank().value(), 3);
/// assert!(response.power_state().is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlStatusResponse {
    rank: Rank,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    control: Option<RawControl>,
}

#[derive(Debug, Deserialize)]
struct RawControl {
    #[serde(default)]
    rank: Option<i64>,
}

impl ControlStatusResponse {
    /// Creates a response carrying the given rank.
    #[must_use]
    pub const fn new(rank: Rank) -> Self {
        Self { rank }
    }

    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the body is not JSON, if `control.rank` is
    /// absent, or if the rank is negative. A rank above 255 saturates; it is
    /// clamped to the device's segment count later anyway.
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        let raw: RawResponse = serde_json::from_str(body)?;
        let rank = raw
            .control
            .and_then(|control| control.rank)
            .ok_or_else(|| ParseError::MissingField("control.rank".to_string()))?;

        if rank < 0 {
            return Err(ParseError::InvalidValue {
                field: "control.rank".to_string(),
                message: format!("negative rank {rank}"),
            });
        }

        let rank = u8::try_from(rank).unwrap_or(u8::MAX);
        Ok(Self::new(Rank::new(rank)))
    }

    /// Returns the reported rank.
    #[must_use]
    pub const fn rank(&self) -> Rank {
        self.rank
    }

    /// Returns the power state implied by the reported rank.
    #[must_use]
    pub const fn power_state(&self) -> PowerState {
        PowerState::from_rank(self.rank)
    }
}
