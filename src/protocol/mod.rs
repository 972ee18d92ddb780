// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the Airproce cloud.
//!
//! - [`Protocol`]: the single `controlStatus` operation an accessory needs
//! - [`HttpClient`]: signed HTTP implementation (feature `http`)

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig};

use std::future::Future;

use crate::command::RequestParams;
use crate::response::ControlStatusResponse;

/// A transport able to call the `controlStatus` endpoint.
///
/// Implementations sign `params`, send them, and resolve to `None` on any
/// failure (network error, non-2xx status, unusable body). Failures are
/// terminal for the call: no retry happens at this layer, and concurrent
/// calls are allowed.
pub trait Protocol: Send + Sync {
    /// Sends one request and returns the reported device state.
    fn control_status(
        &self,
        params: RequestParams,
    ) -> impl Future<Output = Option<ControlStatusResponse>> + Send;
}
