// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the Airproce cloud.

use std::time::Duration;

use reqwest::Client;

use crate::command::{RequestParams, SIGNATURE_KEY};
use crate::error::ProtocolError;
use crate::protocol::Protocol;
use crate::response::ControlStatusResponse;
use crate::signer;

// ============================================================================
// HttpConfig
// ============================================================================

/// Configuration for the cloud HTTP client.
///
/// Every call is an independent signed GET; there is no session.
///
/// # Examples
///
/// ```
/// use airproce_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("pairing-hash")
///     .with_endpoint("http://127.0.0.1:8080/appAPI/controlStatus")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.timeout(), Duration::from_secs(5));
/// ```
#[derive(Clone)]
pub struct HttpConfig {
    endpoint: String,
    secret: String,
    timeout: Duration,
}

impl HttpConfig {
    /// The vendor `controlStatus` endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://wx.airproce.com/appAPI/controlStatus";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration signing with the given shared secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            secret: secret.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not an `http(s)` URL or the HTTP
    /// client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ProtocolError::InvalidEndpoint(self.endpoint));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            endpoint: self.endpoint,
            secret: self.secret,
            client,
        })
    }
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("endpoint", &self.endpoint)
            .field("secret", &"REDACTED")
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// Signed HTTP client for the `controlStatus` endpoint.
///
/// # Examples
///
/// ```no_run
/// use airproce_lib::command::{ControlCommand, Identity};
/// use airproce_lib::protocol::{HttpConfig, Protocol};
///
/// # async fn example() -> airproce_lib::Result<()> {
/// let client = HttpConfig::new("pairing-hash").into_client()?;
/// let params = ControlCommand::Status.to_params(&Identity::new("u1", "d1"), 0);
/// if let Some(status) = client.control_status(params).await {
///     println!("rank {}", status.rank());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    endpoint: String,
    secret: String,
    client: Client,
}

impl HttpClient {
    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Builds the signed request URL: parameters in key order, `sec` last.
    #[must_use]
    pub fn build_url(&self, params: &RequestParams) -> String {
        let signature = signer::sign(params, &self.secret);

        let mut query: Vec<String> = params
            .iter()
            .filter(|(key, _)| *key != SIGNATURE_KEY)
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&value.to_string())
                )
            })
            .collect();
        query.push(format!("{SIGNATURE_KEY}={signature}"));

        format!("{}?{}", self.endpoint, query.join("&"))
    }

    /// Sends one signed request and parses the response.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on network failure, non-2xx status, or a body
    /// without `control.rank`.
    pub async fn try_control_status(
        &self,
        params: &RequestParams,
    ) -> Result<ControlStatusResponse, ProtocolError> {
        let url = self.build_url(params);

        tracing::debug!(url = %url, "Sending controlStatus request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        if !response.status().is_success() {
            return Err(ProtocolError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "Received controlStatus response");

        Ok(ControlStatusResponse::parse(&body)?)
    }
}

impl Protocol for HttpClient {
    async fn control_status(&self, params: RequestParams) -> Option<ControlStatusResponse> {
        match self.try_control_status(&params).await {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!(error = %e, "controlStatus request failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
