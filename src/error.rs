// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Airproce library.
//!
//! Transport failures never reach the host platform: the remote client logs
//! them and the accessory falls back to reporting the device as off. The
//! errors below therefore cover value validation, configuration, and the
//! internal protocol/parse failures that are absorbed at that boundary.

use thiserror::Error;

use crate::host::Characteristic;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The accessory configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No handler is registered for the characteristic.
    #[error("no {kind} handler registered for {characteristic}")]
    HandlerNotRegistered {
        /// The characteristic that was addressed.
        characteristic: Characteristic,
        /// `"get"` or `"set"`.
        kind: &'static str,
    },
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A host rotation speed is not a finite number within `[0, 100]`.
    #[error("rotation speed {value} is not within [0, 100]")]
    InvalidPercent {
        /// The rejected value.
        value: f64,
    },

    /// A characteristic received a value of the wrong kind.
    #[error("{characteristic} expects a {expected} value")]
    UnexpectedValue {
        /// The characteristic being written.
        characteristic: Characteristic,
        /// Human readable description of the accepted kind.
        expected: &'static str,
    },
}

/// Errors related to HTTP communication with the vendor cloud.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// Invalid URL or address.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The response body could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] ParseError),
}

/// Errors related to parsing cloud responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to accessory configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required string field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The segment count is outside `1..=100`.
    #[error("segment must be within [1, 100], got {0}")]
    InvalidSegment(i64),

    /// The configuration document could not be decoded.
    #[error("malformed configuration: {0}")]
    Malformed(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 100,
            actual: 150,
        };
        assert_eq!(err.to_string(), "value 150 is out of range [0, 100]");
    }

    #[test]
    fn invalid_percent_reports_rejected_value() {
        let err = ValueError::InvalidPercent { value: -12.5 };
        assert_eq!(err.to_string(), "rotation speed -12.5 is not within [0, 100]");
    }

    #[test]
    fn unexpected_value_display() {
        let err = ValueError::UnexpectedValue {
            characteristic: Characteristic::RotationSpeed,
            expected: "numeric",
        };
        assert_eq!(err.to_string(), "RotationSpeed expects a numeric value");
    }

    #[test]
    fn error_from_config_error() {
        let err: Error = ConfigError::MissingField("hash").into();
        assert!(matches!(err, Error::Config(ConfigError::MissingField("hash"))));
        assert_eq!(
            err.to_string(),
            "configuration error: missing required field: hash"
        );
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("control.rank".to_string());
        assert_eq!(err.to_string(), "missing field in response: control.rank");
    }

    #[test]
    fn protocol_status_display() {
        let err = ProtocolError::Status { status: 503 };
        assert_eq!(err.to_string(), "unexpected HTTP status 503");
    }
}
