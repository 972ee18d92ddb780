// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory configuration.
//!
//! The host hands each accessory a JSON block such as:
//!
//! ```json
//! {
//!   "accessory": "Airproce",
//!   "name": "Bedroom Purifier",
//!   "hash": "pairing-key",
//!   "userId": "12345",
//!   "deviceId": "AP-0001",
//!   "segment": 4
//! }
//! ```
//!
//! Unknown keys are ignored. Everything required is checked by
//! [`AccessoryConfig::validate`] so that a bad block fails when the
//! accessory is built rather than on the first request.

use std::time::Duration;

use serde::Deserialize;

use crate::command::Identity;
use crate::error::ConfigError;
use crate::types::{DeviceClass, Segment};

/// Configuration of one accessory.
///
/// # Examples
///
/// ```
/// use airproce_lib::AccessoryConfig;
///
/// let config = AccessoryConfig::from_json(
///     r#"{"name": "Purifier", "hash": "abc", "userId": "u1", "deviceId": "d1", "segment": 4}"#,
/// )
/// .unwrap();
/// assert_eq!(config.segment().unwrap().value(), 4);
/// ```
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryConfig {
    #[serde(default)]
    name: String,
    #[serde(default)]
    hash: String,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    device_id: String,
    #[serde(default)]
    segment: i64,
    #[serde(default)]
    device_class: DeviceClass,
    #[serde(default)]
    endpoint: Option<String>,
    #[serde(default)]
    timeout_ms: Option<u64>,
}

impl AccessoryConfig {
    /// Creates a configuration with the required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        hash: impl Into<String>,
        user_id: impl Into<String>,
        device_id: impl Into<String>,
        segment: u8,
    ) -> Self {
        Self {
            name: name.into(),
            hash: hash.into(),
            user_id: user_id.into(),
            device_id: device_id.into(),
            segment: i64::from(segment),
            device_class: DeviceClass::default(),
            endpoint: None,
            timeout_ms: None,
        }
    }

    /// Parses and validates a JSON accessory block.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Malformed` if the JSON cannot be decoded, or the
    /// validation error otherwise.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the device class.
    #[must_use]
    pub fn with_device_class(mut self, device_class: DeviceClass) -> Self {
        self.device_class = device_class;
        self
    }

    /// Overrides the cloud endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Checks every required field.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for an empty `name`, `hash`,
    /// `userId` or `deviceId`, and `ConfigError::InvalidSegment` if
    /// `segment` is outside `1..=100`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("name", &self.name),
            ("hash", &self.hash),
            ("userId", &self.user_id),
            ("deviceId", &self.device_id),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField(field));
            }
        }
        self.segment()?;
        Ok(())
    }

    /// Returns the accessory name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the shared signing secret.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Returns the account and device identity.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::new(self.user_id.as_str(), self.device_id.as_str())
    }

    /// Returns the validated segment count.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidSegment` if `segment` is outside `1..=100`.
    pub fn segment(&self) -> Result<Segment, ConfigError> {
        u8::try_from(self.segment)
            .ok()
            .and_then(|value| Segment::new(value).ok())
            .ok_or(ConfigError::InvalidSegment(self.segment))
    }

    /// Returns the device class.
    #[must_use]
    pub fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    /// Returns the endpoint override, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Returns the request timeout override, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl std::fmt::Debug for AccessoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessoryConfig")
            .field("name", &self.name)
            .field("hash", &"REDACTED")
            .field("user_id", &self.user_id)
            .field("device_id", &self.device_id)
            .field("segment", &self.segment)
            .field("device_class", &self.device_class)
            .field("endpoint", &self.endpoint)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "accessory": "Airproce",
        "name": "Bedroom",
        "hash": "abc",
        "userId": "u1",
        "deviceId": "d1",
        "segment": 5,
        "deviceClass": "fan",
        "endpoint": "http://127.0.0.1:9000/appAPI/controlStatus",
        "timeoutMs": 2500
    }"#;

    #[test]
    fn parses_host_block() {
        let config = AccessoryConfig::from_json(FULL).unwrap();
        assert_eq!(config.name(), "Bedroom");
        assert_eq!(config.hash(), "abc");
        assert_eq!(config.identity(), Identity::new("u1", "d1"));
        assert_eq!(config.segment().unwrap().value(), 5);
        assert_eq!(config.device_class(), DeviceClass::Fan);
        assert_eq!(
            config.endpoint(),
            Some("http://127.0.0.1:9000/appAPI/controlStatus")
        );
        assert_eq!(config.timeout(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn optional_fields_default() {
        let config = AccessoryConfig::from_json(
            r#"{"name": "P", "hash": "abc", "userId": "u1", "deviceId": "d1", "segment": 4}"#,
        )
        .unwrap();
        assert_eq!(config.device_class(), DeviceClass::AirPurifier);
        assert!(config.endpoint().is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn missing_hash_fails_fast() {
        let err = AccessoryConfig::from_json(
            r#"{"name": "P", "userId": "u1", "deviceId": "d1", "segment": 4}"#,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingField("hash"));
    }

    #[test]
    fn blank_device_id_fails() {
        let config = AccessoryConfig::new("P", "abc", "u1", "  ", 4);
        assert_eq!(config.validate(), Err(ConfigError::MissingField("deviceId")));
    }

    #[test]
    fn segment_must_be_in_range() {
        let missing = AccessoryConfig::from_json(
            r#"{"name": "P", "hash": "abc", "userId": "u1", "deviceId": "d1"}"#,
        )
        .unwrap_err();
        assert_eq!(missing, ConfigError::InvalidSegment(0));

        let config = AccessoryConfig::new("P", "abc", "u1", "d1", 101);
        assert_eq!(config.validate(), Err(ConfigError::InvalidSegment(101)));

        let negative = AccessoryConfig::from_json(
            r#"{"name": "P", "hash": "abc", "userId": "u1", "deviceId": "d1", "segment": -3}"#,
        )
        .unwrap_err();
        assert_eq!(negative, ConfigError::InvalidSegment(-3));
    }

    #[test]
    fn malformed_json() {
        let err = AccessoryConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn debug_redacts_hash() {
        let config = AccessoryConfig::new("P", "top-secret", "u1", "d1", 4);
        assert!(!format!("{config:?}").contains("top-secret"));
    }
}
