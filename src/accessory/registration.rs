// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristic handlers and host registration.

use std::sync::Arc;

use crate::error::{Error, Result, ValueError};
use crate::host::{
    AccessoryHost, Characteristic, CharacteristicValue, GetHandler, HandlerFuture, SetHandler,
};
use crate::protocol::Protocol;
use crate::types::{PowerState, TargetPurifierState};

use super::Accessory;

impl<P: Protocol + 'static> Accessory<P> {
    /// Returns the characteristics exposed for the configured device class,
    /// with whether each one accepts SET.
    #[must_use]
    pub fn characteristics(&self) -> Vec<(Characteristic, bool)> {
        let mut all = vec![(Characteristic::Active, true)];
        if self.device_class.has_purifier_state() {
            all.push((Characteristic::CurrentAirPurifierState, false));
            all.push((Characteristic::TargetAirPurifierState, true));
        }
        all.push((Characteristic::RotationSpeed, true));
        all
    }

    /// Registers every exposed characteristic and the identify hook with the
    /// host.
    pub fn register(self: &Arc<Self>, host: &impl AccessoryHost) {
        for (characteristic, writable) in self.characteristics() {
            let accessory = Arc::clone(self);
            let get: GetHandler = Arc::new(move || -> HandlerFuture<CharacteristicValue> {
                let accessory = Arc::clone(&accessory);
                Box::pin(async move { accessory.handle_get(characteristic).await })
            });
            host.on_get(characteristic, get);

            if writable {
                let accessory = Arc::clone(self);
                let set: SetHandler = Arc::new(move |value| -> HandlerFuture<()> {
                    let accessory = Arc::clone(&accessory);
                    Box::pin(async move { accessory.handle_set(characteristic, value).await })
                });
                host.on_set(characteristic, set);
            }
        }

        let accessory = Arc::clone(self);
        host.on_identify(Arc::new(move || accessory.identify()));

        tracing::info!(
            name = %self.information.name,
            "Airproce finished initializing!"
        );
    }

    /// Answers a GET from the host.
    ///
    /// Only `Active` calls the cloud; the other characteristics are served
    /// from the cache.
    ///
    /// # Errors
    ///
    /// Never fails for exposed characteristics; transport failures show up as
    /// an "off" value instead.
    pub async fn handle_get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        tracing::debug!(%characteristic, "Triggered GET");

        let value = match characteristic {
            Characteristic::Active => {
                CharacteristicValue::from(u8::from(self.power().await.is_on()))
            }
            Characteristic::CurrentAirPurifierState => {
                CharacteristicValue::from(self.current_purifier_state().code())
            }
            Characteristic::TargetAirPurifierState => {
                CharacteristicValue::from(self.target_purifier_state().code())
            }
            Characteristic::RotationSpeed => {
                CharacteristicValue::from(f64::from(self.speed().value()))
            }
        };
        Ok(value)
    }

    /// Applies a SET from the host.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if the value has the wrong kind or is out of
    /// range, and `Error::HandlerNotRegistered` for read-only
    /// characteristics. Transport failures are not errors.
    pub async fn handle_set(
        &self,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<()> {
        tracing::debug!(%characteristic, ?value, "Triggered SET");

        match characteristic {
            Characteristic::Active => {
                let on = value.as_bool().ok_or(ValueError::UnexpectedValue {
                    characteristic,
                    expected: "boolean",
                })?;
                self.set_power(PowerState::from(on)).await;
            }
            Characteristic::RotationSpeed => {
                let number = value.as_f64().ok_or(ValueError::UnexpectedValue {
                    characteristic,
                    expected: "numeric",
                })?;
                self.set_rotation_speed(number).await?;
            }
            Characteristic::TargetAirPurifierState => {
                let target = match value.as_i64().or_else(|| value.as_bool().map(i64::from)) {
                    Some(0) => TargetPurifierState::Manual,
                    Some(1) => TargetPurifierState::Auto,
                    Some(other) => {
                        return Err(ValueError::OutOfRange {
                            min: 0,
                            max: 1,
                            actual: u16::try_from(other).unwrap_or(u16::MAX),
                        }
                        .into());
                    }
                    None => {
                        return Err(ValueError::UnexpectedValue {
                            characteristic,
                            expected: "integer",
                        }
                        .into());
                    }
                };
                self.set_target_purifier_state(target);
            }
            Characteristic::CurrentAirPurifierState => {
                return Err(Error::HandlerNotRegistered {
                    characteristic,
                    kind: "set",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{ScriptedProtocol, config};
    use super::*;
    use crate::command::ParamValue;
    use crate::host::HandlerRegistry;
    use crate::types::DeviceClass;

    fn registered(
        device_class: DeviceClass,
        answers: impl IntoIterator<Item = Option<u8>>,
    ) -> (Arc<Accessory<ScriptedProtocol>>, HandlerRegistry) {
        let accessory = Arc::new(
            Accessory::new(
                config(4).with_device_class(device_class),
                ScriptedProtocol::answering(answers),
            )
            .unwrap(),
        );
        let host = HandlerRegistry::new();
        accessory.register(&host);
        (accessory, host)
    }

    #[test]
    fn air_purifier_registers_all_characteristics() {
        let (_, host) = registered(DeviceClass::AirPurifier, []);
        assert_eq!(
            host.characteristics(),
            vec![
                Characteristic::Active,
                Characteristic::CurrentAirPurifierState,
                Characteristic::TargetAirPurifierState,
                Characteristic::RotationSpeed,
            ]
        );
        assert!(!host.handles_set(Characteristic::CurrentAirPurifierState));
        assert!(host.handles_set(Characteristic::TargetAirPurifierState));
    }

    #[test]
    fn fan_registers_active_and_speed_only() {
        let (_, host) = registered(DeviceClass::Fan, []);
        assert_eq!(
            host.characteristics(),
            vec![Characteristic::Active, Characteristic::RotationSpeed]
        );
        assert!(host.handles_get(Characteristic::RotationSpeed));
        assert!(!host.handles_get(Characteristic::CurrentAirPurifierState));
    }

    #[tokio::test]
    async fn seventy_five_percent_on_four_segments() {
        let (accessory, host) = registered(DeviceClass::AirPurifier, [Some(3)]);

        host.set(Characteristic::RotationSpeed, 75.0).await.unwrap();

        let requests = accessory.protocol().requests.lock().clone();
        assert_eq!(requests[0].get("rank"), Some(&ParamValue::Int(3)));
        assert_eq!(requests[0].get("mode"), Some(&ParamValue::Int(1)));

        assert_eq!(
            host.get(Characteristic::RotationSpeed).await.unwrap(),
            CharacteristicValue::Float(75.0)
        );
        assert_eq!(
            host.get(Characteristic::CurrentAirPurifierState).await.unwrap(),
            CharacteristicValue::Int(2)
        );
    }

    #[tokio::test]
    async fn active_get_refreshes_from_cloud() {
        let (accessory, host) = registered(DeviceClass::AirPurifier, [Some(2)]);
        assert_eq!(
            host.get(Characteristic::Active).await.unwrap(),
            CharacteristicValue::Int(1)
        );
        assert_eq!(accessory.protocol().requests.lock().len(), 1);
    }

    #[tokio::test]
    async fn active_get_on_failure_reports_off() {
        let (_, host) = registered(DeviceClass::AirPurifier, [None]);
        assert_eq!(
            host.get(Characteristic::Active).await.unwrap(),
            CharacteristicValue::Int(0)
        );
    }

    #[tokio::test]
    async fn active_set_accepts_int_and_bool() {
        let (accessory, host) = registered(DeviceClass::AirPurifier, [Some(1), Some(0)]);
        host.set(Characteristic::Active, 1u8).await.unwrap();
        host.set(Characteristic::Active, false).await.unwrap();
        assert_eq!(
            accessory.protocol().modes(),
            vec![Some(ParamValue::Int(0)), Some(ParamValue::Int(16))]
        );
    }

    #[tokio::test]
    async fn set_failure_still_completes() {
        let (accessory, host) = registered(DeviceClass::AirPurifier, [None]);
        host.set(Characteristic::Active, true).await.unwrap();
        assert_eq!(accessory.state().power(), PowerState::Off);
    }

    #[tokio::test]
    async fn wrong_value_kind_is_rejected() {
        let (accessory, host) = registered(DeviceClass::AirPurifier, []);
        let err = host
            .set(Characteristic::Active, 0.5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::UnexpectedValue { .. })));

        let err = host
            .set(Characteristic::RotationSpeed, 150.0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Value(ValueError::InvalidPercent { value }) if (value - 150.0).abs() < f64::EPSILON
        ));

        assert!(accessory.protocol().requests.lock().is_empty());
    }

    #[tokio::test]
    async fn target_state_is_fixed_to_auto() {
        let (accessory, host) = registered(DeviceClass::AirPurifier, []);
        host.set(Characteristic::TargetAirPurifierState, 0u8)
            .await
            .unwrap();
        assert_eq!(
            host.get(Characteristic::TargetAirPurifierState).await.unwrap(),
            CharacteristicValue::Int(1)
        );
        assert!(
            host.set(Characteristic::TargetAirPurifierState, 5u8)
                .await
                .is_err()
        );
        assert!(accessory.protocol().requests.lock().is_empty());
    }

    #[tokio::test]
    async fn current_state_is_read_only() {
        let (accessory, _) = registered(DeviceClass::AirPurifier, []);
        let err = accessory
            .handle_set(
                Characteristic::CurrentAirPurifierState,
                CharacteristicValue::Int(2),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HandlerNotRegistered { kind: "set", .. }));
    }

    #[test]
    fn identify_is_wired() {
        let (_, host) = registered(DeviceClass::AirPurifier, []);
        host.identify();
    }
}
