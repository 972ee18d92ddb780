// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Airproce purifier accessory.
//!
//! [`Accessory`] keeps the cached [`DeviceState`], builds and sends signed
//! `controlStatus` requests through a [`Protocol`], and folds every answer
//! back into the cache. The cloud has no push channel and can be stale, so
//! the cache follows three rules:
//!
//! - reading power always asks the cloud first,
//! - reading speed never does,
//! - any failed call reports the device as off at speed 0.
//!
//! Remote calls made by one accessory are serialized: a request is only
//! sent once the previous one has been answered and reconciled, so the
//! cached state always reflects the most recent request.
//!
//! # Examples
//!
//! ```no_run
//! use airproce_lib::{Accessory, AccessoryConfig};
//! use airproce_lib::types::{Percent, PowerState};
//!
//! # async fn example() -> airproce_lib::Result<()> {
//! let config = AccessoryConfig::new("Bedroom", "pairing-hash", "12345", "AP-0001", 4);
//! let accessory = Accessory::http(config)?;
//!
//! accessory.set_power(PowerState::On).await;
//! accessory.set_speed(Percent::new(75)?).await;
//! println!("speed: {}", accessory.speed());
//! # Ok(())
//! # }
//! ```

mod registration;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::command::{ControlCommand, Identity};
use crate::config::AccessoryConfig;
use crate::error::{Error, ValueError};
use crate::host::AccessoryInformation;
use crate::protocol::Protocol;
use crate::state::{DeviceState, StateChange};
use crate::subscription::{CallbackRegistry, SubscriptionId};
use crate::types::{
    CurrentPurifierState, DeviceClass, Percent, PowerState, Segment, TargetPurifierState,
};

#[cfg(feature = "http")]
use crate::protocol::{HttpClient, HttpConfig};

/// A cloud-controlled Airproce purifier exposed as a host accessory.
///
/// # Type Parameter
///
/// `P` is the transport, [`HttpClient`](crate::protocol::HttpClient) in
/// production. Tests substitute their own [`Protocol`].
pub struct Accessory<P: Protocol> {
    protocol: P,
    identity: Identity,
    information: AccessoryInformation,
    device_class: DeviceClass,
    state: RwLock<DeviceState>,
    callbacks: CallbackRegistry,
    in_flight: Mutex<()>,
}

#[cfg(feature = "http")]
impl Accessory<HttpClient> {
    /// Creates an accessory talking to the Airproce cloud over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is incomplete, or
    /// `Error::Protocol` if the HTTP client cannot be created.
    pub fn http(config: AccessoryConfig) -> Result<Self, Error> {
        config.validate()?;

        let mut http = HttpConfig::new(config.hash());
        if let Some(endpoint) = config.endpoint() {
            http = http.with_endpoint(endpoint);
        }
        if let Some(timeout) = config.timeout() {
            http = http.with_timeout(timeout);
        }

        let client = http.into_client()?;
        Self::new(config, client)
    }
}

impl<P: Protocol> Accessory<P> {
    /// Creates an accessory using the given transport.
    ///
    /// The cached state starts as off at speed 0.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is incomplete.
    pub fn new(config: AccessoryConfig, protocol: P) -> Result<Self, Error> {
        config.validate()?;
        let segment = config.segment()?;

        tracing::info!(
            name = %config.name(),
            device_class = ?config.device_class(),
            segment = %segment,
            "Airproce accessory initialized"
        );

        Ok(Self {
            protocol,
            identity: config.identity(),
            information: AccessoryInformation::new(config.name()),
            device_class: config.device_class(),
            state: RwLock::new(DeviceState::new(segment)),
            callbacks: CallbackRegistry::new(),
            in_flight: Mutex::new(()),
        })
    }

    /// Returns the static accessory metadata.
    #[must_use]
    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    /// Returns how the accessory is presented to the host.
    #[must_use]
    pub fn device_class(&self) -> DeviceClass {
        self.device_class
    }

    /// Returns the account and device this accessory controls.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Returns the configured segment count.
    #[must_use]
    pub fn segment(&self) -> Segment {
        self.state.read().segment()
    }

    /// Returns a snapshot of the cached state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state.read().clone()
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    // ========== Remote calls ==========

    /// Sends a command and reconciles the answer into the cache.
    ///
    /// A power command is written to the cache tentatively once this call
    /// holds the request slot, so an earlier request still in flight cannot
    /// reconcile over it. A failed call resets the cache to off. Returns the
    /// changes applied after the answer.
    pub async fn send(&self, command: ControlCommand) -> Vec<StateChange> {
        let _guard = self.in_flight.lock().await;

        if let ControlCommand::Power(power) = &command {
            self.apply_local(StateChange::Power(*power));
        }

        let params = command.to_params(&self.identity, Utc::now().timestamp_millis());
        tracing::debug!(%command, "Sending command to cloud");

        let response = self.protocol.control_status(params).await;
        if response.is_none() {
            tracing::warn!(%command, "No usable answer from cloud, reporting device as off");
        }

        let changes = self.state.write().reconcile(response.as_ref());
        self.dispatch(&changes);
        changes
    }

    /// Queries the cloud for the current state.
    pub async fn refresh(&self) -> DeviceState {
        self.send(ControlCommand::Status).await;
        self.state()
    }

    // ========== Power ==========

    /// Returns the power state after refreshing it from the cloud.
    pub async fn power(&self) -> PowerState {
        self.refresh().await.power()
    }

    /// Switches the purifier on or off.
    ///
    /// The cache is updated as soon as the request is sent, then
    /// overwritten by the cloud's answer (or reset to off if the call fails).
    pub async fn set_power(&self, power: PowerState) {
        self.send(ControlCommand::Power(power)).await;
    }

    // ========== Speed ==========

    /// Returns the cached speed as a percentage. Never calls the cloud.
    #[must_use]
    pub fn speed(&self) -> Percent {
        self.state.read().speed_percent()
    }

    /// Runs the purifier at the rank matching `percent`.
    pub async fn set_speed(&self, percent: Percent) {
        let rank = self.segment().rank_for(percent);
        tracing::debug!(%percent, %rank, "Converted speed to rank");
        self.send(ControlCommand::Speed(rank)).await;
    }

    /// Runs the purifier at the rank matching a host rotation speed.
    ///
    /// Fractional values are converted as is, without rounding to a whole
    /// percent first.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPercent` if `percent` is not finite or is
    /// outside `[0, 100]`. Nothing is sent in that case.
    pub async fn set_rotation_speed(&self, percent: f64) -> Result<(), ValueError> {
        let rank = self.segment().rank_for_f64(percent)?;
        tracing::debug!(percent, %rank, "Converted rotation speed to rank");
        self.send(ControlCommand::Speed(rank)).await;
        Ok(())
    }

    // ========== Purifier state ==========

    /// Returns the current purifier state derived from the cached power.
    #[must_use]
    pub fn current_purifier_state(&self) -> CurrentPurifierState {
        CurrentPurifierState::from(self.state.read().power())
    }

    /// Returns the target purifier state. The device is always in auto mode.
    #[must_use]
    pub fn target_purifier_state(&self) -> TargetPurifierState {
        TargetPurifierState::Auto
    }

    /// Accepts a target purifier state. The cloud has no equivalent, so the
    /// request is only logged.
    pub fn set_target_purifier_state(&self, target: TargetPurifierState) {
        tracing::debug!(?target, "Ignoring target purifier state");
    }

    /// Handles an identify request from the host.
    pub fn identify(&self) {
        tracing::info!(name = %self.information.name, "Identify!");
    }

    // ========== Subscriptions ==========

    /// Subscribes to power state changes.
    pub fn on_power_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(PowerState) + Send + Sync + 'static,
    {
        self.callbacks.on_power_changed(callback)
    }

    /// Subscribes to speed changes.
    pub fn on_speed_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Percent) + Send + Sync + 'static,
    {
        self.callbacks.on_speed_changed(callback)
    }

    /// Subscribes to every state change.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.callbacks.on_state_changed(callback)
    }

    /// Unsubscribes a callback. Returns `true` if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }

    fn apply_local(&self, change: StateChange) {
        let changed = self.state.write().apply(&change);
        if changed {
            self.dispatch(&[change]);
        }
    }

    fn dispatch(&self, changes: &[StateChange]) {
        let segment = self.segment();
        for change in changes {
            self.callbacks.dispatch(change, segment);
        }
    }
}

impl<P: Protocol> std::fmt::Debug for Accessory<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessory")
            .field("identity", &self.identity)
            .field("information", &self.information)
            .field("device_class", &self.device_class)
            .field("state", &*self.state.read())
            .field("listeners", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU8, Ordering};

    use super::*;
    use crate::command::{ParamValue, RequestParams};
    use crate::response::ControlStatusResponse;
    use crate::types::Rank;

    /// Records every request and answers from a queue; an empty queue or a
    /// queued `None` behaves like a failed call.
    #[derive(Default)]
    pub(crate) struct ScriptedProtocol {
        pub(crate) requests: parking_lot::Mutex<Vec<RequestParams>>,
        pub(crate) answers: parking_lot::Mutex<VecDeque<Option<u8>>>,
    }

    impl ScriptedProtocol {
        pub(crate) fn answering(answers: impl IntoIterator<Item = Option<u8>>) -> Self {
            Self {
                requests: parking_lot::Mutex::new(Vec::new()),
                answers: parking_lot::Mutex::new(answers.into_iter().collect()),
            }
        }

        pub(crate) fn modes(&self) -> Vec<Option<ParamValue>> {
            self.requests
                .lock()
                .iter()
                .map(|p| p.get("mode").cloned())
                .collect()
        }
    }

    impl Protocol for ScriptedProtocol {
        async fn control_status(&self, params: RequestParams) -> Option<ControlStatusResponse> {
            self.requests.lock().push(params);
            self.answers
                .lock()
                .pop_front()
                .flatten()
                .map(|rank| ControlStatusResponse::new(Rank::new(rank)))
        }
    }

    pub(crate) fn config(segment: u8) -> AccessoryConfig {
        AccessoryConfig::new("Purifier", "abc", "u1", "d1", segment)
    }

    fn accessory(
        segment: u8,
        answers: impl IntoIterator<Item = Option<u8>>,
    ) -> Accessory<ScriptedProtocol> {
        Accessory::new(config(segment), ScriptedProtocol::answering(answers)).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let result = Accessory::new(
            AccessoryConfig::new("Purifier", "", "u1", "d1", 4),
            ScriptedProtocol::default(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn starts_off() {
        let accessory = accessory(4, []);
        assert_eq!(accessory.state().power(), PowerState::Off);
        assert_eq!(accessory.speed().value(), 0);
        assert_eq!(accessory.information().model, "Airproce");
    }

    #[tokio::test]
    async fn power_get_always_queries_cloud() {
        let accessory = accessory(4, [Some(2), Some(0)]);

        assert_eq!(accessory.power().await, PowerState::On);
        assert_eq!(accessory.power().await, PowerState::Off);

        let requests = accessory.protocol().requests.lock();
        assert_eq!(requests.len(), 2);
        // Status queries carry identity only
        assert_eq!(requests[0].len(), 2);
        assert!(requests[0].get("mode").is_none());
    }

    #[tokio::test]
    async fn power_set_sends_mode_codes() {
        let accessory = accessory(4, [Some(2), Some(0)]);

        accessory.set_power(PowerState::On).await;
        assert_eq!(accessory.state().power(), PowerState::On);
        accessory.set_power(PowerState::Off).await;
        assert_eq!(accessory.state().power(), PowerState::Off);

        assert_eq!(
            accessory.protocol().modes(),
            vec![Some(ParamValue::Int(0)), Some(ParamValue::Int(16))]
        );
    }

    #[tokio::test]
    async fn speed_set_sends_mode_one_with_rank() {
        let accessory = accessory(4, [Some(3)]);

        accessory.set_speed(Percent::new(75).unwrap()).await;

        let requests = accessory.protocol().requests.lock();
        assert_eq!(requests[0].get("mode"), Some(&ParamValue::Int(1)));
        assert_eq!(requests[0].get("rank"), Some(&ParamValue::Int(3)));
        drop(requests);

        assert!(accessory.state().power().is_on());
        assert_eq!(accessory.speed().value(), 75);
    }

    #[tokio::test]
    async fn rotation_speed_converts_fractional_host_value() {
        let accessory = accessory(3, [Some(1), Some(2)]);

        accessory.set_rotation_speed(33.2).await.unwrap();
        accessory.set_rotation_speed(66.5).await.unwrap();

        let ranks: Vec<_> = accessory
            .protocol()
            .requests
            .lock()
            .iter()
            .map(|p| p.get("rank").cloned())
            .collect();
        assert_eq!(
            ranks,
            vec![Some(ParamValue::Int(1)), Some(ParamValue::Int(2))]
        );
    }

    #[tokio::test]
    async fn invalid_rotation_speed_sends_nothing() {
        let accessory = accessory(3, []);
        let err = accessory.set_rotation_speed(-5.0).await.unwrap_err();
        assert!(matches!(err, ValueError::InvalidPercent { .. }));
        assert!(accessory.protocol().requests.lock().is_empty());
    }

    #[tokio::test]
    async fn full_speed_round_trip() {
        let accessory = accessory(5, [Some(5)]);
        accessory.set_speed(Percent::new(100).unwrap()).await;

        let requests = accessory.protocol().requests.lock();
        assert_eq!(requests[0].get("rank"), Some(&ParamValue::Int(5)));
        drop(requests);
        assert_eq!(accessory.speed().value(), 100);
    }

    #[tokio::test]
    async fn speed_get_is_local() {
        let accessory = accessory(4, [Some(3)]);
        accessory.refresh().await;

        let before = accessory.protocol().requests.lock().len();
        assert_eq!(accessory.speed().value(), 75);
        assert_eq!(accessory.protocol().requests.lock().len(), before);
    }

    #[tokio::test]
    async fn failure_reports_off() {
        let accessory = accessory(4, [Some(4), None]);
        accessory.refresh().await;
        assert!(accessory.state().power().is_on());

        accessory.set_power(PowerState::On).await;
        assert_eq!(accessory.state().power(), PowerState::Off);
        assert_eq!(accessory.state().speed_rank(), Rank::OFF);
    }

    #[tokio::test]
    async fn cloud_overrides_tentative_power() {
        // The cloud still reports rank 0 right after a power-on request
        let accessory = accessory(4, [Some(0)]);
        accessory.set_power(PowerState::On).await;
        assert_eq!(accessory.state().power(), PowerState::Off);
    }

    #[tokio::test]
    async fn listeners_see_tentative_and_reconciled_changes() {
        let accessory = accessory(4, [Some(0)]);
        let flips = Arc::new(AtomicU8::new(0));
        let flips_clone = Arc::clone(&flips);
        accessory.on_power_changed(move |_| {
            flips_clone.fetch_add(1, Ordering::SeqCst);
        });

        accessory.set_power(PowerState::On).await;
        // Off -> On (tentative), On -> Off (cloud)
        assert_eq!(flips.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn purifier_state_follows_cached_power() {
        let accessory = accessory(4, []);
        assert_eq!(
            accessory.current_purifier_state(),
            CurrentPurifierState::Inactive
        );
        accessory.apply_local(StateChange::Power(PowerState::On));
        assert_eq!(
            accessory.current_purifier_state(),
            CurrentPurifierState::PurifyingAir
        );
        assert_eq!(accessory.target_purifier_state(), TargetPurifierState::Auto);
    }
}
