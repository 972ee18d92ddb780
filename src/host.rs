// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host platform capability.
//!
//! The home-automation host owns accessory registration and event dispatch.
//! This crate only needs to hand it one async handler per characteristic
//! and event kind, plus an identify hook; [`AccessoryHost`] is that seam.
//! [`HandlerRegistry`] is an in-process implementation that stores the
//! handlers and lets callers drive them directly.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{Error, Result};

/// Characteristics an accessory can expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Characteristic {
    /// Power, as `0`/`1` or a boolean.
    Active,
    /// `0` inactive, `1` idle, `2` purifying. Read only.
    CurrentAirPurifierState,
    /// `0` manual, `1` auto.
    TargetAirPurifierState,
    /// Speed as a percentage.
    RotationSpeed,
}

impl Characteristic {
    /// Returns the characteristic name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::CurrentAirPurifierState => "CurrentAirPurifierState",
            Self::TargetAirPurifierState => "TargetAirPurifierState",
            Self::RotationSpeed => "RotationSpeed",
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value exchanged with the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacteristicValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value (enumerations, `0`/`1` flags).
    Int(i64),
    /// Floating point value (percentages).
    Float(f64),
}

impl CharacteristicValue {
    /// Interprets the value as a flag: booleans as is, `0` as false and any
    /// other integer as true.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            Self::Int(v) => Some(*v != 0),
            Self::Float(_) => None,
        }
    }

    /// Interprets the value as a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(_) => None,
            // Characteristic integers are small enumerations and percentages
            #[allow(clippy::cast_precision_loss)]
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u8> for CharacteristicValue {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Boxed future returned by handlers.
pub type HandlerFuture<T> = Pin<Box<dyn Future<Output = Result<T>> + Send>>;

/// Handler answering a GET for one characteristic.
pub type GetHandler = Arc<dyn Fn() -> HandlerFuture<CharacteristicValue> + Send + Sync>;

/// Handler applying a SET for one characteristic.
pub type SetHandler = Arc<dyn Fn(CharacteristicValue) -> HandlerFuture<()> + Send + Sync>;

/// Handler for identify requests.
pub type IdentifyHandler = Arc<dyn Fn() + Send + Sync>;

/// Registration surface offered by the host platform.
///
/// The host calls a GET handler when it needs a value and a SET handler when
/// the user changes one. Handlers always complete; transport problems
/// surface as fallback values, not errors.
pub trait AccessoryHost {
    /// Registers the GET handler of a characteristic.
    fn on_get(&self, characteristic: Characteristic, handler: GetHandler);

    /// Registers the SET handler of a characteristic.
    fn on_set(&self, characteristic: Characteristic, handler: SetHandler);

    /// Registers the identify handler.
    fn on_identify(&self, handler: IdentifyHandler);
}

/// Static accessory metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInformation {
    /// Display name, from configuration.
    pub name: String,
    /// Manufacturer string.
    pub manufacturer: &'static str,
    /// Model string.
    pub model: &'static str,
    /// Serial number string.
    pub serial_number: &'static str,
}

impl AccessoryInformation {
    /// Manufacturer reported for every Airproce accessory.
    pub const MANUFACTURER: &'static str = "emeiziying";
    /// Model reported for every Airproce accessory.
    pub const MODEL: &'static str = "Airproce";
    /// Serial number reported for every Airproce accessory.
    pub const SERIAL_NUMBER: &'static str = "001";

    /// Creates the metadata for an accessory called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manufacturer: Self::MANUFACTURER,
            model: Self::MODEL,
            serial_number: Self::SERIAL_NUMBER,
        }
    }
}

/// In-process [`AccessoryHost`] that stores handlers and dispatches to them.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use airproce_lib::host::{Characteristic, HandlerRegistry};
/// use airproce_lib::{Accessory, AccessoryConfig};
///
/// # async fn example(config: AccessoryConfig) -> airproce_lib::Result<()> {
/// let accessory = Arc::new(Accessory::http(config)?);
/// let host = HandlerRegistry::new();
/// accessory.register(&host);
///
/// let active = host.get(Characteristic::Active).await?;
/// println!("active: {active:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    get_handlers: RwLock<HashMap<Characteristic, GetHandler>>,
    set_handlers: RwLock<HashMap<Characteristic, SetHandler>>,
    identify_handler: RwLock<Option<IdentifyHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the GET handler of a characteristic.
    ///
    /// # Errors
    ///
    /// Returns `Error::HandlerNotRegistered` if nothing handles GET for it,
    /// or the handler's own error.
    pub async fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        let handler = self
            .get_handlers
            .read()
            .get(&characteristic)
            .cloned()
            .ok_or(Error::HandlerNotRegistered {
                characteristic,
                kind: "get",
            })?;
        handler().await
    }

    /// Runs the SET handler of a characteristic.
    ///
    /// # Errors
    ///
    /// Returns `Error::HandlerNotRegistered` if nothing handles SET for it,
    /// or the handler's own error.
    pub async fn set(
        &self,
        characteristic: Characteristic,
        value: impl Into<CharacteristicValue>,
    ) -> Result<()> {
        let handler = self
            .set_handlers
            .read()
            .get(&characteristic)
            .cloned()
            .ok_or(Error::HandlerNotRegistered {
                characteristic,
                kind: "set",
            })?;
        handler(value.into()).await
    }

    /// Runs the identify handler, if one is registered.
    pub fn identify(&self) {
        let handler = self.identify_handler.read().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    /// Returns `true` if a GET handler is registered for the characteristic.
    #[must_use]
    pub fn handles_get(&self, characteristic: Characteristic) -> bool {
        self.get_handlers.read().contains_key(&characteristic)
    }

    /// Returns `true` if a SET handler is registered for the characteristic.
    #[must_use]
    pub fn handles_set(&self, characteristic: Characteristic) -> bool {
        self.set_handlers.read().contains_key(&characteristic)
    }

    /// Returns every characteristic with at least one handler, sorted.
    #[must_use]
    pub fn characteristics(&self) -> Vec<Characteristic> {
        let mut all: Vec<Characteristic> = self
            .get_handlers
            .read()
            .keys()
            .chain(self.set_handlers.read().keys())
            .copied()
            .collect();
        all.sort();
        all.dedup();
        all
    }
}

impl AccessoryHost for HandlerRegistry {
    fn on_get(&self, characteristic: Characteristic, handler: GetHandler) {
        tracing::debug!(%characteristic, "Registering GET handler");
        self.get_handlers.write().insert(characteristic, handler);
    }

    fn on_set(&self, characteristic: Characteristic, handler: SetHandler) {
        tracing::debug!(%characteristic, "Registering SET handler");
        self.set_handlers.write().insert(characteristic, handler);
    }

    fn on_identify(&self, handler: IdentifyHandler) {
        *self.identify_handler.write() = Some(handler);
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("characteristics", &self.characteristics())
            .finish_non_exhaustive()
    }
}
