// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed types and the percentage/rank conversion.
//!
//! The host platform expresses rotation speed as a percentage while the
//! Airproce cloud works with a discrete rank between 0 and the configured
//! number of segments. [`Segment`] owns the conversion in both directions.

use std::fmt;

use crate::error::ValueError;

/// Number of discrete speed steps a device supports (1-100).
///
/// # Examples
///
/// ```
/// use airproce_lib::types::{Percent, Rank, Segment};
///
/// let segment = Segment::new(4).unwrap();
/// assert_eq!(segment.rank_for(Percent::new(75).unwrap()), Rank::new(3));
/// assert_eq!(segment.percent_for(Rank::new(3)).value(), 75);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Segment(u8);

impl Segment {
    /// Smallest supported segment count.
    pub const MIN: u8 = 1;

    /// Largest supported segment count.
    ///
    /// Above 100 some ranks would map to the same whole percentage.
    pub const MAX: u8 = 100;

    /// Creates a new segment count.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 100].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: u16::from(Self::MIN),
                max: u16::from(Self::MAX),
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the number of steps.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the highest rank this device accepts.
    #[must_use]
    pub const fn max_rank(&self) -> Rank {
        Rank(self.0)
    }

    /// Converts a percentage into a rank: `ceil(percent / (100 / segment))`.
    ///
    /// Evaluated as `ceil(percent * segment / 100)` in integers so that the
    /// result never drifts through floating point rounding.
    #[must_use]
    pub fn rank_for(&self, percent: Percent) -> Rank {
        let scaled = u16::from(percent.0) * u16::from(self.0);
        // scaled <= 100 * 100, the quotient is at most `self.0`
        #[allow(clippy::cast_possible_truncation)]
        let rank = scaled.div_ceil(100) as u8;
        Rank(rank)
    }

    /// Converts a host percentage into a rank without rounding it to a whole
    /// percent first, so fractional values land on the step they fall in.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPercent` if `percent` is not finite or is
    /// outside `[0, 100]`.
    pub fn rank_for_f64(&self, percent: f64) -> Result<Rank, ValueError> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(ValueError::InvalidPercent { value: percent });
        }
        // Tolerate float error on exact step boundaries (75% of 4 is rank 3)
        let scaled = percent * f64::from(self.0) / 100.0 - 1e-9;
        // Range checked above, the ceiling is within [0, segment]
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rank = scaled.ceil().max(0.0) as u8;
        Ok(Rank(rank.min(self.0)))
    }

    /// Converts a rank into a percentage: `rank * (100 / segment)`.
    ///
    /// The result is rounded down so that feeding it back through
    /// [`rank_for`](Self::rank_for) yields the same rank. Ranks above the
    /// segment count saturate at 100%.
    #[must_use]
    pub fn percent_for(&self, rank: Rank) -> Percent {
        let rank = rank.0.min(self.0);
        // rank <= segment, so the quotient is at most 100
        #[allow(clippy::cast_possible_truncation)]
        let percent = (u16::from(rank) * 100 / u16::from(self.0)) as u8;
        Percent(percent)
    }

    /// Clamps a rank reported by the cloud into `[0, segment]`.
    #[must_use]
    pub fn clamp_rank(&self, rank: Rank) -> Rank {
        Rank(rank.0.min(self.0))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Segment {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Segment> for u8 {
    fn from(segment: Segment) -> Self {
        segment.0
    }
}

/// Discrete speed level used by the Airproce cloud.
///
/// Rank 0 means the device is off. The upper bound depends on the device's
/// [`Segment`] count and is enforced when the rank is reconciled into state.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Rank(u8);

impl Rank {
    /// The "off" rank.
    pub const OFF: Self = Self(0);

    /// Creates a rank.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the rank value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` for any non-zero rank.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rotation speed percentage (0-100).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
)]
pub struct Percent(u8);

impl Percent {
    /// Maximum percentage.
    pub const MAX: u8 = 100;

    /// Creates a percentage.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is greater than 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > Self::MAX {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: u16::from(Self::MAX),
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Percent {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
