// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached purifier state and reconciliation.

use crate::response::ControlStatusResponse;
use crate::types::{Percent, PowerState, Rank, Segment};

use super::StateChange;

/// Last known state of the purifier.
///
/// Power and rank can be written independently (a SET handler flips power
/// before the cloud confirms it), but every cloud answer overwrites both.
/// `power == Off` therefore does not imply `rank == 0` between a tentative
/// write and its reconciliation.
///
/// # Examples
///
/// ```
/// use airproce_lib::response::ControlStatusResponse;
/// use airproce_lib::state::DeviceState;
/// use airproce_lib::types::{PowerState, Rank, Segment};
///
/// let mut state = DeviceState::new(Segment::new(4).unwrap());
/// state.reconcile(Some(&ControlStatusResponse::new(Rank::new(3))));
/// assert_eq!(state.power(), PowerState::On);
/// assert_eq!(state.speed_percent().value(), 75);
///
/// // A failed call resets to off
/// state.reconcile(None);
/// assert_eq!(state.power(), PowerState::Off);
/// assert_eq!(state.speed_rank(), Rank::OFF);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    segment: Segment,
    power: PowerState,
    speed_rank: Rank,
}

impl DeviceState {
    /// Creates an "off" state for a device with `segment` speed steps.
    #[must_use]
    pub fn new(segment: Segment) -> Self {
        Self {
            segment,
            power: PowerState::Off,
            speed_rank: Rank::OFF,
        }
    }

    /// Returns the segment count used for percentage conversion.
    #[must_use]
    pub fn segment(&self) -> Segment {
        self.segment
    }

    /// Returns the cached power state.
    #[must_use]
    pub fn power(&self) -> PowerState {
        self.power
    }

    /// Returns the cached speed rank.
    #[must_use]
    pub fn speed_rank(&self) -> Rank {
        self.speed_rank
    }

    /// Returns the cached rank as a rotation speed percentage.
    #[must_use]
    pub fn speed_percent(&self) -> Percent {
        self.segment.percent_for(self.speed_rank)
    }

    /// Applies a state change and returns whether the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Power(power) => {
                if self.power == *power {
                    false
                } else {
                    self.power = *power;
                    true
                }
            }
            StateChange::Rank(rank) => {
                let rank = self.segment.clamp_rank(*rank);
                if self.speed_rank == rank {
                    false
                } else {
                    self.speed_rank = rank;
                    true
                }
            }
        }
    }

    /// Folds the outcome of a cloud call into the cache.
    ///
    /// - `Some(response)`: power becomes `rank != 0`, rank becomes the
    ///   reported rank clamped to the segment count.
    /// - `None`: the call failed; the device is reported off at rank 0.
    ///
    /// Returns the changes that were actually applied.
    pub fn reconcile(&mut self, response: Option<&ControlStatusResponse>) -> Vec<StateChange> {
        let (power, rank) = match response {
            Some(response) => {
                let reported = response.rank();
                let rank = self.segment.clamp_rank(reported);
                if rank != reported {
                    tracing::warn!(
                        reported = %reported,
                        max = %self.segment,
                        "Cloud reported a rank above the segment count, clamping"
                    );
                }
                (response.power_state(), rank)
            }
            None => (PowerState::Off, Rank::OFF),
        };

        [StateChange::Power(power), StateChange::Rank(rank)]
            .into_iter()
            .filter(|change| self.apply(change))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(segment: u8) -> DeviceState {
        DeviceState::new(Segment::new(segment).unwrap())
    }

    fn response(rank: u8) -> ControlStatusResponse {
        ControlStatusResponse::new(Rank::new(rank))
    }

    #[test]
    fn new_state_is_off() {
        let state = state(5);
        assert_eq!(state.power(), PowerState::Off);
        assert_eq!(state.speed_rank(), Rank::OFF);
        assert_eq!(state.speed_percent().value(), 0);
    }

    #[test]
    fn nonzero_rank_means_on() {
        let mut state = state(5);
        let changes = state.reconcile(Some(&response(2)));
        assert_eq!(state.power(), PowerState::On);
        assert_eq!(state.speed_rank(), Rank::new(2));
        assert_eq!(
            changes,
            vec![
                StateChange::Power(PowerState::On),
                StateChange::Rank(Rank::new(2))
            ]
        );
    }

    #[test]
    fn zero_rank_means_off_even_after_local_on() {
        let mut state = state(5);
        state.apply(&StateChange::Power(PowerState::On));
        state.reconcile(Some(&response(0)));
        assert_eq!(state.power(), PowerState::Off);
        assert_eq!(state.speed_rank(), Rank::OFF);
    }

    #[test]
    fn failure_resets_to_off() {
        let mut state = state(5);
        state.reconcile(Some(&response(4)));

        let changes = state.reconcile(None);
        assert_eq!(state.power(), PowerState::Off);
        assert_eq!(state.speed_rank(), Rank::OFF);
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn failure_on_off_state_changes_nothing() {
        let mut state = state(5);
        assert!(state.reconcile(None).is_empty());
    }

    #[test]
    fn power_and_rank_are_independent_locally() {
        let mut state = state(5);
        state.reconcile(Some(&response(3)));
        state.apply(&StateChange::Power(PowerState::Off));
        assert_eq!(state.power(), PowerState::Off);
        assert_eq!(state.speed_rank(), Rank::new(3));
    }

    #[test]
    fn oversized_rank_is_clamped() {
        let mut state = state(4);
        state.reconcile(Some(&response(9)));
        assert_eq!(state.speed_rank(), Rank::new(4));
        assert_eq!(state.speed_percent().value(), 100);
    }

    #[test]
    fn seventy_five_percent_on_four_segments() {
        let mut state = state(4);
        let rank = state.segment().rank_for(Percent::new(75).unwrap());
        assert_eq!(rank, Rank::new(3));

        state.reconcile(Some(&response(3)));
        assert!(state.power().is_on());
        assert_eq!(state.speed_percent().value(), 75);
    }

    #[test]
    fn apply_clamps_rank() {
        let mut state = state(4);
        assert!(state.apply(&StateChange::Rank(Rank::new(7))));
        assert_eq!(state.speed_rank(), Rank::new(4));
        assert!(!state.apply(&StateChange::Rank(Rank::new(4))));
    }

    #[test]
    fn apply_reports_changes() {
        let mut state = state(5);
        assert!(state.apply(&StateChange::Rank(Rank::new(1))));
        assert!(!state.apply(&StateChange::Rank(Rank::new(1))));
        assert!(state.apply(&StateChange::Power(PowerState::On)));
    }
}
