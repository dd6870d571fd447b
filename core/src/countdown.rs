use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Interval between two countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not running, nothing changed.
    NoChange,
    Ticked,
    /// This tick consumed the last of the round time.
    Expired,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: TimeLeft,
}

impl Countdown {
    pub const fn new(start: TimeLeft) -> Self {
        Self { remaining: start }
    }

    pub const fn remaining(&self) -> TimeLeft {
        self.remaining
    }

    pub const fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Consumes one tick worth of time, clamping at zero.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_expired() {
            return TickOutcome::NoChange;
        }

        self.remaining = self.remaining.saturating_sub(TimeLeft::TICK);
        if self.is_expired() {
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked
        }
    }

    pub(crate) fn expire(&mut self) {
        self.remaining = TimeLeft::ZERO;
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(TimeLeft::ROUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_round_expires_after_130_ticks() {
        let mut countdown = Countdown::default();

        for _ in 0..129 {
            assert_eq!(countdown.tick(), TickOutcome::Ticked);
        }
        assert_eq!(countdown.remaining(), TimeLeft::from_centis(10));
        assert_eq!(countdown.tick(), TickOutcome::Expired);
        assert_eq!(countdown.remaining(), TimeLeft::ZERO);
        assert_eq!(countdown.tick(), TickOutcome::NoChange);
    }

    #[test]
    fn partial_tick_clamps_to_zero() {
        let mut countdown = Countdown::new(TimeLeft::from_centis(15));

        assert_eq!(countdown.tick(), TickOutcome::Ticked);
        assert_eq!(countdown.tick(), TickOutcome::Expired);
        assert!(countdown.is_expired());
    }
}
