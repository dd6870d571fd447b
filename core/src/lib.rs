#![no_std]

extern crate alloc;

pub use cell::*;
#[cfg(any(test, feature = "test-util"))]
pub use clock::*;
pub use countdown::*;
pub use error::*;
pub use grid::*;
pub use round::*;
pub use scheduler::*;
pub use session::*;
pub use timers::*;
pub use types::*;

mod cell;
#[cfg(any(test, feature = "test-util"))]
mod clock;
mod countdown;
mod error;
mod grid;
mod round;
mod scheduler;
mod session;
mod timers;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    Missed,
    /// Scored a point on this reveal.
    Hit(RevealId),
}

impl HitOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed(RevealId),
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Revealed(_))
    }
}
