use core::time::Duration;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    Tick,
    RevealAttempt,
    AutoHide { cell: CellIndex, reveal: RevealId },
}

/// A timer firing, tagged with the round epoch it was scheduled in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEvent {
    pub epoch: u32,
    pub kind: TimerKind,
}

/// Something that can deliver a [`TimerEvent`] back to the round after a delay.
///
/// Dropping the returned handle must cancel the timer. This is how every timer the round no longer wants gets
/// cancelled.
pub trait TimerHost {
    type Handle;

    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> Self::Handle;
}

/// One auto-hide timer slot per cell.
///
/// Arming a slot drops whatever handle was there before, so a cell never has more than one live timer.
#[derive(Debug)]
pub struct TimerSlots<H> {
    slots: HashMap<CellIndex, (RevealId, H)>,
}

impl<H> TimerSlots<H> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::with_capacity(GRID_CELLS),
        }
    }

    pub fn arm(&mut self, cell: CellIndex, reveal: RevealId, handle: H) {
        if let Some((stale, _)) = self.slots.insert(cell, (reveal, handle)) {
            log::trace!("replaced auto-hide for cell {} ({:?})", cell, stale);
        }
    }

    /// Cancels the timer of `cell` whatever reveal it belongs to.
    pub fn disarm(&mut self, cell: CellIndex) -> bool {
        self.slots.remove(&cell).is_some()
    }

    /// Forgets the timer of `cell` only if it belongs to `reveal`, used once that timer has fired.
    pub fn release(&mut self, cell: CellIndex, reveal: RevealId) -> bool {
        match self.slots.get(&cell) {
            Some((armed, _)) if *armed == reveal => self.slots.remove(&cell).is_some(),
            _ => false,
        }
    }

    pub fn armed_reveal(&self, cell: CellIndex) -> Option<RevealId> {
        self.slots.get(&cell).map(|(reveal, _)| *reveal)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<H> Default for TimerSlots<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell as Counter;

    /// Handle that counts its own cancellation.
    struct Tracked(Rc<Counter<u32>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn arming_twice_cancels_the_first_handle() {
        let dropped = Rc::new(Counter::new(0));
        let mut slots = TimerSlots::new();
        let first = RevealId::FIRST;
        let second = first.next();

        slots.arm(4, first, Tracked(dropped.clone()));
        slots.arm(4, second, Tracked(dropped.clone()));

        assert_eq!(dropped.get(), 1);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.armed_reveal(4), Some(second));
    }

    #[test]
    fn release_only_matches_its_own_reveal() {
        let dropped = Rc::new(Counter::new(0));
        let mut slots = TimerSlots::new();
        let first = RevealId::FIRST;

        slots.arm(1, first.next(), Tracked(dropped.clone()));

        assert!(!slots.release(1, first));
        assert_eq!(dropped.get(), 0);
        assert!(slots.release(1, first.next()));
        assert_eq!(dropped.get(), 1);
        assert!(slots.is_empty());
    }

    #[test]
    fn clear_cancels_everything() {
        let dropped = Rc::new(Counter::new(0));
        let mut slots = TimerSlots::new();
        for cell in 0..5 {
            slots.arm(cell, RevealId::FIRST, Tracked(dropped.clone()));
        }

        slots.clear();

        assert_eq!(dropped.get(), 5);
        assert!(!slots.disarm(0));
    }
}
