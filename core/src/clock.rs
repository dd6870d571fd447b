use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::time::Duration;

use crate::*;

type TimerKey = (u64, u64);

#[derive(Debug, Default)]
struct Timeline {
    now_ms: u64,
    next_seq: u64,
    queue: BTreeMap<TimerKey, TimerEvent>,
}

/// Virtual [`TimerHost`] that only moves when told to.
///
/// Timers fire in due-time order, ties in the order they were scheduled. Clones share the same timeline, so
/// one clone can be moved into a [`Round`] while another advances it.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    timeline: Rc<RefCell<Timeline>>,
}

/// Handle for a [`ManualClock`] timer, cancelling it when dropped.
#[derive(Debug)]
pub struct ManualTimer {
    key: TimerKey,
    timeline: Weak<RefCell<Timeline>>,
}

impl Drop for ManualTimer {
    fn drop(&mut self) {
        if let Some(timeline) = self.timeline.upgrade() {
            timeline.borrow_mut().queue.remove(&self.key);
        }
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        Duration::from_millis(self.timeline.borrow().now_ms)
    }

    /// Number of timers scheduled and not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.timeline.borrow().queue.len()
    }

    pub fn pending_events(&self) -> Vec<TimerEvent> {
        self.timeline.borrow().queue.values().copied().collect()
    }

    /// Pending timers with the virtual time they fall due at, earliest first.
    pub fn pending_timers(&self) -> Vec<(Duration, TimerEvent)> {
        self.timeline
            .borrow()
            .queue
            .iter()
            .map(|(&(due_ms, _), &event)| (Duration::from_millis(due_ms), event))
            .collect()
    }

    /// Moves time forward by `by`, delivering every timer that falls due to `round`, including timers the
    /// round schedules along the way. Returns the updates in firing order.
    pub fn advance(&self, round: &mut Round<ManualClock>, by: Duration) -> Vec<RoundUpdate> {
        let target = self.timeline.borrow().now_ms + by.as_millis() as u64;
        let mut updates = Vec::new();

        while let Some(event) = self.pop_due(target) {
            updates.push(round.handle(event));
        }

        self.timeline.borrow_mut().now_ms = target;
        updates
    }

    fn pop_due(&self, target: u64) -> Option<TimerEvent> {
        let mut timeline = self.timeline.borrow_mut();
        let (&key, _) = timeline.queue.first_key_value()?;
        if key.0 > target {
            return None;
        }
        timeline.now_ms = key.0;
        timeline.queue.remove(&key)
    }
}

impl TimerHost for ManualClock {
    type Handle = ManualTimer;

    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> Self::Handle {
        let mut timeline = self.timeline.borrow_mut();
        let key = (timeline.now_ms + delay.as_millis() as u64, timeline.next_seq);
        timeline.next_seq += 1;
        timeline.queue.insert(key, event);

        ManualTimer {
            key,
            timeline: Rc::downgrade(&self.timeline),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: TimerKind) -> TimerEvent {
        TimerEvent { epoch: 0, kind }
    }

    #[test]
    fn dropping_a_handle_cancels_the_timer() {
        let mut clock = ManualClock::new();

        let handle = clock.schedule(Duration::from_millis(10), event(TimerKind::Tick));
        let _kept = clock.schedule(Duration::from_millis(20), event(TimerKind::RevealAttempt));
        assert_eq!(clock.pending(), 2);

        drop(handle);

        assert_eq!(clock.pending_events(), [event(TimerKind::RevealAttempt)]);
    }

    #[test]
    fn pop_due_respects_time_then_sequence() {
        let mut clock = ManualClock::new();
        let _a = clock.schedule(Duration::from_millis(30), event(TimerKind::Tick));
        let _b = clock.schedule(Duration::from_millis(10), event(TimerKind::RevealAttempt));
        let _c = clock.schedule(Duration::from_millis(10), event(TimerKind::Tick));

        assert_eq!(clock.pop_due(20), Some(event(TimerKind::RevealAttempt)));
        assert_eq!(clock.pop_due(20), Some(event(TimerKind::Tick)));
        assert_eq!(clock.now(), Duration::from_millis(10));
        assert_eq!(clock.pop_due(20), None);
        assert_eq!(clock.pending(), 1);
    }
}
