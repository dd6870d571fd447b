use core::time::Duration;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundUpdate {
    NoChange,
    Changed,
    /// The round just ran out of time.
    Finished,
}

impl RoundUpdate {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Drives a [`Session`] with timers from a [`TimerHost`].
///
/// Three kinds of timer run while a round is active: the countdown tick, the next reveal attempt and one
/// auto-hide per revealed cell. The round holds every handle, so ending, resetting or dropping it cancels them
/// all. Events also carry the epoch they were scheduled in and are ignored once the epoch moved on.
pub struct Round<H: TimerHost> {
    session: Session,
    scheduler: MoleScheduler,
    host: H,
    epoch: u32,
    tick_timer: Option<H::Handle>,
    reveal_timer: Option<H::Handle>,
    hide_timers: TimerSlots<H::Handle>,
}

impl<H: TimerHost> Round<H> {
    pub fn new(host: H, scheduler: MoleScheduler) -> Self {
        Self {
            session: Session::new(),
            scheduler,
            host,
            epoch: 0,
            tick_timer: None,
            reveal_timer: None,
            hide_timers: TimerSlots::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Number of auto-hide timers still armed.
    pub fn pending_auto_hides(&self) -> usize {
        self.hide_timers.len()
    }

    /// Whether any timer at all is still armed.
    pub fn has_pending_timers(&self) -> bool {
        self.tick_timer.is_some() || self.reveal_timer.is_some() || !self.hide_timers.is_empty()
    }

    pub fn start(&mut self) {
        self.cancel_timers();
        self.session.start();
        log::debug!("round {} started", self.epoch);

        self.tick_timer = Some(self.schedule(TICK_INTERVAL, TimerKind::Tick));
        let first_attempt = self.scheduler.cadence().next_delay(self.session.remaining());
        self.reveal_timer = Some(self.schedule(first_attempt, TimerKind::RevealAttempt));
    }

    pub fn reset(&mut self) {
        self.cancel_timers();
        self.session.reset();
        log::debug!("round reset");
    }

    /// Stops every timer without touching the session, used when the view goes away.
    pub fn teardown(&mut self) {
        self.cancel_timers();
    }

    pub fn hit(&mut self, cell: CellIndex) -> Result<RoundUpdate> {
        Ok(match self.session.hit(cell)? {
            HitOutcome::Hit(reveal) => {
                log::trace!("hit cell {} ({:?})", cell, reveal);
                self.hide_timers.disarm(cell);
                RoundUpdate::Changed
            }
            HitOutcome::Missed => RoundUpdate::NoChange,
        })
    }

    /// Shows a mole at `cell` that hides itself after `hide_after`.
    pub fn reveal(&mut self, cell: CellIndex, hide_after: Duration) -> Result<RoundUpdate> {
        Ok(match self.session.reveal(cell)? {
            RevealOutcome::Revealed(reveal) => {
                let handle = self.schedule(hide_after, TimerKind::AutoHide { cell, reveal });
                self.hide_timers.arm(cell, reveal, handle);
                RoundUpdate::Changed
            }
            RevealOutcome::NoChange => RoundUpdate::NoChange,
        })
    }

    pub fn handle(&mut self, event: TimerEvent) -> RoundUpdate {
        if event.epoch != self.epoch {
            log::debug!("dropping stale timer event {:?}", event);
            return RoundUpdate::NoChange;
        }

        match event.kind {
            TimerKind::Tick => self.on_tick(),
            TimerKind::RevealAttempt => self.on_reveal_attempt(),
            TimerKind::AutoHide { cell, reveal } => self.on_auto_hide(cell, reveal),
        }
    }

    fn on_tick(&mut self) -> RoundUpdate {
        match self.session.tick() {
            TickOutcome::NoChange => {
                self.tick_timer = None;
                RoundUpdate::NoChange
            }
            TickOutcome::Ticked => {
                self.tick_timer = Some(self.schedule(TICK_INTERVAL, TimerKind::Tick));
                RoundUpdate::Changed
            }
            TickOutcome::Expired => {
                self.cancel_timers();
                log::debug!("round finished, score {}", self.session.score());
                RoundUpdate::Finished
            }
        }
    }

    fn on_reveal_attempt(&mut self) -> RoundUpdate {
        if !self.session.is_active() {
            self.reveal_timer = None;
            return RoundUpdate::NoChange;
        }

        let attempt = self
            .scheduler
            .attempt(self.session.grid(), self.session.remaining());
        self.reveal_timer = Some(self.schedule(attempt.next_in, TimerKind::RevealAttempt));

        match attempt.pick {
            Some(pick) => self
                .reveal(pick.cell, pick.hide_after)
                .unwrap_or(RoundUpdate::NoChange),
            None => RoundUpdate::NoChange,
        }
    }

    fn on_auto_hide(&mut self, cell: CellIndex, reveal: RevealId) -> RoundUpdate {
        self.hide_timers.release(cell, reveal);
        match self.session.expire(cell, reveal) {
            Ok(true) => RoundUpdate::Changed,
            Ok(false) => RoundUpdate::NoChange,
            Err(err) => {
                log::warn!("auto-hide for cell {}: {}", cell, err);
                RoundUpdate::NoChange
            }
        }
    }

    fn schedule(&mut self, delay: Duration, kind: TimerKind) -> H::Handle {
        let event = TimerEvent {
            epoch: self.epoch,
            kind,
        };
        self.host.schedule(delay, event)
    }

    fn cancel_timers(&mut self) {
        self.tick_timer = None;
        self.reveal_timer = None;
        self.hide_timers.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }
}
