use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Pre-game screen, the clock shows a full round.
    Ready,
    Active,
    /// Time ran out, the final score is waiting to be submitted.
    Finished,
}

impl SessionState {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Score, clock and grid of one play-through.
///
/// This is pure state: it never schedules anything itself. [`Round`] owns the timers that drive it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    grid: Grid,
    countdown: Countdown,
    score: Score,
    state: SessionState,
    next_reveal: RevealId,
}

impl Session {
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            countdown: Countdown::default(),
            score: 0,
            state: Default::default(),
            next_reveal: RevealId::FIRST,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn remaining(&self) -> TimeLeft {
        self.countdown.remaining()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&mut self) {
        self.restart(SessionState::Active);
    }

    pub fn reset(&mut self) {
        self.restart(SessionState::Ready);
    }

    fn restart(&mut self, state: SessionState) {
        self.grid.clear();
        self.countdown = Countdown::default();
        self.score = 0;
        self.state = state;
    }

    /// Whacks `cell`, scoring a point only when a mole is currently up there.
    pub fn hit(&mut self, cell: CellIndex) -> Result<HitOutcome> {
        let cell = self.grid.validate_cell(cell)?;

        if !self.is_active() {
            return Ok(HitOutcome::Missed);
        }

        Ok(match self.grid.hide(cell) {
            Some(reveal) => {
                self.score = self.score.saturating_add(1);
                HitOutcome::Hit(reveal)
            }
            None => HitOutcome::Missed,
        })
    }

    /// Shows a mole at `cell` under a freshly allocated reveal id.
    pub fn reveal(&mut self, cell: CellIndex) -> Result<RevealOutcome> {
        let cell = self.grid.validate_cell(cell)?;

        if !self.is_active() {
            return Ok(RevealOutcome::NoChange);
        }

        let id = self.next_reveal;
        if self.grid.reveal(cell, id) {
            self.next_reveal = id.next();
            Ok(RevealOutcome::Revealed(id))
        } else {
            Ok(RevealOutcome::NoChange)
        }
    }

    /// Auto-hide for reveal `id` at `cell`. Leaves the cell alone if it was hit or re-revealed since.
    pub fn expire(&mut self, cell: CellIndex, id: RevealId) -> Result<bool> {
        let cell = self.grid.validate_cell(cell)?;
        Ok(self.grid.hide_if(cell, id))
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_active() {
            return TickOutcome::NoChange;
        }

        let outcome = self.countdown.tick();
        if outcome == TickOutcome::Expired {
            self.finish();
        }
        outcome
    }

    fn finish(&mut self) {
        self.countdown.expire();
        self.grid.clear();
        self.state = SessionState::Finished;
        log::debug!("session finished with score {}", self.score);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
