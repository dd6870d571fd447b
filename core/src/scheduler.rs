use core::ops::Range;
use core::time::Duration;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Delay between reveal attempts at normal pace.
pub const REVEAL_INTERVAL: Duration = Duration::from_millis(500);

/// Remaining time at or below which the time-scaled cadence speeds up.
pub const RUSH_THRESHOLD: TimeLeft = TimeLeft::from_centis(500);

/// How long a revealed mole stays up, in milliseconds, before hiding itself.
pub const AUTO_HIDE_MILLIS: Range<u64> = 500..1500;

/// How often the scheduler tries to reveal another mole.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cadence {
    /// An attempt every [`REVEAL_INTERVAL`].
    Fixed,
    /// Three times as often once the round is down to [`RUSH_THRESHOLD`].
    TimeScaled,
}

impl Cadence {
    pub fn next_delay(self, remaining: TimeLeft) -> Duration {
        match self {
            Self::Fixed => REVEAL_INTERVAL,
            Self::TimeScaled if remaining > RUSH_THRESHOLD => REVEAL_INTERVAL,
            Self::TimeScaled => REVEAL_INTERVAL / 3,
        }
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self::Fixed
    }
}

/// Mole picked by one reveal attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MolePick {
    pub cell: CellIndex,
    pub hide_after: Duration,
}

/// Result of one reveal attempt: possibly a mole, and when to try again.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Attempt {
    pub pick: Option<MolePick>,
    pub next_in: Duration,
}

#[derive(Clone, Debug)]
pub struct MoleScheduler {
    cadence: Cadence,
    rng: SmallRng,
}

impl MoleScheduler {
    pub fn new(seed: u64, cadence: Cadence) -> Self {
        Self {
            cadence,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Decides one reveal cycle against `grid`, given the remaining time at the moment of the attempt.
    ///
    /// Half of all cycles are skipped outright; otherwise a hidden cell is chosen uniformly. A full grid
    /// also skips.
    pub fn attempt(&mut self, grid: &Grid, remaining: TimeLeft) -> Attempt {
        let next_in = self.cadence.next_delay(remaining);
        Attempt {
            pick: self.pick(grid),
            next_in,
        }
    }

    fn pick(&mut self, grid: &Grid) -> Option<MolePick> {
        if !self.rng.random_bool(0.5) {
            return None;
        }

        let hidden = grid.hidden_cells();
        if hidden.is_empty() {
            log::trace!("no hidden cell left to reveal");
            return None;
        }

        let cell = hidden[self.rng.random_range(0..hidden.len())];
        let hide_after = Duration::from_millis(self.rng.random_range(AUTO_HIDE_MILLIS));
        Some(MolePick { cell, hide_after })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_cadence_ignores_remaining_time() {
        assert_eq!(Cadence::Fixed.next_delay(TimeLeft::ROUND), REVEAL_INTERVAL);
        assert_eq!(
            Cadence::Fixed.next_delay(TimeLeft::from_centis(10)),
            REVEAL_INTERVAL
        );
    }

    #[test]
    fn time_scaled_cadence_speeds_up_in_the_last_five_seconds() {
        let cadence = Cadence::TimeScaled;

        assert_eq!(cadence.next_delay(TimeLeft::from_centis(510)), REVEAL_INTERVAL);
        assert_eq!(cadence.next_delay(RUSH_THRESHOLD), REVEAL_INTERVAL / 3);
        assert_eq!(cadence.next_delay(TimeLeft::from_centis(10)).as_millis(), 166);
    }

    #[test]
    fn picks_stay_within_hidden_cells_and_delay_window() {
        let mut grid = Grid::new();
        for cell in [0, 1, 2, 4, 5, 6, 8] {
            grid.reveal(cell, RevealId::FIRST);
        }
        let mut scheduler = MoleScheduler::new(7, Cadence::Fixed);

        let mut picked = 0;
        for _ in 0..200 {
            let attempt = scheduler.attempt(&grid, TimeLeft::ROUND);
            assert_eq!(attempt.next_in, REVEAL_INTERVAL);
            if let Some(pick) = attempt.pick {
                picked += 1;
                assert!(pick.cell == 3 || pick.cell == 7, "picked {}", pick.cell);
                assert!(AUTO_HIDE_MILLIS.contains(&(pick.hide_after.as_millis() as u64)));
            }
        }

        // Coin flip at p = 0.5 over 200 draws.
        assert!((40..160).contains(&picked), "picked {picked} times");
    }

    #[test]
    fn full_grid_never_picks() {
        let mut grid = Grid::new();
        for cell in 0..GRID_CELLS as CellIndex {
            grid.reveal(cell, RevealId::FIRST);
        }
        let mut scheduler = MoleScheduler::new(1, Cadence::TimeScaled);

        for _ in 0..50 {
            assert_eq!(scheduler.attempt(&grid, TimeLeft::ROUND).pick, None);
        }
    }

    #[test]
    fn same_seed_gives_same_sequence() {
        let grid = Grid::new();
        let mut a = MoleScheduler::new(42, Cadence::Fixed);
        let mut b = MoleScheduler::new(42, Cadence::Fixed);

        for _ in 0..20 {
            assert_eq!(
                a.attempt(&grid, TimeLeft::ROUND),
                b.attempt(&grid, TimeLeft::ROUND)
            );
        }
    }

    #[test]
    fn cadence_uses_kebab_case_names() {
        assert_eq!(
            serde_json::to_string(&Cadence::TimeScaled).unwrap(),
            "\"time-scaled\""
        );
    }
}
