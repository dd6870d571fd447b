use core::fmt;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for grid rows and columns.
pub type Coord = u8;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Linear, row-major index of a grid cell.
pub type CellIndex = u8;

/// Points earned in a session.
pub type Score = u32;

pub const GRID_ROWS: Coord = 3;
pub const GRID_COLS: Coord = 3;
pub const GRID_CELLS: usize = GRID_ROWS as usize * GRID_COLS as usize;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn cell_coords(cell: CellIndex) -> Coord2 {
    (cell / GRID_COLS, cell % GRID_COLS)
}

pub const fn cell_index((row, col): Coord2) -> CellIndex {
    row * GRID_COLS + col
}

/// Identifies one appearance of a mole. Allocated fresh for every reveal within a session so that a timer
/// armed for an earlier appearance can never act on a later one at the same cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RevealId(u32);

impl RevealId {
    pub const FIRST: Self = Self(0);

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Remaining round time in whole centiseconds.
///
/// Kept as an integer so that repeated decrements never drift, displayed with two decimals.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeLeft(u16);

impl TimeLeft {
    pub const ZERO: Self = Self(0);

    /// Length of a full round, 13 seconds.
    pub const ROUND: Self = Self(1300);

    /// Amount consumed by one countdown tick.
    pub const TICK: Self = Self(10);

    pub const fn from_centis(centis: u16) -> Self {
        Self(centis)
    }

    pub const fn centis(self) -> u16 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
