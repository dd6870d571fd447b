use serde::{Deserialize, Serialize};

use crate::RevealId;

/// State of one hole in the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Revealed(RevealId),
}

impl Cell {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    pub const fn reveal_id(self) -> Option<RevealId> {
        match self {
            Self::Hidden => None,
            Self::Revealed(id) => Some(id),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}
