use core::fmt;
use serde::{Deserialize, Serialize};

use crate::NameError;

/// Firestore collection holding one [`LeaderboardEntry`] per player.
pub const LEADERBOARD_COLLECTION: &str = "leaderboard";

/// Number of entries shown on the leaderboard.
pub const LEADERBOARD_SIZE: u32 = 10;

/// A player's best score. The uid doubles as the document key, so every player has at most one entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub uid: String,
    pub name: String,
    pub score: u32,
}

/// Orders entries for display: highest score first, ties by name.
pub fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
}

/// Display name entered at the end of a round, trimmed and non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub const MAX_CHARS: usize = 32;

    pub fn parse(input: &str) -> Result<Self, NameError> {
        let name = input.trim();
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.chars().count() > Self::MAX_CHARS {
            return Err(NameError::TooLong {
                max: Self::MAX_CHARS,
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a submission did to the store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// First score for this player, stored.
    Saved,
    /// Beat the stored score, overwritten.
    NewHighScore,
    /// Did not beat the stored score, nothing written.
    NotHighScore,
}

impl SubmitOutcome {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Saved => "score saved",
            Self::NewHighScore => "new high score",
            Self::NotHighScore => "not a new high score",
        }
    }

    pub const fn wrote(self) -> bool {
        !matches!(self, Self::NotHighScore)
    }
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
