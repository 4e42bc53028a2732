//! Cue — what just happened, from the player's point of view

use std::fmt;

use serde::{Deserialize, Serialize};

/// A feedback cue emitted by the round engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cue {
    /// Reels were spun
    Spin,
    /// Three of a kind, balance stayed at or below the high score
    Win,
    /// Three of a kind that set a new high score
    HighScore,
    /// Balance ran out
    GameOver,
    /// Session was reset
    Reset,
    /// Stake was changed
    BetChanged,
}

impl Cue {
    /// All cues, in emission order of a typical session
    pub const ALL: [Cue; 6] = [
        Cue::Spin,
        Cue::Win,
        Cue::HighScore,
        Cue::GameOver,
        Cue::Reset,
        Cue::BetChanged,
    ];

    /// Wire name of the cue
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Spin => "spin",
            Cue::Win => "win",
            Cue::HighScore => "high-score",
            Cue::GameOver => "game-over",
            Cue::Reset => "reset",
            Cue::BetChanged => "bet-changed",
        }
    }

    /// Parse a wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Cues that celebrate a payout
    pub fn is_celebration(&self) -> bool {
        matches!(self, Cue::Win | Cue::HighScore)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
