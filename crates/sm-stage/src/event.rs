//! CueEvent — a cue occurrence with session context

use serde::{Deserialize, Serialize};

use crate::cue::Cue;

/// A cue together with the session state it was emitted in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueEvent {
    /// The cue
    pub cue: Cue,
    /// Round number within the session (0 before the first spin)
    pub round: u64,
    /// Coin balance when the cue fired
    pub coins: i64,
}

impl CueEvent {
    /// Create a new cue event
    pub fn new(cue: Cue, round: u64, coins: i64) -> Self {
        Self { cue, round, coins }
    }
}
