//! Session state, statistics, and round reports

use serde::{Deserialize, Serialize};
use sm_core::{GameConfig, REEL_COUNT};

use crate::symbols::ReelOutcome;

/// Mutable state of one play session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Coin balance; may dip below zero right before the game-over check
    pub coins: i64,
    /// Current stake, always one of the allowed bets
    pub bet: i64,
    /// Best balance ever reached, persisted across sessions
    pub high_score: i64,
    /// Last spin result
    pub reels: ReelOutcome,
    /// Set when the balance ran out, cleared only by a reset
    pub game_over: bool,
    /// Rounds spun since the session started or was reset
    pub round: u64,
}

impl Session {
    pub fn new(config: &GameConfig, high_score: i64) -> Self {
        Self {
            coins: config.starting_coins,
            bet: config.default_bet,
            high_score,
            reels: ReelOutcome::initial(),
            game_over: false,
            round: 0,
        }
    }
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub spins: u64,
    pub wins: u64,
    pub losses: u64,
    pub coins_won: i64,
    pub coins_lost: i64,
    pub best_balance: i64,
}

impl SessionStats {
    pub(crate) fn starting_at(coins: i64) -> Self {
        Self {
            best_balance: coins,
            ..Self::default()
        }
    }

    pub(crate) fn record(&mut self, settlement: &Settlement, balance: i64) {
        match *settlement {
            Settlement::Win { payout, .. } => {
                self.wins += 1;
                self.coins_won += payout;
            }
            Settlement::Loss { stake } => {
                self.losses += 1;
                self.coins_lost += stake;
            }
        }
        self.best_balance = self.best_balance.max(balance);
    }

    /// Net coins won (negative when down)
    pub fn net(&self) -> i64 {
        self.coins_won - self.coins_lost
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let settled = self.wins + self.losses;
        if settled > 0 {
            (self.wins as f64 / settled as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Where the engine is inside the round protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    /// Waiting for an intent
    Idle,
    /// Reels drawn, not yet evaluated
    Spun,
    /// Coins settled, game-over check pending
    Settled,
    /// Balance ran out; only a reset leaves this phase
    GameOver,
}

impl RoundPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RoundPhase::Idle => "idle",
            RoundPhase::Spun => "spun",
            RoundPhase::Settled => "settled",
            RoundPhase::GameOver => "game_over",
        }
    }
}

/// How a spin settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Settlement {
    /// Three of a kind paid out
    Win { payout: i64, new_high_score: bool },
    /// Stake was lost
    Loss { stake: i64 },
}

impl Settlement {
    pub fn is_win(&self) -> bool {
        matches!(self, Settlement::Win { .. })
    }

    /// Signed balance change
    pub fn delta(&self) -> i64 {
        match *self {
            Settlement::Win { payout, .. } => payout,
            Settlement::Loss { stake } => -stake,
        }
    }
}

/// Result of one complete spin intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u64,
    pub reels: ReelOutcome,
    pub settlement: Settlement,
    pub coins: i64,
    pub high_score: i64,
    pub game_over: bool,
}

/// Everything the presentation surface needs to draw the machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub coins: i64,
    pub high_score: i64,
    pub bet: i64,
    pub allowed_bets: Vec<i64>,
    pub reels: [usize; REEL_COUNT],
    pub symbols: [String; REEL_COUNT],
    pub game_over: bool,
    pub phase: RoundPhase,
    pub round: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_uses_config() {
        let session = Session::new(&GameConfig::classic(), 50);
        assert_eq!(session.coins, 100);
        assert_eq!(session.bet, 10);
        assert_eq!(session.high_score, 50);
        assert_eq!(session.reels, ReelOutcome::initial());
        assert!(!session.game_over);
    }

    #[test]
    fn test_stats_record() {
        let mut stats = SessionStats::starting_at(100);
        stats.record(&Settlement::Loss { stake: 10 }, 90);
        stats.record(
            &Settlement::Win {
                payout: 100,
                new_high_score: true,
            },
            190,
        );
        stats.record(&Settlement::Loss { stake: 20 }, 170);

        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 2);
        assert_eq!(stats.net(), 70);
        assert_eq!(stats.best_balance, 190);
        assert!((stats.hit_rate() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_settlement_serializes_tagged() {
        let json = serde_json::to_value(Settlement::Loss { stake: 20 }).unwrap();
        assert_eq!(json["type"], "loss");
        assert_eq!(json["stake"], 20);
    }
}
