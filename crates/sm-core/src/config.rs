//! Game configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SmError, SmResult};
use crate::HIGH_SCORE_KEY;

/// Economy settings for one machine
///
/// Reel and symbol counts are fixed; only the coin economy is tunable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Coins the player starts (and restarts) with
    pub starting_coins: i64,
    /// Stake selected at start and after a reset
    pub default_bet: i64,
    /// Stakes the player may choose from
    pub allowed_bets: Vec<i64>,
    /// Three-of-a-kind pays `bet * payout_multiplier`
    pub payout_multiplier: i64,
    /// Storage key for the persisted high score
    pub high_score_key: String,
}

impl GameConfig {
    /// The classic machine: 100 coins, stakes of 10 or 20, 10x payout
    pub fn classic() -> Self {
        Self {
            starting_coins: 100,
            default_bet: 10,
            allowed_bets: vec![10, 20],
            payout_multiplier: 10,
            high_score_key: HIGH_SCORE_KEY.to_string(),
        }
    }

    /// Is `amount` one of the allowed stakes?
    pub fn is_allowed_bet(&self, amount: i64) -> bool {
        self.allowed_bets.contains(&amount)
    }

    /// Check internal consistency
    pub fn validate(&self) -> SmResult<()> {
        if self.allowed_bets.is_empty() {
            return Err(SmError::InvalidConfig("allowed_bets is empty".into()));
        }
        if let Some(bad) = self.allowed_bets.iter().find(|&&b| b <= 0) {
            return Err(SmError::InvalidConfig(format!(
                "bet {bad} must be positive"
            )));
        }
        if !self.is_allowed_bet(self.default_bet) {
            return Err(SmError::InvalidConfig(format!(
                "default_bet {} is not in allowed_bets {:?}",
                self.default_bet, self.allowed_bets
            )));
        }
        if self.starting_coins <= 0 {
            return Err(SmError::InvalidConfig(
                "starting_coins must be positive".into(),
            ));
        }
        if self.payout_multiplier <= 0 {
            return Err(SmError::InvalidConfig(
                "payout_multiplier must be positive".into(),
            ));
        }
        if self.high_score_key.trim().is_empty() {
            return Err(SmError::InvalidConfig("high_score_key is empty".into()));
        }
        Ok(())
    }

    /// Load a config from a JSON file; absent fields keep their defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> SmResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}
