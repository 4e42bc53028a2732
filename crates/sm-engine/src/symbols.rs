//! Reel symbols and spin outcomes

use serde::{Deserialize, Serialize};
use sm_core::REEL_COUNT;

/// A reel symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Symbol {
    Bell = 0,
    Coin = 1,
    Grape = 2,
    Seven = 3,
    Cherry = 4,
    Strawberry = 5,
}

impl Symbol {
    /// Number of distinct symbols on a reel
    pub const COUNT: usize = 6;

    /// All symbols in index order
    pub const ALL: [Symbol; Self::COUNT] = [
        Symbol::Bell,
        Symbol::Coin,
        Symbol::Grape,
        Symbol::Seven,
        Symbol::Cherry,
        Symbol::Strawberry,
    ];

    /// Symbol at index (wraps around)
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Bell => "bell",
            Symbol::Coin => "coin",
            Symbol::Grape => "grape",
            Symbol::Seven => "seven",
            Symbol::Cherry => "cherry",
            Symbol::Strawberry => "strawberry",
        }
    }
}

/// The symbols showing on the three reels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelOutcome([Symbol; REEL_COUNT]);

impl ReelOutcome {
    pub fn new(symbols: [Symbol; REEL_COUNT]) -> Self {
        Self(symbols)
    }

    /// Build from raw indices (each wraps into the symbol range)
    pub fn from_indices(indices: [usize; REEL_COUNT]) -> Self {
        Self(indices.map(Symbol::from_index))
    }

    /// What the machine shows before its first spin
    pub fn initial() -> Self {
        Self::from_indices([0, 1, 2])
    }

    pub fn symbols(&self) -> &[Symbol; REEL_COUNT] {
        &self.0
    }

    pub fn indices(&self) -> [usize; REEL_COUNT] {
        self.0.map(Symbol::index)
    }

    /// The only winning combination: every reel shows the same symbol
    pub fn is_three_of_a_kind(&self) -> bool {
        let [first, rest @ ..] = &self.0;
        rest.iter().all(|s| s == first)
    }
}

impl Default for ReelOutcome {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, symbol) in Symbol::ALL.iter().enumerate() {
            assert_eq!(symbol.index(), i);
            assert_eq!(Symbol::from_index(i), *symbol);
        }
    }

    #[test]
    fn test_from_index_wraps() {
        assert_eq!(Symbol::from_index(6), Symbol::Bell);
        assert_eq!(Symbol::from_index(11), Symbol::Strawberry);
    }

    #[test]
    fn test_initial_reels() {
        let reels = ReelOutcome::initial();
        assert_eq!(reels.indices(), [0, 1, 2]);
        assert_eq!(
            reels.symbols(),
            &[Symbol::Bell, Symbol::Coin, Symbol::Grape]
        );
        assert!(!reels.is_three_of_a_kind());
    }

    #[test]
    fn test_three_of_a_kind_only() {
        assert!(ReelOutcome::from_indices([4, 4, 4]).is_three_of_a_kind());
        assert!(!ReelOutcome::from_indices([4, 4, 5]).is_three_of_a_kind());
        assert!(!ReelOutcome::from_indices([5, 4, 4]).is_three_of_a_kind());
        assert!(!ReelOutcome::from_indices([4, 5, 4]).is_three_of_a_kind());
    }
}
