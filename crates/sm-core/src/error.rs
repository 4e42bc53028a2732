//! Error types for Slot Machine

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum SmError {
    #[error("Invalid bet: {0} is not an allowed stake")]
    InvalidBet(i64),

    #[error("Game over: reset the game to keep playing")]
    GameOver,

    #[error("Out of sequence: expected {expected}, engine is {found}")]
    OutOfSequence {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Feedback error: {0}")]
    Feedback(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for SmError {
    fn from(e: serde_json::Error) -> Self {
        SmError::Serialization(e.to_string())
    }
}

/// Result type alias
pub type SmResult<T> = Result<T, SmError>;
