//! sm-core: Shared types and configuration for Slot Machine
//!
//! This crate provides the error type and game configuration used across
//! all Slot Machine crates.

mod config;
mod error;

pub use config::*;
pub use error::*;

/// Number of reels on the machine
pub const REEL_COUNT: usize = 3;

/// Storage key the high score lives under
pub const HIGH_SCORE_KEY: &str = "HighScore";
