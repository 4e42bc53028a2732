//! # sm-engine — Round engine for the three-reel slot machine
//!
//! Owns the play session and runs the round protocol:
//!
//! ```text
//! Idle ──spin──> Spun ──evaluate──> Settled ──check_game_over──> Idle
//!                                                  │
//!                                                  └──> GameOver ──reset_game──> Idle
//! ```
//!
//! Everything outside the session is an injected capability:
//!
//! - `RandomSource` draws reel stops
//! - `ScoreStore` (sm-state) persists the high score
//! - `FeedbackSink` (sm-stage) receives sound/haptic cues

pub mod engine;
pub mod rng;
pub mod session;
pub mod symbols;

pub use engine::*;
pub use rng::*;
pub use session::*;
pub use symbols::*;
