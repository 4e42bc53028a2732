//! # sm-stage — Feedback cue vocabulary
//!
//! Defines the moments of a round that sound and haptics respond to.
//! The engine never knows how a cue is rendered, only that it happened.
//!
//! ```text
//! RoundEngine ──CueEvent──> FeedbackSink (audio, haptics, log, ...)
//! ```
//!
//! Sinks are fire-and-forget: a sink error never changes engine state.

pub mod cue;
pub mod event;
pub mod sink;

pub use cue::*;
pub use event::*;
pub use sink::*;
