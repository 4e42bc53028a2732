//! sm-state: High-score persistence
//!
//! A tiny key-value surface the engine reads once at start and writes on
//! every new high score or clearing reset.

mod file;
mod store;

pub use file::*;
pub use store::*;
