//! Feedback sinks — where cues go

use std::sync::Arc;

use parking_lot::Mutex;
use sm_core::SmResult;

use crate::cue::Cue;
use crate::event::CueEvent;

/// Receives cues from the engine
///
/// Implementations trigger sound, haptics, or anything else. Errors are
/// reported but the engine discards them.
pub trait FeedbackSink {
    /// Play one cue
    fn play(&mut self, event: &CueEvent) -> SmResult<()>;
}

/// Drops every cue (muted machine)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FeedbackSink for NullSink {
    fn play(&mut self, _event: &CueEvent) -> SmResult<()> {
        Ok(())
    }
}

/// Logs each cue at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl FeedbackSink for LogSink {
    fn play(&mut self, event: &CueEvent) -> SmResult<()> {
        log::info!(
            "cue {} (round {}, coins {})",
            event.cue,
            event.round,
            event.coins
        );
        Ok(())
    }
}

/// Records cues into a shared buffer
///
/// Clones share the buffer, so a clone kept outside the engine sees every
/// cue the boxed sink received.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<CueEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first
    pub fn events(&self) -> Vec<CueEvent> {
        self.events.lock().clone()
    }

    /// Just the cues, oldest first
    pub fn cues(&self) -> Vec<Cue> {
        self.events.lock().iter().map(|e| e.cue).collect()
    }

    /// Has `cue` been recorded at least once?
    pub fn contains(&self, cue: Cue) -> bool {
        self.events.lock().iter().any(|e| e.cue == cue)
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl FeedbackSink for RecordingSink {
    fn play(&mut self, event: &CueEvent) -> SmResult<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
