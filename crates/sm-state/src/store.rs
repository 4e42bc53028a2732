//! Score store capability and the in-memory store

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use sm_core::{SmError, SmResult};

/// Durable integer slots addressed by key
pub trait ScoreStore {
    /// Read a slot; `Ok(None)` when it was never written
    fn read(&self, key: &str) -> SmResult<Option<i64>>;

    /// Write a slot
    fn write(&mut self, key: &str, value: i64) -> SmResult<()>;
}

/// Volatile store backed by a shared map
///
/// Clones share the map, so a handle kept outside the engine observes
/// every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<BTreeMap<String, i64>>>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one slot
    pub fn with_value(key: impl Into<String>, value: i64) -> Self {
        let store = Self::new();
        store.slots.lock().insert(key.into(), value);
        store
    }

    /// Store whose every read and write fails
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Current value of a slot, bypassing failure injection
    pub fn peek(&self, key: &str) -> Option<i64> {
        self.slots.lock().get(key).copied()
    }

    fn check(&self) -> SmResult<()> {
        if self.failing {
            return Err(SmError::StorageUnavailable("memory store offline".into()));
        }
        Ok(())
    }
}

impl ScoreStore for MemoryStore {
    fn read(&self, key: &str) -> SmResult<Option<i64>> {
        self.check()?;
        Ok(self.peek(key))
    }

    fn write(&mut self, key: &str, value: i64) -> SmResult<()> {
        self.check()?;
        self.slots.lock().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key_reads_none() {
        let store = MemoryStore::new();
        assert_eq!(store.read("HighScore").unwrap(), None);
    }

    #[test]
    fn test_clones_share_slots() {
        let observer = MemoryStore::with_value("HighScore", 50);
        let mut handle = observer.clone();

        handle.write("HighScore", 200).unwrap();
        assert_eq!(observer.peek("HighScore"), Some(200));
    }

    #[test]
    fn test_failing_store() {
        let mut store = MemoryStore::failing();
        assert!(matches!(
            store.read("HighScore"),
            Err(SmError::StorageUnavailable(_))
        ));
        assert!(store.write("HighScore", 10).is_err());
        assert_eq!(store.peek("HighScore"), None);
    }
}
