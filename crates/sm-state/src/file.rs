//! JSON file store
//!
//! Slots are kept in a single pretty-printed JSON object:
//!
//! ```json
//! { "HighScore": 200 }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sm_core::{SmError, SmResult};

use crate::store::ScoreStore;

/// File name inside the application directory
const STORE_FILE: &str = "scores.json";

/// Application directory under the platform config dir
const APP_DIR: &str = "slot-machine";

/// Score store persisted to a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at the standard per-user location
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Store at a specific path (created lazily on first write)
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default store file: `<config dir>/slot-machine/scores.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(STORE_FILE)
    }

    /// Raw file contents; `None` when the file does not exist yet
    fn read_raw(&self) -> SmResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.unavailable(e)),
        }
    }

    fn parse(&self, content: &str) -> SmResult<BTreeMap<String, i64>> {
        serde_json::from_str(content).map_err(|e| self.unavailable(e))
    }

    fn unavailable(&self, e: impl std::fmt::Display) -> SmError {
        SmError::StorageUnavailable(format!("{}: {e}", self.path.display()))
    }

    fn save(&self, slots: &BTreeMap<String, i64>) -> SmResult<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.unavailable(e))?;
        }

        let json = serde_json::to_string_pretty(slots)?;
        fs::write(&self.path, json).map_err(|e| self.unavailable(e))
    }
}

impl ScoreStore for JsonFileStore {
    fn read(&self, key: &str) -> SmResult<Option<i64>> {
        match self.read_raw()? {
            Some(content) => Ok(self.parse(&content)?.get(key).copied()),
            None => Ok(None),
        }
    }

    fn write(&mut self, key: &str, value: i64) -> SmResult<()> {
        // Only an unparseable file is replaced; I/O errors leave it untouched
        let mut slots = match self.read_raw()? {
            Some(content) => self.parse(&content).unwrap_or_else(|e| {
                log::warn!("Replacing corrupt score file: {}", e);
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        slots.insert(key.to_string(), value);
        self.save(&slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_layout() {
        let path = JsonFileStore::default_path();
        assert_eq!(path.file_name().unwrap(), STORE_FILE);
        assert_eq!(path.parent().unwrap().file_name().unwrap(), APP_DIR);
    }

    #[test]
    fn test_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("absent.json"));
        assert_eq!(store.read("HighScore").unwrap(), None);
    }
}
