use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::StorageError;

/// A directory of JSON state files, one per key.
///
/// Writes go through a temp file and rename so a crash never leaves a
/// half-written record behind.
#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The default per-user location, e.g. `~/.local/share/meldo`.
    pub fn default_dir() -> Result<Self, StorageError> {
        let base = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Ok(Self::new(base.join("meldo")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Load and deserialize the value stored under `key`. A missing file
    /// is `Ok(None)`; a present but unreadable/corrupt file is an error
    /// the caller may choose to treat as absent.
    pub fn load_state<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.path_for(key);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::Read {
                    key: key.to_string(),
                    source: e,
                });
            }
        };
        let value = serde_json::from_str(&contents)?;
        Ok(Some(value))
    }

    /// Serialize `value` as pretty JSON under `key`, atomically.
    pub fn save_state<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let io = |source| StorageError::Write {
            key: key.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.root).map_err(io)?;

        let json = serde_json::to_string_pretty(value)?;
        let path = self.path_for(key);
        let tmp_path = self.root.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp_path, json.as_bytes()).map_err(io)?;
        std::fs::rename(&tmp_path, &path).map_err(io)?;

        debug!(key, path = %path.display(), "state saved");
        Ok(())
    }

    /// Remove the record under `key`, if present.
    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Write {
                key: key.to_string(),
                source: e,
            }),
        }
    }
}
