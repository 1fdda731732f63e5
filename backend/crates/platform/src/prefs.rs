//! Local Preference Storage
//!
//! Small string key-value storage for client-held preferences (theme,
//! streaming settings). Values are untyped strings; typed parsing is the
//! caller's concern, mirroring how browser local storage behaves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Error when loading or persisting preferences
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("Failed to read preference file: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to write preference file: {0}")]
    Write(#[source] std::io::Error),

    #[error("Preference file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// String key-value preference storage
pub trait PrefStore: Send + Sync {
    /// Get a stored value
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value
    fn set(&self, key: &str, value: &str);

    /// Remove a value
    fn remove(&self, key: &str);
}

/// In-memory preference storage (tests, ephemeral sessions)
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().expect("prefs lock").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .expect("prefs lock")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values.lock().expect("prefs lock").remove(key);
    }
}

/// File-backed preference storage (single JSON object, write-through)
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePrefs {
    /// Open (or create) a preference file.
    ///
    /// A missing file starts empty; a corrupt file is an error so the
    /// caller can decide whether to discard it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PrefsError> {
        let path = path.as_ref().to_path_buf();

        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(PrefsError::Read(e)),
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn persist(&self, values: &BTreeMap<String, String>) {
        let contents = match serde_json::to_string_pretty(values) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize preferences");
                return;
            }
        };

        if let Err(e) = std::fs::write(&self.path, contents) {
            // Persistence failure loses the value across restarts but must
            // not fail the in-memory update.
            tracing::warn!(error = %e, path = %self.path.display(), "Failed to persist preferences");
        }
    }
}

impl PrefStore for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().expect("prefs lock").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock().expect("prefs lock");
        values.insert(key.to_string(), value.to_string());
        self.persist(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.lock().expect("prefs lock");
        values.remove(key);
        self.persist(&values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_prefs_roundtrip() {
        let prefs = MemoryPrefs::new();
        assert_eq!(prefs.get("theme"), None);

        prefs.set("theme", "light");
        assert_eq!(prefs.get("theme"), Some("light".to_string()));

        prefs.remove("theme");
        assert_eq!(prefs.get("theme"), None);
    }

    #[test]
    fn test_file_prefs_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        {
            let prefs = FilePrefs::open(&path).unwrap();
            prefs.set("theme", "light");
            prefs.set("voiceName", "Aoede");
        }

        // Reopen and observe persisted values
        let prefs = FilePrefs::open(&path).unwrap();
        assert_eq!(prefs.get("theme"), Some("light".to_string()));
        assert_eq!(prefs.get("voiceName"), Some("Aoede".to_string()));
    }

    #[test]
    fn test_file_prefs_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePrefs::open(dir.path().join("absent.json")).unwrap();
        assert_eq!(prefs.get("anything"), None);
    }

    #[test]
    fn test_file_prefs_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(FilePrefs::open(&path), Err(PrefsError::Format(_))));
    }
}
