//! Local key-value persistence.
//!
//! The engine never touches storage directly; the controller and handlers go
//! through an injected `Arc<dyn KeyValueStore>`. Storage may be unavailable, so
//! every read has a logged fallback.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::VisualConfig;
use crate::theme;

/// Last raw editor text.
pub const DATA_KEY: &str = "cv_data_cache";
/// Last visual configuration, as JSON.
pub const VISUAL_CONFIG_KEY: &str = "cv_visual_config";
pub const API_KEY_KEY: &str = "gemini_api_key";

/// Document shown when nothing has been saved yet.
pub const DEFAULT_DOCUMENT: &str = include_str!("../assets/structure.json");

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Reads `key`, returning `default` when it is absent or unreadable.
    fn get_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(e) => {
                warn!("Falling back to default for '{key}': {e}");
                default.to_string()
            }
        }
    }

    /// Writes `key`, logging instead of failing. Returns whether the write landed.
    fn set_logged(&self, key: &str, value: &str) -> bool {
        match self.set(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!("Could not persist '{key}': {e}");
                false
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FileStore
// ────────────────────────────────────────────────────────────────────────────

/// A JSON object on disk, rewritten atomically on every `set`.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        debug!("Opened store {} with {} keys", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(io_err)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, entries).map_err(|source| {
            StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("store lock poisoned".to_string()))?;
        if entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        // The map only moves forward once the file holds the new value.
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.write(&next)?;
        *entries = next;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MemoryStore
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store, used when the file store cannot be opened and in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable("store lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Session bootstrap
// ────────────────────────────────────────────────────────────────────────────

/// State restored once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub raw_input: String,
    pub visual_config: VisualConfig,
}

pub fn load_session(store: &dyn KeyValueStore) -> Session {
    let raw_input = store.get_or(DATA_KEY, DEFAULT_DOCUMENT);

    let visual_config = match store.get(VISUAL_CONFIG_KEY) {
        Ok(Some(json)) => match serde_json::from_str::<VisualConfig>(&json) {
            Ok(config) if theme::template(&config.template_id).is_some() => config,
            Ok(config) => {
                warn!(
                    "Saved template '{}' is unknown, using defaults",
                    config.template_id
                );
                VisualConfig::default()
            }
            Err(e) => {
                warn!("Saved visual config is unreadable, using defaults: {e}");
                VisualConfig::default()
            }
        },
        Ok(None) => VisualConfig::default(),
        Err(e) => {
            warn!("Could not read visual config, using defaults: {e}");
            VisualConfig::default()
        }
    };

    Session {
        raw_input,
        visual_config,
    }
}

pub fn save_visual_config(store: &dyn KeyValueStore, config: &VisualConfig) -> bool {
    match serde_json::to_string(config) {
        Ok(json) => store.set_logged(VISUAL_CONFIG_KEY, &json),
        Err(e) => {
            warn!("Could not serialize visual config: {e}");
            false
        }
    }
}
