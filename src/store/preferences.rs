//! In-memory preference store with optional JSON file persistence
//!
//! Provides a `PreferenceStore` that keeps every value in memory and, when
//! opened on a file, rewrites that file after each change. A missing or
//! unreadable file starts the store empty rather than failing.

use directories::ProjectDirs;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use tracing::{debug, warn};

use super::{ChangeListener, KeyValueStore, ListenerId, StoredValue};

/// File name used inside the data directory
const PREFERENCES_FILE: &str = "preferences.json";

/// Thread-safe key-value store backing the weather cache and display settings
///
/// Stored on disk as a single JSON object in an XDG-compliant data directory
/// (`~/.local/share/owmcast/` on Linux).
pub struct PreferenceStore {
    /// Current values
    values: RwLock<HashMap<String, StoredValue>>,
    /// Registered change listeners
    listeners: Mutex<Vec<(ListenerId, ChangeListener)>>,
    next_listener_id: AtomicU64,
    /// Backing file, if persistent
    path: Option<PathBuf>,
}

impl PreferenceStore {
    /// Creates a store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self::with_values(HashMap::new(), None)
    }

    /// Opens the store in the default XDG data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn open_default() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "owmcast")?;
        Some(Self::with_dir(project_dirs.data_dir().to_path_buf()))
    }

    /// Opens the store in a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self::open(dir.join(PREFERENCES_FILE))
    }

    /// Opens the store backed by `path`, loading existing values if present
    ///
    /// An entry that is not a scalar is skipped on its own; the rest of the
    /// file still loads.
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, Value>>(&content) {
                Ok(raw) => load_entries(raw),
                Err(e) => {
                    warn!("Ignoring unreadable preferences at {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => {
                debug!("No preferences at {}, starting empty", path.display());
                HashMap::new()
            }
        };
        Self::with_values(values, Some(path))
    }

    fn with_values(values: HashMap<String, StoredValue>, path: Option<PathBuf>) -> Self {
        Self {
            values: RwLock::new(values),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
            path,
        }
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Snapshot of every stored key and value, sorted by key
    pub fn entries(&self) -> Vec<(String, StoredValue)> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<_> = values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Writes the current values to the backing file
    fn persist(&self, values: &HashMap<String, StoredValue>) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = write_json(path, values) {
            warn!("Failed to persist preferences to {}: {}", path.display(), e);
        }
    }

    fn notify(&self, key: &str) {
        // Clone so listeners may call back into the store
        let listeners: Vec<ChangeListener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(key);
        }
    }
}

fn load_entries(raw: HashMap<String, Value>) -> HashMap<String, StoredValue> {
    raw.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(stored) => Some((key, stored)),
            Err(e) => {
                warn!("Skipping unreadable preference {:?}: {}", key, e);
                None
            }
        })
        .collect()
}

fn write_json(path: &Path, values: &HashMap<String, StoredValue>) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(values)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

impl KeyValueStore for PreferenceStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: StoredValue) {
        if let StoredValue::Float(v) = &value {
            if !v.is_finite() {
                warn!("Refusing to store non-finite value {} under {:?}", v, key);
                return;
            }
        }
        {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            if values.get(key) == Some(&value) {
                return;
            }
            values.insert(key.to_string(), value);
            self.persist(&values);
        }
        self.notify(key);
    }

    fn remove(&self, key: &str) {
        {
            let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
            if values.remove(key).is_none() {
                return;
            }
            self.persist(&values);
        }
        self.notify(key);
    }

    fn add_listener(&self, listener: ChangeListener) -> ListenerId {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(existing, _)| *existing != id);
    }
}
