//! Key-value preference storage with change notification
//!
//! Everything the client remembers between runs (raw API payloads, the
//! active city, display preferences) lives in a flat string-keyed store.
//! [`KeyValueStore`] is the seam the cache is written against;
//! [`PreferenceStore`] is the bundled implementation.

mod preferences;

pub use preferences::PreferenceStore;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifies a registered change listener
pub type ListenerId = u64;

/// Callback invoked with the key that changed
///
/// Listeners run synchronously on the writing thread, after the write is
/// visible to readers.
pub type ChangeListener = Arc<dyn Fn(&str) + Send + Sync>;

/// A single stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Bool(bool),
    Long(i64),
    Float(f64),
    Str(String),
}

/// String-keyed scalar storage that announces every change
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<StoredValue>;

    /// Stores `value`; listeners are notified only if the value changed
    fn set(&self, key: &str, value: StoredValue);

    fn remove(&self, key: &str);

    fn add_listener(&self, listener: ChangeListener) -> ListenerId;

    fn remove_listener(&self, id: ListenerId);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            StoredValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Reads an integer; decimal strings are accepted
    fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            StoredValue::Long(v) => Some(v),
            StoredValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            StoredValue::Float(v) => Some(v),
            StoredValue::Long(v) => Some(v as f64),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            StoredValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn set_string(&self, key: &str, value: &str) {
        self.set(key, StoredValue::Str(value.to_string()));
    }

    fn set_i64(&self, key: &str, value: i64) {
        self.set(key, StoredValue::Long(value));
    }

    fn set_f64(&self, key: &str, value: f64) {
        self.set(key, StoredValue::Float(value));
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.set(key, StoredValue::Bool(value));
    }
}
