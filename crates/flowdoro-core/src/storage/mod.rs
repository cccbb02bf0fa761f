mod config;
pub mod database;
pub mod memory;

pub use config::{Config, NotificationsConfig, ScoringConfig, SessionConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::rc::Rc;

use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Well-known keys in the kv store.
pub mod keys {
    pub const FOCUS_SCORE: &str = "focusScore";
    pub const BEST_SCORE: &str = "bestScore";
    pub const TASKS_COMPLETE: &str = "tasksComplete";
    pub const LAST_RESET_DATE: &str = "lastResetDate";
    pub const TASKS: &str = "tasks";
    pub const SETTINGS: &str = "settings";
}

/// String-keyed durable storage. Last write wins.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Store handle shared by every component of one [`crate::Pomodoro`].
pub type SharedStore = Rc<dyn KvStore>;

/// Read a raw value, treating any store failure as a miss.
pub(crate) fn read(store: &dyn KvStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "store read failed");
            None
        }
    }
}

/// Read and parse a value; unparsable data is treated as absent.
pub(crate) fn read_parsed<T: std::str::FromStr>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = read(store, key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable stored value");
            None
        }
    }
}

/// Read a JSON document; unparsable data is treated as absent.
pub(crate) fn read_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = read(store, key)?;
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring malformed stored document");
            None
        }
    }
}

/// Write a value, logging and dropping any store failure.
pub(crate) fn write(store: &dyn KvStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        tracing::warn!(key, error = %e, "store write failed");
    }
}

/// Returns the flowdoro data directory, creating it if needed.
///
/// `FLOWDORO_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/flowdoro`, or `~/.config/flowdoro-dev` when `FLOWDORO_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("FLOWDORO_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FLOWDORO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("flowdoro-dev")
            } else {
                base_dir.join("flowdoro")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
