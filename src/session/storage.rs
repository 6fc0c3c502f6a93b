use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};
use tracing::debug;

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "auth_token";
/// Key under which the serialized user summary is persisted.
pub const USER_KEY: &str = "current_user";

/// Accessor interface over the persisted session keys.
///
/// Reads of missing or unreadable values yield `None` and writes are
/// best-effort: storage being unavailable is not an error, it just means the
/// session will not survive a restart.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-local storage; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.read() {
            Ok(entries) => entries.get(key).cloned(),
            Err(_) => None,
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

/// Durable storage backed by a single JSON file holding a string map.
///
/// Each operation reloads the file, so concurrent writers are last-write-wins
/// within the process (the write lock serializes read-modify-write cycles).
/// A missing or malformed file reads as empty rather than failing.
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self) -> HashMap<String, String> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                debug!("session file {} not readable: {}", self.path.display(), e);
                return HashMap::new();
            }
        };
        match serde_json::from_str(&text) {
            Ok(map) => map,
            Err(e) => {
                debug!("session file {} malformed: {}", self.path.display(), e);
                HashMap::new()
            }
        }
    }

    fn save(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    debug!("cannot create session dir {}: {}", parent.display(), e);
                    return;
                }
            }
        }
        let text = match serde_json::to_string(entries) {
            Ok(text) => text,
            Err(e) => {
                debug!("cannot serialize session entries: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, text) {
            debug!("cannot write session file {}: {}", self.path.display(), e);
        }
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let _guard = self.write_lock.lock();
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries);
    }

    fn remove(&self, key: &str) {
        let _guard = self.write_lock.lock();
        let mut entries = self.load();
        entries.remove(key);
        self.save(&entries);
    }
}
