//! Client-local key/value storage backends
//!
//! The token store only needs three string operations, so every backend is
//! reduced to [`TokenStorage`]. Failures are logged and otherwise look like
//! an absent value to callers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Durable client-side string storage
pub trait TokenStorage: Send + Sync {
    /// Read a value
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set_item(&self, key: &str, value: &str);

    /// Delete a value
    fn remove_item(&self, key: &str);
}

/// Storage for environments without client storage. Reads nothing, keeps nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopStorage;

impl TokenStorage for NoopStorage {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, _key: &str, _value: &str) {}

    fn remove_item(&self, _key: &str) {}
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::TokenStorage;
    use std::collections::HashMap;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};
    use tracing::warn;

    /// JSON file of string values, re-read on every access.
    #[derive(Clone, Debug)]
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// Location of the backing file
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_values(&self) -> HashMap<String, String> {
            let content = match std::fs::read_to_string(&self.path) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => return HashMap::new(),
                Err(e) => {
                    warn!(path = %self.path.display(), "Failed to read storage file: {e}");
                    return HashMap::new();
                }
            };

            serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), "Ignoring unreadable storage file: {e}");
                HashMap::new()
            })
        }

        fn write_values(&self, values: &HashMap<String, String>) {
            if let Some(parent) = self.path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    warn!(path = %parent.display(), "Failed to create storage directory: {e}");
                    return;
                }
            }

            let result = serde_json::to_string_pretty(values)
                .map_err(std::io::Error::from)
                .and_then(|content| std::fs::write(&self.path, content));
            if let Err(e) = result {
                warn!(path = %self.path.display(), "Failed to write storage file: {e}");
            }
        }
    }

    impl TokenStorage for FileStorage {
        fn get_item(&self, key: &str) -> Option<String> {
            self.read_values().remove(key)
        }

        fn set_item(&self, key: &str, value: &str) {
            let mut values = self.read_values();
            values.insert(key.to_string(), value.to_string());
            self.write_values(&values);
        }

        fn remove_item(&self, key: &str) {
            let mut values = self.read_values();
            if values.remove(key).is_some() {
                self.write_values(&values);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::TokenStorage;
    use tracing::warn;
    use web_sys::Storage;

    /// `window.localStorage`
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserStorage;

    fn local_storage() -> Option<Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }

    impl TokenStorage for BrowserStorage {
        fn get_item(&self, key: &str) -> Option<String> {
            local_storage()?.get_item(key).ok().flatten()
        }

        fn set_item(&self, key: &str, value: &str) {
            if let Some(storage) = local_storage() {
                if storage.set_item(key, value).is_err() {
                    warn!(key, "Failed to write localStorage");
                }
            }
        }

        fn remove_item(&self, key: &str) {
            if let Some(storage) = local_storage() {
                if storage.remove_item(key).is_err() {
                    warn!(key, "Failed to remove from localStorage");
                }
            }
        }
    }
}
