//! Key-value storage backends
//!
//! Writes are best-effort everywhere: a quota error or missing storage must
//! never break gameplay, so failures are logged and dropped.

use std::cell::RefCell;
use std::collections::HashMap;

/// A string key-value store
pub trait StorageBackend {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
}

/// In-memory store for native builds and tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageBackend for LocalStorage {
    fn read(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok()).flatten()
    }

    fn write(&self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, write dropped");
            return;
        };
        if storage.set_item(key, value).is_err() {
            log::warn!("LocalStorage write failed for {key}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("missing"), None);
        storage.write("k", "v1");
        storage.write("k", "v2");
        assert_eq!(storage.read("k").as_deref(), Some("v2"));
    }
}
