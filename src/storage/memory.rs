use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{LocalStorage, StorageError};

/// In-process storage. Nothing survives the process; used by tests and
/// ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            items: Mutex::new(items),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every subsequent write fail, simulating a full or read-only disk.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LocalStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.check_writable()?;
        self.items.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        self.items.lock().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.check_writable()?;
        self.items.lock().await.clear();
        Ok(())
    }
}
