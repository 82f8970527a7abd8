use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{LocalStorage, StorageError};

/// Stores every key as its own file inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(file_name)
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

#[async_trait]
impl LocalStorage for FileStorage {
    #[instrument(skip(self))]
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Key not present");
                Ok(None)
            }
            Err(e) => Err(io_error(key, e)),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(key, e))?;

        // Write-then-rename so a crash never leaves a half-written value behind.
        let path = self.path_for(key);
        let staging = path.with_extension("tmp");
        tokio::fs::write(&staging, value)
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|e| io_error(key, e))
    }

    #[instrument(skip(self))]
    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<(), StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(io_error("*", e)),
        };

        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error("*", e))? {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| io_error(&path.display().to_string(), e))?;
            if file_type.is_file() {
                tokio::fs::remove_file(&path)
                    .await
                    .map_err(|e| io_error(&path.display().to_string(), e))?;
            }
        }
        Ok(())
    }
}
