//! Local persistent key-value storage.
//!
//! Each piece of client state lives under its own key so it can be read and
//! cleared independently.

use async_trait::async_trait;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

pub const TOKEN_KEY: &str = "userToken";
pub const USERNAME_KEY: &str = "userName";
pub const USER_TYPE_KEY: &str = "user_type";
pub const CART_KEY: &str = "cart";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage is unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait LocalStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Removing a key that does not exist is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    async fn clear(&self) -> Result<(), StorageError>;
}
