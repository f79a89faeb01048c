//! Key/value persistence for the shell session.

mod error;
mod file;
mod memory;
mod persistence;

pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use persistence::{CWD_KEY, Persistence, VFS_KEY};

/// A string key/value store.
#[allow(async_fn_in_trait)]
pub trait Storage {
    /// `None` when nothing was stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}
