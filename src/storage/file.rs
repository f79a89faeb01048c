use std::io::ErrorKind;
use std::path::PathBuf;

use compio::fs;
use snafu::ResultExt;
use tracing::{debug, trace};

use super::error::{CompressionSnafu, CreateDirSnafu, ReadSnafu, Utf8Snafu, WriteSnafu};
use super::{Storage, StorageError};

const COMPRESSION_LEVEL: i32 = 3;

/// One file per key inside a state directory.
///
/// With compression on, values are zstd frames stored as `<key>.zst`.
/// Reads fall back to the other form, so toggling compression keeps the
/// saved state.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    compress: bool,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>, compress: bool) -> Self {
        Self {
            dir: dir.into(),
            compress,
        }
    }

    fn path_for(&self, key: &str, compressed: bool) -> PathBuf {
        if compressed {
            self.dir.join(format!("{key}.zst"))
        } else {
            self.dir.join(key)
        }
    }

    async fn read_value(&self, key: &str, compressed: bool) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key, compressed);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!("{} does not exist", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e).context(ReadSnafu { path }),
        };

        let bytes = if compressed {
            zstd::decode_all(bytes.as_slice()).context(CompressionSnafu { path: &path })?
        } else {
            bytes
        };
        let text = String::from_utf8(bytes).context(Utf8Snafu { path: &path })?;
        debug!("Read {} bytes from {}", text.len(), path.display());
        Ok(Some(text))
    }
}

impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.read_value(key, self.compress).await? {
            Some(text) => Ok(Some(text)),
            None => self.read_value(key, !self.compress).await,
        }
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)
            .await
            .context(CreateDirSnafu { path: &self.dir })?;

        let path = self.path_for(key, self.compress);
        let bytes = if self.compress {
            zstd::encode_all(value.as_bytes(), COMPRESSION_LEVEL)
                .context(CompressionSnafu { path: &path })?
        } else {
            value.as_bytes().to_vec()
        };

        debug!("Writing {} bytes to {}", bytes.len(), path.display());
        fs::write(&path, bytes).await.0.context(WriteSnafu { path })
    }
}
