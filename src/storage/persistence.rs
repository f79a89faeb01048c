use std::hash::Hasher;

use metrohash::MetroHash64;
use tracing::{debug, info, warn};

use super::{Storage, StorageError};
use crate::filesystem::Vfs;
use crate::shell::ShellContext;

pub const VFS_KEY: &str = "vfs";
pub const CWD_KEY: &str = "cwd";

/// Loads and saves a session's tree and working directory.
///
/// Remembers a fingerprint of the last state it wrote, so saving an
/// unchanged session touches nothing.
#[derive(Debug)]
pub struct Persistence<S> {
    storage: S,
    last_saved: Option<u64>,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            last_saved: None,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Builds a session from storage. A missing or unreadable tree yields the
    /// seed layout; a saved working directory that is gone yields `home`.
    pub async fn restore(&mut self, home: &str) -> Result<ShellContext, StorageError> {
        let vfs = match self.storage.get(VFS_KEY).await? {
            None => {
                info!("No saved filesystem, starting from the seed layout");
                Vfs::seeded()
            }
            Some(text) => match Vfs::deserialize(&text) {
                Ok(vfs) => {
                    info!("Restored saved filesystem");
                    vfs
                }
                Err(e) => {
                    warn!("Ignoring saved filesystem: {}", e);
                    Vfs::seeded()
                }
            },
        };

        let mut ctx = ShellContext::new(vfs, home);
        if let Some(cwd) = self.storage.get(CWD_KEY).await? {
            ctx = ctx.with_cwd(cwd.trim());
        }
        Ok(ctx)
    }

    /// Writes the session unless it matches what was last saved. Returns
    /// whether anything was written.
    pub async fn save(&mut self, ctx: &ShellContext) -> Result<bool, StorageError> {
        let text = ctx.vfs().serialize();
        let fingerprint = fingerprint(&text, ctx.cwd());
        if self.last_saved == Some(fingerprint) {
            debug!("Session unchanged, skipping save");
            return Ok(false);
        }

        self.storage.set(VFS_KEY, &text).await?;
        self.storage.set(CWD_KEY, ctx.cwd()).await?;
        self.last_saved = Some(fingerprint);
        info!("Saved session ({} bytes)", text.len());
        Ok(true)
    }
}

fn fingerprint(vfs_text: &str, cwd: &str) -> u64 {
    let mut hasher = MetroHash64::default();
    hasher.write(vfs_text.as_bytes());
    hasher.write_u8(0);
    hasher.write(cwd.as_bytes());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::WriteMode;
    use crate::filesystem::path::DEFAULT_HOME;
    use crate::storage::{FileStorage, MemoryStorage};
    use tempfile::TempDir;

    #[compio::test]
    async fn empty_storage_restores_seed() {
        let mut persistence = Persistence::new(MemoryStorage::new());
        let ctx = persistence.restore(DEFAULT_HOME).await.unwrap();

        assert_eq!(ctx.vfs(), &Vfs::seeded());
        assert_eq!(ctx.cwd(), DEFAULT_HOME);
    }

    #[compio::test]
    async fn save_then_restore() {
        let mut persistence = Persistence::new(MemoryStorage::new());
        let mut ctx = persistence.restore(DEFAULT_HOME).await.unwrap();
        ctx.vfs_mut()
            .write("/tmp/kept", "data", WriteMode::Overwrite)
            .unwrap();
        ctx.set_cwd("/tmp".into());

        assert!(persistence.save(&ctx).await.unwrap());

        let restored = persistence.restore(DEFAULT_HOME).await.unwrap();
        assert_eq!(restored.vfs().read("/tmp/kept").unwrap(), "data");
        assert_eq!(restored.cwd(), "/tmp");
    }

    #[compio::test]
    async fn unchanged_session_is_not_rewritten() {
        let mut persistence = Persistence::new(MemoryStorage::new());
        let mut ctx = persistence.restore(DEFAULT_HOME).await.unwrap();

        assert!(persistence.save(&ctx).await.unwrap());
        assert!(!persistence.save(&ctx).await.unwrap());

        ctx.set_cwd("/".into());
        assert!(persistence.save(&ctx).await.unwrap());
    }

    #[compio::test]
    async fn corrupt_tree_falls_back_to_seed() {
        let mut storage = MemoryStorage::new();
        storage.set(VFS_KEY, "{ broken").await.unwrap();
        storage.set(CWD_KEY, "/tmp").await.unwrap();
        let mut persistence = Persistence::new(storage);

        let ctx = persistence.restore(DEFAULT_HOME).await.unwrap();

        assert_eq!(ctx.vfs(), &Vfs::seeded());
        assert_eq!(ctx.cwd(), "/tmp");
        assert_eq!(
            persistence.storage().get(VFS_KEY).await.unwrap().as_deref(),
            Some("{ broken")
        );
    }

    #[compio::test]
    async fn vanished_cwd_falls_back_to_home() {
        let mut storage = MemoryStorage::new();
        storage.set(CWD_KEY, "/gone").await.unwrap();
        let mut persistence = Persistence::new(storage);

        let ctx = persistence.restore(DEFAULT_HOME).await.unwrap();
        assert_eq!(ctx.cwd(), DEFAULT_HOME);
    }

    #[compio::test]
    async fn survives_a_restart_on_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let mut first = Persistence::new(FileStorage::new(temp_dir.path(), true));
        let mut ctx = first.restore(DEFAULT_HOME).await.unwrap();
        ctx.vfs_mut().ensure_dir("/srv/app", true).unwrap();
        first.save(&ctx).await.unwrap();

        let mut second = Persistence::new(FileStorage::new(temp_dir.path(), true));
        let restored = second.restore(DEFAULT_HOME).await.unwrap();
        assert_eq!(restored.vfs(), ctx.vfs());
    }
}
