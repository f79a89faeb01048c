//! Text encoding of the whole tree, used for persistence.
//!
//! The tree is stored as a flat, pre-order list of entries with absolute
//! paths. Pre-order keeps every parent ahead of its children and preserves
//! sibling order, so decoding rebuilds the tree with a single pass and no
//! recursion.

use serde::Deserialize;
use serde_json::{Value, json};
use snafu::ensure;
use tracing::debug;

use super::error::{InvalidFormatSnafu, VfsError};
use super::node::Descendant;
use super::operations::WriteMode;
use super::path;
use super::tree::Vfs;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Snapshot {
    version: u32,
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Entry {
    Dir { path: String },
    File { path: String, content: String },
}

impl Entry {
    fn path(&self) -> &str {
        match self {
            Entry::Dir { path } | Entry::File { path, .. } => path,
        }
    }
}

fn encode_entry(descendant: Descendant) -> Value {
    match descendant {
        Descendant::Directory { path } => json!({ "type": "dir", "path": format!("/{path}") }),
        Descendant::File { path, content } => {
            json!({ "type": "file", "path": format!("/{path}"), "content": content })
        }
    }
}

impl Vfs {
    /// Pretty-printed JSON snapshot of the tree, readable back with
    /// [`Vfs::deserialize`].
    pub fn serialize(&self) -> String {
        let entries: Vec<Value> = self
            .root()
            .descendants()
            .into_iter()
            .map(encode_entry)
            .collect();

        format!("{:#}", json!({ "version": FORMAT_VERSION, "entries": entries }))
    }

    /// Builds a new tree from [`Vfs::serialize`] output. Malformed input
    /// fails with `InvalidFormat`; nothing outside the new tree is touched.
    pub fn deserialize(text: &str) -> Result<Self, VfsError> {
        let snapshot: Snapshot =
            serde_json::from_str(text).map_err(|e| VfsError::InvalidFormat {
                reason: e.to_string(),
            })?;
        ensure!(
            snapshot.version == FORMAT_VERSION,
            InvalidFormatSnafu {
                reason: format!("unsupported version {}", snapshot.version),
            }
        );

        let mut vfs = Vfs::new();
        for entry in &snapshot.entries {
            let entry_path = entry.path();
            ensure!(
                entry_path != "/" && path::normalize(entry_path) == entry_path,
                InvalidFormatSnafu {
                    reason: format!("'{entry_path}' is not a canonical path"),
                }
            );

            let found = vfs.lookup(entry_path);
            ensure!(
                found.node.is_none(),
                InvalidFormatSnafu {
                    reason: format!("duplicate entry '{entry_path}'"),
                }
            );
            ensure!(
                found.is_creatable(),
                InvalidFormatSnafu {
                    reason: format!("'{entry_path}' has no parent directory"),
                }
            );

            let inserted = match entry {
                Entry::Dir { path } => vfs.ensure_dir(path, false),
                Entry::File { path, content } => vfs.write(path, content, WriteMode::Overwrite),
            };
            inserted.map_err(|e| VfsError::InvalidFormat {
                reason: e.to_string(),
            })?;
        }

        debug!("Decoded {} entries", snapshot.entries.len());
        Ok(vfs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::RemoveOptions;

    fn sample() -> Vfs {
        let mut vfs = Vfs::seeded();
        vfs.ensure_dir("/srv/www/empty", true).unwrap();
        vfs.write("/srv/www/index.html", "<h1>hi</h1>\n", WriteMode::Overwrite)
            .unwrap();
        vfs.write("/srv/a.txt", "ünïcødé 🚀", WriteMode::Overwrite)
            .unwrap();
        vfs
    }

    #[test]
    fn round_trip_is_stable() {
        let vfs = sample();
        let encoded = vfs.serialize();
        let decoded = Vfs::deserialize(&encoded).unwrap();

        assert_eq!(decoded, vfs);
        assert_eq!(decoded.serialize(), encoded);
    }

    #[test]
    fn encoded_text_is_a_versioned_entry_list() {
        let encoded: Value = serde_json::from_str(&Vfs::seeded().serialize()).unwrap();

        assert_eq!(encoded["version"], FORMAT_VERSION);
        assert_eq!(
            encoded["entries"][0],
            json!({ "type": "dir", "path": "/home" })
        );
        assert_eq!(encoded["entries"][2]["type"], "file");
        assert_eq!(encoded["entries"][3]["path"], "/tmp");
    }

    #[test]
    fn round_trip_preserves_sibling_order() {
        let mut vfs = Vfs::new();
        for name in ["zz", "aa", "mm"] {
            vfs.create_file(&format!("/{name}")).unwrap();
        }
        let decoded = Vfs::deserialize(&vfs.serialize()).unwrap();

        let names = decoded
            .list("/")
            .unwrap()
            .into_iter()
            .map(|entry| entry.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["zz", "aa", "mm"]);
    }

    #[test]
    fn empty_tree_round_trips() {
        let encoded = Vfs::new().serialize();
        assert_eq!(Vfs::deserialize(&encoded).unwrap(), Vfs::new());
    }

    #[test]
    fn decoded_tree_is_independent() {
        let original = sample();
        let mut decoded = Vfs::deserialize(&original.serialize()).unwrap();
        let everything = RemoveOptions {
            recursive: true,
            force: false,
        };
        decoded.remove("/srv", everything, None).unwrap();

        assert!(original.lookup("/srv/www/index.html").node.is_some());
    }

    #[test]
    fn rejects_malformed_json() {
        let result = Vfs::deserialize("{ not json");
        assert!(matches!(result, Err(VfsError::InvalidFormat { .. })));
    }

    #[test]
    fn rejects_unknown_version() {
        let result = Vfs::deserialize(r#"{"version": 7, "entries": []}"#);
        assert!(matches!(result, Err(VfsError::InvalidFormat { .. })));
    }

    #[test]
    fn rejects_orphan_entries() {
        let text = r#"{"version": 1, "entries": [{"type": "file", "path": "/a/b", "content": ""}]}"#;
        assert!(matches!(
            Vfs::deserialize(text),
            Err(VfsError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn rejects_file_used_as_directory() {
        let text = r#"{"version": 1, "entries": [
            {"type": "file", "path": "/a", "content": ""},
            {"type": "dir", "path": "/a/b"}
        ]}"#;
        assert!(matches!(
            Vfs::deserialize(text),
            Err(VfsError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn rejects_duplicates_and_non_canonical_paths() {
        let duplicate = r#"{"version": 1, "entries": [
            {"type": "dir", "path": "/a"},
            {"type": "file", "path": "/a", "content": "x"}
        ]}"#;
        let dotted = r#"{"version": 1, "entries": [{"type": "dir", "path": "/a/../b"}]}"#;
        let root = r#"{"version": 1, "entries": [{"type": "dir", "path": "/"}]}"#;

        for text in [duplicate, dotted, root] {
            assert!(matches!(
                Vfs::deserialize(text),
                Err(VfsError::InvalidFormat { .. })
            ));
        }
    }

    #[test]
    fn rejects_unknown_entry_type() {
        let text = r#"{"version": 1, "entries": [{"type": "link", "path": "/a"}]}"#;
        assert!(matches!(
            Vfs::deserialize(text),
            Err(VfsError::InvalidFormat { .. })
        ));
    }
}
