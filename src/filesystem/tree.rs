use std::mem;

use tracing::trace;

use super::error::VfsError;
use super::node::{Children, Node, dismantle};
use super::path;

const README_CONTENT: &str = "Welcome to the virtual terminal!

This is a simulated Unix-like environment backed by an in-memory filesystem.
Everything you create here is saved between sessions.

Available commands:
  Navigation: cd, pwd, ls
  Files:      cat, echo, touch, mkdir, rm, cp, mv
  Search:     grep
  Other:      history, date, uptime, help

Try these:
  ls -la                    list files with details
  mkdir -p projects/demo    create nested directories
  cd projects/demo          change directory
  echo hello > notes.txt    write to a file
  cat notes.txt             read it back
  cd -                      return to the previous directory
";

/// The in-memory filesystem: a single-rooted tree owned by one value.
///
/// All operations take canonical absolute paths; resolving user input against
/// a working directory is done beforehand with [`path::resolve`].
#[derive(Debug, PartialEq, Eq)]
pub struct Vfs {
    root: Node,
}

/// Result of walking the tree along a path.
///
/// `parent` is the deepest node reached before the walk stopped and `name` is
/// the segment the walk stopped at. When the target exists, `parent` is its
/// parent directory (absent for the root) and `name` its own name. Nodes
/// borrow from the tree, `name` from the looked-up path.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a, 'p> {
    pub node: Option<&'a Node>,
    pub parent: Option<&'a Node>,
    pub name: &'p str,
    /// Segments left after `name` when the walk stopped early.
    pub remaining: usize,
}

impl Lookup<'_, '_> {
    /// The target is absent but its parent directory exists, so it could be
    /// created.
    pub fn is_creatable(&self) -> bool {
        self.node.is_none() && self.remaining == 0 && self.parent.is_some_and(Node::is_directory)
    }
}

impl Vfs {
    /// An empty filesystem containing only the root directory.
    pub fn new() -> Self {
        Self {
            root: Node::empty_dir(),
        }
    }

    /// The starter layout: a home directory with a readme, plus `/tmp`.
    pub fn seeded() -> Self {
        let mut guest = Children::new();
        guest.insert("readme.txt".into(), Node::file(README_CONTENT));

        let mut home = Children::new();
        home.insert("guest".into(), Node::Directory { children: guest });

        let mut root = Children::new();
        root.insert("home".into(), Node::Directory { children: home });
        root.insert("tmp".into(), Node::empty_dir());

        Self {
            root: Node::Directory { children: root },
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Walks the tree along `path`. Never fails; a missing node is reported
    /// as `node: None`.
    pub fn lookup<'a, 'p>(&'a self, path: &'p str) -> Lookup<'a, 'p> {
        let segments = path::canonical_segments(path);
        let mut parent = None;
        let mut current = &self.root;

        for (index, &segment) in segments.iter().enumerate() {
            let remaining = segments.len() - index - 1;
            let child = current.children().and_then(|children| children.get(segment));
            match child {
                Some(child) => {
                    parent = Some(current);
                    current = child;
                }
                None => {
                    trace!("Lookup of {} stopped at '{}'", path, segment);
                    return Lookup {
                        node: None,
                        parent: Some(current),
                        name: segment,
                        remaining,
                    };
                }
            }
        }

        Lookup {
            node: Some(current),
            parent,
            name: segments.last().copied().unwrap_or_default(),
            remaining: 0,
        }
    }

    pub(crate) fn node_mut(&mut self, segments: &[&str]) -> Option<&mut Node> {
        let mut current = &mut self.root;
        for segment in segments {
            current = current.children_mut()?.get_mut(*segment)?;
        }
        Some(current)
    }

    /// Children of the directory at `segments`; `NotFound` unless every
    /// segment names an existing directory.
    pub(crate) fn children_mut(
        &mut self,
        segments: &[&str],
        path: &str,
    ) -> Result<&mut Children, VfsError> {
        self.node_mut(segments)
            .and_then(Node::children_mut)
            .ok_or_else(|| VfsError::NotFound {
                path: path.to_string(),
            })
    }
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Vfs {
    fn drop(&mut self) {
        dismantle(mem::replace(&mut self.root, Node::empty_dir()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::NodeKind;

    #[test]
    fn lookup_root_has_no_parent() {
        let vfs = Vfs::seeded();
        let found = vfs.lookup("/");

        assert!(found.node.is_some_and(Node::is_directory));
        assert!(found.parent.is_none());
        assert_eq!(found.name, "");
    }

    #[test]
    fn lookup_existing_file_reports_parent_and_name() {
        let vfs = Vfs::seeded();
        let found = vfs.lookup("/home/guest/readme.txt");

        assert_eq!(found.node.map(Node::kind), Some(NodeKind::File));
        assert_eq!(found.name, "readme.txt");
        assert_eq!(found.parent.map(|p| p.stat().size), Some(1));
    }

    #[test]
    fn lookup_missing_leaf_is_creatable() {
        let vfs = Vfs::seeded();
        let found = vfs.lookup("/tmp/new.txt");

        assert!(found.node.is_none());
        assert_eq!(found.name, "new.txt");
        assert!(found.is_creatable());
    }

    #[test]
    fn lookup_missing_intermediate_is_not_creatable() {
        let vfs = Vfs::seeded();
        let found = vfs.lookup("/tmp/a/b/c");

        assert!(found.node.is_none());
        assert_eq!(found.name, "a");
        assert_eq!(found.remaining, 2);
        assert!(!found.is_creatable());
    }

    #[test]
    fn lookup_through_file_stops_at_file() {
        let vfs = Vfs::seeded();
        let found = vfs.lookup("/home/guest/readme.txt/inner");

        assert!(found.node.is_none());
        assert_eq!(found.name, "inner");
        assert!(found.parent.is_some_and(Node::is_file));
        assert!(!found.is_creatable());
    }

    #[test]
    fn looked_up_node_outlives_the_path_string() {
        let vfs = Vfs::seeded();
        let node = {
            let path = format!("{}/readme.txt", crate::filesystem::path::DEFAULT_HOME);
            vfs.lookup(&path).node
        };

        assert!(node.is_some_and(Node::is_file));
    }

    #[test]
    fn seeded_layout_lists_home_then_tmp() {
        let vfs = Vfs::seeded();
        let names = vfs
            .root()
            .children()
            .map(|children| children.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();

        assert_eq!(names, vec!["home", "tmp"]);
    }

    #[test]
    fn new_is_an_empty_root() {
        assert_eq!(Vfs::new().root().stat().size, 0);
    }
}
