//! Structural operations on the tree.
//!
//! Every operation validates before it mutates, so a failed call leaves the
//! tree exactly as it was. `move_path` is the exception: it copies, then
//! deletes, and a failure in the second phase leaves both copies in place.

use snafu::{OptionExt, ensure};
use tracing::debug;

use super::error::{
    AlreadyExistsSnafu, IsADirectorySnafu, NotADirectorySnafu, NotFoundSnafu,
    PermissionDeniedSnafu, VfsError,
};
use super::node::{Descendant, DirEntry, Node, NodeKind, NodeStat, dismantle};
use super::path;
use super::tree::Vfs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Overwrite,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoveOptions {
    pub recursive: bool,
    pub force: bool,
}

/// Owned copy of a source node, taken before the destination is touched.
enum Snapshot {
    File(String),
    Directory(Vec<Descendant>),
}

impl Snapshot {
    fn of(node: &Node) -> Self {
        match node {
            Node::File { content } => Snapshot::File(content.clone()),
            Node::Directory { .. } => Snapshot::Directory(node.descendants()),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Snapshot::File(_) => NodeKind::File,
            Snapshot::Directory(_) => NodeKind::Directory,
        }
    }
}

impl Vfs {
    pub fn stat(&self, path: &str) -> Result<NodeStat, VfsError> {
        self.lookup(path)
            .node
            .map(Node::stat)
            .context(NotFoundSnafu { path })
    }

    /// Children of the directory at `path`, in insertion order.
    pub fn list(&self, path: &str) -> Result<Vec<DirEntry>, VfsError> {
        let node = self.lookup(path).node.context(NotFoundSnafu { path })?;
        let children = node.children().context(NotADirectorySnafu { path })?;

        Ok(children
            .iter()
            .map(|(name, child)| DirEntry::new(name.clone(), child.kind()))
            .collect())
    }

    /// Creates the directory at `path`. Missing ancestors are created only
    /// when `recursive` is set. Succeeds if the directory already exists.
    pub fn ensure_dir(&mut self, path: &str, recursive: bool) -> Result<(), VfsError> {
        let segments = path::canonical_segments(path);

        let mut current = self.root();
        let mut existing = 0;
        for &segment in &segments {
            match current.children().and_then(|children| children.get(segment)) {
                Some(child) => {
                    current = child;
                    existing += 1;
                }
                None => break,
            }
        }
        ensure!(
            current.is_directory(),
            AlreadyExistsSnafu {
                path: path::from_segments(&segments[..existing]),
            }
        );

        let missing = segments.len() - existing;
        if missing == 0 {
            return Ok(());
        }
        ensure!(recursive || missing == 1, NotFoundSnafu { path });

        let mut children = self.children_mut(&segments[..existing], path)?;
        for &segment in &segments[existing..] {
            debug!("Creating directory '{}' for {}", segment, path);
            children.insert(segment.to_string(), Node::empty_dir());
            children = children
                .get_mut(segment)
                .and_then(Node::children_mut)
                .context(NotFoundSnafu { path })?;
        }

        Ok(())
    }

    /// Creates an empty file unless something already exists at `path`.
    /// An existing file keeps its content.
    pub fn create_file(&mut self, path: &str) -> Result<(), VfsError> {
        let segments = path::canonical_segments(path);
        let (name, parent) = segments.split_last().context(IsADirectorySnafu { path })?;
        let children = self.children_mut(parent, path)?;

        match children.get(*name) {
            Some(Node::Directory { .. }) => IsADirectorySnafu { path }.fail(),
            Some(Node::File { .. }) => Ok(()),
            None => {
                debug!("Creating file {}", path);
                children.insert(name.to_string(), Node::file(""));
                Ok(())
            }
        }
    }

    /// Writes `content` to the file at `path`, creating it if needed.
    pub fn write(&mut self, path: &str, content: &str, mode: WriteMode) -> Result<(), VfsError> {
        let segments = path::canonical_segments(path);
        let (name, parent) = segments.split_last().context(IsADirectorySnafu { path })?;
        let children = self.children_mut(parent, path)?;

        match children.get_mut(*name) {
            Some(Node::Directory { .. }) => IsADirectorySnafu { path }.fail(),
            Some(Node::File { content: existing }) => {
                debug!("Writing {} bytes to {} ({:?})", content.len(), path, mode);
                match mode {
                    WriteMode::Overwrite => *existing = content.to_string(),
                    WriteMode::Append => existing.push_str(content),
                }
                Ok(())
            }
            None => {
                debug!("Creating file {} with {} bytes", path, content.len());
                children.insert(name.to_string(), Node::file(content));
                Ok(())
            }
        }
    }

    pub fn read(&self, path: &str) -> Result<&str, VfsError> {
        let node = self.lookup(path).node.context(NotFoundSnafu { path })?;
        node.content().context(IsADirectorySnafu { path })
    }

    /// Deletes the node at `path`.
    ///
    /// The root and `protected` (normally the working directory) are never
    /// removed, whatever the options say.
    pub fn remove(
        &mut self,
        path: &str,
        options: RemoveOptions,
        protected: Option<&str>,
    ) -> Result<(), VfsError> {
        let target = path::normalize(path);
        ensure!(target != "/", PermissionDeniedSnafu { path: &target });
        if let Some(protected) = protected {
            ensure!(
                path::normalize(protected) != target,
                PermissionDeniedSnafu { path: &target }
            );
        }

        let Some(node) = self.lookup(&target).node else {
            if options.force {
                debug!("Ignoring removal of missing {}", target);
                return Ok(());
            }
            return NotFoundSnafu { path: &target }.fail();
        };
        ensure!(
            node.is_file() || options.recursive,
            IsADirectorySnafu { path: &target }
        );

        let segments = path::canonical_segments(&target);
        let (name, parent) = segments
            .split_last()
            .context(PermissionDeniedSnafu { path: &target })?;
        let children = self.children_mut(parent, &target)?;
        if let Some(removed) = children.remove(*name) {
            debug!("Removed {}", target);
            dismantle(removed);
        }

        Ok(())
    }

    /// Copies `src` to `dst` with `cp` semantics: when `dst` is an existing
    /// directory, the source lands inside it under its own name.
    ///
    /// Directories need `recursive` and are merged into an existing
    /// destination directory. The copy shares nothing with the source.
    pub fn copy(&mut self, src: &str, dst: &str, recursive: bool) -> Result<(), VfsError> {
        let src = path::normalize(src);
        let source = self.lookup(&src).node.context(NotFoundSnafu { path: &src })?;
        ensure!(
            source.is_file() || recursive,
            IsADirectorySnafu { path: &src }
        );

        let target = self.copy_target(&src, dst);
        if source.is_directory() {
            ensure!(
                !path::is_within(&target, &src),
                PermissionDeniedSnafu { path: &target }
            );
        }

        let snapshot = Snapshot::of(source);
        self.check_placement(&target, &snapshot)?;

        debug!("Copying {} to {}", src, target);
        match snapshot {
            Snapshot::File(content) => self.write(&target, &content, WriteMode::Overwrite),
            Snapshot::Directory(descendants) => {
                self.ensure_dir(&target, false)?;
                for descendant in descendants {
                    let path = path::join(&target, descendant.path());
                    match descendant {
                        Descendant::Directory { .. } => self.ensure_dir(&path, false)?,
                        Descendant::File { content, .. } => {
                            self.write(&path, &content, WriteMode::Overwrite)?
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Moves `src` to `dst` as a recursive copy followed by a forced
    /// recursive removal of `src`.
    ///
    /// `protected` (normally the working directory) may not be moved, nor may
    /// any directory containing it. Not atomic: if the removal fails after the
    /// copy succeeded, both the source and the destination remain.
    pub fn move_path(
        &mut self,
        src: &str,
        dst: &str,
        protected: Option<&str>,
    ) -> Result<(), VfsError> {
        let src = path::normalize(src);
        ensure!(
            self.lookup(&src).node.is_some(),
            NotFoundSnafu { path: &src }
        );
        if let Some(protected) = protected {
            ensure!(
                !path::is_within(&path::normalize(protected), &src),
                PermissionDeniedSnafu { path: &src }
            );
        }

        let target = self.copy_target(&src, dst);
        if target == src {
            debug!("Moving {} onto itself, nothing to do", src);
            return Ok(());
        }

        self.copy(&src, dst, true)?;
        self.remove(
            &src,
            RemoveOptions {
                recursive: true,
                force: true,
            },
            None,
        )
    }

    /// Final destination of a copy or move from `src` to `dst`.
    fn copy_target(&self, src: &str, dst: &str) -> String {
        let dst = path::normalize(dst);
        match self.lookup(&dst).node {
            Some(Node::Directory { .. }) => path::normalize(&path::join(&dst, path::basename(src))),
            _ => dst,
        }
    }

    /// Checks that `snapshot` can be written at `target` without a kind
    /// conflict anywhere in the merged subtree.
    fn check_placement(&self, target: &str, snapshot: &Snapshot) -> Result<(), VfsError> {
        let found = self.lookup(target);
        if found.node.is_none() {
            ensure!(found.is_creatable(), NotFoundSnafu { path: target });
            return Ok(());
        }
        check_kind(found.node, snapshot.kind(), target)?;

        if let Snapshot::Directory(descendants) = snapshot {
            for descendant in descendants {
                let path = path::join(target, descendant.path());
                let kind = match descendant {
                    Descendant::Directory { .. } => NodeKind::Directory,
                    Descendant::File { .. } => NodeKind::File,
                };
                check_kind(self.lookup(&path).node, kind, &path)?;
            }
        }

        Ok(())
    }
}

fn check_kind(existing: Option<&Node>, incoming: NodeKind, path: &str) -> Result<(), VfsError> {
    match (existing.map(Node::kind), incoming) {
        (Some(NodeKind::Directory), NodeKind::File) => IsADirectorySnafu { path }.fail(),
        (Some(NodeKind::File), NodeKind::Directory) => AlreadyExistsSnafu { path }.fail(),
        _ => Ok(()),
    }
}
