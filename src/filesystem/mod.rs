//! In-memory virtual filesystem backing the terminal.
//!
//! This module provides a single-rooted tree of files and directories with
//! POSIX-style path resolution, structural operations (list, create, write,
//! remove, copy, move), line search, and a text codec for persistence.

mod codec;
mod error;
mod node;
mod operations;
pub mod path;
mod search;
mod tree;

pub use error::VfsError;
pub use node::{Children, Descendant, DirEntry, Node, NodeKind, NodeStat};
pub use operations::{RemoveOptions, WriteMode};
pub use search::{GrepMatch, GrepOptions};
pub use tree::{Lookup, Vfs};
