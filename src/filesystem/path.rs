//! Path resolution for the virtual filesystem.
//!
//! Paths are plain `/`-separated strings. Resolution never touches the tree
//! and cannot fail: `..` above the root is clamped to the root.

use std::borrow::Cow;

/// Home directory used when the caller does not supply one.
pub const DEFAULT_HOME: &str = "/home/guest";

/// Turns `input` into a canonical absolute path, relative to `cwd`.
///
/// `~` and `~/...` are expanded to `home`. An empty input yields `cwd`
/// unchanged.
pub fn resolve(cwd: &str, input: &str, home: &str) -> String {
    if input.is_empty() {
        return cwd.to_string();
    }

    let expanded: Cow<'_, str> = if input == "~" {
        Cow::Borrowed(home)
    } else if let Some(rest) = input.strip_prefix("~/") {
        Cow::Owned(format!("{home}/{rest}"))
    } else {
        Cow::Borrowed(input)
    };

    if expanded.starts_with('/') {
        from_segments(&canonical_segments(&expanded))
    } else {
        from_segments(&canonical_segments(&format!("{cwd}/{expanded}")))
    }
}

/// Splits a path into its canonical segments, dropping empty and `.`
/// segments and applying `..`.
pub fn canonical_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments
}

/// Builds the canonical absolute form of already-canonical segments.
pub fn from_segments(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

/// Canonicalizes an absolute path without a working directory.
pub fn normalize(path: &str) -> String {
    from_segments(&canonical_segments(path))
}

/// Last segment of `path`; empty for the root.
pub fn basename(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

pub fn join(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

/// Whether canonical `path` equals `ancestor` or lies beneath it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    ancestor == "/"
        || path == ancestor
        || path
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}
