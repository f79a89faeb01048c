use derive_more::{Display, IsVariant};
use hashlink::LinkedHashMap;

/// Children of a directory, kept in insertion order.
pub type Children = LinkedHashMap<String, Node>;

/// A single entry of the virtual filesystem tree.
///
/// A node's name is the key under which its parent stores it; the root is the
/// only unnamed node.
#[derive(Debug, PartialEq, Eq, IsVariant)]
pub enum Node {
    File { content: String },
    Directory { children: Children },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NodeKind {
    #[display("file")]
    File,
    #[display("dir")]
    Directory,
}

/// A `(name, kind)` pair as reported by directory listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: NodeKind,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Size information for `ls -l`: content length for files, child count for
/// directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStat {
    pub kind: NodeKind,
    pub size: usize,
}

/// A node below some directory, addressed by its path relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descendant {
    Directory { path: String },
    File { path: String, content: String },
}

impl Descendant {
    pub fn path(&self) -> &str {
        match self {
            Descendant::Directory { path } | Descendant::File { path, .. } => path,
        }
    }
}

impl Node {
    pub fn file(content: impl Into<String>) -> Self {
        Node::File {
            content: content.into(),
        }
    }

    pub fn empty_dir() -> Self {
        Node::Directory {
            children: Children::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::File { .. } => NodeKind::File,
            Node::Directory { .. } => NodeKind::Directory,
        }
    }

    pub fn children(&self) -> Option<&Children> {
        match self {
            Node::Directory { children } => Some(children),
            Node::File { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Children> {
        match self {
            Node::Directory { children } => Some(children),
            Node::File { .. } => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Node::File { content } => Some(content),
            Node::Directory { .. } => None,
        }
    }

    pub fn stat(&self) -> NodeStat {
        let size = match self {
            Node::File { content } => content.len(),
            Node::Directory { children } => children.len(),
        };
        NodeStat {
            kind: self.kind(),
            size,
        }
    }

    /// Every node below `self` in pre-order, siblings in insertion order.
    ///
    /// The result owns its contents, so it stays valid after the tree is
    /// mutated. A file has no descendants.
    pub fn descendants(&self) -> Vec<Descendant> {
        let mut result = Vec::new();
        let mut stack: Vec<(String, &Node)> = Vec::new();
        push_children_reversed(&mut stack, "", self);

        while let Some((path, node)) = stack.pop() {
            match node {
                Node::File { content } => result.push(Descendant::File {
                    path,
                    content: content.clone(),
                }),
                Node::Directory { .. } => {
                    push_children_reversed(&mut stack, &path, node);
                    result.push(Descendant::Directory { path });
                }
            }
        }

        result
    }
}

fn push_children_reversed<'a>(stack: &mut Vec<(String, &'a Node)>, prefix: &str, node: &'a Node) {
    if let Some(children) = node.children() {
        let mut pending = children
            .iter()
            .map(|(name, child)| {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}/{name}")
                };
                (path, child)
            })
            .collect::<Vec<_>>();
        pending.reverse();
        stack.extend(pending);
    }
}

/// Drops a subtree without recursing, so arbitrarily deep trees cannot
/// exhaust the stack.
pub fn dismantle(node: Node) {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        if let Node::Directory { children } = node {
            stack.extend(children.into_iter().map(|(_, child)| child));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut inner = Children::new();
        inner.insert("b.txt".into(), Node::file("bee"));
        let mut children = Children::new();
        children.insert("z".into(), Node::Directory { children: inner });
        children.insert("a.txt".into(), Node::file("ay"));
        Node::Directory { children }
    }

    #[test]
    fn descendants_are_pre_order_in_insertion_order() {
        let paths = sample()
            .descendants()
            .iter()
            .map(|d| d.path().to_string())
            .collect::<Vec<_>>();

        assert_eq!(paths, vec!["z", "z/b.txt", "a.txt"]);
    }

    #[test]
    fn file_has_no_descendants() {
        assert!(Node::file("x").descendants().is_empty());
    }

    #[test]
    fn stat_reports_length_or_child_count() {
        assert_eq!(Node::file("hello").stat().size, 5);
        assert_eq!(sample().stat().size, 2);
        assert_eq!(sample().stat().kind, NodeKind::Directory);
    }

    #[test]
    fn node_kind_displays_short_names() {
        assert_eq!(NodeKind::File.to_string(), "file");
        assert_eq!(NodeKind::Directory.to_string(), "dir");
    }

    #[test]
    fn dismantle_handles_deep_chains() {
        let mut node = Node::file("leaf");
        for _ in 0..100_000 {
            let mut children = Children::new();
            children.insert("d".into(), node);
            node = Node::Directory { children };
        }
        dismantle(node);
    }

    #[test]
    fn hidden_entries_start_with_dot() {
        assert!(DirEntry::new(".profile", NodeKind::File).is_hidden());
        assert!(!DirEntry::new("notes", NodeKind::File).is_hidden());
    }
}
