use crate::filesystem::{NodeKind, NodeStat};

/// What a command produced, before any rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Empty,
    Text(String),
    Listing { rows: Vec<ListingRow>, long: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub name: String,
    pub stat: NodeStat,
}

impl ListingRow {
    pub fn is_directory(&self) -> bool {
        self.stat.kind == NodeKind::Directory
    }

    pub fn permissions(&self) -> &'static str {
        if self.is_directory() {
            "drwxr-xr-x"
        } else {
            "-rw-r--r--"
        }
    }

    /// Name with a trailing `/` for directories.
    pub fn display_name(&self) -> String {
        if self.is_directory() {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Everything in a long listing row before the name.
    pub fn long_prefix(&self) -> String {
        format!("{} {:>6}", self.permissions(), self.stat.size)
    }
}

impl Output {
    /// Uncoloured text, as written by output redirection.
    pub fn to_plain_text(&self) -> String {
        match self {
            Output::Empty => String::new(),
            Output::Text(text) => text.clone(),
            Output::Listing { rows, .. } if rows.is_empty() => String::new(),
            Output::Listing { rows, long: true } => rows
                .iter()
                .map(|row| format!("{} {}\n", row.long_prefix(), row.display_name()))
                .collect(),
            Output::Listing { rows, long: false } => {
                let names = rows
                    .iter()
                    .map(ListingRow::display_name)
                    .collect::<Vec<_>>();
                format!("{}\n", names.join("  "))
            }
        }
    }
}
