use colored::Colorize;

use crate::shell::{ListingRow, Output, ShellError};

/// Turns command results into terminal text.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn output(&self, output: &Output) -> String {
        match output {
            Output::Listing { rows, long } if self.color && !rows.is_empty() => {
                if *long {
                    rows.iter()
                        .map(|row| format!("{} {}\n", row.long_prefix().dimmed(), self.name(row)))
                        .collect()
                } else {
                    let names = rows.iter().map(|row| self.name(row)).collect::<Vec<_>>();
                    format!("{}\n", names.join("  "))
                }
            }
            other => other.to_plain_text(),
        }
    }

    pub fn error(&self, error: &ShellError) -> String {
        if self.color {
            error.to_string().red().to_string()
        } else {
            error.to_string()
        }
    }

    fn name(&self, row: &ListingRow) -> String {
        if row.is_directory() {
            row.display_name().blue().bold().to_string()
        } else {
            row.display_name()
        }
    }
}
