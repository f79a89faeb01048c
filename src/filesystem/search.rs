use std::fmt;

use super::error::VfsError;
use super::tree::Vfs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrepOptions {
    pub ignore_case: bool,
    pub line_numbers: bool,
}

/// A matching line. `file` is set only when several files were searched,
/// `line_number` (1-based) only when requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepMatch {
    pub file: Option<String>,
    pub line_number: Option<usize>,
    pub line: String,
}

impl fmt::Display for GrepMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{file}:")?;
        }
        if let Some(line_number) = self.line_number {
            write!(f, "{line_number}:")?;
        }
        f.write_str(&self.line)
    }
}

impl Vfs {
    /// Literal substring search over the lines of each file.
    ///
    /// Stops at the first file that cannot be read.
    pub fn grep<S: AsRef<str>>(
        &self,
        pattern: &str,
        files: &[S],
        options: GrepOptions,
    ) -> Result<Vec<GrepMatch>, VfsError> {
        let needle = if options.ignore_case {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };
        let label_files = files.len() > 1;

        let mut matches = Vec::new();
        for file in files {
            let file = file.as_ref();
            let content = self.read(file)?;

            for (index, line) in content.split('\n').enumerate() {
                let hit = if options.ignore_case {
                    line.to_lowercase().contains(&needle)
                } else {
                    line.contains(&needle)
                };
                if hit {
                    matches.push(GrepMatch {
                        file: label_files.then(|| file.to_string()),
                        line_number: options.line_numbers.then_some(index + 1),
                        line: line.to_string(),
                    });
                }
            }
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::WriteMode;

    fn vfs_with(files: &[(&str, &str)]) -> Vfs {
        let mut vfs = Vfs::seeded();
        for (path, content) in files {
            vfs.write(path, content, WriteMode::Overwrite).unwrap();
        }
        vfs
    }

    #[test]
    fn case_sensitive_search_misses_different_case() {
        let vfs = vfs_with(&[("/tmp/f", "first line\nHello World\nlast")]);
        let options = GrepOptions {
            ignore_case: false,
            line_numbers: true,
        };

        let matches = vfs.grep("hello", &["/tmp/f"], options).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn ignore_case_with_line_numbers() {
        let vfs = vfs_with(&[("/tmp/f", "first line\nHello World\nlast")]);
        let options = GrepOptions {
            ignore_case: true,
            line_numbers: true,
        };

        let matches = vfs.grep("hello", &["/tmp/f"], options).unwrap();
        let rendered = matches.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(rendered, vec!["2:Hello World"]);
    }

    #[test]
    fn multiple_files_are_labelled() {
        let vfs = vfs_with(&[("/tmp/a", "apple\nbanana"), ("/tmp/b", "pineapple")]);

        let matches = vfs
            .grep("apple", &["/tmp/a", "/tmp/b"], GrepOptions::default())
            .unwrap();
        let rendered = matches.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(rendered, vec!["/tmp/a:apple", "/tmp/b:pineapple"]);
    }

    #[test]
    fn pattern_is_literal() {
        let vfs = vfs_with(&[("/tmp/f", "a.c\nabc")]);

        let matches = vfs.grep("a.c", &["/tmp/f"], GrepOptions::default()).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, "a.c");
    }

    #[test]
    fn unreadable_file_propagates_error() {
        let vfs = vfs_with(&[]);

        assert!(matches!(
            vfs.grep("x", &["/tmp/none"], GrepOptions::default()),
            Err(VfsError::NotFound { .. })
        ));
        assert!(matches!(
            vfs.grep("x", &["/tmp"], GrepOptions::default()),
            Err(VfsError::IsADirectory { .. })
        ));
    }
}
