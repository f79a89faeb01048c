use snafu::Snafu;

use crate::filesystem::VfsError;

/// A failed shell command, ready to be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ShellError {
    #[snafu(display("{command}: {operand}: {}", source.reason()))]
    Filesystem {
        command: String,
        operand: String,
        source: VfsError,
    },
    #[snafu(display("{command}: missing {what}"))]
    MissingOperand { command: String, what: String },
    #[snafu(display("{command}: invalid {what} '{operand}'"))]
    InvalidOperand {
        command: String,
        operand: String,
        what: String,
    },
    #[snafu(display("cd: OLDPWD not set"))]
    OldPwdNotSet,
    #[snafu(display("{name}: command not found"))]
    UnknownCommand { name: String },
    #[snafu(display("syntax error: {message}"))]
    Syntax { message: String },
}

impl ShellError {
    /// The filesystem failure behind this error, if any.
    pub fn vfs_error(&self) -> Option<&VfsError> {
        match self {
            ShellError::Filesystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filesystem_error_renders_command_operand_and_reason() {
        let error = ShellError::Filesystem {
            command: "cat".into(),
            operand: "notes.txt".into(),
            source: VfsError::NotFound {
                path: "/home/guest/notes.txt".into(),
            },
        };

        assert_eq!(error.to_string(), "cat: notes.txt: No such file or directory");
    }

    #[test]
    fn missing_operand_message() {
        let error = ShellError::MissingOperand {
            command: "cp".into(),
            what: "destination operand".into(),
        };

        assert_eq!(error.to_string(), "cp: missing destination operand");
    }
}
