use snafu::Snafu;

/// Failure kinds of the virtual filesystem.
///
/// Every variant carries the canonical path it concerns, so callers can
/// branch on the kind and render their own message.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VfsError {
    #[snafu(display("{path}: No such file or directory"))]
    NotFound { path: String },
    #[snafu(display("{path}: Not a directory"))]
    NotADirectory { path: String },
    #[snafu(display("{path}: Is a directory"))]
    IsADirectory { path: String },
    #[snafu(display("{path}: File exists"))]
    AlreadyExists { path: String },
    #[snafu(display("{path}: Operation not permitted"))]
    PermissionDenied { path: String },
    #[snafu(display("Invalid filesystem data: {reason}"))]
    InvalidFormat { reason: String },
}

impl VfsError {
    /// The Unix-style reason text, without the path.
    pub fn reason(&self) -> &'static str {
        match self {
            VfsError::NotFound { .. } => "No such file or directory",
            VfsError::NotADirectory { .. } => "Not a directory",
            VfsError::IsADirectory { .. } => "Is a directory",
            VfsError::AlreadyExists { .. } => "File exists",
            VfsError::PermissionDenied { .. } => "Operation not permitted",
            VfsError::InvalidFormat { .. } => "Invalid filesystem data",
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            VfsError::NotFound { path }
            | VfsError::NotADirectory { path }
            | VfsError::IsADirectory { path }
            | VfsError::AlreadyExists { path }
            | VfsError::PermissionDenied { path } => Some(path),
            VfsError::InvalidFormat { .. } => None,
        }
    }
}
