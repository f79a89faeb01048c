use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    #[snafu(display("Failed to create state directory {}", path.display()))]
    CreateDir { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to read {}", path.display()))]
    Read { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to write {}", path.display()))]
    Write { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to (de)compress {}", path.display()))]
    Compression { path: PathBuf, source: io::Error },
    #[snafu(display("{} does not contain UTF-8 text", path.display()))]
    Utf8 {
        path: PathBuf,
        source: FromUtf8Error,
    },
}
