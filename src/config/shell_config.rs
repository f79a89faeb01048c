use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::filesystem::path::DEFAULT_HOME;

pub const DEFAULT_CONFIG_FILE: &str = "vfsh.yaml";
const DEFAULT_STATE_DIR: &str = ".vfsh";
const DEFAULT_PROMPT: &str = "guest@vfs";

/// Settings read from `vfsh.yaml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub home: String,
    pub state_dir: PathBuf,
    pub compress: bool,
    pub prompt: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            home: DEFAULT_HOME.to_string(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            compress: false,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl ShellConfig {
    /// Reads the config at `path`. A missing file yields the defaults.
    pub async fn from_path(path: &Path) -> Result<Self, ConfigError> {
        debug!("Opening config file: {}", path.display());
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).context(ReadSnafu {
                    file_path: path.display().to_string(),
                });
            }
        };

        debug!("Successfully read config file: {} bytes", bytes.len());
        let contents = String::from_utf8(bytes).context(Utf8Snafu {
            file_path: path.display().to_string(),
        })?;
        Self::try_from(contents.as_str())
    }

    fn apply(&mut self, top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<(), ConfigError> {
        if let Some(home) = string_value(top_level, "home")? {
            ensure!(home.starts_with('/'), RelativeHomeSnafu { home });
            self.home = home;
        }
        if let Some(state_dir) = string_value(top_level, "state_dir")? {
            self.state_dir = PathBuf::from(state_dir);
        }
        if let Some(compress) = bool_value(top_level, "compress")? {
            self.compress = compress;
        }
        if let Some(prompt) = string_value(top_level, "prompt")? {
            self.prompt = prompt;
        }
        Ok(())
    }
}

fn lookup<'a, 'y>(
    top_level: &'a LinkedHashMap<Yaml<'y>, Yaml<'y>>,
    key: &'static str,
) -> Option<&'a Yaml<'y>> {
    top_level
        .get(&Yaml::Value(Scalar::String(Cow::Borrowed(key))))
        .filter(|value| !matches!(value, Yaml::Value(Scalar::Null)))
}

fn string_value(
    top_level: &LinkedHashMap<Yaml, Yaml>,
    key: &'static str,
) -> Result<Option<String>, ConfigError> {
    lookup(top_level, key)
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .context(InvalidValueSnafu {
                    key,
                    expected: "a string",
                })
        })
        .transpose()
}

fn bool_value(
    top_level: &LinkedHashMap<Yaml, Yaml>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    lookup(top_level, key)
        .map(|value| match value {
            Yaml::Value(Scalar::Boolean(flag)) => Ok(*flag),
            _ => InvalidValueSnafu {
                key,
                expected: "true or false",
            }
            .fail(),
        })
        .transpose()
}

impl TryFrom<&str> for ShellConfig {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let mut config = Self::default();

        let Some(document) = documents.first() else {
            return Ok(config);
        };
        if matches!(document, Yaml::Value(Scalar::Null)) {
            return Ok(config);
        }

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;
        config.apply(top_level)?;
        Ok(config)
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Config file {} is not valid UTF-8", file_path))]
    Utf8Error {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("'{}' should be {}", key, expected))]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
    #[snafu(display("home '{}' must be an absolute path", home))]
    RelativeHome { home: String },
}
