use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;
use crate::config::DEFAULT_CONFIG_FILE;

/// A Unix-like shell over an in-memory filesystem that is saved between
/// sessions.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Run this line instead of starting an interactive session. Repeatable.
    #[clap(long = "command", short = 'c', value_name = "LINE")]
    pub commands: Vec<String>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Path of the YAML config file
    #[clap(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Where the session is saved. Overrides `state_dir` from the config.
    #[clap(long)]
    pub state_dir: Option<PathBuf>,

    /// Ignore saved state and start from the seed layout
    #[clap(long)]
    pub fresh: bool,

    #[clap(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::RuntimeConfig;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["vfsh"]);

        assert!(cli.commands.is_empty());
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert_eq!(cli.config, PathBuf::from("vfsh.yaml"));
        assert_eq!(cli.state_dir, None);
    }

    #[test]
    fn repeated_commands_keep_order() {
        let cli = Cli::parse_from(["vfsh", "-c", "mkdir a", "--command", "ls", "-l", "debug"]);

        assert_eq!(cli.commands, vec!["mkdir a", "ls"]);
        assert_eq!(cli.log_level, LogLevel::Debug);
    }

    #[test]
    fn into_runtime_config() {
        let cli = Cli::parse_from(["vfsh", "--state-dir", "/tmp/s", "--fresh", "--no-color"]);
        let runtime: RuntimeConfig = cli.into();

        assert_eq!(runtime.state_dir, Some(PathBuf::from("/tmp/s")));
        assert!(runtime.fresh);
        assert!(!runtime.color);
    }
}
