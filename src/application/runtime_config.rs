use std::path::PathBuf;

use crate::cli::Cli;

/// What the command line asked for, minus logging.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Lines to run instead of an interactive session.
    pub commands: Vec<String>,
    pub config_path: PathBuf,
    /// Overrides `state_dir` from the config file.
    pub state_dir: Option<PathBuf>,
    pub fresh: bool,
    pub color: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            commands: cli.commands,
            config_path: cli.config,
            state_dir: cli.state_dir,
            fresh: cli.fresh,
            color: !cli.no_color,
        }
    }
}
