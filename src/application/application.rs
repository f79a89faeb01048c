use std::io;

use rustyline::error::ReadlineError;
use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info};

use super::line_reader::Editor;
use super::render::Renderer;
use super::runtime_config::RuntimeConfig;
use super::session::Session;
use crate::config::{ConfigError, ShellConfig};
use crate::filesystem::Vfs;
use crate::shell::ShellContext;
use crate::storage::{FileStorage, Persistence, StorageError};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let config = ShellConfig::from_path(&app_config.config_path)
            .await
            .context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let state_dir = app_config
            .state_dir
            .clone()
            .unwrap_or_else(|| config.state_dir.clone());
        info!("Using state directory {}", state_dir.display());
        let mut persistence =
            Persistence::new(FileStorage::new(state_dir.clone(), config.compress));

        let ctx = if app_config.fresh {
            info!("Starting fresh from the seed layout");
            ShellContext::new(Vfs::seeded(), &config.home)
        } else {
            persistence
                .restore(&config.home)
                .await
                .context(RestoreSnafu)?
        };

        let color = app_config.color && supports_color::on(Stream::Stdout).is_some();
        colored::control::set_override(color);
        let renderer = Renderer::new(color);

        let (mut out, mut err) = (io::stdout().lock(), io::stderr().lock());
        if app_config.commands.is_empty() {
            let mut editor = Editor::open(&state_dir).context(EditorSnafu)?;
            let ctx = ctx.with_history(editor.entries());
            let mut session = Session::new(ctx, persistence, renderer);

            let finished = session
                .interactive(&config.prompt, &mut editor, &mut out, &mut err)
                .await;
            editor.save().await;
            finished.context(EditorSnafu)?;
        } else {
            let mut session = Session::new(ctx, persistence, renderer);
            let failures = session
                .run_script(&app_config.commands, &mut out, &mut err)
                .await
                .context(TerminalSnafu)?;
            ensure!(failures == 0, CommandsFailedSnafu { failures });
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Failed to restore the saved session"))]
    RestoreError { source: StorageError },
    #[snafu(display("Failed to talk to the terminal"))]
    TerminalError { source: io::Error },
    #[snafu(display("Line editor failed"))]
    EditorError { source: ReadlineError },
    #[snafu(display("{} command(s) failed", failures))]
    CommandsFailed { failures: usize },
}
