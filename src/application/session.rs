use std::io::{self, Write};

use rustyline::error::ReadlineError;
use tracing::{debug, error, info};

use super::line_reader::LineReader;
use super::render::Renderer;
use crate::shell::{Output, ShellContext, ShellError, run_line};
use crate::storage::{Persistence, Storage};

const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

/// A shell context bound to its persistence and its terminal rendering.
pub struct Session<S> {
    ctx: ShellContext,
    persistence: Persistence<S>,
    renderer: Renderer,
}

impl<S: Storage> Session<S> {
    pub fn new(ctx: ShellContext, persistence: Persistence<S>, renderer: Renderer) -> Self {
        Self {
            ctx,
            persistence,
            renderer,
        }
    }

    pub fn context(&self) -> &ShellContext {
        &self.ctx
    }

    /// Runs one line and saves the session if the command asked for it. A
    /// failed save is logged; the command's own result is returned as is.
    pub async fn execute(&mut self, line: &str) -> Result<Output, ShellError> {
        self.ctx.record_history(line);
        let result = run_line(&mut self.ctx, line);

        if self.ctx.take_persist_request() {
            if let Err(e) = self.persistence.save(&self.ctx).await {
                error!("Failed to save the session: {}", e);
            }
        }
        result
    }

    /// Runs `lines` in order, continuing past failures. Returns how many
    /// lines failed.
    pub async fn run_script(
        &mut self,
        lines: &[String],
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<usize> {
        let mut failures = 0;
        for line in lines {
            if is_exit(line) {
                break;
            }
            if !self.run_and_print(line, out, err).await? {
                failures += 1;
            }
        }
        Ok(failures)
    }

    /// Reads lines until end of input or `exit`. Ctrl-C discards the
    /// current line.
    pub async fn interactive(
        &mut self,
        prompt: &str,
        reader: &mut impl LineReader,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> Result<(), ReadlineError> {
        info!("Starting interactive session in {}", self.ctx.cwd());

        loop {
            out.flush()?;
            let line = match reader.read_line(&format!("{}:{}$ ", prompt, self.ctx.cwd())) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    debug!("Line interrupted");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    writeln!(out)?;
                    break;
                }
                Err(e) => return Err(e),
            };
            if is_exit(&line) {
                break;
            }

            self.run_and_print(&line, out, err).await?;
            if self.ctx.take_history_cleared() {
                reader.clear_history();
            } else if !line.trim().is_empty() {
                reader.add_history(line.trim());
            }
        }

        info!("Interactive session finished");
        Ok(())
    }

    async fn run_and_print(
        &mut self,
        line: &str,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> io::Result<bool> {
        debug!("Executing line: {}", line);
        match self.execute(line).await {
            Ok(output) => {
                write!(out, "{}", self.renderer.output(&output))?;
                Ok(true)
            }
            Err(e) => {
                writeln!(err, "{}", self.renderer.error(&e))?;
                Ok(false)
            }
        }
    }
}

fn is_exit(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|word| EXIT_COMMANDS.iter().any(|exit| *exit == word))
}
