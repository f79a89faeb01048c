//! Unix-like command layer over the virtual filesystem.
//!
//! A line is tokenized, dispatched to a command from the table in
//! [`commands`], and its structured [`Output`] is either returned or written
//! into a file when the line ends in `> file` or `>> file`.

pub mod commands;
mod context;
mod error;
mod flags;
mod output;
mod parse;

use snafu::ResultExt;

pub use context::ShellContext;
pub use error::ShellError;
pub use flags::ParsedArgs;
pub use output::{ListingRow, Output};
pub use parse::{CommandLine, Redirect, parse_line};

use error::FilesystemSnafu;

/// Runs one line against `ctx`. A blank line does nothing.
pub fn run_line(ctx: &mut ShellContext, line: &str) -> Result<Output, ShellError> {
    let CommandLine { argv, redirect } = parse_line(line)?;

    let (command, output) = match argv.split_first() {
        Some((name, args)) => (name.as_str(), commands::execute(ctx, name, args)?),
        None => ("sh", Output::Empty),
    };

    let Some(redirect) = redirect else {
        return Ok(output);
    };
    let target = ctx.resolve(&redirect.target);
    let written = ctx
        .vfs_mut()
        .write(&target, &output.to_plain_text(), redirect.mode);
    ctx.request_persist();
    written.context(FilesystemSnafu {
        command,
        operand: &redirect.target,
    })?;

    Ok(Output::Empty)
}
