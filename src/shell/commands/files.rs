use snafu::{ResultExt, ensure};

use super::pair_error;
use crate::filesystem::RemoveOptions;
use crate::shell::context::ShellContext;
use crate::shell::error::{FilesystemSnafu, MissingOperandSnafu, ShellError};
use crate::shell::flags::ParsedArgs;
use crate::shell::output::Output;

pub fn cat(ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let parsed = ParsedArgs::parse(args);
    ensure!(
        !parsed.operands.is_empty(),
        MissingOperandSnafu {
            command: "cat",
            what: "file operand",
        }
    );

    let mut text = String::new();
    for operand in &parsed.operands {
        let content = ctx
            .vfs()
            .read(&ctx.resolve(operand))
            .context(FilesystemSnafu {
                command: "cat",
                operand,
            })?;
        text.push_str(content);
    }
    Ok(Output::Text(text))
}

/// Joins its arguments with spaces. A leading `-n` drops the newline; any
/// other dash-word is printed as is.
pub fn echo(_ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let (newline, words) = match args.split_first() {
        Some((first, rest)) if first == "-n" => (false, rest),
        _ => (true, args),
    };

    let mut text = words.join(" ");
    if newline {
        text.push('\n');
    }
    Ok(Output::Text(text))
}

/// Creates missing files. Anything already present is left alone.
pub fn touch(ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let parsed = ParsedArgs::parse(args);
    ensure!(
        !parsed.operands.is_empty(),
        MissingOperandSnafu {
            command: "touch",
            what: "file operand",
        }
    );

    for operand in &parsed.operands {
        let target = ctx.resolve(operand);
        if ctx.vfs().lookup(&target).node.is_some() {
            continue;
        }
        ctx.vfs_mut()
            .create_file(&target)
            .context(FilesystemSnafu {
                command: "touch",
                operand,
            })?;
    }
    Ok(Output::Empty)
}

pub fn mkdir(ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let parsed = ParsedArgs::parse(args);
    ensure!(
        !parsed.operands.is_empty(),
        MissingOperandSnafu {
            command: "mkdir",
            what: "operand",
        }
    );
    let parents = parsed.has('p', "parents");

    for operand in &parsed.operands {
        let target = ctx.resolve(operand);
        ctx.vfs_mut()
            .ensure_dir(&target, parents)
            .context(FilesystemSnafu {
                command: "mkdir",
                operand,
            })?;
    }
    Ok(Output::Empty)
}

/// Removes each operand in turn. The root and the working directory are
/// refused even with `-rf`.
pub fn rm(ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let parsed = ParsedArgs::parse(args);
    ensure!(
        !parsed.operands.is_empty(),
        MissingOperandSnafu {
            command: "rm",
            what: "operand",
        }
    );
    let options = RemoveOptions {
        recursive: parsed.has('r', "recursive") || parsed.has('R', "recursive"),
        force: parsed.has('f', "force"),
    };

    let cwd = ctx.cwd().to_string();
    for operand in &parsed.operands {
        let target = ctx.resolve(operand);
        ctx.vfs_mut()
            .remove(&target, options, Some(cwd.as_str()))
            .context(FilesystemSnafu {
                command: "rm",
                operand,
            })?;
    }
    Ok(Output::Empty)
}

pub fn cp(ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let parsed = ParsedArgs::parse(args);
    let (src, dst) = source_and_destination("cp", &parsed)?;
    let recursive = parsed.has('r', "recursive") || parsed.has('R', "recursive");

    let (src_path, dst_path) = (ctx.resolve(src), ctx.resolve(dst));
    ctx.vfs_mut()
        .copy(&src_path, &dst_path, recursive)
        .map_err(pair_error("cp", (src_path.as_str(), src), dst))?;
    Ok(Output::Empty)
}

pub fn mv(ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let parsed = ParsedArgs::parse(args);
    let (src, dst) = source_and_destination("mv", &parsed)?;

    let cwd = ctx.cwd().to_string();
    let (src_path, dst_path) = (ctx.resolve(src), ctx.resolve(dst));
    ctx.vfs_mut()
        .move_path(&src_path, &dst_path, Some(cwd.as_str()))
        .map_err(pair_error("mv", (src_path.as_str(), src), dst))?;
    Ok(Output::Empty)
}

fn source_and_destination<'a>(
    command: &str,
    parsed: &'a ParsedArgs,
) -> Result<(&'a str, &'a str), ShellError> {
    match (parsed.operand(0), parsed.operand(1)) {
        (Some(src), Some(dst)) => Ok((src, dst)),
        (Some(_), None) => MissingOperandSnafu {
            command,
            what: "destination operand",
        }
        .fail(),
        _ => MissingOperandSnafu {
            command,
            what: "file operand",
        }
        .fail(),
    }
}
