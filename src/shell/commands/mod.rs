//! The command table and dispatch.

mod files;
mod navigation;
mod search;
mod system;

use snafu::OptionExt;
use tracing::debug;

use super::context::ShellContext;
use super::error::{ShellError, UnknownCommandSnafu};
use super::output::Output;
use crate::filesystem::VfsError;

pub type Handler = fn(&mut ShellContext, &[String]) -> Result<Output, ShellError>;

pub struct CommandDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub description: &'static str,
    /// Whether a run may change the tree or the working directory.
    pub mutates: bool,
    pub handler: Handler,
}

pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "cd",
        aliases: &[],
        usage: "cd [path|-]",
        description: "Change the working directory",
        mutates: true,
        handler: navigation::cd,
    },
    CommandDef {
        name: "pwd",
        aliases: &[],
        usage: "pwd",
        description: "Print the working directory",
        mutates: false,
        handler: navigation::pwd,
    },
    CommandDef {
        name: "ls",
        aliases: &["ll"],
        usage: "ls [-l] [-a] [path]",
        description: "List directory contents",
        mutates: false,
        handler: navigation::ls,
    },
    CommandDef {
        name: "cat",
        aliases: &[],
        usage: "cat <file...>",
        description: "Print file contents",
        mutates: false,
        handler: files::cat,
    },
    CommandDef {
        name: "echo",
        aliases: &[],
        usage: "echo [-n] [text...]",
        description: "Print text",
        mutates: false,
        handler: files::echo,
    },
    CommandDef {
        name: "touch",
        aliases: &[],
        usage: "touch <file...>",
        description: "Create empty files",
        mutates: true,
        handler: files::touch,
    },
    CommandDef {
        name: "mkdir",
        aliases: &[],
        usage: "mkdir [-p] <directory...>",
        description: "Create directories",
        mutates: true,
        handler: files::mkdir,
    },
    CommandDef {
        name: "rm",
        aliases: &[],
        usage: "rm [-r] [-f] <path...>",
        description: "Remove files and directories",
        mutates: true,
        handler: files::rm,
    },
    CommandDef {
        name: "cp",
        aliases: &[],
        usage: "cp [-r] <source> <destination>",
        description: "Copy files and directories",
        mutates: true,
        handler: files::cp,
    },
    CommandDef {
        name: "mv",
        aliases: &[],
        usage: "mv <source> <destination>",
        description: "Move or rename files and directories",
        mutates: true,
        handler: files::mv,
    },
    CommandDef {
        name: "grep",
        aliases: &[],
        usage: "grep [-i] [-n] <pattern> <file...>",
        description: "Print lines containing a pattern",
        mutates: false,
        handler: search::grep,
    },
    CommandDef {
        name: "history",
        aliases: &[],
        usage: "history [-c]",
        description: "Show or clear the command history",
        mutates: false,
        handler: system::history,
    },
    CommandDef {
        name: "date",
        aliases: &[],
        usage: "date [-u] [+format]",
        description: "Print the current date and time",
        mutates: false,
        handler: system::date,
    },
    CommandDef {
        name: "uptime",
        aliases: &[],
        usage: "uptime",
        description: "Show how long the session has been running",
        mutates: false,
        handler: system::uptime,
    },
    CommandDef {
        name: "help",
        aliases: &[],
        usage: "help",
        description: "List available commands",
        mutates: false,
        handler: help,
    },
];

pub fn find(name: &str) -> Option<&'static CommandDef> {
    COMMANDS
        .iter()
        .find(|def| def.name == name || def.aliases.iter().any(|alias| *alias == name))
}

/// Runs one command. Mutating commands request persistence even when they
/// fail part way, since earlier operands may already have been applied.
pub fn execute(
    ctx: &mut ShellContext,
    name: &str,
    args: &[String],
) -> Result<Output, ShellError> {
    let def = find(name).context(UnknownCommandSnafu { name })?;
    debug!("Running {} with {:?}", def.name, args);

    let result = (def.handler)(ctx, args);
    if def.mutates {
        ctx.request_persist();
    }
    result
}

fn help(_ctx: &mut ShellContext, _args: &[String]) -> Result<Output, ShellError> {
    let width = COMMANDS
        .iter()
        .map(|def| def.usage.len())
        .max()
        .unwrap_or_default();

    let mut text = String::from("Available commands:\n");
    for def in COMMANDS {
        text.push_str(&format!("  {:<width$}  {}\n", def.usage, def.description));
    }
    text.push_str("  exit\n");
    Ok(Output::Text(text))
}

/// Blames whichever operand of a two-operand command the failing path came
/// from.
fn pair_error<'a>(
    command: &'a str,
    (src, src_label): (&'a str, &'a str),
    dst_label: &'a str,
) -> impl FnOnce(VfsError) -> ShellError + 'a {
    move |source| {
        let operand = if source.path() == Some(src) {
            src_label
        } else {
            dst_label
        };
        ShellError::Filesystem {
            command: command.to_string(),
            operand: operand.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::Vfs;
    use crate::filesystem::path::DEFAULT_HOME;

    fn ctx() -> ShellContext {
        ShellContext::new(Vfs::seeded(), DEFAULT_HOME)
    }

    #[test]
    fn finds_commands_and_aliases() {
        assert_eq!(find("ls").map(|def| def.name), Some("ls"));
        assert_eq!(find("ll").map(|def| def.name), Some("ls"));
        assert_eq!(find("date").map(|def| def.name), Some("date"));
        assert!(find("whoami").is_none());
    }

    #[test]
    fn unknown_command() {
        let error = execute(&mut ctx(), "frobnicate", &[]).unwrap_err();
        assert_eq!(error.to_string(), "frobnicate: command not found");
    }

    #[test]
    fn only_mutating_commands_request_persistence() {
        let mut ctx = ctx();

        execute(&mut ctx, "pwd", &[]).unwrap();
        assert!(!ctx.take_persist_request());

        execute(&mut ctx, "touch", &["a.txt".to_string()]).unwrap();
        assert!(ctx.take_persist_request());
    }

    #[test]
    fn help_lists_every_command() {
        let Output::Text(text) = execute(&mut ctx(), "help", &[]).unwrap() else {
            panic!("help should print text");
        };

        for def in COMMANDS {
            assert!(text.contains(def.usage), "{} missing from help", def.name);
        }
    }
}
