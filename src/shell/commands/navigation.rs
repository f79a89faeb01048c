use snafu::{OptionExt, ResultExt};

use crate::filesystem::{NodeKind, VfsError, path};
use crate::shell::context::ShellContext;
use crate::shell::error::{FilesystemSnafu, OldPwdNotSetSnafu, ShellError};
use crate::shell::flags::ParsedArgs;
use crate::shell::output::{ListingRow, Output};

/// `cd` with no operand goes home, `cd -` goes back to the previous
/// directory and prints it. On failure the working directory is unchanged.
pub fn cd(ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let parsed = ParsedArgs::parse(args);
    let (target, operand) = match parsed.operand(0) {
        None => (ctx.home().to_string(), ctx.home().to_string()),
        Some("-") => {
            let previous = ctx.prev_cwd().context(OldPwdNotSetSnafu)?;
            (previous.to_string(), previous.to_string())
        }
        Some(operand) => (ctx.resolve(operand), operand.to_string()),
    };

    let stat = ctx
        .vfs()
        .stat(&target)
        .context(FilesystemSnafu { command: "cd", operand: &operand })?;
    if stat.kind != NodeKind::Directory {
        return Err(VfsError::NotADirectory { path: target })
            .context(FilesystemSnafu { command: "cd", operand });
    }

    let announce = parsed.operand(0) == Some("-");
    ctx.set_cwd(target);
    if announce {
        Ok(Output::Text(format!("{}\n", ctx.cwd())))
    } else {
        Ok(Output::Empty)
    }
}

pub fn pwd(ctx: &mut ShellContext, _args: &[String]) -> Result<Output, ShellError> {
    Ok(Output::Text(format!("{}\n", ctx.cwd())))
}

/// Lists a directory in insertion order. Dot-names are hidden unless `-a`.
pub fn ls(ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let parsed = ParsedArgs::parse(args);
    let long = parsed.has('l', "long");
    let all = parsed.has('a', "all");
    let operand = parsed.operand(0).unwrap_or(".");
    let target = ctx.resolve(operand);

    let context = || FilesystemSnafu {
        command: "ls",
        operand,
    };
    let entries = ctx.vfs().list(&target).context(context())?;

    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries.into_iter().filter(|entry| all || !entry.is_hidden()) {
        let stat = ctx
            .vfs()
            .stat(&path::join(&target, &entry.name))
            .context(context())?;
        rows.push(ListingRow {
            name: entry.name,
            stat,
        });
    }

    Ok(Output::Listing { rows, long })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::Vfs;
    use crate::filesystem::path::DEFAULT_HOME;

    fn ctx() -> ShellContext {
        ShellContext::new(Vfs::seeded(), DEFAULT_HOME)
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn names(output: Output) -> Vec<String> {
        match output {
            Output::Listing { rows, .. } => rows.into_iter().map(|row| row.name).collect(),
            other => panic!("expected a listing, got {other:?}"),
        }
    }

    #[test]
    fn cd_and_pwd() {
        let mut ctx = ctx();
        cd(&mut ctx, &args(&["/tmp"])).unwrap();

        assert_eq!(pwd(&mut ctx, &[]).unwrap(), Output::Text("/tmp\n".into()));
    }

    #[test]
    fn cd_without_operand_goes_home() {
        let mut ctx = ctx();
        cd(&mut ctx, &args(&["/"])).unwrap();
        cd(&mut ctx, &[]).unwrap();

        assert_eq!(ctx.cwd(), DEFAULT_HOME);
    }

    #[test]
    fn cd_dash_returns_to_previous() {
        let mut ctx = ctx();
        assert_eq!(cd(&mut ctx, &args(&["-"])), Err(ShellError::OldPwdNotSet));

        cd(&mut ctx, &args(&["/tmp"])).unwrap();
        let output = cd(&mut ctx, &args(&["-"])).unwrap();

        assert_eq!(ctx.cwd(), DEFAULT_HOME);
        assert_eq!(output, Output::Text(format!("{DEFAULT_HOME}\n")));
    }

    #[test]
    fn cd_to_missing_directory_keeps_cwd() {
        let mut ctx = ctx();
        let error = cd(&mut ctx, &args(&["nowhere"])).unwrap_err();

        assert!(matches!(error.vfs_error(), Some(VfsError::NotFound { .. })));
        assert_eq!(error.to_string(), "cd: nowhere: No such file or directory");
        assert_eq!(ctx.cwd(), DEFAULT_HOME);
    }

    #[test]
    fn cd_into_file_is_not_a_directory() {
        let mut ctx = ctx();
        let error = cd(&mut ctx, &args(&["readme.txt"])).unwrap_err();

        assert!(matches!(
            error.vfs_error(),
            Some(VfsError::NotADirectory { .. })
        ));
        assert_eq!(ctx.cwd(), DEFAULT_HOME);
    }

    #[test]
    fn ls_hides_dot_names_unless_all() {
        let mut ctx = ctx();
        ctx.vfs_mut().create_file("/tmp/.hidden").unwrap();
        ctx.vfs_mut().create_file("/tmp/shown").unwrap();

        assert_eq!(names(ls(&mut ctx, &args(&["/tmp"])).unwrap()), vec!["shown"]);
        assert_eq!(
            names(ls(&mut ctx, &args(&["-a", "/tmp"])).unwrap()),
            vec![".hidden", "shown"]
        );
    }

    #[test]
    fn ls_defaults_to_cwd() {
        let mut ctx = ctx();
        assert_eq!(names(ls(&mut ctx, &[]).unwrap()), vec!["readme.txt"]);
    }

    #[test]
    fn ls_long_reports_sizes() {
        let mut ctx = ctx();
        ctx.vfs_mut().ensure_dir("/tmp/d/x", true).unwrap();
        let output = ls(&mut ctx, &args(&["-l", "/tmp"])).unwrap();

        assert_eq!(output.to_plain_text(), "drwxr-xr-x      1 d/\n");
    }

    #[test]
    fn ls_on_file_fails() {
        let mut ctx = ctx();
        let error = ls(&mut ctx, &args(&["readme.txt"])).unwrap_err();

        assert!(matches!(
            error.vfs_error(),
            Some(VfsError::NotADirectory { .. })
        ));
    }
}
