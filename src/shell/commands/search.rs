use snafu::{OptionExt, ensure};

use crate::filesystem::GrepOptions;
use crate::shell::context::ShellContext;
use crate::shell::error::{MissingOperandSnafu, ShellError};
use crate::shell::flags::ParsedArgs;
use crate::shell::output::Output;

/// Literal line search. With several files each line is prefixed by the
/// file name as the user typed it.
pub fn grep(ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let parsed = ParsedArgs::parse(args);
    let pattern = parsed.operand(0).context(MissingOperandSnafu {
        command: "grep",
        what: "pattern",
    })?;
    let labels = parsed.operands.get(1..).unwrap_or_default();
    ensure!(
        !labels.is_empty(),
        MissingOperandSnafu {
            command: "grep",
            what: "file operand",
        }
    );

    let options = GrepOptions {
        ignore_case: parsed.has('i', "ignore-case"),
        line_numbers: parsed.has('n', "line-number"),
    };
    let paths = labels
        .iter()
        .map(|label| ctx.resolve(label))
        .collect::<Vec<_>>();

    let matches = ctx
        .vfs()
        .grep(pattern, &paths, options)
        .map_err(|source| {
            let operand = paths
                .iter()
                .position(|path| source.path() == Some(path.as_str()))
                .map_or(pattern, |index| labels[index].as_str());
            ShellError::Filesystem {
                command: "grep".into(),
                operand: operand.to_string(),
                source,
            }
        })?;

    if matches.is_empty() {
        return Ok(Output::Empty);
    }

    let mut text = String::new();
    for mut found in matches {
        if let Some(file) = found.file.take() {
            let label = paths
                .iter()
                .position(|path| *path == file)
                .map_or(file, |index| labels[index].clone());
            found.file = Some(label);
        }
        text.push_str(&format!("{found}\n"));
    }
    Ok(Output::Text(text))
}
