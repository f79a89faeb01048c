use std::fmt::{self, Write};
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Utc};
use snafu::OptionExt;

use crate::shell::context::ShellContext;
use crate::shell::error::{InvalidOperandSnafu, ShellError};
use crate::shell::flags::ParsedArgs;
use crate::shell::output::Output;

const DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Z %Y";

pub fn history(ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let parsed = ParsedArgs::parse(args);
    if parsed.has('c', "clear") {
        ctx.clear_history();
        return Ok(Output::Empty);
    }

    let text: String = ctx
        .history()
        .iter()
        .enumerate()
        .map(|(index, line)| format!("{:>5}  {}\n", index + 1, line))
        .collect();
    Ok(Output::Text(text))
}

/// `date [-u] [+FORMAT]`, with strftime-style formats.
pub fn date(_ctx: &mut ShellContext, args: &[String]) -> Result<Output, ShellError> {
    let parsed = ParsedArgs::parse(args);
    let format = parsed
        .operands
        .iter()
        .find_map(|operand| operand.strip_prefix('+'))
        .unwrap_or(DATE_FORMAT);

    let text = if parsed.has('u', "utc") {
        format_date(&Utc::now(), format)
    } else {
        format_date(&Local::now(), format)
    };
    let text = text.context(InvalidOperandSnafu {
        command: "date",
        operand: format!("+{format}"),
        what: "date format",
    })?;
    Ok(Output::Text(format!("{text}\n")))
}

pub fn uptime(ctx: &mut ShellContext, _args: &[String]) -> Result<Output, ShellError> {
    Ok(Output::Text(format!("{}\n", format_uptime(ctx.uptime()))))
}

/// `None` when `format` holds an unknown specifier.
fn format_date<Tz>(now: &DateTime<Tz>, format: &str) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut text = String::new();
    write!(text, "{}", now.format(format)).ok()?;
    Some(text)
}

fn format_uptime(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    let (days, hours) = (seconds / 86_400, seconds / 3_600 % 24);
    let (minutes, seconds) = (seconds / 60 % 60, seconds % 60);

    match days {
        0 => format!("up {hours:02}:{minutes:02}:{seconds:02}"),
        1 => format!("up 1 day, {hours:02}:{minutes:02}"),
        _ => format!("up {days} days, {hours:02}:{minutes:02}"),
    }
}
