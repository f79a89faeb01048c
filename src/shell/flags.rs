use std::collections::HashSet;

/// Command arguments split into flags and operands.
///
/// `-abc` sets `a`, `b` and `c`; `--name` sets `name`. A lone `-` is an
/// operand. Flags nobody asks about are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    flags: HashSet<String>,
    pub operands: Vec<String>,
}

impl ParsedArgs {
    pub fn parse(args: &[String]) -> Self {
        let mut parsed = Self::default();

        for arg in args {
            if let Some(long) = arg.strip_prefix("--") {
                parsed.flags.insert(long.to_string());
            } else if let Some(shorts) = arg.strip_prefix('-').filter(|s| !s.is_empty()) {
                parsed.flags.extend(shorts.chars().map(String::from));
            } else {
                parsed.operands.push(arg.clone());
            }
        }

        parsed
    }

    /// Whether the short or the long form of a flag was given.
    pub fn has(&self, short: char, long: &str) -> bool {
        self.flags.contains(long) || self.flags.contains(&short.to_string())
    }

    pub fn operand(&self, index: usize) -> Option<&str> {
        self.operands.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(&["-la"], 'l', "long", true)]
    #[case(&["-la"], 'a', "all", true)]
    #[case(&["--all"], 'a', "all", true)]
    #[case(&["-r", "-f"], 'f', "force", true)]
    #[case(&["-x"], 'p', "parents", false)]
    #[case(&["-"], 'p', "parents", false)]
    fn flag_cases(
        #[case] raw: &[&str],
        #[case] short: char,
        #[case] long: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(ParsedArgs::parse(&args(raw)).has(short, long), expected);
    }

    #[test]
    fn operands_keep_order_and_skip_flags() {
        let parsed = ParsedArgs::parse(&args(&["-r", "src", "--verbose", "dst", "-"]));

        assert_eq!(parsed.operands, vec!["src", "dst", "-"]);
        assert_eq!(parsed.operand(1), Some("dst"));
        assert!(parsed.has('r', "recursive"));
        assert!(parsed.has('v', "verbose"));
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let parsed = ParsedArgs::parse(&args(&["-z", "--what", "file"]));

        assert_eq!(parsed.operands, vec!["file"]);
        assert!(!parsed.has('r', "recursive"));
    }
}
