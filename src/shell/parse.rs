use logos::{Logos, Span};

use crate::filesystem::WriteMode;

use super::error::ShellError;

/// One tokenized command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    pub argv: Vec<String>,
    pub redirect: Option<Redirect>,
}

/// `> target` or `>> target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: String,
    pub mode: WriteMode,
}

/// Lexical pieces of a line. Word pieces that touch (`a'b'"c"`) are glued
/// into one word afterwards by comparing spans.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"\s+")]
enum Fragment {
    #[token(">>")]
    Append,

    #[token(">")]
    Overwrite,

    #[regex(r"'[^']*'", single_quoted)]
    SingleQuoted(String),

    #[regex(r#""([^"\\]|\\.)*""#, double_quoted)]
    DoubleQuoted(String),

    #[regex(r"'[^']*", |_| '\'')]
    #[regex(r#""([^"\\]|\\.)*\\?"#, |_| '"')]
    Unterminated(char),

    #[regex(r#"([^\s'"\\>]|\\.?)+"#, bare)]
    Bare(String),
}

impl Fragment {
    fn into_word(self) -> Option<String> {
        match self {
            Fragment::SingleQuoted(text) | Fragment::DoubleQuoted(text) | Fragment::Bare(text) => {
                Some(text)
            }
            _ => None,
        }
    }
}

fn single_quoted(lex: &mut logos::Lexer<Fragment>) -> String {
    let s = lex.slice();
    s[1..s.len() - 1].to_string()
}

fn double_quoted(lex: &mut logos::Lexer<Fragment>) -> String {
    let s = lex.slice();
    let mut out = String::with_capacity(s.len());
    let mut chars = s[1..s.len() - 1].chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(escaped @ ('"' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn bare(lex: &mut logos::Lexer<Fragment>) -> String {
    let mut out = String::with_capacity(lex.slice().len());
    let mut chars = lex.slice().chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Word(String),
    Redirect(WriteMode),
}

/// Splits a line into words, honouring quotes, backslash escapes and output
/// redirection.
pub fn parse_line(line: &str) -> Result<CommandLine, ShellError> {
    let mut tokens = tokenize(line)?.into_iter();
    let mut parsed = CommandLine::default();

    while let Some(token) = tokens.next() {
        match token {
            Token::Word(word) => parsed.argv.push(word),
            Token::Redirect(mode) => match tokens.next() {
                Some(Token::Word(target)) => parsed.redirect = Some(Redirect { target, mode }),
                _ => {
                    return Err(ShellError::Syntax {
                        message: "missing redirection target".into(),
                    });
                }
            },
        }
    }

    Ok(parsed)
}

fn tokenize(line: &str) -> Result<Vec<Token>, ShellError> {
    let mut tokens = Vec::new();
    let mut word_end: Option<usize> = None;

    for (result, Span { start, end }) in Fragment::lexer(line).spanned() {
        let fragment = result.map_err(|()| ShellError::Syntax {
            message: format!("unexpected character at column {}", start + 1),
        })?;

        let mode = match fragment {
            Fragment::Unterminated(quote) => {
                return Err(ShellError::Syntax {
                    message: format!("unterminated {quote} quote"),
                });
            }
            Fragment::Append => Some(WriteMode::Append),
            Fragment::Overwrite => Some(WriteMode::Overwrite),
            _ => None,
        };
        if let Some(mode) = mode {
            tokens.push(Token::Redirect(mode));
            word_end = None;
            continue;
        }

        let Some(text) = fragment.into_word() else {
            continue;
        };
        match (word_end == Some(start), tokens.last_mut()) {
            (true, Some(Token::Word(word))) => word.push_str(&text),
            _ => tokens.push(Token::Word(text)),
        }
        word_end = Some(end);
    }

    Ok(tokens)
}
