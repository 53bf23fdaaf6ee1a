//! Line tokenizer for the KeyValues text format.
//!
//! Every input line maps to at most one token. Malformed quoting is not an
//! error: an unterminated quote swallows the rest of the line.

use tracing::trace;

/// A classified line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `{`
    Open,
    /// `}`
    Close,
    /// A lone key: names the branch about to be opened.
    Name(String),
    /// A `key value` line.
    Pair { key: String, value: String },
}

impl Token {
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Token::Pair {
            key: key.into(),
            value: value.into(),
        }
    }
}

const COMMENT_PREFIX: &str = "//";

/// Classify a single raw line. Returns `None` for blank and comment lines.
pub fn tokenize_line(line: &str) -> Option<Token> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return None;
    }

    match line {
        "{" => return Some(Token::Open),
        "}" => return Some(Token::Close),
        _ => {}
    }

    let (key, rest) = if line.starts_with('"') {
        split_quoted(line)
    } else {
        match line.split_once(char::is_whitespace) {
            Some((key, rest)) => (key, rest),
            // single bare token: branch declarator
            None => return Some(Token::Name(line.to_string())),
        }
    };

    let rest = rest.trim();
    if rest.is_empty() {
        return Some(Token::Name(key.to_string()));
    }

    let value = if rest.starts_with('"') {
        split_quoted(rest).0
    } else {
        rest.split(char::is_whitespace).next().unwrap_or(rest)
    };
    // anything after the value is discarded

    trace!(key, value, "pair");
    Some(Token::pair(key, value))
}

/// Split `"abc" rest` into (`abc`, ` rest`). Expects a leading quote.
fn split_quoted(s: &str) -> (&str, &str) {
    let inner = &s[1..];
    match inner.find('"') {
        Some(end) => (&inner[..end], &inner[end + 1..]),
        None => (inner, ""),
    }
}

/// Tokenize a sequence of lines, dropping the ones that carry no token.
pub fn tokenize<I, S>(lines: I) -> impl Iterator<Item = Token>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| tokenize_line(line.as_ref()))
}
