//! Byte/char classification and tokenization of version and constraint text.
//!
//! The tokenizer never validates the *internal* structure of a `Version`/`Wildcard` token --
//! that's the version parser's job (§4.2). It only decides where one token ends and the next
//! begins, and whether a run of version-characters should be read as a concrete version or as a
//! wildcard.

use crate::dialect::Dialect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Invalid,
    Empty,
    Equal,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    NotEq,
    Caret,
    Tilde,
    Bacon,
    Comma,
    Or,
    Hyphen,
    LBracket,
    RBracket,
    Version,
    Wildcard,
    Eof,
}

/// One classified lexeme, plus how many bytes of the input it (and any skipped whitespace) used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub consumed: usize,
}

fn is_version_char(c: char, dialect: Dialect) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '*' | '+' | '-' | '.')
        || (c == '_' && dialect == Dialect::Maven)
        || (c == '!' && dialect == Dialect::PyPI)
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '=' | '<' | '>' | '!' | '~' | '^' | ',' | '|')
}

fn is_bracket_char(c: char, dialect: Dialect) -> bool {
    matches!(dialect, Dialect::Maven | Dialect::NuGet) && matches!(c, '(' | ')' | '[' | ']')
}

/// Operator strings recognised per dialect, longest-match-first.
fn operator_table(dialect: Dialect) -> &'static [(&'static str, TokenKind)] {
    use TokenKind::*;
    match dialect {
        Dialect::NuGet => &[(",", Comma)],
        Dialect::Maven => &[(",", Comma)],
        Dialect::Go => &[],
        Dialect::PyPI => &[
            ("~=", Bacon),
            ("===", Equal),
            ("==", Equal),
            ("!=", NotEq),
            ("<=", LessEq),
            (">=", GreaterEq),
            ("<", Less),
            (">", Greater),
            (",", Comma),
        ],
        Dialect::RubyGems => &[
            ("~>", Bacon),
            ("!=", NotEq),
            ("<=", LessEq),
            (">=", GreaterEq),
            ("=", Equal),
            ("<", Less),
            (">", Greater),
            (",", Comma),
        ],
        Dialect::Cargo => &[
            ("^", Caret),
            ("~", Tilde),
            ("!=", NotEq),
            ("<=", LessEq),
            (">=", GreaterEq),
            ("=", Equal),
            ("<", Less),
            (">", Greater),
            (",", Comma),
        ],
        Dialect::Default | Dialect::NPM | Dialect::Composer => &[
            ("||", Or),
            ("^", Caret),
            ("~", Tilde),
            ("!=", NotEq),
            ("<=", LessEq),
            (">=", GreaterEq),
            ("=", Equal),
            ("<", Less),
            (">", Greater),
            (",", Comma),
            ("-", Hyphen),
        ],
    }
}

/// Returns `(kind, literal, consumed)` for the next token in `rest`.
pub fn token<'a>(dialect: Dialect, rest: &'a str) -> Token<'a> {
    let trimmed = rest.trim_start();
    let skipped = rest.len() - trimmed.len();

    if trimmed.is_empty() {
        return Token {
            kind: TokenKind::Eof,
            text: "",
            consumed: skipped,
        };
    }

    let first = trimmed.chars().next().unwrap();

    if is_bracket_char(first, dialect) {
        let kind = match first {
            '(' | '[' => TokenKind::LBracket,
            _ => TokenKind::RBracket,
        };
        return Token {
            kind,
            text: &trimmed[..first.len_utf8()],
            consumed: skipped + first.len_utf8(),
        };
    }

    if is_operator_char(first) {
        for (op, kind) in operator_table(dialect) {
            if trimmed.starts_with(op) {
                return Token {
                    kind: *kind,
                    text: &trimmed[..op.len()],
                    consumed: skipped + op.len(),
                };
            }
        }
        return Token {
            kind: TokenKind::Invalid,
            text: &trimmed[..first.len_utf8()],
            consumed: skipped + first.len_utf8(),
        };
    }

    if is_version_char(first, dialect) {
        let end = trimmed
            .char_indices()
            .find(|(_, c)| !is_version_char(*c, dialect))
            .map_or(trimmed.len(), |(i, _)| i);
        let text = &trimmed[..end];
        let kind = if classify_wildcard(text, dialect) {
            TokenKind::Wildcard
        } else {
            TokenKind::Version
        };
        return Token {
            kind,
            text,
            consumed: skipped + end,
        };
    }

    if first == '\u{221e}' {
        let end = first.len_utf8();
        return Token {
            kind: TokenKind::Version,
            text: &trimmed[..end],
            consumed: skipped + end,
        };
    }

    Token {
        kind: TokenKind::Invalid,
        text: &trimmed[..first.len_utf8()],
        consumed: skipped + first.len_utf8(),
    }
}

/// A run of version-chars is a wildcard if a wildcard char appears before the first `-`, `+`,
/// or pre-release-starting letter.
fn classify_wildcard(text: &str, dialect: Dialect) -> bool {
    let wildcard_chars: &[char] = if dialect.x_is_wildcard() {
        &['*', 'x', 'X']
    } else {
        &['*']
    };

    for c in text.chars() {
        if wildcard_chars.contains(&c) {
            return true;
        }
        if c == '-' || c == '+' || c.is_ascii_alphabetic() {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_operators() {
        let t = token(Dialect::Default, ">=1.2.3");
        assert_eq!(t.kind, TokenKind::GreaterEq);
        assert_eq!(t.text, ">=");
    }

    #[test]
    fn tokenizes_version_after_operator() {
        let t = token(Dialect::Default, ">=1.2.3");
        let rest = &">=1.2.3"[t.consumed..];
        let v = token(Dialect::Default, rest);
        assert_eq!(v.kind, TokenKind::Version);
        assert_eq!(v.text, "1.2.3");
    }

    #[test]
    fn wildcard_star() {
        let t = token(Dialect::Default, "1.2.*");
        assert_eq!(t.kind, TokenKind::Wildcard);
    }

    #[test]
    fn wildcard_x_only_for_npm_cargo_default() {
        let t = token(Dialect::Go, "1.2.x");
        assert_eq!(t.kind, TokenKind::Version);
    }

    #[test]
    fn or_only_on_default_family() {
        let t = token(Dialect::Default, "|| 1.0");
        assert_eq!(t.kind, TokenKind::Or);
        let t = token(Dialect::Cargo, "1.0");
        assert_ne!(t.kind, TokenKind::Or);
    }

    #[test]
    fn eof_on_empty() {
        let t = token(Dialect::Default, "   ");
        assert_eq!(t.kind, TokenKind::Eof);
    }

    #[test]
    fn invalid_byte() {
        let t = token(Dialect::Default, "@foo");
        assert_eq!(t.kind, TokenKind::Invalid);
    }
}
