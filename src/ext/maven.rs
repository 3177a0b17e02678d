//! The Maven (2.x/3.6-3.8) dialect extension.
//!
//! Maven versions are a mess of implicit separators: `1 == 1.0 == 1.ga == 1-ga == 1-final`. This
//! freezes the pre-3.9 comparator rules (§9 Open Question i) -- Maven 3.9 changed qualifier
//! interleaving and we deliberately do not follow it.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::VersionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Elem {
    Number(i64),
    Qualifier(String),
}

/// Rank of a known qualifier string, lowest first. Unknown qualifiers rank above `sp` and
/// compare lexicographically among themselves.
fn qualifier_rank(q: &str) -> i32 {
    match q {
        "alpha" => 0,
        "beta" => 1,
        "milestone" => 2,
        "rc" | "cr" => 3,
        "snapshot" => 4,
        "" | "ga" | "final" | "release" => 5,
        "sp" => 6,
        _ => 7,
    }
}

fn is_empty_equivalent(e: &Elem) -> bool {
    match e {
        Elem::Number(0) => true,
        Elem::Qualifier(q) => matches!(q.as_str(), "" | "ga" | "final" | "release"),
        _ => false,
    }
}

/// Rewrites the `a`/`b`/`m` shorthand to its spelled-out form, but only for the "shortcut" pattern
/// where the letter is immediately followed by a digit run (`1a1`). A bare `a` terminated by an
/// explicit separator or by end-of-string (`1-a`) stays an unranked qualifier.
fn canonical_qualifier(raw: &str, followed_by_digit: bool) -> String {
    let lower = raw.to_ascii_lowercase();
    if !followed_by_digit {
        return lower;
    }
    match lower.as_str() {
        "a" => "alpha".to_string(),
        "b" => "beta".to_string(),
        "m" => "milestone".to_string(),
        other => other.to_string(),
    }
}

/// One `.`/`-`-delimited element together with the separator that preceded it (`None` at the
/// very start of the string).
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    sep: Option<char>,
    elem: Elem,
}

fn tokenize(raw: &str) -> Vec<Token> {
    let lower = raw.trim().to_ascii_lowercase();
    let mut tokens = Vec::new();
    let mut chars = lower.char_indices().peekable();
    let mut sep = None;
    let mut buf = String::new();
    let mut buf_is_digit: Option<bool> = None;

    let flush = |buf: &mut String, buf_is_digit: &mut Option<bool>, sep: Option<char>, tokens: &mut Vec<Token>, followed_by_digit: bool| {
        if buf.is_empty() {
            return;
        }
        let elem = if *buf_is_digit == Some(true) {
            Elem::Number(buf.parse::<i64>().unwrap_or(0))
        } else {
            Elem::Qualifier(canonical_qualifier(buf, followed_by_digit))
        };
        tokens.push(Token { sep, elem });
        buf.clear();
        *buf_is_digit = None;
    };

    while let Some(&(_, c)) = chars.peek() {
        if c == '.' || c == '-' {
            flush(&mut buf, &mut buf_is_digit, sep, &mut tokens, false);
            sep = Some(c);
            chars.next();
            continue;
        }
        let is_digit = c.is_ascii_digit();
        match buf_is_digit {
            None => buf_is_digit = Some(is_digit),
            Some(prev) if prev != is_digit => {
                // an implicit transition between a qualifier and a number, e.g. "rc1" -- the
                // qualifier buffer being flushed here is immediately followed by a digit run only
                // when the buffer held a qualifier (prev == false) and the next char is a digit
                flush(&mut buf, &mut buf_is_digit, sep, &mut tokens, !prev && is_digit);
                sep = Some(if is_digit { '-' } else { '.' });
                buf_is_digit = Some(is_digit);
            }
            _ => {}
        }
        buf.push(c);
        chars.next();
    }
    flush(&mut buf, &mut buf_is_digit, sep, &mut tokens, false);
    tokens
}

/// Trims trailing "empty" elements at the end and before each `-` boundary.
fn trim_empty_tail(mut tokens: Vec<Token>) -> Vec<Token> {
    while let Some(last) = tokens.last() {
        if is_empty_equivalent(&last.elem) {
            tokens.pop();
        } else {
            break;
        }
    }
    tokens
}

/// A Maven version: an element-wise, separator-sensitive qualifier/number sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maven {
    pub tokens: Vec<(Option<char>, Elem)>,
}

impl Maven {
    pub fn minimum() -> Self {
        Self {
            tokens: vec![(None, Elem::Number(0))],
        }
    }
}

impl FromStr for Maven {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(VersionError::InvalidVersion(s.to_string()));
        }
        let tokens = trim_empty_tail(tokenize(s));
        let tokens = if tokens.is_empty() {
            vec![Token {
                sep: None,
                elem: Elem::Number(0),
            }]
        } else {
            tokens
        };
        Ok(Self {
            tokens: tokens.into_iter().map(|t| (t.sep, t.elem)).collect(),
        })
    }
}

fn elem_cmp(a: &Elem, b: &Elem) -> Ordering {
    match (a, b) {
        (Elem::Number(x), Elem::Number(y)) => x.cmp(y),
        (Elem::Qualifier(x), Elem::Qualifier(y)) => {
            let (rx, ry) = (qualifier_rank(x), qualifier_rank(y));
            if rx == 7 && ry == 7 {
                x.cmp(y)
            } else {
                rx.cmp(&ry)
            }
        }
        (Elem::Number(_), Elem::Qualifier(q)) => {
            if qualifier_rank(q) >= 5 {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (Elem::Qualifier(q), Elem::Number(_)) => {
            if qualifier_rank(q) >= 5 {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
    }
}

impl PartialOrd for Maven {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Maven {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.tokens.len().max(other.tokens.len());
        for i in 0..len {
            let a = self.tokens.get(i);
            let b = other.tokens.get(i);
            let (a_elem, b_elem) = match (a, b) {
                (Some((_, ae)), Some((_, be))) => (ae.clone(), be.clone()),
                (Some((sep, ae)), None) => (ae.clone(), pad_elem(*sep)),
                (None, Some((sep, be))) => (pad_elem(*sep), be.clone()),
                (None, None) => break,
            };
            let ord = elem_cmp(&a_elem, &b_elem);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Padding element implied by the *next* separator: `.` pads as `0`, `-` pads as empty string.
fn pad_elem(sep: Option<char>) -> Elem {
    match sep {
        Some('-') => Elem::Qualifier(String::new()),
        _ => Elem::Number(0),
    }
}

impl Display for Maven {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, (sep, elem)) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", sep.unwrap_or('.'))?;
            }
            match elem {
                Elem::Number(n) => write!(f, "{n}")?,
                Elem::Qualifier(q) => write!(f, "{q}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equivalences() {
        let variants = ["1", "1.0", "1.ga", "1-ga", "1-final", "1.0.0"];
        let parsed: Vec<Maven> = variants.iter().map(|s| Maven::from_str(s).unwrap()).collect();
        for w in parsed.windows(2) {
            assert_eq!(w[0].cmp(&w[1]), Ordering::Equal, "{} != {}", variants[0], variants[1]);
        }
    }

    #[test]
    fn qualifier_ordering() {
        let order = ["1-alpha", "1-beta", "1-milestone1", "1-rc", "1", "1-sp"];
        let parsed: Vec<Maven> = order.iter().map(|s| Maven::from_str(s).unwrap()).collect();
        for w in parsed.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn qualifier_ordering_is_transitive_across_every_pair() {
        let order = ["1-alpha", "1-beta", "1-milestone1", "1-rc", "1", "1-sp"];
        let parsed: Vec<Maven> = order.iter().map(|s| Maven::from_str(s).unwrap()).collect();
        for (i, a) in parsed.iter().enumerate() {
            for (j, b) in parsed.iter().enumerate() {
                match i.cmp(&j) {
                    Ordering::Less => assert!(a < b, "{} should be < {} (indices {i} < {j})", order[i], order[j]),
                    Ordering::Equal => assert_eq!(a, b),
                    Ordering::Greater => assert!(a > b, "{} should be > {} (indices {i} > {j})", order[i], order[j]),
                }
            }
        }
    }

    #[test]
    fn shortcut_qualifiers() {
        assert_eq!(
            Maven::from_str("1a1").unwrap(),
            Maven::from_str("1-alpha-1").unwrap()
        );
    }

    #[test]
    fn bare_qualifier_with_explicit_separator_is_not_a_shortcut() {
        // "1-a" has no digit immediately after the "a", so it must stay an unranked qualifier
        // rather than being rewritten to "alpha" the way "1a1" is.
        let bare = Maven::from_str("1-a").unwrap();
        let alpha = Maven::from_str("1-alpha").unwrap();
        assert_ne!(bare, alpha);
        assert!(bare > alpha, "an unranked qualifier sorts above a known one");
    }

    #[test]
    fn display_roundtrips_reasonably() {
        let v = Maven::from_str("1.2.3-beta").unwrap();
        assert_eq!(v.to_string(), "1.2.3-beta");
    }
}
