//! The RubyGems dialect extension.
//!
//! RubyGems versions have an unbounded numeric prefix followed by a pre-release tail split on
//! `.`, on `-` (rewritten to `.pre.`), and on every alpha/digit boundary (`2.0.0b5` -> `2.0.0.b.5`
//! conceptually, though we keep the numeric prefix and pre-release tail as separate fields).

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::VersionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Number(i64),
    String(String),
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// A fully parsed RubyGems version: unbounded numeric release plus a split pre-release tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RubyGems {
    pub release: Vec<i64>,
    pub pre: Vec<Segment>,
}

impl RubyGems {
    pub fn minimum() -> Self {
        Self {
            release: vec![0],
            pre: Vec::new(),
        }
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.iter().any(|s| matches!(s, Segment::String(_)))
    }

    /// A copy with `release` truncated to `len` components, keeping the pre-release tail intact.
    /// Used by the pessimistic constraint's (`~>`) ceiling check, where release components past
    /// the bound's own length are irrelevant.
    pub(crate) fn truncated_release(&self, len: usize) -> Self {
        let mut release = self.release.clone();
        release.truncate(len);
        Self {
            release,
            pre: self.pre.clone(),
        }
    }
}

/// Splits a raw tail into segments at `.`, at `-` (rewritten to introduce `pre`), and at every
/// alpha-digit boundary, the way `2.0.0b5` becomes the pre-release tail `[b, 5]`.
fn split_segments(tail: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut buf_is_digit: Option<bool> = None;

    let mut push_buf = |buf: &mut String, is_digit: &mut Option<bool>, segments: &mut Vec<Segment>| {
        if buf.is_empty() {
            return;
        }
        if *is_digit == Some(true) {
            segments.push(Segment::Number(buf.parse().unwrap_or(0)));
        } else {
            segments.push(Segment::String(std::mem::take(buf)));
        }
        buf.clear();
        *is_digit = None;
    };

    let mut chars = tail.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '.' {
            push_buf(&mut buf, &mut buf_is_digit, &mut segments);
            continue;
        }
        if c == '-' {
            push_buf(&mut buf, &mut buf_is_digit, &mut segments);
            segments.push(Segment::String("pre".to_string()));
            continue;
        }
        let is_digit = c.is_ascii_digit();
        if let Some(prev) = buf_is_digit {
            if prev != is_digit {
                push_buf(&mut buf, &mut buf_is_digit, &mut segments);
            }
        }
        buf_is_digit = Some(is_digit);
        buf.push(c);
    }
    push_buf(&mut buf, &mut buf_is_digit, &mut segments);

    while matches!(segments.last(), Some(Segment::Number(0))) {
        segments.pop();
    }
    segments
}

impl FromStr for RubyGems {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VersionError::InvalidVersion(s.to_string()));
        }

        // The release is a pure digit-and-dot prefix; the first `-` or alphabetic character,
        // whichever comes first, starts the pre-release tail.
        let mut split_at = trimmed.len();
        for (i, c) in trimmed.char_indices() {
            if c == '-' || c.is_ascii_alphabetic() {
                split_at = i;
                break;
            }
            if !(c.is_ascii_digit() || c == '.') {
                return Err(VersionError::InvalidVersion(s.to_string()));
            }
        }

        let (release_str, tail) = trimmed.split_at(split_at);
        let release_str = release_str.trim_end_matches('.');
        let release = release_str
            .split('.')
            .map(|part| part.parse::<i64>().map_err(|_| VersionError::NonNumericVersion(s.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        if release.is_empty() {
            return Err(VersionError::InvalidVersion(s.to_string()));
        }

        let tail = tail.strip_prefix('.').unwrap_or(tail);
        let pre = if tail.is_empty() { Vec::new() } else { split_segments(tail) };

        Ok(Self { release, pre })
    }
}

fn seg_cmp(a: &Segment, b: &Segment) -> Ordering {
    match (a, b) {
        (Segment::Number(x), Segment::Number(y)) => x.cmp(y),
        (Segment::String(x), Segment::String(y)) => x.cmp(y),
        // "any string dominates any number" in RubyGems' pre-release comparison
        (Segment::String(_), Segment::Number(_)) => Ordering::Greater,
        (Segment::Number(_), Segment::String(_)) => Ordering::Less,
    }
}

impl PartialOrd for RubyGems {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RubyGems {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            let a = self.release.get(i).copied().unwrap_or(0);
            let b = other.release.get(i).copied().unwrap_or(0);
            if a != b {
                return a.cmp(&b);
            }
        }

        // a version without a pre-release dominates one with, at equal numeric prefix
        match (self.pre.is_empty(), other.pre.is_empty()) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }

        let len = self.pre.len().max(other.pre.len());
        for i in 0..len {
            match (self.pre.get(i), other.pre.get(i)) {
                (Some(a), Some(b)) => {
                    let ord = seg_cmp(a, b);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (None, None) => break,
            }
        }
        Ordering::Equal
    }
}

impl Display for RubyGems {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let release = self
            .release
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{release}")?;
        for seg in &self.pre {
            write!(f, ".{seg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_pre_release_boundary() {
        let v = RubyGems::from_str("2.0.0b5").unwrap();
        assert_eq!(v.release, vec![2, 0, 0]);
        assert_eq!(v.pre, vec![Segment::String("b".to_string()), Segment::Number(5)]);
    }

    #[test]
    fn hyphen_rewritten_to_pre() {
        let v = RubyGems::from_str("1.0-1").unwrap();
        assert_eq!(v.pre, vec![Segment::String("pre".to_string()), Segment::Number(1)]);
    }

    #[test]
    fn non_prerelease_dominates_prerelease() {
        let a = RubyGems::from_str("1.0.0").unwrap();
        let b = RubyGems::from_str("1.0.0.a").unwrap();
        assert!(a > b);
    }

    #[test]
    fn numeric_release_extends_unbounded() {
        let v = RubyGems::from_str("1.2.3.4.5").unwrap();
        assert_eq!(v.release, vec![1, 2, 3, 4, 5]);
    }
}
