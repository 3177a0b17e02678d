//! The PEP 440 (PyPI) dialect extension.
//!
//! This is the oldest and most faithfully-modelled extension in the crate: it started life as
//! a standalone `pep440_rs`-style parser/comparator and was folded in here as one of the three
//! `Ext` variants once the crate grew multi-dialect support.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::VersionError;

// PEP 440 has a fixed, regex-shaped grammar; rather than drag in the `regex` crate purely for
// this one dialect we hand-parse it with simple byte scanning, which is both dependency-light
// and matches the shared tokenizer's style (`crate::token`).

/// Spelled-out pre-release kind, after synonym canonicalization (`alpha`->`a`, `c`->`rc`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreKind {
    Alpha,
    Beta,
    Rc,
}

impl FromStr for PreKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" | "alpha" => Ok(Self::Alpha),
            "b" | "beta" => Ok(Self::Beta),
            "c" | "rc" | "pre" | "preview" => Ok(Self::Rc),
            _ => Err(()),
        }
    }
}

impl Display for PreKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Alpha => "a",
            Self::Beta => "b",
            Self::Rc => "rc",
        };
        write!(f, "{s}")
    }
}

/// One segment of a local version label (after the `+`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocalSegment {
    String(String),
    Number(u64),
}

impl Display for LocalSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl Ord for LocalSegment {
    fn cmp(&self, other: &Self) -> Ordering {
        // "the numeric section always compares as greater than the lexicographic segment"
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Number(_), Self::String(_)) => Ordering::Greater,
            (Self::String(_), Self::Number(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for LocalSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for LocalSegment {
    type Err = ();

    fn from_str(segment: &str) -> Result<Self, Self::Err> {
        Ok(if let Ok(n) = segment.parse::<u64>() {
            Self::Number(n)
        } else {
            Self::String(segment.to_ascii_lowercase())
        })
    }
}

/// A fully parsed PEP 440 version: `[N!] N(.N)* [{a|b|rc}N] [.postN] [.devN] [+local]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pep440 {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<(PreKind, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Option<Vec<LocalSegment>>,
}

impl Pep440 {
    pub fn is_pre(&self) -> bool {
        self.pre.is_some()
    }
    pub fn is_dev(&self) -> bool {
        self.dev.is_some()
    }
    pub fn is_post(&self) -> bool {
        self.post.is_some()
    }
    pub fn is_local(&self) -> bool {
        self.local.is_some()
    }
    pub fn any_prerelease(&self) -> bool {
        self.is_pre() || self.is_dev()
    }

    pub fn without_local(&self) -> Self {
        Self {
            local: None,
            ..self.clone()
        }
    }

    /// `0` for this dialect's minimum: epoch 0, release `[0]`, nothing else.
    pub fn minimum() -> Self {
        Self {
            epoch: 0,
            release: vec![0],
            pre: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    fn compare_release(a: &[u64], b: &[u64]) -> Ordering {
        let len = a.len().max(b.len());
        for i in 0..len {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            if x != y {
                return x.cmp(&y);
            }
        }
        Ordering::Equal
    }

    /// Whether `self` and `other` share the same release tuple (epoch ignored).
    pub(crate) fn same_release(&self, other: &Self) -> bool {
        Self::compare_release(&self.release, &other.release) == Ordering::Equal
    }

    /// The `(phase, preN, post, dev, local)` tuple used to order everything after the release
    /// segment is found equal. See the teacher's `compare.rs` doc comment for the derivation of
    /// the six-phase ordering (`dev < a < b < rc < final < post`).
    fn sortable(&self) -> (u8, u64, Option<u64>, u64, Option<Vec<LocalSegment>>) {
        match (&self.pre, &self.post, &self.dev) {
            (None, None, Some(n)) => (0, 0, None, *n, self.local.clone()),
            (Some((PreKind::Alpha, n)), post, dev) => {
                (1, *n, *post, dev.unwrap_or(u64::MAX), self.local.clone())
            }
            (Some((PreKind::Beta, n)), post, dev) => {
                (2, *n, *post, dev.unwrap_or(u64::MAX), self.local.clone())
            }
            (Some((PreKind::Rc, n)), post, dev) => {
                (3, *n, *post, dev.unwrap_or(u64::MAX), self.local.clone())
            }
            (None, None, None) => (4, 0, None, 0, self.local.clone()),
            (None, Some(post), dev) => {
                (5, 0, Some(*post), dev.unwrap_or(u64::MAX), self.local.clone())
            }
        }
    }
}

impl PartialOrd for Pep440 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pep440 {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.epoch != other.epoch {
            return self.epoch.cmp(&other.epoch);
        }
        match Self::compare_release(&self.release, &other.release) {
            Ordering::Equal => self.sortable().cmp(&other.sortable()),
            other_ord => other_ord,
        }
    }
}

impl Display for Pep440 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release = self
            .release
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{release}")?;
        if let Some((kind, n)) = &self.pre {
            write!(f, "{kind}{n}")?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{post}")?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{dev}")?;
        }
        if let Some(local) = &self.local {
            write!(
                f,
                "+{}",
                local.iter().map(ToString::to_string).collect::<Vec<_>>().join(".")
            )?;
        }
        Ok(())
    }
}

/// Hand-rolled scan of the PEP 440 grammar; mirrors the structure (not the implementation) of
/// the regex from PEP 440 Appendix B, since the shared tokenizer can't parameterize a full regex
/// per dialect.
struct Cursor<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { s, pos: 0 }
    }
    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.rest().chars().next() {
            if pred(c) {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        &self.s[start..self.pos]
    }
    fn eat_prefix(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }
    fn eat_separator(&mut self) {
        self.eat_prefix(".");
        self.eat_prefix("-");
        self.eat_prefix("_");
    }
}

fn parse_inner(raw: &str) -> Result<Pep440, VersionError> {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();
    let mut c = Cursor::new(&lower);

    c.eat_prefix("v");

    let epoch = {
        let save = c.pos;
        let digits = c.eat_while(|ch| ch.is_ascii_digit());
        if !digits.is_empty() && c.eat_prefix("!") {
            digits.parse::<u64>().map_err(|_| VersionError::NumberOutOfRange(raw.to_string()))?
        } else {
            c.pos = save;
            0
        }
    };

    let mut release = Vec::new();
    loop {
        let digits = c.eat_while(|ch| ch.is_ascii_digit());
        if digits.is_empty() {
            return Err(VersionError::InvalidVersion(raw.to_string()));
        }
        release.push(digits.parse::<u64>().map_err(|_| VersionError::NumberOutOfRange(raw.to_string()))?);
        if c.rest().starts_with('.') && c.rest()[1..].starts_with(|ch: char| ch.is_ascii_digit()) {
            c.pos += 1;
        } else {
            break;
        }
    }

    let pre = {
        let save = c.pos;
        c.eat_separator();
        let name = c.eat_while(|ch| ch.is_ascii_alphabetic());
        if let Ok(kind) = PreKind::from_str(name) {
            c.eat_separator();
            let n = c.eat_while(|ch| ch.is_ascii_digit());
            let n = if n.is_empty() { 0 } else { n.parse::<u64>().map_err(|_| VersionError::NumberOutOfRange(raw.to_string()))? };
            Some((kind, n))
        } else {
            c.pos = save;
            None
        }
    };

    let post = {
        let save = c.pos;
        if c.rest().starts_with('-') && c.rest()[1..].starts_with(|ch: char| ch.is_ascii_digit()) {
            c.pos += 1;
            let n = c.eat_while(|ch| ch.is_ascii_digit());
            Some(n.parse::<u64>().map_err(|_| VersionError::NumberOutOfRange(raw.to_string()))?)
        } else {
            c.eat_separator();
            let name = c.eat_while(|ch| ch.is_ascii_alphabetic());
            if matches!(name, "post" | "rev" | "r") {
                c.eat_separator();
                let n = c.eat_while(|ch| ch.is_ascii_digit());
                Some(if n.is_empty() { 0 } else { n.parse::<u64>().map_err(|_| VersionError::NumberOutOfRange(raw.to_string()))? })
            } else {
                c.pos = save;
                None
            }
        }
    };

    let dev = {
        let save = c.pos;
        c.eat_separator();
        let name = c.eat_while(|ch| ch.is_ascii_alphabetic());
        if name == "dev" {
            c.eat_separator();
            let n = c.eat_while(|ch| ch.is_ascii_digit());
            Some(if n.is_empty() { 0 } else { n.parse::<u64>().map_err(|_| VersionError::NumberOutOfRange(raw.to_string()))? })
        } else {
            c.pos = save;
            None
        }
    };

    let local = if c.eat_prefix("+") {
        let label = c.eat_while(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'));
        if label.is_empty() {
            return Err(VersionError::InvalidLocalVersion(raw.to_string()));
        }
        let segments = label
            .split(&['-', '_', '.'][..])
            .map(|seg| {
                if seg.is_empty() {
                    return Err(VersionError::InvalidLocalVersion(raw.to_string()));
                }
                Ok(LocalSegment::from_str(seg).unwrap())
            })
            .collect::<Result<Vec<_>, VersionError>>()?;
        Some(segments)
    } else {
        None
    };

    if !c.rest().is_empty() {
        return Err(VersionError::InvalidVersion(raw.to_string()));
    }

    Ok(Pep440 {
        epoch,
        release,
        pre,
        post,
        dev,
        local,
    })
}

impl FromStr for Pep440 {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_inner(s)
    }
}

/// `epoch!release.*` with a trailing `*` in the last release position -- used by `==`/`!=` with
/// a star and by floating constraints. Returns the parsed prefix plus whether it ended in `*`.
pub fn parse_prefix(raw: &str) -> Result<(Pep440, bool), VersionError> {
    let trimmed = raw.trim();
    if let Some(body) = trimmed.strip_suffix(".*").or_else(|| trimmed.strip_suffix('*')) {
        let body = body.trim_end_matches('.');
        if body.is_empty() {
            return Err(VersionError::InvalidVersion(raw.to_string()));
        }
        Ok((parse_inner(body)?, true))
    } else {
        Ok((parse_inner(trimmed)?, false))
    }
}

/// `>`-comparison per PEP 440's operator semantics (not plain `Ord`): excludes post-releases and
/// local versions at an otherwise-equal release unless the specifier itself names one.
pub fn greater_than(this: &Pep440, other: &Pep440) -> bool {
    if other.epoch > this.epoch {
        return true;
    }
    if Pep440::compare_release(&this.release, &other.release) == Ordering::Equal {
        if !this.is_post() && other.is_post() {
            return false;
        }
        if other.is_local() {
            return false;
        }
    }
    other > this
}

/// `<`-comparison per PEP 440's operator semantics: excludes pre-releases at an otherwise-equal
/// release unless the specifier itself is a pre-release.
pub fn less_than(this: &Pep440, other: &Pep440) -> bool {
    if other.epoch < this.epoch {
        return true;
    }
    if !this.any_prerelease()
        && other.is_pre()
        && Pep440::compare_release(&this.release, &other.release) == Ordering::Equal
    {
        return false;
    }
    other < this
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic() {
        let v = Pep440::from_str("1.0a1").unwrap();
        assert_eq!(v.release, vec![1, 0]);
        assert_eq!(v.pre, Some((PreKind::Alpha, 1)));
    }

    #[test]
    fn normalizes_dev_and_case() {
        let a = Pep440::from_str("1.0DEV").unwrap();
        let b = Pep440::from_str("1.0.dev0").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "1.0.dev0");
    }

    #[test]
    fn epoch_and_leading_v() {
        let v = Pep440::from_str("v1.0").unwrap();
        assert_eq!(v.epoch, 0);
        assert_eq!(v.release, vec![1, 0]);
    }

    #[test]
    fn ordering_matches_pep440_example_chain() {
        let chain = [
            "1.0.dev456", "1.0a1", "1.0a2.dev456", "1.0a12.dev456", "1.0a12", "1.0b1.dev456",
            "1.0b2", "1.0b2.post345.dev456", "1.0b2.post345", "1.0c1.dev456", "1.0c1", "1.0rc2",
            "1.0", "1.0.post456.dev34", "1.0.post456",
        ];
        let versions: Vec<Pep440> = chain.iter().map(|s| Pep440::from_str(s).unwrap()).collect();
        for w in versions.windows(2) {
            assert!(w[0] < w[1], "{} should be < {}", w[0], w[1]);
        }
    }

    #[test]
    fn ordering_is_transitive_across_every_pair_of_the_chain() {
        let chain = [
            "1.0.dev456", "1.0a1", "1.0a2.dev456", "1.0a12.dev456", "1.0a12", "1.0b1.dev456",
            "1.0b2", "1.0b2.post345.dev456", "1.0b2.post345", "1.0c1.dev456", "1.0c1", "1.0rc2",
            "1.0", "1.0.post456.dev34", "1.0.post456",
        ];
        let versions: Vec<Pep440> = chain.iter().map(|s| Pep440::from_str(s).unwrap()).collect();
        for (i, a) in versions.iter().enumerate() {
            for (j, b) in versions.iter().enumerate() {
                match i.cmp(&j) {
                    Ordering::Less => assert!(a < b, "{a} should be < {b} (indices {i} < {j})"),
                    Ordering::Equal => assert_eq!(a, b),
                    Ordering::Greater => assert!(a > b, "{a} should be > {b} (indices {i} > {j})"),
                }
            }
        }
    }

    #[test]
    fn local_version_ordering() {
        let a = Pep440::from_str("1.0+abc").unwrap();
        let b = Pep440::from_str("1.0+abc.1").unwrap();
        let c = Pep440::from_str("1.0+1").unwrap();
        assert!(a < b);
        assert!(b < c); // numeric local segment dominates
    }
}
