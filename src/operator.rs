//! Constraint operators and their lowering to [`Span`]/[`Set`].

use std::fmt::{self, Display, Formatter};

use crate::dialect::Dialect;
use crate::set::Set;
use crate::span::Span;
use crate::value::Value;
use crate::version::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    Ne,
    /// Cargo/NPM `^`.
    Caret,
    /// Cargo/NPM `~`.
    Tilde,
    /// RubyGems `~>`.
    Pessimistic,
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Ne => "!=",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::Pessimistic => "~>",
        };
        write!(f, "{s}")
    }
}

impl Operator {
    /// Lowers a single `operator version` term to a [`Set`] (a single span for every operator
    /// except `!=`, which yields the complement as two spans).
    pub fn lower(self, dialect: Dialect, v: &Version) -> Set {
        match self {
            Self::Eq => Set::from_span(eq_span(v)),
            Self::Gt => Set::from_span(Span::range(Some(v.clone()), true, None, false, dialect)),
            Self::Ge => Set::from_span(Span::range(Some(v.clone()), false, None, false, dialect)),
            Self::Lt => Set::from_span(Span::range(None, false, Some(v.clone()), true, dialect)),
            Self::Le => Set::from_span(Span::range(None, false, Some(v.clone()), false, dialect)),
            Self::Ne => {
                let below = Span::range(None, false, Some(v.clone()), true, dialect);
                let above = Span::range(Some(v.clone()), true, None, false, dialect);
                Set {
                    dialect,
                    spans: vec![below, above],
                }
                .canon()
            }
            Self::Caret => Set::from_span(caret_span(dialect, v)),
            Self::Tilde => Set::from_span(tilde_span(dialect, v)),
            Self::Pessimistic => Set::from_span(pessimistic_span(dialect, v)),
        }
    }
}

/// `=`: an exact version lowers to a unit span, except that a trailing wildcard widens it into a
/// range (`1.2.*` means `[1.2.0, 1.3.0)`).
fn eq_span(v: &Version) -> Span {
    if let Some(wpos) = v.nums.iter().position(|n| n.is_wildcard()) {
        if wpos == 0 {
            return Span::unbounded(v.dialect);
        }
        let mut lo = v.clone();
        for n in lo.nums.iter_mut() {
            if n.is_wildcard() {
                *n = Value::ZERO;
            }
        }
        let hi = lo.bump(wpos - 1);
        return Span::range(Some(lo), false, Some(hi), true, v.dialect);
    }
    Span::exact(v.clone())
}

/// `^`: bumps the first non-zero component, or the last if all are zero (Cargo/NPM semantics).
fn caret_span(dialect: Dialect, v: &Version) -> Span {
    let bump_at = v
        .nums
        .iter()
        .position(|n| n.get() != 0)
        .unwrap_or(v.nums.len().saturating_sub(1));
    let hi = v.without_build().bump(bump_at);
    Span::range(Some(v.clone()), false, Some(hi), true, dialect)
}

/// `~`: bumps the minor component (index 1) if present, else the major (Cargo/NPM semantics).
fn tilde_span(dialect: Dialect, v: &Version) -> Span {
    let bump_at = if v.user_num_count >= 2 { 1 } else { 0 };
    let hi = v.without_build().bump(bump_at);
    Span::range(Some(v.clone()), false, Some(hi), true, dialect)
}

/// `~>` (RubyGems) / `~=` (PyPI): the "compatible release" operator. Bumps the second-to-last
/// user-supplied release component, or the only component if just one was given.
fn pessimistic_span(dialect: Dialect, v: &Version) -> Span {
    let release_len = match &v.ext {
        Some(crate::ext::Ext::RubyGems(r)) => r.release.len(),
        Some(crate::ext::Ext::Pep440(p)) => p.release.len(),
        _ => v.nums.len(),
    };
    let bump_at = release_len.saturating_sub(2);
    let hi = bump_release(v, bump_at);
    Span::range(Some(v.clone()), false, Some(hi), true, dialect)
}

fn bump_release(v: &Version, index: usize) -> Version {
    match &v.ext {
        Some(crate::ext::Ext::RubyGems(r)) => {
            let mut release: Vec<i64> = r.release.clone();
            if index < release.len() {
                release.truncate(index + 1);
                release[index] = release[index].saturating_add(1);
            } else {
                release.push(1);
            }
            let mut new = v.clone();
            new.ext = Some(crate::ext::Ext::RubyGems(crate::ext::RubyGems {
                release,
                pre: Vec::new(),
            }));
            new
        }
        Some(crate::ext::Ext::Pep440(p)) => {
            let mut release = p.release.clone();
            if index < release.len() {
                release.truncate(index + 1);
                release[index] = release[index].saturating_add(1);
            } else {
                release.push(1);
            }
            let mut new = v.clone();
            new.ext = Some(crate::ext::Ext::Pep440(crate::ext::Pep440 {
                epoch: p.epoch,
                release,
                pre: None,
                post: None,
                dev: None,
                local: None,
            }));
            new
        }
        _ => v.bump(index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(Dialect::Cargo, s).unwrap()
    }

    #[test]
    fn caret_bumps_first_nonzero() {
        let span = caret_span(Dialect::Cargo, &v("0.2.3"));
        assert!(span.contains(&v("0.2.9")));
        assert!(!span.contains(&v("0.3.0")));
    }

    #[test]
    fn caret_all_zero_bumps_last() {
        let span = caret_span(Dialect::Cargo, &v("0.0.3"));
        assert!(span.contains(&v("0.0.3")));
        assert!(!span.contains(&v("0.0.4")));
    }

    #[test]
    fn tilde_bumps_minor() {
        let span = tilde_span(Dialect::Cargo, &v("1.2.3"));
        assert!(span.contains(&v("1.2.9")));
        assert!(!span.contains(&v("1.3.0")));
    }

    #[test]
    fn not_equal_excludes_single_point() {
        let set = Operator::Ne.lower(Dialect::Cargo, &v("1.2.3"));
        assert!(!set.contains(&v("1.2.3")));
        assert!(set.contains(&v("1.2.4")));
        assert!(set.contains(&v("1.2.2")));
    }
}
