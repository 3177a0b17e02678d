//! Per-dialect constraint grammars, each lowering to a [`Set`].

use crate::dialect::Dialect;
use crate::error::VersionError;
use crate::operator::Operator;
use crate::set::Set;
use crate::span::Span;
use crate::token::{self, TokenKind};
use crate::version::Version;

/// A parsed constraint: the dialect it was parsed under, the set of versions it admits, and a
/// couple of cheap-to-compute summary flags callers commonly want without re-walking the set.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub dialect: Dialect,
    pub raw: String,
    pub set: Set,
    /// True when the constraint is a single bare version or a single comparator term -- no
    /// `||`, no comma-AND list, no hyphen range.
    pub is_simple: bool,
    pub has_prerelease: bool,
}

impl Constraint {
    pub fn parse(dialect: Dialect, raw: &str) -> Result<Self, VersionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(if dialect == Dialect::NuGet {
                VersionError::NuGetEmptyConstraint
            } else {
                VersionError::SpanSyntaxError(raw.to_string())
            });
        }

        let (set, is_simple) = match dialect {
            Dialect::Maven | Dialect::NuGet => parse_bracketed(dialect, trimmed)?,
            Dialect::PyPI => parse_comma_and_only(dialect, trimmed, true)?,
            Dialect::RubyGems => parse_comma_and_only(dialect, trimmed, false)?,
            Dialect::Cargo => parse_comma_and_only(dialect, trimmed, false)?,
            Dialect::Go => parse_go(trimmed)?,
            Dialect::Default | Dialect::NPM | Dialect::Composer => parse_or_list(dialect, trimmed)?,
        };

        let has_prerelease = set.spans.iter().any(|s| {
            s.min.as_ref().is_some_and(Version::is_pre) || s.max.as_ref().is_some_and(Version::is_pre)
        });

        Ok(Constraint {
            dialect,
            raw: raw.to_string(),
            set,
            is_simple,
            has_prerelease,
        })
    }

    pub fn matches(&self, v: &Version) -> bool {
        crate::match_engine::matches(self, v)
    }

    /// Always admits pre-releases, doing numeric-range comparison only -- bypasses the
    /// dialect-specific gating in [`Constraint::matches`]. Used for vulnerability matching, where
    /// a pre-release affected version still needs to be caught by the range it falls in.
    pub fn match_version_prerelease(&self, v: &Version) -> bool {
        crate::match_engine::matches_prerelease(self, v)
    }

    pub fn debug(&self) -> String {
        format!("{} -> {}", self.raw, self.set.debug())
    }

    /// NPM-only: the smallest version that could possibly satisfy this constraint.
    pub fn calculate_min_version(&self) -> Result<Version, VersionError> {
        if self.dialect != Dialect::NPM {
            return Err(VersionError::CalculateMinVersionUnsupported);
        }
        self.set
            .spans
            .iter()
            .filter_map(|s| s.min.clone())
            .min_by(|a, b| crate::ordering::compare(a, b))
            .ok_or(VersionError::Unsatisfiable)
    }
}

/// Default/NPM/Composer grammar: `||`-separated OR list of AND groups, each group whitespace- or
/// comma-separated, with hyphen ranges (`1.0.0 - 2.0.0`) recognized inside a group.
fn parse_or_list(dialect: Dialect, text: &str) -> Result<(Set, bool), VersionError> {
    let groups: Vec<&str> = text.split("||").map(str::trim).collect();
    let is_simple = groups.len() == 1 && !groups[0].contains(',') && !is_hyphen_range(groups[0]) && groups[0].split_whitespace().count() <= 1;

    let mut set = Set::empty(dialect);
    for group in groups {
        set = set.union(&parse_and_group(dialect, group)?);
    }
    Ok((set.canon(), is_simple))
}

fn is_hyphen_range(group: &str) -> bool {
    group.split_whitespace().collect::<Vec<_>>().windows(3).any(|w| w[1] == "-")
}

fn parse_and_group(dialect: Dialect, group: &str) -> Result<Set, VersionError> {
    if is_hyphen_range(group) {
        let parts: Vec<&str> = group.split_whitespace().collect();
        let dash = parts.iter().position(|p| *p == "-").unwrap();
        let lo_text = parts[..dash].join(".");
        let hi_text = parts[dash + 1..].join(".");
        let lo = Version::parse(dialect, &lo_text)?;
        let hi = Version::parse(dialect, &hi_text)?;
        return Ok(Set::from_span(Span::range(Some(lo), false, Some(hi), false, dialect)));
    }

    let terms: Vec<&str> = group
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if terms.is_empty() {
        return Err(VersionError::SpanSyntaxError(group.to_string()));
    }
    let mut set = Set::from_span(Span::unbounded(dialect));
    for term in terms {
        set = set.intersect(&parse_term(dialect, term)?);
    }
    Ok(set)
}

/// Cargo/PyPI/RubyGems grammar: a comma-separated AND list of comparator terms, no OR, no hyphen
/// ranges. `mandatory_operator` rejects a bare version with no leading comparator (PyPI).
fn parse_comma_and_only(dialect: Dialect, text: &str, mandatory_operator: bool) -> Result<(Set, bool), VersionError> {
    if text.contains("||") {
        return Err(VersionError::AndListNotSupported {
            dialect: dialect.to_string(),
            text: text.to_string(),
        });
    }
    let terms: Vec<&str> = text.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    if terms.is_empty() {
        return Err(VersionError::SpanSyntaxError(text.to_string()));
    }
    if mandatory_operator {
        for term in &terms {
            if starts_with_operator(dialect, term).is_none() {
                return Err(VersionError::MissingOperator);
            }
        }
    }
    let is_simple = terms.len() == 1;
    let mut set = Set::from_span(Span::unbounded(dialect));
    for term in terms {
        set = set.intersect(&parse_term(dialect, term)?);
    }
    Ok((set.canon(), is_simple))
}

/// Go modules: a single bare version establishes a minimum-version floor (Go's minimal version
/// selection treats the declared requirement as `>=`, not `==`).
fn parse_go(text: &str) -> Result<(Set, bool), VersionError> {
    let v = Version::parse(Dialect::Go, text)?;
    Ok((Set::from_span(Span::range(Some(v), false, None, false, Dialect::Go)), true))
}

/// Maven/NuGet bracketed interval grammar: a comma-separated OR list of either a bracketed
/// interval (`[1.0,2.0)`, `[1.0]`, `(,1.0]`) or a bare "soft" version (`1.0`, meaning "at least
/// this, but any version will do"). Soft versions lower to an unbounded-above `>=` span; only
/// explicit brackets are hard requirements and those must be closed on both ends.
fn parse_bracketed(dialect: Dialect, text: &str) -> Result<(Set, bool), VersionError> {
    let ranges = split_top_level_commas(text);
    let is_simple = ranges.len() == 1 && !text.starts_with(['[', '(']);

    let mut set = Set::empty(dialect);
    for r in ranges {
        let r = r.trim();
        if r.is_empty() {
            return Err(VersionError::SpanSyntaxError(text.to_string()));
        }
        let starts_bracket = r.starts_with(['[', '(']);
        let ends_bracket = r.ends_with([']', ')']);
        if starts_bracket != ends_bracket {
            return Err(VersionError::HardRequirementNotClosed(text.to_string()));
        }
        if !starts_bracket {
            let v = Version::parse(dialect, r)?;
            set = set.union(&Set::from_span(Span::range(Some(v), false, None, false, dialect)));
            continue;
        }
        let min_open = r.starts_with('(');
        let max_open = r.ends_with(')');
        let inner = &r[1..r.len() - 1];
        let (lo, hi) = inner.split_once(',').ok_or_else(|| VersionError::SpanSyntaxError(text.to_string()))?;
        let (lo, hi) = (lo.trim(), hi.trim());
        if lo.is_empty() && hi.is_empty() {
            return Err(VersionError::MoreThanOneRange(text.to_string()));
        }
        if lo == hi && !lo.is_empty() && !min_open && !max_open {
            let v = Version::parse(dialect, lo)?;
            set = set.union(&Set::from_span(Span::exact(v)));
            continue;
        }
        let min = if lo.is_empty() { None } else { Some(Version::parse(dialect, lo)?) };
        let max = if hi.is_empty() { None } else { Some(Version::parse(dialect, hi)?) };
        set = set.union(&Set::from_span(Span::range(min, min_open, max, max_open, dialect)));
    }
    Ok((set.canon(), is_simple))
}

fn split_top_level_commas(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Lexes a leading operator off `term` using the shared tokenizer's per-dialect operator table.
fn starts_with_operator(dialect: Dialect, term: &str) -> Option<(Operator, &str)> {
    let t = token::token(dialect, term);
    if dialect == Dialect::PyPI && t.text == "===" {
        #[cfg(feature = "tracing")]
        tracing::warn!(term, "arbitrary equality (===) bypasses PEP 440 normalization; prefer ==");
    }
    let op = match t.kind {
        TokenKind::Equal => Operator::Eq,
        TokenKind::Greater => Operator::Gt,
        TokenKind::GreaterEq => Operator::Ge,
        TokenKind::Less => Operator::Lt,
        TokenKind::LessEq => Operator::Le,
        TokenKind::NotEq => Operator::Ne,
        TokenKind::Caret => Operator::Caret,
        TokenKind::Tilde => Operator::Tilde,
        TokenKind::Bacon => Operator::Pessimistic,
        _ => return None,
    };
    Some((op, term[t.consumed..].trim_start()))
}

fn parse_term(dialect: Dialect, term: &str) -> Result<Set, VersionError> {
    let (op, rest) = match starts_with_operator(dialect, term) {
        Some((op, rest)) => (op, rest),
        None => (default_operator(dialect), term),
    };
    if rest.is_empty() {
        return Err(VersionError::MissingItemAfterOperator {
            op: op.to_string(),
            text: term.to_string(),
        });
    }
    let v = Version::parse(dialect, rest)?;
    Ok(op.lower(dialect, &v))
}

fn default_operator(dialect: Dialect) -> Operator {
    match dialect {
        Dialect::Cargo => Operator::Caret,
        Dialect::RubyGems => Operator::Eq,
        _ => Operator::Eq,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(Dialect::Default, s).unwrap()
    }

    #[test]
    fn default_hyphen_range_and_or() {
        let c = Constraint::parse(Dialect::Default, "1.0.0 - 2.0.0 || 5.0.0").unwrap();
        assert!(c.set.contains(&v("1.5.0")));
        assert!(c.set.contains(&v("5.0.0")));
        assert!(!c.set.contains(&v("3.0.0")));
    }

    #[test]
    fn cargo_bare_version_defaults_to_caret() {
        let c = Constraint::parse(Dialect::Cargo, "1.2.3").unwrap();
        let cv = Version::parse(Dialect::Cargo, "1.2.3").unwrap();
        let next_major = Version::parse(Dialect::Cargo, "2.0.0").unwrap();
        assert!(c.set.contains(&cv));
        assert!(!c.set.contains(&next_major));
    }

    #[test]
    fn pypi_requires_explicit_operator() {
        assert_eq!(
            Constraint::parse(Dialect::PyPI, "1.0.0").unwrap_err(),
            VersionError::MissingOperator
        );
        assert!(Constraint::parse(Dialect::PyPI, ">=1.0.0").is_ok());
    }

    #[test]
    fn maven_hard_requirement_must_close_both_ends() {
        assert!(Constraint::parse(Dialect::Maven, "[1.0,2.0)").is_ok());
        assert!(matches!(
            Constraint::parse(Dialect::Maven, "[1.0,2.0").unwrap_err(),
            VersionError::HardRequirementNotClosed(_)
        ));
    }

    #[test]
    fn maven_soft_version_is_unbounded_above() {
        let c = Constraint::parse(Dialect::Maven, "1.0").unwrap();
        assert!(c.set.contains(&Version::parse(Dialect::Maven, "99.0").unwrap()));
    }

    #[test]
    fn rubygems_comma_is_and() {
        let c = Constraint::parse(Dialect::RubyGems, ">= 1.0, < 2.0").unwrap();
        assert!(c.set.contains(&Version::parse(Dialect::RubyGems, "1.5").unwrap()));
        assert!(!c.set.contains(&Version::parse(Dialect::RubyGems, "2.0").unwrap()));
    }

    #[test]
    fn cargo_rejects_or_list() {
        assert!(matches!(
            Constraint::parse(Dialect::Cargo, "1.0 || 2.0").unwrap_err(),
            VersionError::AndListNotSupported { .. }
        ));
    }
}
