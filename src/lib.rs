//! Parsing, comparison and constraint matching for version identifiers across packaging
//! ecosystems: Default (SemVer 2), Cargo, Go modules, Maven, NPM, NuGet, PyPI (PEP 440),
//! RubyGems and Composer.
//!
//! ```
//! use verspec::{Dialect, parse, parse_constraint};
//!
//! let v = parse(Dialect::Cargo, "1.2.3").unwrap();
//! let c = parse_constraint(Dialect::Cargo, "^1.2").unwrap();
//! assert!(c.matches(&v));
//! ```

mod constraint;
mod dialect;
mod error;
mod ext;
mod match_engine;
mod operator;
mod ordering;
mod set;
mod span;
mod token;
mod value;
mod version;

pub use constraint::Constraint;
pub use dialect::Dialect;
pub use error::{Result, VersionError};
pub use operator::Operator;
pub use ordering::Diff;
pub use set::Set;
pub use span::Span;
pub use value::Value;
pub use version::Version;

/// Parses a concrete version identifier under `dialect`.
pub fn parse(dialect: Dialect, text: &str) -> Result<Version> {
    Version::parse(dialect, text)
}

/// Renders a version in its canonical string form, optionally including the build tag.
pub fn canon(version: &Version, show_build: bool) -> String {
    version.canon(show_build)
}

/// Parses a constraint expression under `dialect`.
pub fn parse_constraint(dialect: Dialect, text: &str) -> Result<Constraint> {
    Constraint::parse(dialect, text)
}

/// Parses the bracketed set syntax `"{" span ("," span)* "}"` directly, bypassing the
/// per-dialect constraint grammar -- used to round-trip a [`Set`]'s own [`Set::debug`] output.
pub fn parse_set_constraint(dialect: Dialect, text: &str) -> Result<Set> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| VersionError::MissingOrMisplacedBraces(text.to_string()))?;
    let inner = inner.trim();
    if inner.is_empty() {
        return Ok(Set::empty(dialect));
    }

    let mut set = Set::empty(dialect);
    for part in split_top_level(inner) {
        let part = part.trim();
        let starts_bracket = part.starts_with('[') || part.starts_with('(');
        let ends_bracket = part.ends_with(']') || part.ends_with(')');
        if starts_bracket && ends_bracket {
            let min_open = part.starts_with('(');
            let max_open = part.ends_with(')');
            let range = &part[1..part.len() - 1];
            let (lo, hi) = range
                .split_once(", ")
                .or_else(|| range.split_once(','))
                .ok_or_else(|| VersionError::SpanSyntaxError(text.to_string()))?;
            let (lo, hi) = (lo.trim(), hi.trim());
            let min = if lo == "-∞" { None } else { Some(Version::parse(dialect, lo)?) };
            let max = if hi == "+∞" { None } else { Some(Version::parse(dialect, hi)?) };
            set = set.union(&Set::from_span(Span::range(min, min_open, max, max_open, dialect)));
        } else if part == "<empty>" {
            continue;
        } else {
            let v = Version::parse(dialect, part)?;
            set = set.union(&Set::from_span(Span::exact(v)));
        }
    }
    Ok(set.canon())
}

fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Compares two versions of the same dialect.
pub fn compare(a: &Version, b: &Version) -> std::cmp::Ordering {
    ordering::compare(a, b)
}

/// Classifies the coarse difference between two versions.
pub fn difference(a: &Version, b: &Version) -> Diff {
    ordering::difference(a, b)
}

/// Whether `v` satisfies `constraint`.
pub fn matches(constraint: &Constraint, v: &Version) -> bool {
    constraint.matches(v)
}

/// Whether `v` falls within `constraint`'s numeric range, always admitting pre-releases.
pub fn match_version_prerelease(constraint: &Constraint, v: &Version) -> bool {
    constraint.match_version_prerelease(v)
}

/// The smallest possible version for a dialect.
pub fn min_version(dialect: Dialect) -> Version {
    Version::minimum(dialect)
}

/// NPM-only: the smallest version that could satisfy `constraint`.
pub fn calculate_min_version(constraint: &Constraint) -> Result<Version> {
    constraint.calculate_min_version()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cargo_caret_default_round_trip() {
        let v = parse(Dialect::Cargo, "1.2.3").unwrap();
        let c = parse_constraint(Dialect::Cargo, "1.2").unwrap();
        assert!(matches(&c, &v));
        assert!(!matches(&c, &parse(Dialect::Cargo, "2.0.0").unwrap()));
    }

    #[test]
    fn go_implicit_minimum_version_rule() {
        let c = parse_constraint(Dialect::Go, "v1.2.3").unwrap();
        assert!(matches(&c, &parse(Dialect::Go, "v1.2.3").unwrap()));
        assert!(matches(&c, &parse(Dialect::Go, "v1.9.0").unwrap()));
        assert!(!matches(&c, &parse(Dialect::Go, "v1.0.0").unwrap()));
    }

    #[test]
    fn npm_calculate_min_version() {
        let c = parse_constraint(Dialect::NPM, ">=1.2.3 <2.0.0").unwrap();
        let min = calculate_min_version(&c).unwrap();
        assert_eq!(min.canon(false), "1.2.3");
    }

    #[test]
    fn npm_calculate_min_version_rejected_outside_npm() {
        let c = parse_constraint(Dialect::Cargo, "^1.2.3").unwrap();
        assert_eq!(
            calculate_min_version(&c).unwrap_err(),
            VersionError::CalculateMinVersionUnsupported
        );
    }

    #[test]
    fn pep440_prerelease_filtering_and_ordering() {
        let c = parse_constraint(Dialect::PyPI, ">=1.0,<2.0").unwrap();
        assert!(matches(&c, &parse(Dialect::PyPI, "1.5").unwrap()));
        assert!(!matches(&c, &parse(Dialect::PyPI, "1.5a1").unwrap()));
    }

    #[test]
    fn match_version_prerelease_bypasses_dialect_admission_gating() {
        let c = parse_constraint(Dialect::PyPI, ">=1.0,<2.0").unwrap();
        let pre = parse(Dialect::PyPI, "1.5a1").unwrap();
        assert!(!matches(&c, &pre));
        assert!(match_version_prerelease(&c, &pre));
    }

    #[test]
    fn rubygems_bacon_trailing_numbers_sort_after_plain_release() {
        let a = parse(Dialect::RubyGems, "1.0.0").unwrap();
        let b = parse(Dialect::RubyGems, "1.0.0.a").unwrap();
        assert_eq!(compare(&a, &b), std::cmp::Ordering::Greater);
    }

    #[test]
    fn maven_soft_requirement_matches_any_higher_version() {
        let c = parse_constraint(Dialect::Maven, "1.0").unwrap();
        assert!(matches(&c, &parse(Dialect::Maven, "5.0").unwrap()));
    }

    #[test]
    fn nuget_prerelease_admitted_when_range_names_one() {
        let c = parse_constraint(Dialect::NuGet, "[1.0.0-beta,2.0.0)").unwrap();
        assert!(matches(&c, &parse(Dialect::NuGet, "1.0.0-beta").unwrap()));
    }

    #[test]
    fn default_hyphen_range_with_or() {
        let c = parse_constraint(Dialect::Default, "1.0.0 - 2.0.0 || 5.0.0").unwrap();
        assert!(matches(&c, &parse(Dialect::Default, "1.5.0").unwrap()));
        assert!(matches(&c, &parse(Dialect::Default, "5.0.0").unwrap()));
        assert!(!matches(&c, &parse(Dialect::Default, "3.0.0").unwrap()));
    }

    #[test]
    fn set_debug_round_trips_through_parse_set_constraint() {
        let c = parse_constraint(Dialect::Default, ">=1.0.0 <2.0.0").unwrap();
        let text = c.set.debug();
        let parsed = parse_set_constraint(Dialect::Default, &text).unwrap();
        assert!(parsed.contains(&parse(Dialect::Default, "1.5.0").unwrap()));
    }
}
