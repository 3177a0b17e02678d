//! Dialect-specific pre-release admission rules layered on top of [`Set::contains`].
//!
//! A bare range match isn't the whole story: most dialects hide pre-release versions from a
//! range unless the range itself names a pre-release at the same release tuple, so that
//! `^1.2.3` doesn't silently start matching `1.3.0-alpha`.

use crate::constraint::Constraint;
use crate::dialect::Dialect;
use crate::span::Span;
use crate::version::Version;

pub fn matches(c: &Constraint, v: &Version) -> bool {
    if !c.set.contains(v) {
        return false;
    }
    if !v.is_pre() {
        return true;
    }

    match c.dialect {
        Dialect::Default | Dialect::NPM | Dialect::Composer | Dialect::Cargo => {
            c.set.spans.iter().any(|s| span_admits_prerelease_at(s, v))
        }
        // PEP 440: a specifier set only ever admits pre-releases when one of its clauses names a
        // pre-release itself (or the caller opted in some other way the façade doesn't expose).
        Dialect::PyPI => c.has_prerelease,
        Dialect::Go | Dialect::Maven | Dialect::NuGet | Dialect::RubyGems => true,
    }
}

/// Numeric-range containment only: always admits pre-releases, bypassing every dialect-specific
/// admission gate in [`matches`] above. Used for vulnerability-advisory-style matching, where a
/// pre-release candidate must be checked against the range purely on its numeric position.
pub fn matches_prerelease(c: &Constraint, v: &Version) -> bool {
    c.set.contains(v)
}

fn span_admits_prerelease_at(span: &Span, v: &Version) -> bool {
    span.min.as_ref().is_some_and(|m| m.is_pre() && same_release(m, v)) || span.max.as_ref().is_some_and(|m| m.is_pre() && same_release(m, v))
}

fn same_release(a: &Version, b: &Version) -> bool {
    if a.dialect != b.dialect {
        return false;
    }
    a.nums.iter().map(|n| n.get()).eq(b.nums.iter().map(|n| n.get()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Constraint;

    #[test]
    fn prerelease_hidden_unless_constraint_names_same_tuple() {
        let c = Constraint::parse(Dialect::Default, ">=1.2.3-alpha <1.3.0").unwrap();
        let admitted = Version::parse(Dialect::Default, "1.2.3-beta").unwrap();
        let hidden = Version::parse(Dialect::Default, "1.2.5-beta").unwrap();
        assert!(matches(&c, &admitted));
        assert!(!matches(&c, &hidden));
    }

    #[test]
    fn pypi_excludes_prerelease_unless_specifier_has_one() {
        let c = Constraint::parse(Dialect::PyPI, ">=1.0").unwrap();
        let pre = Version::parse(Dialect::PyPI, "1.5.0a1").unwrap();
        assert!(!matches(&c, &pre));

        let c2 = Constraint::parse(Dialect::PyPI, ">=1.0a1").unwrap();
        assert!(matches(&c2, &pre));
    }

    #[test]
    fn match_version_prerelease_always_admits_prereleases() {
        let c = Constraint::parse(Dialect::PyPI, ">=1.0").unwrap();
        let pre = Version::parse(Dialect::PyPI, "1.5.0a1").unwrap();
        assert!(!matches(&c, &pre));
        assert!(matches_prerelease(&c, &pre));
    }
}
