//! A single contiguous range of versions, the unit constraints are built from.

use std::fmt::{self, Display, Formatter};

use crate::dialect::Dialect;
use crate::ext::{pep440, rubygems, Ext};
use crate::ordering::compare;
use crate::version::Version;

/// The shape of a [`Span`]: no versions at all, exactly one version, or a genuine range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Empty,
    Unit,
    Range,
}

/// One contiguous interval of versions: `(min_open ? "(" : "[") min, max (max_open ? ")" : "]")`.
///
/// An empty span (`Rank::Empty`) carries no bounds and contains nothing. A unit span
/// (`Rank::Unit`) contains exactly `min` (`== max`, both closed).
#[derive(Debug, Clone)]
pub struct Span {
    pub dialect: Dialect,
    pub rank: Rank,
    pub min: Option<Version>,
    pub max: Option<Version>,
    pub min_open: bool,
    pub max_open: bool,
}

impl Span {
    pub fn empty(dialect: Dialect) -> Self {
        Span {
            dialect,
            rank: Rank::Empty,
            min: None,
            max: None,
            min_open: false,
            max_open: false,
        }
    }

    pub fn exact(v: Version) -> Self {
        let dialect = v.dialect;
        Span {
            dialect,
            rank: Rank::Unit,
            min: Some(v.clone()),
            max: Some(v),
            min_open: false,
            max_open: false,
        }
    }

    /// An unbounded span: `(-inf, +inf)`, i.e. every version of `dialect` matches.
    pub fn unbounded(dialect: Dialect) -> Self {
        Span {
            dialect,
            rank: Rank::Range,
            min: None,
            max: None,
            min_open: false,
            max_open: false,
        }
    }

    pub fn range(min: Option<Version>, min_open: bool, max: Option<Version>, max_open: bool, dialect: Dialect) -> Self {
        if let (Some(lo), Some(hi)) = (&min, &max) {
            let ord = compare(lo, hi);
            if ord == std::cmp::Ordering::Greater {
                return Span::empty(dialect);
            }
            if ord == std::cmp::Ordering::Equal && !min_open && !max_open {
                return Span::exact(lo.clone());
            }
            if ord == std::cmp::Ordering::Equal && (min_open || max_open) {
                return Span::empty(dialect);
            }
        }
        Span {
            dialect,
            rank: Rank::Range,
            min,
            max,
            min_open,
            max_open,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rank == Rank::Empty
    }

    /// Whether `v` falls inside this span.
    ///
    /// RubyGems' pessimistic-constraint family truncates `v` to the bound's own component count
    /// before the upper-bound comparison, so `~> 2.2` admits `2.2.5` but also effectively treats
    /// any trailing components of `v` past the bound's length as irrelevant to the ceiling check.
    ///
    /// For PyPI, the strict `<` ceiling's exclusion of a same-release pre-release is itself
    /// suppressed whenever this span's own `min` already names a pre-release at that same release
    /// tuple -- a two-sided range like `>=2.0.0rc1,<2.0.0` must admit `2.0.0rc1`, which the
    /// ceiling's operator-level exclusion would otherwise reject on its own.
    pub fn contains(&self, v: &Version) -> bool {
        if self.is_empty() {
            return false;
        }
        if v.dialect != self.dialect {
            return false;
        }

        if let Some(min) = &self.min {
            let ok = if self.min_open {
                match pep440_pair(self.dialect, min, v) {
                    Some((bound, candidate)) => pep440::greater_than(bound, candidate),
                    None => compare(min, v) == std::cmp::Ordering::Less,
                }
            } else {
                compare(min, v) != std::cmp::Ordering::Greater
            };
            if !ok {
                return false;
            }
        }
        if let Some(max) = &self.max {
            let ok = if let Some((bound, candidate)) = rubygems_pair(self.dialect, max, v) {
                let truncated = candidate.truncated_release(bound.release.len());
                if self.max_open {
                    truncated < *bound
                } else {
                    truncated <= *bound
                }
            } else if self.max_open {
                match pep440_pair(self.dialect, max, v) {
                    Some((bound, candidate)) => {
                        if self.min_names_same_release_prerelease(candidate) {
                            candidate < bound
                        } else {
                            pep440::less_than(bound, candidate)
                        }
                    }
                    None => compare(v, max) == std::cmp::Ordering::Less,
                }
            } else {
                compare(v, max) != std::cmp::Ordering::Greater
            };
            if !ok {
                return false;
            }
        }
        true
    }

    /// Whether this span's own `min` is a PyPI pre-release at the same release tuple as
    /// `candidate` -- the §4.8 admission rule that overrides the ceiling's own exclusion.
    fn min_names_same_release_prerelease(&self, candidate: &pep440::Pep440) -> bool {
        match &self.min {
            Some(min) => match &min.ext {
                Some(Ext::Pep440(m)) => m.is_pre() && m.same_release(candidate),
                _ => false,
            },
            None => false,
        }
    }

    pub fn union_touches(&self, other: &Span) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(self.strictly_before(other) || other.strictly_before(self))
    }

    fn strictly_before(&self, other: &Span) -> bool {
        match (&self.max, &other.min) {
            (Some(hi), Some(lo)) => {
                let ord = compare(hi, lo);
                ord == std::cmp::Ordering::Less || (ord == std::cmp::Ordering::Equal && (self.max_open || other.min_open))
            }
            _ => false,
        }
    }

    /// Merges two overlapping (or touching) spans into their union. Callers must check
    /// `union_touches` first.
    pub fn merge(&self, other: &Span) -> Span {
        let (min, min_open) = pick_min(self.min.as_ref(), self.min_open, other.min.as_ref(), other.min_open);
        let (max, max_open) = pick_max(self.max.as_ref(), self.max_open, other.max.as_ref(), other.max_open);
        Span::range(min, min_open, max, max_open, self.dialect)
    }
}

fn pick_min(a: Option<&Version>, a_open: bool, b: Option<&Version>, b_open: bool) -> (Option<Version>, bool) {
    match (a, b) {
        (None, _) | (_, None) => (None, false),
        (Some(x), Some(y)) => match compare(x, y) {
            std::cmp::Ordering::Less => (Some(x.clone()), a_open),
            std::cmp::Ordering::Greater => (Some(y.clone()), b_open),
            std::cmp::Ordering::Equal => (Some(x.clone()), a_open && b_open),
        },
    }
}

fn pick_max(a: Option<&Version>, a_open: bool, b: Option<&Version>, b_open: bool) -> (Option<Version>, bool) {
    match (a, b) {
        (None, _) | (_, None) => (None, false),
        (Some(x), Some(y)) => match compare(x, y) {
            std::cmp::Ordering::Greater => (Some(x.clone()), a_open),
            std::cmp::Ordering::Less => (Some(y.clone()), b_open),
            std::cmp::Ordering::Equal => (Some(x.clone()), a_open && b_open),
        },
    }
}

/// Extracts the PEP 440 payload of `bound`/`candidate` when this is a PyPI span, so a strict
/// `>`/`<` bound can use PEP 440's asymmetric operator semantics (§ "Inclusive/exclusive
/// comparison of pre/post-releases") instead of plain total ordering.
fn pep440_pair<'a>(dialect: Dialect, bound: &'a Version, candidate: &'a Version) -> Option<(&'a pep440::Pep440, &'a pep440::Pep440)> {
    if dialect != Dialect::PyPI {
        return None;
    }
    match (&bound.ext, &candidate.ext) {
        (Some(Ext::Pep440(b)), Some(Ext::Pep440(c))) => Some((b, c)),
        _ => None,
    }
}

/// Extracts the RubyGems payload of `bound`/`candidate` when this is a RubyGems span, so the
/// ceiling check can truncate the candidate's own `release` vector (not the generic `Version`
/// numeric tuple, which RubyGems never populates) to the bound's length before comparing.
fn rubygems_pair<'a>(dialect: Dialect, bound: &'a Version, candidate: &'a Version) -> Option<(&'a rubygems::RubyGems, &'a rubygems::RubyGems)> {
    if dialect != Dialect::RubyGems {
        return None;
    }
    match (&bound.ext, &candidate.ext) {
        (Some(Ext::RubyGems(b)), Some(Ext::RubyGems(c))) => Some((b, c)),
        _ => None,
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.rank {
            Rank::Empty => write!(f, "<empty>"),
            Rank::Unit => write!(f, "{}", self.min.as_ref().unwrap().canon(true)),
            Rank::Range => {
                write!(f, "{}", if self.min_open { "(" } else { "[" })?;
                match &self.min {
                    Some(v) => write!(f, "{}", v.canon(true))?,
                    None => write!(f, "-∞")?,
                }
                write!(f, ", ")?;
                match &self.max {
                    Some(v) => write!(f, "{}", v.canon(true))?,
                    None => write!(f, "+∞")?,
                }
                write!(f, "{}", if self.max_open { ")" } else { "]" })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(Dialect::Default, s).unwrap()
    }

    #[test]
    fn closed_range_contains_endpoints() {
        let span = Span::range(Some(v("1.0.0")), false, Some(v("2.0.0")), false, Dialect::Default);
        assert!(span.contains(&v("1.0.0")));
        assert!(span.contains(&v("2.0.0")));
        assert!(span.contains(&v("1.5.0")));
        assert!(!span.contains(&v("2.0.1")));
    }

    #[test]
    fn open_range_excludes_endpoints() {
        let span = Span::range(Some(v("1.0.0")), true, Some(v("2.0.0")), true, Dialect::Default);
        assert!(!span.contains(&v("1.0.0")));
        assert!(!span.contains(&v("2.0.0")));
    }

    #[test]
    fn crossed_bounds_collapse_to_empty() {
        let span = Span::range(Some(v("2.0.0")), false, Some(v("1.0.0")), false, Dialect::Default);
        assert!(span.is_empty());
    }

    #[test]
    fn equal_bounds_collapse_to_unit() {
        let span = Span::range(Some(v("1.0.0")), false, Some(v("1.0.0")), false, Dialect::Default);
        assert_eq!(span.rank, Rank::Unit);
    }

    #[test]
    fn rubygems_pessimistic_truncates_before_ceiling_check() {
        // `~> 2.2` lowers to `>= 2.2, < 3.0`; the ceiling check truncates the candidate to the
        // bound's own component count so `2.2.5.1` is still compared as `2.2.5` against `3.0`.
        let span = Span::range(
            Some(Version::parse(Dialect::RubyGems, "2.2").unwrap()),
            false,
            Some(Version::parse(Dialect::RubyGems, "3.0").unwrap()),
            true,
            Dialect::RubyGems,
        );
        assert!(span.contains(&Version::parse(Dialect::RubyGems, "2.2.5").unwrap()));
        assert!(!span.contains(&Version::parse(Dialect::RubyGems, "3.0.0").unwrap()));
    }

    #[test]
    fn rubygems_closed_ceiling_truncates_longer_candidate_to_its_own_length() {
        // spec example: a bound of "1.2.3" contains "1.2.3.4" once the candidate is truncated to
        // the bound's own component count.
        let span = Span::range(None, false, Some(Version::parse(Dialect::RubyGems, "1.2.3").unwrap()), false, Dialect::RubyGems);
        assert!(span.contains(&Version::parse(Dialect::RubyGems, "1.2.3.4").unwrap()));
    }

    #[test]
    fn pypi_two_sided_range_admits_prerelease_named_by_its_own_lower_bound() {
        // ">=2.0.0-rc,<2.0.0": the ceiling's operator-level exclusion of same-release
        // pre-releases must not override the range's own admission of the pre-release it names.
        let span = Span::range(
            Some(Version::parse(Dialect::PyPI, "2.0.0-rc").unwrap()),
            false,
            Some(Version::parse(Dialect::PyPI, "2.0.0").unwrap()),
            true,
            Dialect::PyPI,
        );
        assert!(span.contains(&Version::parse(Dialect::PyPI, "2.0.0-rc").unwrap()));
        assert!(!span.contains(&Version::parse(Dialect::PyPI, "2.0.0").unwrap()));
    }

    #[test]
    fn pypi_strict_greater_than_excludes_post_release_of_the_bound() {
        // PEP 440: `>V` must not match a post-release of V unless V itself is a post-release.
        let bound = Version::parse(Dialect::PyPI, "1.7").unwrap();
        let span = Span::range(Some(bound), true, None, false, Dialect::PyPI);
        assert!(!span.contains(&Version::parse(Dialect::PyPI, "1.7.post1").unwrap()));
        assert!(span.contains(&Version::parse(Dialect::PyPI, "1.8").unwrap()));
    }

    #[test]
    fn pypi_strict_less_than_excludes_prerelease_of_the_bound() {
        // PEP 440: `<V` must not match a pre-release at the same release unless V is itself one.
        let bound = Version::parse(Dialect::PyPI, "1.7").unwrap();
        let span = Span::range(None, false, Some(bound), true, Dialect::PyPI);
        assert!(!span.contains(&Version::parse(Dialect::PyPI, "1.7a1").unwrap()));
        assert!(span.contains(&Version::parse(Dialect::PyPI, "1.6").unwrap()));
    }
}
