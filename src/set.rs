//! A canonicalized union of [`Span`]s: the result of evaluating a full constraint expression.

use std::fmt::{self, Display, Formatter};

use crate::dialect::Dialect;
use crate::ordering::compare;
use crate::span::Span;
use crate::version::Version;

/// A set of versions expressed as a minimal, sorted list of disjoint (or touching, for non-Maven
/// dialects) spans.
#[derive(Debug, Clone)]
pub struct Set {
    pub dialect: Dialect,
    pub spans: Vec<Span>,
}

impl Set {
    pub fn empty(dialect: Dialect) -> Self {
        Set { dialect, spans: Vec::new() }
    }

    pub fn from_span(span: Span) -> Self {
        let dialect = span.dialect;
        if span.is_empty() {
            Set::empty(dialect)
        } else {
            Set { dialect, spans: vec![span] }
        }
    }

    pub fn contains(&self, v: &Version) -> bool {
        self.spans.iter().any(|s| s.contains(v))
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Sorts by lower bound and merges every pair of touching/overlapping spans.
    ///
    /// Maven's soft-requirement semantics never merge across an explicit bracketed range and an
    /// adjacent soft version, so Maven sets skip the merge step and are only sorted.
    pub fn canon(mut self) -> Self {
        self.spans.retain(|s| !s.is_empty());
        self.spans.sort_by(|a, b| match (&a.min, &b.min) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(x), Some(y)) => compare(x, y),
        });

        if self.dialect == Dialect::Maven {
            return self;
        }

        let mut merged: Vec<Span> = Vec::new();
        for span in self.spans {
            if let Some(last) = merged.last() {
                if last.union_touches(&span) {
                    let combined = last.merge(&span);
                    *merged.last_mut().unwrap() = combined;
                    continue;
                }
            }
            merged.push(span);
        }
        self.spans = merged;
        self
    }

    pub fn union(&self, other: &Set) -> Set {
        let mut spans = self.spans.clone();
        spans.extend(other.spans.iter().cloned());
        Set {
            dialect: self.dialect,
            spans,
        }
        .canon()
    }

    pub fn intersect(&self, other: &Set) -> Set {
        let mut spans = Vec::new();
        for a in &self.spans {
            for b in &other.spans {
                if let Some(inter) = intersect_spans(a, b) {
                    spans.push(inter);
                }
            }
        }
        Set {
            dialect: self.dialect,
            spans,
        }
        .canon()
    }

    /// Renders each contained span, filtering out any whose entire range is a pre-release range
    /// that the dialect's default matching would exclude anyway -- callers wanting that behavior
    /// should filter with [`crate::match_engine`] instead; this is purely textual.
    pub fn debug(&self) -> String {
        if self.spans.is_empty() {
            return "{}".to_string();
        }
        let parts: Vec<String> = self.spans.iter().map(ToString::to_string).collect();
        format!("{{{}}}", parts.join(", "))
    }
}

fn intersect_spans(a: &Span, b: &Span) -> Option<Span> {
    if a.is_empty() || b.is_empty() || a.dialect != b.dialect {
        return None;
    }
    let (min, min_open) = tighter_min(a.min.as_ref(), a.min_open, b.min.as_ref(), b.min_open);
    let (max, max_open) = tighter_max(a.max.as_ref(), a.max_open, b.max.as_ref(), b.max_open);
    let span = Span::range(min, min_open, max, max_open, a.dialect);
    if span.is_empty() {
        None
    } else {
        Some(span)
    }
}

fn tighter_min(a: Option<&Version>, a_open: bool, b: Option<&Version>, b_open: bool) -> (Option<Version>, bool) {
    match (a, b) {
        (None, None) => (None, false),
        (Some(x), None) => (Some(x.clone()), a_open),
        (None, Some(y)) => (Some(y.clone()), b_open),
        (Some(x), Some(y)) => match compare(x, y) {
            std::cmp::Ordering::Greater => (Some(x.clone()), a_open),
            std::cmp::Ordering::Less => (Some(y.clone()), b_open),
            std::cmp::Ordering::Equal => (Some(x.clone()), a_open || b_open),
        },
    }
}

fn tighter_max(a: Option<&Version>, a_open: bool, b: Option<&Version>, b_open: bool) -> (Option<Version>, bool) {
    match (a, b) {
        (None, None) => (None, false),
        (Some(x), None) => (Some(x.clone()), a_open),
        (None, Some(y)) => (Some(y.clone()), b_open),
        (Some(x), Some(y)) => match compare(x, y) {
            std::cmp::Ordering::Less => (Some(x.clone()), a_open),
            std::cmp::Ordering::Greater => (Some(y.clone()), b_open),
            std::cmp::Ordering::Equal => (Some(x.clone()), a_open || b_open),
        },
    }
}

impl Display for Set {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.debug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(Dialect::Default, s).unwrap()
    }

    fn span(lo: &str, hi: &str) -> Span {
        Span::range(Some(v(lo)), false, Some(v(hi)), true, Dialect::Default)
    }

    #[test]
    fn canon_merges_touching_spans() {
        let set = Set {
            dialect: Dialect::Default,
            spans: vec![span("2.0.0", "3.0.0"), span("1.0.0", "2.0.0")],
        }
        .canon();
        assert_eq!(set.spans.len(), 1);
    }

    #[test]
    fn intersect_narrows_to_overlap() {
        let a = Set::from_span(span("1.0.0", "3.0.0"));
        let b = Set::from_span(span("2.0.0", "4.0.0"));
        let result = a.intersect(&b);
        assert!(result.contains(&v("2.5.0")));
        assert!(!result.contains(&v("1.5.0")));
        assert!(!result.contains(&v("3.5.0")));
    }

    #[test]
    fn union_of_disjoint_spans_does_not_merge() {
        let a = Set::from_span(span("1.0.0", "2.0.0"));
        let b = Set::from_span(span("5.0.0", "6.0.0"));
        let result = a.union(&b);
        assert_eq!(result.spans.len(), 2);
    }
}
