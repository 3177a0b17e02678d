//! General-purpose version comparison and the coarse "what changed" diff.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use crate::dialect::Dialect;
use crate::version::Version;

/// Compares two versions. Cross-dialect comparisons fall back to the dialects' own declared total
/// order (§3: "stable but unspecified").
pub fn compare(a: &Version, b: &Version) -> Ordering {
    if a.dialect != b.dialect {
        return a.dialect.cmp(&b.dialect);
    }

    if let (Some(ea), Some(eb)) = (&a.ext, &b.ext) {
        return crate::ext::compare_ext(ea, eb);
    }

    let len = a.nums.len().max(b.nums.len());
    for i in 0..len {
        let x = a.nums.get(i).copied().unwrap_or(crate::value::Value::ZERO);
        let y = b.nums.get(i).copied().unwrap_or(crate::value::Value::ZERO);
        let ord = x.cmp(&y);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    match (a.is_prerelease, b.is_prerelease) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    compare_pre_identifiers(&a.pre, &b.pre, a.dialect)
}

fn compare_pre_identifiers(a: &[String], b: &[String], dialect: Dialect) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        match (a.get(i), b.get(i)) {
            (Some(x), Some(y)) => {
                let ord = compare_identifier(x, y, dialect);
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

fn compare_identifier(a: &str, b: &str, dialect: Dialect) -> Ordering {
    if dialect.numeric_prerelease_identifiers() {
        if let (Ok(x), Ok(y)) = (a.parse::<u64>(), b.parse::<u64>()) {
            return x.cmp(&y);
        }
        if a.parse::<u64>().is_ok() {
            return Ordering::Less;
        }
        if b.parse::<u64>().is_ok() {
            return Ordering::Greater;
        }
    }
    a.cmp(b)
}

/// A coarse classification of how two versions differ, coarsest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diff {
    Same,
    Major,
    Minor,
    Patch,
    Prerelease,
    Build,
    Other,
}

impl Display for Diff {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Same => "same",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Prerelease => "prerelease",
            Self::Build => "build",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}

/// Classifies the difference between two same-dialect versions. The nums/pre/build fields are
/// compared positionally; the first position that differs determines the classification.
pub fn difference(a: &Version, b: &Version) -> Diff {
    if a.dialect != b.dialect {
        return Diff::Other;
    }
    if a.ext.is_some() || b.ext.is_some() {
        if compare(a, b) == Ordering::Equal {
            return Diff::Same;
        }
        return if a.is_pre() != b.is_pre() { Diff::Prerelease } else { Diff::Other };
    }

    let names = [Diff::Major, Diff::Minor, Diff::Patch];
    for (i, kind) in names.iter().enumerate() {
        let x = a.nums.get(i);
        let y = b.nums.get(i);
        if x != y {
            return *kind;
        }
    }
    if a.nums.len() != b.nums.len() {
        return Diff::Other;
    }
    if a.pre != b.pre || a.is_prerelease != b.is_prerelease {
        return Diff::Prerelease;
    }
    if a.build != b.build {
        return Diff::Build;
    }
    Diff::Same
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;

    fn v(s: &str) -> Version {
        Version::parse(Dialect::Default, s).unwrap()
    }

    #[test]
    fn orders_numerically_not_lexically() {
        assert_eq!(compare(&v("1.9.0"), &v("1.10.0")), Ordering::Less);
    }

    #[test]
    fn prerelease_sorts_below_release() {
        assert_eq!(compare(&v("1.0.0-alpha"), &v("1.0.0")), Ordering::Less);
    }

    #[test]
    fn numeric_prerelease_identifiers_compare_numerically_for_npm() {
        let a = Version::parse(Dialect::NPM, "1.0.0-2").unwrap();
        let b = Version::parse(Dialect::NPM, "1.0.0-10").unwrap();
        assert_eq!(compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn classifies_major_minor_patch() {
        assert_eq!(difference(&v("1.0.0"), &v("2.0.0")), Diff::Major);
        assert_eq!(difference(&v("1.0.0"), &v("1.1.0")), Diff::Minor);
        assert_eq!(difference(&v("1.0.0"), &v("1.0.1")), Diff::Patch);
        assert_eq!(difference(&v("1.0.0"), &v("1.0.0")), Diff::Same);
        assert_eq!(difference(&v("1.0.0"), &v("1.0.0-alpha")), Diff::Prerelease);
    }
}
