//! Dialect-specific alternative version representations that plug into the common comparator.
//!
//! Per §9 "Extension polymorphism": represented as a tagged variant rather than a trait object,
//! which sidesteps any need for an extension to hold a reference back to its host `Version` --
//! required for cheap, safe cloning.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::dialect::Dialect;
use crate::error::VersionError;

pub mod maven;
pub mod pep440;
pub mod rubygems;

pub use maven::Maven;
pub use pep440::Pep440;
pub use rubygems::RubyGems;

/// The dialect-specific payload carried by [`crate::Version::ext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ext {
    Maven(Maven),
    Pep440(Pep440),
    RubyGems(RubyGems),
}

impl Ext {
    pub fn parse(dialect: Dialect, raw: &str) -> Option<Result<Self, VersionError>> {
        match dialect {
            Dialect::Maven => Some(Maven::from_str(raw).map(Ext::Maven)),
            Dialect::PyPI => Some(Pep440::from_str(raw).map(Ext::Pep440)),
            Dialect::RubyGems => Some(RubyGems::from_str(raw).map(Ext::RubyGems)),
            _ => None,
        }
    }

    pub fn minimum(dialect: Dialect) -> Option<Self> {
        match dialect {
            Dialect::Maven => Some(Ext::Maven(Maven::minimum())),
            Dialect::PyPI => Some(Ext::Pep440(Pep440::minimum())),
            Dialect::RubyGems => Some(Ext::RubyGems(RubyGems::minimum())),
            _ => None,
        }
    }

    pub fn is_prerelease(&self) -> bool {
        match self {
            Ext::Maven(_) => false,
            Ext::Pep440(p) => p.any_prerelease(),
            Ext::RubyGems(r) => r.is_prerelease(),
        }
    }

    /// Clears any prerelease/post/dev/local markers -- used when building a span's closed bound
    /// from an extension endpoint that must not leak its own prerelease-ness.
    pub fn clear_pre(&self) -> Self {
        match self {
            Ext::Maven(m) => Ext::Maven(m.clone()),
            Ext::Pep440(p) => Ext::Pep440(Pep440 {
                pre: None,
                post: None,
                dev: None,
                local: None,
                ..p.clone()
            }),
            Ext::RubyGems(r) => Ext::RubyGems(RubyGems {
                release: r.release.clone(),
                pre: Vec::new(),
            }),
        }
    }
}

impl fmt::Display for Ext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ext::Maven(m) => write!(f, "{m}"),
            Ext::Pep440(p) => write!(f, "{p}"),
            Ext::RubyGems(r) => write!(f, "{r}"),
        }
    }
}

/// Compares two same-dialect extensions. Panics if the variants differ -- callers only reach
/// this after confirming both versions share a dialect, so mismatched variants are a bug.
pub fn compare_ext(a: &Ext, b: &Ext) -> Ordering {
    match (a, b) {
        (Ext::Maven(x), Ext::Maven(y)) => x.cmp(y),
        (Ext::Pep440(x), Ext::Pep440(y)) => x.cmp(y),
        (Ext::RubyGems(x), Ext::RubyGems(y)) => x.cmp(y),
        _ => unreachable!("compared extensions from different dialects"),
    }
}
