//! The [`Dialect`] tag that every [`crate::Version`], [`crate::Span`] and [`crate::Set`] carries.

use std::fmt::{self, Display, Formatter};

use once_cell::sync::Lazy;

use crate::version::Version;

/// One packaging ecosystem's version & constraint rules.
///
/// The declaration order below is the cross-dialect total order used when two values with
/// different dialects are compared (§3: "stable but unspecified").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dialect {
    Default,
    Cargo,
    Go,
    Maven,
    NPM,
    NuGet,
    PyPI,
    RubyGems,
    Composer,
}

impl Display for Dialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "Default",
            Self::Cargo => "Cargo",
            Self::Go => "Go",
            Self::Maven => "Maven",
            Self::NPM => "NPM",
            Self::NuGet => "NuGet",
            Self::PyPI => "PyPI",
            Self::RubyGems => "RubyGems",
            Self::Composer => "Composer",
        };
        write!(f, "{name}")
    }
}

impl Dialect {
    /// Maximum number of release components this dialect's plain parser will accept, if bounded.
    pub(crate) fn max_numbers(self) -> Option<usize> {
        match self {
            Self::Default | Self::Cargo | Self::NPM | Self::Go => Some(3),
            Self::NuGet => Some(4),
            Self::RubyGems | Self::PyPI | Self::Maven | Self::Composer => None,
        }
    }

    /// Whether leading zeros in numeric components are rejected outright.
    pub(crate) fn forbids_leading_zero(self) -> bool {
        matches!(self, Self::Default | Self::Cargo | Self::Go | Self::PyPI | Self::Maven)
    }

    /// Whether `x`/`X` (in addition to `*`) count as wildcard characters.
    pub(crate) fn x_is_wildcard(self) -> bool {
        matches!(self, Self::Default | Self::Cargo | Self::NPM)
    }

    /// Whether numeric identifiers in the pre-release list compare numerically.
    pub(crate) fn numeric_prerelease_identifiers(self) -> bool {
        matches!(self, Self::NPM | Self::PyPI | Self::RubyGems | Self::Composer)
    }

    /// The "smallest version" for this dialect.
    ///
    /// For the extension dialects this defers to the extension's own minimum; for every other
    /// dialect it is `0.0.0` (padded to the dialect's numeric width). Built once per process and
    /// cloned out of the cache on every call, since [`Version::minimum`] re-derives it from
    /// scratch and every dialect's is immutable for the process lifetime.
    pub fn min_version(self) -> Version {
        MINIMUMS[self as usize].clone()
    }
}

static MINIMUMS: Lazy<[Version; 9]> = Lazy::new(|| {
    [
        Version::minimum(Dialect::Default),
        Version::minimum(Dialect::Cargo),
        Version::minimum(Dialect::Go),
        Version::minimum(Dialect::Maven),
        Version::minimum(Dialect::NPM),
        Version::minimum(Dialect::NuGet),
        Version::minimum(Dialect::PyPI),
        Version::minimum(Dialect::RubyGems),
        Version::minimum(Dialect::Composer),
    ]
});
