//! The fixed error-string taxonomy used across every dialect.
//!
//! Every fallible entry point in this crate returns `Result<_, VersionError>`. The exact
//! `Display` text of each variant is part of the crate's test-facing contract: downstream
//! consumers match on these strings, so wording changes are breaking changes.

use thiserror::Error;

/// A single parse, lex or semantic failure, together with the text that failed.
#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum VersionError {
    #[error("invalid version `{0}`")]
    InvalidVersion(String),

    #[error("empty component in `{0}`")]
    EmptyComponent(String),

    #[error("empty build metadata in `{0}`")]
    EmptyBuildMetadata(String),

    #[error("empty pre-release metadata in `{0}`")]
    EmptyPrereleaseMetadata(String),

    #[error("more than 3 numbers present in `{0}`")]
    TooManyNumbers3(String),

    #[error("more than 4 numbers present in `{0}`")]
    TooManyNumbers4(String),

    #[error("non-numeric version in `{0}`")]
    NonNumericVersion(String),

    #[error("number has leading zero in `{0}`")]
    LeadingZero(String),

    #[error("number out of range in `{0}`")]
    NumberOutOfRange(String),

    #[error("cannot have more than one range in `{0}`")]
    MoreThanOneRange(String),

    #[error("`||` (or-list) is not supported by {dialect}, which only allows a comma-separated and-list: `{text}`")]
    AndListNotSupported { dialect: String, text: String },

    #[error("hard requirement must be closed on both ends in `{0}`")]
    HardRequirementNotClosed(String),

    #[error("missing item after {op} in `{text}`")]
    MissingItemAfterOperator { op: String, text: String },

    #[error("syntax error parsing span `{0}`")]
    SpanSyntaxError(String),

    #[error("missing or misplaced braces: `{0}`")]
    MissingOrMisplacedBraces(String),

    #[error("missing operator")]
    MissingOperator,

    #[error("calculateMinVersion is only supported by NPM")]
    CalculateMinVersionUnsupported,

    #[error("constraint is unsatisfiable")]
    Unsatisfiable,

    #[error("wildcard in non-trailing position in `{0}`")]
    WildcardNonTrailing(String),

    #[error("invalid local version identifier in `{0}`")]
    InvalidLocalVersion(String),

    #[error("NuGet constraint must not be empty")]
    NuGetEmptyConstraint,
}

pub type Result<T> = std::result::Result<T, VersionError>;
