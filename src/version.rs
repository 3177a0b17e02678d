//! The dialect-tagged parsed version and its generic (non-extension) grammar.

use std::fmt::{self, Display, Formatter};

use crate::dialect::Dialect;
use crate::error::VersionError;
use crate::ext::Ext;
use crate::value::Value;

/// A parsed version identifier, tagged with the dialect it was parsed under.
///
/// For the three extension dialects (Maven, PyPI, RubyGems) the authoritative data lives in
/// `ext`; `nums`/`pre` mirror it on a best-effort basis so cross-cutting code (e.g. the
/// tokenizer-driven span builder) can stay dialect-agnostic where the numbers line up, but all
/// ordering and canonicalization for those dialects defers to `ext`.
#[derive(Debug, Clone)]
pub struct Version {
    pub dialect: Dialect,
    pub raw: String,
    pub nums: Vec<Value>,
    pub user_num_count: usize,
    pub pre: Vec<String>,
    pub build: String,
    pub is_prerelease: bool,
    pub ext: Option<Ext>,
}

impl Version {
    /// `Dialect::min_version`'s backing implementation.
    pub fn minimum(dialect: Dialect) -> Self {
        if let Some(ext) = Ext::minimum(dialect) {
            return Version {
                dialect,
                raw: ext.to_string(),
                nums: vec![Value::ZERO],
                user_num_count: 1,
                pre: Vec::new(),
                build: String::new(),
                is_prerelease: false,
                ext: Some(ext),
            };
        }
        let width = dialect.max_numbers().unwrap_or(3);
        Version {
            dialect,
            raw: "0.0.0".to_string(),
            nums: vec![Value::ZERO; width],
            user_num_count: width,
            pre: Vec::new(),
            build: String::new(),
            is_prerelease: false,
            ext: None,
        }
    }

    /// Parses `text` as a concrete version (not a constraint) under `dialect`.
    pub fn parse(dialect: Dialect, text: &str) -> Result<Self, VersionError> {
        let raw = text.trim();
        if let Some(result) = Ext::parse(dialect, raw) {
            let ext = result?;
            let is_prerelease = ext.is_prerelease();
            return Ok(Version {
                dialect,
                raw: raw.to_string(),
                nums: Vec::new(),
                user_num_count: 0,
                pre: Vec::new(),
                build: String::new(),
                is_prerelease,
                ext: Some(ext),
            });
        }
        parse_generic(dialect, raw)
    }

    pub fn is_pre(&self) -> bool {
        if let Some(ext) = &self.ext {
            ext.is_prerelease()
        } else {
            self.is_prerelease
        }
    }

    /// A copy with the build tag cleared -- used when building a span endpoint from an operator
    /// bound, so a caret/tilde range's ceiling never carries the seed version's build metadata.
    pub fn without_build(&self) -> Self {
        let mut v = self.clone();
        v.build.clear();
        v
    }

    /// Returns a copy with all numeric slots zero except a single `1` inserted at `index`, and
    /// everything after it dropped -- used by the caret/tilde span lowering "bump this position"
    /// operation. Saturates rather than overflowing past `Value::INFINITY`.
    pub fn bump(&self, index: usize) -> Self {
        let mut v = self.clone();
        v.pre.clear();
        v.is_prerelease = false;
        v.build.clear();
        for (i, n) in v.nums.iter_mut().enumerate() {
            match i.cmp(&index) {
                std::cmp::Ordering::Less => {}
                std::cmp::Ordering::Equal => *n = n.increment(),
                std::cmp::Ordering::Greater => *n = Value::ZERO,
            }
        }
        v
    }

    /// Canonical string form. `show_build` controls whether the build tag (if any and if the
    /// dialect has one) is appended.
    pub fn canon(&self, show_build: bool) -> String {
        if let Some(ext) = &self.ext {
            return ext.to_string();
        }

        let mut nums = self.nums.clone();
        if let Some(wpos) = nums.iter().position(|n| n.is_wildcard()) {
            nums.truncate(wpos + 1);
        } else {
            let width = self.dialect.max_numbers().unwrap_or(3).max(nums.len());
            while nums.len() < width {
                nums.push(Value::ZERO);
            }
        }

        let mut out = String::new();
        if self.dialect == Dialect::Go {
            out.push('v');
        }
        for (i, n) in nums.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&n.to_string());
        }
        if !self.pre.is_empty() {
            out.push('-');
            let pre = if self.dialect == Dialect::NuGet {
                self.pre.iter().map(|s| s.to_ascii_lowercase()).collect::<Vec<_>>()
            } else {
                self.pre.clone()
            };
            out.push_str(&pre.join("."));
        }
        if show_build
            && !self.build.is_empty()
            && !matches!(self.dialect, Dialect::NuGet | Dialect::Maven | Dialect::RubyGems | Dialect::PyPI)
        {
            out.push_str(&self.build);
        }
        out
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canon(true))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        crate::ordering::compare(self, other) == std::cmp::Ordering::Equal
    }
}
impl Eq for Version {}

/// Parses the generic (non-extension) grammar shared by Default/Cargo/Go/NPM/NuGet/Composer.
fn parse_generic(dialect: Dialect, raw: &str) -> Result<Version, VersionError> {
    let mut s = raw;

    match dialect {
        Dialect::Go => {
            s = s
                .strip_prefix('v')
                .ok_or_else(|| VersionError::InvalidVersion(raw.to_string()))?;
        }
        Dialect::PyPI | Dialect::Composer => {
            s = s.strip_prefix('v').unwrap_or(s);
        }
        Dialect::NPM => {
            while let Some(rest) = s.strip_prefix('v') {
                s = rest;
            }
        }
        _ => {}
    }

    let (num_part, rest) = split_at_first(s, &['-', '+']);
    if num_part.is_empty() {
        return Err(VersionError::InvalidVersion(raw.to_string()));
    }

    let mut nums = Vec::new();
    let mut saw_wildcard = false;
    for component in num_part.split('.') {
        if component.is_empty() {
            return Err(VersionError::EmptyComponent(raw.to_string()));
        }
        if is_wildcard_component(component, dialect) {
            if saw_wildcard {
                return Err(VersionError::WildcardNonTrailing(raw.to_string()));
            }
            saw_wildcard = true;
            nums.push(Value::WILDCARD);
            continue;
        }
        if saw_wildcard {
            return Err(VersionError::WildcardNonTrailing(raw.to_string()));
        }
        if dialect.forbids_leading_zero() && component.len() > 1 && component.starts_with('0') {
            return Err(VersionError::LeadingZero(raw.to_string()));
        }
        let n: i64 = component
            .parse()
            .map_err(|_| VersionError::NonNumericVersion(raw.to_string()))?;
        if n < 0 || n >= crate::value::INFINITY {
            return Err(VersionError::NumberOutOfRange(raw.to_string()));
        }
        nums.push(Value::number(n));
    }

    let user_num_count = nums.len();
    if let Some(max) = dialect.max_numbers() {
        if nums.len() > max {
            return Err(if max == 3 {
                VersionError::TooManyNumbers3(raw.to_string())
            } else {
                VersionError::TooManyNumbers4(raw.to_string())
            });
        }
    }
    if dialect == Dialect::NuGet {
        if let Some(last) = nums.last().copied() {
            if nums.len() == 4 && last == Value::ZERO {
                nums.pop();
            }
        }
    }

    let mut pre = Vec::new();
    let mut build = String::new();
    let mut is_prerelease = false;

    if let Some(rest) = rest {
        let tail = if let Some(r) = rest.strip_prefix('-') {
            let (pre_part, after) = split_at_first(r, &['+']);
            if pre_part.is_empty() {
                return Err(VersionError::EmptyPrereleaseMetadata(raw.to_string()));
            }
            for ident in pre_part.split('.') {
                if ident.is_empty() {
                    return Err(VersionError::EmptyPrereleaseMetadata(raw.to_string()));
                }
                pre.push(ident.to_string());
            }
            is_prerelease = true;
            after.unwrap_or("")
        } else {
            rest
        };

        if let Some(b) = tail.strip_prefix('+') {
            if b.is_empty() {
                return Err(VersionError::EmptyBuildMetadata(raw.to_string()));
            }
            build = format!("+{b}");
        }
    }

    if nums.len() < 3 && dialect == Dialect::Go {
        return Err(VersionError::InvalidVersion(raw.to_string()));
    }

    Ok(Version {
        dialect,
        raw: raw.to_string(),
        nums,
        user_num_count,
        pre,
        build,
        is_prerelease,
        ext: None,
    })
}

fn is_wildcard_component(component: &str, dialect: Dialect) -> bool {
    if component == "*" {
        return true;
    }
    if dialect.x_is_wildcard() && (component == "x" || component == "X") {
        return true;
    }
    false
}

/// Splits at the first occurrence of any of `chars`, returning the prefix and the remainder
/// starting at (and including) the matched character, if any.
fn split_at_first<'a>(s: &'a str, chars: &[char]) -> (&'a str, Option<&'a str>) {
    match s.find(|c| chars.contains(&c)) {
        Some(idx) => (&s[..idx], Some(&s[idx..])),
        None => (s, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_version() {
        let v = Version::parse(Dialect::Default, "1.2.3").unwrap();
        assert_eq!(v.nums, vec![Value::number(1), Value::number(2), Value::number(3)]);
    }

    #[test]
    fn parses_prerelease_and_build() {
        let v = Version::parse(Dialect::Default, "1.2.3-alpha.1+build5").unwrap();
        assert!(v.is_prerelease);
        assert_eq!(v.pre, vec!["alpha".to_string(), "1".to_string()]);
        assert_eq!(v.build, "+build5");
    }

    #[test]
    fn cargo_rejects_more_than_three_numbers() {
        let err = Version::parse(Dialect::Cargo, "1.2.3.4").unwrap_err();
        assert_eq!(err, VersionError::TooManyNumbers3("1.2.3.4".to_string()));
    }

    #[test]
    fn go_requires_leading_v_and_three_numbers() {
        assert!(Version::parse(Dialect::Go, "1.2.3").is_err());
        let v = Version::parse(Dialect::Go, "v1.2.3").unwrap();
        assert_eq!(v.nums.len(), 3);
    }

    #[test]
    fn wildcard_component() {
        let v = Version::parse(Dialect::Default, "1.2.*").unwrap();
        assert!(v.nums[2].is_wildcard());
    }

    #[test]
    fn leading_zero_rejected_for_default() {
        assert!(Version::parse(Dialect::Default, "1.02.3").is_err());
    }

    #[test]
    fn leading_zero_accepted_for_npm() {
        assert!(Version::parse(Dialect::NPM, "1.02.3").is_ok());
    }
}
