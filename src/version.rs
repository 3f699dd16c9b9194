//! Version values used for both package releases and the target game version.
//!
//! Catalog data and command line flags frequently carry partial versions
//! ("0.18"), so missing trailing components default to zero. A distinguished
//! wildcard value compares equal to every other version.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("valid version regex"));

/// A `major.minor.patch` version, or the wildcard [`Version::ANY`].
///
/// Equality via `==` is structural. Use [`Version::compare`] for ordering,
/// which honours the wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    major: i64,
    minor: i64,
    patch: i64,
}

impl Version {
    /// Matches any version.
    pub const ANY: Version = Version {
        major: -1,
        minor: 0,
        patch: 0,
    };

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major: major as i64,
            minor: minor as i64,
            patch: patch as i64,
        }
    }

    /// Extract the first `a[.b[.c]]` run from `text`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let caps = VERSION_RE
            .captures(text)
            .ok_or_else(|| ParseError::new(text))?;

        let component = |i: usize| -> Result<i64, ParseError> {
            match caps.get(i) {
                Some(m) => m.as_str().parse().map_err(|_| ParseError::new(text)),
                None => Ok(0),
            }
        };

        Ok(Self {
            major: component(1)?,
            minor: component(2)?,
            patch: component(3)?,
        })
    }

    pub fn is_any(&self) -> bool {
        self.major < 0
    }

    pub fn major(&self) -> i64 {
        self.major
    }

    pub fn minor(&self) -> i64 {
        self.minor
    }

    pub fn patch(&self) -> i64 {
        self.patch
    }

    /// Compare two versions. Either side being the wildcard yields `Equal`.
    pub fn compare(&self, other: &Version) -> Ordering {
        if self.is_any() || other.is_any() {
            return Ordering::Equal;
        }

        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }

    /// Parse `text` and compare against it.
    pub fn compare_str(&self, text: &str) -> Result<Ordering, ParseError> {
        Ok(self.compare(&Version::parse(text)?))
    }

    /// True when `self` is compatible with `other` (equal, or either is the wildcard).
    pub fn matches(&self, other: &Version) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            write!(f, "*")
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}
