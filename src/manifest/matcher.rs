//! Name predicates used by enable/disable.

use anyhow::{Context, Result};
use regex::Regex;
use std::fmt;

/// Selects mod list entries by name.
#[derive(Debug, Clone)]
pub enum NameMatcher {
    /// Matches one name exactly.
    Exact(String),
    /// Matches every name the regular expression finds a match in.
    Pattern(Regex),
}

impl NameMatcher {
    pub fn exact(name: impl Into<String>) -> Self {
        NameMatcher::Exact(name.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern)
            .with_context(|| format!("Invalid name pattern: {}", pattern))?;
        Ok(NameMatcher::Pattern(re))
    }

    /// Compile every input either as exact names or as patterns.
    pub fn parse_all<S: AsRef<str>>(inputs: &[S], exact: bool) -> Result<Vec<Self>> {
        inputs
            .iter()
            .map(|s| {
                if exact {
                    Ok(Self::exact(s.as_ref()))
                } else {
                    Self::pattern(s.as_ref())
                }
            })
            .collect()
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Exact(expected) => expected == name,
            NameMatcher::Pattern(re) => re.is_match(name),
        }
    }
}

impl fmt::Display for NameMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameMatcher::Exact(name) => write!(f, "{}", name),
            NameMatcher::Pattern(re) => write!(f, "{}", re.as_str()),
        }
    }
}
