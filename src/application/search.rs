//! Catalog search.

use anyhow::{Context, Result, bail};
use regex::{Regex, RegexBuilder};

use crate::catalog::Package;

/// Case-insensitive filter over catalog packages. Every supplied pattern must
/// match for a package to be selected.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    name: Option<Regex>,
    owner: Option<Regex>,
    tag: Option<Regex>,
}

fn compile(field: &str, pattern: Option<&str>) -> Result<Option<Regex>> {
    pattern
        .filter(|p| !p.is_empty())
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("Invalid {} pattern: {}", field, p))
        })
        .transpose()
}

impl SearchQuery {
    pub fn new(name: Option<&str>, owner: Option<&str>, tag: Option<&str>) -> Result<Self> {
        let query = Self {
            name: compile("name", name)?,
            owner: compile("owner", owner)?,
            tag: compile("tag", tag)?,
        };
        if query.name.is_none() && query.owner.is_none() && query.tag.is_none() {
            bail!("At least one search pattern is required");
        }
        Ok(query)
    }

    pub fn matches(&self, package: &Package) -> bool {
        self.name
            .as_ref()
            .is_none_or(|re| re.is_match(&package.name) || re.is_match(&package.title))
            && self.owner.as_ref().is_none_or(|re| re.is_match(&package.owner))
            && self.tag.as_ref().is_none_or(|re| re.is_match(&package.category))
    }

    pub fn filter<'p>(&self, packages: &'p [Package]) -> Vec<&'p Package> {
        packages.iter().filter(|p| self.matches(p)).collect()
    }
}
