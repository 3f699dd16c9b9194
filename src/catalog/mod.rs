//! Catalog abstraction for the remote mod portal.
//!
//! The catalog is a read-only snapshot fetched once per command. Release
//! versions are parsed as soon as the response arrives so the rest of the
//! program only ever sees [`Version`] values.

mod portal;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

use crate::version::Version;

pub use portal::PortalCatalog;

/// One downloadable build of a package.
#[derive(Debug, Clone, PartialEq)]
pub struct Release {
    pub version: Version,
    /// Game version this release is built against.
    pub target_version: Version,
    /// Path relative to the portal base URL.
    pub download_url: String,
    pub file_name: String,
    pub released_at: Option<String>,
    pub sha1: Option<String>,
}

/// A package together with its releases, oldest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Package {
    pub name: String,
    pub owner: String,
    pub title: String,
    pub summary: String,
    pub category: String,
    pub downloads_count: u64,
    pub releases: Vec<Release>,
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "\tName: {}", self.name)?;
        writeln!(f, "\tOwner: {}", self.owner)?;
        writeln!(f, "\tCategory: {}", self.category)?;
        write!(f, "\tSummary: {}", self.summary)
    }
}

/// Read access to the remote catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch the named packages. Unknown names are simply absent from the result.
    async fn get_packages(&self, names: &[String]) -> Result<Vec<Package>>;

    /// Fetch every package in the catalog.
    async fn get_all(&self) -> Result<Vec<Package>>;
}
