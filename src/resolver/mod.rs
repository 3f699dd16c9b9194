//! Release selection.
//!
//! [`find_release`] is the single rule everything else builds on: scan the
//! releases newest first and take the first one built for the target that is
//! strictly newer than what is installed.

mod plan;

use crate::catalog::Release;
use crate::version::Version;

pub use plan::{Plan, PlannedDownload};

/// Outcome of resolving one package against the target version.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// This release should be installed.
    Upgrade(&'a Release),
    /// A compatible release exists but nothing newer than the installed archive.
    UpToDate,
    /// No release targets the requested version.
    NoCompatibleRelease,
}

/// Newest release targeting `target` that is newer than `current`, if any.
///
/// `releases` must be in ascending version order, as delivered by the catalog.
pub fn find_release<'a>(
    releases: &'a [Release],
    target: &Version,
    current: Option<&Version>,
) -> Option<&'a Release> {
    releases.iter().rev().find(|release| {
        release.target_version.matches(target)
            && current.is_none_or(|current| release.version.compare(current).is_gt())
    })
}

/// Newest release targeting `target`, regardless of what is installed.
pub fn find_compatible<'a>(releases: &'a [Release], target: &Version) -> Option<&'a Release> {
    find_release(releases, target, None)
}

/// Like [`find_release`], but tells "up to date" and "incompatible" apart.
pub fn resolve<'a>(
    releases: &'a [Release],
    target: &Version,
    current: Option<&Version>,
) -> Resolution<'a> {
    match find_release(releases, target, current) {
        Some(release) => Resolution::Upgrade(release),
        None if find_compatible(releases, target).is_some() => Resolution::UpToDate,
        None => Resolution::NoCompatibleRelease,
    }
}
