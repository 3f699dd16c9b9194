//! Joining the local mod list with the catalog.

use log::debug;
use std::collections::{HashMap, HashSet};

use crate::catalog::{Package, Release};
use crate::manifest::Manifest;
use crate::version::Version;

use super::{Resolution, find_compatible, resolve};

/// A release chosen for download.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDownload {
    pub name: String,
    pub release: Release,
    /// Installed version being replaced, if any.
    pub current: Option<Version>,
}

/// What a run will download, and why everything else is left alone.
#[derive(Debug, Default, PartialEq)]
pub struct Plan {
    pub downloads: Vec<PlannedDownload>,
    pub up_to_date: Vec<String>,
    pub incompatible: Vec<String>,
    pub not_in_catalog: Vec<String>,
}

impl Plan {
    /// Plan an update of every entry in `manifest`.
    ///
    /// Archives must already be attached (see `find_archives`).
    pub fn for_update(manifest: &Manifest, packages: &[Package], target: &Version) -> Self {
        let by_name = index(packages);
        let mut plan = Plan::default();

        for local in manifest.mods() {
            let Some(package) = by_name.get(local.name.as_str()) else {
                plan.not_in_catalog.push(local.name.clone());
                continue;
            };

            let current = local.archive.as_ref().map(|a| a.version);
            match resolve(&package.releases, target, current.as_ref()) {
                Resolution::Upgrade(release) => {
                    debug!("{}: {:?} -> {}", local.name, current, release.version);
                    plan.downloads.push(PlannedDownload {
                        name: local.name.clone(),
                        release: release.clone(),
                        current,
                    });
                }
                Resolution::UpToDate => plan.up_to_date.push(local.name.clone()),
                Resolution::NoCompatibleRelease => plan.incompatible.push(local.name.clone()),
            }
        }

        plan
    }

    /// Plan a fresh download of the newest compatible release of each name.
    pub fn for_download<S: AsRef<str>>(names: &[S], packages: &[Package], target: &Version) -> Self {
        let by_name = index(packages);
        let mut plan = Plan::default();
        let mut seen = HashSet::new();

        for name in names {
            let name = name.as_ref();
            if !seen.insert(name) {
                continue;
            }

            let Some(package) = by_name.get(name) else {
                plan.not_in_catalog.push(name.to_string());
                continue;
            };

            match find_compatible(&package.releases, target) {
                Some(release) => plan.downloads.push(PlannedDownload {
                    name: name.to_string(),
                    release: release.clone(),
                    current: None,
                }),
                None => plan.incompatible.push(name.to_string()),
            }
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.downloads.is_empty()
    }
}

fn index(packages: &[Package]) -> HashMap<&str, &Package> {
    packages.iter().map(|p| (p.name.as_str(), p)).collect()
}
