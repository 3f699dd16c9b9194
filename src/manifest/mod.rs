//! Local mod list management.
//!
//! [`Manifest`] is the in-memory working set used by resolution and
//! reconciliation. It never contains the reserved base entry; that entry is
//! handled entirely by [`ManifestStore`] at the load/save boundary.

mod matcher;
mod scanner;
mod store;

use serde::{Deserialize, Serialize};

use crate::error::NotFoundError;
use crate::version::Version;

pub use matcher::NameMatcher;
pub use scanner::find_archives;
pub use store::{BASE_MOD, MANIFEST_FILE_NAME, ManifestStore};

/// An installed archive discovered on disk. Never serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Archive {
    /// File name without extension, e.g. `flib_0.12.9`.
    pub stem: String,
    pub version: Version,
}

/// One entry of the mod list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LocalMod {
    pub name: String,
    pub enabled: bool,
    #[serde(skip)]
    pub archive: Option<Archive>,
}

impl LocalMod {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
            archive: None,
        }
    }
}

/// The mod list, keyed by unique name, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Manifest {
    mods: Vec<LocalMod>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a manifest from entries, keeping the first occurrence of each name.
    pub fn from_mods(mods: impl IntoIterator<Item = LocalMod>) -> Self {
        let mut manifest = Self::new();
        for m in mods {
            if manifest.get(&m.name).is_none() {
                manifest.mods.push(m);
            }
        }
        manifest
    }

    pub fn mods(&self) -> &[LocalMod] {
        &self.mods
    }

    pub fn get(&self, name: &str) -> Option<&LocalMod> {
        self.mods.iter().find(|m| m.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LocalMod> {
        self.mods.iter_mut().find(|m| m.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.mods.iter().map(|m| m.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    /// Enable each named mod, appending the ones that are not listed yet.
    pub fn add<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            let name = name.as_ref();
            match self.get_mut(name) {
                Some(existing) => existing.enabled = true,
                None => self.mods.push(LocalMod::new(name, true)),
            }
        }
    }

    /// Set `enabled` on every mod matched by any of `matchers`.
    ///
    /// All matchers are checked before anything changes: if one matches
    /// nothing, the manifest is left untouched. Returns the number of
    /// entries matched.
    pub fn set_status(
        &mut self,
        enabled: bool,
        matchers: &[NameMatcher],
    ) -> Result<usize, NotFoundError> {
        if let Some(unmatched) = matchers
            .iter()
            .find(|matcher| !self.mods.iter().any(|m| matcher.matches(&m.name)))
        {
            return Err(NotFoundError {
                pattern: unmatched.to_string(),
            });
        }

        let mut count = 0;
        for m in self.mods.iter_mut() {
            if matchers.iter().any(|matcher| matcher.matches(&m.name)) {
                m.enabled = enabled;
                count += 1;
            }
        }
        Ok(count)
    }
}
