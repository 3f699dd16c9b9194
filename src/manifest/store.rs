//! Persistence of the mod list (`mod-list.json`).

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::runtime::Runtime;

use super::{LocalMod, Manifest, NameMatcher};

pub const MANIFEST_FILE_NAME: &str = "mod-list.json";

/// The game's built-in content. Always present on disk, never in a [`Manifest`].
pub const BASE_MOD: &str = "base";

#[derive(Serialize, Deserialize, Debug, Default)]
struct ManifestFile {
    #[serde(default)]
    mods: Vec<LocalMod>,
}

/// Reads and writes the mod list in a mods directory.
///
/// Every mutating operation is a full read-modify-write of the file.
pub struct ManifestStore<'a, R: Runtime> {
    runtime: &'a R,
    dir: PathBuf,
}

impl<'a, R: Runtime> ManifestStore<'a, R> {
    pub fn new(runtime: &'a R, dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            dir: dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE_NAME)
    }

    /// Load the mod list. A missing file yields an empty manifest.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Result<Manifest> {
        let path = self.path();
        if !self.runtime.exists(&path) {
            debug!("{:?} does not exist, starting with an empty mod list", path);
            return Ok(Manifest::new());
        }

        let content = self
            .runtime
            .read_to_string(&path)
            .with_context(|| format!("Failed to read mod list {:?}", path))?;
        let file: ManifestFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse mod list {:?}", path))?;

        Ok(Manifest::from_mods(
            file.mods.into_iter().filter(|m| m.name != BASE_MOD),
        ))
    }

    /// Write the mod list, appending the base entry.
    #[tracing::instrument(skip(self, manifest))]
    pub fn save(&self, manifest: &Manifest) -> Result<()> {
        if !self.runtime.exists(&self.dir) {
            self.runtime.create_dir_all(&self.dir)?;
        }

        let mut mods: Vec<LocalMod> = manifest.mods().to_vec();
        mods.push(LocalMod::new(BASE_MOD, true));

        let content = serde_json::to_string_pretty(&ManifestFile { mods })?;
        let path = self.path();
        self.runtime
            .write(&path, content.as_bytes())
            .with_context(|| format!("Failed to save mod list to {:?}", path))
    }

    /// Add (or re-enable) the named mods and persist.
    pub fn add<S: AsRef<str>>(&self, names: &[S]) -> Result<Manifest> {
        let mut manifest = self.load()?;
        manifest.add(names);
        self.save(&manifest)?;
        Ok(manifest)
    }

    /// Enable or disable every mod matched by `matchers` and persist.
    ///
    /// Nothing is written if any matcher matches no entry.
    pub fn set_status(&self, enabled: bool, matchers: &[NameMatcher]) -> Result<usize> {
        let mut manifest = self.load()?;
        let count = manifest.set_status(enabled, matchers)?;
        self.save(&manifest)?;
        Ok(count)
    }
}
