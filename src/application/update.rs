//! Update use case - bring every listed mod to the newest compatible release.
//!
//! This use case coordinates:
//! - Loading the mod list and attaching installed archives
//! - Fetching the listed packages from the catalog
//! - Planning and downloading upgrades
//! - Enabling the successfully updated entries

use anyhow::{Error, Result};
use log::debug;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::credentials::CredentialSource;
use crate::fetch::ArtifactFetcher;
use crate::manifest::{ManifestStore, find_archives};
use crate::resolver::{Plan, PlannedDownload};
use crate::runtime::Runtime;

use super::transfer::{Transfer, TransferOutcome};

#[derive(Debug, Default)]
pub struct UpdateReport {
    pub updated: Vec<PlannedDownload>,
    pub failed: Vec<(String, Error)>,
    pub up_to_date: Vec<String>,
    pub incompatible: Vec<String>,
    pub not_in_catalog: Vec<String>,
    /// The user declined the download prompt.
    pub cancelled: bool,
}

impl UpdateReport {
    /// True when nothing needed downloading.
    pub fn nothing_to_do(&self) -> bool {
        self.updated.is_empty() && self.failed.is_empty() && !self.cancelled
    }
}

pub struct UpdateUseCase<'a, R: Runtime, K: Catalog, F: ArtifactFetcher, C: CredentialSource> {
    runtime: &'a R,
    catalog: &'a K,
    fetcher: &'a F,
    credentials: &'a C,
    config: &'a Config,
}

impl<'a, R, K, F, C> UpdateUseCase<'a, R, K, F, C>
where
    R: Runtime,
    K: Catalog,
    F: ArtifactFetcher,
    C: CredentialSource,
{
    pub fn new(
        runtime: &'a R,
        catalog: &'a K,
        fetcher: &'a F,
        credentials: &'a C,
        config: &'a Config,
    ) -> Self {
        Self {
            runtime,
            catalog,
            fetcher,
            credentials,
            config,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, assume_yes: bool) -> Result<UpdateReport> {
        let store = ManifestStore::new(self.runtime, &self.config.mods_dir);
        let mut manifest = store.load()?;
        if manifest.is_empty() {
            debug!("Mod list is empty, nothing to update");
            return Ok(UpdateReport::default());
        }

        find_archives(self.runtime, &self.config.mods_dir, &mut manifest)?;

        let packages = self.catalog.get_packages(&manifest.names()).await?;
        let plan = Plan::for_update(&manifest, &packages, &self.config.target);

        let mut report = UpdateReport {
            up_to_date: plan.up_to_date,
            incompatible: plan.incompatible,
            not_in_catalog: plan.not_in_catalog,
            ..Default::default()
        };

        let transfer = Transfer::new(self.runtime, self.fetcher, self.credentials, assume_yes);
        match transfer.run(plan.downloads).await? {
            TransferOutcome::Nothing => {}
            TransferOutcome::Cancelled => report.cancelled = true,
            TransferOutcome::Finished(result) => {
                if !result.succeeded.is_empty() {
                    let names: Vec<&str> = result.succeeded.iter().map(|d| d.name.as_str()).collect();
                    store.add(&names)?;
                }
                report.updated = result.succeeded;
                report.failed = result.failed;
            }
        }

        Ok(report)
    }
}
