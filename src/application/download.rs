//! Download use case - install named packages and add them to the mod list.

use anyhow::{Error, Result};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::credentials::CredentialSource;
use crate::fetch::ArtifactFetcher;
use crate::manifest::ManifestStore;
use crate::resolver::{Plan, PlannedDownload};
use crate::runtime::Runtime;

use super::transfer::{Transfer, TransferOutcome};

#[derive(Debug, Default)]
pub struct DownloadReport {
    pub downloaded: Vec<PlannedDownload>,
    pub failed: Vec<(String, Error)>,
    pub incompatible: Vec<String>,
    pub not_in_catalog: Vec<String>,
    pub cancelled: bool,
}

pub struct DownloadUseCase<'a, R: Runtime, K: Catalog, F: ArtifactFetcher, C: CredentialSource> {
    runtime: &'a R,
    catalog: &'a K,
    fetcher: &'a F,
    credentials: &'a C,
    config: &'a Config,
}

impl<'a, R, K, F, C> DownloadUseCase<'a, R, K, F, C>
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
    pub async fn execute(&self, names: &[String], assume_yes: bool) -> Result<DownloadReport> {
        let packages = self.catalog.get_packages(names).await?;
        let plan = Plan::for_download(names, &packages, &self.config.target);

        let mut report = DownloadReport {
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
                    let store = ManifestStore::new(self.runtime, &self.config.mods_dir);
                    let names: Vec<&str> = result.succeeded.iter().map(|d| d.name.as_str()).collect();
                    store.add(&names)?;
                }
                report.downloaded = result.succeeded;
                report.failed = result.failed;
            }
        }

        Ok(report)
    }
}
