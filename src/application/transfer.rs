//! Confirm, authenticate and download a set of planned releases.

use anyhow::{Error, Result};
use futures_util::stream::{self, StreamExt};
use log::{info, warn};

use crate::credentials::CredentialSource;
use crate::fetch::ArtifactFetcher;
use crate::resolver::PlannedDownload;
use crate::runtime::Runtime;

/// Number of archives fetched at the same time.
pub const MAX_CONCURRENT_DOWNLOADS: usize = 4;

#[derive(Debug, Default)]
pub struct TransferResult {
    pub succeeded: Vec<PlannedDownload>,
    pub failed: Vec<(String, Error)>,
}

#[derive(Debug)]
pub enum TransferOutcome {
    /// The download set was empty.
    Nothing,
    /// The user declined the confirmation prompt.
    Cancelled,
    Finished(TransferResult),
}

pub struct Transfer<'a, R: Runtime, F: ArtifactFetcher, C: CredentialSource> {
    runtime: &'a R,
    fetcher: &'a F,
    credentials: &'a C,
    assume_yes: bool,
}

impl<'a, R: Runtime, F: ArtifactFetcher, C: CredentialSource> Transfer<'a, R, F, C> {
    pub fn new(runtime: &'a R, fetcher: &'a F, credentials: &'a C, assume_yes: bool) -> Self {
        Self {
            runtime,
            fetcher,
            credentials,
            assume_yes,
        }
    }

    /// Download every entry of `downloads`.
    ///
    /// A failed download is recorded and never stops the others. Credentials
    /// are only requested once the user has agreed to go ahead.
    #[tracing::instrument(skip(self, downloads))]
    pub async fn run(&self, downloads: Vec<PlannedDownload>) -> Result<TransferOutcome> {
        if downloads.is_empty() {
            return Ok(TransferOutcome::Nothing);
        }

        let files: Vec<&str> = downloads
            .iter()
            .map(|d| d.release.file_name.as_str())
            .collect();
        println!("Downloads ({}): {}", downloads.len(), files.join(" "));

        if !self.assume_yes && !self.runtime.confirm("Continue?")? {
            return Ok(TransferOutcome::Cancelled);
        }

        let credentials = self.credentials.credentials().await?;

        let results: Vec<(PlannedDownload, Result<u64>)> = stream::iter(downloads)
            .map(|download| {
                let credentials = &credentials;
                async move {
                    let result = self.fetcher.fetch(&download.release, credentials).await;
                    (download, result)
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DOWNLOADS)
            .collect()
            .await;

        let mut outcome = TransferResult::default();
        for (download, result) in results {
            match result {
                Ok(bytes) => {
                    info!("Downloaded {} ({} bytes)", download.release.file_name, bytes);
                    outcome.succeeded.push(download);
                }
                Err(e) => {
                    warn!("Failed to download {}: {:#}", download.name, e);
                    outcome.failed.push((download.name.clone(), e));
                }
            }
        }

        // buffer_unordered completes in any order
        outcome.succeeded.sort_by(|a, b| a.name.cmp(&b.name));
        outcome.failed.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(TransferOutcome::Finished(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{Credentials, MockCredentialSource};
    use crate::fetch::MockArtifactFetcher;
    use crate::resolver::tests::release;
    use crate::runtime::MockRuntime;

    fn planned(name: &str, version: &str) -> PlannedDownload {
        let mut release = release(version, "0.18");
        release.file_name = format!("{}_{}.zip", name, version);
        PlannedDownload {
            name: name.to_string(),
            release,
            current: None,
        }
    }

    fn credentials_once() -> MockCredentialSource {
        let mut source = MockCredentialSource::new();
        source
            .expect_credentials()
            .times(1)
            .returning(|| Ok(Credentials::new("engineer", "tok")));
        source
    }

    #[tokio::test]
    async fn test_empty_set_does_nothing() {
        let runtime = MockRuntime::new();
        let fetcher = MockArtifactFetcher::new();
        let mut source = MockCredentialSource::new();
        source.expect_credentials().never();

        let transfer = Transfer::new(&runtime, &fetcher, &source, false);
        let outcome = transfer.run(vec![]).await.unwrap();

        assert!(matches!(outcome, TransferOutcome::Nothing));
    }

    #[tokio::test]
    async fn test_declined_confirmation() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_confirm()
            .with(mockall::predicate::eq("Continue?"))
            .returning(|_| Ok(false));
        let mut fetcher = MockArtifactFetcher::new();
        fetcher.expect_fetch().never();
        let mut source = MockCredentialSource::new();
        source.expect_credentials().never();

        let transfer = Transfer::new(&runtime, &fetcher, &source, false);
        let outcome = transfer.run(vec![planned("flib", "1.0.0")]).await.unwrap();

        assert!(matches!(outcome, TransferOutcome::Cancelled));
    }

    #[test_log::test(tokio::test)]
    async fn test_partial_failure_continues() {
        let runtime = MockRuntime::new();
        let mut fetcher = MockArtifactFetcher::new();
        fetcher.expect_fetch().times(3).returning(|release, _| {
            if release.file_name.starts_with("broken") {
                Err(anyhow::anyhow!("HTTP 500"))
            } else {
                Ok(42)
            }
        });
        let source = credentials_once();

        let transfer = Transfer::new(&runtime, &fetcher, &source, true);
        let outcome = transfer
            .run(vec![
                planned("helmod", "1.0.0"),
                planned("broken", "0.1.0"),
                planned("flib", "1.0.0"),
            ])
            .await
            .unwrap();

        let TransferOutcome::Finished(result) = outcome else {
            panic!("expected finished transfer");
        };
        let succeeded: Vec<_> = result.succeeded.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(succeeded, vec!["flib", "helmod"]);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].0, "broken");
    }

    #[tokio::test]
    async fn test_credentials_failure_aborts() {
        let runtime = MockRuntime::new();
        let mut fetcher = MockArtifactFetcher::new();
        fetcher.expect_fetch().never();
        let mut source = MockCredentialSource::new();
        source
            .expect_credentials()
            .returning(|| Err(anyhow::anyhow!("Maximum login attempts reached")));

        let transfer = Transfer::new(&runtime, &fetcher, &source, true);
        let err = transfer
            .run(vec![planned("flib", "1.0.0")])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Maximum login attempts"));
    }
}
