//! Artifact downloads into the mods directory.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::catalog::Release;
use crate::credentials::Credentials;
use crate::http::HttpClient;
use crate::runtime::Runtime;

/// Retrieves a release archive. Returns the number of bytes written.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch(&self, release: &Release, credentials: &Credentials) -> Result<u64>;
}

/// Downloads `<base-url><download_url>` to `<dir>/<file_name>`.
///
/// The body is written to a `.part` file first and renamed once complete, so
/// an interrupted download never looks like an installed archive.
pub struct HttpFetcher<'a, R: Runtime> {
    runtime: &'a R,
    http_client: HttpClient,
    base_url: String,
    dir: PathBuf,
}

impl<'a, R: Runtime> HttpFetcher<'a, R> {
    pub fn new(runtime: &'a R, http_client: HttpClient, base_url: &str, dir: &Path) -> Self {
        Self {
            runtime,
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            dir: dir.to_path_buf(),
        }
    }

    fn cleanup(&self, part: &Path) {
        if self.runtime.exists(part) {
            if let Err(e) = self.runtime.remove_file(part) {
                warn!("Failed to remove partial download {:?}: {}", part, e);
            }
        }
    }
}

fn validate_file_name(file_name: &str) -> Result<()> {
    if file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\'])
    {
        bail!("Refusing to write release with unsafe file name {:?}", file_name);
    }
    Ok(())
}

#[async_trait]
impl<R: Runtime> ArtifactFetcher for HttpFetcher<'_, R> {
    #[tracing::instrument(skip(self, release, credentials), fields(file = %release.file_name))]
    async fn fetch(&self, release: &Release, credentials: &Credentials) -> Result<u64> {
        validate_file_name(&release.file_name)?;

        let url = format!("{}{}", self.base_url, release.download_url);
        let target = self.dir.join(&release.file_name);
        let part = self.dir.join(format!("{}.part", release.file_name));

        debug!("Fetching {} into {:?}", release.file_name, target);

        if !self.runtime.exists(&self.dir) {
            self.runtime
                .create_dir_all(&self.dir)
                .with_context(|| format!("Failed to create mods directory {:?}", self.dir))?;
        }

        let query = [
            ("username", credentials.username.as_str()),
            ("token", credentials.token.as_str()),
        ];
        let result = self
            .http_client
            .download_file(&url, &query, || self.runtime.create_file(&part))
            .await;

        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                self.cleanup(&part);
                return Err(e.context(format!("Failed to download {}", release.file_name)));
            }
        };

        if let Err(e) = self.runtime.rename(&part, &target) {
            self.cleanup(&part);
            return Err(e.context(format!("Failed to move {} into place", release.file_name)));
        }

        Ok(bytes)
    }
}
