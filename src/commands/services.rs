//! Service factory for building command dependencies.
//!
//! Services are built from configuration values but are not part of the
//! configuration itself.

use anyhow::Result;

use crate::{
    catalog::PortalCatalog,
    config::{Config, USER_AGENT},
    credentials::{HttpAuthenticator, LoginFlow},
    fetch::HttpFetcher,
    http::HttpClient,
    runtime::Runtime,
};

/// Container for the network-facing services of one run.
pub struct Services {
    pub http_client: HttpClient,
    pub catalog: PortalCatalog,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client = HttpClient::with_user_agent(USER_AGENT)?;
        let catalog = PortalCatalog::new(http_client.clone(), &config.api_url);
        Ok(Self {
            http_client,
            catalog,
        })
    }

    pub fn fetcher<'a, R: Runtime>(&self, runtime: &'a R, config: &Config) -> HttpFetcher<'a, R> {
        HttpFetcher::new(
            runtime,
            self.http_client.clone(),
            &config.api_url,
            &config.mods_dir,
        )
    }

    pub fn login_flow<'a, R: Runtime>(
        &self,
        runtime: &'a R,
        config: &Config,
    ) -> LoginFlow<'a, R, HttpAuthenticator> {
        let authenticator = HttpAuthenticator::new(self.http_client.clone(), &config.auth_url);
        LoginFlow::new(runtime, authenticator, config.credentials_path.clone())
    }
}
