use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::http::HttpClient;

/// Exchanges a username and password for an API token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<String>;
}

/// Login against `<auth-url>/api-login`.
pub struct HttpAuthenticator {
    http_client: HttpClient,
    auth_url: String,
}

impl HttpAuthenticator {
    pub fn new(http_client: HttpClient, auth_url: &str) -> Self {
        Self {
            http_client,
            auth_url: auth_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    #[tracing::instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &str) -> Result<String> {
        let url = format!("{}/api-login", self.auth_url);
        let tokens: Vec<String> = self
            .http_client
            .post_form(&url, &[("username", username), ("password", password)])
            .await
            .context("Login request failed")?;

        debug!("Login succeeded for {}", username);

        tokens
            .into_iter()
            .next()
            .context("Login response did not contain a token")
    }
}
