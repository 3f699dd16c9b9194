//! Credentials for the authenticated download endpoint.
//!
//! A [`Credentials`] pair is a username and an API token. The password is only
//! ever held long enough to exchange it for a token and is never stored.

mod auth;
mod flow;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use auth::{Authenticator, HttpAuthenticator};
pub use flow::{LoginFlow, MAX_LOGIN_ATTEMPTS, TOKEN_ENV, USERNAME_ENV};

#[cfg(test)]
pub use auth::MockAuthenticator;

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Supplies credentials on demand.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn credentials(&self) -> Result<Credentials>;
}
