use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::{Authenticator, CredentialSource, Credentials};

pub const USERNAME_ENV: &str = "MODSYNC_USERNAME";
pub const TOKEN_ENV: &str = "MODSYNC_TOKEN";
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

const CACHE_MODE: u32 = 0o600;

/// Resolves credentials from the environment, then the cache, then an
/// interactive login.
pub struct LoginFlow<'a, R: Runtime, A: Authenticator> {
    runtime: &'a R,
    authenticator: A,
    cache_path: Option<PathBuf>,
}

impl<'a, R: Runtime, A: Authenticator> LoginFlow<'a, R, A> {
    pub fn new(runtime: &'a R, authenticator: A, cache_path: Option<PathBuf>) -> Self {
        Self {
            runtime,
            authenticator,
            cache_path,
        }
    }

    fn from_env(&self) -> Option<Credentials> {
        let username = self.runtime.env_var(USERNAME_ENV).ok()?;
        let token = self.runtime.env_var(TOKEN_ENV).ok()?;
        if username.is_empty() || token.is_empty() {
            return None;
        }
        debug!("Using credentials from {} and {}", USERNAME_ENV, TOKEN_ENV);
        Some(Credentials::new(username, token))
    }

    fn from_cache(&self, path: &Path) -> Option<Credentials> {
        if !self.runtime.exists(path) {
            return None;
        }

        let parsed = self
            .runtime
            .read_to_string(path)
            .and_then(|content| serde_json::from_str(&content).map_err(Into::into));

        match parsed {
            Ok(creds) => {
                debug!("Using cached credentials from {:?}", path);
                Some(creds)
            }
            Err(e) => {
                warn!("Ignoring unreadable credential cache {:?}: {}", path, e);
                None
            }
        }
    }

    fn write_cache(&self, path: &Path, creds: &Credentials) -> Result<()> {
        if let Some(parent) = path.parent() {
            self.runtime.create_dir_all(parent)?;
        }
        let content = serde_json::to_string(creds)?;
        self.runtime
            .write(path, content.as_bytes())
            .with_context(|| format!("Failed to write credential cache {:?}", path))?;
        self.runtime.set_permissions(path, CACHE_MODE)
    }

    async fn login(&self) -> Result<Credentials> {
        for attempt in 1..=MAX_LOGIN_ATTEMPTS {
            let username = self.runtime.prompt("Username")?;
            let password = self.runtime.prompt_password("Password")?;

            match self.authenticator.login(&username, &password).await {
                Ok(token) => {
                    info!("Logged in as {}", username);
                    return Ok(Credentials::new(username, token));
                }
                Err(e) => {
                    warn!("Login attempt {}/{} failed: {:#}", attempt, MAX_LOGIN_ATTEMPTS, e);
                }
            }
        }

        bail!("Maximum login attempts reached")
    }
}

#[async_trait]
impl<R: Runtime, A: Authenticator> CredentialSource for LoginFlow<'_, R, A> {
    #[tracing::instrument(skip(self))]
    async fn credentials(&self) -> Result<Credentials> {
        if let Some(creds) = self.from_env() {
            return Ok(creds);
        }

        if let Some(creds) = self.cache_path.as_deref().and_then(|p| self.from_cache(p)) {
            return Ok(creds);
        }

        let creds = self.login().await?;

        if let Some(path) = self.cache_path.as_deref() {
            if let Err(e) = self.write_cache(path, &creds) {
                warn!("Failed to cache credentials: {:#}", e);
            }
        }

        Ok(creds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MockAuthenticator;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use std::env::VarError;
    use tempfile::tempdir;

    fn no_env(runtime: &mut MockRuntime) {
        runtime
            .expect_env_var()
            .returning(|_| Err(VarError::NotPresent));
    }

    fn prompts(runtime: &mut MockRuntime, times: usize) {
        runtime
            .expect_prompt()
            .with(eq("Username"))
            .times(times)
            .returning(|_| Ok("engineer".to_string()));
        runtime
            .expect_prompt_password()
            .with(eq("Password"))
            .times(times)
            .returning(|_| Ok("hunter2".to_string()));
    }

    #[tokio::test]
    async fn test_environment_wins() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(USERNAME_ENV))
            .returning(|_| Ok("ci".to_string()));
        runtime
            .expect_env_var()
            .with(eq(TOKEN_ENV))
            .returning(|_| Ok("ci-token".to_string()));

        let mut auth = MockAuthenticator::new();
        auth.expect_login().never();

        let flow = LoginFlow::new(&runtime, auth, Some(PathBuf::from("/cfg/credentials.json")));
        let creds = flow.credentials().await.unwrap();

        assert_eq!(creds, Credentials::new("ci", "ci-token"));
    }

    #[tokio::test]
    async fn test_cached_credentials() {
        let mut runtime = MockRuntime::new();
        no_env(&mut runtime);
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok(r#"{"username": "engineer", "token": "cached"}"#.to_string()));

        let mut auth = MockAuthenticator::new();
        auth.expect_login().never();

        let flow = LoginFlow::new(&runtime, auth, Some(PathBuf::from("/cfg/credentials.json")));
        let creds = flow.credentials().await.unwrap();

        assert_eq!(creds.token, "cached");
    }

    #[tokio::test]
    async fn test_login_after_failures_and_cache_write() {
        let mut runtime = MockRuntime::new();
        no_env(&mut runtime);
        runtime.expect_exists().returning(|_| false);
        prompts(&mut runtime, 3);
        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("/cfg")))
            .returning(|_| Ok(()));
        runtime
            .expect_write()
            .withf(|path, contents| {
                path == Path::new("/cfg/credentials.json")
                    && !String::from_utf8_lossy(contents).contains("hunter2")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        runtime
            .expect_set_permissions()
            .with(eq(PathBuf::from("/cfg/credentials.json")), eq(0o600))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut auth = MockAuthenticator::new();
        let mut calls = 0;
        auth.expect_login().times(3).returning(move |_, _| {
            calls += 1;
            if calls < 3 {
                Err(anyhow::anyhow!("invalid password"))
            } else {
                Ok("fresh-token".to_string())
            }
        });

        let flow = LoginFlow::new(&runtime, auth, Some(PathBuf::from("/cfg/credentials.json")));
        let creds = flow.credentials().await.unwrap();

        assert_eq!(creds, Credentials::new("engineer", "fresh-token"));
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let mut runtime = MockRuntime::new();
        no_env(&mut runtime);
        prompts(&mut runtime, MAX_LOGIN_ATTEMPTS as usize);

        let mut auth = MockAuthenticator::new();
        auth.expect_login()
            .times(MAX_LOGIN_ATTEMPTS as usize)
            .returning(|_, _| Err(anyhow::anyhow!("invalid password")));

        let flow = LoginFlow::new(&runtime, auth, None);
        let err = flow.credentials().await.unwrap_err();

        assert_eq!(err.to_string(), "Maximum login attempts reached");
    }

    #[tokio::test]
    async fn test_cache_write_failure_is_not_fatal() {
        let mut runtime = MockRuntime::new();
        no_env(&mut runtime);
        runtime.expect_exists().returning(|_| false);
        prompts(&mut runtime, 1);
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime
            .expect_write()
            .returning(|_, _| Err(anyhow::anyhow!("read-only file system")));

        let mut auth = MockAuthenticator::new();
        auth.expect_login().returning(|_, _| Ok("token".to_string()));

        let flow = LoginFlow::new(&runtime, auth, Some(PathBuf::from("/cfg/credentials.json")));
        assert!(flow.credentials().await.is_ok());
    }

    #[tokio::test]
    async fn test_corrupt_cache_falls_back_to_login() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("modsync").join("credentials.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        // RealRuntime prompts on a terminal, so drive the login through the mock.
        let mut runtime = MockRuntime::new();
        no_env(&mut runtime);
        let real_path = path.clone();
        runtime
            .expect_exists()
            .returning(move |p| RealRuntime.exists(p));
        runtime
            .expect_read_to_string()
            .returning(move |p| RealRuntime.read_to_string(p));
        runtime
            .expect_create_dir_all()
            .returning(|p| RealRuntime.create_dir_all(p));
        runtime
            .expect_write()
            .returning(|p, c| RealRuntime.write(p, c));
        runtime
            .expect_set_permissions()
            .returning(|p, m| RealRuntime.set_permissions(p, m));
        prompts(&mut runtime, 1);

        let mut auth = MockAuthenticator::new();
        auth.expect_login().returning(|_, _| Ok("new-token".to_string()));

        let flow = LoginFlow::new(&runtime, auth, Some(path));
        let creds = flow.credentials().await.unwrap();
        assert_eq!(creds.token, "new-token");

        let cached: Credentials =
            serde_json::from_str(&std::fs::read_to_string(&real_path).unwrap()).unwrap();
        assert_eq!(cached, creds);
    }
}
