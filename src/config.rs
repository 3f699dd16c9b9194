//! Run configuration.
//!
//! Everything a command needs to know about its environment is folded into a
//! single immutable [`Config`] before any work starts.

use anyhow::{Context, Result};
use log::debug;
use std::path::PathBuf;

use crate::runtime::Runtime;
use crate::version::Version;

pub const DEFAULT_API_URL: &str = "https://mods.factorio.com";
pub const DEFAULT_AUTH_URL: &str = "https://auth.factorio.com";
pub const USER_AGENT: &str = concat!("modsync/", env!("MODSYNC_VERSION"));

const APP_DIR: &str = "modsync";
const CREDENTIALS_FILE: &str = "credentials.json";

/// Raw options as supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub mods_dir: PathBuf,
    pub factorio: Option<String>,
    pub api_url: Option<String>,
    pub auth_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding `mod-list.json` and the installed archives.
    pub mods_dir: PathBuf,
    /// Game version releases must target. [`Version::ANY`] accepts all.
    pub target: Version,
    pub api_url: String,
    pub auth_url: String,
    /// Where a successful login is cached. `None` disables the cache.
    pub credentials_path: Option<PathBuf>,
}

impl Config {
    pub fn load<R: Runtime>(runtime: &R, options: ConfigOptions) -> Result<Self> {
        let target = parse_target(options.factorio.as_deref())?;
        let credentials_path = runtime
            .config_dir()
            .map(|dir| dir.join(APP_DIR).join(CREDENTIALS_FILE));

        let config = Self {
            mods_dir: options.mods_dir,
            target,
            api_url: options
                .api_url
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: options
                .auth_url
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            credentials_path,
        };

        debug!("Using {:?}", config);
        Ok(config)
    }

    #[cfg(test)]
    pub fn for_test(mods_dir: impl Into<PathBuf>, target: Version) -> Self {
        Self {
            mods_dir: mods_dir.into(),
            target,
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            credentials_path: None,
        }
    }
}

/// Parse the target game version. Absent, `*` and `any` mean any version.
pub fn parse_target(text: Option<&str>) -> Result<Version> {
    match text.map(str::trim) {
        None | Some("") | Some("*") => Ok(Version::ANY),
        Some(s) if s.eq_ignore_ascii_case("any") => Ok(Version::ANY),
        Some(s) => Version::parse(s).with_context(|| format!("Invalid game version {:?}", s)),
    }
}
