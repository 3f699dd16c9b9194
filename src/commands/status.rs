use anyhow::Result;

use crate::config::Config;
use crate::manifest::{ManifestStore, NameMatcher};
use crate::runtime::Runtime;

/// Enable or disable every mod matching `patterns`
///
/// Patterns are regular expressions unless `exact` is set. Nothing is written
/// if any pattern matches no mod.
#[tracing::instrument(skip(runtime, config))]
pub fn set_status<R: Runtime>(
    runtime: &R,
    config: &Config,
    enabled: bool,
    patterns: &[String],
    exact: bool,
) -> Result<()> {
    let matchers = NameMatcher::parse_all(patterns, exact)?;
    let count = ManifestStore::new(runtime, &config.mods_dir).set_status(enabled, &matchers)?;

    let action = if enabled { "Enabled" } else { "Disabled" };
    println!("{} {} mod(s).", action, count);
    Ok(())
}
