use anyhow::Result;
use log::debug;

use crate::config::Config;
use crate::manifest::{LocalMod, ManifestStore};
use crate::runtime::Runtime;

/// Which entries `list` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    Enabled,
    Disabled,
}

/// Print the mod list
#[tracing::instrument(skip(runtime, config))]
pub fn list<R: Runtime>(runtime: &R, config: &Config, filter: ListFilter) -> Result<()> {
    let manifest = ManifestStore::new(runtime, &config.mods_dir).load()?;
    debug!("Loaded {} mod(s)", manifest.len());

    match filter {
        ListFilter::All if manifest.is_empty() => println!("No mods in the mod list."),
        ListFilter::All => print!("{}", render_table(manifest.mods())),
        ListFilter::Enabled | ListFilter::Disabled => {
            let wanted = filter == ListFilter::Enabled;
            for m in manifest.mods().iter().filter(|m| m.enabled == wanted) {
                println!("{}", m.name);
            }
        }
    }

    Ok(())
}

/// Bordered two-column table of names and enabled flags.
pub(crate) fn render_table(mods: &[LocalMod]) -> String {
    let width = mods
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());
    let border = format!("|{}|\n", "-".repeat(width + 12));

    let mut out = border.clone();
    out.push_str(&format!("| {:<width$} | Enabled |\n", "Name"));
    out.push_str(&border);
    for m in mods {
        out.push_str(&format!("| {:<width$} | {:<7} |\n", m.name, m.enabled));
    }
    out.push_str(&border);
    out
}
