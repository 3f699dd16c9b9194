//! Discovery of installed archives in the mods directory.

use anyhow::{Context, Result};
use log::{debug, warn};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use crate::runtime::Runtime;
use crate::version::Version;

use super::{Archive, Manifest};

/// `<name>_<digits>(.<digits>)+`, matched against the file name minus `.zip`.
static ARCHIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)_(\d+(?:\.\d+)+)$").expect("valid archive regex"));

/// Attach the installed [`Archive`] to every manifest entry that has one.
///
/// Entries without a matching file keep `archive: None`. A file whose version
/// cannot be parsed is logged and skipped.
#[tracing::instrument(skip(runtime, manifest))]
pub fn find_archives<R: Runtime>(runtime: &R, dir: &Path, manifest: &mut Manifest) -> Result<()> {
    let entries = runtime
        .read_dir(dir)
        .with_context(|| format!("Failed to scan mods directory {:?}", dir))?;

    let index = index_archives(entries.iter().filter_map(|p| p.file_name()?.to_str()));

    for name in manifest.names() {
        let Some(archive) = index.get(name.as_str()) else {
            debug!("No archive found for {}", name);
            continue;
        };
        if let Some(local) = manifest.get_mut(&name) {
            debug!("Found {} for {}", archive.stem, name);
            local.archive = Some(archive.clone());
        }
    }

    Ok(())
}

/// Build a name-keyed map of archives, keeping the highest version per name.
fn index_archives<'a>(file_names: impl Iterator<Item = &'a str>) -> HashMap<&'a str, Archive> {
    let mut index: HashMap<&str, Archive> = HashMap::new();

    for file_name in file_names {
        let stem = file_name.strip_suffix(".zip").unwrap_or(file_name);
        let Some(caps) = ARCHIVE_RE.captures(stem) else {
            continue;
        };
        let (Some(name), Some(raw_version)) = (caps.get(1), caps.get(2)) else {
            continue;
        };

        let version = match Version::parse(raw_version.as_str()) {
            Ok(v) => v,
            Err(e) => {
                warn!("Ignoring archive {}: {}", file_name, e);
                continue;
            }
        };

        let newer = index
            .get(name.as_str())
            .is_none_or(|existing| version.compare(&existing.version).is_gt());
        if newer {
            let archive = Archive {
                stem: stem.to_string(),
                version,
            };
            index.insert(name.as_str(), archive);
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::LocalMod;
    use crate::runtime::{MockRuntime, RealRuntime};
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn manifest(names: &[&str]) -> Manifest {
        Manifest::from_mods(names.iter().map(|n| LocalMod::new(*n, true)))
    }

    fn mock_listing(files: &'static [&'static str]) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime.expect_read_dir().returning(move |dir| {
            Ok(files.iter().map(|f| dir.join(f)).collect::<Vec<PathBuf>>())
        });
        runtime
    }

    #[test]
    fn test_attaches_archive_version() {
        let runtime = mock_listing(&["flib_0.12.9.zip", "mod-list.json", "helmod_1.2.zip"]);
        let mut m = manifest(&["flib", "helmod", "missing"]);

        find_archives(&runtime, Path::new("/mods"), &mut m).unwrap();

        let flib = m.get("flib").unwrap().archive.as_ref().unwrap();
        assert_eq!(flib.stem, "flib_0.12.9");
        assert_eq!(flib.version, Version::new(0, 12, 9));

        let helmod = m.get("helmod").unwrap().archive.as_ref().unwrap();
        assert_eq!(helmod.version, Version::new(1, 2, 0));

        assert!(m.get("missing").unwrap().archive.is_none());
    }

    #[test]
    fn test_name_must_match_whole_prefix() {
        let runtime = mock_listing(&["flib-extra_1.0.0.zip", "my_flib_2.0.0.zip"]);
        let mut m = manifest(&["flib"]);

        find_archives(&runtime, Path::new("/mods"), &mut m).unwrap();

        assert!(m.get("flib").unwrap().archive.is_none());
    }

    #[test]
    fn test_names_with_underscores() {
        let runtime = mock_listing(&["even_distribution_1.0.10.zip", "distribution_9.0.0.zip"]);
        let mut m = manifest(&["even_distribution", "distribution"]);

        find_archives(&runtime, Path::new("/mods"), &mut m).unwrap();

        assert_eq!(
            m.get("even_distribution").unwrap().archive.as_ref().unwrap().version,
            Version::new(1, 0, 10)
        );
        assert_eq!(
            m.get("distribution").unwrap().archive.as_ref().unwrap().version,
            Version::new(9, 0, 0)
        );
    }

    #[test]
    fn test_highest_version_wins() {
        let runtime = mock_listing(&["flib_0.9.0.zip", "flib_0.12.1.zip", "flib_0.10.0.zip"]);
        let mut m = manifest(&["flib"]);

        find_archives(&runtime, Path::new("/mods"), &mut m).unwrap();

        assert_eq!(
            m.get("flib").unwrap().archive.as_ref().unwrap().version,
            Version::new(0, 12, 1)
        );
    }

    #[test_log::test]
    fn test_unparsable_version_is_skipped() {
        let runtime = mock_listing(&["flib_99999999999999999999.0.zip", "helmod_1.0.0.zip"]);
        let mut m = manifest(&["flib", "helmod"]);

        find_archives(&runtime, Path::new("/mods"), &mut m).unwrap();

        assert!(m.get("flib").unwrap().archive.is_none());
        assert!(m.get("helmod").unwrap().archive.is_some());
    }

    #[test]
    fn test_unreadable_directory_is_error() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_dir()
            .returning(|_| Err(anyhow::anyhow!("permission denied")));

        let err = find_archives(&runtime, Path::new("/mods"), &mut manifest(&["flib"])).unwrap_err();
        assert!(err.to_string().contains("Failed to scan mods directory"));
    }

    #[test]
    fn test_scan_real_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("flib_0.1.0.zip"), b"zip").unwrap();
        std::fs::create_dir(dir.path().join("helmod_2.0.1")).unwrap();

        let mut m = manifest(&["flib", "helmod"]);
        find_archives(&RealRuntime, dir.path(), &mut m).unwrap();

        assert_eq!(
            m.get("flib").unwrap().archive.as_ref().unwrap().version,
            Version::new(0, 1, 0)
        );
        assert_eq!(
            m.get("helmod").unwrap().archive.as_ref().unwrap().stem,
            "helmod_2.0.1"
        );
    }
}
