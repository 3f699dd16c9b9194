use anyhow::Result;
use log::debug;

use crate::application::SearchQuery;
use crate::catalog::{Catalog, Package};
use crate::config::Config;

use super::services::Services;

const RESULT_SEPARATOR: &str = "--------------------";

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub pattern: Option<String>,
    pub owner: Option<String>,
    pub tag: Option<String>,
    pub name_only: bool,
}

/// Search the whole catalog
#[tracing::instrument(skip(config, options))]
pub async fn search(config: &Config, options: SearchOptions) -> Result<()> {
    let services = Services::from_config(config)?;
    run_search(&services.catalog, options).await
}

async fn run_search<K: Catalog>(catalog: &K, options: SearchOptions) -> Result<()> {
    let query = SearchQuery::new(
        options.pattern.as_deref(),
        options.owner.as_deref(),
        options.tag.as_deref(),
    )?;

    let packages = catalog.get_all().await?;
    debug!("Searching {} package(s)", packages.len());

    let matches = query.filter(&packages);
    print!("{}", render_matches(&matches, options.name_only));
    Ok(())
}

fn render_matches(matches: &[&Package], name_only: bool) -> String {
    if name_only {
        if matches.is_empty() {
            return String::new();
        }
        let names: Vec<&str> = matches.iter().map(|p| p.name.as_str()).collect();
        return format!("{}\n", names.join(" "));
    }

    let mut out = String::new();
    for package in matches {
        out.push_str(&format!("{}\n{}\n", package, RESULT_SEPARATOR));
    }
    out.push_str(&format!("{} matches\n", matches.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCatalog;

    fn package(name: &str, owner: &str) -> Package {
        Package {
            name: name.into(),
            title: name.to_uppercase(),
            owner: owner.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_name_only() {
        let a = package("flib", "raiguard");
        let b = package("RecipeBook", "raiguard");
        assert_eq!(render_matches(&[&a, &b], true), "flib RecipeBook\n");
        assert_eq!(render_matches(&[], true), "");
    }

    #[test]
    fn test_render_full() {
        let a = package("flib", "raiguard");
        let out = render_matches(&[&a], false);
        assert!(out.starts_with("FLIB\n\tName: flib\n"));
        assert!(out.contains(&format!("\n{}\n", RESULT_SEPARATOR)));
        assert!(out.ends_with("1 matches\n"));
        assert_eq!(render_matches(&[], false), "0 matches\n");
    }

    #[tokio::test]
    async fn test_run_search_uses_whole_catalog() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_get_all()
            .times(1)
            .returning(|| Ok(vec![package("flib", "raiguard")]));

        let options = SearchOptions {
            owner: Some("RAIGUARD".into()),
            ..Default::default()
        };
        assert!(run_search(&catalog, options).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_search_without_pattern_skips_catalog() {
        let mut catalog = MockCatalog::new();
        catalog.expect_get_all().never();

        assert!(run_search(&catalog, SearchOptions::default()).await.is_err());
    }
}
