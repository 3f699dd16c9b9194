//! Mod portal catalog implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::error::ParseError;
use crate::http::HttpClient;
use crate::version::Version;

use super::{Catalog, Package, Release};

/// Mod portal API response types (internal).
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct ModListResponse {
        #[serde(default)]
        pub results: Vec<Mod>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Mod {
        pub name: String,
        #[serde(default)]
        pub owner: String,
        #[serde(default)]
        pub title: String,
        #[serde(default)]
        pub summary: String,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub downloads_count: u64,
        #[serde(default)]
        pub releases: Vec<Release>,
    }

    #[derive(Deserialize, Debug)]
    pub struct Release {
        pub download_url: String,
        pub file_name: String,
        pub released_at: Option<String>,
        pub version: String,
        pub sha1: Option<String>,
        pub info_json: InfoJson,
    }

    #[derive(Deserialize, Debug)]
    pub struct InfoJson {
        pub factorio_version: String,
    }
}

/// Catalog backed by the `/api/mods` endpoint of the mod portal.
pub struct PortalCatalog {
    http_client: HttpClient,
    api_url: String,
}

impl PortalCatalog {
    pub fn new(http_client: HttpClient, api_url: &str) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn fetch(&self, query: &[(&str, &str)]) -> Result<Vec<Package>> {
        let url = format!("{}/api/mods", self.api_url);
        let response: api::ModListResponse = self
            .http_client
            .get_json_with_query(&url, query)
            .await
            .context("Failed to fetch mods from the catalog")?;

        debug!("Catalog returned {} mod(s)", response.results.len());

        response
            .results
            .into_iter()
            .map(|m| {
                let name = m.name.clone();
                Package::try_from(m)
                    .with_context(|| format!("Invalid release data in catalog for {}", name))
            })
            .collect()
    }
}

#[async_trait]
impl Catalog for PortalCatalog {
    #[tracing::instrument(skip(self))]
    async fn get_packages(&self, names: &[String]) -> Result<Vec<Package>> {
        if names.is_empty() {
            return Ok(vec![]);
        }

        let mut query = vec![("page_size", "max")];
        query.extend(names.iter().map(|n| ("namelist", n.as_str())));
        self.fetch(&query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Package>> {
        self.fetch(&[("page_size", "max")]).await
    }
}

impl TryFrom<api::Release> for Release {
    type Error = ParseError;

    fn try_from(r: api::Release) -> Result<Self, Self::Error> {
        Ok(Release {
            version: Version::parse(&r.version)?,
            target_version: Version::parse(&r.info_json.factorio_version)?,
            download_url: r.download_url,
            file_name: r.file_name,
            released_at: r.released_at,
            sha1: r.sha1,
        })
    }
}

impl TryFrom<api::Mod> for Package {
    type Error = ParseError;

    fn try_from(m: api::Mod) -> Result<Self, Self::Error> {
        let releases = m
            .releases
            .into_iter()
            .map(Release::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Package {
            name: m.name,
            owner: m.owner,
            title: m.title,
            summary: m.summary,
            category: m.category.unwrap_or_default(),
            downloads_count: m.downloads_count,
            releases,
        })
    }
}
