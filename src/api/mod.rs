use crate::config::AppConfig;
use crate::internal::models::{PageDescriptor, fallback_manifest};
use crate::utils::url::join_url;
use anyhow::{Context, Result, bail};
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde_json::Value;
use strum_macros::Display;

/// Where the descriptors of a [`LoadedManifest`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ManifestSource {
    #[strum(to_string = "remote")]
    Remote,
    /// Remote retrieval failed; `reason` is the rendered error chain.
    #[strum(to_string = "fallback")]
    Fallback { reason: String },
}

/// Manifest plus provenance. Always usable: a failed fetch still carries the
/// built-in catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedManifest {
    pub pages: Vec<PageDescriptor>,
    pub source: ManifestSource,
}

impl LoadedManifest {
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            pages: fallback_manifest(),
            source: ManifestSource::Fallback {
                reason: reason.into(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ManifestSource::Fallback { .. })
    }
}

/// Fetches `pages.json` over HTTP.
///
/// Uses an async `reqwest::Client`; requests carry no-cache headers so an
/// intermediate cache never serves a stale catalog.
#[derive(Clone)]
pub struct ManifestLoader {
    client: Client,
    url: String,
}

impl ManifestLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(join_url(&config.base_url, &config.manifest_path))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Retrieve the manifest, degrading to the built-in copy on any failure.
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    pub async fn load(&self) -> LoadedManifest {
        match self.fetch_remote().await {
            Ok(pages) => {
                tracing::info!(count = pages.len(), "Loaded remote manifest");
                LoadedManifest {
                    pages,
                    source: ManifestSource::Remote,
                }
            }
            Err(e) => {
                let reason = format!("{e:#}");
                tracing::info!(%reason, "Remote manifest unavailable, using built-in catalog");
                LoadedManifest::fallback(reason)
            }
        }
    }

    /// Single GET of the manifest. Errors carry context for every failure step.
    pub async fn fetch_remote(&self) -> Result<Vec<PageDescriptor>> {
        let resp = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .with_context(|| format!("failed to send GET request to {}", self.url))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("manifest request to {} returned {}", self.url, status);
        }

        let body = resp
            .text()
            .await
            .with_context(|| format!("failed to read response body from {}", self.url))?;

        parse_manifest(&body).with_context(|| format!("invalid manifest at {}", self.url))
    }
}

/// Parse a JSON array of descriptors.
///
/// The body must be an array; entries that are not objects or lack a
/// non-empty `file` are skipped with a warning rather than rejecting the
/// whole manifest.
pub fn parse_manifest(body: &str) -> Result<Vec<PageDescriptor>> {
    let entries: Vec<Value> =
        serde_json::from_str(body).context("manifest body is not a JSON array")?;

    let mut pages = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<PageDescriptor>(entry) {
            Ok(page) if !page.file.trim().is_empty() => pages.push(page),
            Ok(_) => tracing::warn!(index, "Skipping manifest entry without a file name"),
            Err(e) => tracing::warn!(index, error = %e, "Skipping malformed manifest entry"),
        }
    }
    Ok(pages)
}

/// Convenience wrapper: load the manifest at `url`.
pub async fn load_manifest(url: &str) -> LoadedManifest {
    ManifestLoader::new(url).load().await
}
