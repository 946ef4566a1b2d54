//! GitHub repository scanner.
//!
//! Lists a repository's files through the git trees API, fetches every
//! importable blob from the raw content host, and turns each one into a
//! [`ScannedItem`] the user can pick from.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vault_core::{Asset, AssetType, WorkspaceId};
use vault_settings::ImportSettings;

use crate::errors::{ImportError, Result};
use crate::parser::{extract_dependencies, parse_frontmatter};
use crate::paths::{
    RepoRef, classify_path, derive_name_from_path, is_importable, parse_repo_url, title_case,
};

/// A file found in a repository, ready to become an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedItem {
    /// Display name.
    pub name: String,
    /// Description from frontmatter, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path inside the repository.
    pub path: String,
    /// Asset kind.
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// Raw file content.
    pub content: String,
    /// Relative paths the file links to.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// URL the content was fetched from.
    pub source_url: String,
}

impl ScannedItem {
    /// Build an item from a fetched file.
    ///
    /// Skill frontmatter may override the derived name and supply a
    /// description. Prompts keep their derived name.
    pub fn from_file(path: &str, content: String, source_url: String) -> Self {
        let asset_type = classify_path(path);
        let mut name = derive_name_from_path(path);
        let mut description = None;

        if asset_type == AssetType::Skill {
            let mut frontmatter = parse_frontmatter(&content);
            if let Some(fm_name) = frontmatter.remove("name") {
                let titled = title_case(&fm_name, &['-']);
                if titled.trim().is_empty() {
                    debug!(path, "frontmatter name is blank, keeping derived name");
                } else {
                    name = titled.trim().to_string();
                }
            }
            description = frontmatter.remove("description");
        }

        Self {
            name,
            description,
            path: path.to_string(),
            asset_type,
            dependencies: extract_dependencies(&content),
            content,
            source_url,
        }
    }

    /// Convert into an asset of `workspace_id`.
    pub fn into_asset(self, workspace_id: WorkspaceId) -> Asset {
        let mut asset = Asset::new(workspace_id, self.name, self.asset_type, self.content);
        asset.description = self.description;
        asset.source_url = Some(self.source_url);
        asset
    }
}

#[derive(Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeEntry>,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Scans public GitHub repositories for skills and prompts.
#[derive(Debug, Clone)]
pub struct GitHubScanner {
    client: reqwest::Client,
    api_base: String,
    raw_base: String,
    branch: String,
}

impl GitHubScanner {
    /// Create a scanner with explicit endpoints.
    pub fn new(
        api_base: impl Into<String>,
        raw_base: impl Into<String>,
        branch: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("prompt-vault/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            raw_base: raw_base.into().trim_end_matches('/').to_string(),
            branch: branch.into(),
        })
    }

    /// Create a scanner from import settings.
    pub fn from_settings(settings: &ImportSettings) -> Result<Self> {
        Self::new(
            settings.github_api_url.as_str(),
            settings.raw_content_url.as_str(),
            settings.branch.as_str(),
            Duration::from_millis(settings.timeout_ms),
        )
    }

    /// Scan the repository named by `url`.
    ///
    /// Fails if the URL is not a GitHub repository or the file listing
    /// cannot be fetched. Individual files that fail to download are
    /// skipped.
    pub async fn scan(&self, url: &str) -> Result<Vec<ScannedItem>> {
        let repo = parse_repo_url(url)?;
        let branch = repo.branch.as_deref().unwrap_or(&self.branch);
        let paths = self.list_importable(&repo, branch).await?;
        debug!(owner = %repo.owner, repo = %repo.repo, branch, candidates = paths.len(), "scanning repository");

        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            let content_url = format!(
                "{}/{}/{}/{}/{}",
                self.raw_base, repo.owner, repo.repo, branch, path
            );
            match self.fetch_text(&content_url).await {
                Ok(content) => items.push(ScannedItem::from_file(&path, content, content_url)),
                Err(e) => warn!(path = %path, error = %e, "skipping file that could not be fetched"),
            }
        }

        info!(owner = %repo.owner, repo = %repo.repo, found = items.len(), "repository scanned");
        Ok(items)
    }

    async fn list_importable(&self, repo: &RepoRef, branch: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, repo.owner, repo.repo, branch
        );
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ImportError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let tree: TreeResponse = serde_json::from_str(&response.text().await?)?;
        Ok(tree
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob" && is_importable(&entry.path))
            .map(|entry| entry.path)
            .collect())
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ImportError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
