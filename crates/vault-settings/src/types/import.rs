//! Repository import settings.

use serde::{Deserialize, Serialize};

/// Where the GitHub scanner fetches trees and file contents from.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportSettings {
    /// Base URL of the GitHub REST API.
    pub github_api_url: String,
    /// Base URL serving raw file contents.
    pub raw_content_url: String,
    /// Branch scanned when the URL has no `/tree/<branch>` suffix.
    pub branch: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            github_api_url: "https://api.github.com".to_string(),
            raw_content_url: "https://raw.githubusercontent.com".to_string(),
            branch: "main".to_string(),
            timeout_ms: 30_000,
        }
    }
}
