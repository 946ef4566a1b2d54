//! Repository URLs and file paths.
//!
//! Decides which files of a repository are importable, what kind of asset
//! each one becomes, and what it is called.

use std::sync::LazyLock;

use regex::Regex;
use vault_core::AssetType;

use crate::errors::{ImportError, Result};

static REPO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com/([^/?#\s]+)/([^/?#\s]+)(?:/tree/([^/?#\s]+))?")
        .expect("static regex is valid")
});

/// Owner and name of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Account or organization.
    pub owner: String,
    /// Repository name, without a `.git` suffix.
    pub repo: String,
    /// Branch named by a `/tree/<branch>` suffix.
    pub branch: Option<String>,
}

/// Extract `owner/repo` from anything containing `github.com/<owner>/<repo>`.
///
/// A following `/tree/<branch>` names the branch. Only its first path
/// segment is taken, so branch names containing `/` are not supported.
pub fn parse_repo_url(url: &str) -> Result<RepoRef> {
    let caps = REPO_URL
        .captures(url)
        .ok_or_else(|| ImportError::InvalidUrl(url.to_string()))?;
    let owner = caps[1].to_string();
    let repo = caps[2].trim_end_matches(".git").to_string();
    if repo.is_empty() {
        return Err(ImportError::InvalidUrl(url.to_string()));
    }
    let branch = caps.get(3).map(|m| m.as_str().to_string());
    Ok(RepoRef {
        owner,
        repo,
        branch,
    })
}

/// Whether a blob path is worth fetching.
pub fn is_importable(path: &str) -> bool {
    path.ends_with("SKILL.md") || path.ends_with(".prompt") || path.contains("prompts/")
}

/// `SKILL.md` files are skills, everything else importable is a prompt.
pub fn classify_path(path: &str) -> AssetType {
    if path.ends_with("SKILL.md") {
        AssetType::Skill
    } else {
        AssetType::Prompt
    }
}

/// Human-readable name for a file.
///
/// `skills/frontend-design/SKILL.md` becomes `Frontend Design` and
/// `code_review.prompt` becomes `Code Review`. Other files keep their
/// file name.
pub fn derive_name_from_path(path: &str) -> String {
    let mut parts = path.rsplit('/');
    let file_name = parts.next().unwrap_or(path);

    if file_name == "SKILL.md" {
        if let Some(folder) = parts.next() {
            return title_case(folder, &['-']);
        }
    }
    if let Some(stem) = file_name.strip_suffix(".prompt") {
        return title_case(stem, &['-', '_']);
    }
    file_name.to_string()
}

/// Split on `separators` and upper-case the first letter of each word.
pub fn title_case(text: &str, separators: &[char]) -> String {
    text.split(separators)
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
