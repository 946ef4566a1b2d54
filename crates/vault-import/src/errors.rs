//! Error types for repository import.

use vault_core::VaultError;

/// Errors that can occur while scanning a repository.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The URL does not name a GitHub repository.
    #[error("Invalid GitHub URL: {0}")]
    InvalidUrl(String),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The repository tree request returned a non-success status.
    #[error("Failed to fetch repository structure from {url} (status {status})")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The tree response was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

impl From<ImportError> for VaultError {
    fn from(err: ImportError) -> Self {
        Self::Import(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn status_display() {
        let err = ImportError::Status {
            url: "https://api.github.com/repos/o/r".into(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch repository structure from https://api.github.com/repos/o/r (status 404)"
        );
    }

    #[test]
    fn converts_to_vault_error() {
        let err: VaultError = ImportError::InvalidUrl("nope".into()).into();
        assert_matches!(err, VaultError::Import(ref msg) if msg.contains("nope"));
    }
}
