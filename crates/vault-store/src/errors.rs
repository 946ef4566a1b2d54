//! Error types for store operations.

use vault_core::{ValidationError, VaultError};

/// Errors that can occur during store, bundle, or migration operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error while reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A model value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Workspace not found by ID.
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    /// Asset not found by ID.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Conversation not found by ID.
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    /// An ID is already taken by an entry of another workspace.
    #[error("{entity} {id} already belongs to workspace {owner}")]
    IdConflict {
        /// Kind of entry (`asset`, `conversation`).
        entity: &'static str,
        /// Conflicting ID.
        id: String,
        /// Workspace that owns the existing entry.
        owner: String,
    },

    /// Bundle or snapshot written by a newer or unknown format.
    #[error("Unsupported version: {found} (supported: {supported})")]
    UnsupportedVersion {
        /// Version found in the input.
        found: String,
        /// Version this build understands.
        supported: String,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for VaultError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(inner) => Self::Validation(inner),
            other => Self::Store(other.to_string()),
        }
    }
}
