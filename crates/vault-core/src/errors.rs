//! Error hierarchy for Prompt Vault.
//!
//! - [`ValidationError`]: model invariants checked before anything is stored
//! - [`VaultError`]: top-level error wrapping each domain's failures as text,
//!   so callers that span several crates can hold a single error type
//!
//! Mention extraction, resolution and compilation never fail, so there is
//! no compiler error type.

use thiserror::Error;

/// A model value violated an invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The entity's name is empty or whitespace.
    #[error("{entity} {id} has an empty name")]
    EmptyName {
        /// Entity kind (`asset`, `workspace`).
        entity: &'static str,
        /// Entity ID.
        id: String,
    },
}

/// Top-level error type for Prompt Vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Model validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Settings could not be loaded.
    #[error("settings: {0}")]
    Settings(String),

    /// Store operation failed.
    #[error("store: {0}")]
    Store(String),

    /// Repository import failed.
    #[error("import: {0}")]
    Import(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
