//! # vault-core
//!
//! Foundation types, branded IDs, errors, and logging setup for Prompt Vault.
//!
//! This crate provides the shared vocabulary that all other vault crates depend on:
//!
//! - **Branded IDs**: `AssetId`, `WorkspaceId`, `ConversationId`, `MessageId`,
//!   `MentionId` as newtypes for type safety
//! - **Models**: `Asset`, `Workspace`, `Mention`, `Message`, `Conversation`
//! - **Errors**: `VaultError` and `ValidationError` via `thiserror`
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` subscriber

#![deny(unsafe_code)]

pub mod errors;
pub mod ids;
pub mod logging;
pub mod models;

pub use errors::{ValidationError, VaultError};
pub use ids::{AssetId, ConversationId, MentionId, MessageId, WorkspaceId};
pub use models::{
    Asset, AssetType, Conversation, Mention, Message, Role, Workspace, last_user_message, now_ms,
};
