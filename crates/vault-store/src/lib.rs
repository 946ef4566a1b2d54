//! # vault-store
//!
//! In-memory vault store, workspace export bundles, and schema migration.
//!
//! The store is the asset and conversation source the compiler reads from.
//! It never reaches into global state: callers own a [`VaultStore`] and pass
//! snapshots of it to `vault-compiler`.
//!
//! ## Module Overview
//!
//! - [`store`]: Workspaces, assets, and conversations behind a lock
//! - [`bundle`]: `pv-export` JSON bundles for a single workspace
//! - [`migration`]: Versioned upgrades of persisted snapshots
//! - [`seed`]: Quick-start workspace with sample assets

#![deny(unsafe_code)]

pub mod bundle;
pub mod errors;
pub mod migration;
pub mod seed;
pub mod store;

pub use bundle::{
    BUNDLE_VERSION, ImportSummary, VaultExport, export_file_name, export_workspace, import_bundle,
    read_bundle, write_bundle,
};
pub use errors::{Result, StoreError};
pub use migration::{CURRENT_SCHEMA_VERSION, migrate};
pub use seed::seed_quick_start;
pub use store::{AssetPatch, StoreSnapshot, VaultStore};
