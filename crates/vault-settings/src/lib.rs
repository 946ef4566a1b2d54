//! # vault-settings
//!
//! Configuration management with layered sources for Prompt Vault.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`VaultSettings::default()`]
//! 2. **User file**: `~/.prompt-vault/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `VAULT_*` overrides (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use vault_settings::get_settings;
//!
//! let settings = get_settings();
//! println!("max depth: {}", settings.compiler.max_depth);
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::sync::OnceLock;

/// Global settings singleton.
///
/// Initialized on first access via [`get_settings`], or explicitly through
/// [`init_settings`] (the CLI does this after honouring `--settings`).
static SETTINGS: OnceLock<VaultSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.prompt-vault/settings.json` with
/// env var overrides. If loading fails, returns compiled defaults.
pub fn get_settings() -> &'static VaultSettings {
    SETTINGS.get_or_init(|| load_settings().unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// Returns `Err(settings)` if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: VaultSettings) -> std::result::Result<(), VaultSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
